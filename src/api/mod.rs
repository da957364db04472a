//! API endpoint modules.

pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

pub use auth::configure_routes as configure_auth_routes;
pub use comments::configure_routes as configure_comment_routes;
pub use health::configure_health_routes;
pub use posts::configure_routes as configure_post_routes;
pub use users::configure_routes as configure_user_routes;
