//! SeaORM entity definitions.

pub mod comment;
pub mod follow;
pub mod post;
pub mod user;
