//! Authentication and authorization primitives: password hashing, token
//! issuance/verification, the bearer-token extractor, and the access
//! policies applied at mutation sites.

pub mod extractor;
pub mod password;
pub mod policy;
pub mod token;

pub use extractor::BearerAuth;
pub use token::TokenIssuer;
