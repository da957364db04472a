//! Domain models and request/response types.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::{CommentResponse, CreateCommentRequest, UpdateCommentRequest};
pub use post::{
    CreatePostRequest, ListPostsQuery, PostListResponse, PostResponse, TopicCount,
    UpdatePostRequest,
};
pub use user::{
    AuthResponse, AuthorSummary, ChangePasswordRequest, GoogleClaims, GoogleSigninRequest,
    Principal, ProfileResponse, ProfileUpdateRequest, Provider, Role, SigninRequest,
    SignupRequest, UserResponse,
};
