//! Business logic services.

pub mod comment;
pub mod exhibition;
pub mod review;
pub mod user;

pub use comment::{CommentService, CommentThread, CommentView, CHILD_INLINE_LIMIT};
pub use exhibition::{ExhibitionDetail, ExhibitionService, LikeStatus};
pub use review::{AuthorView, ReviewService, ReviewView};
pub use user::{AuthenticatedUser, UserService, ROLE_USER};
