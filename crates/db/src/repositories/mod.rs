//! Repository layer.
//!
//! Each repository wraps an `Arc<DatabaseConnection>` and exposes the exact
//! queries its use cases need; nothing hands out lazy relations.

mod comment;
mod comment_like;
mod exhibition;
mod exhibition_like;
mod review;
mod review_like;
mod role;
mod user;

pub use comment::{CommentRepository, GroupedChildren};
pub use comment_like::CommentLikeRepository;
pub use exhibition::{ExhibitionAroundRow, ExhibitionRepository, ExhibitionRow};
pub use exhibition_like::ExhibitionLikeRepository;
pub use review::{ReviewRepository, ReviewRow};
pub use review_like::ReviewLikeRepository;
pub use role::RoleRepository;
pub use user::UserRepository;
