//! Database entities.

pub mod comment;
pub mod comment_like;
pub mod exhibition;
pub mod exhibition_like;
pub mod review;
pub mod review_like;
pub mod review_photo;
pub mod role;
pub mod user;
pub mod user_role;

pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use exhibition::Entity as Exhibition;
pub use exhibition_like::Entity as ExhibitionLike;
pub use review::Entity as Review;
pub use review_like::Entity as ReviewLike;
pub use review_photo::Entity as ReviewPhoto;
pub use role::Entity as Role;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
