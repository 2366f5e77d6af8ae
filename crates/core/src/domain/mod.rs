//! Validating draft types.
//!
//! Drafts are the only way services build entity rows from client input.
//! Validation is fail-fast: the first violated rule wins, and within a field
//! the order is required, then format, then length.

pub mod comment;
pub mod exhibition;
pub mod review;
pub mod user;

pub use comment::CommentDraft;
pub use exhibition::ExhibitionDraft;
pub use review::ReviewDraft;
pub use user::{validate_email, validate_nickname, validate_password, SignupDraft};
