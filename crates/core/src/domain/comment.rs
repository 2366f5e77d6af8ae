//! Comment draft.

use artlog_common::{error::codes, AppError, AppResult};

const CONTENT_MAX: usize = 500;

/// A validated comment payload. Parent linkage is checked by the service,
/// which has repository access; the draft covers content only.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    /// Comment body, 1..=500 chars.
    pub content: String,
    /// Parent comment ID for replies.
    pub parent_id: Option<String>,
}

impl CommentDraft {
    /// Validate raw input into a draft.
    pub fn new(content: String, parent_id: Option<String>) -> AppResult<Self> {
        if content.trim().is_empty() || content.chars().count() > CONTENT_MAX {
            return Err(AppError::invalid(
                codes::INVALID_COMMENT_CONTENT_LENGTH,
                "content must be 1 to 500 characters",
            ));
        }

        Ok(Self { content, parent_id })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_at_limit_accepted() {
        assert!(CommentDraft::new("a".repeat(500), None).is_ok());
    }

    #[test]
    fn test_content_over_limit_rejected() {
        let err = CommentDraft::new("a".repeat(501), None).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_COMMENT_CONTENT_LENGTH);
    }

    #[test]
    fn test_blank_content_rejected() {
        let err = CommentDraft::new("   ".to_string(), None).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_COMMENT_CONTENT_LENGTH);
    }
}
