//! Review draft.

use artlog_common::{error::codes, AppError, AppResult};
use chrono::NaiveDate;

use super::exhibition::check_http_url;

const TITLE_MAX: usize = 50;
const CONTENT_MAX: usize = 1000;
const PHOTO_MAX: usize = 9;

/// A validated review payload.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    /// Review title, 1..=50 chars.
    pub title: String,
    /// Review body, 1..=1000 chars.
    pub content: String,
    /// Visit date, never after `today`.
    pub date: NaiveDate,
    /// Whether the review is public.
    pub is_public: bool,
    /// Photo URLs, 0..=9 of them.
    pub photos: Vec<String>,
}

impl ReviewDraft {
    /// Validate raw input into a draft. `today` is injected so the date rule
    /// is testable.
    pub fn new(
        title: String,
        content: String,
        date: NaiveDate,
        is_public: bool,
        photos: Vec<String>,
        today: NaiveDate,
    ) -> AppResult<Self> {
        if title.trim().is_empty() || title.chars().count() > TITLE_MAX {
            return Err(AppError::invalid(
                codes::INVALID_REVIEW_TITLE_LENGTH,
                "title must be 1 to 50 characters",
            ));
        }

        if content.trim().is_empty() || content.chars().count() > CONTENT_MAX {
            return Err(AppError::invalid(
                codes::INVALID_REVIEW_CONTENT_LENGTH,
                "content must be 1 to 1000 characters",
            ));
        }

        if date > today {
            return Err(AppError::invalid(
                codes::INVALID_REVIEW_DATE,
                "visit date cannot be in the future",
            ));
        }

        if photos.len() > PHOTO_MAX {
            return Err(AppError::invalid(
                codes::INVALID_REVIEW_PHOTO_COUNT,
                "a review holds at most 9 photos",
            ));
        }

        for photo in &photos {
            check_http_url(photo).map_err(|_| {
                AppError::invalid(
                    codes::INVALID_REVIEW_PHOTO_PATH,
                    "photo path must be a valid http(s) URL",
                )
            })?;
        }

        Ok(Self {
            title,
            content,
            date,
            is_public,
            photos,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
    }

    fn draft(title: &str, content: &str, date: NaiveDate, photos: Vec<String>) -> AppResult<ReviewDraft> {
        ReviewDraft::new(
            title.to_string(),
            content.to_string(),
            date,
            true,
            photos,
            today(),
        )
    }

    #[test]
    fn test_content_at_limit_accepted() {
        let content = "a".repeat(1000);
        assert!(draft("Fine", &content, today(), vec![]).is_ok());
    }

    #[test]
    fn test_content_over_limit_rejected() {
        let content = "a".repeat(1001);
        let err = draft("Fine", &content, today(), vec![]).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_REVIEW_CONTENT_LENGTH);
    }

    #[test]
    fn test_title_over_limit_rejected() {
        let title = "t".repeat(51);
        let err = draft(&title, "Good show", today(), vec![]).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_REVIEW_TITLE_LENGTH);
    }

    #[test]
    fn test_visit_today_accepted_tomorrow_rejected() {
        assert!(draft("Fine", "Good show", today(), vec![]).is_ok());

        let tomorrow = today().succ_opt().unwrap();
        let err = draft("Fine", "Good show", tomorrow, vec![]).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_REVIEW_DATE);
    }

    #[test]
    fn test_nine_photos_accepted_ten_rejected() {
        let nine: Vec<String> = (0..9)
            .map(|i| format!("https://cdn.example.com/{i}.jpg"))
            .collect();
        assert!(draft("Fine", "Good show", today(), nine).is_ok());

        let ten: Vec<String> = (0..10)
            .map(|i| format!("https://cdn.example.com/{i}.jpg"))
            .collect();
        let err = draft("Fine", "Good show", today(), ten).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_REVIEW_PHOTO_COUNT);
    }

    #[test]
    fn test_bad_photo_path_rejected() {
        let err = draft(
            "Fine",
            "Good show",
            today(),
            vec!["not a url".to_string()],
        )
        .unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_REVIEW_PHOTO_PATH);
    }
}
