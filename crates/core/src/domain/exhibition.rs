//! Exhibition draft.

use artlog_common::{error::codes, AppError, AppResult};
use artlog_db::entities::exhibition::{Area, Genre};
use chrono::NaiveDate;

const NAME_MAX: usize = 100;
const PLACE_MAX: usize = 100;
const ADDRESS_MAX: usize = 300;
const INQUIRY_MAX: usize = 100;
const FEE_MAX: usize = 1000;
const URL_MAX: usize = 2083;

/// A validated exhibition payload. Constructing one is the only way client
/// input reaches an exhibition row.
#[derive(Debug, Clone)]
pub struct ExhibitionDraft {
    /// Exhibition name, 1..=100 chars.
    pub name: String,
    /// Opening date.
    pub start_date: NaiveDate,
    /// Closing date, never before `start_date`.
    pub end_date: NaiveDate,
    /// Genre.
    pub genre: Genre,
    /// Venue latitude.
    pub latitude: f64,
    /// Venue longitude.
    pub longitude: f64,
    /// Area.
    pub area: Area,
    /// Venue name, 1..=100 chars.
    pub place: String,
    /// Venue address, 1..=300 chars.
    pub address: String,
    /// Contact, 1..=100 chars.
    pub inquiry: String,
    /// Admission fee description, 1..=1000 chars.
    pub fee: String,
    /// Official page, http(s), <=2083 chars.
    pub url: String,
    /// Thumbnail image, http(s), <=2083 chars.
    pub thumbnail: String,
}

impl ExhibitionDraft {
    /// Validate raw input into a draft. The first violated rule wins.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        genre: Genre,
        latitude: f64,
        longitude: f64,
        area: Area,
        place: String,
        address: String,
        inquiry: String,
        fee: String,
        url: String,
        thumbnail: String,
    ) -> AppResult<Self> {
        check_text(&name, NAME_MAX, codes::INVALID_EXHIBITION_NAME, "name")?;

        if end_date < start_date {
            return Err(AppError::invalid(
                codes::INVALID_EXHIBITION_PERIOD,
                "end date precedes start date",
            ));
        }

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::invalid(
                codes::INVALID_EXHIBITION_COORDINATE,
                "coordinate out of range",
            ));
        }

        check_text(&place, PLACE_MAX, codes::INVALID_EXHIBITION_PLACE, "place")?;
        check_text(&address, ADDRESS_MAX, codes::INVALID_EXHIBITION_ADDRESS, "address")?;
        check_text(&inquiry, INQUIRY_MAX, codes::INVALID_EXHIBITION_INQUIRY, "inquiry")?;
        check_text(&fee, FEE_MAX, codes::INVALID_EXHIBITION_FEE, "fee")?;
        check_http_url(&url)?;
        check_http_url(&thumbnail)?;

        Ok(Self {
            name,
            start_date,
            end_date,
            genre,
            latitude,
            longitude,
            area,
            place,
            address,
            inquiry,
            fee,
            url,
            thumbnail,
        })
    }
}

fn check_text(value: &str, max: usize, code: &'static str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(code, format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(AppError::invalid(
            code,
            format!("{field} exceeds {max} characters"),
        ));
    }
    Ok(())
}

/// URLs must parse and carry an http(s) scheme.
pub(crate) fn check_http_url(value: &str) -> AppResult<()> {
    if value.trim().is_empty() || value.chars().count() > URL_MAX {
        return Err(AppError::invalid(
            codes::INVALID_URL_FORMAT,
            "URL is required and must be at most 2083 characters",
        ));
    }

    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::invalid(
            codes::INVALID_URL_FORMAT,
            "URL must be a valid http(s) URL",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft_with(name: &str, url: &str, end_day: u32) -> AppResult<ExhibitionDraft> {
        ExhibitionDraft::new(
            name.to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, end_day).unwrap(),
            Genre::Painting,
            37.5665,
            126.978,
            Area::Seoul,
            "City Gallery".to_string(),
            "1 Sejong-daero".to_string(),
            "02-000-0000".to_string(),
            "Free".to_string(),
            url.to_string(),
            "https://example.com/thumb.jpg".to_string(),
        )
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft_with("Light and Shadow", "https://example.com", 31).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = draft_with("   ", "https://example.com", 31).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_EXHIBITION_NAME);
    }

    #[test]
    fn test_name_over_limit_rejected() {
        let long = "a".repeat(101);
        let err = draft_with(&long, "https://example.com", 31).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_EXHIBITION_NAME);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = ExhibitionDraft::new(
            "Light and Shadow".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            Genre::Painting,
            37.5665,
            126.978,
            Area::Seoul,
            "City Gallery".to_string(),
            "1 Sejong-daero".to_string(),
            "02-000-0000".to_string(),
            "Free".to_string(),
            "https://example.com".to_string(),
            "https://example.com/thumb.jpg".to_string(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_EXHIBITION_PERIOD);
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = draft_with("Light and Shadow", "ftp://example.com", 31).unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_URL_FORMAT);
    }

    #[test]
    fn test_coordinate_out_of_range_rejected() {
        let err = ExhibitionDraft::new(
            "Light and Shadow".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            Genre::Painting,
            95.0,
            126.978,
            Area::Seoul,
            "City Gallery".to_string(),
            "1 Sejong-daero".to_string(),
            "02-000-0000".to_string(),
            "Free".to_string(),
            "https://example.com".to_string(),
            "https://example.com/thumb.jpg".to_string(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), codes::INVALID_EXHIBITION_COORDINATE);
    }
}
