//! Pagination, sort resolution, and filter condition building.
//!
//! Every listing derives its data query and its count query from the same
//! condition value, so total metadata always matches the returned rows.

use artlog_common::{AppError, AppResult, error::codes};
use chrono::{Datelike, NaiveDate};
use sea_orm::{ActiveEnum, Order, Value};

use crate::entities::exhibition::{Area, Genre};

/// Offset/limit page request. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u64,
    /// Rows per page.
    pub size: u64,
}

impl PageRequest {
    /// Largest page size a client may request.
    pub const MAX_SIZE: u64 = 100;

    /// Create a page request, clamping size to `1..=MAX_SIZE`.
    #[must_use]
    pub const fn new(page: u64, size: u64) -> Self {
        let size = if size == 0 {
            1
        } else if size > Self::MAX_SIZE {
            Self::MAX_SIZE
        } else {
            size
        };
        Self { page, size }
    }

    /// Row offset for this page. Saturates, since `page` arrives straight
    /// from a query parameter.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Row limit for this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// One page of results plus total metadata.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page: u64,
    /// Requested page size.
    pub size: u64,
    /// Total matching rows across all pages.
    pub total_elements: u64,
    /// Total page count.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from fetched content and the matching total count.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
        }
    }

    /// Map page content, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Sort direction, supplied independently of the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse `ASC` / `DESC` (case-insensitive).
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            other => Err(AppError::invalid(
                codes::INVALID_SORT_DIRECTION,
                format!("'{other}' is not a sort direction"),
            )),
        }
    }

    /// SQL keyword for raw-statement ordering.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// `sea_orm` order for typed queries.
    #[must_use]
    pub const fn to_order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Sort keys accepted for comment listings.
///
/// Lookup is a case-sensitive exact match; anything else fails before any
/// query executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSortKey {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Primary key (insertion order).
    Id,
    /// Distinct count of like rows.
    LikeCount,
}

impl CommentSortKey {
    /// Resolve a client-supplied sort key string.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "id" => Ok(Self::Id),
            "likeCount" => Ok(Self::LikeCount),
            other => Err(AppError::invalid(
                codes::INVALID_COMMENT_SORT_TYPE,
                format!("'{other}' is not a comment sort key"),
            )),
        }
    }
}

/// Sort keys accepted for exhibition listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhibitionSortKey {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Primary key.
    Id,
    /// Distinct count of like rows.
    LikeCount,
    /// Closing date.
    EndDate,
}

impl ExhibitionSortKey {
    /// Resolve a client-supplied sort key string.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "id" => Ok(Self::Id),
            "likeCount" => Ok(Self::LikeCount),
            "endDate" => Ok(Self::EndDate),
            other => Err(AppError::invalid(
                codes::INVALID_EXHIBITION_SORT_TYPE,
                format!("'{other}' is not an exhibition sort key"),
            )),
        }
    }

    /// Orderable expression over the projection's select list.
    #[must_use]
    pub const fn order_expr(self) -> &'static str {
        match self {
            Self::CreatedAt => "e.created_at",
            Self::Id => "e.id",
            Self::LikeCount => "like_count",
            Self::EndDate => "e.end_date",
        }
    }
}

/// Sort keys accepted for review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSortKey {
    /// Creation timestamp.
    #[default]
    CreatedAt,
    /// Primary key.
    Id,
    /// Distinct count of like rows.
    LikeCount,
}

impl ReviewSortKey {
    /// Resolve a client-supplied sort key string.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "id" => Ok(Self::Id),
            "likeCount" => Ok(Self::LikeCount),
            other => Err(AppError::invalid(
                codes::INVALID_REVIEW_SORT_TYPE,
                format!("'{other}' is not a review sort key"),
            )),
        }
    }

    /// Orderable expression over the projection's select list.
    #[must_use]
    pub const fn order_expr(self) -> &'static str {
        match self {
            Self::CreatedAt => "r.created_at",
            Self::Id => "r.id",
            Self::LikeCount => "like_count",
        }
    }
}

/// A multi-select filter value: a concrete selection or the `ALL` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet<T> {
    /// Wildcard - absorbs every concrete selection in the same set.
    All,
    /// A concrete selection.
    Only(T),
}

/// Narrow a facet set to concrete values.
///
/// Empty sets and sets containing the wildcard both mean "no restriction",
/// so `{SEOUL, ALL}` behaves exactly like `{ALL}`.
#[must_use]
pub fn narrow<T: Copy>(facets: &[Facet<T>]) -> Option<Vec<T>> {
    if facets.is_empty() || facets.iter().any(|f| matches!(f, Facet::All)) {
        return None;
    }
    Some(
        facets
            .iter()
            .filter_map(|f| match f {
                Facet::All => None,
                Facet::Only(v) => Some(*v),
            })
            .collect(),
    )
}

/// Parse an area facet (`ALL` or an area name, case-insensitive).
pub fn parse_area(s: &str) -> AppResult<Facet<Area>> {
    if s.eq_ignore_ascii_case("ALL") {
        return Ok(Facet::All);
    }
    Area::try_from_value(&s.to_lowercase())
        .map(Facet::Only)
        .map_err(|_| AppError::invalid(codes::INVALID_FILTER, format!("unknown area '{s}'")))
}

/// Parse a genre facet (`ALL` or a genre name, case-insensitive).
pub fn parse_genre(s: &str) -> AppResult<Facet<Genre>> {
    if s.eq_ignore_ascii_case("ALL") {
        return Ok(Facet::All);
    }
    Genre::try_from_value(&s.to_lowercase())
        .map(Facet::Only)
        .map_err(|_| AppError::invalid(codes::INVALID_FILTER, format!("unknown genre '{s}'")))
}

/// Parse a month facet (`ALL` or `1..=12`).
pub fn parse_month(s: &str) -> AppResult<Facet<Month>> {
    if s.eq_ignore_ascii_case("ALL") {
        return Ok(Facet::All);
    }
    s.parse::<u32>()
        .ok()
        .map(Month::new)
        .transpose()?
        .map(Facet::Only)
        .ok_or_else(|| AppError::invalid(codes::INVALID_FILTER, format!("unknown month '{s}'")))
}

/// A calendar month (1..=12) used for period filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month(u32);

impl Month {
    /// Create a month, rejecting values outside `1..=12`.
    pub fn new(number: u32) -> AppResult<Self> {
        if (1..=12).contains(&number) {
            Ok(Self(number))
        } else {
            Err(AppError::invalid(
                codes::INVALID_FILTER,
                format!("month {number} is out of range"),
            ))
        }
    }

    /// Month number, 1..=12.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }

    /// First and last day of this month in the given year.
    #[must_use]
    pub fn window(self, year: i32) -> (NaiveDate, NaiveDate) {
        // Both constructions are in-range for 1..=12.
        let start = NaiveDate::from_ymd_opt(year, self.0, 1)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or_default());
        let end = if self.0 == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, self.0 + 1, 1)
        }
        .and_then(|d| d.pred_opt())
        .unwrap_or(start);
        (start, end)
    }
}

/// Structured exhibition filter, translated into one SQL fragment shared by
/// the page query and the count query.
#[derive(Debug, Clone, Default)]
pub struct ExhibitionFilter {
    /// Area multi-select.
    pub areas: Vec<Facet<Area>>,
    /// Month multi-select (current calendar year).
    pub months: Vec<Facet<Month>>,
    /// Genre multi-select.
    pub genres: Vec<Facet<Genre>>,
    /// When false, exhibitions that already ended are excluded.
    pub include_end: bool,
    /// Free-text name substring.
    pub query: Option<String>,
}

/// A built WHERE fragment plus its bind values, `$1..=$n` numbered.
#[derive(Debug, Clone)]
pub struct ConditionSql {
    /// The WHERE clause body (without the `WHERE` keyword).
    pub clause: String,
    /// Bind values for `$1..=$n`.
    pub values: Vec<Value>,
}

impl ConditionSql {
    /// Number of bind values consumed so far; the next placeholder is
    /// `$(len + 1)`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no bind values have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Escape `%` and `_` for a LIKE pattern.
#[must_use]
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

impl ExhibitionFilter {
    /// Minimum free-text query length after trimming.
    pub const MIN_QUERY_LEN: usize = 2;

    /// Translate the filter into a WHERE fragment over alias `e`.
    ///
    /// `today` anchors both the include-ended cutoff and the calendar year
    /// for month windows, so behavior is deterministic under test.
    pub fn to_condition_sql(&self, today: NaiveDate) -> AppResult<ConditionSql> {
        let mut clause = String::from("e.is_deleted = FALSE");
        let mut values: Vec<Value> = Vec::new();

        if let Some(areas) = narrow(&self.areas) {
            let placeholders: Vec<String> = areas
                .iter()
                .map(|a| {
                    values.push(a.to_value().into());
                    format!("${}", values.len())
                })
                .collect();
            clause.push_str(&format!(" AND e.area IN ({})", placeholders.join(", ")));
        }

        if let Some(genres) = narrow(&self.genres) {
            let placeholders: Vec<String> = genres
                .iter()
                .map(|g| {
                    values.push(g.to_value().into());
                    format!("${}", values.len())
                })
                .collect();
            clause.push_str(&format!(" AND e.genre IN ({})", placeholders.join(", ")));
        }

        if let Some(months) = narrow(&self.months) {
            // Each month expands to a date-range overlap test against the
            // exhibition period, OR-combined across the selection.
            let mut overlaps = Vec::with_capacity(months.len());
            for month in months {
                let (start, end) = month.window(today.year());
                values.push(end.into());
                let end_ph = values.len();
                values.push(start.into());
                let start_ph = values.len();
                overlaps.push(format!(
                    "(e.start_date <= ${end_ph} AND e.end_date >= ${start_ph})"
                ));
            }
            clause.push_str(&format!(" AND ({})", overlaps.join(" OR ")));
        }

        if !self.include_end {
            values.push(today.into());
            clause.push_str(&format!(" AND e.end_date >= ${}", values.len()));
        }

        if let Some(q) = self.query.as_deref() {
            let trimmed = q.trim();
            if trimmed.chars().count() < Self::MIN_QUERY_LEN {
                return Err(AppError::invalid(
                    codes::INVALID_SEARCH_QUERY,
                    format!("search query must be at least {} characters", Self::MIN_QUERY_LEN),
                ));
            }
            values.push(format!("%{}%", escape_like(trimmed)).into());
            clause.push_str(&format!(" AND e.name ILIKE ${}", values.len()));
        }

        Ok(ConditionSql { clause, values })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 15).unwrap()
    }

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 500).size, PageRequest::MAX_SIZE);
        assert_eq!(PageRequest::new(3, 20).offset(), 60);
    }

    #[test]
    fn test_page_request_offset_saturates() {
        assert_eq!(PageRequest::new(u64::MAX, 2).offset(), u64::MAX);
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 3), 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 7);

        let empty: Page<i32> = Page::new(vec![], PageRequest::new(5, 3), 7);
        assert!(empty.content.is_empty());
        assert_eq!(empty.total_pages, 3);
    }

    #[test]
    fn test_comment_sort_key_parse() {
        assert_eq!(CommentSortKey::parse("createdAt").unwrap(), CommentSortKey::CreatedAt);
        assert_eq!(CommentSortKey::parse("likeCount").unwrap(), CommentSortKey::LikeCount);

        let err = CommentSortKey::parse("bogus").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COMMENT_SORT_TYPE");
    }

    #[test]
    fn test_sort_key_parse_is_case_sensitive() {
        assert!(CommentSortKey::parse("CREATEDAT").is_err());
        assert!(ExhibitionSortKey::parse("Likecount").is_err());
        assert!(ReviewSortKey::parse("ID").is_err());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::parse("DESC").unwrap(), SortDirection::Desc);
        assert!(SortDirection::parse("sideways").is_err());
    }

    #[test]
    fn test_narrow_wildcard_absorbs() {
        let seoul_and_all = vec![Facet::Only(Area::Seoul), Facet::All];
        let just_all = vec![Facet::<Area>::All];
        assert_eq!(narrow(&seoul_and_all), narrow(&just_all));
        assert_eq!(narrow(&seoul_and_all), None);

        let concrete = vec![Facet::Only(Area::Seoul), Facet::Only(Area::Busan)];
        assert_eq!(narrow(&concrete), Some(vec![Area::Seoul, Area::Busan]));
    }

    #[test]
    fn test_month_window() {
        let (start, end) = Month::new(2).unwrap().window(2024);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (start, end) = Month::new(12).unwrap().window(2026);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
    }

    #[test]
    fn test_month_out_of_range() {
        assert!(Month::new(0).is_err());
        assert!(Month::new(13).is_err());
    }

    #[test]
    fn test_parse_facets() {
        assert_eq!(parse_area("ALL").unwrap(), Facet::All);
        assert_eq!(parse_area("SEOUL").unwrap(), Facet::Only(Area::Seoul));
        assert!(parse_area("atlantis").is_err());

        assert_eq!(parse_genre("painting").unwrap(), Facet::Only(Genre::Painting));
        assert_eq!(parse_month("3").unwrap(), Facet::Only(Month::new(3).unwrap()));
        assert!(parse_month("0").is_err());
    }

    #[test]
    fn test_empty_filter_excludes_only_deleted() {
        let filter = ExhibitionFilter {
            include_end: true,
            ..Default::default()
        };
        let sql = filter.to_condition_sql(today()).unwrap();
        assert_eq!(sql.clause, "e.is_deleted = FALSE");
        assert!(sql.values.is_empty());
    }

    #[test]
    fn test_filter_wildcard_identical_to_all() {
        let mixed = ExhibitionFilter {
            areas: vec![Facet::Only(Area::Seoul), Facet::All],
            include_end: true,
            ..Default::default()
        };
        let all = ExhibitionFilter {
            areas: vec![Facet::All],
            include_end: true,
            ..Default::default()
        };
        assert_eq!(
            mixed.to_condition_sql(today()).unwrap().clause,
            all.to_condition_sql(today()).unwrap().clause
        );
    }

    #[test]
    fn test_filter_composition() {
        let filter = ExhibitionFilter {
            areas: vec![Facet::Only(Area::Seoul), Facet::Only(Area::Busan)],
            months: vec![Facet::Only(Month::new(8).unwrap())],
            genres: vec![Facet::Only(Genre::Media)],
            include_end: false,
            query: Some("light".to_string()),
        };
        let sql = filter.to_condition_sql(today()).unwrap();

        assert!(sql.clause.starts_with("e.is_deleted = FALSE"));
        assert!(sql.clause.contains("e.area IN ($1, $2)"));
        assert!(sql.clause.contains("e.genre IN ($3)"));
        assert!(sql.clause.contains("(e.start_date <= $4 AND e.end_date >= $5)"));
        assert!(sql.clause.contains("e.end_date >= $6"));
        assert!(sql.clause.contains("e.name ILIKE $7"));
        assert_eq!(sql.values.len(), 7);
    }

    #[test]
    fn test_filter_query_too_short() {
        let filter = ExhibitionFilter {
            query: Some("a".to_string()),
            include_end: true,
            ..Default::default()
        };
        let err = filter.to_condition_sql(today()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SEARCH_QUERY");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_a"), "100\\%\\_a");
    }
}
