use serde::Serialize;

use crate::error::AppError;

/// Rows per listing page.
pub const BENCHMARKS_PER_PAGE: u64 = 10;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 10)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 5)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Normalize a 1-based page number; absent or zero means the first page.
pub fn page_number(page: Option<u64>) -> u64 {
    Ord::max(page.unwrap_or(1), 1)
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Trim and validate a benchmark title (1-100 characters).
pub fn validate_title(title: &str) -> Result<String, AppError> {
    validate_text(title, MAX_TITLE_CHARS, "Title")
}

/// Trim and validate a benchmark description (1-500 characters).
pub fn validate_description(description: &str) -> Result<String, AppError> {
    validate_text(description, MAX_DESCRIPTION_CHARS, "Description")
}

fn validate_text(value: &str, max: usize, name: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{name} must be 1-{max} characters"
        )));
    }
    Ok(value.to_string())
}
