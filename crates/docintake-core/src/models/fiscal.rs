//! Fiscal year / period helpers for intake form values.

use crate::error::AppError;

pub const DEFAULT_FISCAL_PERIOD: &str = "annual";
const MIN_FISCAL_YEAR: i32 = 1900;
const MAX_FISCAL_PERIOD_LEN: usize = 32;

/// Resolve the `fiscalYear` form value.
///
/// Missing or blank means the previous calendar year. Anything else must be a
/// four-digit year between 1900 and next year.
pub fn resolve_fiscal_year(raw: Option<&str>, current_year: i32) -> Result<i32, AppError> {
    let raw = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw,
        None => return Ok(current_year - 1),
    };

    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput(format!(
            "fiscalYear must be a four-digit year, got '{}'",
            raw
        )));
    }

    let year: i32 = raw
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid fiscalYear '{}'", raw)))?;

    if !(MIN_FISCAL_YEAR..=current_year + 1).contains(&year) {
        return Err(AppError::InvalidInput(format!(
            "fiscalYear {} is out of range ({}-{})",
            year,
            MIN_FISCAL_YEAR,
            current_year + 1
        )));
    }

    Ok(year)
}

/// Resolve the `fiscalPeriod` form value (free-form tag, e.g. `annual`, `q2`, `h1`).
pub fn resolve_fiscal_period(raw: Option<&str>) -> Result<String, AppError> {
    let period = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(p) => p.to_lowercase(),
        None => return Ok(DEFAULT_FISCAL_PERIOD.to_string()),
    };

    if period.len() > MAX_FISCAL_PERIOD_LEN
        || !period
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::InvalidInput(format!(
            "Invalid fiscalPeriod '{}'",
            period
        )));
    }

    Ok(period)
}
