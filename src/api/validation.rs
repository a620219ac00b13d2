use chrono::NaiveDate;

use super::ApiError;

const INSTALLED_AT_FORMAT: &str = "%Y-%m-%d";

/// Path ids must be positive integers.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::validation("invalid_id")),
    }
}

pub fn require_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("name_required"));
    }
    Ok(trimmed)
}

/// Foreign keys supplied in a body; zero or negative counts as missing.
pub fn require_reference(id: i32, code: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(code));
    }
    Ok(id)
}

/// Blank optional text is stored as NULL.
#[must_use]
pub fn null_if_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `YYYY-MM-DD` or blank; the normalized date is returned.
pub fn parse_installed_at(value: Option<&str>) -> Result<Option<String>, ApiError> {
    let Some(value) = null_if_empty(value) else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(value, INSTALLED_AT_FORMAT)
        .map(|date| Some(date.format(INSTALLED_AT_FORMAT).to_string()))
        .map_err(|_| ApiError::validation("invalid_installed_at"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("42").unwrap(), 42);

        for raw in ["0", "-3", "abc", "", "1.5", "99999999999"] {
            assert_eq!(parse_id(raw).unwrap_err().code(), "invalid_id");
        }
    }

    #[test]
    fn test_require_name() {
        assert_eq!(require_name("  Cisco ").unwrap(), "Cisco");
        assert_eq!(require_name("   ").unwrap_err().code(), "name_required");
    }

    #[test]
    fn test_require_reference() {
        assert_eq!(require_reference(3, "vendor_required").unwrap(), 3);
        assert_eq!(
            require_reference(0, "vendor_required").unwrap_err().code(),
            "vendor_required"
        );
    }

    #[test]
    fn test_null_if_empty() {
        assert_eq!(null_if_empty(Some(" US ")), Some("US"));
        assert_eq!(null_if_empty(Some("   ")), None);
        assert_eq!(null_if_empty(None), None);
    }

    #[test]
    fn test_parse_installed_at() {
        assert_eq!(parse_installed_at(None).unwrap(), None);
        assert_eq!(parse_installed_at(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_installed_at(Some(" 2024-02-29 ")).unwrap().as_deref(),
            Some("2024-02-29")
        );

        for bad in ["2023-02-29", "29.02.2024", "2024-13-01", "yesterday"] {
            assert_eq!(
                parse_installed_at(Some(bad)).unwrap_err().code(),
                "invalid_installed_at"
            );
        }
    }
}
