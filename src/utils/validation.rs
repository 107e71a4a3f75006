use validator::Validate;
use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

/// Parses a non-negative whole number typed into a form field.
pub fn parse_count(field: &str, raw: Option<&str>) -> Result<i32, String> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{} is required", field))?;
    let value: i32 = raw.parse()
        .map_err(|_| format!("Enter a numeric value for {}: \"{}\"", field, raw))?;
    if value < 0 {
        return Err(format!("{} cannot be negative", field));
    }
    Ok(value)
}

/// Parses a non-negative, finite decimal typed into a form field.
pub fn parse_measure(field: &str, raw: Option<&str>) -> Result<f64, String> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())
        .ok_or_else(|| format!("{} is required", field))?;
    let value: f64 = raw.parse()
        .map_err(|_| format!("Enter a numeric value for {}: \"{}\"", field, raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{} must be a non-negative number", field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_reject_text_and_negatives() {
        assert_eq!(parse_count("Duration", Some(" 30 ")), Ok(30));
        assert!(parse_count("Duration", Some("thirty")).unwrap_err().contains("numeric"));
        assert!(parse_count("Duration", Some("-5")).unwrap_err().contains("negative"));
        assert!(parse_count("Duration", None).unwrap_err().contains("required"));
        assert!(parse_count("Duration", Some("  ")).unwrap_err().contains("required"));
    }

    #[test]
    fn measures_reject_text_negatives_and_nan() {
        assert_eq!(parse_measure("Distance", Some("5.5")), Ok(5.5));
        assert_eq!(parse_measure("Distance", Some("0")), Ok(0.0));
        assert!(parse_measure("Distance", Some("far")).is_err());
        assert!(parse_measure("Distance", Some("-1.0")).is_err());
        assert!(parse_measure("Distance", Some("NaN")).is_err());
        assert!(parse_measure("Distance", Some("inf")).is_err());
    }
}
