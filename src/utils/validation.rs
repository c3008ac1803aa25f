use crate::utils::error::{EticError, Result};
use chrono::NaiveDate;
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EticError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(EticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Compiles a pattern whose first capture group holds the month text.
pub fn validate_month_regex(field_name: &str, pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|e| EticError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: pattern.to_string(),
        reason: format!("Invalid regular expression: {}", e),
    })?;

    if regex.captures_len() < 2 {
        return Err(EticError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: pattern.to_string(),
            reason: "Pattern must capture the month in group 1".to_string(),
        });
    }
    Ok(regex)
}

/// Parses `YYYY-M-D`; components need not be zero-padded.
pub fn parse_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    let invalid = |reason: &str| EticError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(invalid("Expected a date of the form YYYY-M-D"));
    }

    let year: i32 = parts[0]
        .parse()
        .map_err(|_| invalid("Year is not a number"))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| invalid("Month is not a number"))?;
    let day: u32 = parts[2].parse().map_err(|_| invalid("Day is not a number"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("Date is out of range"))
}
