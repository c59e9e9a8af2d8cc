use crate::utils::error::{NotifierError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NotifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(NotifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("id", "Airport").is_ok());
        assert!(validate_non_empty_string("id", "").is_err());
        assert!(validate_non_empty_string("id", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("hour", 9u32, 0, 23).is_ok());
        assert!(validate_range("hour", 24u32, 0, 23).is_err());
        assert!(validate_range("minute", 59u32, 0, 59).is_ok());
        assert!(validate_range("minute", 60u32, 0, 59).is_err());
    }
}
