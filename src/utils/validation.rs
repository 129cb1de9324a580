use crate::utils::error::{ModrunError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ModrunError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModrunError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Required, non-empty string field.
pub fn validate_required_string<'a>(field_name: &str, value: &'a Option<String>) -> Result<&'a str> {
    let value = validate_required_field(field_name, value)?;
    validate_non_empty_string(field_name, value)?;
    Ok(value.as_str())
}

pub fn validate_directory(field_name: &str, path: &str) -> Result<()> {
    if path.contains('\0') {
        return Err(ModrunError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    if !Path::new(path).is_dir() {
        return Err(ModrunError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Not a directory or does not exist".to_string(),
        });
    }
    Ok(())
}

pub fn validate_existing_file(field_name: &str, path: &str) -> Result<()> {
    if !Path::new(path).exists() {
        return Err(ModrunError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Program doesn't exist".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(ModrunError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "[]".to_string(),
            reason: "List cannot be empty".to_string(),
        });
    }
    Ok(())
}

pub fn validate_port(field_name: &str, value: u32) -> Result<u16> {
    match u16::try_from(value) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ModrunError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Port must be between 1 and 65535".to_string(),
        }),
    }
}
