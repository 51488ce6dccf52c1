use crate::core::loader::{league_code, COUNTRY_LEAGUE_CODES};
use crate::core::SeasonId;
use crate::utils::error::{EtlError, Result};

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(EtlError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
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
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_countries(field_name: &str, countries: &[String]) -> Result<()> {
    validate_non_empty_list(field_name, countries)?;

    for country in countries {
        if league_code(country).is_none() {
            let supported: Vec<&str> = COUNTRY_LEAGUE_CODES.iter().map(|(name, _)| *name).collect();
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: country.clone(),
                reason: format!("Unsupported country. Supported: {}", supported.join(", ")),
            });
        }
    }
    Ok(())
}

pub fn validate_seasons(field_name: &str, seasons: &[String]) -> Result<()> {
    validate_non_empty_list(field_name, seasons)?;

    for season in seasons {
        season
            .parse::<SeasonId>()
            .map_err(|e| EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: season.clone(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    validate_non_empty_list(field_name, formats)?;

    for format in formats {
        if !OUTPUT_FORMATS.contains(&format.to_ascii_lowercase().as_str()) {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    OUTPUT_FORMATS.join(", ")
                ),
            });
        }
    }
    Ok(())
}
