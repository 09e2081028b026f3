//! Input normalisation for the settings editor.

use mediabridge_api_models::{DEFAULT_LIBRARY_TYPE, LibraryItem};

use crate::features::settings::editor::EditError;
use crate::features::settings::state::LibraryForm;

/// Video formats are compared trimmed and lower-cased.
pub(crate) fn normalize_format(input: &str) -> Result<String, EditError> {
    let format = input.trim().to_lowercase();
    if format.is_empty() {
        return Err(EditError::Blank { field: "format" });
    }
    Ok(format)
}

/// Keywords are compared trimmed, case preserved.
pub(crate) fn normalize_keyword(input: &str) -> Result<String, EditError> {
    let keyword = input.trim();
    if keyword.is_empty() {
        return Err(EditError::Blank { field: "keyword" });
    }
    Ok(keyword.to_string())
}

pub(crate) fn parse_u32(field: &'static str, value: &str) -> Result<u32, EditError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| EditError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

pub(crate) fn parse_u64(field: &'static str, value: &str) -> Result<u64, EditError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| EditError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Validate a library form: name and both paths required, type defaults to
/// `system`, blank size means 0.
pub(crate) fn library_from_form(form: &LibraryForm) -> Result<LibraryItem, EditError> {
    let required = |field: &'static str, value: &str| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(EditError::Blank { field })
        } else {
            Ok(trimmed.to_string())
        }
    };
    let name = required("name", &form.name)?;
    let download_path = required("download_path", &form.download_path)?;
    let target_path = required("target_path", &form.target_path)?;
    let kind = match form.kind.trim() {
        "" => DEFAULT_LIBRARY_TYPE.to_string(),
        kind => kind.to_string(),
    };
    let min_transfer_size = if form.min_transfer_size.trim().is_empty() {
        0
    } else {
        parse_u64("min_transfer_size", &form.min_transfer_size)?
    };
    Ok(LibraryItem {
        name,
        download_path,
        target_path,
        kind,
        min_transfer_size,
    })
}
