//! Helpers for pulling typed fields out of a [`Record`].

use crate::error::FieldError;
use crate::value::Record;

/// Text of an optional scalar field. Null counts as absent.
pub(crate) fn optional_text(
    record: &Record,
    key: &'static str,
) -> Result<Option<String>, FieldError> {
    match record.get(key) {
        None => Ok(None),
        Some(value) => {
            let scalar = value.as_scalar().ok_or(FieldError::NotScalar(key))?;
            Ok(scalar.to_text().map(|text| text.into_owned()))
        }
    }
}

/// Text of a required scalar field.
pub(crate) fn required_text(record: &Record, key: &'static str) -> Result<String, FieldError> {
    optional_text(record, key)?.ok_or(FieldError::Missing(key))
}
