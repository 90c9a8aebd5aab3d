use super::error::ValidationError;

/// Trimmed, non-empty value or `MissingField`.
pub(crate) fn required(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ValidationError::MissingField(field))
            } else {
                Ok(trimmed.to_string())
            }
        }
        None => Err(ValidationError::MissingField(field)),
    }
}

/// A required field that may be omitted from a patch but not blanked by it.
pub(crate) fn present(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    value.map(|value| required(Some(value), field)).transpose()
}

/// Blank optional values collapse to `None`; anything else passes through untouched.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(
            required(Some("  Gym ".into()), "location"),
            Ok("Gym".into())
        );
        assert_eq!(
            required(Some("   ".into()), "location"),
            Err(ValidationError::MissingField("location"))
        );
        assert_eq!(
            required(None, "who"),
            Err(ValidationError::MissingField("who"))
        );
    }

    #[test]
    fn optional_drops_empty_strings() {
        assert_eq!(optional(Some(String::new())), None);
        assert_eq!(optional(Some(" ".into())), None);
        assert_eq!(optional(Some("SAVE10".into())), Some("SAVE10".into()));
        assert_eq!(optional(None), None);
    }
}
