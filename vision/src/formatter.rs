use colored::*;
use vision_core::{Annotations, ImageError};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// The outcome of one image of a batch, labelled with its position.
pub struct BatchEntry(pub usize, pub Result<Annotations, ImageError>);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<Annotations> for FormattedString {
    fn from(annotations: Annotations) -> Self {
        match serde_json::to_value(&annotations) {
            Ok(value) => FormattedString::from(value),
            Err(err) => FormattedString::from(anyhow::Error::from(err)),
        }
    }
}

impl From<ImageError> for FormattedString {
    fn from(err: ImageError) -> Self {
        FormattedString(format!(
            "{} code={} message={:?}",
            "Image Failed:".red().bold(),
            err.code,
            err.message
        ))
    }
}

impl From<BatchEntry> for FormattedString {
    fn from(BatchEntry(index, result): BatchEntry) -> Self {
        let header = format!("#{index}").cyan().bold();
        let body = match result {
            Ok(annotations) => FormattedString::from(annotations),
            Err(err) => FormattedString::from(err),
        };
        FormattedString(format!("{header}{body}").trim_end().to_string())
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Error:".red().bold(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_annotations_render_as_empty_collections() {
        colored::control::set_override(false);
        let FormattedString(out) = FormattedString::from(Annotations::default());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["labels"], serde_json::json!([]));
        assert!(value.get("safeSearch").is_none());
    }

    #[test]
    fn batch_entries_are_numbered() {
        colored::control::set_override(false);
        let FormattedString(out) = FormattedString::from(BatchEntry(
            2,
            Err(ImageError {
                code: 3,
                message: "Bad image data.".to_string(),
            }),
        ));
        assert!(out.starts_with("#2"));
        assert!(out.contains("code=3"));
    }
}
