//! Human-readable error messages
//!
//! The engine only needs something that can turn an error type and its
//! options into text. [`DefaultMessages`] ships the English table; callers
//! plug in their own [`MessageCatalog`] for other locales.

use crate::validation::error::{ErrorKind, ErrorOptions};
use serde_json::Value;

/// Formats `(type, options)` pairs into messages
pub trait MessageCatalog: Send + Sync {
    fn format(&self, kind: ErrorKind, options: &ErrorOptions, locale: &str) -> String;
}

/// Built-in English messages
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl DefaultMessages {
    pub const LOCALE: &'static str = "en";

    pub fn template(kind: ErrorKind) -> &'static str {
        match kind {
            ErrorKind::Blank => "can't be blank",
            ErrorKind::Invalid => "is invalid",
            ErrorKind::Inclusion => "is not included in the list",
            ErrorKind::TooShort => "is too short (minimum is %{count} characters)",
            ErrorKind::TooLong => "is too long (maximum is %{count} characters)",
            ErrorKind::GreaterThan => "must be greater than %{count}",
            ErrorKind::GreaterThanOrEqualTo => "must be greater than or equal to %{count}",
            ErrorKind::LessThan => "must be less than %{count}",
            ErrorKind::LessThanOrEqualTo => "must be less than or equal to %{count}",
        }
    }
}

impl MessageCatalog for DefaultMessages {
    fn format(&self, kind: ErrorKind, options: &ErrorOptions, locale: &str) -> String {
        if locale != Self::LOCALE {
            tracing::trace!(locale, "no bundled messages for locale, using English");
        }
        interpolate(Self::template(kind), options)
    }
}

/// Replace every `%{key}` in `template` with the matching option
pub fn interpolate(template: &str, options: &ErrorOptions) -> String {
    let mut message = template.to_string();
    for (key, value) in options {
        let placeholder = format!("%{{{}}}", key);
        if message.contains(&placeholder) {
            let text = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            message = message.replace(&placeholder, &text);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interpolates_count() {
        let mut options = ErrorOptions::new();
        options.insert("count".to_string(), json!(10));
        assert_eq!(
            DefaultMessages.format(ErrorKind::LessThan, &options, "en"),
            "must be less than 10"
        );
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        assert_eq!(
            DefaultMessages.format(ErrorKind::Blank, &ErrorOptions::new(), "fr"),
            "can't be blank"
        );
    }

    #[test]
    fn test_custom_catalog() {
        struct Shouting;
        impl MessageCatalog for Shouting {
            fn format(&self, kind: ErrorKind, options: &ErrorOptions, _locale: &str) -> String {
                interpolate(DefaultMessages::template(kind), options).to_uppercase()
            }
        }
        assert_eq!(Shouting.format(ErrorKind::Invalid, &ErrorOptions::new(), "en"), "IS INVALID");
    }
}
