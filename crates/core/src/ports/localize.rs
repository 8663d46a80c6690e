use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::Language;

/// Translations for one language.
pub trait Localizer: Send + Sync {
    /// Translates a message key.
    fn t(&self, key: &str) -> String;

    /// The possessive form of a name.
    fn possessive(&self, name: &str) -> String;

    fn format_date(&self, date: DateTime<Utc>) -> String;
}

/// All available translations.
pub trait Bundle: Send + Sync {
    fn for_language(&self, language: Language) -> Arc<dyn Localizer>;
}
