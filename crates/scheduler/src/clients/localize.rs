use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};

use lpa_core::domain::Language;
use lpa_core::ports::{Bundle, Localizer};

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const CY_MONTHS: [&str; 12] = [
    "Ionawr",
    "Chwefror",
    "Mawrth",
    "Ebrill",
    "Mai",
    "Mehefin",
    "Gorffennaf",
    "Awst",
    "Medi",
    "Hydref",
    "Tachwedd",
    "Rhagfyr",
];

/// Translations compiled into the binary.
#[derive(Debug, Clone)]
pub struct StaticBundle {
    en: Arc<StaticLocalizer>,
    cy: Arc<StaticLocalizer>,
}

impl StaticBundle {
    pub fn new() -> Self {
        Self {
            en: Arc::new(StaticLocalizer(Language::En)),
            cy: Arc::new(StaticLocalizer(Language::Cy)),
        }
    }
}

impl Default for StaticBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Bundle for StaticBundle {
    fn for_language(&self, language: Language) -> Arc<dyn Localizer> {
        match language {
            Language::En => self.en.clone(),
            Language::Cy => self.cy.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StaticLocalizer(Language);

impl Localizer for StaticLocalizer {
    fn t(&self, key: &str) -> String {
        let translated = match (self.0, key) {
            (Language::En, "property-and-affairs") => "property and affairs",
            (Language::En, "personal-welfare") => "personal welfare",
            (Language::En, "dear") => "Dear",
            (Language::En, "thisEmailIsAbout") => "This email is about",
            (Language::En, "lpaReference") => "LPA reference number",
            (Language::Cy, "property-and-affairs") => "eiddo a materion ariannol",
            (Language::Cy, "personal-welfare") => "iechyd a lles",
            (Language::Cy, "dear") => "Annwyl",
            (Language::Cy, "thisEmailIsAbout") => "Mae’r e-bost hwn yn ymwneud â",
            (Language::Cy, "lpaReference") => "cyfeirnod LPA",
            _ => key,
        };
        translated.to_string()
    }

    fn possessive(&self, name: &str) -> String {
        match self.0 {
            Language::En if name.ends_with('s') => format!("{name}’"),
            Language::En => format!("{name}’s"),
            Language::Cy => name.to_string(),
        }
    }

    fn format_date(&self, date: DateTime<Utc>) -> String {
        let months = match self.0 {
            Language::En => &EN_MONTHS,
            Language::Cy => &CY_MONTHS,
        };
        format!(
            "{} {} {}",
            date.day(),
            months[date.month0() as usize],
            date.year()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let bundle = StaticBundle::new();
        let date = Utc.with_ymd_and_hms(2020, 3, 7, 3, 4, 5).unwrap();

        assert_eq!(bundle.for_language(Language::En).format_date(date), "7 March 2020");
        assert_eq!(bundle.for_language(Language::Cy).format_date(date), "7 Mawrth 2020");
    }

    #[test]
    fn test_possessive() {
        let bundle = StaticBundle::new();
        let en = bundle.for_language(Language::En);
        let cy = bundle.for_language(Language::Cy);

        assert_eq!(en.possessive("a"), "a’s");
        assert_eq!(en.possessive("s"), "s’");
        assert_eq!(cy.possessive("a"), "a");
        assert_eq!(cy.possessive("s"), "s");
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let bundle = StaticBundle::new();
        assert_eq!(bundle.for_language(Language::En).t("nope"), "nope");
        assert_eq!(
            bundle.for_language(Language::Cy).t("personal-welfare"),
            "iechyd a lles"
        );
    }
}
