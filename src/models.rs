use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Name block of a country record as returned by the lookup service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: Option<String>,
}

/// Country record from the lookup service (only the requested fields)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub flag: String,
}

/// A selectable suggestion: slug value, display label and flag glyph
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOption {
    pub value: String,
    pub label: String,
    pub flag: String,
}

impl CountryOption {
    pub fn new(label: &str, flag: &str) -> Self {
        CountryOption {
            value: slugify(label),
            label: label.to_string(),
            flag: flag.to_string(),
        }
    }

    /// "🇩🇪 Germany"
    pub fn display(&self) -> String {
        if self.flag.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.flag, self.label)
        }
    }
}

impl From<Country> for CountryOption {
    fn from(country: Country) -> Self {
        CountryOption {
            value: slugify(&country.name.common),
            label: country.name.common,
            flag: country.flag,
        }
    }
}

/// Lowercase and collapse whitespace runs into '-': "United States" -> "united-states"
pub fn slugify(name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    re.replace_all(&name.to_lowercase(), "-").into_owned()
}

/// An entry of the "added countries" list
#[derive(Clone, Debug)]
pub struct AddedCountry {
    pub option: CountryOption,
    pub added_at: DateTime<Utc>,
}

impl AddedCountry {
    pub fn new(option: CountryOption) -> Self {
        AddedCountry {
            option,
            added_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Germany"), "germany");
        assert_eq!(slugify("United States"), "united-states");
        assert_eq!(slugify("Bosnia  and\tHerzegovina"), "bosnia-and-herzegovina");
    }

    #[test]
    fn test_option_from_country_record() {
        let json = r#"{"name":{"common":"South Korea","official":"Republic of Korea","nativeName":{}},"flag":"🇰🇷"}"#;
        let country: Country = serde_json::from_str(json).unwrap();
        let option = CountryOption::from(country);

        assert_eq!(option.value, "south-korea");
        assert_eq!(option.label, "South Korea");
        assert_eq!(option.display(), "🇰🇷 South Korea");
    }

    #[test]
    fn test_display_without_flag() {
        let option = CountryOption::new("Atlantis", "");
        assert_eq!(option.display(), "Atlantis");
    }
}
