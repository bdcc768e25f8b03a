//! Pure field clean-up applied to scraped text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, ScraperError};

static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Z]\d[A-Z]\s?\d[A-Z]\d").expect("postal code pattern is valid")
});

/// Street portion and postal code of a one-line address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

/// Split "street, city, province postal" on commas. The first segment is the
/// street address; the postal code is searched for in the last segment only,
/// and only when there is more than one segment.
pub fn parse_address(full_address: &str) -> AddressParts {
    let parts: Vec<&str> = full_address.split(',').map(str::trim).collect();

    let address = parts
        .first()
        .filter(|street| !street.is_empty())
        .map(|street| street.to_string());

    let postal_code = match parts.as_slice() {
        [_, .., last] => extract_postal_code(last),
        _ => None,
    };

    AddressParts { address, postal_code }
}

/// First Canadian postal code (`A1A 1A1`, space optional) in `text`, as written.
pub fn extract_postal_code(text: &str) -> Option<String> {
    POSTAL_CODE.find(text).map(|m| m.as_str().to_string())
}

/// Keep only the digits of a phone number, in order.
pub fn clean_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Split a pipe-delimited feature line into trimmed, non-empty tags.
pub fn split_features(text: &str) -> Vec<String> {
    text.split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Allow-list of feature tags kept in `brewery_type`. Loaded once and shared
/// by every card of a run.
#[derive(Debug, Clone, Default)]
pub struct FeatureFilter {
    allowed: HashSet<String>,
}

impl FeatureFilter {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the allow-list side file. Accepts a JSON array of tags, an object
    /// with a `features` array, or an object whose keys are the tags.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let allow_list_err = |reason: String| ScraperError::AllowList {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| allow_list_err(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| allow_list_err(e.to_string()))?;

        let tags: Vec<String> = match value {
            serde_json::Value::Array(items) => strings_of(&items),
            serde_json::Value::Object(map) => match map.get("features") {
                Some(serde_json::Value::Array(items)) => strings_of(items),
                _ => map.keys().cloned().collect(),
            },
            other => return Err(allow_list_err(format!("expected an array or object, found {other}"))),
        };

        debug!("Loaded {} allowed features from {}", tags.len(), path.display());
        Ok(Self::new(tags))
    }

    /// Like `load`, but an unreadable allow-list becomes an empty one so that
    /// every card ends up with no tags rather than aborting the run.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("Error loading features list: {}", e);
            Self::default()
        })
    }

    /// Tags of `features` present in the allow-list, in card order.
    pub fn filter(&self, features: &[String]) -> Vec<String> {
        features
            .iter()
            .filter(|tag| self.allowed.contains(tag.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

fn strings_of(items: &[serde_json::Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn splits_street_and_postal_code() {
        let parts = parse_address("123 Main St, Vancouver, BC V5K 0A1");
        assert_eq!(parts.address.as_deref(), Some("123 Main St"));
        assert_eq!(parts.postal_code.as_deref(), Some("V5K 0A1"));
    }

    #[test]
    fn postal_code_is_case_insensitive_and_space_optional() {
        assert_eq!(
            parse_address("1 Brew Way, Victoria, BC   v8w1a1 ").postal_code.as_deref(),
            Some("v8w1a1")
        );
        assert_eq!(extract_postal_code("BC\tK1A 0B1\n").as_deref(), Some("K1A 0B1"));
    }

    #[test]
    fn postal_code_only_searched_in_last_segment() {
        let parts = parse_address("V5K 0A1 Industrial Rd, Vancouver");
        assert_eq!(parts.address.as_deref(), Some("V5K 0A1 Industrial Rd"));
        assert_eq!(parts.postal_code, None);

        assert_eq!(parse_address("Unit 4 V5K 0A1").postal_code, None);
    }

    #[test]
    fn address_without_postal_code() {
        let parts = parse_address("  4 Hop Lane , Nelson, BC");
        assert_eq!(parts.address.as_deref(), Some("4 Hop Lane"));
        assert_eq!(parts.postal_code, None);
        assert_eq!(parse_address("   ").address, None);
    }

    #[test]
    fn phone_keeps_digits_in_order() {
        assert_eq!(clean_phone_number("(604) 555-1234"), "6045551234");
        assert_eq!(clean_phone_number("+1 250.555.0199 ext 2"), "125055501992");
        assert_eq!(clean_phone_number("call us"), "");

        let input = "(778) 5x5-12 34";
        let cleaned = clean_phone_number(input);
        assert!(cleaned.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(cleaned.len(), input.chars().filter(char::is_ascii_digit).count());
    }

    #[test]
    fn splits_pipe_delimited_features() {
        assert_eq!(
            split_features(" Brewery |Taproom|  | Bad Tag "),
            tags(&["Brewery", "Taproom", "Bad Tag"])
        );
    }

    #[test]
    fn filter_drops_unknown_tags() {
        let filter = FeatureFilter::new(["Brewery", "Taproom"]);
        assert_eq!(
            filter.filter(&tags(&["Brewery", "Taproom", "Bad Tag"])),
            tags(&["Brewery", "Taproom"])
        );
        assert_eq!(
            filter.filter(&tags(&["Food", "Taproom", "Brewery"])),
            tags(&["Taproom", "Brewery"])
        );
        assert!(filter.filter(&tags(&["Food"])).is_empty());
    }

    #[test]
    fn loads_array_and_object_allow_lists() {
        let mut array = tempfile::NamedTempFile::new().unwrap();
        write!(array, r#"["Brewery", "Taproom", 3]"#).unwrap();
        assert_eq!(FeatureFilter::load(array.path()).unwrap().len(), 2);

        let mut wrapped = tempfile::NamedTempFile::new().unwrap();
        write!(wrapped, r#"{{"features": ["Brewery"]}}"#).unwrap();
        let filter = FeatureFilter::load(wrapped.path()).unwrap();
        assert_eq!(filter.filter(&tags(&["Brewery", "Taproom"])), tags(&["Brewery"]));

        let mut keyed = tempfile::NamedTempFile::new().unwrap();
        write!(keyed, r#"{{"Brewery": true, "Distillery": true}}"#).unwrap();
        assert_eq!(FeatureFilter::load(keyed.path()).unwrap().len(), 2);
    }

    #[test]
    fn unreadable_allow_list_filters_everything() {
        let filter = FeatureFilter::load_or_empty("no/such/features_to_keep.json");
        assert!(filter.is_empty());
        assert!(filter.filter(&tags(&["Brewery"])).is_empty());

        assert!(matches!(
            FeatureFilter::load("no/such/features_to_keep.json"),
            Err(ScraperError::AllowList { .. })
        ));
    }
}
