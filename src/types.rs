use crate::constants::{COUNTRY, NOT_AVAILABLE, STATE_PROVINCE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Summary fields taken from one card of the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub city: Option<String>,
    pub brewery_type: Vec<String>,
    pub url: Option<String>,
}

/// Fields taken from a brewery's detail page. `Default` is the all-absent
/// value used when the page cannot be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailInfo {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub website_url: Option<String>,
    pub social_media: Vec<String>,
}

/// Outcome of the menu lookup. A record that was never looked up has no
/// `MenuUrl` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuUrl {
    NotFound,
    Found(String),
}

impl MenuUrl {
    pub fn as_str(&self) -> &str {
        match self {
            MenuUrl::NotFound => NOT_AVAILABLE,
            MenuUrl::Found(url) => url,
        }
    }
}

impl From<Option<String>> for MenuUrl {
    fn from(value: Option<String>) -> Self {
        value.map_or(MenuUrl::NotFound, MenuUrl::Found)
    }
}

impl Serialize for MenuUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MenuUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == NOT_AVAILABLE {
            MenuUrl::NotFound
        } else {
            MenuUrl::Found(raw)
        })
    }
}

/// One brewery as persisted to JSON and CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreweryRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "sentinel")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "sentinel_list::deserialize")]
    pub brewery_type: Vec<String>,
    #[serde(default, with = "sentinel")]
    pub url: Option<String>,
    #[serde(default, with = "sentinel")]
    pub address: Option<String>,
    #[serde(default, with = "sentinel")]
    pub postal_code: Option<String>,
    #[serde(default = "default_state_province")]
    pub state_province: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default, with = "sentinel")]
    pub phone: Option<String>,
    #[serde(default, with = "sentinel")]
    pub website_url: Option<String>,
    #[serde(default, with = "sentinel_list")]
    pub social_media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_url: Option<MenuUrl>,
}

fn default_state_province() -> String {
    STATE_PROVINCE.to_string()
}

fn default_country() -> String {
    COUNTRY.to_string()
}

impl BreweryRecord {
    /// Combine a listing card with its detail page.
    pub fn from_parts(listing: ListingEntry, detail: DetailInfo) -> Self {
        Self {
            name: listing.name,
            city: listing.city,
            brewery_type: listing.brewery_type,
            url: listing.url,
            address: detail.address,
            postal_code: detail.postal_code,
            state_province: default_state_province(),
            country: default_country(),
            phone: detail.phone,
            website_url: detail.website_url,
            social_media: detail.social_media,
            menu_url: None,
        }
    }

    /// Copy of this record with the menu field attached. Existing fields are untouched.
    pub fn with_menu_url(&self, menu_url: MenuUrl) -> Self {
        Self {
            menu_url: Some(menu_url),
            ..self.clone()
        }
    }

    pub fn has_menu_url(&self) -> bool {
        self.menu_url.is_some()
    }
}

/// `Option<String>` fields written as "N/A" when absent. Reading maps "N/A"
/// and `null` back to `None`.
pub mod sentinel {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(value.filter(|v| v != NOT_AVAILABLE))
    }
}

/// Link lists written as "N/A" when empty. Reading accepts a list, the
/// sentinel string, or `null`.
pub mod sentinel_list {
    use super::NOT_AVAILABLE;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrText {
        List(Vec<String>),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_empty() {
            serializer.serialize_str(NOT_AVAILABLE)
        } else {
            serializer.collect_seq(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Option::<ListOrText>::deserialize(deserializer)? {
            Some(ListOrText::List(items)) => items,
            Some(ListOrText::Text(text)) if text != NOT_AVAILABLE && !text.is_empty() => vec![text],
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> BreweryRecord {
        BreweryRecord::from_parts(
            ListingEntry {
                name: "Example Brewery".into(),
                city: Some("Vancouver".into()),
                brewery_type: vec!["Brewery".into()],
                url: None,
            },
            DetailInfo::default(),
        )
    }

    #[test]
    fn absent_fields_serialize_as_sentinel() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["url"], "N/A");
        assert_eq!(value["phone"], "N/A");
        assert_eq!(value["social_media"], "N/A");
        assert_eq!(value["state_province"], "BC");
        assert_eq!(value["country"], "Canada");
        assert_eq!(value["brewery_type"], json!(["Brewery"]));
        assert!(value.get("menu_url").is_none());
    }

    #[test]
    fn sentinel_reads_back_as_absent() {
        let record: BreweryRecord = serde_json::from_value(json!({
            "name": "Old Record",
            "city": "N/A",
            "brewery_type": [],
            "url": "https://bcaletrail.ca/breweries/old/",
            "social_media": "N/A",
            "phone": null,
            "menu_url": "N/A"
        }))
        .unwrap();

        assert_eq!(record.city, None);
        assert_eq!(record.phone, None);
        assert!(record.social_media.is_empty());
        assert_eq!(record.state_province, "BC");
        assert_eq!(record.menu_url, Some(MenuUrl::NotFound));
    }

    #[test]
    fn with_menu_url_only_adds_the_field() {
        let base = sample();
        let enriched = base.with_menu_url(MenuUrl::Found("https://example.com/beers".into()));
        assert_eq!(enriched.menu_url.as_ref().map(MenuUrl::as_str), Some("https://example.com/beers"));
        assert_eq!(BreweryRecord { menu_url: None, ..enriched }, base);
    }
}
