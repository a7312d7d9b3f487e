//! Shopper profile: sizes, style and brand/store/category preferences.

use serde::{Deserialize, Serialize};

/// Price level the shopper wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PricePreference {
    #[serde(rename = "Budget")]
    Budget,
    #[default]
    #[serde(rename = "Mid-range")]
    MidRange,
    #[serde(rename = "Luxury Only")]
    LuxuryOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sizes {
    #[serde(default)]
    pub top: String,
    #[serde(default)]
    pub bottom: String,
    #[serde(default)]
    pub shoe: String,
}

/// A saved shopping profile, keyed by name in the profile store.
///
/// Empty `brands` / `stores` / `categories` lists mean "no preference" and do
/// not filter the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_height_in")]
    pub height_in: u32,
    #[serde(default = "default_weight_lb")]
    pub weight_lb: u32,
    #[serde(default)]
    pub sizes: Sizes,
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub price_pref: PricePreference,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

fn default_height_in() -> u32 {
    64
}

fn default_weight_lb() -> u32 {
    140
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            height_in: default_height_in(),
            weight_lb: default_weight_lb(),
            sizes: Sizes::default(),
            style: Vec::new(),
            price_pref: PricePreference::default(),
            brands: Vec::new(),
            stores: Vec::new(),
            categories: Vec::new(),
            notes: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_preference_uses_display_labels() {
        let json = serde_json::to_string(&PricePreference::LuxuryOnly).unwrap();
        assert_eq!(json, "\"Luxury Only\"");
        let pref: PricePreference = serde_json::from_str("\"Mid-range\"").unwrap();
        assert_eq!(pref, PricePreference::MidRange);
    }

    #[test]
    fn sparse_record_fills_defaults() {
        let p: Profile = serde_json::from_str(r#"{"brands": ["Gucci"]}"#).unwrap();
        assert_eq!(p.brands, vec!["Gucci".to_string()]);
        assert_eq!(p.height_in, 64);
        assert_eq!(p.price_pref, PricePreference::MidRange);
        assert!(p.stores.is_empty());
    }
}
