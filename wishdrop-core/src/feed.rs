//! Personalized discovery feed: catalog items filtered by profile preferences.

use serde::{Deserialize, Serialize};

use crate::domain::{PricePreference, Product, Profile};

/// Minimum list price for "Luxury Only" profiles.
pub const LUXURY_MIN_MSRP: f64 = 200.0;

/// Maximum sale price for "Budget" profiles.
pub const BUDGET_MAX_PRICE: f64 = 80.0;

/// Ad-hoc filters layered on top of the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedFilter {
    pub min_discount_pct: u32,
    /// Case-insensitive substring over name, brand and category.
    pub query: Option<String>,
}

impl Default for FeedFilter {
    fn default() -> Self {
        Self {
            min_discount_pct: 10,
            query: None,
        }
    }
}

fn allowed(list: &[String], value: &str) -> bool {
    list.is_empty() || list.iter().any(|v| v == value)
}

/// Does one product pass the profile and filter?
pub fn matches(product: &Product, profile: &Profile, filter: &FeedFilter) -> bool {
    if !allowed(&profile.brands, &product.brand)
        || !allowed(&profile.stores, &product.store)
        || !allowed(&profile.categories, &product.category)
    {
        return false;
    }

    let price_ok = match profile.price_pref {
        PricePreference::LuxuryOnly => product.msrp >= LUXURY_MIN_MSRP,
        PricePreference::Budget => product.price <= BUDGET_MAX_PRICE,
        PricePreference::MidRange => true,
    };
    if !price_ok || product.discount_pct < filter.min_discount_pct {
        return false;
    }

    match filter.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => product.matches_query(q),
        _ => true,
    }
}

/// Products for this profile, in catalog order.
pub fn personalized_feed<'a>(
    products: &'a [Product],
    profile: &Profile,
    filter: &FeedFilter,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| matches(p, profile, filter))
        .collect()
}
