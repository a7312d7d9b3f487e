//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// A single catalog item on sale at some store.
///
/// `price` is the current sale price; `msrp` the list price it is discounted
/// from. Both are in the same (single) currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub store: String,
    pub msrp: f64,
    pub price: f64,
    pub discount_pct: u32,
    pub image_url: String,
    pub product_url: String,
}

impl Product {
    /// Basic sanity: positive prices and a sale price not above list price.
    pub fn is_sane(&self) -> bool {
        !self.id.is_empty()
            && self.price.is_finite()
            && self.msrp.is_finite()
            && self.price > 0.0
            && self.msrp > 0.0
            && self.price <= self.msrp
            && self.discount_pct <= 100
    }

    /// Case-insensitive substring match over name, brand and category.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.brand.to_lowercase().contains(&q)
            || self.category.to_lowercase().contains(&q)
    }
}

#[cfg(test)]
pub(crate) fn sample_product(id: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: "Gucci Classic Bag".into(),
        brand: "Gucci".into(),
        category: "Women > Handbags".into(),
        store: "Nordstrom".into(),
        msrp: price * 2.0,
        price,
        discount_pct: 50,
        image_url: "https://example.com/img.jpg".into(),
        product_url: "https://example.com/product".into(),
    }
}
