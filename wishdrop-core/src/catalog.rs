//! Product catalog: CSV load/save and the demo catalog generator.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;

use crate::domain::Product;
use crate::simulator::round_cents;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid product '{id}': {reason}")]
    InvalidProduct { id: String, reason: String },
}

/// Read-only product table indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting insane rows and duplicate ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        for (i, p) in products.iter().enumerate() {
            if !p.is_sane() {
                return Err(CatalogError::InvalidProduct {
                    id: p.id.clone(),
                    reason: format!("price {} / msrp {} out of range", p.price, p.msrp),
                });
            }
            if by_id.insert(p.id.clone(), i).is_some() {
                return Err(CatalogError::InvalidProduct {
                    id: p.id.clone(),
                    reason: "duplicate id".into(),
                });
            }
        }
        Ok(Self { products, by_id })
    }

    /// Load from a CSV file with a header row matching `Product` fields.
    pub fn from_csv_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let products = rdr
            .deserialize::<Product>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(products)
    }

    /// Write as CSV. Creates parent directories if needed.
    pub fn write_csv(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_products_csv(std::fs::File::create(path)?, &self.products)
    }

    /// The products for `ids`, in the order given. Unknown ids are skipped.
    pub fn select<S: AsRef<str>>(&self, ids: impl IntoIterator<Item = S>) -> Vec<&Product> {
        ids.into_iter()
            .filter_map(|id| self.get_product(id.as_ref()))
            .collect()
    }

    pub fn get_product(&self, id: &str) -> Option<&Product> {
        self.by_id.get(id).map(|&i| &self.products[i])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Sorted unique brands.
    pub fn brands(&self) -> Vec<&str> {
        self.unique(|p| &p.brand)
    }

    /// Sorted unique stores.
    pub fn stores(&self) -> Vec<&str> {
        self.unique(|p| &p.store)
    }

    /// Sorted unique categories.
    pub fn categories(&self) -> Vec<&str> {
        self.unique(|p| &p.category)
    }

    fn unique<'a>(&'a self, field: impl Fn(&'a Product) -> &'a String) -> Vec<&'a str> {
        self.products
            .iter()
            .map(|p| field(p).as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Column order of catalog CSV files.
pub const CSV_HEADER: [&str; 10] = [
    "id", "name", "brand", "category", "store", "msrp", "price", "discount_pct", "image_url",
    "product_url",
];

/// Write products as catalog rows. The header is written even with no rows.
pub fn write_products_csv<'a, W: std::io::Write>(
    writer: W,
    products: impl IntoIterator<Item = &'a Product>,
) -> Result<(), CatalogError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for p in products {
        wtr.serialize(p)?;
    }
    wtr.flush()?;
    Ok(())
}

const BRANDS: &[&str] = &[
    "Louis Vuitton", "Gucci", "Prada", "Chanel", "Burberry", "Fendi", "Versace", "Dior",
    "Balenciaga", "Givenchy", "Valentino", "YSL", "Bottega Veneta", "Ferragamo", "Moncler",
];

const STORES: &[&str] = &[
    "Nordstrom", "Bloomingdale's", "Saks Fifth Avenue", "Neiman Marcus", "Bergdorf Goodman",
    "Chanel", "Prada", "Gucci", "Louis Vuitton", "Burberry", "Sephora", "Ulta Beauty", "Macy's",
    "Amazon", "Target", "Best Buy", "Apple Store", "Costco", "Home Depot",
];

const CATEGORIES: &[&str] = &[
    "Women > Shoes",
    "Women > Handbags",
    "Women > Dresses",
    "Women > Jewelry",
    "Men > Shoes",
    "Men > Shirts",
    "Men > Jackets",
    "Beauty > Makeup",
    "Beauty > Fragrance",
    "Electronics > Wearables",
    "Electronics > Headphones",
    "Home > Decor",
    "Sports > Fitness",
];

const LINES: &[&str] = &["Signature", "Classic", "Limited", "Ultra", "Icon"];

const ITEMS: &[&str] = &[
    "Bag", "Shoes", "Watch", "Jacket", "Dress", "Sneakers", "Wallet", "Backpack", "Perfume",
    "Laptop", "Mixer",
];

const DISCOUNTS: &[u32] = &[10, 15, 20, 25, 30, 35, 40, 50, 60];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Generate a demo catalog of luxury items on sale.
///
/// Ids run `P-1000`, `P-1001`, ...; list prices are whole units in
/// `[150, 2500]`, and the sale price is the list price less a discount drawn
/// from a fixed ladder, rounded to cents.
pub fn generate_catalog<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Catalog {
    let products: Vec<Product> = (0..count)
        .map(|i| {
            let brand = pick(rng, BRANDS);
            let store = pick(rng, STORES);
            let category = pick(rng, CATEGORIES);
            let msrp = rng.gen_range(150..=2500u32) as f64;
            let discount_pct = DISCOUNTS.choose(rng).copied().unwrap_or(10);
            let price = round_cents(msrp * (1.0 - discount_pct as f64 / 100.0));
            let name = format!("{brand} {} {}", pick(rng, LINES), pick(rng, ITEMS));
            Product {
                id: format!("P-{}", 1000 + i),
                name,
                brand: brand.to_string(),
                category: category.to_string(),
                store: store.to_string(),
                msrp,
                price,
                discount_pct,
                image_url: "https://source.unsplash.com/800x1000/?luxury,fashion,product".into(),
                product_url: "https://example.com/product".into(),
            }
        })
        .collect();

    let by_id = products
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();
    Catalog { products, by_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::sample_product;
    use crate::rng::seeded;

    #[test]
    fn generated_catalog_is_sane() {
        let cat = generate_catalog(100, &mut seeded(1));
        assert_eq!(cat.len(), 100);
        assert!(cat.products().iter().all(|p| p.is_sane()));
        assert_eq!(cat.products()[0].id, "P-1000");
        assert!(cat.get_product("P-1099").is_some());
        assert!(cat.get_product("P-1100").is_none());
    }

    #[test]
    fn generated_prices_follow_discount() {
        let cat = generate_catalog(50, &mut seeded(2));
        for p in cat.products() {
            assert!((150.0..=2500.0).contains(&p.msrp));
            assert!(DISCOUNTS.contains(&p.discount_pct));
            let expected = round_cents(p.msrp * (1.0 - p.discount_pct as f64 / 100.0));
            assert_eq!(p.price, expected);
        }
    }

    #[test]
    fn generator_is_reproducible() {
        let a = generate_catalog(10, &mut seeded(5));
        let b = generate_catalog(10, &mut seeded(5));
        assert_eq!(a.products(), b.products());
    }

    #[test]
    fn csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("products.csv");
        let cat = generate_catalog(5, &mut seeded(3));
        cat.write_csv(&path).unwrap();
        let loaded = Catalog::from_csv_path(&path).unwrap();
        assert_eq!(loaded.products(), cat.products());
    }

    #[test]
    fn reads_hand_written_csv() {
        let csv = "id,name,brand,category,store,msrp,price,discount_pct,image_url,product_url\n\
                   P-1000,Gucci Icon Bag,Gucci,Women > Handbags,Nordstrom,1200,840.0,30,https://i,https://p\n";
        let cat = Catalog::from_reader(csv.as_bytes()).unwrap();
        let p = cat.get_product("P-1000").unwrap();
        assert_eq!(p.msrp, 1200.0);
        assert_eq!(p.discount_pct, 30);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            sample_product("P-1", 10.0),
            sample_product("P-1", 12.0),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn unique_lists_are_sorted() {
        let mut a = sample_product("P-1", 10.0);
        a.brand = "Prada".into();
        let b = sample_product("P-2", 10.0);
        let cat = Catalog::new(vec![a, b]).unwrap();
        assert_eq!(cat.brands(), vec!["Gucci", "Prada"]);
        assert_eq!(cat.stores(), vec!["Nordstrom"]);
        assert_eq!(cat.categories(), vec!["Women > Handbags"]);
    }

    #[test]
    fn select_keeps_order_and_skips_unknown() {
        let cat = generate_catalog(5, &mut seeded(4));
        let picked = cat.select(["P-1003", "P-9999", "P-1001"]);
        let ids: Vec<&str> = picked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P-1003", "P-1001"]);
    }

    #[test]
    fn exported_rows_read_back_as_catalog() {
        let cat = generate_catalog(6, &mut seeded(6));
        let mut buf = Vec::new();
        write_products_csv(&mut buf, cat.select(["P-1002", "P-1004"])).unwrap();
        let back = Catalog::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get_product("P-1004"), cat.get_product("P-1004"));
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut buf = Vec::new();
        write_products_csv(&mut buf, std::iter::empty()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), CSV_HEADER.join(","));
        assert!(Catalog::from_reader(text.as_bytes()).unwrap().is_empty());
    }
}
