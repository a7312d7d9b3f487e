//! Domain types for WishDrop

pub mod board;
pub mod price;
pub mod product;
pub mod profile;

pub use board::{Board, DEFAULT_THRESHOLD_PCT};
pub use price::{PricePoint, PriceSeries};
pub use product::Product;
pub use profile::{PricePreference, Profile, Sizes};

/// Product identifier type alias (e.g. `P-1042`).
pub type ProductId = String;
