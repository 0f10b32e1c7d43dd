#![forbid(unsafe_code)]

//! Static catalog for the KINGPLAST "Royal Katalog" page.
//!
//! Everything here is compile-time data: the ordered page sections, the nine
//! product categories with their copy, and the product list itself. Other
//! crates treat it as read-only input.

pub mod content;
pub mod products;
pub mod section;

pub use products::{Product, ProductRef, all_products, find_product, product_count, products};
pub use section::{Category, ParseSectionError, SectionId};
