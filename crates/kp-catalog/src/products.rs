#![forbid(unsafe_code)]

//! The product list.
//!
//! Read-only, compiled into the binary. Each category owns a contiguous
//! slice; slide indices in carousels and the lightbox are indices into that
//! slice.

use crate::section::Category;

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Product {
    /// Unique id, `<category key>-<n>`.
    pub id: &'static str,
    /// Site-relative image path.
    pub image: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Manufacturer's article code.
    pub code: &'static str,
}

impl Product {
    const fn new(
        id: &'static str,
        image: &'static str,
        name: &'static str,
        code: &'static str,
    ) -> Self {
        Self {
            id,
            image,
            name,
            code,
        }
    }
}

/// Where a product lives in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRef {
    pub category: Category,
    /// Index within [`products`]`(category)`.
    pub index: usize,
    pub product: &'static Product,
}

/// Products of one category, in display order.
#[must_use]
pub fn products(category: Category) -> &'static [Product] {
    match category {
        Category::Cm9 => &PRODUCTS_9,
        Category::Cm12 => &PRODUCTS_12,
        Category::X12 => &PRODUCTS_X12,
        Category::Cm16 => &PRODUCTS_16,
        Category::Cm18 => &PRODUCTS_18,
        Category::Cm20 => &PRODUCTS_20,
        Category::Cm25 => &PRODUCTS_25,
        Category::Cm40 => &PRODUCTS_40,
        Category::Cm60 => &PRODUCTS_60,
    }
}

/// Every product, grouped by category in page order.
pub fn all_products() -> impl Iterator<Item = (Category, &'static Product)> {
    Category::ALL
        .into_iter()
        .flat_map(|c| products(c).iter().map(move |p| (c, p)))
}

/// Total number of products across all categories.
#[must_use]
pub fn product_count() -> usize {
    Category::ALL.into_iter().map(|c| products(c).len()).sum()
}

/// Find a product by id.
#[must_use]
pub fn find_product(id: &str) -> Option<ProductRef> {
    Category::ALL.into_iter().find_map(|category| {
        products(category)
            .iter()
            .position(|p| p.id == id)
            .map(|index| ProductRef {
                category,
                index,
                product: &products(category)[index],
            })
    })
}

const PRODUCTS_9: [Product; 6] = [
    Product::new("9-1", "/product-images/9-taro/photo_1_2025-07-02_10-50-33.webp", "9sm 3D DekorPlast", "9-121-5"),
    Product::new("9-2", "/product-images/9-taro/photo_2_2025-07-02_10-50-33.webp", "9sm 3D DekorPlast", "9-93-5"),
    Product::new("9-3", "/product-images/9-taro/photo_3_2025-07-02_10-50-33.webp", "9sm 3D DekorPlast", "9-001-5"),
    Product::new("9-4", "/product-images/9-taro/photo_4_2025-07-02_10-50-33.webp", "9sm 3D DekorPlast", "9-035"),
    Product::new("9-5", "/product-images/9-taro/photo_5_2025-07-02_10-50-33.webp", "9sm 3D DekorPlast", "9-06"),
    Product::new("9-6", "/product-images/9-taro/photo_6_2025-07-02_10-50-33.webp", "9sm 3D DekorPlast", "9-60"),
];

const PRODUCTS_12: [Product; 6] = [
    Product::new("12-1", "/12/photo_1_2025-07-30_13-43-04.webp", "12sm 3D DekorPlast", "12-101"),
    Product::new("12-2", "/12/photo_2_2025-07-30_13-43-04.webp", "12sm 3D DekorPlast", "12-102"),
    Product::new("12-3", "/12/photo_3_2025-07-30_13-43-04.webp", "12sm 3D DekorPlast", "12-103"),
    Product::new("12-4", "/12/photo_4_2025-07-30_13-43-04.webp", "12sm 3D DekorPlast", "12-104"),
    Product::new("12-5", "/12/photo_5_2025-07-30_13-43-04.webp", "12sm 3D DekorPlast", "12-105"),
    Product::new("12-6", "/12/photo_6_2025-07-30_13-43-04.webp", "12sm 3D DekorPlast", "12-106"),
];

const PRODUCTS_X12: [Product; 4] = [
    Product::new("x12-1", "/x12/photo_1_2025-07-30_13-43-09.webp", "x12sm 3D DekorPlast", "X12-201"),
    Product::new("x12-2", "/x12/photo_2_2025-07-30_13-43-09.webp", "x12sm 3D DekorPlast", "X12-202"),
    Product::new("x12-3", "/x12/photo_3_2025-07-30_13-43-09.webp", "x12sm 3D DekorPlast", "X12-203"),
    Product::new("x12-4", "/x12/photo_4_2025-07-30_13-43-09.webp", "x12sm 3D DekorPlast", "X12-204"),
];

const PRODUCTS_16: [Product; 6] = [
    Product::new("16-1", "/16/photo_1_2025-07-30_13-43-14.webp", "16sm 3D DekorPlast", "16-301"),
    Product::new("16-2", "/16/photo_2_2025-07-30_13-43-14.webp", "16sm 3D DekorPlast", "16-302"),
    Product::new("16-3", "/16/photo_3_2025-07-30_13-43-14.webp", "16sm 3D DekorPlast", "16-303"),
    Product::new("16-4", "/16/photo_4_2025-07-30_13-43-14.webp", "16sm 3D DekorPlast", "16-304"),
    Product::new("16-5", "/16/photo_5_2025-07-30_13-43-14.webp", "16sm 3D DekorPlast", "16-305"),
    Product::new("16-6", "/16/photo_6_2025-07-30_13-43-14.webp", "16sm 3D DekorPlast", "16-306"),
];

const PRODUCTS_18: [Product; 4] = [
    Product::new("18-1", "/18/photo_1_2025-07-30_13-43-19.webp", "18sm 3D DekorPlast", "18-401"),
    Product::new("18-2", "/18/photo_2_2025-07-30_13-43-19.webp", "18sm 3D DekorPlast", "18-402"),
    Product::new("18-3", "/18/photo_3_2025-07-30_13-43-19.webp", "18sm 3D DekorPlast", "18-403"),
    Product::new("18-4", "/18/photo_4_2025-07-30_13-43-19.webp", "18sm 3D DekorPlast", "18-404"),
];

const PRODUCTS_20: [Product; 6] = [
    Product::new("20-1", "/20/photo_1_2025-07-30_13-43-24.webp", "20sm 3D DekorPlast", "20-501"),
    Product::new("20-2", "/20/photo_2_2025-07-30_13-43-24.webp", "20sm 3D DekorPlast", "20-502"),
    Product::new("20-3", "/20/photo_3_2025-07-30_13-43-24.webp", "20sm 3D DekorPlast", "20-503"),
    Product::new("20-4", "/20/photo_4_2025-07-30_13-43-24.webp", "20sm 3D DekorPlast", "20-504"),
    Product::new("20-5", "/20/photo_5_2025-07-30_13-43-24.webp", "20sm 3D DekorPlast", "20-505"),
    Product::new("20-6", "/20/photo_6_2025-07-30_13-43-24.webp", "20sm 3D DekorPlast", "20-506"),
];

const PRODUCTS_25: [Product; 6] = [
    Product::new("25-1", "/25/photo_1_2025-07-30_13-43-29.webp", "25sm DekorPlast", "25-601"),
    Product::new("25-2", "/25/photo_2_2025-07-30_13-43-29.webp", "25sm DekorPlast", "25-602"),
    Product::new("25-3", "/25/photo_3_2025-07-30_13-43-29.webp", "25sm DekorPlast", "25-603"),
    Product::new("25-4", "/25/photo_4_2025-07-30_13-43-29.webp", "25sm DekorPlast", "25-604"),
    Product::new("25-5", "/25/photo_5_2025-07-30_13-43-29.webp", "25sm DekorPlast", "25-605"),
    Product::new("25-6", "/25/photo_6_2025-07-30_13-43-29.webp", "25sm DekorPlast", "25-606"),
];

const PRODUCTS_40: [Product; 6] = [
    Product::new("40-1", "/40/photo_1_2025-07-30_13-43-35.webp", "40sm DekorPlast", "40-701"),
    Product::new("40-2", "/40/photo_2_2025-07-30_13-43-35.webp", "40sm DekorPlast", "40-702"),
    Product::new("40-3", "/40/photo_3_2025-07-30_13-43-35.webp", "40sm DekorPlast", "40-703"),
    Product::new("40-4", "/40/photo_4_2025-07-30_13-43-35.webp", "40sm DekorPlast", "40-704"),
    Product::new("40-5", "/40/photo_5_2025-07-30_13-43-35.webp", "40sm DekorPlast", "40-705"),
    Product::new("40-6", "/40/photo_6_2025-07-30_13-43-35.webp", "40sm DekorPlast", "40-706"),
];

const PRODUCTS_60: [Product; 6] = [
    Product::new("60-1", "/60/photo_1_2025-07-30_13-43-40.webp", "60sm DekorPlast", "60-801"),
    Product::new("60-2", "/60/photo_2_2025-07-30_13-43-40.webp", "60sm DekorPlast", "60-802"),
    Product::new("60-3", "/60/photo_3_2025-07-30_13-43-40.webp", "60sm DekorPlast", "60-803"),
    Product::new("60-4", "/60/photo_4_2025-07-30_13-43-40.webp", "60sm DekorPlast", "60-804"),
    Product::new("60-5", "/60/photo_5_2025-07-30_13-43-40.webp", "60sm DekorPlast", "60-805"),
    Product::new("60-6", "/60/photo_6_2025-07-30_13-43-40.webp", "60sm DekorPlast", "60-806"),
];
