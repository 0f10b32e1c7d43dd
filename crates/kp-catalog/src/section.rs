#![forbid(unsafe_code)]

//! Page sections and product categories.
//!
//! The page is a fixed, ordered list of sections: the hero followed by one
//! section per product category. Element ids in the markup are derived from
//! these values, so they are the only identifiers the layout layer ever
//! queries.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a known section or category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSectionError {
    #[error("unknown section id: {0:?}")]
    UnknownSection(String),
    #[error("unknown category key: {0:?}")]
    UnknownCategory(String),
}

/// Product category, keyed by panel width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Category {
    Cm9,
    Cm12,
    X12,
    Cm16,
    Cm18,
    Cm20,
    Cm25,
    Cm40,
    Cm60,
}

impl Category {
    /// All categories in page order.
    pub const ALL: [Category; 9] = [
        Category::Cm9,
        Category::Cm12,
        Category::X12,
        Category::Cm16,
        Category::Cm18,
        Category::Cm20,
        Category::Cm25,
        Category::Cm40,
        Category::Cm60,
    ];

    /// Short key used in the catalog and on navigation buttons.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Category::Cm9 => "9",
            Category::Cm12 => "12",
            Category::X12 => "x12",
            Category::Cm16 => "16",
            Category::Cm18 => "18",
            Category::Cm20 => "20",
            Category::Cm25 => "25",
            Category::Cm40 => "40",
            Category::Cm60 => "60",
        }
    }

    /// Zero-based position among the categories.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Category at `index`, if in range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The page section that hosts this category's carousel.
    #[must_use]
    pub const fn section(self) -> SectionId {
        SectionId::Category(self)
    }

    /// Look up a category by its key.
    pub fn from_key(key: &str) -> Result<Self, ParseSectionError> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| ParseSectionError::UnknownCategory(key.to_owned()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifier of a page section.
///
/// Always a member of [`SectionId::ALL`]; there is no way to construct an
/// undeclared section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SectionId {
    #[default]
    Hero,
    Category(Category),
}

impl SectionId {
    /// All sections in document order.
    pub const ALL: [SectionId; 10] = [
        SectionId::Hero,
        SectionId::Category(Category::Cm9),
        SectionId::Category(Category::Cm12),
        SectionId::Category(Category::X12),
        SectionId::Category(Category::Cm16),
        SectionId::Category(Category::Cm18),
        SectionId::Category(Category::Cm20),
        SectionId::Category(Category::Cm25),
        SectionId::Category(Category::Cm40),
        SectionId::Category(Category::Cm60),
    ];

    /// DOM element id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::Category(Category::Cm9) => "section-9",
            SectionId::Category(Category::Cm12) => "section-12",
            SectionId::Category(Category::X12) => "section-x12",
            SectionId::Category(Category::Cm16) => "section-16",
            SectionId::Category(Category::Cm18) => "section-18",
            SectionId::Category(Category::Cm20) => "section-20",
            SectionId::Category(Category::Cm25) => "section-25",
            SectionId::Category(Category::Cm40) => "section-40",
            SectionId::Category(Category::Cm60) => "section-60",
        }
    }

    /// Position in document order (`hero` is 0).
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            SectionId::Hero => 0,
            SectionId::Category(c) => c.index() + 1,
        }
    }

    /// The category shown in this section, `None` for the hero.
    #[must_use]
    pub const fn category(self) -> Option<Category> {
        match self {
            SectionId::Hero => None,
            SectionId::Category(c) => Some(c),
        }
    }

    #[must_use]
    pub const fn is_hero(self) -> bool {
        matches!(self, SectionId::Hero)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = ParseSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseSectionError::UnknownSection(s.to_owned()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SectionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
