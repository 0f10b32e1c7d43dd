#![forbid(unsafe_code)]

//! Copy shown on the page: brand strings, per-category headings, navigation
//! labels and the fallback message.
//!
//! All text is Uzbek (Latin script) as it appears on the live site.

use crate::section::Category;

/// Brand name shown in the hero and footer.
pub const BRAND: &str = "KINGPLAST";
/// Badge under the hero title.
pub const CATALOG_BADGE: &str = "Royal Katalog 2025";
/// Hero tagline, repeated in the footer.
pub const COLLECTION: &str = "Royal Interior Collection 2025";
/// Hero call to action.
pub const CTA_LABEL: &str = "Katalogni ko'rish";
/// Product line description.
pub const PRODUCT_LINE: &str = "Dekorativ plastik panellar";
/// `tel:` target of the phone link.
pub const PHONE_HREF: &str = "tel:+998951200888";
/// Phone number as displayed.
pub const PHONE_DISPLAY: &str = "+998 (95) 120-66-64";
pub const BUSINESS_HOURS: &str = "Har kuni 9:00 - 20:00";
pub const COPYRIGHT: &str = "© 2025 KINGPLAST. Barcha huquqlar himoyalangan.";

/// Tooltip of the desktop "back to top" navigation button.
pub const NAV_TOP_LABEL: &str = "Yuqoriga";
/// Heading of the expanded mobile navigation.
pub const NAV_SELECT_CATEGORY: &str = "Select Category";
/// Label of the expanded mobile navigation's progress row.
pub const NAV_PROGRESS: &str = "Progress";
/// Mobile-only hint on carousel slides.
pub const TAP_HINT: &str = "Tap to view";

/// Fallback boundary heading.
pub const FALLBACK_TITLE: &str = "Nimadir noto'g'ri ketdi";
/// Fallback boundary explanation.
pub const FALLBACK_MESSAGE: &str = "Sahifani yuklashda xatolik yuz berdi. Iltimos, sahifani yangilang yoki qaytadan urinib ko'ring.";
/// Fallback boundary reload button.
pub const FALLBACK_RELOAD: &str = "Sahifani yangilash";

/// A footer column: heading plus lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterColumn {
    pub heading: &'static str,
    pub lines: &'static [&'static str],
}

pub const FOOTER_COLUMNS: [FooterColumn; 3] = [
    FooterColumn {
        heading: "Mahsulotlar",
        lines: &[PRODUCT_LINE, "Qirollik sifati"],
    },
    FooterColumn {
        heading: "Aloqa",
        lines: &[PHONE_DISPLAY, BUSINESS_HOURS],
    },
    FooterColumn {
        heading: "Sifat",
        lines: &["Yuqori sifatli materiallar", "Professional xizmat"],
    },
];

impl Category {
    /// Carousel heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Category::Cm9 => "9sm 3D DekorPlast",
            Category::Cm12 => "12sm 3D DekorPlast",
            Category::X12 => "x12sm 3D DekorPlast",
            Category::Cm16 => "16sm 3D DekorPlast",
            Category::Cm18 => "18sm 3D DekorPlast",
            Category::Cm20 => "20sm 3D DekorPlast",
            Category::Cm25 => "25sm DekorPlast",
            Category::Cm40 => "40sm DekorPlast",
            Category::Cm60 => "60sm DekorPlast",
        }
    }

    /// Line under the carousel heading.
    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Category::Cm9 => "Yuqori sifatli dekorativ panellar",
            Category::Cm12 => "Zamonaviy dizayn va mukammal sifat",
            Category::X12 => "Maxsus kolleksiya uchun",
            Category::Cm16 => "Keng tanlov va chiroyli dizayn",
            Category::Cm18 => "Premium sifat va uslub",
            Category::Cm20 => "Mukammal yechim har qanday interior uchun",
            Category::Cm25 => "Eng yangi kolleksiya",
            Category::Cm40 => "Professional darajadagi yechimlar",
            Category::Cm60 => "Maksimal chidamlilik va nafislik",
        }
    }

    /// Navigation tooltip / expanded-grid label.
    #[must_use]
    pub const fn nav_label(self) -> &'static str {
        match self {
            Category::Cm9 => "9sm 3D",
            Category::Cm12 => "12sm 3D",
            Category::X12 => "x12sm 3D",
            Category::Cm16 => "16sm 3D",
            Category::Cm18 => "18sm 3D",
            Category::Cm20 => "20sm 3D",
            Category::Cm25 => "25sm DekorPlast",
            Category::Cm40 => "40sm DekorPlast",
            Category::Cm60 => "60sm DekorPlast",
        }
    }

    /// Second word of the navigation label (`"3D"`, `"DekorPlast"`), shown
    /// under the key in the compact mobile pill.
    #[must_use]
    pub fn nav_suffix(self) -> &'static str {
        self.nav_label().split(' ').nth(1).unwrap_or("3D")
    }
}
