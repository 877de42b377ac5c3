//! Static unit catalog.
//!
//! # Responsibility
//! - Define the closed set of preparation categories and their display data.
//! - Provide default required counts used for bulk board initialization.
//!
//! # Invariants
//! - `CATALOG` lists every `Category` exactly once, in display order.
//! - Catalog rows are never mutated at runtime.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Preparation category tag. Immutable on a unit after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    ProductLove,
    ProductHate,
    ProductSense,
    ProductStrategy,
    ProductAnalytics,
    ProductExecution,
    ProductTech,
    BehavePrep,
    Behave,
    VibeCoding,
}

impl Category {
    /// Stable tag used in persisted snapshots and CLI arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductLove => "productLove",
            Self::ProductHate => "productHate",
            Self::ProductSense => "productSense",
            Self::ProductStrategy => "productStrategy",
            Self::ProductAnalytics => "productAnalytics",
            Self::ProductExecution => "productExecution",
            Self::ProductTech => "productTech",
            Self::BehavePrep => "behavePrep",
            Self::Behave => "behave",
            Self::VibeCoding => "vibeCoding",
        }
    }

    /// Catalog row describing this category.
    pub fn row(self) -> &'static CatalogRow {
        &CATALOG[self.display_index()]
    }

    /// Display label shown in views and exported event summaries.
    pub fn label(self) -> &'static str {
        self.row().label
    }

    /// Zero-based position in catalog display order.
    pub fn display_index(self) -> usize {
        match self {
            Self::ProductLove => 0,
            Self::ProductHate => 1,
            Self::ProductSense => 2,
            Self::ProductStrategy => 3,
            Self::ProductAnalytics => 4,
            Self::ProductExecution => 5,
            Self::ProductTech => 6,
            Self::BehavePrep => 7,
            Self::Behave => 8,
            Self::VibeCoding => 9,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        CATALOG
            .iter()
            .map(|row| row.category)
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| CategoryParseError(normalized.to_string()))
    }
}

/// Error returned when parsing an unknown category tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(pub String);

impl Display for CategoryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown category `{}`; expected one of: {}",
            self.0,
            CATALOG
                .iter()
                .map(|row| row.category.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for CategoryParseError {}

/// Static display and default-count data for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRow {
    pub category: Category,
    pub label: &'static str,
    /// CSS-style hex color used by graphical front ends.
    pub color: &'static str,
    /// Note seeded into units created by bulk initialization.
    pub default_note: Option<&'static str>,
    /// Default number of AI mock units.
    pub default_ai: u32,
    /// Default number of real mock units.
    pub default_real: u32,
}

/// Catalog rows in display order.
pub const CATALOG: [CatalogRow; 10] = [
    CatalogRow {
        category: Category::ProductLove,
        label: "productLove",
        color: "#fee2e2",
        default_note: None,
        default_ai: 3,
        default_real: 1,
    },
    CatalogRow {
        category: Category::ProductHate,
        label: "productHate",
        color: "#ffedd5",
        default_note: None,
        default_ai: 3,
        default_real: 1,
    },
    CatalogRow {
        category: Category::ProductSense,
        label: "productSense",
        color: "#fef9c3",
        default_note: None,
        default_ai: 4,
        default_real: 1,
    },
    CatalogRow {
        category: Category::ProductStrategy,
        label: "productStrategy",
        color: "#f0fdf4",
        default_note: Some("Pricing (need more)"),
        default_ai: 4,
        default_real: 1,
    },
    CatalogRow {
        category: Category::ProductAnalytics,
        label: "productAnalytics",
        color: "#ecfeff",
        default_note: None,
        default_ai: 4,
        default_real: 2,
    },
    CatalogRow {
        category: Category::ProductExecution,
        label: "productExecution",
        color: "#eff6ff",
        default_note: None,
        default_ai: 6,
        default_real: 2,
    },
    CatalogRow {
        category: Category::ProductTech,
        label: "productTech",
        color: "#eef2ff",
        default_note: None,
        default_ai: 4,
        default_real: 2,
    },
    CatalogRow {
        category: Category::BehavePrep,
        label: "behavePrep",
        color: "#f5f3ff",
        default_note: None,
        default_ai: 10,
        default_real: 0,
    },
    CatalogRow {
        category: Category::Behave,
        label: "behave",
        color: "#fae8ff",
        default_note: None,
        default_ai: 4,
        default_real: 3,
    },
    CatalogRow {
        category: Category::VibeCoding,
        label: "vibeCoding",
        color: "#f3f4f6",
        default_note: None,
        default_ai: 3,
        default_real: 1,
    },
];

/// Sum of all default unit counts across the catalog.
pub fn default_unit_total() -> u32 {
    CATALOG
        .iter()
        .map(|row| row.default_ai + row.default_real)
        .sum()
}
