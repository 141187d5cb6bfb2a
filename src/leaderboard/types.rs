//! Row and summary types for the public leaderboard.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder brand name for rows that arrive without one.
pub const UNKNOWN_BRAND: &str = "Unknown Brand";
/// Placeholder product name for rows that arrive without one.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// One user's evaluation of one product, as fetched from the backend.
///
/// Only `product_id` and `rating` feed the aggregation; the rest is carried
/// through to the summary row for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasteTestRow {
    pub product_id: Option<String>,
    /// Rating on a continuous 0-10 scale
    pub rating: Option<f64>,
    pub brand_name: Option<String>,
    pub product_name: Option<String>,
    /// Milk base, e.g. "oat", "soy", "almond"
    pub product_type: Option<String>,
    pub is_barista: Option<bool>,
    pub image_url: Option<String>,
}

impl TasteTestRow {
    /// Minimal row with a product id and rating.
    #[must_use]
    pub fn new(product_id: impl Into<String>, rating: f64) -> Self {
        Self {
            product_id: Some(product_id.into()),
            rating: Some(rating),
            ..Self::default()
        }
    }

    /// Set brand and product names.
    #[must_use]
    pub fn with_names(mut self, brand: impl Into<String>, product: impl Into<String>) -> Self {
        self.brand_name = Some(brand.into());
        self.product_name = Some(product.into());
        self
    }
}

/// Per-product summary derived from many [`TasteTestRow`]s.
///
/// Ephemeral: recomputed on every aggregation and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProduct {
    pub product_id: String,
    pub brand_name: String,
    pub product_name: String,
    /// Arithmetic mean of every rating folded in
    pub avg_rating: f64,
    /// Number of rows folded in
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_barista: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// `name`, or `placeholder` when it is missing or empty.
fn name_or(name: Option<&str>, placeholder: &str) -> String {
    name.filter(|n| !n.is_empty()).unwrap_or(placeholder).to_string()
}

impl AggregatedProduct {
    /// Start an accumulator from the first row seen for a product.
    pub(crate) fn seed(product_id: &str, row: &TasteTestRow) -> Self {
        Self {
            product_id: product_id.to_string(),
            brand_name: name_or(row.brand_name.as_deref(), UNKNOWN_BRAND),
            product_name: name_or(row.product_name.as_deref(), UNKNOWN_PRODUCT),
            avg_rating: 0.0,
            count: 0,
            product_type: row.product_type.clone(),
            is_barista: row.is_barista,
            image_url: row.image_url.clone(),
        }
    }

    /// Fold one more rating into the running mean.
    pub(crate) fn fold(&mut self, rating: f64) {
        let count = f64::from(self.count);
        self.avg_rating = (self.avg_rating * count + rating) / (count + 1.0);
        self.count += 1;
    }
}

/// Column a leaderboard can be sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortColumn {
    BrandName,
    ProductName,
    AvgRating,
    Count,
    /// A column name nothing knows about; sorts as a no-op
    Unrecognized(String),
}

impl SortColumn {
    /// Wire name of the column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::BrandName => "brand_name",
            Self::ProductName => "product_name",
            Self::AvgRating => "avg_rating",
            Self::Count => "count",
            Self::Unrecognized(name) => name,
        }
    }

    /// Whether this is one of the known columns.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Names of every known column.
    #[must_use]
    pub const fn known_names() -> &'static [&'static str] {
        &["brand_name", "product_name", "avg_rating", "count"]
    }
}

impl FromStr for SortColumn {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "brand_name" => Self::BrandName,
            "product_name" => Self::ProductName,
            "avg_rating" => Self::AvgRating,
            "count" => Self::Count,
            other => Self::Unrecognized(other.to_string()),
        })
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = std::convert::Infallible;

    /// `"asc"` is ascending; anything else sorts descending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "asc" { Self::Asc } else { Self::Desc })
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested leaderboard ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortConfig {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Create a sort config from a column and direction.
    #[must_use]
    pub const fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Parse wire names; never fails.
    #[must_use]
    pub fn parse(column: &str, direction: &str) -> Self {
        Self {
            column: column
                .parse::<SortColumn>()
                .unwrap_or_else(|never| match never {}),
            direction: direction
                .parse::<SortDirection>()
                .unwrap_or_else(|never| match never {}),
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::new(SortColumn::AvgRating, SortDirection::Desc)
    }
}

/// What a missing rating contributes to the running mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NullRatingPolicy {
    /// Fold the row in as a rating of 0 (the app's historical behavior)
    #[default]
    TreatAsZero,
    /// Skip the rating entirely; the row neither moves the mean nor the count
    Exclude,
}
