//! Leaderboard aggregation.
//!
//! Turns a flat, unordered list of individual taste-test rows into one
//! summary row per product with a running average rating, then orders the
//! summaries for display.
//!
//! # Example
//!
//! ```
//! use milkrate::leaderboard::{aggregate, SortConfig, TasteTestRow};
//!
//! let rows = vec![
//!     TasteTestRow::new("p1", 8.0),
//!     TasteTestRow::new("p1", 6.0),
//!     TasteTestRow::new("p2", 10.0),
//! ];
//!
//! let board = aggregate(&rows, &SortConfig::parse("avg_rating", "desc"));
//! assert_eq!(board[0].product_id, "p2");
//! assert_eq!(board[1].avg_rating, 7.0);
//! assert_eq!(board[1].count, 2);
//! ```

mod types;

pub use types::{
    AggregatedProduct, NullRatingPolicy, SortColumn, SortConfig, SortDirection, TasteTestRow,
    UNKNOWN_BRAND, UNKNOWN_PRODUCT,
};

use indexmap::IndexMap;
use std::cmp::Ordering;

/// Aggregate rows with the default null-rating policy and sort them.
#[must_use]
pub fn aggregate(rows: &[TasteTestRow], sort: &SortConfig) -> Vec<AggregatedProduct> {
    Aggregator::default().aggregate(rows, sort)
}

/// Groups taste-test rows by product.
#[derive(Debug, Clone, Copy, Default)]
#[must_use]
pub struct Aggregator {
    null_ratings: NullRatingPolicy,
}

impl Aggregator {
    /// Create an aggregator with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how missing ratings are folded in.
    pub const fn with_policy(mut self, policy: NullRatingPolicy) -> Self {
        self.null_ratings = policy;
        self
    }

    /// The active null-rating policy.
    #[must_use]
    pub const fn policy(&self) -> NullRatingPolicy {
        self.null_ratings
    }

    /// Group `rows` by product in first-seen order, without sorting.
    ///
    /// Rows without a product id are skipped. Each product's descriptive
    /// fields come from the first row seen for it.
    #[must_use]
    pub fn group(&self, rows: &[TasteTestRow]) -> Vec<AggregatedProduct> {
        let mut groups: IndexMap<&str, AggregatedProduct> = IndexMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let Some(product_id) = row.product_id.as_deref() else {
                skipped += 1;
                continue;
            };

            let entry = groups
                .entry(product_id)
                .or_insert_with(|| AggregatedProduct::seed(product_id, row));

            match (row.rating, self.null_ratings) {
                (Some(rating), _) => entry.fold(rating),
                (None, NullRatingPolicy::TreatAsZero) => entry.fold(0.0),
                (None, NullRatingPolicy::Exclude) => {}
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "skipped rows without a product id");
        }

        groups.into_values().collect()
    }

    /// Group `rows` by product and order the result.
    #[must_use]
    pub fn aggregate(&self, rows: &[TasteTestRow], sort: &SortConfig) -> Vec<AggregatedProduct> {
        let mut products = self.group(rows);
        sort_products(&mut products, sort);
        products
    }
}

/// Order products by the requested column and direction.
///
/// Names compare lexicographically and case-sensitively, ratings and counts
/// numerically. Ties on the requested column fall back to ascending product
/// id. An unrecognized column leaves the slice untouched.
pub fn sort_products(products: &mut [AggregatedProduct], sort: &SortConfig) {
    if !sort.column.is_known() {
        tracing::warn!(
            column = %sort.column,
            "unrecognized sort column; keeping first-seen order"
        );
        return;
    }

    products.sort_by(|a, b| {
        let primary = compare_column(a, b, &sort.column);
        let primary = match sort.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.product_id.cmp(&b.product_id))
    });
}

fn compare_column(a: &AggregatedProduct, b: &AggregatedProduct, column: &SortColumn) -> Ordering {
    match column {
        SortColumn::BrandName => a.brand_name.cmp(&b.brand_name),
        SortColumn::ProductName => a.product_name.cmp(&b.product_name),
        SortColumn::AvgRating => a.avg_rating.total_cmp(&b.avg_rating),
        SortColumn::Count => a.count.cmp(&b.count),
        SortColumn::Unrecognized(_) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<TasteTestRow> {
        vec![
            TasteTestRow::new("p1", 8.0).with_names("Oatly", "Barista"),
            TasteTestRow::new("p1", 6.0).with_names("Oatly", "Barista"),
            TasteTestRow::new("p2", 10.0).with_names("Alpro", "Oat Original"),
        ]
    }

    fn find<'a>(board: &'a [AggregatedProduct], id: &str) -> &'a AggregatedProduct {
        board
            .iter()
            .find(|p| p.product_id == id)
            .expect("product present")
    }

    #[test]
    fn test_aggregate_means_and_counts() {
        let board = aggregate(&sample_rows(), &SortConfig::default());
        assert_eq!(board.len(), 2);

        let p1 = find(&board, "p1");
        assert_eq!(p1.avg_rating, 7.0);
        assert_eq!(p1.count, 2);

        let p2 = find(&board, "p2");
        assert_eq!(p2.avg_rating, 10.0);
        assert_eq!(p2.count, 1);
    }

    #[test]
    fn test_rows_without_product_id_are_dropped() {
        let mut rows = sample_rows();
        rows.push(TasteTestRow {
            product_id: None,
            rating: Some(1.0),
            ..TasteTestRow::default()
        });

        let board = aggregate(&rows, &SortConfig::default());
        assert_eq!(board.len(), 2);
        assert_eq!(board.iter().map(|p| p.count).sum::<u32>(), 3);
    }

    #[test]
    fn test_first_seen_row_supplies_metadata() {
        let rows = vec![
            TasteTestRow {
                product_type: Some("oat".to_string()),
                is_barista: Some(true),
                ..TasteTestRow::new("p1", 5.0)
            },
            TasteTestRow::new("p1", 7.0).with_names("Late Brand", "Late Product"),
        ];

        let board = aggregate(&rows, &SortConfig::default());
        let p1 = find(&board, "p1");
        assert_eq!(p1.brand_name, UNKNOWN_BRAND);
        assert_eq!(p1.product_name, UNKNOWN_PRODUCT);
        assert_eq!(p1.product_type.as_deref(), Some("oat"));
        assert_eq!(p1.is_barista, Some(true));
    }

    #[test]
    fn test_null_rating_counts_as_zero_by_default() {
        let rows = vec![
            TasteTestRow::new("p1", 9.0),
            TasteTestRow {
                rating: None,
                ..TasteTestRow::new("p1", 0.0)
            },
        ];

        let board = aggregate(&rows, &SortConfig::default());
        assert_eq!(board[0].count, 2);
        assert_eq!(board[0].avg_rating, 4.5);
    }

    #[test]
    fn test_null_rating_excluded_when_requested() {
        let rows = vec![
            TasteTestRow::new("p1", 9.0),
            TasteTestRow {
                rating: None,
                ..TasteTestRow::new("p1", 0.0)
            },
        ];

        let board = Aggregator::new()
            .with_policy(NullRatingPolicy::Exclude)
            .aggregate(&rows, &SortConfig::default());
        assert_eq!(board[0].count, 1);
        assert_eq!(board[0].avg_rating, 9.0);
    }

    #[test]
    fn test_sort_avg_rating_both_directions() {
        let rows = sample_rows();

        let asc = aggregate(&rows, &SortConfig::parse("avg_rating", "asc"));
        assert_eq!(asc[0].product_id, "p1");

        let desc = aggregate(&rows, &SortConfig::parse("avg_rating", "desc"));
        assert_eq!(desc[0].product_id, "p2");
    }

    #[test]
    fn test_sort_by_names_is_case_sensitive() {
        let rows = vec![
            TasteTestRow::new("p1", 1.0).with_names("oatly", "x"),
            TasteTestRow::new("p2", 1.0).with_names("Zeus", "x"),
            TasteTestRow::new("p3", 1.0).with_names("Alpro", "x"),
        ];

        let board = aggregate(&rows, &SortConfig::parse("brand_name", "asc"));
        let order: Vec<_> = board.iter().map(|p| p.brand_name.as_str()).collect();
        // Uppercase sorts before lowercase.
        assert_eq!(order, ["Alpro", "Zeus", "oatly"]);
    }

    #[test]
    fn test_sort_by_count() {
        let rows = vec![
            TasteTestRow::new("a", 1.0),
            TasteTestRow::new("b", 1.0),
            TasteTestRow::new("b", 1.0),
        ];
        let board = aggregate(&rows, &SortConfig::parse("count", "desc"));
        assert_eq!(board[0].product_id, "b");
    }

    #[test]
    fn test_ties_break_on_product_id_in_both_directions() {
        let rows = vec![
            TasteTestRow::new("p3", 5.0),
            TasteTestRow::new("p1", 5.0),
            TasteTestRow::new("p2", 5.0),
        ];

        for direction in ["asc", "desc"] {
            let board = aggregate(&rows, &SortConfig::parse("avg_rating", direction));
            let ids: Vec<_> = board.iter().map(|p| p.product_id.as_str()).collect();
            assert_eq!(ids, ["p1", "p2", "p3"], "direction {direction}");
        }
    }

    #[test]
    fn test_unrecognized_column_keeps_first_seen_order() {
        let rows = vec![
            TasteTestRow::new("p3", 1.0),
            TasteTestRow::new("p1", 9.0),
            TasteTestRow::new("p2", 5.0),
        ];

        let board = aggregate(&rows, &SortConfig::parse("created_at", "asc"));
        let ids: Vec<_> = board.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, ["p3", "p1", "p2"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], &SortConfig::default()).is_empty());
    }
}
