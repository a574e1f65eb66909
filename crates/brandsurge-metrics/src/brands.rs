use brandsurge_core::{columns, Slice, Table};

use crate::metrics::{compute_metrics, BrandMetrics};

/// Single-entry brand list returned when the table names no brands.
pub const NO_BRANDS_FOUND: &str = "No brands found";

/// Sorted distinct brand names, or `[NO_BRANDS_FOUND]` when there are none.
#[must_use]
pub fn brand_list(table: &Table) -> Vec<String> {
    let mut brands = table.slice().distinct_labels(columns::BRAND);
    if brands.is_empty() {
        return vec![NO_BRANDS_FOUND.to_string()];
    }
    brands.sort();
    brands
}

/// Whether `name` is a real brand rather than the empty-list sentinel.
#[must_use]
pub fn is_brand(name: &str) -> bool {
    name != NO_BRANDS_FOUND
}

/// Metrics for every brand present in `slice`, in brand-list order.
#[must_use]
pub fn metrics_by_brand(slice: &Slice<'_>, reference: &Table) -> Vec<(String, BrandMetrics)> {
    brand_list(reference)
        .into_iter()
        .filter(|b| is_brand(b))
        .map(|brand| {
            let metrics = compute_metrics(&slice.for_brand(&brand), reference);
            (brand, metrics)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use brandsurge_core::Cell;

    use super::*;

    fn table(brands: &[&str]) -> Table {
        Table::from_records(
            brands
                .iter()
                .map(|b| [(columns::BRAND, Cell::text(*b))].into_iter().collect())
                .collect(),
        )
    }

    #[test]
    fn brand_list_is_sorted_and_distinct() {
        assert_eq!(brand_list(&table(&["Zeta", "Acme", "Zeta", " "])), vec!["Acme", "Zeta"]);
    }

    #[test]
    fn brand_list_falls_back_to_sentinel() {
        assert_eq!(brand_list(&Table::new()), vec![NO_BRANDS_FOUND]);
        assert!(!is_brand(&brand_list(&table(&[]))[0]));
    }

    #[test]
    fn metrics_by_brand_covers_every_brand() {
        let t = table(&["B", "A", "B"]);
        let per_brand = metrics_by_brand(&t.slice(), &t);
        let names: Vec<&str> = per_brand.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(per_brand[1].1.total_mentions, 2);
    }
}
