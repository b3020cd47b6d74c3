use std::cmp::Ordering;

use itertools::Itertools;

use super::product::{ProductListing, ScoredProduct};

/// Case-folded title with whitespace runs collapsed; equal keys are duplicates.
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase().split_whitespace().join(" ")
}

/// Orders by descending score (document order on ties), keeps the first
/// listing per normalised title and stops at `cap`.
pub fn dedupe_and_rank(mut products: Vec<ScoredProduct>, cap: usize) -> Vec<ProductListing> {
    products.retain(|p| p.score > 0.0);
    // sort_by is stable
    products.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    products
        .into_iter()
        .unique_by(|p| normalize_title(&p.listing.title))
        .take(cap)
        .inspect(|p| {
            log::debug!(
                "Accepted [{:.1}] {} - {}",
                p.score,
                p.listing.title.chars().take(60).collect::<String>(),
                p.listing.price
            )
        })
        .map(|p| p.listing)
        .collect()
}
