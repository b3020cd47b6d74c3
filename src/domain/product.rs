use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One product pulled out of a source page. `title` is never empty; the other
/// fields are empty strings when they could not be found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub title: String,
    pub price: String,
    pub image: String,
    pub link: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProduct {
    pub listing: ProductListing,
    pub score: f64,
    pub matched_keywords: BTreeSet<String>,
}
