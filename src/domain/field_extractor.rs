use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

use super::{
    candidate::flatten_text,
    keyword::{score, KeywordSet},
    product::{ProductListing, ScoredProduct},
};

const TITLE_TAGS: &str = "h1, h2, h3, h4, h5, a";
const TITLE_MIN_CHARS: usize = 10;
const TITLE_MAX_CHARS: usize = 200;

/// Probed in order, first usable value wins.
const IMAGE_ATTRIBUTES: [&str; 6] = [
    "src",
    "data-src",
    "data-lazy-src",
    "data-original",
    "data-img",
    "data-srcset",
];
const IMAGE_DECOYS: [&str; 2] = ["placeholder", "loading"];

/// Currency-marked pattern first, bare grouped digits as fallback.
const PRICE_PATTERNS: [&str; 2] = [
    r"(?i)([0-9]{1,3}(?:[.,][0-9]{3})+)\s*(?:đ|₫|vnd|vnđ)",
    r"([0-9]{1,3}(?:[.,][0-9]{3})+)",
];
const PRICE_SUFFIX: &str = "đ";

fn title_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(TITLE_TAGS).expect("title selector is valid"))
}

fn link_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("link selector is valid"))
}

fn image_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("img").expect("image selector is valid"))
}

fn price_regexes() -> &'static [Regex] {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    REGEXES.get_or_init(|| {
        PRICE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("price regex is valid"))
            .collect()
    })
}

/// Builds a scored listing out of one candidate container, or `None` when the
/// container has no keyword-bearing title.
pub fn extract_product(
    candidate: &ElementRef,
    source: &Url,
    keywords: &KeywordSet,
) -> Option<ScoredProduct> {
    let container_text = flatten_text(candidate);
    let container_relevance = score(&container_text, keywords);
    if !container_relevance.is_match() {
        return None;
    }

    let (title, title_score) = extract_title(candidate, keywords)?;

    Some(ScoredProduct {
        listing: ProductListing {
            title,
            price: extract_price(&container_text).unwrap_or_default(),
            image: extract_image(candidate, source).unwrap_or_default(),
            link: extract_link(candidate, source).unwrap_or_default(),
            source: source.to_string(),
        },
        // Title relevance supersedes the container's score.
        score: title_score,
        matched_keywords: container_relevance.matched,
    })
}

/// First heading or anchor whose text is 11..=199 chars and hits a keyword.
pub fn extract_title(candidate: &ElementRef, keywords: &KeywordSet) -> Option<(String, f64)> {
    candidate.select(title_selector()).find_map(|el| {
        let text = flatten_text(&el);
        let length = text.chars().count();
        if length <= TITLE_MIN_CHARS || length >= TITLE_MAX_CHARS {
            return None;
        }

        let relevance = score(&text, keywords);
        relevance.is_match().then_some((text, relevance.score))
    })
}

pub fn extract_link(candidate: &ElementRef, source: &Url) -> Option<String> {
    candidate
        .select(link_selector())
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| {
            let href = href.trim();
            if href.is_empty()
                || href.starts_with('#')
                || href.to_lowercase().starts_with("javascript:")
            {
                return None;
            }
            resolve_url(source, href)
        })
}

pub fn extract_image(candidate: &ElementRef, source: &Url) -> Option<String> {
    let img = candidate.select(image_selector()).next()?;

    IMAGE_ATTRIBUTES
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find_map(|value| {
            // srcset-style values: keep the first URL only
            let value = value.split_whitespace().next()?;
            let lowered = value.to_lowercase();
            if IMAGE_DECOYS.iter().any(|decoy| lowered.contains(decoy)) {
                return None;
            }
            resolve_url(source, value)
        })
}

pub fn extract_price(text: &str) -> Option<String> {
    price_regexes().iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|digits| format!("{}{}", digits.as_str(), PRICE_SUFFIX))
    })
}

/// Resolves `reference` against `base`. Absolute references come back
/// normalised, so resolving a result again is a no-op.
pub fn resolve_url(base: &Url, reference: &str) -> Option<String> {
    base.join(reference).ok().map(|url| url.to_string())
}
