use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const CONTAINER_TAGS: &str = "div, article, li";
const CONTAINER_CLASS_PATTERN: &str = r"(?i)product|item|card";

fn container_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse(CONTAINER_TAGS).expect("container selector is valid"))
}

fn container_class_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(CONTAINER_CLASS_PATTERN).expect("class regex is valid"))
}

/// Finds every product-like container in document order. Nested matches are
/// all returned; overlapping candidates are left for deduplication.
pub fn locate_candidates(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .select(container_selector())
        .filter(|el| is_product_container(el))
        .collect()
}

fn is_product_container(element: &ElementRef) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| container_class_regex().is_match(class))
        .unwrap_or(false)
}

/// Text nodes of `element`, each trimmed, joined by single spaces.
pub fn flatten_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::{flatten_text, locate_candidates};

    #[test]
    fn locate_candidates_by_class_pattern() {
        let html = r#"
        <html><body>
            <div class="header">Logo</div>
            <div class="Product-Tile">A</div>
            <ul>
                <li class="grid-item">B</li>
                <li class="nav">Home</li>
            </ul>
            <article class="news-card">C</article>
            <section class="product">D</section>
            <div>No class</div>
        </body></html>
        "#;
        let document = Html::parse_document(html);
        let texts: Vec<String> = locate_candidates(&document)
            .iter()
            .map(flatten_text)
            .collect();

        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn locate_candidates_keeps_nested_matches() {
        let html = r#"
        <div class="product-list">
            <div class="product-item">Inner one</div>
            <div class="product-item">Inner two</div>
        </div>
        "#;
        let document = Html::parse_document(html);
        let candidates = locate_candidates(&document);

        assert_eq!(candidates.len(), 3);
        assert_eq!(flatten_text(&candidates[0]), "Inner one Inner two");
        assert_eq!(flatten_text(&candidates[2]), "Inner two");
    }

    #[test]
    fn flatten_text_collapses_whitespace() {
        let html = "<div class=\"card\">\n  <h3>  Áo\n Thun </h3><span>199.000đ</span>\n</div>";
        let document = Html::parse_document(html);
        let candidates = locate_candidates(&document);

        assert_eq!(flatten_text(&candidates[0]), "Áo Thun 199.000đ");
    }
}
