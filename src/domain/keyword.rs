use std::collections::BTreeSet;

/// Bonus for a haystack that begins with the keyword.
const PREFIX_BONUS: f64 = 0.5;

/// Ordered, case-insensitive search terms for one search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeywordSet {
    terms: Vec<Keyword>,
}

#[derive(Debug, Clone, PartialEq)]
struct Keyword {
    original: String,
    folded: String,
}

impl KeywordSet {
    /// Blank terms are dropped and case-insensitive repeats keep their first spelling.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<Keyword> = vec![];

        for term in terms {
            let original = term.as_ref().trim();
            if original.is_empty() {
                continue;
            }

            let folded = original.to_lowercase();
            if keywords.iter().any(|k| k.folded == folded) {
                continue;
            }

            keywords.push(Keyword {
                original: original.to_string(),
                folded,
            });
        }

        KeywordSet { terms: keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|k| k.original.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Relevance {
    pub score: f64,
    pub matched: BTreeSet<String>,
}

impl Relevance {
    pub fn is_match(&self) -> bool {
        self.score > 0.0
    }
}

/// Scores `text` against every keyword: 1.0 per contained keyword, plus
/// [`PREFIX_BONUS`] when the text starts with it.
pub fn score(text: &str, keywords: &KeywordSet) -> Relevance {
    let haystack = text.to_lowercase();
    let mut relevance = Relevance::default();

    for keyword in keywords.terms.iter() {
        if !haystack.contains(&keyword.folded) {
            continue;
        }

        relevance.score += 1.0;
        if haystack.starts_with(&keyword.folded) {
            relevance.score += PREFIX_BONUS;
        }
        relevance.matched.insert(keyword.original.clone());
    }

    relevance
}

#[cfg(test)]
mod tests {
    use super::{score, KeywordSet};

    #[test]
    fn score_leading_keyword_gets_bonus() {
        let keywords = KeywordSet::new(["áo", "nam"]);
        let result = score("Áo Thun Nam Cotton", &keywords);

        assert_eq!(result.score, 2.5);
        assert_eq!(
            result.matched.into_iter().collect::<Vec<String>>(),
            vec!["nam", "áo"]
        );
    }

    #[test]
    fn score_is_zero_without_any_hit() {
        let keywords = KeywordSet::new(["giày", "nike"]);
        let result = score("Áo Thun Nam Cotton", &keywords);

        assert_eq!(result.score, 0.0);
        assert!(result.matched.is_empty());
        assert!(!result.is_match());
    }

    #[test]
    fn score_counts_repeated_keyword_once() {
        let keywords = KeywordSet::new(["nike"]);
        let result = score("Nike Air - nike running - NIKE", &keywords);

        assert_eq!(result.score, 1.5);
    }

    #[test]
    fn score_unaffected_by_absent_keyword() {
        let text = "Giày Thể Thao Nike Air Max";
        let before = score(text, &KeywordSet::new(["nike"]));
        let after = score(text, &KeywordSet::new(["nike", "adidas"]));

        assert_eq!(before, after);
    }

    #[test]
    fn score_matches_mid_sentence_without_bonus() {
        let keywords = KeywordSet::new(["THUN"]);
        let result = score("Áo Thun Nam", &keywords);

        assert_eq!(result.score, 1.0);
        assert!(result.matched.contains("THUN"));
    }

    #[test]
    fn keyword_set_drops_blank_and_repeated_terms() {
        let keywords = KeywordSet::new(["  Áo ", "", "   ", "áo", "nam"]);

        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords.iter().collect::<Vec<&str>>(), vec!["Áo", "nam"]);
    }

    #[test]
    fn empty_keyword_set_never_matches() {
        let keywords = KeywordSet::new(Vec::<String>::new());

        assert!(keywords.is_empty());
        assert_eq!(score("anything at all", &keywords).score, 0.0);
    }
}
