use std::sync::Arc;

use super::lexicon::Lexicon;

/// Turns raw ticket text into the cleaned token string the model is trained on.
///
/// The pipeline is:
/// 1. lowercase
/// 2. drop every character that is neither `a-z` nor whitespace
/// 3. collapse whitespace and trim
/// 4. remove stopwords
/// 5. lemmatize the surviving tokens
///
/// The normalizer holds no mutable state; the lexicon is shared read-only, so a
/// single instance can be cloned freely and used from any number of threads.
///
/// ```
/// use ticket_classifier::TextNormalizer;
///
/// let normalizer = TextNormalizer::english();
/// assert_eq!(
///     normalizer.normalize("I forgot my Password!! Cannot log into my account (error #42)"),
///     "forgot password cannot log account error"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    lexicon: Arc<Lexicon>,
}

impl TextNormalizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// A normalizer over the default English lexicon.
    pub fn english() -> Self {
        Self::new(Arc::new(Lexicon::english()))
    }

    /// Normalizes `text`. Never fails; empty input gives empty output.
    pub fn normalize(&self, text: &str) -> String {
        let letters: String = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
            .collect();

        letters
            .split_whitespace()
            .filter(|token| !self.lexicon.is_stopword(token))
            .map(|token| self.lexicon.lemmatize(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    const SAMPLES: &[&str] = &[
        "I forgot my password and cannot log into my account",
        "Invoice #2024-118 was charged TWICE, please refund!!",
        "  The app crashes\twhen I open settings...\n\nError code 0x80004005 ",
        "Café menu: naïve résumé façade",
        "¿Dónde está mi factura? 请帮助",
        "the and of to in",
        "",
        "Children's accounts keep getting locked, our users' passwords expire daily",
    ];

    #[test]
    fn test_basic_cleaning() {
        let normalizer = TextNormalizer::english();
        assert_eq!(
            normalizer.normalize("Invoice #2024-118 was charged TWICE, please refund!!"),
            "invoice charged twice please refund"
        );
    }

    #[test]
    fn test_empty_and_stopword_only_input() {
        let normalizer = TextNormalizer::english();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \n\t "), "");
        assert_eq!(normalizer.normalize("the and of to in"), "");
    }

    #[test]
    fn test_output_is_lowercase_letters_and_spaces() {
        let normalizer = TextNormalizer::english();
        let allowed = Regex::new(r"^[a-z ]*$").unwrap();
        for sample in SAMPLES {
            let normalized = normalizer.normalize(sample);
            assert!(allowed.is_match(&normalized), "unexpected output {:?}", normalized);
            assert!(!normalized.starts_with(' ') && !normalized.ends_with(' '));
            assert!(!normalized.contains("  "));
        }
    }

    #[test]
    fn test_idempotent() {
        let normalizer = TextNormalizer::english();
        for sample in SAMPLES {
            let once = normalizer.normalize(sample);
            assert_eq!(normalizer.normalize(&once), once);
        }
    }

    #[test]
    fn test_non_ascii_letters_are_dropped() {
        let normalizer = TextNormalizer::english();
        assert_eq!(normalizer.normalize("Café"), "caf");
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = Lexicon::new(vec!["please"], Vec::new());
        let normalizer = TextNormalizer::new(Arc::new(lexicon));
        assert_eq!(normalizer.normalize("please reset the passwords"), "reset the password");
    }
}
