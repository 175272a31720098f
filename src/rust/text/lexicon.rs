use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Standard English stopword list.
///
/// Entries containing an apostrophe never survive normalization (apostrophes are
/// stripped first) but are kept so the list stays the well-known one.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t",
    "can", "will", "just", "don", "don't", "should", "should've", "now", "d", "ll",
    "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn",
    "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Irregular plurals and words the suffix rules would mangle.
pub const ENGLISH_LEMMAS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("leaves", "leaf"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("crises", "crisis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("cookies", "cookie"),
    ("movies", "movie"),
    ("rookies", "rookie"),
    ("selfies", "selfie"),
    ("calories", "calorie"),
    ("brownies", "brownie"),
    ("zombies", "zombie"),
    ("goalies", "goalie"),
    ("newbies", "newbie"),
    ("freebies", "freebie"),
    ("hoodies", "hoodie"),
    ("smoothies", "smoothie"),
];

/// (suffix, replacement, minimum token length)
const SUFFIX_RULES: &[(&str, &str, usize)] = &[
    ("sses", "ss", 0),
    ("ies", "y", 5),
    ("xes", "x", 0),
    ("zzes", "zz", 0),
    ("ches", "ch", 0),
    ("shes", "sh", 0),
];

const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Immutable word resources used by the normalizer: a stopword set and an
/// exception table for lemmatization.
///
/// A lexicon is built once at startup and shared (usually behind an `Arc`) by
/// every normalizer that needs it.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    lemmas: HashMap<String, String>,
}

impl Lexicon {
    /// Builds a lexicon from caller-supplied stopwords and lemma exceptions.
    ///
    /// Exception targets should be fixed points of the lemmatizer (not keys of
    /// the table themselves), otherwise normalization stops being idempotent.
    pub fn new<S, L>(stopwords: S, lemmas: L) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        L: IntoIterator<Item = (String, String)>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            lemmas: lemmas.into_iter().collect(),
        }
    }

    /// The default English lexicon.
    pub fn english() -> Self {
        Self::new(
            ENGLISH_STOPWORDS.iter().copied(),
            ENGLISH_LEMMAS
                .iter()
                .map(|(word, lemma)| (word.to_string(), lemma.to_string())),
        )
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Reduces a lowercase token to its singular, dictionary-like form.
    ///
    /// Rules are part-of-speech agnostic. The exception table is consulted
    /// first; other tokens of three letters or fewer are left alone, and the
    /// rest go through the first matching plural suffix rule.
    ///
    /// A lemma that would be a stopword is rejected in favor of the original
    /// token.
    pub fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if let Some(lemma) = self.lemmas.get(token) {
            return Cow::Owned(lemma.clone());
        }
        if token.len() <= 3 {
            return Cow::Borrowed(token);
        }
        let lemma = match strip_plural(token) {
            Some(stripped) => self.lemmas.get(&stripped).cloned().unwrap_or(stripped),
            None => return Cow::Borrowed(token),
        };
        if self.is_stopword(&lemma) {
            Cow::Borrowed(token)
        } else {
            Cow::Owned(lemma)
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

fn strip_plural(token: &str) -> Option<String> {
    for (suffix, replacement, min_len) in SUFFIX_RULES {
        if token.len() >= *min_len && token.ends_with(suffix) {
            let stem = &token[..token.len() - suffix.len()];
            return Some(format!("{}{}", stem, replacement));
        }
    }
    if token.ends_with('s') && !PROTECTED_ENDINGS.iter().any(|ending| token.ends_with(ending)) {
        return Some(token[..token.len() - 1].to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let lexicon = Lexicon::english();
        assert_eq!(lexicon.lemmatize("passwords"), "password");
        assert_eq!(lexicon.lemmatize("issues"), "issue");
        assert_eq!(lexicon.lemmatize("crashes"), "crash");
        assert_eq!(lexicon.lemmatize("addresses"), "address");
        assert_eq!(lexicon.lemmatize("boxes"), "box");
        assert_eq!(lexicon.lemmatize("batches"), "batch");
        assert_eq!(lexicon.lemmatize("queries"), "query");
        assert_eq!(lexicon.lemmatize("ties"), "tie");
    }

    #[test]
    fn test_protected_words_untouched() {
        let lexicon = Lexicon::english();
        for word in ["access", "status", "analysis", "bus", "gas", "login"] {
            assert_eq!(lexicon.lemmatize(word), word);
        }
    }

    #[test]
    fn test_irregular_table() {
        let lexicon = Lexicon::english();
        assert_eq!(lexicon.lemmatize("children"), "child");
        assert_eq!(lexicon.lemmatize("men"), "man");
        assert_eq!(lexicon.lemmatize("series"), "series");
        // possessive with the apostrophe already stripped
        assert_eq!(lexicon.lemmatize("childrens"), "child");
    }

    #[test]
    fn test_ie_nouns_keep_their_ending() {
        let lexicon = Lexicon::english();
        assert_eq!(lexicon.lemmatize("cookies"), "cookie");
        assert_eq!(lexicon.lemmatize("movies"), "movie");
        assert_eq!(lexicon.lemmatize("cookie"), "cookie");
        // the suffix rule still covers the regular -y plurals
        assert_eq!(lexicon.lemmatize("companies"), "company");
    }

    #[test]
    fn test_lemma_never_a_stopword() {
        let lexicon = Lexicon::english();
        // "hims" would reduce to the stopword "him"
        assert_eq!(lexicon.lemmatize("hims"), "hims");
    }

    #[test]
    fn test_lemmatize_is_a_fixed_point() {
        let lexicon = Lexicon::english();
        for word in ["payments", "refunds", "classes", "flies", "children", "errors", "windows"] {
            let once = lexicon.lemmatize(word).into_owned();
            assert_eq!(lexicon.lemmatize(&once), once.as_str(), "lemma of {} not stable", word);
        }
    }

    #[test]
    fn test_english_stopwords_loaded() {
        let lexicon = Lexicon::english();
        assert_eq!(lexicon.stopword_count(), ENGLISH_STOPWORDS.len());
        assert!(lexicon.is_stopword("the"));
        assert!(!lexicon.is_stopword("password"));
    }
}
