use lazy_static::lazy_static;
use regex::Regex;

use crate::category::Category;
use crate::error::ClassifierError;

lazy_static! {
    static ref DEFAULT_RULES: Vec<LabelRule> = vec![
        LabelRule::compiled(
            Category::Login,
            r"login|account|password|username|authentication|access",
        ),
        LabelRule::compiled(
            Category::Billing,
            r"bill|payment|invoice|charge|refund|price|cost|transaction",
        ),
        LabelRule::compiled(
            Category::Technical,
            r"technical|error|bug|issue|crash|software|hardware|system|network",
        ),
    ];
}

/// A single weak-labeling rule: text matching `pattern` belongs to `category`.
#[derive(Debug, Clone)]
pub struct LabelRule {
    pub category: Category,
    pub pattern: Regex,
}

impl LabelRule {
    /// Compiles a rule. Patterns are matched against lowercased text.
    ///
    /// # Errors
    /// `DataError` if the pattern is not a valid regex or `category` is
    /// `Other` (the fallback is implicit and cannot be a rule).
    pub fn new(category: Category, pattern: &str) -> Result<Self, ClassifierError> {
        if !category.is_target() {
            return Err(ClassifierError::DataError(
                "'Other' is the fallback label and cannot have a rule".into(),
            ));
        }
        let pattern = Regex::new(pattern)
            .map_err(|e| ClassifierError::data(&format!("Invalid pattern for {}", category), e))?;
        Ok(Self { category, pattern })
    }

    fn compiled(category: Category, pattern: &str) -> Self {
        Self::new(category, pattern).expect("built-in label pattern must compile")
    }

    fn matches(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }
}

/// Bootstraps training labels from unlabeled ticket text.
///
/// Rules are evaluated top-down and the first match wins, so a ticket that
/// mentions both a password and an invoice is labeled `Login`. Text matching no
/// rule is `Other`.
///
/// ```
/// use ticket_classifier::{Category, WeakLabeler};
///
/// let labeler = WeakLabeler::english();
/// assert_eq!(labeler.label("Please refund my last invoice"), Category::Billing);
/// assert_eq!(labeler.label("Password reset for my invoice portal"), Category::Login);
/// assert_eq!(labeler.label("Thanks for the quick reply"), Category::Other);
/// ```
#[derive(Debug, Clone)]
pub struct WeakLabeler {
    rules: Vec<LabelRule>,
}

impl WeakLabeler {
    pub fn new(rules: Vec<LabelRule>) -> Self {
        Self { rules }
    }

    /// Login, then Billing, then Technical keyword rules.
    pub fn english() -> Self {
        Self::new(DEFAULT_RULES.clone())
    }

    pub fn label(&self, text: &str) -> Category {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category)
            .unwrap_or(Category::Other)
    }
}

impl Default for WeakLabeler {
    fn default() -> Self {
        Self::english()
    }
}
