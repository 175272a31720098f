use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Coarse support ticket category.
///
/// `Other` is only ever produced by the weak labeler; it is dropped during
/// curation and is never a class the classifier can predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Login,
    Billing,
    Technical,
    Other,
}

impl Category {
    /// The three categories a trained model predicts, in model order.
    pub const TARGETS: [Category; 3] = [Category::Login, Category::Billing, Category::Technical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Billing => "Billing",
            Self::Technical => "Technical",
            Self::Other => "Other",
        }
    }

    pub fn is_target(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Login" => Ok(Self::Login),
            "Billing" => Ok(Self::Billing),
            "Technical" => Ok(Self::Technical),
            "Other" => Ok(Self::Other),
            other => Err(ClassifierError::DataError(format!("Unknown category '{}'", other))),
        }
    }
}
