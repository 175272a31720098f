//! Text preprocessing: cleaning and weak labeling of raw ticket text.

mod labeler;
mod lexicon;
mod normalizer;

pub use labeler::{LabelRule, WeakLabeler};
pub use lexicon::{Lexicon, ENGLISH_LEMMAS, ENGLISH_STOPWORDS};
pub use normalizer::TextNormalizer;
