use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use log::info;
use ndarray::{Array1, ArrayView1};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::utils::l2_normalize;
use crate::config::{FeatureConfig, TextColumn};
use crate::error::ClassifierError;

lazy_static! {
    // Two or more word characters, as in the usual bag-of-words tokenizers
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").expect("token pattern must compile");
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A sparse feature vector over a fixed number of dimensions.
///
/// Indices are strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn zeros(dim: usize) -> Self {
        Self { dim, indices: Vec::new(), values: Vec::new() }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn get(&self, index: usize) -> f64 {
        self.indices
            .binary_search(&index)
            .map(|pos| self.values[pos])
            .unwrap_or(0.0)
    }

    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    pub fn dot(&self, dense: ArrayView1<f64>) -> f64 {
        self.iter().map(|(i, v)| v * dense[i]).sum()
    }

    pub fn to_dense(&self) -> Array1<f64> {
        let mut dense = Array1::zeros(self.dim);
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

/// A frozen TF-IDF vocabulary.
///
/// Produced once by [`FeatureExtractor::fit`] and never modified afterwards.
/// Terms outside the vocabulary contribute nothing to a transformed vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpace {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    text_column: TextColumn,
}

impl FeatureSpace {
    /// Number of dimensions (vocabulary size)
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Column of the training sample the vocabulary was fitted on.
    pub fn text_column(&self) -> TextColumn {
        self.text_column
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }

    /// Maps `text` onto the vocabulary: raw term counts weighted by IDF, then
    /// L2-normalized. Text without any known term gives the all-zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let indices: Vec<usize> = counts.keys().copied().collect();
        let mut values: Vec<f64> = counts.iter().map(|(&i, &tf)| tf * self.idf[i]).collect();
        l2_normalize(&mut values);

        SparseVector { dim: self.dim(), indices, values }
    }

    pub fn transform_batch<'a, I>(&self, texts: I) -> Vec<SparseVector>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|text| self.transform(text)).collect()
    }

    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(ClassifierError::ArtifactError(format!(
                "Vocabulary has {} terms but {} IDF weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        if self.vocabulary.values().any(|&i| i >= self.idf.len()) {
            return Err(ClassifierError::ArtifactError("Vocabulary index out of range".into()));
        }
        Ok(())
    }
}

/// Fits TF-IDF feature spaces.
///
/// The vocabulary keeps the `max_features` terms with the highest total count
/// across the corpus (ties broken alphabetically) and numbers them in
/// alphabetical order. IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Learns a feature space from `texts`.
    ///
    /// # Errors
    /// `DataError` if `texts` is empty or contains no tokens at all.
    pub fn fit(&self, texts: &[&str], text_column: TextColumn) -> Result<FeatureSpace, ClassifierError> {
        if texts.is_empty() {
            return Err(ClassifierError::DataError("Cannot fit features on an empty corpus".into()));
        }

        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_counts: HashMap<String, usize> = HashMap::new();
        for text in texts {
            let mut seen = HashSet::new();
            for token in tokenize(text) {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.clone()) {
                    *doc_counts.entry(token).or_insert(0) += 1;
                }
            }
        }
        if term_counts.is_empty() {
            return Err(ClassifierError::DataError("Training corpus contains no tokens".into()));
        }

        let distinct_terms = term_counts.len();
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n_docs = texts.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = doc_counts.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = terms.into_iter().enumerate().map(|(i, term)| (term, i)).collect();

        let space = FeatureSpace { vocabulary, idf, text_column };
        info!(
            "Fitted TF-IDF vocabulary of {} terms ({} distinct) on {} documents",
            space.dim(),
            distinct_terms,
            texts.len()
        );
        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(texts: &[&str], max_features: usize) -> FeatureSpace {
        FeatureExtractor::new(FeatureConfig { max_features })
            .fit(texts, TextColumn::Cleaned)
            .unwrap()
    }

    #[test]
    fn test_vocabulary_is_alphabetical() {
        let space = fitted(&["reset password", "password login", "refund invoice"], 100);
        let terms: Vec<&str> = space.vocabulary().keys().map(String::as_str).collect();
        assert_eq!(terms, vec!["invoice", "login", "password", "refund", "reset"]);
        assert_eq!(space.vocabulary()["invoice"], 0);
        assert_eq!(space.vocabulary()["reset"], 4);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let space = fitted(&["error error crash", "error login", "crash bug"], 2);
        assert_eq!(space.dim(), 2);
        assert!(space.contains("error"));
        assert!(space.contains("crash"));
        assert!(!space.contains("bug"));
    }

    #[test]
    fn test_smoothed_idf() {
        let space = fitted(&["alpha beta", "alpha", "alpha gamma"], 10);
        assert!((space.idf("alpha").unwrap() - 1.0).abs() < 1e-12);
        let expected = (4.0f64 / 2.0).ln() + 1.0;
        assert!((space.idf("beta").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_unit_length() {
        let space = fitted(&["reset password", "password login", "refund invoice"], 100);
        let vector = space.transform("password password reset");
        assert_eq!(vector.nnz(), 2);
        assert!((vector.squared_norm() - 1.0).abs() < 1e-12);
        assert!(vector.get(space.vocabulary()["password"]) > vector.get(space.vocabulary()["reset"]));
    }

    #[test]
    fn test_out_of_vocabulary_is_zero() {
        let space = fitted(&["reset password", "refund invoice"], 100);
        let vector = space.transform("zebra quantum 12345 ü");
        assert_eq!(vector.dim(), space.dim());
        assert!(vector.is_zero());
        assert_eq!(vector.to_dense().sum(), 0.0);
        assert!(space.transform("").is_zero());
    }

    #[test]
    fn test_single_letter_tokens_ignored() {
        let space = fitted(&["a b c password"], 100);
        assert_eq!(space.dim(), 1);
    }

    #[test]
    fn test_fit_errors() {
        let extractor = FeatureExtractor::default();
        assert!(extractor.fit(&[], TextColumn::Cleaned).is_err());
        assert!(extractor.fit(&["", "x"], TextColumn::Cleaned).is_err());
    }
}
