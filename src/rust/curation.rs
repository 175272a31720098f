use std::collections::BTreeMap;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::config::{CurationConfig, TextColumn};
use crate::error::ClassifierError;
use crate::text::{TextNormalizer, WeakLabeler};

/// A raw support ticket. Only the body is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub body: String,
}

impl Ticket {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// A ticket with its cleaned text and weak label. Serializes to the curated
/// CSV layout (`body`, `cleaned_description`, `category`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledTicket {
    #[serde(rename = "body")]
    pub raw_text: String,
    #[serde(rename = "cleaned_description")]
    pub cleaned_text: String,
    pub category: Category,
}

impl LabeledTicket {
    pub fn text(&self, column: TextColumn) -> &str {
        match column {
            TextColumn::Raw => &self.raw_text,
            TextColumn::Cleaned => &self.cleaned_text,
        }
    }
}

/// An ordered, immutable set of labeled tickets restricted to the three target
/// categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSample {
    records: Vec<LabeledTicket>,
}

/// The two disjoint halves of a stratified split.
#[derive(Debug, Clone)]
pub struct SampleSplit<'a> {
    pub train: Vec<&'a LabeledTicket>,
    pub test: Vec<&'a LabeledTicket>,
}

impl TrainingSample {
    /// Wraps already-labeled records, e.g. a sample read back from disk.
    ///
    /// # Errors
    /// `DataError` if the records are empty or any record is labeled `Other`.
    /// An unbalanced sample is accepted with a warning.
    pub fn from_records(records: Vec<LabeledTicket>) -> Result<Self, ClassifierError> {
        if records.is_empty() {
            return Err(ClassifierError::DataError("Training sample is empty".into()));
        }
        if let Some(pos) = records.iter().position(|r| !r.category.is_target()) {
            return Err(ClassifierError::DataError(format!(
                "Record {} has category '{}', expected one of Login, Billing, Technical",
                pos + 1,
                records[pos].category
            )));
        }
        let sample = Self { records };
        let counts = sample.category_counts();
        let distinct: std::collections::BTreeSet<_> = counts.values().collect();
        if counts.len() != Category::TARGETS.len() || distinct.len() > 1 {
            warn!("Training sample is not class-balanced: {:?}", counts);
        }
        Ok(sample)
    }

    pub fn records(&self) -> &[LabeledTicket] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.category).or_insert(0) += 1;
        }
        counts
    }

    /// Splits the sample into train and test halves, stratified by category.
    ///
    /// Every category is shuffled with a generator seeded from `seed`, then
    /// `max(1, round(count * test_fraction))` of its records are held out. Both
    /// halves keep the category order Login, Billing, Technical.
    ///
    /// # Errors
    /// `DataError` if `test_fraction` is outside `(0, 1)` or a category has
    /// fewer than two records.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> Result<SampleSplit<'_>, ClassifierError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(ClassifierError::DataError(format!(
                "test_fraction must be strictly between 0 and 1, got {}",
                test_fraction
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut train = Vec::new();
        let mut test = Vec::new();

        for category in Category::TARGETS {
            let mut members: Vec<&LabeledTicket> =
                self.records.iter().filter(|r| r.category == category).collect();
            if members.len() < 2 {
                return Err(ClassifierError::DataError(format!(
                    "Category '{}' has {} record(s); at least 2 are needed to hold out a test split",
                    category,
                    members.len()
                )));
            }
            members.shuffle(&mut rng);
            let held_out = ((members.len() as f64 * test_fraction).round() as usize)
                .clamp(1, members.len() - 1);
            let kept = members.split_off(held_out);
            test.extend(members);
            train.extend(kept);
        }

        Ok(SampleSplit { train, test })
    }
}

/// Produces a class-balanced, bounded training sample from raw tickets.
///
/// ```
/// use ticket_classifier::{DatasetCurator, Ticket};
///
/// let tickets = vec![
///     Ticket::new("Forgot my password"),
///     Ticket::new("Reset my account password"),
///     Ticket::new("Refund my payment"),
///     Ticket::new("Wrong invoice amount"),
///     Ticket::new("App crash on start"),
///     Ticket::new("Network error"),
///     Ticket::new("Hello there"),
/// ];
/// let sample = DatasetCurator::english().curate(&tickets, 500, 42)?;
/// assert_eq!(sample.len(), 6);
/// # Ok::<(), ticket_classifier::ClassifierError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatasetCurator {
    normalizer: TextNormalizer,
    labeler: WeakLabeler,
}

impl DatasetCurator {
    pub fn new(normalizer: TextNormalizer, labeler: WeakLabeler) -> Self {
        Self { normalizer, labeler }
    }

    pub fn english() -> Self {
        Self::new(TextNormalizer::english(), WeakLabeler::english())
    }

    /// Normalizes and weak-labels every ticket, `Other` included.
    pub fn label_tickets(&self, tickets: &[Ticket]) -> Vec<LabeledTicket> {
        tickets
            .iter()
            .map(|ticket| LabeledTicket {
                raw_text: ticket.body.clone(),
                cleaned_text: self.normalizer.normalize(&ticket.body),
                category: self.labeler.label(&ticket.body),
            })
            .collect()
    }

    pub fn curate_with(&self, tickets: &[Ticket], config: &CurationConfig) -> Result<TrainingSample, ClassifierError> {
        self.curate(tickets, config.max_sample_size, config.seed)
    }

    /// Labels, filters, balances and samples `tickets`.
    ///
    /// Each category is downsampled to `min(m, max_sample_size / 3)` records,
    /// where `m` is the size of the smallest category, using a generator seeded
    /// once from `seed`; the result is then shuffled with the same generator.
    /// The same input and seed always produce the same sample.
    ///
    /// # Errors
    /// `DataError` if any target category has no tickets, or if
    /// `max_sample_size` is below three.
    pub fn curate(&self, tickets: &[Ticket], max_sample_size: usize, seed: u64) -> Result<TrainingSample, ClassifierError> {
        let labeled = self.label_tickets(tickets);

        let mut groups: Vec<(Category, Vec<LabeledTicket>)> =
            Category::TARGETS.iter().map(|&category| (category, Vec::new())).collect();
        let mut discarded = 0usize;
        for ticket in labeled {
            match groups.iter_mut().find(|(category, _)| *category == ticket.category) {
                Some((_, members)) => members.push(ticket),
                None => discarded += 1,
            }
        }

        for (category, members) in &groups {
            info!("Labeled {} tickets as {}", members.len(), category);
        }
        info!("Discarded {} tickets labeled Other", discarded);

        let empty: Vec<String> = groups
            .iter()
            .filter(|(_, members)| members.is_empty())
            .map(|(category, _)| category.to_string())
            .collect();
        if !empty.is_empty() {
            return Err(ClassifierError::DataError(format!(
                "No tickets labeled {}; cannot balance categories",
                empty.join(", ")
            )));
        }

        let minority = groups.iter().map(|(_, members)| members.len()).min().unwrap_or(0);
        let quota = minority.min(max_sample_size / Category::TARGETS.len());
        if quota == 0 {
            return Err(ClassifierError::DataError(format!(
                "max_sample_size must be at least {} to keep every category, got {}",
                Category::TARGETS.len(),
                max_sample_size
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut records = Vec::with_capacity(quota * groups.len());
        for (_, members) in &groups {
            records.extend(members.choose_multiple(&mut rng, quota).cloned());
        }
        records.shuffle(&mut rng);

        info!(
            "Curated {} tickets ({} per category, minority class size {})",
            records.len(),
            quota,
            minority
        );
        TrainingSample::from_records(records)
    }
}
