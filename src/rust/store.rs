use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::artifact::ModelArtifact;
use crate::error::ClassifierError;

/// Environment variable overriding the default data directory.
pub const HOME_ENV: &str = "TICKET_CLASSIFIER_HOME";

/// File layout shared by the curation, training and serving stages.
///
/// ```text
/// <root>/data/all_tickets.csv       raw tickets
/// <root>/data/sample_tickets.csv    curated training sample
/// <root>/models/ticket_classifier.bin
/// ```
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at the default data directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_root())
    }

    /// Resolves the data directory: `$TICKET_CLASSIFIER_HOME`, then the
    /// platform data dir, then `~/.local/share`, then the temp dir.
    pub fn get_default_root() -> PathBuf {
        if let Ok(path) = env::var(HOME_ENV) {
            return PathBuf::from(path);
        }
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("ticket-classifier");
        }
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("ticket-classifier");
        }
        env::temp_dir().join("ticket-classifier")
    }

    pub fn new<P: AsRef<Path>>(root: P) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("data"))?;
        fs::create_dir_all(root.join("models"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_tickets_path(&self) -> PathBuf {
        self.root.join("data").join("all_tickets.csv")
    }

    pub fn sample_path(&self) -> PathBuf {
        self.root.join("data").join("sample_tickets.csv")
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.root.join("models").join("ticket_classifier.bin")
    }

    pub fn has_artifact(&self) -> bool {
        let path = self.artifact_path();
        log::debug!("Checking for model artifact at {:?} (exists: {})", path, path.exists());
        path.exists()
    }

    pub fn save_artifact(&self, artifact: &ModelArtifact) -> Result<PathBuf, ClassifierError> {
        let path = self.artifact_path();
        artifact.save(&path)?;
        Ok(path)
    }

    pub fn load_artifact(&self) -> Result<ModelArtifact, ClassifierError> {
        ModelArtifact::load(&self.artifact_path())
    }

    pub fn verify_artifact(&self) -> Result<bool, ClassifierError> {
        ModelArtifact::verify(&self.artifact_path())
    }

    pub fn remove_artifact(&self) -> Result<(), ClassifierError> {
        let path = self.artifact_path();
        if path.exists() {
            log::info!("Removing model artifact {:?}", path);
            fs::remove_file(&path).map_err(|e| ClassifierError::artifact("Failed to remove artifact", e))?;
        }
        Ok(())
    }
}
