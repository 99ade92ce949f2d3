//! Saved jobs: sheet settings plus the cut list, stored as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{
    DEFAULT_EDGE_TRIM, DEFAULT_KERF, DEFAULT_SHEET_LENGTH, DEFAULT_SHEET_WIDTH, PackSettings,
    SheetSpec,
};
use crate::error::JobError;
use crate::types::PieceRequirement;

fn default_length() -> f64 {
    DEFAULT_SHEET_LENGTH
}

fn default_width() -> f64 {
    DEFAULT_SHEET_WIDTH
}

fn default_trim() -> f64 {
    DEFAULT_EDGE_TRIM
}

fn default_kerf() -> f64 {
    DEFAULT_KERF
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub job_name: String,
    #[serde(default)]
    pub material: String,
    #[serde(rename = "slab_l", default = "default_length")]
    pub sheet_length: f64,
    #[serde(rename = "slab_w", default = "default_width")]
    pub sheet_width: f64,
    #[serde(default = "default_trim")]
    pub trim: f64,
    #[serde(default = "default_kerf")]
    pub kerf: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub settings: PackSettings,
    #[serde(default)]
    pub pieces: Vec<PieceRequirement>,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            job_name: String::new(),
            material: String::new(),
            sheet_length: DEFAULT_SHEET_LENGTH,
            sheet_width: DEFAULT_SHEET_WIDTH,
            trim: DEFAULT_EDGE_TRIM,
            kerf: DEFAULT_KERF,
            cost: 0.0,
            settings: PackSettings::default(),
            pieces: Vec::new(),
        }
    }
}

impl Job {
    pub fn sheet(&self) -> SheetSpec {
        SheetSpec::new(self.sheet_length, self.sheet_width)
            .with_trim(self.trim)
            .with_kerf(self.kerf)
            .with_cost(self.cost)
    }

    /// Suggested file name, spaces replaced the way saved jobs have always been named.
    pub fn file_name(&self) -> String {
        let stem = if self.job_name.is_empty() {
            "job"
        } else {
            self.job_name.as_str()
        };
        format!("{}.json", stem.replace(' ', "_"))
    }
}

pub fn load_job(path: impl AsRef<Path>) -> Result<Job, JobError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let job: Job = serde_json::from_str(&text)?;
    tracing::info!(
        path = %path.as_ref().display(),
        job = %job.job_name,
        pieces = job.pieces.len(),
        "loaded job"
    );
    Ok(job)
}

pub fn save_job(path: impl AsRef<Path>, job: &Job) -> Result<(), JobError> {
    let text = serde_json::to_string_pretty(job)?;
    std::fs::write(path.as_ref(), text)?;
    tracing::info!(path = %path.as_ref().display(), job = %job.job_name, "saved job");
    Ok(())
}
