use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use drawodds_core::model::bound::describe_bounds;
use serde::Serialize;
use thiserror::Error;

use crate::config::{Mode, ScenarioConfig};
use crate::runner::Outcome;

/// Result of one scenario run, printable as text or JSON.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Report {
    pub run_id: String,
    pub mode: Mode,
    pub hand_size: u32,
    pub deck_size: u64,
    pub probability: Option<f64>,
    pub percent: Option<String>,
    pub cancelled: bool,
    pub requirements: Vec<String>,
    pub elapsed_ms: u64,
}

impl Report {
    pub fn new(config: &ScenarioConfig, mode: Mode, outcome: Outcome, elapsed_ms: u64) -> Self {
        let requirements = match mode {
            Mode::Range => vec![describe_bounds(&config.bounds())],
            Mode::Combos => config
                .combos
                .iter()
                .zip(config.combo_list())
                .map(|(entry, combo)| match entry.name.as_deref() {
                    Some(name) => format!("{name}: {combo}"),
                    None => combo.to_string(),
                })
                .collect(),
        };
        let (probability, cancelled) = match outcome {
            Outcome::Probability(p) => (Some(p), false),
            Outcome::Cancelled => (None, true),
        };

        Self {
            run_id: config.run_id.clone(),
            mode,
            hand_size: config.hand_size,
            deck_size: drawodds_core::model::item::deck_size(&config.items()),
            probability,
            percent: probability.map(format_percent),
            cancelled,
            requirements,
            elapsed_ms,
        }
    }

    /// One-line result in the form `Probability: 83.33%`.
    pub fn result_text(&self) -> String {
        match &self.percent {
            Some(percent) => format!("Probability: {percent}"),
            None => "Calculation cancelled".to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                context: "creating report directory",
                source,
            })?;
        }
        let file = File::create(path).map_err(|source| ReportError::Io {
            context: "creating report file",
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode report JSON: {0}")]
    Json(#[from] serde_json::Error),
}
