use clap::ValueEnum;
use drawodds_core::{CategoryBound, Combo, Item, MAX_COMBOS, MAX_DECK_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";
const DEFAULT_LOG_DIRECTORY: &str = "out/{run_id}";

/// Scenario definition loaded from YAML: a deck, a hand size and the requirements
/// to evaluate against it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub run_id: String,
    pub hand_size: u32,
    #[serde(default)]
    pub mode: Option<Mode>,
    pub deck: Vec<DeckEntryConfig>,
    #[serde(default)]
    pub categories: Vec<BoundConfig>,
    #[serde(default)]
    pub combos: Vec<ComboConfig>,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl ScenarioConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ScenarioConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate and normalise the scenario without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_deck(&mut self.deck)?;
        validate_bounds("categories", &mut self.categories)?;
        validate_combos(&mut self.combos)?;
        self.logging.normalize();

        if self.mode() == Mode::Combos && self.combos.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "combos".to_string(),
                message: "combos mode requires at least one combo".to_string(),
            });
        }
        Ok(())
    }

    /// Explicit mode, or combos whenever any combo is defined.
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(if self.combos.is_empty() {
            Mode::Range
        } else {
            Mode::Combos
        })
    }

    pub fn items(&self) -> Vec<Item> {
        self.deck.iter().map(DeckEntryConfig::to_item).collect()
    }

    pub fn bounds(&self) -> Vec<CategoryBound> {
        self.categories.iter().map(BoundConfig::to_bound).collect()
    }

    pub fn combo_list(&self) -> Vec<Combo> {
        self.combos.iter().map(ComboConfig::to_combo).collect()
    }

    /// Resolve `{run_id}` templates into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            report_json: self
                .outputs
                .report_json
                .as_deref()
                .map(|template| resolve_template(&self.run_id, template)),
            log_dir: resolve_template(&self.run_id, &self.logging.directory),
        }
    }
}

/// Which entry point of the engine a scenario runs.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Range,
    Combos,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Range => "range",
            Mode::Combos => "combos",
        }
    }
}

/// One deck row: a number of identical copies and their category tags.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeckEntryConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub copies: u32,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl DeckEntryConfig {
    /// Name used in messages; unnamed rows fall back to their position.
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("'{name}'"),
            _ => format!("entry {index}"),
        }
    }

    pub fn to_item(&self) -> Item {
        Item::new(self.copies, self.categories.iter().cloned())
    }
}

/// Bound as written in a scenario.
///
/// Omitting `max` means "at least `min`". Omitting `strict` keeps the classic
/// reading where a maximum of zero excludes the category and any other maximum
/// only caps the count.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BoundConfig {
    pub name: String,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub strict: Option<bool>,
}

impl BoundConfig {
    pub fn to_bound(&self) -> CategoryBound {
        match (self.max, self.strict) {
            (None, _) => CategoryBound::at_least(self.name.clone(), self.min),
            (Some(max), None) => CategoryBound::new(self.name.clone(), self.min, max),
            (Some(max), Some(strict)) => {
                CategoryBound::from_parts(self.name.clone(), self.min, max, strict)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ComboConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub bounds: Vec<BoundConfig>,
}

impl ComboConfig {
    pub fn to_combo(&self) -> Combo {
        Combo::new(self.bounds.iter().map(BoundConfig::to_bound).collect())
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputsConfig {
    #[serde(default)]
    pub report_json: Option<String>,
}

/// Logging configuration defaults to human-readable stderr output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            directory: default_log_directory(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.directory.trim().is_empty() {
            self.directory = default_log_directory();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    DEFAULT_LOG_DIRECTORY.to_string()
}

/// Caller-side limits; the engine itself never times out.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Cancel the calculation after this many milliseconds; 0 disables the watchdog.
    #[serde(default)]
    pub timeout_ms: u64,
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_deck(deck: &mut [DeckEntryConfig]) -> Result<(), ValidationError> {
    if deck.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "deck".to_string(),
            message: "deck must contain at least one entry".to_string(),
        });
    }

    let mut cards = 0u64;
    for (index, entry) in deck.iter_mut().enumerate() {
        if entry.copies == 0 {
            return Err(ValidationError::InvalidField {
                field: format!("deck[{index}].copies"),
                message: format!("{} must have at least one copy", entry.label(index)),
            });
        }
        cards += u64::from(entry.copies);

        for tag in entry.categories.iter_mut() {
            *tag = tag.trim().to_string();
            if tag.is_empty() {
                return Err(ValidationError::InvalidField {
                    field: format!("deck[{index}].categories"),
                    message: format!("{} has an empty category tag", entry.label(index)),
                });
            }
        }
    }

    if cards > MAX_DECK_SIZE {
        return Err(ValidationError::InvalidField {
            field: "deck".to_string(),
            message: format!("{cards} cards exceed the limit of {MAX_DECK_SIZE}"),
        });
    }

    Ok(())
}

fn validate_bounds(field: &str, bounds: &mut [BoundConfig]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for bound in bounds.iter_mut() {
        bound.name = bound.name.trim().to_string();
        if bound.name.is_empty() {
            return Err(ValidationError::InvalidField {
                field: field.to_string(),
                message: "category name must not be empty".to_string(),
            });
        }

        if !seen.insert(bound.name.to_lowercase()) {
            return Err(ValidationError::DuplicateCategory {
                field: field.to_string(),
                name: bound.name.clone(),
            });
        }

        match bound.max {
            Some(max) if bound.min > max => {
                return Err(ValidationError::InvalidField {
                    field: format!("{field}.{}", bound.name),
                    message: format!("min {} exceeds max {max}", bound.min),
                });
            }
            None if bound.strict == Some(true) => {
                return Err(ValidationError::InvalidField {
                    field: format!("{field}.{}", bound.name),
                    message: "strict bounds need an explicit max".to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

fn validate_combos(combos: &mut [ComboConfig]) -> Result<(), ValidationError> {
    if combos.len() > MAX_COMBOS {
        return Err(ValidationError::InvalidField {
            field: "combos".to_string(),
            message: format!(
                "{} combos defined; at most {MAX_COMBOS} can be combined",
                combos.len()
            ),
        });
    }

    for (index, combo) in combos.iter_mut().enumerate() {
        if combo.bounds.is_empty() {
            return Err(ValidationError::InvalidField {
                field: format!("combos[{index}].bounds"),
                message: "combo must list at least one category".to_string(),
            });
        }
        validate_bounds(&format!("combos[{index}].bounds"), &mut combo.bounds)?;
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub report_json: Option<PathBuf>,
    pub log_dir: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
    #[error("{field}: category '{name}' is listed more than once")]
    DuplicateCategory { field: String, name: String },
}
