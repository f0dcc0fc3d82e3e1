use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::api::{Successor, Successors};
use basketrules_mining::rule_generator::{
    RuleGeneratorConfig, DEFAULT_MIN_RULE_CONFIDENCE, DEFAULT_MIN_SAMPLE_SIZE,
};

const CONFIG_FILE_NAME: &str = "basketrules";
const CONFIG_FILE_ENV: &str = "BASKETRULES_CONFIG";
const ENV_PREFIX: &str = "BASKETRULES";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Tunables and file locations of a mining run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum support as a percentage of all transactions
    pub min_support_percent: f64,
    pub min_rule_confidence: f64,
    /// Rules backed by this many transactions or fewer are discarded
    pub min_sample_size: usize,
    pub transactions_path: PathBuf,
    pub rules_report_path: PathBuf,
    pub recommendations_report_path: PathBuf,
    /// Product succession chain offered to customers no rule matches
    pub successors: Vec<Successor>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_support_percent: 0.0,
            min_rule_confidence: DEFAULT_MIN_RULE_CONFIDENCE,
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
            transactions_path: PathBuf::from("transactions.txt"),
            rules_report_path: PathBuf::from("rules.txt"),
            recommendations_report_path: PathBuf::from("recommendations.txt"),
            successors: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings from the optional `basketrules.*` file (or the file named by
    /// `BASKETRULES_CONFIG`) and `BASKETRULES_*` environment variables
    pub fn load() -> Result<Self, SettingsError> {
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        Self::load_from(config_file.as_deref())
    }

    pub fn load_from(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let file_source = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE_NAME).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        tracing::info!("Loaded settings {:?}", settings);
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=100.0).contains(&self.min_support_percent) {
            return Err(SettingsError::Invalid {
                name: "min_support_percent",
                reason: format!("{} is outside of [0, 100]", self.min_support_percent),
            });
        }
        if !(0.0..=1.0).contains(&self.min_rule_confidence) {
            return Err(SettingsError::Invalid {
                name: "min_rule_confidence",
                reason: format!("{} is outside of [0, 1]", self.min_rule_confidence),
            });
        }
        if let Some(successor) = self
            .successors
            .iter()
            .find(|successor| successor.item == successor.next)
        {
            return Err(SettingsError::Invalid {
                name: "successors",
                reason: format!("{} is its own successor", successor.item),
            });
        }
        Ok(())
    }

    /// Successor of each item, a later entry for the same item replaces an earlier one
    pub fn successor_map(&self) -> Successors {
        self.successors
            .iter()
            .map(|successor| (successor.item.clone(), successor.next.clone()))
            .collect()
    }

    pub fn rule_generator_config(&self) -> RuleGeneratorConfig {
        RuleGeneratorConfig {
            min_rule_confidence: self.min_rule_confidence,
            min_sample_size: self.min_sample_size,
        }
    }
}
