use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{KasboekError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// Category whose inflow counts as monthly income.
    #[serde(default = "default_income_category")]
    pub income_category: String,
    /// Category whose outflow counts as savings, kept out of the spent total.
    #[serde(default = "default_savings_category")]
    pub savings_category: String,
}

fn default_user_name() -> String {
    "huishouden".to_string()
}

fn default_income_category() -> String {
    "Budget".to_string()
}

fn default_savings_category() -> String {
    "Sparen".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            user_name: default_user_name(),
            income_category: default_income_category(),
            savings_category: default_savings_category(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kasboek")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("kasboek")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| KasboekError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}
