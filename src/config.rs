//! Loading service configuration from TOML.
//!
//! Only file locations live here. Engine constants (tiers, offsets, limits)
//! are fixed in code: every client must compute the same day.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  /// JSON array of raw street records.
  pub catalog_path: String,
  /// Optional editorial plan file (`{ "quizzes": [...] }`).
  pub quiz_plan_path: Option<String>,
  /// Frontend bundle served as SPA fallback.
  pub static_dir: String,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      catalog_path: "./data/streets.json".into(),
      quiz_plan_path: None,
      static_dir: "./static".into(),
    }
  }
}

impl GameConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }
}

/// Load `GameConfig` from GAME_CONFIG_PATH. Unset, unreadable or invalid
/// files all yield the defaults.
pub fn load_game_config_from_env() -> GameConfig {
  let Ok(path) = std::env::var("GAME_CONFIG_PATH") else {
    return GameConfig::default();
  };
  match std::fs::read_to_string(&path) {
    Ok(s) => match GameConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "carrers_backend", %path, catalog = %cfg.catalog_path, "Loaded game config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "carrers_backend", %path, error = %e, "Failed to parse TOML config; using defaults");
        GameConfig::default()
      }
    },
    Err(e) => {
      error!(target: "carrers_backend", %path, error = %e, "Failed to read TOML config file; using defaults");
      GameConfig::default()
    }
  }
}
