use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Weight contributed once when any of the group's terms appears in a title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordWeight {
    pub terms: Vec<String>,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringConfig {
    pub keyword_weights: Vec<KeywordWeight>,
    /// Width is divided by this before capping, so 800px of width buys one point.
    pub resolution_divisor: u32,
    pub resolution_bonus_cap: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keyword_weights: vec![
                KeywordWeight {
                    terms: vec!["dule hill".into()],
                    weight: 5,
                },
                KeywordWeight {
                    terms: vec!["burton guster".into(), "gus".into(), "guster".into()],
                    weight: 4,
                },
                KeywordWeight {
                    terms: vec!["james roday".into(), "shawn".into()],
                    weight: 2,
                },
                KeywordWeight {
                    terms: vec!["psych".into()],
                    weight: 2,
                },
                KeywordWeight {
                    terms: vec!["portrait".into(), "headshot".into(), "still".into()],
                    weight: 2,
                },
            ],
            resolution_divisor: 800,
            resolution_bonus_cap: 5,
        }
    }
}

/// Media metadata thresholds. Absent in config means the gate is disabled and
/// title filtering alone decides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QualityGate {
    pub allowed_mime: Vec<String>,
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            allowed_mime: vec![
                "image/jpeg".into(),
                "image/jpg".into(),
                "image/png".into(),
                "image/webp".into(),
            ],
            min_width: 1200,
            min_height: 800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Substring matches, lower-cased. A title must hit at least one.
    pub required_terms: Vec<String>,
    /// Substring matches as well, so "cast" also blocks "broadcast".
    pub blocked_terms: Vec<String>,
    pub quality: Option<QualityGate>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            required_terms: vec![
                "dule".into(),
                "hill".into(),
                "gus".into(),
                "guster".into(),
                "shawn".into(),
                "james".into(),
                "roday".into(),
                "psych".into(),
            ],
            blocked_terms: vec![
                "comic-con".into(),
                "comic con".into(),
                "panel".into(),
                "cast".into(),
                "group".into(),
                "reunion".into(),
                "press line".into(),
                "red carpet".into(),
            ],
            quality: Some(QualityGate::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub search_queries: Vec<String>,
    /// Results requested per query from the API.
    pub query_limit: u32,
    /// Upper bound on the curated pool.
    pub pool_limit: usize,
    pub fetch_timeout_secs: u64,
    pub max_recent: usize,
    pub image_list_path: PathBuf,
    pub nickname_list_path: PathBuf,
    pub filter: FilterConfig,
    pub scoring: ScoringConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 5000,
            search_queries: vec![
                "\"Dule Hill\" portrait".into(),
                "\"Dule Hill\" Psych".into(),
                "\"Dule Hill\" \"James Roday\"".into(),
                "\"Burton Guster\" Psych".into(),
            ],
            query_limit: 50,
            pool_limit: 48,
            fetch_timeout_secs: 5,
            max_recent: 10,
            image_list_path: PathBuf::from("data/image_urls.txt"),
            nickname_list_path: PathBuf::from("data/nicknames.txt"),
            filter: FilterConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Returns the project directories for this application.
/// Centralized to ensure consistent paths across all modules.
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "guster-web", "guster-web")
        .context("Could not determine project directories")
}

pub fn config_path() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;
    let config_dir = proj_dirs.config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }
    Ok(config_dir.join("config.json"))
}

/// Load application configuration from disk, falling back to defaults when no
/// config file exists yet.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;
    serde_json::from_str(&content).context("Failed to parse config file")
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let path = config_path()?;
    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, content).context("Failed to write config file")?;
    Ok(())
}
