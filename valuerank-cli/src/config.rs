/// Config file loading and creation for the valuerank CLI.
///
/// Config lives at ~/.config/valuerank/config.toml.
/// All fields are optional; CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use valuerank_core::{ScoringRule, Strategy};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ValuerankConfig {
    pub strategy: Option<String>,
    pub scoring: Option<String>,
    pub progress_file: Option<String>,
    pub seed: Option<u64>,
    pub skip_rating: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# valuerank configuration
# All values here can be overridden by CLI flags.

# Ranking strategy: \"pairwise\" (adaptive, 25-45 choices) or \"maxdiff\" (sets of five)
# strategy = \"pairwise\"

# Pairwise score update: \"tally\" (+1/-1) or \"elo\" (K = 32)
# scoring = \"tally\"

# Where to keep session progress so an interrupted session can be resumed.
# progress_file = \"~/.local/share/valuerank/progress.json\"

# Fixed random seed, for reproducible question order
# seed = 42

# Skip the 1-10 importance ratings after ranking
# skip_rating = false
";

/// Returns the default config path: ~/.config/valuerank/config.toml
pub fn config_path() -> PathBuf {
    home_dir().join(".config").join("valuerank").join("config.toml")
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home)
}

/// Expand a leading `~/` in a configured path.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

pub fn parse_config(content: &str) -> Result<ValuerankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> ValuerankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ValuerankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}

/// CLI flag wins, then the config file, then the default.
pub fn resolve_strategy(flag: Option<&str>, cfg: &ValuerankConfig) -> Result<Strategy, String> {
    match flag.or(cfg.strategy.as_deref()) {
        Some(value) => value.parse(),
        None => Ok(Strategy::default()),
    }
}

pub fn resolve_scoring(flag: Option<&str>, cfg: &ValuerankConfig) -> Result<ScoringRule, String> {
    match flag.or(cfg.scoring.as_deref()).map(str::to_ascii_lowercase).as_deref() {
        None | Some("tally") => Ok(ScoringRule::Tally),
        Some("elo") => Ok(ScoringRule::elo()),
        Some(other) => Err(format!("unknown scoring rule \"{other}\", use \"tally\" or \"elo\"")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        assert_eq!(parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap(), ValuerankConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let cfg = parse_config(
            "strategy = \"maxdiff\"\nscoring = \"elo\"\nprogress_file = \"/tmp/p.json\"\nseed = 9\nskip_rating = true\n",
        )
        .unwrap();
        assert_eq!(cfg.strategy.as_deref(), Some("maxdiff"));
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.skip_rating, Some(true));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_config("rounds = 10\n").is_err());
    }

    #[test]
    fn test_flag_overrides_config() {
        let cfg = ValuerankConfig {
            strategy: Some("maxdiff".to_string()),
            scoring: Some("elo".to_string()),
            ..ValuerankConfig::default()
        };
        assert_eq!(resolve_strategy(None, &cfg), Ok(Strategy::MaxDiff));
        assert_eq!(resolve_strategy(Some("pairwise"), &cfg), Ok(Strategy::Pairwise));
        assert_eq!(resolve_scoring(None, &cfg), Ok(ScoringRule::elo()));
        assert_eq!(resolve_scoring(Some("TALLY"), &cfg), Ok(ScoringRule::Tally));
        assert!(resolve_scoring(Some("glicko"), &cfg).is_err());
        assert_eq!(resolve_strategy(None, &ValuerankConfig::default()), Ok(Strategy::Pairwise));
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/tmp/p.json"), PathBuf::from("/var/tmp/p.json"));
    }
}
