//! Settings from the command line and the optional `fountain.toml`.
//!
//! Command line flags win over the config file, which wins over defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fountain_core::{game::Variant, layout::MapSize};
use log::LevelFilter;
use serde::Deserialize;

use crate::Args;

pub const DEFAULT_CONFIG_FILE: &str = "fountain.toml";
pub const DEFAULT_LOG_FILE: &str = "fountain.log";

/// Contents of the config file. Every key is optional.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub size: Option<MapSize>,
    pub classic: bool,
    pub plain: bool,
    pub map: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub size: Option<MapSize>,
    pub map: Option<PathBuf>,
    pub variant: Variant,
    pub plain: bool,
    pub log_level: Option<LevelFilter>,
    pub log_file: Option<PathBuf>,
}

/// Reads the config file.
///
/// An explicitly named file must exist. The default file is optional.
pub fn load(path: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    if !required && !path.exists() {
        return Ok(FileConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse(text: &str) -> Result<FileConfig> {
    Ok(toml::from_str(text)?)
}

impl Settings {
    pub fn merge(args: &Args, file: FileConfig) -> Result<Settings> {
        let log_level = args
            .log_level
            .clone()
            .or(file.log_level)
            .map(|level| {
                level
                    .parse::<LevelFilter>()
                    .with_context(|| format!("Unknown log level '{level}'"))
            })
            .transpose()?;

        let classic = args.classic || file.classic;
        Ok(Settings {
            size: args.size.or(file.size),
            map: args.map.clone().or(file.map),
            variant: if classic {
                Variant::Classic
            } else {
                Variant::Pits
            },
            plain: args.plain || file.plain,
            log_level,
            log_file: args.log_file.clone().or(file.log_file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("fountain").chain(argv.iter().copied()))
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), FileConfig::default());
        let settings = Settings::merge(&args(&[]), FileConfig::default()).unwrap();
        assert_eq!(settings.size, None);
        assert_eq!(settings.variant, Variant::Pits);
        assert!(!settings.plain);
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn parses_all_keys() {
        let config = parse(
            r#"
            size = "medium"
            classic = true
            plain = true
            map = "maps/tiny.txt"
            log_level = "debug"
            log_file = "game.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.size, Some(MapSize::Medium));
        assert!(config.classic);
        assert!(config.plain);
        assert_eq!(config.map, Some(PathBuf::from("maps/tiny.txt")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file, Some(PathBuf::from("game.log")));
    }

    #[test]
    fn rejects_unknown_keys_and_sizes() {
        assert!(parse("speed = 3").is_err());
        assert!(parse(r#"size = "enormous""#).is_err());
    }

    #[test]
    fn command_line_overrides_file() {
        let file = parse(
            r#"
            size = "small"
            log_level = "info"
            "#,
        )
        .unwrap();
        let settings = Settings::merge(
            &args(&["--size", "large", "--classic", "--log-level", "trace"]),
            file,
        )
        .unwrap();
        assert_eq!(settings.size, Some(MapSize::Large));
        assert_eq!(settings.variant, Variant::Classic);
        assert_eq!(settings.log_level, Some(LevelFilter::Trace));
    }

    #[test]
    fn file_fills_in_missing_flags() {
        let file = parse(r#"size = "small""#).unwrap();
        let settings = Settings::merge(&args(&["--plain"]), file).unwrap();
        assert_eq!(settings.size, Some(MapSize::Small));
        assert!(settings.plain);
    }

    #[test]
    fn bad_log_level_is_an_error() {
        let result = Settings::merge(&args(&["--log-level", "loud"]), FileConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn named_config_file_must_exist() {
        assert!(load(Some(Path::new("definitely/not/here.toml"))).is_err());
    }
}
