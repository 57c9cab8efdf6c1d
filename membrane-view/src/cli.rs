//! Command-line arguments and configuration loading.

use std::path::{Path, PathBuf};

use clap::Parser;
use membrane_core::{Config, Primitive, SimError};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(version, about = "Expanding closed-path membrane viewer", long_about = None)]
pub struct Args {
    /// JSON file overriding the default simulation constants.
    #[arg(short('c'), long)]
    pub config: Option<PathBuf>,

    /// Shape the path starts from.
    #[arg(short('p'), long, default_value = "circle")]
    pub primitive: Primitive,

    /// Initial window width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 720.0)]
    pub height: f32,

    /// Directory exported frames are written to.
    #[arg(short('o'), long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Log at debug level instead of info.
    #[arg(short('v'), long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] SimError),
}

/// Everything the viewer needs to start a simulation.
#[derive(Clone, Debug)]
pub struct Settings {
    pub cfg: Config,
    pub primitive: Primitive,
    pub width: f32,
    pub height: f32,
    pub out_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cfg: Config::default(),
            primitive: Primitive::Circle,
            width: 1280.0,
            height: 720.0,
            out_dir: PathBuf::from("."),
        }
    }
}

impl Args {
    /// Resolves the arguments into [`Settings`], reading the config file
    /// if one was given.
    ///
    /// ### Errors
    /// See [`load_config`].
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        Ok(Settings {
            cfg,
            primitive: self.primitive,
            width: self.width,
            height: self.height,
            out_dir: self.out_dir,
        })
    }
}

/// Reads and validates a JSON [`Config`]. Missing keys keep their
/// defaults.
///
/// ### Errors
/// - If the file cannot be read.
/// - If it is not valid JSON for [`Config`].
/// - If the resulting constants fail [`Config::validate`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use membrane_core::Sweep;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("membrane-view-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_arguments() {
        let args = Args::try_parse_from(["membrane-view"]).unwrap();
        let settings = args.into_settings().unwrap();

        assert_eq!(settings.primitive, Primitive::Circle);
        assert_eq!(settings.width, 1280.0);
        assert_eq!(settings.height, 720.0);
        assert_eq!(settings.cfg, Config::default());
    }

    #[test]
    fn unknown_primitive_is_rejected_by_the_parser() {
        let res = Args::try_parse_from(["membrane-view", "--primitive", "star"]);
        assert!(res.is_err());
    }

    #[test]
    fn config_file_overrides_some_fields() {
        let path = temp_file("ok.json", r#"{ "dist_break": 80.0, "sweep": "interleaved" }"#);

        let cfg = load_config(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.dist_break, 80.0);
        assert_eq!(cfg.sweep, Sweep::Interleaved);
        assert_eq!(cfg.radius, 100.0);
    }

    #[test]
    fn invalid_config_values_are_reported() {
        let path = temp_file("bad.json", r#"{ "vertex_count": 1 }"#);

        let err = load_config(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            err,
            ConfigError::Invalid(SimError::InsufficientVertices { count: 1 })
        ));
    }

    #[test]
    fn malformed_json_and_missing_files_are_errors() {
        let path = temp_file("broken.json", "{ not json");
        let err = load_config(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Json { .. }));

        let missing = std::env::temp_dir().join("membrane-view-does-not-exist.json");
        assert!(matches!(load_config(&missing), Err(ConfigError::Io { .. })));
    }
}
