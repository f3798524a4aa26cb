//! Formatting options, loadable from a `.imlformat.json` file

use serde::Deserialize;
use std::path::Path;
use tracing::warn;

pub const CONFIG_FILENAME: &str = ".imlformat.json";

/// Options controlling layout. Unknown keys in the config file are ignored;
/// absent keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Target line width handed to the renderer.
    pub width: usize,
    /// Whether definitions are terminated with `;;`.
    pub semicolons: Semicolons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semicolons {
    None,
    Required,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            width: 80,
            semicolons: Semicolons::None,
        }
    }
}

impl Options {
    /// Read options from `.imlformat.json` under the given directory. A
    /// missing file yields the defaults silently; an unreadable or invalid
    /// file yields the defaults with a warning.
    pub fn load(config_root: &Path) -> Options {
        let path = config_root.join(CONFIG_FILENAME);
        if !path.exists() {
            return Options::default();
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                warn!("unable to read {}: {}", path.display(), error);
                return Options::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(options) => options,
            Err(error) => {
                warn!("invalid options in {}: {}", path.display(), error);
                Options::default()
            }
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.width, 80);
        assert_eq!(options.semicolons, Semicolons::None);
    }

    #[test]
    fn parse_full_config() {
        let options: Options =
            serde_json::from_str(r#"{ "width": 100, "semicolons": "required" }"#).unwrap();
        assert_eq!(options.width, 100);
        assert_eq!(options.semicolons, Semicolons::Required);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let options: Options = serde_json::from_str(r#"{ "width": 72 }"#).unwrap();
        assert_eq!(options.width, 72);
        assert_eq!(options.semicolons, Semicolons::None);
    }
}
