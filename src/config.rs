//! Labeller configuration.
//!
//! Loaded from `--config <path>` or `~/.labeller/config.toml`. Every key is
//! optional; a missing default file means default settings.
//!
//! ```toml
//! operator = "ana"
//! operator-column = "user_name"
//! image-column = "filename"
//! timestamp-column = "labelled_at"
//! formats = ["png", "jpeg"]
//! recursive = false
//! color = true
//! viewer = ["feh", "--auto-zoom"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use serde::Deserialize;

use crate::interview::Columns;

/// Labeller configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Operator name, used when neither `--operator` nor `LABELLER_OPERATOR` is set.
    pub operator: Option<String>,

    pub operator_column: String,
    pub image_column: String,

    /// When set, each record gets the time it was completed in this column.
    pub timestamp_column: Option<String>,

    /// Image formats to annotate, by extension name (`png`, `jpeg`, `webp`, ...).
    pub formats: Vec<String>,

    /// Walk subdirectories of the images directory.
    pub recursive: bool,

    pub color: bool,

    /// Viewer command; the image path is appended as the last argument.
    pub viewer: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator: None,
            operator_column: "user_name".to_string(),
            image_column: "filename".to_string(),
            timestamp_column: None,
            formats: vec!["png".to_string()],
            recursive: false,
            color: true,
            viewer: None,
        }
    }
}

impl Config {
    /// Load config from `explicit` if given, otherwise from the default path.
    ///
    /// An explicit path must exist. The default path may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(format!("no config file found at {}", path.display()));
                }
                path.to_path_buf()
            }
            None => match Self::path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let config = Self::parse(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a TOML config document.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;

        if config.operator_column.is_empty() || config.image_column.is_empty() {
            return Err("operator-column and image-column must not be empty".to_string());
        }
        if config.operator_column == config.image_column {
            return Err("operator-column and image-column must differ".to_string());
        }
        if let Some(ts) = &config.timestamp_column {
            if ts.is_empty() {
                return Err("timestamp-column must not be empty".to_string());
            }
            if *ts == config.operator_column || *ts == config.image_column {
                return Err(format!(
                    "timestamp-column '{ts}' must differ from operator-column and image-column"
                ));
            }
        }
        config.image_formats()?;

        Ok(config)
    }

    /// The config file path: `~/.labeller/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".labeller").join("config.toml"))
    }

    /// The configured formats, resolved.
    pub fn image_formats(&self) -> Result<Vec<ImageFormat>, String> {
        if self.formats.is_empty() {
            return Err("formats must name at least one image format".to_string());
        }
        self.formats
            .iter()
            .map(|name| {
                ImageFormat::from_extension(name)
                    .ok_or_else(|| format!("unknown image format '{name}'"))
            })
            .collect()
    }

    pub fn columns(&self) -> Columns {
        Columns {
            operator: self.operator_column.clone(),
            image: self.image_column.clone(),
        }
    }

    /// Column names the schema must not use for labels.
    pub fn reserved_columns(&self) -> Vec<&str> {
        let mut reserved = vec![self.operator_column.as_str(), self.image_column.as_str()];
        if let Some(ts) = &self.timestamp_column {
            reserved.push(ts);
        }
        reserved
    }
}
