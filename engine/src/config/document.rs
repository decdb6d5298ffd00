//! YAML/TOML document loading shared by config, secrets, and the master prompt

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Serialization format of a settings document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from the file extension. Anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }

    /// Deserialize `contents` in this format
    pub fn parse<T: DeserializeOwned>(&self, contents: &str) -> Result<T, String> {
        match self {
            DocumentFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

/// Read and deserialize a settings document
///
/// An empty YAML file deserializes as `null`, which is treated like an empty
/// mapping so that all-default documents load.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    let format = DocumentFormat::from_path(path);

    if format == DocumentFormat::Yaml && contents.trim().is_empty() {
        return format.parse("{}");
    }

    format.parse(&contents)
}
