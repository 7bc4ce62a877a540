use crate::loader::DEFAULT_EXTENSIONS;
use crate::tools::DEFAULT_READER_PREFIX;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration; every field has a default
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where archives are downloaded and extracted
    pub data_dir: PathBuf,
    pub archive_url: String,
    pub archive_file: String,
    /// Top-level directory the archive extracts to
    pub extracted_dir: String,
    pub extensions: Vec<String>,
    pub text_fields: Vec<String>,
    pub keyword_fields: Vec<String>,
    pub num_results: usize,
    pub reader_prefix: String,
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            archive_url: "https://github.com/jlowin/fastmcp/archive/refs/heads/main.zip".to_string(),
            archive_file: "fastmcp.zip".to_string(),
            extracted_dir: "fastmcp-main".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            text_fields: vec!["content".to_string(), "filename".to_string()],
            keyword_fields: Vec::new(),
            num_results: 5,
            reader_prefix: DEFAULT_READER_PREFIX.to_string(),
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("Failed to parse config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}
