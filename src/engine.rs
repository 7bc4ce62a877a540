use crate::config::Config;
use crate::fetcher::ArchiveFetcher;
use crate::index::Index;
use crate::loader::load_documents;
use anyhow::{Context, Result};
use std::path::Path;

/// Load and index every matching file under `root`
pub fn index_directory(root: &Path, config: &Config) -> Result<Index> {
    let documents = load_documents(root, config.extensions.as_slice())
        .with_context(|| format!("Failed to load documents from {}", root.display()))?;

    let mut index = Index::new(config.text_fields.clone(), Some(config.keyword_fields.clone()));
    index.fit(documents).context("Failed to fit index")?;
    Ok(index)
}

/// Fetch the configured archive (if needed) and index its contents
pub async fn build_index(config: &Config) -> Result<Index> {
    let fetcher = ArchiveFetcher::new(
        &config.data_dir,
        config.archive_file.clone(),
        config.extracted_dir.clone(),
    );
    let root = fetcher
        .fetch(&config.archive_url)
        .await
        .with_context(|| format!("Failed to fetch {}", config.archive_url))?;

    index_directory(&root, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SearchOptions;
    use std::fs;

    #[test]
    fn test_index_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("docs"))?;
        fs::write(dir.path().join("docs/demo.md"), "Run the demo server locally")?;
        fs::write(dir.path().join("docs/auth.md"), "Authentication with tokens")?;

        let index = index_directory(dir.path(), &Config::default())?;
        let hits = index.search("demo", &SearchOptions::with_limit(5))?;

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("filename"), Some("docs/demo.md"));
        Ok(())
    }

    #[tokio::test]
    async fn test_build_index_from_extracted_tree() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join("fastmcp-main");
        fs::create_dir_all(&root)?;
        fs::write(root.join("README.md"), "FastMCP demo")?;

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            archive_url: "http://127.0.0.1:9/never.zip".to_string(),
            ..Config::default()
        };
        let index = build_index(&config).await?;

        assert_eq!(index.stats().total_documents, 1);
        Ok(())
    }
}
