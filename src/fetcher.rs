use crate::error::FetchError;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Downloads a zip archive once and extracts it under a local directory
pub struct ArchiveFetcher {
    client: reqwest::Client,
    dest_dir: PathBuf,
    archive_file: String,
    extracted_dir: String,
}

impl ArchiveFetcher {
    pub fn new(
        dest_dir: impl Into<PathBuf>,
        archive_file: impl Into<String>,
        extracted_dir: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            dest_dir: dest_dir.into(),
            archive_file: archive_file.into(),
            extracted_dir: extracted_dir.into(),
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.dest_dir.join(&self.archive_file)
    }

    pub fn extracted_path(&self) -> PathBuf {
        self.dest_dir.join(&self.extracted_dir)
    }

    /// Scratch directory extraction writes into before the root is moved into place
    fn staging_path(&self) -> PathBuf {
        self.dest_dir.join(format!(".{}.partial", self.extracted_dir))
    }

    /// Return the extracted tree, downloading and extracting only what is missing.
    ///
    /// The archive and the extracted root only appear under their final names
    /// once complete, so an interrupted run is redone by the next call.
    pub async fn fetch(&self, url: &str) -> Result<PathBuf, FetchError> {
        tokio::fs::create_dir_all(&self.dest_dir).await?;

        let extracted = self.extracted_path();
        if tokio::fs::try_exists(&extracted).await? {
            tracing::info!("Archive already extracted at {}", extracted.display());
            return Ok(extracted);
        }

        let archive = self.archive_path();
        if tokio::fs::try_exists(&archive).await? {
            tracing::info!("Archive already present at {}", archive.display());
        } else {
            tracing::info!("Downloading {}", url);
            let response = self.client.get(url).send().await?;
            if !response.status().is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: response.status(),
                });
            }
            let bytes = response.bytes().await?;

            let partial = archive.with_file_name(format!("{}.part", self.archive_file));
            tokio::fs::write(&partial, &bytes).await?;
            tokio::fs::rename(&partial, &archive).await?;
            tracing::info!("Downloaded {} bytes to {}", bytes.len(), archive.display());
        }

        let staging = self.staging_path();
        let staged_root = staging.join(&self.extracted_dir);
        let target = extracted.clone();
        let count = tokio::task::spawn_blocking(move || {
            extract_into_place(&archive, &staging, &staged_root, &target)
        })
        .await??;
        tracing::info!("Extracted {} files to {}", count, extracted.display());

        Ok(extracted)
    }
}

/// Extract `archive` into `staging`, then move `staged_root` to `target`.
/// `staging` is removed afterwards whether or not extraction succeeded.
fn extract_into_place(
    archive: &Path,
    staging: &Path,
    staged_root: &Path,
    target: &Path,
) -> Result<u64, FetchError> {
    if staging.exists() {
        fs::remove_dir_all(staging)?;
    }

    let result = extract_zip(archive, staging).and_then(|count| {
        if !staged_root.is_dir() {
            return Err(FetchError::MissingRoot(target.to_path_buf()));
        }
        fs::rename(staged_root, target)?;
        Ok(count)
    });

    if let Err(e) = fs::remove_dir_all(staging) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to clean up {}: {}", staging.display(), e);
        }
    }
    result
}

/// Extract every entry of `archive_path` below `output_dir`.
/// Entries whose names would escape `output_dir` are skipped.
pub fn extract_zip(archive_path: &Path, output_dir: &Path) -> Result<u64, FetchError> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(std::io::BufReader::new(file))?;
    let mut count = 0u64;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            tracing::warn!("Skipping unsafe archive entry {}", entry.name());
            continue;
        };
        let target = output_dir.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(fs::File::create(&target)?);
            std::io::copy(&mut entry, &mut writer)?;
            count += 1;
        }
    }
    Ok(count)
}
