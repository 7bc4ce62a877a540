use crate::document::Document;
use crate::error::LoadError;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Read every file under `root` whose extension is in `extensions`.
///
/// Each document carries `filename` (path relative to `root`) and `content`.
/// Files that cannot be read as UTF-8 text are logged and skipped.
pub fn load_documents<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<Vec<Document>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::RootNotFound(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    collect_files(root, &mut paths)?;
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        if !has_extension(&path, extensions) {
            continue;
        }

        match fs::read_to_string(&path) {
            Ok(content) => {
                let relative = path.strip_prefix(root).unwrap_or(&path);
                documents.push(
                    Document::new()
                        .with_field("filename", relative.to_string_lossy())
                        .with_field("content", content),
                );
            }
            Err(e) => tracing::warn!("Error reading {}: {}", path.display(), e),
        }
    }

    tracing::info!("Read {} documents from {}", documents.len(), root.display());
    Ok(documents)
}

/// Directory symlinks are not descended into, so link cycles cannot loop.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| extensions.iter().any(|want| want.as_ref() == ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_markdown_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("docs/guide"))?;
        fs::write(dir.path().join("README.md"), "# Readme")?;
        fs::write(dir.path().join("docs/guide/intro.mdx"), "intro")?;
        fs::write(dir.path().join("docs/main.py"), "print()")?;
        fs::write(dir.path().join("docs/NOTES.MD"), "upper case extension")?;

        let docs = load_documents(dir.path(), DEFAULT_EXTENSIONS)?;
        let names: Vec<_> = docs.iter().filter_map(|d| d.get("filename")).collect();

        assert_eq!(names, vec!["README.md", "docs/guide/intro.mdx"]);
        assert_eq!(docs[0].get("content"), Some("# Readme"));
        Ok(())
    }

    #[test]
    fn test_unreadable_file_is_skipped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("bad.md"), [0xff, 0xfe, 0x00])?;
        fs::write(dir.path().join("good.md"), "fine")?;

        let docs = load_documents(dir.path(), DEFAULT_EXTENSIONS)?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("filename"), Some("good.md"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_cycle_is_not_followed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("docs"))?;
        fs::write(dir.path().join("docs/a.md"), "only once")?;
        std::os::unix::fs::symlink(dir.path(), dir.path().join("docs/loop"))?;

        let docs = load_documents(dir.path(), DEFAULT_EXTENSIONS)?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("filename"), Some("docs/a.md"));
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let err = load_documents(Path::new("/nonexistent/mdsearch/root"), DEFAULT_EXTENSIONS);
        assert!(matches!(err, Err(LoadError::RootNotFound(_))));
    }
}
