//! Discovery of item directories under each category root

use crate::error::{IngestError, Result};
use ckpt_common::Category;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One item directory that should hold a metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSource {
    pub category: Category,
    pub dir: PathBuf,
}

impl ItemSource {
    /// Path of the metadata file inside the item directory
    pub fn metadata_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

/// List the immediate subdirectories of `root/<category>`.
///
/// Entries come back in directory-listing order, which is platform dependent.
/// Anything that is not a directory (stray files, symlinks) is skipped.
pub fn discover(root: &Path, category: Category) -> Result<Vec<ItemSource>> {
    let category_root = root.join(category.as_str());
    let entries =
        std::fs::read_dir(&category_root).map_err(|e| IngestError::io(&category_root, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::io(&category_root, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| IngestError::io(&path, e))?;

        if !file_type.is_dir() {
            debug!(path = %path.display(), "Skipping non-directory entry");
            continue;
        }

        sources.push(ItemSource {
            category,
            dir: path,
        });
    }

    debug!(category = %category, items = sources.len(), "Discovered item directories");
    Ok(sources)
}

/// Discover items for every category, concatenated in category order
pub fn discover_all(root: &Path, categories: &[Category]) -> Result<Vec<ItemSource>> {
    let mut sources = Vec::new();
    for &category in categories {
        sources.extend(discover(root, category)?);
    }
    Ok(sources)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    #[test]
    fn test_discover_skips_files() {
        let root = tempfile::tempdir().unwrap();
        let models = root.path().join("models");
        fs::create_dir_all(models.join("sd15")).unwrap();
        fs::create_dir_all(models.join("sdxl")).unwrap();
        fs::write(models.join(".DS_Store"), b"junk").unwrap();
        fs::write(models.join("README.md"), b"# models").unwrap();

        let sources = discover(root.path(), Category::Models).unwrap();
        let names: BTreeSet<_> = sources
            .iter()
            .map(|s| s.dir.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, BTreeSet::from(["sd15".to_string(), "sdxl".to_string()]));
        assert!(sources.iter().all(|s| s.category == Category::Models));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_skips_symlinked_directories() {
        let root = tempfile::tempdir().unwrap();
        let loras = root.path().join("loras");
        fs::create_dir_all(loras.join("real")).unwrap();
        std::os::unix::fs::symlink(loras.join("real"), loras.join("alias")).unwrap();

        let sources = discover(root.path(), Category::Loras).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].dir.ends_with("real"));
    }

    #[test]
    fn test_missing_category_root_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        match discover(root.path(), Category::Controlnets) {
            Err(IngestError::Io { path, .. }) => {
                assert_eq!(path, root.path().join("controlnets"))
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_discover_all_keeps_category_order() {
        let root = tempfile::tempdir().unwrap();
        for category in Category::ALL {
            fs::create_dir_all(root.path().join(category.as_str()).join("item")).unwrap();
        }

        let sources = discover_all(root.path(), &Category::ALL).unwrap();
        let categories: Vec<_> = sources.iter().map(|s| s.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());

        assert_eq!(
            sources[1].metadata_path("metadata.json"),
            root.path().join("loras").join("item").join("metadata.json")
        );
    }

    #[test]
    fn test_empty_category_root() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("uncurated_models")).unwrap();
        assert!(discover(root.path(), Category::UncuratedModels).unwrap().is_empty());
    }
}
