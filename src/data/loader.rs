// ============================================================
// Layer 4 — Image Folder Loader
// ============================================================
// Discovers labelled images in a split directory laid out as:
//
//   <split>/
//     aphids/
//       img_001.jpg
//       img_002.jpg
//     whitefly/
//       ...
//
// Every subdirectory is a class. Classes are numbered in the
// order the file store lists them (no sorting), starting at 0.
// The validation split is scanned with the class map built from
// the training split, so a label means the same class in both.
//
// Hidden entries (".DS_Store", ".thumbs", ...) are skipped; every
// other regular file is treated as an image and will be decoded.
//
// Reference: Rust Book §8 (Collections)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::class_map::ClassMap;
use crate::domain::error::PipelineError;
use crate::domain::image_record::ImageRecord;
use crate::domain::traits::{EntryKind, FileStore};

/// All labelled images found under one split directory
#[derive(Debug, Clone)]
pub struct ImageFolder {
    pub root:    PathBuf,
    pub classes: ClassMap,
    pub records: Vec<ImageRecord>,
}

impl ImageFolder {
    /// Scan `root`, building a fresh class map from its subfolders
    pub fn scan(store: &dyn FileStore, root: &Path) -> Result<Self> {
        let mut classes = ClassMap::new();
        let mut records = Vec::new();

        for (name, dir) in class_dirs(store, root)? {
            records.extend(list_images(store, &dir, &name)?);
            classes.insert(name);
        }

        tracing::info!(
            "Scanned '{}': {} classes, {} images",
            root.display(),
            classes.len(),
            records.len()
        );
        Ok(Self { root: root.to_path_buf(), classes, records })
    }

    /// Scan `root` using an existing class map.
    /// A class folder that is not in the map is an UnknownClass error.
    pub fn scan_with(store: &dyn FileStore, root: &Path, classes: &ClassMap) -> Result<Self> {
        let mut records = Vec::new();

        for (name, dir) in class_dirs(store, root)? {
            if classes.index_of(&name).is_none() {
                return Err(PipelineError::UnknownClass {
                    class: name,
                    dir:   root.to_path_buf(),
                }
                .into());
            }
            records.extend(list_images(store, &dir, &name)?);
        }

        tracing::info!("Scanned '{}': {} images", root.display(), records.len());
        Ok(Self { root: root.to_path_buf(), classes: classes.clone(), records })
    }

    /// (record, label) pairs in discovery order
    pub fn labelled(&self) -> impl Iterator<Item = (&ImageRecord, usize)> + '_ {
        self.records.iter().filter_map(move |r| {
            self.classes.index_of(&r.class_name).map(|label| (r, label))
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// (class name, class directory) for every visible subdirectory of `root`
fn class_dirs(store: &dyn FileStore, root: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = store
        .list_dir(root)
        .with_context(|| format!("Cannot list class folders in '{}'", root.display()))?;

    Ok(entries
        .into_iter()
        .filter(|e| e.kind == EntryKind::Dir && !e.name.starts_with('.'))
        .map(|e| (e.name, e.path))
        .collect())
}

/// Every visible regular file inside one class directory
pub fn list_images(store: &dyn FileStore, dir: &Path, class_name: &str) -> Result<Vec<ImageRecord>> {
    let images: Vec<ImageRecord> = store
        .list_dir(dir)?
        .into_iter()
        .filter(|e| e.kind == EntryKind::File && !e.name.starts_with('.'))
        .map(|e| ImageRecord::new(e.path, class_name))
        .collect();

    tracing::debug!("Class '{}': {} images", class_name, images.len());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::file_store::LocalFileStore;
    use std::collections::BTreeSet;
    use std::fs;

    fn make_split(root: &Path, classes: &[(&str, usize)]) {
        for (name, count) in classes {
            let dir = root.join(name);
            fs::create_dir_all(&dir).unwrap();
            for i in 0..*count {
                fs::write(dir.join(format!("{name}_{i}.jpg")), b"img").unwrap();
            }
        }
    }

    #[test]
    fn test_labels_are_dense_zero_based() {
        let tmp = tempfile::tempdir().unwrap();
        make_split(tmp.path(), &[("aphids", 2), ("slug", 3), ("snail", 1)]);

        let folder = ImageFolder::scan(&LocalFileStore::new(), tmp.path()).unwrap();
        let labels: BTreeSet<usize> = folder.labelled().map(|(_, l)| l).collect();
        assert_eq!(labels, (0..3).collect::<BTreeSet<_>>());
        assert_eq!(folder.len(), 6);
    }

    #[test]
    fn test_record_label_matches_its_folder() {
        let tmp = tempfile::tempdir().unwrap();
        make_split(tmp.path(), &[("armyworm", 2), ("cutworm", 2)]);

        let folder = ImageFolder::scan(&LocalFileStore::new(), tmp.path()).unwrap();
        for (record, label) in folder.labelled() {
            assert_eq!(folder.classes.name_of(label), Some(record.class_name.as_str()));
            assert!(record.path.starts_with(tmp.path().join(&record.class_name)));
        }
    }

    #[test]
    fn test_hidden_entries_and_stray_files_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        make_split(tmp.path(), &[("whitefly", 2)]);
        fs::write(tmp.path().join("README.txt"), b"x").unwrap();
        fs::write(tmp.path().join("whitefly/.DS_Store"), b"x").unwrap();
        fs::create_dir_all(tmp.path().join(".cache")).unwrap();

        let folder = ImageFolder::scan(&LocalFileStore::new(), tmp.path()).unwrap();
        assert_eq!(folder.classes.names(), ["whitefly".to_string()]);
        assert_eq!(folder.len(), 2);
    }

    #[test]
    fn test_scan_with_reuses_training_labels() {
        let tmp   = tempfile::tempdir().unwrap();
        let train = tmp.path().join("train");
        let val   = tmp.path().join("val");
        make_split(&train, &[("aphids", 2), ("slug", 2)]);
        make_split(&val, &[("slug", 1), ("aphids", 1)]);

        let store = LocalFileStore::new();
        let t = ImageFolder::scan(&store, &train).unwrap();
        let v = ImageFolder::scan_with(&store, &val, &t.classes).unwrap();
        for (record, label) in v.labelled() {
            assert_eq!(t.classes.index_of(&record.class_name), Some(label));
        }
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_scan_with_rejects_unknown_class() {
        let tmp   = tempfile::tempdir().unwrap();
        make_split(tmp.path(), &[("leaf_miner", 1)]);
        let known: ClassMap = ["aphids"].into_iter().collect();

        let err = ImageFolder::scan_with(&LocalFileStore::new(), tmp.path(), &known).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_missing_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ImageFolder::scan(&LocalFileStore::new(), &tmp.path().join("train")).unwrap_err();
        assert!(err.downcast_ref::<PipelineError>().is_some());
    }
}
