//! Filesystem store for resource center uploads.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::file_io::{read_json_or_default, write_bytes_atomic, write_json_atomic};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{content_hash, Material, MaterialKind};
use crate::domain::ports::MaterialStore;

const MANIFEST_FILE: &str = "manifest.json";

/// Stores uploads as plain files next to a JSON manifest
pub struct FsMaterialStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FsMaterialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }
}

/// Strip any directory components from an uploaded filename.
pub fn sanitize_filename(filename: &str) -> DomainResult<String> {
    let base = Path::new(filename.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_default();

    if base.is_empty() || base == MANIFEST_FILE || base.starts_with('.') {
        return Err(DomainError::InvalidUpload {
            filename: filename.to_string(),
            reason: "unusable file name".to_string(),
        });
    }
    Ok(base)
}

#[async_trait]
impl MaterialStore for FsMaterialStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> DomainResult<Material> {
        let name = sanitize_filename(filename)?;
        let _guard = self.write_lock.lock().await;

        let target = self.dir.join(&name);
        write_bytes_atomic(&target, bytes).await?;

        let material = Material {
            kind: MaterialKind::from_filename(&name),
            size_bytes: bytes.len() as u64,
            sha256: content_hash(bytes),
            stored_at: target.display().to_string(),
            uploaded_at: Utc::now(),
            filename: name,
        };

        let mut manifest: Vec<Material> = read_json_or_default(&self.manifest_path()).await?;
        manifest.retain(|m| m.filename != material.filename);
        manifest.push(material.clone());
        write_json_atomic(&self.manifest_path(), &manifest, true).await?;

        info!(filename = %material.filename, bytes = material.size_bytes, "learning material stored");
        Ok(material)
    }

    async fn list(&self) -> DomainResult<Vec<Material>> {
        let mut manifest: Vec<Material> = read_json_or_default(&self.manifest_path()).await?;
        manifest.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(manifest)
    }

    async fn read(&self, filename: &str) -> DomainResult<Option<(Material, Vec<u8>)>> {
        let name = sanitize_filename(filename)?;
        let manifest: Vec<Material> = read_json_or_default(&self.manifest_path()).await?;
        let Some(material) = manifest.into_iter().find(|m| m.filename == name) else {
            return Ok(None);
        };

        match tokio::fs::read(self.dir.join(&name)).await {
            Ok(bytes) => Ok(Some((material, bytes))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(filename = %name, "material listed in manifest but missing on disk");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("notes.pdf").unwrap(), "notes.pdf");
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename(".hidden").is_err());
        assert!(sanitize_filename("manifest.json").is_err());
    }

    #[tokio::test]
    async fn test_store_replaces_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMaterialStore::new(dir.path().join("learning_materials"));

        store.store("syllabus.txt", b"week 1").await.unwrap();
        let second = store.store("syllabus.txt", b"week 1 and 2").await.unwrap();
        store.store("slides.pdf", b"%PDF").await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        let syllabus = listed.iter().find(|m| m.filename == "syllabus.txt").unwrap();
        assert_eq!(syllabus.sha256, second.sha256);
        assert_eq!(syllabus.kind, MaterialKind::Text);

        let on_disk = tokio::fs::read(dir.path().join("learning_materials/syllabus.txt"))
            .await
            .unwrap();
        assert_eq!(on_disk, b"week 1 and 2");
    }

    #[tokio::test]
    async fn test_read_serves_only_recorded_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let materials = dir.path().join("learning_materials");
        let store = FsMaterialStore::new(&materials);

        store.store("slides.pdf", b"%PDF-1.4").await.unwrap();
        let (material, bytes) = store.read("slides.pdf").await.unwrap().unwrap();
        assert_eq!(material.kind, MaterialKind::Pdf);
        assert_eq!(bytes, b"%PDF-1.4");

        // Directory components are stripped before the manifest lookup.
        assert!(store.read("../learning_materials/slides.pdf").await.unwrap().is_some());

        std::fs::write(materials.join("stray.txt"), "not uploaded").unwrap();
        assert!(store.read("stray.txt").await.unwrap().is_none());
        assert!(store.read("missing.txt").await.unwrap().is_none());
        assert!(matches!(
            store.read("manifest.json").await,
            Err(DomainError::InvalidUpload { .. })
        ));

        std::fs::remove_file(materials.join("slides.pdf")).unwrap();
        assert!(store.read("slides.pdf").await.unwrap().is_none());
    }
}
