//! Whole-file JSON persistence helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::domain::errors::{DomainError, DomainResult};

/// Read a JSON document, treating a missing file as `T::default()`.
pub async fn read_json_or_default<T>(path: &Path) -> DomainResult<T>
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => {
            return Err(DomainError::Storage(format!(
                "Failed to read {}: {err}",
                path.display()
            )))
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|err| {
        DomainError::Storage(format!("Corrupt JSON in {}: {err}", path.display()))
    })
}

/// Read a JSON document that may be absent.
pub async fn read_json_optional<T>(path: &Path) -> DomainResult<Option<T>>
where
    T: DeserializeOwned,
{
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|err| {
            DomainError::Storage(format!("Corrupt JSON in {}: {err}", path.display()))
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(DomainError::Storage(format!(
            "Failed to read {}: {err}",
            path.display()
        ))),
    }
}

/// Replace a JSON document by writing a sibling temp file and renaming it.
pub async fn write_json_atomic<T>(path: &Path, value: &T, pretty: bool) -> DomainResult<()>
where
    T: Serialize + ?Sized,
{
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    write_bytes_atomic(path, &bytes).await
}

/// Replace a file's bytes by writing a sibling temp file and renaming it.
pub async fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> DomainResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await.map_err(|err| {
                DomainError::Storage(format!("Failed to create {}: {err}", parent.display()))
            })?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    fs::write(tmp, bytes)
        .await
        .map_err(|err| DomainError::Storage(format!("Failed to write {}: {err}", tmp.display())))?;
    fs::rename(tmp, path).await.map_err(|err| {
        DomainError::Storage(format!("Failed to replace {}: {err}", path.display()))
    })
}

/// Remove a file, reporting whether it existed.
pub async fn remove_if_exists(path: &Path) -> DomainResult<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(DomainError::Storage(format!(
            "Failed to remove {}: {err}",
            path.display()
        ))),
    }
}
