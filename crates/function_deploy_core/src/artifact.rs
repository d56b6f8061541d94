use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{DeployError, ValidationError};

/// Where the deployable code comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Prebuilt ZIP or JAR, submitted verbatim.
    Archive(PathBuf),
    /// A single handler source file, zipped in memory before submission.
    HandlerSource(PathBuf),
}

impl ArtifactSource {
    pub fn path(&self) -> &Path {
        match self {
            ArtifactSource::Archive(path) | ArtifactSource::HandlerSource(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactSource::Archive(_) => "archive",
            ArtifactSource::HandlerSource(_) => "handler_source",
        }
    }

    pub fn load(&self) -> Result<Vec<u8>, DeployError> {
        match self {
            ArtifactSource::Archive(path) => load_artifact(path),
            ArtifactSource::HandlerSource(path) => package_handler_source(path),
        }
    }
}

/// Reads the whole artifact into memory without transforming it.
pub fn load_artifact(path: &Path) -> Result<Vec<u8>, DeployError> {
    let metadata = fs::metadata(path)
        .map_err(|error| DeployError::artifact_not_found(path, error.to_string()))?;
    if !metadata.is_file() {
        return Err(DeployError::artifact_not_found(path, "not a regular file"));
    }

    fs::read(path).map_err(|error| DeployError::artifact_not_found(path, error.to_string()))
}

/// Builds a deployment zip holding `path` as its only entry, named after the
/// file's base name so a handler such as `lambda1.my_handler` resolves.
pub fn package_handler_source(path: &Path) -> Result<Vec<u8>, DeployError> {
    let entry_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DeployError::artifact_not_found(path, "source path has no file name"))?
        .to_string();
    let source = load_artifact(path)?;
    if source.is_empty() {
        return Err(ValidationError::new("handler source must not be empty").into());
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(entry_name, options).map_err(|error| {
        DeployError::packaging_failed(path, format!("failed to start zip entry: {error}"))
    })?;
    zip.write_all(&source).map_err(|error| {
        DeployError::packaging_failed(path, format!("failed to write zip entry: {error}"))
    })?;
    let cursor = zip.finish().map_err(|error| {
        DeployError::packaging_failed(path, format!("failed to finish zip: {error}"))
    })?;

    Ok(cursor.into_inner())
}

pub fn artifact_fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
