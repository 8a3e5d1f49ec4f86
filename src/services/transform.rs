use crate::error::MirrorError;
use crate::utils::keys::{file_name, gzip_destination_key, zip_entry_destination_key};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Magic byte signatures for zip archives (regular and empty)
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const ZIP_EMPTY_MAGIC: &[u8] = &[0x50, 0x4B, 0x05, 0x06];

/// How a fetched object gets expanded before publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Plain,
    Gzip,
    Zip,
}

/// One local file ready for upload at its derived destination key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedArtifact {
    pub destination_key: String,
    pub local_path: PathBuf,
}

/// Classify a fetched object: content signature first (zip magic), then the
/// `.gz` filename suffix, else plain.
pub fn classify(local_path: &Path, source_key: &str) -> Result<ArchiveKind, MirrorError> {
    let mut header = Vec::with_capacity(4);
    File::open(local_path)?
        .take(4)
        .read_to_end(&mut header)?;

    if header == ZIP_MAGIC || header == ZIP_EMPTY_MAGIC {
        Ok(ArchiveKind::Zip)
    } else if file_name(source_key).ends_with(".gz") {
        Ok(ArchiveKind::Gzip)
    } else {
        Ok(ArchiveKind::Plain)
    }
}

/// Expand one fetched object into zero or more uploadable artifacts, in
/// archive entry order for zips and single-element otherwise.
pub fn expand(
    local_path: &Path,
    source_key: &str,
    kind: ArchiveKind,
    scratch: &Path,
) -> Result<Vec<ExpandedArtifact>, MirrorError> {
    match kind {
        ArchiveKind::Plain => Ok(vec![ExpandedArtifact {
            destination_key: source_key.to_string(),
            local_path: local_path.to_path_buf(),
        }]),
        ArchiveKind::Gzip => expand_gzip(local_path, source_key, scratch),
        ArchiveKind::Zip => expand_zip(local_path, source_key, scratch),
    }
}

fn expand_gzip(
    local_path: &Path,
    source_key: &str,
    scratch: &Path,
) -> Result<Vec<ExpandedArtifact>, MirrorError> {
    let out_name = gzip_destination_key(file_name(source_key));
    let out_path = scratch.join(&out_name);

    let input = File::open(local_path)?;
    let mut decoder = GzDecoder::new(input);
    let mut output = File::create(&out_path)?;
    std::io::copy(&mut decoder, &mut output).map_err(|e| {
        MirrorError::Transfer(format!("Failed to gunzip '{}': {}", source_key, e))
    })?;

    Ok(vec![ExpandedArtifact {
        destination_key: gzip_destination_key(source_key),
        local_path: out_path,
    }])
}

fn expand_zip(
    local_path: &Path,
    source_key: &str,
    scratch: &Path,
) -> Result<Vec<ExpandedArtifact>, MirrorError> {
    let file = File::open(local_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| {
        MirrorError::Transfer(format!("Failed to parse zip '{}': {}", source_key, e))
    })?;

    let mut artifacts = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            MirrorError::Transfer(format!("Failed to read zip entry in '{}': {}", source_key, e))
        })?;
        if entry.is_dir() {
            continue;
        }

        // Entry paths escaping the scratch arena are rejected outright
        let relative = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            MirrorError::Transfer(format!(
                "Unsafe entry path '{}' in '{}'",
                entry.name(),
                source_key
            ))
        })?;
        let entry_name = entry.name().to_string();

        let out_path = scratch.join(&relative);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&out_path)?;
        std::io::copy(&mut entry, &mut output).map_err(|e| {
            MirrorError::Transfer(format!(
                "Failed to extract '{}' from '{}': {}",
                entry_name, source_key, e
            ))
        })?;

        artifacts.push(ExpandedArtifact {
            destination_key: zip_entry_destination_key(source_key, &entry_name),
            local_path: out_path,
        });
    }

    Ok(artifacts)
}
