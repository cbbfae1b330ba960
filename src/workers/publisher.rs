use crate::infrastructure::storage::ObjectStore;
use crate::workers::error::JobError;
use crate::workers::manifest::MASTER_MANIFEST;
use anyhow::anyhow;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A local file and the destination key it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub local_path: PathBuf,
    pub key: String,
}

/// Walks `root` depth-first (siblings sorted by name) and yields an upload
/// target per regular file. Nothing is read or uploaded; calling it again
/// walks the tree again.
pub fn upload_targets<'a>(
    root: &'a Path,
    prefix: &'a str,
) -> impl Iterator<Item = Result<UploadTarget, walkdir::Error>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter(|entry| entry.as_ref().map_or(true, |e| e.file_type().is_file()))
        .map(move |entry| {
            let entry = entry?;
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            Ok(UploadTarget {
                local_path: entry.path().to_path_buf(),
                key: object_key(prefix, relative),
            })
        })
}

/// `prefix` joined with `relative` using `/` regardless of the platform separator.
pub fn object_key(prefix: &str, relative: &Path) -> String {
    let mut key = prefix.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            key.push('/');
            key.push_str(&part.to_string_lossy());
        }
    }
    key
}

pub fn content_type_for(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("m3u8") => "application/vnd.apple.mpegurl".to_string(),
        Some("ts") => "video/mp2t".to_string(),
        Some("m4s") => "video/iso.segment".to_string(),
        _ => mime_guess::from_path(path).first_or_octet_stream().to_string(),
    }
}

/// Orders targets so the root master manifest goes last. Until it lands,
/// the prefix holds no entry point referencing renditions that may be missing.
fn master_last(mut targets: Vec<UploadTarget>, prefix: &str) -> Vec<UploadTarget> {
    let master_key = object_key(prefix, Path::new(MASTER_MANIFEST));
    targets.sort_by_key(|t| t.key == master_key);
    targets
}

/// Uploads every file under `output_root` to `bucket` below `prefix`.
/// Returns the number of objects written. Stops at the first failure; objects
/// already written stay in place.
pub async fn publish_tree(
    store: &dyn ObjectStore,
    bucket: &str,
    output_root: &Path,
    prefix: &str,
) -> Result<usize, JobError> {
    let targets: Vec<UploadTarget> = upload_targets(output_root, prefix)
        .collect::<Result<_, _>>()
        .map_err(|e| JobError::Publish {
            key: prefix.to_string(),
            source: anyhow!("failed to walk {}: {}", output_root.display(), e),
        })?;
    let targets = master_last(targets, prefix);

    info!("⬆️ Publishing {} files to {}/{}", targets.len(), bucket, prefix);

    for target in &targets {
        let body = tokio::fs::read(&target.local_path)
            .await
            .map_err(|e| JobError::Publish {
                key: target.key.clone(),
                source: anyhow!("failed to read {}: {}", target.local_path.display(), e),
            })?;
        let content_type = content_type_for(&target.local_path);

        store
            .put_object(bucket, &target.key, Bytes::from(body), &content_type)
            .await
            .map_err(|source| JobError::Publish {
                key: target.key.clone(),
                source,
            })?;
        debug!("Uploaded {}", target.key);
    }

    Ok(targets.len())
}
