use crate::workers::planner::{RenditionPlan, RenditionProfile};
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{debug, warn};

const OUTPUT_DIR: &str = "output";

/// Job-local scratch directory.
///
/// Released explicitly with [`Workspace::release`] at the end of a dispatch.
/// If that never happens (a stage panicked, or the request future was
/// dropped by a timeout) the directory is removed on drop instead.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    input_file: String,
    released: bool,
}

impl Workspace {
    /// Creates `<base>/<stem>-<unix nanos>` with its output subdirectory.
    ///
    /// The job root must not exist yet: a name collision with another job
    /// fails with `AlreadyExists` instead of sharing the directory.
    pub async fn create(base: &Path, filename: &str, dispatched_at: OffsetDateTime) -> io::Result<Self> {
        tokio::fs::create_dir_all(base).await?;

        let root = base.join(dir_name(filename, dispatched_at));
        tokio::fs::create_dir(&root).await?;

        let input_file = match Path::new(filename).extension() {
            Some(ext) => format!("input.{}", ext.to_string_lossy()),
            None => "input".to_string(),
        };
        let workspace = Self {
            root,
            input_file,
            released: false,
        };

        // Dropping on error removes the root created above.
        tokio::fs::create_dir(workspace.output_root()).await?;
        debug!("Created workspace {}", workspace.root.display());

        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_path(&self) -> PathBuf {
        self.root.join(&self.input_file)
    }

    /// Root of the tree that gets published.
    pub fn output_root(&self) -> PathBuf {
        self.root.join(OUTPUT_DIR)
    }

    pub fn rendition_dir(&self, profile: &RenditionProfile) -> PathBuf {
        self.output_root().join(profile.dir_name())
    }

    pub async fn create_rendition_dirs(&self, plan: &RenditionPlan) -> io::Result<()> {
        for profile in plan.profiles() {
            tokio::fs::create_dir_all(self.rendition_dir(profile)).await?;
        }
        Ok(())
    }

    /// Removes the workspace. Failures are logged and swallowed.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => debug!("Removed workspace {}", self.root.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("⚠️ Failed to remove workspace {}: {}", self.root.display(), e),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => warn!("Removed abandoned workspace {}", self.root.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("⚠️ Failed to remove workspace {}: {}", self.root.display(), e),
        }
    }
}

fn dir_name(filename: &str, dispatched_at: OffsetDateTime) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let safe: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let safe = if safe.is_empty() { "job".to_string() } else { safe };
    format!("{}-{}", safe, dispatched_at.unix_timestamp_nanos())
}
