use crate::workers::encoder::RENDITION_MANIFEST;
use crate::workers::planner::RenditionPlan;
use std::io;
use std::path::{Path, PathBuf};

pub const MASTER_MANIFEST: &str = "master.m3u8";

/// Renders the multivariant playlist. Entries follow plan order, which is the
/// same order the encoder numbered its output streams in.
pub fn compose_master(plan: &RenditionPlan) -> String {
    let mut out = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");
    for profile in plan.profiles() {
        out.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}\n{}/{}\n",
            profile.bandwidth(),
            profile.resolution(),
            profile.dir_name(),
            RENDITION_MANIFEST
        ));
    }
    out
}

pub async fn write_master(output_root: &Path, plan: &RenditionPlan) -> io::Result<PathBuf> {
    let path = output_root.join(MASTER_MANIFEST);
    tokio::fs::write(&path, compose_master(plan)).await?;
    Ok(path)
}
