use crate::workers::planner::RenditionPlan;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

const AUDIO_CODEC: &str = "aac";
const AUDIO_SAMPLE_RATE: &str = "48000";
const AUDIO_BITRATE: &str = "128k";
const VIDEO_CODEC: &str = "libx264";
const VIDEO_PRESET: &str = "veryfast";
const VIDEO_CRF: &str = "20";

pub const RENDITION_MANIFEST: &str = "index.m3u8";
const SEGMENT_PATTERN: &str = "segment_%03d.ts";

/// Everything needed to produce all renditions of one job in a single pass.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub plan: RenditionPlan,
    pub segment_seconds: u32,
}

impl EncodeRequest {
    /// Builds the encoder argument list.
    ///
    /// The input is decoded once and split into one scaled video branch per
    /// profile. Output stream `i` (both `v:i` and `a:i`) belongs to
    /// `plan.profiles()[i]`, and `-var_stream_map` lists them in that order.
    pub fn args(&self) -> Vec<String> {
        let profiles = self.plan.profiles();
        let mut args: Vec<String> = vec![
            "-hide_banner".into(),
            "-y".into(),
            "-i".into(),
            self.input.to_string_lossy().into_owned(),
        ];

        let split_outputs: String = (0..profiles.len()).map(|i| format!("[v{}]", i)).collect();
        let mut graph = format!("[0:v]split={}{}", profiles.len(), split_outputs);
        for (i, profile) in self.plan.iter() {
            graph.push_str(&format!(
                ";[v{i}]scale=w={}:h={}[v{i}out]",
                profile.width, profile.height
            ));
        }
        args.push("-filter_complex".into());
        args.push(graph);

        for (i, profile) in self.plan.iter() {
            args.extend([
                "-map".to_string(),
                format!("[v{}out]", i),
                format!("-c:v:{}", i),
                VIDEO_CODEC.to_string(),
                format!("-preset:v:{}", i),
                VIDEO_PRESET.to_string(),
                format!("-crf:v:{}", i),
                VIDEO_CRF.to_string(),
                format!("-b:v:{}", i),
                format!("{}k", profile.video_bitrate_kbps),
                format!("-maxrate:v:{}", i),
                format!("{}k", profile.video_bitrate_kbps),
                format!("-bufsize:v:{}", i),
                format!("{}k", profile.buffer_size_kbps()),
            ]);
        }

        for i in 0..profiles.len() {
            args.extend([
                "-map".to_string(),
                "0:a:0".to_string(),
                format!("-c:a:{}", i),
                AUDIO_CODEC.to_string(),
                format!("-ar:a:{}", i),
                AUDIO_SAMPLE_RATE.to_string(),
                format!("-b:a:{}", i),
                AUDIO_BITRATE.to_string(),
            ]);
        }

        let out = self.output_root.to_string_lossy();
        args.extend([
            "-f".to_string(),
            "hls".to_string(),
            "-hls_time".to_string(),
            self.segment_seconds.to_string(),
            "-hls_playlist_type".to_string(),
            "vod".to_string(),
            "-hls_flags".to_string(),
            "independent_segments".to_string(),
            "-hls_segment_filename".to_string(),
            format!("{}/%v/{}", out, SEGMENT_PATTERN),
            "-var_stream_map".to_string(),
            self.stream_map(),
            format!("{}/%v/{}", out, RENDITION_MANIFEST),
        ]);

        args
    }

    /// `v:0,a:0,name:360p v:1,a:1,name:480p ...` in plan order.
    pub fn stream_map(&self) -> String {
        self.plan
            .iter()
            .map(|(i, p)| format!("v:{i},a:{i},name:{}", p.dir_name()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of one finished encoder process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EncodeOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs an encode to completion. Blocking; callers on the async runtime go
/// through `spawn_blocking`.
pub trait Encoder: Send + Sync {
    fn run(&self, request: &EncodeRequest) -> io::Result<EncodeOutcome>;
}

pub struct FfmpegEncoder {
    binary: String,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Encoder for FfmpegEncoder {
    fn run(&self, request: &EncodeRequest) -> io::Result<EncodeOutcome> {
        let args = request.args();
        info!(
            "🎬 Running {} for renditions {:?}",
            self.binary,
            request.plan.labels()
        );
        debug!("Encoder arguments: {:?}", args);

        let output = Command::new(&self.binary).args(&args).output()?;

        Ok(EncodeOutcome {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
