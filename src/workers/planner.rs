use std::fmt;

/// One output variant of the source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenditionProfile {
    pub label: u32,
    pub width: u32,
    pub height: u32,
    /// Average video bitrate in kbit/s.
    pub video_bitrate_kbps: u32,
}

impl RenditionProfile {
    const fn new(label: u32, width: u32, height: u32, video_bitrate_kbps: u32) -> Self {
        Self {
            label,
            width,
            height,
            video_bitrate_kbps,
        }
    }

    pub fn buffer_size_kbps(&self) -> u32 {
        self.video_bitrate_kbps * 2
    }

    /// Nominal bandwidth in bits/sec as advertised in the master manifest.
    pub fn bandwidth(&self) -> u64 {
        u64::from(self.video_bitrate_kbps) * 1000
    }

    /// Name of the rendition subdirectory, e.g. `720p`.
    pub fn dir_name(&self) -> String {
        format!("{}p", self.label)
    }

    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl fmt::Display for RenditionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p ({}, {}k)", self.label, self.resolution(), self.video_bitrate_kbps)
    }
}

/// Ascending by label.
pub const CATALOG: [RenditionProfile; 4] = [
    RenditionProfile::new(360, 640, 360, 800),
    RenditionProfile::new(480, 842, 480, 1400),
    RenditionProfile::new(720, 1280, 720, 2800),
    RenditionProfile::new(1080, 1920, 1080, 5000),
];

/// Profiles to produce for one job. The position of a profile in this list
/// is its stream index for both the encoder stream map and the master
/// manifest, so both stages must read it from the same plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenditionPlan {
    profiles: Vec<RenditionProfile>,
}

impl RenditionPlan {
    pub fn profiles(&self) -> &[RenditionProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &RenditionProfile)> {
        self.profiles.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn labels(&self) -> Vec<u32> {
        self.profiles.iter().map(|p| p.label).collect()
    }
}

/// Returns `None` when the ceiling is below every catalog entry.
pub fn plan_renditions(catalog: &[RenditionProfile], ceiling: u32) -> Option<RenditionPlan> {
    let profiles: Vec<RenditionProfile> = catalog
        .iter()
        .filter(|p| p.label <= ceiling)
        .copied()
        .collect();

    if profiles.is_empty() {
        None
    } else {
        Some(RenditionPlan { profiles })
    }
}
