use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Default clip base names, matching the bundled demo assets.
pub const DEFAULT_BUILDUP_CLIP: &str = "Cinematic Riser Sound Effect";
pub const DEFAULT_RELEASE_CLIP: &str = "TikTok Boom Bling Sound Effect";

/// Tunable parameters of the press-and-hold interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldStyle {
    /// Seconds of continuous press needed to complete.
    pub fill_secs: f32,
    /// Scale overshoot applied at the moment of completion.
    pub max_scale: f32,
    /// Scale the button dips to right after press-begin.
    pub press_dip_scale: f32,
    /// Scale the button ramps to while the fill runs.
    pub held_scale: f32,
    /// Seconds the initial dip takes.
    pub press_dip_secs: f32,
    /// Horizontal shake offset amplitude, in presentation units.
    pub shake_amplitude: f32,
    /// Milliseconds between shake direction flips.
    pub shake_interval_ms: u64,
    /// Number of haptic pulses spread evenly across the fill.
    pub pulse_count: u32,
    /// Pulse index at which the intensity ramp reaches 1.0; later pulses
    /// clamp there.
    pub pulse_ramp_divisor: f32,
    /// Seconds for the spring transitions (cancel return, completion pop).
    pub settle_secs: f32,
    /// Seconds the completion overshoot is held before easing back to 1.0.
    pub completion_hold_secs: f32,
    /// Clip base name for the buildup cue.
    pub buildup_clip: String,
    /// Clip base name for the release cue.
    pub release_clip: String,
}

impl Default for HoldStyle {
    fn default() -> Self {
        Self {
            fill_secs: 1.2,
            max_scale: 1.2,
            press_dip_scale: 0.8,
            held_scale: 1.1,
            press_dip_secs: 0.2,
            shake_amplitude: 2.0,
            shake_interval_ms: 50,
            pulse_count: 31,
            pulse_ramp_divisor: 20.0,
            settle_secs: 0.3,
            completion_hold_secs: 0.3,
            buildup_clip: DEFAULT_BUILDUP_CLIP.to_string(),
            release_clip: DEFAULT_RELEASE_CLIP.to_string(),
        }
    }
}

impl HoldStyle {
    pub fn fill_duration(&self) -> Duration {
        Duration::from_secs_f32(self.fill_secs)
    }

    pub fn shake_interval(&self) -> Duration {
        Duration::from_millis(self.shake_interval_ms)
    }

    pub fn shake_interval_secs(&self) -> f32 {
        self.shake_interval_ms as f32 / 1000.0
    }

    pub fn completion_hold(&self) -> Duration {
        Duration::from_secs_f32(self.completion_hold_secs)
    }

    /// Fire time of pulse `i`, spread evenly from 0 to the full fill duration.
    pub fn pulse_offset(&self, i: u32) -> Duration {
        let spread = (self.pulse_count.max(2) - 1) as f64;
        self.fill_duration().mul_f64(i as f64 / spread)
    }

    /// Intensity of pulse `i`: a linear ramp clamping at 1.0.
    pub fn pulse_intensity(&self, i: u32) -> f32 {
        (i as f32 / self.pulse_ramp_divisor).min(1.0)
    }

    /// Clamp every field to a usable range. Loaded styles pass through this
    /// so out-of-range values (negative, NaN, infinite) from a style file
    /// never reach the Duration conversions, which panic on them.
    pub fn sanitized(mut self) -> Self {
        // max/min ignore NaN, so NaN collapses to the lower bound.
        fn finite(v: f32, min: f32, max: f32) -> f32 {
            v.max(min).min(max)
        }
        self.fill_secs = finite(self.fill_secs, 0.1, 600.0);
        self.max_scale = finite(self.max_scale, 0.1, 10.0);
        self.press_dip_scale = finite(self.press_dip_scale, 0.1, 10.0);
        self.held_scale = finite(self.held_scale, 0.1, 10.0);
        self.press_dip_secs = finite(self.press_dip_secs, 0.0, 60.0);
        self.shake_amplitude = finite(self.shake_amplitude, 0.0, 100.0);
        self.shake_interval_ms = self.shake_interval_ms.clamp(1, 10_000);
        self.pulse_count = self.pulse_count.clamp(1, 1_000);
        self.pulse_ramp_divisor = finite(self.pulse_ramp_divisor, 1.0, 10_000.0);
        self.settle_secs = finite(self.settle_secs, 0.0, 60.0);
        self.completion_hold_secs = finite(self.completion_hold_secs, 0.0, 60.0);
        self
    }
}

/// Where a style comes from and goes to.
pub trait StyleStore {
    fn load(&self) -> HoldStyle;
    fn save(&self, style: &HoldStyle) -> std::io::Result<()>;
}

/// JSON file store under the platform config directory. Loading falls back
/// to defaults on a missing or unreadable file.
#[derive(Debug, Clone)]
pub struct FileStyleStore {
    path: PathBuf,
}

impl FileStyleStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "fillup") {
            pd.config_dir().join("style.json")
        } else {
            PathBuf::from("fillup_style.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileStyleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleStore for FileStyleStore {
    fn load(&self) -> HoldStyle {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(style) = serde_json::from_slice::<HoldStyle>(&bytes) {
                return style.sanitized();
            }
        }
        HoldStyle::default()
    }

    fn save(&self, style: &HoldStyle) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(style).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
