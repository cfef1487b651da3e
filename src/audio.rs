use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::AudioManager as KiraAudioManager;
use kira::AudioManagerSettings;
use log::warn;

/// Extensions tried when resolving a clip base name, in priority order.
/// First match wins.
pub const CLIP_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

/// The two cues a hold session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Played when a press begins and the fill starts ramping.
    Buildup,
    /// Played once on successful completion.
    Release,
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundCue::Buildup => write!(f, "buildup"),
            SoundCue::Release => write!(f, "release"),
        }
    }
}

/// Abstraction over audio playback.
/// Implementations: KiraBackend (production), NullBackend (mute),
/// MockBackend (testing).
pub trait AudioBackend {
    fn play_file(&mut self, path: &Path) -> Result<()>;
    fn stop(&mut self);
}

/// Production backend playing static sounds through kira.
pub struct KiraBackend {
    manager: KiraAudioManager,
    cache: HashMap<PathBuf, StaticSoundData>,
    current: Option<StaticSoundHandle>,
}

impl KiraBackend {
    pub fn new() -> Result<Self> {
        let manager = KiraAudioManager::new(AudioManagerSettings::default())
            .context("failed to open audio output")?;
        Ok(Self {
            manager,
            cache: HashMap::new(),
            current: None,
        })
    }
}

impl AudioBackend for KiraBackend {
    fn play_file(&mut self, path: &Path) -> Result<()> {
        let data = match self.cache.get(path) {
            Some(data) => data.clone(),
            None => {
                let data = StaticSoundData::from_file(path)
                    .with_context(|| format!("failed to load sound: {}", path.display()))?;
                self.cache.insert(path.to_path_buf(), data.clone());
                data
            }
        };
        let handle = self
            .manager
            .play(data)
            .map_err(|e| anyhow!("failed to start playback: {e}"))?;
        self.current = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.stop(Default::default());
        }
    }
}

/// Backend that accepts everything and plays nothing.
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play_file(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// Recording backend for tests. Clones share the same log.
#[derive(Default, Clone)]
pub struct MockBackend {
    pub log: Rc<RefCell<AudioLog>>,
}

#[derive(Default)]
pub struct AudioLog {
    pub played: Vec<PathBuf>,
    pub stops: usize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<PathBuf> {
        self.log.borrow().played.clone()
    }

    pub fn stop_count(&self) -> usize {
        self.log.borrow().stops
    }
}

impl AudioBackend for MockBackend {
    fn play_file(&mut self, path: &Path) -> Result<()> {
        self.log.borrow_mut().played.push(path.to_path_buf());
        Ok(())
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }
}

/// Plays short named cues, one at a time. Starting a new cue always preempts
/// the previous one. A missing clip or a backend failure is logged and
/// swallowed; playback problems never reach the interaction path.
pub struct SoundCuePlayer {
    asset_dir: PathBuf,
    buildup_clip: String,
    release_clip: String,
    backend: Box<dyn AudioBackend>,
}

impl SoundCuePlayer {
    pub fn new(asset_dir: impl Into<PathBuf>, backend: Box<dyn AudioBackend>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            buildup_clip: crate::config::DEFAULT_BUILDUP_CLIP.to_string(),
            release_clip: crate::config::DEFAULT_RELEASE_CLIP.to_string(),
            backend,
        }
    }

    /// Player with no asset directory and no output; useful as a default and
    /// in headless tests that do not assert on audio.
    pub fn muted() -> Self {
        Self::new(PathBuf::new(), Box::new(NullBackend))
    }

    pub fn with_clips(
        mut self,
        buildup: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        self.buildup_clip = buildup.into();
        self.release_clip = release.into();
        self
    }

    pub fn play(&mut self, cue: SoundCue) {
        let base = match cue {
            SoundCue::Buildup => self.buildup_clip.clone(),
            SoundCue::Release => self.release_clip.clone(),
        };
        let Some(path) = self.resolve(&base) else {
            warn!(
                "sound clip not found for {cue}: {:?} under {} (tried {:?})",
                base,
                self.asset_dir.display(),
                CLIP_EXTENSIONS
            );
            return;
        };
        self.backend.stop();
        if let Err(err) = self.backend.play_file(&path) {
            warn!("sound cue {cue} failed: {err:#}");
        }
    }

    pub fn stop(&mut self) {
        self.backend.stop();
    }

    fn resolve(&self, base: &str) -> Option<PathBuf> {
        CLIP_EXTENSIONS
            .iter()
            .map(|ext| self.asset_dir.join(format!("{base}.{ext}")))
            .find(|candidate| candidate.exists())
    }
}
