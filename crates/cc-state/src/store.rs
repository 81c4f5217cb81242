//! Settings and user preset persistence
//!
//! Persistence is best effort: a record that cannot be read falls back to
//! defaults, and a record that cannot be written is logged and dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cc_core::SliderValues;
use parking_lot::Mutex;

use crate::codec::{decode_settings, decode_user_presets, encode_settings, encode_user_presets};
use crate::preset::Preset;

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "ChorusCrisp";
/// Last-used slider values
pub const SETTINGS_FILE_NAME: &str = "settings.txt";
/// User preset records
pub const USER_PRESETS_FILE_NAME: &str = "userpresets.txt";

/// Durable storage for the settings record and the user preset list
pub trait SettingsStore {
    /// Last-used values, or the defaults when nothing readable is stored
    fn load_settings(&self) -> SliderValues;

    /// Replace the stored settings record
    fn save_settings(&self, values: &SliderValues);

    /// Stored user presets in file order
    fn load_user_presets(&self) -> Vec<Preset>;

    /// Replace the stored user preset list
    fn save_user_presets(&self, presets: &[Preset]);
}

/// Plain-text files in one directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the standard per-user location
    pub fn open_default() -> Self {
        Self::new(Self::default_dir())
    }

    /// Platform config directory joined with [`APP_DIR_NAME`]
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE_NAME)
    }

    pub fn user_presets_path(&self) -> PathBuf {
        self.dir.join(USER_PRESETS_FILE_NAME)
    }

    fn read(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    fn write(&self, path: &Path, text: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, text)
    }
}

impl SettingsStore for FileStore {
    fn load_settings(&self) -> SliderValues {
        Self::read(&self.settings_path())
            .map(|text| decode_settings(&text))
            .unwrap_or_default()
    }

    fn save_settings(&self, values: &SliderValues) {
        let path = self.settings_path();
        if let Err(e) = self.write(&path, &encode_settings(values)) {
            log::warn!("Failed to save settings to {:?}: {}", path, e);
        }
    }

    fn load_user_presets(&self) -> Vec<Preset> {
        Self::read(&self.user_presets_path())
            .map(|text| decode_user_presets(&text))
            .unwrap_or_default()
    }

    fn save_user_presets(&self, presets: &[Preset]) {
        let path = self.user_presets_path();
        if let Err(e) = self.write(&path, &encode_user_presets(presets)) {
            log::warn!("Failed to save user presets to {:?}: {}", path, e);
        }
    }
}

/// In-memory store holding the same text a [`FileStore`] would write
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: Mutex<Option<String>>,
    user_presets: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw record text
    pub fn with_text(settings: Option<&str>, user_presets: Option<&str>) -> Self {
        Self {
            settings: Mutex::new(settings.map(str::to_string)),
            user_presets: Mutex::new(user_presets.map(str::to_string)),
        }
    }

    pub fn settings_text(&self) -> Option<String> {
        self.settings.lock().clone()
    }

    pub fn user_presets_text(&self) -> Option<String> {
        self.user_presets.lock().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load_settings(&self) -> SliderValues {
        self.settings
            .lock()
            .as_deref()
            .map(decode_settings)
            .unwrap_or_default()
    }

    fn save_settings(&self, values: &SliderValues) {
        *self.settings.lock() = Some(encode_settings(values));
    }

    fn load_user_presets(&self) -> Vec<Preset> {
        self.user_presets
            .lock()
            .as_deref()
            .map(decode_user_presets)
            .unwrap_or_default()
    }

    fn save_user_presets(&self, presets: &[Preset]) {
        *self.user_presets.lock() = Some(encode_user_presets(presets));
    }
}
