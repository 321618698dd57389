use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use crate::board::Piece;
use crate::error::SettingsError;
use crate::geometry::COLS;
use crate::session::{SessionConfig, TurnPolicy};

pub const SETTINGS_PATH_ENV: &str = "DISC_DROP_SETTINGS_PATH";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameplaySettings {
    pub turn_policy: TurnPolicy,
    pub first_piece: Piece,
    pub start_column: usize,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            turn_policy: TurnPolicy::Alternate,
            first_piece: Piece::PlayerA,
            start_column: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VideoSettings {
    pub vsync: bool,
    pub show_legend: bool,
    /// Initial window zoom.
    pub scale: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            show_legend: true,
            scale: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub gameplay: GameplaySettings,
    #[serde(default)]
    pub video: VideoSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            gameplay: GameplaySettings::default(),
            video: VideoSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.gameplay.start_column = self.gameplay.start_column.min(COLS - 1);
        self.video.scale = self.video.scale.clamp(1, 4);
        if self.logging.filter.trim().is_empty() {
            self.logging.filter = LoggingSettings::default().filter;
        }
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            start_column: self.gameplay.start_column,
            first_piece: self.gameplay.first_piece,
            turn_policy: self.gameplay.turn_policy,
        }
    }
}

fn default_version() -> u32 {
    1
}

/// Where [`SettingsStore::load`] found its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSource {
    File,
    /// No file at the store path.
    Defaults,
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `DISC_DROP_SETTINGS_PATH`, else `$XDG_CONFIG_HOME/disc-drop/settings.json` (falling back
    /// to `~/.config`).
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os(SETTINGS_PATH_ENV) {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("disc-drop");
        path.push("settings.json");
        Self { path }
    }

    /// An explicit path (e.g. from the command line) wins over the environment.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        explicit.map(Self::new).unwrap_or_else(Self::from_env)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings; a missing file yields defaults, a malformed one is an error.
    ///
    /// Runs before the log subscriber exists, so it reports where the settings came from
    /// instead of logging.
    pub fn load(&self) -> Result<(Settings, SettingsSource), SettingsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok((Settings::default(), SettingsSource::Defaults));
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let settings = serde_json::from_slice::<Settings>(&bytes).map_err(|source| {
            SettingsError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        Ok((settings.sanitized(), SettingsSource::File))
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("disc_drop_settings_{tag}_{nanos}.json"))
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"gameplay":{"turn_policy":"fixed"}}"#).unwrap();
        assert_eq!(settings.gameplay.turn_policy, TurnPolicy::Fixed);
        assert_eq!(settings.gameplay.first_piece, Piece::PlayerA);
        assert_eq!(settings.video, VideoSettings::default());
        assert_eq!(settings.logging.filter, "info");
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let mut settings = Settings::default();
        settings.version = 99;
        settings.gameplay.start_column = 40;
        settings.video.scale = 0;
        settings.logging.filter = "  ".into();

        let s = settings.sanitized();
        assert_eq!(s.version, 1);
        assert_eq!(s.gameplay.start_column, COLS - 1);
        assert_eq!(s.video.scale, 1);
        assert_eq!(s.logging.filter, "info");
    }

    #[test]
    fn store_roundtrips_and_reports_missing_file_as_defaults() {
        let path = unique_temp_path("roundtrip");
        let store = SettingsStore::new(&path);
        assert_eq!(
            store.load().unwrap(),
            (Settings::default(), SettingsSource::Defaults)
        );

        let mut settings = Settings::default();
        settings.gameplay.start_column = 3;
        settings.video.show_legend = false;
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), (settings, SettingsSource::File));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn saved_defaults_load_back_from_file() {
        let dir = unique_temp_path("nested");
        let store = SettingsStore::new(dir.join("disc-drop").join("settings.json"));
        store.save(&Settings::default()).unwrap();

        let (settings, source) = store.load().unwrap();
        assert_eq!(source, SettingsSource::File);
        assert_eq!(settings, Settings::default());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = unique_temp_path("malformed");
        fs::write(&path, "{ nope").unwrap();
        let err = SettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }), "{err}");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn explicit_path_wins() {
        let store = SettingsStore::resolve(Some(PathBuf::from("custom.json")));
        assert_eq!(store.path(), Path::new("custom.json"));
    }
}
