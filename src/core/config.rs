/*
 * Persists the post dialog's settings record to `{home}/UGS_Fusion/settings.json`.
 * The record is read and written as one unit: every key is required on load,
 * unknown keys are rejected, and saves replace the whole file atomically
 * (temp file plus rename) so a reader sees either the old or the new content.
 *
 * As with the other core services, callers depend on the
 * `SettingsStoreOperations` trait so the presenter can be tested against a mock.
 */
use super::models::SelectionMode;
use super::path_utils;
use atomicwrites::{AllowOverwrite, AtomicFile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_POST_PROCESSOR: &str = "grbl.cps";

#[derive(Debug)]
pub enum SettingsError {
    NotFound(PathBuf),
    Corrupt(serde_json::Error),
    Encode(serde_json::Error),
    Io(io::Error),
    NoHomeDirectory,
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::NotFound(path) => write!(f, "Settings file not found: {path:?}"),
            SettingsError::Corrupt(e) => write!(f, "Settings file is corrupt: {e}"),
            SettingsError::Encode(e) => write!(f, "Could not encode settings: {e}"),
            SettingsError::Io(e) => write!(f, "Settings I/O error: {e}"),
            SettingsError::NoHomeDirectory => {
                write!(f, "Could not determine the user's home directory for settings")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Corrupt(e) | SettingsError::Encode(e) => Some(e),
            SettingsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/*
 * The persisted record. Fields are declared in the sorted order of their JSON
 * keys so serialization comes out key-sorted.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(rename = "output_folder")]
    pub output_folder: String,
    #[serde(rename = "show_operations")]
    pub selection_mode: SelectionMode,
    /// Filesystem path of the G-code sender.
    #[serde(rename = "ugs_path")]
    pub tool_path: String,
    #[serde(rename = "ugs_platform")]
    pub uses_platform_variant: bool,
    /// Filename of the post-processor definition, relative to the generic post folder.
    #[serde(rename = "ugs_post")]
    pub post_processor: String,
}

impl Settings {
    /*
     * Built-in values used when no usable settings file exists. The default
     * output folder sits next to the settings file when a home directory is known.
     */
    pub fn defaults_in(program_dir: Option<&Path>) -> Self {
        let output_folder = match program_dir {
            Some(dir) => path_utils::default_output_folder_in(dir),
            None => PathBuf::from("output"),
        };
        Settings {
            output_folder: output_folder.to_string_lossy().into_owned(),
            selection_mode: SelectionMode::default(),
            tool_path: String::new(),
            uses_platform_variant: false,
            post_processor: DEFAULT_POST_PROCESSOR.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)
            .map_err(SettingsError::Encode)?;
        String::from_utf8(buffer).map_err(|e| SettingsError::Io(io::Error::other(e)))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(SettingsError::Corrupt)
    }
}

pub trait SettingsStoreOperations: Send + Sync {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

pub struct CoreSettingsStore {
    settings_path: Option<PathBuf>,
}

impl CoreSettingsStore {
    /// Store backed by the per-user settings file.
    pub fn new() -> Self {
        CoreSettingsStore {
            settings_path: path_utils::get_program_dir().map(path_utils::settings_file_in),
        }
    }

    /// Store backed by an explicit file, for hosts that relocate settings.
    pub fn with_file(settings_path: impl Into<PathBuf>) -> Self {
        CoreSettingsStore {
            settings_path: Some(settings_path.into()),
        }
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    fn require_path(&self) -> Result<&Path> {
        self.settings_path
            .as_deref()
            .ok_or(SettingsError::NoHomeDirectory)
    }
}

impl Default for CoreSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStoreOperations for CoreSettingsStore {
    fn load(&self) -> Result<Settings> {
        let file_path = self.require_path()?;
        log::trace!("CoreSettingsStore: Loading settings from {file_path:?}");

        if !file_path.is_file() {
            log::debug!("CoreSettingsStore: Settings file {file_path:?} does not exist.");
            return Err(SettingsError::NotFound(file_path.to_path_buf()));
        }

        let contents = fs::read_to_string(file_path)?;
        let settings = Settings::from_json(&contents)?;
        log::debug!("CoreSettingsStore: Loaded settings from {file_path:?}.");
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let file_path = self.require_path()?;
        log::trace!("CoreSettingsStore: Saving settings to {file_path:?}");

        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            if let Err(e) = fs::create_dir_all(parent) {
                log::error!("CoreSettingsStore: Failed to create settings directory {parent:?}: {e}");
                return Err(SettingsError::Io(e));
            }
            log::debug!("CoreSettingsStore: Created settings directory {parent:?}");
        }

        let json = settings.to_json()?;
        AtomicFile::new(file_path, AllowOverwrite)
            .write(|file| file.write_all(json.as_bytes()))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(io_err) | atomicwrites::Error::User(io_err) => {
                    SettingsError::Io(io_err)
                }
            })?;
        log::debug!("CoreSettingsStore: Saved settings to {file_path:?}.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_settings() -> Settings {
        Settings {
            output_folder: "/cnc/out".to_string(),
            selection_mode: SelectionMode::Operations,
            tool_path: "/opt/ugs/bin/ugsplatform".to_string(),
            uses_platform_variant: true,
            post_processor: "grbl.cps".to_string(),
        }
    }

    #[test]
    fn test_save_then_load_round_trips_all_fields() -> Result<()> {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let store = CoreSettingsStore::with_file(temp_dir.path().join("settings.json"));
        let original = sample_settings();

        store.save(&original)?;
        let loaded = store.load()?;

        assert_eq!(loaded, original);
        Ok(())
    }

    #[test]
    fn test_save_creates_missing_directory_and_overwrites() -> Result<()> {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let file_path = temp_dir.path().join("UGS_Fusion").join("settings.json");
        let store = CoreSettingsStore::with_file(&file_path);

        let mut settings = sample_settings();
        store.save(&settings)?;
        assert!(file_path.is_file());

        settings.selection_mode = SelectionMode::AllOperations;
        settings.uses_platform_variant = false;
        store.save(&settings)?;

        assert_eq!(store.load()?, settings);
        Ok(())
    }

    #[test]
    fn test_saved_document_is_sorted_and_indented() -> Result<()> {
        let text = sample_settings().to_json()?;
        let expected = "{\n    \"output_folder\": \"/cnc/out\",\n    \"show_operations\": \"Operations\",\n    \"ugs_path\": \"/opt/ugs/bin/ugsplatform\",\n    \"ugs_platform\": true,\n    \"ugs_post\": \"grbl.cps\"\n}";
        assert_eq!(text, expected);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let store = CoreSettingsStore::with_file(temp_dir.path().join("settings.json"));
        assert!(matches!(store.load(), Err(SettingsError::NotFound(_))));
    }

    #[test]
    fn test_load_missing_key_is_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let file_path = temp_dir.path().join("settings.json");
        fs::write(
            &file_path,
            r#"{"show_operations": "Folders", "ugs_path": "", "ugs_platform": false, "ugs_post": "grbl.cps"}"#,
        )
        .expect("Failed to write test settings");

        let store = CoreSettingsStore::with_file(&file_path);
        assert!(matches!(store.load(), Err(SettingsError::Corrupt(_))));
    }

    #[test]
    fn test_load_rejects_extra_and_mistyped_fields() {
        let extra = r#"{"output_folder": "/o", "show_operations": "Folders", "ugs_path": "",
            "ugs_platform": false, "ugs_post": "grbl.cps", "theme": "dark"}"#;
        assert!(matches!(Settings::from_json(extra), Err(SettingsError::Corrupt(_))));

        let mistyped = r#"{"output_folder": "/o", "show_operations": "Folders", "ugs_path": "",
            "ugs_platform": "yes", "ugs_post": "grbl.cps"}"#;
        assert!(matches!(Settings::from_json(mistyped), Err(SettingsError::Corrupt(_))));

        let unknown_mode = r#"{"output_folder": "/o", "show_operations": "Everything", "ugs_path": "",
            "ugs_platform": false, "ugs_post": "grbl.cps"}"#;
        assert!(matches!(Settings::from_json(unknown_mode), Err(SettingsError::Corrupt(_))));
    }

    #[test]
    fn test_defaults() {
        let defaults = Settings::defaults_in(Some(Path::new("/home/m/UGS_Fusion")));
        assert_eq!(defaults.post_processor, DEFAULT_POST_PROCESSOR);
        assert_eq!(defaults.selection_mode, SelectionMode::Folders);
        assert_eq!(defaults.output_folder, "/home/m/UGS_Fusion/output");
        assert!(defaults.tool_path.is_empty());
        assert!(!defaults.uses_platform_variant);
    }

    #[test]
    fn test_store_without_home_reports_error() {
        let store = CoreSettingsStore {
            settings_path: None,
        };
        assert!(matches!(store.load(), Err(SettingsError::NoHomeDirectory)));
        assert!(matches!(
            store.save(&sample_settings()),
            Err(SettingsError::NoHomeDirectory)
        ));
    }
}
