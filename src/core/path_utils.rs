/*
 * Location of the add-in's per-user data: `{home}/UGS_Fusion/`. The settings
 * file and the default output folder both live there. The home directory is
 * resolved once per process; nothing else in the crate computes these paths.
 */
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const PROGRAM_ID: &str = "UGS_Fusion";
pub const SETTINGS_FILENAME: &str = "settings.json";
const OUTPUT_SUBFOLDER_NAME: &str = "output";

static PROGRAM_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/*
 * Returns `{home}/UGS_Fusion`, or `None` if the platform reports no home
 * directory for the current user. The directory is not created here; writers
 * create it on demand.
 */
pub fn get_program_dir() -> Option<&'static Path> {
    PROGRAM_DIR
        .get_or_init(|| {
            let dir = BaseDirs::new().map(|dirs| program_dir_under(dirs.home_dir()));
            match &dir {
                Some(path) => log::debug!("PathUtils: Program directory resolved to {path:?}"),
                None => log::error!("PathUtils: Could not determine the user's home directory"),
            }
            dir
        })
        .as_deref()
}

pub fn program_dir_under(home: &Path) -> PathBuf {
    home.join(PROGRAM_ID)
}

pub fn settings_file_in(program_dir: &Path) -> PathBuf {
    program_dir.join(SETTINGS_FILENAME)
}

pub fn default_output_folder_in(program_dir: &Path) -> PathBuf {
    program_dir.join(OUTPUT_SUBFOLDER_NAME)
}
