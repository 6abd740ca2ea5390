use super::post_dialog_ui_state::PostDialogUiState;
use crate::core::{
    CamDocumentOperations, CoreSettingsStore, ExportCoordinator, ExportError, ExportRequest,
    ExportResult, ExportScope, PostProcessorOperations, Settings, SettingsError, SettingsStoreOperations,
    path_utils,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/*
 * The single error type handed back to the host glue, which is the only place
 * that turns it into a user-visible message.
 */
#[derive(Debug)]
pub enum DialogError {
    NoCamContent,
    Settings(SettingsError),
    Export(ExportError),
}

impl From<SettingsError> for DialogError {
    fn from(err: SettingsError) -> Self {
        DialogError::Settings(err)
    }
}

impl From<ExportError> for DialogError {
    fn from(err: ExportError) -> Self {
        DialogError::Export(err)
    }
}

impl fmt::Display for DialogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogError::NoCamContent => {
                write!(f, "There are no CAM operations in the active document")
            }
            DialogError::Settings(e) => write!(f, "{e}"),
            DialogError::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DialogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DialogError::Settings(e) => Some(e),
            DialogError::Export(e) => Some(e),
            DialogError::NoCamContent => None,
        }
    }
}

/*
 * Typed snapshot of the dialog's free-form inputs. Field comments give the
 * widget each value comes from.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct DialogInputs {
    /// `UGS_path`
    pub ugs_path: String,
    /// `UGS_post`
    pub ugs_post: String,
    /// `UGS_platform`
    pub ugs_platform: bool,
    /// `outputFolder`
    pub output_folder: String,
    /// `saveSettings`
    pub save_settings: bool,
}

impl DialogInputs {
    pub fn from_settings(settings: &Settings) -> Self {
        DialogInputs {
            ugs_path: settings.tool_path.clone(),
            ugs_post: settings.post_processor.clone(),
            ugs_platform: settings.uses_platform_variant,
            output_folder: settings.output_folder.clone(),
            save_settings: false,
        }
    }
}

// Everything the glue needs to populate a freshly opened dialog.
#[derive(Debug, Clone)]
pub struct DialogOpenState {
    pub inputs: DialogInputs,
    pub ui_state: PostDialogUiState,
    pub setup_names: Vec<String>,
    pub folder_names: Vec<String>,
    pub operation_names: Vec<String>,
}

/*
 * Presenter for the "Post to UGS" dialog. It restores the dialog from saved
 * settings when it opens, and on confirmation assembles an `ExportRequest`,
 * optionally persists the settings and runs the export.
 */
pub struct PostDialogLogic {
    settings_store: Arc<dyn SettingsStoreOperations>,
    program_dir: Option<PathBuf>,
}

impl PostDialogLogic {
    pub fn new(settings_store: Arc<dyn SettingsStoreOperations>, program_dir: Option<PathBuf>) -> Self {
        PostDialogLogic {
            settings_store,
            program_dir,
        }
    }

    /// Presenter backed by the per-user settings file.
    pub fn for_current_user() -> Self {
        Self::new(
            Arc::new(CoreSettingsStore::new()),
            path_utils::get_program_dir().map(|p| p.to_path_buf()),
        )
    }

    /*
     * Loads the saved settings, falling back to built-in defaults when the
     * file is missing or unreadable. Failures here never stop the dialog.
     */
    fn load_settings_or_defaults(&self) -> (Settings, bool) {
        match self.settings_store.load() {
            Ok(settings) => (settings, true),
            Err(SettingsError::NotFound(path)) => {
                log::debug!("AppLogic: No saved settings at {path:?}. Using defaults.");
                (Settings::defaults_in(self.program_dir.as_deref()), false)
            }
            Err(e) => {
                log::warn!("AppLogic: Could not load saved settings: {e}. Using defaults.");
                (Settings::defaults_in(self.program_dir.as_deref()), false)
            }
        }
    }

    pub fn on_dialog_opened(
        &self,
        document: &dyn CamDocumentOperations,
    ) -> Result<DialogOpenState, DialogError> {
        let setups = document.setups();
        let operations = document.all_operations();
        if setups.is_empty() && operations.is_empty() {
            log::debug!("AppLogic: Active document has no CAM content.");
            return Err(DialogError::NoCamContent);
        }

        let setup_names = setups.iter().map(|s| s.name.clone()).collect();
        let folder_names = setups
            .iter()
            .flat_map(|s| document.folders_of(s.id))
            .map(|f| f.name)
            .collect();
        let operation_names = operations.into_iter().map(|o| o.name).collect();

        let (settings, restored) = self.load_settings_or_defaults();
        let ui_state = PostDialogUiState::restored_from(restored.then_some(&settings));

        Ok(DialogOpenState {
            inputs: DialogInputs::from_settings(&settings),
            ui_state,
            setup_names,
            folder_names,
            operation_names,
        })
    }

    fn settings_snapshot(inputs: &DialogInputs, ui_state: &PostDialogUiState) -> Settings {
        Settings {
            output_folder: inputs.output_folder.clone(),
            selection_mode: ui_state.mode(),
            tool_path: inputs.ugs_path.clone(),
            uses_platform_variant: inputs.ugs_platform,
            post_processor: inputs.ugs_post.clone(),
        }
    }

    /*
     * Builds the request for the current dialog state. Returns `None` when the
     * visible picker has no selection; no export may be started then.
     */
    pub fn build_export_request(
        &self,
        inputs: &DialogInputs,
        ui_state: &PostDialogUiState,
    ) -> Option<ExportRequest> {
        let scope = ui_state.resolve_scope()?;
        Some(ExportRequest {
            scope,
            settings: Self::settings_snapshot(inputs, ui_state),
            persist: inputs.save_settings,
        })
    }

    /*
     * Handles the dialog's OK button. Settings are saved whenever the save
     * toggle is on, even if the visible picker has no selection; the export
     * itself only runs once a scope resolves. Returns `Ok(None)` when nothing
     * was exported.
     */
    pub fn on_confirmed(
        &self,
        inputs: &DialogInputs,
        ui_state: &PostDialogUiState,
        document: &dyn CamDocumentOperations,
        post_processor: &dyn PostProcessorOperations,
    ) -> Result<Option<ExportResult>, DialogError> {
        let settings = Self::settings_snapshot(inputs, ui_state);
        if inputs.save_settings {
            self.save_settings(&settings)?;
        }

        let Some(scope) = ui_state.resolve_scope() else {
            log::debug!("AppLogic: Nothing selected for mode '{}'. Export skipped.", ui_state.mode());
            return Ok(None);
        };
        self.run_export(&scope, &settings, document, post_processor)
            .map(Some)
    }

    /*
     * Runs one confirmed export. When the request asks for it the settings
     * are saved first; a failed save aborts before anything is posted.
     */
    pub fn on_execute(
        &self,
        request: &ExportRequest,
        document: &dyn CamDocumentOperations,
        post_processor: &dyn PostProcessorOperations,
    ) -> Result<ExportResult, DialogError> {
        if request.persist {
            self.save_settings(&request.settings)?;
        }
        self.run_export(&request.scope, &request.settings, document, post_processor)
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), DialogError> {
        self.settings_store.save(settings)?;
        log::debug!("AppLogic: Saved settings before export.");
        Ok(())
    }

    fn run_export(
        &self,
        scope: &ExportScope,
        settings: &Settings,
        document: &dyn CamDocumentOperations,
        post_processor: &dyn PostProcessorOperations,
    ) -> Result<ExportResult, DialogError> {
        let coordinator = ExportCoordinator::new(document, post_processor);
        let result = coordinator.export(scope, settings)?;
        if !result.is_complete() {
            log::warn!(
                "AppLogic: Export finished with {} failed target(s).",
                result.failures.len()
            );
        }
        Ok(result)
    }
}
