/*
 * Platform-agnostic core of the "Post to UGS" CAM add-in. The host add-in
 * (dialog widgets, toolbar button, the CAM document itself and the vendor
 * post-processor engine) lives outside this crate and talks to it through
 * the `...Operations` traits re-exported below.
 *
 * `core` holds the model, the settings store, selection resolution, filename
 * allocation and the export orchestrator. `app_logic` holds the presenter
 * logic for the post dialog: picker visibility and the open/execute flow.
 */
pub mod app_logic;
pub mod core;

pub use app_logic::{DialogError, DialogInputs, DialogOpenState, PostDialogLogic, PostDialogUiState};
pub use core::{
    CamDocumentOperations, ExportCoordinator, ExportError, ExportRequest, ExportResult,
    ExportScope, InMemoryCamDocument, OperationEntity, PostProcessorOperations, SelectionMode,
    Settings, SettingsError, SettingsStoreOperations, ToolInfo,
};

use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/*
 * Installs a terminal logger for the `log` facade. Safe to call repeatedly;
 * only the first call has any effect. If the host already installed a logger
 * the error is reported on stderr and the existing logger is kept.
 */
pub fn initialize_logging() {
    LOGGING_INIT.call_once(|| {
        let config = simplelog::ConfigBuilder::new()
            .set_target_level(simplelog::LevelFilter::Error)
            .build();
        if let Err(e) = simplelog::TermLogger::init(
            simplelog::LevelFilter::Debug,
            config,
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        ) {
            eprintln!("UGS Post: logger already initialized: {e}");
        }
    });
}
