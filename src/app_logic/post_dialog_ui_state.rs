/*
 * This module defines PostDialogUiState, the presenter-side state of the post
 * dialog's "What to Post?" radio group and its three pickers.
 *
 * Exactly one selection mode is active at a time. The active mode decides
 * which picker (setups, folders, operations) is shown; "All Operations" shows
 * none. Switching modes only toggles visibility: whatever the user picked in
 * a hidden picker is kept and becomes relevant again when its mode returns.
 */
use crate::core::{ExportScope, PickerSelections, SelectionMode, Settings, resolve_scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerVisibility {
    pub setups: bool,
    pub folders: bool,
    pub operations: bool,
}

impl PickerVisibility {
    pub fn for_mode(mode: SelectionMode) -> Self {
        PickerVisibility {
            setups: mode == SelectionMode::Setups,
            folders: mode == SelectionMode::Folders,
            operations: mode == SelectionMode::Operations,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostDialogUiState {
    mode: SelectionMode,
    selections: PickerSelections,
}

impl PostDialogUiState {
    pub fn new(mode: SelectionMode) -> Self {
        log::debug!("PostDialogUiState::new called with mode '{mode}'");
        PostDialogUiState {
            mode,
            selections: PickerSelections::default(),
        }
    }

    /*
     * Initial state for a freshly opened dialog: the persisted mode when a
     * settings record exists, otherwise `Folders`.
     */
    pub fn restored_from(settings: Option<&Settings>) -> Self {
        Self::new(settings.map(|s| s.selection_mode).unwrap_or_default())
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn visibility(&self) -> PickerVisibility {
        PickerVisibility::for_mode(self.mode)
    }

    /// Index of the radio item that should appear selected.
    pub fn radio_index(&self) -> usize {
        self.mode.radio_index()
    }

    pub fn on_selection_mode_changed(&mut self, mode: SelectionMode) -> PickerVisibility {
        if mode != self.mode {
            log::debug!("PostDialogUiState: Mode changed from '{}' to '{mode}'", self.mode);
            self.mode = mode;
        }
        self.visibility()
    }

    pub fn on_setup_selected(&mut self, name: Option<String>) {
        self.selections.setup = name;
    }

    pub fn on_folder_selected(&mut self, name: Option<String>) {
        self.selections.folder = name;
    }

    pub fn on_operation_selected(&mut self, name: Option<String>) {
        self.selections.operation = name;
    }

    pub fn selections(&self) -> &PickerSelections {
        &self.selections
    }

    /// Scope named by the visible picker, or `None` if it has no selection yet.
    pub fn resolve_scope(&self) -> Option<ExportScope> {
        resolve_scope(self.mode, &self.selections)
    }
}
