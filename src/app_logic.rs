/*
 * This module provides the presenter layer for the "Post to UGS" dialog.
 * `PostDialogLogic` handles dialog opening and execution; `PostDialogUiState`
 * tracks the selection mode and which picker is visible.
 * Unit tests for `PostDialogLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod post_dialog_ui_state;


pub use handler::{DialogError, DialogInputs, DialogOpenState, PostDialogLogic};
pub use post_dialog_ui_state::{PickerVisibility, PostDialogUiState};
