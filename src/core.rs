/*
 * This module consolidates the platform-agnostic logic of the add-in: the
 * machining-hierarchy model, the settings store, selection resolution,
 * output naming and the export run. External collaborators are reached
 * through the `CamDocumentOperations`, `PostProcessorOperations` and
 * `SettingsStoreOperations` traits.
 */
pub mod config;
pub mod document;
pub mod export;
pub mod file_naming;
pub mod models;
pub mod path_utils;
pub mod post;
pub mod resolver;

pub use models::{
    EntityId, EntityKind, OperationEntity, SelectionMode, ToolInfo, ToolParameterError,
};

pub use document::{CamDocumentOperations, DocumentError, InMemoryCamDocument};

pub use post::{OutputUnits, PostError, PostProcessorOperations, PostRequest};

pub use config::{CoreSettingsStore, Settings, SettingsError, SettingsStoreOperations};

pub use resolver::{ExportScope, PickerSelections, expand_scope, resolve_scope};

pub use file_naming::{AllocatedTarget, ParentFileCounter};

pub use export::{ExportCoordinator, ExportError, ExportRequest, ExportResult, PostFailure};
