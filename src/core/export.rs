/*
 * The export run: expand a scope into targets, name each target, hand it to
 * the post engine and collect the resulting file paths.
 *
 * A run posts targets one at a time, in resolution order. A failing target is
 * recorded and the run moves on; files written earlier in the run stay on
 * disk. The run fails as a whole only when the scope matches nothing, and in
 * that case nothing has been posted.
 */
use super::config::Settings;
use super::document::CamDocumentOperations;
use super::file_naming::{self, ParentFileCounter};
use super::models::EntityId;
use super::post::{OutputUnits, PostError, PostProcessorOperations, PostRequest};
use super::resolver::{self, ExportScope};
use std::fmt;
use std::path::{Path, PathBuf};

/*
 * Everything needed for one export, captured from the dialog when the user
 * confirms it. `persist` asks for `settings` to be saved before exporting.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub scope: ExportScope,
    pub settings: Settings,
    pub persist: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostFailure {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub reason: PostError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportResult {
    /// One `{output folder}/{entity}.nc` path per successfully posted target.
    pub output_paths: Vec<PathBuf>,
    pub failures: Vec<PostFailure>,
}

impl ExportResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    NoTargetsFound(ExportScope),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoTargetsFound(scope) => {
                write!(f, "Nothing to post: no setup, folder or operation matches {scope}")
            }
        }
    }
}

impl std::error::Error for ExportError {}

pub type Result<T> = std::result::Result<T, ExportError>;

pub struct ExportCoordinator<'a> {
    document: &'a dyn CamDocumentOperations,
    post_processor: &'a dyn PostProcessorOperations,
}

impl<'a> ExportCoordinator<'a> {
    pub fn new(
        document: &'a dyn CamDocumentOperations,
        post_processor: &'a dyn PostProcessorOperations,
    ) -> Self {
        ExportCoordinator {
            document,
            post_processor,
        }
    }

    pub fn export(&self, scope: &ExportScope, settings: &Settings) -> Result<ExportResult> {
        log::trace!("ExportCoordinator: Starting export for scope {scope}");
        let targets = resolver::dedupe_by_identity(resolver::expand_scope(self.document, scope));
        if targets.is_empty() {
            log::warn!("ExportCoordinator: Scope {scope} resolved to no targets.");
            return Err(ExportError::NoTargetsFound(scope.clone()));
        }

        let post_config = self
            .document
            .generic_post_folder()
            .join(&settings.post_processor);
        let output_root = Path::new(&settings.output_folder);
        let mut counter = ParentFileCounter::new();
        let mut result = ExportResult::default();

        for entity in &targets {
            let target = file_naming::allocate(&mut counter, entity, output_root);
            let request = PostRequest {
                program_name: target.program_name.clone(),
                post_config: post_config.clone(),
                output_folder: target.output_folder.clone(),
                units: OutputUnits::DocumentUnits,
                open_in_editor: false,
            };

            match self.post_processor.post_entity(entity, &request) {
                Ok(()) => {
                    let path = target.result_path(&entity.name);
                    log::debug!("ExportCoordinator: Posted '{}' to {path:?}", entity.name);
                    result.output_paths.push(path);
                }
                Err(e) => {
                    log::warn!("ExportCoordinator: Posting '{}' failed: {e}", entity.name);
                    result.failures.push(PostFailure {
                        entity_id: entity.id,
                        entity_name: entity.name.clone(),
                        reason: e,
                    });
                }
            }
        }

        log::debug!(
            "ExportCoordinator: Export for scope {scope} finished: {} posted, {} failed.",
            result.output_paths.len(),
            result.failures.len()
        );
        Ok(result)
    }
}
