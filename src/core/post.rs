/*
 * The external "post one entity" capability. The vendor post engine writes
 * `{output_folder}/{entity name}.nc` for the entity it is handed; this crate
 * never looks at the generated G-code.
 */
use super::models::OperationEntity;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputUnits {
    /// Emit G-code in the document's native units.
    DocumentUnits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostRequest {
    pub program_name: String,
    pub post_config: PathBuf,
    pub output_folder: PathBuf,
    pub units: OutputUnits,
    pub open_in_editor: bool,
}

// Failure reported by the post engine for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PostError(pub String);

impl fmt::Display for PostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post processing failed: {}", self.0)
    }
}

impl std::error::Error for PostError {}

pub trait PostProcessorOperations {
    /// Blocks until the post engine has finished with `entity`.
    fn post_entity(&self, entity: &OperationEntity, request: &PostRequest) -> Result<(), PostError>;
}
