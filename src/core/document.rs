/*
 * Access to the CAM document's machining hierarchy. The real document lives
 * in the host application; the core only sees it through
 * `CamDocumentOperations`, which hands out read-only `OperationEntity` views.
 *
 * `InMemoryCamDocument` is a plain in-process hierarchy. The host glue can
 * mirror the live document into it once per dialog action, and tests use it
 * directly.
 */
use super::models::{EntityId, EntityKind, OperationEntity, ToolInfo};
use std::fmt;
use std::path::PathBuf;

pub trait CamDocumentOperations {
    /// Top-level setups, in document order.
    fn setups(&self) -> Vec<OperationEntity>;
    /// Folders directly contained in the given setup, in document order.
    fn folders_of(&self, setup_id: EntityId) -> Vec<OperationEntity>;
    /// Every operation in the document, flattened across setups and folders.
    fn all_operations(&self) -> Vec<OperationEntity>;
    /// Directory holding the vendor's generic post-processor definitions.
    fn generic_post_folder(&self) -> PathBuf;
}

#[derive(Debug, PartialEq, Eq)]
pub enum DocumentError {
    UnknownEntity(EntityId),
    InvalidParent { parent: EntityId, child: EntityKind },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::UnknownEntity(id) => write!(f, "Unknown entity id {}", id.0),
            DocumentError::InvalidParent { parent, child } => {
                write!(f, "Entity {} cannot contain a {child:?}", parent.0)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Clone)]
struct StoredEntity {
    entity: OperationEntity,
    parent_id: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct InMemoryCamDocument {
    generic_post_folder: PathBuf,
    // Insertion order is document order.
    entities: Vec<StoredEntity>,
    next_id: u64,
}

impl InMemoryCamDocument {
    pub fn new(generic_post_folder: impl Into<PathBuf>) -> Self {
        InMemoryCamDocument {
            generic_post_folder: generic_post_folder.into(),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add_setup(&mut self, name: impl Into<String>) -> EntityId {
        self.push(EntityKind::Setup, name.into(), None, None)
    }

    pub fn add_folder(&mut self, setup_id: EntityId, name: impl Into<String>) -> Result<EntityId> {
        self.check_parent(setup_id, EntityKind::Folder)?;
        Ok(self.push(EntityKind::Folder, name.into(), Some(setup_id), None))
    }

    /*
     * Adds an operation under a setup, under a folder, or (with `None`) under
     * no parent at all.
     */
    pub fn add_operation(
        &mut self,
        parent_id: Option<EntityId>,
        name: impl Into<String>,
        tool: ToolInfo,
    ) -> Result<EntityId> {
        if let Some(parent) = parent_id {
            self.check_parent(parent, EntityKind::Operation)?;
        }
        Ok(self.push(EntityKind::Operation, name.into(), parent_id, Some(tool)))
    }

    /// Attaches an aggregate tool context to a setup or folder.
    pub fn set_tool(&mut self, id: EntityId, tool: ToolInfo) -> Result<()> {
        let stored = self
            .entities
            .iter_mut()
            .find(|s| s.entity.id == id)
            .ok_or(DocumentError::UnknownEntity(id))?;
        stored.entity.tool = Some(tool);
        Ok(())
    }

    fn check_parent(&self, parent: EntityId, child: EntityKind) -> Result<()> {
        let parent_kind = self
            .entities
            .iter()
            .find(|s| s.entity.id == parent)
            .map(|s| s.entity.kind)
            .ok_or(DocumentError::UnknownEntity(parent))?;
        let allowed = match child {
            EntityKind::Setup => false,
            EntityKind::Folder => parent_kind == EntityKind::Setup,
            EntityKind::Operation => parent_kind != EntityKind::Operation,
        };
        if allowed {
            Ok(())
        } else {
            Err(DocumentError::InvalidParent { parent, child })
        }
    }

    fn push(
        &mut self,
        kind: EntityKind,
        name: String,
        parent_id: Option<EntityId>,
        tool: Option<ToolInfo>,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let parent_name = parent_id.and_then(|pid| {
            self.entities
                .iter()
                .find(|s| s.entity.id == pid)
                .map(|s| s.entity.name.clone())
        });
        log::trace!("InMemoryCamDocument: Added {kind:?} '{name}' as {id:?}");
        self.entities.push(StoredEntity {
            entity: OperationEntity {
                id,
                kind,
                name,
                parent_name,
                tool,
            },
            parent_id,
        });
        id
    }

    fn entities_where<F>(&self, predicate: F) -> Vec<OperationEntity>
    where
        F: Fn(&StoredEntity) -> bool,
    {
        self.entities
            .iter()
            .filter(|s| predicate(s))
            .map(|s| s.entity.clone())
            .collect()
    }
}

impl CamDocumentOperations for InMemoryCamDocument {
    fn setups(&self) -> Vec<OperationEntity> {
        self.entities_where(|s| s.entity.kind == EntityKind::Setup)
    }

    fn folders_of(&self, setup_id: EntityId) -> Vec<OperationEntity> {
        self.entities_where(|s| s.entity.kind == EntityKind::Folder && s.parent_id == Some(setup_id))
    }

    fn all_operations(&self) -> Vec<OperationEntity> {
        self.entities_where(|s| s.entity.kind == EntityKind::Operation)
    }

    fn generic_post_folder(&self) -> PathBuf {
        self.generic_post_folder.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> ToolInfo {
        ToolInfo::new("EM1", 6.0, "mm", 12000.0)
    }

    #[test]
    fn test_hierarchy_views_follow_document_order() {
        let mut doc = InMemoryCamDocument::new("/posts");
        let s1 = doc.add_setup("S1");
        let s2 = doc.add_setup("S2");
        let f1 = doc.add_folder(s1, "F1").unwrap();
        doc.add_folder(s2, "F2").unwrap();
        doc.add_operation(Some(f1), "O1", tool()).unwrap();
        doc.add_operation(Some(s2), "O2", tool()).unwrap();
        doc.add_operation(None, "O3", tool()).unwrap();

        let setup_names: Vec<String> = doc.setups().into_iter().map(|e| e.name).collect();
        assert_eq!(setup_names, vec!["S1", "S2"]);

        let s1_folders = doc.folders_of(s1);
        assert_eq!(s1_folders.len(), 1);
        assert_eq!(s1_folders[0].name, "F1");
        assert_eq!(s1_folders[0].parent_name.as_deref(), Some("S1"));

        let ops = doc.all_operations();
        let op_names: Vec<&str> = ops.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(op_names, vec!["O1", "O2", "O3"]);
        assert_eq!(ops[0].parent_name.as_deref(), Some("F1"));
        assert_eq!(ops[1].parent_name.as_deref(), Some("S2"));
        assert_eq!(ops[2].parent_name, None);
        assert_eq!(doc.generic_post_folder(), PathBuf::from("/posts"));
    }

    #[test]
    fn test_invalid_parents_are_rejected() {
        let mut doc = InMemoryCamDocument::new("/posts");
        let s1 = doc.add_setup("S1");
        let f1 = doc.add_folder(s1, "F1").unwrap();
        let o1 = doc.add_operation(Some(f1), "O1", tool()).unwrap();

        assert_eq!(
            doc.add_folder(f1, "Nested"),
            Err(DocumentError::InvalidParent {
                parent: f1,
                child: EntityKind::Folder
            })
        );
        assert_eq!(
            doc.add_operation(Some(o1), "Child", tool()),
            Err(DocumentError::InvalidParent {
                parent: o1,
                child: EntityKind::Operation
            })
        );
        assert_eq!(
            doc.add_folder(EntityId(999), "Orphan"),
            Err(DocumentError::UnknownEntity(EntityId(999)))
        );
    }

    #[test]
    fn test_set_tool_on_setup() {
        let mut doc = InMemoryCamDocument::new("/posts");
        let s1 = doc.add_setup("S1");
        assert!(doc.setups()[0].tool.is_none());

        doc.set_tool(s1, tool()).unwrap();
        assert_eq!(doc.setups()[0].tool, Some(tool()));
        assert!(doc.set_tool(EntityId(42), tool()).is_err());
    }
}
