/*
 * Selection resolution in two steps. `resolve_scope` turns the dialog's active
 * mode and picker selections into an `ExportScope`; `expand_scope` turns a
 * scope into the ordered list of entities to post.
 *
 * Matching is by display name only. When several setups, folders or
 * operations share the scope's name, every match is returned.
 */
use super::document::CamDocumentOperations;
use super::models::{EntityId, OperationEntity, SelectionMode};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// Display name of a setup, folder or operation.
    Named(String),
    /// Every operation in the document.
    AllOperations,
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportScope::Named(name) => write!(f, "'{name}'"),
            ExportScope::AllOperations => f.write_str("all operations"),
        }
    }
}

// Display names currently selected in each picker; `None` until the user picks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerSelections {
    pub setup: Option<String>,
    pub folder: Option<String>,
    pub operation: Option<String>,
}

/*
 * Returns `None` when the picker belonging to `mode` has no selection. That is
 * a gap in user input, not an error, and the caller must not start an export.
 */
pub fn resolve_scope(mode: SelectionMode, selections: &PickerSelections) -> Option<ExportScope> {
    let picked = match mode {
        SelectionMode::Setups => &selections.setup,
        SelectionMode::Folders => &selections.folder,
        SelectionMode::Operations => &selections.operation,
        SelectionMode::AllOperations => return Some(ExportScope::AllOperations),
    };
    let scope = picked.clone().map(ExportScope::Named);
    if scope.is_none() {
        log::debug!("Resolver: No item selected for mode '{mode}'");
    }
    scope
}

pub fn expand_scope(
    document: &dyn CamDocumentOperations,
    scope: &ExportScope,
) -> Vec<OperationEntity> {
    let name = match scope {
        ExportScope::AllOperations => return document.all_operations(),
        ExportScope::Named(name) => name,
    };

    let mut targets = Vec::new();
    for setup in document.setups() {
        if &setup.name == name {
            targets.push(setup);
        } else {
            targets.extend(
                document
                    .folders_of(setup.id)
                    .into_iter()
                    .filter(|folder| &folder.name == name),
            );
        }
    }
    targets.extend(
        document
            .all_operations()
            .into_iter()
            .filter(|operation| &operation.name == name),
    );
    log::trace!("Resolver: Scope {scope} matched {} entities", targets.len());
    targets
}

/// Drops repeated entities (same id), keeping the first occurrence in order.
pub fn dedupe_by_identity(entities: Vec<OperationEntity>) -> Vec<OperationEntity> {
    let mut seen: HashSet<EntityId> = HashSet::new();
    entities
        .into_iter()
        .filter(|entity| seen.insert(entity.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::InMemoryCamDocument;
    use crate::core::models::{EntityKind, ToolInfo};

    fn names(entities: &[OperationEntity]) -> Vec<&str> {
        entities.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample_document() -> InMemoryCamDocument {
        let mut doc = InMemoryCamDocument::new("/posts");
        let s1 = doc.add_setup("S1");
        let f1 = doc.add_folder(s1, "F1").unwrap();
        doc.add_operation(Some(f1), "O1", ToolInfo::new("EM1", 6.0, "mm", 12000.0))
            .unwrap();
        doc.add_operation(None, "O2", ToolInfo::new("EM2", 3.0, "mm", 9000.0))
            .unwrap();
        doc
    }

    #[test]
    fn test_resolve_scope_uses_picker_of_active_mode() {
        let selections = PickerSelections {
            setup: Some("S1".to_string()),
            folder: Some("F1".to_string()),
            operation: Some("O1".to_string()),
        };
        assert_eq!(
            resolve_scope(SelectionMode::Setups, &selections),
            Some(ExportScope::Named("S1".to_string()))
        );
        assert_eq!(
            resolve_scope(SelectionMode::Folders, &selections),
            Some(ExportScope::Named("F1".to_string()))
        );
        assert_eq!(
            resolve_scope(SelectionMode::Operations, &selections),
            Some(ExportScope::Named("O1".to_string()))
        );
    }

    #[test]
    fn test_resolve_scope_without_selection_yields_none() {
        let selections = PickerSelections {
            setup: Some("S1".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_scope(SelectionMode::Operations, &selections), None);
        assert_eq!(resolve_scope(SelectionMode::Folders, &selections), None);
    }

    #[test]
    fn test_resolve_scope_all_operations_ignores_pickers() {
        assert_eq!(
            resolve_scope(SelectionMode::AllOperations, &PickerSelections::default()),
            Some(ExportScope::AllOperations)
        );
    }

    #[test]
    fn test_expand_setup_scope_posts_whole_setup() {
        let doc = sample_document();
        let targets = expand_scope(&doc, &ExportScope::Named("S1".to_string()));
        assert_eq!(names(&targets), vec!["S1"]);
        assert_eq!(targets[0].kind, EntityKind::Setup);
    }

    #[test]
    fn test_expand_folder_scope() {
        let doc = sample_document();
        let targets = expand_scope(&doc, &ExportScope::Named("F1".to_string()));
        assert_eq!(names(&targets), vec!["F1"]);
        assert_eq!(targets[0].parent_name.as_deref(), Some("S1"));
    }

    #[test]
    fn test_expand_all_operations_in_document_order() {
        let doc = sample_document();
        let targets = expand_scope(&doc, &ExportScope::AllOperations);
        assert_eq!(names(&targets), vec!["O1", "O2"]);
        assert!(targets.iter().all(|e| e.kind == EntityKind::Operation));
    }

    #[test]
    fn test_all_operations_is_not_a_name() {
        let mut doc = sample_document();
        doc.add_setup("ALL");
        doc.add_setup("All Operations");

        let by_sentinel = expand_scope(&doc, &ExportScope::AllOperations);
        assert_eq!(names(&by_sentinel), vec!["O1", "O2"]);

        let by_name = expand_scope(&doc, &ExportScope::Named("ALL".to_string()));
        assert_eq!(names(&by_name), vec!["ALL"]);
        assert_eq!(by_name[0].kind, EntityKind::Setup);
    }

    #[test]
    fn test_duplicate_names_all_match() {
        let mut doc = InMemoryCamDocument::new("/posts");
        let s1 = doc.add_setup("S1");
        let s2 = doc.add_setup("S2");
        doc.add_folder(s1, "Roughing").unwrap();
        doc.add_folder(s2, "Roughing").unwrap();
        doc.add_operation(Some(s2), "Roughing", ToolInfo::new("EM3", 10.0, "mm", 8000.0))
            .unwrap();

        let targets = expand_scope(&doc, &ExportScope::Named("Roughing".to_string()));
        let kinds: Vec<EntityKind> = targets.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Folder, EntityKind::Folder, EntityKind::Operation]
        );
        let parents: Vec<Option<&str>> =
            targets.iter().map(|e| e.parent_name.as_deref()).collect();
        assert_eq!(parents, vec![Some("S1"), Some("S2"), Some("S2")]);
    }

    #[test]
    fn test_matching_setup_skips_its_folders() {
        let mut doc = InMemoryCamDocument::new("/posts");
        let s1 = doc.add_setup("Same");
        doc.add_folder(s1, "Same").unwrap();

        let targets = expand_scope(&doc, &ExportScope::Named("Same".to_string()));
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].kind, EntityKind::Setup);
    }

    #[test]
    fn test_unknown_name_expands_to_nothing() {
        let doc = sample_document();
        assert!(expand_scope(&doc, &ExportScope::Named("Missing".to_string())).is_empty());
    }

    #[test]
    fn test_dedupe_by_identity_keeps_same_named_distinct_entities() {
        let doc = sample_document();
        let ops = doc.all_operations();
        let first = ops[0].clone();
        let mut same_name = ops[1].clone();
        same_name.name = first.name.clone();

        let deduped = dedupe_by_identity(vec![first.clone(), same_name.clone(), first.clone()]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].id, first.id);
        assert_eq!(deduped[1].id, same_name.id);
        assert_eq!(deduped[0].name, deduped[1].name);
    }
}
