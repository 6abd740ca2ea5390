/*
 * Output naming for posted entities. Each target gets the program name
 *
 *     "{count} - {entity} - {productId}_{diameter:.3}{unit} ({rpm} rpm)"
 *
 * and is written under `{output_root}/{parent name}`. `count` is a per-parent
 * sequence number owned by a `ParentFileCounter`, which lives for exactly one
 * export run. Entities without a parent share the "" counter.
 *
 * Display names become exactly one path component below the output root, so
 * a name such as "/etc" or ".." never leaves it.
 */
use super::models::{OperationEntity, ToolInfo};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

pub const GCODE_EXTENSION: &str = "nc";

#[derive(Debug, Default)]
pub struct ParentFileCounter {
    counts: HashMap<String, u32>,
}

impl ParentFileCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, parent_name: &str) -> u32 {
        self.counts.get(parent_name).copied().unwrap_or(0)
    }

    // Returns the value before incrementing.
    fn take_next(&mut self, parent_name: &str) -> u32 {
        let slot = self.counts.entry(parent_name.to_string()).or_insert(0);
        let count = *slot;
        *slot += 1;
        count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedTarget {
    pub output_folder: PathBuf,
    pub program_name: String,
}

impl AllocatedTarget {
    /// Path of the file the post engine writes for `entity_name`.
    pub fn result_path(&self, entity_name: &str) -> PathBuf {
        self.output_folder.join(format!(
            "{}.{GCODE_EXTENSION}",
            path_component(entity_name)
        ))
    }
}

fn is_single_normal_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/*
 * Maps a display name onto one plain path component. Separators become '_';
 * if the result still is not a single normal component (".", "..", a drive
 * prefix) its dots and colons are replaced as well. "" stays "".
 */
pub fn path_component(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let mut component = name.replace(['/', '\\'], "_");
    if !is_single_normal_component(&component) {
        component = component.replace(['.', ':'], "_");
    }
    if component != name {
        log::debug!("FileNaming: Display name '{name}' maps to path component '{component}'");
    }
    component
}

/*
 * Diameter always carries three decimals and spindle speed is truncated to
 * whole rpm, so names are stable regardless of how the document stores them.
 */
pub fn format_tool_suffix(tool: &ToolInfo) -> String {
    format!(
        "{}_{:.3}{} ({} rpm)",
        tool.product_id,
        tool.diameter,
        tool.diameter_unit,
        tool.spindle_speed.trunc() as i64
    )
}

pub fn format_program_name(count: u32, entity: &OperationEntity) -> String {
    match &entity.tool {
        Some(tool) => format!("{count} - {} - {}", entity.name, format_tool_suffix(tool)),
        None => format!("{count} - {}", entity.name),
    }
}

pub fn allocate(
    counter: &mut ParentFileCounter,
    entity: &OperationEntity,
    output_root: &Path,
) -> AllocatedTarget {
    let parent_name = entity.parent_name.as_deref().unwrap_or("");
    let count = counter.take_next(parent_name);
    let target = AllocatedTarget {
        output_folder: output_root.join(path_component(parent_name)),
        program_name: format_program_name(count, entity),
    };
    log::trace!(
        "FileNaming: Allocated '{}' in {:?} for '{}'",
        target.program_name,
        target.output_folder,
        entity.name
    );
    target
}
