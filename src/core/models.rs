use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// Named tool parameters as exposed by the CAM document.
pub const TOOL_PARAM_PRODUCT_ID: &str = "tool_productId";
pub const TOOL_PARAM_DIAMETER: &str = "tool_diameter";
pub const TOOL_PARAM_UNIT: &str = "tool_unit";
pub const TOOL_PARAM_SPINDLE_SPEED: &str = "tool_spindleSpeed";

// Which of the three pickers (or none) drives the post target. Persisted
// using the radio-button labels of the dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    Setups,
    #[default]
    Folders,
    Operations,
    #[serde(rename = "All Operations")]
    AllOperations,
}

impl SelectionMode {
    /// Radio-group order, as laid out in the dialog.
    pub const ALL: [SelectionMode; 4] = [
        SelectionMode::Setups,
        SelectionMode::Folders,
        SelectionMode::Operations,
        SelectionMode::AllOperations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Setups => "Setups",
            SelectionMode::Folders => "Folders",
            SelectionMode::Operations => "Operations",
            SelectionMode::AllOperations => "All Operations",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.label() == label)
    }

    pub fn radio_index(self) -> usize {
        match self {
            SelectionMode::Setups => 0,
            SelectionMode::Folders => 1,
            SelectionMode::Operations => 2,
            SelectionMode::AllOperations => 3,
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Identity of an entity inside one document. Two entities may share a display
// name; they never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Setup,
    Folder,
    Operation,
}

#[derive(Debug)]
pub enum ToolParameterError {
    Missing(&'static str),
    WrongType(&'static str),
}

impl fmt::Display for ToolParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolParameterError::Missing(name) => write!(f, "Tool parameter '{name}' is missing"),
            ToolParameterError::WrongType(name) => {
                write!(f, "Tool parameter '{name}' has an unexpected type")
            }
        }
    }
}

impl std::error::Error for ToolParameterError {}

/*
 * The tool attributes that end up in an output filename. Spindle speed is kept
 * as reported by the document; truncation to whole rpm happens at formatting time.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInfo {
    pub product_id: String,
    pub diameter: f64,
    pub diameter_unit: String,
    pub spindle_speed: f64,
}

impl ToolInfo {
    pub fn new(
        product_id: impl Into<String>,
        diameter: f64,
        diameter_unit: impl Into<String>,
        spindle_speed: f64,
    ) -> Self {
        ToolInfo {
            product_id: product_id.into(),
            diameter,
            diameter_unit: diameter_unit.into(),
            spindle_speed,
        }
    }

    /*
     * Reads the four filename-relevant parameters from a host-supplied
     * named-parameter map. Every parameter must be present with the expected
     * JSON type; nothing is defaulted.
     */
    pub fn from_parameters(params: &HashMap<String, Value>) -> Result<Self, ToolParameterError> {
        fn string_param(
            params: &HashMap<String, Value>,
            name: &'static str,
        ) -> Result<String, ToolParameterError> {
            params
                .get(name)
                .ok_or(ToolParameterError::Missing(name))?
                .as_str()
                .map(str::to_string)
                .ok_or(ToolParameterError::WrongType(name))
        }
        fn number_param(
            params: &HashMap<String, Value>,
            name: &'static str,
        ) -> Result<f64, ToolParameterError> {
            params
                .get(name)
                .ok_or(ToolParameterError::Missing(name))?
                .as_f64()
                .ok_or(ToolParameterError::WrongType(name))
        }

        Ok(ToolInfo {
            product_id: string_param(params, TOOL_PARAM_PRODUCT_ID)?,
            diameter: number_param(params, TOOL_PARAM_DIAMETER)?,
            diameter_unit: string_param(params, TOOL_PARAM_UNIT)?,
            spindle_speed: number_param(params, TOOL_PARAM_SPINDLE_SPEED)?,
        })
    }
}

/*
 * Read-only view of one node in the document's machining hierarchy.
 * `parent_name` is the display name of the directly containing setup or
 * folder, if any. `tool` is always present for operations built through
 * `InMemoryCamDocument`; setups and folders carry one only when the host
 * exposes an aggregate tool context for them.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct OperationEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub parent_name: Option<String>,
    pub tool: Option<ToolInfo>,
}
