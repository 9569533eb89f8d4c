use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct Project {
    /// Opaque identifier of the project
    pub id: String,
    /// Name of the project
    pub name: String,
    /// Description of the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Color tag used when rendering the project, e.g. `#1e3a8a`
    pub color: String,
}
