use crate::foundation::core::{GeoPoint, GridPoint};
use crate::foundation::error::{RouteplayError, RouteplayResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier of a delivery node.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Solver output as delivered to the engine, once per view load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SolutionDef {
    /// One entry per vehicle.
    #[serde(default)]
    pub routes: Vec<RouteDef>,
    /// All delivery stops in grid space.
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

/// One vehicle's assignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDef {
    /// Route id; integers and strings are both accepted.
    #[serde(default)]
    pub id: Option<RouteIdDef>,
    /// Vehicle number shown to users.
    #[serde(alias = "vehicleNumber")]
    pub vehicle_number: u32,
    /// Node ids in visiting order.
    #[serde(default)]
    pub deliveries: Vec<NodeId>,
    /// Coarse waypoints in grid space.
    #[serde(default)]
    pub steps: Vec<GridPoint>,
    /// Fine geometry, already geographic.
    #[serde(default, alias = "fullPath")]
    pub full_path: Vec<GeoPoint>,
    /// Solver cost.
    #[serde(default)]
    pub cost: f64,
}

/// Route ids arrive as either JSON numbers or strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteIdDef {
    /// Integer id.
    Int(i64),
    /// String id.
    Str(String),
}

impl RouteIdDef {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Str(s) => s,
        }
    }
}

/// A delivery stop in grid space.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NodeDef {
    /// Node id.
    pub id: NodeId,
    /// Grid x.
    pub x: f64,
    /// Grid y.
    pub y: f64,
}

impl SolutionDef {
    /// Parse a solver payload from a JSON string.
    pub fn from_json_str(s: &str) -> RouteplayResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a solver payload file.
    pub fn from_path(path: impl AsRef<Path>) -> RouteplayResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            RouteplayError::payload(format!("read solution '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/solution/payload.rs"]
mod tests;
