//! Storage node records
//!
//! A storage node in the drainage model is either *tabular* (its cross-section
//! is given by a named storage curve) or *prismatic* (a constant surface area,
//! so stored volume is simply depth times area).

use serde::{Deserialize, Serialize};

/// Geometry of a storage node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StorageGeometry {
    /// Cross-section given by a named curve in the model's curve table
    Tabular {
        /// Identifier of the storage curve
        curve: String,
    },

    /// Constant cross-sectional area (simple prismatic storage)
    Prismatic {
        /// Surface area (m2), stored volume = depth * area
        area: f64,
    },
}

/// One storage node as read from the model definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageNode {
    /// Node identifier as it appears in the model
    pub name: String,
    /// Tabular or prismatic geometry
    pub geometry: StorageGeometry,
}

/// Caller-supplied description of one storage node's usable headroom
///
/// The depth threshold is the maximum depth regarded as available before the
/// node is considered full and overflowing.
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::StorageSpec;
///
/// let spec = StorageSpec::new("j_10", 1.8);
/// assert_eq!(spec.node, "j_10");
/// assert_eq!(spec.depth_threshold, 1.8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSpec {
    /// Storage node identifier to resolve in the model
    pub node: String,
    /// Depth (m) up to which storage counts as available
    pub depth_threshold: f64,
}

impl StorageSpec {
    /// Convenience constructor
    pub fn new(node: impl Into<String>, depth_threshold: f64) -> Self {
        Self {
            node: node.into(),
            depth_threshold,
        }
    }
}
