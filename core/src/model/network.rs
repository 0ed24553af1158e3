//! Drainage model definition
//!
//! Parses the storage and curve tables out of a text model definition and
//! exposes them as typed records. Sections are introduced by a bracketed
//! header line (e.g. `[STORAGE]`, `[CURVES]`); lines beginning with `;` are
//! comments. Only the two sections the CBA needs are interpreted; everything
//! else is passed over untouched.
//!
//! # Field layout
//!
//! - `[STORAGE]` rows: whitespace-separated fields where field 0 is the node
//!   name, field 4 the geometry-type tag, and field 5 either the storage
//!   curve identifier (`TABULAR`) or a constant surface area.
//! - `[CURVES]` rows: field 0 is the curve identifier; the last two fields of
//!   each row are one (depth, area) sample. An optional curve-type tag may
//!   appear between them.
//!
//! # Critical Invariants
//!
//! 1. Curve tables are validated (strictly increasing depth) at parse time
//! 2. Storage rows are kept in file order, duplicates included; name lookup
//!    demands exactly one match

use crate::model::curve::{CurveError, VolumeCurve};
use crate::model::storage::{StorageGeometry, StorageNode};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Geometry-type tag marking a curve-referencing storage node
const TABULAR_TAG: &str = "TABULAR";

/// Errors raised while parsing or querying a model definition
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed [STORAGE] row at line {line}: expected at least 6 fields, found {fields}")]
    MalformedStorageRow { line: usize, fields: usize },

    #[error("Storage node '{name}' at line {line}: cannot parse surface area '{value}'")]
    MalformedStorageArea {
        name: String,
        line: usize,
        value: String,
    },

    #[error("Malformed curve row at line {line}: expected at least 3 fields, found {fields}")]
    MalformedCurveRow { line: usize, fields: usize },

    #[error("Curve '{curve}' at line {line}: cannot parse sample '{value}'")]
    MalformedCurveSample {
        curve: String,
        line: usize,
        value: String,
    },

    #[error("Curve '{curve}' is not a valid storage curve: {source}")]
    InvalidCurve {
        curve: String,
        #[source]
        source: CurveError,
    },

    #[error("Storage node '{0}' not found in model definition")]
    NodeNotFound(String),

    #[error("Storage node '{name}' matches {matches} rows in the model definition, expected exactly one")]
    AmbiguousNode { name: String, matches: usize },

    #[error("Storage curve '{0}' not found in model definition")]
    CurveNotFound(String),
}

/// Typed view of a model definition's storage and curve tables
///
/// # Example
///
/// ```
/// use drainage_simulator_core_rs::DrainageModel;
///
/// let text = "\
/// [STORAGE]
/// ;;Name  Elev  MaxDepth  InitDepth  Shape    Params
/// tank_1  0.0   3.0       0.0        TABULAR  sc_1
/// tank_2  0.0   2.0       0.0        FUNCTIONAL  120.0
///
/// [CURVES]
/// sc_1  STORAGE  0.0  100.0
/// sc_1           2.0  140.0
/// ";
///
/// let model = DrainageModel::parse(text).unwrap();
/// assert_eq!(model.num_storage_nodes(), 2);
/// assert!(model.curve("sc_1").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct DrainageModel {
    /// Storage rows in file order (duplicate names preserved for lookup checks)
    storage: Vec<StorageNode>,

    /// Storage curves indexed by identifier
    curves: HashMap<String, VolumeCurve>,
}

impl DrainageModel {
    /// Parse a model definition from text
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let mut storage = Vec::new();
        let mut curve_samples: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
        let mut section: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                section = Some(
                    line.trim_start_matches('[')
                        .trim_end_matches(']')
                        .to_uppercase(),
                );
                continue;
            }

            match section.as_deref() {
                Some("STORAGE") => storage.push(Self::parse_storage_row(line, line_no)?),
                Some("CURVES") => {
                    let (curve, sample) = Self::parse_curve_row(line, line_no)?;
                    curve_samples.entry(curve).or_default().push(sample);
                }
                _ => {}
            }
        }

        let mut curves = HashMap::with_capacity(curve_samples.len());
        for (curve, samples) in curve_samples {
            let built = VolumeCurve::new(samples).map_err(|source| ModelError::InvalidCurve {
                curve: curve.clone(),
                source,
            })?;
            curves.insert(curve, built);
        }

        Ok(Self { storage, curves })
    }

    /// Read and parse a model definition file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn parse_storage_row(line: &str, line_no: usize) -> Result<StorageNode, ModelError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(ModelError::MalformedStorageRow {
                line: line_no,
                fields: fields.len(),
            });
        }

        let name = fields[0].to_string();
        let geometry = if fields[4].eq_ignore_ascii_case(TABULAR_TAG) {
            StorageGeometry::Tabular {
                curve: fields[5].to_string(),
            }
        } else {
            let area = fields[5]
                .parse::<f64>()
                .map_err(|_| ModelError::MalformedStorageArea {
                    name: name.clone(),
                    line: line_no,
                    value: fields[5].to_string(),
                })?;
            StorageGeometry::Prismatic { area }
        };

        Ok(StorageNode { name, geometry })
    }

    fn parse_curve_row(line: &str, line_no: usize) -> Result<(String, (f64, f64)), ModelError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(ModelError::MalformedCurveRow {
                line: line_no,
                fields: fields.len(),
            });
        }

        let curve = fields[0].to_string();
        // Only the trailing (x, y) pair carries data; a curve-type tag may sit
        // between the identifier and the samples.
        let parse = |value: &str| -> Result<f64, ModelError> {
            value
                .parse::<f64>()
                .map_err(|_| ModelError::MalformedCurveSample {
                    curve: curve.clone(),
                    line: line_no,
                    value: value.to_string(),
                })
        };
        let depth = parse(fields[fields.len() - 2])?;
        let area = parse(fields[fields.len() - 1])?;

        Ok((curve, (depth, area)))
    }

    /// Resolve a storage node by name, requiring exactly one matching row
    ///
    /// # Errors
    ///
    /// * `ModelError::NodeNotFound` - no `[STORAGE]` row carries the name
    /// * `ModelError::AmbiguousNode` - more than one row carries the name
    pub fn storage_node(&self, name: &str) -> Result<&StorageNode, ModelError> {
        let mut matches = self.storage.iter().filter(|node| node.name == name);
        match (matches.next(), matches.next()) {
            (Some(node), None) => Ok(node),
            (None, _) => Err(ModelError::NodeNotFound(name.to_string())),
            (Some(_), Some(_)) => {
                let count = self.storage.iter().filter(|n| n.name == name).count();
                Err(ModelError::AmbiguousNode {
                    name: name.to_string(),
                    matches: count,
                })
            }
        }
    }

    /// Look up a storage curve by identifier
    pub fn curve(&self, id: &str) -> Option<&VolumeCurve> {
        self.curves.get(id)
    }

    /// Number of storage rows read from the model
    pub fn num_storage_nodes(&self) -> usize {
        self.storage.len()
    }

    /// Storage rows in file order
    pub fn storage_nodes(&self) -> &[StorageNode] {
        &self.storage
    }

    /// Number of storage curves read from the model
    pub fn num_curves(&self) -> usize {
        self.curves.len()
    }
}
