//! Response envelopes.
//!
//! Each endpoint returns exactly one of the three shapes in
//! [`ResponseEnvelope`]. Field names follow the wire format expected by the
//! EDX client (PascalCase, plus a few literal column headers such as
//! `"X (mm)"`). Absent values are serialized as `null` rather than omitted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationVerdict, UNKNOWN_COLUMN_DIAGNOSTIC};

/// Body-level status for a passing validation.
pub const CODE_OK: i32 = 0;
/// Body-level status for a failed validation. The transport status stays 200.
pub const CODE_FAILED: i32 = 500;

/// A template number that keeps its integer or float form on the wire,
/// so `6` stays `6` and is never written as `6.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// One element of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompositionElement {
    pub compound_index: i32,
    pub element_name: String,
    pub value_absolute: Option<f64>,
    pub value_percent: Numeric,
}

/// A sample property attached to a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Property {
    #[serde(rename = "PropertyID")]
    pub property_id: i32,
    #[serde(rename = "Type")]
    pub property_type: i32,
    pub name: String,
    pub value: Numeric,
    pub value_epsilon: Option<f64>,
    pub sort_code: i32,
    pub row: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Composition {
    pub composition_elements: Vec<CompositionElement>,
    pub delete_previous_properties: bool,
    pub properties: Vec<Property>,
}

/// Body of `POST /databasevaluesbody`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompositionResult {
    pub compositions: Vec<Composition>,
}

impl CompositionResult {
    /// The fixed sample composition (V, Mn, Co, Ni, Ho).
    pub fn template() -> Self {
        let element = |name: &str, percent: Numeric| CompositionElement {
            compound_index: 0,
            element_name: name.to_string(),
            value_absolute: None,
            value_percent: percent,
        };

        Self {
            compositions: vec![Composition {
                composition_elements: vec![
                    element("V", Numeric::Float(31.299999237906547)),
                    element("Mn", Numeric::Float(2.700000047683716)),
                    element("Co", Numeric::Float(22.600000381469727)),
                    element("Ni", Numeric::Int(6)),
                    element("Ho", Numeric::Float(37.400001525878906)),
                ],
                delete_previous_properties: true,
                properties: vec![Property {
                    property_id: 0,
                    property_type: 2,
                    name: "Measurement Area".to_string(),
                    value: Numeric::Int(1),
                    value_epsilon: None,
                    sort_code: 10,
                    row: None,
                    comment: None,
                }],
            }],
        }
    }
}

/// Body of `POST /validation/body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationResult {
    pub code: i32,
    pub message: Option<String>,
    pub warning: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            code: CODE_OK,
            message: None,
            warning: None,
        }
    }

    /// Failure body. The message is fixed and never carries internal detail.
    pub fn failed() -> Self {
        Self {
            code: CODE_FAILED,
            message: Some(UNKNOWN_COLUMN_DIAGNOSTIC.to_string()),
            warning: None,
        }
    }

    pub fn from_verdict(verdict: &ValidationVerdict) -> Self {
        if verdict.is_pass() {
            Self::ok()
        } else {
            Self::failed()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// One spectrum row of the measurement table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumRow {
    #[serde(rename = "Spectrum")]
    pub spectrum: String,
    #[serde(rename = "In stats.")]
    pub in_stats: String,
    #[serde(rename = "X (mm)")]
    pub x_mm: f64,
    #[serde(rename = "Y (mm)")]
    pub y_mm: f64,
    /// Element concentrations keyed by symbol, in column order.
    #[serde(flatten)]
    pub elements: IndexMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    #[serde(rename = "DataTable")]
    pub rows: Vec<SpectrumRow>,
}

/// Body of `POST /tablebody`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    pub data: DataTable,
}

impl TableResult {
    /// The fixed single-spectrum measurement table.
    pub fn template() -> Self {
        let elements: IndexMap<String, f64> = [
            ("C", 80.36562),
            ("O", 17.7799),
            ("Si", 0.331076),
            ("V", -0.3328189),
            ("Mn", 0.09434319),
            ("Co", 1.12593),
            ("Ni", 1.070188),
            ("Ho", -0.4342265),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            data: DataTable {
                rows: vec![SpectrumRow {
                    spectrum: "Spektrum 1 {1}".to_string(),
                    in_stats: "Yes".to_string(),
                    x_mm: -44.6,
                    y_mm: -40.3,
                    elements,
                }],
            },
        }
    }
}

/// The single response body produced for a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Composition(CompositionResult),
    Validation(ValidationResult),
    Table(TableResult),
}

impl ResponseEnvelope {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<CompositionResult> for ResponseEnvelope {
    fn from(value: CompositionResult) -> Self {
        Self::Composition(value)
    }
}

impl From<ValidationResult> for ResponseEnvelope {
    fn from(value: ValidationResult) -> Self {
        Self::Validation(value)
    }
}

impl From<TableResult> for ResponseEnvelope {
    fn from(value: TableResult) -> Self {
        Self::Table(value)
    }
}
