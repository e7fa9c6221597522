//! Project Schema
//!
//! Records handed over by the drawing and persistence layers. Field types are
//! read leniently (see [`crate::lenient`]); only a document that is not a
//! project at all is rejected.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::{CalcError, EvaluationOptions};
use crate::devices::schema::Device;
use crate::lenient::{
    de_flag, de_non_negative_f64, de_opt_gauge, de_string, number_from_value, parse_awg,
    text_from_value,
};

/// Circuit classification. Blank or missing means SLC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum CircuitType {
    /// Signaling Line Circuit (initiating devices)
    #[default]
    Slc,
    /// Notification Appliance Circuit
    Nac,
    /// Auxiliary power
    Power,
    /// Any other label, upper-cased
    Other(String),
}

impl CircuitType {
    pub fn parse(label: &str) -> Self {
        let upper = label.trim().to_ascii_uppercase();
        match upper.as_str() {
            "" | "SLC" => CircuitType::Slc,
            "NAC" => CircuitType::Nac,
            "POWER" => CircuitType::Power,
            _ => CircuitType::Other(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CircuitType::Slc => "SLC",
            CircuitType::Nac => "NAC",
            CircuitType::Power => "POWER",
            CircuitType::Other(label) => label,
        }
    }
}

impl From<Value> for CircuitType {
    fn from(value: Value) -> Self {
        text_from_value(&value)
            .map(|label| CircuitType::parse(&label))
            .unwrap_or_default()
    }
}

impl From<CircuitType> for String {
    fn from(circuit_type: CircuitType) -> Self {
        circuit_type.as_str().to_string()
    }
}

impl fmt::Display for CircuitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit<D = Device> {
    #[serde(default, rename = "type", alias = "circuit_type")]
    pub circuit_type: CircuitType,
    #[serde(default)]
    pub devices: Vec<D>,
}

impl<D> Circuit<D> {
    pub fn new(circuit_type: CircuitType) -> Self {
        Self {
            circuit_type,
            devices: Vec::new(),
        }
    }

    pub fn with_devices(mut self, devices: Vec<D>) -> Self {
        self.devices = devices;
        self
    }
}

/// A fire-alarm control panel. Circuits keep their input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel<D = Device> {
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(
        default,
        alias = "main_panel",
        alias = "is_main_panel",
        deserialize_with = "de_flag"
    )]
    pub is_main: bool,
    #[serde(default)]
    pub circuits: IndexMap<String, Circuit<D>>,
}

impl<D> Panel<D> {
    pub fn new(name: &str, is_main: bool) -> Self {
        Self {
            name: name.to_string(),
            is_main,
            circuits: IndexMap::new(),
        }
    }

    pub fn main(name: &str) -> Self {
        Self::new(name, true)
    }

    pub fn with_circuit(mut self, id: &str, circuit: Circuit<D>) -> Self {
        self.circuits.insert(id.to_string(), circuit);
        self
    }
}

/// One drawn run of cable belonging to a circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireSegment {
    #[serde(default, alias = "length", deserialize_with = "de_non_negative_f64")]
    pub length_ft: f64,
    #[serde(default, alias = "awg", deserialize_with = "de_opt_gauge")]
    pub gauge: Option<String>,
    #[serde(default, alias = "circuit_id", deserialize_with = "de_string")]
    pub circuit: String,
}

impl WireSegment {
    pub fn new(circuit: &str, length_ft: f64, gauge: &str) -> Self {
        Self {
            length_ft: crate::lenient::non_negative(length_ft),
            gauge: Some(crate::lenient::normalize_gauge(gauge)).filter(|g| !g.is_empty()),
            circuit: circuit.trim().to_string(),
        }
    }
}

/// A conduit run and the conductors bundled in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wirepath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "kind", deserialize_with = "de_string")]
    pub conduit_kind: String,
    #[serde(default, alias = "size", deserialize_with = "de_string")]
    pub trade_size: String,
    /// AWG -> conductor count
    #[serde(default, deserialize_with = "de_wire_counts")]
    pub wires: BTreeMap<u32, i64>,
}

/// Keys may be spelled `"18"`, `"18AWG"` or `"#18"`; a key that is not a
/// gauge at all is an error so the fill check cannot silently lose conductors.
fn de_wire_counts<'de, D>(deserializer: D) -> Result<BTreeMap<u32, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    let mut wires = BTreeMap::new();
    for (key, value) in raw {
        let awg = parse_awg(&key)
            .ok_or_else(|| D::Error::custom(format!("invalid wire gauge key {:?}", key)))?;
        let count = number_from_value(&value).unwrap_or(0.0).trunc() as i64;
        *wires.entry(awg).or_insert(0) += count;
    }
    Ok(wires)
}

/// Everything one evaluation needs, as stored in a project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project<D = Device> {
    #[serde(default)]
    pub panels: Vec<Panel<D>>,
    #[serde(default)]
    pub wires: Vec<WireSegment>,
    #[serde(default)]
    pub wirepaths: Vec<Wirepath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<EvaluationOptions>,
}

impl<D> Default for Project<D> {
    fn default() -> Self {
        Self {
            panels: Vec::new(),
            wires: Vec::new(),
            wirepaths: Vec::new(),
            options: None,
        }
    }
}

impl<D: DeserializeOwned + Default> Project<D> {
    pub fn from_json(content: &str) -> Result<Self, CalcError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, CalcError> {
        let content = std::fs::read_to_string(path)?;
        let project = Self::from_json(&content)?;
        tracing::info!(
            "Loaded project {:?}: {} panels, {} wire segments",
            path,
            project.panels.len(),
            project.wires.len()
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_circuit_type_parse() {
        assert_eq!(CircuitType::parse(""), CircuitType::Slc);
        assert_eq!(CircuitType::parse(" nac "), CircuitType::Nac);
        assert_eq!(CircuitType::parse("Power"), CircuitType::Power);
        assert_eq!(CircuitType::parse("aux"), CircuitType::Other("AUX".to_string()));
    }

    #[test]
    fn test_circuit_type_serde() {
        let circuit: Circuit = serde_json::from_value(json!({"type": null, "devices": []})).unwrap();
        assert_eq!(circuit.circuit_type, CircuitType::Slc);
        let circuit: Circuit = serde_json::from_value(json!({"devices": []})).unwrap();
        assert_eq!(circuit.circuit_type, CircuitType::Slc);
        let circuit: Circuit = serde_json::from_value(json!({"type": "nac"})).unwrap();
        assert_eq!(circuit.circuit_type, CircuitType::Nac);
        assert_eq!(serde_json::to_value(&circuit.circuit_type).unwrap(), json!("NAC"));
    }

    #[test]
    fn test_panel_preserves_circuit_order() {
        let panel: Panel = serde_json::from_value(json!({
            "name": "FACP-1",
            "main_panel": true,
            "circuits": {
                "SLC2": {"type": "SLC"},
                "NAC1": {"type": "NAC"},
                "AUX": {"type": "POWER"}
            }
        }))
        .unwrap();
        assert!(panel.is_main);
        let ids: Vec<&str> = panel.circuits.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["SLC2", "NAC1", "AUX"]);
    }

    #[test]
    fn test_wire_segment_lenient_fields() {
        let wire: WireSegment = serde_json::from_value(json!({
            "length": "120.5",
            "awg": 14,
            "circuit_id": "NAC1"
        }))
        .unwrap();
        assert_eq!(wire.length_ft, 120.5);
        assert_eq!(wire.gauge.as_deref(), Some("14"));
        assert_eq!(wire.circuit, "NAC1");

        let broken: WireSegment =
            serde_json::from_value(json!({"length_ft": "far", "gauge": "18 AWG", "circuit": "SLC1"}))
                .unwrap();
        assert_eq!(broken.length_ft, 0.0);
        assert_eq!(broken.gauge.as_deref(), Some("18"));

        let negative: WireSegment = serde_json::from_value(json!({"length_ft": -40})).unwrap();
        assert_eq!(negative.length_ft, 0.0);
    }

    #[test]
    fn test_wirepath_keys_normalized() {
        let path: Wirepath = serde_json::from_value(json!({
            "kind": "EMT",
            "size": "3/4",
            "wires": {"18": 10, "#12": "2", "18AWG": 2}
        }))
        .unwrap();
        assert_eq!(path.wires.get(&18), Some(&12));
        assert_eq!(path.wires.get(&12), Some(&2));
    }

    #[test]
    fn test_wirepath_bad_key_rejected() {
        let result: Result<Wirepath, _> =
            serde_json::from_value(json!({"kind": "EMT", "size": "1", "wires": {"thick": 2}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_project_from_json() {
        let project: Project = Project::from_json(
            r#"{
                "panels": [{"name": "Main", "is_main": true, "circuits": {"NAC1": {"type": "NAC", "devices": [{"name": "Horn"}]}}}],
                "wires": [{"length_ft": 100, "gauge": "18", "circuit": "NAC1"}],
                "options": {"standby_hours": 60}
            }"#,
        )
        .unwrap();
        assert_eq!(project.panels.len(), 1);
        assert_eq!(project.panels[0].circuits["NAC1"].devices[0].name, "Horn");
        assert_eq!(project.options.unwrap().standby_hours, 60.0);
        assert!(project.wirepaths.is_empty());
    }

    #[test]
    fn test_project_rejects_non_project() {
        assert!(matches!(
            Project::<Device>::from_json("[]"),
            Err(CalcError::Parse(_))
        ));
    }

    #[test]
    fn test_raw_json_devices() {
        let project: Project<Value> = Project::from_json(
            r#"{"panels": [{"name": "P", "is_main": 1, "circuits": {"C": {"devices": [{"alarm_ma": "x"}]}}}]}"#,
        )
        .unwrap();
        assert!(project.panels[0].is_main);
        assert_eq!(project.panels[0].circuits["C"].devices.len(), 1);
    }
}
