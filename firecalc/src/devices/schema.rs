//! Device Record Schema
//!
//! Device records come from several producers (drawing canvas, imported
//! project files, catalog pickers) with different shapes. The resolver only
//! sees them through [`DeviceFields`], which is implemented for the typed
//! [`Device`] record and for raw JSON objects.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::lenient::{de_opt_f64, de_string, number_from_value, text_from_value};

/// A current reading in the unit it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Current {
    Amps(f64),
    Milliamps(f64),
}

impl Current {
    pub fn as_amps(self) -> f64 {
        match self {
            Current::Amps(a) => a,
            Current::Milliamps(ma) => ma / 1000.0,
        }
    }
}

/// A field was present but could not be read.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("field '{field}' is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },
    #[error("field '{field}' has unexpected shape (expected {expected})")]
    WrongShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// Read access to the fields the current resolver understands.
///
/// Every accessor is optional; implementors override what their record
/// actually carries. Numeric accessors return `Err` when a value is present
/// but unreadable, so the caller can tell "absent" from "broken".
pub trait DeviceFields {
    fn name(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn manufacturer(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn part_number(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn model(&self) -> Option<Cow<'_, str>> {
        None
    }

    fn standby_current(&self) -> Result<Option<Current>, FieldError> {
        Ok(None)
    }

    fn alarm_current(&self) -> Result<Option<Current>, FieldError> {
        Ok(None)
    }

    /// Strobe rating, either on the device or under its coverage descriptor.
    fn candela(&self) -> Result<Option<f64>, FieldError> {
        Ok(None)
    }
}

/// Coverage descriptor attached to notification appliances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub candela: Option<f64>,
}

/// Typed device record as stored in project files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de_string")]
    pub manufacturer: String,
    #[serde(default, alias = "part", deserialize_with = "de_string")]
    pub part_number: String,
    #[serde(default, deserialize_with = "de_string")]
    pub model: String,
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub standby_current_a: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub alarm_current_a: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub standby_ma: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub alarm_ma: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64", skip_serializing_if = "Option::is_none")]
    pub candela: Option<f64>,
    #[serde(default, deserialize_with = "de_coverage", skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
}

/// Coverage that is not an object is dropped rather than failing the device.
fn de_coverage<'de, D>(deserializer: D) -> Result<Option<Coverage>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => Some(Coverage {
            candela: map.get("candela").and_then(number_from_value),
        }),
        _ => None,
    })
}

impl Device {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_part_number(mut self, part_number: &str) -> Self {
        self.part_number = part_number.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Explicit currents in amps.
    pub fn with_currents(mut self, standby_a: f64, alarm_a: f64) -> Self {
        self.standby_current_a = Some(standby_a);
        self.alarm_current_a = Some(alarm_a);
        self
    }

    pub fn with_candela(mut self, candela: f64) -> Self {
        self.candela = Some(candela);
        self
    }
}

fn non_empty(text: &str) -> Option<Cow<'_, str>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Cow::Borrowed(trimmed))
    }
}

impl DeviceFields for Device {
    fn name(&self) -> Option<Cow<'_, str>> {
        non_empty(&self.name)
    }

    fn manufacturer(&self) -> Option<Cow<'_, str>> {
        non_empty(&self.manufacturer)
    }

    fn part_number(&self) -> Option<Cow<'_, str>> {
        non_empty(&self.part_number)
    }

    fn model(&self) -> Option<Cow<'_, str>> {
        non_empty(&self.model)
    }

    fn standby_current(&self) -> Result<Option<Current>, FieldError> {
        Ok(self
            .standby_current_a
            .map(Current::Amps)
            .or(self.standby_ma.map(Current::Milliamps)))
    }

    fn alarm_current(&self) -> Result<Option<Current>, FieldError> {
        Ok(self
            .alarm_current_a
            .map(Current::Amps)
            .or(self.alarm_ma.map(Current::Milliamps)))
    }

    fn candela(&self) -> Result<Option<f64>, FieldError> {
        Ok(self
            .candela
            .or_else(|| self.coverage.as_ref().and_then(|c| c.candela)))
    }
}

/// Numeric field of a JSON object: absent/null is `None`, anything
/// present but unreadable is an error.
fn json_number(object: &Value, field: &'static str) -> Result<Option<f64>, FieldError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ (Value::Number(_) | Value::String(_))) => number_from_value(value)
            .map(Some)
            .ok_or_else(|| FieldError::NotNumeric {
                field,
                value: value.to_string(),
            }),
        Some(_) => Err(FieldError::WrongShape {
            field,
            expected: "number",
        }),
    }
}

fn json_current(
    object: &Value,
    amps_field: &'static str,
    ma_field: &'static str,
) -> Result<Option<Current>, FieldError> {
    if let Some(a) = json_number(object, amps_field)? {
        return Ok(Some(Current::Amps(a)));
    }
    Ok(json_number(object, ma_field)?.map(Current::Milliamps))
}

fn json_text<'a>(object: &'a Value, field: &str) -> Option<Cow<'a, str>> {
    match object.get(field)? {
        Value::String(s) => non_empty(s),
        other => text_from_value(other).map(Cow::Owned),
    }
}

/// Raw JSON objects, read structurally.
impl DeviceFields for Value {
    fn name(&self) -> Option<Cow<'_, str>> {
        json_text(self, "name")
    }

    fn manufacturer(&self) -> Option<Cow<'_, str>> {
        json_text(self, "manufacturer")
    }

    fn part_number(&self) -> Option<Cow<'_, str>> {
        json_text(self, "part_number").or_else(|| json_text(self, "part"))
    }

    fn model(&self) -> Option<Cow<'_, str>> {
        json_text(self, "model")
    }

    fn standby_current(&self) -> Result<Option<Current>, FieldError> {
        json_current(self, "standby_current_a", "standby_ma")
    }

    fn alarm_current(&self) -> Result<Option<Current>, FieldError> {
        json_current(self, "alarm_current_a", "alarm_ma")
    }

    fn candela(&self) -> Result<Option<f64>, FieldError> {
        if let Some(cd) = json_number(self, "candela")? {
            return Ok(Some(cd));
        }
        match self.get("coverage") {
            None | Some(Value::Null) => Ok(None),
            Some(coverage @ Value::Object(_)) => json_number(coverage, "candela"),
            Some(_) => Err(FieldError::WrongShape {
                field: "coverage",
                expected: "object",
            }),
        }
    }
}
