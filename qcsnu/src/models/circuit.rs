// Copyright © 2024 SNU QuIQCL Team. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the
// License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
// express or implied. See the License for the specific language governing permissions and
// limitations under the License.


use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::interface::count_registers;
use crate::QcsnuError;

/// A quantum circuit in OpenQASM text form.
///
/// The client does not interpret the circuit beyond counting declared qubits and bits.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// OpenQASM source
    pub qasm: String,
    /// Name of the circuit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Number of qubits, overriding the count derived from the register declarations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_qubits: Option<usize>,
}

impl Circuit {
    /// Creates a circuit from OpenQASM source.
    pub fn new(qasm: impl Into<String>) -> Self {
        Self {
            qasm: qasm.into(),
            name: None,
            metadata: HashMap::new(),
            num_qubits: None,
        }
    }

    /// Sets the circuit name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the qubit count.
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = Some(num_qubits);
        self
    }

    /// Number of qubits: the explicit override, else the sum of all quantum register sizes.
    pub fn qubit_count(&self) -> usize {
        self.num_qubits
            .unwrap_or_else(|| count_registers(&self.qasm).0.iter().map(|(_, n)| n).sum())
    }

    /// Number of classical bits: the sum of all classical register sizes.
    pub fn clbit_count(&self) -> usize {
        count_registers(&self.qasm).1.iter().map(|(_, n)| n).sum()
    }
}

/// Anything accepted as the circuit of a job.
///
/// [CircuitPayload::normalize] reduces every form to the OpenQASM text sent to the service.
#[derive(PartialEq, Debug, Clone)]
pub enum CircuitPayload {
    /// Already serialised OpenQASM text
    Text(String),
    /// A [Circuit] record
    Structured(Circuit),
    /// An untyped JSON value, either a string or an object with a `qasm` string field
    Json(Value),
}

impl CircuitPayload {
    /// Returns the canonical textual form of the circuit.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The OpenQASM text.
    /// * `Err(QcsnuError::Validation)` - The payload is empty or not a recognised circuit form.
    pub fn normalize(&self) -> Result<String, QcsnuError> {
        let text = match self {
            CircuitPayload::Text(s) => s.as_str(),
            CircuitPayload::Structured(c) => c.qasm.as_str(),
            CircuitPayload::Json(Value::String(s)) => s.as_str(),
            CircuitPayload::Json(Value::Object(map)) => match map.get("qasm") {
                Some(Value::String(s)) => s.as_str(),
                _ => {
                    return Err(QcsnuError::validation(
                        "Circuit object must contain a `qasm` string field",
                    ))
                }
            },
            CircuitPayload::Json(other) => {
                return Err(QcsnuError::validation(format!(
                    "Circuit must be a QASM string or a circuit object, got {}",
                    json_kind(other)
                )))
            }
        };
        if text.trim().is_empty() {
            return Err(QcsnuError::validation("Empty circuit was passed to the client."));
        }
        Ok(text.to_string())
    }

    /// Number of qubits of the circuit.
    pub fn qubit_count(&self) -> Result<usize, QcsnuError> {
        match self {
            CircuitPayload::Structured(c) => Ok(c.qubit_count()),
            CircuitPayload::Json(Value::Object(map)) => {
                if let Some(n) = map.get("num_qubits").and_then(Value::as_u64) {
                    return Ok(n as usize);
                }
                let qasm = self.normalize()?;
                Ok(count_registers(&qasm).0.iter().map(|(_, n)| n).sum())
            }
            _ => {
                let qasm = self.normalize()?;
                Ok(count_registers(&qasm).0.iter().map(|(_, n)| n).sum())
            }
        }
    }

    /// Name of the circuit, if the payload carries one.
    pub fn name(&self) -> Option<String> {
        match self {
            CircuitPayload::Structured(c) => c.name.clone(),
            CircuitPayload::Json(Value::Object(map)) => {
                map.get("name").and_then(Value::as_str).map(str::to_string)
            }
            _ => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<&str> for CircuitPayload {
    fn from(qasm: &str) -> Self {
        CircuitPayload::Text(qasm.to_string())
    }
}

impl From<String> for CircuitPayload {
    fn from(qasm: String) -> Self {
        CircuitPayload::Text(qasm)
    }
}

impl From<Circuit> for CircuitPayload {
    fn from(circuit: Circuit) -> Self {
        CircuitPayload::Structured(circuit)
    }
}

impl From<&Circuit> for CircuitPayload {
    fn from(circuit: &Circuit) -> Self {
        CircuitPayload::Structured(circuit.clone())
    }
}

impl From<Value> for CircuitPayload {
    fn from(value: Value) -> Self {
        CircuitPayload::Json(value)
    }
}
