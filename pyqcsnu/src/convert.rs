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


use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use qcsnu::RecordId;
use serde_json::Value;

/// Converts a JSON-compatible Python object into a JSON tree.
pub fn to_json_value(input: &PyAny) -> PyResult<Value> {
    let json = PyModule::import(input.py(), "json")?;
    let text: String = json.call_method1("dumps", (input,))?.extract()?;
    serde_json::from_str(&text)
        .map_err(|err| PyValueError::new_err(format!("Object cannot be converted to JSON: {}", err)))
}

/// Converts a JSON tree into the equivalent Python object.
pub fn to_python(py: Python, value: &Value) -> PyResult<PyObject> {
    let text = serde_json::to_string(value)
        .map_err(|err| PyValueError::new_err(format!("Value cannot be serialized: {}", err)))?;
    let json = PyModule::import(py, "json")?;
    Ok(json.call_method1("loads", (text,))?.into())
}

/// Extracts a job or experiment id, which may be an int or a str.
pub fn record_id(input: &PyAny) -> PyResult<RecordId> {
    if let Ok(number) = input.extract::<u64>() {
        return Ok(RecordId::Number(number));
    }
    input
        .extract::<String>()
        .map(RecordId::Text)
        .map_err(|_| PyTypeError::new_err("Id must be an int or a str"))
}

/// Converts an id back into an int or a str.
pub fn record_id_to_python(py: Python, id: &RecordId) -> PyObject {
    match id {
        RecordId::Number(number) => number.into_py(py),
        RecordId::Text(text) => text.into_py(py),
    }
}
