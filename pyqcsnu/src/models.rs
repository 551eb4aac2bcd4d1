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


//! Python wrappers of the data records.

use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyByteArray;
use std::collections::HashMap;

use bincode::{deserialize, serialize};
use qcsnu::{
    Backend, Circuit, Experiment, Hamiltonian, Job, JobResult, MitigationParams, Timestamp,
};
use serde_json::Value;

use crate::convert::{record_id_to_python, to_json_value, to_python};
use crate::exceptions::{to_py_err, ValidationError};

fn timestamp_to_string(timestamp: &Option<Timestamp>) -> Option<String> {
    timestamp
        .as_ref()
        .and_then(|t| serde_json::to_value(t).ok())
        .and_then(|v| v.as_str().map(str::to_string))
}

fn map_to_python(py: Python, map: &HashMap<String, Value>) -> PyResult<PyObject> {
    let object: serde_json::Map<String, Value> =
        map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    to_python(py, &Value::Object(object))
}

// Hamiltonians travel through bincode as a fixed-shape tuple.
type HamiltonianParts = (Vec<String>, Vec<f64>, Option<usize>);

fn hamiltonian_to_bincode(hamiltonian: &Hamiltonian) -> bincode::Result<Vec<u8>> {
    let parts: HamiltonianParts = (
        hamiltonian.operators().to_vec(),
        hamiltonian.coefficients().to_vec(),
        hamiltonian.num_qubits(),
    );
    serialize(&parts)
}

fn hamiltonian_from_bincode(bytes: &[u8]) -> PyResult<Hamiltonian> {
    let (operators, coefficients, num_qubits): HamiltonianParts = deserialize(bytes)
        .map_err(|_| PyValueError::new_err("Input cannot be deserialized to Hamiltonian"))?;
    let hamiltonian = Hamiltonian::new(operators, coefficients).map_err(to_py_err)?;
    match num_qubits {
        Some(n) => hamiltonian.with_num_qubits(n).map_err(to_py_err),
        None => Ok(hamiltonian),
    }
}

fn json_error(name: &str, err: serde_json::Error) -> PyErr {
    PyValueError::new_err(format!("Input cannot be deserialized to {}: {}", name, err))
}

/// Quantum circuit in OpenQASM text form.
#[pyclass(name = "Circuit", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitWrapper {
    /// Internal storage of [qcsnu::Circuit]
    pub internal: Circuit,
}

#[pymethods]
impl CircuitWrapper {
    /// Create a new circuit.
    ///
    /// Args:
    ///     qasm (str): OpenQASM 2 or 3 source.
    ///     name (Optional[str]): Circuit name.
    ///     num_qubits (Optional[int]): Qubit count, overriding the declared registers.
    ///     metadata (Optional[Dict[str, Any]]): Free-form metadata.
    ///
    /// Raises:
    ///     ValidationError: metadata is not a dict.
    #[new]
    #[pyo3(signature = (qasm, name = None, num_qubits = None, metadata = None))]
    pub fn new(
        qasm: String,
        name: Option<String>,
        num_qubits: Option<usize>,
        metadata: Option<&PyAny>,
    ) -> PyResult<Self> {
        let mut internal = Circuit::new(qasm);
        internal.name = name;
        internal.num_qubits = num_qubits;
        if let Some(metadata) = metadata {
            match to_json_value(metadata)? {
                Value::Object(map) => internal.metadata = map.into_iter().collect(),
                _ => return Err(ValidationError::new_err("metadata must be a dict")),
            }
        }
        Ok(Self { internal })
    }

    /// OpenQASM source.
    #[getter]
    pub fn qasm(&self) -> String {
        self.internal.qasm.clone()
    }

    /// Circuit name.
    #[getter]
    pub fn name(&self) -> Option<String> {
        self.internal.name.clone()
    }

    /// Explicit qubit count, if set.
    #[getter]
    pub fn num_qubits(&self) -> Option<usize> {
        self.internal.num_qubits
    }

    /// Free-form metadata.
    #[getter]
    pub fn metadata(&self, py: Python) -> PyResult<PyObject> {
        map_to_python(py, &self.internal.metadata)
    }

    /// Number of qubits, from num_qubits or else the declared quantum registers.
    pub fn qubit_count(&self) -> usize {
        self.internal.qubit_count()
    }

    /// Number of classical bits declared by the circuit.
    pub fn clbit_count(&self) -> usize {
        self.internal.clbit_count()
    }

    /// Return the circuit as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let value = serde_json::to_value(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Circuit"))?;
        to_python(py, &value)
    }

    /// Create a circuit from a dict with a "qasm" entry.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<CircuitWrapper> {
        let value = to_json_value(input)?;
        Ok(CircuitWrapper {
            internal: serde_json::from_value(value).map_err(|err| json_error("Circuit", err))?,
        })
    }

    /// Return the json representation of the circuit.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Circuit to json"))
    }

    /// Create a circuit from its json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<CircuitWrapper> {
        Ok(CircuitWrapper {
            internal: serde_json::from_str(input).map_err(|err| json_error("Circuit", err))?,
        })
    }

    /// Return a copy of the Circuit.
    pub fn __copy__(&self) -> CircuitWrapper {
        self.clone()
    }

    /// Return a deep copy of the Circuit.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> CircuitWrapper {
        self.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "Circuit(name={}, qubits={})",
            self.internal.name.as_deref().unwrap_or("None"),
            self.internal.qubit_count()
        )
    }
}

/// Snapshot of a submitted job.
#[pyclass(name = "Job", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct JobWrapper {
    /// Internal storage of [qcsnu::Job]
    pub internal: Job,
}

#[pymethods]
impl JobWrapper {
    /// Job id, an int or a str depending on the service.
    #[getter]
    pub fn id(&self, py: Python) -> PyObject {
        record_id_to_python(py, &self.internal.id)
    }

    /// Current status: created, running, completed, error or cancelled.
    #[getter]
    pub fn status(&self) -> &'static str {
        self.internal.status.as_str()
    }

    /// Backend executing the job.
    #[getter]
    pub fn backend(&self) -> String {
        self.internal.backend.clone()
    }

    /// Number of shots.
    #[getter]
    pub fn shots(&self) -> u64 {
        self.internal.shots
    }

    /// Job name.
    #[getter]
    pub fn name(&self) -> Option<String> {
        self.internal.name.clone()
    }

    /// Circuit as stored by the service, a str or a dict.
    #[getter]
    pub fn circuit(&self, py: Python) -> PyResult<Option<PyObject>> {
        self.internal
            .circuit
            .as_ref()
            .map(|circuit| to_python(py, circuit))
            .transpose()
    }

    /// Error message of a failed job.
    #[getter]
    pub fn error_message(&self) -> Option<String> {
        self.internal.error_message.clone()
    }

    /// Error mitigation applied to the job.
    #[getter]
    pub fn mitigation_params(&self) -> Option<MitigationParamsWrapper> {
        self.internal
            .mitigation_params
            .clone()
            .map(|internal| MitigationParamsWrapper { internal })
    }

    /// Free-form metadata.
    #[getter]
    pub fn metadata(&self, py: Python) -> PyResult<PyObject> {
        map_to_python(py, &self.internal.metadata)
    }

    /// Creation time in ISO 8601 form.
    #[getter]
    pub fn created_at(&self) -> Option<String> {
        timestamp_to_string(&self.internal.created_at)
    }

    /// Time of the last status change in ISO 8601 form.
    #[getter]
    pub fn updated_at(&self) -> Option<String> {
        timestamp_to_string(&self.internal.updated_at)
    }

    /// Return the job as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        to_python(py, &self.internal.to_value())
    }

    /// Create a job from a dict.
    ///
    /// Raises:
    ///     ValueError: Input cannot be deserialized to Job.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<JobWrapper> {
        let value = to_json_value(input)?;
        Ok(JobWrapper {
            internal: serde_json::from_value(value).map_err(|err| json_error("Job", err))?,
        })
    }

    /// Return the json representation of the job.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Job to json"))
    }

    /// Create a job from its json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<JobWrapper> {
        Ok(JobWrapper {
            internal: serde_json::from_str(input).map_err(|err| json_error("Job", err))?,
        })
    }

    /// Return a copy of the Job.
    pub fn __copy__(&self) -> JobWrapper {
        self.clone()
    }

    /// Return a deep copy of the Job.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> JobWrapper {
        self.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "Job(id={}, status={}, backend={})",
            self.internal.id, self.internal.status, self.internal.backend
        )
    }
}

/// Results of a completed job.
#[pyclass(name = "Result", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct ResultWrapper {
    /// Internal storage of [qcsnu::JobResult]
    pub internal: JobResult,
}

#[pymethods]
impl ResultWrapper {
    /// Create a result from measurement counts.
    ///
    /// Args:
    ///     counts (Dict[str, int]): Number of shots per measured bitstring.
    #[new]
    pub fn new(counts: HashMap<String, u64>) -> Self {
        Self {
            internal: JobResult::from_counts(counts),
        }
    }

    /// Number of shots per measured bitstring, None for expectation value results.
    #[getter]
    pub fn counts(&self) -> Option<HashMap<String, u64>> {
        self.internal.counts.clone()
    }

    /// Expectation value computed by the service.
    #[getter]
    pub fn expval(&self) -> Option<f64> {
        self.internal.expval
    }

    /// Execution metadata.
    #[getter]
    pub fn metadata(&self, py: Python) -> PyResult<PyObject> {
        map_to_python(py, &self.internal.metadata)
    }

    /// Total number of shots.
    pub fn total_shots(&self) -> u64 {
        self.internal.total_shots()
    }

    /// Relative frequency of a bitstring.
    ///
    /// Args:
    ///     bitstring (str): Measured bitstring, e.g. "00".
    ///
    /// Returns:
    ///     float: The probability, 0.0 for bitstrings that never occurred.
    ///
    /// Raises:
    ///     QuantumClientError: The result holds no counts.
    pub fn get_probability(&self, bitstring: &str) -> PyResult<f64> {
        self.internal.get_probability(bitstring).map_err(to_py_err)
    }

    /// Expectation value of a diagonal observable.
    ///
    /// Args:
    ///     observable (Dict[str, float]): Eigenvalue per bitstring.
    ///
    /// Returns:
    ///     float: The expectation value.
    ///
    /// Raises:
    ///     QuantumClientError: The result holds no counts.
    pub fn get_expectation_value(&self, observable: HashMap<String, f64>) -> PyResult<f64> {
        self.internal
            .get_expectation_value(&observable)
            .map_err(to_py_err)
    }

    /// Return the result as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        to_python(py, &self.internal.to_value())
    }

    /// Create a result from a dict.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<ResultWrapper> {
        let value = to_json_value(input)?;
        Ok(ResultWrapper {
            internal: JobResult::from_value(value).map_err(to_py_err)?,
        })
    }

    /// Return the json representation of the result.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Result to json"))
    }

    /// Create a result from its json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<ResultWrapper> {
        Ok(ResultWrapper {
            internal: serde_json::from_str(input).map_err(|err| json_error("Result", err))?,
        })
    }

    /// Return a copy of the Result.
    pub fn __copy__(&self) -> ResultWrapper {
        self.clone()
    }

    /// Return a deep copy of the Result.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> ResultWrapper {
        self.clone()
    }
}

/// Weighted sum of Pauli strings.
#[pyclass(name = "Hamiltonian", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct HamiltonianWrapper {
    /// Internal storage of [qcsnu::Hamiltonian]
    pub internal: Hamiltonian,
}

impl HamiltonianWrapper {
    /// Extracts a Hamiltonian from a Python object.
    ///
    /// Accepts a Hamiltonian instance, any object exposing `to_bincode`, or a dict with
    /// `operators` and `coefficients`.
    ///
    /// # Arguments:
    ///
    /// `input` - The Python object that should be casted to a [qcsnu::Hamiltonian]
    pub fn from_pyany(input: &PyAny) -> PyResult<Hamiltonian> {
        if let Ok(try_downcast) = input.extract::<HamiltonianWrapper>() {
            return Ok(try_downcast.internal);
        }
        if let Ok(get_bytes) = input.call_method0("to_bincode") {
            let bytes = get_bytes.extract::<Vec<u8>>().map_err(|_| {
                PyTypeError::new_err(
                    "Python object cannot be converted to Hamiltonian: Cast to binary representation failed",
                )
            })?;
            return hamiltonian_from_bincode(&bytes[..]);
        }
        let value = to_json_value(input).map_err(|_| {
            PyTypeError::new_err("Python object cannot be converted to Hamiltonian")
        })?;
        serde_json::from_value(value).map_err(|err| ValidationError::new_err(err.to_string()))
    }
}

#[pymethods]
impl HamiltonianWrapper {
    /// Create a new Hamiltonian.
    ///
    /// Args:
    ///     operators (List[str]): Pauli strings over I, X, Y and Z.
    ///     coefficients (List[float]): One weight per operator.
    ///     num_qubits (Optional[int]): Number of qubits the operators act on.
    ///
    /// Raises:
    ///     ValidationError: Lengths differ, a list is empty or an operator is malformed.
    #[new]
    #[pyo3(signature = (operators, coefficients, num_qubits = None))]
    pub fn new(
        operators: Vec<String>,
        coefficients: Vec<f64>,
        num_qubits: Option<usize>,
    ) -> PyResult<Self> {
        let mut hamiltonian = Hamiltonian::new(operators, coefficients).map_err(to_py_err)?;
        if let Some(n) = num_qubits {
            hamiltonian = hamiltonian.with_num_qubits(n).map_err(to_py_err)?;
        }
        Ok(Self {
            internal: hamiltonian,
        })
    }

    /// Pauli strings.
    #[getter]
    pub fn operators(&self) -> Vec<String> {
        self.internal.operators().to_vec()
    }

    /// Weights of the Pauli strings.
    #[getter]
    pub fn coefficients(&self) -> Vec<f64> {
        self.internal.coefficients().to_vec()
    }

    /// Number of qubits, if set.
    #[getter]
    pub fn num_qubits(&self) -> Option<usize> {
        self.internal.num_qubits()
    }

    /// Return the Hamiltonian as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let value = serde_json::to_value(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Hamiltonian"))?;
        to_python(py, &value)
    }

    /// Create a Hamiltonian from a dict.
    ///
    /// Raises:
    ///     ValidationError: The dict does not describe a valid Hamiltonian.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<HamiltonianWrapper> {
        let value = to_json_value(input)?;
        Ok(HamiltonianWrapper {
            internal: serde_json::from_value(value)
                .map_err(|err| ValidationError::new_err(err.to_string()))?,
        })
    }

    /// Return the json representation of the Hamiltonian.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Hamiltonian to json"))
    }

    /// Create a Hamiltonian from its json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<HamiltonianWrapper> {
        Ok(HamiltonianWrapper {
            internal: serde_json::from_str(input)
                .map_err(|err| json_error("Hamiltonian", err))?,
        })
    }

    /// Return the bincode representation of the Hamiltonian using the [bincode] crate.
    ///
    /// Returns:
    ///     ByteArray: The serialized Hamiltonian (in [bincode] form).
    ///
    /// Raises:
    ///     ValueError: Cannot serialize Hamiltonian to bytes.
    pub fn to_bincode(&self) -> PyResult<Py<PyByteArray>> {
        let serialized = hamiltonian_to_bincode(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Hamiltonian to bytes"))?;
        let b: Py<PyByteArray> = Python::with_gil(|py| -> Py<PyByteArray> {
            PyByteArray::new(py, &serialized[..]).into()
        });
        Ok(b)
    }

    /// Convert the bincode representation of a Hamiltonian to a Hamiltonian.
    ///
    /// Args:
    ///     input (ByteArray): The serialized Hamiltonian (in [bincode] form).
    ///
    /// Raises:
    ///     TypeError: Input cannot be converted to byte array.
    ///     ValueError: Input cannot be deserialized to Hamiltonian.
    ///     ValidationError: The decoded Hamiltonian is invalid.
    #[staticmethod]
    pub fn from_bincode(input: &PyAny) -> PyResult<HamiltonianWrapper> {
        let bytes = input
            .extract::<Vec<u8>>()
            .map_err(|_| PyTypeError::new_err("Input cannot be converted to byte array"))?;

        Ok(HamiltonianWrapper {
            internal: hamiltonian_from_bincode(&bytes[..])?,
        })
    }

    /// Return a copy of the Hamiltonian.
    pub fn __copy__(&self) -> HamiltonianWrapper {
        self.clone()
    }

    /// Return a deep copy of the Hamiltonian.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> HamiltonianWrapper {
        self.clone()
    }
}

/// Error mitigation technique and its parameters.
#[pyclass(name = "MitigationParams", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct MitigationParamsWrapper {
    /// Internal storage of [qcsnu::MitigationParams]
    pub internal: MitigationParams,
}

impl MitigationParamsWrapper {
    /// Extracts mitigation parameters from a MitigationParams instance or a dict.
    pub fn from_pyany(input: &PyAny) -> PyResult<MitigationParams> {
        if let Ok(try_downcast) = input.extract::<MitigationParamsWrapper>() {
            return Ok(try_downcast.internal);
        }
        let value = to_json_value(input).map_err(|_| {
            PyTypeError::new_err("Python object cannot be converted to MitigationParams")
        })?;
        serde_json::from_value(value).map_err(|err| ValidationError::new_err(err.to_string()))
    }
}

#[pymethods]
impl MitigationParamsWrapper {
    /// Create new mitigation parameters.
    ///
    /// Args:
    ///     technique (str): Name of the technique, e.g. "zne".
    ///     params (Optional[Dict[str, Any]]): Technique-specific parameters.
    ///
    /// Raises:
    ///     ValidationError: params is not a dict.
    #[new]
    #[pyo3(signature = (technique, params = None))]
    pub fn new(technique: String, params: Option<&PyAny>) -> PyResult<Self> {
        let mut internal = MitigationParams::new(technique);
        if let Some(params) = params {
            match to_json_value(params)? {
                Value::Object(map) => internal.params = map.into_iter().collect(),
                _ => return Err(ValidationError::new_err("params must be a dict")),
            }
        }
        Ok(Self { internal })
    }

    /// Name of the technique.
    #[getter]
    pub fn technique(&self) -> String {
        self.internal.technique.clone()
    }

    /// Technique-specific parameters.
    #[getter]
    pub fn params(&self, py: Python) -> PyResult<PyObject> {
        map_to_python(py, &self.internal.params)
    }

    /// Return the parameters as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let value = serde_json::to_value(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize MitigationParams"))?;
        to_python(py, &value)
    }

    /// Create parameters from a dict.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<MitigationParamsWrapper> {
        Ok(MitigationParamsWrapper {
            internal: MitigationParamsWrapper::from_pyany(input)?,
        })
    }

    /// Return the json representation of the parameters.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize MitigationParams to json"))
    }

    /// Create parameters from their json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<MitigationParamsWrapper> {
        Ok(MitigationParamsWrapper {
            internal: serde_json::from_str(input)
                .map_err(|err| json_error("MitigationParams", err))?,
        })
    }

    /// Return a copy of the MitigationParams.
    pub fn __copy__(&self) -> MitigationParamsWrapper {
        self.clone()
    }

    /// Return a deep copy of the MitigationParams.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> MitigationParamsWrapper {
        self.clone()
    }
}

/// Compute resource executing jobs.
#[pyclass(name = "Backend", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct BackendWrapper {
    /// Internal storage of [qcsnu::Backend]
    pub internal: Backend,
}

#[pymethods]
impl BackendWrapper {
    /// Backend name.
    #[getter]
    pub fn name(&self) -> String {
        self.internal.name.clone()
    }

    /// Availability, e.g. "online".
    #[getter]
    pub fn status(&self) -> String {
        self.internal.status.clone()
    }

    /// Number of qubits.
    #[getter]
    pub fn n_qubits(&self) -> usize {
        self.internal.n_qubits
    }

    /// Whether the backend is online.
    pub fn is_online(&self) -> bool {
        self.internal.is_online()
    }

    /// Maximum number of shots per job, if advertised.
    pub fn max_shots(&self) -> Option<u64> {
        self.internal.max_shots()
    }

    /// Return the backend as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let value = serde_json::to_value(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Backend"))?;
        to_python(py, &value)
    }

    /// Create a backend from a dict.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<BackendWrapper> {
        let value = to_json_value(input)?;
        Ok(BackendWrapper {
            internal: serde_json::from_value(value).map_err(|err| json_error("Backend", err))?,
        })
    }

    /// Return the json representation of the backend.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Backend to json"))
    }

    /// Create a backend from its json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<BackendWrapper> {
        Ok(BackendWrapper {
            internal: serde_json::from_str(input).map_err(|err| json_error("Backend", err))?,
        })
    }

    /// Return a copy of the Backend.
    pub fn __copy__(&self) -> BackendWrapper {
        self.clone()
    }

    /// Return a deep copy of the Backend.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> BackendWrapper {
        self.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "Backend(name={}, status={}, n_qubits={})",
            self.internal.name, self.internal.status, self.internal.n_qubits
        )
    }
}

/// Pulse-schedule experiment run.
#[pyclass(name = "Experiment", module = "pyqcsnu")]
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentWrapper {
    /// Internal storage of [qcsnu::Experiment]
    pub internal: Experiment,
}

#[pymethods]
impl ExperimentWrapper {
    /// Experiment id, an int or a str depending on the service.
    #[getter]
    pub fn id(&self, py: Python) -> PyObject {
        record_id_to_python(py, &self.internal.id)
    }

    /// Status as reported by the service.
    #[getter]
    pub fn status(&self) -> String {
        self.internal.status.clone()
    }

    /// Pulse schedule.
    #[getter]
    pub fn pulse_schedule(&self, py: Python) -> PyResult<PyObject> {
        to_python(py, &self.internal.pulse_schedule)
    }

    /// Run id assigned by the hardware.
    #[getter]
    pub fn external_run_id(&self) -> i64 {
        self.internal.external_run_id
    }

    /// Error message of a failed run.
    #[getter]
    pub fn error_message(&self) -> Option<String> {
        self.internal.error_message.clone()
    }

    /// Free-form metadata.
    #[getter]
    pub fn metadata(&self, py: Python) -> PyResult<PyObject> {
        map_to_python(py, &self.internal.metadata)
    }

    /// Creation time in ISO 8601 form.
    #[getter]
    pub fn created_at(&self) -> Option<String> {
        timestamp_to_string(&self.internal.created_at)
    }

    /// Time of the last status change in ISO 8601 form.
    #[getter]
    pub fn updated_at(&self) -> Option<String> {
        timestamp_to_string(&self.internal.updated_at)
    }

    /// Return the experiment as a dict.
    pub fn to_dict(&self, py: Python) -> PyResult<PyObject> {
        let value = serde_json::to_value(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Experiment"))?;
        to_python(py, &value)
    }

    /// Create an experiment from a dict.
    #[staticmethod]
    pub fn from_dict(input: &PyAny) -> PyResult<ExperimentWrapper> {
        let value = to_json_value(input)?;
        Ok(ExperimentWrapper {
            internal: Experiment::from_value(value).map_err(to_py_err)?,
        })
    }

    /// Return the json representation of the experiment.
    pub fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.internal)
            .map_err(|_| PyValueError::new_err("Cannot serialize Experiment to json"))
    }

    /// Create an experiment from its json representation.
    #[staticmethod]
    pub fn from_json(input: &str) -> PyResult<ExperimentWrapper> {
        Ok(ExperimentWrapper {
            internal: serde_json::from_str(input).map_err(|err| json_error("Experiment", err))?,
        })
    }

    /// Return a copy of the Experiment.
    pub fn __copy__(&self) -> ExperimentWrapper {
        self.clone()
    }

    /// Return a deep copy of the Experiment.
    pub fn __deepcopy__(&self, _memodict: Py<PyAny>) -> ExperimentWrapper {
        self.clone()
    }

    fn __repr__(&self) -> String {
        format!(
            "Experiment(id={}, status={}, external_run_id={})",
            self.internal.id, self.internal.status, self.internal.external_run_id
        )
    }
}
