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
use pyo3::types::PyDict;
use std::time::Duration;

use qcsnu::{
    CircuitPayload, ClientConfig, Job, JobOutcome, JobStatus, JobSubmission, Observable,
    QuantumClient, RunOptions, StatusHandler,
};

use crate::convert::{record_id, to_json_value, to_python};
use crate::exceptions::{to_py_err, ValidationError};
use crate::models::{
    BackendWrapper, CircuitWrapper, ExperimentWrapper, HamiltonianWrapper, JobWrapper,
    MitigationParamsWrapper, ResultWrapper,
};

fn seconds(value: f64, name: &str) -> PyResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| PyValueError::new_err(format!("{} must be a non-negative number", name)))
}

fn circuit_payload(circuit: &PyAny) -> PyResult<CircuitPayload> {
    if let Ok(circuit) = circuit.extract::<CircuitWrapper>() {
        return Ok(CircuitPayload::Structured(circuit.internal));
    }
    let value = to_json_value(circuit).map_err(|_| {
        ValidationError::new_err("Circuit must be a QASM string, a Circuit or a circuit dict")
    })?;
    Ok(CircuitPayload::Json(value))
}

fn observable(operator: &PyAny) -> PyResult<Observable> {
    if let Ok(label) = operator.extract::<String>() {
        return Ok(Observable::Label(label));
    }
    operator
        .extract::<Vec<(String, f64)>>()
        .map(Observable::Weighted)
        .map_err(|_| {
            PyTypeError::new_err("Operator must be a Pauli string or a list of (str, float) terms")
        })
}

/// Client of the SNU quantum computing job service.
///
/// Authenticates, submits circuits, polls for completion and returns typed results.
#[pyclass(name = "QuantumClient", module = "pyqcsnu")]
#[derive(Debug)]
pub struct QuantumClientWrapper {
    /// Internal storage of [qcsnu::QuantumClient]
    pub internal: QuantumClient,
}

#[pymethods]
impl QuantumClientWrapper {
    /// Create a new client.
    ///
    /// Args:
    ///     base_url (Optional[str]): Base URL of the service.
    ///                               When None the URL is read from $QCSNU_BASE_URL,
    ///                               falling back to http://localhost:8000
    ///     token (Optional[str]): Authentication token.
    ///     timeout (float): Timeout of a single request in seconds.
    ///     verify_ssl (bool): Whether TLS certificates are verified.
    ///
    /// Raises:
    ///     ValueError: Invalid timeout
    ///     TransportError: The HTTP client could not be created
    #[new]
    #[pyo3(signature = (base_url = None, token = None, timeout = 30.0, verify_ssl = true))]
    pub fn new(
        base_url: Option<String>,
        token: Option<String>,
        timeout: f64,
        verify_ssl: bool,
    ) -> PyResult<Self> {
        let config = ClientConfig::new(base_url)
            .with_timeout(seconds(timeout, "timeout")?)
            .with_verify_ssl(verify_ssl);
        Ok(Self {
            internal: QuantumClient::with_config(config, token).map_err(to_py_err)?,
        })
    }

    /// Base URL requests are sent to.
    #[getter]
    pub fn base_url(&self) -> String {
        self.internal.base_url().to_string()
    }

    /// Currently installed token.
    #[getter]
    pub fn token(&self) -> Option<String> {
        self.internal.token().map(str::to_string)
    }

    /// Install or replace the token.
    pub fn set_token(&mut self, token: String) {
        self.internal.set_token(token)
    }

    /// Log in with username and password.
    ///
    /// Raises:
    ///     AuthenticationError: Login failed
    pub fn login(&mut self, py: Python, username: &str, password: &str) -> PyResult<()> {
        let internal = &mut self.internal;
        py.allow_threads(|| internal.login(username, password))
            .map_err(to_py_err)
    }

    /// Install a token and validate it against the service.
    ///
    /// Raises:
    ///     AuthenticationError: The token was rejected; it is removed again
    pub fn login_with_token(&mut self, py: Python, token: String) -> PyResult<()> {
        let internal = &mut self.internal;
        py.allow_threads(|| internal.login_with_token(token))
            .map_err(to_py_err)
    }

    /// Create a job.
    ///
    /// Args:
    ///     circuit (Union[str, Circuit, Dict]): OpenQASM text, a Circuit, or a dict with a "qasm" string.
    ///     backend (str): Backend name.
    ///     shots (int): Number of shots.
    ///     mitigation_params (Optional[Union[MitigationParams, Dict]]): Error mitigation.
    ///     hamiltonian (Optional[Union[Hamiltonian, Dict]]): Hamiltonian to evaluate.
    ///     name (Optional[str]): Job name.
    ///
    /// Returns:
    ///     Job: The created job.
    ///
    /// Raises:
    ///     ValidationError: Invalid circuit, mitigation parameters or Hamiltonian
    ///     JobError: The service rejected the job
    #[pyo3(signature = (circuit, backend = "cassiopeia", shots = 1024, mitigation_params = None, hamiltonian = None, name = None))]
    #[allow(clippy::too_many_arguments)]
    pub fn create_job(
        &self,
        py: Python,
        circuit: &PyAny,
        backend: &str,
        shots: u64,
        mitigation_params: Option<&PyAny>,
        hamiltonian: Option<&PyAny>,
        name: Option<String>,
    ) -> PyResult<JobWrapper> {
        let mut submission = JobSubmission::new(circuit_payload(circuit)?, backend, shots);
        if let Some(params) = mitigation_params {
            submission = submission.with_mitigation(MitigationParamsWrapper::from_pyany(params)?);
        }
        if let Some(hamiltonian) = hamiltonian {
            submission = submission.with_hamiltonian(HamiltonianWrapper::from_pyany(hamiltonian)?);
        }
        if let Some(name) = name {
            submission = submission.with_name(name);
        }
        let internal = &self.internal;
        let job = py
            .allow_threads(|| internal.create_job(&submission))
            .map_err(to_py_err)?;
        Ok(JobWrapper { internal: job })
    }

    /// List jobs, optionally only those with the given status.
    ///
    /// Raises:
    ///     ValidationError: Unknown status
    #[pyo3(signature = (status = None))]
    pub fn list_jobs(&self, py: Python, status: Option<&str>) -> PyResult<Vec<JobWrapper>> {
        let status = status
            .map(|s| s.parse::<JobStatus>())
            .transpose()
            .map_err(to_py_err)?;
        let internal = &self.internal;
        let jobs = py
            .allow_threads(|| internal.list_jobs(status))
            .map_err(to_py_err)?;
        Ok(jobs
            .into_iter()
            .map(|internal| JobWrapper { internal })
            .collect())
    }

    /// Fetch the current snapshot of a job.
    pub fn get_job(&self, py: Python, job_id: &PyAny) -> PyResult<JobWrapper> {
        let job_id = record_id(job_id)?;
        let internal = &self.internal;
        let job = py
            .allow_threads(|| internal.get_job(job_id))
            .map_err(to_py_err)?;
        Ok(JobWrapper { internal: job })
    }

    /// Fetch the results of a completed job.
    pub fn get_job_results(&self, py: Python, job_id: &PyAny) -> PyResult<ResultWrapper> {
        let job_id = record_id(job_id)?;
        let internal = &self.internal;
        let result = py
            .allow_threads(|| internal.get_job_results(job_id))
            .map_err(to_py_err)?;
        Ok(ResultWrapper { internal: result })
    }

    /// Cancel a job.
    ///
    /// Returns:
    ///     bool: Whether the service reported the job as cancelled.
    pub fn cancel_job(&self, py: Python, job_id: &PyAny) -> PyResult<bool> {
        let job_id = record_id(job_id)?;
        let internal = &self.internal;
        py.allow_threads(|| internal.cancel_job(job_id))
            .map_err(to_py_err)
    }

    /// Wait until a job completes, fails, is cancelled or the timeout elapses.
    ///
    /// Args:
    ///     job_id (Union[int, str]): The job to wait for.
    ///     poll_interval (float): Seconds between two polls.
    ///     timeout (float): Total seconds to wait.
    ///     callback (Optional[Callable[[str, Job], None]]): Called with the status of every poll.
    ///
    /// Returns:
    ///     Tuple[bool, Union[Result, Dict[str, str]]]: (True, Result) on completion,
    ///     (False, {"error": reason}) otherwise.
    ///
    /// Raises:
    ///     Exception: Whatever the callback raised; later polls no longer call it.
    #[pyo3(signature = (job_id, poll_interval = 5.0, timeout = 300.0, callback = None))]
    pub fn wait_for_job(
        &self,
        py: Python,
        job_id: &PyAny,
        poll_interval: f64,
        timeout: f64,
        callback: Option<PyObject>,
    ) -> PyResult<(bool, PyObject)> {
        let job_id = record_id(job_id)?;
        let poll_interval = seconds(poll_interval, "poll_interval")?;
        let timeout = seconds(timeout, "timeout")?;
        let internal = &self.internal;

        let mut callback_error: Option<PyErr> = None;
        let outcome = py.allow_threads(|| match callback.as_ref() {
            Some(callback) => {
                let mut notify = |status: JobStatus, job: &Job| {
                    if callback_error.is_some() {
                        return;
                    }
                    Python::with_gil(|py| {
                        let snapshot = JobWrapper {
                            internal: job.clone(),
                        };
                        if let Err(err) = callback.call1(py, (status.as_str(), snapshot)) {
                            callback_error = Some(err);
                        }
                    })
                };
                let handler: &mut dyn StatusHandler = &mut notify;
                internal.wait_for_job(job_id, poll_interval, timeout, Some(handler))
            }
            None => internal.wait_for_job(job_id, poll_interval, timeout, None),
        });
        if let Some(err) = callback_error {
            return Err(err);
        }

        match outcome {
            JobOutcome::Completed(result) => {
                Ok((true, ResultWrapper { internal: result }.into_py(py)))
            }
            JobOutcome::Failed(reason) => {
                let error = PyDict::new(py);
                error.set_item("error", reason)?;
                Ok((false, error.to_object(py)))
            }
        }
    }

    /// Run a circuit and return its counts in the experiment-result layout.
    ///
    /// Returns:
    ///     Dict: backend_name, job_id, success and results with hexadecimal counts.
    ///
    /// Raises:
    ///     ValidationError: Invalid circuit
    ///     JobError: The job failed, was cancelled or timed out
    #[pyo3(signature = (circuit, backend = "cassiopeia", shots = 1024, mitigation_params = None, name = None, poll_interval = 5.0, timeout = 300.0))]
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        py: Python,
        circuit: &PyAny,
        backend: &str,
        shots: u64,
        mitigation_params: Option<&PyAny>,
        name: Option<String>,
        poll_interval: f64,
        timeout: f64,
    ) -> PyResult<PyObject> {
        let circuit = circuit_payload(circuit)?;
        let mut options = RunOptions::default()
            .with_backend(backend)
            .with_shots(shots)
            .with_polling(
                seconds(poll_interval, "poll_interval")?,
                seconds(timeout, "timeout")?,
            );
        if let Some(params) = mitigation_params {
            options = options.with_mitigation(MitigationParamsWrapper::from_pyany(params)?);
        }
        if let Some(name) = name {
            options = options.with_name(name);
        }
        let internal = &self.internal;
        let result = py
            .allow_threads(|| internal.run(circuit, &options))
            .map_err(to_py_err)?;
        let value = serde_json::to_value(&result)
            .map_err(|_| PyValueError::new_err("Cannot serialize result"))?;
        to_python(py, &value)
    }

    /// Compute the expectation value of an operator on the state prepared by a circuit.
    ///
    /// Args:
    ///     circuit (Union[str, Circuit, Dict]): State preparation circuit.
    ///     operator (Union[str, List[Tuple[str, float]]]): Pauli string or weighted sum.
    ///
    /// Returns:
    ///     float: The expectation value.
    ///
    /// Raises:
    ///     ValidationError: Invalid circuit, or an operator shorter than the circuit
    ///     JobError: The job failed, was cancelled or timed out
    #[pyo3(signature = (circuit, operator, backend = "cassiopeia", shots = 1024, poll_interval = 5.0, timeout = 300.0))]
    #[allow(clippy::too_many_arguments)]
    pub fn expectation_value(
        &self,
        py: Python,
        circuit: &PyAny,
        operator: &PyAny,
        backend: &str,
        shots: u64,
        poll_interval: f64,
        timeout: f64,
    ) -> PyResult<f64> {
        let circuit = circuit_payload(circuit)?;
        let operator = observable(operator)?;
        let options = RunOptions::default()
            .with_backend(backend)
            .with_shots(shots)
            .with_polling(
                seconds(poll_interval, "poll_interval")?,
                seconds(timeout, "timeout")?,
            );
        let internal = &self.internal;
        py.allow_threads(|| internal.expectation_value(circuit, operator, &options))
            .map_err(to_py_err)
    }

    /// Create a pulse-schedule experiment run.
    ///
    /// Returns:
    ///     Experiment: The created experiment.
    pub fn create_experiment(
        &self,
        py: Python,
        pulse_schedule: &PyAny,
        external_run_id: i64,
    ) -> PyResult<ExperimentWrapper> {
        let pulse_schedule = to_json_value(pulse_schedule)?;
        let internal = &self.internal;
        let experiment = py
            .allow_threads(|| internal.create_experiment(&pulse_schedule, external_run_id))
            .map_err(to_py_err)?;
        Ok(ExperimentWrapper {
            internal: experiment,
        })
    }

    /// Fetch an experiment run.
    ///
    /// Returns:
    ///     Experiment: The experiment.
    pub fn get_experiment(
        &self,
        py: Python,
        experiment_id: &PyAny,
    ) -> PyResult<ExperimentWrapper> {
        let experiment_id = record_id(experiment_id)?;
        let internal = &self.internal;
        let experiment = py
            .allow_threads(|| internal.get_experiment(experiment_id))
            .map_err(to_py_err)?;
        Ok(ExperimentWrapper {
            internal: experiment,
        })
    }

    /// List the available backends.
    pub fn list_backends(&self, py: Python) -> PyResult<Vec<BackendWrapper>> {
        let internal = &self.internal;
        let backends = py
            .allow_threads(|| internal.list_backends())
            .map_err(to_py_err)?;
        Ok(backends
            .into_iter()
            .map(|internal| BackendWrapper { internal })
            .collect())
    }

    /// Current status of a backend.
    ///
    /// Returns:
    ///     Dict: Free-form status, e.g. queue length.
    pub fn get_backend_status(&self, py: Python, backend_name: &str) -> PyResult<PyObject> {
        let internal = &self.internal;
        let status = py
            .allow_threads(|| internal.get_backend_status(backend_name))
            .map_err(to_py_err)?;
        to_python(py, &status)
    }

    /// Calibration data of a backend.
    ///
    /// Returns:
    ///     Dict: Free-form calibration data.
    pub fn get_backend_calibration(&self, py: Python, backend_name: &str) -> PyResult<PyObject> {
        let internal = &self.internal;
        let calibration = py
            .allow_threads(|| internal.get_backend_calibration(backend_name))
            .map_err(to_py_err)?;
        to_python(py, &calibration)
    }

    fn __repr__(&self) -> String {
        format!("QuantumClient(base_url={})", self.internal.base_url())
    }
}
