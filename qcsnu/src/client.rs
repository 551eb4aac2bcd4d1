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

use crate::config::ClientConfig;
use crate::models::{
    Backend, CircuitPayload, Experiment, Hamiltonian, Job, JobResult, JobStatus, MitigationParams,
    RecordId,
};
use crate::transport::{
    interpret_response, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport,
};
use crate::QcsnuError;

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

// Experiment type attached to jobs that carry a Hamiltonian
const EXPECTATION_VALUE_EXPERIMENT: &str = "expectation_value";

/// Receives the status of a job once per poll of [QuantumClient::wait_for_job].
///
/// Implemented for every `FnMut(JobStatus, &Job)` closure.
pub trait StatusHandler {
    /// Called with the polled status and the full job snapshot.
    fn on_status(&mut self, status: JobStatus, job: &Job);
}

impl<F> StatusHandler for F
where
    F: FnMut(JobStatus, &Job),
{
    fn on_status(&mut self, status: JobStatus, job: &Job) {
        self(status, job)
    }
}

/// Final state of [QuantumClient::wait_for_job].
#[derive(PartialEq, Debug, Clone)]
pub enum JobOutcome {
    /// The job completed and its results were fetched
    Completed(JobResult),
    /// The job failed, was cancelled, timed out or could not be polled
    Failed(String),
}

impl JobOutcome {
    /// Whether the job completed.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }

    /// Converts a failure into [QcsnuError::Job] carrying the reason.
    pub fn into_result(self) -> Result<JobResult, QcsnuError> {
        match self {
            JobOutcome::Completed(result) => Ok(result),
            JobOutcome::Failed(reason) => Err(QcsnuError::Job { msg: reason }),
        }
    }
}

/// A job to be created with [QuantumClient::create_job].
#[derive(PartialEq, Debug, Clone)]
pub struct JobSubmission {
    /// Circuit to execute
    pub circuit: CircuitPayload,
    /// Backend name
    pub backend: String,
    /// Number of shots
    pub shots: u64,
    /// Error mitigation to apply
    pub mitigation_params: Option<MitigationParams>,
    /// Hamiltonian whose expectation value the service should compute
    pub hamiltonian: Option<Hamiltonian>,
    /// Job name
    pub name: Option<String>,
}

impl JobSubmission {
    /// Creates a submission without mitigation, Hamiltonian or name.
    pub fn new(circuit: impl Into<CircuitPayload>, backend: impl Into<String>, shots: u64) -> Self {
        Self {
            circuit: circuit.into(),
            backend: backend.into(),
            shots,
            mitigation_params: None,
            hamiltonian: None,
            name: None,
        }
    }

    /// Sets the error mitigation.
    pub fn with_mitigation(mut self, params: MitigationParams) -> Self {
        self.mitigation_params = Some(params);
        self
    }

    /// Attaches a Hamiltonian; the job becomes an expectation value experiment.
    pub fn with_hamiltonian(mut self, hamiltonian: Hamiltonian) -> Self {
        self.hamiltonian = Some(hamiltonian);
        self
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct CreateJobRequest<'a> {
    circuit_info: String,
    backend: &'a str,
    shots: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mitigation_params: Option<&'a MitigationParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hamiltonian: Option<&'a Hamiltonian>,
    #[serde(skip_serializing_if = "Option::is_none")]
    experiment_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(PartialEq, Eq, Debug, Clone, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
struct CreateExperimentRequest<'a> {
    pulse_schedule: &'a Value,
    external_run_id: i64,
}

// Paginated list endpoints wrap their items in `results`.
fn _list_items(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("results").map_or(false, Value::is_array) => {
            map.remove("results").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Client of the quantum job service.
///
/// Holds the base URL, the credential and the transport. Methods that change the credential
/// take `&mut self`; share a client between threads only behind external synchronisation.
pub struct QuantumClient<T: HttpTransport = ReqwestTransport> {
    config: ClientConfig,
    token: Option<String>,
    transport: T,
}

impl<T: HttpTransport> fmt::Debug for QuantumClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumClient")
            .field("base_url", &self.config.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("transport", &self.transport)
            .finish()
    }
}

impl QuantumClient<ReqwestTransport> {
    /// Creates a new client using a blocking [reqwest] transport.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service. When `None`, it is read from the environment
    ///                variable `QCSNU_BASE_URL`, falling back to `http://localhost:8000`.
    /// * `token` - Authentication token. When `None`, [QuantumClient::login] must be called
    ///             before any other request.
    ///
    /// # Returns
    ///
    /// * `Ok(QuantumClient)` - The newly created client
    /// * `Err(QcsnuError::Transport)` - The HTTP client could not be created.
    pub fn new(base_url: Option<String>, token: Option<String>) -> Result<Self, QcsnuError> {
        Self::with_config(ClientConfig::new(base_url), token)
    }

    /// Creates a new client from a full [ClientConfig].
    pub fn with_config(config: ClientConfig, token: Option<String>) -> Result<Self, QcsnuError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, token, transport))
    }
}

impl<T: HttpTransport> QuantumClient<T> {
    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(config: ClientConfig, token: Option<String>, transport: T) -> Self {
        Self {
            config,
            token,
            transport,
        }
    }

    /// Configuration of the client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Transport used by the client.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Currently installed token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Installs or replaces the token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Removes the token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), self.config.user_agent.clone()),
        ];
        if let Some(token) = self.token.as_ref() {
            headers.push((
                "Authorization".to_string(),
                [self.config.auth_scheme.as_str(), token].join(" "),
            ));
        }
        headers
    }

    /// Sends an authenticated request and returns the decoded JSON body.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP verb.
    /// * `path` - Endpoint path relative to the base URL.
    /// * `body` - JSON body.
    /// * `query` - Query string parameters.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The response body; a non-JSON success body is returned as
    ///                 `{"message": <text>}`.
    /// * `Err(QcsnuError::Authentication)` - No token is installed (no request is sent), or the
    ///                                       service answered 401 or 403.
    /// * `Err(QcsnuError)` - Transport failure or error status, see [crate::transport].
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: Option<Vec<(String, String)>>,
    ) -> Result<Value, QcsnuError> {
        if self.token.is_none() && path != self.config.paths.login {
            return Err(QcsnuError::authentication(
                "Not authenticated. Call login() first.",
            ));
        }
        debug!(%method, path, "sending request");
        let request = HttpRequest {
            method,
            url: self.config.url(path),
            path: path.to_string(),
            headers: self.headers(),
            query: query.unwrap_or_default(),
            body,
        };
        let response = self.transport.send(request)?;
        interpret_response(path, response)
    }

    /// Authenticates with username and password and installs the returned token.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The token was installed.
    /// * `Err(QcsnuError::Authentication)` - The service rejected the credentials, did not
    ///                                       return a token, or could not be reached.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), QcsnuError> {
        let path = self.config.paths.login.clone();
        let body = serde_json::to_value(LoginRequest { username, password })?;
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: self.config.url(&path),
            path,
            headers: self.headers(),
            query: vec![],
            body: Some(body),
        };
        let response = self.transport.send(request).map_err(|e| QcsnuError::Authentication {
            msg: format!("Login request failed: {}", e),
        })?;
        if response.status != 200 {
            return Err(QcsnuError::Authentication {
                msg: format!("Login failed: {}", response.body),
            });
        }
        let token = serde_json::from_str::<TokenResponse>(&response.body)
            .map_err(|e| QcsnuError::Authentication {
                msg: format!("Login response does not contain a token: {}", e),
            })?
            .token;
        self.set_token(token);
        info!(username, "logged in");
        Ok(())
    }

    /// Installs `token` and validates it with one backend listing.
    ///
    /// When the service rejects the token it is removed again, so the client never keeps a
    /// token known to be invalid. Other failures of the probe are returned as they are and leave
    /// the token installed.
    pub fn login_with_token(&mut self, token: impl Into<String>) -> Result<(), QcsnuError> {
        self.set_token(token);
        let probe_path = self.config.paths.backends.clone();
        match self.request(HttpMethod::Get, &probe_path, None, None) {
            Ok(_) => Ok(()),
            Err(QcsnuError::Authentication { msg }) => {
                warn!(reason = %msg, "token rejected");
                self.clear_token();
                Err(QcsnuError::Authentication {
                    msg: format!("Invalid token: {}", msg),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Creates a job.
    ///
    /// The circuit is normalised to OpenQASM text before submission. A job carrying a
    /// Hamiltonian is tagged as an expectation value experiment.
    ///
    /// # Returns
    ///
    /// * `Ok(Job)` - The created job.
    /// * `Err(QcsnuError::Validation)` - The circuit is not a recognised circuit form; nothing
    ///                                   is sent.
    /// * `Err(QcsnuError)` - The request failed.
    #[instrument(skip(self, submission), fields(backend = %submission.backend, shots = submission.shots))]
    pub fn create_job(&self, submission: &JobSubmission) -> Result<Job, QcsnuError> {
        let data = CreateJobRequest {
            circuit_info: submission.circuit.normalize()?,
            backend: &submission.backend,
            shots: submission.shots,
            mitigation_params: submission.mitigation_params.as_ref(),
            hamiltonian: submission.hamiltonian.as_ref(),
            experiment_type: submission
                .hamiltonian
                .as_ref()
                .map(|_| EXPECTATION_VALUE_EXPERIMENT),
            name: submission.name.as_deref(),
        };
        let body = serde_json::to_value(&data)?;
        let path = self.config.paths.job_create();
        let response = self.request(HttpMethod::Post, &path, Some(body), None)?;
        let job = Job::from_value(response)?;
        info!(job_id = %job.id, status = %job.status, "created job");
        Ok(job)
    }

    /// Lists jobs, optionally only those with the given status.
    pub fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, QcsnuError> {
        let query = status.map(|s| vec![("status".to_string(), s.as_str().to_string())]);
        let response = self.request(HttpMethod::Get, &self.config.paths.jobs, None, query)?;
        serde_json::from_value(_list_items(response)).map_err(|e| QcsnuError::InvalidResponse {
            msg: format!("Could not decode job list: {}", e),
        })
    }

    /// Fetches the current snapshot of a job.
    pub fn get_job(&self, job_id: impl Into<RecordId>) -> Result<Job, QcsnuError> {
        let path = self.config.paths.job(&job_id.into().to_string());
        Job::from_value(self.request(HttpMethod::Get, &path, None, None)?)
    }

    /// Fetches the results of a completed job.
    pub fn get_job_results(&self, job_id: impl Into<RecordId>) -> Result<JobResult, QcsnuError> {
        let path = self.config.paths.job_results(&job_id.into().to_string());
        JobResult::from_value(self.request(HttpMethod::Get, &path, None, None)?)
    }

    /// Cancels a job.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The service reported the job as cancelled.
    /// * `Ok(false)` - The service answered without reporting the job as cancelled.
    /// * `Err(QcsnuError)` - The request failed.
    pub fn cancel_job(&self, job_id: impl Into<RecordId>) -> Result<bool, QcsnuError> {
        let job_id = job_id.into();
        let path = self.config.paths.job_cancel(&job_id.to_string());
        let response = self.request(HttpMethod::Delete, &path, None, None)?;
        let cancelled = response.get("status").and_then(Value::as_str) == Some("cancelled");
        info!(%job_id, cancelled, "cancel requested");
        Ok(cancelled)
    }

    /// Polls a job until it completes, fails, is cancelled or `timeout` elapses.
    ///
    /// Each iteration fetches the job once, hands the snapshot to `on_status`, and then either
    /// resolves or sleeps for `poll_interval`. No request is sent once `timeout` has elapsed.
    /// Errors raised while polling end the wait as a failure; this function does not return
    /// errors.
    ///
    /// # Arguments
    ///
    /// * `job_id` - The job to wait for.
    /// * `poll_interval` - Pause between two polls.
    /// * `timeout` - Total time budget.
    /// * `on_status` - Receives the status of every poll.
    ///
    /// # Returns
    ///
    /// * `JobOutcome::Completed` - The job completed; carries its results.
    /// * `JobOutcome::Failed` - Carries the job's error message, `"Job was cancelled"`,
    ///                          `"Timeout waiting for job completion"` or the polling error.
    pub fn wait_for_job(
        &self,
        job_id: impl Into<RecordId>,
        poll_interval: Duration,
        timeout: Duration,
        mut on_status: Option<&mut dyn StatusHandler>,
    ) -> JobOutcome {
        let job_id = job_id.into();
        let start_time = Instant::now();
        while start_time.elapsed() < timeout {
            let job = match self.get_job(&job_id) {
                Ok(job) => job,
                Err(e) => {
                    warn!(%job_id, error = %e, "polling failed");
                    return JobOutcome::Failed(e.to_string());
                }
            };
            debug!(%job_id, status = %job.status, "polled job");
            if let Some(handler) = on_status.as_mut() {
                handler.on_status(job.status, &job);
            }

            match job.status {
                JobStatus::Completed => {
                    return match self.get_job_results(&job_id) {
                        Ok(result) => JobOutcome::Completed(result),
                        Err(e) => {
                            warn!(%job_id, error = %e, "fetching results failed");
                            JobOutcome::Failed(e.to_string())
                        }
                    };
                }
                JobStatus::Error => {
                    let reason = job
                        .error_message
                        .unwrap_or_else(|| "Job failed".to_string());
                    warn!(%job_id, %reason, "job failed");
                    return JobOutcome::Failed(reason);
                }
                JobStatus::Cancelled => {
                    warn!(%job_id, "job was cancelled");
                    return JobOutcome::Failed("Job was cancelled".to_string());
                }
                JobStatus::Created | JobStatus::Running => {
                    let remaining = timeout.saturating_sub(start_time.elapsed());
                    thread::sleep(poll_interval.min(remaining));
                }
            }
        }
        warn!(%job_id, timeout_secs = timeout.as_secs_f64(), "timed out");
        JobOutcome::Failed("Timeout waiting for job completion".to_string())
    }

    /// Creates a pulse-schedule experiment run.
    pub fn create_experiment(
        &self,
        pulse_schedule: &Value,
        external_run_id: i64,
    ) -> Result<Experiment, QcsnuError> {
        let body = serde_json::to_value(CreateExperimentRequest {
            pulse_schedule,
            external_run_id,
        })?;
        let response = self.request(
            HttpMethod::Post,
            &self.config.paths.experiments,
            Some(body),
            None,
        )?;
        Experiment::from_value(response)
    }

    /// Fetches an experiment run.
    pub fn get_experiment(
        &self,
        experiment_id: impl Into<RecordId>,
    ) -> Result<Experiment, QcsnuError> {
        let path = self
            .config
            .paths
            .experiment(&experiment_id.into().to_string());
        Experiment::from_value(self.request(HttpMethod::Get, &path, None, None)?)
    }

    /// Lists the available backends.
    pub fn list_backends(&self) -> Result<Vec<Backend>, QcsnuError> {
        let response = self.request(HttpMethod::Get, &self.config.paths.backends, None, None)?;
        serde_json::from_value(_list_items(response)).map_err(|e| QcsnuError::InvalidResponse {
            msg: format!("Could not decode backend list: {}", e),
        })
    }

    /// Current status of a backend, e.g. queue length and estimated wait time.
    pub fn get_backend_status(&self, backend_name: &str) -> Result<Value, QcsnuError> {
        let path = self.config.paths.backend_status_of(backend_name);
        self.request(HttpMethod::Get, &path, None, None)
    }

    /// Calibration data of a backend.
    pub fn get_backend_calibration(&self, backend_name: &str) -> Result<Value, QcsnuError> {
        let path = self.config.paths.backend_calibration_of(backend_name);
        self.request(HttpMethod::Get, &path, None, None)
    }
}
