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

//! Convenience operations: submit, wait and convert in one call.

use std::time::Duration;

use tracing::info;

use crate::client::{JobOutcome, JobSubmission, QuantumClient};
use crate::interface::{to_standard_result, Observable, StandardResult};
use crate::models::{CircuitPayload, MitigationParams};
use crate::transport::HttpTransport;
use crate::QcsnuError;

/// Settings of [QuantumClient::run] and [QuantumClient::expectation_value].
#[derive(PartialEq, Debug, Clone)]
pub struct RunOptions {
    /// Backend name
    pub backend: String,
    /// Number of shots
    pub shots: u64,
    /// Error mitigation to apply
    pub mitigation_params: Option<MitigationParams>,
    /// Job name
    pub name: Option<String>,
    /// Pause between two status polls
    pub poll_interval: Duration,
    /// Total time budget for waiting on the job
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            backend: "cassiopeia".to_string(),
            shots: 1024,
            mitigation_params: None,
            name: None,
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
        }
    }
}

impl RunOptions {
    /// Sets the backend.
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    /// Sets the number of shots.
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Sets the error mitigation.
    pub fn with_mitigation(mut self, params: MitigationParams) -> Self {
        self.mitigation_params = Some(params);
        self
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets poll interval and timeout.
    pub fn with_polling(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    fn submission(&self, circuit: CircuitPayload) -> JobSubmission {
        JobSubmission {
            circuit,
            backend: self.backend.clone(),
            shots: self.shots,
            mitigation_params: self.mitigation_params.clone(),
            hamiltonian: None,
            name: self.name.clone(),
        }
    }
}

impl<T: HttpTransport> QuantumClient<T> {
    /// Runs a circuit and returns its counts in the [StandardResult] layout.
    ///
    /// # Returns
    ///
    /// * `Ok(StandardResult)` - Counts and sizing metadata of the completed job.
    /// * `Err(QcsnuError::Job)` - The job failed, was cancelled or timed out.
    /// * `Err(QcsnuError)` - Submission failed or the result holds no counts.
    pub fn run(
        &self,
        circuit: impl Into<CircuitPayload>,
        options: &RunOptions,
    ) -> Result<StandardResult, QcsnuError> {
        let circuit = circuit.into();
        let job = self.create_job(&options.submission(circuit.clone()))?;
        match self.wait_for_job(&job.id, options.poll_interval, options.timeout, None) {
            JobOutcome::Completed(result) => {
                to_standard_result(&result, &job.backend, &job.id, &circuit)
            }
            JobOutcome::Failed(reason) => Err(QcsnuError::Job {
                msg: format!("Job {} failed: {}", job.id, reason),
            }),
        }
    }

    /// Computes the expectation value of `operator` on the state prepared by `circuit`.
    ///
    /// The operator is submitted as a Hamiltonian and evaluated by the service.
    ///
    /// # Arguments
    ///
    /// * `circuit` - State preparation circuit.
    /// * `operator` - A single Pauli label, or a weighted sum whose labels are at least as long
    ///                as the circuit has qubits.
    /// * `options` - Backend, shots and polling settings.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The expectation value.
    /// * `Err(QcsnuError::Validation)` - Invalid circuit or operator; nothing is sent.
    /// * `Err(QcsnuError::Job)` - The job failed, was cancelled or timed out.
    /// * `Err(QcsnuError::InvalidResponse)` - The result holds no expectation value.
    pub fn expectation_value(
        &self,
        circuit: impl Into<CircuitPayload>,
        operator: impl Into<Observable>,
        options: &RunOptions,
    ) -> Result<f64, QcsnuError> {
        let circuit = circuit.into();
        let hamiltonian = operator.into().to_hamiltonian(circuit.qubit_count()?)?;
        let submission = options.submission(circuit).with_hamiltonian(hamiltonian);
        let job = self.create_job(&submission)?;
        match self.wait_for_job(&job.id, options.poll_interval, options.timeout, None) {
            JobOutcome::Completed(result) => {
                let value = result.expval.ok_or_else(|| {
                    QcsnuError::invalid_response("Job result does not contain an expectation value")
                })?;
                info!(job_id = %job.id, value, "expectation value");
                Ok(value)
            }
            JobOutcome::Failed(reason) => Err(QcsnuError::Job {
                msg: format!("Job {} failed: {}", job.id, reason),
            }),
        }
    }
}
