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


use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::PyErr;
use qcsnu::QcsnuError;

create_exception!(
    pyqcsnu,
    QuantumClientError,
    PyException,
    "Base class of every error raised by the quantum client."
);
create_exception!(
    pyqcsnu,
    AuthenticationError,
    QuantumClientError,
    "Missing, rejected or insufficient credentials."
);
create_exception!(
    pyqcsnu,
    JobError,
    QuantumClientError,
    "A job operation was rejected, or the job failed."
);
create_exception!(
    pyqcsnu,
    ExperimentError,
    QuantumClientError,
    "An experiment operation was rejected."
);
create_exception!(
    pyqcsnu,
    BackendError,
    QuantumClientError,
    "A backend operation was rejected."
);
create_exception!(
    pyqcsnu,
    ValidationError,
    QuantumClientError,
    "Malformed input passed to the client."
);
create_exception!(
    pyqcsnu,
    TransportError,
    QuantumClientError,
    "The service could not be reached."
);
create_exception!(
    pyqcsnu,
    ServiceError,
    QuantumClientError,
    "The service answered with a server error."
);

/// Converts a [QcsnuError] into the matching Python exception.
pub fn to_py_err(err: QcsnuError) -> PyErr {
    let msg = err.to_string();
    match err {
        QcsnuError::Authentication { .. } => AuthenticationError::new_err(msg),
        QcsnuError::Job { .. } => JobError::new_err(msg),
        QcsnuError::Experiment { .. } => ExperimentError::new_err(msg),
        QcsnuError::Backend { .. } => BackendError::new_err(msg),
        QcsnuError::Validation { .. } => ValidationError::new_err(msg),
        QcsnuError::Transport { .. } => TransportError::new_err(msg),
        QcsnuError::Service { .. } => ServiceError::new_err(msg),
        QcsnuError::Client { .. } | QcsnuError::InvalidResponse { .. } => {
            QuantumClientError::new_err(msg)
        }
    }
}
