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


//! Python interface of qcsnu
//!

#![deny(missing_docs)]
#![warn(rustdoc::private_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::private_doc_tests)]

use pyo3::prelude::*;

mod convert;

/// Python exception classes
pub mod exceptions;
pub use exceptions::{
    AuthenticationError, BackendError, ExperimentError, JobError, QuantumClientError,
    ServiceError, TransportError, ValidationError,
};

mod models;
pub use models::{
    BackendWrapper, CircuitWrapper, ExperimentWrapper, HamiltonianWrapper, JobWrapper,
    MitigationParamsWrapper, ResultWrapper,
};

mod client;
pub use client::QuantumClientWrapper;

/// SNU quantum computing services python interface
///
/// Provides the client used to submit circuits to the job service, the records it returns and
/// the exceptions it raises.
#[pymodule]
fn pyqcsnu(py: Python, module: &PyModule) -> PyResult<()> {
    module.add_class::<QuantumClientWrapper>()?;
    module.add_class::<JobWrapper>()?;
    module.add_class::<ResultWrapper>()?;
    module.add_class::<HamiltonianWrapper>()?;
    module.add_class::<MitigationParamsWrapper>()?;
    module.add_class::<BackendWrapper>()?;
    module.add_class::<CircuitWrapper>()?;
    module.add_class::<ExperimentWrapper>()?;

    module.add("QuantumClientError", py.get_type::<QuantumClientError>())?;
    module.add("AuthenticationError", py.get_type::<AuthenticationError>())?;
    module.add("JobError", py.get_type::<JobError>())?;
    module.add("ExperimentError", py.get_type::<ExperimentError>())?;
    module.add("BackendError", py.get_type::<BackendError>())?;
    module.add("ValidationError", py.get_type::<ValidationError>())?;
    module.add("TransportError", py.get_type::<TransportError>())?;
    module.add("ServiceError", py.get_type::<ServiceError>())?;
    Ok(())
}
