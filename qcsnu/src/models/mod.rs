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

//! Records exchanged with the job service.
//!
//! Every record maps to and from the JSON tree of the service through serde. Besides
//! (de)serialisation, the records only carry invariant checks and a few numeric helpers.

mod common;
pub use common::{RecordId, Timestamp};

mod circuit;
pub use circuit::{Circuit, CircuitPayload};

mod job;
pub use job::{Job, JobStatus, MitigationParams};

mod result;
pub use result::JobResult;

mod hamiltonian;
pub use hamiltonian::Hamiltonian;

mod backend;
pub use backend::Backend;

mod experiment;
pub use experiment::Experiment;
