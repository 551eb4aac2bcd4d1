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


use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3::Python;
use pyqcsnu::{
    BackendWrapper, CircuitWrapper, ExperimentWrapper, HamiltonianWrapper, JobWrapper,
    MitigationParamsWrapper, QuantumClientError, ResultWrapper, ValidationError,
};
use test_case::test_case;

#[test]
fn test_hamiltonian_mismatch_raises() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let hamiltonian_type = py.get_type::<HamiltonianWrapper>();
        let err = hamiltonian_type
            .call1((vec!["XZ", "II"], vec![1.0]))
            .unwrap_err();
        assert!(err.is_instance_of::<ValidationError>(py));
        assert!(err.is_instance_of::<QuantumClientError>(py));
    });
}

#[test]
fn test_hamiltonian_bincode_roundtrip() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let hamiltonian = py
            .get_type::<HamiltonianWrapper>()
            .call1((vec!["ZZ", "XX"], vec![0.5, -0.5], 2))
            .unwrap()
            .downcast::<PyCell<HamiltonianWrapper>>()
            .unwrap();
        let bytes = hamiltonian.call_method0("to_bincode").unwrap();
        let restored = py
            .get_type::<HamiltonianWrapper>()
            .call_method1("from_bincode", (bytes,))
            .unwrap()
            .downcast::<PyCell<HamiltonianWrapper>>()
            .unwrap();
        assert_eq!(
            restored.borrow().internal,
            hamiltonian.borrow().internal
        );
        let num_qubits: Option<usize> = restored.getattr("num_qubits").unwrap().extract().unwrap();
        assert_eq!(num_qubits, Some(2));

        let garbage = py
            .get_type::<HamiltonianWrapper>()
            .call_method1("from_bincode", (vec![0u8; 3],));
        assert!(garbage.is_err());
    });
}

#[test]
fn test_hamiltonian_from_dict() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let input = PyDict::new(py);
        input.set_item("operators", vec!["ZZ"]).unwrap();
        input.set_item("coefficients", vec![1.0]).unwrap();
        let hamiltonian = py
            .get_type::<HamiltonianWrapper>()
            .call_method1("from_dict", (input,))
            .unwrap()
            .downcast::<PyCell<HamiltonianWrapper>>()
            .unwrap();
        let operators: Vec<String> = hamiltonian.getattr("operators").unwrap().extract().unwrap();
        assert_eq!(operators, vec!["ZZ".to_string()]);

        input.set_item("coefficients", vec![1.0, 2.0]).unwrap();
        let err = py
            .get_type::<HamiltonianWrapper>()
            .call_method1("from_dict", (input,))
            .unwrap_err();
        assert!(err.is_instance_of::<ValidationError>(py));
    });
}

#[test_case("00", 500.0 / 1024.0)]
#[test_case("11", 524.0 / 1024.0)]
#[test_case("01", 0.0)]
fn test_result_probability(bitstring: &str, expected: f64) {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let counts = PyDict::new(py);
        counts.set_item("00", 500).unwrap();
        counts.set_item("11", 524).unwrap();
        let result = py
            .get_type::<ResultWrapper>()
            .call1((counts,))
            .unwrap()
            .downcast::<PyCell<ResultWrapper>>()
            .unwrap();
        let probability: f64 = result
            .call_method1("get_probability", (bitstring,))
            .unwrap()
            .extract()
            .unwrap();
        assert!((probability - expected).abs() < 1e-12);
        let total: u64 = result.call_method0("total_shots").unwrap().extract().unwrap();
        assert_eq!(total, 1024);
    });
}

#[test]
fn test_result_expectation_value() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let counts = PyDict::new(py);
        counts.set_item("00", 500).unwrap();
        counts.set_item("11", 500).unwrap();
        let result = py.get_type::<ResultWrapper>().call1((counts,)).unwrap();
        let observable = PyDict::new(py);
        observable.set_item("00", 1.0).unwrap();
        observable.set_item("11", 1.0).unwrap();
        let value: f64 = result
            .call_method1("get_expectation_value", (observable,))
            .unwrap()
            .extract()
            .unwrap();
        assert!((value - 1.0).abs() < 1e-12);
    });
}

#[test]
fn test_result_from_dict_without_counts_or_expval() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let input = PyDict::new(py);
        input.set_item("job_id", 1).unwrap();
        let err = py
            .get_type::<ResultWrapper>()
            .call_method1("from_dict", (input,))
            .unwrap_err();
        assert!(err.is_instance_of::<QuantumClientError>(py));
    });
}

#[test]
fn test_job_json_roundtrip_keeps_id_form() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let json = r#"{"id": "test-job-1", "status": "running", "backend": "Cassiopeia", "shots": 1024, "created_at": "2024-01-01T00:00:00Z"}"#;
        let job = py
            .get_type::<JobWrapper>()
            .call_method1("from_json", (json,))
            .unwrap()
            .downcast::<PyCell<JobWrapper>>()
            .unwrap();
        let id: String = job.getattr("id").unwrap().extract().unwrap();
        assert_eq!(id, "test-job-1");
        let status: String = job.getattr("status").unwrap().extract().unwrap();
        assert_eq!(status, "running");
        assert!(job.getattr("created_at").unwrap().extract::<Option<String>>().unwrap().is_some());

        let dict = job.call_method0("to_dict").unwrap();
        let copy = py
            .get_type::<JobWrapper>()
            .call_method1("from_dict", (dict,))
            .unwrap()
            .downcast::<PyCell<JobWrapper>>()
            .unwrap();
        assert_eq!(copy.borrow().internal, job.borrow().internal);
    });
}

#[test]
fn test_mitigation_params() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let params = PyDict::new(py);
        params.set_item("scale_factors", vec![1, 2, 3]).unwrap();
        let mitigation = py
            .get_type::<MitigationParamsWrapper>()
            .call1(("zne", params))
            .unwrap()
            .downcast::<PyCell<MitigationParamsWrapper>>()
            .unwrap();
        let technique: String = mitigation.getattr("technique").unwrap().extract().unwrap();
        assert_eq!(technique, "zne");
        let factors: Vec<u32> = mitigation
            .getattr("params")
            .unwrap()
            .get_item("scale_factors")
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(factors, vec![1, 2, 3]);

        let err = py
            .get_type::<MitigationParamsWrapper>()
            .call1(("zne", vec![1, 2]))
            .unwrap_err();
        assert!(err.is_instance_of::<ValidationError>(py));
    });
}

#[test]
fn test_backend_from_json() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let json = r#"{"name": "Cassiopeia", "status": "online", "n_qubits": 5, "capabilities": {"max_shots": 10000}}"#;
        let backend = py
            .get_type::<BackendWrapper>()
            .call_method1("from_json", (json,))
            .unwrap()
            .downcast::<PyCell<BackendWrapper>>()
            .unwrap();
        let online: bool = backend.call_method0("is_online").unwrap().extract().unwrap();
        assert!(online);
        let max_shots: Option<u64> = backend.call_method0("max_shots").unwrap().extract().unwrap();
        assert_eq!(max_shots, Some(10000));
    });
}

#[test]
fn test_job_nested_records() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let json = r#"{"id": 5, "status": "completed", "backend": "Cassiopeia", "shots": 100,
            "circuit": {"qasm": "OPENQASM 2.0;", "name": "bell"},
            "mitigation_params": {"technique": "zne", "params": {"scale_factors": [1, 2]}},
            "metadata": {"priority": 2}}"#;
        let job = py
            .get_type::<JobWrapper>()
            .call_method1("from_json", (json,))
            .unwrap();
        let qasm: String = job
            .getattr("circuit")
            .unwrap()
            .get_item("qasm")
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(qasm, "OPENQASM 2.0;");
        let mitigation = job
            .getattr("mitigation_params")
            .unwrap()
            .downcast::<PyCell<MitigationParamsWrapper>>()
            .unwrap();
        assert_eq!(mitigation.borrow().internal.technique, "zne");
        let priority: u32 = job
            .getattr("metadata")
            .unwrap()
            .get_item("priority")
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(priority, 2);

        let bare = py
            .get_type::<JobWrapper>()
            .call_method1(
                "from_json",
                (r#"{"id": 6, "status": "created", "backend": "Cassiopeia", "shots": 10}"#,),
            )
            .unwrap();
        assert!(bare.getattr("circuit").unwrap().is_none());
        assert!(bare.getattr("mitigation_params").unwrap().is_none());
    });
}

#[test]
fn test_circuit_counts_registers() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let qasm = "OPENQASM 3.0;\nqubit[3] q;\nbit[2] c = measure q[0:1];\n";
        let circuit = py
            .get_type::<CircuitWrapper>()
            .call1((qasm, "ghz"))
            .unwrap()
            .downcast::<PyCell<CircuitWrapper>>()
            .unwrap();
        let qubits: usize = circuit.call_method0("qubit_count").unwrap().extract().unwrap();
        assert_eq!(qubits, 3);
        let clbits: usize = circuit.call_method0("clbit_count").unwrap().extract().unwrap();
        assert_eq!(clbits, 2);
        let name: Option<String> = circuit.getattr("name").unwrap().extract().unwrap();
        assert_eq!(name.as_deref(), Some("ghz"));

        let kwargs = PyDict::new(py);
        kwargs.set_item("num_qubits", 5).unwrap();
        let wide = py
            .get_type::<CircuitWrapper>()
            .call((qasm,), Some(kwargs))
            .unwrap();
        let qubits: usize = wide.call_method0("qubit_count").unwrap().extract().unwrap();
        assert_eq!(qubits, 5);
    });
}

#[test]
fn test_circuit_dict_roundtrip() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let metadata = PyDict::new(py);
        metadata.set_item("author", "lab").unwrap();
        let circuit = py
            .get_type::<CircuitWrapper>()
            .call1(("OPENQASM 2.0;\nqreg q[1];\n", "single", 1, metadata))
            .unwrap()
            .downcast::<PyCell<CircuitWrapper>>()
            .unwrap();
        let dict = circuit.call_method0("to_dict").unwrap();
        let copy = py
            .get_type::<CircuitWrapper>()
            .call_method1("from_dict", (dict,))
            .unwrap()
            .downcast::<PyCell<CircuitWrapper>>()
            .unwrap();
        assert_eq!(copy.borrow().internal, circuit.borrow().internal);

        let err = py
            .get_type::<CircuitWrapper>()
            .call1(("OPENQASM 2.0;", "bad", 1, "not a dict"))
            .unwrap_err();
        assert!(err.is_instance_of::<ValidationError>(py));
    });
}

#[test]
fn test_experiment_from_dict() {
    pyo3::prepare_freethreaded_python();
    Python::with_gil(|py| {
        let json = r#"{"id": "exp-1", "status": "completed", "pulse_schedule": {"channels": [{"name": "d0"}]},
            "external_run_id": 7, "error_message": null, "metadata": {}, "created_at": "2024-01-01T00:00:00"}"#;
        let experiment = py
            .get_type::<ExperimentWrapper>()
            .call_method1("from_json", (json,))
            .unwrap()
            .downcast::<PyCell<ExperimentWrapper>>()
            .unwrap();
        let id: String = experiment.getattr("id").unwrap().extract().unwrap();
        assert_eq!(id, "exp-1");
        let channel: String = experiment
            .getattr("pulse_schedule")
            .unwrap()
            .get_item("channels")
            .unwrap()
            .get_item(0)
            .unwrap()
            .get_item("name")
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(channel, "d0");
        assert!(experiment.getattr("created_at").unwrap().extract::<Option<String>>().unwrap().is_some());

        let dict = experiment.call_method0("to_dict").unwrap();
        let copy = py
            .get_type::<ExperimentWrapper>()
            .call_method1("from_dict", (dict,))
            .unwrap()
            .downcast::<PyCell<ExperimentWrapper>>()
            .unwrap();
        assert_eq!(copy.borrow().internal, experiment.borrow().internal);

        let invalid = PyDict::new(py);
        invalid.set_item("id", 1).unwrap();
        let err = py
            .get_type::<ExperimentWrapper>()
            .call_method1("from_dict", (invalid,))
            .unwrap_err();
        assert!(err.is_instance_of::<QuantumClientError>(py));
    });
}
