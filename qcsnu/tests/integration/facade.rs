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


use crate::mock::*;
use qcsnu::{Circuit, HttpMethod, MitigationParams, QcsnuError, RunOptions};
use serde_json::json;
use std::time::Duration;

const CREATE: &str = "/api/runner/jobs/create/";
const JOB: &str = "/api/runner/jobs/1/";
const RESULTS: &str = "/api/runner/jobs/1/results/";

fn fast_options() -> RunOptions {
    RunOptions::default()
        .with_backend("Cassiopeia")
        .with_polling(Duration::from_millis(1), Duration::from_secs(5))
}

#[test]
fn test_run_returns_standard_result() {
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, CREATE, 201, job_json(1, "created"))
        .on(HttpMethod::Get, JOB, 200, job_json(1, "running"))
        .on(HttpMethod::Get, JOB, 200, job_json(1, "completed"))
        .on(
            HttpMethod::Get,
            RESULTS,
            200,
            json!({ "counts": { "00": 500, "11": 524 } }),
        );
    let client = client_with(transport);
    let circuit = Circuit::new(BELL_CIRCUIT).with_name("bell_state");
    let result = client
        .run(circuit, &fast_options().with_mitigation(MitigationParams::new("zne")))
        .unwrap();

    assert_eq!(result.backend_name, "Cassiopeia");
    assert_eq!(result.job_id, "1");
    assert!(result.success);
    let experiment = &result.results[0];
    assert_eq!(experiment.shots, 1024);
    assert_eq!(experiment.header.name, "bell_state");
    assert_eq!(experiment.header.n_qubits, 2);
    assert_eq!(experiment.header.memory_slots, 2);
    assert_eq!(experiment.data.counts.get("0x0"), Some(&500));
    assert_eq!(experiment.data.counts.get("0x3"), Some(&524));

    let counts = result.get_counts(0).unwrap();
    assert_eq!(counts.get("00"), Some(&500));
    assert_eq!(counts.get("11"), Some(&524));

    let body = client.transport().requests()[0].body.clone().unwrap();
    assert_eq!(body["mitigation_params"]["technique"], json!("zne"));
    assert_eq!(body["shots"], json!(1024));
}

#[test]
fn test_run_failed_job_is_error() {
    let mut failed = job_json(1, "error");
    failed["error_message"] = json!("bad gate");
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, CREATE, 201, job_json(1, "created"))
        .on(HttpMethod::Get, JOB, 200, failed);
    let client = client_with(transport);
    let err = client.run(BELL_CIRCUIT, &fast_options()).unwrap_err();
    assert_eq!(
        err,
        QcsnuError::Job {
            msg: "Job 1 failed: bad gate".to_string()
        }
    );
}

#[test]
fn test_run_without_counts_is_invalid_response() {
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, CREATE, 201, job_json(1, "created"))
        .on(HttpMethod::Get, JOB, 200, job_json(1, "completed"))
        .on(HttpMethod::Get, RESULTS, 200, json!({ "expval": 0.5 }));
    let client = client_with(transport);
    let err = client.run(BELL_CIRCUIT, &fast_options()).unwrap_err();
    assert!(matches!(err, QcsnuError::InvalidResponse { .. }));
}

#[test]
fn test_expectation_value_weighted_sum() {
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, CREATE, 201, job_json(1, "created"))
        .on(HttpMethod::Get, JOB, 200, job_json(1, "completed"))
        .on(
            HttpMethod::Get,
            RESULTS,
            200,
            json!({ "processed_results": { "expval": 0.5 } }),
        );
    let client = client_with(transport);
    let operator = vec![("ZZ".to_string(), 1.0), ("XX".to_string(), 0.5)];
    let value = client
        .expectation_value(BELL_CIRCUIT, operator, &fast_options())
        .unwrap();
    assert!((value - 0.5).abs() < 1e-12);

    let body = client.transport().requests()[0].body.clone().unwrap();
    assert_eq!(body["experiment_type"], json!("expectation_value"));
    assert_eq!(body["hamiltonian"]["operators"], json!(["ZZ", "XX"]));
    assert_eq!(body["hamiltonian"]["coefficients"], json!([1.0, 0.5]));
}

#[test]
fn test_expectation_value_single_label() {
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, CREATE, 201, job_json(1, "created"))
        .on(HttpMethod::Get, JOB, 200, job_json(1, "completed"))
        .on(HttpMethod::Get, RESULTS, 200, json!({ "expval": 1.0 }));
    let client = client_with(transport);
    let value = client
        .expectation_value(BELL_CIRCUIT, "ZZ", &fast_options())
        .unwrap();
    assert_eq!(value, 1.0);
}

#[test]
fn test_expectation_value_short_operator_is_rejected() {
    let client = client_with(ScriptedTransport::new());
    let operator = vec![("Z".to_string(), 1.0)];
    let err = client
        .expectation_value(BELL_CIRCUIT, operator, &fast_options())
        .unwrap_err();
    assert!(matches!(err, QcsnuError::Validation { .. }));
    assert!(client.transport().requests().is_empty());
}

#[test]
fn test_expectation_value_gate_definition_circuit_checks_operator_length() {
    let circuit = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\ngate bell a, b { h a; cx a, b; }\nqreg q[2];\ncreg c[2];\nbell q[0], q[1];\nmeasure q -> c;\n";
    let client = client_with(ScriptedTransport::new());
    let operator = vec![("Z".to_string(), 1.0)];
    let err = client
        .expectation_value(circuit, operator, &fast_options())
        .unwrap_err();
    assert!(matches!(err, QcsnuError::Validation { .. }));
    assert!(client.transport().requests().is_empty());
}

#[test]
fn test_expectation_value_without_expval() {
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, CREATE, 201, job_json(1, "created"))
        .on(HttpMethod::Get, JOB, 200, job_json(1, "completed"))
        .on(
            HttpMethod::Get,
            RESULTS,
            200,
            json!({ "counts": { "00": 10 } }),
        );
    let client = client_with(transport);
    let err = client
        .expectation_value(BELL_CIRCUIT, "ZZ", &fast_options())
        .unwrap_err();
    assert!(matches!(err, QcsnuError::InvalidResponse { .. }));
}
