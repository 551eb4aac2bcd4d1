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
use qcsnu::{
    Circuit, Hamiltonian, HttpMethod, JobStatus, JobSubmission, MitigationParams, QcsnuError,
};
use serde_json::json;
use test_case::test_case;

const JOBS: &str = "/api/runner/jobs/";
const CREATE: &str = "/api/runner/jobs/create/";
const BACKENDS: &str = "/api/hardware/backends/";
const LOGIN: &str = "/api/token/";

#[test]
fn test_login_installs_token() {
    let transport =
        ScriptedTransport::new().on(HttpMethod::Post, LOGIN, 200, json!({ "token": "abc123" }));
    let mut client = anonymous_client_with(transport);
    client.login("alice", "secret").unwrap();

    assert_eq!(client.token(), Some("abc123"));
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        Some(json!({ "username": "alice", "password": "secret" }))
    );
    assert_eq!(requests[0].header("Authorization"), None);
    assert_eq!(requests[0].url, format!("{}{}", TEST_BASE_URL, LOGIN));
}

#[test]
fn test_token_is_sent_after_login() {
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, LOGIN, 200, json!({ "token": "abc123" }))
        .on(HttpMethod::Get, BACKENDS, 200, json!([]));
    let mut client = anonymous_client_with(transport);
    client.login("alice", "secret").unwrap();
    client.list_backends().unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests[1].header("Authorization"), Some("Token abc123"));
}

#[test_case(400, json!({ "non_field_errors": ["Unable to log in"] }); "bad request")]
#[test_case(200, json!({ "detail": "ok" }); "no token in body")]
#[test_case(500, json!({ "error": "boom" }); "server error")]
fn test_login_failures_are_authentication_errors(status: u16, body: serde_json::Value) {
    let transport = ScriptedTransport::new().on(HttpMethod::Post, LOGIN, status, body);
    let mut client = anonymous_client_with(transport);
    let err = client.login("alice", "wrong").unwrap_err();
    assert!(matches!(err, QcsnuError::Authentication { .. }));
    assert_eq!(client.token(), None);
}

#[test]
fn test_login_unreachable_service() {
    let transport = ScriptedTransport::new().fail(HttpMethod::Post, LOGIN, "connection refused");
    let mut client = anonymous_client_with(transport);
    let err = client.login("alice", "secret").unwrap_err();
    assert_eq!(
        err,
        QcsnuError::authentication("Login request failed: connection refused")
    );
}

#[test]
fn test_login_with_valid_token() {
    let transport = ScriptedTransport::new().on(HttpMethod::Get, BACKENDS, 200, json!([]));
    let mut client = anonymous_client_with(transport);
    client.login_with_token("good").unwrap();
    assert_eq!(client.token(), Some("good"));
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header("Authorization"), Some("Token good"));
}

#[test_case(401; "unauthorized")]
#[test_case(403; "forbidden")]
fn test_login_with_rejected_token_clears_it(status: u16) {
    let transport = ScriptedTransport::new().on_text(HttpMethod::Get, BACKENDS, status, "");
    let mut client = anonymous_client_with(transport);
    let err = client.login_with_token("bad").unwrap_err();
    assert!(err.to_string().starts_with("Invalid token"));
    assert_eq!(client.token(), None);
}

#[test]
fn test_login_with_token_keeps_token_on_server_error() {
    let transport = ScriptedTransport::new().on_text(HttpMethod::Get, BACKENDS, 503, "down");
    let mut client = anonymous_client_with(transport);
    let err = client.login_with_token("maybe").unwrap_err();
    assert!(matches!(err, QcsnuError::Service { status: 503, .. }));
    assert_eq!(client.token(), Some("maybe"));
}

#[test]
fn test_requests_without_token_are_not_sent() {
    let client = anonymous_client_with(ScriptedTransport::new());

    let err = client.list_backends().unwrap_err();
    assert_eq!(
        err,
        QcsnuError::authentication("Not authenticated. Call login() first.")
    );
    assert!(client.get_job(1u64).is_err());
    assert!(client.cancel_job(1u64).is_err());
    assert!(client
        .create_job(&JobSubmission::new(BELL_CIRCUIT, "cassiopeia", 10))
        .is_err());
    assert!(client.transport().requests().is_empty());
}

#[test]
fn test_forbidden_is_permission_denied() {
    let transport = ScriptedTransport::new().on_text(HttpMethod::Get, BACKENDS, 403, "");
    let client = client_with(transport);
    let err = client.list_backends().unwrap_err();
    assert_eq!(err, QcsnuError::authentication("permission denied"));
}

#[test]
fn test_server_error_propagates() {
    let transport = ScriptedTransport::new().on(
        HttpMethod::Get,
        BACKENDS,
        500,
        json!({ "error": "Internal server error" }),
    );
    let client = client_with(transport);
    let err = client.list_backends().unwrap_err();
    assert!(matches!(err, QcsnuError::Service { status: 500, .. }));
    assert!(err.to_string().starts_with("Server error"));
}

#[test]
fn test_transport_error_propagates() {
    let transport = ScriptedTransport::new().fail(HttpMethod::Get, BACKENDS, "dns failure");
    let client = client_with(transport);
    let err = client.list_backends().unwrap_err();
    assert_eq!(
        err,
        QcsnuError::Transport {
            msg: "dns failure".to_string()
        }
    );
}

#[test]
fn test_create_job() {
    let transport =
        ScriptedTransport::new().on(HttpMethod::Post, CREATE, 201, job_json(1, "created"));
    let client = client_with(transport);
    let submission = JobSubmission::new(
        Circuit::new(BELL_CIRCUIT).with_name("bell_state"),
        "Cassiopeia",
        1024,
    )
    .with_mitigation(MitigationParams::new("zne").with_param("scale_factors", json!([1, 2, 3])))
    .with_name("bell");
    let job = client.create_job(&submission).unwrap();

    assert_eq!(job.id.to_string(), "1");
    assert_eq!(job.status, JobStatus::Created);
    assert_eq!(job.backend, "Cassiopeia");
    assert_eq!(job.shots, 1024);

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    let body = requests[0].body.clone().unwrap();
    assert_eq!(body["circuit_info"], json!(BELL_CIRCUIT));
    assert_eq!(body["backend"], json!("Cassiopeia"));
    assert_eq!(body["shots"], json!(1024));
    assert_eq!(body["name"], json!("bell"));
    assert_eq!(body["mitigation_params"]["technique"], json!("zne"));
    assert!(body.get("hamiltonian").is_none());
    assert!(body.get("experiment_type").is_none());
}

#[test]
fn test_create_job_with_hamiltonian() {
    let transport =
        ScriptedTransport::new().on(HttpMethod::Post, CREATE, 201, job_json(2, "created"));
    let client = client_with(transport);
    let hamiltonian =
        Hamiltonian::new(vec!["ZZ".to_string(), "XX".to_string()], vec![0.5, -0.5]).unwrap();
    let submission =
        JobSubmission::new(BELL_CIRCUIT, "Cassiopeia", 1000).with_hamiltonian(hamiltonian);
    client.create_job(&submission).unwrap();

    let body = client.transport().requests()[0].body.clone().unwrap();
    assert_eq!(body["experiment_type"], json!("expectation_value"));
    assert_eq!(body["hamiltonian"]["operators"], json!(["ZZ", "XX"]));
    assert_eq!(body["hamiltonian"]["coefficients"], json!([0.5, -0.5]));
}

#[test]
fn test_create_job_circuit_object_sends_qasm_text() {
    let transport =
        ScriptedTransport::new().on(HttpMethod::Post, CREATE, 201, job_json(3, "created"));
    let client = client_with(transport);
    let circuit = json!({ "qasm": BELL_CIRCUIT, "name": "bell_state" });
    client
        .create_job(&JobSubmission::new(circuit, "Cassiopeia", 10))
        .unwrap();

    let body = client.transport().requests()[0].body.clone().unwrap();
    assert_eq!(body["circuit_info"], json!(BELL_CIRCUIT));
}

#[test_case(json!(42); "number")]
#[test_case(json!(null); "null")]
#[test_case(json!("   "); "blank text")]
#[test_case(json!({ "name": "no_qasm" }); "object without qasm")]
fn test_create_job_rejects_invalid_circuit(circuit: serde_json::Value) {
    let client = client_with(ScriptedTransport::new());
    let err = client
        .create_job(&JobSubmission::new(circuit, "Cassiopeia", 10))
        .unwrap_err();
    assert!(matches!(err, QcsnuError::Validation { .. }));
    assert!(client.transport().requests().is_empty());
}

#[test]
fn test_create_job_rejected_by_service() {
    let transport = ScriptedTransport::new().on(
        HttpMethod::Post,
        CREATE,
        400,
        json!({ "error": "Invalid circuit" }),
    );
    let client = client_with(transport);
    let err = client
        .create_job(&JobSubmission::new(BELL_CIRCUIT, "Cassiopeia", 10))
        .unwrap_err();
    assert_eq!(
        err,
        QcsnuError::Job {
            msg: "Invalid circuit".to_string()
        }
    );
}

#[test]
fn test_list_jobs_filters_by_status() {
    let transport = ScriptedTransport::new().on(
        HttpMethod::Get,
        JOBS,
        200,
        json!({ "count": 2, "results": [job_json(1, "running"), job_json(2, "running")] }),
    );
    let client = client_with(transport);
    let jobs = client.list_jobs(Some(JobStatus::Running)).unwrap();

    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|j| j.status == JobStatus::Running));
    let requests = client.transport().requests();
    assert_eq!(
        requests[0].query,
        vec![("status".to_string(), "running".to_string())]
    );
}

#[test]
fn test_get_job_results() {
    let transport = ScriptedTransport::new().on(
        HttpMethod::Get,
        "/api/runner/jobs/1/results/",
        200,
        json!({ "counts": { "00": 500, "11": 524 } }),
    );
    let client = client_with(transport);
    let result = client.get_job_results(1u64).unwrap();
    assert_eq!(result.total_shots(), 1024);
    assert!((result.get_probability("00").unwrap() - 0.4883).abs() < 1e-4);
}

#[test_case(json!({ "status": "cancelled" }), true; "cancelled")]
#[test_case(json!({ "status": "completed" }), false; "already finished")]
#[test_case(json!({}), false; "no status")]
fn test_cancel_job(body: serde_json::Value, expected: bool) {
    let transport =
        ScriptedTransport::new().on(HttpMethod::Delete, "/api/runner/jobs/1/cancel/", 200, body);
    let client = client_with(transport);
    assert_eq!(client.cancel_job(1u64).unwrap(), expected);
}

#[test]
fn test_list_backends() {
    let transport = ScriptedTransport::new().on(
        HttpMethod::Get,
        BACKENDS,
        200,
        json!([{
            "name": "Cassiopeia",
            "status": "online",
            "n_qubits": 5,
            "capabilities": { "max_shots": 10000 }
        }]),
    );
    let client = client_with(transport);
    let backends = client.list_backends().unwrap();
    assert_eq!(backends.len(), 1);
    assert!(backends[0].is_online());
    assert_eq!(backends[0].max_shots(), Some(10000));
}

#[test]
fn test_backend_status_and_calibration() {
    let transport = ScriptedTransport::new()
        .on(
            HttpMethod::Get,
            "/api/hardware/status/Cassiopeia/",
            200,
            json!({ "queue_length": 3 }),
        )
        .on(
            HttpMethod::Get,
            "/api/hardware/calibration/Cassiopeia/",
            200,
            json!({ "t1": [50.0, 48.2] }),
        );
    let client = client_with(transport);
    assert_eq!(
        client.get_backend_status("Cassiopeia").unwrap()["queue_length"],
        json!(3)
    );
    assert_eq!(
        client.get_backend_calibration("Cassiopeia").unwrap()["t1"],
        json!([50.0, 48.2])
    );
}

#[test]
fn test_unknown_backend() {
    let transport = ScriptedTransport::new().on_text(
        HttpMethod::Get,
        "/api/hardware/status/Nowhere/",
        404,
        "",
    );
    let client = client_with(transport);
    let err = client.get_backend_status("Nowhere").unwrap_err();
    assert_eq!(
        err,
        QcsnuError::Backend {
            msg: "Backend operation failed".to_string()
        }
    );
}

#[test]
fn test_experiments() {
    let experiment = json!({
        "id": "run-7",
        "status": "queued",
        "pulse_schedule": { "pulses": [] },
        "external_run_id": 7
    });
    let transport = ScriptedTransport::new()
        .on(HttpMethod::Post, "/api/experiments/", 201, experiment.clone())
        .on(HttpMethod::Get, "/api/experiments/run-7/", 200, experiment);
    let client = client_with(transport);

    let created = client
        .create_experiment(&json!({ "pulses": [] }), 7)
        .unwrap();
    assert_eq!(created.id.to_string(), "run-7");
    let fetched = client.get_experiment("run-7").unwrap();
    assert_eq!(fetched, created);

    let body = client.transport().requests()[0].body.clone().unwrap();
    assert_eq!(
        body,
        json!({ "pulse_schedule": { "pulses": [] }, "external_run_id": 7 })
    );
}

#[test]
fn test_debug_redacts_token() {
    let client = client_with(ScriptedTransport::new());
    let printed = format!("{:?}", client);
    assert!(!printed.contains(TEST_TOKEN));
    assert!(printed.contains("[REDACTED]"));
}
