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


use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{CircuitPayload, Hamiltonian, JobResult, RecordId};
use crate::QcsnuError;

/// Register name and size pairs, in declaration order.
type RegisterSizes = Vec<(String, usize)>;

/// Counts the quantum and classical registers declared in OpenQASM source.
///
/// Understands OpenQASM 2 (`qreg q[2];`, `creg c[2];`) and OpenQASM 3 (`qubit[2] q;`,
/// `bit[2] c;`, `qubit q;`) declarations. Comments are ignored; anything else is skipped.
///
/// # Returns
///
/// `(quantum registers, classical registers)`
pub fn count_registers(qasm: &str) -> (RegisterSizes, RegisterSizes) {
    let mut qregs: RegisterSizes = Vec::new();
    let mut cregs: RegisterSizes = Vec::new();
    let source = _strip_comments(qasm);

    // Gate and subroutine bodies end statements as well.
    for statement in source.split(|c| matches!(c, ';' | '{' | '}')) {
        let statement = statement.trim();
        if let Some(decl) = statement.strip_prefix("qreg") {
            qregs.extend(_parse_v2_declaration(decl));
        } else if let Some(decl) = statement.strip_prefix("creg") {
            cregs.extend(_parse_v2_declaration(decl));
        } else if let Some(decl) = statement.strip_prefix("qubit") {
            qregs.extend(_parse_v3_declaration(decl));
        } else if let Some(decl) = statement.strip_prefix("bit") {
            cregs.extend(_parse_v3_declaration(decl));
        }
    }
    (qregs, cregs)
}

fn _strip_comments(qasm: &str) -> String {
    let mut uncommented = String::with_capacity(qasm.len());
    let mut rest = qasm;
    while let Some(start) = rest.find("/*") {
        uncommented.push_str(&rest[..start]);
        uncommented.push(' ');
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + end + 4..],
            None => "",
        };
    }
    uncommented.push_str(rest);
    uncommented
        .lines()
        .map(|line| line.split("//").next().unwrap_or_default())
        .join("\n")
}

// ` q[2]` -> ("q", 2)
fn _parse_v2_declaration(decl: &str) -> Option<(String, usize)> {
    if !decl.starts_with(char::is_whitespace) {
        return None;
    }
    let (name, size) = decl.trim().split_once('[')?;
    let size = size.strip_suffix(']')?.trim().parse().ok()?;
    Some((name.trim().to_string(), size))
}

// Register name of an OpenQASM 3 declaration, without initializer: ` c = measure q` -> "c"
fn _v3_register_name(decl: &str) -> Option<String> {
    decl.split('=')
        .next()?
        .split_whitespace()
        .next()
        .map(str::to_string)
}

// `[2] q` -> ("q", 2), ` q` -> ("q", 1)
fn _parse_v3_declaration(decl: &str) -> Option<(String, usize)> {
    if let Some(rest) = decl.trim_start().strip_prefix('[') {
        let (size, name) = rest.split_once(']')?;
        Some((_v3_register_name(name)?, size.trim().parse().ok()?))
    } else if decl.starts_with(char::is_whitespace) {
        Some((_v3_register_name(decl)?, 1))
    } else {
        None
    }
}

/// Job results in the experiment-result layout consumed by common quantum SDK tooling.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StandardResult {
    /// Backend that executed the job
    pub backend_name: String,
    /// Id of the job
    pub job_id: String,
    /// Whether every experiment succeeded
    pub success: bool,
    /// One entry per executed circuit
    pub results: Vec<ExperimentResult>,
}

/// Results of one executed circuit.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Number of shots
    pub shots: u64,
    /// Whether the circuit executed successfully
    pub success: bool,
    /// Measurement data
    pub data: ExperimentData,
    /// Circuit description
    pub header: ExperimentHeader,
}

/// Measurement data of an [ExperimentResult].
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentData {
    /// Counts keyed by hexadecimal outcome, e.g. `"0x3"` for `"11"`
    pub counts: BTreeMap<String, u64>,
}

/// Sizing metadata of an [ExperimentResult].
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentHeader {
    /// Circuit name
    pub name: String,
    /// Total number of qubits
    pub n_qubits: usize,
    /// Total number of classical bits
    pub memory_slots: usize,
    /// Quantum registers
    pub qreg_sizes: Vec<(String, usize)>,
    /// Classical registers
    pub creg_sizes: Vec<(String, usize)>,
}

impl StandardResult {
    /// Counts of the experiment at `index`, keyed by bitstrings padded to the classical width.
    pub fn get_counts(&self, index: usize) -> Option<HashMap<String, u64>> {
        let experiment = self.results.get(index)?;
        let width = experiment.header.memory_slots;
        experiment
            .data
            .counts
            .iter()
            .map(|(key, count)| {
                let value = u128::from_str_radix(key.trim_start_matches("0x"), 16).ok()?;
                Some((format!("{:0width$b}", value, width = width), *count))
            })
            .collect()
    }
}

/// Converts counts from the service into a [StandardResult].
///
/// # Arguments
///
/// * `result` - Completed job result; must hold counts.
/// * `backend` - Backend name.
/// * `job_id` - Job id.
/// * `circuit` - Submitted circuit, used for register sizing. When the circuit declares no
///               registers, a single register as wide as the longest outcome is assumed.
///
/// # Returns
///
/// * `Ok(StandardResult)` - The converted result.
/// * `Err(QcsnuError::InvalidResponse)` - No counts, or an outcome is not a bitstring.
pub(crate) fn to_standard_result(
    result: &JobResult,
    backend: &str,
    job_id: &RecordId,
    circuit: &CircuitPayload,
) -> Result<StandardResult, QcsnuError> {
    let counts = result
        .counts
        .as_ref()
        .ok_or_else(|| QcsnuError::invalid_response("Job result does not contain counts"))?;

    let mut hex_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut widest: usize = 0;
    for (bitstring, count) in counts.iter().sorted() {
        let bits: String = bitstring.chars().filter(|c| !c.is_whitespace()).collect();
        let value = u128::from_str_radix(&bits, 2).map_err(|_| QcsnuError::InvalidResponse {
            msg: format!("Measurement outcome `{}` is not a bitstring", bitstring),
        })?;
        widest = widest.max(bits.len());
        *hex_counts.entry(format!("0x{:x}", value)).or_insert(0) += count;
    }

    let (mut qreg_sizes, mut creg_sizes) = count_registers(&circuit.normalize()?);
    if qreg_sizes.is_empty() {
        qreg_sizes.push(("q".to_string(), circuit.qubit_count()?.max(widest)));
    }
    if creg_sizes.is_empty() {
        creg_sizes.push(("c".to_string(), widest));
    }
    let header = ExperimentHeader {
        name: circuit.name().unwrap_or_else(|| "circuit".to_string()),
        n_qubits: qreg_sizes.iter().map(|(_, n)| n).sum(),
        memory_slots: creg_sizes.iter().map(|(_, n)| n).sum(),
        qreg_sizes,
        creg_sizes,
    };

    Ok(StandardResult {
        backend_name: backend.to_string(),
        job_id: job_id.to_string(),
        success: true,
        results: vec![ExperimentResult {
            shots: result.total_shots(),
            success: true,
            data: ExperimentData { counts: hex_counts },
            header,
        }],
    })
}

/// Operator whose expectation value is requested.
#[derive(PartialEq, Debug, Clone)]
pub enum Observable {
    /// A single Pauli string with weight one, e.g. `"ZZ"`
    Label(String),
    /// Weighted sum of Pauli strings
    Weighted(Vec<(String, f64)>),
}

impl Observable {
    /// Builds the [Hamiltonian] submitted for a circuit with `num_qubits` qubits.
    ///
    /// Weighted sums must not contain operators shorter than the circuit.
    pub(crate) fn to_hamiltonian(&self, num_qubits: usize) -> Result<Hamiltonian, QcsnuError> {
        match self {
            Observable::Label(label) => Hamiltonian::from_label(label.clone()),
            Observable::Weighted(terms) => {
                if let Some((label, _)) = terms.iter().find(|(label, _)| label.len() < num_qubits) {
                    return Err(QcsnuError::validation(format!(
                        "Operator `{}` has length {}, but the circuit has {} qubits",
                        label,
                        label.len(),
                        num_qubits
                    )));
                }
                let (operators, coefficients): (Vec<String>, Vec<f64>) =
                    terms.iter().cloned().unzip();
                Hamiltonian::new(operators, coefficients)?.with_num_qubits(num_qubits)
            }
        }
    }
}

impl From<&str> for Observable {
    fn from(label: &str) -> Self {
        Observable::Label(label.to_string())
    }
}

impl From<String> for Observable {
    fn from(label: String) -> Self {
        Observable::Label(label)
    }
}

impl From<Vec<(String, f64)>> for Observable {
    fn from(terms: Vec<(String, f64)>) -> Self {
        Observable::Weighted(terms)
    }
}

impl From<Vec<(&str, f64)>> for Observable {
    fn from(terms: Vec<(&str, f64)>) -> Self {
        Observable::Weighted(
            terms
                .into_iter()
                .map(|(label, weight)| (label.to_string(), weight))
                .collect(),
        )
    }
}
