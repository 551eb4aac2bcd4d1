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


use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::QcsnuError;

/// Weighted sum of Pauli strings.
///
/// `operators[i]` carries weight `coefficients[i]`. Both lists always have the same, non-zero
/// length; construction fails with [QcsnuError::Validation] otherwise.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawHamiltonian")]
pub struct Hamiltonian {
    operators: Vec<String>,
    coefficients: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_qubits: Option<usize>,
}

#[derive(Deserialize)]
struct RawHamiltonian {
    operators: Vec<String>,
    coefficients: Vec<f64>,
    #[serde(default)]
    num_qubits: Option<usize>,
}

impl TryFrom<RawHamiltonian> for Hamiltonian {
    type Error = QcsnuError;

    fn try_from(raw: RawHamiltonian) -> Result<Self, Self::Error> {
        let hamiltonian = Hamiltonian::new(raw.operators, raw.coefficients)?;
        match raw.num_qubits {
            Some(n) => hamiltonian.with_num_qubits(n),
            None => Ok(hamiltonian),
        }
    }
}

impl Hamiltonian {
    /// Creates a Hamiltonian from Pauli labels and their weights.
    ///
    /// # Arguments
    ///
    /// * `operators` - Pauli strings over `I`, `X`, `Y` and `Z`, e.g. `"XZ"`.
    /// * `coefficients` - One weight per operator.
    ///
    /// # Returns
    ///
    /// * `Ok(Hamiltonian)` - The Hamiltonian.
    /// * `Err(QcsnuError::Validation)` - Lengths differ, the lists are empty, a label is not a
    ///                                    Pauli string or a weight is not finite.
    pub fn new(operators: Vec<String>, coefficients: Vec<f64>) -> Result<Self, QcsnuError> {
        if operators.len() != coefficients.len() {
            return Err(QcsnuError::validation(format!(
                "Number of operators ({}) and coefficients ({}) must match",
                operators.len(),
                coefficients.len()
            )));
        }
        if operators.is_empty() {
            return Err(QcsnuError::validation(
                "Hamiltonian must contain at least one term",
            ));
        }
        if let Some(label) = operators
            .iter()
            .find(|op| op.is_empty() || !op.chars().all(|c| matches!(c, 'I' | 'X' | 'Y' | 'Z')))
        {
            return Err(QcsnuError::validation(format!(
                "Operator `{}` is not a Pauli string",
                label
            )));
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(QcsnuError::validation("Coefficients must be finite"));
        }
        Ok(Self {
            operators,
            coefficients,
            num_qubits: None,
        })
    }

    /// Creates a single-term Hamiltonian with weight one.
    pub fn from_label(label: impl Into<String>) -> Result<Self, QcsnuError> {
        Self::new(vec![label.into()], vec![1.0])
    }

    /// Attaches the qubit count of the circuit the Hamiltonian is measured on.
    ///
    /// Fails when an operator is shorter than `num_qubits`.
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Result<Self, QcsnuError> {
        if let Some(label) = self.operators.iter().find(|op| op.len() < num_qubits) {
            return Err(QcsnuError::validation(format!(
                "Operator `{}` acts on {} qubits, the circuit has {}",
                label,
                label.len(),
                num_qubits
            )));
        }
        self.num_qubits = Some(num_qubits);
        Ok(self)
    }

    /// Pauli labels.
    pub fn operators(&self) -> &[String] {
        &self.operators
    }

    /// Weights, in the order of [Hamiltonian::operators].
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Qubit count, if attached.
    pub fn num_qubits(&self) -> Option<usize> {
        self.num_qubits
    }

    /// Iterates over `(operator, coefficient)` pairs.
    pub fn terms(&self) -> impl Iterator<Item = (&str, f64)> {
        self.operators
            .iter()
            .map(String::as_str)
            .zip(self.coefficients.iter().copied())
    }
}
