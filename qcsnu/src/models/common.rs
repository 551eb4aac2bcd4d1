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


use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a job or experiment.
///
/// The service hands out both integer and string ids; the original JSON form is preserved when
/// the record is encoded again.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer id
    Number(u64),
    /// String id
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId::Number(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

impl From<&RecordId> for RecordId {
    fn from(id: &RecordId) -> Self {
        id.clone()
    }
}

/// Creation or update time of a record.
///
/// Offset-qualified ISO 8601 strings decode to [Timestamp::Zoned], timestamps without offset to
/// [Timestamp::Naive].
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Timestamp with UTC offset
    Zoned(DateTime<FixedOffset>),
    /// Timestamp without offset
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// Returns the wall-clock time, dropping the offset if there is one.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Timestamp::Zoned(t) => t.naive_local(),
            Timestamp::Naive(t) => *t,
        }
    }
}
