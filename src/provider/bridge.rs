// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::shared::error::{QueryError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub const FIELD_LIST: &str = "list";
pub const FIELD_OUTPUTS: &str = "outputs";
pub const FIELD_ERR: &str = "err";

/// Successful result of an operation.
///
/// Collector failures that the caller is expected to branch on come back as
/// `SoftError`; malformed input and infrastructure failures are `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Payload { field: &'static str, value: Value },
    SoftError(String),
}

impl Outcome {
    pub fn list<T: Serialize + ?Sized>(items: &T) -> Result<Self> {
        Ok(Outcome::Payload {
            field: FIELD_LIST,
            value: serde_json::to_value(items)?,
        })
    }

    pub fn outputs<T: Serialize + ?Sized>(outputs: &T) -> Result<Self> {
        Ok(Outcome::Payload {
            field: FIELD_OUTPUTS,
            value: serde_json::to_value(outputs)?,
        })
    }

    pub fn soft_error(err: impl ToString) -> Self {
        Outcome::SoftError(err.to_string())
    }

    pub fn is_soft_error(&self) -> bool {
        matches!(self, Outcome::SoftError(_))
    }

    /// `{"<field>": value}` or `{"err": message}`
    pub fn into_document(self) -> Value {
        let mut doc = Map::new();
        match self {
            Outcome::Payload { field, value } => {
                doc.insert(field.to_string(), value);
            }
            Outcome::SoftError(message) => {
                doc.insert(FIELD_ERR.to_string(), Value::String(message));
            }
        }
        Value::Object(doc)
    }
}

/// Decodes a required field of the input document
pub fn lookup<T: DeserializeOwned>(input: &Value, field: &str) -> Result<T> {
    let value = input
        .get(field)
        .ok_or_else(|| QueryError::invalid_input(format!("missing field '{}'", field)))?;
    serde_json::from_value(value.clone())
        .map_err(|e| QueryError::invalid_input(format!("invalid field '{}': {}", field, e)))
}

pub fn get_string(input: &Value, field: &str) -> Result<String> {
    match input.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(QueryError::invalid_input(format!(
            "field '{}' must be a string, got {}",
            field, other
        ))),
        None => Err(QueryError::invalid_input(format!("missing field '{}'", field))),
    }
}
