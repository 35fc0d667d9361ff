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

use crate::provider::bridge::Outcome;
use crate::shared::error::{QueryError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, input: &Value) -> Result<Outcome>;
}

/// Handlers keyed by provider, then operation name
#[derive(Default)]
pub struct OperationRegistry {
    providers: BTreeMap<String, BTreeMap<String, Arc<dyn Handler>>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any handler already registered under the same name
    pub fn register(&mut self, provider: &str, operation: &str, handler: Arc<dyn Handler>) {
        self.providers
            .entry(provider.to_string())
            .or_default()
            .insert(operation.to_string(), handler);
    }

    pub fn get(&self, provider: &str, operation: &str) -> Option<Arc<dyn Handler>> {
        self.providers
            .get(provider)
            .and_then(|ops| ops.get(operation))
            .cloned()
    }

    pub async fn call(&self, provider: &str, operation: &str, input: &Value) -> Result<Outcome> {
        let handler =
            self.get(provider, operation)
                .ok_or_else(|| QueryError::UnknownOperation {
                    provider: provider.to_string(),
                    operation: operation.to_string(),
                })?;
        debug!(provider = %provider, operation = %operation, "Calling operation");
        handler.handle(input).await
    }

    /// (provider, operation) pairs in name order
    pub fn operations(&self) -> Vec<(String, String)> {
        self.providers
            .iter()
            .flat_map(|(provider, ops)| {
                ops.keys()
                    .map(move |op| (provider.clone(), op.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait::async_trait]
    impl Handler for Echo {
        async fn handle(&self, input: &Value) -> Result<Outcome> {
            Outcome::outputs(input)
        }
    }

    #[tokio::test]
    async fn test_call_registered_operation() {
        let mut registry = OperationRegistry::new();
        registry.register("test", "echo", Arc::new(Echo));

        let outcome = registry.call("test", "echo", &json!({"a": 1})).await.unwrap();
        assert_eq!(outcome.into_document(), json!({"outputs": {"a": 1}}));
        assert_eq!(
            registry.operations(),
            vec![("test".to_string(), "echo".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let registry = OperationRegistry::new();
        let err = registry.call("test", "missing", &json!({})).await.unwrap_err();
        assert!(matches!(err, QueryError::UnknownOperation { .. }));
    }
}
