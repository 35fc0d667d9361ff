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

use crate::domain::collector::application::{
    fetch_application, object_component, object_revision,
};
use crate::domain::model::application::applied_resources;
use crate::domain::model::{QueryOption, Resource};
use crate::infrastructure::kubernetes::ObjectStore;
use crate::shared::error::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Enumerates the objects an application applied, across clusters
pub struct ResourceCollector {
    store: Arc<dyn ObjectStore>,
}

impl ResourceCollector {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Resources in the application's recorded order. Resources that fail the
    /// filter are dropped; resources that cannot be fetched are logged and
    /// skipped.
    pub async fn collect(&self, option: &QueryOption) -> Result<Vec<Resource>> {
        let app = fetch_application(self.store.as_ref(), option).await?;
        let applied = applied_resources(&app)?;

        let mut resources = Vec::with_capacity(applied.len());
        for res in applied {
            let recorded_match = option.filter.matches_recorded(&res);
            if recorded_match == Some(false) {
                continue;
            }

            let object = match self
                .store
                .get(&res.cluster, &res.api_resource(), &res.namespace, &res.name)
                .await
            {
                Ok(Some(object)) => object,
                Ok(None) => {
                    warn!(
                        cluster = %res.cluster,
                        kind = %res.kind,
                        namespace = %res.namespace,
                        name = %res.name,
                        "Applied resource no longer exists, skipping"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        cluster = %res.cluster,
                        kind = %res.kind,
                        namespace = %res.namespace,
                        name = %res.name,
                        error = %e,
                        "Failed to fetch applied resource, skipping"
                    );
                    continue;
                }
            };

            let component = res
                .component
                .clone()
                .or_else(|| object_component(&object))
                .unwrap_or_default();
            if recorded_match.is_none() && !option.filter.matches_component(&component) {
                debug!(name = %res.name, component = %component, "Component filtered out");
                continue;
            }
            let revision = res
                .revision
                .clone()
                .or_else(|| object_revision(&object))
                .unwrap_or_default();

            resources.push(Resource {
                cluster: res.cluster,
                component,
                revision,
                object,
            });
        }

        Ok(resources)
    }
}
