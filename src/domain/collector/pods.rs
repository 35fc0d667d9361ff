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

use crate::domain::bundle::{sort_by_name, BundleRef};
use crate::domain::collector::selector::pod_selector;
use crate::domain::kind::ObjectKind;
use crate::infrastructure::kubernetes::{api_resource, ObjectStore};
use crate::shared::error::Result;
use kube::api::{DynamicObject, ListParams};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

const POD_KIND: &str = "Pod";

/// Workload kinds a release bundle is searched for
const BUNDLE_WORKLOADS: &[(&str, &str, &str)] = &[
    ("apps", "v1", "Deployment"),
    ("apps", "v1", "StatefulSet"),
    ("apps", "v1", "DaemonSet"),
];

/// Resolves the pods behind a workload, Service or release bundle
pub struct PodCollector {
    store: Arc<dyn ObjectStore>,
}

impl PodCollector {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn resolve_pods(
        &self,
        object: &DynamicObject,
        cluster: &str,
    ) -> Result<Vec<DynamicObject>> {
        match ObjectKind::of(object) {
            ObjectKind::ReleaseBundle => self.collect_bundle(object, cluster).await,
            ObjectKind::GenericWorkload { kind } if kind == POD_KIND => Ok(vec![object.clone()]),
            ObjectKind::Service
            | ObjectKind::Ingress { .. }
            | ObjectKind::GenericWorkload { .. } => self.collect_generic(object, cluster).await,
            kind @ ObjectKind::Unsupported { .. } => {
                debug!(kind = %kind, "No dedicated pod strategy, using label selector");
                self.collect_generic(object, cluster).await
            }
        }
    }

    /// Pods matching the object's selector in the object's namespace
    pub async fn collect_generic(
        &self,
        object: &DynamicObject,
        cluster: &str,
    ) -> Result<Vec<DynamicObject>> {
        let Some(selector) = pod_selector(object) else {
            debug!(
                name = object.metadata.name.as_deref().unwrap_or_default(),
                "Object has no pod selector"
            );
            return Ok(Vec::new());
        };

        let namespace = object.metadata.namespace.as_deref().unwrap_or("default");
        let params = ListParams::default().labels(&selector);
        let mut pods = self
            .store
            .list(cluster, &api_resource("", "v1", "Pod"), namespace, &params)
            .await?;
        sort_by_name(&mut pods);
        Ok(pods)
    }

    async fn collect_bundle(
        &self,
        release: &DynamicObject,
        cluster: &str,
    ) -> Result<Vec<DynamicObject>> {
        let bundle = BundleRef::from_object(release);
        let params = bundle.list_params();

        let mut seen = HashSet::new();
        let mut pods = Vec::new();
        for (group, version, kind) in BUNDLE_WORKLOADS {
            let resource = api_resource(group, version, kind);
            let mut workloads = match self
                .store
                .list(cluster, &resource, &bundle.target_namespace, &params)
                .await
            {
                Ok(workloads) => workloads,
                Err(e) => {
                    warn!(
                        cluster = %cluster,
                        release = %bundle.name,
                        kind = %kind,
                        error = %e,
                        "Failed to list release workloads, skipping"
                    );
                    continue;
                }
            };
            sort_by_name(&mut workloads);

            for workload in &workloads {
                let found = match self.collect_generic(workload, cluster).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(
                            cluster = %cluster,
                            workload = workload.metadata.name.as_deref().unwrap_or_default(),
                            error = %e,
                            "Failed to list workload pods, skipping"
                        );
                        continue;
                    }
                };
                for pod in found {
                    if seen.insert(pod_key(&pod)) {
                        pods.push(pod);
                    }
                }
            }
        }

        Ok(pods)
    }
}

/// UID when present, otherwise namespace/name
fn pod_key(pod: &DynamicObject) -> String {
    match pod.metadata.uid.as_deref() {
        Some(uid) if !uid.is_empty() => uid.to_string(),
        _ => format!(
            "{}/{}",
            pod.metadata.namespace.as_deref().unwrap_or_default(),
            pod.metadata.name.as_deref().unwrap_or_default()
        ),
    }
}
