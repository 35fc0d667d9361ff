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
use crate::domain::collector::application::{fetch_application, object_component};
use crate::domain::endpoint::endpoints_for_object;
use crate::domain::kind::ObjectKind;
use crate::domain::model::application::{applied_resources, AppliedResource};
use crate::domain::model::{QueryOption, ServiceEndpoint};
use crate::infrastructure::constants::{INGRESS_KIND, NETWORKING_GROUP};
use crate::infrastructure::kubernetes::{api_resource, ObjectStore};
use crate::shared::error::Result;
use kube::api::DynamicObject;
use std::sync::Arc;
use tracing::{debug, warn};

/// Kinds listed for a release bundle, in output order. Versions are tried
/// in turn until one can be listed.
const BUNDLE_ENDPOINT_KINDS: &[(&str, &[&str], &str)] = &[
    ("", &["v1"], "Service"),
    (NETWORKING_GROUP, &["v1", "v1beta1"], INGRESS_KIND),
];

pub struct EndpointCollector {
    store: Arc<dyn ObjectStore>,
}

impl EndpointCollector {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Endpoints of every Service, Ingress and release bundle the application
    /// applied. Objects that cannot be fetched are logged and skipped.
    pub async fn collect(&self, option: &QueryOption) -> Result<Vec<ServiceEndpoint>> {
        let app = fetch_application(self.store.as_ref(), option).await?;

        let mut endpoints = Vec::new();
        for res in applied_resources(&app)? {
            let recorded_match = option.filter.matches_recorded(&res);
            if recorded_match == Some(false) {
                continue;
            }

            match res.object_kind() {
                ObjectKind::Service | ObjectKind::Ingress { .. } => {
                    let Some(object) = self.fetch(&res).await else {
                        continue;
                    };
                    if recorded_match.is_none() && !self.component_matches(option, &object) {
                        continue;
                    }
                    match endpoints_for_object(&object) {
                        Ok(found) => endpoints.extend(found),
                        Err(e) => warn!(
                            cluster = %res.cluster,
                            name = %res.name,
                            error = %e,
                            "Failed to derive endpoints, skipping"
                        ),
                    }
                }
                ObjectKind::ReleaseBundle => {
                    let release = self.fetch(&res).await;
                    if let Some(release) = &release {
                        if recorded_match.is_none() && !self.component_matches(option, release) {
                            continue;
                        }
                    }
                    let bundle = match &release {
                        Some(release) => BundleRef::from_object(release),
                        None => BundleRef::new(res.name.clone(), res.namespace.clone()),
                    };
                    endpoints.extend(self.from_bundle(&bundle, &res.cluster).await);
                }
                kind @ ObjectKind::Unsupported { .. } if res.kind == INGRESS_KIND => {
                    warn!(kind = %kind, name = %res.name, "Unsupported Ingress version, skipping");
                }
                _ => {}
            }
        }

        Ok(endpoints)
    }

    /// Endpoints of the Services and Ingresses a release manages, ordered
    /// by kind then (namespace, name)
    pub async fn from_bundle(&self, bundle: &BundleRef, cluster: &str) -> Vec<ServiceEndpoint> {
        let mut endpoints = Vec::new();

        for (group, versions, kind) in BUNDLE_ENDPOINT_KINDS {
            let Some(mut objects) = self
                .list_any_version(bundle, cluster, group, versions, kind)
                .await
            else {
                continue;
            };
            sort_by_name(&mut objects);

            for object in &objects {
                match endpoints_for_object(object) {
                    Ok(found) => endpoints.extend(found),
                    Err(e) => warn!(
                        cluster = %cluster,
                        name = object.metadata.name.as_deref().unwrap_or_default(),
                        error = %e,
                        "Failed to derive endpoints, skipping"
                    ),
                }
            }
        }

        endpoints
    }

    async fn list_any_version(
        &self,
        bundle: &BundleRef,
        cluster: &str,
        group: &str,
        versions: &[&str],
        kind: &str,
    ) -> Option<Vec<DynamicObject>> {
        let params = bundle.list_params();
        let mut last_error = None;
        for version in versions {
            let resource = api_resource(group, version, kind);
            match self
                .store
                .list(cluster, &resource, &bundle.target_namespace, &params)
                .await
            {
                Ok(objects) => return Some(objects),
                Err(e) => {
                    debug!(
                        cluster = %cluster,
                        api_version = %resource.api_version,
                        kind = %kind,
                        error = %e,
                        "Listing failed, trying next version"
                    );
                    last_error = Some(e);
                }
            }
        }
        if let Some(e) = last_error {
            warn!(
                cluster = %cluster,
                release = %bundle.name,
                kind = %kind,
                error = %e,
                "Failed to list release objects, skipping"
            );
        }
        None
    }

    async fn fetch(&self, res: &AppliedResource) -> Option<DynamicObject> {
        match self
            .store
            .get(&res.cluster, &res.api_resource(), &res.namespace, &res.name)
            .await
        {
            Ok(Some(object)) => Some(object),
            Ok(None) => {
                debug!(cluster = %res.cluster, kind = %res.kind, name = %res.name, "Not found");
                None
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
                None
            }
        }
    }

    fn component_matches(&self, option: &QueryOption, object: &DynamicObject) -> bool {
        option
            .filter
            .matches_component(&object_component(object).unwrap_or_default())
    }
}
