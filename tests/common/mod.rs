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

//! In-memory object store and fixture builders shared by the integration tests

#![allow(dead_code)]

use deploy_lens::infrastructure::kubernetes::{LogContent, ObjectStore};
use deploy_lens::{QueryError, Result};
use kube::api::{ApiResource, DynamicObject, ListParams, LogParams};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// One store call, as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub cluster: String,
    pub kind: String,
    pub namespace: String,
}

#[derive(Default)]
pub struct FakeStore {
    objects: Mutex<Vec<(String, DynamicObject)>>,
    failing: Mutex<HashSet<(String, String)>>,
    failing_versions: Mutex<HashSet<(String, String, String)>>,
    logs: Mutex<HashMap<(String, String), std::result::Result<LogContent, String>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, cluster: &str, object: Value) -> &Self {
        self.objects
            .lock()
            .unwrap()
            .push((cluster.to_string(), obj(object)));
        self
    }

    /// Every get/list of `kind` on `cluster` fails
    pub fn fail_kind(&self, cluster: &str, kind: &str) {
        self.failing
            .lock()
            .unwrap()
            .insert((cluster.to_string(), kind.to_string()));
    }

    /// Every get/list of `kind` in `api_version` on `cluster` fails
    pub fn fail_version(&self, cluster: &str, api_version: &str, kind: &str) {
        self.failing_versions.lock().unwrap().insert((
            cluster.to_string(),
            api_version.to_string(),
            kind.to_string(),
        ));
    }

    pub fn set_logs(&self, cluster: &str, pod: &str, text: &str, read_error: Option<&str>) {
        self.logs.lock().unwrap().insert(
            (cluster.to_string(), pod.to_string()),
            Ok(LogContent {
                text: text.to_string(),
                read_error: read_error.map(str::to_string),
            }),
        );
    }

    pub fn fail_logs(&self, cluster: &str, pod: &str, message: &str) {
        self.logs
            .lock()
            .unwrap()
            .insert((cluster.to_string(), pod.to_string()), Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        op: &'static str,
        cluster: &str,
        api_version: &str,
        kind: &str,
        namespace: &str,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call {
            op,
            cluster: cluster.to_string(),
            kind: kind.to_string(),
            namespace: namespace.to_string(),
        });
        if self
            .failing
            .lock()
            .unwrap()
            .contains(&(cluster.to_string(), kind.to_string()))
            || self.failing_versions.lock().unwrap().contains(&(
                cluster.to_string(),
                api_version.to_string(),
                kind.to_string(),
            ))
        {
            return Err(QueryError::KubeError(format!(
                "injected failure for {} on cluster '{}'",
                kind, cluster
            )));
        }
        Ok(())
    }

    fn matching(&self, cluster: &str, resource: &ApiResource) -> Vec<DynamicObject> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, o)| {
                c == cluster
                    && o.types.as_ref().map_or(false, |t| {
                        t.api_version == resource.api_version && t.kind == resource.kind
                    })
            })
            .map(|(_, o)| o.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl ObjectStore for FakeStore {
    async fn get(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>> {
        self.record("get", cluster, &resource.api_version, &resource.kind, namespace)?;
        Ok(self.matching(cluster, resource).into_iter().find(|o| {
            o.metadata.namespace.as_deref().unwrap_or_default() == namespace
                && o.metadata.name.as_deref() == Some(name)
        }))
    }

    async fn list(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
        params: &ListParams,
    ) -> Result<Vec<DynamicObject>> {
        self.record("list", cluster, &resource.api_version, &resource.kind, namespace)?;
        Ok(self
            .matching(cluster, resource)
            .into_iter()
            .filter(|o| {
                namespace.is_empty() || o.metadata.namespace.as_deref() == Some(namespace)
            })
            .filter(|o| matches_labels(o, params.label_selector.as_deref()))
            .filter(|o| matches_fields(o, params.field_selector.as_deref()))
            .collect())
    }

    async fn read_logs(
        &self,
        cluster: &str,
        namespace: &str,
        pod: &str,
        _params: &LogParams,
    ) -> Result<LogContent> {
        self.record("logs", cluster, "v1", "Pod", namespace)?;
        match self
            .logs
            .lock()
            .unwrap()
            .get(&(cluster.to_string(), pod.to_string()))
        {
            Some(Ok(content)) => Ok(content.clone()),
            Some(Err(message)) => Err(QueryError::KubeError(message.clone())),
            None => Ok(LogContent::default()),
        }
    }
}

/// Equality terms only (`k=v,k2=v2`)
fn matches_labels(o: &DynamicObject, selector: Option<&str>) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    let labels = o.metadata.labels.clone().unwrap_or_default();
    selector.split(',').all(|term| match term.split_once('=') {
        Some((k, v)) => labels.get(k).map(String::as_str) == Some(v),
        None => false,
    })
}

/// Dotted paths into the serialized object (`involvedObject.name=web`)
fn matches_fields(o: &DynamicObject, selector: Option<&str>) -> bool {
    let Some(selector) = selector else {
        return true;
    };
    let value = serde_json::to_value(o).unwrap();
    selector.split(',').all(|term| match term.split_once('=') {
        Some((path, expected)) => {
            let pointer = format!("/{}", path.replace('.', "/"));
            value.pointer(&pointer).and_then(Value::as_str) == Some(expected)
        }
        None => false,
    })
}

pub fn obj(value: Value) -> DynamicObject {
    serde_json::from_value(value).unwrap()
}

// ============================================================================
// Fixtures
// ============================================================================

/// Application on the hub with the given `status.appliedResources`
pub fn application(name: &str, namespace: &str, applied: Vec<Value>) -> Value {
    json!({
        "apiVersion": "core.oam.dev/v1beta1",
        "kind": "Application",
        "metadata": {"name": name, "namespace": namespace},
        "spec": {"components": []},
        "status": {"appliedResources": applied}
    })
}

pub fn applied(cluster: &str, api_version: &str, kind: &str, namespace: &str, name: &str) -> Value {
    json!({
        "cluster": cluster,
        "apiVersion": api_version,
        "kind": kind,
        "namespace": namespace,
        "name": name
    })
}

pub fn deployment(name: &str, namespace: &str, labels: Value, match_labels: Value) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": {"name": name, "namespace": namespace, "labels": labels},
        "spec": {
            "selector": {"matchLabels": match_labels},
            "template": {"metadata": {"labels": match_labels}}
        }
    })
}

pub fn pod(name: &str, namespace: &str, uid: &str, labels: Value) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": uid,
            "labels": labels,
            "creationTimestamp": "2024-05-01T10:00:00Z"
        },
        "spec": {"containers": [{"name": "app", "image": "nginx"}]},
        "status": {"phase": "Running"}
    })
}

pub fn load_balancer_service(name: &str, namespace: &str, labels: Value) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": name, "namespace": namespace, "uid": format!("uid-{}", name), "labels": labels},
        "spec": {
            "type": "LoadBalancer",
            "selector": {"app": name},
            "ports": [{"port": 80}, {"port": 443}]
        },
        "status": {"loadBalancer": {"ingress": [
            {"ip": "203.0.113.10"},
            {"hostname": "lb.example.com"}
        ]}}
    })
}

pub fn ingress(api_version: &str, name: &str, namespace: &str, host: &str, labels: Value) -> Value {
    json!({
        "apiVersion": api_version,
        "kind": "Ingress",
        "metadata": {"name": name, "namespace": namespace, "labels": labels},
        "spec": {
            "rules": [{"host": host, "http": {"paths": [{"path": "/"}]}}]
        }
    })
}

pub fn release_labels(release: &str, namespace: &str) -> Value {
    json!({
        "helm.toolkit.fluxcd.io/name": release,
        "helm.toolkit.fluxcd.io/namespace": namespace
    })
}
