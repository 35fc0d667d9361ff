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

use crate::domain::config::KubeConf;
use crate::infrastructure::kubernetes::cluster::ClusterRouter;
use crate::shared::error::{QueryError, Result};
use futures::io::{AsyncBufRead, AsyncBufReadExt};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams, LogParams};
use kube::Api;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Pod log text read to end of stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContent {
    pub text: String,
    /// Read failure after the stream was opened; `text` holds what was read before it
    pub read_error: Option<String>,
}

/// Read-only object store. Every call names the cluster it is routed to;
/// the empty cluster is the hub.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when the object does not exist.
    async fn get(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>>;

    /// An empty namespace lists across all namespaces.
    async fn list(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
        params: &ListParams,
    ) -> Result<Vec<DynamicObject>>;

    /// Errors only when the stream cannot be opened; read failures are
    /// reported on the returned content.
    async fn read_logs(
        &self,
        cluster: &str,
        namespace: &str,
        pod: &str,
        params: &LogParams,
    ) -> Result<LogContent>;
}

pub struct KubeObjectStore {
    router: ClusterRouter,
    timeout: Duration,
}

impl KubeObjectStore {
    pub fn new(router: ClusterRouter, timeout: Duration) -> Self {
        Self { router, timeout }
    }

    pub async fn from_conf(conf: &KubeConf) -> Result<Self> {
        let router = ClusterRouter::from_conf(conf).await?;
        Ok(Self::new(router, conf.timeout()))
    }

    fn dynamic_api(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
    ) -> Result<Api<DynamicObject>> {
        let client = self.router.client_for(cluster)?;
        Ok(if namespace.is_empty() {
            Api::all_with(client, resource)
        } else {
            Api::namespaced_with(client, namespace, resource)
        })
    }

    async fn bounded<T, F>(&self, what: String, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, kube::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(QueryError::from),
            Err(_) => Err(QueryError::Timeout(format!(
                "{} did not complete within {} seconds",
                what,
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for KubeObjectStore {
    async fn get(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>> {
        let api = self.dynamic_api(cluster, resource, namespace)?;
        debug!(cluster = %cluster, kind = %resource.kind, namespace = %namespace, name = %name, "get");
        self.bounded(
            format!("get {} {}/{} in cluster '{}'", resource.kind, namespace, name, cluster),
            api.get_opt(name),
        )
        .await
    }

    async fn list(
        &self,
        cluster: &str,
        resource: &ApiResource,
        namespace: &str,
        params: &ListParams,
    ) -> Result<Vec<DynamicObject>> {
        let api = self.dynamic_api(cluster, resource, namespace)?;
        debug!(
            cluster = %cluster,
            kind = %resource.kind,
            namespace = %namespace,
            labels = ?params.label_selector,
            fields = ?params.field_selector,
            "list"
        );
        let list = self
            .bounded(
                format!("list {} in {} on cluster '{}'", resource.kind, namespace, cluster),
                api.list(params),
            )
            .await?;
        Ok(list.items)
    }

    async fn read_logs(
        &self,
        cluster: &str,
        namespace: &str,
        pod: &str,
        params: &LogParams,
    ) -> Result<LogContent> {
        let client = self.router.client_for(cluster)?;
        let api: Api<Pod> = Api::namespaced(client, namespace);
        let stream = self
            .bounded(
                format!("open log stream of pod {}/{} in cluster '{}'", namespace, pod, cluster),
                api.log_stream(pod, params),
            )
            .await?;
        Ok(read_log_stream(Box::pin(stream), self.timeout).await)
    }
}

/// Drain a log stream line by line within `limit`. Bytes are kept as read;
/// invalid UTF-8 is replaced rather than failing the whole read. A stream
/// still open at the deadline keeps what was read and reports the timeout.
pub async fn read_log_stream<R>(mut reader: R, limit: Duration) -> LogContent
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read_error = match tokio::time::timeout(limit, drain(&mut reader, &mut buf)).await {
        Ok(read_error) => read_error,
        Err(_) => Some(format!(
            "log read did not complete within {} seconds",
            limit.as_secs()
        )),
    };
    LogContent {
        text: String::from_utf8_lossy(&buf).into_owned(),
        read_error,
    }
}

async fn drain<R>(reader: &mut R, buf: &mut Vec<u8>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match reader.read_until(b'\n', buf).await {
            Ok(0) => return None,
            Ok(_) => continue,
            Err(e) => return Some(e.to_string()),
        }
    }
}

/// ApiResource for a group/version/kind, with the conventional plural
pub fn api_resource(group: &str, version: &str, kind: &str) -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, kind))
}

/// Convert a dynamic object into its typed representation
pub fn decode<K>(obj: DynamicObject) -> Result<K>
where
    K: k8s_openapi::Resource + DeserializeOwned,
{
    let mut value = serde_json::to_value(obj)?;
    if let Some(map) = value.as_object_mut() {
        map.entry("apiVersion")
            .or_insert_with(|| K::API_VERSION.into());
        map.entry("kind").or_insert_with(|| K::KIND.into());
    }
    serde_json::from_value(value).map_err(|e| {
        QueryError::InvalidResource(format!("Failed to decode {}: {}", K::KIND, e))
    })
}
