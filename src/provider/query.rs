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

//! The `query` provider: read-side operations over deployed applications.

use crate::domain::collector::{PodCollector, ResourceCollector};
use crate::domain::endpoint::EndpointCollector;
use crate::domain::model::{LogOptions, QueryOption};
use crate::domain::{EventSearcher, LogStreamer};
use crate::infrastructure::constants::{
    OP_COLLECT_LOGS_IN_POD, OP_COLLECT_PODS, OP_COLLECT_SERVICE_ENDPOINTS,
    OP_LIST_RESOURCES_IN_APP, OP_SEARCH_EVENTS, PROVIDER_NAME,
};
use crate::infrastructure::kubernetes::ObjectStore;
use crate::provider::bridge::{get_string, lookup, Outcome};
use crate::provider::registry::{Handler, OperationRegistry};
use crate::shared::error::Result;
use kube::api::DynamicObject;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

pub const FIELD_APP: &str = "app";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_CLUSTER: &str = "cluster";
pub const FIELD_NAMESPACE: &str = "namespace";
pub const FIELD_POD: &str = "pod";
pub const FIELD_OPTIONS: &str = "options";

/// Registers every `query` operation against `store`
pub fn install(registry: &mut OperationRegistry, store: Arc<dyn ObjectStore>) {
    registry.register(
        PROVIDER_NAME,
        OP_LIST_RESOURCES_IN_APP,
        Arc::new(ListResourcesInApp {
            collector: ResourceCollector::new(store.clone()),
        }),
    );
    registry.register(
        PROVIDER_NAME,
        OP_COLLECT_PODS,
        Arc::new(CollectPods {
            collector: PodCollector::new(store.clone()),
        }),
    );
    registry.register(
        PROVIDER_NAME,
        OP_SEARCH_EVENTS,
        Arc::new(SearchEvents {
            searcher: EventSearcher::new(store.clone()),
        }),
    );
    registry.register(
        PROVIDER_NAME,
        OP_COLLECT_LOGS_IN_POD,
        Arc::new(CollectLogsInPod {
            streamer: LogStreamer::new(store.clone()),
        }),
    );
    registry.register(
        PROVIDER_NAME,
        OP_COLLECT_SERVICE_ENDPOINTS,
        Arc::new(CollectServiceEndpoints {
            collector: EndpointCollector::new(store),
        }),
    );
}

/// `{app: QueryOption}` -> `{list: [Resource]}` or `{err}`
pub struct ListResourcesInApp {
    collector: ResourceCollector,
}

#[async_trait::async_trait]
impl Handler for ListResourcesInApp {
    async fn handle(&self, input: &Value) -> Result<Outcome> {
        let option: QueryOption = lookup(input, FIELD_APP)?;
        match self.collector.collect(&option).await {
            Ok(resources) => Outcome::list(&resources),
            Err(e) => {
                warn!(app = %option.name, error = %e, "Failed to list application resources");
                Ok(Outcome::soft_error(e))
            }
        }
    }
}

/// `{value: object, cluster}` -> `{list: [Pod]}` or `{err}`
pub struct CollectPods {
    collector: PodCollector,
}

#[async_trait::async_trait]
impl Handler for CollectPods {
    async fn handle(&self, input: &Value) -> Result<Outcome> {
        let object: DynamicObject = lookup(input, FIELD_VALUE)?;
        let cluster = get_string(input, FIELD_CLUSTER)?;
        match self.collector.resolve_pods(&object, &cluster).await {
            Ok(pods) => Outcome::list(&pods),
            Err(e) => Ok(Outcome::soft_error(e)),
        }
    }
}

/// `{value: object, cluster}` -> `{list: [Event]}` or `{err}`
pub struct SearchEvents {
    searcher: EventSearcher,
}

#[async_trait::async_trait]
impl Handler for SearchEvents {
    async fn handle(&self, input: &Value) -> Result<Outcome> {
        let object: DynamicObject = lookup(input, FIELD_VALUE)?;
        let cluster = get_string(input, FIELD_CLUSTER)?;
        match self.searcher.search(&cluster, &object).await {
            Ok(events) => Outcome::list(&events),
            Err(e) => Ok(Outcome::soft_error(e)),
        }
    }
}

/// `{cluster, namespace, pod, options}` -> `{outputs: LogResult}`
pub struct CollectLogsInPod {
    streamer: LogStreamer,
}

#[async_trait::async_trait]
impl Handler for CollectLogsInPod {
    async fn handle(&self, input: &Value) -> Result<Outcome> {
        let cluster = get_string(input, FIELD_CLUSTER)?;
        let namespace = get_string(input, FIELD_NAMESPACE)?;
        let pod = get_string(input, FIELD_POD)?;
        let options: LogOptions = lookup(input, FIELD_OPTIONS)?;
        let result = self
            .streamer
            .stream_logs(&cluster, &namespace, &pod, &options)
            .await?;
        Outcome::outputs(&result)
    }
}

/// `{app: QueryOption}` -> `{list: [ServiceEndpoint]}`
pub struct CollectServiceEndpoints {
    collector: EndpointCollector,
}

#[async_trait::async_trait]
impl Handler for CollectServiceEndpoints {
    async fn handle(&self, input: &Value) -> Result<Outcome> {
        let option: QueryOption = lookup(input, FIELD_APP)?;
        let endpoints = self.collector.collect(&option).await?;
        Outcome::list(&endpoints)
    }
}
