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

use crate::infrastructure::kubernetes::{api_resource, decode, ObjectStore};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::Event;
use kube::api::{DynamicObject, ListParams};
use std::sync::Arc;

pub struct EventSearcher {
    store: Arc<dyn ObjectStore>,
}

impl EventSearcher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Events whose involved object is `object`, from the object's namespace
    pub async fn search(&self, cluster: &str, object: &DynamicObject) -> Result<Vec<Event>> {
        let namespace = object.metadata.namespace.as_deref().unwrap_or_default();
        let mut params = ListParams::default();
        if let Some(selector) = event_field_selector(object) {
            params = params.fields(&selector);
        }

        self.store
            .list(cluster, &api_resource("", "v1", "Event"), namespace, &params)
            .await?
            .into_iter()
            .map(decode::<Event>)
            .collect()
    }
}

/// `involvedObject.*` field selector built from whatever identity the object
/// carries
pub fn event_field_selector(object: &DynamicObject) -> Option<String> {
    let kind = object.types.as_ref().map(|t| t.kind.as_str());
    let meta = &object.metadata;
    let terms: Vec<String> = [
        ("involvedObject.kind", kind),
        ("involvedObject.name", meta.name.as_deref()),
        ("involvedObject.namespace", meta.namespace.as_deref()),
        ("involvedObject.uid", meta.uid.as_deref()),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        value
            .filter(|v| !v.is_empty())
            .map(|v| format!("{}={}", field, v))
    })
    .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(","))
    }
}
