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

//! Version-agnostic view of an Ingress.
//!
//! `networking.k8s.io/v1beta1` and `v1` agree on every field endpoint
//! derivation reads (TLS hosts, rule hosts, HTTP paths) but disagree on
//! backends, so both are read through this one shape instead of a typed
//! `v1` Ingress.

use crate::shared::error::{QueryError, Result};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::DynamicObject;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngressView {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: IngressSpecView,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngressSpecView {
    pub tls: Vec<IngressTlsView>,
    pub rules: Vec<IngressRuleView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngressTlsView {
    /// Empty means the entry applies to every host
    pub hosts: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngressRuleView {
    pub host: String,
    pub http: Option<HttpRuleView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpRuleView {
    pub paths: Vec<HttpPathView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpPathView {
    pub path: String,
}

impl IngressView {
    pub fn from_object(obj: &DynamicObject) -> Result<Self> {
        let value = serde_json::to_value(obj)?;
        serde_json::from_value(value)
            .map_err(|e| QueryError::InvalidResource(format!("Failed to decode Ingress: {}", e)))
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
    }
}
