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

//! Release bundle (Flux HelmRelease) addressing

use crate::infrastructure::constants::{LABEL_HELM_RELEASE_NAME, LABEL_HELM_RELEASE_NAMESPACE};
use kube::api::{DynamicObject, ListParams};

/// A release and the namespace its managed objects were installed into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRef {
    pub name: String,
    pub namespace: String,
    pub target_namespace: String,
}

impl BundleRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            name: name.into(),
            target_namespace: namespace.clone(),
            namespace,
        }
    }

    /// Honors `spec.targetNamespace` when the release installs elsewhere
    pub fn from_object(obj: &DynamicObject) -> Self {
        let mut bundle = Self::new(
            obj.metadata.name.clone().unwrap_or_default(),
            obj.metadata.namespace.clone().unwrap_or_default(),
        );
        if let Some(target) = obj
            .data
            .pointer("/spec/targetNamespace")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            bundle.target_namespace = target.to_string();
        }
        bundle
    }

    /// Labels the release controller stamps on every object it manages
    pub fn selector(&self) -> String {
        format!(
            "{}={},{}={}",
            LABEL_HELM_RELEASE_NAME, self.name, LABEL_HELM_RELEASE_NAMESPACE, self.namespace
        )
    }

    pub fn list_params(&self) -> ListParams {
        ListParams::default().labels(&self.selector())
    }
}

/// Stable (namespace, name) order, independent of list order
pub fn sort_by_name(objects: &mut [DynamicObject]) {
    objects.sort_by(|a, b| {
        (a.metadata.namespace.as_deref(), a.metadata.name.as_deref())
            .cmp(&(b.metadata.namespace.as_deref(), b.metadata.name.as_deref()))
    });
}
