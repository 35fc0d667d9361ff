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

use crate::domain::model::application::AppliedResource;
use kube::api::DynamicObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A concrete object owned by a component revision, qualified by cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub cluster: String,
    pub component: String,
    pub revision: String,
    pub object: DynamicObject,
}

/// Application lookup plus the filter applied to its resources
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryOption {
    pub name: String,
    pub namespace: String,
    pub filter: FilterOption,
}

/// Empty fields match everything; set fields must all match
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterOption {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cluster: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cluster_namespace: String,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub components: BTreeSet<String>,
}

impl FilterOption {
    /// Cluster and namespace constraints
    pub fn matches_location(&self, resource: &AppliedResource) -> bool {
        (self.cluster.is_empty() || self.cluster == resource.cluster)
            && (self.cluster_namespace.is_empty() || self.cluster_namespace == resource.namespace)
    }

    pub fn matches_component(&self, component: &str) -> bool {
        self.components.is_empty() || self.components.contains(component)
    }

    /// Whether the component constraint can be decided from the recorded entry
    /// alone; when it can't, it is decided from the fetched object's labels.
    pub fn matches_recorded(&self, resource: &AppliedResource) -> Option<bool> {
        if !self.matches_location(resource) {
            return Some(false);
        }
        if self.components.is_empty() {
            return Some(true);
        }
        resource
            .component
            .as_deref()
            .map(|component| self.matches_component(component))
    }
}
