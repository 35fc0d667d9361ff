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

use crate::domain::kind::ObjectKind;
use crate::infrastructure::constants::{
    APPLICATION_GROUP, APPLICATION_KIND, APPLICATION_VERSION,
};
use crate::infrastructure::kubernetes::api_resource;
use crate::shared::error::{QueryError, Result};
use kube::api::{ApiResource, DynamicObject};
use serde::{Deserialize, Serialize};

/// One entry of an application's `status.appliedResources`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppliedResource {
    pub cluster: String,
    pub creator: String,
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub uid: String,
    pub resource_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl AppliedResource {
    pub fn object_kind(&self) -> ObjectKind {
        ObjectKind::classify(&self.api_version, &self.kind)
    }

    pub fn api_resource(&self) -> ApiResource {
        let (group, version) = split_api_version(&self.api_version);
        api_resource(group, version, &self.kind)
    }
}

pub fn application_resource() -> ApiResource {
    api_resource(APPLICATION_GROUP, APPLICATION_VERSION, APPLICATION_KIND)
}

/// Applied resources recorded on an application object, in recorded order
pub fn applied_resources(app: &DynamicObject) -> Result<Vec<AppliedResource>> {
    match app.data.pointer("/status/appliedResources") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(list) => serde_json::from_value(list.clone()).map_err(|e| {
            QueryError::InvalidResource(format!(
                "Application '{}' has malformed status.appliedResources: {}",
                app.metadata.name.as_deref().unwrap_or_default(),
                e
            ))
        }),
    }
}

/// `apps/v1` -> (`apps`, `v1`), `v1` -> (``, `v1`)
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}
