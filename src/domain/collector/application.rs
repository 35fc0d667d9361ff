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

use crate::domain::model::application::application_resource;
use crate::domain::model::QueryOption;
use crate::infrastructure::constants::{
    APPLICATION_KIND, LABEL_APP_COMPONENT, LABEL_APP_REVISION, LOCAL_CLUSTER,
};
use crate::infrastructure::kubernetes::ObjectStore;
use crate::shared::error::{QueryError, Result};
use kube::api::DynamicObject;

const DEFAULT_NAMESPACE: &str = "default";

/// Applications live on the hub cluster; a missing application is fatal.
pub async fn fetch_application(
    store: &dyn ObjectStore,
    option: &QueryOption,
) -> Result<DynamicObject> {
    let namespace = if option.namespace.is_empty() {
        DEFAULT_NAMESPACE
    } else {
        option.namespace.as_str()
    };
    store
        .get(LOCAL_CLUSTER, &application_resource(), namespace, &option.name)
        .await?
        .ok_or_else(|| {
            QueryError::not_found(APPLICATION_KIND, &option.name, namespace, LOCAL_CLUSTER)
        })
}

pub fn object_component(obj: &DynamicObject) -> Option<String> {
    label(obj, LABEL_APP_COMPONENT)
}

pub fn object_revision(obj: &DynamicObject) -> Option<String> {
    label(obj, LABEL_APP_REVISION)
}

fn label(obj: &DynamicObject, key: &str) -> Option<String> {
    obj.metadata
        .labels
        .as_ref()
        .and_then(|labels| labels.get(key))
        .cloned()
}
