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

//! Endpoint derivation.
//!
//! Services and Ingresses are turned into `ServiceEndpoint`s by pure
//! functions; `EndpointCollector` adds the store lookups needed for release
//! bundles and whole applications.

pub mod collector;
pub mod ingress;
pub mod service;

pub use self::collector::EndpointCollector;
pub use self::ingress::from_ingress;
pub use self::service::from_service;

use crate::domain::kind::ObjectKind;
use crate::domain::model::{IngressView, ServiceEndpoint};
use crate::infrastructure::kubernetes::decode;
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{ObjectReference, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::DynamicObject;
use tracing::warn;

/// Endpoints of a fetched Service or Ingress; any other kind yields none
pub fn endpoints_for_object(obj: &DynamicObject) -> Result<Vec<ServiceEndpoint>> {
    match ObjectKind::of(obj) {
        ObjectKind::Service => {
            let service: Service = decode(obj.clone())?;
            Ok(from_service(&service))
        }
        ObjectKind::Ingress { .. } => Ok(from_ingress(&IngressView::from_object(obj)?)),
        kind => {
            warn!(
                kind = %kind,
                name = obj.metadata.name.as_deref().unwrap_or_default(),
                "Endpoints are not derived for this kind"
            );
            Ok(Vec::new())
        }
    }
}

pub(crate) fn object_reference(api_version: &str, kind: &str, meta: &ObjectMeta) -> ObjectReference {
    ObjectReference {
        api_version: Some(api_version.to_string()),
        kind: Some(kind.to_string()),
        namespace: meta.namespace.clone(),
        name: meta.name.clone(),
        uid: meta.uid.clone(),
        resource_version: meta.resource_version.clone(),
        ..Default::default()
    }
}
