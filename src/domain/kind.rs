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

//! Classification of objects by group/version/kind.
//!
//! Pod resolution and endpoint derivation each pick a strategy per variant;
//! kinds outside the known set land in `Unsupported` instead of being guessed at.

use crate::domain::model::split_api_version;
use crate::infrastructure::constants::{
    HELM_RELEASE_GROUP, HELM_RELEASE_KIND, HELM_RELEASE_VERSION, INGRESS_KIND, INGRESS_VERSIONS,
    NETWORKING_GROUP,
};
use kube::api::DynamicObject;
use std::fmt;

const WORKLOAD_KINDS: &[(&str, &str)] = &[
    ("apps", "Deployment"),
    ("apps", "StatefulSet"),
    ("apps", "DaemonSet"),
    ("apps", "ReplicaSet"),
    ("batch", "Job"),
    ("batch", "CronJob"),
    ("", "Pod"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    /// core/v1 Service
    Service,
    /// networking.k8s.io Ingress in a supported version
    Ingress { version: String },
    /// Flux HelmRelease managing its own Services and workloads
    ReleaseBundle,
    /// Pod, or a workload that owns pods (Deployment, Job, ...)
    GenericWorkload { kind: String },
    Unsupported { api_version: String, kind: String },
}

impl ObjectKind {
    pub fn classify(api_version: &str, kind: &str) -> Self {
        let (group, version) = split_api_version(api_version);
        match (group, kind) {
            ("", "Service") if version == "v1" => ObjectKind::Service,
            (NETWORKING_GROUP, INGRESS_KIND) if INGRESS_VERSIONS.contains(&version) => {
                ObjectKind::Ingress {
                    version: version.to_string(),
                }
            }
            (HELM_RELEASE_GROUP, HELM_RELEASE_KIND) if version == HELM_RELEASE_VERSION => {
                ObjectKind::ReleaseBundle
            }
            _ if WORKLOAD_KINDS.contains(&(group, kind)) => ObjectKind::GenericWorkload {
                kind: kind.to_string(),
            },
            _ => ObjectKind::Unsupported {
                api_version: api_version.to_string(),
                kind: kind.to_string(),
            },
        }
    }

    pub fn of(obj: &DynamicObject) -> Self {
        match &obj.types {
            Some(types) => Self::classify(&types.api_version, &types.kind),
            None => ObjectKind::Unsupported {
                api_version: String::new(),
                kind: String::new(),
            },
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Service => f.write_str("v1/Service"),
            ObjectKind::Ingress { version } => {
                write!(f, "{}/{}/{}", NETWORKING_GROUP, version, INGRESS_KIND)
            }
            ObjectKind::ReleaseBundle => write!(
                f,
                "{}/{}/{}",
                HELM_RELEASE_GROUP, HELM_RELEASE_VERSION, HELM_RELEASE_KIND
            ),
            ObjectKind::GenericWorkload { kind } => f.write_str(kind),
            ObjectKind::Unsupported { api_version, kind } => write!(f, "{}/{}", api_version, kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_service() {
        assert_eq!(ObjectKind::classify("v1", "Service"), ObjectKind::Service);
    }

    #[test]
    fn test_classify_ingress_versions() {
        assert_eq!(
            ObjectKind::classify("networking.k8s.io/v1", "Ingress"),
            ObjectKind::Ingress {
                version: "v1".to_string()
            }
        );
        assert_eq!(
            ObjectKind::classify("networking.k8s.io/v1beta1", "Ingress"),
            ObjectKind::Ingress {
                version: "v1beta1".to_string()
            }
        );
        assert!(matches!(
            ObjectKind::classify("extensions/v1beta1", "Ingress"),
            ObjectKind::Unsupported { .. }
        ));
        assert!(matches!(
            ObjectKind::classify("networking.k8s.io/v2alpha1", "Ingress"),
            ObjectKind::Unsupported { .. }
        ));
    }

    #[test]
    fn test_classify_release_bundle() {
        assert_eq!(
            ObjectKind::classify("helm.toolkit.fluxcd.io/v2beta1", "HelmRelease"),
            ObjectKind::ReleaseBundle
        );
        assert!(matches!(
            ObjectKind::classify("helm.toolkit.fluxcd.io/v2", "HelmRelease"),
            ObjectKind::Unsupported { .. }
        ));
    }

    #[test]
    fn test_classify_workloads() {
        assert_eq!(
            ObjectKind::classify("apps/v1", "Deployment"),
            ObjectKind::GenericWorkload {
                kind: "Deployment".to_string()
            }
        );
        assert_eq!(
            ObjectKind::classify("batch/v1", "CronJob"),
            ObjectKind::GenericWorkload {
                kind: "CronJob".to_string()
            }
        );
        assert!(matches!(
            ObjectKind::classify("example.com/v1", "Widget"),
            ObjectKind::Unsupported { .. }
        ));
    }
}
