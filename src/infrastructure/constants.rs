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

/// Cluster identifier of the hub (local) cluster
pub const LOCAL_CLUSTER: &str = "";

/// Default bound for a single object store call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Cluster gateway proxy path used to reach member clusters through the hub
pub const CLUSTER_GATEWAY_PATH_PREFIX: &str = "/apis/cluster.core.oam.dev/v1alpha1/clustergateways";
pub const CLUSTER_GATEWAY_PATH_SUFFIX: &str = "proxy";

/// Application custom resource
pub const APPLICATION_GROUP: &str = "core.oam.dev";
pub const APPLICATION_VERSION: &str = "v1beta1";
pub const APPLICATION_KIND: &str = "Application";

/// Release bundle (Flux HelmRelease)
pub const HELM_RELEASE_GROUP: &str = "helm.toolkit.fluxcd.io";
pub const HELM_RELEASE_VERSION: &str = "v2beta1";
pub const HELM_RELEASE_KIND: &str = "HelmRelease";

/// Labels set by the release controller on every managed object
pub const LABEL_HELM_RELEASE_NAME: &str = "helm.toolkit.fluxcd.io/name";
pub const LABEL_HELM_RELEASE_NAMESPACE: &str = "helm.toolkit.fluxcd.io/namespace";

/// Labels set by the application controller on every applied object
pub const LABEL_APP_COMPONENT: &str = "app.oam.dev/component";
pub const LABEL_APP_REVISION: &str = "app.oam.dev/appRevision";

/// Ingress API
pub const NETWORKING_GROUP: &str = "networking.k8s.io";
pub const INGRESS_KIND: &str = "Ingress";
pub const INGRESS_VERSIONS: &[&str] = &["v1beta1", "v1"];

/// Ingress controller listen port overrides
pub const ANNO_INGRESS_CONTROLLER_HTTPS_PORT: &str = "ingress.controller/https-port";
pub const ANNO_INGRESS_CONTROLLER_HTTP_PORT: &str = "ingress.controller/http-port";
pub const DEFAULT_HTTPS_PORT: i32 = 443;
pub const DEFAULT_HTTP_PORT: i32 = 80;

/// Application protocols
pub const APP_PROTOCOL_HTTP: &str = "http";
pub const APP_PROTOCOL_HTTPS: &str = "https";

/// Service types
pub const SERVICE_TYPE_LOAD_BALANCER: &str = "LoadBalancer";
pub const SERVICE_TYPE_NODE_PORT: &str = "NodePort";

/// Log stream condition reported when the previous container instance is gone
pub const TERMINATED_CONTAINER_NOT_FOUND_PATTERN: &str =
    "previous terminated container .+ in pod .+ not found";

/// Provider and operation names exposed to the workflow engine
pub const PROVIDER_NAME: &str = "query";
pub const OP_LIST_RESOURCES_IN_APP: &str = "listResourcesInApp";
pub const OP_COLLECT_PODS: &str = "collectPods";
pub const OP_SEARCH_EVENTS: &str = "searchEvents";
pub const OP_COLLECT_LOGS_IN_POD: &str = "collectLogsInPod";
pub const OP_COLLECT_SERVICE_ENDPOINTS: &str = "collectServiceEndpoints";

/// Config file environment variable
pub const CONF_FILE_ENV: &str = "DEPLOY_LENS_CONF_FILE";
