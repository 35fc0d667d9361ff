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

use crate::domain::endpoint::object_reference;
use crate::domain::model::{Endpoint, IngressView, Protocol, ServiceEndpoint};
use crate::infrastructure::constants::{
    ANNO_INGRESS_CONTROLLER_HTTPS_PORT, ANNO_INGRESS_CONTROLLER_HTTP_PORT, APP_PROTOCOL_HTTP,
    APP_PROTOCOL_HTTPS, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT, INGRESS_KIND,
};

/// One endpoint per (hosted rule, HTTP path).
///
/// The port is what the ingress controller is annotated to listen on, or the
/// scheme default; the controller's real Service is not consulted.
pub fn from_ingress(ingress: &IngressView) -> Vec<ServiceEndpoint> {
    let reference = object_reference(&ingress.api_version, INGRESS_KIND, &ingress.metadata);
    let https_port =
        annotated_port(ingress, ANNO_INGRESS_CONTROLLER_HTTPS_PORT).unwrap_or(DEFAULT_HTTPS_PORT);
    let http_port =
        annotated_port(ingress, ANNO_INGRESS_CONTROLLER_HTTP_PORT).unwrap_or(DEFAULT_HTTP_PORT);

    let mut endpoints = Vec::new();
    for rule in &ingress.spec.rules {
        if rule.host.is_empty() {
            continue;
        }
        let Some(http) = rule.http.as_ref() else {
            continue;
        };
        let (app_protocol, port) = if is_tls_host(ingress, &rule.host) {
            (APP_PROTOCOL_HTTPS, https_port)
        } else {
            (APP_PROTOCOL_HTTP, http_port)
        };
        for path in &http.paths {
            endpoints.push(ServiceEndpoint {
                endpoint: Endpoint {
                    protocol: Protocol::Tcp,
                    app_protocol: Some(app_protocol.to_string()),
                    host: rule.host.clone(),
                    port,
                    path: path.path.clone(),
                },
                reference: reference.clone(),
            });
        }
    }
    endpoints
}

/// A TLS entry covers the host when it lists it or lists no hosts at all
fn is_tls_host(ingress: &IngressView, host: &str) -> bool {
    ingress
        .spec
        .tls
        .iter()
        .any(|tls| tls.hosts.is_empty() || tls.hosts.iter().any(|h| h == host))
}

fn annotated_port(ingress: &IngressView, key: &str) -> Option<i32> {
    ingress
        .annotation(key)
        .and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|port| *port > 0)
}
