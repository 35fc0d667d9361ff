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
use crate::domain::model::{Endpoint, Protocol, ServiceEndpoint};
use crate::infrastructure::constants::{SERVICE_TYPE_LOAD_BALANCER, SERVICE_TYPE_NODE_PORT};
use k8s_openapi::api::core::v1::{LoadBalancerIngress, Service, ServicePort};

/// Externally reachable endpoints of a Service.
///
/// LoadBalancer services yield one endpoint per (port, load-balancer entry),
/// NodePort services one per assigned node port. Other types yield none.
pub fn from_service(service: &Service) -> Vec<ServiceEndpoint> {
    let Some(spec) = service.spec.as_ref() else {
        return Vec::new();
    };
    let ports: &[ServicePort] = spec.ports.as_deref().unwrap_or_default();
    let reference = object_reference("v1", "Service", &service.metadata);

    match spec.type_.as_deref() {
        Some(SERVICE_TYPE_LOAD_BALANCER) => {
            let entries: &[LoadBalancerIngress] = service
                .status
                .as_ref()
                .and_then(|status| status.load_balancer.as_ref())
                .and_then(|lb| lb.ingress.as_deref())
                .unwrap_or_default();
            let mut endpoints = Vec::with_capacity(ports.len() * entries.len());
            for port in ports {
                for entry in entries {
                    let Some(host) = load_balancer_host(entry) else {
                        continue;
                    };
                    endpoints.push(ServiceEndpoint {
                        endpoint: Endpoint {
                            protocol: Protocol::from_port_protocol(port.protocol.as_deref()),
                            app_protocol: None,
                            host,
                            port: port.port,
                            path: String::new(),
                        },
                        reference: reference.clone(),
                    });
                }
            }
            endpoints
        }
        Some(SERVICE_TYPE_NODE_PORT) => ports
            .iter()
            .filter_map(|port| {
                let node_port = port.node_port.filter(|p| *p > 0)?;
                Some(ServiceEndpoint {
                    endpoint: Endpoint {
                        protocol: Protocol::from_port_protocol(port.protocol.as_deref()),
                        app_protocol: None,
                        host: String::new(),
                        port: node_port,
                        path: String::new(),
                    },
                    reference: reference.clone(),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Hostname wins over IP
fn load_balancer_host(entry: &LoadBalancerIngress) -> Option<String> {
    entry
        .hostname
        .as_ref()
        .filter(|h| !h.is_empty())
        .or_else(|| entry.ip.as_ref().filter(|ip| !ip.is_empty()))
        .cloned()
}
