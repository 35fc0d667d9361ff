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

use crate::infrastructure::constants::{
    APP_PROTOCOL_HTTP, APP_PROTOCOL_HTTPS, DEFAULT_HTTPS_PORT, DEFAULT_HTTP_PORT,
};
use k8s_openapi::api::core::v1::ObjectReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport protocol of an endpoint
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
    #[serde(rename = "SCTP")]
    Sctp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Sctp => "SCTP",
        }
    }

    /// Service port protocol; unset or unknown values mean TCP
    pub fn from_port_protocol(protocol: Option<&str>) -> Self {
        match protocol {
            Some("UDP") => Protocol::Udp,
            Some("SCTP") => Protocol::Sctp,
            _ => Protocol::Tcp,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network endpoint derived from a Service or Ingress
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_protocol: Option<String>,
    /// IP or DNS name; empty for node-port endpoints
    pub host: String,
    pub port: i32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// An endpoint plus a reference back to the object it was derived from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceEndpoint {
    pub endpoint: Endpoint,
    #[serde(rename = "ref")]
    pub reference: ObjectReference,
}

impl fmt::Display for ServiceEndpoint {
    /// Endpoint URL, omitting default ports and a bare `/` path
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let protocol = match &self.endpoint.app_protocol {
            Some(app_protocol) => app_protocol.clone(),
            None => self.endpoint.protocol.as_str().to_lowercase(),
        };
        let path = if self.endpoint.path == "/" {
            ""
        } else {
            self.endpoint.path.as_str()
        };
        let default_port = (protocol == APP_PROTOCOL_HTTPS && self.endpoint.port == DEFAULT_HTTPS_PORT)
            || (protocol == APP_PROTOCOL_HTTP && self.endpoint.port == DEFAULT_HTTP_PORT);
        if default_port {
            write!(f, "{}://{}{}", protocol, self.endpoint.host, path)
        } else {
            write!(
                f,
                "{}://{}:{}{}",
                protocol, self.endpoint.host, self.endpoint.port, path
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(app_protocol: Option<&str>, host: &str, port: i32, path: &str) -> ServiceEndpoint {
        ServiceEndpoint {
            endpoint: Endpoint {
                protocol: Protocol::Tcp,
                app_protocol: app_protocol.map(str::to_string),
                host: host.to_string(),
                port,
                path: path.to_string(),
            },
            reference: ObjectReference::default(),
        }
    }

    #[test]
    fn test_url_omits_default_ports() {
        assert_eq!(
            endpoint(Some("https"), "a.example.com", 443, "/").to_string(),
            "https://a.example.com"
        );
        assert_eq!(
            endpoint(Some("http"), "a.example.com", 80, "/api").to_string(),
            "http://a.example.com/api"
        );
    }

    #[test]
    fn test_url_keeps_custom_ports() {
        assert_eq!(
            endpoint(Some("https"), "a.example.com", 8443, "/").to_string(),
            "https://a.example.com:8443"
        );
        assert_eq!(
            endpoint(None, "10.0.0.7", 8080, "").to_string(),
            "tcp://10.0.0.7:8080"
        );
    }

    #[test]
    fn test_protocol_defaults_to_tcp() {
        assert_eq!(Protocol::from_port_protocol(None), Protocol::Tcp);
        assert_eq!(Protocol::from_port_protocol(Some("UDP")), Protocol::Udp);
        assert_eq!(Protocol::from_port_protocol(Some("SCTP")), Protocol::Sctp);
    }

    #[test]
    fn test_endpoint_serialization_shape() {
        let value = serde_json::to_value(endpoint(Some("https"), "a.example.com", 443, "/")).unwrap();
        assert_eq!(value["endpoint"]["protocol"], "TCP");
        assert_eq!(value["endpoint"]["appProtocol"], "https");
        assert!(value.get("ref").is_some());
    }
}
