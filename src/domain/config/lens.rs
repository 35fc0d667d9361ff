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

//! File-backed configuration for deploy-lens

use crate::infrastructure::constants::{CONF_FILE_ENV, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::shared::error::{QueryError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::sync::OnceLock;
use std::time::Duration;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConf {
    pub kube: KubeConf,
}

impl LensConf {
    /// Load configuration from TOML file
    pub fn from<T: AsRef<str>>(path: T) -> Result<Self> {
        let content = read_to_string(path.as_ref()).map_err(|e| {
            QueryError::config_error(format!(
                "Failed to read config file {}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        conf.kube.validate()?;
        Ok(conf)
    }

    /// Resolve the config file: explicit path > environment variable > defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from(path);
        }
        match std::env::var(CONF_FILE_ENV) {
            Ok(env_path) if !env_path.is_empty() => Self::from(env_path),
            _ => Ok(Self::default()),
        }
    }
}

/// How member clusters are reached
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Through the hub's cluster-gateway proxy
    #[default]
    Gateway,
    /// Through one kubeconfig context per member cluster
    Contexts,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::Gateway => "gateway",
            RoutingMode::Contexts => "contexts",
        }
    }
}

impl std::str::FromStr for RoutingMode {
    type Err = QueryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gateway" => Ok(RoutingMode::Gateway),
            "contexts" => Ok(RoutingMode::Contexts),
            _ => Err(QueryError::ConfigError(format!(
                "Invalid routing mode: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeConf {
    /// Kubeconfig path, KUBECONFIG or ~/.kube/config when unset
    pub kubeconfig: Option<String>,
    /// Hub context, current context when unset
    pub context: Option<String>,
    pub routing: RoutingMode,
    pub timeout_secs: u64,
    /// Member cluster name -> kubeconfig context (contexts routing only)
    pub clusters: BTreeMap<String, String>,
}

impl Default for KubeConf {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            routing: RoutingMode::default(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            clusters: BTreeMap::new(),
        }
    }
}

impl KubeConf {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(QueryError::config_error(
                "kube.timeout_secs must be greater than 0",
            ));
        }
        for (cluster, context) in &self.clusters {
            validate_cluster_name(cluster)?;
            if context.trim().is_empty() {
                return Err(QueryError::config_error(format!(
                    "Cluster '{}' maps to an empty kubeconfig context",
                    cluster
                )));
            }
        }
        Ok(())
    }
}

fn cluster_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9.]{0,251}[a-z0-9])?$").expect("valid cluster name regex")
    })
}

/// Member cluster names end up in request paths, so they must be DNS-1123 subdomains.
/// The empty name is the hub cluster.
pub fn validate_cluster_name(cluster: &str) -> Result<()> {
    if cluster.is_empty() || cluster_name_regex().is_match(cluster) {
        Ok(())
    } else {
        Err(QueryError::config_error(format!(
            "Invalid cluster name '{}': must be a lowercase DNS-1123 subdomain",
            cluster
        )))
    }
}
