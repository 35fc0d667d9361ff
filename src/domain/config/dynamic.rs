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

use crate::domain::config::lens::{validate_cluster_name, KubeConf, RoutingMode};
use crate::shared::error::{QueryError, Result};
use std::collections::HashMap;

const CLUSTER_KEY_PREFIX: &str = "kube.cluster.";

/// Parse dynamic configuration properties from -D key=value format
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let parts: Vec<&str> = config.splitn(2, '=').collect();
        if parts.len() != 2 {
            return Err(QueryError::config_error(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        }

        let key = parts[0].trim();
        let value = parts[1].trim();

        if key.is_empty() {
            return Err(QueryError::config_error(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.to_string());
    }

    Ok(map)
}

/// Apply -D overrides on top of the file configuration.
///
/// Recognized keys: `kube.kubeconfig`, `kube.context`, `kube.routing`,
/// `kube.timeout-secs` and `kube.cluster.<name>=<context>`.
pub fn apply_to_kube_conf(
    configs: &HashMap<String, String>,
    kube_conf: &mut KubeConf,
) -> Result<()> {
    if let Some(path) = configs.get("kube.kubeconfig") {
        kube_conf.kubeconfig = Some(path.clone());
    }

    if let Some(context) = configs.get("kube.context") {
        kube_conf.context = Some(context.clone());
    }

    if let Some(routing) = configs.get("kube.routing") {
        kube_conf.routing = routing.parse::<RoutingMode>()?;
    }

    if let Some(timeout_str) = configs.get("kube.timeout-secs") {
        kube_conf.timeout_secs = timeout_str.parse::<u64>().map_err(|_| {
            QueryError::config_error(format!("Invalid kube.timeout-secs: '{}'", timeout_str))
        })?;
    }

    for (key, context) in configs {
        if let Some(cluster) = key.strip_prefix(CLUSTER_KEY_PREFIX) {
            if cluster.is_empty() {
                return Err(QueryError::config_error(format!(
                    "Missing cluster name in '{}'",
                    key
                )));
            }
            validate_cluster_name(cluster)?;
            kube_conf
                .clusters
                .insert(cluster.to_string(), context.clone());
        }
    }

    kube_conf.validate()
}
