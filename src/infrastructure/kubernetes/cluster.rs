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

//! Cluster routing: every store call names the cluster it targets and is sent
//! through the client this router hands out for it.

use crate::domain::config::{validate_cluster_name, KubeConf, RoutingMode};
use crate::infrastructure::constants::{
    CLUSTER_GATEWAY_PATH_PREFIX, CLUSTER_GATEWAY_PATH_SUFFIX, LOCAL_CLUSTER,
};
use crate::shared::error::{QueryError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

pub struct ClusterRouter {
    hub: Client,
    hub_config: Config,
    routing: RoutingMode,
    members: HashMap<String, Client>,
    /// Gateway-routed member clients, built on first use
    gateway_members: RwLock<HashMap<String, Client>>,
}

impl ClusterRouter {
    pub async fn from_conf(conf: &KubeConf) -> Result<Self> {
        let hub_config = load_config(conf.kubeconfig.as_deref(), conf.context.clone()).await?;
        let hub = Client::try_from(hub_config.clone()).map_err(|e| {
            QueryError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;
        info!(
            routing = conf.routing.as_str(),
            hub = %hub_config.cluster_url,
            "Initialized hub cluster client"
        );

        let mut members = HashMap::new();
        if conf.routing == RoutingMode::Contexts {
            for (cluster, context) in &conf.clusters {
                let config = load_config(conf.kubeconfig.as_deref(), Some(context.clone()))
                    .await
                    .map_err(|e| {
                        QueryError::config_error(format!(
                            "Context '{}' for cluster '{}' could not be loaded: {}",
                            context, cluster, e
                        ))
                    })?;
                let client = Client::try_from(config).map_err(|e| {
                    QueryError::KubeError(format!(
                        "Failed to create client for cluster '{}': {}",
                        cluster, e
                    ))
                })?;
                info!(cluster = %cluster, context = %context, "Initialized member cluster client");
                members.insert(cluster.clone(), client);
            }
        }

        Ok(Self::new(hub, hub_config, conf.routing, members))
    }

    pub fn new(
        hub: Client,
        hub_config: Config,
        routing: RoutingMode,
        members: HashMap<String, Client>,
    ) -> Self {
        Self {
            hub,
            hub_config,
            routing,
            members,
            gateway_members: RwLock::new(HashMap::new()),
        }
    }

    pub fn routing(&self) -> RoutingMode {
        self.routing
    }

    /// Client that routes requests to `cluster`; the empty name is the hub.
    pub fn client_for(&self, cluster: &str) -> Result<Client> {
        if cluster == LOCAL_CLUSTER {
            return Ok(self.hub.clone());
        }
        validate_cluster_name(cluster)?;

        match self.routing {
            RoutingMode::Contexts => self.members.get(cluster).cloned().ok_or_else(|| {
                QueryError::config_error(format!(
                    "Cluster '{}' has no kubeconfig context configured (kube.clusters)",
                    cluster
                ))
            }),
            RoutingMode::Gateway => self.gateway_client(cluster),
        }
    }

    fn gateway_client(&self, cluster: &str) -> Result<Client> {
        if let Some(client) = self
            .gateway_members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(cluster)
        {
            return Ok(client.clone());
        }

        let mut config = self.hub_config.clone();
        let url = gateway_url(&self.hub_config.cluster_url.to_string(), cluster);
        debug!(cluster = %cluster, url = %url, "Routing through cluster gateway");
        config.cluster_url = url
            .parse()
            .map_err(|e| QueryError::config_error(format!("Invalid gateway url '{}': {}", url, e)))?;
        let client = Client::try_from(config).map_err(|e| {
            QueryError::KubeError(format!(
                "Failed to create client for cluster '{}': {}",
                cluster, e
            ))
        })?;

        let mut cache = self
            .gateway_members
            .write()
            .unwrap_or_else(|e| e.into_inner());
        Ok(cache.entry(cluster.to_string()).or_insert(client).clone())
    }
}

/// Proxy URL that forwards hub requests to a member cluster
pub fn gateway_url(hub_url: &str, cluster: &str) -> String {
    format!(
        "{}{}/{}/{}",
        hub_url.trim_end_matches('/'),
        CLUSTER_GATEWAY_PATH_PREFIX,
        cluster,
        CLUSTER_GATEWAY_PATH_SUFFIX
    )
}

async fn load_config(kubeconfig_path: Option<&str>, context: Option<String>) -> Result<Config> {
    let kubeconfig = match kubeconfig_path {
        Some(path) => Kubeconfig::read_from(path)
            .map_err(|e| QueryError::KubeError(format!("Failed to load kubeconfig: {}", e)))?,
        None => match Kubeconfig::read() {
            Ok(kubeconfig) => kubeconfig,
            // No kubeconfig at all: in-cluster service account, if any
            Err(_) if context.is_none() => {
                return Config::infer().await.map_err(|e| {
                    QueryError::KubeError(format!("Failed to infer Kubernetes config: {}", e))
                });
            }
            Err(e) => {
                return Err(QueryError::KubeError(format!(
                    "Failed to load kubeconfig: {}",
                    e
                )))
            }
        },
    };

    let config_options = KubeConfigOptions {
        context,
        cluster: None,
        user: None,
    };

    Config::from_custom_kubeconfig(kubeconfig, &config_options)
        .await
        .map_err(|e| QueryError::KubeError(format!("Failed to create Kubernetes config: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_url() {
        assert_eq!(
            gateway_url("https://hub.example.com:6443/", "prod-eu"),
            "https://hub.example.com:6443/apis/cluster.core.oam.dev/v1alpha1/clustergateways/prod-eu/proxy"
        );
    }

    fn gateway_router() -> ClusterRouter {
        let config = Config::new("https://hub.example.com:6443".parse().unwrap());
        let hub = Client::try_from(config.clone()).unwrap();
        ClusterRouter::new(hub, config, RoutingMode::Gateway, HashMap::new())
    }

    #[tokio::test]
    async fn test_gateway_clients_built_once_per_cluster() {
        let router = gateway_router();
        router.client_for("prod-eu").unwrap();
        router.client_for("prod-eu").unwrap();
        router.client_for("prod-us").unwrap();
        router.client_for("").unwrap();

        let cached = router.gateway_members.read().unwrap();
        let mut names: Vec<_> = cached.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["prod-eu", "prod-us"]);
    }

    #[tokio::test]
    async fn test_gateway_rejects_invalid_cluster_name() {
        let router = gateway_router();
        assert!(router.client_for("Not_A_Cluster").is_err());
        assert!(router.gateway_members.read().unwrap().is_empty());
    }

    #[test]
    fn test_gateway_url_keeps_base_path() {
        assert_eq!(
            gateway_url("https://rancher.local/k8s/clusters/c-1", "edge"),
            "https://rancher.local/k8s/clusters/c-1/apis/cluster.core.oam.dev/v1alpha1/clustergateways/edge/proxy"
        );
    }
}
