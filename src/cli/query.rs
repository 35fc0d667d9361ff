//! Query commands

use crate::cli::display::TableRenderer;
use crate::domain::collector::{PodCollector, ResourceCollector};
use crate::domain::config::{apply_to_kube_conf, parse_dynamic_configs, LensConf, RoutingMode};
use crate::domain::endpoint::EndpointCollector;
use crate::domain::model::{split_api_version, FilterOption, LogOptions, QueryOption};
use crate::domain::{EventSearcher, LogStreamer};
use crate::infrastructure::constants::PROVIDER_NAME;
use crate::infrastructure::kubernetes::{api_resource, KubeObjectStore, ObjectStore};
use crate::provider::{install, OperationRegistry};
use crate::shared::QueryError;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, ValueEnum};
use kube::api::DynamicObject;
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Hub connection and routing, shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Path to the deploy-lens configuration file (TOML)
    /// If not provided, DEPLOY_LENS_CONF_FILE is used when set
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Hub cluster context, current context when unset
    #[arg(long)]
    pub context: Option<String>,

    /// How member clusters are reached (gateway, contexts)
    #[arg(long)]
    pub routing: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Keys: kube.kubeconfig, kube.context, kube.routing, kube.timeout-secs,
    /// kube.cluster.<name>=<context>
    ///
    /// Example: -Dkube.routing=contexts -Dkube.cluster.edge-1=edge-1-admin
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl ConnectionArgs {
    /// Resolve configuration: -D properties > command line > config file > defaults
    pub fn load_conf(&self) -> anyhow::Result<LensConf> {
        let mut conf = LensConf::load(self.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        if let Some(ref kubeconfig) = self.kubeconfig {
            conf.kube.kubeconfig = Some(kubeconfig.clone());
        }
        if let Some(ref context) = self.context {
            conf.kube.context = Some(context.clone());
        }
        if let Some(ref routing) = self.routing {
            conf.kube.routing = routing.parse::<RoutingMode>()?;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            conf.kube.timeout_secs = timeout_secs;
        }

        let dynamic_configs = parse_dynamic_configs(&self.properties)
            .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
        apply_to_kube_conf(&dynamic_configs, &mut conf.kube)?;

        Ok(conf)
    }

    pub async fn connect(&self) -> anyhow::Result<Arc<dyn ObjectStore>> {
        let conf = self.load_conf()?;
        let store = KubeObjectStore::from_conf(&conf.kube)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to the hub cluster: {}", e))?;
        Ok(Arc::new(store))
    }
}

/// Application selection and resource filter
#[derive(Args, Debug, Clone)]
pub struct AppArgs {
    /// Application name
    pub app: String,

    /// Application namespace
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// Only resources on this cluster ("local" for the hub)
    #[arg(long)]
    pub cluster: Option<String>,

    /// Only resources in this namespace
    #[arg(long)]
    pub cluster_namespace: Option<String>,

    /// Only resources of these components (repeatable)
    #[arg(long = "component", value_name = "NAME")]
    pub components: Vec<String>,
}

impl AppArgs {
    pub fn query_option(&self) -> QueryOption {
        QueryOption {
            name: self.app.clone(),
            namespace: self.namespace.clone(),
            filter: FilterOption {
                cluster: self.cluster.as_deref().map(cli_cluster).unwrap_or_default(),
                cluster_namespace: self.cluster_namespace.clone().unwrap_or_default(),
                components: self.components.iter().cloned().collect(),
            },
        }
    }
}

/// A single object on some cluster
#[derive(Args, Debug, Clone)]
pub struct ObjectArgs {
    /// Object name
    pub name: String,

    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    #[arg(long, default_value = "apps/v1")]
    pub api_version: String,

    #[arg(long, short = 'k', default_value = "Deployment")]
    pub kind: String,

    /// Cluster the object lives on; the hub when unset
    #[arg(long, default_value = "")]
    pub cluster: String,
}

impl ObjectArgs {
    pub fn cluster(&self) -> String {
        cli_cluster(&self.cluster)
    }

    pub async fn fetch(&self, store: &dyn ObjectStore) -> anyhow::Result<DynamicObject> {
        let (group, version) = split_api_version(&self.api_version);
        let resource = api_resource(group, version, &self.kind);
        let cluster = self.cluster();
        store
            .get(&cluster, &resource, &self.namespace, &self.name)
            .await?
            .ok_or_else(|| {
                QueryError::not_found(&self.kind, &self.name, &self.namespace, &cluster).into()
            })
    }
}

#[derive(Parser, Debug)]
pub struct ResourcesCommand {
    #[command(flatten)]
    pub app: AppArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl ResourcesCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let store = self.connection.connect().await?;
        let resources = ResourceCollector::new(store)
            .collect(&self.app.query_option())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to list resources: {}", e))?;

        emit(self.connection.output, &resources, || {
            TableRenderer::new().render_resources(&resources)
        })
    }
}

#[derive(Parser, Debug)]
pub struct EndpointsCommand {
    #[command(flatten)]
    pub app: AppArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl EndpointsCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let store = self.connection.connect().await?;
        let endpoints = EndpointCollector::new(store)
            .collect(&self.app.query_option())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to collect endpoints: {}", e))?;

        emit(self.connection.output, &endpoints, || {
            TableRenderer::new().render_endpoints(&endpoints)
        })
    }
}

#[derive(Parser, Debug)]
pub struct PodsCommand {
    #[command(flatten)]
    pub object: ObjectArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl PodsCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let store = self.connection.connect().await?;
        let object = self.object.fetch(store.as_ref()).await?;
        let pods = PodCollector::new(store)
            .resolve_pods(&object, &self.object.cluster())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to collect pods: {}", e))?;

        emit(self.connection.output, &pods, || {
            TableRenderer::new().render_pods(&pods)
        })
    }
}

#[derive(Parser, Debug)]
pub struct EventsCommand {
    #[command(flatten)]
    pub object: ObjectArgs,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl EventsCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let store = self.connection.connect().await?;
        let object = self.object.fetch(store.as_ref()).await?;
        let events = EventSearcher::new(store)
            .search(&self.object.cluster(), &object)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to search events: {}", e))?;

        emit(self.connection.output, &events, || {
            TableRenderer::new().render_events(&events)
        })
    }
}

#[derive(Parser, Debug)]
pub struct LogsCommand {
    /// Pod name
    pub pod: String,

    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// Cluster the pod runs on; the hub when unset
    #[arg(long, default_value = "")]
    pub cluster: String,

    /// Container name, required for multi-container pods
    #[arg(long, short = 'c')]
    pub container: Option<String>,

    /// Logs of the previous terminated container instance
    #[arg(long, short = 'p')]
    pub previous: bool,

    /// Only logs newer than this many seconds
    #[arg(long)]
    pub since: Option<i64>,

    /// Only logs after this RFC 3339 timestamp (wins over --since)
    #[arg(long)]
    pub since_time: Option<DateTime<Utc>>,

    #[arg(long)]
    pub tail: Option<i64>,

    #[arg(long)]
    pub limit_bytes: Option<i64>,

    /// Prefix every line with its timestamp
    #[arg(long)]
    pub timestamps: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl LogsCommand {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            container: self.container.clone(),
            previous: self.previous,
            since_seconds: self.since,
            since_time: self.since_time,
            tail_lines: self.tail,
            limit_bytes: self.limit_bytes,
            timestamps: self.timestamps,
        }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let store = self.connection.connect().await?;
        let result = LogStreamer::new(store)
            .stream_logs(
                &cli_cluster(&self.cluster),
                &self.namespace,
                &self.pod,
                &self.log_options(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read logs: {}", e))?;

        if self.connection.output == OutputFormat::Table {
            print!("{}", result.text);
            if let Some(ref err) = result.err {
                eprintln!("⚠ log stream ended early: {}", err);
            }
            return Ok(());
        }
        emit(self.connection.output, &result, String::new)
    }
}

#[derive(Parser, Debug)]
pub struct CallCommand {
    /// Operation name, e.g. listResourcesInApp
    pub operation: String,

    #[arg(long, default_value = PROVIDER_NAME)]
    pub provider: String,

    /// Input document file (JSON or YAML), "-" for stdin
    #[arg(long, short = 'f', value_name = "PATH", conflicts_with = "data")]
    pub file: Option<String>,

    /// Inline input document (JSON or YAML)
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl CallCommand {
    pub fn input(&self) -> anyhow::Result<serde_json::Value> {
        let raw = match (&self.data, self.file.as_deref()) {
            (Some(data), _) => data.clone(),
            (None, Some("-")) => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
            (None, Some(path)) => std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read input file {}: {}", path, e))?,
            (None, None) => "{}".to_string(),
        };
        // YAML is a superset of JSON, so one parser serves both
        let input: serde_json::Value = serde_yaml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Invalid input document: {}", e))?;
        Ok(input)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let input = self.input()?;
        let store = self.connection.connect().await?;
        let mut registry = OperationRegistry::new();
        install(&mut registry, store);

        let outcome = match registry.call(&self.provider, &self.operation, &input).await {
            Ok(outcome) => outcome,
            Err(e @ QueryError::UnknownOperation { .. }) => {
                let available: Vec<String> = registry
                    .operations()
                    .into_iter()
                    .map(|(provider, op)| format!("{}.{}", provider, op))
                    .collect();
                anyhow::bail!("{} (available: {})", e, available.join(", "));
            }
            Err(e) => return Err(e.into()),
        };

        let document = outcome.into_document();
        match self.connection.output {
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&document)?),
            OutputFormat::Json | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(&document)?)
            }
        }
        Ok(())
    }
}

/// "local" names the hub on the command line
fn cli_cluster(cluster: &str) -> String {
    if cluster == "local" {
        String::new()
    } else {
        cluster.to_string()
    }
}

fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Table => println!("{}", table()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_option_from_args() {
        let args = AppArgs {
            app: "shop".to_string(),
            namespace: "prod".to_string(),
            cluster: Some("local".to_string()),
            cluster_namespace: None,
            components: vec!["web".to_string(), "web".to_string()],
        };
        let option = args.query_option();
        assert_eq!(option.name, "shop");
        assert_eq!(option.filter.cluster, "");
        assert_eq!(option.filter.components.len(), 1);
    }

    #[test]
    fn test_flags_override_config() {
        let args = ConnectionArgs {
            routing: Some("contexts".to_string()),
            timeout_secs: Some(30),
            properties: vec!["kube.cluster.edge-1=edge-ctx".to_string()],
            ..Default::default()
        };
        let conf = args.load_conf().unwrap();
        assert_eq!(conf.kube.routing, RoutingMode::Contexts);
        assert_eq!(conf.kube.timeout_secs, 30);
        assert_eq!(conf.kube.clusters.get("edge-1").map(String::as_str), Some("edge-ctx"));
    }

    #[test]
    fn test_call_input_accepts_yaml() {
        let cmd = CallCommand {
            operation: "collectPods".to_string(),
            provider: PROVIDER_NAME.to_string(),
            file: None,
            data: Some("cluster: edge-1\nvalue:\n  kind: Deployment\n".to_string()),
            connection: ConnectionArgs::default(),
        };
        let input = cmd.input().unwrap();
        assert_eq!(input["cluster"], "edge-1");
        assert_eq!(input["value"]["kind"], "Deployment");
    }
}
