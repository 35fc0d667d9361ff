// CLI command definitions

use super::query::{
    CallCommand, EndpointsCommand, EventsCommand, LogsCommand, PodsCommand, ResourcesCommand,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "deploy-lens",
    version,
    about = "Inspect what a deployed application created across clusters",
    long_about = "Lists the objects an application applied, resolves their pods, derives \
                  externally reachable endpoints and reads pod logs and events, on the hub \
                  cluster and on every member cluster"
)]
pub struct CliArgs {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the resources an application applied
    Resources(ResourcesCommand),

    /// Show externally reachable endpoints of an application
    Endpoints(EndpointsCommand),

    /// List the pods behind a workload, Service or HelmRelease
    Pods(PodsCommand),

    /// List the events recorded for an object
    Events(EventsCommand),

    /// Read the logs of a pod
    Logs(LogsCommand),

    /// Invoke a registered operation with a JSON or YAML input document
    Call(CallCommand),
}

impl Commands {
    pub async fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Resources(cmd) => cmd.execute().await,
            Commands::Endpoints(cmd) => cmd.execute().await,
            Commands::Pods(cmd) => cmd.execute().await,
            Commands::Events(cmd) => cmd.execute().await,
            Commands::Logs(cmd) => cmd.execute().await,
            Commands::Call(cmd) => cmd.execute().await,
        }
    }
}
