//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::model::{Resource, ServiceEndpoint};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use k8s_openapi::api::core::v1::Event;
use kube::api::DynamicObject;

const LOCAL_CLUSTER_LABEL: &str = "local";

/// Pod summary extracted from a pod document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub phase: String,
    pub ready: usize,
    pub containers: usize,
    pub restarts: i64,
    pub node: String,
}

impl PodInfo {
    pub fn from_object(pod: &DynamicObject) -> Self {
        let statuses = pod
            .data
            .pointer("/status/containerStatuses")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let text = |pointer: &str| {
            pod.data
                .pointer(pointer)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            phase: text("/status/phase"),
            ready: statuses
                .iter()
                .filter(|s| s.get("ready").and_then(|r| r.as_bool()) == Some(true))
                .count(),
            containers: statuses.len(),
            restarts: statuses
                .iter()
                .filter_map(|s| s.get("restartCount").and_then(|r| r.as_i64()))
                .sum(),
            node: text("/spec/nodeName"),
        }
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    pub fn render_resources(&self, resources: &[Resource]) -> String {
        if resources.is_empty() {
            return "No resources found".to_string();
        }

        let mut table = new_table(&["CLUSTER", "COMPONENT", "KIND", "NAMESPACE", "NAME", "REVISION"]);
        for res in resources {
            let kind = res
                .object
                .types
                .as_ref()
                .map(|t| t.kind.as_str())
                .unwrap_or_default();
            table.add_row(vec![
                cluster_cell(&res.cluster, &self.theme),
                Cell::new(&res.component),
                Cell::new(kind),
                Cell::new(res.object.metadata.namespace.as_deref().unwrap_or_default()),
                Cell::new(res.object.metadata.name.as_deref().unwrap_or_default()),
                Cell::new(&res.revision).fg(self.theme.muted),
            ]);
        }

        with_title("Resources", resources.len(), &table)
    }

    pub fn render_endpoints(&self, endpoints: &[ServiceEndpoint]) -> String {
        if endpoints.is_empty() {
            return "No endpoints found".to_string();
        }

        let mut table = new_table(&["REF", "NAMESPACE", "ENDPOINT"]);
        for endpoint in endpoints {
            let reference = format!(
                "{}/{}",
                endpoint.reference.kind.as_deref().unwrap_or_default(),
                endpoint.reference.name.as_deref().unwrap_or_default()
            );
            table.add_row(vec![
                Cell::new(reference),
                Cell::new(endpoint.reference.namespace.as_deref().unwrap_or_default()),
                Cell::new(endpoint.to_string()).fg(self.theme.info),
            ]);
        }

        with_title("Endpoints", endpoints.len(), &table)
    }

    pub fn render_pods(&self, pods: &[DynamicObject]) -> String {
        if pods.is_empty() {
            return "No pods found".to_string();
        }

        let mut table = new_table(&["NAME", "NAMESPACE", "READY", "STATUS", "RESTARTS", "NODE"]);
        for pod in pods.iter().map(PodInfo::from_object) {
            let ready_icon = StatusIcon::get_ready_icon(pod.ready, pod.containers);
            let phase_icon = StatusIcon::pod_phase_icon(&pod.phase);
            table.add_row(vec![
                Cell::new(&pod.name),
                Cell::new(&pod.namespace),
                Cell::new(format!("{} {}/{}", ready_icon, pod.ready, pod.containers))
                    .set_alignment(CellAlignment::Center),
                Cell::new(format!("{} {}", phase_icon, pod.phase))
                    .fg(self.theme.pod_phase_color(&pod.phase)),
                Cell::new(pod.restarts).set_alignment(CellAlignment::Right),
                Cell::new(&pod.node).fg(self.theme.muted),
            ]);
        }

        let mut output = with_title("Pods", pods.len(), &table);
        output.push_str(&format!(
            "Legend: {} Running  {} Pending  {} Failed\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::PENDING.yellow(),
            StatusIcon::ERROR.red()
        ));
        output
    }

    pub fn render_events(&self, events: &[Event]) -> String {
        if events.is_empty() {
            return "No events found".to_string();
        }

        let mut table = new_table(&["TYPE", "REASON", "OBJECT", "COUNT", "LAST SEEN", "MESSAGE"]);
        for event in events {
            let event_type = event.type_.as_deref().unwrap_or_default();
            let object = format!(
                "{}/{}",
                event.involved_object.kind.as_deref().unwrap_or_default(),
                event.involved_object.name.as_deref().unwrap_or_default()
            );
            let last_seen = event
                .last_timestamp
                .as_ref()
                .or(event.first_timestamp.as_ref())
                .map(|t| t.0.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(format!("{} {}", StatusIcon::event_icon(event_type), event_type))
                    .fg(self.theme.event_type_color(event_type)),
                Cell::new(event.reason.as_deref().unwrap_or_default()),
                Cell::new(object),
                Cell::new(event.count.unwrap_or(1)).set_alignment(CellAlignment::Right),
                Cell::new(last_seen).fg(self.theme.muted),
                Cell::new(event.message.as_deref().unwrap_or_default()),
            ]);
        }

        with_title("Events", events.len(), &table)
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).set_alignment(CellAlignment::Left))
                .collect::<Vec<_>>(),
        );
    table
}

fn cluster_cell(cluster: &str, theme: &ColorTheme) -> Cell {
    if cluster.is_empty() {
        Cell::new(LOCAL_CLUSTER_LABEL).fg(theme.muted)
    } else {
        Cell::new(cluster)
    }
}

fn with_title(title: &str, count: usize, table: &Table) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "╭─ {} {} ─╮\n",
        title,
        format!("[{}]", count).bright_black()
    ));
    output.push_str(&table.to_string());
    output.push('\n');
    output
}
