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

mod common;

use common::*;
use deploy_lens::{FilterOption, PodCollector, QueryError, QueryOption, ResourceCollector};
use serde_json::json;
use std::sync::Arc;

fn query(filter: FilterOption) -> QueryOption {
    QueryOption {
        name: "shop".to_string(),
        namespace: "default".to_string(),
        filter,
    }
}

fn with_component(mut entry: serde_json::Value, component: &str) -> serde_json::Value {
    entry["component"] = json!(component);
    entry
}

// ============================================================================
// Resource collection
// ============================================================================

#[tokio::test]
async fn test_component_filter_across_clusters() {
    let store = Arc::new(FakeStore::new());
    store.insert(
        "",
        application(
            "shop",
            "default",
            vec![
                with_component(applied("c1", "apps/v1", "Deployment", "default", "web"), "web"),
                with_component(applied("c1", "apps/v1", "Deployment", "default", "db"), "db"),
                with_component(applied("c2", "apps/v1", "Deployment", "default", "web"), "web"),
            ],
        ),
    );
    for cluster in ["c1", "c2"] {
        store.insert(cluster, deployment("web", "default", json!({}), json!({"app": "web"})));
        store.insert(cluster, deployment("db", "default", json!({}), json!({"app": "db"})));
    }

    let filter = FilterOption {
        components: ["web".to_string()].into_iter().collect(),
        ..Default::default()
    };
    let resources = ResourceCollector::new(store.clone())
        .collect(&query(filter))
        .await
        .unwrap();

    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].cluster, "c1");
    assert_eq!(resources[1].cluster, "c2");
    assert!(resources.iter().all(|r| r.component == "web"));
    assert!(resources
        .iter()
        .all(|r| r.object.metadata.name.as_deref() == Some("web")));

    // Filtered-out entries are never fetched
    let deployment_gets = store
        .calls()
        .into_iter()
        .filter(|c| c.op == "get" && c.kind == "Deployment")
        .count();
    assert_eq!(deployment_gets, 2);
}

#[tokio::test]
async fn test_component_read_from_labels_when_not_recorded() {
    let store = Arc::new(FakeStore::new());
    store.insert(
        "",
        application(
            "shop",
            "default",
            vec![
                applied("", "apps/v1", "Deployment", "default", "web"),
                applied("", "apps/v1", "Deployment", "default", "api"),
            ],
        ),
    );
    store.insert(
        "",
        deployment(
            "web",
            "default",
            json!({"app.oam.dev/component": "web", "app.oam.dev/appRevision": "shop-v3"}),
            json!({"app": "web"}),
        ),
    );
    store.insert(
        "",
        deployment(
            "api",
            "default",
            json!({"app.oam.dev/component": "api"}),
            json!({"app": "api"}),
        ),
    );

    let filter = FilterOption {
        components: ["web".to_string()].into_iter().collect(),
        ..Default::default()
    };
    let resources = ResourceCollector::new(store)
        .collect(&query(filter))
        .await
        .unwrap();

    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].component, "web");
    assert_eq!(resources[0].revision, "shop-v3");
}

#[tokio::test]
async fn test_cluster_and_namespace_filter() {
    let store = Arc::new(FakeStore::new());
    store.insert(
        "",
        application(
            "shop",
            "default",
            vec![
                applied("c1", "apps/v1", "Deployment", "default", "web"),
                applied("c1", "apps/v1", "Deployment", "staging", "web"),
                applied("c2", "apps/v1", "Deployment", "default", "web"),
            ],
        ),
    );
    store.insert("c1", deployment("web", "default", json!({}), json!({"app": "web"})));
    store.insert("c1", deployment("web", "staging", json!({}), json!({"app": "web"})));
    store.insert("c2", deployment("web", "default", json!({}), json!({"app": "web"})));

    let filter = FilterOption {
        cluster: "c1".to_string(),
        cluster_namespace: "staging".to_string(),
        ..Default::default()
    };
    let resources = ResourceCollector::new(store)
        .collect(&query(filter))
        .await
        .unwrap();

    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].cluster, "c1");
    assert_eq!(
        resources[0].object.metadata.namespace.as_deref(),
        Some("staging")
    );
}

#[tokio::test]
async fn test_missing_application_is_fatal() {
    let store = Arc::new(FakeStore::new());
    let err = ResourceCollector::new(store)
        .collect(&query(FilterOption::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::NotFound { .. }));
}

#[tokio::test]
async fn test_unfetchable_resources_are_skipped() {
    let store = Arc::new(FakeStore::new());
    store.insert(
        "",
        application(
            "shop",
            "default",
            vec![
                applied("c1", "apps/v1", "Deployment", "default", "gone"),
                applied("c2", "apps/v1", "Deployment", "default", "web"),
                applied("c1", "apps/v1", "Deployment", "default", "web"),
            ],
        ),
    );
    store.insert("c1", deployment("web", "default", json!({}), json!({"app": "web"})));
    store.insert("c2", deployment("web", "default", json!({}), json!({"app": "web"})));
    store.fail_kind("c2", "Deployment");

    let resources = ResourceCollector::new(store)
        .collect(&query(FilterOption::default()))
        .await
        .unwrap();

    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].cluster, "c1");
    assert_eq!(resources[0].object.metadata.name.as_deref(), Some("web"));
}

// ============================================================================
// Pod resolution
// ============================================================================

#[tokio::test]
async fn test_generic_pods_by_selector() {
    let store = Arc::new(FakeStore::new());
    store.insert("c1", pod("web-b", "default", "uid-b", json!({"app": "web"})));
    store.insert("c1", pod("web-a", "default", "uid-a", json!({"app": "web"})));
    store.insert("c1", pod("db-0", "default", "uid-d", json!({"app": "db"})));
    store.insert("c1", pod("web-x", "other", "uid-x", json!({"app": "web"})));
    store.insert("c2", pod("web-c", "default", "uid-c", json!({"app": "web"})));

    let web = obj(deployment("web", "default", json!({}), json!({"app": "web"})));
    let pods = PodCollector::new(store.clone())
        .resolve_pods(&web, "c1")
        .await
        .unwrap();

    let names: Vec<_> = pods
        .iter()
        .map(|p| p.metadata.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["web-a", "web-b"]);
    assert!(store
        .calls()
        .iter()
        .all(|c| c.cluster == "c1" && c.namespace == "default"));
}

#[tokio::test]
async fn test_service_selector_resolves_pods() {
    let store = Arc::new(FakeStore::new());
    store.insert("", pod("web-0", "default", "uid-0", json!({"app": "web", "tier": "fe"})));

    let service = obj(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {"name": "web", "namespace": "default"},
        "spec": {"selector": {"app": "web"}}
    }));
    let pods = PodCollector::new(store)
        .resolve_pods(&service, "")
        .await
        .unwrap();
    assert_eq!(pods.len(), 1);
}

#[tokio::test]
async fn test_no_selector_yields_no_pods() {
    let store = Arc::new(FakeStore::new());
    store.insert("", pod("web-0", "default", "uid-0", json!({"app": "web"})));

    let config_map = obj(json!({
        "apiVersion": "v1",
        "kind": "ConfigMap",
        "metadata": {"name": "settings", "namespace": "default"},
        "data": {"key": "value"}
    }));
    let pods = PodCollector::new(store.clone())
        .resolve_pods(&config_map, "")
        .await
        .unwrap();
    assert!(pods.is_empty());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_pod_resolves_to_itself() {
    let store = Arc::new(FakeStore::new());
    let web = obj(pod("web-0", "default", "uid-0", json!({"app": "web"})));

    let pods = PodCollector::new(store.clone())
        .resolve_pods(&web, "c1")
        .await
        .unwrap();
    assert_eq!(pods.len(), 1);
    assert_eq!(pods[0].metadata.uid.as_deref(), Some("uid-0"));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_release_bundle_pods_deduplicated() {
    let store = Arc::new(FakeStore::new());
    let labels = release_labels("redis", "apps");
    store.insert("c1", deployment("redis-proxy", "apps", labels.clone(), json!({"app": "redis"})));
    store.insert(
        "c1",
        json!({
            "apiVersion": "apps/v1",
            "kind": "StatefulSet",
            "metadata": {"name": "redis", "namespace": "apps", "labels": labels},
            "spec": {"selector": {"matchLabels": {"app": "redis"}}}
        }),
    );
    // Not managed by the release
    store.insert("c1", deployment("other", "apps", json!({}), json!({"app": "other"})));
    store.insert("c1", pod("redis-0", "apps", "uid-r0", json!({"app": "redis"})));
    store.insert("c1", pod("redis-1", "apps", "uid-r1", json!({"app": "redis"})));
    store.insert("c1", pod("other-0", "apps", "uid-o0", json!({"app": "other"})));

    let release = obj(json!({
        "apiVersion": "helm.toolkit.fluxcd.io/v2beta1",
        "kind": "HelmRelease",
        "metadata": {"name": "redis", "namespace": "apps"},
        "spec": {"chart": {"spec": {"chart": "redis"}}}
    }));
    let pods = PodCollector::new(store)
        .resolve_pods(&release, "c1")
        .await
        .unwrap();

    let names: Vec<_> = pods
        .iter()
        .map(|p| p.metadata.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["redis-0", "redis-1"]);
}

#[tokio::test]
async fn test_release_bundle_survives_listing_failure() {
    let store = Arc::new(FakeStore::new());
    let labels = release_labels("redis", "flux-system");
    store.insert("", deployment("redis", "cache", labels, json!({"app": "redis"})));
    store.insert("", pod("redis-0", "cache", "uid-r0", json!({"app": "redis"})));
    store.fail_kind("", "StatefulSet");

    let release = obj(json!({
        "apiVersion": "helm.toolkit.fluxcd.io/v2beta1",
        "kind": "HelmRelease",
        "metadata": {"name": "redis", "namespace": "flux-system"},
        "spec": {"targetNamespace": "cache"}
    }));
    let pods = PodCollector::new(store.clone())
        .resolve_pods(&release, "")
        .await
        .unwrap();

    assert_eq!(pods.len(), 1);
    assert!(store
        .calls()
        .iter()
        .filter(|c| c.kind == "DaemonSet")
        .all(|c| c.namespace == "cache"));
}
