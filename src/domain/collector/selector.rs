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

//! Label selector derivation for pod lookup

use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::DynamicObject;
use serde_json::Value;
use std::collections::BTreeMap;

/// Selector for the pods backing `obj`, from (in order) `spec.selector`,
/// `spec.template.metadata.labels` or the CronJob job template labels.
/// `None` when nothing usable is set; an empty selector would match every pod.
pub fn pod_selector(obj: &DynamicObject) -> Option<String> {
    if let Some(selector) = obj.data.pointer("/spec/selector") {
        if let Some(s) = selector_from_value(selector) {
            return Some(s);
        }
    }
    [
        "/spec/template/metadata/labels",
        "/spec/jobTemplate/spec/template/metadata/labels",
    ]
    .iter()
    .filter_map(|pointer| obj.data.pointer(pointer))
    .find_map(|labels| {
        serde_json::from_value::<BTreeMap<String, String>>(labels.clone())
            .ok()
            .and_then(|labels| labels_to_selector(&labels))
    })
}

/// Workloads use a LabelSelector, Services a plain label map
fn selector_from_value(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.contains_key("matchLabels") || map.contains_key("matchExpressions") {
        let selector: LabelSelector = serde_json::from_value(value.clone()).ok()?;
        label_selector_string(&selector)
    } else {
        let labels: BTreeMap<String, String> = serde_json::from_value(value.clone()).ok()?;
        labels_to_selector(&labels)
    }
}

pub fn labels_to_selector(labels: &BTreeMap<String, String>) -> Option<String> {
    if labels.is_empty() {
        None
    } else {
        Some(
            labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Render a LabelSelector in list-call syntax.
pub fn label_selector_string(selector: &LabelSelector) -> Option<String> {
    let mut terms = Vec::new();

    if let Some(match_labels) = &selector.match_labels {
        terms.extend(match_labels.iter().map(|(k, v)| format!("{}={}", k, v)));
    }

    if let Some(expressions) = &selector.match_expressions {
        for expr in expressions {
            let values = expr.values.clone().unwrap_or_default().join(",");
            let term = match expr.operator.as_str() {
                "In" => format!("{} in ({})", expr.key, values),
                "NotIn" => format!("{} notin ({})", expr.key, values),
                "Exists" => expr.key.clone(),
                "DoesNotExist" => format!("!{}", expr.key),
                // Unknown operator: an unmatched requirement would widen the selector
                _ => return None,
            };
            terms.push(term);
        }
    }

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(","))
    }
}
