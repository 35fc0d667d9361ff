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

use crate::domain::model::{LogOptions, LogResult};
use crate::infrastructure::constants::TERMINATED_CONTAINER_NOT_FOUND_PATTERN;
use crate::infrastructure::kubernetes::{api_resource, LogContent, ObjectStore};
use crate::shared::error::{QueryError, Result};
use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

pub struct LogStreamer {
    store: Arc<dyn ObjectStore>,
}

impl LogStreamer {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Reads one pod's logs to the end of the stream.
    ///
    /// A missing pod or a stream that cannot be opened is an error, except
    /// when `previous` asks for a terminated container that never existed;
    /// that reads as empty logs. Failures mid-stream land on `err` next to
    /// whatever was read.
    pub async fn stream_logs(
        &self,
        cluster: &str,
        namespace: &str,
        pod: &str,
        options: &LogOptions,
    ) -> Result<LogResult> {
        let pod_obj = self
            .store
            .get(cluster, &api_resource("", "v1", "Pod"), namespace, pod)
            .await?
            .ok_or_else(|| QueryError::not_found("Pod", pod, namespace, cluster))?;

        let now = Utc::now();
        let params = options.to_log_params(now);
        let content = match self.store.read_logs(cluster, namespace, pod, &params).await {
            Ok(content) => content,
            Err(e) if is_missing_terminated_container(&e) => {
                debug!(pod = %pod, error = %e, "No previous container, returning empty logs");
                LogContent::default()
            }
            Err(e) => return Err(e),
        };

        let created = pod_obj.metadata.creation_timestamp.map(|t| t.0);
        Ok(LogResult {
            text: content.text,
            window: options.window(now, created),
            err: content.read_error,
        })
    }
}

pub fn is_missing_terminated_container(err: &QueryError) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(TERMINATED_CONTAINER_NOT_FOUND_PATTERN).expect("valid terminated container regex")
    })
    .is_match(&err.to_string())
}
