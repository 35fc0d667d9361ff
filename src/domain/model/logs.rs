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

use chrono::{DateTime, Duration, Utc};
use kube::api::LogParams;
use serde::{Deserialize, Serialize};

/// Pod log request options, shaped like core/v1 PodLogOptions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LogOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    pub previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_lines: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_bytes: Option<i64>,
    pub timestamps: bool,
}

impl LogOptions {
    /// Request parameters for a one-shot (non-following) read.
    ///
    /// `sinceTime` is sent as the equivalent whole number of seconds before
    /// `now`; the API accepts only one of the two and `sinceTime` wins.
    pub fn to_log_params(&self, now: DateTime<Utc>) -> LogParams {
        let since_seconds = match self.since_time {
            Some(since) => Some((now - since).num_seconds().max(1)),
            None => self.since_seconds,
        };
        LogParams {
            container: self.container.clone(),
            follow: false,
            limit_bytes: self.limit_bytes,
            previous: self.previous,
            since_seconds,
            tail_lines: self.tail_lines,
            timestamps: self.timestamps,
            ..Default::default()
        }
    }

    /// `from` is sinceTime, else now - sinceSeconds, else the pod creation time
    pub fn window(&self, now: DateTime<Utc>, pod_created: Option<DateTime<Utc>>) -> LogWindow {
        let from_date = if let Some(since) = self.since_time {
            since
        } else if let Some(seconds) = self.since_seconds {
            seconds_before(now, seconds)
        } else {
            pod_created.unwrap_or(now)
        };
        LogWindow {
            from_date,
            to_date: now,
        }
    }
}

/// `now - seconds`, clamped to the earliest representable instant
fn seconds_before(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    Duration::try_seconds(seconds)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogWindow {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
}

/// Complete log text of one pod read plus the time window it covers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogResult {
    #[serde(rename = "logs")]
    pub text: String,
    #[serde(rename = "info")]
    pub window: LogWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_prefers_since_time() {
        let since = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let opts = LogOptions {
            since_time: Some(since),
            since_seconds: Some(60),
            ..Default::default()
        };
        let window = opts.window(now(), None);
        assert_eq!(window.from_date, since);
        assert_eq!(window.to_date, now());
    }

    #[test]
    fn test_window_since_seconds() {
        let created = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let opts = LogOptions {
            since_seconds: Some(60),
            ..Default::default()
        };
        let window = opts.window(now(), Some(created));
        assert_eq!(window.from_date, now() - Duration::seconds(60));
    }

    #[test]
    fn test_window_huge_since_seconds_clamped() {
        for seconds in [10_000_000_000_000, i64::MAX / 100, i64::MAX] {
            let opts = LogOptions {
                since_seconds: Some(seconds),
                ..Default::default()
            };
            let window = opts.window(now(), None);
            assert_eq!(window.from_date, DateTime::<Utc>::MIN_UTC);
            assert_eq!(opts.to_log_params(now()).since_seconds, Some(seconds));
        }
    }

    #[test]
    fn test_window_falls_back_to_creation() {
        let created = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let window = LogOptions::default().window(now(), Some(created));
        assert_eq!(window.from_date, created);
    }

    #[test]
    fn test_log_params_since_time_converted() {
        let opts = LogOptions {
            container: Some("app".to_string()),
            since_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap()),
            since_seconds: Some(3600),
            tail_lines: Some(100),
            ..Default::default()
        };
        let params = opts.to_log_params(now());
        assert_eq!(params.container.as_deref(), Some("app"));
        assert_eq!(params.since_seconds, Some(60));
        assert_eq!(params.tail_lines, Some(100));
        assert!(!params.follow);
    }

    #[test]
    fn test_log_options_from_pod_log_options_json() {
        let opts: LogOptions = serde_json::from_value(serde_json::json!({
            "container": "web",
            "previous": true,
            "sinceSeconds": 30,
        }))
        .unwrap();
        assert_eq!(opts.container.as_deref(), Some("web"));
        assert!(opts.previous);
        assert_eq!(opts.since_seconds, Some(30));
    }
}
