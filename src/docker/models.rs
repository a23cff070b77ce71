//! Typed views of the Docker Engine API responses the plugin reads.
//!
//! Only the fields needed for reporting are modelled. Every struct tolerates
//! missing optional fields, since older API versions omit several of them.

use std::collections::HashMap;

use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Lifecycle state of a container, as reported in the `State` field of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Paused,
    Created,
    Restarting,
    Removing,
    Exited,
    Dead,
}

/// Result of a container's health check, from `State.Health.Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Starting,
    Healthy,
    Unhealthy,
    None,
    #[serde(other)]
    Unknown,
}

/// A creation timestamp, either UNIX seconds or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(i64),
    Text(String),
}

impl Timestamp {
    /// Seconds since the UNIX epoch. Unparsable text yields `0`.
    pub fn unix_seconds(&self) -> i64 {
        match self {
            Timestamp::Epoch(secs) => *secs,
            Timestamp::Text(text) => OffsetDateTime::parse(text, &Rfc3339)
                .map(|t| t.unix_timestamp())
                .unwrap_or_else(|err| {
                    log::debug!("unparsable timestamp `{text}`: {err}");
                    0
                }),
        }
    }
}

/// Objects that are listed in creation order.
pub trait Chronological {
    /// Creation time in UNIX seconds.
    fn creation_time(&self) -> i64;
    /// Tie breaker for objects created within the same second.
    fn sort_key(&self) -> &str;
}

/// `CreatedAt` wins over `Created` when an API version reports both.
fn creation_time(created_at: Option<&Timestamp>, created: Option<&Timestamp>) -> i64 {
    created_at.or(created).map_or(0, Timestamp::unix_seconds)
}

/// One entry of `GET /containers/json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(rename = "State")]
    pub status: ContainerStatus,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Only present when listed with `size=1`.
    #[serde(default)]
    pub size_rw: Option<i64>,
}

impl Container {
    /// Primary name without the leading `/`, falling back to the id.
    pub fn name(&self) -> &str {
        self.names
            .first()
            .map(|name| name.trim_start_matches('/'))
            .unwrap_or(&self.id)
    }
}

impl Chronological for Container {
    fn creation_time(&self) -> i64 {
        creation_time(self.created_at.as_ref(), self.created.as_ref())
    }

    fn sort_key(&self) -> &str {
        &self.id
    }
}

/// One entry of `GET /images/json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub repo_tags: Option<Vec<String>>,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub size: i64,
}

impl Image {
    /// Abbreviated id: `sha256:` followed by ten hex digits.
    pub fn short_id(&self) -> &str {
        let len = if self.id.starts_with("sha256:") { 17 } else { 10 };
        self.id.get(..len).unwrap_or(&self.id)
    }

    /// Repository tags, without the `<none>:<none>` placeholder.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.repo_tags
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|tag| *tag != "<none>:<none>")
    }
}

impl Chronological for Image {
    fn creation_time(&self) -> i64 {
        creation_time(self.created_at.as_ref(), self.created.as_ref())
    }

    fn sort_key(&self) -> &str {
        &self.id
    }
}

/// Body of `GET /volumes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeList {
    #[serde(default)]
    pub volumes: Option<Vec<Volume>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    pub name: String,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Chronological for Volume {
    fn creation_time(&self) -> i64 {
        creation_time(self.created_at.as_ref(), self.created.as_ref())
    }

    fn sort_key(&self) -> &str {
        &self.name
    }
}

/// The subset of `GET /containers/{id}/json` needed for health checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerInspect {
    #[serde(default)]
    pub state: Option<ContainerState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerState {
    #[serde(default)]
    pub health: Option<Health>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Health {
    pub status: HealthStatus,
}

/// One sample of `GET /containers/{id}/stats?stream=false`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ContainerStats {
    #[serde(default)]
    pub cpu_stats: CpuStats,
    #[serde(default)]
    pub precpu_stats: CpuStats,
    #[serde(default)]
    pub memory_stats: MemoryStats,
    #[serde(default)]
    pub networks: Option<HashMap<String, NetworkStats>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub cpu_usage: CpuUsage,
    #[serde(default)]
    pub system_cpu_usage: Option<u64>,
    #[serde(default)]
    pub online_cpus: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CpuUsage {
    #[serde(default)]
    pub total_usage: u64,
    #[serde(default)]
    pub percpu_usage: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemoryStats {
    #[serde(default)]
    pub usage: Option<u64>,
    #[serde(default)]
    pub stats: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NetworkStats {
    #[serde(default)]
    pub rx_bytes: u64,
    #[serde(default)]
    pub tx_bytes: u64,
}

impl ContainerStats {
    /// CPU usage since the previous sample, in percent of one CPU.
    ///
    /// Returns `0.0` unless both the container and the system delta are positive.
    pub fn cpu_percent(&self) -> f64 {
        let cpu_delta = self
            .cpu_stats
            .cpu_usage
            .total_usage
            .saturating_sub(self.precpu_stats.cpu_usage.total_usage);
        let system_delta = match (
            self.cpu_stats.system_cpu_usage,
            self.precpu_stats.system_cpu_usage,
        ) {
            (Some(now), Some(before)) => now.saturating_sub(before),
            (Some(now), None) => now,
            _ => 0,
        };
        if cpu_delta == 0 || system_delta == 0 {
            return 0.0;
        }

        let online_cpus = self
            .cpu_stats
            .online_cpus
            .map(|n| n as usize)
            .or_else(|| self.cpu_stats.cpu_usage.percpu_usage.as_ref().map(Vec::len))
            .filter(|n| *n > 0)
            .unwrap_or(1);

        cpu_delta as f64 / system_delta as f64 * online_cpus as f64 * 100.0
    }

    /// Memory in use without the page cache that can be reclaimed.
    pub fn memory_usage(&self) -> u64 {
        let Some(usage) = self.memory_stats.usage else {
            return 0;
        };
        // cgroup v1 reports `total_inactive_file`, cgroup v2 `inactive_file`.
        let inactive = self
            .memory_stats
            .stats
            .get("total_inactive_file")
            .or_else(|| self.memory_stats.stats.get("inactive_file"))
            .copied()
            .unwrap_or(0);
        usage.saturating_sub(inactive)
    }

    /// Received and transmitted bytes summed over all interfaces.
    pub fn network_totals(&self) -> (u64, u64) {
        self.networks
            .iter()
            .flat_map(HashMap::values)
            .fold((0u64, 0u64), |(rx, tx), net| {
                (
                    rx.saturating_add(net.rx_bytes),
                    tx.saturating_add(net.tx_bytes),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_container_listing() {
        let raw = r#"[{
            "Id": "8dfafdbc3a40",
            "Names": ["/web"],
            "Image": "nginx:latest",
            "State": "running",
            "Status": "Up 3 hours (healthy)",
            "Created": 1367854155,
            "SizeRw": 12288
        }]"#;
        let containers: Vec<Container> = serde_json::from_str(raw).unwrap();
        assert_eq!(containers.len(), 1);
        let web = &containers[0];
        assert_eq!(web.name(), "web");
        assert_eq!(web.status, ContainerStatus::Running);
        assert_eq!(web.creation_time(), 1367854155);
        assert_eq!(web.size_rw, Some(12288));
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let raw = r#"{"Id": "x", "State": "hibernating"}"#;
        assert!(serde_json::from_str::<Container>(raw).is_err());
    }

    #[test]
    fn test_container_name_falls_back_to_id() {
        let raw = r#"{"Id": "abc", "State": "exited"}"#;
        let container: Container = serde_json::from_str(raw).unwrap();
        assert_eq!(container.name(), "abc");
    }

    #[test]
    fn test_created_at_wins_over_created() {
        let raw = r#"{
            "Name": "data",
            "Created": 100,
            "CreatedAt": "2016-06-07T20:31:11Z"
        }"#;
        let volume: Volume = serde_json::from_str(raw).unwrap();
        assert_eq!(volume.creation_time(), 1465331471);
    }

    #[test]
    fn test_timestamp_with_offset_and_fraction() {
        let ts = Timestamp::Text("2016-06-07T20:31:11.853781916-05:00".to_owned());
        assert_eq!(ts.unix_seconds(), 1465349471);
        assert_eq!(Timestamp::Text("yesterday".to_owned()).unix_seconds(), 0);
    }

    #[test]
    fn test_image_short_id_and_tags() {
        let raw = r#"{
            "Id": "sha256:ec3f0931a6e6b6855d76b2d7b0be30e81860baccd891b2e243280bf1cd8ad710",
            "RepoTags": ["example:1.0", "example:latest", "<none>:<none>"],
            "Created": 1644009612,
            "Size": 172064416
        }"#;
        let image: Image = serde_json::from_str(raw).unwrap();
        assert_eq!(image.short_id(), "sha256:ec3f0931a6");
        assert_eq!(
            image.tags().collect::<Vec<_>>(),
            vec!["example:1.0", "example:latest"]
        );

        let image = Image {
            id: "ec3f0931a6e6b685".to_owned(),
            repo_tags: None,
            created: None,
            created_at: None,
            size: 0,
        };
        assert_eq!(image.short_id(), "ec3f0931a6");
        assert_eq!(image.tags().count(), 0);
    }

    #[test]
    fn test_decode_health() {
        let raw = r#"{"State": {"Status": "running", "Health": {"Status": "unhealthy", "FailingStreak": 3}}}"#;
        let inspect: ContainerInspect = serde_json::from_str(raw).unwrap();
        let status = inspect.state.and_then(|s| s.health).map(|h| h.status);
        assert_eq!(status, Some(HealthStatus::Unhealthy));

        let raw = r#"{"State": {"Health": {"Status": "degraded"}}}"#;
        let inspect: ContainerInspect = serde_json::from_str(raw).unwrap();
        let status = inspect.state.and_then(|s| s.health).map(|h| h.status);
        assert_eq!(status, Some(HealthStatus::Unknown));
    }

    #[test]
    fn test_cpu_percent() {
        let raw = r#"{
            "cpu_stats": {
                "cpu_usage": {"total_usage": 300},
                "system_cpu_usage": 2000,
                "online_cpus": 4
            },
            "precpu_stats": {
                "cpu_usage": {"total_usage": 100},
                "system_cpu_usage": 1000
            }
        }"#;
        let stats: ContainerStats = serde_json::from_str(raw).unwrap();
        assert!((stats.cpu_percent() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpu_percent_falls_back_to_percpu_length() {
        let mut stats = ContainerStats::default();
        stats.cpu_stats.cpu_usage.total_usage = 150;
        stats.cpu_stats.cpu_usage.percpu_usage = Some(vec![75, 75]);
        stats.cpu_stats.system_cpu_usage = Some(1000);
        stats.precpu_stats.cpu_usage.total_usage = 50;
        stats.precpu_stats.system_cpu_usage = Some(500);
        assert!((stats.cpu_percent() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpu_percent_without_progress() {
        assert_eq!(ContainerStats::default().cpu_percent(), 0.0);
    }

    #[test]
    fn test_memory_usage_cgroup_versions() {
        let mut stats = ContainerStats::default();
        assert_eq!(stats.memory_usage(), 0);

        stats.memory_stats.usage = Some(10_000);
        stats
            .memory_stats
            .stats
            .insert("inactive_file".to_owned(), 4_000);
        assert_eq!(stats.memory_usage(), 6_000);

        stats
            .memory_stats
            .stats
            .insert("total_inactive_file".to_owned(), 3_000);
        assert_eq!(stats.memory_usage(), 7_000);

        stats
            .memory_stats
            .stats
            .insert("total_inactive_file".to_owned(), 20_000);
        assert_eq!(stats.memory_usage(), 0);
    }

    #[test]
    fn test_network_totals() {
        let raw = r#"{
            "networks": {
                "eth0": {"rx_bytes": 100, "tx_bytes": 10},
                "eth1": {"rx_bytes": 5, "tx_bytes": 1}
            }
        }"#;
        let stats: ContainerStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.network_totals(), (105, 11));
        assert_eq!(ContainerStats::default().network_totals(), (0, 0));
    }

    #[test]
    fn test_network_totals_saturate() {
        let stats = ContainerStats {
            networks: Some(HashMap::from([
                (
                    "eth0".to_owned(),
                    NetworkStats {
                        rx_bytes: u64::MAX,
                        tx_bytes: 7,
                    },
                ),
                (
                    "eth1".to_owned(),
                    NetworkStats {
                        rx_bytes: 1,
                        tx_bytes: u64::MAX - 1,
                    },
                ),
            ])),
            ..Default::default()
        };
        assert_eq!(stats.network_totals(), (u64::MAX, u64::MAX));
    }
}
