use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated while a tour runs.
#[derive(Debug, Default, Clone)]
pub struct TourMetrics {
    steps_shown: u64,
    placements: u64,
    missing_targets: u64,
    scene_batches: u64,
}

impl TourMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self) {
        self.steps_shown = self.steps_shown.saturating_add(1);
    }

    pub fn record_placement(&mut self) {
        self.placements = self.placements.saturating_add(1);
    }

    pub fn record_missing_target(&mut self) {
        self.missing_targets = self.missing_targets.saturating_add(1);
    }

    pub fn record_scene_batch(&mut self) {
        self.scene_batches = self.scene_batches.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            steps_shown: self.steps_shown,
            placements: self.placements,
            missing_targets: self.missing_targets,
            scene_batches: self.scene_batches,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub steps_shown: u64,
    pub placements: u64,
    pub missing_targets: u64,
    pub scene_batches: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("steps_shown".to_string(), json!(self.steps_shown));
        map.insert("placements".to_string(), json!(self.placements));
        map.insert("missing_targets".to_string(), json!(self.missing_targets));
        map.insert("scene_batches".to_string(), json!(self.scene_batches));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "tour_metrics", self.as_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = TourMetrics::new();
        metrics.record_step();
        metrics.record_step();
        metrics.record_placement();
        metrics.record_missing_target();
        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.steps_shown, 2);
        assert_eq!(snapshot.placements, 1);
        assert_eq!(snapshot.missing_targets, 1);
        assert_eq!(snapshot.uptime_ms, 1500);
        let event = snapshot.to_log_event("tour::runtime.metrics");
        assert_eq!(event.fields.get("steps_shown"), Some(&json!(2)));
    }
}
