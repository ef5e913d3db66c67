use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Response of the service health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: String,
    /// Per-dependency status, e.g. `"database" -> "healthy"`
    #[serde(default)]
    pub services: HashMap<String, String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }

    /// Names of dependencies not reporting healthy, sorted
    pub fn unhealthy_services(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .services
            .iter()
            .filter(|(_, status)| status.as_str() != "healthy")
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_report() {
        let json = r#"{
            "status": "degraded",
            "version": "0.1.0",
            "timestamp": "2024-01-01T00:00:00+00:00",
            "services": {"database": "healthy", "vector_db": "unhealthy"}
        }"#;
        let report: HealthReport = serde_json::from_str(json).unwrap();
        assert!(!report.is_healthy());
        assert_eq!(report.unhealthy_services(), vec!["vector_db"]);
    }

    #[test]
    fn test_services_default_empty() {
        let json = r#"{"status":"healthy","version":"1","timestamp":"t"}"#;
        let report: HealthReport = serde_json::from_str(json).unwrap();
        assert!(report.is_healthy());
        assert!(report.unhealthy_services().is_empty());
    }
}
