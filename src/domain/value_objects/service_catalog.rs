//! Catalog of ecosystem services the engine calls out to
//!
//! Every outbound call is keyed by one of these service names; the circuit
//! breaker registry is built from this catalog at startup. Critical services
//! sit on the main simulation path and get tighter breaker defaults so a
//! broken dependency is detected and retried quickly.

use serde::{Deserialize, Serialize};

/// Well-known service names, used as circuit breaker keys
pub mod services {
    pub const DOCUMENT_STORE: &str = "document-store";
    pub const DOCUMENT_GENERATOR: &str = "document-generator";
    pub const DATA_GENERATOR: &str = "data-generator";
    pub const WORKFLOW_ORCHESTRATOR: &str = "workflow-orchestrator";
    pub const LLM_GATEWAY: &str = "llm-gateway";
    pub const REQUIREMENTS_ANALYZER: &str = "requirements-analyzer";
    pub const CODE_ANALYZER: &str = "code-analyzer";
    pub const QUALITY_SCANNER: &str = "quality-scanner";
    pub const RISK_ASSESSOR: &str = "risk-assessor";
    pub const TEAM_ANALYTICS: &str = "team-analytics";
    pub const NOTIFICATION_HUB: &str = "notification-hub";
    pub const METRICS_COLLECTOR: &str = "metrics-collector";
    pub const INSIGHT_ENGINE: &str = "insight-engine";
    pub const REPORT_BUILDER: &str = "report-builder";
    pub const KNOWLEDGE_BASE: &str = "knowledge-base";
    pub const SCHEDULER: &str = "scheduler";
    pub const CAPACITY_PLANNER: &str = "capacity-planner";
    pub const INTEGRATION_GATEWAY: &str = "integration-gateway";
    pub const SEARCH_INDEXER: &str = "search-indexer";
    pub const ARCHIVE_SERVICE: &str = "archive-service";
}

/// How aggressively the breaker for a service fails fast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalityTier {
    /// On the main simulation path; fail fast, recover fast
    Critical,
    /// Auxiliary; tolerate more failures before opening
    BestEffort,
}

/// One entry in the ecosystem catalog
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    pub tier: CriticalityTier,
}

/// The full set of ecosystem services known to this deployment
pub fn ecosystem_catalog() -> &'static [ServiceDescriptor] {
    use self::services::*;
    use CriticalityTier::{BestEffort, Critical};

    const CATALOG: &[ServiceDescriptor] = &[
        ServiceDescriptor { name: DOCUMENT_STORE, tier: Critical },
        ServiceDescriptor { name: DOCUMENT_GENERATOR, tier: Critical },
        ServiceDescriptor { name: DATA_GENERATOR, tier: Critical },
        ServiceDescriptor { name: WORKFLOW_ORCHESTRATOR, tier: Critical },
        ServiceDescriptor { name: LLM_GATEWAY, tier: Critical },
        ServiceDescriptor { name: REQUIREMENTS_ANALYZER, tier: BestEffort },
        ServiceDescriptor { name: CODE_ANALYZER, tier: BestEffort },
        ServiceDescriptor { name: QUALITY_SCANNER, tier: BestEffort },
        ServiceDescriptor { name: RISK_ASSESSOR, tier: BestEffort },
        ServiceDescriptor { name: TEAM_ANALYTICS, tier: BestEffort },
        ServiceDescriptor { name: NOTIFICATION_HUB, tier: BestEffort },
        ServiceDescriptor { name: METRICS_COLLECTOR, tier: BestEffort },
        ServiceDescriptor { name: INSIGHT_ENGINE, tier: BestEffort },
        ServiceDescriptor { name: REPORT_BUILDER, tier: BestEffort },
        ServiceDescriptor { name: KNOWLEDGE_BASE, tier: BestEffort },
        ServiceDescriptor { name: SCHEDULER, tier: BestEffort },
        ServiceDescriptor { name: CAPACITY_PLANNER, tier: BestEffort },
        ServiceDescriptor { name: INTEGRATION_GATEWAY, tier: BestEffort },
        ServiceDescriptor { name: SEARCH_INDEXER, tier: BestEffort },
        ServiceDescriptor { name: ARCHIVE_SERVICE, tier: BestEffort },
    ];
    CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_unique_names() {
        let catalog = ecosystem_catalog();
        let mut names: Vec<_> = catalog.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }
}
