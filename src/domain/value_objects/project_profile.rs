//! Project classification value objects
//!
//! The project type and complexity drive phase templates, default durations,
//! and how much documentation the simulated delivery produces.

use serde::{Deserialize, Serialize};

/// The kind of software project being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    WebApplication,
    ApiService,
    MobileApp,
    DataPipeline,
    MlSystem,
    CliTool,
}

impl ProjectType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WebApplication => "Web Application",
            Self::ApiService => "API Service",
            Self::MobileApp => "Mobile App",
            Self::DataPipeline => "Data Pipeline",
            Self::MlSystem => "ML System",
            Self::CliTool => "CLI Tool",
        }
    }
}

impl Default for ProjectType {
    fn default() -> Self {
        Self::WebApplication
    }
}

/// Overall delivery complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Medium,
    Complex,
}

impl ComplexityLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Medium => "Medium",
            Self::Complex => "Complex",
        }
    }

    /// Multiplier applied to planned phase durations
    pub fn duration_factor(&self) -> f64 {
        match self {
            Self::Simple => 0.75,
            Self::Medium => 1.0,
            Self::Complex => 1.5,
        }
    }
}

impl Default for ComplexityLevel {
    fn default() -> Self {
        Self::Medium
    }
}
