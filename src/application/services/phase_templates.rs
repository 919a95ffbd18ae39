//! Default phase templates per project type
//!
//! When a creation request does not supply phases, the engine plans the
//! project from these templates. Phase count scales with complexity
//! (simple deliveries skip the heavier stages), durations are distributed
//! over the project's declared duration by weight, and each phase depends
//! on its predecessor.

use chrono::{Duration, Utc};

use crate::domain::entities::{Milestone, ProjectPhase, TimelinePhase};
use crate::domain::value_objects::{ComplexityLevel, ProjectType};

/// Blueprint for one default phase
#[derive(Debug, Clone)]
pub struct PhaseTemplate {
    pub name: &'static str,
    /// Relative share of the project duration
    pub weight: u32,
    pub deliverables: &'static [&'static str],
}

/// Working days per project week used when distributing durations
const WORKING_DAYS_PER_WEEK: u32 = 5;

fn phase_pool(project_type: ProjectType) -> &'static [PhaseTemplate] {
    match project_type {
        ProjectType::WebApplication => &[
            PhaseTemplate {
                name: "Requirements",
                weight: 2,
                deliverables: &["Product requirements document", "Acceptance criteria"],
            },
            PhaseTemplate {
                name: "Design",
                weight: 2,
                deliverables: &["Architecture overview", "Interface mockups"],
            },
            PhaseTemplate {
                name: "Implementation",
                weight: 4,
                deliverables: &["Feature code", "Code review notes"],
            },
            PhaseTemplate {
                name: "Testing",
                weight: 2,
                deliverables: &["Test plan", "Regression report"],
            },
            PhaseTemplate {
                name: "Deployment",
                weight: 1,
                deliverables: &["Release checklist", "Rollback plan"],
            },
        ],
        ProjectType::ApiService => &[
            PhaseTemplate {
                name: "API Design",
                weight: 2,
                deliverables: &["Endpoint specification", "Schema definitions"],
            },
            PhaseTemplate {
                name: "Implementation",
                weight: 4,
                deliverables: &["Service code", "Code review notes"],
            },
            PhaseTemplate {
                name: "Integration Testing",
                weight: 2,
                deliverables: &["Contract test suite", "Load test report"],
            },
            PhaseTemplate {
                name: "Hardening",
                weight: 1,
                deliverables: &["Security review", "Rate limit policy"],
            },
            PhaseTemplate {
                name: "Rollout",
                weight: 1,
                deliverables: &["Deployment runbook", "Monitoring dashboard"],
            },
        ],
        ProjectType::MobileApp => &[
            PhaseTemplate {
                name: "UX Design",
                weight: 2,
                deliverables: &["User flows", "Screen designs"],
            },
            PhaseTemplate {
                name: "Prototype",
                weight: 2,
                deliverables: &["Clickable prototype", "Usability findings"],
            },
            PhaseTemplate {
                name: "Implementation",
                weight: 4,
                deliverables: &["App code", "Code review notes"],
            },
            PhaseTemplate {
                name: "Beta Testing",
                weight: 2,
                deliverables: &["Beta feedback summary", "Crash report triage"],
            },
            PhaseTemplate {
                name: "Store Release",
                weight: 1,
                deliverables: &["Store listing", "Release notes"],
            },
        ],
        ProjectType::DataPipeline => &[
            PhaseTemplate {
                name: "Source Mapping",
                weight: 2,
                deliverables: &["Source inventory", "Data contracts"],
            },
            PhaseTemplate {
                name: "Schema Design",
                weight: 2,
                deliverables: &["Target schema", "Migration plan"],
            },
            PhaseTemplate {
                name: "Pipeline Build",
                weight: 4,
                deliverables: &["Pipeline code", "Orchestration config"],
            },
            PhaseTemplate {
                name: "Validation",
                weight: 2,
                deliverables: &["Data quality report", "Reconciliation results"],
            },
            PhaseTemplate {
                name: "Backfill",
                weight: 1,
                deliverables: &["Backfill log", "Cutover checklist"],
            },
        ],
        ProjectType::MlSystem => &[
            PhaseTemplate {
                name: "Data Collection",
                weight: 2,
                deliverables: &["Dataset catalog", "Labeling guidelines"],
            },
            PhaseTemplate {
                name: "Feature Engineering",
                weight: 2,
                deliverables: &["Feature definitions", "Feature store config"],
            },
            PhaseTemplate {
                name: "Model Training",
                weight: 4,
                deliverables: &["Training pipeline", "Experiment log"],
            },
            PhaseTemplate {
                name: "Evaluation",
                weight: 2,
                deliverables: &["Evaluation report", "Bias analysis"],
            },
            PhaseTemplate {
                name: "Serving Rollout",
                weight: 1,
                deliverables: &["Serving config", "Shadow traffic results"],
            },
        ],
        ProjectType::CliTool => &[
            PhaseTemplate {
                name: "Requirements",
                weight: 1,
                deliverables: &["Command surface sketch", "Usage examples"],
            },
            PhaseTemplate {
                name: "Implementation",
                weight: 3,
                deliverables: &["Tool code", "Code review notes"],
            },
            PhaseTemplate {
                name: "Documentation",
                weight: 1,
                deliverables: &["Man page", "README"],
            },
            PhaseTemplate {
                name: "Packaging",
                weight: 1,
                deliverables: &["Release artifacts", "Install script"],
            },
            PhaseTemplate {
                name: "Distribution",
                weight: 1,
                deliverables: &["Registry listing", "Announcement draft"],
            },
        ],
    }
}

/// How many of the pooled phases a delivery of this complexity runs
fn phase_count(complexity: ComplexityLevel) -> usize {
    match complexity {
        ComplexityLevel::Simple => 3,
        ComplexityLevel::Medium => 4,
        ComplexityLevel::Complex => 5,
    }
}

/// The default templates for a project type at a given complexity
pub fn default_phase_templates(
    project_type: ProjectType,
    complexity: ComplexityLevel,
) -> Vec<PhaseTemplate> {
    let pool = phase_pool(project_type);
    pool.iter().take(phase_count(complexity)).cloned().collect()
}

/// Materialize project phases from templates, spreading the project
/// duration over them by weight and chaining each phase to its predecessor
pub fn project_phases_from_templates(
    templates: &[PhaseTemplate],
    complexity: ComplexityLevel,
    duration_weeks: u32,
) -> Vec<ProjectPhase> {
    let total_weight: u32 = templates.iter().map(|t| t.weight).sum::<u32>().max(1);
    let total_days =
        (f64::from(duration_weeks * WORKING_DAYS_PER_WEEK) * complexity.duration_factor()).round();

    let mut phases = Vec::with_capacity(templates.len());
    let mut previous: Option<&str> = None;
    for template in templates {
        let planned =
            ((total_days * f64::from(template.weight) / f64::from(total_weight)).round() as u32)
                .max(1);
        let mut phase = ProjectPhase::new(template.name, planned);
        if let Some(previous) = previous {
            phase = phase.with_dependency(previous);
        }
        for deliverable in template.deliverables {
            phase = phase.with_deliverable(*deliverable);
        }
        phases.push(phase);
        previous = Some(template.name);
    }
    phases
}

/// Build the timeline schedule for a set of project phases
///
/// Each phase gets a sign-off milestone chained to the previous phase's
/// milestone, with due dates accumulated along the plan.
pub fn timeline_phases_for(phases: &[ProjectPhase]) -> Vec<TimelinePhase> {
    let mut timeline_phases = Vec::with_capacity(phases.len());
    let mut cumulative_days: i64 = 0;
    let mut previous_milestone: Option<String> = None;

    for phase in phases {
        cumulative_days += i64::from(phase.planned_duration_days);
        let milestone_name = format!("{} sign-off", phase.name);
        let mut milestone = Milestone::new(
            milestone_name.clone(),
            Utc::now() + Duration::days(cumulative_days),
        );
        if let Some(previous) = &previous_milestone {
            milestone = milestone.with_dependency(previous.clone());
        }

        let mut timeline_phase =
            TimelinePhase::new(phase.name.clone(), phase.planned_duration_days)
                .with_milestone(milestone);
        for dependency in &phase.dependencies {
            timeline_phase = timeline_phase.with_dependency(dependency.clone());
        }
        timeline_phases.push(timeline_phase);
        previous_milestone = Some(milestone_name);
    }
    timeline_phases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_projects_get_three_phases() {
        let templates =
            default_phase_templates(ProjectType::WebApplication, ComplexityLevel::Simple);
        assert_eq!(templates.len(), 3);
        let names: Vec<_> = templates.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Requirements", "Design", "Implementation"]);
    }

    #[test]
    fn complex_projects_get_the_full_pool() {
        let templates = default_phase_templates(ProjectType::MlSystem, ComplexityLevel::Complex);
        assert_eq!(templates.len(), 5);
    }

    #[test]
    fn phases_chain_on_their_predecessor() {
        let templates =
            default_phase_templates(ProjectType::ApiService, ComplexityLevel::Medium);
        let phases = project_phases_from_templates(&templates, ComplexityLevel::Medium, 8);
        assert!(phases[0].dependencies.is_empty());
        for pair in phases.windows(2) {
            assert_eq!(pair[1].dependencies, vec![pair[0].name.clone()]);
        }
        assert!(phases.iter().all(|p| p.planned_duration_days >= 1));
    }

    #[test]
    fn timeline_milestones_chain_across_phases() {
        let templates =
            default_phase_templates(ProjectType::WebApplication, ComplexityLevel::Simple);
        let phases = project_phases_from_templates(&templates, ComplexityLevel::Simple, 4);
        let timeline_phases = timeline_phases_for(&phases);

        assert_eq!(timeline_phases.len(), phases.len());
        assert!(timeline_phases[0].milestones[0].dependencies.is_empty());
        assert_eq!(
            timeline_phases[1].milestones[0].dependencies,
            vec!["Requirements sign-off".to_string()]
        );
    }
}
