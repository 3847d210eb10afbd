//! Scripted case scenarios
//!
//! The real case-simulation collaborator hands the monitor an authoritative
//! `Vitals` record at session start and after each simulated action. For
//! demos and testing that collaborator is replaced by a scripted timeline:
//! an ordered list of timed vitals steps loaded from JSON.

use crate::monitor::MonitorEngine;
use crate::surface::Surface;
use crate::vitals::Vitals;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// One authoritative update, delivered `at_secs` after scenario start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub at_secs: f64,
    #[serde(default)]
    pub note: Option<String>,
    pub vitals: Vitals,
}

/// A scripted case: name plus timed vitals steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load from a JSON file. Steps are sorted by time; an empty step list
    /// is rejected since the monitor needs at least the opening vitals.
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let mut scenario: Scenario = serde_json::from_str(&text)?;
        if scenario.steps.is_empty() {
            return Err(format!("scenario '{}' has no steps", scenario.name).into());
        }
        scenario
            .steps
            .sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Ok(scenario)
    }

    /// Opening vitals (first step).
    pub fn initial_vitals(&self) -> Vitals {
        self.steps[0].vitals
    }

    /// Built-in demo: evolving chest-pain case ending in VF arrest.
    pub fn demo() -> Self {
        let base = Vitals::default();
        Scenario {
            name: "Acute chest pain (demo)".to_string(),
            steps: vec![
                ScenarioStep {
                    at_secs: 0.0,
                    note: Some("Arrival, uncomfortable but stable".to_string()),
                    vitals: Vitals {
                        heart_rate: 92,
                        systolic_bp: 142,
                        diastolic_bp: 88,
                        resp_rate: 18,
                        oxygen_sat: 96,
                        temperature: 36.9,
                        ..base
                    },
                },
                ScenarioStep {
                    at_secs: 20.0,
                    note: Some("Pain worsening, ST changes on the monitor".to_string()),
                    vitals: Vitals {
                        heart_rate: 104,
                        systolic_bp: 150,
                        diastolic_bp: 92,
                        resp_rate: 22,
                        oxygen_sat: 94,
                        temperature: 36.9,
                        rhythm: crate::vitals::Rhythm::StElevation,
                    },
                },
                ScenarioStep {
                    at_secs: 45.0,
                    note: Some("Deteriorating into VT".to_string()),
                    vitals: Vitals {
                        heart_rate: 168,
                        systolic_bp: 84,
                        diastolic_bp: 52,
                        resp_rate: 26,
                        oxygen_sat: 90,
                        temperature: 36.8,
                        rhythm: crate::vitals::Rhythm::VentricularTachycardia,
                    },
                },
                ScenarioStep {
                    at_secs: 70.0,
                    note: Some("VF arrest".to_string()),
                    vitals: Vitals {
                        heart_rate: 0,
                        systolic_bp: 0,
                        diastolic_bp: 0,
                        resp_rate: 0,
                        oxygen_sat: 70,
                        temperature: 36.6,
                        rhythm: crate::vitals::Rhythm::VentricularFibrillation,
                    },
                },
            ],
        }
    }
}

/// Play a scenario against an engine on the current `LocalSet`: the first
/// step is assumed already applied; later steps land at their offsets.
pub fn spawn_scenario_task<S: Surface + 'static>(
    engine: Rc<RefCell<MonitorEngine<S>>>,
    scenario: Scenario,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_local(async move {
        let start = tokio::time::Instant::now();
        for step in scenario.steps.into_iter().skip(1) {
            let at = start + Duration::from_secs_f64(step.at_secs.max(0.0));
            tokio::time::sleep_until(at).await;
            if let Some(note) = &step.note {
                info!(note = note.as_str(), "scenario step");
            }
            engine.borrow_mut().apply_vitals(step.vitals);
        }
    })
}
