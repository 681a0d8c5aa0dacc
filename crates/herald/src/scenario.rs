//! Scenario files: a list of listeners to register, optional removals and
//! the dispatches to perform, in any format `herald_core::config` reads.
use std::path::Path;
use std::sync::Arc;

use herald_core::config::load_file;
use herald_core::{
    DispatchOutcome, DispatcherConfig, Event, EventName, HeraldError, Listener, Priority, Result,
    SharedEventDispatcher, StoppableEvent,
};
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Listener registration in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerSpec {
    pub event: String,
    /// Listener identity; removals match on it
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
    /// Stop propagation after running
    #[serde(default)]
    pub stop: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalSpec {
    pub event: String,
    pub name: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSpec {
    pub event: String,
    #[serde(default)]
    pub stoppable: bool,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub dispatcher: DispatcherConfig,
    pub listeners: Vec<ListenerSpec>,
    pub removals: Vec<RemovalSpec>,
    pub dispatches: Vec<DispatchSpec>,
}

/// One listener invocation observed while running a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub event: EventName,
    pub listener: String,
    pub priority: Priority,
}

/// Result of one scenario dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    pub event: String,
    pub invocations: Vec<Invocation>,
    pub outcome: DispatchOutcome,
}

/// Removal that matched nothing
#[derive(Debug, Clone, PartialEq)]
pub struct MissedRemoval {
    pub index: usize,
    pub spec: RemovalSpec,
}

type Trace = Arc<Mutex<Vec<Invocation>>>;

impl Scenario {
    /// Load and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let scenario: Scenario = load_file(path)?;
        scenario.validate()?;
        info!(
            "Loaded scenario {} ({} listener(s), {} dispatch(es))",
            path.display(),
            scenario.listeners.len(),
            scenario.dispatches.len()
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        for (index, spec) in self.listeners.iter().enumerate() {
            if spec.event.trim().is_empty() {
                return Err(HeraldError::InvalidScenario(format!(
                    "listener #{} has an empty event name",
                    index
                )));
            }
            if spec.name.trim().is_empty() {
                return Err(HeraldError::InvalidScenario(format!(
                    "listener #{} for '{}' has an empty name",
                    index, spec.event
                )));
            }
        }
        for (index, spec) in self.removals.iter().enumerate() {
            if spec.event.trim().is_empty() || spec.name.trim().is_empty() {
                return Err(HeraldError::InvalidScenario(format!(
                    "removal #{} needs both an event and a listener name",
                    index
                )));
            }
        }
        for (index, spec) in self.dispatches.iter().enumerate() {
            if spec.event.trim().is_empty() {
                return Err(HeraldError::InvalidScenario(format!(
                    "dispatch #{} has an empty event name",
                    index
                )));
            }
        }
        Ok(())
    }

    /// Build a dispatcher holding every listener, then apply the removals.
    ///
    /// Returns the removals that matched nothing alongside the dispatcher.
    pub fn build(&self) -> (SharedEventDispatcher, Trace, Vec<MissedRemoval>) {
        let dispatcher = SharedEventDispatcher::with_config(self.dispatcher.clone());
        let trace = Trace::default();

        for spec in &self.listeners {
            dispatcher.add_listener(
                spec.event.as_str(),
                recording_listener(spec, &trace),
                spec.priority,
            );
        }

        let mut missed = Vec::new();
        for (index, spec) in self.removals.iter().enumerate() {
            // Removal matches on the listener name, whatever its callback
            let probe = Listener::named(spec.name.clone(), |_, _| {});
            if !dispatcher.remove_listener(&spec.event, &probe, spec.priority) {
                debug!(
                    "Removal of '{}' from '{}' at priority {} matched nothing",
                    spec.name, spec.event, spec.priority
                );
                missed.push(MissedRemoval {
                    index,
                    spec: spec.clone(),
                });
            }
        }
        (dispatcher, trace, missed)
    }

    /// Run every dispatch in order
    pub fn run(&self) -> Vec<DispatchReport> {
        let (dispatcher, trace, _) = self.build();
        self.dispatches
            .iter()
            .map(|spec| {
                let payload = spec.payload.clone().unwrap_or(serde_json::Value::Null);
                let outcome = if spec.stoppable {
                    dispatch_payload(&dispatcher, StoppableEvent::new(payload), &spec.event)
                } else {
                    dispatch_payload(&dispatcher, payload, &spec.event)
                };
                let invocations = std::mem::take(&mut *trace.lock());
                DispatchReport {
                    event: spec.event.clone(),
                    invocations,
                    outcome,
                }
            })
            .collect()
    }
}

fn dispatch_payload<E: Event>(
    dispatcher: &SharedEventDispatcher,
    mut event: E,
    name: &str,
) -> DispatchOutcome {
    dispatcher.dispatch(&mut event, name)
}

fn recording_listener(spec: &ListenerSpec, trace: &Trace) -> Listener {
    let trace = Arc::clone(trace);
    let label = spec.name.clone();
    let priority = spec.priority;
    let stop = spec.stop;
    Listener::named(spec.name.clone(), move |event, name| {
        trace.lock().push(Invocation {
            event: name.clone(),
            listener: label.clone(),
            priority,
        });
        if stop && !event.stop_propagation() {
            debug!(
                "Listener '{}' asked to stop '{}', but the event is not stoppable",
                label, name
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::ConfigFormat;

    const ORDER_SCENARIO: &str = r#"
[[listeners]]
event = "order.created"
name = "A"
priority = 5

[[listeners]]
event = "order.created"
name = "B"
priority = 1

[[listeners]]
event = "order.created"
name = "gate"
priority = 3
stop = true

[[dispatches]]
event = "order.created"

[[dispatches]]
event = "order.created"
stoppable = true
payload = { id = 1 }
"#;

    fn labels(report: &DispatchReport) -> Vec<&str> {
        report.invocations.iter().map(|i| i.listener.as_str()).collect()
    }

    #[test]
    fn test_run_plain_and_stoppable_dispatches() {
        let scenario: Scenario = ConfigFormat::Toml.parse(ORDER_SCENARIO).expect("valid scenario");
        scenario.validate().expect("scenario should validate");

        let reports = scenario.run();
        assert_eq!(reports.len(), 2);

        // Plain payload ignores the stop request
        assert_eq!(labels(&reports[0]), vec!["B", "gate", "A"]);
        assert!(!reports[0].outcome.stopped);

        assert_eq!(labels(&reports[1]), vec!["B", "gate"]);
        assert_eq!(reports[1].outcome.invoked, 2);
        assert!(reports[1].outcome.stopped);
        assert_eq!(reports[1].invocations[0].priority, 1);
    }

    #[test]
    fn test_removals_match_by_name() {
        let mut scenario: Scenario = ConfigFormat::Toml.parse(ORDER_SCENARIO).expect("valid scenario");
        scenario.removals = vec![
            RemovalSpec {
                event: "order.created".into(),
                name: "gate".into(),
                priority: 3,
            },
            RemovalSpec {
                event: "order.created".into(),
                name: "A".into(),
                priority: 1, // wrong priority
            },
        ];

        let (dispatcher, _, missed) = scenario.build();
        assert_eq!(dispatcher.priorities("order.created"), vec![1, 5]);
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].index, 1);

        let reports = scenario.run();
        assert_eq!(labels(&reports[1]), vec!["B", "A"]);
    }

    #[test]
    fn test_dispatcher_section_is_applied() {
        let scenario: Scenario = ConfigFormat::Json
            .parse(
                r#"{
                    "dispatcher": { "prune_empty_entries": false },
                    "listeners": [{ "event": "x", "name": "only" }],
                    "removals": [{ "event": "x", "name": "only" }]
                }"#,
            )
            .expect("valid scenario");

        let (dispatcher, _, missed) = scenario.build();
        assert!(missed.is_empty());
        assert!(dispatcher.has_listener("x"));
        assert_eq!(dispatcher.listener_count("x"), 0);
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let scenario = Scenario {
            listeners: vec![ListenerSpec {
                event: "x".into(),
                name: " ".into(),
                priority: 0,
                stop: false,
            }],
            ..Scenario::default()
        };
        assert!(matches!(scenario.validate(), Err(HeraldError::InvalidScenario(_))));

        let scenario = Scenario {
            dispatches: vec![DispatchSpec {
                event: String::new(),
                stoppable: false,
                payload: None,
            }],
            ..Scenario::default()
        };
        assert!(matches!(scenario.validate(), Err(HeraldError::InvalidScenario(_))));
    }

    #[test]
    fn test_yaml_scenario() {
        let scenario: Scenario = ConfigFormat::Yaml
            .parse(
                "listeners:\n  - event: x\n    name: first\n  - event: x\n    name: first\ndispatches:\n  - event: x\n",
            )
            .expect("valid scenario");
        let reports = scenario.run();
        assert_eq!(labels(&reports[0]), vec!["first", "first"]);
    }
}
