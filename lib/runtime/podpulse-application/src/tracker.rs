use std::collections::{BTreeMap, HashMap};

use podpulse_domain::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTransition {
    Changed {
        pod: String,
        from: Option<Phase>,
        to: Phase,
    },
    Vanished {
        pod: String,
    },
}

/// Last phase seen per pod, carried from one cycle to the next by the scheduler.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    last_known: HashMap<String, Phase>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.last_known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_known.is_empty()
    }

    pub fn phase_of(&self, pod: &str) -> Option<Phase> {
        self.last_known.get(pod).copied()
    }

    /// Records the live set and returns what changed since the previous call.
    pub fn observe(&mut self, live: &BTreeMap<String, Phase>) -> Vec<StateTransition> {
        let mut transitions = Vec::new();
        for (pod, phase) in live {
            let previous = self.last_known.insert(pod.clone(), *phase);
            if previous != Some(*phase) {
                transitions.push(StateTransition::Changed {
                    pod: pod.clone(),
                    from: previous,
                    to: *phase,
                });
            }
        }

        let mut vanished: Vec<String> = self
            .last_known
            .keys()
            .filter(|pod| !live.contains_key(*pod))
            .cloned()
            .collect();
        vanished.sort();
        for pod in vanished {
            self.last_known.remove(&pod);
            transitions.push(StateTransition::Vanished { pod });
        }
        transitions
    }
}
