//! Scenario personas.
//!
//! A scenario is a named system directive that primes the assistant to play
//! a role ("sell a pen", "prospect a CEO"). Exactly zero or one persona is
//! active at a time and it is applied once per request as the system
//! message; it never becomes a turn.

use crate::error::ChatError;
use serde::{Deserialize, Serialize};

/// A named persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Key used to select the scenario, e.g. `sellAPen`.
    pub name: String,
    /// Button label shown to the user.
    #[serde(default)]
    pub label: String,
    /// System directive sent to the provider.
    pub persona: String,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            persona: persona.into(),
        }
    }
}

/// The scenarios a user can pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// The scenarios that ship with the coach.
    pub fn builtin() -> Self {
        Self::new(vec![
            Scenario::new(
                "sellAPen",
                "Sell a pen",
                "You are a busy office manager. The user is a salesperson trying to sell you a pen. \
                 Stay in character, be skeptical, raise realistic objections, and only agree to buy \
                 if the pitch earns it. Keep replies short, like a real conversation.",
            ),
            Scenario::new(
                "prospectCeo",
                "Prospect to a CEO",
                "You are the CEO of a mid-sized software company and you have two minutes. The user \
                 is cold-calling you to book a meeting. Be direct and impatient, push back on vague \
                 value claims, and agree to a meeting only when given a concrete reason.",
            ),
            Scenario::new(
                "coldCall",
                "Cold call",
                "You are a small business owner who just picked up an unexpected call. You did not \
                 ask to be contacted and you are in the middle of something. Give the user a few \
                 seconds to earn your attention before you try to end the call.",
            ),
            Scenario::new(
                "objectionHandling",
                "Handle objections",
                "You are a procurement lead evaluating the user's product. Raise one objection at a \
                 time (price, timing, an incumbent vendor, no budget) and respond honestly to how \
                 well each one is handled.",
            ),
        ])
    }

    /// Adds or replaces a scenario by name.
    pub fn insert(&mut self, scenario: Scenario) {
        match self.scenarios.iter_mut().find(|s| s.name == scenario.name) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The active persona and which scenario it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaSelection {
    active: Option<String>,
    persona: String,
}

impl PersonaSelection {
    /// Replaces the current selection with `name` from `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UnknownScenario`] if `name` is not in the
    /// catalog; the previous selection is kept.
    pub fn select(&mut self, catalog: &ScenarioCatalog, name: &str) -> Result<(), ChatError> {
        let scenario = catalog
            .get(name)
            .ok_or_else(|| ChatError::UnknownScenario(name.to_string()))?;
        self.active = Some(scenario.name.clone());
        self.persona = scenario.persona.clone();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.persona.clear();
    }

    /// Name of the selected scenario, for highlighting.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The system directive. Empty when nothing is selected.
    pub fn persona(&self) -> &str {
        &self.persona
    }
}
