//! Planning context for priority rule evaluation.

use crate::rules::PlanningRules;

/// State of the planner when a semester is being filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanningContext {
    /// Lowest level among courses still pending.
    pub level_floor: u32,
    /// Rule constants in force.
    pub rules: PlanningRules,
}

impl PlanningContext {
    /// Creates a context with the given level floor and default rules.
    pub fn at_floor(level_floor: u32) -> Self {
        Self {
            level_floor,
            rules: PlanningRules::default(),
        }
    }

    /// Sets the rules.
    pub fn with_rules(mut self, rules: PlanningRules) -> Self {
        self.rules = rules;
        self
    }
}
