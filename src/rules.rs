//! Institutional planning rules shared by the planner and the validators.
//!
//! The defaults encode the current policy: at most 32 credits per semester,
//! a level spread of at most 3 inside one semester, a 20-semester horizon,
//! and mandatory retaking after 3 attempts.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default credit cap per semester.
pub const DEFAULT_MAX_CREDITS: u32 = 32;
/// Default maximum level spread inside one semester.
pub const DEFAULT_MAX_LEVEL_SPREAD: u32 = 3;
/// Default planning horizon.
pub const DEFAULT_MAX_SEMESTERS: u32 = 20;
/// Default attempt count from which a course must be retaken next.
pub const DEFAULT_RETAKE_THRESHOLD: u32 = 3;

/// Rule constants for one curriculum.
///
/// # Example
/// ```
/// use u_curriculum::rules::PlanningRules;
///
/// let rules = PlanningRules::default().with_max_credits(30);
/// assert_eq!(rules.max_credits, 30);
/// assert_eq!(rules.max_level_spread, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningRules {
    /// Credit cap per semester (inclusive).
    pub max_credits: u32,
    /// Maximum `max(level) - min(level)` inside a semester (inclusive).
    pub max_level_spread: u32,
    /// Safety bound on the number of semesters the planner emits.
    pub max_semesters: u32,
    /// Attempt count from which a course is scheduled first.
    pub retake_threshold: u32,
}

impl Default for PlanningRules {
    fn default() -> Self {
        Self {
            max_credits: DEFAULT_MAX_CREDITS,
            max_level_spread: DEFAULT_MAX_LEVEL_SPREAD,
            max_semesters: DEFAULT_MAX_SEMESTERS,
            retake_threshold: DEFAULT_RETAKE_THRESHOLD,
        }
    }
}

impl PlanningRules {
    /// Sets the credit cap.
    pub fn with_max_credits(mut self, credits: u32) -> Self {
        self.max_credits = credits;
        self
    }

    /// Sets the level spread window.
    pub fn with_max_level_spread(mut self, spread: u32) -> Self {
        self.max_level_spread = spread;
        self
    }

    /// Sets the semester horizon.
    pub fn with_max_semesters(mut self, semesters: u32) -> Self {
        self.max_semesters = semesters;
        self
    }

    /// Sets the retake threshold.
    pub fn with_retake_threshold(mut self, attempts: u32) -> Self {
        self.retake_threshold = attempts;
        self
    }

    /// Parses rules from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Checks the rules can produce a plan at all.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_credits == 0 {
            return Err(Error::InvalidRules("max_credits must be positive".into()));
        }
        if self.max_semesters == 0 {
            return Err(Error::InvalidRules("max_semesters must be positive".into()));
        }
        Ok(())
    }

    /// Whether `credits` fit under the cap.
    #[inline]
    pub fn fits_credits(&self, credits: u32) -> bool {
        credits <= self.max_credits
    }

    /// Whether a set of levels stays inside the dispersion window.
    pub fn fits_spread<I: IntoIterator<Item = u32>>(&self, levels: I) -> bool {
        level_spread(levels) <= self.max_level_spread
    }

    /// Whether `level` is inside the dispersion window opened at `floor`.
    #[inline]
    pub fn within_window(&self, level: u32, floor: u32) -> bool {
        level < floor.saturating_add(self.max_level_spread)
    }

    /// Whether a course attempted `attempts` times must be retaken next.
    #[inline]
    pub fn must_retake(&self, attempts: u32) -> bool {
        attempts >= self.retake_threshold
    }
}

/// `max - min` over `levels`; zero for an empty input.
pub fn level_spread<I: IntoIterator<Item = u32>>(levels: I) -> u32 {
    let mut bounds: Option<(u32, u32)> = None;
    for level in levels {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(level), hi.max(level)),
            None => (level, level),
        });
    }
    bounds.map(|(lo, hi)| hi - lo).unwrap_or(0)
}
