//! Structural features detected in submitted source code.

use std::fmt;

/// One structural signal that the fallback synthesizer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `for`, `while` or `do { ... }` loops.
    Loop,
    /// `if`, `else`, `switch` or `case` branching.
    Condition,
    /// Function or class definitions.
    Function,
    /// `try`, `catch`, `except` or `finally` blocks.
    TryCatch,
    /// `async`, `await`, promises and continuations.
    Async,
}

impl Feature {
    /// Every feature, in detection order.
    pub const ALL: [Feature; 5] = [
        Feature::Loop,
        Feature::Condition,
        Feature::Function,
        Feature::TryCatch,
        Feature::Async,
    ];

    /// Human readable name used in reports and explanations.
    pub fn description(&self) -> &'static str {
        match self {
            Feature::Loop => "Iterative Loops",
            Feature::Condition => "Conditional Logic",
            Feature::Function => "Function/Class Definitions",
            Feature::TryCatch => "Error Handling",
            Feature::Async => "Asynchronous Code",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The set of features detected in one piece of source code.
///
/// Computed once per synthesis and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    has_loop: bool,
    has_condition: bool,
    has_function: bool,
    has_try_catch: bool,
    has_async: bool,
}

impl FeatureFlags {
    /// No features detected.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every feature detected.
    pub fn all() -> Self {
        Feature::ALL
            .into_iter()
            .fold(Self::none(), |flags, feature| flags.with(feature, true))
    }

    /// Returns a copy with `feature` set to `present`.
    pub fn with(mut self, feature: Feature, present: bool) -> Self {
        match feature {
            Feature::Loop => self.has_loop = present,
            Feature::Condition => self.has_condition = present,
            Feature::Function => self.has_function = present,
            Feature::TryCatch => self.has_try_catch = present,
            Feature::Async => self.has_async = present,
        }
        self
    }

    /// Returns whether `feature` was detected.
    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Loop => self.has_loop,
            Feature::Condition => self.has_condition,
            Feature::Function => self.has_function,
            Feature::TryCatch => self.has_try_catch,
            Feature::Async => self.has_async,
        }
    }

    pub fn has_loop(&self) -> bool {
        self.has_loop
    }

    pub fn has_condition(&self) -> bool {
        self.has_condition
    }

    pub fn has_function(&self) -> bool {
        self.has_function
    }

    pub fn has_try_catch(&self) -> bool {
        self.has_try_catch
    }

    pub fn has_async(&self) -> bool {
        self.has_async
    }

    /// Iterates over the detected features in detection order.
    pub fn detected(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.into_iter().filter(|feature| self.has(*feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_all() {
        assert_eq!(FeatureFlags::none().detected().count(), 0);
        assert_eq!(FeatureFlags::all().detected().count(), 5);
    }

    #[test]
    fn test_with_sets_single_flag() {
        let flags = FeatureFlags::none().with(Feature::TryCatch, true);
        assert!(flags.has_try_catch());
        assert!(!flags.has_loop());
        assert_eq!(flags.detected().collect::<Vec<_>>(), vec![Feature::TryCatch]);

        let cleared = flags.with(Feature::TryCatch, false);
        assert_eq!(cleared, FeatureFlags::none());
    }
}
