//! Structural feature detection over raw source text.
//!
//! Each feature has an independent, case-sensitive, unanchored pattern. The
//! patterns are deliberately coarse: `if` also matches inside `verify` and
//! `for` inside `format`, which only ever adds structure to the diagram.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use codeflow_core::features::{Feature, FeatureFlags};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex")
}

static LOOP: LazyLock<Regex> = LazyLock::new(|| compile(r"for|while|do\s*\{"));
static CONDITION: LazyLock<Regex> = LazyLock::new(|| compile(r"if|else|switch|case"));
static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"def |function|class|public\s+\w+\s+\w+\s*\("));
static TRY_CATCH: LazyLock<Regex> = LazyLock::new(|| compile(r"try|catch|except|finally"));
static ASYNC: LazyLock<Regex> = LazyLock::new(|| compile(r"async|await|Promise|then"));

fn pattern(feature: Feature) -> &'static Regex {
    match feature {
        Feature::Loop => &LOOP,
        Feature::Condition => &CONDITION,
        Feature::Function => &FUNCTION,
        Feature::TryCatch => &TRY_CATCH,
        Feature::Async => &ASYNC,
    }
}

/// Match every feature pattern against `source`.
pub(crate) fn detect(source: &str) -> FeatureFlags {
    let flags = Feature::ALL.into_iter().fold(FeatureFlags::none(), |flags, feature| {
        flags.with(feature, pattern(feature).is_match(source))
    });

    debug!(
        has_loop = flags.has_loop(),
        has_condition = flags.has_condition(),
        has_function = flags.has_function(),
        has_try_catch = flags.has_try_catch(),
        has_async = flags.has_async();
        "Detected source features"
    );
    flags
}
