#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Win/loss evaluator that concludes a level once its end condition holds.

use ghostlane_core::{Command, GameStatus, Outcome, ProgressSnapshot};

/// Pure system that inspects level progress after all frame resolution.
#[derive(Debug, Default)]
pub struct OutcomeEvaluator;

impl OutcomeEvaluator {
    /// Creates a new evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Pushes [`Command::ConcludeLevel`] when the running level has been won or lost.
    ///
    /// Defeat takes precedence when both conditions hold on the same frame.
    pub fn handle(&self, progress: &ProgressSnapshot, out: &mut Vec<Command>) {
        if let Some(outcome) = evaluate(progress) {
            out.push(Command::ConcludeLevel { outcome });
        }
    }
}

/// Returns the outcome reached by the level, if any.
///
/// Only a playing level can conclude, which keeps both transitions idempotent.
#[must_use]
pub fn evaluate(progress: &ProgressSnapshot) -> Option<Outcome> {
    if progress.status != GameStatus::Playing {
        return None;
    }
    if progress.lives == 0 {
        return Some(Outcome::Defeat);
    }
    if progress.spawned >= progress.quota && progress.ghosts_remaining == 0 {
        return Some(Outcome::Victory);
    }
    None
}
