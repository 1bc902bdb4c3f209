//! Step definitions and execution.
//!
//! A step is one verification or transformation unit: a command computed
//! from the [`Snapshot`](crate::snapshot::Snapshot), an exit code it must
//! produce, predicates that make it inapplicable, and an optional side effect
//! after success.
//!
//! # Module Organization
//!
//! - [`types`] - [`StepDefinition`], [`StepCategory`], [`StepOutcome`]
//! - [`skip`] - Canonical skip predicates
//! - [`preset`] - The built-in [`Preset`] steps
//! - [`post_action`] - Side effects run after success
//! - [`runner`] - Running one step
//! - [`progress`] - Progress lines

mod post_action;
mod preset;
mod progress;
mod runner;
mod skip;
mod types;

pub use preset::Preset;
pub use types::{StepCategory, StepDefinition, StepOutcome};
