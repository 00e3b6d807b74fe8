//! Pure policy evaluation (no IO).
//!
//! Input: a typed submission (or raw evidence signals) plus an immutable [`policy::Policy`].
//! Output: a decision, classified evidence, or an aggregated verdict.

#![forbid(unsafe_code)]

pub mod cost;
pub mod evidence;
pub mod model;
pub mod policy;
pub mod verdict;

mod engine;
mod rules;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{evaluate, evaluate_all};
pub use verdict::aggregate;
