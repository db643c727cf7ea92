//! Domain layer: reference parsing, strategy contract and resolution outcomes.
//!
//! Nothing here performs I/O. Concrete strategies live in
//! [`crate::infrastructure::strategies`] and the chain executor in
//! [`crate::application::services`].
//!
//! # Resolution Flow
//!
//! 1. [`reference::parse`] turns the inbound link into a [`reference::PostReference`]
//! 2. Each [`strategy::Strategy`] attempts extraction under an [`strategy::ExecutionContext`]
//! 3. The chain stops at the first [`outcome::StrategyOutcome::Found`]
//! 4. Otherwise every [`outcome::Attempt`] is returned in [`outcome::Resolution::Exhausted`]

pub mod outcome;
pub mod reference;
pub mod strategy;

pub use outcome::{Attempt, Resolution, ResolveError, StrategyFailure, StrategyOutcome};
pub use reference::{ParseError, PostKind, PostReference, Shortcode, parse};
pub use strategy::{ExecutionContext, Strategy};
