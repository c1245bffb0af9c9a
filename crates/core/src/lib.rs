//! `deptrack-core` -- pure domain logic for the dependency tracker.
//!
//! Holds the compliance rule model, the rule-definition validator, the
//! merge of server-side field errors and the dependency list filter.
//! Nothing in this crate performs I/O; callers pass pre-loaded data in.

pub mod dependency_filter;
pub mod error;
pub mod rule;
pub mod validation;
