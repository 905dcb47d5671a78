//! Insight policy: variance bands and rule cutoffs.
//!
//! Policies are structured data validated against an embedded JSON Schema.
//! `Policy::default()` reproduces the cutoffs the dashboard shipped with.

mod parser;
mod schema;

pub use parser::{ChefPolicy, GmPolicy, GmRuleMode, OwnerPolicy, Policy, PolicyError};
pub use schema::validate_policy_schema;
