//! Decision plans: the compiled form of a phase tree, and the policy that
//! picks among matching entries.

mod compiler;
mod conflict;

pub use compiler::{DecisionPlan, DecisionPlanEntry, EntrySummary, PlanSummary};
pub use conflict::{select, Candidate, ConflictError, ConflictingEntry};
