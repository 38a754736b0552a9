//! Use cases orchestrating the deliberation pipeline

pub mod moderate_content;
pub mod refine_goal;
pub mod run_debate;

#[cfg(test)]
pub(crate) mod test_support;

pub use moderate_content::ModerationClassifier;
pub use refine_goal::{RefineError, RefinementStep, SocraticRefiner, StartedRefinement};
pub use run_debate::{
    DebateEngine, DebateError, MAX_CONSENSUS_ITERATIONS, UNAVAILABLE_SENTINEL,
};
