/// Learning agents and the trial loop they take part in
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Route planning
pub mod planner;

/// State encoding
pub mod state;

/// Grid world with traffic, and a driver running trials in it
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use agent::{Agent, LearningAgent};
pub use error::{Error, Result};
