#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod model;
pub mod ranking;
pub mod time;

pub use engine::{Advance, Prompt, QuizEngine, QuizEvent, QuizPhase, Step, Transition};
pub use error::{Error, QuizError};
pub use ranking::{DEFAULT_TOP_LIMIT, RankingService};
pub use time::Clock;
