pub mod types;
pub mod error;
pub mod utils;
pub mod state;
pub mod engine;
pub mod ai;

pub mod entities;
pub mod track;
pub mod systems;

pub use engine::{ActionOutcome, ActionResult, GameEngine, OutcomeDetail};
pub use error::{ActionError, SetupError};
pub use state::GameState;
