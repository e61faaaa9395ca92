pub mod config;
pub mod errors;
pub mod game_events;
pub mod game_state;
pub mod guess_validation;
pub mod presentation;
pub mod session;
pub mod stats;
pub mod word_bank;

// Re-export main components
pub use config::*;
pub use errors::*;
pub use game_events::*;
pub use game_state::*;
pub use guess_validation::*;
pub use presentation::*;
pub use session::*;
pub use stats::*;
pub use word_bank::*;
