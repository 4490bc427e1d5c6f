//! The snake game itself: grid, snake, fruit and the rules that move them.
//! Nothing in here knows about time; see [`crate::engine`] for the clock.

pub mod board;
pub mod error;
pub mod models;
pub mod snake;
pub mod state;
pub mod types;

pub use error::Error;
pub use models::{Config, Event, RunState, Snapshot, WallMode};
pub use state::{Game, Tick};
pub use types::{Coord, Direction};
