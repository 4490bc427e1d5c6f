use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{
    error::Error,
    types::{Coord, Direction},
};

/// What happens when the snake's head leaves the grid.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WallMode {
    /// Leaving the grid ends the game.
    Solid,
    /// Leaving the grid re-enters from the opposite edge.
    Portal,
}

/// Parameters of a single game, fixed once the game exists.
///
/// Every field is optional when deserialized; missing fields take the
/// [`Default`] values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub width:                 i64,
    pub height:                i64,
    pub base_interval_ms:      f64,
    pub interval_decrement_ms: f64,
    pub interval_floor_ms:     f64,
    pub starting_length:       i64,
    pub starting_direction:    i64,
    pub walls:                 WallMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width:                 20,
            height:                20,
            base_interval_ms:      125.0,
            interval_decrement_ms: 2.5,
            interval_floor_ms:     37.5,
            starting_length:       3,
            starting_direction:    Direction::Right as i64,
            walls:                 WallMode::Portal,
        }
    }
}

impl Config {
    pub const MIN_SIDE: i64 = 6;
    pub const MAX_SIDE: i64 = 1000;
    pub const MAX_STARTING_LENGTH: i64 = 5;

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first field that is
    /// out of range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width < Self::MIN_SIDE {
            return Err(Error::config("width", "must be above 5"));
        }
        if self.height < Self::MIN_SIDE {
            return Err(Error::config("height", "must be above 5"));
        }
        if self.width > Self::MAX_SIDE {
            return Err(Error::config("width", "must be at most 1000"));
        }
        if self.height > Self::MAX_SIDE {
            return Err(Error::config("height", "must be at most 1000"));
        }
        if !is_positive(self.base_interval_ms) {
            return Err(Error::config(
                "base_interval_ms",
                "must be a positive number",
            ));
        }
        if !is_positive(self.interval_decrement_ms) {
            return Err(Error::config(
                "interval_decrement_ms",
                "must be a positive number",
            ));
        }
        if self.interval_decrement_ms >= self.base_interval_ms {
            return Err(Error::config(
                "interval_decrement_ms",
                "must be less than base_interval_ms",
            ));
        }
        if !is_positive(self.interval_floor_ms) {
            return Err(Error::config(
                "interval_floor_ms",
                "must be a positive number",
            ));
        }
        if self.interval_floor_ms >= self.base_interval_ms {
            return Err(Error::config(
                "interval_floor_ms",
                "must be less than base_interval_ms",
            ));
        }
        if !(1..=Self::MAX_STARTING_LENGTH).contains(&self.starting_length) {
            return Err(Error::config(
                "starting_length",
                "must be between 1 and 5",
            ));
        }
        self.direction()?;
        Ok(())
    }

    pub(crate) fn direction(&self) -> Result<Direction, Error> {
        Direction::try_from(self.starting_direction).map_err(|_| {
            Error::config(
                "starting_direction",
                "must be between 0 (up) and 3 (left)",
            )
        })
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Running,
    Paused,
    Ended,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RunState::NotStarted => "Ready to start",
                RunState::Running => "Running...",
                RunState::Paused => "Paused",
                RunState::Ended => "Game Over",
            }
        )
    }
}

/// A change the presentation layer should reflect.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CellOccupied { coord: Coord },
    CellCleared { coord: Coord },
    FruitPlaced { coord: Coord },
    ScoreChanged { score: u64 },
    StatusChanged { state: RunState, message: String },
    GameEnded { score: u64 },
}

impl Event {
    pub(crate) fn status(state: RunState) -> Self {
        Self::StatusChanged {
            state,
            message: state.to_string(),
        }
    }

    /// The serialized `type` tag, also used as the SSE event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CellOccupied { .. } => "cell_occupied",
            Self::CellCleared { .. } => "cell_cleared",
            Self::FruitPlaced { .. } => "fruit_placed",
            Self::ScoreChanged { .. } => "score_changed",
            Self::StatusChanged { .. } => "status_changed",
            Self::GameEnded { .. } => "game_ended",
        }
    }
}

/// Everything needed to draw a game from scratch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width:       i64,
    pub height:      i64,
    /// Tail first, head last.
    pub snake:       Vec<Coord>,
    pub fruit:       Option<Coord>,
    pub score:       u64,
    pub state:       RunState,
    pub interval_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &Config) -> &'static str {
        match config.validate() {
            Err(Error::InvalidConfiguration { field, .. }) => field,
            other => panic!("expected invalid configuration, got {other:?}"),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn every_length_and_direction_is_valid() {
        for starting_length in 1..=5 {
            for starting_direction in 0..=3 {
                let config = Config {
                    starting_length,
                    starting_direction,
                    walls: WallMode::Solid,
                    ..Config::default()
                };
                assert_eq!(config.validate(), Ok(()));
            }
        }
    }

    #[test]
    fn small_grids_are_rejected() {
        let config = Config {
            width: 5,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "width");

        let config = Config {
            height: 5,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "height");

        let config = Config {
            width: 6,
            height: 6,
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn huge_grids_are_rejected() {
        let config = Config {
            width: 3_037_000_500,
            height: 3_037_000_500,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "width");

        let config = Config {
            height: i64::MAX,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "height");

        let config = Config {
            width: Config::MAX_SIDE,
            height: Config::MAX_SIDE,
            ..Config::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn intervals_must_be_positive() {
        let config = Config {
            base_interval_ms: 0.0,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "base_interval_ms");

        let config = Config {
            interval_decrement_ms: -1.0,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "interval_decrement_ms");

        let config = Config {
            interval_floor_ms: f64::NAN,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "interval_floor_ms");
    }

    #[test]
    fn decrement_and_floor_must_be_below_base() {
        let config = Config {
            interval_decrement_ms: 125.0,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "interval_decrement_ms");

        let config = Config {
            interval_floor_ms: 130.0,
            ..Config::default()
        };
        assert_eq!(invalid_field(&config), "interval_floor_ms");
    }

    #[test]
    fn starting_length_and_direction_ranges() {
        for starting_length in [0, 6, -2] {
            let config = Config {
                starting_length,
                ..Config::default()
            };
            assert_eq!(invalid_field(&config), "starting_length");
        }
        for starting_direction in [-1, 4] {
            let config = Config {
                starting_direction,
                ..Config::default()
            };
            assert_eq!(invalid_field(&config), "starting_direction");
        }
    }

    #[test]
    fn config_fields_default_when_missing() {
        let config: Config =
            serde_json::from_str(r#"{"width": 30, "walls": "solid"}"#)
                .expect("config should parse");
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 20);
        assert_eq!(config.walls, WallMode::Solid);
    }

    #[test]
    fn events_are_tagged_by_name() {
        let event = Event::CellOccupied {
            coord: Coord::new(2, 3),
        };
        let json = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(json["type"], event.name());
        assert_eq!(json["coord"]["x"], 2);
        assert_eq!(json["coord"]["y"], 3);
    }
}
