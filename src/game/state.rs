use std::{collections::VecDeque, fmt, time::Duration};

use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::game::{
    board::Board,
    error::Error,
    models::{Config, Event, RunState, Snapshot, WallMode},
    snake::Snake,
    types::{Coord, Direction},
};

/// What a call to [`Game::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The game was not running; nothing changed.
    Idle,
    /// The snake moved one cell.
    Moved,
    /// The snake moved onto the fruit. The interval may have changed.
    Scored,
    /// The snake hit a wall or itself and the game is over.
    Ended,
}

/// One game of snake.
///
/// `Game` has no clock of its own: something else calls [`Game::tick`] every
/// [`Game::interval`]. Every visible change is queued as an [`Event`] and
/// handed out by [`Game::take_events`].
#[derive(Clone, Debug)]
pub struct Game {
    config:    Config,
    board:     Board,
    snake:     Snake,
    fruit:     Option<Coord>,
    direction: Direction,
    pending:   VecDeque<Direction>,
    interval:  f64,
    score:     u64,
    state:     RunState,
    rng:       StdRng,
    events:    Vec<Event>,
}

impl Game {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Like [`Game::new`] with a seeded generator, for reproducible fruit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn seeded(config: Config, seed: u64) -> Result<Self, Error> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn with_rng(config: Config, rng: StdRng) -> Result<Self, Error> {
        config.validate()?;
        let direction = config.direction()?;
        let board = Board {
            width:  config.width,
            height: config.height,
        };
        let snake = Snake::starting(board, direction, config.starting_length);

        let mut game = Self {
            interval: config.base_interval_ms,
            config,
            board,
            snake,
            fruit: None,
            direction,
            pending: VecDeque::new(),
            score: 0,
            state: RunState::NotStarted,
            rng,
            events: Vec::new(),
        };

        for cell in game.snake.cells() {
            game.events.push(Event::CellOccupied { coord: *cell });
        }
        game.fruit = game.place_fruit();
        if let Some(coord) = game.fruit {
            game.events.push(Event::FruitPlaced { coord });
        }
        game.events.push(Event::ScoreChanged { score: 0 });
        game.events.push(Event::status(RunState::NotStarted));

        debug!(
            "new {}x{} game, snake {}, fruit at {:?}",
            board.width,
            board.height,
            game.snake.describe(),
            game.fruit
        );

        Ok(game)
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn fruit(&self) -> Option<Coord> {
        self.fruit
    }

    #[must_use]
    pub const fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Current tick interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> f64 {
        self.interval
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_nanos((self.interval * 1_000_000.0).round() as u64)
    }

    #[must_use]
    pub fn pending_directions(&self) -> usize {
        self.pending.len()
    }

    /// Drains the queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width:       self.board.width,
            height:      self.board.height,
            snake:       self.snake.cells().copied().collect(),
            fruit:       self.fruit,
            score:       self.score,
            state:       self.state,
            interval_ms: self.interval,
        }
    }

    /// `NotStarted -> Running`. Returns whether the transition happened.
    pub fn start(&mut self) -> bool {
        self.transition(RunState::NotStarted, RunState::Running)
    }

    /// `Running -> Paused`. Returns whether the transition happened.
    pub fn pause(&mut self) -> bool {
        self.transition(RunState::Running, RunState::Paused)
    }

    /// `Paused -> Running`. Returns whether the transition happened.
    pub fn unpause(&mut self) -> bool {
        self.transition(RunState::Paused, RunState::Running)
    }

    fn transition(&mut self, from: RunState, to: RunState) -> bool {
        if self.state != from {
            debug!("ignoring {from:?} -> {to:?} while {:?}", self.state);
            return false;
        }
        debug!("{from:?} -> {to:?}");
        self.state = to;
        self.events.push(Event::status(to));
        true
    }

    /// Queues a turn for a later tick. Turns are dropped while paused or
    /// after the game has ended. Returns whether the turn was queued.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if matches!(self.state, RunState::Paused | RunState::Ended) {
            debug!("dropping {direction} while {:?}", self.state);
            return false;
        }
        self.pending.push_back(direction);
        true
    }

    /// Advances the game by one step.
    pub fn tick(&mut self) -> Tick {
        if self.state != RunState::Running {
            return Tick::Idle;
        }
        let Some(head) = self.snake.head() else {
            return self.end();
        };

        let facing = self.snake.facing();
        if let Some(requested) = self.pending.pop_front() {
            if facing.map_or(true, |facing| facing.opposite() != requested) {
                self.direction = requested;
            } else {
                trace!("ignoring reversal to {requested}, facing {facing:?}");
            }
        }

        let mut next = head.neighbour(self.direction);
        if !self.board.contains(next) {
            match self.config.walls {
                WallMode::Solid => {
                    debug!("hit the wall leaving {head} {}", self.direction);
                    return self.end();
                },
                WallMode::Portal => next = self.board.wrap(next),
            }
        }

        let Some(tail) = self.snake.pop_tail() else {
            return self.end();
        };
        if self.snake.contains(next) {
            self.snake.regrow(tail);
            debug!("ran into itself at {next}");
            return self.end();
        }
        self.snake.push_head(next);
        self.events.push(Event::CellCleared { coord: tail });
        self.events.push(Event::CellOccupied { coord: next });

        let outcome = if self.fruit == Some(next) {
            self.eat(tail)
        } else {
            Tick::Moved
        };

        trace!("tick {outcome:?}, score {}\n{}", self.score, self);

        outcome
    }

    fn eat(&mut self, tail: Coord) -> Tick {
        self.snake.regrow(tail);
        self.events.push(Event::CellOccupied { coord: tail });
        self.score_point();

        self.fruit = self.place_fruit();
        match self.fruit {
            Some(coord) => {
                self.events.push(Event::FruitPlaced { coord });
                Tick::Scored
            },
            None => {
                info!("the snake fills the whole grid");
                self.end()
            },
        }
    }

    fn score_point(&mut self) {
        self.score += 1;
        self.interval = (self.interval - self.config.interval_decrement_ms)
            .max(self.config.interval_floor_ms);
        self.events.push(Event::ScoreChanged { score: self.score });
        debug!(
            "scored {}, next interval {} ms",
            self.score, self.interval
        );
    }

    fn end(&mut self) -> Tick {
        self.state = RunState::Ended;
        self.pending.clear();
        self.events.push(Event::status(RunState::Ended));
        self.events.push(Event::GameEnded { score: self.score });
        info!("game over with a score of {}", self.score);
        Tick::Ended
    }

    /// Samples cells uniformly until one is free. `None` if the snake covers
    /// the whole grid.
    fn place_fruit(&mut self) -> Option<Coord> {
        let area = self.board.area();
        if self.snake.len() >= area {
            return None;
        }
        loop {
            let coord = self.board.coord(self.rng.gen_range(0..area));
            if !self.snake.contains(coord) {
                return Some(coord);
            }
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.snake.head();
        for y in 0..self.board.height {
            for x in 0..self.board.width {
                let c = Coord { x, y };
                if head == Some(c) {
                    write!(f, "@")?;
                } else if self.snake.contains(c) {
                    write!(f, "#")?;
                } else if self.fruit == Some(c) {
                    write!(f, "*")?;
                } else {
                    write!(f, ".")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
