//! Drives a [`Game`] in real time.
//!
//! Each [`Engine`] is a handle to a tokio task that owns its game outright.
//! Commands and timer ticks are handled one at a time by that task, so they
//! never interleave and nothing needs a lock.

pub mod sink;

use std::future;

use log::{debug, warn};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant},
};

pub use self::sink::EventSink;
use crate::game::{Config, Direction, Error, Game, RunState, Snapshot, Tick};

#[derive(Debug)]
enum Command {
    Start,
    Pause,
    Unpause,
    ChangeDirection(Direction),
    Snapshot(oneshot::Sender<Snapshot>),
    Destroy,
}

pub struct Engine {
    commands: mpsc::UnboundedSender<Command>,
    task:     JoinHandle<()>,
}

impl Engine {
    /// Builds a game from `config` and starts driving it.
    ///
    /// The initial board has been delivered to `sink` by the time this
    /// returns. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn create<S: EventSink>(
        config: Config,
        sink: S,
    ) -> Result<Self, Error> {
        Ok(Self::spawn(Game::new(config)?, sink))
    }

    /// Starts driving an already built game.
    pub fn spawn<S: EventSink>(mut game: Game, mut sink: S) -> Self {
        flush(&mut game, &mut sink);
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(game, sink, receiver));
        Self { commands, task }
    }

    pub fn start(&self) {
        self.send(Command::Start);
    }

    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    pub fn unpause(&self) {
        self.send(Command::Unpause);
    }

    /// Queues a turn, `0` (up) to `3` (left) clockwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDirection`] for any other value; nothing is
    /// queued in that case.
    pub fn change_direction(&self, direction: i64) -> Result<(), Error> {
        let direction = Direction::try_from(direction)?;
        self.send(Command::ChangeDirection(direction));
        Ok(())
    }

    /// The game as it stands after every command sent so far. `None` if
    /// the engine task has stopped.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply));
        response.await.ok()
    }

    /// Stops the timer and the engine task. Once this returns the sink will
    /// receive nothing more.
    pub async fn destroy(mut self) {
        self.stop().await;
    }

    /// [`Engine::destroy`] without giving up the handle, for an owner that
    /// overwrites it with a new engine straight afterwards. Must not be
    /// called again once it has returned.
    pub(crate) async fn stop(&mut self) {
        self.send(Command::Destroy);
        if let Err(e) = (&mut self.task).await {
            warn!("engine task failed: {e}");
        }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            debug!("engine task has already stopped");
        }
    }
}

fn flush<S: EventSink>(game: &mut Game, sink: &mut S) {
    for event in game.take_events() {
        sink.notify(event);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

async fn run<S: EventSink>(
    mut game: Game,
    mut sink: S,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    // When the next tick is due. `None` whenever the game is not running.
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("engine handle dropped");
                    break;
                };
                debug!("command {command:?}");
                match command {
                    Command::Start => {
                        game.start();
                    },
                    Command::Pause => {
                        game.pause();
                    },
                    Command::Unpause => {
                        game.unpause();
                    },
                    Command::ChangeDirection(direction) => {
                        game.change_direction(direction);
                    },
                    Command::Snapshot(reply) => {
                        let _ = reply.send(game.snapshot());
                    },
                    Command::Destroy => break,
                }
                deadline = match (game.state(), deadline) {
                    (RunState::Running, None) => {
                        Some(Instant::now() + game.interval())
                    },
                    (RunState::Running, Some(deadline)) => Some(deadline),
                    _ => None,
                };
            },

            () = sleep_until(deadline) => {
                deadline = match game.tick() {
                    Tick::Moved => {
                        deadline.map(|previous| previous + game.interval())
                    },
                    Tick::Scored => Some(Instant::now() + game.interval()),
                    Tick::Idle | Tick::Ended => None,
                };
            },
        }

        flush(&mut game, &mut sink);
    }

    debug!("engine stopped with a score of {}", game.score());
}
