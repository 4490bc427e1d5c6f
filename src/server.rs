//! HTTP surface for a browser front end: one shared game, player commands
//! as `POST`s and the game's events as a server-sent event stream.

use std::{convert::Infallible, sync::Arc};

use futures_util::{stream, Stream};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, broadcast::error::RecvError, Mutex};
use warp::{http::StatusCode, sse, Filter, Rejection, Reply};

use crate::{
    engine::Engine,
    game::{Config, Error, Event, Game, Snapshot},
};

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

impl warp::reject::Reject for Error {}

#[derive(Serialize, Debug)]
pub struct Status {
    pub name:    String,
    pub author:  String,
    pub version: String,
}

#[derive(Deserialize, Debug)]
pub struct DirectionRequest {
    pub direction: i64,
}

/// The game currently being served, and where its events go.
pub struct Session {
    engine: Engine,
    events: broadcast::Sender<Event>,
}

pub type SharedSession = Arc<Mutex<Session>>;

impl Session {
    /// Creates the first game. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub fn new(
        config: Config,
        events: broadcast::Sender<Event>,
    ) -> Result<Self, Error> {
        let engine = Engine::create(config, events.clone())?;
        Ok(Self { engine, events })
    }

    #[must_use]
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Replaces the current game with a fresh one. An invalid `config`
    /// leaves the current game running.
    ///
    /// The old engine is stopped before the new one sends its first event,
    /// so subscribers never see the two games interleave.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` fails validation.
    pub async fn new_game(&mut self, config: Config) -> Result<(), Error> {
        let game = Game::new(config)?;
        self.engine.stop().await;
        self.engine = Engine::spawn(game, self.events.clone());
        info!("new game started");
        Ok(())
    }

    pub fn start(&self) {
        self.engine.start();
    }

    pub fn pause(&self) {
        self.engine.pause();
    }

    pub fn unpause(&self) {
        self.engine.unpause();
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidDirection`] if `direction` is not `0..=3`.
    pub fn change_direction(&self, direction: i64) -> Result<(), Error> {
        self.engine.change_direction(direction)
    }

    /// `None` only if a replacement was abandoned after the old engine
    /// stopped.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.engine.snapshot().await
    }
}

fn with_session(
    session: SharedSession,
) -> impl Filter<Extract = (SharedSession,), Error = Infallible> + Clone {
    warp::any().map(move || session.clone())
}

/// All routes, with rejections for bad input turned into `400`s.
pub fn routes(
    session: SharedSession,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let status = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&Status {
            name:    NAME.to_owned(),
            author:  AUTHOR.to_owned(),
            version: VERSION.to_owned(),
        })
    });

    let start = warp::path!("start")
        .and(warp::post())
        .and(with_session(session.clone()))
        .then(|session: SharedSession| async move {
            session.lock().await.start();
            StatusCode::NO_CONTENT
        });

    let pause = warp::path!("pause")
        .and(warp::post())
        .and(with_session(session.clone()))
        .then(|session: SharedSession| async move {
            session.lock().await.pause();
            StatusCode::NO_CONTENT
        });

    let unpause = warp::path!("unpause")
        .and(warp::post())
        .and(with_session(session.clone()))
        .then(|session: SharedSession| async move {
            session.lock().await.unpause();
            StatusCode::NO_CONTENT
        });

    let direction = warp::path!("direction")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_session(session.clone()))
        .and_then(
            |request: DirectionRequest, session: SharedSession| async move {
                session
                    .lock()
                    .await
                    .change_direction(request.direction)
                    .map(|()| StatusCode::NO_CONTENT)
                    .map_err(|e| {
                        warn!("rejected direction: {e}");
                        warp::reject::custom(e)
                    })
            },
        );

    let new_game = warp::path!("new-game")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_session(session.clone()))
        .and_then(|config: Config, session: SharedSession| async move {
            session
                .lock()
                .await
                .new_game(config)
                .await
                .map(|()| StatusCode::NO_CONTENT)
                .map_err(|e| {
                    warn!("rejected new game: {e}");
                    warp::reject::custom(e)
                })
        });

    let snapshot = warp::path!("snapshot")
        .and(warp::get())
        .and(with_session(session.clone()))
        .and_then(|session: SharedSession| async move {
            match session.lock().await.snapshot().await {
                Some(snapshot) => Ok(warp::reply::json(&snapshot)),
                None => Err(warp::reject::not_found()),
            }
        });

    let events = warp::path!("events")
        .and(warp::get())
        .and(with_session(session))
        .then(|session: SharedSession| async move {
            let receiver = session.lock().await.subscribe();
            debug!("event stream subscriber connected");
            sse::reply(sse::keep_alive().stream(event_stream(receiver)))
        });

    status
        .or(start)
        .or(pause)
        .or(unpause)
        .or(direction)
        .or(new_game)
        .or(snapshot)
        .or(events)
        .recover(recover)
}

fn event_stream(
    receiver: broadcast::Receiver<Event>,
) -> impl Stream<Item = Result<sse::Event, Infallible>> + Send + 'static {
    stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    match sse::Event::default()
                        .event(event.name())
                        .json_data(&event)
                    {
                        Ok(message) => return Some((Ok(message), receiver)),
                        Err(e) => warn!("failed to encode {event:?}: {e}"),
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("event stream subscriber lagged by {skipped} events");
                },
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

async fn recover(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (message, status) = if let Some(e) = rejection.find::<Error>() {
        (e.to_string(), StatusCode::BAD_REQUEST)
    } else if rejection.is_not_found() {
        ("not found".to_owned(), StatusCode::NOT_FOUND)
    } else if let Some(e) =
        rejection.find::<warp::filters::body::BodyDeserializeError>()
    {
        (e.to_string(), StatusCode::BAD_REQUEST)
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        ("method not allowed".to_owned(), StatusCode::METHOD_NOT_ALLOWED)
    } else {
        warn!("unhandled rejection: {rejection:?}");
        ("internal error".to_owned(), StatusCode::INTERNAL_SERVER_ERROR)
    };
    Ok(warp::reply::with_status(message, status))
}
