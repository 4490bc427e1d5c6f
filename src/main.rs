use std::env;

use color_eyre::{eyre::WrapErr, Result};
use log::info;
use portal_snake::{
    game::Config,
    server::{self, Session},
};
use tokio::sync::broadcast;
use warp::{http::Method, Filter};

const NAME: &str = env!("CARGO_PKG_NAME");
const DEFAULT_PORT: u16 = 6502;
const EVENT_BUFFER: usize = 1024;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    #[cfg(debug_assertions)]
    info!("running in debug mode");

    #[cfg(not(debug_assertions))]
    info!("running in release mode");

    let port = match env::var("PORT") {
        Ok(port) => port
            .parse()
            .wrap_err_with(|| format!("PORT={port} is not a valid port"))?,
        Err(_) => DEFAULT_PORT,
    };

    let (events, _) = broadcast::channel(EVENT_BUFFER);
    let session = Session::new(Config::default(), events)?.shared();

    let cors = warp::cors()
        .allow_method(Method::GET)
        .allow_method(Method::POST)
        .allow_header("content-type")
        .allow_any_origin();

    let logging = warp::log(NAME);

    let api = server::routes(session).with(cors).with(logging);

    info!("listening on port {port}");
    warp::serve(api).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
