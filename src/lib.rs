#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::cast_possible_truncation, // sides are capped at Config::MAX_SIDE
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]
pub mod engine;
pub mod game;
pub mod server;
