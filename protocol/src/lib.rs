//! Wire messages of the browser front end and the server-side glue that keeps one
//! [`MinesweeperEnv`](minegym_core::MinesweeperEnv) per game id in a [`GameStore`].

pub use error::*;
pub use message::*;
pub use service::*;
pub use store::*;

mod error;
mod message;
mod service;
mod store;
