//! Debug tools for procmap - TCP debug server for remote inspection of the
//! streamed map
//!
//! Start the debug server in your host loop:
//! ```ignore
//! let handler = Arc::new(Mutex::new(MyHandler::new()));
//! let _server = DebugServer::start(handler, 9743);
//! ```
//!
//! External tooling talks to it with [`DebugClient`], e.g. to list the
//! currently active tiles.

pub mod client;
pub mod protocol;
pub mod server;

pub use client::{ClientError, DebugClient};
pub use protocol::*;
pub use server::{DebugHandler, DebugServer};

/// Default debug server port
pub const DEFAULT_PORT: u16 = 9743;
