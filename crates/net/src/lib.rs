//! Domus Network Library
//!
//! Provides the TCP request/response service boundary for Domus.
//!
//! # Architecture
//!
//! - **Server**: accepts connections, frames requests, dispatches to a
//!   `RequestHandler`
//! - **Client**: connects and issues one request per call
//! - **Protocol**: length-prefixed JSON messages; wire types mirror core
//!   models but stay decoupled
//!
//! # Usage
//!
//! ```ignore
//! // Service side
//! let server = Server::start(7431, handler).await?;
//!
//! // Client side
//! let mut client = Client::connect(addr).await?;
//! let response = client.request(&Request::Ping).await?;
//! ```

pub mod client;
pub mod error;
mod frame;
pub mod protocol;
pub mod server;

pub use client::Client;
pub use error::{Error, Result};
pub use protocol::{
    ActorInfo, ApplicationInfo, CohortSpec, EntityInfo, HostelKind, Request, Response, RoleKind,
    VacancyInfo,
};
pub use server::{RequestHandler, Server};

/// Default port for Domus servers
pub const DEFAULT_PORT: u16 = 7431;
