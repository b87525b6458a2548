//! TCP client for the Domus service
//!
//! One connection, one in-flight request at a time. The caller owns
//! sequencing; there is no background event loop to manage.

use std::net::SocketAddr;

use tokio::net::TcpStream;
use tracing::debug;

use crate::error::Result;
use crate::frame::{read_frame, write_frame};
use crate::protocol::{Request, Response};

/// Connected service client
pub struct Client {
    stream: TcpStream,
}

impl Client {
    /// Connect to a Domus server
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        debug!(addr = %addr, "Connected");
        Ok(Self { stream })
    }

    /// Send one request and await its response
    pub async fn request(&mut self, request: &Request) -> Result<Response> {
        write_frame(&mut self.stream, request).await?;
        read_frame(&mut self.stream).await
    }
}
