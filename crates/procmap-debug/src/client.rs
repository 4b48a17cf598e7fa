//! Blocking client for the debug server, used by external tooling

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

use thiserror::Error;

use crate::protocol::{DebugCommand, DebugResponse, ResponseData, TileInfo};

/// Errors raised while talking to a debug server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Unexpected response: {0:?}")]
    Unexpected(ResponseData),
}

/// Line-oriented JSON connection to a running debug server
pub struct DebugClient {
    reader: BufReader<TcpStream>,
    stream: TcpStream,
}

impl DebugClient {
    /// Connect to a debug server on localhost
    pub fn connect(port: u16) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(("127.0.0.1", port))?;
        stream.set_read_timeout(Some(Duration::from_secs(30)))?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self { reader, stream })
    }

    /// Send one command and wait for its response line
    pub fn send(&mut self, cmd: &DebugCommand) -> Result<DebugResponse, ClientError> {
        let mut json = serde_json::to_string(cmd)?;
        json.push('\n');
        self.stream.write_all(json.as_bytes())?;
        self.stream.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "debug server closed connection").into());
        }
        Ok(serde_json::from_str(&line)?)
    }

    /// Fetch the currently active tiles
    pub fn get_tiles(&mut self) -> Result<Vec<TileInfo>, ClientError> {
        match self.send(&DebugCommand::GetTiles)? {
            DebugResponse::Ok { data: ResponseData::Tiles { tiles } } => Ok(tiles),
            DebugResponse::Ok { data } => Err(ClientError::Unexpected(data)),
            DebugResponse::Error { message } => Err(ClientError::Server(message)),
        }
    }
}
