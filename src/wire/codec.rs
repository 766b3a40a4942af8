//! Message framing shared by both channels.
//!
//! Every message is a JSON document preceded by a `Content-Length` header
//! line and a blank line. Headers the reader does not recognize are skipped.

use crate::debugger::error::Error;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Largest message body the codec accepts. A bigger length claim is a
/// framing error, not an allocation.
const MAX_CONTENT_LENGTH: usize = 8 * 1024 * 1024;

/// Read one framed message and decode it.
pub fn read_message<T, R>(reader: &mut R) -> Result<T, Error>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let read_n = reader.read_line(&mut line)?;
        if read_n == 0 {
            return Err(Error::ConnectionClosed);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some(v) = line.strip_prefix("Content-Length:") {
            content_length = Some(
                v.trim()
                    .parse()
                    .map_err(|_| Error::Frame("invalid Content-Length header"))?,
            );
        }
    }

    let len = content_length.ok_or(Error::Frame("missing Content-Length header"))?;
    if len > MAX_CONTENT_LENGTH {
        return Err(Error::Frame("oversized Content-Length header"));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(serde_json::from_slice(&buf)?)
}

/// Encode one message and write it framed.
pub fn write_message<T, W>(writer: &mut W, message: &T) -> Result<(), Error>
where
    T: Serialize,
    W: Write,
{
    let payload = serde_json::to_vec(message)?;
    write!(writer, "Content-Length: {}\r\n\r\n", payload.len())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

/// One established channel connection.
pub struct Connection {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Result<Self, Error> {
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self { stream, reader })
    }

    /// Like [`Connection::new`] but with read and write deadlines, so one
    /// stuck peer cannot hold a channel thread forever.
    pub fn with_timeout(stream: TcpStream, timeout: Duration) -> Result<Self, Error> {
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        Self::new(stream)
    }

    pub fn read<T: DeserializeOwned>(&mut self) -> Result<T, Error> {
        read_message(&mut self.reader)
    }

    pub fn write<T: Serialize>(&mut self, message: &T) -> Result<(), Error> {
        write_message(&mut self.stream, message)
    }
}
