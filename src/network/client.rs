//! UDP Client
//!
//! Sends one command per datagram and decodes the reply. A client is meant
//! to be used sequentially: there is no request/reply correlation, so the
//! next datagram received is taken as the answer to the last command sent.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::config::{Config, DEFAULT_BUFFER_SIZE};
use crate::error::{JigError, Result};
use crate::protocol::{decode_value, encode_request, Value};

/// Client for the jig command server
pub struct Client {
    /// Ephemeral local socket
    socket: UdpSocket,

    /// Resolved server address
    server: SocketAddr,

    timeout: Duration,

    buffer_size: usize,
}

impl Client {
    /// Create a client for `addr` with the given reply timeout
    pub fn connect<A: ToSocketAddrs>(addr: A, timeout: Duration) -> Result<Self> {
        let server = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| JigError::Config("server address resolved to nothing".to_string()))?;

        let local: SocketAddr = if server.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;

        let mut client = Self {
            socket,
            server,
            timeout,
            buffer_size: DEFAULT_BUFFER_SIZE,
        };
        client.set_timeout(timeout)?;

        tracing::debug!("client bound to {} for {}", client.socket.local_addr()?, server);
        Ok(client)
    }

    /// Create a client from `server_addr`, `recv_timeout_ms` and `recv_buffer_size`
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::connect(config.server_addr.as_str(), config.recv_timeout())?;
        client.buffer_size = config.recv_buffer_size;
        Ok(client)
    }

    /// Change the reply timeout (must be non-zero)
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout.is_zero() {
            return Err(JigError::Config("timeout must be non-zero".to_string()));
        }
        self.socket.set_read_timeout(Some(timeout))?;
        self.timeout = timeout;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    /// Send a command line as one datagram
    pub fn send(&self, command: &str) -> Result<()> {
        let bytes = encode_request(command);
        tracing::trace!("sending {:?} to {}", bytes, self.server);
        self.socket.send_to(&bytes, self.server)?;
        Ok(())
    }

    /// Wait for the next reply and decode it
    pub fn receive(&self) -> Result<Value> {
        let mut buf = vec![0u8; self.buffer_size];

        let (len, peer) = match self.socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                return Err(JigError::Timeout(self.timeout));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::trace!("received {:?} from {}", String::from_utf8_lossy(&buf[..len]), peer);
        decode_value(&buf[..len])
    }

    /// Send a command and wait for its reply
    pub fn query(&self, command: &str) -> Result<Value> {
        self.send(command)?;
        self.receive()
    }

    /// Query a command that answers with a float (integers are widened)
    pub fn query_float(&self, command: &str) -> Result<f64> {
        let value = self.query(command)?;
        value.as_float().ok_or_else(|| mismatch(',', value))
    }

    pub fn query_int(&self, command: &str) -> Result<i64> {
        let value = self.query(command)?;
        value.as_int().ok_or_else(|| mismatch(':', value))
    }

    pub fn query_text(&self, command: &str) -> Result<String> {
        match self.query(command)? {
            Value::Text(s) => Ok(s),
            other => Err(mismatch('+', other)),
        }
    }
}

/// A well-formed reply of the wrong type
fn mismatch(expected: char, value: Value) -> JigError {
    JigError::MalformedPayload {
        tag: expected,
        payload: value.to_string(),
    }
}
