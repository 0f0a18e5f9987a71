//! UDP Server
//!
//! Receives one command per datagram and answers with one reply datagram.
//! Datagrams are handled strictly one at a time: the next datagram is not
//! read until the previous reply has been sent.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::commands::CommandTable;
use crate::config::Config;
use crate::error::{JigError, Result};
use crate::protocol::{encode_reply, Reply, Request};

/// How often a blocked `run` loop wakes up to check for shutdown
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cloneable handle that stops a running server
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// UDP command server for the jig
pub struct Server {
    /// Bound socket
    socket: UdpSocket,

    /// Read-only command registry
    table: CommandTable,

    /// Receive buffer size
    buffer_size: usize,

    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind to `config.listen_addr` and serve `table`
    pub fn bind(config: &Config, table: CommandTable) -> Result<Self> {
        let socket = UdpSocket::bind(&config.listen_addr).map_err(|e| {
            JigError::Config(format!("cannot bind {}: {}", config.listen_addr, e))
        })?;
        socket.set_read_timeout(Some(SHUTDOWN_POLL_INTERVAL))?;

        tracing::info!(
            "Listening on {} with {} commands",
            socket.local_addr()?,
            table.len()
        );

        Ok(Self {
            socket,
            table,
            buffer_size: config.recv_buffer_size,
            shutdown: ShutdownHandle::default(),
        })
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Signal the server to stop after the current datagram
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Turn one request datagram into its reply
    pub fn handle_datagram(&self, bytes: &[u8]) -> Reply {
        match Request::parse(bytes) {
            Ok(request) => self.table.dispatch(&request),
            Err(_) => Reply::error("invalid request: not valid UTF-8"),
        }
    }

    /// Receive, handle and answer a single datagram
    ///
    /// Returns `Ok(false)` if no datagram arrived within the poll interval.
    pub fn serve_one(&self) -> Result<bool> {
        let mut buf = vec![0u8; self.buffer_size];

        let (len, peer) = match self.socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let datagram = &buf[..len];
        tracing::debug!("received {:?} from {}", String::from_utf8_lossy(datagram), peer);

        let reply = self.handle_datagram(datagram);
        if let Reply::Error(ref msg) = reply {
            tracing::warn!("replying error to {}: {}", peer, msg);
        }

        let encoded = encode_reply(&reply);
        tracing::trace!("sending {:?} to {}", encoded, peer);

        // A lost reply is the client's timeout to handle
        if let Err(e) = self.socket.send_to(&encoded, peer) {
            tracing::warn!("Error sending reply to {}: {}", peer, e);
        }

        Ok(true)
    }

    /// Serve datagrams until `shutdown` is called
    pub fn run(&self) -> Result<()> {
        while !self.shutdown.is_shutdown() {
            if let Err(e) = self.serve_one() {
                // e.g. ICMP port unreachable surfacing as ConnectionReset
                tracing::warn!("receive error: {}", e);
            }
        }
        tracing::info!("Server shut down");
        Ok(())
    }
}
