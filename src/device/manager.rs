//! Device manager: binds the reconnect state machine to a transport.
//!
//! `DeviceLink` decides *when* to dial and heartbeat; the transport decides
//! *how*. The seam between them is the `DeviceTransport` trait so the TUI
//! panel, the tests, and any future wire protocol all drive the same state
//! machine.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use super::commands::CommandEnvelope;
use super::reconnect::{DeviceLink, LinkAction, LinkState, ReconnectPolicy};

/// Transport abstraction for one device connection.
pub trait DeviceTransport {
    /// Attempts to open a connection to `url`. Synchronous; a slow endpoint
    /// should fail fast rather than block the UI loop.
    fn dial(&mut self, url: &str) -> Result<()>;

    /// Sends one text frame on the open connection.
    fn send(&mut self, text: &str) -> Result<()>;

    /// Returns a received text frame if one is ready, without blocking.
    fn poll_recv(&mut self) -> Result<Option<String>>;

    /// Closes the connection if open.
    fn close(&mut self);
}

/// Minimal TCP transport speaking newline-delimited JSON.
///
/// The embedded controllers accept this framing on their control port; the
/// richer WebSocket surface is only needed by browser clients and lives in
/// the optional web relay.
#[derive(Debug, Default)]
pub struct TcpJsonTransport {
    stream: Option<TcpStream>,
    /// Bytes read off the socket but not yet returned as complete lines.
    /// Survives across polls so partial lines and back-to-back frames are
    /// never dropped.
    read_buf: Vec<u8>,
}

impl TcpJsonTransport {
    /// Connect timeout for dial attempts. Short, so the UI loop never
    /// stalls noticeably.
    const DIAL_TIMEOUT: Duration = Duration::from_millis(250);

    /// Splits the first complete line out of `buf`, stripping the newline
    /// and any trailing carriage return.
    fn take_line(buf: &mut Vec<u8>) -> Option<String> {
        let pos = buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Extracts `host:port` from a `ws://host:port/path` style URL.
    fn host_port(url: &str) -> Result<String> {
        let rest = url
            .split_once("://")
            .map_or(url, |(_, rest)| rest);
        let authority = rest.split('/').next().unwrap_or(rest);
        if authority.is_empty() || !authority.contains(':') {
            anyhow::bail!("Device URL '{url}' must include host and port");
        }
        Ok(authority.to_string())
    }
}

impl DeviceTransport for TcpJsonTransport {
    fn dial(&mut self, url: &str) -> Result<()> {
        let authority = Self::host_port(url)?;
        let mut last_err = anyhow::anyhow!("No addresses resolved for {authority}");
        let addrs = std::net::ToSocketAddrs::to_socket_addrs(&authority)
            .with_context(|| format!("Failed to resolve device address {authority}"))?;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, Self::DIAL_TIMEOUT) {
                Ok(stream) => {
                    stream.set_nonblocking(true).context("set_nonblocking failed")?;
                    self.stream = Some(stream);
                    self.read_buf.clear();
                    return Ok(());
                }
                Err(e) => last_err = e.into(),
            }
        }
        Err(last_err)
    }

    fn send(&mut self, text: &str) -> Result<()> {
        let stream = self
            .stream
            .as_mut()
            .context("Transport is not connected")?;
        stream
            .write_all(text.as_bytes())
            .and_then(|()| stream.write_all(b"\n"))
            .context("Failed to write to device socket")
    }

    fn poll_recv(&mut self) -> Result<Option<String>> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };
        let mut chunk = [0u8; 1024];
        loop {
            // Return one buffered line per poll; anything past it stays in
            // the buffer for the next call.
            if let Some(line) = Self::take_line(&mut self.read_buf) {
                return Ok(Some(line));
            }
            match stream.read(&mut chunk) {
                Ok(0) => anyhow::bail!("Device closed the connection"),
                Ok(n) => self.read_buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) => return Err(e).context("Failed to read from device socket"),
            }
        }
    }

    fn close(&mut self) {
        self.stream = None;
        self.read_buf.clear();
    }
}

/// One managed device connection: state machine + transport + send queue.
pub struct DeviceManager<T: DeviceTransport> {
    url: String,
    link: DeviceLink,
    transport: T,
    /// Commands accepted while the link was down, flushed on reconnect.
    outbox: VecDeque<CommandEnvelope>,
    /// Most recent frame received from the device, for display.
    last_message: Option<String>,
}

impl<T: DeviceTransport> DeviceManager<T> {
    /// Creates a manager for the given endpoint.
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy, transport: T) -> Self {
        Self {
            url: url.into(),
            link: DeviceLink::new(policy),
            transport,
            outbox: VecDeque::new(),
            last_message: None,
        }
    }

    /// Endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current link state.
    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.link.state()
    }

    /// Underlying state machine, for display (attempts, retry countdown).
    #[must_use]
    pub const fn link(&self) -> &DeviceLink {
        &self.link
    }

    /// Number of commands waiting for the link to come up.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.outbox.len()
    }

    /// Most recent frame received from the device.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Starts connecting.
    pub fn connect(&mut self, now: Instant) {
        if self.link.connect() == LinkAction::Dial {
            self.perform_dial(now);
        }
    }

    /// Queues a command, sending immediately when connected.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails validation. Transport errors
    /// are handled by the reconnect machinery, not surfaced here.
    pub fn send_command(&mut self, envelope: CommandEnvelope, now: Instant) -> Result<()> {
        envelope.validate()?;
        self.outbox.push_back(envelope);
        if self.link.state() == LinkState::Connected {
            self.flush_outbox(now);
        }
        Ok(())
    }

    /// Advances the connection: retries, heartbeats, inbound frames.
    pub fn tick(&mut self, now: Instant) {
        match self.link.tick(now) {
            LinkAction::Dial => self.perform_dial(now),
            LinkAction::SendHeartbeat => {
                let ping = "{\"command\":\"ping\"}";
                if self.transport.send(ping).is_err() {
                    self.transport.close();
                    self.link.on_error(now);
                }
            }
            LinkAction::None => {}
        }

        if self.link.state() == LinkState::Connected {
            match self.transport.poll_recv() {
                Ok(Some(frame)) => {
                    // Any inbound frame proves the device is alive.
                    self.link.on_heartbeat_ack(now);
                    self.last_message = Some(frame);
                }
                Ok(None) => {}
                Err(_) => {
                    self.transport.close();
                    self.link.on_error(now);
                }
            }
        }
    }

    /// Tears the connection down for good.
    pub fn shutdown(&mut self) {
        self.transport.close();
        self.link.shutdown();
    }

    fn perform_dial(&mut self, now: Instant) {
        match self.transport.dial(&self.url) {
            Ok(()) => {
                self.link.on_open(now);
                self.flush_outbox(now);
            }
            Err(_) => {
                self.transport.close();
                self.link.on_error(now);
            }
        }
    }

    fn flush_outbox(&mut self, now: Instant) {
        while let Some(envelope) = self.outbox.front() {
            let Ok(text) = serde_json::to_string(envelope) else {
                self.outbox.pop_front();
                continue;
            };
            if self.transport.send(&text).is_ok() {
                self.outbox.pop_front();
            } else {
                self.transport.close();
                self.link.on_error(now);
                break;
            }
        }
    }
}
