//! The single WebSocket connection to the bomb server.
//!
//! A [`ConnectionManager`] connects once, logs in, streams decoded frames to
//! its consumer in arrival order and forwards operator commands. It never
//! reconnects: [`ConnectionManager::run`] resolves to a [`CloseReport`] when
//! the connection is over and the manager is spent.

use std::sync::Arc;

use futures::{Sink, SinkExt, StreamExt};
use shared::protocol::{ClientCommand, InboundFrame};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::{diagnostics::Diagnostic, error::ConnectionError};

pub const CLOSE_GOING_AWAY: u16 = 1001;
pub const CLOSE_NO_STATUS: u16 = 1005;
pub const CLOSE_ABNORMAL: u16 = 1006;
pub const CLOSE_SUPERSEDED: u16 = 4000;
pub const CLOSE_VERSION_MISMATCH: u16 = 4001;
pub const CLOSE_PASSWORD_REQUIRED: u16 = 4002;
pub const CLOSE_PASSWORD_REJECTED: u16 = 4003;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub server_url: String,
    pub ui_version: String,
    pub password: Option<String>,
}

impl ConnectionSettings {
    pub fn new(
        server_url: impl Into<String>,
        ui_version: impl Into<String>,
        password: Option<String>,
    ) -> Result<Self, ConnectionError> {
        let server_url = server_url.into();
        if !(server_url.starts_with("ws://") || server_url.starts_with("wss://")) {
            return Err(ConnectionError::InvalidUrl(server_url));
        }
        Ok(Self {
            server_url,
            ui_version: ui_version.into(),
            password,
        })
    }

    fn login(&self) -> ClientCommand {
        ClientCommand::Login {
            ui_version: self.ui_version.clone(),
            password: self.password.clone(),
        }
    }
}

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReport {
    pub code: u16,
    pub reason: String,
    /// Whether the login frame had gone out before the connection ended.
    pub handshake_completed: bool,
}

impl CloseReport {
    pub fn new(code: u16, reason: impl Into<String>, handshake_completed: bool) -> Self {
        Self {
            code,
            reason: reason.into(),
            handshake_completed,
        }
    }

    fn abnormal(reason: impl Into<String>, handshake_completed: bool) -> Self {
        Self::new(CLOSE_ABNORMAL, reason, handshake_completed)
    }

    pub fn diagnostic(&self) -> Diagnostic {
        match self.code {
            CLOSE_SUPERSEDED => Diagnostic::info("Disconnected because another client connected"),
            CLOSE_VERSION_MISMATCH => {
                Diagnostic::error("UI version mismatch, please update the client")
            }
            CLOSE_PASSWORD_REQUIRED => {
                Diagnostic::error("The server requires a password, which is not supported yet")
            }
            CLOSE_PASSWORD_REJECTED => Diagnostic::error("The entered password was incorrect"),
            CLOSE_GOING_AWAY => Diagnostic::info("The server is shutting down"),
            CLOSE_NO_STATUS | CLOSE_ABNORMAL if self.handshake_completed => {
                Diagnostic::error("WebSocket closed abnormally")
            }
            CLOSE_NO_STATUS | CLOSE_ABNORMAL => Diagnostic::error("WebSocket failed to connect"),
            code => Diagnostic::error(format!(
                "WebSocket closed with code {code}: {}",
                self.reason
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    /// Login has been sent and commands are now forwarded.
    Connected,
    Frame(InboundFrame),
    Diagnostic(Diagnostic),
    /// Always the last event of a connection.
    Closed(CloseReport),
}

type Outbound = Arc<RwLock<Option<mpsc::UnboundedSender<ClientCommand>>>>;

/// Send capability handed to command issuers. Holds no connection itself;
/// it reaches whichever outbound channel is live, if any.
#[derive(Clone)]
pub struct CommandSender {
    outbound: Outbound,
}

impl CommandSender {
    /// Fire-and-forget. Returns `false` when there is no logged-in connection,
    /// in which case the command is discarded.
    pub async fn send(&self, command: ClientCommand) -> bool {
        let guard = self.outbound.read().await;
        match guard.as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => {
                debug!(command = command.kind(), "no live connection, dropping command");
                false
            }
        }
    }

    pub async fn is_live(&self) -> bool {
        self.outbound.read().await.is_some()
    }
}

pub struct ConnectionManager {
    settings: ConnectionSettings,
    outbound: Outbound,
}

impl ConnectionManager {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings,
            outbound: Arc::new(RwLock::new(None)),
        }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            outbound: Arc::clone(&self.outbound),
        }
    }

    /// Drives the connection to completion. Every event goes to `events`,
    /// ending with the close diagnostic and [`ConnectionEvent::Closed`].
    pub async fn run(self, events: mpsc::UnboundedSender<ConnectionEvent>) -> CloseReport {
        let report = self.drive(&events).await;
        *self.outbound.write().await = None;

        info!(
            code = report.code,
            reason = %report.reason,
            handshake_completed = report.handshake_completed,
            "websocket closed"
        );
        let _ = events.send(ConnectionEvent::Diagnostic(report.diagnostic()));
        let _ = events.send(ConnectionEvent::Closed(report.clone()));
        report
    }

    async fn drive(&self, events: &mpsc::UnboundedSender<ConnectionEvent>) -> CloseReport {
        let url = self.settings.server_url.as_str();
        info!(url, "connecting websocket");
        let (stream, _) = match connect_async(url).await {
            Ok(connected) => connected,
            Err(err) => {
                warn!(url, error = %err, "websocket connect failed");
                return CloseReport::abnormal(err.to_string(), false);
            }
        };
        let (mut writer, mut reader) = stream.split();

        if let Err(err) = send_frame(&mut writer, &self.settings.login()).await {
            warn!(error = %err, "failed to send login");
            return CloseReport::abnormal(err.to_string(), false);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        *self.outbound.write().await = Some(tx);
        info!(ui_version = %self.settings.ui_version, "logged in");
        let _ = events.send(ConnectionEvent::Diagnostic(Diagnostic::info(format!(
            "Connected to {url}"
        ))));
        let _ = events.send(ConnectionEvent::Connected);

        loop {
            tokio::select! {
                incoming = reader.next() => match incoming {
                    Some(Ok(Message::Text(text))) => match InboundFrame::decode(&text) {
                        Ok(frame) => {
                            let _ = events.send(ConnectionEvent::Frame(frame));
                        }
                        Err(err) => {
                            warn!(error = %err, "dropping undecodable frame");
                            let _ = events.send(ConnectionEvent::Diagnostic(Diagnostic::error(
                                "Invalid data received from WebSocket",
                            )));
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        let report = match frame {
                            Some(frame) => CloseReport::new(
                                u16::from(frame.code),
                                frame.reason.into_owned(),
                                true,
                            ),
                            None => CloseReport::new(CLOSE_NO_STATUS, "", true),
                        };
                        // flushes the queued close reply
                        let _ = writer.close().await;
                        return report;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return CloseReport::abnormal(err.to_string(), true),
                    None => return CloseReport::abnormal("stream ended without close frame", true),
                },
                Some(command) = rx.recv() => {
                    debug!(command = command.kind(), "forwarding command");
                    if let Err(err) = send_frame(&mut writer, &command).await {
                        warn!(command = command.kind(), error = %err, "failed to send command");
                        return CloseReport::abnormal(err.to_string(), true);
                    }
                }
            }
        }
    }
}

async fn send_frame<S>(writer: &mut S, command: &ClientCommand) -> Result<(), ConnectionError>
where
    S: Sink<Message, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let text = serde_json::to_string(command)?;
    writer.send(Message::Text(text)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/connection_tests.rs"]
mod tests;
