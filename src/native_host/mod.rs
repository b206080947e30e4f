//! Native messaging bridge between the host plugin and the orchestrator.
//!
//! Every message is a 4-byte little-endian length followed by that many
//! bytes of UTF-8 JSON, in both directions.

use crate::constants::MAX_MESSAGE_SIZE;
use crate::eligibility::ReaderDirectory;
use crate::error::AppError;
use crate::models::TabId;
use crate::notify::{Notification, NotifyId};
use crate::orchestrator::Orchestrator;
use crate::prefs::PreferenceStore;
use crate::release::ReleaseInvoker;
use crate::validation::preference_value;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read, Write};
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum IncomingMessage {
    #[serde(rename = "notify")]
    Notify(Notification),
    #[serde(rename = "reader")]
    Reader {
        #[serde(rename = "tabId")]
        tab_id: NotifyId,
        #[serde(rename = "readerType", default)]
        reader_type: Option<String>,
    },
    #[serde(rename = "set_preference")]
    SetPreference { name: String, value: serde_json::Value },
    #[serde(rename = "request_state")]
    RequestState,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "release")]
    Release {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
    #[serde(rename = "state")]
    State {
        enabled: bool,
        #[serde(rename = "delayMs")]
        delay_ms: u64,
        #[serde(rename = "activeTab")]
        active_tab: Option<TabId>,
        #[serde(rename = "pendingTabs")]
        pending_tabs: Vec<TabId>,
    },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Read one length-prefixed frame. EOF before the length prefix is a clean
/// disconnect; EOF inside the body is a truncated frame.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>, AppError> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = usize::try_from(u32::from_le_bytes(len_bytes)).unwrap_or(usize::MAX);

    if len > MAX_MESSAGE_SIZE {
        return Err(AppError::MessageTooLarge { len, max: MAX_MESSAGE_SIZE });
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            AppError::TruncatedFrame { len }
        } else {
            AppError::Io(e)
        }
    })?;
    Ok(buffer)
}

pub fn write_message<W: Write>(writer: &mut W, message: &OutgoingMessage) -> Result<(), AppError> {
    let json = serde_json::to_vec(message)?;
    let len = u32::try_from(json.len())
        .ok()
        .filter(|_| json.len() <= MAX_MESSAGE_SIZE)
        .ok_or_else(|| AppError::MessageTooLarge { len: json.len(), max: MAX_MESSAGE_SIZE })?;

    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()?;

    Ok(())
}

/// Read frames on a dedicated thread, since stdin reads block.
/// The channel yields the terminating error (EOF included) last.
pub fn spawn_frame_reader<R>(mut reader: R) -> mpsc::UnboundedReceiver<Result<Vec<u8>, AppError>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        let frame = read_frame(&mut reader);
        let done = frame.is_err();
        if tx.send(frame).is_err() || done {
            break;
        }
    });
    rx
}

/// Releases a tab by asking the host plugin to do it.
pub struct HostRelease {
    outgoing: mpsc::UnboundedSender<OutgoingMessage>,
}

impl ReleaseInvoker for HostRelease {
    fn invoke(&mut self, tab_id: &TabId) {
        let message = OutgoingMessage::Release { tab_id: tab_id.clone() };
        if self.outgoing.send(message).is_err() {
            warn!("Host connection is gone, cannot release tab {tab_id}");
        }
    }
}

pub struct NativeHost<P> {
    orchestrator: Orchestrator<P, ReaderDirectory, HostRelease>,
    outgoing_rx: mpsc::UnboundedReceiver<OutgoingMessage>,
}

impl<P: PreferenceStore> NativeHost<P> {
    pub fn new(prefs: P) -> Self {
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let orchestrator = Orchestrator::new(prefs, ReaderDirectory::new(), HostRelease { outgoing });
        Self { orchestrator, outgoing_rx }
    }

    pub fn orchestrator(&self) -> &Orchestrator<P, ReaderDirectory, HostRelease> {
        &self.orchestrator
    }

    /// Serve frames until the host disconnects. Outstanding timers are
    /// disposed however the loop ends.
    pub async fn run<W: Write>(
        &mut self,
        mut frames: mpsc::UnboundedReceiver<Result<Vec<u8>, AppError>>,
        mut writer: W,
    ) -> Result<(), AppError> {
        let result = loop {
            tokio::select! {
                biased;
                frame = frames.recv() => match frame {
                    Some(Ok(bytes)) => {
                        if let Some(reply) = self.handle_frame(&bytes) {
                            if let Err(e) = write_message(&mut writer, &reply) {
                                break Err(e);
                            }
                        }
                    }
                    Some(Err(e)) if e.is_disconnect() => break Ok(()),
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                },
                Some(message) = self.outgoing_rx.recv() => {
                    if let Err(e) = write_message(&mut writer, &message) {
                        break Err(e);
                    }
                }
                Some(fired) = self.orchestrator.next_expiry() => self.orchestrator.on_expire(fired),
            }
        };

        info!("Host disconnected, shutting down");
        self.orchestrator.dispose();
        result
    }

    /// Decode and handle one frame. Undecodable frames are answered with an error.
    pub fn handle_frame(&mut self, bytes: &[u8]) -> Option<OutgoingMessage> {
        match serde_json::from_slice::<IncomingMessage>(bytes) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                warn!("Ignoring undecodable message: {e}");
                Some(OutgoingMessage::Error { message: format!("Invalid message: {e}") })
            }
        }
    }

    pub fn handle_message(&mut self, message: IncomingMessage) -> Option<OutgoingMessage> {
        match message {
            IncomingMessage::Notify(notification) => {
                debug!(
                    "Received notification: {} {} {:?}",
                    notification.event, notification.unit_type, notification.ids
                );
                for closed in notification.closed_tabs() {
                    self.orchestrator.lookup_mut().forget(&closed);
                }
                self.orchestrator.handle_notification(&notification);
                None
            }
            IncomingMessage::Reader { tab_id, reader_type } => {
                if let Some(tab_id) = TabId::new(tab_id.to_string()) {
                    self.orchestrator.lookup_mut().record(tab_id, reader_type);
                }
                None
            }
            IncomingMessage::SetPreference { name, value } => {
                match self.set_preference(&name, &value) {
                    Ok(()) => Some(self.state()),
                    Err(e) => {
                        warn!("Rejected preference {name}: {e}");
                        Some(OutgoingMessage::Error { message: e.to_string() })
                    }
                }
            }
            IncomingMessage::RequestState => Some(self.state()),
        }
    }

    fn set_preference(&mut self, name: &str, value: &serde_json::Value) -> Result<(), AppError> {
        let (key, value) = preference_value(name, value)?;
        info!("Saved {key}: {value}");
        self.orchestrator.preferences_mut().set(key, value)
    }

    fn state(&self) -> OutgoingMessage {
        let gate = self.orchestrator.gate();
        OutgoingMessage::State {
            enabled: gate.is_enabled(),
            delay_ms: gate.delay_ms(),
            active_tab: self.orchestrator.active_tab().cloned(),
            pending_tabs: self.orchestrator.pending_tabs(),
        }
    }
}
