//! Protocol dispatcher

use alloc::string::String;
use alloc::vec::Vec;

use log::{debug, info, trace};
use sideeye_protocol::{DeviceResponse, HostCommand, Line, LineFramer, OperationResult};

use super::liveness::{LinkMonitor, LinkStatus, SYNC_IDLE_MS};
use crate::elapsed_ms;
use crate::interaction::{InteractionController, Page, Refresh};
use crate::sync;
use crate::telemetry::{SyncStatus, TelemetrySnapshot};
use crate::traits::{Display, FileStorage, Network};

/// Everything a command may touch besides the snapshot
pub struct Collaborators<'a, D, N, S> {
    pub interaction: &'a mut InteractionController,
    pub display: &'a mut D,
    pub network: &'a mut N,
    pub storage: &'a mut S,
}

/// Owns the line framer and the telemetry snapshot
#[derive(Debug, Clone)]
pub struct ProtocolDispatcher {
    framer: LineFramer,
    snapshot: TelemetrySnapshot,
    link: LinkMonitor,
    /// Reported by `GetVersion`
    version: &'static str,
}

impl ProtocolDispatcher {
    pub fn new(version: &'static str) -> Self {
        Self {
            framer: LineFramer::new(),
            snapshot: TelemetrySnapshot::new(),
            link: LinkMonitor::new(),
            version,
        }
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Bytes discarded so far because a line exceeded the framing cap
    pub fn dropped_bytes(&self) -> u32 {
        self.framer.dropped_bytes()
    }

    /// Discard a partially received line
    pub fn discard_partial(&mut self) {
        self.framer.reset();
    }

    /// Feed raw serial bytes, handling every line they complete
    ///
    /// `respond` is called once per response, in command order.
    pub fn receive<D, N, S, F>(
        &mut self,
        bytes: &[u8],
        now_ms: u32,
        cx: &mut Collaborators<'_, D, N, S>,
        mut respond: F,
    ) where
        D: Display,
        N: Network,
        S: FileStorage,
        F: FnMut(DeviceResponse),
    {
        for &byte in bytes {
            if let Some(line) = self.framer.feed(byte) {
                if let Some(response) = self.process_line(&line, now_ms, cx) {
                    respond(response);
                }
            }
        }
    }

    /// Decode and apply one framed line
    ///
    /// Overlong and undecodable lines are dropped without side effects.
    pub fn process_line<D, N, S>(
        &mut self,
        line: &Line,
        now_ms: u32,
        cx: &mut Collaborators<'_, D, N, S>,
    ) -> Option<DeviceResponse>
    where
        D: Display,
        N: Network,
        S: FileStorage,
    {
        if line.is_truncated() {
            debug!("dropping overlong line");
            return None;
        }

        match HostCommand::decode(line.as_bytes()) {
            Ok(command) => self.handle_command(command, now_ms, cx),
            Err(err) => {
                debug!("dropping undecodable line: {:?}", err);
                None
            }
        }
    }

    /// Apply one decoded command and build its response
    pub fn handle_command<D, N, S>(
        &mut self,
        command: HostCommand,
        now_ms: u32,
        cx: &mut Collaborators<'_, D, N, S>,
    ) -> Option<DeviceResponse>
    where
        D: Display,
        N: Network,
        S: FileStorage,
    {
        trace!("command {}", command.tag().unwrap_or("<unknown>"));
        let was_connected = self.snapshot.is_connected();

        let response = match command {
            HostCommand::Identity(identity) => {
                self.snapshot.apply_identity(&identity);
                None
            }
            HostCommand::Stats(stats) => {
                let previous = self.snapshot.apply_stats(&stats);
                let level = self.snapshot.alert();
                if level > previous {
                    info!("alert escalated to {:?}", level);
                    cx.interaction.focus_page(Page::Resources, now_ms);
                }
                if level != previous {
                    cx.interaction.request_refresh(Refresh::Full);
                }
                None
            }
            HostCommand::ListFiles { path } => {
                let entries = cx.storage.list_dir(&path).unwrap_or_else(|err| {
                    debug!("list {} failed: {:?}", path, err);
                    Vec::new()
                });
                Some(DeviceResponse::FileList { data: entries })
            }
            HostCommand::WriteChunk(chunk) => {
                cx.interaction.focus_page(Page::Storage, now_ms);
                self.snapshot.set_sync_status(SyncStatus::Syncing);
                cx.interaction.notify_activity(cx.display, now_ms);
                cx.interaction.request_refresh(Refresh::Full);

                let success = sync::handle(cx.storage, &chunk.path, chunk.offset, &chunk.data);
                if !success {
                    self.snapshot.set_sync_status(SyncStatus::Error);
                }
                Some(DeviceResponse::OperationResult {
                    data: OperationResult::chunk_written(success),
                })
            }
            HostCommand::GetVersion => Some(DeviceResponse::Version {
                version: String::from(self.version),
            }),
            HostCommand::Unknown => None,
        };

        if self.snapshot.is_connected() {
            if !was_connected {
                info!("host link up");
                cx.interaction.request_refresh(Refresh::Full);
            }
            cx.network.publish(&self.snapshot);
        }

        if !cx.interaction.is_countdown_active() {
            cx.interaction.request_refresh(Refresh::Values);
        }

        response
    }

    /// Per-tick liveness and status housekeeping
    pub fn tick<D: Display>(
        &mut self,
        now_ms: u32,
        interaction: &mut InteractionController,
        display: &mut D,
    ) {
        if self.snapshot.take_fresh() {
            self.link.data_received(now_ms);
            interaction.notify_activity(display, now_ms);
        }

        if self.snapshot.is_connected() && self.link.check(now_ms) == LinkStatus::Expired {
            info!("host link lost");
            self.snapshot.set_disconnected();
            interaction.request_refresh(Refresh::Full);
        }

        if self.snapshot.sync_status() == SyncStatus::Syncing
            && elapsed_ms(now_ms, interaction.last_page_change_ms()) > SYNC_IDLE_MS
        {
            self.snapshot.set_sync_status(SyncStatus::Idle);
            interaction.request_refresh(Refresh::Full);
        }
    }
}
