//! Hand-off between the HTTP server threads and the control loop.
//!
//! The station service has exactly one owner: the control loop.  HTTP
//! handlers run on the server's own task and never touch it.  Instead:
//!
//! - set-valve commands are posted into a bounded [`CommandMailbox`]
//!   which the loop drains once per iteration, so commands are applied
//!   strictly one after another and never interleave with a valve pulse;
//! - the loop publishes the latest [`StationStatus`] to a lock-free
//!   [`StatusBoard`] which the status page reads.
//!
//! ```text
//! ┌─────────────┐  post()   ┌───────────────┐  drain()  ┌──────────────┐
//! │ HTTP task   │──────────▶│ CommandMailbox│──────────▶│ Control loop │
//! │ (handlers)  │◀──────────│  StatusBoard  │◀──────────│ (sole owner) │
//! └─────────────┘ snapshot()└───────────────┘ publish() └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::StationCommand;
use crate::app::service::StationStatus;

/// Maximum number of commands waiting for the loop.
pub const COMMAND_QUEUE_CAP: usize = 8;

const UNARMED: i32 = -1;

pub struct CommandMailbox {
    channel: Channel<CriticalSectionRawMutex, StationCommand, COMMAND_QUEUE_CAP>,
}

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a command without blocking.
    /// Returns `false` if the mailbox is full (command dropped).
    pub fn post(&self, cmd: StationCommand) -> bool {
        if self.channel.try_send(cmd).is_ok() {
            true
        } else {
            warn!("Command mailbox full, dropping {:?}", cmd);
            false
        }
    }

    /// Hand every pending command to `handler` in FIFO order.
    /// Returns how many were processed.
    pub fn drain(&self, mut handler: impl FnMut(StationCommand)) -> usize {
        let mut count = 0;
        while let Ok(cmd) = self.channel.try_receive() {
            handler(cmd);
            count += 1;
        }
        count
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest station status for readers outside the control loop.
///
/// The two fields are stored separately; a reader may see a valve flag
/// and a timer value from consecutive iterations.  Good enough for a page
/// that refreshes every few seconds.
pub struct StatusBoard {
    open: AtomicBool,
    remaining: AtomicI32,
}

impl StatusBoard {
    pub const fn new() -> Self {
        Self {
            open: AtomicBool::new(false),
            remaining: AtomicI32::new(UNARMED),
        }
    }

    pub fn publish(&self, status: &StationStatus) {
        let remaining = status
            .seconds_remaining
            .map_or(UNARMED, |secs| secs.min(i32::MAX as u32) as i32);
        self.open.store(status.is_open, Ordering::Relaxed);
        self.remaining.store(remaining, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StationStatus {
        let remaining = self.remaining.load(Ordering::Relaxed);
        StationStatus {
            is_open: self.open.load(Ordering::Relaxed),
            seconds_remaining: (remaining >= 0).then_some(remaining as u32),
        }
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}
