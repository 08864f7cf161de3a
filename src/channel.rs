//! Single DMX slot with its own fade state.
//!
//! The fade state is guarded by a `critical-section` mutex, so applying a
//! command and reading the value never observe a torn update. The lock is
//! only held while copying the state in or out.

use core::cell::Cell;

use critical_section::Mutex;
use embassy_time::Instant;

use crate::address::ChannelId;
use crate::fade::{Fade, FadeCommand};

#[derive(Debug, Clone, Copy)]
struct ChannelState {
    fade: Fade,
    /// Bumped on every applied command
    revision: u32,
}

/// One addressable 8-bit output slot
pub struct Channel {
    id: ChannelId,
    state: Mutex<Cell<ChannelState>>,
}

impl Channel {
    /// Create a channel resting at zero
    pub const fn new(id: ChannelId) -> Self {
        Self {
            id,
            state: Mutex::new(Cell::new(ChannelState {
                fade: Fade::steady(0),
                revision: 0,
            })),
        }
    }

    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Apply a fade command
    ///
    /// The new fade starts from this channel's value at the command's issue
    /// time, so interrupting a running fade never jumps. Returns the new
    /// revision of the channel.
    pub fn apply(&self, command: &FadeCommand) -> u32 {
        critical_section::with(|cs| {
            let cell = self.state.borrow(cs);
            let state = cell.get();
            let next = ChannelState {
                fade: state.fade.supersede(command),
                revision: state.revision.wrapping_add(1),
            };
            cell.set(next);
            next.revision
        })
    }

    /// Value of the channel at `now`
    pub fn value_at(&self, now: Instant) -> u8 {
        self.fade().value_at(now)
    }

    /// Copy of the current fade parameters
    pub fn fade(&self) -> Fade {
        critical_section::with(|cs| self.state.borrow(cs).get().fade)
    }

    /// Number of commands applied so far (wrapping)
    pub fn revision(&self) -> u32 {
        critical_section::with(|cs| self.state.borrow(cs).get().revision)
    }
}

impl core::fmt::Debug for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("fade", &self.fade())
            .field("revision", &self.revision())
            .finish()
    }
}
