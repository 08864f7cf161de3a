//! Bounded command queue funnelling fades into the frame scheduler.
//!
//! Multi-sender safe, guarded by `critical-section`. Batches are enqueued
//! all-or-nothing so the channels of one fixture always start together.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::error::{Error, Result};
use crate::fade::FadeCommand;

/// Bounded queue of fade commands
pub struct CommandQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<FadeCommand, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { queue: self }
    }

    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { queue: self }
    }

    /// Enqueue a whole batch, or nothing if it does not fit
    pub fn try_send_batch(&self, batch: &[FadeCommand]) -> Result<()> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            if queue.capacity() - queue.len() < batch.len() {
                log::warn!("command queue full, dropping batch of {}", batch.len());
                return Err(Error::QueueFull);
            }
            for command in batch {
                queue.push_back(*command).map_err(|_| Error::QueueFull)?;
            }
            Ok(())
        })
    }

    /// Take the oldest command
    pub fn try_receive(&self) -> Option<FadeCommand> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending handle for a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    pub fn send(&self, command: FadeCommand) -> Result<()> {
        self.queue.try_send_batch(&[command])
    }

    pub fn send_batch(&self, batch: &[FadeCommand]) -> Result<()> {
        self.queue.try_send_batch(batch)
    }
}

/// Receiving handle for a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<FadeCommand> {
        self.queue.try_receive()
    }
}
