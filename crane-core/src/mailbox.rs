//! Outbound command mailbox
//!
//! A bounded FIFO of commands waiting to be sent to another node. Entries
//! are appended at the tail and consumed from the head. An entry can be
//! flagged *subscribed*, which defers it to the next bulk drain
//! ([`Mailbox::drain_subscribed`]) instead of the next individual
//! [`Mailbox::pop`].
//!
//! # Capacity policy
//!
//! - [`Mailbox::push`] on a full mailbox is rejected with
//!   [`MailboxError::Full`]; existing entries are left untouched.
//! - [`Mailbox::available`] is a backpressure valve: once occupancy reaches
//!   `N - 1` the whole mailbox is flushed before availability is reported.
//!   Losing the queued commands is accepted in exchange for never wedging
//!   the node on a full queue. [`Mailbox::peek_count`] is the side-effect
//!   free occupancy query.

use heapless::Deque;

use crane_protocol::Command;

/// Errors from mailbox operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MailboxError {
    /// No free slot left
    Full,
    /// Index does not refer to a pending entry
    IndexOutOfRange,
}

/// A pending command and its delivery mode
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Entry {
    /// Command to deliver
    pub command: Command,
    /// Deliver on the next bulk drain rather than the next pop
    pub subscribed: bool,
}

/// Bounded outbound command queue with `N` slots
#[derive(Debug)]
pub struct Mailbox<const N: usize> {
    entries: Deque<Entry, N>,
}

impl<const N: usize> Default for Mailbox<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Mailbox<N> {
    /// Create an empty mailbox
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Append a command at the tail
    ///
    /// Returns the entry's position relative to the head, usable with
    /// [`Mailbox::mark_subscribed`].
    pub fn push(&mut self, command: Command) -> Result<usize, MailboxError> {
        self.push_entry(Entry {
            command,
            subscribed: false,
        })
    }

    /// Append a command already flagged for the next bulk drain
    pub fn push_subscribed(&mut self, command: Command) -> Result<usize, MailboxError> {
        self.push_entry(Entry {
            command,
            subscribed: true,
        })
    }

    fn push_entry(&mut self, entry: Entry) -> Result<usize, MailboxError> {
        let subscribed = entry.subscribed;
        match self.entries.push_back(entry) {
            Ok(()) => {
                let index = self.entries.len() - 1;
                debug!("mailbox: queued at {} (subscribed: {})", index, subscribed);
                Ok(index)
            }
            Err(_) => {
                warn!("mailbox: full, command rejected");
                Err(MailboxError::Full)
            }
        }
    }

    /// Remove and return the head command
    ///
    /// `None` is the "empty" result.
    pub fn pop(&mut self) -> Option<Command> {
        self.entries.pop_front().map(|entry| entry.command)
    }

    /// Head entry without removing it
    pub fn peek(&self) -> Option<&Entry> {
        self.entries.front()
    }

    /// Number of pending entries
    pub fn peek_count(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every slot is taken
    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Pending entry count, after applying the overflow valve
    ///
    /// When occupancy has reached `N - 1` the mailbox is flushed first and
    /// 0 is returned.
    pub fn available(&mut self) -> usize {
        let len = self.entries.len();
        if len > 0 && len >= N.saturating_sub(1) {
            warn!("mailbox: {} of {} slots used, flushing", len, N);
            self.flush();
            return 0;
        }
        len
    }

    /// Drop every pending entry
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    /// Flag the entry at `index` (0 = head) for the next bulk drain
    pub fn mark_subscribed(&mut self, index: usize) -> Result<(), MailboxError> {
        let entry = self
            .entries
            .iter_mut()
            .nth(index)
            .ok_or(MailboxError::IndexOutOfRange)?;
        entry.subscribed = true;
        debug!("mailbox: subscribed index {}", index);
        Ok(())
    }

    /// Forget the last `n` pending pushes
    ///
    /// The tail retreats by `min(n, occupancy)`; the head never moves, so
    /// entries that were already popped stay consumed. Returns the number
    /// of entries forgotten.
    pub fn remove_n(&mut self, n: usize) -> usize {
        let mut removed = 0;
        while removed < n && self.entries.pop_back().is_some() {
            removed += 1;
        }
        removed
    }

    /// Hand every subscribed entry to `deliver`, in FIFO order
    ///
    /// Delivered entries are removed; unsubscribed entries keep their
    /// relative order. Returns the number delivered.
    pub fn drain_subscribed<F>(&mut self, mut deliver: F) -> usize
    where
        F: FnMut(&Command),
    {
        let mut delivered = 0;
        for _ in 0..self.entries.len() {
            let Some(entry) = self.entries.pop_front() else {
                break;
            };
            if entry.subscribed {
                deliver(&entry.command);
                delivered += 1;
            } else {
                // Slot was freed by the pop above
                let _ = self.entries.push_back(entry);
            }
        }
        delivered
    }

    /// Hand up to `n` unsubscribed head entries to `deliver`
    ///
    /// Stops early at the first subscribed entry, which stays queued for
    /// the next bulk drain. Returns the number delivered.
    pub fn drain_pending<F>(&mut self, n: usize, mut deliver: F) -> usize
    where
        F: FnMut(&Command),
    {
        let mut delivered = 0;
        while delivered < n {
            match self.entries.front() {
                Some(entry) if !entry.subscribed => {}
                _ => break,
            }
            if let Some(entry) = self.entries.pop_front() {
                deliver(&entry.command);
                delivered += 1;
            }
        }
        delivered
    }

    /// Iterate pending entries from head to tail
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}
