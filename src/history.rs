//! Bounded command history with `!` recall

use std::collections::VecDeque;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history: invalid event")]
    InvalidEvent,
    #[error("history: no such event: {0}")]
    NoSuchEvent(String),
}

/// The most recent `capacity` lines, oldest first
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        History {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a line, evicting the oldest once full
    pub fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.into());
    }

    /// Entry by 1-based position
    pub fn get(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// `(position, line)` oldest first
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, line)| (i + 1, line.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a recall line.
    ///
    /// Returns `Ok(None)` when the line is not a recall at all. `!-1` is the
    /// most recent entry and `!N` the N-th listed one.
    pub fn recall(&self, line: &str) -> Result<Option<String>, HistoryError> {
        let event = match line.trim().strip_prefix('!') {
            Some(event) => event,
            None => return Ok(None),
        };

        let found = if event == "-1" {
            self.last()
        } else {
            match event.parse::<usize>() {
                Ok(n) => self.get(n),
                Err(_) => return Err(HistoryError::InvalidEvent),
            }
        };

        found
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| HistoryError::NoSuchEvent(format!("!{}", event)))
    }
}
