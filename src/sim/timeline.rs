//! Tick-stamped deferred effects
//!
//! Replaces ad hoc timers: each game keeps a list of `{expires_at, effect}`
//! entries that its tick drains once per running step. A paused game never
//! drains, so nothing fires behind its back, and dropping the game drops every
//! pending effect with it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheduled<E> {
    pub expires_at: u64,
    pub effect: E,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline<E> {
    entries: Vec<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; entries sharing an expiry tick fire in insertion order.
    pub fn schedule(&mut self, expires_at: u64, effect: E) {
        self.entries.push(Scheduled { expires_at, effect });
    }

    /// Add an entry after removing every entry matching `same_kind`.
    pub fn replace<F>(&mut self, expires_at: u64, effect: E, same_kind: F)
    where
        F: Fn(&E) -> bool,
    {
        self.cancel(same_kind);
        self.schedule(expires_at, effect);
    }

    /// Remove matching entries, returning how many were dropped
    pub fn cancel<F>(&mut self, matches: F) -> usize
    where
        F: Fn(&E) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|s| !matches(&s.effect));
        before - self.entries.len()
    }

    /// Remove and return every entry due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: u64) -> Vec<E> {
        let mut due: Vec<Scheduled<E>> = Vec::new();
        let mut keep = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.expires_at <= now {
                due.push(entry);
            } else {
                keep.push(entry);
            }
        }
        self.entries = keep;
        // Stable sort keeps insertion order for equal expiry ticks
        due.sort_by_key(|s| s.expires_at);
        due.into_iter().map(|s| s.effect).collect()
    }

    pub fn count<F>(&self, matches: F) -> usize
    where
        F: Fn(&E) -> bool,
    {
        self.entries.iter().filter(|s| matches(&s.effect)).count()
    }

    /// Earliest expiry among matching entries
    pub fn next_expiry<F>(&self, matches: F) -> Option<u64>
    where
        F: Fn(&E) -> bool,
    {
        self.entries
            .iter()
            .filter(|s| matches(&s.effect))
            .map(|s| s.expires_at)
            .min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled<E>> {
        self.entries.iter()
    }
}
