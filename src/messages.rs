//! Inspirational messages
//!
//! A short quote shown under the chart. A new one is picked every time the
//! store receives a complete set of inputs.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::store::{AppState, AppStore, Subscription};

const MESSAGES: [&str; 10] = [
    "Make every moment count.",
    "Your time is limited, don't waste it living someone else's life.",
    "The purpose of life is to live it.",
    "Life is what happens when you're busy making other plans.",
    "The future belongs to those who believe in the beauty of their dreams.",
    "Every moment is a fresh beginning.",
    "Life is either a daring adventure or nothing at all.",
    "To live is the rarest thing in the world. Most people exist, that is all.",
    "The journey of a thousand miles begins with one step.",
    "The purpose of our lives is to be happy.",
];

const AUTHOR: &str = "Unknown";

/// All messages, in order
pub fn messages() -> &'static [&'static str] {
    &MESSAGES
}

/// Currently shown message
#[derive(Debug)]
pub struct MessageBoard {
    current: AtomicUsize,
    refreshes: AtomicUsize,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBoard {
    /// Start on a random message
    pub fn new() -> Self {
        Self::starting_at(pick_index())
    }

    /// Start on a specific message (wraps around)
    pub fn starting_at(index: usize) -> Self {
        Self {
            current: AtomicUsize::new(index % MESSAGES.len()),
            refreshes: AtomicUsize::new(0),
        }
    }

    pub fn message(&self) -> &'static str {
        MESSAGES[self.current.load(Ordering::Relaxed)]
    }

    pub fn author(&self) -> &'static str {
        AUTHOR
    }

    /// Pick another random message
    pub fn refresh(&self) {
        self.current.store(pick_index(), Ordering::Relaxed);
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// How many times `refresh` ran
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Refresh whenever the store holds complete inputs
    pub fn attach(self: &Arc<Self>, store: &AppStore) -> Subscription {
        let board = Arc::clone(self);
        store.subscribe(move |state: &AppState| {
            if state.is_complete() {
                board.refresh();
            }
        })
    }
}

impl std::fmt::Display for MessageBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"\n  - {}", self.message(), self.author())
    }
}

fn pick_index() -> usize {
    rand::rng().random_range(0..MESSAGES.len())
}
