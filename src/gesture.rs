//! Trigger detection
//!
//! `GestureDetector` keeps the last few key tokens (the browser's
//! `KeyboardEvent.key` values) and fires when they end in the Konami code or
//! spell one of the secret words. `ClickCounter` counts repeated clicks on a
//! single element.

use std::collections::VecDeque;

/// Key tokens kept in the rolling buffer
pub const GESTURE_CAPACITY: usize = 20;

pub const KONAMI: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Konami,
    Goat,
    Dragon,
    Jungle,
    Admin,
}

/// Words checked against the lowercased buffer, in priority order
const WORDS: [(&str, Trigger); 5] = [
    ("goat", Trigger::Goat),
    ("dragon", Trigger::Dragon),
    ("nature", Trigger::Jungle),
    ("jungle", Trigger::Jungle),
    ("admin", Trigger::Admin),
];

#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    buffer: VecDeque<String>,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(GESTURE_CAPACITY + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.buffer.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Record one key; at most one trigger fires per push
    pub fn push(&mut self, key: &str) -> Option<Trigger> {
        self.buffer.push_back(key.to_owned());
        while self.buffer.len() > GESTURE_CAPACITY {
            self.buffer.pop_front();
        }

        let trigger = self.detect();
        if let Some(trigger) = trigger {
            log::debug!("gesture matched: {trigger:?}");
            self.buffer.clear();
        }
        trigger
    }

    fn detect(&self) -> Option<Trigger> {
        if self.ends_with_konami() {
            return Some(Trigger::Konami);
        }

        let text: String = self.buffer.iter().map(|k| k.to_lowercase()).collect();
        WORDS
            .iter()
            .find(|(word, _)| text.contains(word))
            .map(|(_, trigger)| *trigger)
    }

    fn ends_with_konami(&self) -> bool {
        let n = self.buffer.len();
        n >= KONAMI.len()
            && self
                .buffer
                .range(n - KONAMI.len()..)
                .zip(KONAMI)
                .all(|(key, code)| key == code)
    }
}

/// Counts clicks toward a threshold; reaching it fires and resets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickCounter {
    count: u32,
    threshold: u32,
}

impl ClickCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Register a click; true when this click reaches the threshold
    pub fn click(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.threshold {
            self.count = 0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
