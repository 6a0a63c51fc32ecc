// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Cancellable single-slot timer.
//!
//! A `Debouncer` holds at most one pending value. Scheduling replaces the
//! pending value and issues a fresh token, so a timer armed for an older
//! token can never deliver a stale value. Callers drive it either by polling
//! with the current instant or by firing the token a timer thread sent back.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DebounceToken(u64);

impl DebounceToken {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    token: DebounceToken,
    /// `None` when the delay runs past the clock's range; only `fire` or
    /// `flush` deliver such a value.
    due: Option<Instant>,
    value: T,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn schedule(&mut self, value: T, now: Instant) -> DebounceToken {
        self.generation = self.generation.saturating_add(1);
        let token = DebounceToken(self.generation);
        self.pending = Some(Pending {
            token,
            due: now.checked_add(self.delay),
            value,
        });
        token
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_token(&self) -> Option<DebounceToken> {
        self.pending.as_ref().map(|pending| pending.token)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().and_then(|pending| pending.due)
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .and_then(|pending| pending.due)
            .is_some_and(|due| due <= now);
        if due {
            self.cancel()
        } else {
            None
        }
    }

    /// Delivers the pending value only if `token` is still the latest one.
    pub fn fire(&mut self, token: DebounceToken) -> Option<T> {
        if self.pending_token() == Some(token) {
            self.cancel()
        } else {
            None
        }
    }

    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }
}
