// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    ChangeStatus,
    Delete,
    Create,
}

impl ActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChangeStatus => "status change",
            Self::Delete => "delete",
            Self::Create => "create",
        }
    }
}

/// Identifies one in-flight action. Creates have no row yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionKey {
    pub row_id: Option<i64>,
    pub kind: ActionKind,
}

impl ActionKey {
    pub const fn row(row_id: i64, kind: ActionKind) -> Self {
        Self {
            row_id: Some(row_id),
            kind,
        }
    }

    pub const fn create() -> Self {
        Self {
            row_id: None,
            kind: ActionKind::Create,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome<T> {
    /// The caller should reload its collection.
    Completed { value: T, notice: Notice },
    Failed(Notice),
    /// Same key already in flight; nothing ran.
    Busy(Notice),
}

impl<T> ActionOutcome<T> {
    pub fn notice(&self) -> &Notice {
        match self {
            Self::Completed { notice, .. } | Self::Failed(notice) | Self::Busy(notice) => notice,
        }
    }

    pub fn needs_reload(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Shared set of action keys currently in flight.
#[derive(Debug, Clone, Default)]
pub struct PendingActions {
    in_flight: Arc<Mutex<BTreeSet<ActionKey>>>,
}

impl PendingActions {
    pub fn is_busy(&self, key: ActionKey) -> bool {
        lock(&self.in_flight).contains(&key)
    }

    pub fn busy_count(&self) -> usize {
        lock(&self.in_flight).len()
    }

    /// Locks `key`, or returns `None` when it is already held.
    pub fn try_begin(&self, key: ActionKey) -> Option<InFlightGuard> {
        if !lock(&self.in_flight).insert(key) {
            return None;
        }
        Some(InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }

    /// Runs `op` under the lock for `key`. The lock is released whether `op`
    /// succeeds, fails or unwinds.
    pub fn run<T, F>(&self, key: ActionKey, label: &str, op: F) -> ActionOutcome<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let Some(_guard) = self.try_begin(key) else {
            tracing::debug!(?key, "action refused: already in flight");
            return ActionOutcome::Busy(Notice::info(format!(
                "{} already in progress",
                key.kind.label()
            )));
        };

        match op() {
            Ok(value) => {
                tracing::info!(?key, label, "action completed");
                ActionOutcome::Completed {
                    value,
                    notice: Notice::info(label.to_owned()),
                }
            }
            Err(error) => {
                tracing::warn!(?key, error = %format!("{error:#}"), "action failed");
                ActionOutcome::Failed(Notice::error(format!(
                    "{} failed: {error:#}",
                    key.kind.label()
                )))
            }
        }
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<Mutex<BTreeSet<ActionKey>>>,
    key: ActionKey,
}

impl InFlightGuard {
    pub fn key(&self) -> ActionKey {
        self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.key);
    }
}

fn lock(set: &Mutex<BTreeSet<ActionKey>>) -> MutexGuard<'_, BTreeSet<ActionKey>> {
    match set.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
