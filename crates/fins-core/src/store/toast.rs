//! Toast Store
//!
//! Auto-expiring notifications. Removal after the duration is delegated to a
//! [`Scheduler`] so the store stays independent of the host's timer API.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::events::Listeners;
use crate::config::DEFAULT_TOAST_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

/// One notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Monotonic id
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    /// 0 = stays until removed
    pub duration_ms: u32,
}

/// Runs a task once after a delay
pub trait Scheduler {
    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

#[derive(Debug, Default)]
struct ToastState {
    toasts: Vec<Toast>,
    next_id: u64,
}

/// Shared handle to the toast list
#[derive(Clone)]
pub struct ToastStore {
    state: Rc<RefCell<ToastState>>,
    scheduler: Rc<dyn Scheduler>,
    listeners: Listeners,
    default_duration_ms: u32,
}

impl ToastStore {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_duration(scheduler, DEFAULT_TOAST_MS)
    }

    pub fn with_duration(scheduler: Rc<dyn Scheduler>, default_duration_ms: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ToastState::default())),
            scheduler,
            listeners: Listeners::default(),
            default_duration_ms,
        }
    }

    /// Run `listener` whenever the list changes, timer removals included
    pub fn on_change(&self, listener: impl Fn() + 'static) {
        self.listeners.add(listener);
    }

    /// Append a toast and schedule its removal unless `duration_ms` is 0
    pub fn add(&self, message: impl Into<String>, kind: ToastKind, duration_ms: u32) -> u64 {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.toasts.push(Toast {
                id,
                message: message.into(),
                kind,
                duration_ms,
            });
            id
        };

        if duration_ms > 0 {
            let weak: Weak<RefCell<ToastState>> = Rc::downgrade(&self.state);
            let listeners = self.listeners.clone();
            self.scheduler.defer(
                duration_ms,
                Box::new(move || {
                    if let Some(state) = weak.upgrade() {
                        if remove_toast(&state, id) {
                            listeners.notify();
                        }
                    }
                }),
            );
        }
        self.listeners.notify();
        id
    }

    /// Remove by id; unknown ids are ignored
    pub fn remove(&self, id: u64) {
        if remove_toast(&self.state, id) {
            self.listeners.notify();
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.state.borrow().toasts.clone()
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Success, self.default_duration_ms)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Error, self.default_duration_ms)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Warning, self.default_duration_ms)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.add(message, ToastKind::Info, self.default_duration_ms)
    }
}

fn remove_toast(state: &RefCell<ToastState>, id: u64) -> bool {
    let mut state = state.borrow_mut();
    let before = state.toasts.len();
    state.toasts.retain(|t| t.id != id);
    state.toasts.len() != before
}
