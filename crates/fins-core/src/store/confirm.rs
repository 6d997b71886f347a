//! Confirm Store
//!
//! Queue of pending confirmation dialogs. The head of the queue is the
//! visible dialog; answering it resolves its future and shows the next one.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use super::events::Listeners;

/// Dialog text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmOptions {
    pub title: String,
    pub content: String,
    pub confirm_text: String,
    pub cancel_text: String,
    /// Render the confirm button as destructive
    pub is_danger: bool,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: "Confirm".to_string(),
            content: String::new(),
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            is_danger: false,
        }
    }
}

impl ConfirmOptions {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn danger(mut self) -> Self {
        self.is_danger = true;
        self
    }
}

struct PendingConfirm {
    options: ConfirmOptions,
    responder: oneshot::Sender<bool>,
}

/// Shared handle to the dialog queue
#[derive(Clone, Default)]
pub struct ConfirmStore {
    queue: Rc<RefCell<VecDeque<PendingConfirm>>>,
    listeners: Listeners,
}

impl ConfirmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `listener` whenever a dialog is queued or answered
    pub fn on_change(&self, listener: impl Fn() + 'static) {
        self.listeners.add(listener);
    }

    /// Enqueue a dialog. The request is registered immediately; the returned
    /// future resolves once the user answers, or to `false` if the request is
    /// discarded unanswered.
    pub fn show(&self, options: ConfirmOptions) -> impl Future<Output = bool> {
        let (responder, answer) = oneshot::channel();
        self.queue
            .borrow_mut()
            .push_back(PendingConfirm { options, responder });
        self.listeners.notify();
        async move { answer.await.unwrap_or(false) }
    }

    /// Whether a dialog is showing
    pub fn visible(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    /// Options of the visible dialog
    pub fn current(&self) -> Option<ConfirmOptions> {
        self.queue.borrow().front().map(|p| p.options.clone())
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn handle_confirm(&self) {
        self.resolve(true);
    }

    pub fn handle_cancel(&self) {
        self.resolve(false);
    }

    fn resolve(&self, answer: bool) {
        let head = self.queue.borrow_mut().pop_front();
        if let Some(pending) = head {
            // Receiver gone means the caller stopped waiting
            let _ = pending.responder.send(answer);
            self.listeners.notify();
        }
    }
}
