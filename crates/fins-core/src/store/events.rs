//! Change Events
//!
//! Mutators publish what changed; the persister subscribes and writes.
//! View-only stores (toasts, dialogs) notify plain listeners instead.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use log::debug;

/// Slice of state that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// Grid item list
    Items,
    /// Group list
    Groups,
    /// Active group id
    CurrentGroup,
    /// Any persisted preference
    Settings,
}

/// Publishing side of the change channel
#[derive(Debug, Clone)]
pub struct ChangeSender {
    tx: Option<UnboundedSender<Change>>,
}

impl ChangeSender {
    /// A sender nobody listens to; changes are dropped
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn publish(&self, change: Change) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.unbounded_send(change).is_err() {
            debug!("[events] {:?} dropped, persister is gone", change);
        }
    }
}

/// Receiving side, owned by the persister
pub type ChangeReceiver = UnboundedReceiver<Change>;

pub fn change_channel() -> (ChangeSender, ChangeReceiver) {
    let (tx, rx) = unbounded();
    (ChangeSender { tx: Some(tx) }, rx)
}

/// Callbacks run after a view-only store changes
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl Listeners {
    pub fn add(&self, listener: impl Fn() + 'static) {
        self.inner.borrow_mut().push(Rc::new(listener));
    }

    pub fn notify(&self) {
        // Listeners may register more listeners
        let listeners: Vec<Rc<dyn Fn()>> = self.inner.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}
