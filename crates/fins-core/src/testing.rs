//! Test support: a hand-cranked scheduler and a dashboard over memory storage.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::StoreConfig;
use crate::repository::MemoryStorage;
use crate::store::{ConfirmStore, Persister, Scheduler};
use crate::Dashboard;

type Task = Box<dyn FnOnce()>;

/// Collects deferred tasks until the test runs them
#[derive(Default)]
pub struct ManualScheduler {
    tasks: RefCell<Vec<(u32, Task)>>,
}

impl ManualScheduler {
    pub fn pending_delays(&self) -> Vec<u32> {
        self.tasks.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    pub fn run_all(&self) {
        let tasks: Vec<(u32, Task)> = self.tasks.borrow_mut().drain(..).collect();
        for (_, task) in tasks {
            task();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay_ms: u32, task: Task) {
        self.tasks.borrow_mut().push((delay_ms, task));
    }
}

pub struct Harness {
    pub app: Dashboard,
    pub persister: Persister,
    pub storage: Rc<MemoryStorage>,
}

pub fn harness() -> Harness {
    let config = StoreConfig::default();
    harness_with(MemoryStorage::for_config(&config), config)
}

pub fn harness_with(storage: MemoryStorage, config: StoreConfig) -> Harness {
    let storage = Rc::new(storage);
    let (app, persister) = Dashboard::new(storage.clone(), Rc::new(ManualScheduler::default()), config);
    Harness {
        app,
        persister,
        storage,
    }
}

/// Answer the next confirm dialog once it shows up. Run alongside the flow
/// that raises it (`futures::join!`).
pub async fn answer(confirm: &ConfirmStore, accept: bool) {
    while !confirm.visible() {
        tokio::task::yield_now().await;
    }
    if accept {
        confirm.handle_confirm();
    } else {
        confirm.handle_cancel();
    }
}

/// Latest toast messages, oldest first
pub fn toast_messages(app: &Dashboard) -> Vec<String> {
    app.toast.toasts().into_iter().map(|t| t.message).collect()
}
