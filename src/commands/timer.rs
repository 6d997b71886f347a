//! Timer Scheduler
//!
//! Runs deferred store tasks (toast expiry) on `setTimeout`.

use fins_core::store::Scheduler;
use gloo_timers::callback::Timeout;

#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn defer(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        // The store owns cancellation, so the handle is never kept
        Timeout::new(delay_ms, task).forget();
    }
}
