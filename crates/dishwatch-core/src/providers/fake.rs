//! Scripted provider for tests.
//!
//! Each operation pops the next queued response. An exhausted queue answers
//! with [`ProviderError::Unavailable`], which is what a dish that went away
//! looks like to callers.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::provider::{DishProvider, ProviderError, Result};
use crate::snapshot::{MetricSnapshot, ObstructionMap, StatusErrors};

/// Minimal fake dish used in tests to script provider responses.
#[derive(Default)]
pub struct FakeProvider {
    status: RefCell<VecDeque<Result<(MetricSnapshot, StatusErrors)>>>,
    obstruction: RefCell<VecDeque<Result<(ObstructionMap, StatusErrors)>>>,
    history: RefCell<VecDeque<Result<MetricSnapshot>>>,
    calls: Cell<usize>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, snapshot: MetricSnapshot, errors: StatusErrors) -> &Self {
        self.status.borrow_mut().push_back(Ok((snapshot, errors)));
        self
    }

    pub fn push_status_error(&self, err: ProviderError) -> &Self {
        self.status.borrow_mut().push_back(Err(err));
        self
    }

    pub fn push_obstruction(&self, map: ObstructionMap) -> &Self {
        self.obstruction
            .borrow_mut()
            .push_back(Ok((map, StatusErrors::new())));
        self
    }

    pub fn push_history(&self, snapshot: MetricSnapshot) -> &Self {
        self.history.borrow_mut().push_back(Ok(snapshot));
        self
    }

    pub fn push_history_error(&self, err: ProviderError) -> &Self {
        self.history.borrow_mut().push_back(Err(err));
        self
    }

    /// Total provider calls served, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn next<T>(&self, queue: &RefCell<VecDeque<Result<T>>>, what: &str) -> Result<T> {
        self.calls.set(self.calls.get() + 1);
        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unavailable(format!("no scripted {what}"))))
    }
}

impl DishProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn get_status(&self) -> Result<(MetricSnapshot, StatusErrors)> {
        self.next(&self.status, "status")
    }

    fn get_obstruction_map(&self) -> Result<(ObstructionMap, StatusErrors)> {
        self.next(&self.obstruction, "obstruction map")
    }

    fn history_ping_stats(&self) -> Result<MetricSnapshot> {
        self.next(&self.history, "history")
    }

    fn requires_dish(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MetricValue;

    #[test]
    fn test_script_order_then_exhaustion() {
        let fake = FakeProvider::new();
        let mut a = MetricSnapshot::new();
        a.insert("ping_a".into(), MetricValue::Int(1));
        fake.push_status(a.clone(), vec![])
            .push_status_error(ProviderError::Unavailable("down".into()));

        assert_eq!(fake.get_status().unwrap().0, a);
        assert!(fake.get_status().is_err());
        match fake.get_status() {
            Err(ProviderError::Unavailable(msg)) => assert_eq!(msg, "no scripted status"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(fake.calls(), 3);
    }

    #[test]
    fn test_history_queue_independent() {
        let fake = FakeProvider::new();
        fake.push_history(MetricSnapshot::new());
        assert!(fake.history_ping_stats().is_ok());
        assert!(fake.get_status().is_err());
    }
}
