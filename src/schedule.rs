//! The frame scheduling hooks the reconciliation engine uses for deferred work.
//!
//! The bridge doesn't schedule anything itself. It only forwards the engine's requests to a [`FrameScheduler`].

use core::time::Duration;
use std::{cell::RefCell, collections::VecDeque, rc::Rc};
use tracing::trace;

pub type Callback = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

pub trait FrameScheduler {
	/// Queues `callback` to run once the host is idle.
	fn schedule(&mut self, callback: Callback) -> CallbackId;

	/// Returns whether `id` was still pending.
	fn cancel(&mut self, id: CallbackId) -> bool;

	/// Time since the scheduler's origin.
	fn now(&self) -> Duration;
}

#[derive(Default)]
struct Queue {
	next_id: u64,
	pending: VecDeque<(CallbackId, Callback)>,
	clock: Duration,
}

/// A scheduler that only runs callbacks when told to, with a clock that only moves when told to.
///
/// Clones share their queue and clock, so one clone can be handed to a [`SceneHost`](`crate::adapter::SceneHost`)
/// while another one drives it.
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<Queue>>);

impl core::fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let queue = self.0.borrow();
		f.debug_struct("ManualScheduler")
			.field("pending", &queue.pending.len())
			.field("clock", &queue.clock)
			.finish()
	}
}

impl ManualScheduler {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn pending(&self) -> usize {
		self.0.borrow().pending.len()
	}

	pub fn advance(&self, by: Duration) {
		self.0.borrow_mut().clock += by;
	}

	/// Runs callbacks in scheduling order until the queue is empty, including ones scheduled meanwhile.
	///
	/// Returns the number of callbacks that ran.
	pub fn run_pending(&self) -> usize {
		let mut ran = 0;
		loop {
			// The borrow must end before the callback runs, since it may schedule more work.
			let next = self.0.borrow_mut().pending.pop_front();
			match next {
				Some((id, callback)) => {
					trace!(?id, "Running deferred callback.");
					callback();
					ran += 1;
				}
				None => break ran,
			}
		}
	}
}

impl FrameScheduler for ManualScheduler {
	fn schedule(&mut self, callback: Callback) -> CallbackId {
		let mut queue = self.0.borrow_mut();
		let id = CallbackId(queue.next_id);
		queue.next_id += 1;
		queue.pending.push_back((id, callback));
		id
	}

	fn cancel(&mut self, id: CallbackId) -> bool {
		let mut queue = self.0.borrow_mut();
		let before = queue.pending.len();
		queue.pending.retain(|(candidate, _)| *candidate != id);
		queue.pending.len() != before
	}

	fn now(&self) -> Duration {
		self.0.borrow().clock
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	#[test]
	fn runs_in_order_and_cancels() {
		let driver = ManualScheduler::new();
		let mut scheduler = driver.clone();
		let log = Rc::new(RefCell::new(Vec::new()));

		let ids: Vec<_> = (0..3)
			.map(|i| {
				let log = Rc::clone(&log);
				scheduler.schedule(Box::new(move || log.borrow_mut().push(i)))
			})
			.collect();
		assert!(scheduler.cancel(ids[1]));
		assert!(!scheduler.cancel(ids[1]));

		assert_eq!(driver.pending(), 2);
		assert_eq!(driver.run_pending(), 2);
		assert_eq!(*log.borrow(), vec![0, 2]);
	}

	#[test]
	fn reentrant_scheduling() {
		let driver = ManualScheduler::new();
		let ran = Rc::new(Cell::new(0));

		let mut inner = driver.clone();
		let counter = Rc::clone(&ran);
		driver.clone().schedule(Box::new(move || {
			counter.set(counter.get() + 1);
			let counter = Rc::clone(&counter);
			inner.schedule(Box::new(move || counter.set(counter.get() + 1)));
		}));

		assert_eq!(driver.run_pending(), 2);
		assert_eq!(ran.get(), 2);
	}

	#[test]
	fn manual_clock() {
		let driver = ManualScheduler::new();
		assert_eq!(driver.now(), Duration::ZERO);
		driver.advance(Duration::from_millis(16));
		assert_eq!(driver.clone().now(), Duration::from_millis(16));
	}
}
