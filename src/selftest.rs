//! Support for the kernel's built-in test framework.
//!
//! Tests are ordinary functions tagged `#[test_case]`; [`runner`] is wired up as the crate's
//! `#![test_runner]` and simply runs each of them in turn, printing a name and a pass/fail line.

use core::sync::atomic::{AtomicBool, Ordering};

/// Set for the duration of [`runner`], so other subsystems (notably the panic handler) can tell
/// a failing test from a genuine runtime panic.
static RUNNING: AtomicBool = AtomicBool::new(false);

/// Tells whether the kernel is currently running its test suite.
pub fn is_running() -> bool {
	RUNNING.load(Ordering::Relaxed)
}

/// A single test case, blanket-implemented for any no-argument function.
pub trait Testable {
	fn run(&self);
}

impl<T: Fn()> Testable for T {
	fn run(&self) {
		print!("test {} ... ", core::any::type_name::<T>());
		self();
		println!("ok");
	}
}

/// Runs every test registered via `#[test_case]`.
pub fn runner(tests: &[&dyn Testable]) {
	RUNNING.store(true, Ordering::Relaxed);
	println!("running {} tests", tests.len());
	for test in tests {
		test.run();
	}
	RUNNING.store(false, Ordering::Relaxed);
}
