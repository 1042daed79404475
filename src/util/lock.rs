//! Synchronization primitives.
//!
//! [`Mutex`] is a thin wrapper around [`spin::Mutex`]. [`IntMutex`] additionally disables
//! interrupts for the duration of the critical section, which is required for locks that can be
//! taken from both process context and interrupt context (the page fault handler being the
//! prime example in this crate).

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

pub use spin::MutexGuard;

/// A simple spinlock.
pub struct Mutex<T: ?Sized>(spin::Mutex<T>);

impl<T> Mutex<T> {
	/// Creates a new mutex holding `inner`.
	pub const fn new(inner: T) -> Self {
		Self(spin::Mutex::new(inner))
	}
}

impl<T: ?Sized> Mutex<T> {
	/// Locks the mutex, spinning until it becomes available.
	pub fn lock(&self) -> MutexGuard<'_, T> {
		self.0.lock()
	}
}

/// Disables interrupts for the lifetime of the value, restoring the previous state on drop.
struct NoInterrupts(bool);

impl NoInterrupts {
	/// Disables interrupts, remembering whether they were previously enabled.
	fn enter() -> Self {
		let enabled = interrupts_enabled();
		unsafe {
			core::arch::asm!("cli");
		}
		Self(enabled)
	}
}

impl Drop for NoInterrupts {
	fn drop(&mut self) {
		if self.0 {
			unsafe {
				core::arch::asm!("sti");
			}
		}
	}
}

#[cfg(target_arch = "x86")]
fn interrupts_enabled() -> bool {
	unsafe { (crate::register_get!("eflags") & (1 << 9)) != 0 }
}

#[cfg(not(target_arch = "x86"))]
fn interrupts_enabled() -> bool {
	false
}

/// A mutex that disables interrupts while locked.
///
/// This must be used instead of [`Mutex`] for any lock that can be contended from an interrupt
/// handler (such as the page fault handler locking a memory space), otherwise the kernel could
/// deadlock by taking an interrupt while the lock is held on the same CPU.
pub struct IntMutex<T: ?Sized> {
	guard: Mutex<()>,
	inner: UnsafeCell<T>,
}

unsafe impl<T: ?Sized + Send> Sync for IntMutex<T> {}

impl<T> IntMutex<T> {
	/// Creates a new interrupt-safe mutex holding `inner`.
	pub const fn new(inner: T) -> Self {
		Self {
			guard: Mutex::new(()),
			inner: UnsafeCell::new(inner),
		}
	}
}

impl<T: ?Sized> IntMutex<T> {
	/// Locks the mutex, disabling interrupts until the returned guard is dropped.
	pub fn lock(&self) -> IntMutexGuard<'_, T> {
		let _no_int = NoInterrupts::enter();
		let guard = self.guard.lock();
		IntMutexGuard {
			_guard: guard,
			_no_int,
			inner: self.inner.get(),
		}
	}
}

/// Guard returned by [`IntMutex::lock`].
pub struct IntMutexGuard<'m, T: ?Sized> {
	_guard: MutexGuard<'m, ()>,
	_no_int: NoInterrupts,
	inner: *mut T,
}

impl<T: ?Sized> Deref for IntMutexGuard<'_, T> {
	type Target = T;

	fn deref(&self) -> &T {
		unsafe { &*self.inner }
	}
}

impl<T: ?Sized> DerefMut for IntMutexGuard<'_, T> {
	fn deref_mut(&mut self) -> &mut T {
		unsafe { &mut *self.inner }
	}
}

/// A cell that is initialized exactly once, early in the boot process, then treated as `'static`
/// immutable state for the remainder of execution.
pub struct OnceInit<T>(UnsafeCell<MaybeUninitWrap<T>>);

use core::mem::MaybeUninit as MaybeUninitWrap;

unsafe impl<T: Sync> Sync for OnceInit<T> {}

impl<T> OnceInit<T> {
	/// Creates an uninitialized instance.
	///
	/// # Safety
	///
	/// The caller must call [`Self::init`] exactly once before calling [`Self::get`].
	pub const unsafe fn new() -> Self {
		Self(UnsafeCell::new(MaybeUninitWrap::uninit()))
	}

	/// Initializes the value.
	///
	/// # Safety
	///
	/// Must be called at most once, before any call to [`Self::get`].
	pub unsafe fn init(&self, val: T) {
		(*self.0.get()).write(val);
	}

	/// Returns a reference to the inner value.
	///
	/// # Panics
	///
	/// This does not check that [`Self::init`] was called; doing so before initialization is
	/// undefined behaviour.
	pub fn get(&self) -> &T {
		unsafe { (*self.0.get()).assume_init_ref() }
	}
}
