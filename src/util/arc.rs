//! A fallible, atomically reference-counted pointer.
//!
//! This is the same role as [`alloc::sync::Arc`], except construction reports allocation failure
//! instead of aborting, matching the rest of this crate's containers. It backs the shared-frame
//! handles a memory space's regions hold: cloning a region's `Arc<Frame>` (bumping the count) is
//! how physical pages end up shared copy-on-write across cloned memory spaces.

use core::ops::Deref;
use core::ptr::NonNull;
use core::sync::atomic::{fence, AtomicUsize, Ordering};

use alloc::alloc::{alloc, dealloc, Layout};

use crate::errno::{AllocError, AllocResult};

struct ArcInner<T> {
	strong: AtomicUsize,
	data: T,
}

/// An atomically reference-counted pointer to a heap-allocated `T`.
pub struct Arc<T> {
	ptr: NonNull<ArcInner<T>>,
}

unsafe impl<T: Sync + Send> Send for Arc<T> {}
unsafe impl<T: Sync + Send> Sync for Arc<T> {}

impl<T> Arc<T> {
	/// Allocates a new reference-counted `data`.
	pub fn new(data: T) -> AllocResult<Self> {
		let layout = Layout::new::<ArcInner<T>>();
		let raw = unsafe { alloc(layout) } as *mut ArcInner<T>;
		let ptr = NonNull::new(raw).ok_or(AllocError)?;
		unsafe {
			ptr.as_ptr().write(ArcInner {
				strong: AtomicUsize::new(1),
				data,
			});
		}
		Ok(Self {
			ptr,
		})
	}

	/// Returns the number of live handles to the same value, including `this`.
	pub fn strong_count(this: &Self) -> usize {
		unsafe { this.ptr.as_ref().strong.load(Ordering::Acquire) }
	}
}

impl<T> Deref for Arc<T> {
	type Target = T;

	fn deref(&self) -> &T {
		unsafe { &self.ptr.as_ref().data }
	}
}

impl<T> Clone for Arc<T> {
	fn clone(&self) -> Self {
		unsafe {
			self.ptr.as_ref().strong.fetch_add(1, Ordering::Relaxed);
		}
		Self {
			ptr: self.ptr,
		}
	}
}

impl<T> Drop for Arc<T> {
	fn drop(&mut self) {
		unsafe {
			if self.ptr.as_ref().strong.fetch_sub(1, Ordering::Release) != 1 {
				return;
			}
			fence(Ordering::Acquire);
			core::ptr::drop_in_place(self.ptr.as_ptr());
			dealloc(self.ptr.as_ptr() as *mut u8, Layout::new::<ArcInner<T>>());
		}
	}
}
