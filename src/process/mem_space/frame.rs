/*
 * Copyright 2024 Luc Lenôtre
 *
 * This file is part of Maestro.
 *
 * Maestro is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * Maestro is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * Maestro. If not, see <https://www.gnu.org/licenses/>.
 */

//! A physical page frame owned, possibly jointly, by one or more regions.
//!
//! A region never holds a bare pointer to the physical memory backing one of its pages: it holds
//! an [`Arc<Frame>`]. Cloning a memory space clones that `Arc` instead of splicing a linked list
//! of sibling mappings together, which is this crate's way of realizing a shared ring of
//! copy-on-write owners (see [`crate::process::mem_space`]'s module documentation). The frame is
//! handed back to the buddy allocator exactly when the last `Arc` referencing it is dropped.

use core::ffi::c_void;
use core::ptr::NonNull;

use crate::errno::AllocResult;
use crate::memory::buddy;
use crate::memory::buddy::FrameOrder;
use crate::util::arc::Arc;

/// A single physical page frame, owned through reference counting.
pub struct Frame {
	/// The physical address of the frame.
	ptr: NonNull<c_void>,
	/// The order the frame was allocated with.
	order: FrameOrder,
}

// Frames are moved freely between regions living in different memory spaces, possibly accessed
// from different CPUs; the buddy allocator backing them is internally synchronized.
unsafe impl Send for Frame {}
unsafe impl Sync for Frame {}

impl Frame {
	/// Allocates a new, zeroed physical page and wraps it for shared ownership.
	pub fn new_zeroed() -> AllocResult<Arc<Self>> {
		let ptr = buddy::alloc_zero(0, buddy::FLAG_ZONE_TYPE_USER)?;
		Arc::new(Self {
			ptr,
			order: 0,
		})
	}

	/// Returns the physical address of the frame.
	pub fn as_ptr(&self) -> *const c_void {
		self.ptr.as_ptr()
	}
}

impl Drop for Frame {
	fn drop(&mut self) {
		buddy::free(self.ptr.as_ptr(), self.order);
	}
}
