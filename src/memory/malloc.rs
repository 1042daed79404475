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

//! The kernel's heap allocator, backing `alloc::{boxed, vec, collections, sync}`.
//!
//! Memory is carved out of pages obtained from the buddy allocator and split into a singly
//! linked free list of chunks, coalescing adjacent free chunks on deallocation.

use core::alloc::{GlobalAlloc, Layout};
use core::mem::size_of;
use core::ptr::{self, NonNull};

use crate::memory::buddy;
use crate::memory::PAGE_SIZE;
use crate::util::lock::Mutex;

/// Header placed right before every chunk, free or allocated.
#[repr(C)]
struct Chunk {
	/// Size of the usable memory following this header, in bytes.
	size: usize,
	/// Next free chunk, if this chunk is free.
	next: *mut Chunk,
}

const HEADER_SIZE: usize = size_of::<Chunk>();

/// The kernel heap allocator.
struct Heap {
	free_list: *mut Chunk,
}

unsafe impl Send for Heap {}

impl Heap {
	const fn new() -> Self {
		Self {
			free_list: ptr::null_mut(),
		}
	}

	/// Grows the heap by requesting a new zone of physical memory from the buddy allocator,
	/// large enough to satisfy at least `min_size` bytes, and pushes it onto the free list.
	fn grow(&mut self, min_size: usize) -> bool {
		let needed = min_size + HEADER_SIZE;
		let order = buddy::get_order(needed.div_ceil(PAGE_SIZE));
		let Ok(ptr) = buddy::alloc(order, buddy::FLAG_ZONE_TYPE_KERNEL) else {
			return false;
		};
		let chunk = ptr.as_ptr() as *mut Chunk;
		unsafe {
			(*chunk).size = buddy::get_frame_size(order) - HEADER_SIZE;
			(*chunk).next = self.free_list;
		}
		self.free_list = chunk;
		true
	}

	/// Removes and returns the first free chunk large enough for `size` bytes, splitting it if
	/// it is significantly larger than needed.
	fn take(&mut self, size: usize) -> Option<*mut Chunk> {
		let mut prev: *mut Chunk = ptr::null_mut();
		let mut cur = self.free_list;
		while !cur.is_null() {
			let chunk_size = unsafe { (*cur).size };
			if chunk_size >= size {
				let next = unsafe { (*cur).next };
				if prev.is_null() {
					self.free_list = next;
				} else {
					unsafe {
						(*prev).next = next;
					}
				}
				self.split(cur, size);
				return Some(cur);
			}
			prev = cur;
			cur = unsafe { (*cur).next };
		}
		None
	}

	/// If `chunk` has enough slack past `size` to host another chunk header plus some payload,
	/// splits off the remainder and returns it to the free list.
	fn split(&mut self, chunk: *mut Chunk, size: usize) {
		let chunk_size = unsafe { (*chunk).size };
		if chunk_size < size + HEADER_SIZE + 16 {
			return;
		}
		unsafe {
			let remainder = (chunk as *mut u8).add(HEADER_SIZE + size) as *mut Chunk;
			(*remainder).size = chunk_size - size - HEADER_SIZE;
			(*remainder).next = self.free_list;
			self.free_list = remainder;
			(*chunk).size = size;
		}
	}

	/// Returns `chunk` to the free list.
	fn give_back(&mut self, chunk: *mut Chunk) {
		unsafe {
			(*chunk).next = self.free_list;
		}
		self.free_list = chunk;
	}
}

static HEAP: Mutex<Heap> = Mutex::new(Heap::new());

/// The kernel's global allocator.
pub struct KernelAllocator;

unsafe impl GlobalAlloc for KernelAllocator {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		let size = layout.size().max(layout.align());
		let mut heap = HEAP.lock();
		let chunk = loop {
			if let Some(chunk) = heap.take(size) {
				break chunk;
			}
			if !heap.grow(size) {
				return ptr::null_mut();
			}
		};
		(chunk as *mut u8).add(HEADER_SIZE)
	}

	unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
		let chunk = ptr.sub(HEADER_SIZE) as *mut Chunk;
		HEAP.lock().give_back(chunk);
	}
}

/// Returns a pointer usable as a scratch destination of at least `len` bytes, used by the
/// copy-on-write fault path to stage a page's contents across an allocation.
///
/// # Safety
///
/// The returned pointer must be deallocated with the same `len` once no longer needed.
pub unsafe fn alloc_bytes(len: usize) -> Option<NonNull<u8>> {
	let layout = Layout::from_size_align(len, 1).ok()?;
	NonNull::new(KernelAllocator.alloc(layout))
}
