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

//! The buddy allocator allocates physical memory in power-of-two-sized frames.
//!
//! It divides zones of memory in half repeatedly until a frame of the requested order is
//! available, and merges buddies back together on free. This is the physical page allocator that
//! backs every demand-paged and copy-on-write mapping in a memory space.

use core::cmp::min;
use core::ffi::c_void;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

use crate::errno::{AllocError, AllocResult};
use crate::util::lock::Mutex;

/// The order of a frame, i.e. the `n` in `2^n` pages.
pub type FrameOrder = u8;
/// Buddy allocator flags.
pub type Flags = i32;
/// Identifier of a frame inside a zone, used as an index into the zone's frame metadata array.
type FrameId = u32;

/// The maximum order of a frame that can be allocated.
pub const MAX_ORDER: FrameOrder = 17;

/// Mask isolating the zone type out of a set of [`Flags`].
const ZONE_TYPE_MASK: Flags = 0b11;
/// Allocate from the zone used for ordinary user-space pages.
pub const FLAG_ZONE_TYPE_USER: Flags = 0b00;
/// Allocate from the zone reserved for kernel structures (page tables, kernel heap, ...).
pub const FLAG_ZONE_TYPE_KERNEL: Flags = 0b01;
/// Allocate from the zone usable for DMA transfers.
pub const FLAG_ZONE_TYPE_DMA: Flags = 0b10;

/// Value marking a frame as currently allocated in a zone's free list.
const FRAME_STATE_USED: FrameId = FrameId::MAX;

/// Per-zone frame metadata, stored in a side array parallel to the zone's memory.
///
/// Free frames form an intrusive doubly linked free list per order, storing only frame indices to
/// avoid needing its own allocator.
#[derive(Clone, Copy)]
struct Frame {
	prev: FrameId,
	next: FrameId,
	order: FrameOrder,
}

/// A contiguous region of physical memory managed by the buddy allocator.
struct Zone {
	type_: Flags,
	allocated_pages: usize,
	begin: *mut c_void,
	pages: usize,
	frames: alloc::vec::Vec<Frame>,
	free_list: [FrameId; (MAX_ORDER + 1) as usize],
}

unsafe impl Send for Zone {}

impl Zone {
	fn new(type_: Flags, begin: *mut c_void, size: usize) -> Self {
		let pages = size / crate::memory::PAGE_SIZE;
		let mut frames = alloc::vec![
			Frame {
				prev: FRAME_STATE_USED,
				next: FRAME_STATE_USED,
				order: 0,
			};
			pages
		];
		let mut free_list = [FRAME_STATE_USED; (MAX_ORDER + 1) as usize];
		// Build the largest possible free blocks covering the zone.
		let mut id = 0usize;
		while id < pages {
			let mut order = min(MAX_ORDER, get_order((pages - id).max(1)).saturating_sub(1));
			while get_frame_size(order) > (pages - id) * crate::memory::PAGE_SIZE {
				if order == 0 {
					break;
				}
				order -= 1;
			}
			frames[id].order = order;
			Self::list_push(&mut frames, &mut free_list, order, id as FrameId);
			id += 1usize << order;
		}
		Self {
			type_,
			allocated_pages: 0,
			begin,
			pages,
			frames,
			free_list,
		}
	}

	fn list_push(
		frames: &mut [Frame],
		free_list: &mut [FrameId; (MAX_ORDER + 1) as usize],
		order: FrameOrder,
		id: FrameId,
	) {
		let head = free_list[order as usize];
		frames[id as usize].next = head;
		frames[id as usize].prev = FRAME_STATE_USED;
		if head != FRAME_STATE_USED {
			frames[head as usize].prev = id;
		}
		free_list[order as usize] = id;
	}

	fn list_remove(&mut self, order: FrameOrder, id: FrameId) {
		let (prev, next) = (self.frames[id as usize].prev, self.frames[id as usize].next);
		if prev != FRAME_STATE_USED {
			self.frames[prev as usize].next = next;
		} else {
			self.free_list[order as usize] = next;
		}
		if next != FRAME_STATE_USED {
			self.frames[next as usize].prev = prev;
		}
	}

	fn buddy_id(id: FrameId, order: FrameOrder) -> FrameId {
		id ^ (1 << order)
	}

	fn get_available_frame(&mut self, order: FrameOrder) -> Option<FrameId> {
		let mut o = order;
		while o <= MAX_ORDER {
			if self.free_list[o as usize] != FRAME_STATE_USED {
				let id = self.free_list[o as usize];
				self.list_remove(o, id);
				// Split down to the requested order.
				let mut split_order = o;
				while split_order > order {
					split_order -= 1;
					let buddy = id + (1 << split_order);
					self.frames[buddy as usize].order = split_order;
					Self::list_push(&mut self.frames, &mut self.free_list, split_order, buddy);
				}
				self.frames[id as usize].order = order;
				return Some(id);
			}
			o += 1;
		}
		None
	}

	fn free_frame(&mut self, mut id: FrameId, mut order: FrameOrder) {
		while order < MAX_ORDER {
			let buddy = Self::buddy_id(id, order);
			if buddy as usize >= self.pages || self.frames[buddy as usize].order != order {
				break;
			}
			if !self.is_in_free_list(order, buddy) {
				break;
			}
			self.list_remove(order, buddy);
			id = min(id, buddy);
			order += 1;
		}
		self.frames[id as usize].order = order;
		Self::list_push(&mut self.frames, &mut self.free_list, order, id);
	}

	fn is_in_free_list(&self, order: FrameOrder, id: FrameId) -> bool {
		let mut cur = self.free_list[order as usize];
		while cur != FRAME_STATE_USED {
			if cur == id {
				return true;
			}
			cur = self.frames[cur as usize].next;
		}
		false
	}

	fn frame_ptr(&self, id: FrameId) -> *mut c_void {
		((self.begin as usize) + (id as usize) * crate::memory::PAGE_SIZE) as *mut c_void
	}

	fn contains(&self, ptr: *const c_void) -> bool {
		ptr >= self.begin && (ptr as usize) < (self.begin as usize) + self.pages * crate::memory::PAGE_SIZE
	}

	fn ptr_to_id(&self, ptr: *const c_void) -> FrameId {
		(((ptr as usize) - (self.begin as usize)) / crate::memory::PAGE_SIZE) as FrameId
	}
}

/// The zones of physical memory known to the allocator.
///
/// Populated once by [`init`]; `None` before that point.
static ZONES: Mutex<MaybeUninit<[Zone; 2]>> = Mutex::new(MaybeUninit::uninit());
static ZONES_READY: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);

/// The size in bytes of a frame of the given `order`.
pub fn get_frame_size(order: FrameOrder) -> usize {
	crate::memory::PAGE_SIZE << order
}

/// Returns the smallest order whose frame size can hold `pages` pages.
pub fn get_order(pages: usize) -> FrameOrder {
	let mut order: FrameOrder = 0;
	let mut i = 1usize;
	while i < pages {
		i *= 2;
		order += 1;
	}
	order
}

/// Initializes the buddy allocator over the physical range `[begin, begin + size)`.
///
/// `kernel_size` bytes at the beginning of the range are reserved for the kernel zone (page
/// tables and kernel-only allocations); the rest backs user-space pages.
pub fn init(begin: *mut c_void, size: usize, kernel_size: usize) {
	let kernel_size = min(kernel_size, size);
	let zones = [
		Zone::new(FLAG_ZONE_TYPE_KERNEL, begin, kernel_size),
		Zone::new(
			FLAG_ZONE_TYPE_USER,
			(begin as usize + kernel_size) as *mut c_void,
			size - kernel_size,
		),
	];
	*ZONES.lock() = MaybeUninit::new(zones);
	ZONES_READY.store(true, core::sync::atomic::Ordering::Release);
}

fn with_zones<R>(f: impl FnOnce(&mut [Zone; 2]) -> R) -> R {
	debug_assert!(ZONES_READY.load(core::sync::atomic::Ordering::Acquire));
	let mut guard = ZONES.lock();
	f(unsafe { guard.assume_init_mut() })
}

/// Allocates a frame of `2^order` pages from the zone selected by `flags`.
pub fn alloc(order: FrameOrder, flags: Flags) -> AllocResult<NonNull<c_void>> {
	debug_assert!(order <= MAX_ORDER);
	let zone_type = flags & ZONE_TYPE_MASK;
	with_zones(|zones| {
		let zone = zones.iter_mut().find(|z| z.type_ == zone_type).ok_or(AllocError)?;
		let id = zone.get_available_frame(order).ok_or(AllocError)?;
		zone.allocated_pages += 1 << order;
		NonNull::new(zone.frame_ptr(id)).ok_or(AllocError)
	})
}

/// Allocates a frame like [`alloc`] and zeroes its content.
///
/// Demand-paged mappings must always hand out zeroed pages so that a process never observes
/// another process's data through a freshly faulted-in frame.
pub fn alloc_zero(order: FrameOrder, flags: Flags) -> AllocResult<NonNull<c_void>> {
	let ptr = alloc(order, flags)?;
	unsafe {
		crate::util::bzero(ptr.as_ptr(), get_frame_size(order));
	}
	Ok(ptr)
}

/// Convenience wrapper allocating a single zeroed kernel-zone page.
pub fn alloc_kernel(order: FrameOrder) -> AllocResult<NonNull<c_void>> {
	alloc_zero(order, FLAG_ZONE_TYPE_KERNEL)
}

/// Frees a frame previously returned by [`alloc`]/[`alloc_zero`].
///
/// `order` must match the order used at allocation time.
pub fn free(ptr: *const c_void, order: FrameOrder) {
	debug_assert!(order <= MAX_ORDER);
	with_zones(|zones| {
		if let Some(zone) = zones.iter_mut().find(|z| z.contains(ptr)) {
			let id = zone.ptr_to_id(ptr);
			zone.allocated_pages -= 1 << order;
			zone.free_frame(id, order);
		}
	});
}

/// Frees a frame previously returned by [`alloc_kernel`].
pub fn free_kernel(ptr: *const c_void, order: FrameOrder) {
	free(ptr, order);
}

/// Returns the total number of pages currently allocated across all zones.
pub fn allocated_pages() -> usize {
	with_zones(|zones| zones.iter().map(|z| z.allocated_pages).sum())
}
