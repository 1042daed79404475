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

//! A region is a chunk of virtual memory allocated to a process.
//!
//! Unlike the gaps it is carved out of, a region's physical backing is materialized lazily: its
//! pages stay unmapped (and its `frames` slot `None`) until the first page fault on them.

use core::ffi::c_void;
use core::num::NonZeroUsize;

use super::frame::Frame;
use crate::errno::AllocResult;
use crate::memory;
use crate::memory::vmem::VMem;
use crate::util::arc::Arc;
use crate::util::collections::vec::Vec;
use crate::util::TryClone;

/// Region flag: the region can be written to.
pub const REGION_FLAG_WRITE: u8 = 0b001;
/// Region flag: the region is accessible from userspace.
pub const REGION_FLAG_USER: u8 = 0b010;
/// Region flag: the region backs a stack, growing down from its last page.
pub const REGION_FLAG_STACK: u8 = 0b100;

/// A contiguous, allocated range of virtual memory pages.
pub struct Region {
	/// The virtual address of the beginning of the region.
	begin: usize,
	/// The size of the region in pages.
	pages: NonZeroUsize,
	/// The region's access flags, a combination of `REGION_FLAG_*`.
	flags: u8,
	/// Per-page physical backing. `None` until the page is first faulted in.
	frames: Vec<Option<Arc<Frame>>>,
}

impl Region {
	/// Creates a new region of `pages` pages starting at `begin`, with the given `flags`.
	///
	/// All pages are marked in use immediately: backing is reserved, not yet committed.
	pub fn new(begin: *const c_void, pages: NonZeroUsize, flags: u8) -> AllocResult<Self> {
		debug_assert_eq!(begin as usize % memory::PAGE_SIZE, 0);
		let mut frames = Vec::with_capacity(pages.get())?;
		for _ in 0..pages.get() {
			frames.push(None)?;
		}
		Ok(Self {
			begin: begin as usize,
			pages,
			flags,
			frames,
		})
	}

	/// Returns the virtual address of the beginning of the region.
	pub fn begin(&self) -> *const c_void {
		self.begin as *const c_void
	}

	/// Returns the size of the region in pages.
	pub fn pages(&self) -> usize {
		self.pages.get()
	}

	/// Returns the region's flags.
	pub fn flags(&self) -> u8 {
		self.flags
	}

	/// Returns the virtual address of the last byte of the region.
	///
	/// Used to compute the initial stack pointer of a stack region.
	pub fn last_byte(&self) -> *const c_void {
		(self.begin + self.pages.get() * memory::PAGE_SIZE - 1) as *const c_void
	}

	/// Tells whether `addr` falls inside the region.
	pub fn contains(&self, addr: *const c_void) -> bool {
		let addr = addr as usize;
		addr >= self.begin && addr < self.begin + self.pages.get() * memory::PAGE_SIZE
	}

	/// Returns the page index of `addr` within the region.
	///
	/// `addr` must satisfy [`Self::contains`].
	fn page_index(&self, addr: *const c_void) -> usize {
		(addr as usize - self.begin) / memory::PAGE_SIZE
	}

	/// Returns the frame slot backing the page at `addr`, if any is currently installed.
	pub fn frame_at(&self, addr: *const c_void) -> Option<&Arc<Frame>> {
		self.frames.get(self.page_index(addr))?.as_ref()
	}

	/// Tells whether the page at `addr` is shared with at least one other region (i.e. would be
	/// copy-on-write under a write access).
	pub fn is_shared_at(&self, addr: *const c_void) -> bool {
		self.frame_at(addr)
			.map(|f| Arc::strong_count(f) > 1)
			.unwrap_or(false)
	}

	/// Installs `frame` as the backing of the page at `addr`, replacing whatever was there.
	pub fn set_frame_at(&mut self, addr: *const c_void, frame: Arc<Frame>) {
		let index = self.page_index(addr);
		if let Some(slot) = self.frames.get_mut(index) {
			*slot = Some(frame);
		}
	}

	/// Returns an iterator over `(page index, virtual address, frame)` for every page currently
	/// backed by a physical frame.
	pub fn mapped_pages(&self) -> impl Iterator<Item = (usize, *const c_void, &Arc<Frame>)> + '_ {
		self.frames.iter().enumerate().filter_map(move |(i, f)| {
			f.as_ref()
				.map(|f| (i, (self.begin + i * memory::PAGE_SIZE) as *const c_void, f))
		})
	}

	/// Marks every currently-mapped, writable page of this region as copy-on-write by clearing
	/// its hardware write bit in `vmem`, without touching the logical region flags.
	///
	/// Called on the parent's regions during [`super::MemSpace::try_clone`].
	pub fn write_protect(&self, vmem: &mut impl memory::vmem::VMem) -> AllocResult<()> {
		if self.flags & REGION_FLAG_WRITE == 0 {
			return Ok(());
		}
		for (_, virtaddr, _) in self.mapped_pages() {
			let Some(physaddr) = vmem.translate(virtaddr) else {
				continue;
			};
			let mut flags = 0;
			if self.flags & REGION_FLAG_USER != 0 {
				flags |= memory::vmem::FLAG_USER;
			}
			unsafe {
				vmem.map(physaddr, virtaddr, flags)?;
			}
		}
		Ok(())
	}
}

impl TryClone for Region {
	/// Clones the region, bumping the reference count of every mapped frame: the clone shares its
	/// physical pages with the original until a write fault resolves the sharing.
	fn try_clone(&self) -> AllocResult<Self> {
		let mut frames = Vec::with_capacity(self.frames.len())?;
		for f in &self.frames {
			frames.push(f.clone())?;
		}
		Ok(Self {
			begin: self.begin,
			pages: self.pages,
			flags: self.flags,
			frames,
		})
	}
}
