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

//! Architecture-independent interface to a process's page directory.
//!
//! A memory space owns exactly one [`ArchVMem`] and drives it exclusively through the [`VMem`]
//! trait: `map`/`unmap` to install or tear down a mapping when a region is created, destroyed or
//! faulted in, `translate` to resolve a virtual address for the fault handler, and `try_clone` to
//! give a cloned memory space its own page tables.

#[cfg(target_arch = "x86")]
mod x86;
#[cfg(target_arch = "x86")]
pub use x86::X86VMem as ArchVMem;
#[cfg(target_arch = "x86")]
pub use x86::{
	FLAG_GLOBAL, FLAG_PRESENT, FLAG_USER, FLAG_WRITE, PAGE_FAULT_INSTRUCTION, PAGE_FAULT_PRESENT,
	PAGE_FAULT_RESERVED, PAGE_FAULT_USER, PAGE_FAULT_WRITE,
};

use core::ffi::c_void;

use crate::errno::AllocResult;

/// Operations a page directory implementation must support.
///
/// Flags passed to [`map`](VMem::map) are architecture-dependent; see the `FLAG_*` constants
/// re-exported from the active architecture module.
pub trait VMem: Sized {
	/// Creates a new, empty page directory mapping only the shared kernel range.
	fn new() -> AllocResult<Self>;

	/// Translates the virtual address `ptr` to its mapped physical address.
	///
	/// Returns `None` if `ptr` is not currently mapped.
	fn translate(&self, ptr: *const c_void) -> Option<*const c_void>;

	/// Maps one page of physical memory at `physaddr` to the virtual page at `virtaddr`.
	///
	/// # Safety
	///
	/// The caller must ensure the mapping does not alias kernel structures in a way that breaks
	/// memory safety invariants elsewhere in the kernel.
	unsafe fn map(
		&mut self,
		physaddr: *const c_void,
		virtaddr: *const c_void,
		flags: u32,
	) -> AllocResult<()>;

	/// Unmaps the page at `virtaddr`.
	///
	/// # Safety
	///
	/// The caller must ensure no live reference into the unmapped page outlives this call.
	unsafe fn unmap(&mut self, virtaddr: *const c_void) -> AllocResult<()>;

	/// Binds this page directory on the current CPU.
	///
	/// # Safety
	///
	/// The caller must ensure the kernel's code and stack remain accessible after the switch.
	unsafe fn bind(&self);

	/// Tells whether this page directory is currently bound on the current CPU.
	fn is_bound(&self) -> bool;

	/// Invalidates the TLB entry for `addr` if this context is bound.
	fn invalidate_page(&self, addr: *const c_void);
}

/// Initializes architecture-specific virtual memory management.
///
/// Must be called once at boot, before any [`ArchVMem`] is created.
pub fn init() -> AllocResult<()> {
	#[cfg(target_arch = "x86")]
	x86::init()?;
	Ok(())
}
