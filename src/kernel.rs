#![no_std]
#![no_main]
#![feature(allow_internal_unstable)]
#![feature(custom_test_frameworks)]
#![feature(lang_items)]
#![allow(dead_code)]
#![test_runner(crate::selftest::runner)]
#![reexport_test_harness_main = "test_main"]

//! Entry point and module wiring for the kernel.
//!
//! This build implements the virtual memory space manager (see [`process::mem_space`]) and the
//! ambient stack it needs to boot and run its own tests: logging, errno, the physical/virtual
//! memory layer it sits on, and the heap allocator backing `alloc`.

extern crate alloc;

#[macro_use]
mod print;

mod errno;
mod limits;
mod logger;
mod memory;
mod panic;
mod process;
mod selftest;
mod util;

use core::ffi::c_void;

/// Physical memory claimed for the buddy allocator at boot.
///
/// A real bootloader hands the kernel a memory map; parsing one is out of scope for this crate
/// (its concern is the memory *space* manager, not physical memory discovery), so boot instead
/// claims a fixed range starting right after the kernel image, sized to comfortably fit under
/// what a QEMU default machine provides.
const PHYS_MEMORY_BEGIN: *mut c_void = 0x400000 as *mut c_void;
const PHYS_MEMORY_SIZE: usize = 64 * 1024 * 1024;
/// Physical memory reserved for kernel-only allocations (page tables, the kernel heap) out of
/// [`PHYS_MEMORY_SIZE`].
const KERNEL_ZONE_SIZE: usize = 16 * 1024 * 1024;

#[global_allocator]
static ALLOCATOR: memory::malloc::KernelAllocator = memory::malloc::KernelAllocator;

/// Kernel version string, printed once at boot.
const KERNEL_VERSION: &str = "0.1.0";

#[no_mangle]
pub extern "C" fn kernel_main() -> ! {
	logger::init(false);
	println!("booting kernel {KERNEL_VERSION}");

	memory::buddy::init(PHYS_MEMORY_BEGIN, PHYS_MEMORY_SIZE, KERNEL_ZONE_SIZE);
	memory::vmem::init().unwrap_or_else(|_| panic!("failed to initialize paging"));
	println!("memory management initialized");

	#[cfg(test)]
	test_main();

	loop {
		unsafe {
			core::arch::asm!("hlt");
		}
	}
}
