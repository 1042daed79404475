//! Fallible collection wrappers.
//!
//! Every container exposed here reports allocation failure through [`crate::errno::AllocResult`]
//! instead of aborting, which the rest of the kernel relies on to roll back partially applied
//! operations (see `process::mem_space`'s best-effort rollback on a failed `alloc`/`free`).

pub mod btreemap;
pub mod vec;

pub use btreemap::BTreeMap;
pub use vec::Vec;
