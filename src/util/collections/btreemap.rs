//! An ordered map, used for both the free-gap tree and the allocated-region tree of a memory
//! space: one keyed by address for point lookups, one keyed by size for best-fit search.
//!
//! Backed by a key-sorted [`super::vec::Vec`] rather than `alloc::collections::BTreeMap`: the
//! standard map has no stable API to report an allocation failure from `insert`, so wrapping it
//! would make every mutator here lie about being fallible (an OOM inside it aborts instead of
//! returning `Err`). A sorted vector reuses `Vec`'s real `try_reserve`-backed fallibility instead,
//! at the cost of `insert`/`remove` shifting elements rather than being `O(log n)`; the maps this
//! crate keeps (gaps, regions) are small enough that this is not a concern in practice.

use crate::errno::AllocResult;
use crate::util::TryClone;

use super::vec::Vec;

/// A fallible, sorted-vector-backed ordered map.
#[derive(Debug)]
pub struct BTreeMap<K, V>(Vec<(K, V)>);

impl<K: Ord, V> BTreeMap<K, V> {
	/// Creates a new, empty map. Does not allocate.
	pub const fn new() -> Self {
		Self(Vec::new())
	}

	/// Returns the number of entries in the map.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Tells whether the map is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the index of `key`'s entry (`Ok`) or the index it would need to be inserted at to
	/// keep the vector sorted (`Err`).
	fn search(&self, key: &K) -> Result<usize, usize> {
		self.0.binary_search_by(|(k, _)| k.cmp(key))
	}

	/// Returns a reference to the value associated with `key`, if any.
	pub fn get(&self, key: &K) -> Option<&V> {
		let index = self.search(key).ok()?;
		self.0.get(index).map(|(_, v)| v)
	}

	/// Returns a mutable reference to the value associated with `key`, if any.
	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		let index = self.search(key).ok()?;
		self.0.get_mut(index).map(|(_, v)| v)
	}

	/// Inserts `key` -> `val`, returning the previous value if any.
	///
	/// On allocation failure, the map is left untouched.
	pub fn insert(&mut self, key: K, val: V) -> AllocResult<Option<V>> {
		match self.search(&key) {
			Ok(index) => {
				let (_, existing) = self.0.get_mut(index).unwrap();
				Ok(Some(core::mem::replace(existing, val)))
			}
			Err(index) => {
				self.0.insert(index, (key, val))?;
				Ok(None)
			}
		}
	}

	/// Removes `key` from the map, returning its value if present.
	pub fn remove(&mut self, key: &K) -> Option<V> {
		let index = self.search(key).ok()?;
		Some(self.0.remove(index).1)
	}

	/// Returns an iterator over the entries in ascending key order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
		self.0.iter().map(|(k, v)| (k, v))
	}

	/// Returns the entry whose key is the greatest key less than or equal to `key`, if any.
	pub fn floor(&self, key: &K) -> Option<(&K, &V)> {
		let index = match self.search(key) {
			Ok(index) => index,
			Err(0) => return None,
			Err(index) => index - 1,
		};
		self.0.get(index).map(|(k, v)| (k, v))
	}

	/// Returns the entry with the smallest key that is `>=` `key`, if any.
	pub fn ceil(&self, key: &K) -> Option<(&K, &V)> {
		let index = match self.search(key) {
			Ok(index) => index,
			Err(index) => index,
		};
		let (k, v) = self.0.get(index)?;
		Some((k, v))
	}
}

impl<K: Ord, V> Default for BTreeMap<K, V> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: Ord + Clone, V: Clone> TryClone for BTreeMap<K, V> {
	fn try_clone(&self) -> AllocResult<Self> {
		let mut out = Self::new();
		for (k, v) in self.0.iter() {
			out.insert(k.clone(), v.clone())?;
		}
		Ok(out)
	}
}
