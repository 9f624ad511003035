use core::{
	borrow::Borrow,
	hash::{BuildHasher, Hash},
};
use hashbrown::{
	hash_map::{DefaultHashBuilder, Entry},
	HashMap,
};
use num_traits::{CheckedAdd, CheckedSub, One, Zero};

/// A map of values with an explicit reference count each.
///
/// Entries aren't dropped when their count reaches zero, only when they are [drained](`RcHashMap::drain_weak`).
#[derive(Debug)]
pub struct RcHashMap<K, C, V, S = DefaultHashBuilder>(HashMap<K, (C, V), S>)
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: BuildHasher;
impl<K, C, V, S> Default for RcHashMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: Default + BuildHasher,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<K, C, V, S> RcHashMap<K, C, V, S>
where
	K: Hash + Eq,
	C: CheckedAdd + CheckedSub + One + Zero,
	S: BuildHasher,
{
	#[must_use]
	pub fn new() -> Self
	where
		S: Default,
	{
		Self(HashMap::with_hasher(S::default()))
	}

	pub fn increment_or_insert_with<F: FnOnce() -> V>(&mut self, k: K, v: F) -> Result<&mut V, CountSaturatedError> {
		match self.0.entry(k) {
			Entry::Occupied(occupied) => {
				let (c, v) = occupied.into_mut();
				*c = c.checked_add(&C::one()).ok_or(CountSaturatedError)?;
				Ok(v)
			}
			Entry::Vacant(vacant) => {
				let (_, v) = vacant.insert((C::one(), v()));
				Ok(v)
			}
		}
	}

	pub fn weak_decrement<Q: ?Sized>(&mut self, k: &Q) -> Result<Option<&mut V>, CountSaturatedError>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		match self.0.get_mut(k) {
			Some((c, v)) => {
				*c = c.checked_sub(&C::one()).ok_or(CountSaturatedError)?;
				Ok(Some(v))
			}
			None => Ok(None),
		}
	}

	pub fn get<Q: ?Sized>(&self, k: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Eq + Hash,
	{
		self.0.get(k).map(|(_, v)| v)
	}

	/// Removes and returns all entries with a count of zero.
	pub fn drain_weak(&mut self) -> impl '_ + Iterator<Item = (K, V)> {
		self.0.drain_filter(|_, (c, _)| c.is_zero()).map(|(k, (_, v))| (k, v))
	}

	/// Counts entries, including ones that are only weakly retained.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}
}

/// A count would have overflowed or dropped below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountSaturatedError;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_and_drains() {
		let mut map = RcHashMap::<&str, u8, i32>::new();
		*map.increment_or_insert_with("a", || 1).unwrap() += 1;
		map.increment_or_insert_with("a", || unreachable!()).unwrap();
		map.increment_or_insert_with("b", || 3).unwrap();

		assert_eq!(map.weak_decrement("a"), Ok(Some(&mut 2)));
		assert_eq!(map.drain_weak().count(), 0);
		map.weak_decrement("a").unwrap();
		map.weak_decrement("b").unwrap();

		let mut drained: Vec<_> = map.drain_weak().collect();
		drained.sort_unstable();
		assert_eq!(drained, vec![("a", 2), ("b", 3)]);
		assert_eq!(map.len(), 0);
	}

	#[test]
	fn saturation() {
		let mut map = RcHashMap::<&str, u8, ()>::new();
		map.increment_or_insert_with("a", || ()).unwrap();
		map.weak_decrement("a").unwrap();
		assert_eq!(map.weak_decrement("a"), Err(CountSaturatedError));
		assert_eq!(map.weak_decrement("missing"), Ok(None));
	}
}
