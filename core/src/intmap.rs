//! Adaptive sparse/dense mapping from a nonnegative integer key to an
//! opaque value, auto-switching between four representations depending on
//! key-space density.
//!
//! Grounded on `original_source/BASICS/clb_intmap.c` (`IntMap_p`), with the
//! representation picked as a Rust enum rather than a tagged union per
//! `spec.md` §9 ("naturally expressed as a tagged variant, not
//! inheritance").

use std::collections::BTreeMap;

/// Density thresholds controlling representation switches. `MIN <
/// MAX` is required; the gap is the hysteresis band that keeps a single
/// insert/delete from bouncing the representation back and forth.
///
/// Chosen so that the worked example in `spec.md` §8 scenario 1 holds:
/// five keys in `0..=4` settle as `DenseArray`, pruning down to two
/// entries plus a far outlier flips to `SparseTree`, and removing the
/// outlier flips back.
const MAX_TREE_DENSITY: u64 = 3;
const MIN_TREE_DENSITY: u64 = 1;

fn switch_to_array(old_max: u64, new_key: u64, entries: u64) -> bool {
    let max_key = old_max.max(new_key);
    entries * MAX_TREE_DENSITY > max_key
}

fn switch_to_tree(old_max: u64, new_key: u64, entries: u64) -> bool {
    let max_key = old_max.max(new_key);
    entries * MIN_TREE_DENSITY < max_key
}

enum Repr<V> {
    Empty,
    Singleton(Option<V>),
    Dense(Vec<Option<V>>),
    Sparse(BTreeMap<u64, Option<V>>),
}

/// A finite partial function from `u64` keys to values of type `V`,
/// represented internally as whichever of four variants best matches the
/// current key-space density. The active representation is an
/// implementation detail; all four behave identically from the outside.
///
/// Per `spec.md` §9's open question, `0` is a valid key everywhere in this
/// API (the original source asserted `key > 0` in one entry point and
/// `key >= 0` in the others; that stricter assert is treated as a bug and
/// dropped).
pub struct AdaptiveIntMap<V> {
    max_key: u64,
    entry_no: u64,
    repr: Repr<V>,
}

impl<V> Default for AdaptiveIntMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AdaptiveIntMap<V> {
    pub fn new() -> Self {
        Self {
            max_key: 0,
            entry_no: 0,
            repr: Repr::Empty,
        }
    }

    /// Number of bound (non-null) keys.
    pub fn len(&self) -> u64 {
        self.entry_no
    }

    pub fn is_empty(&self) -> bool {
        self.entry_no == 0
    }

    /// The largest key ever bound. Meaningless (and unspecified) on an
    /// empty map.
    pub fn max_key(&self) -> u64 {
        self.max_key
    }

    /// Look up `key`. Never mutates the representation.
    pub fn get(&self, key: u64) -> Option<&V> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Singleton(val) => {
                if key == self.max_key {
                    val.as_ref()
                } else {
                    None
                }
            }
            Repr::Dense(array) => array.get(key as usize).and_then(|v| v.as_ref()),
            Repr::Sparse(tree) => {
                if key <= self.max_key {
                    tree.get(&key).and_then(|v| v.as_ref())
                } else {
                    None
                }
            }
        }
    }

    /// Return a mutable reference to the value cell for `key`, creating a
    /// null (`None`) binding if one does not already exist. May trigger a
    /// representation change. Matches `IntMapGetRef`'s contract exactly,
    /// including its quirk: the binding (and `entry_no`) is created as
    /// soon as this is called, even if the caller never writes a `Some`
    /// through the returned cell. In practice this is always immediately
    /// followed by a write (see [`Self::assign`]).
    pub fn entry(&mut self, key: u64) -> &mut Option<V> {
        #[cfg(feature = "logging")]
        log::trace!("intmap: entry({key}) on repr with entry_no={}", self.entry_no);

        match &mut self.repr {
            Repr::Empty => {
                self.repr = Repr::Singleton(None);
                self.max_key = key;
                self.entry_no = 1;
            }
            Repr::Singleton(_) => {
                let existing_key = self.max_key;
                if key != existing_key {
                    if switch_to_array(key, existing_key, 2) {
                        let existing_val = match std::mem::replace(&mut self.repr, Repr::Empty) {
                            Repr::Singleton(v) => v,
                            _ => unreachable!(),
                        };
                        let hi = existing_key.max(key) as usize;
                        let mut array = Vec::new();
                        array.resize_with(hi + 1, || None);
                        array[existing_key as usize] = existing_val;
                        self.repr = Repr::Dense(array);
                        self.entry_no = 2;
                    } else {
                        let mut tree = BTreeMap::new();
                        let existing_val = match std::mem::replace(&mut self.repr, Repr::Empty) {
                            Repr::Singleton(v) => v,
                            _ => unreachable!(),
                        };
                        tree.insert(existing_key, existing_val);
                        tree.insert(key, None);
                        self.repr = Repr::Sparse(tree);
                        self.entry_no = 2;
                    }
                    self.max_key = existing_key.max(key);
                }
            }
            Repr::Dense(array) => {
                if key > self.max_key && switch_to_tree(self.max_key, key, self.entry_no + 1) {
                    self.array_to_tree();
                    return self.entry(key);
                }
                if key as usize >= array.len() {
                    array.resize_with(key as usize + 1, || None);
                }
                if array[key as usize].is_none() {
                    self.entry_no += 1;
                }
                self.max_key = self.max_key.max(key);
            }
            Repr::Sparse(tree) => {
                if !tree.contains_key(&key) {
                    if switch_to_array(self.max_key, key, self.entry_no + 1) {
                        self.tree_to_array();
                        return self.entry(key);
                    }
                    tree.insert(key, None);
                    self.entry_no += 1;
                    self.max_key = self.max_key.max(key);
                }
            }
        }

        match &mut self.repr {
            Repr::Singleton(val) => val,
            Repr::Dense(array) => &mut array[key as usize],
            Repr::Sparse(tree) => tree.get_mut(&key).expect("just inserted"),
            Repr::Empty => unreachable!("entry() always leaves a non-empty repr"),
        }
    }

    /// Bind `key` to `value`, overwriting any previous binding.
    pub fn assign(&mut self, key: u64, value: V) {
        *self.entry(key) = Some(value);
    }

    /// Unbind `key`, returning its previous value (or `None`). May
    /// demote a `DenseArray` to `SparseTree` when density drops; never
    /// promotes on delete. Arrays never shrink their physical capacity.
    pub fn del(&mut self, key: u64) -> Option<V> {
        match &mut self.repr {
            Repr::Empty => None,
            Repr::Singleton(_) => {
                if key == self.max_key {
                    let val = match std::mem::replace(&mut self.repr, Repr::Empty) {
                        Repr::Singleton(v) => v,
                        _ => unreachable!(),
                    };
                    self.entry_no = 0;
                    val
                } else {
                    None
                }
            }
            Repr::Dense(array) => {
                if key > self.max_key {
                    return None;
                }
                let slot = array.get_mut(key as usize)?;
                let res = slot.take();
                if res.is_some() {
                    self.entry_no -= 1;
                    if switch_to_tree(self.max_key, self.max_key, self.entry_no) {
                        self.array_to_tree();
                    }
                }
                res
            }
            Repr::Sparse(tree) => {
                // `tree` maps key -> `Option<V>` (a bound key may still
                // carry a null value between `entry()` and `assign()`),
                // so `remove` yields `Option<Option<V>>`: the outer
                // option is "did this key have a slot at all" (what
                // `entry_no` tracks), the inner is the value itself.
                let removed = tree.remove(&key);
                if removed.is_some() {
                    self.entry_no -= 1;
                    if key == self.max_key {
                        self.max_key = tree.keys().next_back().copied().unwrap_or(0);
                        if switch_to_array(self.max_key, self.max_key, self.entry_no) {
                            self.tree_to_array();
                        }
                    }
                }
                removed.flatten()
            }
        }
    }

    /// Iterate over bound `(key, value)` pairs with `key` in
    /// `[lo, hi]` (inclusive), in ascending key order. The iterator is
    /// finite and not restartable; any mutation of the map while an
    /// iterator from this call is still alive invalidates it (see
    /// `spec.md` §5).
    pub fn iter(&self, lo: u64, hi: u64) -> IntMapIter<'_, V> {
        let hi = hi.min(self.max_key);
        IntMapIter {
            map: self,
            lo,
            hi,
            cursor: lo,
            done: self.is_empty() || lo > hi,
            singleton_seen: false,
        }
    }

    fn array_to_tree(&mut self) {
        #[cfg(feature = "logging")]
        log::debug!("intmap: array -> tree (entry_no={})", self.entry_no);
        let array = match std::mem::replace(&mut self.repr, Repr::Empty) {
            Repr::Dense(a) => a,
            _ => unreachable!(),
        };
        let mut tree = BTreeMap::new();
        let mut max_key = 0;
        let mut entry_no = 0;
        for (i, val) in array.into_iter().enumerate() {
            if val.is_some() {
                max_key = i as u64;
                entry_no += 1;
                tree.insert(i as u64, val);
            }
        }
        self.max_key = max_key;
        self.entry_no = entry_no;
        self.repr = Repr::Sparse(tree);
    }

    fn tree_to_array(&mut self) {
        #[cfg(feature = "logging")]
        log::debug!("intmap: tree -> array (entry_no={})", self.entry_no);
        let tree = match std::mem::replace(&mut self.repr, Repr::Empty) {
            Repr::Sparse(t) => t,
            _ => unreachable!(),
        };
        let mut max_key = 0;
        let mut entry_no = 0;
        let mut array = Vec::new();
        for (k, val) in tree {
            if val.is_some() {
                if k as usize >= array.len() {
                    array.resize_with(k as usize + 1, || None);
                }
                array[k as usize] = val;
                max_key = k;
                entry_no += 1;
            }
        }
        self.max_key = max_key;
        self.entry_no = entry_no;
        self.repr = Repr::Dense(array);
    }

    /// Whether the map currently uses the dense-array representation.
    /// Exposed only for the density-invariant property tests in §8; not
    /// part of the logical contract.
    #[cfg(test)]
    pub(crate) fn is_dense(&self) -> bool {
        matches!(self.repr, Repr::Dense(_))
    }

    #[cfg(test)]
    pub(crate) fn is_sparse(&self) -> bool {
        matches!(self.repr, Repr::Sparse(_))
    }
}

/// Lazy, ascending, inclusive-range iterator over an [`AdaptiveIntMap`].
/// Valid only while the underlying map is not mutated (see `spec.md` §4.1).
pub struct IntMapIter<'a, V> {
    map: &'a AdaptiveIntMap<V>,
    lo: u64,
    hi: u64,
    cursor: u64,
    done: bool,
    singleton_seen: bool,
}

impl<'a, V> Iterator for IntMapIter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match &self.map.repr {
            Repr::Empty => {
                self.done = true;
                None
            }
            Repr::Singleton(val) => {
                self.done = true;
                if !self.singleton_seen
                    && self.map.max_key >= self.lo
                    && self.map.max_key <= self.hi
                {
                    self.singleton_seen = true;
                    val.as_ref().map(|v| (self.map.max_key, v))
                } else {
                    None
                }
            }
            Repr::Dense(array) => {
                while self.cursor <= self.hi {
                    let k = self.cursor;
                    self.cursor += 1;
                    if let Some(Some(v)) = array.get(k as usize) {
                        return Some((k, v));
                    }
                }
                self.done = true;
                None
            }
            Repr::Sparse(tree) => {
                let mut range = tree.range(self.cursor..=self.hi);
                for (k, v) in &mut range {
                    if let Some(v) = v {
                        self.cursor = k + 1;
                        return Some((*k, v));
                    }
                }
                self.done = true;
                None
            }
        }
    }
}
