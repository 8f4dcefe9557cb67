//! Concurrent string interner for declaration names.
//!
//! Class names, member names and type-variable names are interned once and
//! passed around as `Atom` handles. Name comparisons in member lookup become
//! integer comparisons.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use [`ShardedInterner::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty string.
    pub const NONE: Atom = Atom(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

/// Names that every declaration store touches while seeding itself.
const WELL_KNOWN_NAMES: &[&str] = &[
    "java.lang",
    "java.lang.Object",
    "Object",
    "java.lang.String",
    "String",
    "void",
    "boolean",
    "byte",
    "char",
    "short",
    "int",
    "long",
    "float",
    "double",
    "<init>",
    "value",
    "T",
    "E",
    "K",
    "V",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

/// Sharded string interner for concurrent use.
///
/// Uses fixed buckets to reduce lock contention while keeping Atom lookups O(1).
/// The shard index lives in the low bits of the atom, the shard-local index in
/// the remaining bits.
pub struct ShardedInterner {
    shards: [RwLock<ShardState>; SHARD_COUNT],
}

impl ShardedInterner {
    /// Create an interner with the empty string pre-interned as [`Atom::NONE`].
    pub fn new() -> Self {
        let shards: [RwLock<ShardState>; SHARD_COUNT] =
            std::array::from_fn(|_| RwLock::new(ShardState::default()));

        if let Ok(mut state) = shards[0].write() {
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }

        ShardedInterner { shards }
    }

    /// Create an interner and pre-intern the well-known Java names.
    pub fn with_well_known_names() -> Self {
        let interner = Self::new();
        for name in WELL_KNOWN_NAMES {
            interner.intern(name);
        }
        interner
    }

    /// Intern a string, returning the existing Atom when already present.
    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        self.intern_with(s)
    }

    /// Intern an owned String. A hit only borrows it; a miss moves it into
    /// the shared `Arc<str>`.
    #[inline]
    pub fn intern_owned(&self, s: String) -> Atom {
        self.intern_with(s)
    }

    fn intern_with<S: AsRef<str> + Into<Arc<str>>>(&self, value: S) -> Atom {
        let s = value.as_ref();
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        if let Ok(state) = self.shards[shard_idx].read() {
            if let Some(&atom) = state.map.get(s) {
                return atom;
            }
        }

        // Poisoned shards degrade to the empty atom rather than panicking.
        let Ok(mut state) = self.shards[shard_idx].write() else {
            return Atom::NONE;
        };
        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }

        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = value.into();
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Look up an already-interned string without inserting it.
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        if s.is_empty() {
            return Some(Atom::NONE);
        }
        let state = self.shards[Self::shard_for(s)].read().ok()?;
        state.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns the empty string for atoms this interner never produced.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let (shard_idx, local_index) = Self::split_atom(atom);
        let state = self.shards.get(shard_idx)?.read().ok()?;
        state.strings.get(local_index).cloned()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().map(|state| state.strings.len()).unwrap_or(0))
            .sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }

    #[inline]
    fn split_atom(atom: Atom) -> (usize, usize) {
        let raw = atom.0;
        ((raw & SHARD_MASK) as usize, (raw >> SHARD_BITS) as usize)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
