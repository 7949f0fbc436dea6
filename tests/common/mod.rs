//! Shared test engine: an in-memory simulation of the native term engine
//! with a reference-count audit table.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use termbridge::{Engine, Environment, ObjectKind, RawHandle, SortKind};

#[derive(Default)]
struct SimState {
    next_id: usize,
    /// Audit table: engine-side reference count per (kind, handle).
    counts: HashMap<(ObjectKind, RawHandle), i64>,
    /// Map storage: map handle id → (key id → value id).
    maps: HashMap<usize, BTreeMap<usize, usize>>,
    /// Vector storage: vector handle id → entries.
    vectors: HashMap<usize, Vec<RawHandle>>,
    /// Sort storage: sort handle id → (kind tag, name).
    sorts: HashMap<usize, (u32, String)>,
}

impl SimState {
    fn mint(&mut self) -> RawHandle {
        self.next_id += 1;
        RawHandle::new(self.next_id)
    }
}

/// In-memory engine. Panics on reference-count underflow, so any test that
/// drives the bridge through it also audits the decrement discipline.
#[derive(Default)]
pub struct SimEngine {
    state: Mutex<SimState>,
}

impl SimEngine {
    pub fn new() -> Arc<SimEngine> {
        Arc::new(SimEngine::default())
    }

    /// Allocate a handle denoting a plain AST node (count starts at zero).
    pub fn mint_ast(&self) -> RawHandle {
        self.state.lock().unwrap().mint()
    }

    /// Allocate a handle denoting a sort with the given kind tag.
    pub fn mint_sort(&self, tag: u32) -> RawHandle {
        let mut state = self.state.lock().unwrap();
        let handle = state.mint();
        let name = match SortKind::from_tag(tag) {
            Some(SortKind::Uninterpreted) => format!("u!{}", handle.id()),
            Some(kind) => kind.to_string(),
            None => format!("?!{tag}"),
        };
        state.sorts.insert(handle.id(), (tag, name));
        handle
    }

    /// Current reference count for `handle`.
    pub fn refcount(&self, kind: ObjectKind, handle: RawHandle) -> i64 {
        self.state
            .lock()
            .unwrap()
            .counts
            .get(&(kind, handle))
            .copied()
            .unwrap_or(0)
    }

    /// Every count the engine has ever tracked is back at zero.
    pub fn all_released(&self) -> bool {
        self.state.lock().unwrap().counts.values().all(|&c| c == 0)
    }
}

impl Engine for SimEngine {
    fn increment(&self, kind: ObjectKind, handle: RawHandle) {
        let mut state = self.state.lock().unwrap();
        *state.counts.entry((kind, handle)).or_insert(0) += 1;
    }

    fn decrement(&self, kind: ObjectKind, handle: RawHandle) {
        let mut state = self.state.lock().unwrap();
        let count = state.counts.entry((kind, handle)).or_insert(0);
        *count -= 1;
        assert!(
            *count >= 0,
            "reference count underflow for {kind} handle {}",
            handle.id()
        );
    }

    fn create_map(&self) -> RawHandle {
        let mut state = self.state.lock().unwrap();
        let handle = state.mint();
        state.maps.insert(handle.id(), BTreeMap::new());
        handle
    }

    fn map_contains(&self, map: RawHandle, key: RawHandle) -> bool {
        self.state.lock().unwrap().maps[&map.id()].contains_key(&key.id())
    }

    fn map_find(&self, map: RawHandle, key: RawHandle) -> Option<RawHandle> {
        self.state.lock().unwrap().maps[&map.id()]
            .get(&key.id())
            .map(|&value| RawHandle::new(value))
    }

    fn map_insert(&self, map: RawHandle, key: RawHandle, value: RawHandle) {
        let mut state = self.state.lock().unwrap();
        state
            .maps
            .get_mut(&map.id())
            .expect("unknown map handle")
            .insert(key.id(), value.id());
    }

    fn map_erase(&self, map: RawHandle, key: RawHandle) {
        let mut state = self.state.lock().unwrap();
        state
            .maps
            .get_mut(&map.id())
            .expect("unknown map handle")
            .remove(&key.id());
    }

    fn map_reset(&self, map: RawHandle) {
        let mut state = self.state.lock().unwrap();
        state
            .maps
            .get_mut(&map.id())
            .expect("unknown map handle")
            .clear();
    }

    fn map_size(&self, map: RawHandle) -> usize {
        self.state.lock().unwrap().maps[&map.id()].len()
    }

    fn map_keys(&self, map: RawHandle) -> RawHandle {
        let mut state = self.state.lock().unwrap();
        let keys: Vec<RawHandle> = state.maps[&map.id()]
            .keys()
            .map(|&id| RawHandle::new(id))
            .collect();
        let handle = state.mint();
        state.vectors.insert(handle.id(), keys);
        handle
    }

    fn map_to_string(&self, map: RawHandle) -> String {
        let state = self.state.lock().unwrap();
        let pairs: Vec<String> = state.maps[&map.id()]
            .iter()
            .map(|(k, v)| format!("(#{k} -> #{v})"))
            .collect();
        format!("(ast-map {})", pairs.join(" "))
    }

    fn vector_size(&self, vector: RawHandle) -> usize {
        self.state.lock().unwrap().vectors[&vector.id()].len()
    }

    fn vector_get(&self, vector: RawHandle, index: usize) -> RawHandle {
        self.state.lock().unwrap().vectors[&vector.id()]
            .get(index)
            .copied()
            .unwrap_or(RawHandle::NULL)
    }

    fn sort_kind_tag(&self, sort: RawHandle) -> u32 {
        self.state.lock().unwrap().sorts[&sort.id()].0
    }

    fn sort_name(&self, sort: RawHandle) -> String {
        self.state.lock().unwrap().sorts[&sort.id()].1.clone()
    }

    fn sort_to_string(&self, sort: RawHandle) -> String {
        let state = self.state.lock().unwrap();
        let (tag, name) = &state.sorts[&sort.id()];
        format!("(sort {name} :tag {tag})")
    }

    fn is_eq_sort(&self, a: RawHandle, b: RawHandle) -> bool {
        let state = self.state.lock().unwrap();
        state.sorts[&a.id()] == state.sorts[&b.id()]
    }
}

/// Fresh engine + environment pair.
pub fn setup() -> (Arc<SimEngine>, Environment) {
    let engine = SimEngine::new();
    let env = Environment::new(engine.clone());
    (engine, env)
}
