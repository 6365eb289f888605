//! Measured node sizes, keyed by graph and node.

use rustc_hash::FxHashMap;
use std::sync::RwLock;
use weft::{NodeKey, Size};

/// Lookup for node sizes the document does not carry.
///
/// Implementations must tolerate concurrent readers; the layout itself never calls into the
/// cache, only extraction does.
pub trait SizeCache {
    fn get(&self, graph_id: &str, key: NodeKey) -> Option<Size>;
    fn put(&self, graph_id: &str, key: NodeKey, size: Size);
}

/// Cache that never remembers anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSizeCache;

impl SizeCache for NoSizeCache {
    fn get(&self, _graph_id: &str, _key: NodeKey) -> Option<Size> {
        None
    }

    fn put(&self, _graph_id: &str, _key: NodeKey, _size: Size) {}
}

#[derive(Debug, Default)]
pub struct MemorySizeCache {
    entries: RwLock<FxHashMap<(String, NodeKey), Size>>,
}

impl MemorySizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.entries.write() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl SizeCache for MemorySizeCache {
    fn get(&self, graph_id: &str, key: NodeKey) -> Option<Size> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(&(graph_id.to_string(), key)).copied()
    }

    fn put(&self, graph_id: &str, key: NodeKey, size: Size) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.insert((graph_id.to_string(), key), size);
    }
}
