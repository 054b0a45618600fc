//! Recency List Module
//!
//! Arena-backed doubly-linked list ordering entries from most recently
//! used (head side) to least recently used (tail side).
//!
//! Slots are addressed by index. Index 0 and 1 are the head and tail
//! sentinels, so every live node always has two real neighbours and
//! splicing never branches on empty boundaries.

use crate::cache::CacheEntry;

/// Arena index of the head sentinel.
const HEAD: usize = 0;
/// Arena index of the tail sentinel.
const TAIL: usize = 1;

// == Node ==
/// Arena slot. Sentinels and free slots carry no entry.
#[derive(Debug)]
struct Node<V> {
    entry: Option<CacheEntry<V>>,
    prev: usize,
    next: usize,
}

impl<V> Node<V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

// == Recency List ==
/// Doubly-linked recency list with O(1) insert, unlink and promote.
#[derive(Debug)]
pub struct RecencyList<V> {
    nodes: Vec<Node<V>>,
    /// Recycled slot indices
    free: Vec<usize>,
    len: usize,
}

impl<V> Default for RecencyList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyList<V> {
    // == Constructor ==
    /// Creates an empty list: head linked directly to tail.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel(), Node::sentinel()],
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Stores `entry` in a slot and links it as most recently used.
    ///
    /// Returns the slot index, which stays valid until the entry is removed.
    pub fn push_front(&mut self, entry: CacheEntry<V>) -> usize {
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].entry = Some(entry);
                idx
            }
            None => {
                self.nodes.push(Node {
                    entry: Some(entry),
                    prev: HEAD,
                    next: TAIL,
                });
                self.nodes.len() - 1
            }
        };
        self.add_to_front(idx);
        self.len += 1;
        idx
    }

    // == Move To Front ==
    /// Promotes a live slot to the most recently used position.
    pub fn move_to_front(&mut self, idx: usize) {
        if self.nodes[HEAD].next == idx {
            return;
        }
        self.unlink(idx);
        self.add_to_front(idx);
    }

    // == Remove ==
    /// Unlinks a slot and hands back its entry, recycling the slot.
    ///
    /// Callers must not remove the same slot twice; the engine pairs each
    /// removal with a map deletion under one lock.
    pub fn remove(&mut self, idx: usize) -> Option<CacheEntry<V>> {
        let entry = self.nodes.get_mut(idx)?.entry.take()?;
        self.unlink(idx);
        self.free.push(idx);
        self.len -= 1;
        Some(entry)
    }

    // == Least Recently Used ==
    /// Slot of the least recently used entry (`tail.prev`), if any.
    pub fn lru(&self) -> Option<usize> {
        self.live(self.nodes[TAIL].prev)
    }

    /// Slot one step closer to the head, if it is a real entry.
    pub fn newer(&self, idx: usize) -> Option<usize> {
        self.live(self.nodes[idx].prev)
    }

    // == Accessors ==
    pub fn get(&self, idx: usize) -> Option<&CacheEntry<V>> {
        self.nodes.get(idx).and_then(|node| node.entry.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut CacheEntry<V>> {
        self.nodes.get_mut(idx).and_then(|node| node.entry.as_mut())
    }

    /// Number of live entries, sentinels excluded.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[TAIL].prev == HEAD
    }

    // == Clear ==
    /// Drops every entry and relinks head directly to tail.
    pub fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD] = Node::sentinel();
        self.nodes[TAIL] = Node::sentinel();
        self.free.clear();
        self.len = 0;
    }

    // == Iteration ==
    /// Walks entries from most recently used to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<V>> + '_ {
        let mut current = self.nodes[HEAD].next;
        std::iter::from_fn(move || {
            if current == TAIL {
                return None;
            }
            let node = &self.nodes[current];
            current = node.next;
            node.entry.as_ref()
        })
    }

    // == Internal Linking ==
    /// Splices `idx` directly after the head sentinel.
    fn add_to_front(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    /// Relinks the neighbours of `idx` around it.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn live(&self, idx: usize) -> Option<usize> {
        (idx != HEAD && idx != TAIL).then_some(idx)
    }
}
