//! Ordered index of sprites by background priority and z order.
//!
//! Sprites sharing the same sort key live in the same layer, an intrusive doubly linked
//! list threaded through `nodes`. Layers are kept in a fixed arena and referenced by id,
//! and `order` holds the ids of the live layers sorted by key, so iterating it front to back
//! visits sprites in the order they have to occupy OAM slots.

use alloc::boxed::Box;
use alloc::vec::Vec;

use arrayvec::ArrayVec;

use super::error::SpriteError;
use crate::debug_log::Subsystems;
use crate::shared_constants::MAX_SORT_LAYERS;

const Z_ORDER_OFFSET: i32 = 32768;

/// Composite of background priority and z order.
/// Sprites with smaller keys are drawn on top of the ones with bigger keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(u32);

impl SortKey {
    pub fn new(bg_priority: i32, z_order: i32) -> SortKey {
        return SortKey(((bg_priority as u32) << 16) | ((z_order + Z_ORDER_OFFSET) as u32));
    }

    pub fn bg_priority(&self) -> i32 {
        return (self.0 >> 16) as i32;
    }

    pub fn z_order(&self) -> i32 {
        return (self.0 & 0xFFFF) as i32 - Z_ORDER_OFFSET;
    }
}

#[derive(Debug)]
struct SortLayer {
    key: SortKey,
    head: Option<u16>,
    tail: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SortNode {
    layer: u8,
    prev: Option<u16>,
    next: Option<u16>,
}

pub(crate) struct SortedSprites {
    layers: Box<[Option<SortLayer>]>,
    free_layer_ids: ArrayVec<u8, MAX_SORT_LAYERS>,
    order: ArrayVec<u8, MAX_SORT_LAYERS>,
    nodes: Box<[SortNode]>,
}

impl SortedSprites {
    /// Create an index for items `0..items_count` which may use up to `max_layers` distinct keys.
    pub fn new(max_layers: usize, items_count: usize) -> SortedSprites {
        assert!(
            max_layers <= MAX_SORT_LAYERS,
            "Too many sort layers requested: {}",
            max_layers
        );
        let mut layers = Vec::with_capacity(max_layers);
        let mut free_layer_ids = ArrayVec::new();
        for id in 0..max_layers {
            layers.push(None);
            free_layer_ids.push((max_layers - 1 - id) as u8);
        }
        let mut nodes = Vec::with_capacity(items_count);
        nodes.resize(items_count, SortNode::default());
        return SortedSprites {
            layers: layers.into_boxed_slice(),
            free_layer_ids,
            order: ArrayVec::new(),
            nodes: nodes.into_boxed_slice(),
        };
    }

    /// Number of distinct keys currently in use.
    pub fn layers_count(&self) -> usize {
        return self.order.len();
    }

    /// Keys of the live layers, in drawing order.
    pub fn keys(&self) -> impl Iterator<Item = SortKey> + '_ {
        return self.order.iter().map(move |id| self.layer(*id).key);
    }

    /// Add an item to the front of the layer for `key`, creating that layer if needed.
    pub fn insert(&mut self, item: u16, key: SortKey) -> Result<(), SpriteError> {
        let layer_id = match self.find_layer(key) {
            Ok(position) => self.order[position],
            Err(position) => {
                let layer_id = self.free_layer_ids.pop().ok_or(SpriteError::SortLayersFull)?;
                self.layers[usize::from(layer_id)] = Some(SortLayer {
                    key,
                    head: None,
                    tail: None,
                });
                self.order.insert(position, layer_id);
                debug_log!(
                    Subsystems::SortedSprites,
                    "Created layer {} for bg priority {}, z order {} ({} layers)",
                    layer_id,
                    key.bg_priority(),
                    key.z_order(),
                    self.order.len()
                );
                layer_id
            }
        };
        self.nodes[usize::from(item)].layer = layer_id;
        self.push_front(item);
        return Ok(());
    }

    /// Remove an item from its layer, destroying the layer if it's now empty.
    pub fn erase(&mut self, item: u16) {
        self.unlink(item);
        let layer_id = self.nodes[usize::from(item)].layer;
        let layer = self.layer(layer_id);
        if layer.head.is_none() {
            let key = layer.key;
            if let Ok(position) = self.find_layer(key) {
                self.order.remove(position);
            }
            self.layers[usize::from(layer_id)] = None;
            self.free_layer_ids.push(layer_id);
            debug_log!(
                Subsystems::SortedSprites,
                "Destroyed layer {} ({} layers)",
                layer_id,
                self.order.len()
            );
        }
    }

    /// Move an item to the front of its layer. Returns false if it was already there.
    pub fn put_in_front_of_layer(&mut self, item: u16) -> bool {
        let layer = self.layer(self.nodes[usize::from(item)].layer);
        if layer.head == Some(item) {
            return false;
        }
        self.unlink(item);
        self.push_front(item);
        return true;
    }

    /// Move an item to the back of its layer. Returns false if it was already there.
    pub fn put_in_back_of_layer(&mut self, item: u16) -> bool {
        let layer = self.layer(self.nodes[usize::from(item)].layer);
        if layer.tail == Some(item) {
            return false;
        }
        self.unlink(item);
        self.push_back(item);
        return true;
    }

    /// Every item, in drawing order.
    pub fn iter(&self) -> SortedIter<'_> {
        return SortedIter {
            sorted: self,
            order_index: 0,
            next: None,
        };
    }

    fn find_layer(&self, key: SortKey) -> Result<usize, usize> {
        return self
            .order
            .binary_search_by(|id| self.layer(*id).key.cmp(&key));
    }

    fn layer(&self, id: u8) -> &SortLayer {
        return self.layers[usize::from(id)]
            .as_ref()
            .expect("Sort layer referenced after destruction");
    }

    fn layer_mut(&mut self, id: u8) -> &mut SortLayer {
        return self.layers[usize::from(id)]
            .as_mut()
            .expect("Sort layer referenced after destruction");
    }

    fn push_front(&mut self, item: u16) {
        let layer_id = self.nodes[usize::from(item)].layer;
        let old_head = self.layer(layer_id).head;
        {
            let node = &mut self.nodes[usize::from(item)];
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.nodes[usize::from(head)].prev = Some(item),
            None => self.layer_mut(layer_id).tail = Some(item),
        }
        self.layer_mut(layer_id).head = Some(item);
    }

    fn push_back(&mut self, item: u16) {
        let layer_id = self.nodes[usize::from(item)].layer;
        let old_tail = self.layer(layer_id).tail;
        {
            let node = &mut self.nodes[usize::from(item)];
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(tail) => self.nodes[usize::from(tail)].next = Some(item),
            None => self.layer_mut(layer_id).head = Some(item),
        }
        self.layer_mut(layer_id).tail = Some(item);
    }

    fn unlink(&mut self, item: u16) {
        let node = self.nodes[usize::from(item)];
        match node.prev {
            Some(prev) => self.nodes[usize::from(prev)].next = node.next,
            None => self.layer_mut(node.layer).head = node.next,
        }
        match node.next {
            Some(next) => self.nodes[usize::from(next)].prev = node.prev,
            None => self.layer_mut(node.layer).tail = node.prev,
        }
        let node = &mut self.nodes[usize::from(item)];
        node.prev = None;
        node.next = None;
    }
}

/// Iterator over the items of a `SortedSprites`, layer by layer.
pub(crate) struct SortedIter<'a> {
    sorted: &'a SortedSprites,
    order_index: usize,
    next: Option<u16>,
}

impl<'a> Iterator for SortedIter<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        while self.next.is_none() {
            let layer_id = *self.sorted.order.get(self.order_index)?;
            self.next = self.sorted.layer(layer_id).head;
            self.order_index += 1;
        }
        let item = self.next?;
        self.next = self.sorted.nodes[usize::from(item)].next;
        return Some(item);
    }
}
