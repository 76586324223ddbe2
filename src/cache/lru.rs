//! Recency List Module
//!
//! Implements the access-order list used for LRU eviction.

// Slots 0 and 1 are the front and back sentinels.
const FRONT: usize = 0;
const BACK: usize = 1;

/// Upper bound on slots reserved up front; larger lists grow on demand.
pub(crate) const MAX_PREALLOCATED: usize = 4096;

// == Node Handle ==
/// Handle to a live node in a [`RecencyList`].
///
/// Handles are only produced by [`RecencyList::push_front`]; a handle whose
/// node was removed is ignored by every operation until its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
struct Node<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency List ==
/// Doubly-linked list threaded through a slot arena.
///
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Neighbours are stored as slot indices, so unlinking a node and relinking it
/// at the front are both O(1). The two sentinels are never handed out and
/// never removed, so every live node always has both neighbours.
#[derive(Debug)]
pub(crate) struct RecencyList<T> {
    nodes: Vec<Node<T>>,
    /// Slots released by `remove`, reused before the arena grows
    free: Vec<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list expecting up to `capacity` nodes.
    ///
    /// At most [`MAX_PREALLOCATED`] slots are reserved immediately.
    pub fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.min(MAX_PREALLOCATED).saturating_add(2);
        let mut nodes = Vec::with_capacity(reserved);
        nodes.push(Node {
            item: None,
            prev: FRONT,
            next: BACK,
        });
        nodes.push(Node {
            item: None,
            prev: FRONT,
            next: BACK,
        });
        Self {
            nodes,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an item as the most recently used node.
    pub fn push_front(&mut self, item: T) -> NodeId {
        let node = Node {
            item: Some(item),
            prev: FRONT,
            next: FRONT,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if the handle no longer refers to a live node.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.is_live(id.0) {
            return false;
        }
        if self.nodes[FRONT].next != id.0 {
            self.unlink(id.0);
            self.link_front(id.0);
        }
        true
    }

    // == Remove ==
    /// Unlinks a node and returns its item, releasing the slot for reuse.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.is_live(id.0) {
            return None;
        }
        self.unlink(id.0);
        self.free.push(id.0);
        self.len -= 1;
        self.nodes[id.0].item.take()
    }

    // == Pop Back ==
    /// Removes and returns the least recently used item.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let last = self.nodes[BACK].prev;
        self.remove(NodeId(last))
    }

    // == Peek Back ==
    /// Returns the least recently used item without removing it.
    pub fn back(&self) -> Option<&T> {
        self.nodes[self.nodes[BACK].prev].item.as_ref()
    }

    // == Get ==
    /// Returns the item behind a handle, or None if it was removed.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).and_then(|node| node.item.as_ref())
    }

    // == Get Mut ==
    /// Mutable access to the item behind a handle; recency is unchanged.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).and_then(|node| node.item.as_mut())
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Clear ==
    /// Drops every item and resets the arena to the two sentinels.
    pub fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[FRONT].next = BACK;
        self.nodes[BACK].prev = FRONT;
        self.free.clear();
        self.len = 0;
    }

    // == Iter ==
    /// Iterates items from most to least recently used.
    pub fn iter(&self) -> ListIter<'_, T> {
        ListIter {
            list: self,
            cursor: self.nodes[FRONT].next,
            remaining: self.len,
        }
    }

    fn is_live(&self, idx: usize) -> bool {
        idx > BACK && self.nodes.get(idx).is_some_and(|node| node.item.is_some())
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.nodes[FRONT].next;
        self.nodes[idx].prev = FRONT;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[FRONT].next = idx;
    }

    /// Walks the list in both directions and checks it against `len`.
    #[cfg(test)]
    pub(crate) fn assert_linked(&self) {
        let mut forward = 0;
        let mut cursor = self.nodes[FRONT].next;
        while cursor != BACK {
            assert!(self.nodes[cursor].item.is_some(), "dead node {cursor} linked");
            assert_eq!(self.nodes[self.nodes[cursor].next].prev, cursor);
            forward += 1;
            cursor = self.nodes[cursor].next;
        }
        let mut backward = 0;
        let mut cursor = self.nodes[BACK].prev;
        while cursor != FRONT {
            backward += 1;
            cursor = self.nodes[cursor].prev;
        }
        assert_eq!(forward, self.len);
        assert_eq!(backward, self.len);
    }
}

// == Iterator ==
/// Iterator over a [`RecencyList`], front to back.
#[derive(Debug)]
pub(crate) struct ListIter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: usize,
    remaining: usize,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == BACK {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        self.remaining -= 1;
        node.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ListIter<'_, T> {}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn order(list: &RecencyList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<u32> = RecencyList::with_capacity(0);
        assert_eq!(list.len(), 0);
        assert_eq!(list.back(), None);
        assert_eq!(list.iter().next(), None);
        list.assert_linked();
    }

    #[test]
    fn test_huge_capacity_reserves_bounded_slots() {
        let list: RecencyList<u64> = RecencyList::with_capacity(usize::MAX);
        assert!(list.nodes.capacity() >= 2);
        assert!(list.nodes.capacity() < MAX_PREALLOCATED * 2 + 2);
        list.assert_linked();
    }

    #[test]
    fn test_push_front_orders_newest_first() {
        let mut list = RecencyList::with_capacity(3);

        list.push_front("key1");
        list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(list.back(), Some(&"key1"));
        assert_eq!(order(&list), vec!["key3", "key2", "key1"]);
        list.assert_linked();
    }

    #[test]
    fn test_move_to_front() {
        let mut list = RecencyList::with_capacity(3);

        let a = list.push_front("a");
        list.push_front("b");
        list.push_front("c");

        assert_eq!(list.back(), Some(&"a"));
        assert!(list.move_to_front(a));

        // Now 'b' should be oldest
        assert_eq!(list.back(), Some(&"b"));
        assert_eq!(order(&list), vec!["a", "c", "b"]);
        list.assert_linked();
    }

    #[test]
    fn test_move_front_node_is_noop() {
        let mut list = RecencyList::with_capacity(2);
        list.push_front("a");
        let b = list.push_front("b");

        assert!(list.move_to_front(b));
        assert_eq!(order(&list), vec!["b", "a"]);
        list.assert_linked();
    }

    #[test]
    fn test_pop_back_evicts_oldest() {
        let mut list = RecencyList::with_capacity(3);

        list.push_front("key1");
        list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.pop_back(), Some("key1"));
        assert_eq!(list.len(), 2);

        assert_eq!(list.pop_back(), Some("key2"));
        assert_eq!(list.len(), 1);
        list.assert_linked();
    }

    #[test]
    fn test_pop_back_empty() {
        let mut list: RecencyList<u8> = RecencyList::with_capacity(1);
        assert_eq!(list.pop_back(), None);
        list.assert_linked();
    }

    #[test]
    fn test_remove_middle_node() {
        let mut list = RecencyList::with_capacity(3);

        list.push_front("key1");
        let key2 = list.push_front("key2");
        list.push_front("key3");

        assert_eq!(list.remove(key2), Some("key2"));
        assert_eq!(list.len(), 2);
        assert_eq!(order(&list), vec!["key3", "key1"]);
        list.assert_linked();
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut list = RecencyList::with_capacity(2);
        let a = list.push_front("a");
        list.push_front("b");

        assert_eq!(list.remove(a), Some("a"));
        assert_eq!(list.remove(a), None);
        assert!(!list.move_to_front(a));
        assert_eq!(list.get(a), None);
        assert_eq!(order(&list), vec!["b"]);
        list.assert_linked();
    }

    #[test]
    fn test_removed_slot_is_reused() {
        let mut list = RecencyList::with_capacity(2);
        list.push_front(1);
        list.push_front(2);
        assert_eq!(list.pop_back(), Some(1));

        list.push_front(3);
        // Two sentinels plus two live nodes; the freed slot was recycled
        assert_eq!(list.nodes.len(), 4);
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 2]);
        list.assert_linked();
    }

    #[test]
    fn test_order_after_multiple_touches() {
        let mut list = RecencyList::with_capacity(3);

        let a = list.push_front("a");
        let b = list.push_front("b");
        let c = list.push_front("c");

        list.move_to_front(a);
        list.move_to_front(c);
        list.move_to_front(b);

        // front=[b, c, a]=back
        assert_eq!(list.pop_back(), Some("a"));
        assert_eq!(list.pop_back(), Some("c"));
        assert_eq!(list.pop_back(), Some("b"));
        assert_eq!(list.len(), 0);
        list.assert_linked();
    }

    #[test]
    fn test_clear_resets_sentinels() {
        let mut list = RecencyList::with_capacity(2);
        list.push_front(1);
        list.push_front(2);
        list.clear();

        assert_eq!(list.len(), 0);
        assert_eq!(list.iter().count(), 0);
        list.push_front(9);
        assert_eq!(list.back(), Some(&9));
        assert_eq!(order_of(&list), vec![9]);
        list.assert_linked();
    }

    fn order_of(list: &RecencyList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut list = RecencyList::with_capacity(1);
        let id = list.push_front(10);
        if let Some(item) = list.get_mut(id) {
            *item = 11;
        }
        assert_eq!(list.get(id), Some(&11));
    }
}
