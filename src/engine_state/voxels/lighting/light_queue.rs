use cgmath::Point3;

use crate::engine_state::voxels::block::LightChannel;

/// One pending light update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightNode {
    /// World block coordinate.
    pub position: Point3<i32>,
    /// The channel being propagated.
    pub channel: LightChannel,
    /// Level the block held before a darken pass cleared it. Unused when brightening.
    pub level: u8,
}

impl Default for LightNode {
    fn default() -> Self {
        LightNode {
            position: Point3::new(0, 0, 0),
            channel: LightChannel::default(),
            level: 0,
        }
    }
}

/// Fixed-capacity FIFO ring buffer of light updates.
///
/// Overflowing the queue means the capacity is too small for the lit volume the world
/// can reach, and panics.
#[derive(Debug)]
pub struct LightQueue {
    nodes: Box<[LightNode]>,
    head: usize,
    len: usize,
}

impl LightQueue {
    /// Creates an empty queue that holds at most `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "light queue needs a non-zero capacity");
        LightQueue {
            nodes: vec![LightNode::default(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    /// Appends a node at the back.
    ///
    /// # Panics
    /// Panics if the queue is full.
    pub fn push(&mut self, node: LightNode) {
        assert!(
            self.len < self.nodes.len(),
            "light queue overflow at {} entries",
            self.nodes.len()
        );
        let tail = (self.head + self.len) % self.nodes.len();
        self.nodes[tail] = node;
        self.len += 1;
    }

    /// Removes and returns the node at the front.
    pub fn pop(&mut self) -> Option<LightNode> {
        if self.len == 0 {
            return None;
        }
        let node = self.nodes[self.head];
        self.head = (self.head + 1) % self.nodes.len();
        self.len -= 1;
        Some(node)
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of queued nodes.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }
}
