/// The order in which a traversal visits tree nodes.
///
/// The three depth-first orders are driven by an explicit stack and
/// [`LevelOrder`](Order::LevelOrder) by a FIFO queue, so traversal never
/// recurses regardless of tree height.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Order {
    /// Breadth-first, root outward, left to right within a level.
    LevelOrder,
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. For a valid tree this
    /// yields values in ascending comparator order.
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
}
