use super::handle::Handle;

/// Color of a red-black tree node.
///
/// A missing child is conceptually [`Black`](Color::Black); the helpers on
/// the red-black engine encode that convention.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child link of a node, so symmetric cases share one code path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A single tree node: a value, two owned child links, and engine-specific
/// metadata (`Color` for the red-black engine, a cached `i32` subtree height
/// for the height engine). Nodes have no parent pointer; path context is
/// reconstructed by the engines during each pass.
#[derive(Clone)]
pub(crate) struct Node<V, M> {
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
    meta: M,
}

impl<V, M> Node<V, M> {
    pub(crate) const fn new(value: V, meta: M) -> Self {
        Self {
            value,
            left: None,
            right: None,
            meta,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn meta(&self) -> M
    where
        M: Copy,
    {
        self.meta
    }

    #[inline]
    pub(crate) fn set_meta(&mut self, meta: M) {
        self.meta = meta;
    }
}
