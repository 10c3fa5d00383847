mod arena;
mod handle;
mod node;
mod tree;

pub(crate) mod height;
pub(crate) mod rebuild;
pub(crate) mod red_black;
pub(crate) mod traverse;

pub(crate) use node::Color;
pub(crate) use tree::RawTree;
