pub mod predict;
pub mod tree;
