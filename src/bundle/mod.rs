mod graph;
mod load;
mod parse;

pub use graph::{BundleGraph, Edge, Node};
pub use load::load_bundle_graph;
