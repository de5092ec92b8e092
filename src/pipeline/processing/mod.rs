// Pipeline processing: schema mapping, merging, and field cleaning

pub mod clean;
pub mod merge;
pub mod normalize;
