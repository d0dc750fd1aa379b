pub mod counts;
pub mod model;
pub mod options;
pub mod tagger;
pub mod trainer;
pub mod vocab;
mod lattice;
