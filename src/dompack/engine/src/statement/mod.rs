//! Statement extraction from USACO problem pages
pub mod contest_index;
pub mod extract;
pub mod problem;
pub mod sanitize;

pub use contest_index::{ContestDescriptor, ContestIndex};
pub use problem::{letter_id, Problem};
