pub mod betting;
pub mod skills;

pub use betting::*;
pub use skills::*;
