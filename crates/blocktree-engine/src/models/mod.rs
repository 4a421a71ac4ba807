pub mod block;
pub mod builder;
pub mod capabilities;

pub use block::{Block, Parameters};
pub use builder::BlockBuilder;
pub use capabilities::*;
