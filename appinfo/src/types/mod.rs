//! Composite records rendered through their natural string form

mod memory;
mod thread;

pub use memory::*;
pub use thread::*;
