//! Report assembly, export and rendering.

pub mod assembler;
pub mod generator;

pub use assembler::*;
pub use generator::*;
