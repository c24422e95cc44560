pub mod image;
pub mod memory;

pub use image::{ImageError, MemoryImage};
pub use memory::{AccessMode, InstructionMemory, LaneMask, MemoryConfig, MemoryError, PortInputs};
