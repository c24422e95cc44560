mod decoder;
mod lanes;
mod pipeline;
mod ports;

use core::fmt;

use crate::image::ImageError;

pub use decoder::{AccessWindow, DecodedAddress};
pub use lanes::{ByteLane, LaneStorage, LaneStorageError, ReadOnlyLanes, ReadWriteLanes};
pub use pipeline::InstructionMemory;
pub use ports::{LaneMask, PortInputs};

/// Define the size of the address space seen on the address port
pub const ADDRESS_SPACE_SIZE: u32 = u16::MAX as u32 + 1;
pub const BYTES_PER_WORD: u32 = 2;

/// Provides error conditions for memory configuration parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    EmptyWindow(u16),
    OddSize(u32),
    MisalignedBase(u16),
    WindowOverflow { base: u16, size: u32 },
    Image(ImageError),
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWindow(base) => write!(f, "Empty Window at 0x{base:04x}"),
            Self::OddSize(size) => write!(f, "Window Size {size} is not a whole number of words"),
            Self::MisalignedBase(base) => write!(f, "Misaligned Base 0x{base:04x}"),
            Self::WindowOverflow { base, size } => {
                write!(f, "Window 0x{base:04x} + {size} exceeds the address space")
            }
            Self::Image(e) => write!(f, "Image Error => {e}"),
        }
    }
}

impl From<ImageError> for MemoryError {
    fn from(value: ImageError) -> Self {
        Self::Image(value)
    }
}

/// Selects whether the write path exists at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    ReadWrite,
    ReadOnly,
}

/// Instantiation parameters, fixed for the lifetime of a memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// First byte address claimed by the memory
    pub base: u16,
    /// Capacity in bytes
    pub size: u32,
    pub mode: AccessMode,
}

impl MemoryConfig {
    pub fn new(base: u16, size: u32) -> Self {
        Self {
            base,
            size,
            mode: AccessMode::ReadWrite,
        }
    }

    pub fn read_only(self) -> Self {
        Self {
            mode: AccessMode::ReadOnly,
            ..self
        }
    }

    /// Number of 16-bit words held by a memory of this size
    pub fn words(&self) -> usize {
        (self.size / BYTES_PER_WORD) as usize
    }

    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.size == 0 {
            Err(MemoryError::EmptyWindow(self.base))
        } else if self.size % BYTES_PER_WORD != 0 {
            Err(MemoryError::OddSize(self.size))
        } else if self.base as u32 % BYTES_PER_WORD != 0 {
            Err(MemoryError::MisalignedBase(self.base))
        } else if self.base as u32 + self.size > ADDRESS_SPACE_SIZE {
            Err(MemoryError::WindowOverflow {
                base: self.base,
                size: self.size,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the accepted and rejected window parameters
    #[test]
    fn test_validate() {
        assert!(MemoryConfig::new(0x1000, 4).validate().is_ok());
        assert!(MemoryConfig::new(0x0000, ADDRESS_SPACE_SIZE).validate().is_ok());
        assert!(MemoryConfig::new(0xFFFE, 2).validate().is_ok());

        assert_eq!(
            MemoryConfig::new(0x1000, 0).validate(),
            Err(MemoryError::EmptyWindow(0x1000))
        );
        assert_eq!(
            MemoryConfig::new(0x1000, 5).validate(),
            Err(MemoryError::OddSize(5))
        );
        assert_eq!(
            MemoryConfig::new(0x1001, 4).validate(),
            Err(MemoryError::MisalignedBase(0x1001))
        );
        assert_eq!(
            MemoryConfig::new(0xFFFE, 4).validate(),
            Err(MemoryError::WindowOverflow {
                base: 0xFFFE,
                size: 4
            })
        );
    }

    /// Test the builder keeps the window while switching the mode
    #[test]
    fn test_read_only() {
        let cfg = MemoryConfig::new(0x0100, 64).read_only();
        assert_eq!(cfg.mode, AccessMode::ReadOnly);
        assert_eq!(cfg.base, 0x0100);
        assert_eq!(cfg.words(), 32);
    }
}
