use super::{MemoryConfig, MemoryError, BYTES_PER_WORD};

/// Result of decoding one address against a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub hit: bool,
    /// Word index, only meaningful when `hit` is set
    pub index: usize,
}

impl DecodedAddress {
    pub const MISS: Self = Self {
        hit: false,
        index: 0,
    };
}

/// The contiguous range of byte addresses a memory responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessWindow {
    base: u16,
    size: u32,
}

impl AccessWindow {
    pub fn new(config: &MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        Ok(Self {
            base: config.base,
            size: config.size,
        })
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    /// One past the last byte address in the window
    pub fn top(&self) -> u32 {
        self.base as u32 + self.size
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn words(&self) -> usize {
        (self.size / BYTES_PER_WORD) as usize
    }

    /// Determines whether the address lies within the window
    pub fn within(&self, address: u16) -> bool {
        address >= self.base && (address as u32) < self.top()
    }

    /// Decodes an address into a word index, dropping the byte-select bit
    pub fn decode(&self, address: u16) -> DecodedAddress {
        if self.within(address) {
            DecodedAddress {
                hit: true,
                index: ((address - self.base) as u32 / BYTES_PER_WORD) as usize,
            }
        } else {
            DecodedAddress::MISS
        }
    }

    /// Byte address of the given word index
    pub fn address_of(&self, index: usize) -> Option<u16> {
        if index < self.words() {
            Some(self.base + (index as u32 * BYTES_PER_WORD) as u16)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ADDRESS_SPACE_SIZE;

    fn get_default_test_window() -> AccessWindow {
        AccessWindow::new(&MemoryConfig::new(0x1000, 4)).unwrap()
    }

    /// Test the window bounds over the full address space
    #[test]
    fn test_within() {
        let base = 256;
        let size = 1024;
        let win = AccessWindow::new(&MemoryConfig::new(base, size)).unwrap();

        for i in 0..ADDRESS_SPACE_SIZE {
            let addr = i as u16;
            let is_within = i >= base as u32 && i < base as u32 + size;
            assert_eq!(win.within(addr), is_within);
            assert_eq!(win.decode(addr).hit, is_within);
        }
    }

    /// Test word indices for aligned addresses
    #[test]
    fn test_decode_index() {
        let win = get_default_test_window();
        assert_eq!(win.decode(0x1000), DecodedAddress { hit: true, index: 0 });
        assert_eq!(win.decode(0x1002), DecodedAddress { hit: true, index: 1 });
        assert_eq!(win.decode(0x1004), DecodedAddress::MISS);
        assert_eq!(win.decode(0x0FFE), DecodedAddress::MISS);
    }

    /// Test that an odd address rounds down to its containing word
    #[test]
    fn test_decode_odd() {
        let win = get_default_test_window();
        assert_eq!(win.decode(0x1001), DecodedAddress { hit: true, index: 0 });
        assert_eq!(win.decode(0x1003), DecodedAddress { hit: true, index: 1 });
        assert_eq!(win.decode(0x0FFF), DecodedAddress::MISS);
    }

    /// Test a window reaching the top of the address space
    #[test]
    fn test_decode_top() {
        let win = AccessWindow::new(&MemoryConfig::new(0xFF00, 0x100)).unwrap();
        assert_eq!(win.top(), ADDRESS_SPACE_SIZE);
        assert_eq!(win.decode(0xFFFF), DecodedAddress { hit: true, index: 0x7F });
        assert_eq!(win.address_of(0x7F), Some(0xFFFE));
        assert_eq!(win.address_of(0x80), None);
    }

    /// Test that invalid configurations never produce a window
    #[test]
    fn test_invalid_window() {
        assert!(AccessWindow::new(&MemoryConfig::new(0x1000, 0)).is_err());
        assert!(AccessWindow::new(&MemoryConfig::new(0xFFFE, 4)).is_err());
    }
}
