use core::fmt;

use super::ByteLane;

/// The two-bit write-enable port, bit 0 selecting the low lane and bit 1 the high lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LaneMask(u8);

impl LaneMask {
    pub const NONE: Self = Self(0b00);
    pub const LOW: Self = Self(0b01);
    pub const HIGH: Self = Self(0b10);
    pub const BOTH: Self = Self(0b11);

    /// Builds a mask from the port value, ignoring bits above the port width
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::BOTH.0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, lane: ByteLane) -> bool {
        self.0 & Self::from(lane).0 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<ByteLane> for LaneMask {
    fn from(value: ByteLane) -> Self {
        match value {
            ByteLane::Low => Self::LOW,
            ByteLane::High => Self::HIGH,
        }
    }
}

impl fmt::Display for LaneMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02b}", self.0)
    }
}

/// Values driven onto the input ports for a single clock cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortInputs {
    pub read_enable: bool,
    pub write_enable: LaneMask,
    pub update_enable: bool,
    pub address: u16,
    pub data_in: u16,
}

impl PortInputs {
    /// A cycle with every enable deasserted
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn read(address: u16) -> Self {
        Self {
            read_enable: true,
            address,
            ..Self::default()
        }
    }

    /// A qualified write to the lanes in `mask`
    pub fn write(address: u16, data_in: u16, mask: LaneMask) -> Self {
        Self {
            write_enable: mask,
            update_enable: true,
            address,
            data_in,
            ..Self::default()
        }
    }

    /// The byte of `data_in` feeding the given lane
    pub fn lane_data(&self, lane: ByteLane) -> u8 {
        match lane {
            ByteLane::Low => (self.data_in & 0xFF) as u8,
            ByteLane::High => (self.data_in >> 8) as u8,
        }
    }
}

impl fmt::Display for PortInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "addr=0x{:04x} rden={} wren={} upen={} din=0x{:04x}",
            self.address,
            self.read_enable as u8,
            self.write_enable,
            self.update_enable as u8,
            self.data_in
        )
    }
}
