//! Cortex-M4 bit-band address translation.
//!
//! Each word in a 32 MiB alias region maps to one bit of the matching 1 MiB
//! bit-band region:
//!
//! ```text
//! bit_word_offset = (byte_offset * 32) + (bit_number * 4)
//! bit_word_addr   = alias_base + bit_word_offset
//! ```

const REGION_LEN: u32 = 0x10_0000;

pub const SRAM_BIT_BAND_BASE: u32 = 0x2000_0000;
pub const SRAM_ALIAS_BASE: u32 = 0x2200_0000;
pub const PERIPHERAL_BIT_BAND_BASE: u32 = 0x4000_0000;
pub const PERIPHERAL_ALIAS_BASE: u32 = 0x4200_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBandRegion {
    Sram,
    Peripheral,
}

impl BitBandRegion {
    pub fn of(address: u32) -> Option<Self> {
        [Self::Sram, Self::Peripheral]
            .into_iter()
            .find(|region| region.contains(address))
    }

    pub fn base(self) -> u32 {
        match self {
            Self::Sram => SRAM_BIT_BAND_BASE,
            Self::Peripheral => PERIPHERAL_BIT_BAND_BASE,
        }
    }

    pub fn alias_base(self) -> u32 {
        match self {
            Self::Sram => SRAM_ALIAS_BASE,
            Self::Peripheral => PERIPHERAL_ALIAS_BASE,
        }
    }

    pub fn contains(self, address: u32) -> bool {
        (self.base()..self.base() + REGION_LEN).contains(&address)
    }

    pub fn alias(self, address: u32, bit: u32) -> u32 {
        debug_assert!(self.contains(address), "0x{address:X} outside {self:?}");
        debug_assert!(bit < 32);
        ((address - self.base()) * 32) + (bit * 4) + self.alias_base()
    }
}

/// Alias word of `bit` in the peripheral register at `address`.
pub fn alias_address(address: u32, bit: u32) -> u32 {
    BitBandRegion::Peripheral.alias(address, bit)
}
