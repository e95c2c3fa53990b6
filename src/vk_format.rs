#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

/// The 2D ASTC formats of `VkFormat`, with their Vulkan enum values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum VkFormat {
    ASTC_4x4_UNORM_BLOCK = 157,
    ASTC_4x4_SRGB_BLOCK = 158,
    ASTC_5x4_UNORM_BLOCK = 159,
    ASTC_5x4_SRGB_BLOCK = 160,
    ASTC_5x5_UNORM_BLOCK = 161,
    ASTC_5x5_SRGB_BLOCK = 162,
    ASTC_6x5_UNORM_BLOCK = 163,
    ASTC_6x5_SRGB_BLOCK = 164,
    ASTC_6x6_UNORM_BLOCK = 165,
    ASTC_6x6_SRGB_BLOCK = 166,
    ASTC_8x5_UNORM_BLOCK = 167,
    ASTC_8x5_SRGB_BLOCK = 168,
    ASTC_8x6_UNORM_BLOCK = 169,
    ASTC_8x6_SRGB_BLOCK = 170,
    ASTC_8x8_UNORM_BLOCK = 171,
    ASTC_8x8_SRGB_BLOCK = 172,
    ASTC_10x5_UNORM_BLOCK = 173,
    ASTC_10x5_SRGB_BLOCK = 174,
    ASTC_10x6_UNORM_BLOCK = 175,
    ASTC_10x6_SRGB_BLOCK = 176,
    ASTC_10x8_UNORM_BLOCK = 177,
    ASTC_10x8_SRGB_BLOCK = 178,
    ASTC_10x10_UNORM_BLOCK = 179,
    ASTC_10x10_SRGB_BLOCK = 180,
    ASTC_12x10_UNORM_BLOCK = 181,
    ASTC_12x10_SRGB_BLOCK = 182,
    ASTC_12x12_UNORM_BLOCK = 183,
    ASTC_12x12_SRGB_BLOCK = 184,
}

/// Block footprints in enum order; UNORM and SRGB alternate per footprint.
const FOOTPRINTS: [(u32, u32); 14] = [
    (4, 4),
    (5, 4),
    (5, 5),
    (6, 5),
    (6, 6),
    (8, 5),
    (8, 6),
    (8, 8),
    (10, 5),
    (10, 6),
    (10, 8),
    (10, 10),
    (12, 10),
    (12, 12),
];

const FIRST_ASTC_FORMAT: u32 = VkFormat::ASTC_4x4_UNORM_BLOCK as u32;

impl VkFormat {
    pub const ALL: [VkFormat; 28] = {
        use VkFormat::*;
        [
            ASTC_4x4_UNORM_BLOCK,
            ASTC_4x4_SRGB_BLOCK,
            ASTC_5x4_UNORM_BLOCK,
            ASTC_5x4_SRGB_BLOCK,
            ASTC_5x5_UNORM_BLOCK,
            ASTC_5x5_SRGB_BLOCK,
            ASTC_6x5_UNORM_BLOCK,
            ASTC_6x5_SRGB_BLOCK,
            ASTC_6x6_UNORM_BLOCK,
            ASTC_6x6_SRGB_BLOCK,
            ASTC_8x5_UNORM_BLOCK,
            ASTC_8x5_SRGB_BLOCK,
            ASTC_8x6_UNORM_BLOCK,
            ASTC_8x6_SRGB_BLOCK,
            ASTC_8x8_UNORM_BLOCK,
            ASTC_8x8_SRGB_BLOCK,
            ASTC_10x5_UNORM_BLOCK,
            ASTC_10x5_SRGB_BLOCK,
            ASTC_10x6_UNORM_BLOCK,
            ASTC_10x6_SRGB_BLOCK,
            ASTC_10x8_UNORM_BLOCK,
            ASTC_10x8_SRGB_BLOCK,
            ASTC_10x10_UNORM_BLOCK,
            ASTC_10x10_SRGB_BLOCK,
            ASTC_12x10_UNORM_BLOCK,
            ASTC_12x10_SRGB_BLOCK,
            ASTC_12x12_UNORM_BLOCK,
            ASTC_12x12_SRGB_BLOCK,
        ]
    };

    fn ordinal(self) -> usize {
        (self as u32 - FIRST_ASTC_FORMAT) as usize
    }

    /// Texel footprint `(width, height)` of one block.
    pub fn block_size(self) -> (u32, u32) {
        FOOTPRINTS[self.ordinal() / 2]
    }

    pub fn is_srgb(self) -> bool {
        self.ordinal() % 2 == 1
    }

    pub fn from_block_size(width: u32, height: u32, srgb: bool) -> Option<VkFormat> {
        let footprint = FOOTPRINTS.iter().position(|&f| f == (width, height))?;
        Some(Self::ALL[footprint * 2 + srgb as usize])
    }

    /// The UNORM or SRGB variant with the same footprint.
    pub fn with_srgb(self, srgb: bool) -> VkFormat {
        Self::ALL[self.ordinal() / 2 * 2 + srgb as usize]
    }
}

impl TryFrom<u32> for VkFormat {
    type Error = anyhow::Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        value
            .checked_sub(FIRST_ASTC_FORMAT)
            .and_then(|i| Self::ALL.get(i as usize).copied())
            .ok_or_else(|| anyhow!("vkFormat {value} is not a 2D ASTC format"))
    }
}

/// Parses a footprint such as `8x8` into its UNORM format.
impl FromStr for VkFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| anyhow!("expected a block footprint like 8x8, got {s:?}"))?;
        let width: u32 = w.trim().parse()?;
        let height: u32 = h.trim().parse()?;
        VkFormat::from_block_size(width, height, false)
            .ok_or_else(|| anyhow!("{width}x{height} is not an ASTC block footprint"))
    }
}

impl fmt::Display for VkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.block_size();
        let encoding = if self.is_srgb() { "SRGB" } else { "UNORM" };
        write!(f, "ASTC_{w}x{h}_{encoding}_BLOCK")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprints_follow_vulkan_values() {
        assert_eq!(VkFormat::ASTC_8x8_SRGB_BLOCK.block_size(), (8, 8));
        assert!(VkFormat::ASTC_8x8_SRGB_BLOCK.is_srgb());
        assert_eq!(VkFormat::ASTC_12x10_UNORM_BLOCK.block_size(), (12, 10));
        assert!(!VkFormat::ASTC_12x10_UNORM_BLOCK.is_srgb());
        for format in VkFormat::ALL {
            assert_eq!(VkFormat::try_from(format as u32).unwrap(), format);
        }
    }

    #[test]
    fn parse_footprint() {
        assert_eq!("8x8".parse::<VkFormat>().unwrap(), VkFormat::ASTC_8x8_UNORM_BLOCK);
        assert_eq!(
            "10x6".parse::<VkFormat>().unwrap().with_srgb(true),
            VkFormat::ASTC_10x6_SRGB_BLOCK
        );
        assert!("7x7".parse::<VkFormat>().is_err());
        assert!("big".parse::<VkFormat>().is_err());
        assert!(VkFormat::try_from(97).is_err());
    }

    #[test]
    fn display_name() {
        assert_eq!(VkFormat::ASTC_6x5_SRGB_BLOCK.to_string(), "ASTC_6x5_SRGB_BLOCK");
    }
}
