use half::f16;

use crate::bits::{BitBlock128, BLOCK_SIZE_BYTES};
use crate::block_mode::VOID_EXTENT_MARKER;
use crate::error::{Result, ValidationError};

/// All-ones extent coordinate; the extent geometry is never exercised.
const EXTENT_ALL_ONES: u32 = 0x1FFF;

/// A solid-color block. In HDR mode the channels are f16 bit patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoidExtentParams {
    pub hdr: bool,
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl VoidExtentParams {
    pub fn ldr(r: u16, g: u16, b: u16, a: u16) -> Self {
        VoidExtentParams { hdr: false, r, g, b, a }
    }

    pub fn hdr(r: f16, g: f16, b: f16, a: f16) -> Self {
        VoidExtentParams {
            hdr: true,
            r: r.to_bits(),
            g: g.to_bits(),
            b: b.to_bits(),
            a: a.to_bits(),
        }
    }

    fn channels(&self) -> [(char, u16); 4] {
        [('r', self.r), ('g', self.g), ('b', self.b), ('a', self.a)]
    }

    /// HDR channels must be finite.
    pub fn check(&self) -> Result<()> {
        if !self.hdr {
            return Ok(());
        }
        match self
            .channels()
            .into_iter()
            .find(|&(_, bits)| !f16::from_bits(bits).is_finite())
        {
            Some((channel, bits)) => Err(ValidationError::NonFiniteHdrChannel { channel, bits }),
            None => Ok(()),
        }
    }
}

/// Encodes a void-extent block.
///
/// # Panics
///
/// Panics if `params` fails [`VoidExtentParams::check`].
pub fn encode_void_extent(params: &VoidExtentParams) -> [u8; BLOCK_SIZE_BYTES] {
    if let Err(e) = params.check() {
        panic!("invalid void extent block: {e}");
    }

    let mut block = BitBlock128::new();
    block.set_bits(0, 8, VOID_EXTENT_MARKER);
    block.set_bit(9, params.hdr as u32);
    // Reserved, always set.
    block.set_bits(10, 11, 0b11);

    for i in 0..4 {
        let low = 12 + 13 * i;
        block.set_bits(low, low + 12, EXTENT_ALL_ONES);
    }

    for (i, (_, bits)) in params.channels().into_iter().enumerate() {
        let low = 64 + 16 * i as u32;
        block.set_bits(low, low + 15, bits as u32);
    }

    block.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ldr_block_bytes() {
        let bytes = encode_void_extent(&VoidExtentParams::ldr(0, 0, 0, 0));
        assert_eq!(
            bytes,
            [0xFC, 0xFD, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn channels_and_hdr_flag() {
        let params = VoidExtentParams::hdr(
            f16::from_f32(1.0),
            f16::from_f32(-2.0),
            f16::from_f32(0.5),
            f16::MAX,
        );
        let block = BitBlock128::from_bytes(&encode_void_extent(&params));
        assert_eq!(block.get_bits(0, 8), VOID_EXTENT_MARKER);
        assert_eq!(block.get_bit(9), 1);
        assert_eq!(block.get_bits(64, 79), 0x3C00);
        assert_eq!(block.get_bits(80, 95), 0xC000);
        assert_eq!(block.get_bits(96, 111), 0x3800);
        assert_eq!(block.get_bits(112, 127), 0x7BFF);
    }

    #[test]
    fn non_finite_hdr_rejected() {
        let params = VoidExtentParams::hdr(f16::ZERO, f16::INFINITY, f16::ZERO, f16::ZERO);
        assert!(matches!(
            params.check(),
            Err(ValidationError::NonFiniteHdrChannel { channel: 'g', .. })
        ));
        // The same bit pattern is an ordinary UNORM16 value in LDR mode.
        let ldr = VoidExtentParams { hdr: false, ..params };
        assert!(ldr.check().is_ok());
    }

    #[test]
    #[should_panic]
    fn encoding_nan_hdr_panics() {
        encode_void_extent(&VoidExtentParams::hdr(f16::NAN, f16::ZERO, f16::ZERO, f16::ZERO));
    }
}
