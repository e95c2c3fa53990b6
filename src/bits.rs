/// Size of one ASTC block in bytes.
pub const BLOCK_SIZE_BYTES: usize = 16;

const WORD_BITS: u32 = 64;

#[inline]
pub fn get_bit(src: u32, index: u32) -> u32 {
    debug_assert!(index < 32);
    (src >> index) & 1
}

/// Bits `low..=high` of `src`, shifted down to bit 0.
#[inline]
pub fn get_bits(src: u32, low: u32, high: u32) -> u32 {
    let width = high - low + 1;
    debug_assert!(width >= 1 && width <= 32);
    if width == 32 {
        src >> low
    } else {
        (src >> low) & ((1u32 << width) - 1)
    }
}

/// Mask with the low `width` bits set. `width` may be 0..=32.
#[inline]
pub fn low_mask(width: u32) -> u32 {
    if width >= 32 { u32::MAX } else { (1u32 << width) - 1 }
}

pub fn reverse_bits(src: u32, width: u32) -> u32 {
    debug_assert!(width <= 32);
    if width == 0 {
        return 0;
    }
    src.reverse_bits() >> (32 - width)
}

/// A 128-bit ASTC block under construction.
///
/// Bit 0 is the least significant bit of byte 0; bit 127 is the most significant
/// bit of byte 15.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitBlock128 {
    words: [u64; 2],
}

impl BitBlock128 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8; BLOCK_SIZE_BYTES]) -> Self {
        let mut lo = [0u8; 8];
        let mut hi = [0u8; 8];
        lo.copy_from_slice(&bytes[..8]);
        hi.copy_from_slice(&bytes[8..]);
        BitBlock128 {
            words: [u64::from_le_bytes(lo), u64::from_le_bytes(hi)],
        }
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_SIZE_BYTES] {
        let mut out = [0u8; BLOCK_SIZE_BYTES];
        out[..8].copy_from_slice(&self.words[0].to_le_bytes());
        out[8..].copy_from_slice(&self.words[1].to_le_bytes());
        out
    }

    pub fn set_bit(&mut self, index: u32, value: u32) {
        assert!(index < 128, "bit index {index} out of block");
        assert!(value <= 1, "bit value must be 0 or 1, got {value}");
        let word = (index / WORD_BITS) as usize;
        let shift = index % WORD_BITS;
        self.words[word] = (self.words[word] & !(1u64 << shift)) | ((value as u64) << shift);
    }

    pub fn get_bit(&self, index: u32) -> u32 {
        assert!(index < 128, "bit index {index} out of block");
        ((self.words[(index / WORD_BITS) as usize] >> (index % WORD_BITS)) & 1) as u32
    }

    /// Overwrite bits `low..=high` with `bits`.
    ///
    /// The range may straddle the boundary between the two internal words. `bits`
    /// must not have anything set above the range width.
    pub fn set_bits(&mut self, low: u32, high: u32, bits: u32) {
        assert!(low <= high && high < 128, "bit range {low}..={high} out of block");
        let width = high - low + 1;
        assert!(width <= 32, "bit range {low}..={high} wider than 32 bits");
        assert!(bits & !low_mask(width) == 0, "value {bits:#x} wider than {width} bits");

        let word0 = (low / WORD_BITS) as usize;
        let word1 = (high / WORD_BITS) as usize;
        let shift = low % WORD_BITS;
        let value = bits as u64;

        if word0 == word1 {
            let mask = ((1u64 << width) - 1) << shift;
            self.words[word0] = (self.words[word0] & !mask) | (value << shift);
        } else {
            let bits_in_w0 = WORD_BITS - shift;
            let low_part = value & ((1u64 << bits_in_w0) - 1);
            let high_part = value >> bits_in_w0;
            let high_mask = (1u64 << (high % WORD_BITS + 1)) - 1;

            self.words[word0] = (self.words[word0] & ((1u64 << shift) - 1)) | (low_part << shift);
            self.words[word1] = (self.words[word1] & !high_mask) | high_part;
        }
    }

    /// Read bits `low..=high`. An empty range (`high + 1 == low`) reads as 0.
    pub fn get_bits(&self, low: u32, high: u32) -> u32 {
        if high + 1 == low {
            return 0;
        }
        assert!(low <= high && high < 128, "bit range {low}..={high} out of block");
        let width = high - low + 1;
        assert!(width <= 32, "bit range {low}..={high} wider than 32 bits");

        let word0 = (low / WORD_BITS) as usize;
        let word1 = (high / WORD_BITS) as usize;
        let shift = low % WORD_BITS;

        let raw = if word0 == word1 {
            self.words[word0] >> shift
        } else {
            (self.words[word0] >> shift) | (self.words[word1] << (WORD_BITS - shift))
        };
        (raw as u32) & low_mask(width)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Positions grow upward from the base bit.
    Forward,
    /// Positions grow downward from the base bit; each field is bit-reversed.
    Reverse,
}

/// Sequential writer over `length` bits of a block, starting at `base`.
///
/// Every write advances the cursor by its full width. Whatever falls at or beyond
/// `length` is dropped, which is how partial ISE groups at the end of a sequence
/// get clipped to the bit budget.
pub struct BitCursor<'a> {
    block: &'a mut BitBlock128,
    base: u32,
    length: u32,
    direction: Direction,
    pos: u32,
}

impl<'a> BitCursor<'a> {
    pub fn new(block: &'a mut BitBlock128, base: u32, length: u32, direction: Direction) -> Self {
        match direction {
            Direction::Forward => assert!(length == 0 || base + length <= 128),
            Direction::Reverse => assert!(length == 0 || (base < 128 && length <= base + 1)),
        }
        BitCursor {
            block,
            base,
            length,
            direction,
            pos: 0,
        }
    }

    pub fn position(&self) -> u32 {
        self.pos
    }

    pub fn write_next(&mut self, width: u32, bits: u32) {
        debug_assert!(bits & !low_mask(width) == 0);

        let start = self.pos;
        self.pos += width;

        if width == 0 || start >= self.length {
            return;
        }

        let kept = self.length.min(start + width) - start;
        let bits = bits & low_mask(kept);

        match self.direction {
            Direction::Forward => {
                let low = self.base + start;
                self.block.set_bits(low, low + kept - 1, bits);
            }
            Direction::Reverse => {
                let high = self.base - start;
                self.block.set_bits(high + 1 - kept, high, reverse_bits(bits, kept));
            }
        }
    }
}
