//! Integer sequence encoding (ISE).
//!
//! ASTC packs weights and color endpoint values as sequences of small integers.
//! Each value is split into `num_bits` low bits plus, for trit and quint ranges, a
//! base-3 or base-5 digit. Digits are gathered per group (5 trits or 3 quints)
//! into a single packed selector that is interleaved with the low bits.

use crate::bits::{get_bit, get_bits, low_mask, BitCursor};
use crate::error::{Result, ValidationError};

/// Maximum number of values in one sequence (the weight limit of a block).
pub const MAX_ISE_VALUES: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IseMode {
    Trit,
    Quint,
    PlainBit,
}

impl IseMode {
    /// Logical values per encoded group.
    pub fn group_size(self) -> usize {
        match self {
            IseMode::Trit => 5,
            IseMode::Quint => 3,
            IseMode::PlainBit => 1,
        }
    }

    /// Width of the packed T or Q selector of one group.
    pub fn selector_bits(self) -> u32 {
        match self {
            IseMode::Trit => 8,
            IseMode::Quint => 7,
            IseMode::PlainBit => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IseParams {
    pub mode: IseMode,
    pub num_bits: u8,
}

impl IseParams {
    pub const fn new(mode: IseMode, num_bits: u8) -> Self {
        IseParams { mode, num_bits }
    }

    pub const fn trit(num_bits: u8) -> Self {
        Self::new(IseMode::Trit, num_bits)
    }

    pub const fn quint(num_bits: u8) -> Self {
        Self::new(IseMode::Quint, num_bits)
    }

    pub const fn plain(num_bits: u8) -> Self {
        Self::new(IseMode::PlainBit, num_bits)
    }

    /// Number of bits a sequence of `num_values` values occupies.
    pub fn required_bits(self, num_values: u32) -> u32 {
        let b = self.num_bits as u32;
        match self.mode {
            IseMode::Trit => (num_values * 8).div_ceil(5) + num_values * b,
            IseMode::Quint => (num_values * 7).div_ceil(3) + num_values * b,
            IseMode::PlainBit => num_values * b,
        }
    }

    /// Largest value the encoding can represent.
    pub fn range_max(self) -> u32 {
        let scale = 1u32 << self.num_bits;
        match self.mode {
            IseMode::Trit => scale * 3 - 1,
            IseMode::Quint => scale * 5 - 1,
            IseMode::PlainBit => scale - 1,
        }
    }
}

/// Picks the encoding with the largest range whose sequence of `num_values`
/// values fits in `available_bits`.
pub fn maximize_range(available_bits: i32, num_values: u32) -> IseParams {
    // Search starts at the widest encodings that can ever be useful in a block.
    let mut trit_bits: u8 = 6;
    let mut quint_bits: u8 = 5;
    let mut plain_bits: u8 = 8;

    let range_of = |params: IseParams| {
        if params.num_bits > 0 {
            Some(params.range_max())
        } else {
            None
        }
    };

    loop {
        let trit = IseParams::trit(trit_bits);
        let quint = IseParams::quint(quint_bits);
        let plain = IseParams::plain(plain_bits);

        let best = [trit, quint, plain]
            .into_iter()
            .filter_map(|p| range_of(p).map(|r| (r, p)))
            .max_by_key(|&(r, p)| (r, candidate_priority(p.mode)));

        let Some((_, candidate)) = best else {
            return IseParams::plain(0);
        };

        if (candidate.required_bits(num_values) as i64) <= available_bits as i64 {
            return candidate;
        }

        match candidate.mode {
            IseMode::Trit => trit_bits -= 1,
            IseMode::Quint => quint_bits -= 1,
            IseMode::PlainBit => plain_bits -= 1,
        }
    }
}

// Ranges never tie across modes, but keep the order deterministic anyway.
fn candidate_priority(mode: IseMode) -> u8 {
    match mode {
        IseMode::Trit => 2,
        IseMode::Quint => 1,
        IseMode::PlainBit => 0,
    }
}

/// One explicitly encoded ISE group.
///
/// Several T or Q selectors decode to the same digits, so tests that need to hit a
/// particular raw encoding give the selector directly instead of logical values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IseBlock {
    /// 8-bit T for trit groups, 7-bit Q for quint groups, unused for plain bits.
    pub t_or_q: u32,
    /// Low bit-plane value per slot. Plain-bit groups only use `bits[0]`.
    pub bits: [u32; 5],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IseInput {
    /// One logical value per slot, each in `0..=range_max`.
    Plain(Vec<u32>),
    /// One entry per encoded group.
    Blocks(Vec<IseBlock>),
}

impl Default for IseInput {
    fn default() -> Self {
        IseInput::Plain(Vec::new())
    }
}

impl IseInput {
    pub fn is_block_form(&self) -> bool {
        matches!(self, IseInput::Blocks(_))
    }

    /// Checks that the input covers `num_values` values of `params`.
    pub fn check(&self, params: IseParams, num_values: usize) -> Result<()> {
        let num_bits = params.num_bits as u32;
        match self {
            IseInput::Plain(values) => {
                if values.len() < num_values {
                    return Err(ValidationError::IseInputLength {
                        needed: num_values,
                        got: values.len(),
                    });
                }
                let range_max = params.range_max();
                if let Some((index, &value)) = values[..num_values]
                    .iter()
                    .enumerate()
                    .find(|&(_, &v)| v > range_max)
                {
                    return Err(ValidationError::IseValueOutOfRange {
                        index,
                        value,
                        range_max,
                    });
                }
            }
            IseInput::Blocks(blocks) => {
                let group = params.mode.group_size();
                let needed = num_values.div_ceil(group);
                if blocks.len() < needed {
                    return Err(ValidationError::IseInputLength {
                        needed,
                        got: blocks.len(),
                    });
                }
                let selector_bits = params.mode.selector_bits();
                for (index, block) in blocks[..needed].iter().enumerate() {
                    if block.t_or_q & !low_mask(selector_bits) != 0 {
                        return Err(ValidationError::IseSelectorOutOfRange {
                            index,
                            value: block.t_or_q,
                            width: selector_bits,
                        });
                    }
                    if let Some(&value) = block.bits[..group]
                        .iter()
                        .find(|&&b| b & !low_mask(num_bits) != 0)
                    {
                        return Err(ValidationError::IseBitsOutOfRange {
                            index,
                            value,
                            width: num_bits,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// `TRIT_T[t0][t1][t2][t3][t4]` is a T selector that decodes to those trits.
///
/// Where several selectors decode identically, this is the one reference corpora use.
#[rustfmt::skip]
const TRIT_T: [[[[[u8; 3]; 3]; 3]; 3]; 3] = [
    [
        [[[0, 128, 96], [32, 160, 224], [64, 192, 28]],
         [[16, 144, 112], [48, 176, 240], [80, 208, 156]],
         [[3, 131, 99], [35, 163, 227], [67, 195, 31]]],
        [[[4, 132, 100], [36, 164, 228], [68, 196, 60]],
         [[20, 148, 116], [52, 180, 244], [84, 212, 188]],
         [[19, 147, 115], [51, 179, 243], [83, 211, 159]]],
        [[[8, 136, 104], [40, 168, 232], [72, 200, 92]],
         [[24, 152, 120], [56, 184, 248], [88, 216, 220]],
         [[12, 140, 108], [44, 172, 236], [76, 204, 124]]],
    ],
    [
        [[[1, 129, 97], [33, 161, 225], [65, 193, 29]],
         [[17, 145, 113], [49, 177, 241], [81, 209, 157]],
         [[7, 135, 103], [39, 167, 231], [71, 199, 63]]],
        [[[5, 133, 101], [37, 165, 229], [69, 197, 61]],
         [[21, 149, 117], [53, 181, 245], [85, 213, 189]],
         [[23, 151, 119], [55, 183, 247], [87, 215, 191]]],
        [[[9, 137, 105], [41, 169, 233], [73, 201, 93]],
         [[25, 153, 121], [57, 185, 249], [89, 217, 221]],
         [[13, 141, 109], [45, 173, 237], [77, 205, 125]]],
    ],
    [
        [[[2, 130, 98], [34, 162, 226], [66, 194, 30]],
         [[18, 146, 114], [50, 178, 242], [82, 210, 158]],
         [[11, 139, 107], [43, 171, 235], [75, 203, 95]]],
        [[[6, 134, 102], [38, 166, 230], [70, 198, 62]],
         [[22, 150, 118], [54, 182, 246], [86, 214, 190]],
         [[27, 155, 123], [59, 187, 251], [91, 219, 223]]],
        [[[10, 138, 106], [42, 170, 234], [74, 202, 94]],
         [[26, 154, 122], [58, 186, 250], [90, 218, 222]],
         [[14, 142, 110], [46, 174, 238], [78, 206, 126]]],
    ],
];

/// `QUINT_Q[q0][q1][q2]` is a Q selector that decodes to those quints.
#[rustfmt::skip]
const QUINT_Q: [[[u8; 5]; 5]; 5] = [
    [[0, 32, 64, 96, 102], [8, 40, 72, 104, 110], [16, 48, 80, 112, 118], [24, 56, 88, 120, 126], [5, 37, 69, 101, 39]],
    [[1, 33, 65, 97, 103], [9, 41, 73, 105, 111], [17, 49, 81, 113, 119], [25, 57, 89, 121, 127], [13, 45, 77, 109, 47]],
    [[2, 34, 66, 98, 70], [10, 42, 74, 106, 78], [18, 50, 82, 114, 86], [26, 58, 90, 122, 94], [21, 53, 85, 117, 55]],
    [[3, 35, 67, 99, 71], [11, 43, 75, 107, 79], [19, 51, 83, 115, 87], [27, 59, 91, 123, 95], [29, 61, 93, 125, 63]],
    [[4, 36, 68, 100, 38], [12, 44, 76, 108, 46], [20, 52, 84, 116, 54], [28, 60, 92, 124, 62], [6, 14, 22, 30, 7]],
];

pub fn trit_selector(trits: [u32; 5]) -> u32 {
    let [t0, t1, t2, t3, t4] = trits.map(|t| t as usize);
    TRIT_T[t0][t1][t2][t3][t4] as u32
}

pub fn quint_selector(quints: [u32; 3]) -> u32 {
    let [q0, q1, q2] = quints.map(|q| q as usize);
    QUINT_Q[q0][q1][q2] as u32
}

/// Splits up to `N` plain values into low bits and high digits, zero-filling
/// slots past `values`.
fn split_plain<const N: usize>(values: &[u32], num_bits: u32) -> ([u32; N], [u32; N]) {
    let mut low = [0u32; N];
    let mut high = [0u32; N];
    for (i, &v) in values.iter().enumerate() {
        low[i] = v & low_mask(num_bits);
        high[i] = v >> num_bits;
    }
    (low, high)
}

fn write_trit_group(cursor: &mut BitCursor<'_>, num_bits: u32, t: u32, m: &[u32]) {
    cursor.write_next(num_bits, m[0]);
    cursor.write_next(2, get_bits(t, 0, 1));
    cursor.write_next(num_bits, m[1]);
    cursor.write_next(2, get_bits(t, 2, 3));
    cursor.write_next(num_bits, m[2]);
    cursor.write_next(1, get_bit(t, 4));
    cursor.write_next(num_bits, m[3]);
    cursor.write_next(2, get_bits(t, 5, 6));
    cursor.write_next(num_bits, m[4]);
    cursor.write_next(1, get_bit(t, 7));
}

fn write_quint_group(cursor: &mut BitCursor<'_>, num_bits: u32, q: u32, m: &[u32]) {
    cursor.write_next(num_bits, m[0]);
    cursor.write_next(3, get_bits(q, 0, 2));
    cursor.write_next(num_bits, m[1]);
    cursor.write_next(2, get_bits(q, 3, 4));
    cursor.write_next(num_bits, m[2]);
    cursor.write_next(2, get_bits(q, 5, 6));
}

/// Zeroes the low bits of slots that belong to no value in a partial group.
fn block_bits<const N: usize>(block: &IseBlock, used: usize) -> [u32; N] {
    let mut out = [0u32; N];
    out[..used].copy_from_slice(&block.bits[..used]);
    out
}

/// Writes `num_values` values through `cursor`.
///
/// The input must already have passed [`IseInput::check`].
pub fn encode(cursor: &mut BitCursor<'_>, params: IseParams, input: &IseInput, num_values: usize) {
    let num_bits = params.num_bits as u32;
    let group = params.mode.group_size();

    for group_index in 0..num_values.div_ceil(group) {
        let first = group_index * group;
        let used = (num_values - first).min(group);

        match (params.mode, input) {
            (IseMode::Trit, IseInput::Plain(values)) => {
                let (low, trits) = split_plain::<5>(&values[first..first + used], num_bits);
                write_trit_group(cursor, num_bits, trit_selector(trits), &low);
            }
            (IseMode::Trit, IseInput::Blocks(blocks)) => {
                let block = &blocks[group_index];
                write_trit_group(cursor, num_bits, block.t_or_q, &block_bits::<5>(block, used));
            }
            (IseMode::Quint, IseInput::Plain(values)) => {
                let (low, quints) = split_plain::<3>(&values[first..first + used], num_bits);
                write_quint_group(cursor, num_bits, quint_selector(quints), &low);
            }
            (IseMode::Quint, IseInput::Blocks(blocks)) => {
                let block = &blocks[group_index];
                write_quint_group(cursor, num_bits, block.t_or_q, &block_bits::<3>(block, used));
            }
            (IseMode::PlainBit, IseInput::Plain(values)) => {
                cursor.write_next(num_bits, values[first]);
            }
            (IseMode::PlainBit, IseInput::Blocks(blocks)) => {
                cursor.write_next(num_bits, blocks[group_index].bits[0]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{BitBlock128, Direction};

    #[test]
    fn required_bits_per_mode() {
        assert_eq!(IseParams::trit(2).required_bits(5), 8 + 10);
        assert_eq!(IseParams::trit(0).required_bits(16), 26);
        assert_eq!(IseParams::quint(1).required_bits(3), 7 + 3);
        assert_eq!(IseParams::quint(0).required_bits(4), 10);
        assert_eq!(IseParams::plain(3).required_bits(12), 36);
    }

    #[test]
    fn range_max_per_mode() {
        assert_eq!(IseParams::trit(0).range_max(), 2);
        assert_eq!(IseParams::trit(3).range_max(), 23);
        assert_eq!(IseParams::quint(2).range_max(), 19);
        assert_eq!(IseParams::plain(5).range_max(), 31);
        assert_eq!(IseParams::plain(0).range_max(), 0);
    }

    #[test]
    fn maximize_range_prefers_widest_fitting() {
        // 8 values in 64 bits: plain 8 needs 64 bits.
        assert_eq!(maximize_range(64, 8), IseParams::plain(8));
        // 8 values in 63 bits: trit 6 needs 13 + 48 = 61 bits, range 191.
        assert_eq!(maximize_range(63, 8), IseParams::trit(6));
        // Exhausted budget falls through to an empty encoding.
        assert_eq!(maximize_range(0, 4), IseParams::plain(0));
    }

    #[test]
    fn maximize_range_result_fits() {
        for bits in 0..=111 {
            for n in 2..=18u32 {
                let p = maximize_range(bits, n);
                assert!(p.required_bits(n) as i32 <= bits || p == IseParams::plain(0));
            }
        }
    }

    #[test]
    fn check_rejects_out_of_range_values() {
        let err = IseInput::Plain(vec![0, 1, 3]).check(IseParams::trit(0), 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IseValueOutOfRange { index: 2, value: 3, range_max: 2 }
        );
        assert!(IseInput::Plain(vec![0, 1]).check(IseParams::trit(0), 3).is_err());
        let q = IseBlock { t_or_q: 128, bits: [0; 5] };
        assert!(IseInput::Blocks(vec![q]).check(IseParams::quint(1), 3).is_err());
    }

    #[test]
    fn plain_bit_sequence_is_flat() {
        let mut block = BitBlock128::new();
        let params = IseParams::plain(3);
        {
            let mut cursor = BitCursor::new(&mut block, 0, 9, Direction::Forward);
            encode(&mut cursor, params, &IseInput::Plain(vec![5, 2, 7]), 3);
        }
        assert_eq!(block.get_bits(0, 8), 5 | (2 << 3) | (7 << 6));
    }

    #[test]
    fn trit_group_layout_interleaves_selector() {
        let mut block = BitBlock128::new();
        let input = IseInput::Blocks(vec![IseBlock { t_or_q: 0xFF, bits: [0; 5] }]);
        {
            let mut cursor = BitCursor::new(&mut block, 0, 18, Direction::Forward);
            encode(&mut cursor, IseParams::trit(2), &input, 5);
        }
        // m0(2) T(2) m1(2) T(2) m2(2) T(1) m3(2) T(2) m4(2) T(1)
        let expected = 0b1_00_11_00_1_00_11_00_11_00;
        assert_eq!(block.get_bits(0, 17), expected);
    }
}
