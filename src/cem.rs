//! Color endpoint mode (CEM) configuration fields.

use crate::bits::{get_bit, BitBlock128};
use crate::error::{Result, ValidationError};

/// Start of the CEM field in single-partition blocks.
const SINGLE_PARTITION_CEM_LOW: u32 = 13;
const SELECTOR_LOW: u32 = 23;
const MULTI_PARTITION_CEM_LOW: u32 = 25;

/// Number of endpoint values a partition with this mode carries.
pub fn endpoint_value_count(cem: u8) -> u32 {
    debug_assert!(cem < 16);
    (cem as u32 / 4 + 1) * 2
}

pub fn is_hdr(cem: u8) -> bool {
    matches!(cem, 2 | 3 | 7 | 11 | 14 | 15)
}

/// Total endpoint values of a block. With a shared CEM only `cems[0]` counts.
pub fn total_endpoint_values(cems: &[u8], num_partitions: u32, single_cem: bool) -> u32 {
    if single_cem {
        num_partitions * endpoint_value_count(cems[0])
    } else {
        cems[..num_partitions as usize]
            .iter()
            .map(|&c| endpoint_value_count(c))
            .sum()
    }
}

/// Per-partition CEM classes (`cem / 4`) may differ by at most one.
pub fn check_classes(cems: &[u8]) -> Result<()> {
    let min_class = cems.iter().map(|c| c / 4).min().unwrap_or(0);
    let max_class = cems.iter().map(|c| c / 4).max().unwrap_or(0);
    if max_class - min_class > 1 {
        return Err(ValidationError::CemClassSpread { min_class, max_class });
    }
    Ok(())
}

/// Bits of per-partition CEM data that do not fit in bits 25..=28 and are stored
/// directly below the weights.
pub fn extra_cem_bits(num_partitions: u32, single_cem: bool) -> u32 {
    if num_partitions == 1 || single_cem {
        0
    } else {
        3 * num_partitions - 4
    }
}

/// Writes the CEM configuration.
///
/// `extra_start` is the lowest bit of the spill-over region used by the
/// per-partition form; callers compute it from the weight bit count.
pub fn write_color_endpoint_modes(
    block: &mut BitBlock128,
    cems: &[u8],
    num_partitions: u32,
    single_cem: bool,
    extra_start: u32,
) {
    if num_partitions == 1 {
        block.set_bits(SINGLE_PARTITION_CEM_LOW, SINGLE_PARTITION_CEM_LOW + 3, cems[0] as u32);
        return;
    }

    if single_cem {
        block.set_bits(SELECTOR_LOW, SELECTOR_LOW + 1, 0);
        block.set_bits(MULTI_PARTITION_CEM_LOW, MULTI_PARTITION_CEM_LOW + 3, cems[0] as u32);
        return;
    }

    let cems = &cems[..num_partitions as usize];
    let max_class = cems.iter().map(|c| c / 4).max().unwrap_or(0) as u32;
    let selector = max_class.max(1);
    block.set_bits(SELECTOR_LOW, SELECTOR_LOW + 1, selector);

    // Logical index k of the packed mode bits: 0..4 live in bits 25..=28, the rest spill.
    let position = |k: u32| {
        if k < 4 {
            MULTI_PARTITION_CEM_LOW + k
        } else {
            extra_start + k - 4
        }
    };

    for (i, &cem) in cems.iter().enumerate() {
        let i = i as u32;
        let class_flag = (cem as u32 / 4 == selector) as u32;
        let low_mode = cem as u32 % 4;
        block.set_bit(MULTI_PARTITION_CEM_LOW + i, class_flag);
        block.set_bit(position(num_partitions + 2 * i), get_bit(low_mode, 0));
        block.set_bit(position(num_partitions + 2 * i + 1), get_bit(low_mode, 1));
    }
}
