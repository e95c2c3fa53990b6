use thiserror::Error;

use crate::ise::IseParams;

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Reasons a block description cannot be encoded.
///
/// These are plain data: generators try parameter combinations and discard the
/// ones that come back with an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("partition count must be in 1..=4, got {0}")]
    PartitionCount(u32),

    #[error("color endpoint mode must be in 0..=15, got {0}")]
    ColorEndpointMode(u8),

    #[error("color component selector must be in 0..=3, got {0}")]
    ComponentSelector(u8),

    #[error("partition seed must be in 0..=1023, got {0}")]
    PartitionSeed(u32),

    #[error("block footprint {width}x{height} is larger than 12x12")]
    BlockFootprint { width: u32, height: u32 },

    #[error("weight grid {width}x{height} does not fit block footprint {block_width}x{block_height}")]
    GridExceedsBlock {
        width: u32,
        height: u32,
        block_width: u32,
        block_height: u32,
    },

    #[error("too many weights: {0} (max 64)")]
    TooManyWeights(u32),

    #[error("weight data needs {0} bits, must be in 24..=96")]
    WeightBitCount(u32),

    #[error("weight range {params:?} has no block mode encoding")]
    UnsupportedWeightRange { params: IseParams },

    #[error("no block mode layout for grid {width}x{height} (dual plane: {dual_plane})")]
    NoBlockModeLayout {
        width: u32,
        height: u32,
        dual_plane: bool,
    },

    #[error("dual plane is not allowed with 4 partitions")]
    DualPlaneWithFourPartitions,

    #[error("color endpoint mode classes {min_class} and {max_class} differ by more than 1")]
    CemClassSpread { min_class: u8, max_class: u8 },

    #[error("too many color endpoint values: {0} (max 18)")]
    TooManyEndpointValues(u32),

    #[error("only {available} bits left for color endpoints, need at least {required}")]
    EndpointBitBudget { available: i32, required: i32 },

    #[error("ise input has {got} entries, sequence needs {needed}")]
    IseInputLength { needed: usize, got: usize },

    #[error("ise value {value} at index {index} exceeds range max {range_max}")]
    IseValueOutOfRange {
        index: usize,
        value: u32,
        range_max: u32,
    },

    #[error("ise block {index}: selector {value:#x} does not fit {width} bits")]
    IseSelectorOutOfRange { index: usize, value: u32, width: u32 },

    #[error("ise block {index}: low bits {value:#x} do not fit {width} bits")]
    IseBitsOutOfRange { index: usize, value: u32, width: u32 },

    #[error("hdr void extent channel {channel} is infinite or NaN ({bits:#06x})")]
    NonFiniteHdrChannel { channel: char, bits: u16 },

    #[error("hdr test case {0} requested for an sRGB format")]
    HdrCaseOnSrgbFormat(&'static str),
}
