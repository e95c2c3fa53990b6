//! Normal (weighted, partitioned) blocks.

use crate::bits::{BitBlock128, BitCursor, Direction, BLOCK_SIZE_BYTES};
use crate::block_mode;
use crate::cem;
use crate::error::{Result, ValidationError};
use crate::ise::{self, IseInput, IseParams};

/// Largest block footprint of the 2D ASTC formats.
pub const MAX_BLOCK_WIDTH: u32 = 12;
pub const MAX_BLOCK_HEIGHT: u32 = 12;

const MAX_WEIGHTS: u32 = 64;
const MIN_WEIGHT_BITS: u32 = 24;
const MAX_WEIGHT_BITS: u32 = 96;
const MAX_ENDPOINT_VALUES: u32 = 18;

const PARTITION_COUNT_LOW: u32 = 11;
const PARTITION_SEED_LOW: u32 = 13;
const SINGLE_PARTITION_ENDPOINT_START: u32 = 17;
const MULTI_PARTITION_ENDPOINT_START: u32 = 29;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NormalBlockParams {
    pub grid_width: u32,
    pub grid_height: u32,
    pub weight_ise: IseParams,
    pub dual_plane: bool,
    /// Color component selector of the second plane. Ignored without dual plane.
    pub ccs: u8,
    pub num_partitions: u32,
    pub cems: [u8; 4],
    /// All partitions share `cems[0]`. Ignored for single-partition blocks.
    pub single_cem: bool,
    /// Partition pattern index. Ignored for single-partition blocks.
    pub partition_seed: u32,
}

impl Default for NormalBlockParams {
    fn default() -> Self {
        NormalBlockParams {
            grid_width: 4,
            grid_height: 4,
            weight_ise: IseParams::plain(2),
            dual_plane: false,
            ccs: 0,
            num_partitions: 1,
            cems: [0; 4],
            single_cem: false,
            partition_seed: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalBlockIseInputs {
    pub weights: IseInput,
    pub endpoints: IseInput,
}

impl NormalBlockParams {
    pub fn num_weights(&self) -> u32 {
        self.grid_width * self.grid_height * if self.dual_plane { 2 } else { 1 }
    }

    pub fn weight_bits(&self) -> u32 {
        self.weight_ise.required_bits(self.num_weights())
    }

    fn partition_cems(&self) -> &[u8] {
        let n = (self.num_partitions as usize).min(4);
        if self.single_cem && n > 1 {
            &self.cems[..1]
        } else {
            &self.cems[..n]
        }
    }

    pub fn num_endpoint_values(&self) -> u32 {
        cem::total_endpoint_values(&self.cems, self.num_partitions, self.single_cem && self.num_partitions > 1)
    }

    /// Header bits in front of the endpoint data, plus the bits stored below the weights.
    fn config_bits(&self) -> u32 {
        let base = if self.num_partitions == 1 {
            17
        } else if self.single_cem {
            29
        } else {
            25 + 3 * self.num_partitions
        };
        base + if self.dual_plane { 2 } else { 0 }
    }

    /// Bits left for color endpoint data. Negative for over-full configurations.
    pub fn endpoint_bits(&self) -> i32 {
        128 - self.weight_bits() as i32 - self.config_bits() as i32
    }

    /// The widest endpoint encoding that fits the leftover bits.
    pub fn endpoint_ise(&self) -> IseParams {
        ise::maximize_range(self.endpoint_bits(), self.num_endpoint_values())
    }

    fn extra_cem_start(&self) -> u32 {
        let single = self.single_cem || self.num_partitions == 1;
        128 - self.weight_bits() - cem::extra_cem_bits(self.num_partitions, single)
    }

    fn endpoint_start(&self) -> u32 {
        if self.num_partitions == 1 {
            SINGLE_PARTITION_ENDPOINT_START
        } else {
            MULTI_PARTITION_ENDPOINT_START
        }
    }

    /// Checks every rule a block must satisfy for a `block_width`x`block_height` footprint.
    pub fn check(&self, block_width: u32, block_height: u32) -> Result<()> {
        if block_width > MAX_BLOCK_WIDTH || block_height > MAX_BLOCK_HEIGHT {
            return Err(ValidationError::BlockFootprint {
                width: block_width,
                height: block_height,
            });
        }
        if !(1..=4).contains(&self.num_partitions) {
            return Err(ValidationError::PartitionCount(self.num_partitions));
        }
        if let Some(&bad) = self.partition_cems().iter().find(|&&c| c > 15) {
            return Err(ValidationError::ColorEndpointMode(bad));
        }
        if self.dual_plane && self.ccs > 3 {
            return Err(ValidationError::ComponentSelector(self.ccs));
        }
        if self.num_partitions > 1 && self.partition_seed > 1023 {
            return Err(ValidationError::PartitionSeed(self.partition_seed));
        }
        if self.grid_width > block_width || self.grid_height > block_height {
            return Err(ValidationError::GridExceedsBlock {
                width: self.grid_width,
                height: self.grid_height,
                block_width,
                block_height,
            });
        }

        let num_weights = self.num_weights();
        if num_weights > MAX_WEIGHTS {
            return Err(ValidationError::TooManyWeights(num_weights));
        }
        let weight_bits = self.weight_bits();
        if !(MIN_WEIGHT_BITS..=MAX_WEIGHT_BITS).contains(&weight_bits) {
            return Err(ValidationError::WeightBitCount(weight_bits));
        }
        if !block_mode::supports_weight_range(self.weight_ise) {
            return Err(ValidationError::UnsupportedWeightRange { params: self.weight_ise });
        }
        if block_mode::encode(self.grid_width, self.grid_height, self.dual_plane, self.weight_ise).is_none() {
            return Err(ValidationError::NoBlockModeLayout {
                width: self.grid_width,
                height: self.grid_height,
                dual_plane: self.dual_plane,
            });
        }
        if self.num_partitions == 4 && self.dual_plane {
            return Err(ValidationError::DualPlaneWithFourPartitions);
        }
        cem::check_classes(self.partition_cems())?;

        let num_endpoint_values = self.num_endpoint_values();
        if num_endpoint_values > MAX_ENDPOINT_VALUES {
            return Err(ValidationError::TooManyEndpointValues(num_endpoint_values));
        }
        let available = self.endpoint_bits();
        let required = (13 * num_endpoint_values).div_ceil(5) as i32;
        if available < required {
            return Err(ValidationError::EndpointBitBudget { available, required });
        }
        Ok(())
    }
}

/// Whether `params` can be encoded for a `block_width`x`block_height` footprint.
pub fn validate(params: &NormalBlockParams, block_width: u32, block_height: u32) -> bool {
    params.check(block_width, block_height).is_ok()
}

/// Encodes a normal block, validated against the largest (12x12) footprint.
pub fn encode_normal_block(
    params: &NormalBlockParams,
    inputs: &NormalBlockIseInputs,
) -> Result<[u8; BLOCK_SIZE_BYTES]> {
    encode_normal_block_for(params, MAX_BLOCK_WIDTH, MAX_BLOCK_HEIGHT, inputs)
}

/// Encodes a normal block for a specific block footprint.
pub fn encode_normal_block_for(
    params: &NormalBlockParams,
    block_width: u32,
    block_height: u32,
    inputs: &NormalBlockIseInputs,
) -> Result<[u8; BLOCK_SIZE_BYTES]> {
    params.check(block_width, block_height)?;

    let num_weights = params.num_weights();
    let num_endpoint_values = params.num_endpoint_values();
    let endpoint_ise = params.endpoint_ise();
    inputs.weights.check(params.weight_ise, num_weights as usize)?;
    inputs.endpoints.check(endpoint_ise, num_endpoint_values as usize)?;

    let mode = block_mode::encode(
        params.grid_width,
        params.grid_height,
        params.dual_plane,
        params.weight_ise,
    )
    .ok_or(ValidationError::NoBlockModeLayout {
        width: params.grid_width,
        height: params.grid_height,
        dual_plane: params.dual_plane,
    })?;

    let mut block = BitBlock128::new();
    block.set_bits(0, 10, mode as u32);
    block.set_bits(PARTITION_COUNT_LOW, PARTITION_COUNT_LOW + 1, params.num_partitions - 1);
    if params.num_partitions > 1 {
        block.set_bits(PARTITION_SEED_LOW, PARTITION_SEED_LOW + 9, params.partition_seed);
    }

    let extra_start = params.extra_cem_start();
    cem::write_color_endpoint_modes(
        &mut block,
        &params.cems,
        params.num_partitions,
        params.single_cem,
        extra_start,
    );
    if params.dual_plane {
        block.set_bits(extra_start - 2, extra_start - 1, params.ccs as u32);
    }

    // Weights are laid out from bit 127 downward.
    {
        let weight_bits = params.weight_bits();
        let mut cursor = BitCursor::new(&mut block, 127, weight_bits, Direction::Reverse);
        ise::encode(&mut cursor, params.weight_ise, &inputs.weights, num_weights as usize);
    }

    // The endpoint budget is whatever the weights and configuration leave.
    {
        let length = params.endpoint_bits() as u32;
        let mut cursor = BitCursor::new(&mut block, params.endpoint_start(), length, Direction::Forward);
        ise::encode(&mut cursor, endpoint_ise, &inputs.endpoints, num_endpoint_values as usize);
    }

    Ok(block.to_bytes())
}

/// Gradient-style inputs spanning each sequence's full range.
///
/// With dual plane, the second plane's weights run in the opposite direction.
pub fn default_ise_inputs(params: &NormalBlockParams) -> NormalBlockIseInputs {
    let num_weights = params.num_weights();
    let weight_max = params.weight_ise.range_max();
    let weights = (0..num_weights)
        .map(|i| {
            let v = gradient(i, num_weights, weight_max);
            if params.dual_plane && i % 2 == 1 { weight_max - v } else { v }
        })
        .collect();

    let num_endpoint_values = params.num_endpoint_values();
    let endpoint_max = params.endpoint_ise().range_max();
    let endpoints = (0..num_endpoint_values)
        .map(|i| gradient(i, num_endpoint_values, endpoint_max))
        .collect();

    NormalBlockIseInputs {
        weights: IseInput::Plain(weights),
        endpoints: IseInput::Plain(endpoints),
    }
}

/// `i` of `n` evenly spread over `0..=max`, rounded to nearest.
fn gradient(i: u32, n: u32, max: u32) -> u32 {
    if n < 2 {
        return 0;
    }
    (i * max + (n - 1) / 2) / (n - 1)
}
