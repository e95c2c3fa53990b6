//! Conformance corpora: streams of blocks that sweep one aspect of the format each.
//!
//! Every generator writes whole 16-byte blocks back to back. Parameter combinations
//! that fail validation for the target footprint are skipped, so the number of
//! blocks depends on the format.

use std::array;

use half::f16;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bits::{low_mask, BLOCK_SIZE_BYTES};
use crate::cem;
use crate::error::{Result, ValidationError};
use crate::ise::{IseBlock, IseInput, IseMode, IseParams};
use crate::normal::{default_ise_inputs, encode_normal_block_for, validate, NormalBlockIseInputs, NormalBlockParams};
use crate::vk_format::VkFormat;
use crate::void_extent::{encode_void_extent, VoidExtentParams};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockTestType {
    VoidExtentLdr,
    VoidExtentHdr,
    WeightGrid,
    WeightIse,
    Cems,
    PartitionSeed,
    EndpointValueLdr,
    EndpointValueHdrNo15,
    EndpointValueHdr15,
    EndpointIse,
    Ccs,
    Random,
}

impl BlockTestType {
    pub const ALL: [BlockTestType; 12] = [
        BlockTestType::VoidExtentLdr,
        BlockTestType::VoidExtentHdr,
        BlockTestType::WeightGrid,
        BlockTestType::WeightIse,
        BlockTestType::Cems,
        BlockTestType::PartitionSeed,
        BlockTestType::EndpointValueLdr,
        BlockTestType::EndpointValueHdrNo15,
        BlockTestType::EndpointValueHdr15,
        BlockTestType::EndpointIse,
        BlockTestType::Ccs,
        BlockTestType::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlockTestType::VoidExtentLdr => "void_extent_ldr",
            BlockTestType::VoidExtentHdr => "void_extent_hdr",
            BlockTestType::WeightGrid => "weight_grid",
            BlockTestType::WeightIse => "weight_ise",
            BlockTestType::Cems => "color_endpoint_modes",
            BlockTestType::PartitionSeed => "partition_pattern_index",
            BlockTestType::EndpointValueLdr => "endpoint_value_ldr",
            BlockTestType::EndpointValueHdrNo15 => "endpoint_value_hdr_cem_not_15",
            BlockTestType::EndpointValueHdr15 => "endpoint_value_hdr_cem_15",
            BlockTestType::EndpointIse => "endpoint_ise",
            BlockTestType::Ccs => "color_component_selector",
            BlockTestType::Random => "random",
        }
    }

    pub fn from_name(name: &str) -> Option<BlockTestType> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            BlockTestType::VoidExtentLdr => "Void extent blocks, LDR mode",
            BlockTestType::VoidExtentHdr => "Void extent blocks, HDR mode",
            BlockTestType::WeightGrid => {
                "Combinations of plane count, weight integer sequence encoding and weight grid size"
            }
            BlockTestType::WeightIse => "Integer sequence encoding values and selectors for weights",
            BlockTestType::Cems => {
                "Color endpoint mode combinations for each plane and partition count"
            }
            BlockTestType::PartitionSeed => "Every partition pattern index",
            BlockTestType::EndpointValueLdr => {
                "Pairs of color endpoint values for each LDR color endpoint mode"
            }
            BlockTestType::EndpointValueHdrNo15 => {
                "Pairs of color endpoint values for each HDR color endpoint mode except 15"
            }
            BlockTestType::EndpointValueHdr15 => {
                "Pairs of color endpoint values for HDR color endpoint mode 15"
            }
            BlockTestType::EndpointIse => {
                "Integer sequence encoding values and selectors for color endpoints"
            }
            BlockTestType::Ccs => "Color component selector for each partition count",
            BlockTestType::Random => "Random blocks, valid and invalid",
        }
    }

    /// The corpus only makes sense when decoded in HDR mode.
    pub fn is_hdr_only(self) -> bool {
        matches!(
            self,
            BlockTestType::VoidExtentHdr
                | BlockTestType::EndpointValueHdrNo15
                | BlockTestType::EndpointValueHdr15
        )
    }

    /// Per-channel scale mapping decoded texels of this corpus into `[0, 1]`.
    pub fn color_scale(self) -> [f32; 4] {
        const INV_MAX: f32 = 1.0 / 65504.0;
        match self {
            BlockTestType::VoidExtentHdr => [0.5 * INV_MAX; 4],
            BlockTestType::EndpointValueHdrNo15 => [INV_MAX, INV_MAX, INV_MAX, 1.0],
            BlockTestType::EndpointValueHdr15 => [INV_MAX; 4],
            _ => [1.0; 4],
        }
    }

    /// Per-channel bias applied after [`BlockTestType::color_scale`].
    pub fn color_bias(self) -> [f32; 4] {
        match self {
            BlockTestType::VoidExtentHdr => [0.5; 4],
            _ => [0.0; 4],
        }
    }
}

/// Weight encodings tried by the generators, narrowest range first.
pub const WEIGHT_ISE_CANDIDATES: [IseParams; 12] = [
    IseParams::plain(1),
    IseParams::trit(0),
    IseParams::plain(2),
    IseParams::quint(0),
    IseParams::trit(1),
    IseParams::plain(3),
    IseParams::quint(1),
    IseParams::trit(2),
    IseParams::plain(4),
    IseParams::quint(2),
    IseParams::trit(3),
    IseParams::plain(5),
];

const VOID_EXTENT_CASE_BLOCKS: u32 = 1 << 13;
const RANDOM_CASE_BLOCKS: usize = 16384;
const RANDOM_CASE_SEED: u64 = 1;
const CASE_PARTITION_SEED: u32 = 634;
const ENDPOINT_RANGE_MAXIMUMS: [u32; 11] = [5, 9, 11, 19, 23, 39, 47, 79, 95, 159, 191];
const MAX_GRID_SIZE: u32 = 12;

/// Accumulates encoded blocks for one footprint.
struct BlockStream {
    block_width: u32,
    block_height: u32,
    data: Vec<u8>,
}

impl BlockStream {
    fn new(format: VkFormat) -> Self {
        let (block_width, block_height) = format.block_size();
        BlockStream {
            block_width,
            block_height,
            data: Vec::new(),
        }
    }

    fn is_valid(&self, params: &NormalBlockParams) -> bool {
        validate(params, self.block_width, self.block_height)
    }

    fn push(&mut self, block: [u8; BLOCK_SIZE_BYTES]) {
        self.data.extend_from_slice(&block);
    }

    fn push_normal(&mut self, params: &NormalBlockParams, inputs: &NormalBlockIseInputs) -> Result<()> {
        let block = encode_normal_block_for(params, self.block_width, self.block_height, inputs)?;
        self.push(block);
        Ok(())
    }

    fn push_default(&mut self, params: &NormalBlockParams) -> Result<()> {
        self.push_normal(params, &default_ise_inputs(params))
    }

    /// Sets the first weight candidate that makes `params` valid.
    fn fit_weight_ise(&self, params: &mut NormalBlockParams) -> bool {
        for candidate in WEIGHT_ISE_CANDIDATES {
            params.weight_ise = candidate;
            if self.is_valid(params) {
                return true;
            }
        }
        trace!("no weight encoding fits {params:?}");
        false
    }
}

/// Generates the corpus for `test_type` targeting `format`.
pub fn generate_block_case_test_data(format: VkFormat, test_type: BlockTestType) -> Result<Vec<u8>> {
    if format.is_srgb() && test_type.is_hdr_only() {
        return Err(ValidationError::HdrCaseOnSrgbFormat(test_type.name()));
    }

    let mut stream = BlockStream::new(format);
    match test_type {
        BlockTestType::VoidExtentLdr => void_extent_ldr(&mut stream),
        BlockTestType::VoidExtentHdr => void_extent_hdr(&mut stream),
        BlockTestType::WeightGrid => weight_grid(&mut stream)?,
        BlockTestType::WeightIse => weight_ise(&mut stream)?,
        BlockTestType::Cems => color_endpoint_modes(&mut stream)?,
        BlockTestType::PartitionSeed => partition_seeds(&mut stream)?,
        BlockTestType::EndpointValueLdr
        | BlockTestType::EndpointValueHdrNo15
        | BlockTestType::EndpointValueHdr15 => endpoint_values(&mut stream, test_type)?,
        BlockTestType::EndpointIse => endpoint_ise(&mut stream)?,
        BlockTestType::Ccs => component_selectors(&mut stream)?,
        BlockTestType::Random => {
            stream.data = generate_random_blocks(format, RANDOM_CASE_BLOCKS, RANDOM_CASE_SEED)?;
        }
    }

    debug!(
        "generated {} {} blocks for {format}",
        stream.data.len() / BLOCK_SIZE_BYTES,
        test_type.name()
    );
    Ok(stream.data)
}

/// Each channel walks the whole UNORM16 range, offset by a quarter turn from the previous one.
fn void_extent_ldr(stream: &mut BlockStream) {
    const NUM_VALUES: u32 = 1 << 16;
    for i in 0..VOID_EXTENT_CASE_BLOCKS {
        let base = i * (NUM_VALUES - 1) / (VOID_EXTENT_CASE_BLOCKS - 1);
        let [r, g, b, a] = array::from_fn(|c| ((base + NUM_VALUES * c as u32 / 4) % NUM_VALUES) as u16);
        stream.push(encode_void_extent(&VoidExtentParams::ldr(r, g, b, a)));
    }
}

/// Channels span the finite f16 range from `-MAX` to `MAX`.
fn void_extent_hdr(stream: &mut BlockStream) {
    let min = -f16::MAX.to_f32();
    let max = f16::MAX.to_f32();
    let n = VOID_EXTENT_CASE_BLOCKS;
    for i in 0..n {
        let [r, g, b, a] = array::from_fn(|c| {
            let index = (i + n * c as u32 / 4) % n;
            f16::from_f32(min + index as f32 * (max - min) / (n - 1) as f32)
        });
        stream.push(encode_void_extent(&VoidExtentParams::hdr(r, g, b, a)));
    }
}

fn weight_grid(stream: &mut BlockStream) -> Result<()> {
    for dual_plane in [false, true] {
        for weight_ise in WEIGHT_ISE_CANDIDATES {
            for grid_width in 2..=MAX_GRID_SIZE {
                for grid_height in 2..=MAX_GRID_SIZE {
                    let params = NormalBlockParams {
                        grid_width,
                        grid_height,
                        weight_ise,
                        dual_plane,
                        ..NormalBlockParams::default()
                    };
                    if stream.is_valid(&params) {
                        stream.push_default(&params)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Every value of the range at every position within an encoded group.
fn value_sweep(params: IseParams, num_values: u32) -> impl Iterator<Item = IseInput> {
    let range = params.range_max() + 1;
    let num_blocks = range.div_ceil(num_values);
    let group = params.mode.group_size() as u32;
    (0..group).flat_map(move |offset| {
        (0..num_blocks).map(move |block| {
            IseInput::Plain(
                (0..num_values)
                    .map(|i| (block * num_values + i + offset) % range)
                    .collect(),
            )
        })
    })
}

/// Every raw T or Q selector at every group position, with the low bits cleared.
fn selector_sweep(params: IseParams, num_values: u32) -> impl Iterator<Item = IseInput> {
    let group = params.mode.group_size() as u32;
    let num_selectors: u32 = match params.mode {
        IseMode::PlainBit => 0,
        mode => 1 << mode.selector_bits(),
    };
    let groups_per_block = num_values.div_ceil(group);
    let num_blocks = if num_selectors == 0 {
        0
    } else {
        num_selectors.div_ceil(groups_per_block)
    };
    (0..group).flat_map(move |offset| {
        (0..num_blocks).map(move |block| {
            IseInput::Blocks(
                (0..groups_per_block)
                    .map(|g| IseBlock {
                        t_or_q: (block * groups_per_block + g + offset) % num_selectors,
                        bits: [0; 5],
                    })
                    .collect(),
            )
        })
    })
}

fn weight_ise(stream: &mut BlockStream) -> Result<()> {
    for weight_ise in WEIGHT_ISE_CANDIDATES {
        let mut params = NormalBlockParams {
            weight_ise,
            dual_plane: true,
            ..NormalBlockParams::default()
        };
        // A 4x4 grid has fewer than 24 weights per plane, so use both planes.
        while params.grid_width >= 2 && !stream.is_valid(&params) {
            params.grid_width -= 1;
            params.grid_height -= 1;
        }
        if params.grid_width < 2 {
            trace!("no weight grid fits {weight_ise:?}");
            continue;
        }

        let num_weights = params.num_weights();
        let mut inputs = default_ise_inputs(&params);
        for weights in value_sweep(weight_ise, num_weights).chain(selector_sweep(weight_ise, num_weights)) {
            inputs.weights = weights;
            stream.push_normal(&params, &inputs)?;
        }
    }
    Ok(())
}

/// Color endpoint mode tuples of `num_partitions` entries, first partition varying slowest.
fn cem_tuples(num_partitions: u32) -> impl Iterator<Item = [u8; 4]> {
    (0..16u32.pow(num_partitions)).map(move |index| {
        array::from_fn(|i| {
            let i = i as u32;
            if i < num_partitions {
                (index / 16u32.pow(num_partitions - 1 - i) % 16) as u8
            } else {
                0
            }
        })
    })
}

fn color_endpoint_modes(stream: &mut BlockStream) -> Result<()> {
    for dual_plane in [false, true] {
        let max_partitions = if dual_plane { 3 } else { 4 };
        for num_partitions in 1..=max_partitions {
            let base = NormalBlockParams {
                dual_plane,
                num_partitions,
                partition_seed: CASE_PARTITION_SEED,
                ..NormalBlockParams::default()
            };

            if num_partitions > 1 {
                for cem in 0..16 {
                    let mut params = NormalBlockParams {
                        single_cem: true,
                        cems: [cem, 0, 0, 0],
                        ..base
                    };
                    if stream.fit_weight_ise(&mut params) {
                        stream.push_default(&params)?;
                    }
                }
            }

            for cems in cem_tuples(num_partitions) {
                if cem::check_classes(&cems[..num_partitions as usize]).is_err() {
                    continue;
                }
                let mut params = NormalBlockParams { cems, ..base };
                if stream.fit_weight_ise(&mut params) {
                    stream.push_default(&params)?;
                }
            }
        }
    }
    Ok(())
}

fn partition_seeds(stream: &mut BlockStream) -> Result<()> {
    for num_partitions in 2..=4 {
        for partition_seed in 0..1024 {
            let params = NormalBlockParams {
                num_partitions,
                single_cem: true,
                partition_seed,
                ..NormalBlockParams::default()
            };
            stream.push_default(&params)?;
        }
    }
    Ok(())
}

fn endpoint_values(stream: &mut BlockStream, test_type: BlockTestType) -> Result<()> {
    const MAX_STEPS: u32 = 10;

    for cem in 0..16u8 {
        let wanted = match test_type {
            BlockTestType::EndpointValueLdr => !cem::is_hdr(cem),
            BlockTestType::EndpointValueHdrNo15 => cem::is_hdr(cem) && cem != 15,
            _ => cem == 15,
        };
        if !wanted {
            continue;
        }

        let params = NormalBlockParams {
            grid_width: 3,
            grid_height: 4,
            cems: [cem, 0, 0, 0],
            ..NormalBlockParams::default()
        };
        let num_values = params.num_endpoint_values() as usize;
        let range_max = params.endpoint_ise().range_max();
        let steps = MAX_STEPS.min(range_max + 1);

        for slot0 in 0..num_values {
            for slot1 in slot0 + 1..num_values {
                let mut inputs = default_ise_inputs(&params);
                for step0 in 0..steps {
                    for step1 in 0..steps {
                        if let IseInput::Plain(values) = &mut inputs.endpoints {
                            values[slot0] = step0 * range_max / (steps - 1).max(1);
                            values[slot1] = step1 * range_max / (steps - 1).max(1);
                        }
                        stream.push_normal(&params, &inputs)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// First configuration, in search order, whose endpoint encoding has exactly `range_max`.
fn endpoint_ise_config(stream: &BlockStream, range_max: u32) -> Option<NormalBlockParams> {
    for num_partitions in 1..=4 {
        for dual_plane in [false, true] {
            for weight_ise in WEIGHT_ISE_CANDIDATES {
                for grid_width in 2..=MAX_GRID_SIZE {
                    for grid_height in 2..=MAX_GRID_SIZE {
                        let params = NormalBlockParams {
                            grid_width,
                            grid_height,
                            weight_ise,
                            dual_plane,
                            num_partitions,
                            single_cem: true,
                            cems: [12, 0, 0, 0],
                            partition_seed: CASE_PARTITION_SEED,
                            ..NormalBlockParams::default()
                        };
                        if stream.is_valid(&params) && params.endpoint_ise().range_max() == range_max {
                            return Some(params);
                        }
                    }
                }
            }
        }
    }
    None
}

fn endpoint_ise(stream: &mut BlockStream) -> Result<()> {
    for range_max in ENDPOINT_RANGE_MAXIMUMS {
        let Some(params) = endpoint_ise_config(stream, range_max) else {
            trace!("no configuration reaches endpoint range 0..={range_max}");
            continue;
        };

        let endpoint_ise = params.endpoint_ise();
        let num_values = params.num_endpoint_values();
        let mut inputs = default_ise_inputs(&params);
        for endpoints in value_sweep(endpoint_ise, num_values).chain(selector_sweep(endpoint_ise, num_values)) {
            inputs.endpoints = endpoints;
            stream.push_normal(&params, &inputs)?;
        }
    }
    Ok(())
}

fn component_selectors(stream: &mut BlockStream) -> Result<()> {
    for num_partitions in 1..=3 {
        for ccs in 0..4 {
            let params = NormalBlockParams {
                grid_width: 3,
                grid_height: 3,
                dual_plane: true,
                ccs,
                num_partitions,
                single_cem: true,
                cems: [8, 0, 0, 0],
                partition_seed: CASE_PARTITION_SEED,
                ..NormalBlockParams::default()
            };
            stream.push_default(&params)?;
        }
    }
    Ok(())
}

fn random_ise_input(rng: &mut StdRng, params: IseParams, num_values: u32) -> IseInput {
    if rng.random_bool(0.5) {
        let group = params.mode.group_size() as u32;
        let selector_max = low_mask(params.mode.selector_bits());
        let bits_max = low_mask(params.num_bits as u32);
        IseInput::Blocks(
            (0..num_values.div_ceil(group))
                .map(|_| IseBlock {
                    t_or_q: rng.random_range(0..=selector_max),
                    bits: array::from_fn(|_| rng.random_range(0..=bits_max)),
                })
                .collect(),
        )
    } else {
        let range_max = params.range_max();
        IseInput::Plain((0..num_values).map(|_| rng.random_range(0..=range_max)).collect())
    }
}

fn random_normal_params(rng: &mut StdRng, block_width: u32, block_height: u32) -> NormalBlockParams {
    loop {
        let num_partitions: u32 = rng.random_range(1..=4);
        let single_cem = rng.random::<f32>() < 0.25;
        let cem0: u8 = rng.random_range(0..=15);
        // Partition modes stay within one class of the first.
        let step: i8 = if single_cem {
            0
        } else if cem0 == 0 {
            1
        } else if cem0 == 15 || !rng.random_bool(0.5) {
            -1
        } else {
            1
        };
        let mut cems = [cem0; 4];
        for cem in &mut cems[1..num_partitions as usize] {
            *cem = match step {
                1 => cem0 + rng.random_range(0..=1),
                -1 => cem0 - rng.random_range(0..=1),
                _ => cem0,
            };
        }

        let params = NormalBlockParams {
            grid_width: rng.random_range(2..=block_width),
            grid_height: rng.random_range(2..=block_height),
            weight_ise: WEIGHT_ISE_CANDIDATES[rng.random_range(0..WEIGHT_ISE_CANDIDATES.len())],
            dual_plane: num_partitions != 4 && rng.random_bool(0.5),
            ccs: rng.random_range(0..=3),
            num_partitions,
            cems,
            single_cem,
            partition_seed: rng.random_range(0..=1023),
        };
        if validate(&params, block_width, block_height) {
            return params;
        }
        trace!("rejected random params {params:?}");
    }
}

fn random_block(rng: &mut StdRng, block_width: u32, block_height: u32) -> Result<[u8; BLOCK_SIZE_BYTES]> {
    if rng.random::<f32>() < 0.1 {
        let hdr = rng.random_bool(0.5);
        let [r, g, b, a]: [u16; 4] = array::from_fn(|_| {
            if hdr {
                f16::from_f32(rng.random::<f32>()).to_bits()
            } else {
                rng.random()
            }
        });
        return Ok(encode_void_extent(&VoidExtentParams { hdr, r, g, b, a }));
    }

    let params = random_normal_params(rng, block_width, block_height);
    let weights = random_ise_input(rng, params.weight_ise, params.num_weights());
    let endpoints = random_ise_input(rng, params.endpoint_ise(), params.num_endpoint_values());
    encode_normal_block_for(&params, block_width, block_height, &NormalBlockIseInputs { weights, endpoints })
}

/// `count` random blocks for `format`, reproducible from `seed`.
///
/// Roughly one in ten is a void extent; the rest are valid configurations with
/// arbitrary weight and endpoint data, which may still decode to error blocks.
pub fn generate_random_blocks(format: VkFormat, count: usize, seed: u64) -> Result<Vec<u8>> {
    let (block_width, block_height) = format.block_size();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(count * BLOCK_SIZE_BYTES);
    for _ in 0..count {
        data.extend_from_slice(&random_block(&mut rng, block_width, block_height)?);
    }
    Ok(data)
}

/// Black transparent LDR void-extent blocks.
pub fn default_void_extent_blocks(count: usize) -> Vec<u8> {
    encode_void_extent(&VoidExtentParams::ldr(0, 0, 0, 0)).repeat(count)
}

/// Simple single-partition blocks whose weights ramp across the whole run.
pub fn default_normal_blocks(count: usize, block_width: u32, block_height: u32) -> Result<Vec<u8>> {
    let params = NormalBlockParams {
        grid_width: 3,
        grid_height: 3,
        weight_ise: IseParams::plain(5),
        cems: [8, 0, 0, 0],
        ..NormalBlockParams::default()
    };
    let mut inputs = default_ise_inputs(&params);
    let num_weights = params.num_weights() as u64;
    let weight_max = params.weight_ise.range_max() as u64;
    let denominator = (count as u64 * num_weights).saturating_sub(1).max(1);

    let mut data = Vec::with_capacity(count * BLOCK_SIZE_BYTES);
    for block in 0..count as u64 {
        let weights = (0..num_weights)
            .map(|w| ((block * num_weights + w) * weight_max / denominator) as u32)
            .collect();
        inputs.weights = IseInput::Plain(weights);
        data.extend_from_slice(&encode_normal_block_for(&params, block_width, block_height, &inputs)?);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitBlock128;
    use crate::block_mode::{self, BlockModeInfo};

    fn blocks(data: &[u8]) -> impl Iterator<Item = BitBlock128> + '_ {
        data.chunks_exact(BLOCK_SIZE_BYTES)
            .map(|chunk| BitBlock128::from_bytes(chunk.try_into().unwrap()))
    }

    fn mode_of(block: &BitBlock128) -> Option<BlockModeInfo> {
        block_mode::decode(block.get_bits(0, 10) as u16)
    }

    #[test]
    fn names_are_unique_and_parse_back() {
        for t in BlockTestType::ALL {
            assert_eq!(BlockTestType::from_name(t.name()), Some(t));
        }
        assert_eq!(BlockTestType::from_name("nope"), None);
    }

    #[test]
    fn hdr_cases_rejected_for_srgb() {
        let err = generate_block_case_test_data(VkFormat::ASTC_4x4_SRGB_BLOCK, BlockTestType::VoidExtentHdr)
            .unwrap_err();
        assert_eq!(err, ValidationError::HdrCaseOnSrgbFormat("void_extent_hdr"));
        assert!(generate_block_case_test_data(VkFormat::ASTC_4x4_SRGB_BLOCK, BlockTestType::Ccs).is_ok());
    }

    #[test]
    fn void_extent_ldr_channels_are_offset() {
        let data =
            generate_block_case_test_data(VkFormat::ASTC_4x4_UNORM_BLOCK, BlockTestType::VoidExtentLdr).unwrap();
        assert_eq!(data.len(), 8192 * BLOCK_SIZE_BYTES);
        let first = blocks(&data).next().unwrap();
        assert_eq!(first.get_bits(64, 79), 0);
        assert_eq!(first.get_bits(80, 95), 16384);
        assert_eq!(first.get_bits(96, 111), 32768);
        assert_eq!(first.get_bits(112, 127), 49152);
        let last = blocks(&data).last().unwrap();
        assert_eq!(last.get_bits(64, 79), 65535);
    }

    #[test]
    fn void_extent_hdr_spans_finite_range() {
        let data =
            generate_block_case_test_data(VkFormat::ASTC_6x6_UNORM_BLOCK, BlockTestType::VoidExtentHdr).unwrap();
        assert_eq!(data.len(), 8192 * BLOCK_SIZE_BYTES);
        let first = blocks(&data).next().unwrap();
        assert_eq!(first.get_bit(9), 1);
        assert_eq!(first.get_bits(64, 79), (-f16::MAX).to_bits() as u32);
        let last = blocks(&data).last().unwrap();
        assert_eq!(last.get_bits(64, 79), f16::MAX.to_bits() as u32);
    }

    #[test]
    fn weight_grid_blocks_fit_footprint() {
        let data = generate_block_case_test_data(VkFormat::ASTC_5x4_UNORM_BLOCK, BlockTestType::WeightGrid).unwrap();
        assert!(!data.is_empty());
        for block in blocks(&data) {
            match mode_of(&block) {
                Some(BlockModeInfo::Weights { grid_width, grid_height, .. }) => {
                    assert!(grid_width <= 5 && grid_height <= 4);
                }
                other => panic!("unexpected block mode {other:?}"),
            }
        }
    }

    #[test]
    fn partition_seed_corpus_covers_all_seeds() {
        let data =
            generate_block_case_test_data(VkFormat::ASTC_4x4_UNORM_BLOCK, BlockTestType::PartitionSeed).unwrap();
        assert_eq!(data.len(), 3 * 1024 * BLOCK_SIZE_BYTES);
        let seeds: Vec<u32> = blocks(&data).take(1024).map(|b| b.get_bits(13, 22)).collect();
        assert_eq!(seeds, (0..1024).collect::<Vec<_>>());
    }

    #[test]
    fn ccs_corpus() {
        let data = generate_block_case_test_data(VkFormat::ASTC_8x8_UNORM_BLOCK, BlockTestType::Ccs).unwrap();
        assert_eq!(data.len(), 12 * BLOCK_SIZE_BYTES);
        for (i, block) in blocks(&data).enumerate() {
            let num_partitions = block.get_bits(11, 12) + 1;
            assert_eq!(num_partitions, i as u32 / 4 + 1);
            assert!(matches!(
                mode_of(&block),
                Some(BlockModeInfo::Weights { grid_width: 3, grid_height: 3, dual_plane: true, .. })
            ));
        }
    }

    #[test]
    fn endpoint_value_corpora_split_by_mode() {
        let ldr = generate_block_case_test_data(VkFormat::ASTC_4x4_UNORM_BLOCK, BlockTestType::EndpointValueLdr)
            .unwrap();
        for block in blocks(&ldr) {
            assert!(!cem::is_hdr(block.get_bits(13, 16) as u8));
        }
        let hdr15 = generate_block_case_test_data(VkFormat::ASTC_4x4_UNORM_BLOCK, BlockTestType::EndpointValueHdr15)
            .unwrap();
        assert!(!hdr15.is_empty());
        assert!(blocks(&hdr15).all(|b| b.get_bits(13, 16) == 15));
    }

    #[test]
    fn weight_ise_corpus_is_not_empty() {
        for format in [VkFormat::ASTC_4x4_UNORM_BLOCK, VkFormat::ASTC_12x12_UNORM_BLOCK] {
            let data = generate_block_case_test_data(format, BlockTestType::WeightIse).unwrap();
            assert!(data.len() > 12 * BLOCK_SIZE_BYTES);
        }
    }

    #[test]
    fn cem_tuples_order() {
        let tuples: Vec<_> = cem_tuples(2).take(3).collect();
        assert_eq!(tuples, vec![[0, 0, 0, 0], [0, 1, 0, 0], [0, 2, 0, 0]]);
        assert_eq!(cem_tuples(1).count(), 16);
        assert_eq!(cem_tuples(3).last(), Some([15, 15, 15, 0]));
    }

    #[test]
    fn selector_sweep_covers_every_trit_selector() {
        let mut seen = [false; 256];
        for input in selector_sweep(IseParams::trit(1), 12) {
            let IseInput::Blocks(groups) = input else { panic!("expected block form") };
            assert_eq!(groups.len(), 3);
            for g in groups {
                seen[g.t_or_q as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(selector_sweep(IseParams::plain(3), 12).count(), 0);
    }

    #[test]
    fn random_blocks_are_reproducible() {
        let a = generate_random_blocks(VkFormat::ASTC_8x6_UNORM_BLOCK, 200, 7).unwrap();
        let b = generate_random_blocks(VkFormat::ASTC_8x6_UNORM_BLOCK, 200, 7).unwrap();
        let c = generate_random_blocks(VkFormat::ASTC_8x6_UNORM_BLOCK, 200, 8).unwrap();
        assert_eq!(a.len(), 200 * BLOCK_SIZE_BYTES);
        assert_eq!(a, b);
        assert_ne!(a, c);
        for block in blocks(&a) {
            if let Some(BlockModeInfo::Weights { grid_width, grid_height, .. }) = mode_of(&block) {
                assert!(grid_width <= 8 && grid_height <= 6);
            }
        }
    }

    #[test]
    fn filler_blocks() {
        let voids = default_void_extent_blocks(3);
        assert_eq!(voids.len(), 48);
        assert!(blocks(&voids).all(|b| b.get_bits(0, 8) == block_mode::VOID_EXTENT_MARKER));

        let normals = default_normal_blocks(4, 4, 4).unwrap();
        assert_eq!(normals.len(), 64);
        let first = blocks(&normals).next().unwrap();
        assert_eq!(first.get_bits(13, 16), 8);
        assert!(default_normal_blocks(0, 4, 4).unwrap().is_empty());
    }
}
