#![allow(dead_code)]

use astc_blockgen::bits::{BitBlock128, Direction};
use astc_blockgen::cem;
use astc_blockgen::{IseMode, IseParams, NormalBlockParams, BLOCK_SIZE_BYTES};

/// Reads back what a `BitCursor` wrote; positions at or past `length` read as zero.
pub struct BitReader<'a> {
    block: &'a BitBlock128,
    base: u32,
    length: u32,
    direction: Direction,
    pos: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(block: &'a BitBlock128, base: u32, length: u32, direction: Direction) -> Self {
        BitReader { block, base, length, direction, pos: 0 }
    }

    pub fn read(&mut self, width: u32) -> u32 {
        let mut value = 0;
        for i in 0..width {
            let p = self.pos + i;
            if p >= self.length {
                break;
            }
            let index = match self.direction {
                Direction::Forward => self.base + p,
                Direction::Reverse => self.base - p,
            };
            value |= self.block.get_bit(index) << i;
        }
        self.pos += width;
        value
    }
}

fn bit(v: u32, i: u32) -> u32 {
    (v >> i) & 1
}

fn bits(v: u32, low: u32, high: u32) -> u32 {
    (v >> low) & ((1 << (high - low + 1)) - 1)
}

/// Trits packed in an 8-bit T selector.
pub fn decode_trits(t: u32) -> [u32; 5] {
    let (c, t3, t4);
    if bits(t, 2, 4) == 0b111 {
        c = bits(t, 5, 7) << 2 | bits(t, 0, 1);
        t4 = 2;
        t3 = 2;
    } else {
        c = bits(t, 0, 4);
        if bits(t, 5, 6) == 0b11 {
            t4 = 2;
            t3 = bit(t, 7);
        } else {
            t4 = bit(t, 7);
            t3 = bits(t, 5, 6);
        }
    }

    let (t0, t1, t2);
    if bits(c, 0, 1) == 0b11 {
        t2 = 2;
        t1 = bit(c, 4);
        t0 = bit(c, 3) << 1 | (bit(c, 2) & !bit(c, 3) & 1);
    } else if bits(c, 2, 3) == 0b11 {
        t2 = 2;
        t1 = 2;
        t0 = bits(c, 0, 1);
    } else {
        t2 = bit(c, 4);
        t1 = bits(c, 2, 3);
        t0 = bit(c, 1) << 1 | (bit(c, 0) & !bit(c, 1) & 1);
    }
    [t0, t1, t2, t3, t4]
}

/// Quints packed in a 7-bit Q selector.
pub fn decode_quints(q: u32) -> [u32; 3] {
    if bits(q, 1, 2) == 0b11 && bits(q, 5, 6) == 0 {
        let q0b = bit(q, 0);
        let q2 = q0b << 2 | (bit(q, 4) & !q0b & 1) << 1 | (bit(q, 3) & !q0b & 1);
        return [4, 4, q2];
    }
    let (q2, c) = if bits(q, 1, 2) == 0b11 {
        (4, bits(q, 3, 4) << 3 | (!bits(q, 5, 6) & 0b11) << 1 | bit(q, 0))
    } else {
        (bits(q, 5, 6), bits(q, 0, 4))
    };
    if bits(c, 0, 2) == 0b101 {
        [bits(c, 3, 4), 4, q2]
    } else {
        [bits(c, 0, 2), bits(c, 3, 4), q2]
    }
}

/// Decodes `num_values` values of an integer sequence.
pub fn decode_ise(reader: &mut BitReader<'_>, params: IseParams, num_values: usize) -> Vec<u32> {
    let b = params.num_bits as u32;
    let mut out = Vec::with_capacity(num_values);
    while out.len() < num_values {
        match params.mode {
            IseMode::PlainBit => out.push(reader.read(b)),
            IseMode::Trit => {
                let mut m = [0u32; 5];
                let mut t = 0;
                for (i, (low, width)) in [(0, 2), (2, 2), (4, 1), (5, 2), (7, 1)].into_iter().enumerate() {
                    m[i] = reader.read(b);
                    t |= reader.read(width) << low;
                }
                let trits = decode_trits(t);
                for i in 0..5 {
                    out.push(trits[i] << b | m[i]);
                }
            }
            IseMode::Quint => {
                let mut m = [0u32; 3];
                let mut q = 0;
                for (i, (low, width)) in [(0, 3), (3, 2), (5, 2)].into_iter().enumerate() {
                    m[i] = reader.read(b);
                    q |= reader.read(width) << low;
                }
                let quints = decode_quints(q);
                for i in 0..3 {
                    out.push(quints[i] << b | m[i]);
                }
            }
        }
    }
    out.truncate(num_values);
    out
}

pub fn block(bytes: &[u8; BLOCK_SIZE_BYTES]) -> BitBlock128 {
    BitBlock128::from_bytes(bytes)
}

pub fn read_weights(block: &BitBlock128, params: &NormalBlockParams) -> Vec<u32> {
    let mut reader = BitReader::new(block, 127, params.weight_bits(), Direction::Reverse);
    decode_ise(&mut reader, params.weight_ise, params.num_weights() as usize)
}

pub fn endpoint_start(params: &NormalBlockParams) -> u32 {
    if params.num_partitions == 1 { 17 } else { 29 }
}

pub fn read_endpoints(block: &BitBlock128, params: &NormalBlockParams) -> Vec<u32> {
    let mut reader = BitReader::new(
        block,
        endpoint_start(params),
        params.endpoint_bits() as u32,
        Direction::Forward,
    );
    decode_ise(&mut reader, params.endpoint_ise(), params.num_endpoint_values() as usize)
}

/// First bit above the endpoint data that belongs to the configuration stored below the weights.
pub fn upper_config_start(params: &NormalBlockParams) -> u32 {
    let single = params.single_cem || params.num_partitions == 1;
    let extra = cem::extra_cem_bits(params.num_partitions, single);
    let ccs = if params.dual_plane { 2 } else { 0 };
    128 - params.weight_bits() - extra - ccs
}

/// First bit of the CEM bits that spill below the weights of a per-partition CEM field.
pub fn extra_cem_start(block: &BitBlock128, weight_bits: u32) -> u32 {
    let n = block.get_bits(11, 12) + 1;
    128 - weight_bits - (3 * n - 4)
}

/// Decodes the color endpoint mode of every partition from the block header.
pub fn read_cems(block: &BitBlock128, weight_bits: u32) -> Vec<u8> {
    let n = block.get_bits(11, 12) + 1;
    if n == 1 {
        return vec![block.get_bits(13, 16) as u8];
    }
    let selector = block.get_bits(23, 24);
    if selector == 0 {
        return vec![block.get_bits(25, 28) as u8; n as usize];
    }

    let extra_start = extra_cem_start(block, weight_bits);
    let bit_at = |k: u32| {
        if k < 4 {
            block.get_bit(25 + k)
        } else {
            block.get_bit(extra_start + k - 4)
        }
    };
    (0..n)
        .map(|i| {
            let class = selector - 1 + bit_at(i);
            let mode = bit_at(n + 2 * i) | bit_at(n + 2 * i + 1) << 1;
            (class * 4 + mode) as u8
        })
        .collect()
}

/// The color component selector of a dual-plane block.
pub fn read_ccs(block: &BitBlock128, weight_bits: u32) -> u32 {
    let n = block.get_bits(11, 12) + 1;
    let top = if n > 1 && block.get_bits(23, 24) != 0 {
        extra_cem_start(block, weight_bits)
    } else {
        128 - weight_bits
    };
    block.get_bits(top - 2, top - 1)
}
