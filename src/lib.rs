//! Bit-exact ASTC block encoder for synthesizing decoder conformance data.
//!
//! Callers describe blocks logically ([`NormalBlockParams`], [`VoidExtentParams`]) and get
//! back the 16-byte encoded block. [`cases`] builds whole corpora on top of the encoders and
//! [`texture`] stores block streams in KTX2 files.

pub mod bits;
pub mod block_mode;
pub mod cases;
pub mod cem;
pub mod error;
pub mod ise;
pub mod normal;
pub mod texture;
pub mod vk_format;
pub mod void_extent;

pub(crate) mod dfd;
pub(crate) mod header;
pub(crate) mod index;
pub(crate) mod level;

pub use bits::BLOCK_SIZE_BYTES;
pub use block_mode::BlockModeInfo;
pub use cases::{
    default_normal_blocks, default_void_extent_blocks, generate_block_case_test_data, generate_random_blocks,
    BlockTestType,
};
pub use error::ValidationError;
pub use ise::{IseBlock, IseInput, IseMode, IseParams};
pub use normal::{
    default_ise_inputs, encode_normal_block, encode_normal_block_for, validate, NormalBlockIseInputs,
    NormalBlockParams,
};
pub use texture::AstcTextureKtx2;
pub use vk_format::VkFormat;
pub use void_extent::{encode_void_extent, VoidExtentParams};
