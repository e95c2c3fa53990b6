use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use log::info;

use astc_blockgen::{
    default_void_extent_blocks, generate_block_case_test_data, generate_random_blocks, AstcTextureKtx2,
    BlockTestType, VkFormat, BLOCK_SIZE_BYTES,
};

#[derive(Parser)]
#[command(name = "astc-blockgen")]
#[command(about = "Generate ASTC blocks for decoder conformance testing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the corpus of one block test type
    Generate(GenerateArgs),

    /// Write a stream of random blocks
    Random(RandomArgs),

    /// List block test types
    List,
}

#[derive(Args)]
struct FormatArgs {
    /// Block footprint, e.g. 8x8
    #[arg(long, default_value = "4x4")]
    format: VkFormat,

    /// Use the sRGB variant of the format
    #[arg(long)]
    srgb: bool,
}

impl FormatArgs {
    fn vk_format(&self) -> VkFormat {
        self.format.with_srgb(self.srgb)
    }
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    format: FormatArgs,

    /// Block test type, see `list`
    #[arg(long)]
    case: String,

    /// Output path; `.ktx2` writes a texture, anything else raw blocks
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args)]
struct RandomArgs {
    #[command(flatten)]
    format: FormatArgs,

    #[arg(long, default_value_t = 1024)]
    count: usize,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long)]
    out: PathBuf,
}

fn is_ktx2(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ktx2"))
}

/// Writes `blocks` raw, or as a roughly square KTX2 texture padded with void-extent blocks.
fn write_blocks(format: VkFormat, mut blocks: Vec<u8>, out: &Path) -> anyhow::Result<()> {
    let count = blocks.len() / BLOCK_SIZE_BYTES;
    if !is_ktx2(out) {
        fs::write(out, &blocks).with_context(|| format!("writing {}", out.display()))?;
        info!("wrote {count} blocks to {}", out.display());
        return Ok(());
    }

    let blocks_wide = (count as f64).sqrt().ceil().max(1.0) as u32;
    let blocks_high = (count as u32).div_ceil(blocks_wide).max(1);
    let padding = (blocks_wide * blocks_high) as usize - count;
    blocks.extend(default_void_extent_blocks(padding));

    let texture = AstcTextureKtx2::from_blocks(format, blocks_wide, blocks_high, blocks)?;
    texture.write_to_ktx2(out)?;
    info!(
        "wrote {count} blocks (+{padding} padding) as {blocks_wide}x{blocks_high} {format} to {}",
        out.display()
    );
    Ok(())
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let test_type = BlockTestType::from_name(&args.case)
        .ok_or_else(|| anyhow!("unknown block test type {:?}, see `astc-blockgen list`", args.case))?;
    let format = args.format.vk_format();
    let blocks = generate_block_case_test_data(format, test_type)?;
    write_blocks(format, blocks, &args.out)
}

fn random(args: RandomArgs) -> anyhow::Result<()> {
    let format = args.format.vk_format();
    let blocks = generate_random_blocks(format, args.count, args.seed)?;
    write_blocks(format, blocks, &args.out)
}

fn list() {
    for test_type in BlockTestType::ALL {
        let hdr = if test_type.is_hdr_only() { " [HDR only]" } else { "" };
        println!("{:<32}{}{hdr}", test_type.name(), test_type.description());
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Generate(args) => generate(args),
        Commands::Random(args) => random(args),
        Commands::List => {
            list();
            Ok(())
        }
    }
}
