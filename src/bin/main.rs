//! Block Bakery CLI
//!
//! Inspect resource packs and bake their block models.

use block_bakery::{
    load_resource_pack, BakeryConfig, BlockRegistry, Direction, ModelBakery, ResourcePack,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "block-bakery")]
#[command(author, version, about = "Bake block models and a texture atlas from a resource pack", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a resource pack
    Info {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,
    },

    /// List the states of a block type and the transitions between them
    States {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Block name (e.g., "minecraft:furnace" or "furnace")
        #[arg(short, long)]
        block: String,
    },

    /// Bake every block type and write the atlas
    Bake {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum atlas size
        #[arg(long, default_value = "16384")]
        atlas_size: u32,

        /// Biome for tinting (e.g., "plains", "swamp", "jungle")
        #[arg(long)]
        biome: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { resource_pack } => {
            show_pack_info(&resource_pack)?;
        }
        Commands::States {
            resource_pack,
            block,
        } => {
            show_states(&resource_pack, &block)?;
        }
        Commands::Bake {
            resource_pack,
            output,
            atlas_size,
            biome,
        } => {
            let mut config = BakeryConfig::default().with_atlas_max_size(atlas_size);
            if let Some(biome_name) = &biome {
                config = config.with_biome(biome_name);
            }
            bake(&resource_pack, &output, config)?;
        }
    }

    Ok(())
}

fn load(resource_pack_path: &Path) -> Result<ResourcePack, Box<dyn std::error::Error>> {
    println!("Loading resource pack from {:?}...", resource_pack_path);
    Ok(load_resource_pack(resource_pack_path)?)
}

fn show_pack_info(resource_pack_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load(resource_pack_path)?;

    println!("\nResource Pack Info:");
    println!("  Namespaces: {}", pack.namespaces().join(", "));
    println!("  Block definitions: {}", pack.block_count());
    println!("  Blockstates: {}", pack.blockstate_count());
    println!("  Models: {}", pack.model_count());
    println!("  Textures: {}", pack.texture_count());

    Ok(())
}

fn show_states(
    resource_pack_path: &Path,
    block_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load(resource_pack_path)?;
    let registry = BlockRegistry::from_pack(&pack)?;

    let block = registry
        .get(block_name)
        .ok_or_else(|| format!("unknown block type: {}", block_name))?;
    let graph = block.state_graph()?;

    println!("\n{} ({} states)", block.name, graph.len());
    for property in graph.properties() {
        println!("  {}: {}", property.name(), property.values().join(", "));
    }
    println!();

    for state in graph.states() {
        let marker = if state == graph.default_state() { " (default)" } else { "" };
        println!("  #{} {}{}", state.index(), graph.variant_key(state), marker);
    }

    Ok(())
}

fn bake(
    resource_pack_path: &Path,
    output_dir: &Path,
    config: BakeryConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load(resource_pack_path)?;
    let registry = BlockRegistry::from_pack(&pack)?;
    println!("  Registered {} block types", registry.len());

    let baked = ModelBakery::new(&pack, config).bake(&registry)?;

    let mut quads = 0;
    let mut culled = 0;
    for name in baked.block_names() {
        let Some(block) = baked.block(name) else {
            continue;
        };
        for state in block.graph.states() {
            let model = baked.model(name, state);
            quads += model.quad_count();
            culled += Direction::ALL
                .iter()
                .map(|d| model.quads(Some(*d)).len())
                .sum::<usize>();
        }
    }

    println!(
        "  Baked {} states of {} block types ({} distinct models, {} missing)",
        baked.state_count(),
        baked.len(),
        baked.distinct_model_count(),
        baked.missing_state_count()
    );
    println!("  {} quads, {} cullable", quads, culled);

    fs::create_dir_all(output_dir)?;
    let atlas_path = output_dir.join("atlas.png");
    let png = baked.atlas.to_png()?;
    fs::write(&atlas_path, &png)?;
    println!(
        "Exported atlas {}x{} with {} sprites ({} bytes) to {:?}",
        baked.atlas.width,
        baked.atlas.height,
        baked.atlas.sprite_count(),
        png.len(),
        atlas_path
    );

    Ok(())
}
