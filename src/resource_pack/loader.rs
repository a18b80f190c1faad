//! Resource pack loading from ZIP files and directories.
//!
//! Both sources are flattened into `assets/{namespace}/{type}/{path}`
//! entries. Unparseable assets are logged and skipped; I/O and archive
//! errors abort the load.

use super::texture::{load_texture_from_bytes, parse_mcmeta, AnimationMeta};
use super::{BlockDefinition, BlockModel, BlockstateDefinition, ResourcePack};
use crate::error::{BakeryError, Result};
use std::io::Read;
use std::path::Path;

/// Load a resource pack from a file path.
///
/// Supports both ZIP files and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ResourcePack> {
    let path = path.as_ref();

    if path.is_dir() {
        load_from_directory(path)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)
    }
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = ResourcePack::new();
    // Entry order is arbitrary, so mcmeta is applied once every texture is in.
    let mut pending_mcmeta = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let file_path = file.name().to_string();
        let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) else {
            continue;
        };
        if !is_wanted(asset_type, asset_path) {
            continue;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        add_asset(
            &mut pack,
            &mut pending_mcmeta,
            namespace,
            asset_type,
            asset_path,
            &contents,
        );
    }
    apply_mcmeta(&mut pack, pending_mcmeta);

    log::debug!(
        "loaded archive: {} blocks, {} blockstates, {} models, {} textures",
        pack.block_count(),
        pack.blockstate_count(),
        pack.model_count(),
        pack.texture_count()
    );
    Ok(pack)
}

/// Load a resource pack from a directory.
fn load_from_directory(path: &Path) -> Result<ResourcePack> {
    let assets_path = path.join("assets");
    if !assets_path.is_dir() {
        return Err(BakeryError::InvalidResourcePack(format!(
            "no assets directory in {}",
            path.display()
        )));
    }

    let mut files = Vec::new();
    collect_files(&assets_path, &assets_path, &mut files)?;
    // Directory iteration order is platform-dependent.
    files.sort();

    let mut pack = ResourcePack::new();
    let mut pending_mcmeta = Vec::new();
    for relative in files {
        let file_path = format!("assets/{}", relative);
        let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) else {
            continue;
        };
        if !is_wanted(asset_type, asset_path) {
            continue;
        }

        let contents = std::fs::read(assets_path.join(&relative))?;
        add_asset(
            &mut pack,
            &mut pending_mcmeta,
            namespace,
            asset_type,
            asset_path,
            &contents,
        );
    }
    apply_mcmeta(&mut pack, pending_mcmeta);

    log::debug!(
        "loaded {}: {} blocks, {} blockstates, {} models, {} textures",
        path.display(),
        pack.block_count(),
        pack.blockstate_count(),
        pack.model_count(),
        pack.texture_count()
    );
    Ok(pack)
}

/// Parse an asset path from a ZIP file.
/// Returns (namespace, asset_type, asset_path) if valid.
fn parse_asset_path(file_path: &str) -> Option<(&str, &str, &str)> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(4, '/').collect();

    if parts.len() >= 4 && parts[0] == "assets" && !parts[3].is_empty() {
        Some((parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

fn is_wanted(asset_type: &str, asset_path: &str) -> bool {
    match asset_type {
        "blocks" | "blockstates" | "models" => asset_path.ends_with(".json"),
        "textures" => asset_path.ends_with(".png") || asset_path.ends_with(".png.mcmeta"),
        _ => false,
    }
}

/// Animation metadata waiting for its texture: (namespace, texture path, meta).
type PendingMcmeta = Vec<(String, String, AnimationMeta)>;

/// Parse one asset and add it to the pack, logging and skipping bad data.
fn add_asset(
    pack: &mut ResourcePack,
    pending_mcmeta: &mut PendingMcmeta,
    namespace: &str,
    asset_type: &str,
    asset_path: &str,
    contents: &[u8],
) {
    match asset_type {
        "blocks" => {
            let block_id = asset_path.trim_end_matches(".json");
            match serde_json::from_slice::<BlockDefinition>(contents) {
                Ok(def) => pack.add_block(namespace, block_id, def),
                Err(e) => log::warn!(
                    "skipping block definition {}:{}: {}",
                    namespace,
                    block_id,
                    e
                ),
            }
        }
        "blockstates" => {
            let block_id = asset_path.trim_end_matches(".json");
            match serde_json::from_slice::<BlockstateDefinition>(contents) {
                Ok(def) => pack.add_blockstate(namespace, block_id, def),
                Err(e) => log::warn!("skipping blockstate {}:{}: {}", namespace, block_id, e),
            }
        }
        "models" => {
            let model_path = asset_path.trim_end_matches(".json");
            match serde_json::from_slice::<BlockModel>(contents) {
                Ok(model) => pack.add_model(namespace, model_path, model),
                Err(e) => log::warn!("skipping model {}:{}: {}", namespace, model_path, e),
            }
        }
        "textures" if asset_path.ends_with(".png.mcmeta") => {
            let texture_path = asset_path.trim_end_matches(".png.mcmeta");
            let meta = std::str::from_utf8(contents).ok().and_then(parse_mcmeta);
            if let Some(meta) = meta {
                pending_mcmeta.push((namespace.to_string(), texture_path.to_string(), meta));
            }
        }
        "textures" => {
            let texture_path = asset_path.trim_end_matches(".png");
            match load_texture_from_bytes(contents) {
                Ok(texture) => pack.add_texture(namespace, texture_path, texture),
                Err(e) => log::warn!("skipping texture {}:{}: {}", namespace, texture_path, e),
            }
        }
        _ => {}
    }
}

fn apply_mcmeta(pack: &mut ResourcePack, pending_mcmeta: PendingMcmeta) {
    for (namespace, texture_path, meta) in pending_mcmeta {
        match pack.textures.get_mut(&format!("{}:{}", namespace, texture_path)) {
            Some(texture) => texture.apply_mcmeta(meta),
            None => log::debug!("mcmeta without texture: {}:{}", namespace, texture_path),
        }
    }
}

/// Collect every file below `dir` as a `/`-separated path relative to `base`.
fn collect_files(base: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            collect_files(base, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            out.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}
