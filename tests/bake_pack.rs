use block_bakery::{
    load_resource_pack, load_resource_pack_from_bytes, BakedModel, BakeryConfig, BlockRegistry,
    Direction, ModelBakery, Sprite,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const CUBE: &str = r##"{
    "elements": [{
        "from": [0, 0, 0], "to": [16, 16, 16],
        "faces": {
            "down":  { "texture": "#down", "cullface": "down" },
            "up":    { "texture": "#up", "cullface": "up" },
            "north": { "texture": "#north", "cullface": "north" },
            "south": { "texture": "#south", "cullface": "south" },
            "west":  { "texture": "#west", "cullface": "west" },
            "east":  { "texture": "#east", "cullface": "east" }
        }
    }]
}"##;

const FILES: &[(&str, &str)] = &[
    (
        "blocks/furnace.json",
        r#"{ "properties": { "facing": ["north", "south", "west", "east"], "lit": [false, true] } }"#,
    ),
    (
        "blockstates/furnace.json",
        r#"{ "variants": {
            "facing=north": { "model": "block/furnace" },
            "facing=east":  { "model": "block/furnace", "y": 90 },
            "facing=south": { "model": "block/furnace", "y": 180 },
            "facing=west":  { "model": "block/furnace", "y": 270 }
        } }"#,
    ),
    (
        "blockstates/stone.json",
        r#"{ "variants": { "": { "model": "block/stone" } } }"#,
    ),
    (
        "blockstates/oops.json",
        r#"{ "variants": { "": { "model": "block/broken" } } }"#,
    ),
    ("models/block/cube.json", CUBE),
    (
        "models/block/cube_all.json",
        r##"{ "parent": "block/cube", "textures": {
            "particle": "#all", "down": "#all", "up": "#all",
            "north": "#all", "south": "#all", "west": "#all", "east": "#all"
        } }"##,
    ),
    (
        "models/block/orientable.json",
        r##"{ "parent": "block/cube", "textures": {
            "down": "#side", "up": "#side", "north": "#front",
            "south": "#side", "west": "#side", "east": "#side"
        } }"##,
    ),
    (
        "models/block/furnace.json",
        r#"{ "parent": "block/orientable", "textures": {
            "front": "block/furnace_front", "side": "block/furnace_side"
        } }"#,
    ),
    (
        "models/block/stone.json",
        r#"{ "parent": "block/cube_all", "textures": { "all": "block/stone" } }"#,
    ),
    ("models/block/broken.json", "{ not json"),
];

const TEXTURES: &[(&str, [u8; 4])] = &[
    ("block/stone", [128, 128, 128, 255]),
    ("block/furnace_front", [200, 80, 20, 255]),
    ("block/furnace_side", [90, 90, 90, 255]),
];

fn png_bytes(color: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(16, 16, image::Rgba(color));
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn pack_entries() -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<(String, Vec<u8>)> = FILES
        .iter()
        .map(|(path, json)| (format!("assets/minecraft/{}", path), json.as_bytes().to_vec()))
        .collect();
    for (name, color) in TEXTURES {
        entries.push((format!("assets/minecraft/textures/{}.png", name), png_bytes(*color)));
    }
    entries
}

fn write_pack_dir(root: &Path) {
    for (path, contents) in pack_entries() {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
}

fn zip_pack() -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (path, contents) in pack_entries() {
        zip.start_file(path, options).unwrap();
        zip.write_all(&contents).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn inside(sprite: &Sprite, uv: [f32; 2]) -> bool {
    let eps = 1e-6;
    uv[0] >= sprite.min_u() - eps
        && uv[0] <= sprite.max_u() + eps
        && uv[1] >= sprite.min_v() - eps
        && uv[1] <= sprite.max_v() + eps
}

fn is_missing(model: &BakedModel, missing: &BakedModel) -> bool {
    std::ptr::eq(model, missing)
}

#[test]
fn test_bake_directory_pack() {
    let dir = TempDir::new().unwrap();
    write_pack_dir(dir.path());

    let pack = load_resource_pack(dir.path()).unwrap();
    // The unparseable model is skipped.
    assert_eq!(pack.model_count(), 5);
    assert_eq!(pack.texture_count(), 3);

    let registry = BlockRegistry::from_pack(&pack).unwrap();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.get("furnace").unwrap().properties.len(), 2);

    let baked = ModelBakery::new(&pack, BakeryConfig::default())
        .bake(&registry)
        .unwrap();
    assert_eq!(baked.state_count(), 8 + 1 + 1);
    assert_eq!(baked.atlas.sprite_count(), 4);
    // Four rotations of the furnace plus stone.
    assert_eq!(baked.distinct_model_count(), 5);

    let stone_state = baked.block("stone").unwrap().graph.default_state();
    let stone = baked.model("stone", stone_state);
    assert!(stone.quads(None).is_empty());
    for direction in Direction::ALL {
        let quads = stone.quads(Some(direction));
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].direction, direction);
    }

    let oops_state = baked.block("oops").unwrap().graph.default_state();
    assert!(is_missing(baked.model("oops", oops_state), baked.missing_model()));
}

#[test]
fn test_bad_block_definition_bakes_as_missing() {
    let dir = TempDir::new().unwrap();
    write_pack_dir(dir.path());
    let root = dir.path().join("assets/minecraft");
    fs::write(root.join("blocks/lever.json"), r#"{ "properties": { "face": [] } }"#).unwrap();
    fs::write(
        root.join("blockstates/lever.json"),
        r#"{ "variants": { "face=wall": { "model": "block/stone" } } }"#,
    )
    .unwrap();

    let pack = load_resource_pack(dir.path()).unwrap();
    let registry = BlockRegistry::from_pack(&pack).unwrap();
    assert_eq!(registry.len(), 4);
    assert!(registry.get("lever").unwrap().properties.is_empty());

    let baked = ModelBakery::new(&pack, BakeryConfig::default())
        .bake(&registry)
        .unwrap();
    let lever_state = baked.block("lever").unwrap().graph.default_state();
    assert!(is_missing(baked.model("lever", lever_state), baked.missing_model()));

    let stone_state = baked.block("stone").unwrap().graph.default_state();
    assert!(!is_missing(baked.model("stone", stone_state), baked.missing_model()));
    assert_eq!(baked.block("furnace").unwrap().graph.len(), 8);
}

#[test]
fn test_furnace_front_follows_facing() {
    let dir = TempDir::new().unwrap();
    write_pack_dir(dir.path());
    let pack = load_resource_pack(dir.path()).unwrap();
    let registry = BlockRegistry::from_pack(&pack).unwrap();
    let baked = ModelBakery::new(&pack, BakeryConfig::default())
        .bake(&registry)
        .unwrap();

    let front = baked.atlas.sprite("minecraft:block/furnace_front").clone();
    let graph = &baked.block("furnace").unwrap().graph;

    for (facing, direction) in [
        ("north", Direction::North),
        ("east", Direction::East),
        ("south", Direction::South),
        ("west", Direction::West),
    ] {
        let state = graph.find([("facing", facing), ("lit", "true")]).unwrap();
        let model = baked.model("furnace", state);
        let quads = model.quads(Some(direction));
        assert_eq!(quads.len(), 1, "facing={}", facing);
        assert!(quads[0].vertices.iter().all(|v| inside(&front, v.uv)));

        let back = model.quads(Some(direction.opposite()));
        assert!(!back[0].vertices.iter().all(|v| inside(&front, v.uv)));
    }
}

#[test]
fn test_zip_matches_directory() {
    let dir = TempDir::new().unwrap();
    write_pack_dir(dir.path());
    let from_dir = load_resource_pack(dir.path()).unwrap();

    let archive = dir.path().join("pack.zip");
    fs::write(&archive, zip_pack()).unwrap();
    let from_file = load_resource_pack(&archive).unwrap();
    let from_bytes = load_resource_pack_from_bytes(&zip_pack()).unwrap();

    for pack in [&from_file, &from_bytes] {
        assert_eq!(pack.block_names(), from_dir.block_names());
        assert_eq!(pack.model_count(), from_dir.model_count());
        assert_eq!(pack.texture_count(), from_dir.texture_count());
    }
}

#[test]
fn test_atlas_png_round_trip() {
    let dir = TempDir::new().unwrap();
    write_pack_dir(dir.path());
    let pack = load_resource_pack(dir.path()).unwrap();
    let registry = BlockRegistry::from_pack(&pack).unwrap();
    let baked = ModelBakery::new(&pack, BakeryConfig::default())
        .bake(&registry)
        .unwrap();

    let out = dir.path().join("atlas.png");
    fs::write(&out, baked.atlas.to_png().unwrap()).unwrap();
    let decoded = image::open(&out).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (baked.atlas.width, baked.atlas.height));

    let stone = baked.atlas.sprite("minecraft:block/stone");
    assert_eq!(
        decoded.get_pixel(stone.origin_x, stone.origin_y).0,
        [128, 128, 128, 255]
    );
}
