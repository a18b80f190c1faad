//! Baking model elements into quads.

use super::quad::{BakedModel, BakedQuad, BakedVertex};
use crate::atlas::TextureAtlas;
use crate::resolver::ModelRef;
use crate::resource_pack::{ModelElement, ModelFace};
use crate::types::{BlockTransform, Direction, MISSING_TEXTURE};
use std::collections::BTreeMap;

/// Corners of each face as indices into the element's bounding box, in
/// [`Direction::ALL`] order. Bit 1 selects max x, bit 2 max y, bit 4 max z.
pub const FACE_CORNERS: [[u8; 4]; 6] = [
    [4, 5, 1, 0], // down
    [2, 3, 7, 6], // up
    [3, 2, 0, 1], // north
    [6, 7, 5, 4], // south
    [2, 6, 4, 0], // west
    [7, 3, 1, 5], // east
];

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Bake a resolved model under a variant rotation.
///
/// Faces with `tintindex >= 0` are colored `tint`, all others white.
pub fn bake_model(
    model: ModelRef<'_>,
    transform: BlockTransform,
    atlas: &TextureAtlas,
    tint: [f32; 4],
) -> BakedModel {
    bake_elements(
        model.elements(),
        model.ambient_occlusion(),
        |texture| model.texture(texture),
        transform,
        atlas,
        tint,
    )
}

/// The model drawn for anything that failed to resolve: a full cube
/// textured with the placeholder on every side.
pub fn missing_model(atlas: &TextureAtlas) -> BakedModel {
    let faces: BTreeMap<Direction, ModelFace> = Direction::ALL
        .iter()
        .map(|&direction| {
            let mut face = ModelFace::new(MISSING_TEXTURE);
            face.cullface = Some(direction);
            (direction, face)
        })
        .collect();
    let cube = ModelElement {
        from: [0.0, 0.0, 0.0],
        to: [16.0, 16.0, 16.0],
        rotation: None,
        shade: true,
        faces,
    };

    bake_elements(
        std::slice::from_ref(&cube),
        true,
        |_| MISSING_TEXTURE.to_string(),
        BlockTransform::default(),
        atlas,
        WHITE,
    )
}

fn bake_elements<F>(
    elements: &[ModelElement],
    ambient_occlusion: bool,
    resolve_texture: F,
    transform: BlockTransform,
    atlas: &TextureAtlas,
    tint: [f32; 4],
) -> BakedModel
where
    F: Fn(&str) -> String,
{
    let mut unculled = Vec::new();
    let mut culled: [Vec<BakedQuad>; 6] = Default::default();

    for element in elements {
        for (&direction, face) in &element.faces {
            let texture = resolve_texture(&face.texture);
            let color = if face.has_tint() { tint } else { WHITE };
            let quad = bake_face(element, direction, face, &texture, transform, atlas, color);

            match face.cullface {
                Some(cull) => {
                    let cull = cull.rotate_by_transform(transform.x, transform.y);
                    culled[cull.index()].push(quad);
                }
                None => unculled.push(quad),
            }
        }
    }

    BakedModel::Simple {
        ambient_occlusion,
        unculled,
        culled,
    }
}

fn bake_face(
    element: &ModelElement,
    direction: Direction,
    face: &ModelFace,
    texture: &str,
    transform: BlockTransform,
    atlas: &TextureAtlas,
    color: [f32; 4],
) -> BakedQuad {
    let from = element.normalized_from();
    let to = element.normalized_to();

    let mut positions =
        FACE_CORNERS[direction.index()].map(|corner| corner_position(corner, from, to));
    let mut normal = direction.normal();

    if let Some(rotation) = &element.rotation {
        positions = positions.map(|p| rotation.apply_position(p));
        normal = rotation.apply_normal(normal);
    }
    positions = positions.map(|p| transform.apply_position(p));
    normal = transform.apply_normal(normal);

    let sprite = atlas.sprite(texture);
    let uvs = rotate_uvs(face.uv_on(element, direction), face.quadrant)
        .map(|[u, v]| sprite.interpolate(u / 16.0, v / 16.0));

    let vertices = [0, 1, 2, 3].map(|i| BakedVertex {
        position: positions[i],
        normal,
        color,
        uv: uvs[i],
    });

    BakedQuad {
        vertices,
        tint_index: face.tintindex,
        direction: Direction::from_vector(normal),
        shade: element.shade,
    }
}

fn corner_position(corner: u8, from: [f32; 3], to: [f32; 3]) -> [f32; 3] {
    [
        if corner & 1 != 0 { to[0] } else { from[0] },
        if corner & 2 != 0 { to[1] } else { from[1] },
        if corner & 4 != 0 { to[2] } else { from[2] },
    ]
}

/// Per-corner UVs of a `[u1, v1, u2, v2]` rectangle, corner `i` taking base
/// corner `(i + quadrant) % 4`.
pub fn rotate_uvs(uv: [f32; 4], quadrant: u8) -> [[f32; 2]; 4] {
    let [u1, v1, u2, v2] = uv;
    let base = [[u1, v1], [u2, v1], [u2, v2], [u1, v2]];
    let shift = quadrant as usize;
    [0, 1, 2, 3].map(|i| base[(i + shift) % 4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasBuilder;
    use crate::resolver::ModelCache;
    use crate::resource_pack::{BlockModel, ResourcePack, TextureData};

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    fn cube(cull: bool, tint_top: bool) -> ModelElement {
        let faces = Direction::ALL
            .iter()
            .map(|&d| {
                let mut face = ModelFace::new("#all");
                if cull {
                    face.cullface = Some(d);
                }
                if tint_top && d == Direction::Up {
                    face.tintindex = 0;
                }
                (d, face)
            })
            .collect();
        ModelElement {
            from: [0.0, 0.0, 0.0],
            to: [16.0, 16.0, 16.0],
            rotation: None,
            shade: true,
            faces,
        }
    }

    fn pack_with(element: ModelElement) -> ResourcePack {
        let mut pack = ResourcePack::new();
        pack.add_model(
            "minecraft",
            "block/test",
            BlockModel {
                textures: [("all".to_string(), "block/stone".to_string())]
                    .into_iter()
                    .collect(),
                elements: vec![element],
                ..BlockModel::new()
            },
        );
        pack
    }

    fn atlas() -> TextureAtlas {
        let mut builder = AtlasBuilder::new();
        builder.add_texture("minecraft:block/stone", TextureData::placeholder());
        builder.build().unwrap()
    }

    fn bake(pack: &ResourcePack, transform: BlockTransform, tint: [f32; 4]) -> BakedModel {
        let mut cache = ModelCache::new(pack);
        let id = cache.get_model("block/test").unwrap();
        bake_model(cache.model(id), transform, &atlas(), tint)
    }

    #[test]
    fn test_culled_cube_fills_every_bucket() {
        let pack = pack_with(cube(true, false));
        let model = bake(&pack, BlockTransform::default(), WHITE);

        assert!(model.quads(None).is_empty());
        for direction in Direction::ALL {
            let quads = model.quads(Some(direction));
            assert_eq!(quads.len(), 1, "bucket {}", direction);
            assert_eq!(quads[0].direction, direction);
            assert_eq!(quads[0].vertices[0].normal, direction.normal());
        }
    }

    #[test]
    fn test_unculled_faces() {
        let pack = pack_with(cube(false, false));
        let model = bake(&pack, BlockTransform::default(), WHITE);
        assert_eq!(model.quads(None).len(), 6);
        assert_eq!(model.quad_count(), 6);
    }

    #[test]
    fn test_up_face_corners() {
        let pack = pack_with(cube(true, false));
        let model = bake(&pack, BlockTransform::default(), WHITE);
        let up = model.quads(Some(Direction::Up))[0];
        let positions: Vec<_> = up.vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 1.0],
                [0.0, 1.0, 1.0]
            ]
        );
    }

    #[test]
    fn test_winding_is_clockwise_from_outside() {
        let pack = pack_with(cube(true, false));
        let model = bake(&pack, BlockTransform::default(), WHITE);
        for direction in Direction::ALL {
            let quad = model.quads(Some(direction))[0];
            let [p0, p1, p2] = [0, 1, 2].map(|i| glam::Vec3::from(quad.vertices[i].position));
            let winding = (p1 - p0).cross(p2 - p0).normalize();
            assert_eq!(winding, -glam::Vec3::from(direction.normal()), "face {}", direction);
        }
    }

    #[test]
    fn test_quadrant_rotation_shifts_corners() {
        let uvs = rotate_uvs([0.0, 0.0, 16.0, 16.0], 1);
        assert_eq!(uvs[0], [16.0, 0.0]);
        assert_eq!(uvs[3], [0.0, 0.0]);
        assert_eq!(rotate_uvs([1.0, 2.0, 3.0, 4.0], 0)[2], [3.0, 4.0]);
    }

    #[test]
    fn test_uvs_map_into_sprite() {
        let pack = pack_with(cube(true, false));
        let atlas = atlas();
        let sprite = atlas.sprite("minecraft:block/stone").clone();

        let mut cache = ModelCache::new(&pack);
        let id = cache.get_model("block/test").unwrap();
        let model = bake_model(cache.model(id), BlockTransform::default(), &atlas, WHITE);

        for quad in model.all_quads() {
            for vertex in &quad.vertices {
                let [u, v] = vertex.uv;
                assert!(u >= sprite.min_u() && u <= sprite.max_u());
                assert!(v >= sprite.min_v() && v <= sprite.max_v());
            }
        }
        let up = model.quads(Some(Direction::Up))[0];
        assert_eq!(up.vertices[0].uv, [sprite.min_u(), sprite.min_v()]);
        assert_eq!(up.vertices[2].uv, [sprite.max_u(), sprite.max_v()]);
    }

    #[test]
    fn test_y_rotation_moves_cull_buckets() {
        let pack = pack_with(cube(true, false));
        let model = bake(&pack, BlockTransform::new(0, 90), WHITE);

        // The model's north face now faces east.
        let east = model.quads(Some(Direction::East));
        assert_eq!(east.len(), 1);
        assert_eq!(east[0].direction, Direction::East);
        assert!(approx(east[0].vertices[0].normal, [1.0, 0.0, 0.0]));
        for vertex in &east[0].vertices {
            assert!((vertex.position[0] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_x_rotation_moves_up_to_north() {
        let pack = pack_with(cube(true, false));
        let model = bake(&pack, BlockTransform::new(90, 0), WHITE);
        let north = model.quads(Some(Direction::North));
        assert_eq!(north.len(), 1);
        assert_eq!(north[0].direction, Direction::North);
    }

    #[test]
    fn test_tint_only_on_tinted_faces() {
        let tint = [0.5, 0.8, 0.2, 1.0];
        let pack = pack_with(cube(true, true));
        let model = bake(&pack, BlockTransform::default(), tint);

        let up = model.quads(Some(Direction::Up))[0];
        assert_eq!(up.tint_index, 0);
        assert_eq!(up.vertices[0].color, tint);
        let down = model.quads(Some(Direction::Down))[0];
        assert_eq!(down.vertices[0].color, WHITE);
    }

    #[test]
    fn test_element_rotation_tilts_normal() {
        let mut element = cube(false, false);
        element.from = [0.0, 0.0, 8.0];
        element.to = [16.0, 16.0, 8.0];
        element.rotation = Some(crate::types::ElementRotation {
            origin: [8.0, 8.0, 8.0],
            axis: crate::types::Axis::Y,
            angle: 45.0,
            rescale: false,
        });
        let pack = pack_with(element);
        let model = bake(&pack, BlockTransform::default(), WHITE);

        let north = model
            .all_quads()
            .into_iter()
            .find(|q| q.vertices[0].normal[2] < -0.5)
            .unwrap();
        let n = north.vertices[0].normal;
        assert!((n[0].abs() - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn test_missing_model_is_full_cube() {
        let atlas = atlas();
        let model = missing_model(&atlas);
        assert!(model.quads(None).is_empty());
        let missing = atlas.missing_sprite();
        for direction in Direction::ALL {
            let quads = model.quads(Some(direction));
            assert_eq!(quads.len(), 1);
            let [u, _] = quads[0].vertices[0].uv;
            assert!(u >= missing.min_u() && u <= missing.max_u());
        }
    }
}
