//! Baked geometry handed to the renderer.

use crate::types::Direction;
use std::sync::Arc;

/// One corner of a baked quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BakedVertex {
    /// Block-local position (0-1 for unrotated full cubes).
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// RGBA color multiplier.
    pub color: [f32; 4],
    /// Atlas UV.
    pub uv: [f32; 2],
}

/// A textured quad, vertices in clockwise order seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct BakedQuad {
    pub vertices: [BakedVertex; 4],
    pub tint_index: i32,
    /// Facing of the quad after element and variant rotation.
    pub direction: Direction,
    pub shade: bool,
}

/// A weighted alternative inside [`BakedModel::Weighted`].
#[derive(Debug, Clone)]
pub struct WeightedModel {
    pub weight: u32,
    pub model: Arc<BakedModel>,
}

/// The drawable geometry of one block state.
#[derive(Debug, Clone)]
pub enum BakedModel {
    /// Quads bucketed by the neighbor that hides them.
    Simple {
        ambient_occlusion: bool,
        /// Always drawn.
        unculled: Vec<BakedQuad>,
        /// `culled[d]` is hidden when the neighbor in direction `d` is opaque.
        culled: [Vec<BakedQuad>; 6],
    },
    /// Alternatives picked by weight; drawing uses the first.
    Weighted(Vec<WeightedModel>),
    /// Every part drawn, in selection order.
    MultiPart(Vec<Arc<BakedModel>>),
}

impl BakedModel {
    /// A simple model with no quads.
    pub fn empty() -> Self {
        BakedModel::Simple {
            ambient_occlusion: true,
            unculled: Vec::new(),
            culled: Default::default(),
        }
    }

    /// Quads to draw for one cull bucket (`None` for the always-drawn set).
    pub fn quads(&self, face: Option<Direction>) -> Vec<&BakedQuad> {
        let mut out = Vec::new();
        self.collect_quads(face, &mut out);
        out
    }

    fn collect_quads<'a>(&'a self, face: Option<Direction>, out: &mut Vec<&'a BakedQuad>) {
        match self {
            BakedModel::Simple {
                unculled, culled, ..
            } => {
                let bucket = match face {
                    None => unculled,
                    Some(direction) => &culled[direction.index()],
                };
                out.extend(bucket.iter());
            }
            BakedModel::Weighted(entries) => {
                if let Some(first) = entries.first() {
                    first.model.collect_quads(face, out);
                }
            }
            BakedModel::MultiPart(parts) => {
                for part in parts {
                    part.collect_quads(face, out);
                }
            }
        }
    }

    /// Every quad across all buckets.
    pub fn all_quads(&self) -> Vec<&BakedQuad> {
        let mut out = self.quads(None);
        for direction in Direction::ALL {
            out.extend(self.quads(Some(direction)));
        }
        out
    }

    /// Whether the model should be lit with ambient occlusion.
    pub fn ambient_occlusion(&self) -> bool {
        match self {
            BakedModel::Simple {
                ambient_occlusion, ..
            } => *ambient_occlusion,
            BakedModel::Weighted(entries) => entries
                .first()
                .map(|e| e.model.ambient_occlusion())
                .unwrap_or(true),
            BakedModel::MultiPart(parts) => parts
                .first()
                .map(|p| p.ambient_occlusion())
                .unwrap_or(true),
        }
    }

    /// Total number of quads reachable through [`BakedModel::quads`].
    pub fn quad_count(&self) -> usize {
        self.all_quads().len()
    }
}
