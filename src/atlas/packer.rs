//! Growable rectangle packer.
//!
//! Rectangles are placed largest-first into a list of binary space partition
//! trees. When nothing fits, the canvas grows along whichever axis keeps its
//! power-of-two footprint, and the new strip becomes another tree.

use crate::error::{BakeryError, Result};

/// A rectangle to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rectangle {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// A placed rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedRect {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PackedRect {
    /// Whether two placements share any pixel.
    pub fn overlaps(&self, other: &PackedRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Result of a packing run.
#[derive(Debug, Clone, Default)]
pub struct Packing {
    /// Placements in placement order (largest first).
    pub placements: Vec<PackedRect>,
    /// Canvas width, a power of two.
    pub width: u32,
    /// Canvas height, a power of two.
    pub height: u32,
}

impl Packing {
    /// Placement for a rectangle name.
    pub fn get(&self, name: &str) -> Option<&PackedRect> {
        self.placements.iter().find(|p| p.name == name)
    }
}

/// A region of the canvas: empty, holding one rectangle, or split in two.
#[derive(Debug)]
struct PackerNode {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    occupied: bool,
    children: Option<Box<[PackerNode; 2]>>,
}

impl PackerNode {
    fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            occupied: false,
            children: None,
        }
    }

    /// Place a `width` x `height` rectangle somewhere in this subtree,
    /// depth-first, returning its top-left corner.
    fn insert(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if let Some(children) = self.children.as_mut() {
            return children[0]
                .insert(width, height)
                .or_else(|| children[1].insert(width, height));
        }

        if self.occupied || width > self.width || height > self.height {
            return None;
        }

        if width == self.width && height == self.height {
            self.occupied = true;
            return Some((self.x, self.y));
        }

        let (first, second) = if width < self.width {
            // Column exactly as wide as the rectangle, residual strip to the right.
            (
                PackerNode::new(self.x, self.y, width, self.height),
                PackerNode::new(self.x + width, self.y, self.width - width, self.height),
            )
        } else {
            // Cell exactly as tall as the rectangle, residual strip below.
            (
                PackerNode::new(self.x, self.y, self.width, height),
                PackerNode::new(self.x, self.y + height, self.width, self.height - height),
            )
        };
        let children = self.children.insert(Box::new([first, second]));
        children[0].insert(width, height)
    }
}

/// Packs named rectangles into a growable power-of-two canvas.
#[derive(Debug, Default)]
pub struct RectanglePacker {
    max_size: Option<u32>,
    width: u32,
    height: u32,
    regions: Vec<PackerNode>,
}

impl RectanglePacker {
    /// A packer with an unbounded canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// A packer that fails once the canvas would exceed `max_size` on either axis.
    pub fn with_max_size(max_size: u32) -> Self {
        Self {
            max_size: Some(max_size),
            ..Self::default()
        }
    }

    /// Place every rectangle.
    ///
    /// Rectangles are sorted by decreasing height then decreasing width; ties
    /// keep their input order so layouts are reproducible.
    pub fn pack(mut self, rectangles: Vec<Rectangle>) -> Result<Packing> {
        let mut order: Vec<Rectangle> = rectangles;
        order.sort_by(|a, b| b.height.cmp(&a.height).then(b.width.cmp(&a.width)));

        let mut placements = Vec::with_capacity(order.len());
        for rect in order {
            if rect.width == 0 || rect.height == 0 {
                return Err(BakeryError::PackingFailed(format!(
                    "'{}' has zero size {}x{}",
                    rect.name, rect.width, rect.height
                )));
            }

            let (x, y) = match self.insert(rect.width, rect.height) {
                Some(corner) => corner,
                None => self.grow(rect.width, rect.height)?,
            };
            placements.push(PackedRect {
                name: rect.name,
                x,
                y,
                width: rect.width,
                height: rect.height,
            });
        }

        Ok(Packing {
            placements,
            width: self.width.next_power_of_two(),
            height: self.height.next_power_of_two(),
        })
    }

    fn insert(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        self.regions
            .iter_mut()
            .find_map(|region| region.insert(width, height))
    }

    /// Extend the canvas to make room for a rectangle and place it there.
    fn grow(&mut self, width: u32, height: u32) -> Result<(u32, u32)> {
        let (old_w, old_h) = (self.width, self.height);

        let mut strip = if self.regions.is_empty() {
            self.width = width;
            self.height = height;
            PackerNode::new(0, 0, width, height)
        } else {
            let current = (old_w.next_power_of_two(), old_h.next_power_of_two());
            let right = (old_w + width, old_h.max(height));
            let down = (old_w.max(width), old_h + height);
            let jumps = |(w, h): (u32, u32)| {
                (w.next_power_of_two(), h.next_power_of_two()) != current
            };

            let grow_right = match (jumps(right), jumps(down)) {
                (false, true) => true,
                (true, false) => false,
                _ => old_w <= old_h,
            };

            if grow_right {
                self.width = right.0;
                self.height = right.1;
                if height > old_h {
                    self.regions
                        .push(PackerNode::new(0, old_h, old_w, height - old_h));
                }
                PackerNode::new(old_w, 0, width, self.height)
            } else {
                self.width = down.0;
                self.height = down.1;
                if width > old_w {
                    self.regions
                        .push(PackerNode::new(old_w, 0, width - old_w, old_h));
                }
                PackerNode::new(0, old_h, self.width, height)
            }
        };

        if let Some(max) = self.max_size {
            if self.width.next_power_of_two() > max || self.height.next_power_of_two() > max {
                return Err(BakeryError::PackingFailed(format!(
                    "canvas {}x{} exceeds the maximum size {}",
                    self.width, self.height, max
                )));
            }
        }

        let corner = strip.insert(width, height).ok_or_else(|| {
            BakeryError::PackingFailed(format!(
                "{}x{} does not fit its own growth strip",
                width, height
            ))
        })?;
        self.regions.push(strip);
        Ok(corner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_no_overlaps(packing: &Packing) {
        for (i, a) in packing.placements.iter().enumerate() {
            for b in &packing.placements[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
            assert!(a.x + a.width <= packing.width);
            assert!(a.y + a.height <= packing.height);
        }
    }

    #[test]
    fn test_three_squares() {
        let packing = RectanglePacker::new()
            .pack(vec![
                Rectangle::new("C", 16, 16),
                Rectangle::new("A", 64, 64),
                Rectangle::new("B", 32, 32),
            ])
            .unwrap();

        let names: Vec<_> = packing.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(packing.get("A").map(|p| (p.x, p.y)), Some((0, 0)));
        assert_eq!(packing.get("B").map(|p| (p.x, p.y)), Some((64, 0)));
        assert_eq!(packing.get("C").map(|p| (p.x, p.y)), Some((64, 32)));
        assert_eq!((packing.width, packing.height), (128, 64));
        assert_no_overlaps(&packing);
    }

    #[test]
    fn test_equal_sizes_keep_input_order() {
        let packing = RectanglePacker::new()
            .pack(vec![
                Rectangle::new("first", 16, 16),
                Rectangle::new("second", 16, 16),
                Rectangle::new("third", 16, 16),
                Rectangle::new("fourth", 16, 16),
            ])
            .unwrap();

        let names: Vec<_> = packing.placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
        assert_eq!((packing.width, packing.height), (32, 32));
        assert_no_overlaps(&packing);
    }

    #[test]
    fn test_growth_prefers_axis_without_pow2_jump() {
        // 48x16 rounds to 64x16; growing right stays at 64x16, growing down
        // would become 64x32.
        let packing = RectanglePacker::new()
            .pack(vec![Rectangle::new("wide", 48, 16), Rectangle::new("small", 16, 16)])
            .unwrap();
        let small = packing.get("small").unwrap();
        assert_eq!((small.x, small.y), (48, 0));
        assert_eq!((packing.width, packing.height), (64, 16));
    }

    #[test]
    fn test_growth_falls_back_to_shorter_side() {
        // Both directions jump a power of two; the canvas is shorter than wide.
        let packing = RectanglePacker::new()
            .pack(vec![Rectangle::new("wide", 32, 16), Rectangle::new("small", 16, 16)])
            .unwrap();
        let small = packing.get("small").unwrap();
        assert_eq!((small.x, small.y), (0, 16));
        assert_eq!((packing.width, packing.height), (32, 32));
    }

    #[test]
    fn test_residual_space_is_reused() {
        let packing = RectanglePacker::new()
            .pack(vec![
                Rectangle::new("tall", 16, 32),
                Rectangle::new("a", 16, 16),
                Rectangle::new("b", 16, 16),
            ])
            .unwrap();
        assert_eq!((packing.width, packing.height), (32, 32));
        assert_no_overlaps(&packing);
    }

    #[test]
    fn test_non_square_canvas_rounds_up() {
        let packing = RectanglePacker::new()
            .pack(vec![Rectangle::new("odd", 17, 5)])
            .unwrap();
        assert_eq!((packing.width, packing.height), (32, 8));
    }

    #[test]
    fn test_zero_size_rejected() {
        let result = RectanglePacker::new().pack(vec![Rectangle::new("empty", 0, 4)]);
        assert!(matches!(result, Err(BakeryError::PackingFailed(_))));
    }

    #[test]
    fn test_max_size_enforced() {
        let result = RectanglePacker::with_max_size(32).pack(vec![
            Rectangle::new("a", 32, 32),
            Rectangle::new("b", 32, 32),
        ]);
        assert!(matches!(result, Err(BakeryError::PackingFailed(_))));
    }

    #[test]
    fn test_empty_input() {
        let packing = RectanglePacker::new().pack(Vec::new()).unwrap();
        assert!(packing.placements.is_empty());
        assert_eq!((packing.width, packing.height), (1, 1));
    }
}
