//! Frame-scoped quadtree over item centres.
//!
//! The tree snapshots positions when it is built and is never updated afterwards; callers rebuild
//! it every frame. Leaves hold item indices. Points that (nearly) coincide with a leaf's first
//! point, or that reach [`MAX_DEPTH`], share that leaf instead of splitting it again.

use crate::item::Item;

pub const MAX_DEPTH: usize = 32;

/// Manhattan distance under which two points are treated as the same location.
const COINCIDENT_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn around(x: f64, y: f64, half_extent: f64) -> Self {
        Self {
            x1: x - half_extent,
            y1: y - half_extent,
            x2: x + half_extent,
            y2: y + half_extent,
        }
    }

    /// Closed-interval overlap; boxes that only touch still intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.x1 > other.x2 || self.x2 < other.x1 || self.y1 > other.y2 || self.y2 < other.y1)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    fn quadrant(&self, i: usize) -> Bounds {
        let sx = (self.x1 + self.x2) * 0.5;
        let sy = (self.y1 + self.y2) * 0.5;
        match i {
            0 => Bounds {
                x1: self.x1,
                y1: self.y1,
                x2: sx,
                y2: sy,
            },
            1 => Bounds {
                x1: sx,
                y1: self.y1,
                x2: self.x2,
                y2: sy,
            },
            2 => Bounds {
                x1: self.x1,
                y1: sy,
                x2: sx,
                y2: self.y2,
            },
            _ => Bounds {
                x1: sx,
                y1: sy,
                x2: self.x2,
                y2: self.y2,
            },
        }
    }

    fn quadrant_of(&self, x: f64, y: f64) -> usize {
        let sx = (self.x1 + self.x2) * 0.5;
        let sy = (self.y1 + self.y2) * 0.5;
        usize::from(x >= sx) | (usize::from(y >= sy) << 1)
    }
}

#[derive(Debug, Clone)]
pub struct Quad {
    bounds: Bounds,
    depth: usize,
    children: [Option<usize>; 4],
    points: Vec<usize>,
}

impl Quad {
    fn new(bounds: Bounds, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            children: [None; 4],
            points: Vec::new(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Item indices stored here; empty for internal quads.
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Quadtree {
    quads: Vec<Quad>,
    positions: Vec<(f64, f64)>,
    len: usize,
    max_size: f64,
}

impl Quadtree {
    /// Indexes every item with a finite centre. Item `i` is stored as index `i`.
    pub fn build<T>(items: &[Item<T>]) -> Self {
        let positions: Vec<(f64, f64)> = items.iter().map(|it| (it.x, it.y)).collect();
        let mut tree = Self::from_points(positions);
        tree.max_size = items
            .iter()
            .map(|it| it.size)
            .filter(|s| s.is_finite())
            .fold(0.0, f64::max);
        tree
    }

    /// Indexes raw points; point `i` is stored as index `i`. Non-finite points are left out.
    pub fn from_points(positions: Vec<(f64, f64)>) -> Self {
        let mut tree = Self {
            quads: Vec::new(),
            positions,
            len: 0,
            max_size: 0.0,
        };

        let finite = |&(x, y): &(f64, f64)| x.is_finite() && y.is_finite();
        let mut x1 = f64::INFINITY;
        let mut y1 = f64::INFINITY;
        let mut x2 = f64::NEG_INFINITY;
        let mut y2 = f64::NEG_INFINITY;
        for &(x, y) in tree.positions.iter().filter(|&p| finite(p)) {
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);
        }
        if !(x1.is_finite() && y1.is_finite()) {
            return tree;
        }

        // Square root cell, sized by the larger extent.
        let dx = x2 - x1;
        let dy = y2 - y1;
        if dx > dy {
            y2 = y1 + dx;
        } else {
            x2 = x1 + dy;
        }
        tree.quads.push(Quad::new(Bounds { x1, y1, x2, y2 }, 0));

        for idx in 0..tree.positions.len() {
            if finite(&tree.positions[idx]) {
                tree.insert(idx);
            }
        }
        tree
    }

    fn insert(&mut self, idx: usize) {
        let (x, y) = self.positions[idx];
        let mut q = 0;
        loop {
            let quad = &self.quads[q];
            if !quad.is_leaf() {
                q = self.child_for(q, x, y);
                continue;
            }

            let shares_leaf = match quad.points.first() {
                None => true,
                Some(&first) => {
                    let (fx, fy) = self.positions[first];
                    quad.depth >= MAX_DEPTH || (fx - x).abs() + (fy - y).abs() < COINCIDENT_EPSILON
                }
            };
            if shares_leaf {
                self.quads[q].points.push(idx);
                self.len += 1;
                return;
            }

            // Split the leaf: push its points one level down, then descend.
            let moved = std::mem::take(&mut self.quads[q].points);
            for p in moved {
                let (px, py) = self.positions[p];
                let child = self.child_for(q, px, py);
                self.quads[child].points.push(p);
            }
            q = self.child_for(q, x, y);
        }
    }

    fn child_for(&mut self, q: usize, x: f64, y: f64) -> usize {
        let bounds = self.quads[q].bounds;
        let i = bounds.quadrant_of(x, y);
        if let Some(child) = self.quads[q].children[i] {
            return child;
        }
        let child = self.quads.len();
        let depth = self.quads[q].depth + 1;
        self.quads.push(Quad::new(bounds.quadrant(i), depth));
        self.quads[q].children[i] = Some(child);
        child
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest finite item size seen by [`Quadtree::build`]; `0` for raw point trees.
    pub fn max_size(&self) -> f64 {
        self.max_size
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.quads.first().map(Quad::bounds)
    }

    /// Position of point `idx` as it was when the tree was built.
    pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
        self.positions.get(idx).copied()
    }

    /// Pre-order traversal. Returning `true` from `f` skips the quad's children.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&Quad) -> bool,
    {
        if self.quads.is_empty() {
            return;
        }
        let mut stack = vec![0usize];
        while let Some(q) = stack.pop() {
            let quad = &self.quads[q];
            if f(quad) {
                continue;
            }
            for child in quad.children.iter().rev().flatten() {
                stack.push(*child);
            }
        }
    }

    /// Indices of the points inside `area`, visiting only quads that intersect it.
    pub fn query(&self, area: Bounds) -> Vec<usize> {
        let mut found = Vec::new();
        self.visit(|quad| {
            for &p in quad.points() {
                let (x, y) = self.positions[p];
                if area.contains(x, y) {
                    found.push(p);
                }
            }
            !quad.bounds().intersects(&area)
        });
        found
    }
}
