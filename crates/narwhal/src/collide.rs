use crate::config::Shape;
use crate::item::Item;
use crate::quadtree::{Bounds, Quadtree};

/// Separates overlapping items, one node at a time, using a frame's [`Quadtree`].
///
/// Each overlapping pair is pushed apart by `strength` times its penetration depth; `node` moves
/// by `-push` and the other item by `+push`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    pub shape: Shape,
    pub padding: f64,
    pub strength: f64,
}

impl CollisionResolver {
    pub fn new(shape: Shape, padding: f64, strength: f64) -> Self {
        Self {
            shape,
            padding,
            strength,
        }
    }

    pub fn resolve_all<T>(&self, items: &mut [Item<T>], index: &Quadtree) {
        for node in 0..items.len() {
            self.resolve(items, index, node);
        }
    }

    /// Resolves every overlap between `items[node]` and the items `index` finds near it.
    pub fn resolve<T>(&self, items: &mut [Item<T>], index: &Quadtree, node: usize) {
        let Some(area) = self.search_area(items, index, node) else {
            return;
        };
        let k = self.strength;
        index.visit(|quad| {
            for &p in quad.points() {
                if p == node || p >= items.len() {
                    continue;
                }
                let nr = items[node].size + self.padding;
                let n = (items[node].x, items[node].y);
                let other = (items[p].x, items[p].y, items[p].size);
                let push = match self.shape {
                    Shape::Circle => circle_push(n, nr, other, k),
                    Shape::Square => square_push(n, nr, other, k),
                };
                if let Some((px, py)) = push {
                    items[node].move_by(-px, -py);
                    items[p].move_by(px, py);
                }
            }
            !quad.bounds().intersects(&area)
        });
    }

    /// Items currently overlapping `items[node]`, found through the same pruned traversal that
    /// [`CollisionResolver::resolve`] uses. Nothing is moved.
    pub fn overlapping<T>(&self, items: &[Item<T>], index: &Quadtree, node: usize) -> Vec<usize> {
        let mut found = Vec::new();
        let Some(area) = self.search_area(items, index, node) else {
            return found;
        };
        let nr = items[node].size + self.padding;
        let n = (items[node].x, items[node].y);
        index.visit(|quad| {
            for &p in quad.points() {
                if p == node || p >= items.len() {
                    continue;
                }
                let other = (items[p].x, items[p].y, items[p].size);
                if self.overlaps(n, nr, other) {
                    found.push(p);
                }
            }
            !quad.bounds().intersects(&area)
        });
        found
    }

    pub fn overlaps(&self, node: (f64, f64), nr: f64, other: (f64, f64, f64)) -> bool {
        let dx = node.0 - other.0;
        let dy = node.1 - other.1;
        let r = nr + other.2;
        match self.shape {
            Shape::Circle => dx * dx + dy * dy < r * r,
            Shape::Square => dx.abs() < r && dy.abs() < r,
        }
    }

    // The box around the node is widened by the largest size in the index so a big neighbour
    // whose centre lies outside `node ± nr` is still reached.
    fn search_area<T>(&self, items: &[Item<T>], index: &Quadtree, node: usize) -> Option<Bounds> {
        let it = items.get(node)?;
        let reach = it.size + self.padding + index.max_size();
        if !(it.x.is_finite() && it.y.is_finite() && reach.is_finite()) {
            return None;
        }
        Some(Bounds::around(it.x, it.y, reach))
    }
}

/// Circle overlap: the push for the other item along the line between centres, or `None` when
/// the circles do not overlap.
///
/// Coincident centres have no direction; the pair is then split along the x axis, the node
/// moving `+r * k` and the other item `-r * k`.
pub fn circle_push(
    node: (f64, f64),
    nr: f64,
    other: (f64, f64, f64),
    k: f64,
) -> Option<(f64, f64)> {
    let dx = node.0 - other.0;
    let dy = node.1 - other.1;
    let dist_sq = dx * dx + dy * dy;
    let r = nr + other.2;
    if !(dist_sq < r * r) {
        return None;
    }
    if dist_sq == 0.0 {
        return Some((-r * k, 0.0));
    }
    let dist = dist_sq.sqrt();
    let l = (dist - r) / dist * k;
    Some((dx * l, dy * l))
}

/// Square overlap: pushes along the axis on which the pair is further apart, one axis per call.
pub fn square_push(
    node: (f64, f64),
    nr: f64,
    other: (f64, f64, f64),
    k: f64,
) -> Option<(f64, f64)> {
    let dx = node.0 - other.0;
    let dy = node.1 - other.1;
    let lx = dx.abs();
    let ly = dy.abs();
    let r = nr + other.2;
    if !(lx < r && ly < r) {
        return None;
    }
    if lx > ly {
        Some(((lx - r) * if dx < 0.0 { -k } else { k }, 0.0))
    } else {
        Some((0.0, (ly - r) * if dy < 0.0 { -k } else { k }))
    }
}

#[cfg(test)]
mod tests {
    use super::{CollisionResolver, circle_push, square_push};
    use crate::config::Shape;
    use crate::item::{Item, Placement};
    use crate::quadtree::Quadtree;

    fn at(x: f64, y: f64, size: f64) -> Item<()> {
        let p = Placement { x, y, size };
        Item::new((), p, p)
    }

    #[test]
    fn circle_scenario_resolves_half_the_penetration_per_side() {
        // radius 10 at (0,0) and (15,0): dist 15, rSum 20, factor (15-20)/15*0.5.
        let (px, py) = circle_push((0.0, 0.0), 10.0, (15.0, 0.0, 10.0), 0.5).expect("overlap");
        let factor: f64 = (15.0 - 20.0) / 15.0 * 0.5;
        assert!((factor + 1.0 / 6.0).abs() < 1e-12);
        assert!((px - (-15.0 * factor)).abs() < 1e-12);
        assert_eq!(py, 0.0);

        let mut items = vec![at(0.0, 0.0, 10.0), at(15.0, 0.0, 10.0)];
        let index = Quadtree::build(&items);
        CollisionResolver::new(Shape::Circle, 0.0, 0.5).resolve(&mut items, &index, 0);
        assert!((items[0].x + 2.5).abs() < 1e-12);
        assert!((items[1].x - 17.5).abs() < 1e-12);
    }

    #[test]
    fn circle_displacements_are_exact_negations() {
        let mut items = vec![at(3.0, -2.0, 6.0), at(7.0, 1.0, 4.0)];
        let before: Vec<(f64, f64)> = items.iter().map(|i| (i.x, i.y)).collect();
        let index = Quadtree::build(&items);
        CollisionResolver::new(Shape::Circle, 1.0, 0.5).resolve(&mut items, &index, 0);

        let d0 = (items[0].x - before[0].0, items[0].y - before[0].1);
        let d1 = (items[1].x - before[1].0, items[1].y - before[1].1);
        assert!(d0.0 != 0.0 || d0.1 != 0.0);
        assert!((d0.0 + d1.0).abs() < 1e-12);
        assert!((d0.1 + d1.1).abs() < 1e-12);
    }

    #[test]
    fn separated_circles_are_left_alone() {
        assert_eq!(circle_push((0.0, 0.0), 5.0, (10.0, 0.0, 5.0), 0.5), None);
        assert_eq!(circle_push((0.0, 0.0), 5.0, (30.0, 0.0, 5.0), 0.5), None);
    }

    #[test]
    fn coincident_circles_split_along_x() {
        let push = circle_push((4.0, 4.0), 5.0, (4.0, 4.0, 5.0), 0.5).expect("overlap");
        assert_eq!(push, (-5.0, 0.0));

        let mut items = vec![at(4.0, 4.0, 5.0), at(4.0, 4.0, 5.0)];
        let index = Quadtree::build(&items);
        CollisionResolver::new(Shape::Circle, 0.0, 0.5).resolve(&mut items, &index, 0);
        assert!(items.iter().all(|i| i.x.is_finite() && i.y.is_finite()));
        assert_eq!(items[0].x, 9.0);
        assert_eq!(items[1].x, -1.0);
    }

    #[test]
    fn square_pushes_along_the_more_separated_axis_only() {
        // lx = 8 > ly = 2, rSum = 10: push along x by (8 - 10) * -k for dx < 0.
        let push = square_push((0.0, 0.0), 5.0, (8.0, 2.0, 5.0), 0.5).expect("overlap");
        assert_eq!(push, (1.0, 0.0));

        let push = square_push((0.0, 0.0), 5.0, (2.0, -8.0, 5.0), 0.5).expect("overlap");
        assert_eq!(push, (0.0, -1.0));

        // Corners apart on both axes are not an overlap.
        assert_eq!(square_push((0.0, 0.0), 5.0, (10.0, 3.0, 5.0), 0.5), None);
    }

    #[test]
    fn coincident_squares_split_along_y() {
        let push = square_push((1.0, 1.0), 2.0, (1.0, 1.0, 2.0), 0.5).expect("overlap");
        assert_eq!(push, (0.0, -2.0));
    }

    #[test]
    fn self_is_never_a_neighbour() {
        let items = vec![at(0.0, 0.0, 5.0)];
        let index = Quadtree::build(&items);
        let resolver = CollisionResolver::new(Shape::Circle, 3.0, 0.5);
        assert!(resolver.overlapping(&items, &index, 0).is_empty());
    }

    #[test]
    fn large_neighbour_outside_the_node_box_is_still_found() {
        // The big item's leaf sits under a quad that does not touch `node ± nr`.
        let mut items = vec![
            at(0.0, 0.0, 1.0),
            at(40.0, 0.0, 50.0),
            at(70.0, 30.0, 1.0),
            at(300.0, 300.0, 1.0),
        ];
        let index = Quadtree::build(&items);
        let resolver = CollisionResolver::new(Shape::Circle, 0.0, 0.5);
        assert_eq!(resolver.overlapping(&items, &index, 0), vec![1]);

        resolver.resolve(&mut items, &index, 0);
        assert!(items[0].x < 0.0);
        assert!(items[1].x > 40.0);
    }

    #[test]
    fn overlapping_matches_brute_force() {
        let items: Vec<Item<()>> = (0..300)
            .map(|i| {
                let t = i as f64;
                at(
                    (t * 37.0) % 211.0,
                    (t * 53.0) % 197.0,
                    1.0 + (t * 7.0) % 9.0,
                )
            })
            .collect();
        let index = Quadtree::build(&items);
        for shape in [Shape::Circle, Shape::Square] {
            let resolver = CollisionResolver::new(shape, 3.0, 0.5);
            for node in 0..items.len() {
                let mut got = resolver.overlapping(&items, &index, node);
                got.sort_unstable();
                let n = (items[node].x, items[node].y);
                let nr = items[node].size + 3.0;
                let expected: Vec<usize> = (0..items.len())
                    .filter(|&p| p != node)
                    .filter(|&p| resolver.overlaps(n, nr, (items[p].x, items[p].y, items[p].size)))
                    .collect();
                assert_eq!(got, expected, "{shape} node {node}");
            }
        }
    }
}
