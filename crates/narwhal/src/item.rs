use serde::{Deserialize, Serialize};

/// Centre position plus size (circle radius, or half the side of a square).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// One simulated shape.
///
/// Identity is the item's index in the simulation's item slice; two items with equal state are
/// still distinct. The target is fixed at ingestion, only the live `x`/`y`/`size` evolve.
#[derive(Debug, Clone)]
pub struct Item<T> {
    pub datum: T,
    target: Placement,
    start: Placement,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    // Position at the end of the previous driver step, for friction carry-over.
    pub(crate) px: f64,
    pub(crate) py: f64,
}

impl<T> Item<T> {
    pub fn new(datum: T, target: Placement, start: Placement) -> Self {
        Self {
            datum,
            target,
            start,
            x: start.x,
            y: start.y,
            size: start.size,
            px: start.x,
            py: start.y,
        }
    }

    pub fn target(&self) -> Placement {
        self.target
    }

    pub fn start(&self) -> Placement {
        self.start
    }

    pub fn placement(&self) -> Placement {
        Placement {
            x: self.x,
            y: self.y,
            size: self.size,
        }
    }

    /// Moves the live position without leaving a displacement for friction to carry over, the
    /// way a drag or pin should.
    pub fn place_at(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.px = x;
        self.py = y;
    }

    pub(crate) fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, Placement};

    #[test]
    fn live_state_starts_at_the_start_placement() {
        let target = Placement {
            x: 10.0,
            y: 20.0,
            size: 5.0,
        };
        let start = Placement {
            x: 0.0,
            y: 1.0,
            size: 2.0,
        };
        let mut item = Item::new((), target, start);
        assert_eq!(item.placement(), start);

        item.move_by(3.0, -1.0);
        assert_eq!((item.x, item.y), (3.0, 0.0));
        assert_eq!(item.target(), target);
        assert_eq!(item.start(), start);

        item.place_at(-5.0, 5.0);
        assert_eq!((item.x, item.y, item.px, item.py), (-5.0, 5.0, -5.0, 5.0));
    }
}
