use crate::accessor::GravityResponse;
use crate::item::Item;

/// Restoring pull of each item's live state toward its target.
#[derive(Debug, Clone)]
pub struct GravityField<T> {
    pub x: GravityResponse<T>,
    pub y: GravityResponse<T>,
    pub size: GravityResponse<T>,
}

impl<T> Default for GravityField<T> {
    fn default() -> Self {
        Self::new(
            GravityResponse::Linear,
            GravityResponse::Linear,
            GravityResponse::Linear,
        )
    }
}

impl<T> GravityField<T> {
    pub fn new(x: GravityResponse<T>, y: GravityResponse<T>, size: GravityResponse<T>) -> Self {
        Self { x, y, size }
    }

    /// Moves one item toward its target with intensity `k`.
    pub fn apply(&self, item: &mut Item<T>, k: f64) {
        let target = item.target();
        let dx = target.x - item.x;
        let dy = target.y - item.y;
        let dr = target.size - item.size;

        item.x += self.x.respond(dx, k, &item.datum);
        item.y += self.y.respond(dy, k, &item.datum);
        item.size += self.size.respond(dr, k, &item.datum);
    }

    pub fn apply_all(&self, items: &mut [Item<T>], k: f64) {
        for item in items.iter_mut() {
            self.apply(item, k);
        }
    }
}
