use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverOptions {
    /// Intensity set by `start`/`resume`.
    pub alpha: f64,
    /// Multiplier applied to alpha before every frame; must be in `(0, 1)`.
    pub alpha_decay: f64,
    /// The driver ends once alpha drops below this; must be positive.
    pub alpha_min: f64,
    /// Fraction of last frame's displacement carried into the next one. `0` disables it.
    pub friction: f64,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            alpha_decay: 0.99,
            alpha_min: 0.005,
            friction: 0.0,
        }
    }
}

impl DriverOptions {
    pub fn validate(&self) -> Result<()> {
        let finite_non_negative = |v: f64| v.is_finite() && v >= 0.0;
        if !finite_non_negative(self.alpha) {
            return Err(Error::InvalidDriver {
                field: "alpha",
                value: self.alpha,
            });
        }
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            return Err(Error::InvalidDriver {
                field: "alphaDecay",
                value: self.alpha_decay,
            });
        }
        if !(self.alpha_min.is_finite() && self.alpha_min > 0.0) {
            return Err(Error::InvalidDriver {
                field: "alphaMin",
                value: self.alpha_min,
            });
        }
        if !(finite_non_negative(self.friction) && self.friction <= 1.0) {
            return Err(Error::InvalidDriver {
                field: "friction",
                value: self.friction,
            });
        }
        Ok(())
    }
}

/// Frame clock with a geometrically decaying intensity.
#[derive(Debug, Clone)]
pub struct Driver {
    opts: DriverOptions,
    alpha: f64,
    ticks: usize,
}

impl Driver {
    /// A stopped driver; call [`Driver::start`] to begin ticking.
    pub fn new(opts: DriverOptions) -> Self {
        Self {
            opts,
            alpha: 0.0,
            ticks: 0,
        }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.opts
    }

    pub fn start(&mut self) {
        self.alpha = self.opts.alpha;
        self.ticks = 0;
    }

    /// Reheats to the initial alpha without resetting the tick count.
    pub fn resume(&mut self) {
        self.alpha = self.opts.alpha;
    }

    pub fn stop(&mut self) {
        self.alpha = 0.0;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.alpha > 0.0
    }

    /// Frames produced since the last `start`.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Decays alpha and returns the intensity for the next frame, or `None` once it has dropped
    /// below `alpha_min` (alpha is then pinned to `0`). Alpha that no longer decreases, such as
    /// a subnormal value under an unvalidated zero `alpha_min`, also ends the driver.
    pub fn step(&mut self) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        let prev = self.alpha;
        self.alpha *= self.opts.alpha_decay;
        if self.alpha < self.opts.alpha_min || self.alpha <= 0.0 || self.alpha >= prev {
            self.alpha = 0.0;
            tracing::debug!(ticks = self.ticks, "driver ended");
            return None;
        }
        self.ticks += 1;
        Some(self.alpha)
    }

    /// Carries `friction` of each item's last displacement forward and records the current
    /// position for the next frame.
    pub fn integrate<T>(&self, items: &mut [Item<T>]) {
        let friction = self.opts.friction;
        for item in items.iter_mut() {
            let vx = item.x - item.px;
            let vy = item.y - item.py;
            item.px = item.x;
            item.py = item.y;
            if friction != 0.0 {
                item.move_by(vx * friction, vy * friction);
            }
        }
    }
}
