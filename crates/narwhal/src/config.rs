use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::accessor::{Accessor, GravityResponse};
use crate::driver::DriverOptions;
use crate::error::{Error, Result};
use crate::item::Item;

/// Called after every frame with the updated items.
pub type TickHook<T> = Arc<dyn Fn(&[Item<T>]) + Send + Sync>;

/// Geometry of every item, which also selects the collision rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// `size` is the radius.
    Circle,
    /// `size` is the half-extent of an axis-aligned square.
    Square,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
        }
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            other => Err(Error::UnknownShape {
                shape: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closure-free part of [`ChartConfig`], suitable for JSON.
///
/// `shape` stays a string here so an unrecognized value survives loading and is reported when
/// the simulation starts instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub draggable: bool,
    pub shape: String,
    pub gravity_scale: f64,
    pub collide_strength: f64,
    pub random_seed: u64,
    pub driver: DriverOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            padding: 3.0,
            draggable: true,
            shape: Shape::Circle.as_str().to_string(),
            gravity_scale: 0.1,
            collide_strength: 0.5,
            random_seed: 0,
            driver: DriverOptions::default(),
        }
    }
}

impl ChartOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Everything a [`Simulation`](crate::Simulation) needs, closures included.
pub struct ChartConfig<T> {
    pub width: f64,
    pub height: f64,
    /// Extra clearance added around each item when testing for overlap.
    pub padding: f64,
    /// Hosts with pointer input should only offer dragging when this is set.
    pub draggable: bool,
    /// `"circle"` or `"square"`; anything else disables collision resolution.
    pub shape: String,
    pub x: Accessor<T>,
    pub y: Accessor<T>,
    pub r: Accessor<T>,
    /// `None` means target x plus uniform jitter in `[-25, 25)`.
    pub x_start: Option<Accessor<T>>,
    /// `None` means target y plus uniform jitter in `[-25, 25)`.
    pub y_start: Option<Accessor<T>>,
    /// `None` means the target size.
    pub r_start: Option<Accessor<T>>,
    pub x_gravity: GravityResponse<T>,
    pub y_gravity: GravityResponse<T>,
    pub r_gravity: GravityResponse<T>,
    pub tick_update: Option<TickHook<T>>,
    /// Gravity intensity per frame is `alpha * gravity_scale`.
    pub gravity_scale: f64,
    /// Fraction of the penetration depth resolved per overlapping pair per frame.
    pub collide_strength: f64,
    pub random_seed: u64,
    pub driver: DriverOptions,
}

impl<T> ChartConfig<T> {
    pub fn new(
        x: impl Into<Accessor<T>>,
        y: impl Into<Accessor<T>>,
        r: impl Into<Accessor<T>>,
    ) -> Self {
        let opts = ChartOptions::default();
        Self {
            width: opts.width,
            height: opts.height,
            padding: opts.padding,
            draggable: opts.draggable,
            shape: opts.shape,
            x: x.into(),
            y: y.into(),
            r: r.into(),
            x_start: None,
            y_start: None,
            r_start: None,
            x_gravity: GravityResponse::Linear,
            y_gravity: GravityResponse::Linear,
            r_gravity: GravityResponse::Linear,
            tick_update: None,
            gravity_scale: opts.gravity_scale,
            collide_strength: opts.collide_strength,
            random_seed: opts.random_seed,
            driver: opts.driver,
        }
    }

    /// Reads target x/y/size through closures.
    pub fn from_fns(
        x: impl Fn(&T) -> f64 + Send + Sync + 'static,
        y: impl Fn(&T) -> f64 + Send + Sync + 'static,
        r: impl Fn(&T) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            Accessor::function(x),
            Accessor::function(y),
            Accessor::function(r),
        )
    }

    pub fn with_options(mut self, opts: &ChartOptions) -> Self {
        self.width = opts.width;
        self.height = opts.height;
        self.padding = opts.padding;
        self.draggable = opts.draggable;
        self.shape = opts.shape.clone();
        self.gravity_scale = opts.gravity_scale;
        self.collide_strength = opts.collide_strength;
        self.random_seed = opts.random_seed;
        self.driver = opts.driver.clone();
        self
    }

    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            padding: self.padding,
            draggable: self.draggable,
            shape: self.shape.clone(),
            gravity_scale: self.gravity_scale,
            collide_strength: self.collide_strength,
            random_seed: self.random_seed,
            driver: self.driver.clone(),
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = shape.into();
        self
    }

    pub fn with_x(mut self, x: impl Into<Accessor<T>>) -> Self {
        self.x = x.into();
        self
    }

    pub fn with_y(mut self, y: impl Into<Accessor<T>>) -> Self {
        self.y = y.into();
        self
    }

    pub fn with_r(mut self, r: impl Into<Accessor<T>>) -> Self {
        self.r = r.into();
        self
    }

    pub fn with_x_start(mut self, x: impl Into<Accessor<T>>) -> Self {
        self.x_start = Some(x.into());
        self
    }

    pub fn with_y_start(mut self, y: impl Into<Accessor<T>>) -> Self {
        self.y_start = Some(y.into());
        self
    }

    pub fn with_r_start(mut self, r: impl Into<Accessor<T>>) -> Self {
        self.r_start = Some(r.into());
        self
    }

    pub fn with_x_gravity(mut self, response: impl Into<GravityResponse<T>>) -> Self {
        self.x_gravity = response.into();
        self
    }

    pub fn with_y_gravity(mut self, response: impl Into<GravityResponse<T>>) -> Self {
        self.y_gravity = response.into();
        self
    }

    pub fn with_r_gravity(mut self, response: impl Into<GravityResponse<T>>) -> Self {
        self.r_gravity = response.into();
        self
    }

    pub fn with_tick_update(mut self, hook: impl Fn(&[Item<T>]) + Send + Sync + 'static) -> Self {
        self.tick_update = Some(Arc::new(hook));
        self
    }

    pub fn with_gravity_scale(mut self, scale: f64) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_collide_strength(mut self, strength: f64) -> Self {
        self.collide_strength = strength;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_driver(mut self, driver: DriverOptions) -> Self {
        self.driver = driver;
        self
    }

    pub fn resolve_shape(&self) -> Result<Shape> {
        self.shape.parse()
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v >= 0.0;
        if !ok(self.width) || !ok(self.height) {
            return Err(Error::InvalidCanvas {
                width: self.width,
                height: self.height,
            });
        }
        self.driver.validate()
    }
}

impl Default for ChartConfig<[f64; 3]> {
    /// Records are `[x, y, size]`.
    fn default() -> Self {
        Self::from_fns(|d| d[0], |d| d[1], |d| d[2])
    }
}

impl<T> Clone for ChartConfig<T> {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            padding: self.padding,
            draggable: self.draggable,
            shape: self.shape.clone(),
            x: self.x.clone(),
            y: self.y.clone(),
            r: self.r.clone(),
            x_start: self.x_start.clone(),
            y_start: self.y_start.clone(),
            r_start: self.r_start.clone(),
            x_gravity: self.x_gravity.clone(),
            y_gravity: self.y_gravity.clone(),
            r_gravity: self.r_gravity.clone(),
            tick_update: self.tick_update.clone(),
            gravity_scale: self.gravity_scale,
            collide_strength: self.collide_strength,
            random_seed: self.random_seed,
            driver: self.driver.clone(),
        }
    }
}

impl<T> fmt::Debug for ChartConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartConfig")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("padding", &self.padding)
            .field("draggable", &self.draggable)
            .field("shape", &self.shape)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("r", &self.r)
            .field("x_gravity", &self.x_gravity)
            .field("y_gravity", &self.y_gravity)
            .field("r_gravity", &self.r_gravity)
            .field("gravity_scale", &self.gravity_scale)
            .field("collide_strength", &self.collide_strength)
            .field("random_seed", &self.random_seed)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}
