use crate::accessor::Accessor;
use crate::collide::CollisionResolver;
use crate::config::{ChartConfig, Shape, TickHook};
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::gravity::GravityField;
use crate::item::{Item, Placement};
use crate::quadtree::Quadtree;
use crate::rng::XorShift64Star;

/// Half-width of the default start jitter around the target position.
const START_JITTER: f64 = 25.0;

/// A running layout: the items plus the per-frame pipeline (gravity, quadtree rebuild, collision
/// resolution) driven by a decaying alpha.
pub struct Simulation<T> {
    items: Vec<Item<T>>,
    gravity: GravityField<T>,
    resolver: Option<CollisionResolver>,
    driver: Driver,
    gravity_scale: f64,
    width: f64,
    height: f64,
    draggable: bool,
    tick_update: Option<TickHook<T>>,
    diagnostics: Vec<Error>,
}

impl<T> Simulation<T> {
    /// Ingests `data` and starts the driver.
    ///
    /// An unrecognized shape is not an error here: it is logged, kept in
    /// [`Simulation::diagnostics`], and the simulation runs with gravity only.
    pub fn new(data: impl IntoIterator<Item = T>, config: &ChartConfig<T>) -> Result<Self> {
        config.validate()?;

        let mut diagnostics = Vec::new();
        let resolver = match config.resolve_shape() {
            Ok(shape) => Some(CollisionResolver::new(
                shape,
                config.padding,
                config.collide_strength,
            )),
            Err(err) => {
                tracing::warn!(shape = %config.shape, "{err}; collision resolution disabled");
                diagnostics.push(err);
                None
            }
        };

        let mut rng = XorShift64Star::new(config.random_seed);
        let items: Vec<Item<T>> = data
            .into_iter()
            .map(|datum| ingest(datum, config, &mut rng))
            .collect();

        let mut driver = Driver::new(config.driver.clone());
        driver.start();
        tracing::debug!(
            items = items.len(),
            shape = %config.shape,
            seed = config.random_seed,
            "simulation started"
        );

        Ok(Self {
            items,
            gravity: GravityField::new(
                config.x_gravity.clone(),
                config.y_gravity.clone(),
                config.r_gravity.clone(),
            ),
            resolver,
            driver,
            gravity_scale: config.gravity_scale,
            width: config.width,
            height: config.height,
            draggable: config.draggable,
            tick_update: config.tick_update.clone(),
            diagnostics,
        })
    }

    /// Advances the driver and runs one frame. Returns `false`, without touching any item, once
    /// the driver has ended.
    pub fn tick(&mut self) -> bool {
        let Some(alpha) = self.driver.step() else {
            return false;
        };
        self.step_with_alpha(alpha);
        true
    }

    /// Runs one frame at the given intensity without consulting the driver's clock.
    pub fn step_with_alpha(&mut self, alpha: f64) {
        self.driver.integrate(&mut self.items);
        self.gravity
            .apply_all(&mut self.items, alpha * self.gravity_scale);
        if let Some(resolver) = &self.resolver {
            let index = Quadtree::build(&self.items);
            resolver.resolve_all(&mut self.items, &index);
        }
        tracing::trace!(alpha, "frame");
        if let Some(hook) = &self.tick_update {
            hook(&self.items);
        }
    }

    /// Ticks until the driver ends; returns the number of frames run.
    pub fn run(&mut self) -> usize {
        let mut frames = 0;
        while self.tick() {
            frames += 1;
        }
        frames
    }

    /// Ticks at most `n` times; returns the number of frames run.
    pub fn run_ticks(&mut self, n: usize) -> usize {
        let mut frames = 0;
        while frames < n && self.tick() {
            frames += 1;
        }
        frames
    }

    pub fn start(&mut self) {
        self.driver.start();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn alpha(&self) -> f64 {
        self.driver.alpha()
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn items(&self) -> &[Item<T>] {
        &self.items
    }

    /// Live state is writable so hosts can pin or drag an item between frames (see
    /// [`Item::place_at`]).
    pub fn item_mut(&mut self, idx: usize) -> Option<&mut Item<T>> {
        self.items.get_mut(idx)
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.items.iter().map(Item::placement).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `None` when the configured shape was rejected.
    pub fn shape(&self) -> Option<Shape> {
        self.resolver.map(|r| r.shape)
    }

    pub fn resolver(&self) -> Option<&CollisionResolver> {
        self.resolver.as_ref()
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn draggable(&self) -> bool {
        self.draggable
    }

    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    pub fn into_items(self) -> Vec<Item<T>> {
        self.items
    }
}

fn ingest<T>(datum: T, config: &ChartConfig<T>, rng: &mut XorShift64Star) -> Item<T> {
    let target = Placement {
        x: config.x.get(&datum),
        y: config.y.get(&datum),
        size: config.r.get(&datum),
    };
    let mut jittered = |start: &Option<Accessor<T>>, base: f64| match start {
        Some(a) => a.get(&datum),
        None => base + rng.next_jitter(START_JITTER),
    };
    let x = jittered(&config.x_start, target.x);
    let y = jittered(&config.y_start, target.y);
    let size = match &config.r_start {
        Some(a) => a.get(&datum),
        None => target.size,
    };
    Item::new(datum, target, Placement { x, y, size })
}
