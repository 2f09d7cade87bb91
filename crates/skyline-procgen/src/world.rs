//! World facade: a camera, a stack of parallax layers and the generator that
//! feeds them, advanced one tick at a time.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::biome::Biome;
use crate::generator::{BiomePacing, GenerateReport, WorldGenerator};
use crate::layer::{DEFAULT_PRUNE_BUFFER, ParallaxLayer};
use crate::random::Seed;
use crate::tree_config::TreeConfig;

/// Default camera speed in world units per second.
pub const DEFAULT_CAMERA_SPEED: f64 = 100.0;

/// Default viewport width.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// Largest time step a single tick may integrate.
pub const DEFAULT_MAX_DT: f64 = 0.1;

/// Geometry of one parallax layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Fraction of camera motion applied to the layer.
    pub speed_factor: f64,
    /// Vertical offset above the ground line.
    pub y_offset: f64,
    /// Draw scale.
    pub scale: f64,
}

impl LayerSpec {
    pub const fn new(speed_factor: f64, y_offset: f64, scale: f64) -> Self {
        Self {
            speed_factor,
            y_offset,
            scale,
        }
    }

    /// The four-layer stack used by default, far to near.
    pub fn default_stack() -> Vec<LayerSpec> {
        vec![
            LayerSpec::new(0.2, 150.0, 1.0),
            LayerSpec::new(0.4, 100.0, 1.0),
            LayerSpec::new(0.6, 50.0, 1.0),
            LayerSpec::new(1.0, 0.0, 1.0),
        ]
    }

    fn build(&self) -> ParallaxLayer {
        ParallaxLayer::new(self.speed_factor, self.y_offset, self.scale)
    }
}

/// Tunables for camera motion and eviction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldSettings {
    pub camera_speed: f64,
    pub viewport_width: f64,
    pub max_dt: f64,
    pub prune_buffer: f64,
    pub biome_pacing: BiomePacing,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            camera_speed: DEFAULT_CAMERA_SPEED,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            max_dt: DEFAULT_MAX_DT,
            prune_buffer: DEFAULT_PRUNE_BUFFER,
            biome_pacing: BiomePacing::default(),
        }
    }
}

/// Per-tick statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickStats {
    /// Camera position after the tick.
    pub camera_x: f64,
    /// Biome active during the tick.
    pub biome: Biome,
    /// Chunks synthesized this tick across all layers.
    pub chunks_generated: usize,
    /// Objects evicted this tick across all layers.
    pub objects_pruned: usize,
    /// Objects alive after the tick across all layers.
    pub live_objects: usize,
}

/// A scrolling world.
///
/// Owns the layers and the generator. Tree config edits take effect at the
/// next [`World::reseed`].
#[derive(Debug)]
pub struct World {
    seed: Seed,
    specs: Vec<LayerSpec>,
    layers: Vec<ParallaxLayer>,
    generator: WorldGenerator,
    trees: TreeConfig,
    settings: WorldSettings,
    camera_x: f64,
}

impl World {
    /// Build a world with explicit layers, vegetation config and settings.
    pub fn new(
        seed: impl Into<Seed>,
        specs: Vec<LayerSpec>,
        trees: TreeConfig,
        settings: WorldSettings,
    ) -> Self {
        let seed = seed.into();
        let layers = specs.iter().map(LayerSpec::build).collect::<Vec<_>>();
        let generator = WorldGenerator::with_tree_config(&seed, layers.len(), &trees)
            .with_biome_pacing(settings.biome_pacing);
        info!(%seed, layers = layers.len(), "world created");
        Self {
            seed,
            specs,
            layers,
            generator,
            trees,
            settings,
            camera_x: 0.0,
        }
    }

    /// The default four-layer world.
    pub fn with_defaults(seed: impl Into<Seed>) -> Self {
        Self::new(
            seed,
            LayerSpec::default_stack(),
            TreeConfig::default(),
            WorldSettings::default(),
        )
    }

    /// Advance the camera by `dt` seconds (clamped to `max_dt`), generate
    /// ahead of it and prune behind it.
    pub fn tick(&mut self, dt: f64) -> TickStats {
        let dt = dt.clamp(0.0, self.settings.max_dt);
        self.camera_x += self.settings.camera_speed * dt;
        let report = self.generate();
        self.finish_tick(report)
    }

    /// Jump the camera to `camera_x`, generate and prune.
    pub fn move_camera_to(&mut self, camera_x: f64) -> TickStats {
        self.camera_x = camera_x;
        let report = self.generate();
        self.finish_tick(report)
    }

    fn generate(&mut self) -> GenerateReport {
        self.generator
            .generate(&mut self.layers, self.camera_x, self.settings.viewport_width)
    }

    fn finish_tick(&mut self, report: GenerateReport) -> TickStats {
        let camera_x = self.camera_x;
        let buffer = self.settings.prune_buffer;
        let objects_pruned = self
            .layers
            .iter_mut()
            .map(|layer| layer.prune(camera_x, buffer))
            .sum();
        let stats = TickStats {
            camera_x,
            biome: report.biome,
            chunks_generated: report.chunks.len(),
            objects_pruned,
            live_objects: self.live_objects(),
        };
        if stats.chunks_generated > 0 || stats.objects_pruned > 0 {
            debug!(
                camera_x,
                biome = %stats.biome,
                generated = stats.chunks_generated,
                pruned = stats.objects_pruned,
                live = stats.live_objects,
                "tick"
            );
        }
        stats
    }

    /// Throw the world away and start over from `seed`, using the current
    /// tree config. The camera returns to the origin.
    pub fn reseed(&mut self, seed: impl Into<Seed>) {
        self.seed = seed.into();
        for layer in &mut self.layers {
            layer.clear();
        }
        self.generator =
            WorldGenerator::with_tree_config(&self.seed, self.layers.len(), &self.trees)
                .with_biome_pacing(self.settings.biome_pacing);
        self.camera_x = 0.0;
        info!(seed = %self.seed, "world reseeded");
    }

    /// Replace the vegetation config. Applies from the next reseed.
    pub fn set_tree_config(&mut self, trees: TreeConfig) {
        self.trees = trees;
    }

    /// Vegetation config that the next reseed will use.
    pub fn tree_config(&self) -> &TreeConfig {
        &self.trees
    }

    /// Current seed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Camera position.
    pub fn camera_x(&self) -> f64 {
        self.camera_x
    }

    /// Layers, far to near.
    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// Layer geometry used to build the stack.
    pub fn layer_specs(&self) -> &[LayerSpec] {
        &self.specs
    }

    /// The live generator.
    pub fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    /// Tunables.
    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Objects alive across all layers.
    pub fn live_objects(&self) -> usize {
        self.layers.iter().map(ParallaxLayer::len).sum()
    }
}
