//! Procedural parallax world generation: seeded streams, biome pacing,
//! vegetation config and the chunk generator that fills scrolling layers.

mod layer;
mod object;
mod world;

pub mod biome;
pub mod generator;
pub mod random;
pub mod tree_config;

pub use biome::{Biome, BiomeSystem};
pub use generator::{
    BiomePacing, CHUNK_OVERLAP, ChunkSummary, GenerateReport, LOOKAHEAD_MARGIN, LayerRole,
    MIN_WATER_WIDTH, WorldDna, WorldGenerator,
};
pub use layer::{DEFAULT_PRUNE_BUFFER, ParallaxLayer};
pub use object::{
    Feature, FeatureKind, FlowerPosition, GroundKind, GroundSegment, Hsl, Landscape, Material,
    PlacedObject, Placement, RoofShape, Structure, Vegetation,
};
pub use random::{Seed, SeededRandom, cyrb128};
pub use tree_config::{TreeConfig, TreeConfigError, TreeConfigItem, TreeKind};
pub use world::{
    DEFAULT_CAMERA_SPEED, DEFAULT_MAX_DT, DEFAULT_VIEWPORT_WIDTH, LayerSpec, TickStats, World,
    WorldSettings,
};
