//! Placed world objects.
//!
//! Every object is immutable once created; style attributes are rolled by the
//! generator before construction. Rendering is left to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::tree_config::TreeKind;

/// Horizontal extent shared by every placed object.
pub trait Placement {
    /// Left edge in layer space.
    fn x(&self) -> f64;
    /// Horizontal extent.
    fn width(&self) -> f64;
    /// Vertical extent.
    fn height(&self) -> f64;

    /// Right edge, `x + width`.
    fn right(&self) -> f64 {
        self.x() + self.width()
    }
}

macro_rules! impl_placement {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Placement for $ty {
                fn x(&self) -> f64 {
                    self.x
                }
                fn width(&self) -> f64 {
                    self.width
                }
                fn height(&self) -> f64 {
                    self.height
                }
            }
        )*
    };
}

// ---------------------------------------------------------------------------
// Ground
// ---------------------------------------------------------------------------

/// Surface type of a ground segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundKind {
    /// Green turf.
    Grass,
    /// Paved road.
    Pavement,
    /// River; nothing is ever placed on it.
    Water,
    /// Bare earth or sand.
    Dirt,
}

impl GroundKind {
    /// Ground derived from the biome on non-foreground layers.
    pub const fn for_biome(biome: Biome) -> Self {
        match biome {
            Biome::Desert => GroundKind::Dirt,
            Biome::Forest => GroundKind::Grass,
            Biome::City => GroundKind::Pavement,
            Biome::Tundra | Biome::Plains => GroundKind::Dirt,
        }
    }
}

/// One strip of ground under a chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundSegment {
    /// Left edge.
    pub x: f64,
    /// Strip width.
    pub width: f64,
    /// Depth below the surface line.
    pub height: f64,
    /// Surface type.
    pub kind: GroundKind,
}

impl GroundSegment {
    /// Fixed depth of every ground strip.
    pub const DEPTH: f64 = 100.0;

    /// Create a strip of `kind` spanning `[x, x + width)`.
    pub fn new(x: f64, width: f64, kind: GroundKind) -> Self {
        Self {
            x,
            width,
            height: Self::DEPTH,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Structures
// ---------------------------------------------------------------------------

/// Facade material of a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    /// Timber.
    Wood,
    /// Brick courses.
    Brick,
    /// Dressed stone.
    Stone,
    /// Smooth render.
    Plaster,
}

/// Roof silhouette of a structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoofShape {
    /// Flat top.
    Flat,
    /// Pitched roof.
    Gabled,
    /// Rounded dome.
    Dome,
    /// Battlements.
    Crenelated,
}

/// HSL color with integer components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees, `[0, 360)`.
    pub hue: u16,
    /// Saturation percent.
    pub saturation: u8,
    /// Lightness percent.
    pub lightness: u8,
}

impl Hsl {
    /// Create a color from its components.
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Same hue and saturation, `amount` percent darker.
    pub const fn darken(self, amount: u8) -> Self {
        Self {
            lightness: self.lightness.saturating_sub(amount),
            ..self
        }
    }
}

/// CSS form, e.g. `hsl(120, 50%, 50%)`.
impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// A building.
#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    /// Left edge.
    pub x: f64,
    /// Facade width.
    pub width: f64,
    /// Body height, excluding the roof.
    pub height: f64,
    /// Facade material.
    pub material: Material,
    /// Roof silhouette.
    pub roof: RoofShape,
    /// Facade color.
    pub base_color: Hsl,
    /// Roof color.
    pub roof_color: Hsl,
}

impl Structure {
    /// Create a building with rolled style attributes.
    pub fn new(
        x: f64,
        width: f64,
        height: f64,
        material: Material,
        roof: RoofShape,
        base_color: Hsl,
        roof_color: Hsl,
    ) -> Self {
        Self {
            x,
            width,
            height,
            material,
            roof,
            base_color,
            roof_color,
        }
    }
}

// ---------------------------------------------------------------------------
// Vegetation
// ---------------------------------------------------------------------------

/// Where a flower sits on a plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowerPosition {
    /// Left arm.
    Left,
    /// Right arm.
    Right,
    /// Crown.
    Top,
}

impl FlowerPosition {
    /// Draw table for flower placement.
    pub const ALL: [FlowerPosition; 3] = [
        FlowerPosition::Left,
        FlowerPosition::Right,
        FlowerPosition::Top,
    ];
}

/// One tree, bush, cactus or hedge.
#[derive(Clone, Debug, PartialEq)]
pub struct Vegetation {
    /// Left edge.
    pub x: f64,
    /// Footprint width, fixed per kind.
    pub width: f64,
    /// Plant height.
    pub height: f64,
    /// Vegetation kind.
    pub kind: TreeKind,
    /// Cosmetic flower, if one was rolled.
    pub flower: Option<FlowerPosition>,
}

impl Vegetation {
    /// Create a plant of `kind`; its width comes from the kind.
    pub fn new(x: f64, kind: TreeKind, height: f64, flower: Option<FlowerPosition>) -> Self {
        Self {
            x,
            width: kind.width(),
            height,
            kind,
            flower,
        }
    }
}

// ---------------------------------------------------------------------------
// Landscape
// ---------------------------------------------------------------------------

/// Distant silhouette (hill, dune, peaks or skyline) on a backdrop layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Landscape {
    /// Left edge.
    pub x: f64,
    /// Silhouette width.
    pub width: f64,
    /// Peak height.
    pub height: f64,
    /// Biome that shapes the outline.
    pub biome: Biome,
}

impl Landscape {
    /// Create a silhouette shaped by `biome`.
    pub fn new(x: f64, width: f64, height: f64, biome: Biome) -> Self {
        Self {
            x,
            width,
            height,
            biome,
        }
    }
}

impl_placement!(GroundSegment, Structure, Vegetation, Landscape);

// ---------------------------------------------------------------------------
// Sum types
// ---------------------------------------------------------------------------

/// Feature chosen for a chunk, before it is placed.
#[derive(Clone, Debug, PartialEq)]
pub enum Feature {
    /// A building.
    Structure(Structure),
    /// A plant.
    Vegetation(Vegetation),
    /// A distant silhouette.
    Landscape(Landscape),
    /// Empty ground.
    Gap,
}

impl Feature {
    /// Discriminant without payload.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Structure(_) => FeatureKind::Structure,
            Feature::Vegetation(_) => FeatureKind::Vegetation,
            Feature::Landscape(_) => FeatureKind::Landscape,
            Feature::Gap => FeatureKind::Gap,
        }
    }

    /// The object to place, or `None` for a gap.
    pub fn into_object(self) -> Option<PlacedObject> {
        match self {
            Feature::Structure(s) => Some(PlacedObject::Structure(s)),
            Feature::Vegetation(v) => Some(PlacedObject::Vegetation(v)),
            Feature::Landscape(l) => Some(PlacedObject::Landscape(l)),
            Feature::Gap => None,
        }
    }
}

/// Payload-free feature tag, used in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// A building.
    Structure,
    /// A plant.
    Vegetation,
    /// A distant silhouette.
    Landscape,
    /// Empty ground.
    Gap,
}

/// Anything stored in a parallax layer.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacedObject {
    /// Ground strip.
    Ground(GroundSegment),
    /// Building.
    Structure(Structure),
    /// Plant.
    Vegetation(Vegetation),
    /// Distant silhouette.
    Landscape(Landscape),
}

impl PlacedObject {
    fn placement(&self) -> &dyn Placement {
        match self {
            PlacedObject::Ground(g) => g,
            PlacedObject::Structure(s) => s,
            PlacedObject::Vegetation(v) => v,
            PlacedObject::Landscape(l) => l,
        }
    }

    /// Returns the ground strip, if this is one.
    pub fn as_ground(&self) -> Option<&GroundSegment> {
        match self {
            PlacedObject::Ground(g) => Some(g),
            _ => None,
        }
    }

    /// Returns the plant, if this is one.
    pub fn as_vegetation(&self) -> Option<&Vegetation> {
        match self {
            PlacedObject::Vegetation(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the building, if this is one.
    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            PlacedObject::Structure(s) => Some(s),
            _ => None,
        }
    }
}

impl Placement for PlacedObject {
    fn x(&self) -> f64 {
        self.placement().x()
    }
    fn width(&self) -> f64 {
        self.placement().width()
    }
    fn height(&self) -> f64 {
        self.placement().height()
    }
}
