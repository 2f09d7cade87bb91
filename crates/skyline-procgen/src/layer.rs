//! Parallax layers: depth bands that scroll at a fraction of camera speed.

use crate::object::{PlacedObject, Placement};

/// Default distance kept behind the camera before objects are evicted.
pub const DEFAULT_PRUNE_BUFFER: f64 = 2000.0;

/// Ordered sequence of placed objects at one depth.
///
/// Objects are appended in non-decreasing `x` order by the generator and
/// evicted by [`ParallaxLayer::prune`]; nothing is ever inserted in the middle.
#[derive(Clone, Debug)]
pub struct ParallaxLayer {
    objects: Vec<PlacedObject>,
    speed_factor: f64,
    y_offset: f64,
    scale: f64,
}

impl ParallaxLayer {
    /// Create an empty layer.
    ///
    /// `speed_factor` is the fraction of camera motion applied to this layer;
    /// `y_offset` lifts the layer above the ground line.
    pub fn new(speed_factor: f64, y_offset: f64, scale: f64) -> Self {
        Self {
            objects: Vec::new(),
            speed_factor,
            y_offset,
            scale,
        }
    }

    /// Fraction of camera motion applied to this layer.
    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Vertical offset above the ground line.
    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    /// Draw scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Camera position projected into this layer's space.
    pub fn view_x(&self, camera_x: f64) -> f64 {
        camera_x * self.speed_factor
    }

    /// Append an object at the back.
    pub fn push(&mut self, object: PlacedObject) {
        debug_assert!(
            self.objects.last().is_none_or(|last| last.x() <= object.x()),
            "object at x={} appended after x={}",
            object.x(),
            self.objects.last().map_or(0.0, Placement::x),
        );
        self.objects.push(object);
    }

    /// Evict every object whose right edge is at or behind
    /// `camera_x * speed_factor - buffer`. Returns the number removed.
    pub fn prune(&mut self, camera_x: f64, buffer: f64) -> usize {
        let cutoff = self.view_x(camera_x) - buffer;
        let before = self.objects.len();
        self.objects.retain(|object| object.right() > cutoff);
        before - self.objects.len()
    }

    /// Drop every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Objects in x order.
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the layer holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects whose scaled screen span intersects `[0, screen_width)`.
    pub fn visible(
        &self,
        camera_x: f64,
        screen_width: f64,
    ) -> impl Iterator<Item = &PlacedObject> + '_ {
        let view_x = self.view_x(camera_x);
        let scale = self.scale;
        self.objects.iter().filter(move |object| {
            let screen_x = object.x() - view_x;
            screen_x * scale < screen_width && (screen_x + object.width()) * scale > 0.0
        })
    }
}
