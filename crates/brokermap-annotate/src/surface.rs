//! Map rendering seams.
//!
//! [`MapLibrary`] stands for the rendering toolkit (which may still be
//! loading) and creates [`MapSurface`]s bound to a container. The workflow
//! only ever talks to these traits.

use brokermap_core::Coordinates;
use serde::Serialize;
use thiserror::Error;

use crate::marker::{MarkerIcon, MarkerRecord};
use crate::viewport::{BoundingBox, MapViewport};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map library has not finished loading")]
    LibraryNotLoaded,

    #[error("cannot bind map to container \"{container}\": {reason}")]
    Container { container: String, reason: String },

    #[error("invalid bounds {0}")]
    InvalidBounds(BoundingBox),

    #[error("invalid view center {0}")]
    InvalidCenter(Coordinates),

    #[error("map has been removed")]
    Removed,
}

/// Raster tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    #[must_use]
    pub fn openstreetmap() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
            attribution: "\u{a9} OpenStreetMap contributors".to_owned(),
            max_zoom: 19,
        }
    }
}

impl Default for TileLayer {
    fn default() -> Self {
        Self::openstreetmap()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerId(pub usize);

pub trait MapSurface {
    /// `false` once the surface has been removed or before its first render.
    fn is_loaded(&self) -> bool;

    fn add_tile_layer(&mut self, layer: &TileLayer) -> Result<(), MapError>;

    fn add_marker(&mut self, marker: &MarkerRecord, icon: &MarkerIcon)
        -> Result<MarkerId, MapError>;

    fn remove_marker(&mut self, id: MarkerId);

    fn set_view(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapError>;

    fn fit_bounds(
        &mut self,
        bounds: &BoundingBox,
        padding_px: u32,
        max_zoom: u8,
    ) -> Result<(), MapError>;

    /// Releases the surface and everything attached to it. Idempotent.
    fn remove(&mut self);
}

pub trait MapLibrary {
    type Surface: MapSurface;

    fn is_loaded(&self) -> bool;

    /// # Errors
    ///
    /// Returns [`MapError`] if the library is not ready or the container is
    /// unusable.
    fn create_map(&self, container: &str) -> Result<Self::Surface, MapError>;
}

/// Applies a computed viewport to a surface.
///
/// # Errors
///
/// Propagates the surface's [`MapError`].
pub fn apply_viewport<S: MapSurface>(surface: &mut S, viewport: &MapViewport) -> Result<(), MapError> {
    match viewport {
        MapViewport::Centered { center, zoom } => surface.set_view(*center, *zoom),
        MapViewport::Fitted {
            bounds,
            padding_px,
            max_zoom,
        } => surface.fit_bounds(bounds, *padding_px, *max_zoom),
    }
}
