//! Headless map surface that renders to a GeoJSON `FeatureCollection`.
//!
//! Views are resolved the way an interactive map would resolve them: a
//! bounds fit picks the box center and the highest zoom that keeps the box
//! inside the configured pixel viewport.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use brokermap_core::Coordinates;
use serde::Serialize;
use serde_json::{json, Value};

use crate::marker::{MarkerIcon, MarkerRecord};
use crate::surface::{MapError, MapLibrary, MapSurface, MarkerId, TileLayer};
use crate::viewport::{estimate_fit_zoom, BoundingBox};

/// Matches the 24rem-tall, full-width panel the deals map is shown in.
pub const DEFAULT_VIEWPORT_WIDTH_PX: u32 = 800;
pub const DEFAULT_VIEWPORT_HEIGHT_PX: u32 = 384;

#[derive(Debug, Clone)]
pub struct GeoJsonLibrary {
    loaded: bool,
    width_px: u32,
    height_px: u32,
    live: Arc<AtomicUsize>,
}

impl GeoJsonLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaded: true,
            width_px: DEFAULT_VIEWPORT_WIDTH_PX,
            height_px: DEFAULT_VIEWPORT_HEIGHT_PX,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A library that never finishes loading.
    #[must_use]
    pub fn unloaded() -> Self {
        Self {
            loaded: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_viewport_size(mut self, width_px: u32, height_px: u32) -> Self {
        self.width_px = width_px;
        self.height_px = height_px;
        self
    }

    /// Surfaces created by this library that have not been removed yet.
    #[must_use]
    pub fn live_maps(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Default for GeoJsonLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MapLibrary for GeoJsonLibrary {
    type Surface = GeoJsonSurface;

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn create_map(&self, container: &str) -> Result<GeoJsonSurface, MapError> {
        if !self.loaded {
            return Err(MapError::LibraryNotLoaded);
        }
        if container.trim().is_empty() {
            return Err(MapError::Container {
                container: container.to_owned(),
                reason: "container id is empty".to_owned(),
            });
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(GeoJsonSurface {
            container: container.to_owned(),
            width_px: self.width_px,
            height_px: self.height_px,
            removed: false,
            tile_layers: Vec::new(),
            markers: BTreeMap::new(),
            next_marker: 0,
            view_history: Vec::new(),
            fit_count: 0,
            live: Arc::clone(&self.live),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

#[derive(Debug, Clone)]
struct PlacedMarker {
    record: MarkerRecord,
    icon: MarkerIcon,
}

#[derive(Debug)]
pub struct GeoJsonSurface {
    container: String,
    width_px: u32,
    height_px: u32,
    removed: bool,
    tile_layers: Vec<TileLayer>,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_marker: usize,
    view_history: Vec<MapView>,
    fit_count: usize,
    live: Arc<AtomicUsize>,
}

impl GeoJsonSurface {
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    #[must_use]
    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    /// Placed markers in placement order.
    pub fn markers(&self) -> impl Iterator<Item = &MarkerRecord> {
        self.markers.values().map(|m| &m.record)
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn view(&self) -> Option<MapView> {
        self.view_history.last().copied()
    }

    /// Every view the surface has been set to, oldest first.
    #[must_use]
    pub fn view_history(&self) -> &[MapView] {
        &self.view_history
    }

    /// How many times [`MapSurface::fit_bounds`] succeeded.
    #[must_use]
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }

    /// Renders the surface as a GeoJSON `FeatureCollection`.
    ///
    /// Positions are `[lon, lat]` per RFC 7946. The current view and tile
    /// layer ride along as foreign members.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .iter()
            .map(|(id, placed)| {
                let record = &placed.record;
                json!({
                    "type": "Feature",
                    "id": id.0,
                    "geometry": {
                        "type": "Point",
                        "coordinates": [record.coordinates.lon, record.coordinates.lat],
                    },
                    "properties": {
                        "ordinal": record.ordinal,
                        "address": record.address,
                        "date": record.date,
                        "label": record.label,
                        "icon": placed.icon,
                    },
                })
            })
            .collect();

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
            "container": self.container,
        });

        let points: Vec<Coordinates> = self.markers.values().map(|m| m.record.coordinates).collect();
        if let Some(b) = BoundingBox::from_points(&points) {
            collection["bbox"] = json!([b.min_lon, b.min_lat, b.max_lon, b.max_lat]);
        }
        if let Some(view) = self.view() {
            collection["view"] = json!({
                "center": [view.center.lon, view.center.lat],
                "zoom": view.zoom,
            });
        }
        if let Some(layer) = self.tile_layers.last() {
            collection["tile_layer"] = json!(layer);
        }
        collection
    }

    fn ensure_live(&self) -> Result<(), MapError> {
        if self.removed {
            Err(MapError::Removed)
        } else {
            Ok(())
        }
    }
}

impl MapSurface for GeoJsonSurface {
    fn is_loaded(&self) -> bool {
        !self.removed
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) -> Result<(), MapError> {
        self.ensure_live()?;
        self.tile_layers.push(layer.clone());
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerRecord, icon: &MarkerIcon) -> Result<MarkerId, MapError> {
        self.ensure_live()?;
        if !marker.coordinates.is_valid() {
            return Err(MapError::InvalidCenter(marker.coordinates));
        }
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(
            id,
            PlacedMarker {
                record: marker.clone(),
                icon: icon.clone(),
            },
        );
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) -> Result<(), MapError> {
        self.ensure_live()?;
        if !center.is_valid() {
            return Err(MapError::InvalidCenter(center));
        }
        self.view_history.push(MapView { center, zoom });
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox, padding_px: u32, max_zoom: u8) -> Result<(), MapError> {
        self.ensure_live()?;
        if !bounds.is_valid() {
            return Err(MapError::InvalidBounds(*bounds));
        }
        let zoom = estimate_fit_zoom(bounds, self.width_px, self.height_px, padding_px, max_zoom);
        self.view_history.push(MapView {
            center: bounds.center(),
            zoom,
        });
        self.fit_count += 1;
        Ok(())
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        self.markers.clear();
        self.tile_layers.clear();
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for GeoJsonSurface {
    fn drop(&mut self) {
        self.remove();
    }
}
