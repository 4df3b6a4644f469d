// geometry/polygon.rs

// Survey boundary: an ordered vertex list guarded by a mutex so a renderer can
// read it while a planning session edits it. Every mutation recomputes the
// cached boundary inside the same critical section.

// Dependencies
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use super::geo::{self, Location};

/// Renderable outline of a polygon, rebuilt on every write
#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    /// First vertex, used as the drawing anchor
    pub anchor: Location,
    /// Vertices in insertion order, closed by repeating the anchor
    pub ring: Vec<Location>,
    /// Arithmetic mean of the vertices
    pub centroid: Location,
}

#[derive(Default)]
struct PolygonState {
    vertices: Vec<Location>,
    boundary: Option<Boundary>,
}

impl PolygonState {
    fn recompute_boundary(&mut self) {
        self.boundary = match (self.vertices.first(), geo::centroid(&self.vertices)) {
            (Some(anchor), Some(centroid)) => {
                let mut ring = self.vertices.clone();
                ring.push(*anchor);
                Some(Boundary {
                    anchor: *anchor,
                    ring,
                    centroid,
                })
            }
            _ => None,
        };
    }
}

/// Serialized form: `{ id, vertices }`
#[derive(Clone, Serialize, Deserialize)]
struct PolygonDef {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    vertices: Vec<Location>,
}

/// Ordered, mutable vertex list describing a survey area
#[derive(Default, Serialize, Deserialize)]
#[serde(from = "PolygonDef", into = "PolygonDef")]
pub struct Polygon {
    id: Option<String>,
    state: Mutex<PolygonState>,
}

impl Polygon {
    /// Creates an empty polygon
    pub fn new() -> Self {
        Polygon::default()
    }

    /// Creates a polygon from vertices given in boundary order
    pub fn from_vertices(vertices: Vec<Location>) -> Self {
        let mut state = PolygonState {
            vertices,
            boundary: None,
        };
        state.recompute_boundary();

        Polygon {
            id: None,
            state: Mutex::new(state),
        }
    }

    /// Sets the polygon id, builder style
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Polygon id, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Appends a vertex given its latitude and longitude in degrees
    pub fn add_vertex(&self, latitude: f64, longitude: f64) {
        self.add_vertex_location(Location::new(latitude, longitude));
    }

    /// Appends a vertex given its location
    pub fn add_vertex_location(&self, location: Location) {
        self.mutate(|vertices| vertices.push(location));
    }

    /// Removes the first vertex equal to `location`. Returns whether one was removed.
    pub fn remove_vertex(&self, location: &Location) -> bool {
        let mut removed = false;
        self.mutate(|vertices| {
            if let Some(index) = vertices.iter().position(|v| v == location) {
                vertices.remove(index);
                removed = true;
            }
        });
        removed
    }

    /// Removes all vertices
    pub fn clear_vertices(&self) {
        self.mutate(|vertices| vertices.clear());
    }

    /// Moves every vertex by `north` and `east` meters
    pub fn translate(&self, north: f64, east: f64) {
        self.mutate(|vertices| {
            for v in vertices.iter_mut() {
                *v = v.translated(north, east, 0.0);
            }
        });
    }

    /// Rotates every vertex by `yaw` radians about the polygon's centroid
    pub fn rotate(&self, yaw: f64) {
        self.mutate(|vertices| {
            if let Some(pivot) = geo::centroid(vertices) {
                for v in vertices.iter_mut() {
                    *v = v.rotate_around(&pivot, yaw);
                }
            }
        });
    }

    /// Arithmetic mean of the vertex locations, `None` when empty
    pub fn centroid(&self) -> Option<Location> {
        geo::centroid(&self.lock().vertices)
    }

    /// Snapshot of the vertices in insertion order
    pub fn vertices(&self) -> Vec<Location> {
        self.lock().vertices.clone()
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.lock().vertices.len()
    }

    /// Whether the polygon has no vertices
    pub fn is_empty(&self) -> bool {
        self.lock().vertices.is_empty()
    }

    /// Current boundary, `None` when the polygon is empty
    pub fn boundary(&self) -> Option<Boundary> {
        self.lock().boundary.clone()
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<Location>)) {
        let mut state = self.lock();
        f(&mut state.vertices);
        state.recompute_boundary();
        debug!("Polygon updated: {} vertices", state.vertices.len());
    }

    fn lock(&self) -> MutexGuard<'_, PolygonState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for Polygon {
    fn clone(&self) -> Self {
        let mut polygon = Polygon::from_vertices(self.vertices());
        polygon.id = self.id.clone();
        polygon
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Polygon")
            .field("id", &self.id)
            .field("vertices", &self.vertices())
            .finish()
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Polygon ({} vertices)", self.len())
    }
}

impl From<PolygonDef> for Polygon {
    fn from(def: PolygonDef) -> Self {
        let mut polygon = Polygon::from_vertices(def.vertices);
        polygon.id = def.id;
        polygon
    }
}

impl From<Polygon> for PolygonDef {
    fn from(polygon: Polygon) -> Self {
        PolygonDef {
            vertices: polygon.vertices(),
            id: polygon.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_follows_every_mutation() {
        let polygon = Polygon::new();
        assert!(polygon.boundary().is_none());

        polygon.add_vertex(41.0, -8.0);
        polygon.add_vertex_location(Location::new(42.0, -8.0));
        let boundary = polygon.boundary().unwrap();
        assert_eq!(boundary.ring.len(), 3);
        assert_eq!(boundary.anchor, Location::new(41.0, -8.0));
        assert_eq!(boundary.ring.last(), Some(&boundary.anchor));

        assert!(polygon.remove_vertex(&Location::new(41.0, -8.0)));
        assert!(!polygon.remove_vertex(&Location::new(0.0, 0.0)));
        assert_eq!(polygon.boundary().unwrap().anchor, Location::new(42.0, -8.0));

        polygon.clear_vertices();
        assert!(polygon.is_empty());
        assert!(polygon.boundary().is_none());
    }

    #[test]
    fn clone_is_independent() {
        let polygon = Polygon::from_vertices(vec![Location::new(41.0, -8.0)]).with_id("area");
        let copy = polygon.clone();
        polygon.add_vertex(42.0, -8.0);

        assert_eq!(copy.len(), 1);
        assert_eq!(copy.id(), Some("area"));
        assert_eq!(polygon.to_string(), "Polygon (2 vertices)");
    }

    #[test]
    fn yaml_round_trip_keeps_order() {
        let yaml = "id: survey\nvertices:\n  - {latitude: 41.0, longitude: -8.0}\n  - {latitude: 42.0, longitude: -8.0}\n  - {latitude: 42.0, longitude: -7.0}\n";
        let polygon: Polygon = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(polygon.id(), Some("survey"));
        assert_eq!(polygon.vertices()[2], Location::new(42.0, -7.0));

        let text = serde_yaml::to_string(&polygon).unwrap();
        let again: Polygon = serde_yaml::from_str(&text).unwrap();
        assert_eq!(again.vertices(), polygon.vertices());
    }
}
