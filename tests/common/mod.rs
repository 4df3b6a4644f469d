// tests/common/mod.rs
// Survey-area fixtures shared by the integration tests.

#![allow(dead_code)]

use coverage_planner::{GridArea, Location, Polygon};

/// Reference location the fixtures are built around
pub const ORIGIN: Location = Location {
    latitude: 41.1781,
    longitude: -8.5954,
    depth: 0.0,
};

/// Installs the test logger once per binary
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Axis-aligned rectangle with its first edge running east, vertices given
/// as NW, NE, SW, SE
pub fn rectangle(width: f64, height: f64) -> Polygon {
    let polygon = Polygon::new();
    polygon.add_vertex_location(ORIGIN);
    polygon.add_vertex_location(ORIGIN.translated(0.0, width, 0.0));
    polygon.add_vertex_location(ORIGIN.translated(-height, 0.0, 0.0));
    polygon.add_vertex_location(ORIGIN.translated(-height, width, 0.0));
    polygon
}

/// Square whose first edge points `yaw` radians counter-clockwise from east
pub fn tilted_square(side: f64, yaw: f64) -> Polygon {
    let (east, north) = (yaw.cos() * side, yaw.sin() * side);
    // perpendicular, pointing into the square
    let (down_east, down_north) = (yaw.sin() * side, -yaw.cos() * side);

    Polygon::from_vertices(vec![
        ORIGIN,
        ORIGIN.translated(north, east, 0.0),
        ORIGIN.translated(north + down_north, east + down_east, 0.0),
        ORIGIN.translated(down_north, down_east, 0.0),
    ])
}

/// Square survey area decomposed with the given cell width
pub fn square_area(side: f64, cell_width: f64) -> GridArea {
    init_logger();
    GridArea::new(&rectangle(side, side), cell_width).expect("valid square area")
}
