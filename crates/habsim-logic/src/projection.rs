//! Isometric projection, camera state and pointer picking.
//!
//! Forward transform (grid → surface):
//! 1. `iso = ((x − y)·cos30°, (x + y)·0.5 − z)`
//! 2. scale by the tile size, then by `zoom`
//! 3. rotate by `rotation` degrees
//! 4. translate by the pan offset plus the viewport center
//!
//! The inverse undoes each step in reverse order and solves the 2×2
//! isometric basis for grid x/y. It is only used for picking; committed
//! geometry never comes from it.

use serde::{Deserialize, Serialize};

use crate::collision::Bounds;
use crate::constants::view::*;
use crate::objects::ObjectId;
use crate::room::{Room, RoomId};

/// A point on the rendering surface, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

/// A point on the grid plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

/// View state. Affects only the projection, never collision or simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    zoom: f64,
    /// Degrees; unbounded.
    pub rotation: f64,
    /// Pan offset in surface pixels.
    pub pan: SurfacePoint,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            pan: SurfacePoint::default(),
        }
    }
}

impl Camera {
    pub fn new(zoom: f64, rotation: f64, pan: SurfacePoint) -> Self {
        Self {
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
            rotation,
            pan,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set zoom, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Wheel input: negative `notches` zoom in.
    pub fn wheel(&mut self, notches: f64) {
        self.set_zoom(self.zoom - notches * WHEEL_ZOOM_STEP);
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation += degrees;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = 0.0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rotation folded into `[0, 360)`, for hosts that need wraparound.
    pub fn wrapped_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }

    pub fn apply_key(&mut self, key: CameraKey) {
        match key {
            CameraKey::ZoomIn => self.zoom_in(),
            CameraKey::ZoomOut => self.zoom_out(),
            CameraKey::ResetRotation => self.reset_rotation(),
            CameraKey::ResetCamera => self.reset(),
            CameraKey::RotateLeft => self.rotate_by(-ROTATION_STEP),
            CameraKey::RotateRight => self.rotate_by(ROTATION_STEP),
        }
    }
}

/// Keyboard shortcuts understood by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraKey {
    ZoomIn,
    ZoomOut,
    ResetRotation,
    ResetCamera,
    RotateLeft,
    RotateRight,
}

impl CameraKey {
    /// Map a host key name (DOM-style, case-insensitive) to a shortcut.
    /// `ctrl` covers both Ctrl and Cmd.
    pub fn from_key(key: &str, ctrl: bool) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "+" | "=" => Some(Self::ZoomIn),
            "-" => Some(Self::ZoomOut),
            "r" if ctrl => Some(Self::ResetCamera),
            "r" => Some(Self::ResetRotation),
            "arrowleft" => Some(Self::RotateLeft),
            "arrowright" => Some(Self::RotateRight),
            _ => None,
        }
    }
}

/// Rendering surface size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> SurfacePoint {
        SurfacePoint {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

/// A camera bound to a viewport. Stateless beyond those two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub camera: Camera,
    pub viewport: Viewport,
}

impl Projection {
    pub fn new(camera: Camera, viewport: Viewport) -> Self {
        Self { camera, viewport }
    }

    /// Grid → surface.
    pub fn to_surface(&self, gx: f64, gy: f64, gz: f64) -> SurfacePoint {
        let iso_x = (gx - gy) * ISO_COS;
        let iso_y = (gx + gy) * ISO_SIN - gz;

        let scale = TILE_SIZE * self.camera.zoom;
        let px = iso_x * scale;
        let py = iso_y * scale;

        let (sin, cos) = self.camera.rotation.to_radians().sin_cos();
        let rx = px * cos - py * sin;
        let ry = px * sin + py * cos;

        let c = self.viewport.center();
        SurfacePoint {
            x: rx + self.camera.pan.x + c.x,
            y: ry + self.camera.pan.y + c.y,
        }
    }

    /// Surface → grid on the ground layer.
    pub fn to_grid(&self, sx: f64, sy: f64) -> GridPoint {
        self.to_grid_at_elevation(sx, sy, 0.0)
    }

    /// Surface → grid, assuming the point lies on elevation `gz`.
    pub fn to_grid_at_elevation(&self, sx: f64, sy: f64, gz: f64) -> GridPoint {
        let c = self.viewport.center();
        let px = sx - self.camera.pan.x - c.x;
        let py = sy - self.camera.pan.y - c.y;

        let (sin, cos) = self.camera.rotation.to_radians().sin_cos();
        let ux = px * cos + py * sin;
        let uy = -px * sin + py * cos;

        let scale = TILE_SIZE * self.camera.zoom;
        let iso_x = ux / scale;
        let iso_y = uy / scale + gz;

        // x − y = iso_x / cos30, x + y = iso_y / 0.5
        let diff = iso_x / ISO_COS;
        let sum = iso_y / ISO_SIN;
        GridPoint {
            x: (sum + diff) / 2.0,
            y: (sum - diff) / 2.0,
        }
    }

    /// Topmost room under a surface point. Later rooms draw over earlier
    /// ones, so the search runs in reverse; footprints get a small margin.
    pub fn pick_room(&self, sx: f64, sy: f64, rooms: &[Room]) -> Option<RoomId> {
        rooms.iter().rev().find_map(|room| {
            let g = self.to_grid_at_elevation(sx, sy, room.position.z);
            Bounds::of_room(room)
                .footprint_contains(g.x, g.y, ROOM_HIT_MARGIN)
                .then_some(room.id)
        })
    }

    /// Topmost object under a surface point, as `(room, object)`.
    ///
    /// Each object gets a circular hitbox around its projected position,
    /// sized from its footprint with a floor of `MIN_OBJECT_HIT_RADIUS`.
    pub fn pick_object(&self, sx: f64, sy: f64, rooms: &[Room]) -> Option<(RoomId, ObjectId)> {
        let drawn = rooms
            .iter()
            .flat_map(|r| r.objects.iter().map(move |o| (r.id, o)));
        let drawn: Vec<_> = drawn.collect();

        drawn.into_iter().rev().find_map(|(room_id, obj)| {
            let center = self.to_surface(obj.position.x, obj.position.y, obj.position.z);
            let dims = obj.object_type.dimensions;
            let radius = (dims.width.max(dims.depth()) * TILE_SIZE * self.camera.zoom / 2.0)
                .max(MIN_OBJECT_HIT_RADIUS);
            let dist = ((sx - center.x).powi(2) + (sy - center.y).powi(2)).sqrt();
            (dist <= radius).then_some((room_id, obj.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ObjectCategory, ObjectType, PlacedObject};
    use crate::room::{Dimensions, Position, RoomType};

    const EPS: f64 = 1e-9;

    fn proj(zoom: f64, rotation: f64) -> Projection {
        Projection::new(
            Camera::new(zoom, rotation, SurfacePoint { x: 37.0, y: -12.5 }),
            Viewport::default(),
        )
    }

    #[test]
    fn test_origin_maps_to_center_plus_pan() {
        let p = proj(1.0, 0.0).to_surface(0.0, 0.0, 0.0);
        assert!((p.x - (400.0 + 37.0)).abs() < EPS);
        assert!((p.y - (300.0 - 12.5)).abs() < EPS);
    }

    #[test]
    fn test_forward_matches_iso_basis() {
        let p = Projection::new(Camera::default(), Viewport::default()).to_surface(2.0, 1.0, 1.0);
        assert!((p.x - (400.0 + ISO_COS * 30.0)).abs() < EPS);
        assert!((p.y - (300.0 + (1.5 - 1.0) * 30.0)).abs() < EPS);
    }

    #[test]
    fn test_round_trip_over_camera_states() {
        for &zoom in &[0.1, 0.35, 1.0, 2.2, 3.0] {
            for rot in (0..360).step_by(23) {
                let p = proj(zoom, rot as f64);
                for gx in [0.0, 3.3, 10.0, 19.9, 20.0] {
                    for gy in [0.0, 0.5, 7.25, 20.0] {
                        let s = p.to_surface(gx, gy, 0.0);
                        let g = p.to_grid(s.x, s.y);
                        assert!((g.x - gx).abs() < 1e-6, "x {gx} z{zoom} r{rot}: {}", g.x);
                        assert!((g.y - gy).abs() < 1e-6, "y {gy} z{zoom} r{rot}: {}", g.y);
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_trip_with_known_elevation() {
        let p = proj(1.7, 123.0);
        let s = p.to_surface(5.0, 8.0, 2.0);
        let g = p.to_grid_at_elevation(s.x, s.y, 2.0);
        assert!((g.x - 5.0).abs() < 1e-6 && (g.y - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cam = Camera::default();
        for _ in 0..50 {
            cam.zoom_in();
        }
        assert_eq!(cam.zoom(), ZOOM_MAX);
        for _ in 0..50 {
            cam.zoom_out();
        }
        assert_eq!(cam.zoom(), ZOOM_MIN);
        cam.wheel(-100.0);
        assert_eq!(cam.zoom(), ZOOM_MAX);
        assert_eq!(Camera::new(9.0, 0.0, SurfacePoint::default()).zoom(), ZOOM_MAX);
    }

    #[test]
    fn test_rotation_unclamped_but_wraps_on_request() {
        let mut cam = Camera::default();
        cam.rotate_by(370.0);
        assert_eq!(cam.rotation, 370.0);
        assert!((cam.wrapped_rotation() - 10.0).abs() < EPS);
        cam.rotate_by(-400.0);
        assert!((cam.wrapped_rotation() - 330.0).abs() < EPS);
    }

    #[test]
    fn test_keyboard_shortcuts() {
        assert_eq!(CameraKey::from_key("=", false), Some(CameraKey::ZoomIn));
        assert_eq!(CameraKey::from_key("R", true), Some(CameraKey::ResetCamera));
        assert_eq!(CameraKey::from_key("r", false), Some(CameraKey::ResetRotation));
        assert_eq!(CameraKey::from_key("ArrowLeft", false), Some(CameraKey::RotateLeft));
        assert_eq!(CameraKey::from_key("q", false), None);

        let mut cam = Camera::default();
        cam.pan_by(10.0, 5.0);
        cam.apply_key(CameraKey::RotateRight);
        cam.apply_key(CameraKey::RotateRight);
        assert_eq!(cam.rotation, 30.0);
        cam.apply_key(CameraKey::ResetRotation);
        assert_eq!(cam.rotation, 0.0);
        assert_eq!(cam.pan.x, 10.0);
        cam.apply_key(CameraKey::ResetCamera);
        assert_eq!(cam, Camera::default());
    }

    fn room_at(id: RoomId, x: f64, y: f64) -> Room {
        let mut r = Room::from_type(id, RoomType::Research, format!("R{id}"), Position::flat(x, y), 1);
        r.dimensions = Dimensions::new(2.0, 3.0, 2.0);
        r
    }

    #[test]
    fn test_pick_room_with_margin() {
        let p = proj(1.3, 40.0);
        let rooms = vec![room_at(1, 2.0, 2.0), room_at(2, 10.0, 10.0)];

        let s = p.to_surface(3.0, 3.0, 0.0);
        assert_eq!(p.pick_room(s.x, s.y, &rooms), Some(1));

        // Just outside the footprint but inside the margin
        let s = p.to_surface(4.1, 3.0, 0.0);
        assert_eq!(p.pick_room(s.x, s.y, &rooms), Some(1));

        let s = p.to_surface(7.0, 7.0, 0.0);
        assert_eq!(p.pick_room(s.x, s.y, &rooms), None);
    }

    #[test]
    fn test_pick_room_prefers_topmost() {
        let p = proj(1.0, 0.0);
        let rooms = vec![room_at(1, 2.0, 2.0), room_at(2, 2.0, 2.0)];
        let s = p.to_surface(3.0, 3.0, 0.0);
        assert_eq!(p.pick_room(s.x, s.y, &rooms), Some(2));
    }

    #[test]
    fn test_pick_object_topmost_first() {
        let p = proj(1.0, 0.0);
        let obj_type = ObjectType {
            id: "plant-pot".into(),
            name: "Decorative Plant".into(),
            category: ObjectCategory::Decoration,
            dimensions: Dimensions::new(0.4, 0.6, 0.4),
            room_types: vec![RoomType::Research],
            icon: "P".into(),
            model: None,
        };
        let mut a = room_at(1, 2.0, 2.0);
        let mut b = room_at(2, 2.0, 2.0);
        a.objects.push(PlacedObject {
            id: 10,
            object_type: obj_type.clone(),
            position: Position::flat(3.0, 3.0),
            rotation: 0.0,
        });
        b.objects.push(PlacedObject {
            id: 11,
            object_type: obj_type,
            position: Position::flat(3.1, 3.0),
            rotation: 0.0,
        });
        let rooms = vec![a, b];

        let s = p.to_surface(3.0, 3.0, 0.0);
        // Both hitboxes cover the point (min radius 12px); the later one wins
        assert_eq!(p.pick_object(s.x, s.y, &rooms), Some((2, 11)));

        let far = p.to_surface(15.0, 15.0, 0.0);
        assert_eq!(p.pick_object(far.x, far.y, &rooms), None);
    }
}
