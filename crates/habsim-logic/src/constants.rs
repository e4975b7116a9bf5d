//! Fixed constants — grid extent, projection scale, camera limits, clock cadence.
//!
//! Tunable rates (consumption per crew-day, score weights, search budget)
//! live in [`crate::config::SimConfig`]; the values here are structural and
//! not meant to be overridden.

/// The bounded placement grid.
pub mod grid {
    /// Horizontal extent along x, in grid units.
    pub const WIDTH: f64 = 20.0;
    /// Horizontal extent along y, in grid units.
    pub const DEPTH: f64 = 20.0;
    /// Number of elevation layers; z is drawn from `[0, LAYERS)`.
    pub const LAYERS: u32 = 3;

    /// Clamp a horizontal coordinate pair into the grid.
    pub fn clamp_xy(x: f64, y: f64) -> (f64, f64) {
        (x.clamp(0.0, WIDTH), y.clamp(0.0, DEPTH))
    }
}

/// Isometric projection and camera limits.
pub mod view {
    /// Surface pixels per grid unit before zoom.
    pub const TILE_SIZE: f64 = 30.0;
    /// cos(30°), the horizontal isometric basis factor.
    pub const ISO_COS: f64 = 0.866_025_403_784_438_6;
    /// Vertical isometric basis factor.
    pub const ISO_SIN: f64 = 0.5;

    pub const ZOOM_MIN: f64 = 0.1;
    pub const ZOOM_MAX: f64 = 3.0;
    /// Zoom change per keyboard / button step.
    pub const ZOOM_STEP: f64 = 0.2;
    /// Zoom change per wheel notch.
    pub const WHEEL_ZOOM_STEP: f64 = 0.1;
    /// Rotation change per arrow-key press, in degrees.
    pub const ROTATION_STEP: f64 = 15.0;

    /// Grid units added around a room footprint when picking.
    pub const ROOM_HIT_MARGIN: f64 = 0.25;
    /// Smallest object pick radius, in surface pixels.
    pub const MIN_OBJECT_HIT_RADIUS: f64 = 12.0;

    /// Default rendering surface size.
    pub const DEFAULT_VIEWPORT_WIDTH: f64 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;
}

/// Habitat envelope used when a mission seeds a new design.
pub mod habitat {
    pub const ENVELOPE_WIDTH: f64 = 20.0;
    pub const ENVELOPE_HEIGHT: f64 = 10.0;
    pub const ENVELOPE_DEPTH: f64 = 20.0;
    /// Default room height and depth when created from a room type.
    pub const DEFAULT_ROOM_HEIGHT: f64 = 3.0;
    pub const DEFAULT_ROOM_DEPTH: f64 = 3.0;
    /// Utilization window that earns the efficiency bonus (exclusive).
    pub const EFFICIENT_UTILIZATION: (f64, f64) = (0.7, 0.95);
}

/// Crew needs.
pub mod crew {
    pub const NEED_MIN: f64 = 0.0;
    pub const NEED_MAX: f64 = 100.0;
    /// Needs mean below which health starts to decay.
    pub const NEGLECT_THRESHOLD: f64 = 30.0;
    /// Chance per movement tick (at 1×) that a crew member moves.
    pub const MOVE_CHANCE: f64 = 0.3;
    /// Chance that a moving crew member also changes elevation layer.
    pub const LAYER_CHANGE_CHANCE: f64 = 0.2;
}
