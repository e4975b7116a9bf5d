//! Two-phase room drag: preview locally, commit once.
//!
//! A [`RoomDrag`] owns the preview position and rotation. Nothing it does
//! touches the engine until [`RoomDrag::commit`], which consumes the drag
//! and runs move validation. [`RoomDrag::abort`] consumes it without
//! effect, so an abandoned drag cannot leak into shared geometry.

use habsim_logic::constants::grid;
use habsim_logic::error::PlacementError;
use habsim_logic::projection::Projection;
use habsim_logic::room::{Position, RoomId, Rotation};

use crate::command::{Command, Notice, Rejection};
use crate::engine::SimulationEngine;

#[derive(Debug, Clone, PartialEq)]
pub struct RoomDrag {
    room: RoomId,
    origin: Position,
    origin_rotation: Rotation,
    /// Pointer grab point relative to the room origin, in grid units.
    grab_offset: (f64, f64),
    preview: Position,
    rotation: Rotation,
}

impl RoomDrag {
    /// Start dragging `room` from surface point `(sx, sy)`.
    pub fn begin(
        engine: &SimulationEngine,
        room: RoomId,
        sx: f64,
        sy: f64,
    ) -> Result<Self, Rejection> {
        let target = engine
            .state()
            .habitat
            .as_ref()
            .ok_or(Rejection::NoHabitat)?
            .room(room)
            .ok_or(PlacementError::RoomNotFound(room))?;

        let origin = target.position;
        let grab = engine
            .projection()
            .to_grid_at_elevation(sx, sy, origin.z);
        Ok(Self {
            room,
            origin,
            origin_rotation: target.rotation,
            grab_offset: (grab.x - origin.x, grab.y - origin.y),
            preview: origin,
            rotation: target.rotation,
        })
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn preview_position(&self) -> Position {
        self.preview
    }

    pub fn preview_rotation(&self) -> Rotation {
        self.rotation
    }

    /// Follow the pointer. The preview snaps to whole grid units and stays
    /// on the grid; overlap is not checked until commit.
    pub fn preview(&mut self, projection: &Projection, sx: f64, sy: f64) -> Position {
        let g = projection.to_grid_at_elevation(sx, sy, self.origin.z);
        let (x, y) = grid::clamp_xy(
            (g.x - self.grab_offset.0).round(),
            (g.y - self.grab_offset.1).round(),
        );
        self.preview = Position::new(x, y, self.origin.z);
        self.preview
    }

    /// Turn the preview a quarter clockwise.
    pub fn rotate_preview(&mut self) -> Rotation {
        self.rotation = self.rotation.turned();
        self.rotation
    }

    /// Whether the preview differs from where the room started.
    pub fn is_moved(&self) -> bool {
        self.preview != self.origin || self.rotation != self.origin_rotation
    }

    /// Release: validate and apply the move. On rejection the room stays
    /// where it was.
    pub fn commit(self, engine: &mut SimulationEngine) -> Result<Notice, Rejection> {
        engine.apply(Command::MoveRoom {
            room: self.room,
            position: self.preview,
            rotation: self.rotation,
        })
    }

    /// Abandon the drag. Returns the position the room snaps back to.
    pub fn abort(self) -> Position {
        self.origin
    }
}
