//! Placeable objects — catalog entries, room compatibility, in-room placement.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::room::{Dimensions, Position, Room, RoomType};

pub type ObjectId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectCategory {
    Furniture,
    Equipment,
    Storage,
    Decoration,
}

/// A catalog entry describing something that can be placed in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub id: String,
    pub name: String,
    pub category: ObjectCategory,
    pub dimensions: Dimensions,
    /// Room types this object may be attached to.
    pub room_types: Vec<RoomType>,
    /// Display glyph.
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ObjectType {
    pub fn fits(&self, room_type: RoomType) -> bool {
        self.room_types.contains(&room_type)
    }
}

/// An object instance owned by a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub object_type: ObjectType,
    /// Habitat coordinates, not room-relative.
    pub position: Position,
    #[serde(default)]
    pub rotation: f64,
}

/// Create a placed object at a random spot inside `room`.
///
/// Fails with [`ObjectError::Incompatible`] when the room's type is not in
/// the object's compatible set.
pub fn place_object<R: Rng + ?Sized>(
    id: ObjectId,
    room: &Room,
    object: &ObjectType,
    rng: &mut R,
) -> Result<PlacedObject, ObjectError> {
    if !object.fits(room.room_type) {
        return Err(ObjectError::Incompatible {
            object: object.id.clone(),
            room_type: room.room_type,
        });
    }

    let dims = room.effective_dimensions();
    let x = room.position.x + rng.gen::<f64>() * (dims.width - 1.0).max(0.0);
    let y = room.position.y + rng.gen::<f64>() * (dims.depth() - 1.0).max(0.0);

    Ok(PlacedObject {
        id,
        object_type: object.clone(),
        position: Position::new(x, y, 0.0),
        rotation: 0.0,
    })
}

/// Clamp a proposed object position so its footprint stays inside `room`.
///
/// An object wider than the room pins to the room's near edge.
pub fn clamp_object_position(room: &Room, object: &PlacedObject, target: Position) -> Position {
    let room_dims = room.effective_dimensions();
    let obj_dims = object.object_type.dimensions;

    let min_x = room.position.x;
    let max_x = (room.position.x + room_dims.width - obj_dims.width).max(min_x);
    let min_y = room.position.y;
    let max_y = (room.position.y + room_dims.depth() - obj_dims.depth()).max(min_y);

    Position {
        x: target.x.max(min_x).min(max_x),
        y: target.y.max(min_y).min(max_y),
        z: target.z.max(0.0),
    }
}

/// Find an object by id in any of `rooms`.
pub fn find_object(rooms: &[Room], id: ObjectId) -> Option<(&Room, &PlacedObject)> {
    rooms
        .iter()
        .find_map(|r| r.objects.iter().find(|o| o.id == id).map(|o| (r, o)))
}
