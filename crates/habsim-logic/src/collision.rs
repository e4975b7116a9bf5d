//! Axis-aligned room collision and placement search.
//!
//! Bounds are `[x, x+w] × [y, y+d] × [z, z+h]` with width/depth swapped for
//! quarter-turn rotations. Overlap is strict on every axis, so rooms that
//! share a wall do not collide.
//!
//! Placement search:
//! 1. Reject footprints larger than the grid outright
//! 2. First half of the attempts: deterministic column-major grid scan on z=0
//! 3. Second half: uniform random positions, including a random z-layer
//! 4. First candidate that overlaps nothing wins; otherwise the search fails

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::grid;
use crate::error::PlacementError;
use crate::room::{Dimensions, Position, Room, RoomId, Rotation};

/// 3-D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    /// Bounds of a box at `position` with `dimensions` turned by `rotation`.
    pub fn at(position: Position, dimensions: Dimensions, rotation: Rotation) -> Self {
        let eff = dimensions.rotated(rotation);
        Self {
            min_x: position.x,
            max_x: position.x + eff.width,
            min_y: position.y,
            max_y: position.y + eff.depth(),
            min_z: position.z,
            max_z: position.z + eff.height,
        }
    }

    pub fn of_room(room: &Room) -> Self {
        Self::at(room.position, room.dimensions, room.rotation)
    }

    /// Strict overlap on all three axes. Touching faces do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        let x = self.min_x < other.max_x && self.max_x > other.min_x;
        let y = self.min_y < other.max_y && self.max_y > other.min_y;
        let z = self.min_z < other.max_z && self.max_z > other.min_z;
        x && y && z
    }

    /// Whether the horizontal footprint lies inside the grid.
    pub fn within_grid(&self) -> bool {
        self.min_x >= 0.0 && self.min_y >= 0.0 && self.max_x <= grid::WIDTH && self.max_y <= grid::DEPTH
    }

    /// Whether a grid point falls inside the footprint grown by `margin`.
    pub fn footprint_contains(&self, x: f64, y: f64, margin: f64) -> bool {
        x >= self.min_x - margin
            && x <= self.max_x + margin
            && y >= self.min_y - margin
            && y <= self.max_y + margin
    }
}

/// Whether two rooms overlap in 3-D.
pub fn rooms_overlap(a: &Room, b: &Room) -> bool {
    Bounds::of_room(a).overlaps(&Bounds::of_room(b))
}

/// Whether a box at `position` with `dimensions` overlaps any of `existing`.
pub fn would_overlap(position: Position, dimensions: Dimensions, existing: &[Room]) -> bool {
    first_overlap(Bounds::at(position, dimensions, Rotation::Deg0), existing).is_some()
}

/// The first room in `existing` that `bounds` collides with.
fn first_overlap(bounds: Bounds, existing: &[Room]) -> Option<RoomId> {
    existing
        .iter()
        .find(|r| bounds.overlaps(&Bounds::of_room(r)))
        .map(|r| r.id)
}

fn fits_grid(dimensions: &Dimensions) -> Result<(), PlacementError> {
    if dimensions.width > grid::WIDTH || dimensions.depth() > grid::DEPTH {
        return Err(PlacementError::TooLargeForGrid {
            width: dimensions.width,
            depth: dimensions.depth(),
        });
    }
    Ok(())
}

/// Search budget for [`find_valid_position`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSearch {
    pub max_attempts: u32,
    /// Spacing of the deterministic scan, in grid units.
    pub grid_step: f64,
}

impl Default for PlacementSearch {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            grid_step: 1.0,
        }
    }
}

/// Find a position where a box of `dimensions` overlaps none of `existing`.
///
/// Callers must treat `Err` as a rejected action; the search is bounded and
/// never retried internally.
pub fn find_valid_position<R: Rng + ?Sized>(
    dimensions: Dimensions,
    existing: &[Room],
    search: &PlacementSearch,
    rng: &mut R,
) -> Result<Position, PlacementError> {
    if let Err(e) = fits_grid(&dimensions) {
        warn!("placement rejected: {e}");
        return Err(e);
    }

    let width = dimensions.width;
    let depth = dimensions.depth();
    let step = if search.grid_step > 0.0 { search.grid_step } else { 1.0 };
    let rows = ((grid::DEPTH / step).floor() as u32).max(1);
    let grid_attempts = search.max_attempts / 2 + search.max_attempts % 2;

    for attempt in 0..search.max_attempts {
        let candidate = if attempt < grid_attempts {
            let gx = (attempt / rows) as f64 * step;
            let gy = (attempt % rows) as f64 * step;
            Position::flat(gx.min(grid::WIDTH - width), gy.min(grid::DEPTH - depth))
        } else {
            Position::new(
                (rng.gen::<f64>() * (grid::WIDTH - width)).floor(),
                (rng.gen::<f64>() * (grid::DEPTH - depth)).floor(),
                rng.gen_range(0..grid::LAYERS) as f64,
            )
        };

        if !would_overlap(candidate, dimensions, existing) {
            debug!(
                "placed {}×{} at ({}, {}, {}) on attempt {}",
                width, depth, candidate.x, candidate.y, candidate.z, attempt
            );
            return Ok(candidate);
        }
    }

    Err(PlacementError::NoValidPosition {
        attempts: search.max_attempts,
    })
}

/// Greedily re-place `rooms` in order, each against those already arranged.
///
/// A room the search cannot place keeps its original position and is
/// flagged invalid. No backtracking.
pub fn auto_arrange<R: Rng + ?Sized>(
    rooms: &[Room],
    search: &PlacementSearch,
    rng: &mut R,
) -> Vec<Room> {
    let mut arranged: Vec<Room> = Vec::with_capacity(rooms.len());

    for room in rooms {
        let mut placed = room.clone();
        match find_valid_position(room.effective_dimensions(), &arranged, search, rng) {
            Ok(position) => {
                placed.position = position;
                placed.is_valid = true;
            }
            Err(e) => {
                placed.is_valid = false;
                debug!("auto-arrange kept room #{} in place: {e}", room.id);
            }
        }
        arranged.push(placed);
    }

    arranged
}

/// Validate moving `room_id` to `proposed` with `rotation`.
///
/// The position is first clamped so the rotated footprint stays inside the
/// grid, then tested against every other room. Any overlap rejects the move.
/// Returns the clamped position to commit.
pub fn validate_move(
    rooms: &[Room],
    room_id: RoomId,
    proposed: Position,
    rotation: Rotation,
) -> Result<Position, PlacementError> {
    let room = rooms
        .iter()
        .find(|r| r.id == room_id)
        .ok_or(PlacementError::RoomNotFound(room_id))?;

    let eff = room.dimensions.rotated(rotation);
    fits_grid(&eff)?;

    let clamped = Position {
        x: proposed.x.clamp(0.0, grid::WIDTH - eff.width),
        y: proposed.y.clamp(0.0, grid::DEPTH - eff.depth()),
        z: proposed.z.max(0.0),
    };

    let bounds = Bounds::at(clamped, room.dimensions, rotation);
    let others = rooms.iter().filter(|r| r.id != room_id);
    for other in others {
        if bounds.overlaps(&Bounds::of_room(other)) {
            return Err(PlacementError::WouldOverlap {
                room: room_id,
                other: other.id,
            });
        }
    }

    Ok(clamped)
}

/// Positions flush against each side of, above, and below existing rooms
/// (one unit apart) that fit the grid and collide with nothing.
pub fn suggested_positions(dimensions: Dimensions, existing: &[Room]) -> Vec<Position> {
    const SPACING: f64 = 1.0;

    if existing.is_empty() {
        return vec![Position::ORIGIN];
    }

    let width = dimensions.width;
    let depth = dimensions.depth();
    let mut suggestions = Vec::new();

    for room in existing {
        let b = Bounds::of_room(room);
        let p = room.position;
        let candidates = [
            Position::new(b.max_x + SPACING, p.y, p.z),
            Position::new(b.min_x - width - SPACING, p.y, p.z),
            Position::new(p.x, b.max_y + SPACING, p.z),
            Position::new(p.x, b.min_y - depth - SPACING, p.z),
            Position::new(p.x, p.y, b.max_z + SPACING),
            Position::new(p.x, p.y, (b.min_z - dimensions.height - SPACING).max(0.0)),
        ];

        for c in candidates {
            let in_grid = c.x >= 0.0
                && c.y >= 0.0
                && c.z >= 0.0
                && c.x + width <= grid::WIDTH
                && c.y + depth <= grid::DEPTH;
            if in_grid && !would_overlap(c, dimensions, existing) && !suggestions.contains(&c) {
                suggestions.push(c);
            }
        }
    }

    suggestions
}

/// Every pair of rooms that overlaps, as id pairs.
pub fn overlapping_pairs(rooms: &[Room]) -> Vec<(RoomId, RoomId)> {
    let bounds: Vec<Bounds> = rooms.iter().map(Bounds::of_room).collect();
    let mut pairs = Vec::new();
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            if bounds[i].overlaps(&bounds[j]) {
                pairs.push((rooms[i].id, rooms[j].id));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_room(id: RoomId, x: f64, y: f64, w: f64, d: f64) -> Room {
        let mut r = Room::from_type(id, RoomType::Storage, format!("Storage {id}"), Position::flat(x, y), 1);
        r.dimensions = Dimensions::new(w, 3.0, d);
        r
    }

    #[test]
    fn test_touching_rooms_do_not_overlap() {
        let a = make_room(1, 0.0, 0.0, 4.0, 4.0);
        let b = make_room(2, 4.0, 0.0, 4.0, 4.0);
        assert!(!rooms_overlap(&a, &b));
    }

    #[test]
    fn test_overlap_requires_all_axes() {
        let a = make_room(1, 0.0, 0.0, 4.0, 4.0);
        let mut b = make_room(2, 2.0, 2.0, 4.0, 4.0);
        assert!(rooms_overlap(&a, &b));
        // Stacked exactly on top: z ranges touch, no overlap
        b.position.z = 3.0;
        assert!(!rooms_overlap(&a, &b));
    }

    #[test]
    fn test_would_overlap_scenario() {
        let existing = vec![
            make_room(1, 0.0, 0.0, 4.0, 4.0),
            make_room(2, 4.0, 0.0, 4.0, 4.0),
        ];
        let dims = Dimensions::square(4.0, 3.0);
        assert!(would_overlap(Position::flat(2.0, 2.0), dims, &existing));
        assert!(!would_overlap(Position::flat(8.0, 0.0), dims, &existing));
    }

    #[test]
    fn test_rotation_symmetry() {
        let mut rotated = make_room(1, 3.0, 2.0, 6.0, 2.0);
        rotated.rotation = Rotation::Deg90;
        let pre_swapped = make_room(1, 3.0, 2.0, 2.0, 6.0);
        assert_eq!(Bounds::of_room(&rotated), Bounds::of_room(&pre_swapped));

        rotated.rotation = Rotation::Deg270;
        assert_eq!(Bounds::of_room(&rotated), Bounds::of_room(&pre_swapped));
    }

    #[test]
    fn test_find_in_empty_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        let dims = Dimensions::square(4.0, 3.0);
        let pos = find_valid_position(dims, &[], &PlacementSearch::default(), &mut rng).unwrap();
        assert!(pos.x + 4.0 <= grid::WIDTH);
        assert!(pos.y + 4.0 <= grid::DEPTH);
        assert!(!would_overlap(pos, dims, &[]));
        assert_eq!(pos, Position::ORIGIN);
    }

    #[test]
    fn test_grid_scan_is_column_major() {
        let mut rng = StdRng::seed_from_u64(1);
        // Block the origin; the scan should step along y before x.
        let existing = vec![make_room(1, 0.0, 0.0, 1.0, 1.0)];
        let dims = Dimensions::square(1.0, 1.0);
        let pos = find_valid_position(dims, &existing, &PlacementSearch::default(), &mut rng).unwrap();
        assert_eq!(pos, Position::flat(0.0, 1.0));
    }

    #[test]
    fn test_too_large_rejected_immediately() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = find_valid_position(
            Dimensions::new(21.0, 3.0, 3.0),
            &[],
            &PlacementSearch::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PlacementError::TooLargeForGrid {
                width: 21.0,
                depth: 3.0
            }
        );
    }

    #[test]
    fn test_full_grid_exhausts_attempts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut wall = make_room(1, 0.0, 0.0, 20.0, 20.0);
        wall.dimensions.height = 10.0;
        let err = find_valid_position(
            Dimensions::square(2.0, 2.0),
            &[wall],
            &PlacementSearch::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(err, PlacementError::NoValidPosition { attempts: 100 });
    }

    #[test]
    fn test_auto_arrange_leaves_no_overlaps() {
        let rooms: Vec<Room> = (0..8).map(|i| make_room(i, 0.0, 0.0, 4.0, 3.0)).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let arranged = auto_arrange(&rooms, &PlacementSearch::default(), &mut rng);
        assert_eq!(arranged.len(), 8);
        assert!(overlapping_pairs(&arranged).is_empty());
        assert!(arranged.iter().all(|r| r.is_valid));
        // Order is preserved
        let ids: Vec<RoomId> = arranged.iter().map(|r| r.id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_auto_arrange_flags_unplaceable_room() {
        let mut big = make_room(1, 0.0, 0.0, 20.0, 20.0);
        big.dimensions.height = 10.0;
        let small = make_room(2, 3.0, 3.0, 2.0, 2.0);
        let mut rng = StdRng::seed_from_u64(5);
        let arranged = auto_arrange(&[big, small], &PlacementSearch::default(), &mut rng);
        assert!(arranged[0].is_valid);
        assert!(!arranged[1].is_valid);
        assert_eq!(arranged[1].position, Position::flat(3.0, 3.0));
    }

    #[test]
    fn test_auto_arrange_failed_search_is_invalid_even_when_clear() {
        let rooms = vec![
            make_room(1, 0.0, 0.0, 4.0, 4.0),
            make_room(2, 10.0, 10.0, 4.0, 4.0),
        ];
        // One scan candidate at the origin, already taken by room 1
        let search = PlacementSearch {
            max_attempts: 1,
            grid_step: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let arranged = auto_arrange(&rooms, &search, &mut rng);
        assert!(arranged[0].is_valid);
        assert!(!arranged[1].is_valid);
        assert_eq!(arranged[1].position, Position::flat(10.0, 10.0));
        assert!(!would_overlap(arranged[1].position, arranged[1].dimensions, &arranged[..1]));
    }

    #[test]
    fn test_overlapping_rooms_are_invalid_after_arrange() {
        let mut rng = StdRng::seed_from_u64(21);
        let rooms: Vec<Room> = (0..30).map(|i| make_room(i, 1.0, 1.0, 5.0, 4.0)).collect();
        let arranged = auto_arrange(&rooms, &PlacementSearch::default(), &mut rng);
        assert!(arranged.iter().any(|r| !r.is_valid), "grid should saturate");
        for (i, room) in arranged.iter().enumerate() {
            let hit = first_overlap(Bounds::of_room(room), &arranged[..i]).is_some();
            if hit {
                assert!(!room.is_valid, "room #{} overlaps but is valid", room.id);
            }
            if !room.is_valid {
                assert_eq!(room.position, Position::flat(1.0, 1.0), "room #{}", room.id);
            }
        }
        let valid: Vec<Room> = arranged.iter().filter(|r| r.is_valid).cloned().collect();
        assert!(overlapping_pairs(&valid).is_empty());
    }

    #[test]
    fn test_validate_move_rejects_overlap() {
        let rooms = vec![
            make_room(1, 0.0, 0.0, 4.0, 4.0),
            make_room(2, 10.0, 10.0, 4.0, 4.0),
        ];
        let err = validate_move(&rooms, 2, Position::flat(1.0, 1.0), Rotation::Deg0).unwrap_err();
        assert_eq!(err, PlacementError::WouldOverlap { room: 2, other: 1 });
        let ok = validate_move(&rooms, 2, Position::flat(4.0, 0.0), Rotation::Deg0).unwrap();
        assert_eq!(ok, Position::flat(4.0, 0.0));
    }

    #[test]
    fn test_validate_move_clamps_with_rotation() {
        let rooms = vec![make_room(1, 0.0, 0.0, 6.0, 2.0)];
        let p = validate_move(&rooms, 1, Position::new(30.0, 30.0, -1.0), Rotation::Deg90).unwrap();
        // Rotated footprint is 2 wide, 6 deep
        assert_eq!(p, Position::new(18.0, 14.0, 0.0));
    }

    #[test]
    fn test_validate_move_unknown_room() {
        let err = validate_move(&[], 9, Position::ORIGIN, Rotation::Deg0).unwrap_err();
        assert_eq!(err, PlacementError::RoomNotFound(9));
    }

    #[test]
    fn test_suggestions_are_free_and_in_grid() {
        let existing = vec![make_room(1, 5.0, 5.0, 4.0, 4.0)];
        let dims = Dimensions::new(3.0, 3.0, 3.0);
        let suggestions = suggested_positions(dims, &existing);
        assert!(!suggestions.is_empty());
        for s in &suggestions {
            assert!(!would_overlap(*s, dims, &existing));
            assert!(s.x + 3.0 <= grid::WIDTH && s.y + 3.0 <= grid::DEPTH);
        }
        assert!(suggestions.contains(&Position::flat(10.0, 5.0)));
        assert_eq!(suggested_positions(dims, &[]), vec![Position::ORIGIN]);
    }
}
