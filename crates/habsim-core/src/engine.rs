//! Simulation engine — the single owner of session state.
//!
//! Two ways in:
//! - [`SimulationEngine::apply`] for host commands (placement, objects,
//!   playback, camera). Rejected commands leave state and version as-is.
//! - [`SimulationEngine::advance`] for wall-clock time. Elapsed time is
//!   turned into clock events and drained one at a time, each a complete
//!   state transition.
//!
//! All geometry, needs and scoring math is delegated to `habsim-logic`;
//! the engine only sequences it and commits results.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use habsim_logic::catalog::Catalog;
use habsim_logic::collision::{auto_arrange, find_valid_position, suggested_positions, validate_move};
use habsim_logic::config::SimConfig;
use habsim_logic::crew::{generate_crew, wander};
use habsim_logic::error::{CatalogError, ObjectError, PlacementError};
use habsim_logic::habitat::{HabitatDesign, MissionScenario};
use habsim_logic::objects::{clamp_object_position, find_object, place_object, ObjectId};
use habsim_logic::projection::{Projection, Viewport};
use habsim_logic::resources::{consumption, days_remaining, ResourceKind, Resources};
use habsim_logic::room::{Position, RoomId, RoomType, Rotation};
use habsim_logic::simulation::step;
use habsim_logic::validation::evaluate;

use crate::clock::{ClockEventKind, EventQueue, SimClock};
use crate::command::{Command, Notice, Rejection};
use crate::state::{GameState, MissionFailure, SimSpeed};

/// What one call to [`SimulationEngine::advance`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub ticks: u32,
    pub moves: u32,
    /// Events dropped because the mission failed mid-batch.
    pub discarded: usize,
    pub failed: bool,
}

pub struct SimulationEngine {
    state: GameState,
    config: SimConfig,
    catalog: Catalog,
    rng: StdRng,
    clock: SimClock,
    queue: EventQueue,
    viewport: Viewport,
}

impl SimulationEngine {
    pub fn new(catalog: Catalog, config: SimConfig, seed: u64) -> Self {
        Self {
            state: GameState::default(),
            config,
            catalog,
            rng: StdRng::seed_from_u64(seed),
            clock: SimClock::new(),
            queue: EventQueue::new(),
            viewport: Viewport::default(),
        }
    }

    /// Engine over the built-in catalog with default tuning.
    pub fn with_builtin_catalog(seed: u64) -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::builtin()?, SimConfig::default(), seed))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Projection for the current camera and viewport.
    pub fn projection(&self) -> Projection {
        Projection::new(self.state.camera, self.viewport)
    }

    // ── Commands ──────────────────────────────────────────────────────

    /// Apply a host command. On `Err` nothing changed.
    pub fn apply(&mut self, command: Command) -> Result<Notice, Rejection> {
        let result = self.dispatch(command);
        match &result {
            Ok(_) => self.state.version += 1,
            Err(e) => warn!("command rejected: {e}"),
        }
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<Notice, Rejection> {
        match command {
            Command::StartMission { mission_id } => {
                let mission = self
                    .catalog
                    .mission(&mission_id)
                    .cloned()
                    .ok_or(Rejection::UnknownMission(mission_id))?;
                Ok(self.start_mission(mission))
            }
            Command::StartCustomMission { mission } => Ok(self.start_mission(mission)),
            Command::Reset => Ok(self.reset()),
            Command::Play | Command::Resume => self.play(),
            Command::Pause => self.pause(),
            Command::SetSpeed { speed } => Ok(self.set_speed(speed)),
            Command::AddRoom { room_type } => self.add_room(room_type),
            Command::RemoveRoom { room } => self.remove_room(room),
            Command::MoveRoom {
                room,
                position,
                rotation,
            } => self.move_room(room, position, rotation),
            Command::AutoArrange => self.arrange(),
            Command::SetAdjacency { room, adjacent } => self.set_adjacency(room, adjacent),
            Command::SelectRoom { room } => self.select_room(room),
            Command::AddObject { object_type } => self.add_object(&object_type),
            Command::MoveObject {
                room,
                object,
                position,
            } => self.move_object(room, object, position),
            Command::RemoveObject { room, object } => self.remove_object(room, object),
            Command::SelectObject { object } => self.select_object(object),
            Command::SetCrewStatus { crew, status } => {
                let member = self
                    .state
                    .crew
                    .iter_mut()
                    .find(|m| m.id == crew)
                    .ok_or(Rejection::CrewNotFound(crew))?;
                member.status = status;
                Ok(Notice::CrewStatusChanged { crew })
            }
            Command::CameraKey { key } => {
                self.state.camera.apply_key(key);
                Ok(Notice::CameraChanged)
            }
            Command::CameraWheel { notches } => {
                self.state.camera.wheel(notches);
                Ok(Notice::CameraChanged)
            }
            Command::CameraPan { dx, dy } => {
                self.state.camera.pan_by(dx, dy);
                Ok(Notice::CameraChanged)
            }
        }
    }

    fn habitat(&self) -> Result<&HabitatDesign, Rejection> {
        self.state.habitat.as_ref().ok_or(Rejection::NoHabitat)
    }

    fn habitat_mut(&mut self) -> Result<&mut HabitatDesign, Rejection> {
        self.state.habitat.as_mut().ok_or(Rejection::NoHabitat)
    }

    fn start_mission(&mut self, mission: MissionScenario) -> Notice {
        let mut habitat = HabitatDesign::from_mission(&mission);
        evaluate(&mut habitat);

        let crew = generate_crew(mission.crew_size, &self.catalog.crew_names, &mut self.rng);
        let resources = consumption(
            mission.crew_size,
            f64::from(mission.mission_duration),
            &self.config.consumption,
        );

        info!(
            "Mission '{}' started: {} crew, {} days, {} m³ ceiling",
            mission.id, mission.crew_size, mission.mission_duration, mission.constraints.max_volume
        );

        let notice = Notice::MissionStarted {
            mission: mission.id.clone(),
            crew: mission.crew_size,
        };
        self.state = GameState {
            version: self.state.version,
            habitat: Some(habitat),
            mission: Some(mission),
            crew,
            resources,
            is_playing: true,
            speed: self.state.speed,
            camera: self.state.camera,
            ..GameState::default()
        };
        self.queue.clear();
        self.clock.start(&self.config, self.state.speed.multiplier());
        notice
    }

    fn reset(&mut self) -> Notice {
        self.state = GameState {
            version: self.state.version,
            speed: self.state.speed,
            camera: self.state.camera,
            ..GameState::default()
        };
        self.clock.stop();
        self.queue.clear();
        info!("Session reset");
        Notice::Reset
    }

    fn playback_notice(&self) -> Notice {
        Notice::PlaybackChanged {
            playing: self.state.is_playing,
            paused: self.state.is_paused,
        }
    }

    fn play(&mut self) -> Result<Notice, Rejection> {
        self.habitat()?;
        if self.state.failure.is_some() {
            return Err(Rejection::MissionFailed);
        }
        // Already running: keep the timers' phase
        if self.state.is_running() {
            return Ok(self.playback_notice());
        }
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.clock.start(&self.config, self.state.speed.multiplier());
        Ok(self.playback_notice())
    }

    fn pause(&mut self) -> Result<Notice, Rejection> {
        self.habitat()?;
        self.state.is_paused = true;
        self.clock.stop();
        self.queue.clear();
        Ok(self.playback_notice())
    }

    fn set_speed(&mut self, speed: SimSpeed) -> Notice {
        self.state.speed = speed;
        self.clock.set_speed(&self.config, speed.multiplier());
        debug!("Speed set to {}×", speed.multiplier());
        Notice::SpeedChanged { speed }
    }

    fn add_room(&mut self, room_type: RoomType) -> Result<Notice, Rejection> {
        let habitat = self.state.habitat.as_ref().ok_or(Rejection::NoHabitat)?;
        let mut room = habitat.new_room(room_type, Position::ORIGIN);
        room.position = find_valid_position(
            room.dimensions,
            &habitat.rooms,
            &self.config.placement,
            &mut self.rng,
        )?;

        let (id, position) = (room.id, room.position);
        let habitat = self.habitat_mut()?;
        habitat.rooms.push(room);
        habitat.recompute_used_volume();
        evaluate(habitat);
        info!(
            "Room #{id} ({room_type}) added at ({}, {}, {})",
            position.x, position.y, position.z
        );

        self.state.selected_room = Some(id);
        self.state.selected_object = None;
        Ok(Notice::RoomAdded { room: id, position })
    }

    fn remove_room(&mut self, id: RoomId) -> Result<Notice, Rejection> {
        let habitat = self.habitat_mut()?;
        let removed = habitat
            .remove_room(id)
            .ok_or(PlacementError::RoomNotFound(id))?;
        evaluate(habitat);

        if self.state.selected_room == Some(id) {
            self.state.selected_room = None;
        }
        if let Some(obj) = self.state.selected_object {
            if removed.objects.iter().any(|o| o.id == obj) {
                self.state.selected_object = None;
            }
        }
        info!("Room #{id} removed");
        Ok(Notice::RoomRemoved { room: id })
    }

    fn move_room(
        &mut self,
        id: RoomId,
        proposed: Position,
        rotation: Rotation,
    ) -> Result<Notice, Rejection> {
        let habitat = self.habitat_mut()?;
        let position = validate_move(&habitat.rooms, id, proposed, rotation)?;
        let room = habitat
            .room_mut(id)
            .ok_or(PlacementError::RoomNotFound(id))?;

        // Objects travel with their room
        let (dx, dy) = (position.x - room.position.x, position.y - room.position.y);
        for obj in &mut room.objects {
            obj.position.x += dx;
            obj.position.y += dy;
        }
        room.position = position;
        room.rotation = rotation;

        // A turn can leave objects outside the new footprint
        let clamped: Vec<Position> = room
            .objects
            .iter()
            .map(|o| clamp_object_position(room, o, o.position))
            .collect();
        for (obj, p) in room.objects.iter_mut().zip(clamped) {
            obj.position = p;
        }
        evaluate(habitat);
        debug!("Room #{id} moved to ({}, {})", position.x, position.y);
        Ok(Notice::RoomMoved { room: id, position })
    }

    fn arrange(&mut self) -> Result<Notice, Rejection> {
        let placement = self.config.placement;
        let habitat = self.state.habitat.as_mut().ok_or(Rejection::NoHabitat)?;
        let arranged = auto_arrange(&habitat.rooms, &placement, &mut self.rng);

        // Objects follow their room's new origin
        let mut rooms = arranged;
        for (room, before) in rooms.iter_mut().zip(&habitat.rooms) {
            let (dx, dy) = (
                room.position.x - before.position.x,
                room.position.y - before.position.y,
            );
            for obj in &mut room.objects {
                obj.position.x += dx;
                obj.position.y += dy;
            }
        }
        habitat.rooms = rooms;
        evaluate(habitat);

        let invalid: Vec<RoomId> = habitat
            .rooms
            .iter()
            .filter(|r| !r.is_valid)
            .map(|r| r.id)
            .collect();
        if !invalid.is_empty() {
            warn!("Auto-arrange left {} room(s) invalid: {invalid:?}", invalid.len());
        }
        Ok(Notice::Arranged { invalid })
    }

    fn set_adjacency(&mut self, id: RoomId, adjacent: Vec<RoomId>) -> Result<Notice, Rejection> {
        let habitat = self.habitat_mut()?;
        if let Some(missing) = adjacent.iter().find(|&&a| habitat.room(a).is_none()) {
            return Err(PlacementError::RoomNotFound(*missing).into());
        }
        let room = habitat
            .room_mut(id)
            .ok_or(PlacementError::RoomNotFound(id))?;
        room.adjacent_rooms = adjacent.into_iter().filter(|&a| a != id).collect();
        evaluate(habitat);
        Ok(Notice::AdjacencyChanged { room: id })
    }

    fn select_room(&mut self, room: Option<RoomId>) -> Result<Notice, Rejection> {
        if let Some(id) = room {
            if self.habitat()?.room(id).is_none() {
                return Err(PlacementError::RoomNotFound(id).into());
            }
        }
        self.state.selected_room = room;
        self.state.selected_object = None;
        Ok(Notice::SelectionChanged)
    }

    fn add_object(&mut self, object_type: &str) -> Result<Notice, Rejection> {
        let room_id = self.state.selected_room.ok_or(Rejection::NoRoomSelected)?;
        let object = self
            .catalog
            .object(object_type)
            .cloned()
            .ok_or_else(|| ObjectError::UnknownObject(object_type.to_string()))?;

        let habitat = self.state.habitat.as_mut().ok_or(Rejection::NoHabitat)?;
        let object_id = habitat.next_object_id();
        let room = habitat.room_mut(room_id).ok_or(Rejection::NoRoomSelected)?;
        let placed = place_object(object_id, room, &object, &mut self.rng)?;
        room.objects.push(placed);

        debug!("Object #{object_id} ({object_type}) added to room #{room_id}");
        self.state.selected_object = Some(object_id);
        Ok(Notice::ObjectAdded {
            room: room_id,
            object: object_id,
        })
    }

    fn move_object(
        &mut self,
        room_id: RoomId,
        object_id: ObjectId,
        target: Position,
    ) -> Result<Notice, Rejection> {
        let habitat = self.habitat_mut()?;
        let not_found = ObjectError::ObjectNotFound {
            room: room_id,
            object: object_id,
        };
        let room = habitat.room_mut(room_id).ok_or(not_found.clone())?;
        let idx = room
            .objects
            .iter()
            .position(|o| o.id == object_id)
            .ok_or(not_found)?;
        let position = clamp_object_position(room, &room.objects[idx], target);
        room.objects[idx].position = position;
        Ok(Notice::ObjectMoved {
            object: object_id,
            position,
        })
    }

    fn remove_object(&mut self, room_id: RoomId, object_id: ObjectId) -> Result<Notice, Rejection> {
        let habitat = self.habitat_mut()?;
        let not_found = ObjectError::ObjectNotFound {
            room: room_id,
            object: object_id,
        };
        let room = habitat.room_mut(room_id).ok_or(not_found.clone())?;
        let before = room.objects.len();
        room.objects.retain(|o| o.id != object_id);
        if room.objects.len() == before {
            return Err(not_found.into());
        }
        if self.state.selected_object == Some(object_id) {
            self.state.selected_object = None;
        }
        Ok(Notice::ObjectRemoved { object: object_id })
    }

    fn select_object(&mut self, object: Option<ObjectId>) -> Result<Notice, Rejection> {
        if let Some(id) = object {
            let owner = find_object(&self.habitat()?.rooms, id)
                .map(|(room, _)| room.id)
                .ok_or(ObjectError::ObjectNotFound {
                    room: self.state.selected_room.unwrap_or_default(),
                    object: id,
                })?;
            self.state.selected_room = Some(owner);
        }
        self.state.selected_object = object;
        Ok(Notice::SelectionChanged)
    }

    // ── Clock ─────────────────────────────────────────────────────────

    /// Let `elapsed_ms` of wall time pass and process every clock event
    /// that fell due, in order.
    pub fn advance(&mut self, elapsed_ms: u64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if !self.state.is_running() {
            self.clock.advance(elapsed_ms, &mut self.queue);
            return report;
        }

        self.clock.advance(elapsed_ms, &mut self.queue);
        while let Some(event) = self.queue.pop() {
            match event.kind {
                ClockEventKind::SimTick => {
                    report.ticks += 1;
                    if self.sim_tick() {
                        report.failed = true;
                        report.discarded = self.queue.clear();
                        break;
                    }
                }
                ClockEventKind::CrewMove => {
                    report.moves += 1;
                    self.crew_move();
                }
            }
        }
        report
    }

    /// Run one simulation tick. Returns `true` when it ended the mission.
    fn sim_tick(&mut self) -> bool {
        let Some(snapshot) = self.state.snapshot() else {
            return false;
        };
        let days = self.config.step_days(self.state.speed.multiplier());
        let outcome = step(&snapshot, days, &self.config);
        let failed = outcome.is_failure();
        let day = outcome.next.days_passed;

        self.state.commit_snapshot(outcome.next);
        self.state.version += 1;

        if failed {
            warn!(
                "Mission failed on day {day:.1}: depleted {:?}",
                outcome.depleted
            );
            self.state.is_playing = false;
            self.state.failure = Some(MissionFailure {
                depleted: outcome.depleted,
                day,
            });
            self.clock.stop();
        }
        failed
    }

    fn crew_move(&mut self) {
        let speed = self.state.speed.multiplier();
        self.state.crew = wander(&self.state.crew, speed, &mut self.rng);
        self.state.version += 1;
    }

    // ── Queries ───────────────────────────────────────────────────────

    /// Room under a surface point, topmost first.
    pub fn pick_room(&self, sx: f64, sy: f64) -> Option<RoomId> {
        let habitat = self.state.habitat.as_ref()?;
        self.projection().pick_room(sx, sy, &habitat.rooms)
    }

    /// Object under a surface point, topmost first.
    pub fn pick_object(&self, sx: f64, sy: f64) -> Option<(RoomId, ObjectId)> {
        let habitat = self.state.habitat.as_ref()?;
        self.projection().pick_object(sx, sy, &habitat.rooms)
    }

    /// Free spots flush against existing rooms where a new `room_type`
    /// would fit.
    pub fn suggest_positions(&self, room_type: RoomType) -> Vec<Position> {
        match &self.state.habitat {
            Some(h) => suggested_positions(room_type.default_dimensions(h.crew_size), &h.rooms),
            None => Vec::new(),
        }
    }

    /// Consumption over one simulated day at the current crew size.
    pub fn daily_consumption(&self) -> Resources {
        consumption(self.crew_count(), 1.0, &self.config.consumption)
    }

    /// Consumption over the whole mission; also the starting pools.
    pub fn mission_supply(&self) -> Resources {
        let days = self
            .state
            .habitat
            .as_ref()
            .map_or(0.0, |h| f64::from(h.mission_duration));
        consumption(self.crew_count(), days, &self.config.consumption)
    }

    pub fn days_remaining(&self, kind: ResourceKind) -> Option<f64> {
        days_remaining(
            &self.state.resources,
            kind,
            self.crew_count(),
            &self.config.consumption,
        )
    }

    fn crew_count(&self) -> u32 {
        self.state.crew.len() as u32
    }
}
