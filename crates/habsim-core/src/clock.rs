//! Wall-clock scheduling for the two periodic sources of mutation.
//!
//! The simulation tick and the cosmetic crew-movement tick run on separate
//! periods. [`SimClock::advance`] turns elapsed wall time into
//! [`ClockEvent`]s pushed onto one [`EventQueue`]; the engine drains that
//! queue in `(due_ms, sequence)` order, so interleaving is deterministic no
//! matter how the host slices wall time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use habsim_logic::config::SimConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEventKind {
    /// Advance simulated time: resources, crew needs, validation, score.
    SimTick,
    /// Nudge crew positions. Cosmetic.
    CrewMove,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockEvent {
    /// Wall-clock time the event fell due, in ms since the clock was created.
    pub due_ms: u64,
    /// Tiebreak for events due at the same instant; lower fires first.
    pub sequence: u64,
    pub kind: ClockEventKind,
}

// BinaryHeap is a max-heap; reverse so the earliest (due, seq) pops first.
impl PartialEq for ClockEvent {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.sequence == other.sequence
    }
}

impl Eq for ClockEvent {}

impl PartialOrd for ClockEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClockEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-heap of pending clock events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<ClockEvent>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, kind: ClockEventKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ClockEvent {
            due_ms,
            sequence,
            kind,
        });
    }

    pub fn pop(&mut self) -> Option<ClockEvent> {
        self.heap.pop()
    }

    /// Drop everything pending. Returns how many events were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.heap.len();
        self.heap.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Two independent periodic timers over a shared wall clock.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now_ms: u64,
    running: bool,
    tick_period_ms: u64,
    move_period_ms: u64,
    next_tick_ms: u64,
    next_move_ms: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start (or restart) both timers from now.
    pub fn start(&mut self, config: &SimConfig, speed: u32) {
        self.tick_period_ms = config.tick_period_ms.max(1);
        self.move_period_ms = config.movement_period_ms(speed);
        self.next_tick_ms = self.now_ms + self.tick_period_ms;
        self.next_move_ms = self.now_ms + self.move_period_ms;
        self.running = true;
    }

    /// Stop both timers. Time keeps passing but nothing is scheduled.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Re-time the movement timer for a new speed. The tick period is fixed;
    /// speed only scales the simulated step.
    pub fn set_speed(&mut self, config: &SimConfig, speed: u32) {
        self.move_period_ms = config.movement_period_ms(speed);
        if self.running {
            self.next_move_ms = self.now_ms + self.move_period_ms;
        }
    }

    /// Let `elapsed_ms` of wall time pass, scheduling every timer firing
    /// that falls inside it. Returns the number of events scheduled.
    pub fn advance(&mut self, elapsed_ms: u64, queue: &mut EventQueue) -> usize {
        let target = self.now_ms.saturating_add(elapsed_ms);
        let mut scheduled = 0;

        if self.running {
            loop {
                // Ties go to the simulation tick
                let (due, kind) = if self.next_tick_ms <= self.next_move_ms {
                    (self.next_tick_ms, ClockEventKind::SimTick)
                } else {
                    (self.next_move_ms, ClockEventKind::CrewMove)
                };
                if due > target {
                    break;
                }
                queue.schedule(due, kind);
                scheduled += 1;
                match kind {
                    ClockEventKind::SimTick => self.next_tick_ms += self.tick_period_ms,
                    ClockEventKind::CrewMove => self.next_move_ms += self.move_period_ms,
                }
            }
        }

        self.now_ms = target;
        scheduled
    }
}
