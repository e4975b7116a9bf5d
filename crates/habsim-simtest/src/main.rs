//! HabSim Headless Simulation Harness
//!
//! Drives the session engine end to end without a renderer: catalog
//! checks, placement sweeps, projection round-trips and a mission run to
//! exhaustion. Exits non-zero when any check fails.
//!
//! Usage:
//!   cargo run -p habsim-simtest
//!   cargo run -p habsim-simtest -- --verbose --mission lunar-short --seed 7

use clap::Parser;
use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};

use habsim_core::prelude::*;
use habsim_logic::catalog::Catalog;
use habsim_logic::collision::overlapping_pairs;
use habsim_logic::constants::grid;
use habsim_logic::error::PlacementError;
use habsim_logic::projection::{Camera, Projection, SurfacePoint, Viewport};
use habsim_logic::resources::ResourceKind;
use habsim_logic::room::RoomType;

/// Headless checks for the habitat designer and mission simulation
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print every check, not just failures
    #[arg(short, long)]
    verbose: bool,

    /// Seed for crew generation, placement and crew movement
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Mission used for the run checks
    #[arg(short, long, default_value = "mars-transit")]
    mission: String,

    /// Simulated days for the steady-state run (defaults to half the mission)
    #[arg(short, long)]
    days: Option<u32>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).try_init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    println!("=== HabSim Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Built-in catalog
    let catalog = match Catalog::builtin() {
        Ok(c) => c,
        Err(e) => {
            println!("  ✗ catalog_parse: {e}");
            std::process::exit(1);
        }
    };
    results.extend(validate_catalog(&catalog));

    // 2. Room placement per mission
    results.extend(validate_placement(&catalog, args.seed));

    // 3. Auto-arrange
    results.extend(validate_auto_arrange(&args));

    // 4. Projection round-trips
    results.extend(validate_projection());

    // 5. Steady-state run
    results.extend(validate_mission_run(&args));

    // 6. Run to exhaustion
    results.extend(validate_mission_failure(&args));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn start(mission: &str, seed: u64) -> Result<SimulationEngine, String> {
    let mut engine = SimulationEngine::with_builtin_catalog(seed).map_err(|e| e.to_string())?;
    engine
        .apply(Command::StartMission {
            mission_id: mission.to_string(),
        })
        .map_err(|e| e.to_string())?;
    Ok(engine)
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(catalog: &Catalog) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "catalog_objects",
        catalog.objects.len() >= 20,
        format!("{} object types", catalog.objects.len()),
    ));

    // Every room type can hold at least one object
    let bare: Vec<_> = RoomType::ALL
        .into_iter()
        .filter(|&t| !catalog.objects.iter().any(|o| o.fits(t)))
        .collect();
    results.push(TestResult::new(
        "catalog_room_coverage",
        bare.is_empty(),
        if bare.is_empty() {
            "every room type has compatible objects".to_string()
        } else {
            format!("no objects for {bare:?}")
        },
    ));

    // Objects must fit inside the smallest room they can go in
    let oversized: Vec<_> = catalog
        .objects
        .iter()
        .filter(|o| o.dimensions.width > grid::WIDTH || o.dimensions.depth() > grid::DEPTH)
        .map(|o| o.id.as_str())
        .collect();
    results.push(TestResult::new(
        "catalog_object_sizes",
        oversized.is_empty(),
        format!("{} oversized", oversized.len()),
    ));

    // Missions list the four life-critical rooms
    let incomplete: Vec<_> = catalog
        .missions
        .iter()
        .filter(|m| {
            !RoomType::REQUIRED
                .iter()
                .all(|t| m.constraints.required_rooms.contains(t))
        })
        .map(|m| m.id.as_str())
        .collect();
    results.push(TestResult::new(
        "catalog_mission_requirements",
        incomplete.is_empty() && !catalog.missions.is_empty(),
        format!(
            "{} missions, {} missing core rooms",
            catalog.missions.len(),
            incomplete.len()
        ),
    ));

    results
}

// ── 2. Placement ────────────────────────────────────────────────────────

fn validate_placement(catalog: &Catalog, seed: u64) -> Vec<TestResult> {
    println!("--- Placement ---");
    let mut results = Vec::new();

    for mission in &catalog.missions {
        let mut engine = match start(&mission.id, seed) {
            Ok(e) => e,
            Err(e) => {
                results.push(TestResult::new(&format!("place_{}", mission.id), false, e));
                continue;
            }
        };

        // Oversized rooms and a full grid are legitimate rejections
        let mut placed = 0;
        let mut too_large = Vec::new();
        let mut no_space = Vec::new();
        let mut other_errors = Vec::new();
        for &t in &mission.constraints.required_rooms {
            match engine.apply(Command::AddRoom { room_type: t }) {
                Ok(_) => placed += 1,
                Err(Rejection::Placement(PlacementError::TooLargeForGrid { .. })) => {
                    too_large.push(t)
                }
                Err(Rejection::Placement(PlacementError::NoValidPosition { .. })) => {
                    no_space.push(t)
                }
                Err(e) => other_errors.push(format!("{t}: {e}")),
            }
        }

        let rooms = engine
            .state()
            .habitat
            .as_ref()
            .map(|h| h.rooms.as_slice())
            .unwrap_or_default();
        let overlaps = overlapping_pairs(rooms);
        debug!(
            "{}: placed {placed}, too large {too_large:?}, no space {no_space:?}, overlaps {overlaps:?}",
            mission.id
        );

        results.push(TestResult::new(
            &format!("place_{}", mission.id),
            overlaps.is_empty() && other_errors.is_empty(),
            format!(
                "{placed}/{} placed, {} too large for the grid, {} without space, {} overlaps{}",
                mission.constraints.required_rooms.len(),
                too_large.len(),
                no_space.len(),
                overlaps.len(),
                if other_errors.is_empty() {
                    String::new()
                } else {
                    format!(", errors: {}", other_errors.join("; "))
                }
            ),
        ));
    }

    results
}

// ── 3. Auto-arrange ─────────────────────────────────────────────────────

fn validate_auto_arrange(args: &Args) -> Vec<TestResult> {
    println!("--- Auto-arrange ---");
    let mut engine = match start(&args.mission, args.seed) {
        Ok(e) => e,
        Err(e) => return vec![TestResult::new("arrange_start", false, e)],
    };

    // Crowd the grid with small rooms, then re-lay them out
    let mut added = 0;
    for t in RoomType::ALL.into_iter().cycle().take(24) {
        if engine.apply(Command::AddRoom { room_type: t }).is_ok() {
            added += 1;
        }
    }

    let invalid = match engine.apply(Command::AutoArrange) {
        Ok(Notice::Arranged { invalid }) => invalid,
        Ok(other) => return vec![TestResult::new("arrange", false, format!("{other:?}"))],
        Err(e) => return vec![TestResult::new("arrange", false, e.to_string())],
    };

    let rooms = engine
        .state()
        .habitat
        .as_ref()
        .map(|h| h.rooms.clone())
        .unwrap_or_default();
    let valid: Vec<_> = rooms.into_iter().filter(|r| r.is_valid).collect();
    let overlaps = overlapping_pairs(&valid);

    vec![TestResult::new(
        "arrange_valid_rooms_disjoint",
        overlaps.is_empty(),
        format!(
            "{added} rooms, {} flagged invalid, {} overlaps among valid",
            invalid.len(),
            overlaps.len()
        ),
    )]
}

// ── 4. Projection ───────────────────────────────────────────────────────

fn validate_projection() -> Vec<TestResult> {
    println!("--- Projection ---");
    let cameras = [
        Camera::default(),
        Camera::new(0.1, 0.0, SurfacePoint::default()),
        Camera::new(3.0, 45.0, SurfacePoint { x: 120.0, y: -80.0 }),
        Camera::new(1.6, -375.0, SurfacePoint { x: -40.0, y: 15.0 }),
    ];

    let mut worst: f64 = 0.0;
    let mut samples = 0;
    for camera in cameras {
        let proj = Projection::new(camera, Viewport::default());
        for gx in 0..=20 {
            for gy in 0..=20 {
                let (gx, gy) = (f64::from(gx), f64::from(gy));
                let s = proj.to_surface(gx, gy, 0.0);
                let g = proj.to_grid(s.x, s.y);
                worst = worst.max((g.x - gx).abs()).max((g.y - gy).abs());
                samples += 1;
            }
        }
    }

    vec![TestResult::new(
        "projection_round_trip",
        worst < 1e-6,
        format!("{samples} samples, worst error {worst:.2e}"),
    )]
}

// ── 5. Steady-state run ─────────────────────────────────────────────────

fn validate_mission_run(args: &Args) -> Vec<TestResult> {
    println!("--- Mission run ---");
    let mut results = Vec::new();
    let mut engine = match start(&args.mission, args.seed) {
        Ok(e) => e,
        Err(e) => return vec![TestResult::new("run_start", false, e)],
    };
    for &t in &RoomType::REQUIRED {
        let _ = engine.apply(Command::AddRoom { room_type: t });
    }

    let duration = engine
        .state()
        .mission
        .as_ref()
        .map_or(0, |m| m.mission_duration);
    let days = args.days.unwrap_or(duration / 2).min(duration.saturating_sub(1));
    let speed = SimSpeed::X12;
    let _ = engine.apply(Command::SetSpeed { speed });
    let step = engine.config().step_days(speed.multiplier());
    let tick_ms = engine.config().tick_period_ms;
    let ticks = (f64::from(days) / step).floor() as u64;

    let start_resources = engine.state().resources;
    let mut prev_score = engine.state().score;
    let mut score_monotone = true;
    let mut needs_in_range = true;
    for _ in 0..ticks {
        engine.advance(tick_ms);
        let s = engine.state();
        score_monotone &= s.score >= prev_score;
        prev_score = s.score;
        needs_in_range &= s.crew.iter().all(|c| {
            [c.health, c.energy, c.hunger, c.hygiene]
                .iter()
                .all(|v| (0.0..=100.0).contains(v))
        });
    }

    let s = engine.state();
    info!(
        "{}: day {:.1}, score {}, compliance {}",
        args.mission,
        s.days_passed,
        s.score,
        s.habitat.as_ref().map_or(0, |h| h.compliance_score)
    );

    results.push(TestResult::new(
        "run_days_elapsed",
        (s.days_passed - ticks as f64 * step).abs() < 1e-6 && s.failure.is_none(),
        format!("{:.1} days at {}×", s.days_passed, speed.multiplier()),
    ));

    let drained = ResourceKind::ALL
        .into_iter()
        .all(|k| s.resources.get(k) < start_resources.get(k));
    results.push(TestResult::new(
        "run_resources_drain",
        drained,
        serde_json::to_string(&s.resources).unwrap_or_default(),
    ));

    // Supplies were sized for the whole mission
    let expected_left = f64::from(duration) - s.days_passed;
    let oxygen_left = engine.days_remaining(ResourceKind::Oxygen).unwrap_or(0.0);
    results.push(TestResult::new(
        "run_days_remaining",
        (oxygen_left - expected_left).abs() < 1e-6,
        format!("{oxygen_left:.2} days of oxygen left, expected {expected_left:.2}"),
    ));

    results.push(TestResult::new(
        "run_score_monotone",
        score_monotone,
        format!("final score {}", s.score),
    ));
    results.push(TestResult::new(
        "run_needs_bounded",
        needs_in_range,
        format!("{} crew", s.crew.len()),
    ));

    results
}

// ── 6. Exhaustion ───────────────────────────────────────────────────────

fn validate_mission_failure(args: &Args) -> Vec<TestResult> {
    println!("--- Mission failure ---");
    let mut engine = match start(&args.mission, args.seed) {
        Ok(e) => e,
        Err(e) => return vec![TestResult::new("failure_start", false, e)],
    };
    let _ = engine.apply(Command::SetSpeed {
        speed: SimSpeed::X12,
    });

    let duration = engine
        .state()
        .mission
        .as_ref()
        .map_or(0.0, |m| f64::from(m.mission_duration));
    let step = engine.config().step_days(SimSpeed::X12.multiplier());
    let budget_ticks = (duration / step).ceil() as u64 + 5;
    let report = engine.advance(budget_ticks * engine.config().tick_period_ms);

    let s = engine.state();
    let mut results = Vec::new();
    match &s.failure {
        Some(f) => {
            results.push(TestResult::new(
                "failure_on_schedule",
                (f.day - duration).abs() <= step + 1e-6,
                format!("failed on day {:.1} of {duration}: {:?}", f.day, f.depleted),
            ));
            results.push(TestResult::new(
                "failure_halts_clock",
                !s.is_playing && !engine.clock().is_running() && report.discarded > 0,
                format!("{} queued events discarded", report.discarded),
            ));
            let version = s.version;
            let after = engine.advance(10_000);
            results.push(TestResult::new(
                "failure_is_terminal",
                after == AdvanceReport::default() && engine.state().version == version,
                "no events after failure",
            ));
        }
        None => results.push(TestResult::new(
            "failure_on_schedule",
            false,
            format!("still alive after {:.1} days", s.days_passed),
        )),
    }
    results
}
