//! Quietroom Headless Simulation Harness
//!
//! Validates pure simulation logic and data without a host app.
//! Runs entirely in-process — no rendering, no persistence side effects.
//!
//! Usage:
//!   cargo run -p quietroom-simtest
//!   cargo run -p quietroom-simtest -- --verbose

use quietroom_core::engine::{RoomEngine, AVATAR_START};
use quietroom_core::events::RoomEvent;
use quietroom_core::persistence::SaveError;
use quietroom_core::tasks::{TaskBoard, TaskStatus};
use quietroom_core::timer::{SessionKind, SessionTimer, TimerPhase};
use quietroom_logic::focus::{FocusSignal, FocusTracker};
use quietroom_logic::grid::{tile_to_world, world_to_tile, RoomGrid, Tile, Vec2};
use quietroom_logic::pathfinding::find_path;
use serde::Deserialize;

// ── Room catalog (same JSON the engine embeds) ──────────────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/room_catalog.json");

#[derive(Debug, Deserialize)]
struct ManifestRoot {
    map: MapSpec,
    furniture: Vec<PieceSpec>,
}

#[derive(Debug, Deserialize)]
struct MapSpec {
    width: i32,
    height: i32,
}

#[derive(Debug, Deserialize)]
struct PieceSpec {
    id: String,
    label: String,
    category: String,
    tiles: Vec<CellSpec>,
    anchors: Vec<AnchorSpec>,
    radius: f32,
}

#[derive(Debug, Deserialize)]
struct CellSpec {
    x: i32,
    y: i32,
}

#[derive(Debug, Deserialize)]
struct AnchorSpec {
    x: i32,
    y: i32,
    facing: String,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Quietroom Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Room catalog validation
    results.extend(validate_room_catalog(verbose));

    // 2. Grid geometry & walkability
    results.extend(validate_grid(verbose));

    // 3. Pathfinding sweep
    results.extend(validate_pathfinding(verbose));

    // 4. Motion & navigation timing
    results.extend(validate_motion(verbose));

    // 5. Focus arbitration
    results.extend(validate_focus(verbose));

    // 6. Session timer & task board
    results.extend(validate_timer_and_tasks(verbose));

    // 7. Save / load roundtrip
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Room Catalog ─────────────────────────────────────────────────────

fn validate_room_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Room Catalog ---");
    let mut results = Vec::new();

    let manifest: ManifestRoot = match serde_json::from_str(MANIFEST_JSON) {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_map_dimensions".into(),
        passed: manifest.map.width == 20 && manifest.map.height == 15,
        detail: format!("map is {}x{}", manifest.map.width, manifest.map.height),
    });

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: manifest.furniture.len() >= 5,
        detail: format!("{} furniture pieces loaded", manifest.furniture.len()),
    });

    // Ids unique and labels present
    let mut seen = Vec::new();
    let mut dupes = Vec::new();
    for piece in &manifest.furniture {
        if seen.contains(&piece.id.as_str()) {
            dupes.push(piece.id.as_str());
        }
        seen.push(piece.id.as_str());
    }
    results.push(TestResult {
        name: "catalog_unique_ids".into(),
        passed: dupes.is_empty(),
        detail: if dupes.is_empty() {
            "all ids unique".into()
        } else {
            format!("duplicate ids: {}", dupes.join(", "))
        },
    });

    let unlabeled: Vec<_> = manifest
        .furniture
        .iter()
        .filter(|p| p.id.is_empty() || p.label.is_empty() || p.category.is_empty())
        .collect();
    results.push(TestResult {
        name: "catalog_labels_present".into(),
        passed: unlabeled.is_empty(),
        detail: format!("{} pieces missing id/label/category", unlabeled.len()),
    });

    // Every piece approachable: at least one anchor, positive radius
    let no_anchor: Vec<_> = manifest
        .furniture
        .iter()
        .filter(|p| p.anchors.is_empty())
        .map(|p| p.id.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_anchors_present".into(),
        passed: no_anchor.is_empty(),
        detail: if no_anchor.is_empty() {
            "every piece has at least one anchor".into()
        } else {
            format!("pieces without anchors: {}", no_anchor.join(", "))
        },
    });

    let bad_radius: Vec<_> = manifest
        .furniture
        .iter()
        .filter(|p| !(p.radius > 0.0))
        .map(|p| p.id.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_positive_radius".into(),
        passed: bad_radius.is_empty(),
        detail: format!("{} pieces with non-positive radius", bad_radius.len()),
    });

    // Footprints and anchors inside the walkable interior (border is wall)
    let interior = |x: i32, y: i32| {
        x > 0 && x < manifest.map.width - 1 && y > 0 && y < manifest.map.height - 1
    };
    let mut out_of_bounds = Vec::new();
    for piece in &manifest.furniture {
        let tiles_ok = piece.tiles.iter().all(|t| interior(t.x, t.y));
        let anchors_ok = piece.anchors.iter().all(|a| interior(a.x, a.y));
        if !tiles_ok || !anchors_ok {
            out_of_bounds.push(piece.id.as_str());
        }
    }
    results.push(TestResult {
        name: "catalog_inside_walls".into(),
        passed: out_of_bounds.is_empty(),
        detail: if out_of_bounds.is_empty() {
            "all footprints and anchors inside the walls".into()
        } else {
            format!("outside walls: {}", out_of_bounds.join(", "))
        },
    });

    // Anchors must be standable: not inside any footprint
    let mut covered_anchors = Vec::new();
    for piece in &manifest.furniture {
        for anchor in &piece.anchors {
            let covered = manifest
                .furniture
                .iter()
                .flat_map(|p| p.tiles.iter())
                .any(|t| t.x == anchor.x && t.y == anchor.y);
            if covered {
                covered_anchors.push(format!("{}@({},{})", piece.id, anchor.x, anchor.y));
            }
        }
    }
    results.push(TestResult {
        name: "catalog_anchors_standable".into(),
        passed: covered_anchors.is_empty(),
        detail: if covered_anchors.is_empty() {
            "no anchor sits inside a footprint".into()
        } else {
            format!("covered anchors: {}", covered_anchors.join(", "))
        },
    });

    let bad_facing: Vec<_> = manifest
        .furniture
        .iter()
        .flat_map(|p| p.anchors.iter())
        .filter(|a| !matches!(a.facing.as_str(), "up" | "down" | "left" | "right"))
        .collect();
    results.push(TestResult {
        name: "catalog_valid_facings".into(),
        passed: bad_facing.is_empty(),
        detail: format!("{} anchors with unknown facing", bad_facing.len()),
    });

    // Key pieces the room scenario depends on
    let has = |id: &str| manifest.furniture.iter().any(|p| p.id == id);
    let (desk, sofa, plant, door) = (has("desk"), has("sofa"), has("plant"), has("door"));
    results.push(TestResult {
        name: "catalog_key_pieces".into(),
        passed: desk && sofa && plant && door,
        detail: format!("desk={} sofa={} plant={} door={}", desk, sofa, plant, door),
    });

    if verbose {
        println!("  Pieces:");
        for piece in &manifest.furniture {
            println!(
                "    {:12} [{}] {} tiles, {} anchors, radius {}",
                piece.id,
                piece.category,
                piece.tiles.len(),
                piece.anchors.len(),
                piece.radius
            );
        }
    }

    results
}

// ── 2. Grid Geometry ────────────────────────────────────────────────────

fn validate_grid(_verbose: bool) -> Vec<TestResult> {
    println!("--- Grid Geometry ---");
    let mut results = Vec::new();

    // World/tile conversions round-trip over the whole map
    let mut bad_roundtrips = 0;
    for y in 0..15 {
        for x in 0..20 {
            let tile = Tile::new(x, y);
            if Tile::from_world(tile.center()) != tile {
                bad_roundtrips += 1;
            }
        }
    }
    results.push(TestResult {
        name: "grid_center_roundtrip".into(),
        passed: bad_roundtrips == 0,
        detail: format!("{} of 300 tile centers failed to round-trip", bad_roundtrips),
    });

    // Floor semantics for coordinates left/above the map
    let floors = world_to_tile(-0.1) == -1 && world_to_tile(0.0) == 0 && world_to_tile(31.9) == 0;
    results.push(TestResult {
        name: "grid_floor_conversion".into(),
        passed: floors,
        detail: format!(
            "world -0.1→{} 0.0→{} 31.9→{}",
            world_to_tile(-0.1),
            world_to_tile(0.0),
            world_to_tile(31.9)
        ),
    });

    results.push(TestResult {
        name: "grid_tile_center_offset".into(),
        passed: tile_to_world(0) == 16.0 && tile_to_world(5) == 176.0,
        detail: "tile centers at 32*t + 16".into(),
    });

    // Bordered grid: full wall ring, open interior
    let grid = RoomGrid::bordered(20, 15);
    let mut open_border = 0;
    for x in 0..20 {
        if grid.is_walkable(x, 0) || grid.is_walkable(x, 14) {
            open_border += 1;
        }
    }
    for y in 0..15 {
        if grid.is_walkable(0, y) || grid.is_walkable(19, y) {
            open_border += 1;
        }
    }
    let mut closed_interior = 0;
    for y in 1..14 {
        for x in 1..19 {
            if !grid.is_walkable(x, y) {
                closed_interior += 1;
            }
        }
    }
    results.push(TestResult {
        name: "grid_border_ring".into(),
        passed: open_border == 0 && closed_interior == 0,
        detail: format!(
            "{} open border cells, {} blocked interior cells",
            open_border, closed_interior
        ),
    });

    // Blocking is idempotent and out-of-bounds safe
    let mut grid = RoomGrid::bordered(20, 15);
    grid.block(Tile::new(5, 5));
    grid.block(Tile::new(5, 5));
    grid.block(Tile::new(-3, 99));
    results.push(TestResult {
        name: "grid_block_safety".into(),
        passed: !grid.is_walkable(5, 5) && !grid.is_walkable(-3, 99) && grid.is_walkable(6, 5),
        detail: "blocked cell stays blocked, out-of-bounds is never walkable".into(),
    });

    results
}

// ── 3. Pathfinding ──────────────────────────────────────────────────────

/// Every step adjacent, every cell walkable, no diagonal squeezing.
fn check_path(grid: &RoomGrid, path: &[Tile], start: Tile, goal: Tile) -> Result<(), String> {
    let first = match path.first() {
        Some(t) => *t,
        None => return Err("empty path".into()),
    };
    let last = path[path.len() - 1];
    if first != start {
        return Err(format!("starts at {:?}, wanted {:?}", first, start));
    }
    if last != goal {
        return Err(format!("ends at {:?}, wanted {:?}", last, goal));
    }
    for window in path.windows(2) {
        let (a, b) = (window[0], window[1]);
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        if dx.abs() > 1 || dy.abs() > 1 || (dx == 0 && dy == 0) {
            return Err(format!("non-adjacent step {:?} → {:?}", a, b));
        }
        if !grid.is_walkable(b.x, b.y) {
            return Err(format!("steps onto blocked {:?}", b));
        }
        if dx != 0 && dy != 0 && !(grid.is_walkable(b.x, a.y) && grid.is_walkable(a.x, b.y)) {
            return Err(format!("corner cut {:?} → {:?}", a, b));
        }
    }
    Ok(())
}

fn validate_pathfinding(verbose: bool) -> Vec<TestResult> {
    println!("--- Pathfinding ---");
    let mut results = Vec::new();

    let engine = match RoomEngine::standard() {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "pathfinding_engine_setup".into(),
                passed: false,
                detail: format!("builtin catalog failed: {}", e),
            });
            return results;
        }
    };
    let grid = engine.grid();

    // Every anchor of every piece reachable from the avatar spawn
    let mut unreachable = Vec::new();
    let mut invalid = Vec::new();
    let mut total_anchors = 0;
    for def in engine.catalog().furniture() {
        for anchor in &def.anchors {
            total_anchors += 1;
            let goal = anchor.tile();
            match find_path(grid, AVATAR_START, goal) {
                Some(path) => {
                    if let Err(reason) = check_path(grid, &path, AVATAR_START, goal) {
                        invalid.push(format!("{}@{:?}: {}", def.id, goal, reason));
                    } else if verbose {
                        println!("    {:12} {:?} reachable in {} steps", def.id, goal, path.len() - 1);
                    }
                }
                None => unreachable.push(format!("{}@{:?}", def.id, goal)),
            }
        }
    }
    results.push(TestResult {
        name: "pathfinding_anchors_reachable".into(),
        passed: unreachable.is_empty(),
        detail: if unreachable.is_empty() {
            format!("all {} anchors reachable from spawn", total_anchors)
        } else {
            format!("unreachable: {}", unreachable.join(", "))
        },
    });
    results.push(TestResult {
        name: "pathfinding_paths_legal".into(),
        passed: invalid.is_empty(),
        detail: if invalid.is_empty() {
            "all paths adjacent, walkable, no corner cuts".into()
        } else {
            invalid.join("; ")
        },
    });

    // Same query, same path
    let a = find_path(grid, Tile::new(1, 1), Tile::new(18, 13));
    let b = find_path(grid, Tile::new(1, 1), Tile::new(18, 13));
    results.push(TestResult {
        name: "pathfinding_deterministic".into(),
        passed: a.is_some() && a == b,
        detail: format!(
            "corner-to-corner path of {} tiles, identical across runs",
            a.as_ref().map(|p| p.len()).unwrap_or(0)
        ),
    });

    // Furniture footprint is a hard no
    let into_desk = find_path(grid, AVATAR_START, Tile::new(9, 6));
    results.push(TestResult {
        name: "pathfinding_blocked_goal".into(),
        passed: into_desk.is_none(),
        detail: "desk footprint rejected as a goal".into(),
    });

    // A sealed box exhausts the search without panicking
    let mut sealed = RoomGrid::bordered(20, 15);
    for (x, y) in [(9, 5), (10, 5), (11, 5), (9, 6), (11, 6), (9, 7), (10, 7), (11, 7)] {
        sealed.block(Tile::new(x, y));
    }
    let boxed_in = find_path(&sealed, Tile::new(2, 12), Tile::new(10, 6));
    results.push(TestResult {
        name: "pathfinding_unreachable_none".into(),
        passed: boxed_in.is_none(),
        detail: "goal sealed behind blockers returns no path".into(),
    });

    results
}

// ── 4. Motion & Navigation ──────────────────────────────────────────────

fn validate_motion(_verbose: bool) -> Vec<TestResult> {
    println!("--- Motion & Navigation ---");
    let mut results = Vec::new();

    // Requests resolve on the following tick, not synchronously
    let mut engine = RoomEngine::standard().expect("builtin catalog");
    engine.request_move_to(Tile::new(5, 12));
    let before = engine.is_moving();
    engine.update(0.05);
    let after = engine.is_moving();
    results.push(TestResult {
        name: "motion_resolves_next_tick".into(),
        passed: !before && after,
        detail: format!("moving before tick={}, after tick={}", before, after),
    });

    // 3 straight tiles at avatar speed: 96 px / 128 px/s = 0.75 s = 15 ticks
    let mut engine = RoomEngine::standard().expect("builtin catalog");
    engine.request_move_to(Tile::new(5, 12));
    let mut arrival_tick = None;
    let mut arrivals = 0;
    for tick in 1..=30 {
        engine.update(0.05);
        for event in engine.drain_events() {
            if matches!(event, RoomEvent::Arrived { .. }) {
                arrivals += 1;
                arrival_tick.get_or_insert(tick);
            }
        }
    }
    results.push(TestResult {
        name: "motion_arrival_timing".into(),
        passed: arrival_tick == Some(15) && arrivals == 1,
        detail: format!(
            "arrived on tick {:?} ({} arrival events), expected tick 15",
            arrival_tick, arrivals
        ),
    });
    results.push(TestResult {
        name: "motion_lands_on_goal".into(),
        passed: engine.avatar_tile() == Some(Tile::new(5, 12)) && !engine.is_moving(),
        detail: format!("avatar at {:?}", engine.avatar_tile()),
    });

    // A newer request replaces the walk; only the final goal reports arrival
    let mut engine = RoomEngine::standard().expect("builtin catalog");
    engine.request_move_to(Tile::new(8, 12));
    for _ in 0..4 {
        engine.update(0.05);
    }
    engine.drain_events();
    engine.request_move_to(Tile::new(3, 10));
    let mut arrivals = Vec::new();
    for _ in 0..200 {
        engine.update(0.05);
        for event in engine.drain_events() {
            if let RoomEvent::Arrived { position } = event {
                arrivals.push(position);
            }
        }
        if !engine.is_moving() && !arrivals.is_empty() {
            break;
        }
    }
    results.push(TestResult {
        name: "motion_supersede".into(),
        passed: arrivals == vec![Tile::new(3, 10).center()],
        detail: format!("arrivals: {:?}", arrivals),
    });

    // Direct point motion skips the planner entirely
    let mut engine = RoomEngine::standard().expect("builtin catalog");
    let target = Vec2::new(85.0, 405.0);
    engine.move_to_point(target);
    engine.update(1.0);
    results.push(TestResult {
        name: "motion_direct_point".into(),
        passed: engine.avatar_position() == Some(target) && !engine.is_moving(),
        detail: format!("avatar at {:?}", engine.avatar_position()),
    });

    results
}

// ── 5. Focus Arbitration ────────────────────────────────────────────────

fn validate_focus(_verbose: bool) -> Vec<TestResult> {
    println!("--- Focus Arbitration ---");
    let mut results = Vec::new();

    // Walk to the desk anchor; focus must stay quiet for the whole walk,
    // then promote after the stability window and fire after the delay.
    let mut engine = RoomEngine::standard().expect("builtin catalog");
    engine.request_move_to(Tile::new(9, 8));
    let mut fired_during_walk = false;
    for _ in 0..400 {
        engine.update(0.05);
        let events = engine.drain_events();
        fired_during_walk |= events
            .iter()
            .any(|e| matches!(e, RoomEvent::FocusActionable { .. }));
        if !engine.is_moving() && events.iter().any(|e| matches!(e, RoomEvent::Arrived { .. })) {
            break;
        }
    }
    results.push(TestResult {
        name: "focus_quiet_while_walking".into(),
        passed: !fired_during_walk && !engine.is_moving(),
        detail: "no actionable focus during the walk".into(),
    });

    let mut actionable_tick = None;
    let mut actionable_id = None;
    for tick in 1..=12 {
        engine.update(0.05);
        for event in engine.drain_events() {
            if let RoomEvent::FocusActionable { target } = event {
                actionable_tick.get_or_insert(tick);
                actionable_id = Some(target.id);
            }
        }
    }
    results.push(TestResult {
        name: "focus_desk_actionable".into(),
        passed: actionable_id.as_deref() == Some("desk")
            && matches!(actionable_tick, Some(6..=8)),
        detail: format!(
            "actionable {:?} on standstill tick {:?} (stability 150ms + delay 200ms)",
            actionable_id, actionable_tick
        ),
    });

    // Walking away clears on the very next tick
    engine.request_move_to(Tile::new(2, 2));
    engine.update(0.05);
    let cleared = engine.drain_events().contains(&RoomEvent::FocusCleared);
    results.push(TestResult {
        name: "focus_cleared_on_departure".into(),
        passed: cleared && engine.focused().is_none(),
        detail: format!("cleared={} focused={:?}", cleared, engine.focused_id()),
    });

    // Hysteresis sweep on the bare tracker: an exactly margin-equal rival
    // never steals focus, a clearly better one does after the window.
    let mut tracker: FocusTracker<&str> = FocusTracker::new();
    for _ in 0..12 {
        tracker.advance(Some(("desk", 0.5)), false, 50.0);
    }
    let mut stolen = false;
    for _ in 0..40 {
        let signals = tracker.advance(Some(("sofa", 0.575)), false, 50.0);
        stolen |= !signals.is_empty() || tracker.focused() != Some("desk");
    }
    results.push(TestResult {
        name: "focus_margin_holds".into(),
        passed: !stolen,
        detail: "rival at exactly 1.15x never takes focus".into(),
    });

    let mut switch_signals = Vec::new();
    for _ in 0..4 {
        switch_signals.extend(tracker.advance(Some(("sofa", 0.7)), false, 50.0));
    }
    let switched = tracker.focused() == Some("sofa");
    let cleared_old = switch_signals.contains(&FocusSignal::Cleared);
    results.push(TestResult {
        name: "focus_margin_switch".into(),
        passed: switched && cleared_old,
        detail: format!(
            "switched={} cleared_old={} after sustained 1.4x rival",
            switched, cleared_old
        ),
    });

    // Movement clears unconditionally, same tick
    let signals = tracker.advance(Some(("sofa", 0.7)), true, 50.0);
    results.push(TestResult {
        name: "focus_movement_clears".into(),
        passed: signals.contains(&FocusSignal::Cleared) && tracker.focused().is_none(),
        detail: "one moving tick drops focus and candidacy".into(),
    });

    results
}

// ── 6. Session Timer & Task Board ───────────────────────────────────────

fn validate_timer_and_tasks(_verbose: bool) -> Vec<TestResult> {
    println!("--- Session Timer & Task Board ---");
    let mut results = Vec::new();

    // A one-minute focus session completes exactly once
    let mut timer = SessionTimer::new();
    timer.start_focus(1);
    let early = timer.tick(59.5);
    let done = timer.tick(1.0);
    let again = timer.tick(10.0);
    results.push(TestResult {
        name: "timer_focus_completes_once".into(),
        passed: early.is_none() && done == Some(SessionKind::Focus) && again.is_none(),
        detail: format!("59.5s:{:?} +1.0s:{:?} +10s:{:?}", early, done, again),
    });

    // Paused time does not count
    let mut timer = SessionTimer::new();
    timer.start_focus(1);
    timer.pause();
    let while_paused = timer.tick(120.0);
    timer.resume();
    let after_resume = timer.tick(60.0);
    results.push(TestResult {
        name: "timer_pause_gates_time".into(),
        passed: while_paused.is_none() && after_resume == Some(SessionKind::Focus),
        detail: format!(
            "paused 120s:{:?}, resumed 60s:{:?}",
            while_paused, after_resume
        ),
    });

    // Breaks complete as breaks
    let mut timer = SessionTimer::new();
    timer.start_break(5);
    let done = timer.tick(300.0);
    results.push(TestResult {
        name: "timer_break_kind".into(),
        passed: done == Some(SessionKind::Break) && timer.phase() == TimerPhase::Idle,
        detail: format!("break completion: {:?}", done),
    });

    // Stop abandons the session
    let mut timer = SessionTimer::new();
    timer.start_focus(25);
    timer.stop();
    results.push(TestResult {
        name: "timer_stop_resets".into(),
        passed: timer.phase() == TimerPhase::Idle && timer.tick(10_000.0).is_none(),
        detail: format!("phase after stop: {:?}", timer.phase()),
    });

    // Task board: capacity, truncation, single active task
    let mut board = TaskBoard::new();
    let mut ids = Vec::new();
    for i in 0..7 {
        ids.push(board.add_task(&format!("task {}", i)));
    }
    let overflow = board.add_task("one too many");
    results.push(TestResult {
        name: "tasks_capacity".into(),
        passed: ids.iter().all(|id| id.is_some()) && overflow.is_none() && board.len() == 7,
        detail: format!("{} tasks held, 8th rejected", board.len()),
    });

    let mut board = TaskBoard::new();
    let id = board.add_task("a very long task title that keeps going well past the cap");
    let stored = board.tasks().first().map(|t| t.title.chars().count());
    results.push(TestResult {
        name: "tasks_title_truncated".into(),
        passed: id.is_some() && stored == Some(32),
        detail: format!("stored title length: {:?} chars", stored),
    });

    let mut board = TaskBoard::new();
    let first = board.add_task("write report").expect("capacity");
    let second = board.add_task("file taxes").expect("capacity");
    board.move_task(first, TaskStatus::Doing);
    board.move_task(second, TaskStatus::Doing);
    let doing: Vec<_> = board
        .tasks()
        .iter()
        .filter(|t| t.status == TaskStatus::Doing)
        .collect();
    results.push(TestResult {
        name: "tasks_single_doing".into(),
        passed: doing.len() == 1 && doing[0].id == second,
        detail: format!("{} task(s) in Doing, newest wins", doing.len()),
    });

    let removed = board.delete_task(first);
    let unknown = board.move_task(first, TaskStatus::Done);
    results.push(TestResult {
        name: "tasks_delete_and_unknown".into(),
        passed: removed && !unknown && board.len() == 1,
        detail: format!("deleted={} unknown_move={}", removed, unknown),
    });

    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    // Mid-walk save restores position, motion, timer, and tasks
    let mut engine = RoomEngine::standard().expect("builtin catalog");
    engine.timer.start_focus(5);
    engine.tasks.add_task("water the plant");
    engine.tasks.add_task("answer letters");
    engine.request_move_to(Tile::new(6, 9));
    for _ in 0..10 {
        engine.update(0.05);
    }

    let mut buffer = Vec::new();
    if let Err(e) = engine.save(&mut buffer) {
        results.push(TestResult {
            name: "persistence_save".into(),
            passed: false,
            detail: format!("save failed: {}", e),
        });
        return results;
    }

    let mut loaded = RoomEngine::new();
    match loaded.load(&buffer[..]) {
        Ok(()) => {
            let same_position = loaded.avatar_position() == engine.avatar_position();
            let same_time = loaded.sim_time == engine.sim_time;
            let same_tasks = loaded.tasks.len() == 2;
            let same_phase = loaded.timer.phase() == TimerPhase::Focus;
            let same_catalog = loaded.catalog() == engine.catalog();
            results.push(TestResult {
                name: "persistence_roundtrip".into(),
                passed: same_position
                    && same_time
                    && same_tasks
                    && same_phase
                    && same_catalog
                    && loaded.is_moving(),
                detail: format!(
                    "position={} time={} tasks={} phase={} catalog={} moving={}",
                    same_position,
                    same_time,
                    same_tasks,
                    same_phase,
                    same_catalog,
                    loaded.is_moving()
                ),
            });

            // The restored engine finishes the interrupted walk
            let mut arrived = false;
            for _ in 0..400 {
                loaded.update(0.05);
                arrived |= loaded
                    .drain_events()
                    .iter()
                    .any(|e| matches!(e, RoomEvent::Arrived { .. }));
                if arrived {
                    break;
                }
            }
            results.push(TestResult {
                name: "persistence_resumes_walk".into(),
                passed: arrived && loaded.avatar_tile() == Some(Tile::new(6, 9)),
                detail: format!("resumed to {:?}", loaded.avatar_tile()),
            });
        }
        Err(e) => {
            results.push(TestResult {
                name: "persistence_roundtrip".into(),
                passed: false,
                detail: format!("load failed: {}", e),
            });
        }
    }

    // Version byte stands first in the payload; a bump must be rejected
    let mut tampered = buffer.clone();
    tampered[0] = 9;
    let version_err = match RoomEngine::new().load(&tampered[..]) {
        Err(SaveError::VersionMismatch { expected, found }) => expected == 1 && found == 9,
        _ => false,
    };
    results.push(TestResult {
        name: "persistence_version_guard".into(),
        passed: version_err,
        detail: "unknown save version rejected".into(),
    });

    let truncated = RoomEngine::new().load(&buffer[..5]);
    results.push(TestResult {
        name: "persistence_truncation_rejected".into(),
        passed: truncated.is_err(),
        detail: "short payload fails to load".into(),
    });

    results
}
