//! Villa Viewer Headless Harness
//!
//! Validates the plan data and the viewer logic without a window or GPU:
//! wall extraction, scene composition, view application, the camera rig and
//! room picking.
//!
//! Usage:
//!   cargo run -p villa-simtest
//!   cargo run -p villa-simtest -- --verbose
//!   cargo run -p villa-simtest -- --plan other.json --dump-walls

use glam::Vec3;
use serde::Serialize;
use villa_logic::camera::{OrbitRig, PointerButton, RigSettings};
use villa_logic::config::ViewerConfig;
use villa_logic::constants::heights;
use villa_logic::picking::Ray;
use villa_logic::plan::Plan;
use villa_logic::scene::{NodeRole, Scene};
use villa_logic::session::Session;
use villa_logic::view::{floor_offset, roof_offset, ViewFilter, ViewMode, ViewState};
use villa_logic::walls::{extract_segments, WallSegment};

// ── Plan data (same JSON the viewer embeds) ─────────────────────────────
const PLAN_JSON: &str = include_str!("../../../data/villa_plan.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

#[derive(Serialize)]
struct WallDump<'a> {
    plan: &'a str,
    segment_count: usize,
    segments: &'a [WallSegment],
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let dump_walls = args.iter().any(|a| a == "--dump-walls");
    let plan_path = args
        .iter()
        .position(|a| a == "--plan")
        .and_then(|i| args.get(i + 1));

    let plan = match plan_path {
        Some(path) => Plan::load(path),
        None => Plan::from_json_str(PLAN_JSON),
    };
    let plan = match plan {
        Ok(p) => p,
        Err(e) => {
            eprintln!("✗ plan_load: {}", e);
            std::process::exit(1);
        }
    };

    if dump_walls {
        std::process::exit(match dump_wall_segments(&plan) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("✗ dump_walls: {}", e);
                1
            }
        });
    }

    println!("=== Villa Viewer Harness ===\n");

    let mut results = Vec::new();

    // 1. Plan data
    results.extend(validate_plan(&plan));

    // 2. Wall extraction
    results.extend(validate_walls(&plan));

    // 3. Scene composition
    results.extend(validate_scene(&plan));

    // 4. View application
    results.extend(validate_views(&plan));

    // 5. Camera rig
    results.extend(validate_rig());

    // 6. Picking and focus
    results.extend(validate_picking(&plan));

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

fn dump_wall_segments(plan: &Plan) -> Result<(), Box<dyn std::error::Error>> {
    let segments = extract_segments(&plan.footprint, &plan.rooms)?;
    let dump = WallDump {
        plan: &plan.name,
        segment_count: segments.len(),
        segments: &segments,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

// ── 1. Plan ─────────────────────────────────────────────────────────────

fn validate_plan(plan: &Plan) -> Vec<TestResult> {
    println!("--- Plan ---");
    let mut results = Vec::new();

    results.push(check(
        "plan_has_floors",
        plan.floor_count > 0,
        format!("{} floors", plan.floor_count),
    ));
    results.push(check(
        "plan_has_rooms",
        !plan.rooms.is_empty(),
        format!("{} rooms", plan.rooms.len()),
    ));

    // Every room must at least touch the footprint (balconies may overhang)
    let fp = &plan.footprint;
    let outside: Vec<_> = plan
        .rooms
        .iter()
        .filter(|r| {
            r.x >= fp.x + fp.w || r.x + r.w <= fp.x || r.y >= fp.y + fp.h || r.y + r.h <= fp.y
        })
        .map(|r| r.id.as_str())
        .collect();
    results.push(check(
        "plan_rooms_overlap_footprint",
        outside.is_empty(),
        if outside.is_empty() {
            "every room overlaps the footprint".to_string()
        } else {
            format!("outside: {}", outside.join(", "))
        },
    ));

    results
}

// ── 2. Walls ────────────────────────────────────────────────────────────

fn validate_walls(plan: &Plan) -> Vec<TestResult> {
    println!("--- Walls ---");
    let mut results = Vec::new();

    let segments = match extract_segments(&plan.footprint, &plan.rooms) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("walls_extract", false, e.to_string()));
            return results;
        }
    };
    let candidates = 4 * (plan.rooms.len() + 1);
    results.push(check(
        "walls_deduplicated",
        !segments.is_empty() && segments.len() <= candidates,
        format!("{} unique of {} candidate edges", segments.len(), candidates),
    ));

    let mut keys: Vec<_> = segments.iter().map(|s| s.key()).collect();
    keys.sort();
    keys.dedup();
    results.push(check(
        "walls_unique_keys",
        keys.len() == segments.len(),
        format!("{} distinct keys", keys.len()),
    ));

    let mut reversed = plan.rooms.clone();
    reversed.reverse();
    let again = extract_segments(&plan.footprint, &reversed).unwrap_or_default();
    results.push(check(
        "walls_order_independent",
        again == segments,
        "reversed room order yields identical segments",
    ));

    results
}

// ── 3. Scene ────────────────────────────────────────────────────────────

fn validate_scene(plan: &Plan) -> Vec<TestResult> {
    println!("--- Scene ---");
    let mut results = Vec::new();

    let scene = match Scene::compose(plan, &ViewState::default()) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("scene_compose", false, e.to_string()));
            return results;
        }
    };

    results.push(check(
        "scene_floor_groups",
        scene.stack.floors.len() == plan.floor_count
            && scene.interior.floors.len() == plan.floor_count,
        format!(
            "stack {} / interior {}",
            scene.stack.floors.len(),
            scene.interior.floors.len()
        ),
    ));

    let room_floors = scene
        .graph
        .iter()
        .filter(|(_, n)| matches!(n.role, NodeRole::RoomFloor { .. }))
        .count();
    results.push(check(
        "scene_room_floors",
        room_floors == plan.floor_count * plan.rooms.len(),
        format!("{} pickable room floors", room_floors),
    ));

    results.push(check(
        "scene_default_mode",
        scene.active_mode() == Some(ViewMode::Stack),
        format!("{} nodes, stack root active", scene.graph.len()),
    ));

    results
}

// ── 4. Views ────────────────────────────────────────────────────────────

fn validate_views(plan: &Plan) -> Vec<TestResult> {
    println!("--- Views ---");
    let mut results = Vec::new();

    let mut session = match Session::new(plan.clone(), ViewerConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("views_session", false, e.to_string()));
            return results;
        }
    };

    session.set_mode(ViewMode::Interior);
    let scene = session.scene();
    let visible_floors = scene
        .interior
        .floors
        .iter()
        .filter(|f| scene.graph.is_effectively_visible(f.group))
        .count();
    let stack_hidden = scene
        .graph
        .descendants(scene.stack.root)
        .into_iter()
        .all(|id| !scene.graph.is_effectively_visible(id));
    results.push(check(
        "views_interior_all",
        visible_floors == plan.floor_count
            && scene.graph.is_effectively_visible(scene.interior.roof.group)
            && stack_hidden,
        format!("{} interior floors + roof visible, stack hidden", visible_floors),
    ));

    let pose = ViewMode::Interior.default_pose();
    results.push(check(
        "views_interior_camera",
        (session.camera_pose().eye - pose.eye).length() < 1e-3,
        format!("eye {:?}", session.camera_pose().eye),
    ));

    session.set_filter(ViewFilter::Roof);
    let scene = session.scene();
    let any_floor = scene
        .interior
        .floors
        .iter()
        .any(|f| scene.graph.is_effectively_visible(f.group));
    results.push(check(
        "views_roof_only",
        !any_floor && scene.graph.is_effectively_visible(scene.interior.roof.group),
        "roof filter hides every floor",
    ));

    let monotonic = [0.0, 6.0, 15.0].iter().all(|&e| {
        (1..plan.floor_count).all(|i| floor_offset(i, e) > floor_offset(i - 1, e))
            && roof_offset(plan.floor_count, e) > floor_offset(plan.floor_count - 1, e)
    });
    results.push(check(
        "views_explode_monotonic",
        monotonic && floor_offset(1, 0.0) == heights::FLOOR_GAP,
        "offsets increase with floor index; explode 0 is plain stacking",
    ));

    results
}

// ── 5. Rig ──────────────────────────────────────────────────────────────

fn validate_rig() -> Vec<TestResult> {
    println!("--- Camera Rig ---");
    let mut results = Vec::new();

    let pose = ViewMode::Stack.default_pose();
    let mut rig = OrbitRig::new(RigSettings::default(), pose);
    let r0 = rig.radius();
    for _ in 0..1000 {
        rig.update();
    }
    results.push(check(
        "rig_idle_fixed_point",
        (rig.radius() - r0).abs() < 1e-3,
        format!("radius {:.3} → {:.3}", r0, rig.radius()),
    ));

    rig.pointer_down(PointerButton::Primary, false);
    let mut min_phi = f32::MAX;
    let mut max_phi = f32::MIN;
    for i in 0..400 {
        let dy = if i < 200 { 10_000.0 } else { -10_000.0 };
        rig.pointer_move(0.0, dy);
        rig.update();
        min_phi = min_phi.min(rig.phi());
        max_phi = max_phi.max(rig.phi());
    }
    rig.pointer_up();
    results.push(check(
        "rig_phi_clamped",
        min_phi > 0.0 && max_phi < std::f32::consts::PI,
        format!("phi in [{:.5}, {:.5}]", min_phi, max_phi),
    ));

    for _ in 0..600 {
        rig.update();
    }
    results.push(check(
        "rig_comes_to_rest",
        rig.is_at_rest(),
        "velocities decayed after release",
    ));

    results
}

// ── 6. Picking ──────────────────────────────────────────────────────────

fn validate_picking(plan: &Plan) -> Vec<TestResult> {
    println!("--- Picking ---");
    let mut results = Vec::new();

    let Some(bed1) = plan.room("bed1") else {
        results.push(check("picking_bed1", true, "plan has no bed1; skipped"));
        return results;
    };
    let mut session = match Session::new(plan.clone(), ViewerConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("picking_session", false, e.to_string()));
            return results;
        }
    };

    let rect = bed1.rect();
    let above = session.scene().mapper.rect_center(&rect, 1000.0);
    let ray = Ray::new(above, Vec3::NEG_Y);
    results.push(check(
        "picking_inert_in_stack",
        session.click(&ray, 0.0).is_none(),
        "stack mode ignores clicks",
    ));

    session.set_mode(ViewMode::Interior);
    session.set_filter(ViewFilter::Floor(0));
    let picked = session.click(&ray, 0.0);
    results.push(check(
        "picking_bed1_selected",
        picked.as_ref().is_some_and(|r| r.is("bed1", 0)),
        format!("{:?}", picked),
    ));

    let expected = session
        .scene()
        .mapper
        .rect_center(&rect, heights::SLAB_THICKNESS + heights::FOCUS_ABOVE_SLAB);
    let target = session.tween().map(|t| t.destination().target);
    results.push(check(
        "picking_focus_target",
        target.is_some_and(|t| (t - expected).length() < 1e-3),
        format!("tween target {:?}, expected {:?}", target, expected),
    ));

    session.set_filter(ViewFilter::All);
    let picked = session.click(&ray, 1.0);
    let target = session.tween().map(|t| t.destination().target);
    results.push(check(
        "picking_focus_target_all_floors",
        picked.is_some() && target.is_some_and(|t| (t - expected).length() < 1e-3),
        format!("picked {:?}, tween target {:?}", picked, target),
    ));

    session.reset();
    results.push(check(
        "reset_clears_selection",
        session.selection().selected.is_none() && session.tween().is_none(),
        session.status_text(),
    ));

    results
}
