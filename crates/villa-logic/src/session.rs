//! Viewer session: the one place interaction state lives.
//!
//! A [`Session`] owns the composed scene, the current [`ViewState`], the
//! orbit rig, hover/selection and the active camera tween. Input handlers
//! call into it; the per-frame [`Session::tick`] advances the tween or the
//! rig. Renderers read from it and never write scene state themselves.

use crate::camera::{OrbitRig, PointerButton};
use crate::config::ViewerConfig;
use crate::constants::{colors, highlight, CLICK_SLOP_PX};
use crate::error::PlanError;
use crate::picking::{pick_room, Ray};
use crate::plan::{Plan, Rgb};
use crate::scene::Scene;
use crate::tween::{framing_pose, CameraPose, CameraTween};
use crate::view::{apply_view, ViewFilter, ViewMode, ViewState};

/// One room on one floor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomRef {
    pub room_id: String,
    pub floor: usize,
}

impl RoomRef {
    pub fn new(room_id: impl Into<String>, floor: usize) -> Self {
        Self {
            room_id: room_id.into(),
            floor,
        }
    }

    pub fn is(&self, room_id: &str, floor: usize) -> bool {
        self.room_id == room_id && self.floor == floor
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub hovered: Option<RoomRef>,
    pub selected: Option<RoomRef>,
}

impl SelectionState {
    pub fn clear(&mut self) {
        self.hovered = None;
        self.selected = None;
    }
}

/// Emissive tint of a room floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Hover,
    Selected,
}

impl Highlight {
    /// Emissive color and intensity, or `None` for the resting material.
    pub fn emissive(self) -> Option<(Rgb, f32)> {
        match self {
            Highlight::None => None,
            Highlight::Hover => Some((Rgb(colors::HOVER_EMISSIVE), highlight::BASE_INTENSITY)),
            Highlight::Selected => Some((
                Rgb(colors::SELECTED_EMISSIVE),
                highlight::SELECTED_INTENSITY,
            )),
        }
    }
}

/// Tells a click from a drag by accumulated pointer travel. Only the
/// primary button clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickTracker {
    pressed: Option<PointerButton>,
    travel: f32,
}

impl ClickTracker {
    pub fn press(&mut self, button: PointerButton) {
        self.pressed = Some(button);
        self.travel = 0.0;
    }

    pub fn moved(&mut self, dx: f32, dy: f32) {
        if self.pressed.is_some() {
            self.travel += (dx * dx + dy * dy).sqrt();
        }
    }

    /// `true` when the press/release pair was a primary click.
    pub fn release(&mut self) -> bool {
        let click = self.pressed == Some(PointerButton::Primary) && self.travel < CLICK_SLOP_PX;
        self.pressed = None;
        self.travel = 0.0;
        click
    }
}

pub struct Session {
    plan: Plan,
    scene: Scene,
    view: ViewState,
    rig: OrbitRig,
    selection: SelectionState,
    tween: Option<CameraTween>,
    config: ViewerConfig,
    clicks: ClickTracker,
    scene_revision: u64,
}

impl Session {
    pub fn new(plan: Plan, config: ViewerConfig) -> Result<Self, PlanError> {
        let view = config.view.to_view_state();
        let scene = Scene::compose(&plan, &view)?;
        let rig = OrbitRig::new(config.rig, view.mode.default_pose());
        Ok(Self {
            plan,
            scene,
            view,
            rig,
            selection: SelectionState::default(),
            tween: None,
            config,
            clicks: ClickTracker::default(),
            scene_revision: 0,
        })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn rig(&self) -> &OrbitRig {
        &self.rig
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn tween(&self) -> Option<&CameraTween> {
        self.tween.as_ref()
    }

    /// Bumped whenever visibility or offsets in the scene graph change.
    pub fn scene_revision(&self) -> u64 {
        self.scene_revision
    }

    // ---- View-state controller ----

    /// Replace the view state and re-apply it in full. A mode change also
    /// resets the rig to the mode's pose, clears hover/selection and cancels
    /// any tween.
    pub fn set_view(&mut self, view: ViewState) {
        let mode_changed = view.mode != self.view.mode;
        self.view = view;
        if mode_changed {
            log::info!("View mode: {}", view.mode);
            self.selection.clear();
            self.tween = None;
            self.rig.reset(view.mode.default_pose());
        }
        apply_view(&self.view, &mut self.scene);
        self.scene_revision += 1;
    }

    pub fn update_view(&mut self, f: impl FnOnce(&mut ViewState)) {
        let mut view = self.view;
        f(&mut view);
        self.set_view(view);
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.update_view(|v| v.mode = mode);
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.update_view(|v| v.filter = filter);
    }

    pub fn set_explode_slider(&mut self, value: f32) {
        self.update_view(|v| v.set_explode_slider(value));
    }

    /// Snap the camera back to the current mode's default pose, drop hover
    /// and selection, and re-apply the view.
    pub fn reset(&mut self) {
        self.tween = None;
        self.selection.clear();
        self.rig.reset(self.view.mode.default_pose());
        apply_view(&self.view, &mut self.scene);
        self.scene_revision += 1;
    }

    // ---- Pointer input ----

    pub fn pointer_down(&mut self, button: PointerButton, shift: bool) {
        self.tween = None;
        self.clicks.press(button);
        self.rig.pointer_down(button, shift);
    }

    pub fn pointer_move(&mut self, dx: f32, dy: f32) {
        self.clicks.moved(dx, dy);
        self.rig.pointer_move(dx, dy);
    }

    /// End a drag. A primary release that barely moved is a click on `ray`.
    pub fn pointer_up(&mut self, ray: Option<&Ray>, now: f64) -> Option<RoomRef> {
        self.rig.pointer_up();
        let click = self.clicks.release();
        match ray {
            Some(ray) if click => self.click(ray, now),
            _ => None,
        }
    }

    pub fn wheel(&mut self, notches: f32) {
        if notches != 0.0 {
            self.tween = None;
        }
        self.rig.wheel(notches);
    }

    // ---- Picking ----

    /// Update the hovered room from a pointer ray. `None` clears hover.
    /// Returns whether a room is now hovered.
    pub fn hover(&mut self, ray: Option<&Ray>) -> bool {
        let hit = match ray {
            Some(ray) if self.view.mode == ViewMode::Interior => pick_room(&self.scene, ray),
            _ => None,
        };
        self.selection.hovered = hit.map(|h| RoomRef::new(h.room_id, h.floor));
        self.selection.hovered.is_some()
    }

    /// Select the room under `ray` and start framing it. Inert in stack mode
    /// and on misses.
    pub fn click(&mut self, ray: &Ray, now: f64) -> Option<RoomRef> {
        if self.view.mode != ViewMode::Interior {
            return None;
        }
        let hit = pick_room(&self.scene, ray)?;
        let room = RoomRef::new(hit.room_id, hit.floor);
        log::debug!("Selected {} on floor {}", room.room_id, room.floor + 1);
        self.selection.selected = Some(room.clone());
        self.focus(&room, now);
        Some(room)
    }

    /// Re-frame the current selection. Returns `false` if nothing is selected.
    pub fn fit_selected(&mut self, now: f64) -> bool {
        match self.selection.selected.clone() {
            Some(room) => {
                self.focus(&room, now);
                true
            }
            None => false,
        }
    }

    /// Pose that frames `room`. The target height is fixed above the ground
    /// slab whichever floor the room was picked on.
    pub fn framing_pose_for(&self, room: &RoomRef) -> Option<CameraPose> {
        let r = self.plan.room(&room.room_id)?;
        let rig = self.rig.settings();
        Some(framing_pose(
            &r.rect(),
            &self.scene.mapper,
            rig.min_radius,
            rig.max_radius,
        ))
    }

    fn focus(&mut self, room: &RoomRef, now: f64) {
        let Some(to) = self.framing_pose_for(room) else {
            return;
        };
        self.tween = Some(CameraTween::new(
            self.rig.pose(),
            to,
            now,
            self.config.tween.focus_seconds,
        ));
    }

    // ---- Frame ----

    /// Advance one frame: the active tween drives the camera, otherwise the
    /// rig integrates its velocities.
    pub fn tick(&mut self, now: f64) {
        match self.tween {
            Some(tween) => {
                self.rig.look_from(tween.sample(now));
                if tween.is_finished(now) {
                    self.tween = None;
                }
            }
            None => self.rig.update(),
        }
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.rig.pose()
    }

    pub fn highlight_for(&self, room_id: &str, floor: usize) -> Highlight {
        let sel = &self.selection;
        if sel.selected.as_ref().is_some_and(|r| r.is(room_id, floor)) {
            Highlight::Selected
        } else if sel.hovered.as_ref().is_some_and(|r| r.is(room_id, floor)) {
            Highlight::Hover
        } else {
            Highlight::None
        }
    }

    fn label_of(&self, room: Option<&RoomRef>) -> Option<&str> {
        room.and_then(|r| self.plan.room(&r.room_id))
            .map(|r| r.label.as_str())
    }

    pub fn hovered_label(&self) -> Option<&str> {
        self.label_of(self.selection.hovered.as_ref())
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.label_of(self.selection.selected.as_ref())
    }

    /// Hint line shown under the viewport.
    pub fn status_text(&self) -> String {
        match self.selected_label() {
            Some(label) => format!("Selected: {label} - click another room to focus"),
            None => self.view.mode.hint().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn session() -> Session {
        Session::new(Plan::builtin().unwrap(), ViewerConfig::default()).unwrap()
    }

    fn ray_down_on(s: &Session, room: &str) -> Ray {
        let r = s.plan().room(room).unwrap().rect();
        Ray::new(s.scene().mapper.rect_center(&r, 400.0), Vec3::NEG_Y)
    }

    #[test]
    fn click_tracker_separates_drags() {
        let mut t = ClickTracker::default();
        t.press(PointerButton::Primary);
        t.moved(1.0, 1.0);
        assert!(t.release());
        t.press(PointerButton::Primary);
        t.moved(3.0, 4.0);
        assert!(!t.release());
        assert!(!t.release());
    }

    #[test]
    fn only_the_primary_button_clicks() {
        let mut t = ClickTracker::default();
        t.press(PointerButton::Middle);
        assert!(!t.release());
        t.press(PointerButton::Secondary);
        assert!(!t.release());

        let mut s = session();
        s.set_mode(ViewMode::Interior);
        let ray = ray_down_on(&s, "bed1");
        s.pointer_down(PointerButton::Middle, false);
        assert!(s.pointer_up(Some(&ray), 0.0).is_none());
        assert!(s.selection().selected.is_none());
        assert!(s.tween().is_none());
    }

    #[test]
    fn reset_drops_selection_and_tween() {
        let mut s = session();
        s.set_mode(ViewMode::Interior);
        let ray = ray_down_on(&s, "bed2");
        s.hover(Some(&ray));
        s.click(&ray, 0.0).unwrap();
        let revision = s.scene_revision();

        s.reset();
        assert_eq!(s.selection(), &SelectionState::default());
        assert!(s.tween().is_none());
        assert_eq!(s.highlight_for("bed2", 3), Highlight::None);
        assert_eq!(s.status_text(), ViewMode::Interior.hint());
        assert!(s.scene_revision() > revision);
        let pose = ViewMode::Interior.default_pose();
        assert!((s.camera_pose().eye - pose.eye).length() < 1e-3);
    }

    #[test]
    fn selected_beats_hover() {
        let mut s = session();
        s.set_mode(ViewMode::Interior);
        let ray = ray_down_on(&s, "bed2");
        s.hover(Some(&ray));
        assert_eq!(s.highlight_for("bed2", 3), Highlight::Hover);
        s.click(&ray, 0.0).unwrap();
        assert_eq!(s.highlight_for("bed2", 3), Highlight::Selected);
        assert_eq!(s.highlight_for("bed2", 2), Highlight::None);
        assert_eq!(
            Highlight::Selected.emissive(),
            Some((Rgb(0x2e4cff), 1.25))
        );
    }

    #[test]
    fn clicks_in_stack_mode_do_nothing() {
        let mut s = session();
        let ray = ray_down_on(&s, "bed1");
        assert!(s.click(&ray, 0.0).is_none());
        assert!(!s.hover(Some(&ray)));
        assert!(s.tween().is_none());
    }

    #[test]
    fn mode_change_clears_selection_and_tween() {
        let mut s = session();
        s.set_mode(ViewMode::Interior);
        let ray = ray_down_on(&s, "parlour");
        s.click(&ray, 0.0).unwrap();
        assert!(s.tween().is_some());
        s.set_mode(ViewMode::Stack);
        assert!(s.tween().is_none());
        assert_eq!(s.selection(), &SelectionState::default());
        let pose = ViewMode::Stack.default_pose();
        assert!((s.camera_pose().eye - pose.eye).length() < 1e-3);
        assert_eq!(s.status_text(), ViewMode::Stack.hint());
    }

    #[test]
    fn tween_runs_to_completion_then_rig_takes_over() {
        let mut s = session();
        s.set_mode(ViewMode::Interior);
        let ray = ray_down_on(&s, "bed3");
        let room = s.click(&ray, 1.0).unwrap();
        let dest = s.framing_pose_for(&room).unwrap();
        s.tick(1.3);
        assert!(s.tween().is_some());
        s.tick(2.0);
        assert!(s.tween().is_none());
        assert!((s.camera_pose().target - dest.target).length() < 1e-3);
        assert!((s.camera_pose().eye - dest.eye).length() < 1e-2);
        // Idle rig holds the framed pose.
        s.tick(2.1);
        assert!((s.camera_pose().eye - dest.eye).length() < 1e-2);
    }

    #[test]
    fn new_click_supersedes_tween() {
        let mut s = session();
        s.set_mode(ViewMode::Interior);
        s.click(&ray_down_on(&s, "bed1"), 0.0).unwrap();
        s.tick(0.2);
        let second = s.click(&ray_down_on(&s, "wc3"), 0.2).unwrap();
        let t = s.tween().unwrap();
        assert_eq!(t.start, 0.2);
        assert_eq!(t.destination(), s.framing_pose_for(&second).unwrap());
        assert_eq!(s.status_text(), "Selected: Toilet (B3) - click another room to focus");
    }

    #[test]
    fn drag_cancels_tween_and_is_not_a_click() {
        let mut s = session();
        s.set_mode(ViewMode::Interior);
        s.click(&ray_down_on(&s, "bed1"), 0.0).unwrap();
        s.pointer_down(PointerButton::Primary, false);
        assert!(s.tween().is_none());
        s.pointer_move(30.0, 0.0);
        let ray = ray_down_on(&s, "bed2");
        assert!(s.pointer_up(Some(&ray), 0.1).is_none());
        assert_eq!(s.selection().selected, Some(RoomRef::new("bed1", 3)));

        s.pointer_down(PointerButton::Primary, false);
        s.pointer_move(1.0, 0.0);
        assert_eq!(s.pointer_up(Some(&ray), 0.2), Some(RoomRef::new("bed2", 3)));
    }

    #[test]
    fn fit_without_selection_is_a_no_op() {
        let mut s = session();
        assert!(!s.fit_selected(0.0));
        assert!(s.tween().is_none());
    }

    #[test]
    fn view_changes_bump_revision() {
        let mut s = session();
        let r0 = s.scene_revision();
        s.set_filter(ViewFilter::Roof);
        s.set_explode_slider(0.0);
        assert_eq!(s.scene_revision(), r0 + 2);
        assert_eq!(s.view().explode_amount, 0.0);
    }
}
