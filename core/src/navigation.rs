//! The collage controller: active category, exit transition, snap stepping,
//! focus overlay gating and deep-link resolution.
//!
//! `Navigator` never touches the page. Every operation takes its inputs
//! (time, measured geometry, key/wheel data) as arguments and returns the
//! [`Command`]s the host has to carry out.

use crate::catalog::{self, Category, Item, CATEGORIES, DEFAULT_DEEP_LINK_CATEGORY};
use crate::collage::{CollageGeometry, Cooldown, Key, Parallax, TileBounds, WheelInput};
use crate::deep_link::{DeepLinkPhase, DeepLinkRequest, PendingDeepLink, SectionBounds};
use crate::focus::{Activation, FocusOverlay, Thumbnail};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    pub settle_ms: u32,
    pub exit_ms: u32,
    pub wheel_cooldown_ms: u32,
    pub transition_fallback_ms: u32,
    pub layout_timeout_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_ms: 700,
            exit_ms: 600,
            wheel_cooldown_ms: 500,
            transition_fallback_ms: 900,
            layout_timeout_ms: 3000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredKind {
    SettleScroll { category: usize },
    FinishExit,
}

/// A timer callback. Stale epochs are ignored when fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredTask {
    pub kind: DeferredKind,
    epoch: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ScrollTo { left: f64, smooth: bool },
    Defer { delay_ms: u32, task: DeferredTask },
    OpenProject { slug: &'static str },
    OpenExternal { url: &'static str },
    ClearRouterState,
    AwaitTransition { ticket: u64, fallback_ms: u32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WheelOutcome {
    pub prevent_default: bool,
    pub commands: Vec<Command>,
}

impl WheelOutcome {
    fn pass_through() -> Self {
        Self::default()
    }

    fn consumed(commands: Vec<Command>) -> Self {
        Self {
            prevent_default: true,
            commands,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollPass {
    pub active_changed: bool,
}

/// What the host waits for once the slide-up transition has settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutWait {
    pub ticket: u64,
    pub category: usize,
    pub timeout_ms: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SettleOutcome {
    WaitForLayout(LayoutWait),
    Resolved(Vec<Command>),
    Stale,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeepLinkStep {
    NotReady,
    Resolved(Vec<Command>),
    Stale,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    active: Option<usize>,
    is_exiting: bool,
    focus: FocusOverlay,
}

impl NavigationState {
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_category(&self) -> Option<&'static Category> {
        self.active.and_then(|index| CATEGORIES.get(index))
    }

    pub fn active_key(&self) -> Option<&'static str> {
        self.active_category().map(|category| category.key)
    }

    pub fn is_home(&self) -> bool {
        self.active.is_none()
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn focused_item(&self) -> Option<&'static Item> {
        self.focus.focused()
    }

    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        self.focus.thumbnails()
    }

    /// Project page behind the focused item's title.
    pub fn title_target(&self) -> Option<String> {
        self.focus.title_target()
    }

    /// Page-level scroll stays locked whenever the collage is showing.
    pub fn page_scroll_locked(&self) -> bool {
        self.active.is_some()
    }
}

/// Immutable view of the controller handed to renderers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigatorSnapshot {
    pub state: NavigationState,
    pub parallax: Parallax,
    pub deep_link_pending: bool,
}

#[derive(Clone, Debug)]
pub struct Navigator {
    timings: Timings,
    state: NavigationState,
    cooldown: Cooldown,
    geometry: CollageGeometry,
    parallax: Parallax,
    epoch: u64,
    settling: Option<usize>,
    deep_link: Option<PendingDeepLink>,
    next_ticket: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}

impl Navigator {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            state: NavigationState::default(),
            cooldown: Cooldown::new(f64::from(timings.wheel_cooldown_ms)),
            geometry: CollageGeometry::default(),
            parallax: Parallax::default(),
            epoch: 0,
            settling: None,
            deep_link: None,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn snapshot(&self) -> NavigatorSnapshot {
        NavigatorSnapshot {
            state: self.state,
            parallax: self.parallax.clone(),
            deep_link_pending: self.deep_link.is_some(),
        }
    }

    pub fn pending_deep_link(&self) -> Option<&PendingDeepLink> {
        self.deep_link.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: CollageGeometry) {
        self.geometry = geometry;
    }

    pub fn offset_for(&self, index: usize) -> f64 {
        self.geometry.offset_for(index, CATEGORIES.len())
    }

    /// Home launcher: show the collage, then scroll once the slide-up settles.
    pub fn open_category(&mut self, key: &str) -> Vec<Command> {
        if !self.state.is_home() {
            return Vec::new();
        }
        let Some(index) = catalog::category_index(key) else {
            return Vec::new();
        };
        self.enter_collage(index);
        self.settling = Some(index);
        vec![Command::Defer {
            delay_ms: self.timings.settle_ms,
            task: self.task(DeferredKind::SettleScroll { category: index }),
        }]
    }

    pub fn back(&mut self) -> Vec<Command> {
        if self.state.is_home() || self.state.is_exiting {
            return Vec::new();
        }
        self.epoch += 1;
        self.state.is_exiting = true;
        self.settling = None;
        self.deep_link = None;
        vec![Command::Defer {
            delay_ms: self.timings.exit_ms,
            task: self.task(DeferredKind::FinishExit),
        }]
    }

    pub fn fire(&mut self, task: DeferredTask) -> Vec<Command> {
        if task.epoch != self.epoch {
            return Vec::new();
        }
        match task.kind {
            DeferredKind::SettleScroll { category } => {
                if self.settling != Some(category) {
                    return Vec::new();
                }
                self.settling = None;
                self.state.active = Some(category);
                vec![Command::ScrollTo {
                    left: self.offset_for(category),
                    smooth: true,
                }]
            }
            DeferredKind::FinishExit => {
                self.state = NavigationState::default();
                self.settling = None;
                self.cooldown.reset();
                Vec::new()
            }
        }
    }

    /// Arrow buttons and arrow keys: one category, clamped at both ends.
    pub fn step(&mut self, offset: isize) -> Vec<Command> {
        if self.state.focus.is_open() || self.state.is_exiting {
            return Vec::new();
        }
        let Some(current) = self.state.active else {
            return Vec::new();
        };
        let max = CATEGORIES.len().saturating_sub(1) as isize;
        let next = (current as isize + offset).clamp(0, max) as usize;
        if next == current {
            return Vec::new();
        }
        self.state.active = Some(next);
        self.settling = None;
        vec![Command::ScrollTo {
            left: self.offset_for(next),
            smooth: true,
        }]
    }

    pub fn on_wheel(&mut self, input: WheelInput, now_ms: f64) -> WheelOutcome {
        if self.state.is_home() || self.state.focus.is_open() || self.state.is_exiting {
            return WheelOutcome::pass_through();
        }
        if input.in_strip || !input.is_vertical() {
            return WheelOutcome::pass_through();
        }
        if !self.cooldown.try_acquire(now_ms) {
            return WheelOutcome::consumed(Vec::new());
        }
        WheelOutcome::consumed(self.step(input.direction()))
    }

    pub fn on_key(&mut self, key: Key) -> Vec<Command> {
        if self.state.focus.is_open() {
            self.state.focus.handle_key(key);
            return Vec::new();
        }
        match key.step() {
            Some(offset) => self.step(offset),
            None => Vec::new(),
        }
    }

    /// One scroll event: parallax and nearest-category adoption in the same pass.
    pub fn on_scroll(
        &mut self,
        scroll_left: f64,
        geometry: CollageGeometry,
        tiles: &[TileBounds],
        viewport_width: f64,
    ) -> ScrollPass {
        self.geometry = geometry;
        self.parallax = Parallax::compute(tiles, viewport_width);
        let adopt = self.state.active.is_some()
            && !self.state.is_exiting
            && self.settling.is_none()
            && self.deep_link.is_none();
        if !adopt {
            return ScrollPass {
                active_changed: false,
            };
        }
        let nearest = geometry.nearest_index(scroll_left, CATEGORIES.len());
        let active_changed = nearest.is_some() && nearest != self.state.active;
        if active_changed {
            self.state.active = nearest;
        }
        ScrollPass { active_changed }
    }

    /// Tile or thumbnail activation.
    pub fn activate_item(&mut self, slug: &str) -> Vec<Command> {
        if self.state.is_home() {
            return Vec::new();
        }
        match self.state.focus.activate(slug) {
            Activation::External { url } => vec![Command::OpenExternal { url }],
            Activation::Focused(_) | Activation::Unknown => Vec::new(),
        }
    }

    pub fn close_focus(&mut self) -> bool {
        self.state.focus.close()
    }

    pub fn activate_title(&self) -> Vec<Command> {
        match self.state.focused_item() {
            Some(item) => vec![Command::OpenProject { slug: item.slug }],
            None => Vec::new(),
        }
    }

    /// Starts a deep link: the default category opens right away so the
    /// slide-up and layout begin while the real target is resolved.
    pub fn begin_deep_link(&mut self, request: DeepLinkRequest) -> Vec<Command> {
        let default_index = catalog::category_index(DEFAULT_DEEP_LINK_CATEGORY).unwrap_or(0);
        self.enter_collage(default_index);
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.deep_link = Some(PendingDeepLink {
            request,
            ticket,
            phase: DeepLinkPhase::AwaitingTransition,
        });
        vec![
            Command::ClearRouterState,
            Command::AwaitTransition {
                ticket,
                fallback_ms: self.timings.transition_fallback_ms,
            },
        ]
    }

    /// Slide-up finished (or its fallback timer fired).
    pub fn transition_settled(&mut self, ticket: u64) -> SettleOutcome {
        let Some(pending) = self.deep_link.as_mut() else {
            return SettleOutcome::Stale;
        };
        if pending.ticket != ticket || pending.phase != DeepLinkPhase::AwaitingTransition {
            return SettleOutcome::Stale;
        }
        match catalog::category_index(&pending.request.category) {
            Some(category) => {
                pending.phase = DeepLinkPhase::AwaitingLayout;
                SettleOutcome::WaitForLayout(LayoutWait {
                    ticket,
                    category,
                    timeout_ms: self.timings.layout_timeout_ms,
                })
            }
            None => {
                self.deep_link = None;
                SettleOutcome::Resolved(self.scroll_to_active())
            }
        }
    }

    /// Applies a pending deep link once its section has a rendered width.
    /// Resolving twice is a no-op.
    pub fn resolve_deep_link(
        &mut self,
        ticket: u64,
        bounds: Option<SectionBounds>,
    ) -> DeepLinkStep {
        let Some(pending) = self.deep_link.as_ref() else {
            return DeepLinkStep::Stale;
        };
        if pending.ticket != ticket {
            return DeepLinkStep::Stale;
        }
        let Some(bounds) = bounds.filter(SectionBounds::is_laid_out) else {
            return DeepLinkStep::NotReady;
        };
        let Some(pending) = self.deep_link.take() else {
            return DeepLinkStep::Stale;
        };
        let Some(category) = catalog::category_index(&pending.request.category) else {
            return DeepLinkStep::Resolved(Vec::new());
        };
        self.state.active = Some(category);
        if let Some(slug) = pending.request.item_slug.as_deref() {
            let in_category = catalog::item_in_category(&CATEGORIES[category], slug);
            if in_category.is_some() {
                // A deep link never opens a new browsing context: the external
                // item leaves the overlay closed.
                let _ = self.state.focus.activate(slug);
            }
        }
        DeepLinkStep::Resolved(vec![Command::ScrollTo {
            left: bounds.offset_left,
            smooth: false,
        }])
    }

    /// Layout never settled in time: keep the default category and drop the request.
    pub fn deep_link_timed_out(&mut self, ticket: u64) -> bool {
        match self.deep_link.as_ref() {
            Some(pending) if pending.ticket == ticket => {
                self.deep_link = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_deep_link(&mut self) {
        self.deep_link = None;
    }

    pub fn is_current_ticket(&self, ticket: u64) -> bool {
        self.deep_link
            .as_ref()
            .map(|pending| pending.ticket == ticket)
            .unwrap_or(false)
    }

    fn enter_collage(&mut self, index: usize) {
        self.epoch += 1;
        self.state.active = Some(index);
        self.state.is_exiting = false;
        self.state.focus.close();
        self.settling = None;
        self.cooldown.reset();
    }

    fn scroll_to_active(&self) -> Vec<Command> {
        match self.state.active {
            Some(index) => vec![Command::ScrollTo {
                left: self.offset_for(index),
                smooth: false,
            }],
            None => Vec::new(),
        }
    }

    fn task(&self, kind: DeferredKind) -> DeferredTask {
        DeferredTask {
            kind,
            epoch: self.epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deferred(commands: &[Command]) -> DeferredTask {
        match commands {
            [Command::Defer { task, .. }] => *task,
            other => panic!("expected a single deferred task, got {other:?}"),
        }
    }

    #[test]
    fn stale_settle_task_is_ignored_after_back() {
        let mut nav = Navigator::default();
        let settle = deferred(&nav.open_category("software"));
        let exit = deferred(&nav.back());
        assert!(nav.fire(settle).is_empty());
        assert!(nav.state().is_exiting());
        nav.fire(exit);
        assert!(nav.state().is_home());
        assert!(!nav.state().is_exiting());
    }

    #[test]
    fn launchers_only_work_from_home() {
        let mut nav = Navigator::default();
        assert!(nav.open_category("missing").is_empty());
        assert_eq!(nav.open_category("about").len(), 1);
        assert!(nav.open_category("software").is_empty());
        assert_eq!(nav.state().active_key(), Some("about"));
    }

    #[test]
    fn scroll_adoption_waits_for_settle() {
        let mut nav = Navigator::default();
        let geometry = CollageGeometry::new(4000.0, 1000.0);
        let settle = deferred(&nav.open_category("electrical"));
        let pass = nav.on_scroll(0.0, geometry, &[], 1000.0);
        assert!(!pass.active_changed);
        assert_eq!(nav.state().active_key(), Some("electrical"));
        nav.fire(settle);
        let pass = nav.on_scroll(1000.0, geometry, &[], 1000.0);
        assert!(pass.active_changed);
        assert_eq!(nav.state().active_key(), Some("mechanical"));
    }

    #[test]
    fn wheel_outside_collage_passes_through() {
        let mut nav = Navigator::default();
        let wheel = WheelInput {
            delta_x: 0.0,
            delta_y: 120.0,
            in_strip: false,
        };
        assert_eq!(nav.on_wheel(wheel, 0.0), WheelOutcome::default());
    }
}
