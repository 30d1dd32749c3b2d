use std::cell::RefCell;
use std::rc::Rc;

use folio_core::collage::{CollageGeometry, Key, TileBounds, WheelInput};
use folio_core::deep_link::{DeepLinkRequest, SectionBounds};
use folio_core::navigation::{
    Command, DeepLinkStep, DeferredKind, LayoutWait, Navigator, NavigatorSnapshot, SettleOutcome,
    Timings, WheelOutcome,
};
use futures::channel::oneshot;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::app_router;
use crate::frame::{signal_or_fallback, wait_until};
use crate::viewport;

pub(crate) type AppSubscriber = Rc<dyn Fn()>;

pub(crate) const PANEL_CLASS: &str = "panel-overlay";
pub(crate) const STRIP_CLASS: &str = "panel-strip";
pub(crate) const TILE_CLASS: &str = "parallax-frame";
const SECTION_INDEX_ATTR: &str = "data-category-index";

/// Owns the navigator and carries out the commands it returns. Views only
/// read snapshots and forward input.
pub(crate) struct AppCore {
    navigator: RefCell<Navigator>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
    collage: RefCell<Option<HtmlElement>>,
    settle_timer: RefCell<Option<Timeout>>,
    exit_timer: RefCell<Option<Timeout>>,
}

impl AppCore {
    pub(crate) fn new(timings: Timings) -> Rc<Self> {
        Rc::new(Self {
            navigator: RefCell::new(Navigator::new(timings)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            collage: RefCell::new(None),
            settle_timer: RefCell::new(None),
            exit_timer: RefCell::new(None),
        })
    }

    pub(crate) fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub(crate) fn snapshot(&self) -> NavigatorSnapshot {
        self.navigator.borrow().snapshot()
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    /// Runs one navigator transition, publishes the new snapshot, then
    /// executes the resulting commands.
    pub(crate) fn dispatch<F>(self: &Rc<Self>, transition: F)
    where
        F: FnOnce(&mut Navigator) -> Vec<Command>,
    {
        self.refresh_geometry();
        let commands = {
            let mut nav = self.navigator.borrow_mut();
            transition(&mut *nav)
        };
        self.notify();
        self.execute(commands);
    }

    pub(crate) fn open_category(self: &Rc<Self>, key: &str) {
        gloo::console::log!("open category", key.to_string());
        self.dispatch(|nav| nav.open_category(key));
    }

    pub(crate) fn back(self: &Rc<Self>) {
        self.dispatch(|nav| nav.back());
    }

    pub(crate) fn step(self: &Rc<Self>, offset: isize) {
        self.dispatch(|nav| nav.step(offset));
    }

    pub(crate) fn key(self: &Rc<Self>, key: Key) {
        self.dispatch(|nav| nav.on_key(key));
    }

    pub(crate) fn activate_item(self: &Rc<Self>, slug: &str) {
        self.dispatch(|nav| nav.activate_item(slug));
    }

    pub(crate) fn activate_title(self: &Rc<Self>) {
        let commands = self.navigator.borrow().activate_title();
        self.execute(commands);
    }

    pub(crate) fn close_focus(self: &Rc<Self>) {
        self.dispatch(|nav| {
            nav.close_focus();
            Vec::new()
        });
    }

    pub(crate) fn wheel(self: &Rc<Self>, input: WheelInput, now_ms: f64) -> bool {
        self.refresh_geometry();
        let WheelOutcome {
            prevent_default,
            commands,
        } = self.navigator.borrow_mut().on_wheel(input, now_ms);
        if !commands.is_empty() {
            self.notify();
            self.execute(commands);
        }
        prevent_default
    }

    pub(crate) fn begin_deep_link(self: &Rc<Self>, request: DeepLinkRequest) {
        gloo::console::log!(
            "deep link",
            request.category.clone(),
            request.item_slug.clone().unwrap_or_default()
        );
        self.dispatch(|nav| nav.begin_deep_link(request));
    }

    pub(crate) fn set_collage(&self, element: Option<HtmlElement>) {
        *self.collage.borrow_mut() = element;
        self.refresh_geometry();
    }

    /// Section offsets depend on rendered widths, so they are re-measured
    /// before every transition.
    fn refresh_geometry(&self) {
        let Some(collage) = self.collage.borrow().clone() else {
            return;
        };
        self.navigator
            .borrow_mut()
            .set_geometry(measure_geometry(&collage));
    }

    /// Scroll handler: nearest-category detection and parallax in one pass.
    pub(crate) fn collage_scrolled(&self) {
        let Some(collage) = self.collage.borrow().clone() else {
            return;
        };
        let tiles = measure_tiles(&collage);
        let scroll_left = f64::from(collage.scroll_left());
        let geometry = measure_geometry(&collage);
        self.navigator.borrow_mut().on_scroll(
            scroll_left,
            geometry,
            &tiles,
            viewport::viewport_width(),
        );
        self.notify();
    }

    /// Drops timers and any pending deep link. Called when the root unmounts.
    pub(crate) fn shutdown(&self) {
        self.settle_timer.borrow_mut().take();
        self.exit_timer.borrow_mut().take();
        self.navigator.borrow_mut().cancel_deep_link();
        self.collage.borrow_mut().take();
    }

    fn execute(self: &Rc<Self>, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::ScrollTo { left, smooth } => self.scroll_collage(left, smooth),
                Command::Defer { delay_ms, task } => {
                    let core = Rc::downgrade(self);
                    let timeout = Timeout::new(delay_ms, move || {
                        if let Some(core) = core.upgrade() {
                            core.dispatch(|nav| nav.fire(task));
                        }
                    });
                    let slot = match task.kind {
                        DeferredKind::SettleScroll { .. } => &self.settle_timer,
                        DeferredKind::FinishExit => &self.exit_timer,
                    };
                    *slot.borrow_mut() = Some(timeout);
                }
                Command::OpenProject { slug } => app_router::open_project(slug),
                Command::OpenExternal { url } => app_router::open_external(url),
                Command::ClearRouterState => app_router::clear_router_state(),
                Command::AwaitTransition {
                    ticket,
                    fallback_ms,
                } => {
                    let core = Rc::clone(self);
                    spawn_local(async move {
                        core.run_deep_link(ticket, fallback_ms).await;
                    });
                }
            }
        }
    }

    fn scroll_collage(&self, left: f64, smooth: bool) {
        let Some(collage) = self.collage.borrow().clone() else {
            return;
        };
        let options = ScrollToOptions::new();
        options.set_left(left);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        });
        collage.scroll_to_with_scroll_to_options(&options);
    }

    fn is_current_ticket(&self, ticket: u64) -> bool {
        self.navigator.borrow().is_current_ticket(ticket)
    }

    async fn run_deep_link(self: Rc<Self>, ticket: u64, fallback_ms: u32) {
        let (listener, signal) = panel_transition_signal();
        let from_signal = signal_or_fallback(signal, fallback_ms).await;
        drop(listener);
        if !self.is_current_ticket(ticket) {
            return;
        }
        if !from_signal {
            gloo::console::log!("deep link: slide-up signal missed, using fallback");
        }
        let outcome = self.navigator.borrow_mut().transition_settled(ticket);
        match outcome {
            SettleOutcome::Stale => {}
            SettleOutcome::Resolved(commands) => {
                gloo::console::warn!("deep link: unknown category, staying on default");
                self.notify();
                self.execute(commands);
            }
            SettleOutcome::WaitForLayout(wait) => self.await_layout(wait).await,
        }
    }

    async fn await_layout(self: Rc<Self>, wait: LayoutWait) {
        let core = Rc::clone(&self);
        let probed = wait_until(
            move || {
                if !core.is_current_ticket(wait.ticket) {
                    return Some(None);
                }
                core.section_bounds(wait.category)
                    .filter(SectionBounds::is_laid_out)
                    .map(Some)
            },
            wait.timeout_ms,
        )
        .await;
        match probed {
            Some(Some(bounds)) => {
                let step = self
                    .navigator
                    .borrow_mut()
                    .resolve_deep_link(wait.ticket, Some(bounds));
                if let DeepLinkStep::Resolved(commands) = step {
                    self.notify();
                    self.execute(commands);
                }
            }
            Some(None) => {}
            None => {
                if self.navigator.borrow_mut().deep_link_timed_out(wait.ticket) {
                    gloo::console::warn!("deep link: collage layout never settled");
                    self.notify();
                }
            }
        }
    }

    fn section_bounds(&self, category: usize) -> Option<SectionBounds> {
        let collage = self.collage.borrow().clone()?;
        let selector = format!("[{SECTION_INDEX_ATTR}=\"{category}\"]");
        let section = collage
            .query_selector(&selector)
            .ok()??
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(SectionBounds {
            offset_left: f64::from(section.offset_left()),
            width: section.get_bounding_client_rect().width(),
        })
    }
}

pub(crate) struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

fn measure_geometry(collage: &HtmlElement) -> CollageGeometry {
    CollageGeometry::new(
        f64::from(collage.scroll_width()),
        f64::from(collage.client_width()),
    )
}

fn measure_tiles(collage: &HtmlElement) -> Vec<TileBounds> {
    let Ok(nodes) = collage.query_selector_all(&format!(".{TILE_CLASS}")) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|element| {
            let rect = element.get_bounding_client_rect();
            TileBounds {
                left: rect.left(),
                width: rect.width(),
            }
        })
        .collect()
}

/// Resolves when the collage panel's slide-up animation ends. The listener
/// sits on the document because the panel may not be mounted yet.
fn panel_transition_signal() -> (Option<EventListener>, oneshot::Receiver<()>) {
    let (tx, rx) = oneshot::channel();
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return (None, rx);
    };
    let tx = RefCell::new(Some(tx));
    let listener = EventListener::new(&document, "animationend", move |event| {
        let is_panel = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .map(|element| element.class_list().contains(PANEL_CLASS))
            .unwrap_or(false);
        if !is_panel {
            return;
        }
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(());
        }
    });
    (Some(listener), rx)
}
