use std::rc::Rc;

use folio_core::catalog::{Item, CATEGORIES, HOME_ICONS, HOME_MASCOT_SRC};
use folio_core::collage::{Key, WheelInput};
use folio_core::focus::Thumbnail;
use folio_core::layout::LayoutMetrics;
use folio_core::navigation::NavigatorSnapshot;
use folio_core::preload::PreloadState;
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use js_sys::Date;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent};
use yew::prelude::*;

use crate::app_core::{AppCore, PANEL_CLASS, STRIP_CLASS, TILE_CLASS};
use crate::app_router;
use crate::config::AppConfig;
use crate::preloader;
use crate::session_store;
use crate::viewport::{self, use_layout_metrics};

#[derive(Properties)]
pub(crate) struct AppProps {
    pub(crate) core: Rc<AppCore>,
    pub(crate) config: AppConfig,
}

impl PartialEq for AppProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core) && self.config == other.config
    }
}

enum PreloadAction {
    Progress(f64),
    Finish,
    Skip,
}

#[derive(Clone, Copy, PartialEq)]
struct PreloadModel(PreloadState);

impl Reducible for PreloadModel {
    type Action = PreloadAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = self.0;
        let changed = match action {
            PreloadAction::Progress(fraction) => {
                let before = state.progress();
                state.report(fraction);
                state.progress() != before
            }
            PreloadAction::Finish => state.finish(),
            PreloadAction::Skip => state.skip(),
        };
        if changed {
            Rc::new(Self(state))
        } else {
            self
        }
    }
}

fn is_video_src(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    [".mp4", ".webm", ".mov"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}

fn media(src: &'static str, alt: &'static str, style: String) -> Html {
    if is_video_src(src) {
        html! {
            <video {src} {style} autoplay={true} muted={true} loop={true} playsinline={true} />
        }
    } else {
        html! {
            <img {src} {alt} {style} draggable="false" />
        }
    }
}

fn set_body_overflow(value: &str) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        return;
    };
    let _ = body.style().set_property("overflow", value);
}

#[function_component(App)]
pub(crate) fn app(props: &AppProps) -> Html {
    let core = props.core.clone();
    let config = props.config.clone();
    let snapshot = use_state(|| core.snapshot());
    let metrics = use_layout_metrics();
    let preload = {
        let skip = config.force_skip_preload;
        use_reducer(move || {
            if skip || session_store::preload_ready() {
                PreloadModel(PreloadState::already_ready())
            } else {
                PreloadModel(PreloadState::new())
            }
        })
    };
    let ready = preload.0.ready();

    {
        let core = core.clone();
        let snapshot = snapshot.clone();
        use_effect_with((), move |_| {
            let core_for_cb = core.clone();
            let subscription = core.subscribe(Rc::new(move || {
                snapshot.set(core_for_cb.snapshot());
            }));
            move || {
                drop(subscription);
                core.shutdown();
            }
        });
    }

    {
        let dispatcher = preload.dispatcher();
        let manifest_url = config.manifest_url.clone();
        use_effect_with((), move |_| {
            let task = if ready {
                None
            } else {
                let on_progress = {
                    let dispatcher = dispatcher.clone();
                    Rc::new(move |fraction: f64| {
                        dispatcher.dispatch(PreloadAction::Progress(fraction))
                    })
                };
                let on_done = Rc::new(move || dispatcher.dispatch(PreloadAction::Finish));
                Some(preloader::start(manifest_url, on_progress, on_done))
            };
            move || drop(task)
        });
    }

    {
        let core = core.clone();
        use_effect_with(ready, move |ready| {
            if *ready {
                session_store::mark_preload_ready();
                if let Some(request) = app_router::take_deep_link_request() {
                    core.begin_deep_link(request);
                }
            }
            || ()
        });
    }

    {
        let core = core.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let listener = window.map(|window| {
                EventListener::new(&window, "keydown", move |event: &Event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    let key = Key::from_dom_key(&event.key());
                    if key != Key::Other {
                        core.key(key);
                    }
                })
            });
            move || drop(listener)
        });
    }

    let locked = snapshot.state.page_scroll_locked();
    use_effect_with(locked, move |locked| {
        set_body_overflow(if *locked { "hidden" } else { "auto" });
        || set_body_overflow("auto")
    });

    let content = if !ready {
        let onskip = {
            let dispatcher = preload.dispatcher();
            Callback::from(move |_: MouseEvent| dispatcher.dispatch(PreloadAction::Skip))
        };
        html! { <LoadingScreen progress={preload.0.progress()} {onskip} /> }
    } else if snapshot.state.is_home() {
        html! { <HomeScreen core={core.clone()} /> }
    } else {
        html! {
            <CollagePanel core={core.clone()} snapshot={(*snapshot).clone()} {metrics} />
        }
    };

    html! {
        <div class="gradient-bg">
            <GradientBackground />
            {content}
        </div>
    }
}

#[function_component(GradientBackground)]
fn gradient_background() -> Html {
    let reduced = use_state(viewport::prefers_reduced_motion);
    if *reduced {
        return html! { <div class="gradients-container static" /> };
    }
    html! {
        <>
            <svg class="goo-filter">
                <filter id="goo">
                    <feGaussianBlur in="SourceGraphic" stdDeviation="10" result="blur" />
                    <feColorMatrix
                        in="blur"
                        mode="matrix"
                        values="1 0 0 0 0  0 1 0 0 0  0 0 1 0 0  0 0 0 20 -10"
                        result="goo"
                    />
                    <feBlend in="SourceGraphic" in2="goo" />
                </filter>
            </svg>
            <div class="gradients-container">
                <div class="g1" />
                <div class="g2" />
                <div class="g3" />
                <div class="g4" />
                <div class="g5" />
                <div class="interactive" />
            </div>
        </>
    }
}

#[derive(Properties, PartialEq)]
struct LoadingScreenProps {
    progress: f64,
    onskip: Callback<MouseEvent>,
}

#[function_component(LoadingScreen)]
fn loading_screen(props: &LoadingScreenProps) -> Html {
    let percent = (props.progress * 100.0).round() as u32;
    html! {
        <div
            class="preload-screen"
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
            aria-valuenow={percent.to_string()}
        >
            <div class="preload-bar">
                <div class="preload-fill" style={format!("width: {percent}%")} />
            </div>
            <span class="preload-label">{format!("{percent}%")}</span>
            <button class="preload-skip" onclick={props.onskip.clone()}>{"Skip"}</button>
        </div>
    }
}

#[derive(Properties)]
struct CoreProps {
    core: Rc<AppCore>,
}

impl PartialEq for CoreProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

#[function_component(HomeScreen)]
fn home_screen(props: &CoreProps) -> Html {
    let icons = HOME_ICONS.iter().map(|icon| {
        let core = props.core.clone();
        let key = icon.category;
        let onclick = Callback::from(move |_: MouseEvent| core.open_category(key));
        html! {
            <div class="icon-item" key={key} {onclick}>
                <img src={icon.src} alt={icon.label} />
                <span>{icon.label}</span>
            </div>
        }
    });
    html! {
        <div class="text-container">
            <div class="app">
                <div class="content-box">
                    <div class="internal-tab">{"home"}</div>
                    <h1 class="main-title">
                        {"hey, "}<span class="highlight">{"i'm colin!"}</span>
                    </h1>
                    <h2 class="subtitle">
                        {"Mechatronics Engineer who loves robotics, offroading, and AI"}
                    </h2>
                    <img class="bidoof" src={HOME_MASCOT_SRC} alt="Bidoof" />
                    <div class="icon-row">{ for icons }</div>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties)]
struct CollagePanelProps {
    core: Rc<AppCore>,
    snapshot: NavigatorSnapshot,
    metrics: LayoutMetrics,
}

impl PartialEq for CollagePanelProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
            && self.snapshot == other.snapshot
            && self.metrics == other.metrics
    }
}

fn wheel_in_strip(event: &WheelEvent) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest(&format!(".{STRIP_CLASS}")).ok().flatten())
        .is_some()
}

#[function_component(CollagePanel)]
fn collage_panel(props: &CollagePanelProps) -> Html {
    let core = props.core.clone();
    let collage_ref = use_node_ref();

    {
        let core = core.clone();
        let collage_ref = collage_ref.clone();
        use_effect_with((), move |_| {
            let mut listeners = Vec::new();
            if let Some(collage) = collage_ref.cast::<HtmlElement>() {
                core.set_collage(Some(collage.clone()));
                {
                    let core = core.clone();
                    listeners.push(EventListener::new(&collage, "scroll", move |_| {
                        core.collage_scrolled();
                    }));
                }
                {
                    let core = core.clone();
                    let options = EventListenerOptions {
                        phase: EventListenerPhase::Bubble,
                        passive: false,
                    };
                    listeners.push(EventListener::new_with_options(
                        &collage,
                        "wheel",
                        options,
                        move |event: &Event| {
                            let Some(event) = event.dyn_ref::<WheelEvent>() else {
                                return;
                            };
                            let input = WheelInput {
                                delta_x: event.delta_x(),
                                delta_y: event.delta_y(),
                                in_strip: wheel_in_strip(event),
                            };
                            if core.wheel(input, Date::now()) {
                                event.prevent_default();
                            }
                        },
                    ));
                }
                core.collage_scrolled();
            }
            move || {
                drop(listeners);
                core.set_collage(None);
            }
        });
    }

    let state = props.snapshot.state;
    let metrics = props.metrics;
    let on_back = {
        let core = core.clone();
        Callback::from(move |_: MouseEvent| core.back())
    };
    let on_prev = {
        let core = core.clone();
        Callback::from(move |_: MouseEvent| core.step(-1))
    };
    let on_next = {
        let core = core.clone();
        Callback::from(move |_: MouseEvent| core.step(1))
    };

    let object_position = metrics.object_position();
    let mut ordinal = 0usize;
    let sections = CATEGORIES.iter().enumerate().map(|(index, category)| {
        let tiles = category
            .items
            .iter()
            .map(|item| {
                let tile = ordinal;
                ordinal += 1;
                let core = core.clone();
                let slug = item.slug;
                let onclick = Callback::from(move |_: MouseEvent| core.activate_item(slug));
                let frame_style = format!(
                    "width: {}px; height: {}px; cursor: pointer",
                    metrics.tile_width, metrics.tile_height
                );
                let media_style = format!(
                    "transform: {}; object-position: {}",
                    props.snapshot.parallax.transform(tile),
                    object_position
                );
                html! {
                    <div class={TILE_CLASS} key={slug} style={frame_style} {onclick}>
                        <div class="parallax-inner">
                            { media(item.src, item.title, media_style) }
                        </div>
                        <div class="frame-title">{item.title}</div>
                    </div>
                }
            })
            .collect::<Html>();
        html! {
            <div class="panel-section" key={category.key} data-category-index={index.to_string()}>
                <h2>{category.title}</h2>
                <div class={STRIP_CLASS} style={format!("gap: {}px", metrics.gap)}>
                    {tiles}
                </div>
            </div>
        }
    });
    let sections = sections.collect::<Html>();

    let focus = state.focused_item().map(|item| {
        html! {
            <FocusView
                core={core.clone()}
                item={*item}
                title_href={state.title_target()}
                thumbnails={state.thumbnails()}
                {metrics}
            />
        }
    });

    let transition = if state.is_exiting() {
        "slide-down"
    } else {
        "slide-up"
    };
    html! {
        <div class={classes!(PANEL_CLASS, transition)}>
            <button class="back-button" onclick={on_back}>{"Back to Home"}</button>
            <div class="nav-arrows" aria-hidden="false">
                <button class="arrow left" onclick={on_prev} aria-label="Previous section">
                    {"‹"}
                </button>
                <button class="arrow right" onclick={on_next} aria-label="Next section">
                    {"›"}
                </button>
            </div>
            <div class="panel-collage" ref={collage_ref}>
                {sections}
            </div>
            {focus.unwrap_or_default()}
        </div>
    }
}

#[derive(Properties)]
struct FocusViewProps {
    core: Rc<AppCore>,
    item: Item,
    title_href: Option<String>,
    thumbnails: Vec<Thumbnail>,
    metrics: LayoutMetrics,
}

impl PartialEq for FocusViewProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
            && self.item == other.item
            && self.title_href == other.title_href
            && self.thumbnails == other.thumbnails
            && self.metrics == other.metrics
    }
}

#[function_component(FocusView)]
fn focus_view(props: &FocusViewProps) -> Html {
    let core = props.core.clone();
    let item = props.item;
    let on_title = {
        let core = core.clone();
        Callback::from(move |_: MouseEvent| core.activate_title())
    };
    let on_close = {
        let core = core.clone();
        Callback::from(move |_: MouseEvent| core.close_focus())
    };
    let thumb_style = format!(
        "width: {}px; height: {}px",
        props.metrics.thumb_width, props.metrics.thumb_height
    );
    let thumbs = props.thumbnails.iter().map(|thumb| {
        let core = core.clone();
        let slug = thumb.item.slug;
        let onclick = Callback::from(move |_: MouseEvent| core.activate_item(slug));
        html! {
            <button
                key={slug}
                class={classes!("focus-thumb", thumb.selected.then_some("selected"))}
                {onclick}
                aria-label={thumb.item.title}
                title={thumb.item.title}
                style={thumb_style.clone()}
            >
                { media(thumb.item.src, thumb.item.title, String::from("object-fit: cover")) }
            </button>
        }
    });
    let focus_media_style = format!("object-position: {}", props.metrics.object_position());
    html! {
        <div class="focus-overlay">
            <div class="focus-stage">
                <div class="focus-frame">
                    { media(item.src, item.title, focus_media_style) }
                </div>
                <button class="focus-title" onclick={on_title} data-href={props.title_href.clone()}>
                    {item.title}
                </button>
                <button class="focus-close" onclick={on_close} aria-label="Close">{"Esc"}</button>
            </div>
            <div class="focus-strip">{ for thumbs }</div>
        </div>
    }
}

pub(crate) fn run_app(core: Rc<AppCore>, config: AppConfig) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let root = document
        .get_element_by_id("app-root")
        .or_else(|| document.body().map(Element::from));
    let Some(root) = root else {
        gloo::console::warn!("no mount point for folio");
        return;
    };
    let _app_handle =
        yew::Renderer::<App>::with_root_and_props(root, AppProps { core, config }).render();
}
