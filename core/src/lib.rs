pub mod catalog;
pub mod collage;
pub mod deep_link;
pub mod focus;
pub mod layout;
pub mod navigation;
pub mod preload;

pub use catalog::{Category, Item, CATEGORIES, DEFAULT_DEEP_LINK_CATEGORY, EXTERNAL_LINK_SLUG};
pub use collage::{CollageGeometry, Key, Parallax, TileBounds, WheelInput};
pub use deep_link::{DeepLinkError, DeepLinkRequest, RouterPayload, SectionBounds};
pub use focus::{Activation, FocusOverlay, Thumbnail};
pub use layout::{LayoutMetrics, PlatformHints, ViewportBand};
pub use navigation::{
    Command, DeepLinkStep, DeferredKind, DeferredTask, LayoutWait, NavigationState, Navigator,
    NavigatorSnapshot, ScrollPass, SettleOutcome, Timings, WheelOutcome,
};
pub use preload::{
    AssetKind, LoadOutcome, Manifest, ManifestError, PreloadPlan, PreloadProgress, PreloadState,
};
