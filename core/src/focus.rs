use crate::catalog::{self, Item, EXTERNAL_LINK_URL};
use crate::collage::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Focused(&'static Item),
    External { url: &'static str },
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub item: &'static Item,
    pub selected: bool,
}

/// The single-item zoomed view. The focused item is stored as an index into
/// the flattened item sequence, so it can never point outside the catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusOverlay {
    focused: Option<usize>,
}

impl FocusOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.focused.is_some()
    }

    pub fn focused(&self) -> Option<&'static Item> {
        self.focused.and_then(catalog::item_at)
    }

    /// Tile or thumbnail activation. The external-link item leaves the
    /// current focus untouched.
    pub fn activate(&mut self, slug: &str) -> Activation {
        let Some(index) = catalog::item_index(slug) else {
            return Activation::Unknown;
        };
        let Some(item) = catalog::item_at(index) else {
            return Activation::Unknown;
        };
        if catalog::is_external_link(item) {
            return Activation::External {
                url: EXTERNAL_LINK_URL,
            };
        }
        self.focused = Some(index);
        Activation::Focused(item)
    }

    pub fn close(&mut self) -> bool {
        self.focused.take().is_some()
    }

    /// Escape and both arrows close the overlay; arrows never step items.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::ArrowLeft | Key::ArrowRight | Key::Escape => self.close(),
            Key::Other => false,
        }
    }

    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        catalog::flattened_items()
            .enumerate()
            .map(|(index, item)| Thumbnail {
                item,
                selected: self.focused == Some(index),
            })
            .collect()
    }

    pub fn title_target(&self) -> Option<String> {
        self.focused().map(|item| catalog::project_path(item.slug))
    }
}
