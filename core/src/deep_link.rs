use serde::Deserialize;
use thiserror::Error;

/// Raw router state as pushed by "take me back" style navigation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouterPayload {
    #[serde(default, alias = "openPanel")]
    pub open_category: Option<String>,
    #[serde(default)]
    pub open_item_slug: Option<String>,
}

#[derive(Debug, Error)]
pub enum DeepLinkError {
    #[error("router state is not a deep-link payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("deep link names item `{slug}` without a category")]
    MissingCategory { slug: String },
}

/// A validated request to land on a category, optionally focusing one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepLinkRequest {
    pub category: String,
    pub item_slug: Option<String>,
}

impl DeepLinkRequest {
    pub fn new(category: &str, item_slug: Option<&str>) -> Option<Self> {
        Self::from_payload(RouterPayload {
            open_category: Some(category.to_string()),
            open_item_slug: item_slug.map(str::to_string),
        })
        .ok()
        .flatten()
    }

    /// `Ok(None)` means the payload carries no deep link at all.
    pub fn from_payload(payload: RouterPayload) -> Result<Option<Self>, DeepLinkError> {
        let category = non_empty(payload.open_category);
        let item_slug = non_empty(payload.open_item_slug);
        match (category, item_slug) {
            (Some(category), item_slug) => Ok(Some(Self {
                category,
                item_slug,
            })),
            (None, Some(slug)) => Err(DeepLinkError::MissingCategory { slug }),
            (None, None) => Ok(None),
        }
    }

    /// Parses serialized router state. `null`, empty text and non-object
    /// state without deep-link fields all mean "no request".
    pub fn from_state_json(raw: &str) -> Result<Option<Self>, DeepLinkError> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "null" || raw == "undefined" {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Ok(None);
        }
        let payload: RouterPayload = serde_json::from_value(value)?;
        Self::from_payload(payload)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeepLinkPhase {
    AwaitingTransition,
    AwaitingLayout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDeepLink {
    pub request: DeepLinkRequest,
    pub ticket: u64,
    pub phase: DeepLinkPhase,
}

/// Rendered bounds of a category section inside the collage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub offset_left: f64,
    pub width: f64,
}

impl SectionBounds {
    pub fn is_laid_out(&self) -> bool {
        self.width.is_finite() && self.width > 0.0
    }
}
