use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Manifest {
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadEntry {
    pub url: String,
    pub kind: AssetKind,
}

/// Deduplicated load list. Critical images come first, then manifest images,
/// then manifest videos; the first occurrence of a URL decides its kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreloadPlan {
    entries: Vec<PreloadEntry>,
}

impl PreloadPlan {
    pub fn build<'a, I>(critical_images: I, manifest: &Manifest) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut plan = Self::default();
        for url in critical_images {
            plan.push(url, AssetKind::Image);
        }
        for url in &manifest.images {
            plan.push(url, AssetKind::Image);
        }
        for url in &manifest.videos {
            plan.push(url, AssetKind::Video);
        }
        plan
    }

    fn push(&mut self, url: &str, kind: AssetKind) {
        let url = url.trim();
        if url.is_empty() || self.entries.iter().any(|entry| entry.url == url) {
            return;
        }
        self.entries.push(PreloadEntry {
            url: url.to_string(),
            kind,
        });
    }

    pub fn entries(&self) -> &[PreloadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// Counts settled loads. Success and failure both count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreloadProgress {
    total: usize,
    completed: usize,
    failed: usize,
}

impl PreloadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
        }
    }

    /// Records one settled load and returns the new fraction.
    pub fn record(&mut self, outcome: LoadOutcome) -> f64 {
        if self.completed < self.total {
            self.completed += 1;
            if outcome == LoadOutcome::Failed {
                self.failed += 1;
            }
        }
        self.fraction()
    }

    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Session-level readiness. `ready` only ever goes from false to true and
/// progress never moves backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PreloadState {
    ready: bool,
    progress: f64,
}

impl PreloadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State restored from the session flag.
    pub fn already_ready() -> Self {
        Self {
            ready: true,
            progress: 1.0,
        }
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn report(&mut self, fraction: f64) {
        if self.ready || !fraction.is_finite() {
            return;
        }
        self.progress = self.progress.max(fraction.clamp(0.0, 1.0));
    }

    /// Natural completion. Returns true when this call flipped `ready`.
    pub fn finish(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.progress = 1.0;
        self.ready = true;
        true
    }

    /// Manual escape hatch; progress keeps its last reported value.
    pub fn skip(&mut self) -> bool {
        if self.ready {
            return false;
        }
        self.ready = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(matches!(Manifest::parse("<html>"), Err(ManifestError::Json(_))));
        let partial = Manifest::parse(r#"{"videos":["/a.mp4"]}"#).expect("partial manifest");
        assert!(partial.images.is_empty());
        assert_eq!(partial.videos, vec!["/a.mp4".to_string()]);
    }

    #[test]
    fn plan_dedups_with_first_kind_winning() {
        let manifest = Manifest {
            images: vec!["/a.png".into(), "/b.png".into(), " ".into()],
            videos: vec!["/b.png".into(), "/c.mp4".into(), "/c.mp4".into()],
        };
        let plan = PreloadPlan::build(["/a.png", "/icon.png"], &manifest);
        let urls: Vec<_> = plan.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["/a.png", "/icon.png", "/b.png", "/c.mp4"]);
        let kinds: Vec<_> = plan.entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![AssetKind::Image, AssetKind::Image, AssetKind::Image, AssetKind::Video]
        );
    }

    #[test]
    fn empty_plan_is_complete() {
        let progress = PreloadProgress::new(0);
        assert!(progress.is_done());
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn state_is_one_way() {
        let mut state = PreloadState::new();
        state.report(0.5);
        state.report(0.25);
        assert_eq!(state.progress(), 0.5);
        assert!(state.skip());
        assert!(!state.finish());
        assert!(state.ready());
        state.report(0.9);
        assert_eq!(state.progress(), 0.5);
    }
}
