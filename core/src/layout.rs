//! Responsive tile and thumbnail sizing.
//!
//! Everything here is a pure function of the viewport width and coarse
//! platform hints. Metrics are recomputed from scratch on every resize and
//! never blended with the previous value.

pub const MOBILE_MAX_WIDTH: f64 = 640.0;
pub const TABLET_MAX_WIDTH: f64 = 1024.0;

const WEBKIT_SHRINK: f64 = 0.92;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportBand {
    Mobile,
    Tablet,
    Desktop,
}

struct BandParams {
    width_fraction: f64,
    width_cap: f64,
    aspect: f64,
    gap: f64,
    crop_bias_pct: f64,
}

impl ViewportBand {
    pub fn classify(viewport_width: f64) -> Self {
        let width = sanitize_width(viewport_width);
        if width <= MOBILE_MAX_WIDTH {
            ViewportBand::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            ViewportBand::Tablet
        } else {
            ViewportBand::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == ViewportBand::Mobile
    }

    fn params(self) -> BandParams {
        match self {
            ViewportBand::Mobile => BandParams {
                width_fraction: 0.86,
                width_cap: 420.0,
                aspect: 1.35,
                gap: 12.0,
                crop_bias_pct: 30.0,
            },
            ViewportBand::Tablet => BandParams {
                width_fraction: 0.62,
                width_cap: 560.0,
                aspect: 1.2,
                gap: 18.0,
                crop_bias_pct: 35.0,
            },
            ViewportBand::Desktop => BandParams {
                width_fraction: 0.36,
                width_cap: 640.0,
                aspect: 0.8,
                gap: 24.0,
                crop_bias_pct: 40.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlatformHints {
    /// Engine renders fixed-size media larger than requested (WebKit on iOS/macOS).
    pub webkit_oversize: bool,
}

impl PlatformHints {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ios = ["iPhone", "iPad", "iPod"]
            .iter()
            .any(|marker| user_agent.contains(marker));
        let desktop_safari = user_agent.contains("Safari")
            && !["Chrome", "Chromium", "CriOS", "Android", "Edg"]
                .iter()
                .any(|marker| user_agent.contains(marker));
        Self {
            webkit_oversize: ios || desktop_safari,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    pub band: ViewportBand,
    pub tile_width: f64,
    pub tile_height: f64,
    pub thumb_width: f64,
    pub thumb_height: f64,
    pub gap: f64,
    pub crop_bias_pct: f64,
}

impl LayoutMetrics {
    pub fn compute(viewport_width: f64, hints: PlatformHints) -> Self {
        let width = sanitize_width(viewport_width);
        let band = ViewportBand::classify(width);
        let params = band.params();
        let mut tile_width = (width * params.width_fraction).min(params.width_cap);
        if hints.webkit_oversize {
            tile_width *= WEBKIT_SHRINK;
        }
        let tile_width = tile_width.round();
        let tile_height = (tile_width * params.aspect).round();
        let (thumb_width, thumb_height) = if band.is_mobile() {
            (84.0, 52.0)
        } else {
            (120.0, 72.0)
        };
        Self {
            band,
            tile_width,
            tile_height,
            thumb_width,
            thumb_height,
            gap: params.gap,
            crop_bias_pct: params.crop_bias_pct,
        }
    }

    /// CSS `object-position` that keeps the upper part of cropped media in frame.
    pub fn object_position(&self) -> String {
        format!("50% {}%", self.crop_bias_pct)
    }
}

/// One percent of the inner viewport height, published as `--vh`.
pub fn viewport_height_unit(inner_height: f64) -> f64 {
    if inner_height.is_finite() && inner_height > 0.0 {
        inner_height * 0.01
    } else {
        0.0
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() {
        width.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const IOS_CHROME_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/120.0 Mobile/15E148 Safari/604.1";

    #[test]
    fn band_boundaries() {
        assert_eq!(ViewportBand::classify(640.0), ViewportBand::Mobile);
        assert_eq!(ViewportBand::classify(641.0), ViewportBand::Tablet);
        assert_eq!(ViewportBand::classify(1024.0), ViewportBand::Tablet);
        assert_eq!(ViewportBand::classify(1025.0), ViewportBand::Desktop);
        assert_eq!(ViewportBand::classify(f64::NAN), ViewportBand::Mobile);
    }

    #[test]
    fn user_agent_detection() {
        assert!(PlatformHints::from_user_agent(SAFARI_UA).webkit_oversize);
        assert!(!PlatformHints::from_user_agent(CHROME_UA).webkit_oversize);
        assert!(PlatformHints::from_user_agent(IOS_CHROME_UA).webkit_oversize);
    }

    #[test]
    fn narrower_bands_are_more_portrait() {
        let hints = PlatformHints::default();
        let mobile = LayoutMetrics::compute(400.0, hints);
        let tablet = LayoutMetrics::compute(800.0, hints);
        let desktop = LayoutMetrics::compute(1600.0, hints);
        let ratio = |m: LayoutMetrics| m.tile_height / m.tile_width;
        assert!(ratio(mobile) > ratio(tablet));
        assert!(ratio(tablet) > ratio(desktop));
        assert!(mobile.crop_bias_pct < 50.0 && desktop.crop_bias_pct < 50.0);
    }

    #[test]
    fn tile_width_is_capped_and_shrunk_on_webkit() {
        let plain = LayoutMetrics::compute(4000.0, PlatformHints::default());
        assert_eq!(plain.tile_width, 640.0);
        let webkit = LayoutMetrics::compute(
            4000.0,
            PlatformHints {
                webkit_oversize: true,
            },
        );
        assert_eq!(webkit.tile_width, (640.0_f64 * 0.92).round());
    }

    #[test]
    fn vh_unit_is_one_percent() {
        assert_eq!(viewport_height_unit(800.0), 8.0);
        assert_eq!(viewport_height_unit(-1.0), 0.0);
    }
}
