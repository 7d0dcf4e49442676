//! Runtime configuration for a graphics context.

use serde::Deserialize;

use crate::basics::FillRule;
use crate::color::RgbLayout;
use crate::error::{GrafError, Result};

/// Tunables that shape how the core allocates and reports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrafixConfig {
    /// Packed layout for direct-colour bitmaps created by the context.
    pub rgb_layout: RgbLayout,
    /// Include source locations when logging posted errors.
    pub verbose_errors: bool,
    /// Rectangles collected per scanline burst before calling `fill`.
    pub fill_burst_rects: usize,
    /// Upper bound on points produced by one bezier flattening.
    pub max_bezier_points: usize,
    /// Upper bound on pixels in a zoom-blit offscreen bitmap.
    pub max_offscreen_pixels: usize,
    /// Fill rule given to newly created ports.
    pub fill_rule: FillRule,
}

impl Default for GrafixConfig {
    fn default() -> Self {
        Self {
            rgb_layout: RgbLayout::Rgb565,
            verbose_errors: false,
            fill_burst_rects: 64,
            max_bezier_points: 4096,
            max_offscreen_pixels: 4 * 1024 * 1024,
            fill_rule: FillRule::OddEven,
        }
    }
}

impl GrafixConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: GrafixConfig =
            toml::from_str(src).map_err(|e| GrafError::Config(format!("grafix.toml: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fill_burst_rects == 0 {
            return Err(GrafError::ScanBufferTooSmall);
        }
        if self.max_bezier_points < 2 {
            return Err(GrafError::Config(
                "max_bezier_points must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = GrafixConfig::default();
        assert_eq!(cfg.rgb_layout, RgbLayout::Rgb565);
        assert_eq!(cfg.fill_burst_rects, 64);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg = GrafixConfig::from_toml_str(
            r#"
            rgb_layout = "rgb555"
            verbose_errors = true
            fill_rule = "winding"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.rgb_layout, RgbLayout::Rgb555);
        assert!(cfg.verbose_errors);
        assert_eq!(cfg.fill_rule, FillRule::Winding);
        assert_eq!(cfg.max_bezier_points, 4096);
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(
            GrafixConfig::from_toml_str("").unwrap(),
            GrafixConfig::default()
        );
    }

    #[test]
    fn test_reject_zero_burst() {
        let err = GrafixConfig::from_toml_str("fill_burst_rects = 0").unwrap_err();
        assert_eq!(err, GrafError::ScanBufferTooSmall);
    }

    #[test]
    fn test_reject_bad_layout() {
        let err = GrafixConfig::from_toml_str(r#"rgb_layout = "rgb888""#).unwrap_err();
        assert!(matches!(err, GrafError::Config(msg) if msg.starts_with("grafix.toml")));
    }
}
