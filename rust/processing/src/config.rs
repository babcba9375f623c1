// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion configuration loaded from environment variables.

use crate::error::{Error, Result};
use crate::host::LineStyle;
use cad2d_geometry::{Color, Tolerance};

/// Conversion configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Style applied to every drawn curve.
    pub line_style: LineStyle,
    /// Percent reported when drawing starts.
    pub progress_start: f64,
    /// Percent reported when drawing ends.
    pub progress_end: f64,
    /// Tolerances shared by flattening, merging and hatch loops.
    pub tolerance: Tolerance,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            line_style: LineStyle::default(),
            progress_start: 50.0,
            progress_end: 90.0,
            tolerance: Tolerance::default(),
        }
    }
}

impl ConversionConfig {
    /// Load configuration from `CAD2D_*` environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| var(key).and_then(|v| v.trim().parse::<f64>().ok());

        Self {
            line_style: LineStyle {
                name: var("CAD2D_LINE_STYLE")
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(defaults.line_style.name),
                color: var("CAD2D_LINE_COLOR")
                    .and_then(|s| parse_color(&s))
                    .unwrap_or(defaults.line_style.color),
                weight: var("CAD2D_LINE_WEIGHT")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(defaults.line_style.weight),
            },
            progress_start: parsed("CAD2D_PROGRESS_START").unwrap_or(defaults.progress_start),
            progress_end: parsed("CAD2D_PROGRESS_END").unwrap_or(defaults.progress_end),
            tolerance: Tolerance {
                vertex: parsed("CAD2D_VERTEX_TOLERANCE").unwrap_or(defaults.tolerance.vertex),
                merge_gap: parsed("CAD2D_MERGE_GAP").unwrap_or(defaults.tolerance.merge_gap),
                min_loop_length: parsed("CAD2D_MIN_LOOP_LENGTH")
                    .unwrap_or(defaults.tolerance.min_loop_length),
                deflection: parsed("CAD2D_DEFLECTION").unwrap_or(defaults.tolerance.deflection),
                ..defaults.tolerance
            },
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.line_style.name.trim().is_empty() {
            return Err(Error::config("line style name is empty"));
        }
        if !(1..=16).contains(&self.line_style.weight) {
            return Err(Error::config(format!(
                "line weight {} outside 1-16",
                self.line_style.weight
            )));
        }
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if !(in_range(self.progress_start) && in_range(self.progress_end))
            || self.progress_start > self.progress_end
        {
            return Err(Error::config(format!(
                "progress window {}..{} must lie within 0..100",
                self.progress_start, self.progress_end
            )));
        }

        let tol = &self.tolerance;
        for (name, value) in [
            ("vertex", tol.vertex),
            ("merge_gap", tol.merge_gap),
            ("min_loop_length", tol.min_loop_length),
            ("deflection", tol.deflection),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::config(format!("{} tolerance must be positive, got {}", name, value)));
            }
        }
        if tol.max_segments < 2 {
            return Err(Error::config("max_segments must be at least 2"));
        }
        Ok(())
    }
}

/// Parse `#RRGGBB` or `r,g,b`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::new(channel(0)?, channel(2)?, channel(4)?));
    }

    let mut parts = s.split(',').map(|p| p.trim().parse::<u8>());
    let color = Color::new(parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    if parts.next().is_some() {
        return None;
    }
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConversionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.line_style.name, "CAD_Style");
        assert_eq!(config.progress_start, 50.0);
        assert_eq!(config.progress_end, 90.0);
    }

    #[test]
    fn test_vars_override_defaults() {
        let config = ConversionConfig::from_vars(vars(&[
            ("CAD2D_LINE_STYLE", "Imported"),
            ("CAD2D_LINE_COLOR", "#FF8000"),
            ("CAD2D_LINE_WEIGHT", "3"),
            ("CAD2D_PROGRESS_START", "20"),
            ("CAD2D_MERGE_GAP", "0.01"),
        ]));

        assert_eq!(config.line_style.name, "Imported");
        assert_eq!(config.line_style.color, Color::new(255, 128, 0));
        assert_eq!(config.line_style.weight, 3);
        assert_eq!(config.progress_start, 20.0);
        assert_eq!(config.progress_end, 90.0);
        assert_eq!(config.tolerance.merge_gap, 0.01);
        assert_eq!(config.tolerance.vertex, 0.001);
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = ConversionConfig::from_vars(vars(&[
            ("CAD2D_LINE_COLOR", "red"),
            ("CAD2D_LINE_WEIGHT", "heavy"),
            ("CAD2D_LINE_STYLE", "  "),
        ]));
        assert_eq!(config, ConversionConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ConversionConfig::default();
        config.line_style.weight = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = ConversionConfig::default();
        config.progress_start = 95.0;
        assert!(config.validate().is_err());

        let mut config = ConversionConfig::default();
        config.tolerance.vertex = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_color_formats() {
        assert_eq!(parse_color("0, 128 ,255"), Some(Color::new(0, 128, 255)));
        assert_eq!(parse_color("#00ff7f"), Some(Color::new(0, 255, 127)));
        assert_eq!(parse_color("1,2"), None);
        assert_eq!(parse_color("1,2,3,4"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("256,0,0"), None);
    }
}
