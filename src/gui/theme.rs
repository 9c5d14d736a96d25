//! Theme presets
//!
//! Maps the application's color presets onto egui visuals.

use egui::{Color32, Stroke, Visuals};

/// Color palette backing a theme preset
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub subtext: Color32,
    pub accent: Color32,
    pub success: Color32,
    pub field_bg: Color32,
}

/// Selectable theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreset {
    Dark,
    Light,
    ForestGreen,
    Mocha,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 4] = [
        ThemePreset::Dark,
        ThemePreset::Light,
        ThemePreset::ForestGreen,
        ThemePreset::Mocha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "dark",
            ThemePreset::Light => "light",
            ThemePreset::ForestGreen => "forest_green",
            ThemePreset::Mocha => "mocha",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dark" => ThemePreset::Dark,
            "forest_green" | "forest" => ThemePreset::ForestGreen,
            "mocha" => ThemePreset::Mocha,
            _ => ThemePreset::Light, // default
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "Dark",
            ThemePreset::Light => "Light",
            ThemePreset::ForestGreen => "Forest Green",
            ThemePreset::Mocha => "Mocha",
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, ThemePreset::Light)
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemePreset::Dark => Palette {
                bg: Color32::from_rgb(0x1e, 0x1e, 0x2f),
                panel: Color32::from_rgb(0x23, 0x23, 0x3a),
                text: Color32::from_rgb(0xe5, 0xe9, 0xf0),
                subtext: Color32::from_rgb(0xa6, 0xac, 0xcd),
                accent: Color32::from_rgb(0x7a, 0xa2, 0xf7),
                success: Color32::from_rgb(0x9e, 0xce, 0x6a),
                field_bg: Color32::from_rgb(0x2b, 0x2b, 0x40),
            },
            ThemePreset::Light => Palette {
                bg: Color32::from_rgb(0xf7, 0xf7, 0xfb),
                panel: Color32::from_rgb(0xff, 0xff, 0xff),
                text: Color32::from_rgb(0x1f, 0x23, 0x35),
                subtext: Color32::from_rgb(0x6b, 0x72, 0x80),
                accent: Color32::from_rgb(0x25, 0x63, 0xeb),
                success: Color32::from_rgb(0x16, 0xa3, 0x4a),
                field_bg: Color32::from_rgb(0xf3, 0xf4, 0xf6),
            },
            ThemePreset::ForestGreen => Palette {
                bg: Color32::from_rgb(0x0f, 0x1a, 0x14),
                panel: Color32::from_rgb(0x13, 0x20, 0x18),
                text: Color32::from_rgb(0xd9, 0xf5, 0xe6),
                subtext: Color32::from_rgb(0x8e, 0xbf, 0xa6),
                accent: Color32::from_rgb(0x34, 0xd3, 0x99),
                success: Color32::from_rgb(0x86, 0xef, 0xac),
                field_bg: Color32::from_rgb(0x12, 0x26, 0x1b),
            },
            ThemePreset::Mocha => Palette {
                bg: Color32::from_rgb(0x2b, 0x2a, 0x33),
                panel: Color32::from_rgb(0x35, 0x34, 0x3d),
                text: Color32::from_rgb(0xf2, 0xe9, 0xde),
                subtext: Color32::from_rgb(0xc8, 0xb8, 0xa9),
                accent: Color32::from_rgb(0xd6, 0x6f, 0x4f),
                success: Color32::from_rgb(0xa3, 0xd9, 0xa5),
                field_bg: Color32::from_rgb(0x3c, 0x3a, 0x45),
            },
        }
    }

    /// Build egui visuals for this preset
    pub fn visuals(&self) -> Visuals {
        let p = self.palette();
        let mut visuals = if self.is_light() {
            Visuals::light()
        } else {
            Visuals::dark()
        };

        visuals.override_text_color = Some(p.text);
        visuals.panel_fill = p.bg;
        visuals.window_fill = p.panel;
        visuals.extreme_bg_color = p.field_bg;
        visuals.faint_bg_color = p.panel;
        visuals.hyperlink_color = p.accent;
        visuals.selection.bg_fill = blend(p.panel, p.accent, 0.45);

        // Soft button palette blended from panel toward accent
        visuals.widgets.noninteractive.bg_fill = p.panel;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, blend(p.panel, p.text, 0.08));
        visuals.widgets.inactive.bg_fill = blend(p.panel, p.accent, 0.28);
        visuals.widgets.inactive.weak_bg_fill = blend(p.panel, p.accent, 0.16);
        visuals.widgets.hovered.bg_fill = blend(p.panel, p.accent, 0.38);
        visuals.widgets.hovered.weak_bg_fill = blend(p.panel, p.accent, 0.22);
        visuals.widgets.active.bg_fill = blend(p.panel, p.accent, 0.45);
        visuals.widgets.active.weak_bg_fill = blend(p.panel, p.accent, 0.28);

        visuals
    }
}

/// Linear blend between two colors, ignoring alpha
fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(
        lerp(a.r(), b.r()),
        lerp(a.g(), b.g()),
        lerp(a.b(), b.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_conversions() {
        for preset in ThemePreset::ALL {
            assert_eq!(ThemePreset::from_str(preset.as_str()), preset);
        }

        assert_eq!(ThemePreset::from_str("DARK"), ThemePreset::Dark);
        assert_eq!(ThemePreset::from_str("forest"), ThemePreset::ForestGreen);
        assert_eq!(ThemePreset::from_str("unknown"), ThemePreset::Light); // default
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ThemePreset::Dark.display_name(), "Dark");
        assert_eq!(ThemePreset::ForestGreen.display_name(), "Forest Green");
    }

    #[test]
    fn test_blend_endpoints() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color32::from_rgb(100, 50, 25));
    }

    #[test]
    fn test_only_light_preset_is_light() {
        assert!(ThemePreset::Light.is_light());
        assert!(!ThemePreset::Dark.is_light());
        assert!(!ThemePreset::ForestGreen.is_light());
        assert!(!ThemePreset::Mocha.is_light());
    }
}
