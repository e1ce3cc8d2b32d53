//! Theme colours (RGBA, 0-1)

use crate::settings::Theme;

const fn hex(rgb: u32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Colours for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub asteroid: [f32; 4],
    pub asteroid_hover: [f32; 4],
    pub explosion: [f32; 4],
    pub flash: [f32; 4],
    pub star: [f32; 4],
    pub comet_head: [f32; 4],
    pub comet_tail: [f32; 4],
    pub shooting_star: [f32; 4],
    /// Background glow patches (nebula in the dark, sun in the light)
    pub glow: [[f32; 4]; 3],
}

pub const DARK: Palette = Palette {
    asteroid: hex(0x00f3ff),
    asteroid_hover: hex(0xff00ff),
    explosion: hex(0xff00ff),
    flash: hex(0xffffff),
    star: hex(0xffffff),
    comet_head: hex(0x00f3ff),
    comet_tail: hex(0xbc13fe),
    shooting_star: hex(0xffffff),
    glow: [hex(0x1e1b4b), hex(0x312e81), hex(0x4c1d95)],
};

pub const LIGHT: Palette = Palette {
    asteroid: hex(0x1f2937),
    asteroid_hover: hex(0x000000),
    explosion: hex(0x374151),
    flash: hex(0xffffff),
    star: hex(0x6b7280),
    comet_head: hex(0x1f2937),
    comet_tail: hex(0x6b7280),
    shooting_star: hex(0x1a1a1a),
    glow: [hex(0xfef3c7), hex(0xfef9c3), hex(0xfcd34d)],
};

impl Palette {
    pub fn for_theme(theme: Theme) -> &'static Palette {
        match theme {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }
}

/// Same colour with alpha multiplied by `alpha`
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string
pub fn to_css(color: [f32; 4]) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(to_css(DARK.asteroid), "rgba(0, 243, 255, 1.000)");
        assert_eq!(to_css(with_alpha(LIGHT.asteroid_hover, 0.5)), "rgba(0, 0, 0, 0.500)");
    }

    #[test]
    fn test_theme_lookup() {
        assert_eq!(Palette::for_theme(Theme::Light).star, hex(0x6b7280));
        assert_eq!(Palette::for_theme(Theme::Dark).comet_tail, hex(0xbc13fe));
    }
}
