//! Icon and color lookup for form type tags.
//!
//! Both lookups are total: the tag space is open, and tags without an entry
//! get the default glyph/color.

pub const DEFAULT_ICON: &str = "📄";
pub const DEFAULT_COLOR: &str = "#718096";

/// Glyph shown next to forms (and reference options) of a given type.
pub fn icon_for(form_type: &str) -> &'static str {
    match form_type {
        "launched_platform_type" => "🚀",
        "weapon" => "⚔️",
        "weapon_effects" => "💥",
        "sensor" => "📡",
        "antenna_pattern" => "📶",
        "platform_type" => "✈️",
        "route" => "🗺️",
        "platform" => "🎯",
        "radar_signature" => "📊",
        "infrared_signature" => "🔴",
        "optical_signature" => "👁️",
        "processor" => "⚙️",
        _ => DEFAULT_ICON,
    }
}

/// Accent color (hex) for forms of a given type.
pub fn color_for(form_type: &str) -> &'static str {
    match form_type {
        "launched_platform_type" => "#e53e3e",
        "weapon" => "#dd6b20",
        "weapon_effects" => "#d69e2e",
        "sensor" => "#38a169",
        "antenna_pattern" => "#319795",
        "platform_type" => "#3182ce",
        "route" => "#805ad5",
        "platform" => "#d53f8c",
        "radar_signature" => "#2c7a7b",
        "infrared_signature" => "#c53030",
        "optical_signature" => "#2d3748",
        "processor" => DEFAULT_COLOR,
        _ => DEFAULT_COLOR,
    }
}
