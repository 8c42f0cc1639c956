//! Color themes and styling utilities for the chat client.
//!
//! The palette is a small surface hierarchy (darkest = app background,
//! lightest = dialogs) plus semantic colors. Widgets should pick colors from
//! `SlackrTheme` rather than hard-coding them so the light theme keeps
//! working.

use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle};
use std::collections::BTreeMap;

/// Text style for message bodies in the feed
pub const MESSAGE_STYLE: &str = "message_body";
/// Text style for sender names above a message
pub const SENDER_STYLE: &str = "sender_name";
/// Text style for relative timestamps and edited markers
pub const META_STYLE: &str = "message_meta";
/// Text style for sidebar section headers ("CHANNELS", "BROWSE")
pub const SECTION_STYLE: &str = "section_header";

#[derive(Clone, Debug)]
pub struct SlackrTheme {
    pub name: String,
    /// 0: app background, 1: sidebar, 2: feed, 3: hover, 4: selection, 5: dialogs
    pub surface: [Color32; 6],
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border: Color32,
}

impl SlackrTheme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            surface: [
                Color32::from_rgb(22, 18, 26),
                Color32::from_rgb(38, 27, 42),
                Color32::from_rgb(27, 29, 33),
                Color32::from_rgb(40, 42, 48),
                Color32::from_rgb(18, 100, 163),
                Color32::from_rgb(52, 54, 61),
            ],
            accent: Color32::from_rgb(29, 155, 209),
            success: Color32::from_rgb(46, 182, 125),
            warning: Color32::from_rgb(236, 178, 46),
            error: Color32::from_rgb(224, 30, 90),
            text_primary: Color32::from_rgb(232, 232, 232),
            text_secondary: Color32::from_rgb(209, 210, 211),
            text_muted: Color32::from_rgb(171, 171, 173),
            border: Color32::from_rgb(60, 56, 64),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            surface: [
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(246, 242, 246),
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(248, 248, 248),
                Color32::from_rgb(17, 100, 163),
                Color32::from_rgb(244, 237, 228),
            ],
            accent: Color32::from_rgb(18, 100, 163),
            success: Color32::from_rgb(0, 122, 90),
            warning: Color32::from_rgb(188, 128, 0),
            error: Color32::from_rgb(224, 30, 90),
            text_primary: Color32::from_rgb(29, 28, 29),
            text_secondary: Color32::from_rgb(97, 96, 97),
            text_muted: Color32::from_rgb(134, 134, 134),
            border: Color32::from_rgb(221, 221, 221),
        }
    }

    /// Theme for a persisted setting value; anything but "light" is dark
    pub fn from_setting(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn visuals(&self) -> egui::Visuals {
        if self.name == "Light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        }
    }
}

/// Text hierarchy: 14px body, smaller metadata, named styles for the feed
pub fn configure_text_styles() -> BTreeMap<TextStyle, FontId> {
    use FontFamily::{Monospace, Proportional};

    [
        (TextStyle::Small, FontId::new(10.0, Proportional)),
        (TextStyle::Body, FontId::new(14.0, Proportional)),
        (TextStyle::Button, FontId::new(13.0, Proportional)),
        (TextStyle::Heading, FontId::new(18.0, Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, Monospace)),
        (TextStyle::Name(MESSAGE_STYLE.into()), FontId::new(14.0, Proportional)),
        (TextStyle::Name(SENDER_STYLE.into()), FontId::new(14.0, Proportional)),
        (TextStyle::Name(META_STYLE.into()), FontId::new(11.0, Proportional)),
        (TextStyle::Name(SECTION_STYLE.into()), FontId::new(11.0, Proportional)),
    ]
    .into()
}

/// Font for a named text style, falling back to body text
pub fn style_font(style: &egui::Style, name: &str) -> FontId {
    style
        .text_styles
        .get(&TextStyle::Name(name.into()))
        .cloned()
        .unwrap_or_else(|| FontId::proportional(14.0))
}

/// Apply the app style to the egui context. Call once at startup and again
/// after switching themes.
pub fn apply_app_style(ctx: &egui::Context, theme: &SlackrTheme) {
    ctx.set_visuals(theme.visuals());
    let mut style = (*ctx.style()).clone();

    style.text_styles = configure_text_styles();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);

    for widget in [
        &mut style.visuals.widgets.inactive,
        &mut style.visuals.widgets.hovered,
        &mut style.visuals.widgets.active,
    ] {
        widget.corner_radius = egui::CornerRadius::same(6);
    }
    style.visuals.widgets.inactive.bg_stroke = egui::Stroke::NONE;
    style.visuals.widgets.hovered.bg_stroke = egui::Stroke::NONE;
    style.visuals.widgets.active.bg_fill = theme.accent;
    style.visuals.widgets.active.weak_bg_fill = theme.accent;

    style.visuals.panel_fill = theme.surface[2];
    style.visuals.window_fill = theme.surface[5];
    style.visuals.selection.bg_fill =
        Color32::from_rgba_unmultiplied(theme.accent.r(), theme.accent.g(), theme.accent.b(), 100);

    ctx.set_style(style);
}

const SENDER_COLORS: [Color32; 12] = [
    Color32::from_rgb(231, 76, 60),
    Color32::from_rgb(46, 204, 113),
    Color32::from_rgb(52, 152, 219),
    Color32::from_rgb(155, 89, 182),
    Color32::from_rgb(241, 196, 15),
    Color32::from_rgb(230, 126, 34),
    Color32::from_rgb(26, 188, 156),
    Color32::from_rgb(236, 100, 166),
    Color32::from_rgb(41, 128, 185),
    Color32::from_rgb(39, 174, 96),
    Color32::from_rgb(211, 84, 0),
    Color32::from_rgb(102, 178, 255),
];

/// Stable color for a sender name (FNV-1a over the bytes)
pub fn sender_color(name: &str) -> Color32 {
    let mut hash: u64 = 1469598103934665603u64;
    for b in name.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(1099511628211u64);
    }
    SENDER_COLORS[(hash as usize) % SENDER_COLORS.len()]
}

/// Circular avatar with the sender's initial
pub fn render_avatar(ui: &mut egui::Ui, name: &str, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    let painter = ui.painter();

    painter.circle_filled(rect.center(), size / 2.0, sender_color(name));
    painter.circle_stroke(
        rect.center(),
        size / 2.0,
        egui::Stroke::new(1.5, Color32::from_white_alpha(15)),
    );

    let initial: String = name.chars().next().unwrap_or('?').to_uppercase().collect();
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initial,
        FontId::new(size * 0.45, FontFamily::Proportional),
        Color32::WHITE,
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_color_deterministic() {
        assert_eq!(sender_color("alice"), sender_color("alice"));
        assert_ne!(sender_color("alice"), sender_color("bob"));
    }

    #[test]
    fn test_theme_from_setting() {
        assert_eq!(SlackrTheme::from_setting("light").name, "Light");
        assert_eq!(SlackrTheme::from_setting("dark").name, "Dark");
        assert_eq!(SlackrTheme::from_setting("").name, "Dark");
    }

    #[test]
    fn test_named_styles_registered() {
        let styles = configure_text_styles();
        for name in [MESSAGE_STYLE, SENDER_STYLE, META_STYLE, SECTION_STYLE] {
            assert!(styles.contains_key(&TextStyle::Name(name.into())), "{}", name);
        }
    }
}
