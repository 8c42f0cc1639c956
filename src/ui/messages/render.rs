//! Message feed rendering.
//!
//! Every row is drawn into a rect of exactly the height the feed view
//! measured for it, so the content height is the sum of row heights and a
//! scroll offset computed from those heights lands on the same pixel the
//! reader was looking at.

use chrono::Utc;
use eframe::egui::{self, Align, Color32, Layout, RichText, Sense, UiBuilder};

use crate::feed::{FeedRow, FeedView, RowMeasure, ScrollRequest};
use crate::model::{ChannelId, Message, MessageBody, MessageId, SenderProfile, UserId};
use crate::ui::theme::{self, SlackrTheme, MESSAGE_STYLE, META_STYLE, SENDER_STYLE};

use super::format::{format_absolute, format_time_difference, reaction_label, REACTIONS};

const ROW_PADDING_X: f32 = 12.0;
const ROW_PADDING_Y: f32 = 6.0;
const AVATAR_SIZE: f32 = 32.0;
const AVATAR_GAP: f32 = 8.0;
const HEADER_HEIGHT: f32 = 22.0;
const REACTION_ROW_HEIGHT: f32 = 24.0;

/// Something the reader did in the feed that needs the backend
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    /// The top of the feed came into view
    LoadOlder,
    Delete(MessageId),
    SetPinned(MessageId, bool),
    React {
        message: MessageId,
        kind: String,
        add: bool,
    },
    /// Open the editor with the current text
    Edit(MessageId, String),
}

/// Width left for the message body once padding and avatar are taken
fn body_width(row_width: f32) -> f32 {
    (row_width - 2.0 * ROW_PADDING_X - AVATAR_SIZE - AVATAR_GAP).max(40.0)
}

fn body_text(message: &Message) -> String {
    match message.body() {
        MessageBody::Text(text) => text.to_string(),
        MessageBody::Image(_) => "[image]".to_string(),
        MessageBody::Empty => String::new(),
    }
}

/// One reaction button under a message
#[derive(Debug, Clone, PartialEq)]
struct ReactionChip<'a> {
    kind: &'a str,
    label: &'a str,
    count: usize,
    reacted: bool,
}

/// The offered reactions followed by any other kind the server reported,
/// in the order those first appear on the message
fn reaction_chips(message: &Message, me: Option<UserId>) -> Vec<ReactionChip<'_>> {
    let mut kinds: Vec<&str> = REACTIONS.iter().map(|(kind, _)| *kind).collect();
    for reaction in &message.reactions {
        if !kinds.contains(&reaction.kind.as_str()) {
            kinds.push(&reaction.kind);
        }
    }
    kinds
        .into_iter()
        .map(|kind| ReactionChip {
            kind,
            label: reaction_label(kind),
            count: message.reaction_count(kind),
            reacted: me.is_some_and(|user| message.has_reacted(user, kind)),
        })
        .collect()
}

fn total_height(body_height: f32) -> f32 {
    2.0 * ROW_PADDING_Y + HEADER_HEIGHT + body_height + REACTION_ROW_HEIGHT
}

/// Measures rows by laying out the body text with the feed's font
pub struct GalleyMeasure {
    ctx: egui::Context,
}

impl GalleyMeasure {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl RowMeasure for GalleyMeasure {
    fn row_height(&self, message: &Message, _sender: &SenderProfile, wrap_width: f32) -> f32 {
        let font = theme::style_font(&self.ctx.style(), MESSAGE_STYLE);
        let body = self.ctx.fonts(|fonts| {
            fonts
                .layout(body_text(message), font, Color32::PLACEHOLDER, body_width(wrap_width))
                .size()
                .y
        });
        total_height(body)
    }
}

/// Render the feed of the open channel and report what the reader did.
pub fn render_feed(
    ui: &mut egui::Ui,
    view: &mut FeedView,
    channel: ChannelId,
    me: Option<UserId>,
    theme: &SlackrTheme,
) -> Vec<FeedAction> {
    let mut actions = Vec::new();

    if view.is_loading() {
        ui.horizontal(|ui| {
            ui.add_space(ROW_PADDING_X);
            ui.spinner();
            ui.label(RichText::new("Loading older messages…").color(theme.text_muted));
        });
    }

    view.set_wrap_width(ui.available_width());

    let mut area = egui::ScrollArea::vertical()
        .id_salt(("feed", channel.0))
        .auto_shrink([false; 2]);
    match view.take_scroll_request() {
        Some(ScrollRequest::Offset(px)) => area = area.vertical_scroll_offset(px),
        // egui clamps the offset to the content, which lands on the last row
        Some(ScrollRequest::Bottom) => {
            let content: f32 = view.rows().map(|row| row.height).sum();
            area = area.vertical_scroll_offset(content);
        }
        None => {}
    }

    let output = area.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 0.0;
        if view.is_empty() && !view.is_loading() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("No messages yet. Say hello!").color(theme.text_muted));
            });
            return;
        }
        let width = ui.available_width();
        for row in view.rows() {
            render_row(ui, row, width, me, theme, &mut actions);
        }
    });

    if view.observe_scroll(output.state.offset.y) {
        actions.push(FeedAction::LoadOlder);
    }
    actions
}

/// Allocate a band of fixed height and lay out `add_contents` inside it
fn fixed_band<R>(
    ui: &mut egui::Ui,
    height: f32,
    layout: Layout,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::hover());
    let mut band = ui.new_child(UiBuilder::new().max_rect(rect).layout(layout));
    add_contents(&mut band)
}

fn render_row(
    ui: &mut egui::Ui,
    row: &FeedRow,
    width: f32,
    me: Option<UserId>,
    theme: &SlackrTheme,
    actions: &mut Vec<FeedAction>,
) {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, row.height), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }
    let hovered = response.hovered() || ui.rect_contains_pointer(rect);
    if hovered {
        ui.painter().rect_filled(rect, 4.0, theme.surface[3]);
    }

    let inner = rect.shrink2(egui::vec2(ROW_PADDING_X, ROW_PADDING_Y));
    let mut row_ui = ui.new_child(
        UiBuilder::new()
            .max_rect(inner)
            .layout(Layout::left_to_right(Align::Min)),
    );
    row_ui.spacing_mut().item_spacing.x = AVATAR_GAP;
    theme::render_avatar(&mut row_ui, &row.sender.name, AVATAR_SIZE);

    row_ui.vertical(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 0.0);
        let message = &row.message;
        let own = me == Some(message.sender);

        fixed_band(ui, HEADER_HEIGHT, Layout::left_to_right(Align::Center), |ui| {
            render_header(ui, row, own, hovered, theme, actions);
        });

        let font = theme::style_font(ui.style(), MESSAGE_STYLE);
        let wrap = body_width(width);
        let color = match message.body() {
            MessageBody::Text(_) => theme.text_primary,
            _ => theme.text_muted,
        };
        let galley = ui.fonts(|fonts| fonts.layout(body_text(message), font, color, wrap));
        let (body_rect, body_response) =
            ui.allocate_exact_size(egui::vec2(wrap, galley.size().y), Sense::hover());
        ui.painter().galley(body_rect.min, galley, color);
        if let MessageBody::Image(url) = message.body() {
            body_response.on_hover_text(url);
        }

        fixed_band(ui, REACTION_ROW_HEIGHT, Layout::left_to_right(Align::Center), |ui| {
            for chip in reaction_chips(message, me) {
                if chip.count == 0 && !hovered {
                    continue;
                }
                let text = if chip.count > 0 {
                    format!("{} {}", chip.label, chip.count)
                } else {
                    chip.label.to_string()
                };
                let button = egui::Button::new(text).small().selected(chip.reacted);
                if ui.add_enabled(me.is_some(), button).clicked() {
                    actions.push(FeedAction::React {
                        message: message.id,
                        kind: chip.kind.to_string(),
                        add: !chip.reacted,
                    });
                }
            }
        });
    });
}

fn render_header(
    ui: &mut egui::Ui,
    row: &FeedRow,
    own: bool,
    hovered: bool,
    theme: &SlackrTheme,
    actions: &mut Vec<FeedAction>,
) {
    let message = &row.message;
    let sender_font = theme::style_font(ui.style(), SENDER_STYLE);
    let meta_font = theme::style_font(ui.style(), META_STYLE);

    ui.label(
        RichText::new(&row.sender.name)
            .font(sender_font)
            .strong()
            .color(theme::sender_color(&row.sender.name)),
    );
    ui.label(
        RichText::new(format_time_difference(message.sent_at, Utc::now()))
            .font(meta_font.clone())
            .color(theme.text_muted),
    )
    .on_hover_text(format_absolute(message.sent_at));

    if message.edited {
        let label = ui.label(RichText::new("(edited)").font(meta_font.clone()).color(theme.text_muted));
        if let Some(at) = message.edited_at {
            label.on_hover_text(format!("Edited {}", format_absolute(at)));
        }
    }
    if message.pinned {
        ui.label(RichText::new("📌 pinned").font(meta_font).color(theme.warning));
    }

    if !hovered {
        return;
    }
    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
        if own {
            if ui.small_button("🗑").on_hover_text("Delete message").clicked() {
                actions.push(FeedAction::Delete(message.id));
            }
            if let MessageBody::Text(text) = message.body() {
                if ui.small_button("✏").on_hover_text("Edit message").clicked() {
                    actions.push(FeedAction::Edit(message.id, text.to_string()));
                }
            }
        }
        let pin_hint = if message.pinned { "Unpin message" } else { "Pin message" };
        if ui.small_button("📌").on_hover_text(pin_hint).clicked() {
            actions.push(FeedAction::SetPinned(message.id, !message.pinned));
        }
    });
}
