//! The render sink behind the message panel.
//!
//! `FeedView` keeps the rendered rows in display order (oldest first) and a
//! registry from message id to row, so edits, pins, reactions and deletions
//! reach the exact row without refetching. The egui message panel reads the
//! rows every frame, applies pending scroll requests to its `ScrollArea`
//! and reports the resulting offset back through [`FeedView::observe_scroll`].

use std::collections::{HashMap, VecDeque};

use super::sink::{NodeUpdate, RenderSink};
use crate::error::RenderPreconditionError;
use crate::model::{Message, MessageId, SenderProfile};

/// Computes how tall a row will be once laid out at a given width
pub trait RowMeasure {
    fn row_height(&self, message: &Message, sender: &SenderProfile, wrap_width: f32) -> f32;
}

/// Every row has the same height; used before the first frame and in tests
pub struct FixedRowHeight(pub f32);

impl RowMeasure for FixedRowHeight {
    fn row_height(&self, _message: &Message, _sender: &SenderProfile, _wrap_width: f32) -> f32 {
        self.0
    }
}

/// One rendered message
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub message: Message,
    pub sender: SenderProfile,
    pub height: f32,
}

/// A scroll change the message panel must apply on its next frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    Offset(f32),
    Bottom,
}

pub struct FeedView {
    registry: HashMap<MessageId, FeedRow>,
    order: VecDeque<MessageId>,
    measure: Box<dyn RowMeasure>,
    wrap_width: f32,
    attached: bool,
    scroll_offset: f32,
    pending_scroll: Option<ScrollRequest>,
    /// A scroll request was just applied; the next observed offset is not user driven
    settling: bool,
    loading: bool,
    top_watch: bool,
}

impl FeedView {
    pub fn new(measure: Box<dyn RowMeasure>) -> Self {
        Self {
            registry: HashMap::new(),
            order: VecDeque::new(),
            measure,
            wrap_width: 600.0,
            attached: false,
            scroll_offset: 0.0,
            pending_scroll: None,
            settling: false,
            loading: false,
            top_watch: false,
        }
    }

    pub fn set_measure(&mut self, measure: Box<dyn RowMeasure>) {
        self.measure = measure;
        self.remeasure();
    }

    /// Width available to rows; updated by the panel every frame.
    /// Rows are measured again when the width actually changes.
    pub fn set_wrap_width(&mut self, width: f32) {
        if width <= 0.0 || (width - self.wrap_width).abs() < 0.5 {
            return;
        }
        self.wrap_width = width;
        self.remeasure();
    }

    fn remeasure(&mut self) {
        let (measure, width) = (&self.measure, self.wrap_width);
        for row in self.registry.values_mut() {
            row.height = measure.row_height(&row.message, &row.sender, width);
        }
    }

    /// A channel view is on screen and rows may be rendered
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rows in display order, oldest first
    pub fn rows(&self) -> impl Iterator<Item = &FeedRow> + '_ {
        self.order.iter().filter_map(|id| self.registry.get(id))
    }

    pub fn row(&self, id: MessageId) -> Option<&FeedRow> {
        self.registry.get(&id)
    }

    pub fn pinned(&self) -> impl Iterator<Item = &FeedRow> + '_ {
        self.rows().filter(|row| row.message.pinned)
    }

    /// Hand the pending scroll change to the panel
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        let request = self.pending_scroll.take();
        if request.is_some() {
            self.settling = true;
        }
        request
    }

    /// Record the offset the panel ended up at. Returns true when the
    /// scrolled-to-top watch is armed and the reader reached the top.
    pub fn observe_scroll(&mut self, offset: f32) -> bool {
        self.scroll_offset = offset;
        if self.settling {
            self.settling = false;
            return false;
        }
        self.top_watch && offset <= 0.0
    }

    fn check_attached(&self) -> Result<(), RenderPreconditionError> {
        if self.attached {
            Ok(())
        } else {
            Err(RenderPreconditionError(
                "message list is not attached to a channel view".into(),
            ))
        }
    }

    fn make_row(&self, message: &Message, sender: &SenderProfile) -> FeedRow {
        FeedRow {
            message: message.clone(),
            sender: sender.clone(),
            height: self.measure.row_height(message, sender, self.wrap_width),
        }
    }
}

impl RenderSink for FeedView {
    fn clear(&mut self) {
        self.registry.clear();
        self.order.clear();
        self.scroll_offset = 0.0;
        self.pending_scroll = None;
        self.settling = false;
    }

    fn append_to_bottom(
        &mut self,
        message: &Message,
        sender: &SenderProfile,
    ) -> Result<(), RenderPreconditionError> {
        self.check_attached()?;
        let row = self.make_row(message, sender);
        if self.registry.insert(message.id, row).is_none() {
            self.order.push_back(message.id);
        }
        Ok(())
    }

    fn prepend_to_top(
        &mut self,
        message: &Message,
        sender: &SenderProfile,
    ) -> Result<f32, RenderPreconditionError> {
        self.check_attached()?;
        let row = self.make_row(message, sender);
        let height = row.height;
        if self.registry.insert(message.id, row).is_none() {
            self.order.push_front(message.id);
        }
        Ok(height)
    }

    fn set_loading_indicator(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, px: f32) {
        self.scroll_offset = px;
        self.pending_scroll = Some(ScrollRequest::Offset(px));
    }

    fn scroll_to_bottom(&mut self) {
        self.pending_scroll = Some(ScrollRequest::Bottom);
    }

    fn set_top_watch(&mut self, armed: bool) {
        self.top_watch = armed;
    }

    fn update_node(&mut self, id: MessageId, update: &NodeUpdate) -> bool {
        let Some(row) = self.registry.get_mut(&id) else {
            return false;
        };
        update.apply(&mut row.message);
        row.height = self.measure.row_height(&row.message, &row.sender, self.wrap_width);
        true
    }

    fn remove_node(&mut self, id: MessageId) -> bool {
        if self.registry.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|row_id| *row_id != id);
        true
    }
}
