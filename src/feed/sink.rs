//! Collaborator seams of the feed loader: the view it renders into and the
//! place it reports errors to.

use crossbeam_channel::Sender;

use crate::error::{FeedError, RenderPreconditionError};
use crate::model::{Message, MessageId, SenderProfile, UserId};

/// An in-place change to one rendered message
#[derive(Debug, Clone, PartialEq)]
pub enum NodeUpdate {
    /// Replace the text body and mark the message edited. The edit time is
    /// left for the next listing to fill in from the server.
    Edit(String),
    SetPinned(bool),
    AddReaction { user: UserId, kind: String },
    RemoveReaction { user: UserId, kind: String },
}

impl NodeUpdate {
    /// Apply this change to a message record
    pub fn apply(&self, message: &mut Message) {
        match self {
            NodeUpdate::Edit(text) => {
                message.message = Some(text.clone());
                message.edited = true;
                message.edited_at = None;
            }
            NodeUpdate::SetPinned(pinned) => message.pinned = *pinned,
            NodeUpdate::AddReaction { user, kind } => {
                if !message.has_reacted(*user, kind) {
                    message.reactions.push(crate::model::Reaction {
                        user: *user,
                        kind: kind.clone(),
                    });
                }
            }
            NodeUpdate::RemoveReaction { user, kind } => {
                message
                    .reactions
                    .retain(|r| !(r.user == *user && r.kind == *kind));
            }
        }
    }
}

/// The view layer the feed loader renders into.
///
/// Nodes are addressed by message id; the sink owns whatever handle it uses
/// for a rendered row and exposes it only through `update_node`/`remove_node`.
pub trait RenderSink {
    /// Drop every rendered node
    fn clear(&mut self);

    /// Render a node below all existing ones
    fn append_to_bottom(
        &mut self,
        message: &Message,
        sender: &SenderProfile,
    ) -> Result<(), RenderPreconditionError>;

    /// Render a node above all existing ones and return its height in pixels
    fn prepend_to_top(
        &mut self,
        message: &Message,
        sender: &SenderProfile,
    ) -> Result<f32, RenderPreconditionError>;

    fn set_loading_indicator(&mut self, visible: bool);

    fn scroll_offset(&self) -> f32;

    fn set_scroll_offset(&mut self, px: f32);

    fn scroll_to_bottom(&mut self);

    /// Arm or disarm the scrolled-to-top watch
    fn set_top_watch(&mut self, armed: bool);

    /// Mutate the node for `id`; false if no such node is rendered
    fn update_node(&mut self, id: MessageId, update: &NodeUpdate) -> bool;

    /// Remove the node for `id`; false if no such node is rendered
    fn remove_node(&mut self, id: MessageId) -> bool;
}

/// Where the loader sends errors it cannot handle itself
pub trait ErrorReporter {
    fn report(&self, error: FeedError);
}

impl ErrorReporter for Sender<FeedError> {
    fn report(&self, error: FeedError) {
        // Receiver gone means the app is shutting down
        let _ = self.send(error);
    }
}
