//! Backend event processing: applies a `GuiEvent` to the client state and
//! returns the follow-up requests it implies.

use crate::feed::NodeUpdate;
use crate::protocol::{BackendAction, ErrorContext, GuiEvent};
use crate::state::{ClientState, NOT_MEMBER_ERROR};

/// Process one event from the backend.
pub fn process_single_event(state: &mut ClientState, event: GuiEvent) -> Vec<BackendAction> {
    match event {
        GuiEvent::LoggedIn(session) => {
            tracing::info!(user = %session.user_id, "logged in");
            state.session = Some(session);
            state.push_status("Logged in");
            vec![BackendAction::ListChannels]
        }

        GuiEvent::LoggedOut => {
            state.clear_session();
            state.push_status("Logged out");
            Vec::new()
        }

        GuiEvent::Channels(channels) => {
            state.set_channels(channels);
            Vec::new()
        }

        GuiEvent::ChannelOpened {
            channel,
            details,
            creator_name,
        } => {
            state.set_channel_details(channel, details, creator_name);
            Vec::new()
        }

        GuiEvent::ChannelCreated(channel) => {
            state.push_status("Channel created");
            tracing::info!(%channel, "channel created");
            vec![BackendAction::ListChannels]
        }

        GuiEvent::ChannelUpdated(channel) => {
            state.push_status("Channel updated");
            let mut actions = vec![BackendAction::ListChannels];
            if state.active_channel_id() == Some(channel) {
                actions.push(BackendAction::OpenChannel(channel));
            }
            actions
        }

        GuiEvent::ChannelJoined(channel) => {
            state.mark_joined(channel);
            state.push_status("Joined channel");
            let mut actions = state.select_channel(channel);
            actions.push(BackendAction::ListChannels);
            actions
        }

        GuiEvent::ChannelLeft(channel) => {
            state.mark_left(channel);
            state.push_status("Left channel");
            vec![BackendAction::ListChannels]
        }

        GuiEvent::FeedBatch { ticket, result } => {
            state.apply_feed_batch(&ticket, result);
            Vec::new()
        }

        // The new message is the newest of the channel, so render from the bottom again
        GuiEvent::MessageSent(channel) => {
            if state.active_channel_id() == Some(channel) {
                state.reload_feed().into_iter().collect()
            } else {
                Vec::new()
            }
        }

        GuiEvent::MessageEdited {
            channel,
            message,
            text,
        } => {
            state.apply_message_update(channel, message, &NodeUpdate::Edit(text));
            Vec::new()
        }

        GuiEvent::MessageDeleted { channel, message } => {
            state.remove_message(channel, message);
            Vec::new()
        }

        GuiEvent::PinChanged {
            channel,
            message,
            pinned,
        } => {
            state.apply_message_update(channel, message, &NodeUpdate::SetPinned(pinned));
            Vec::new()
        }

        GuiEvent::ReactionChanged {
            channel,
            message,
            user,
            kind,
            add,
        } => {
            let update = if add {
                NodeUpdate::AddReaction { user, kind }
            } else {
                NodeUpdate::RemoveReaction { user, kind }
            };
            state.apply_message_update(channel, message, &update);
            Vec::new()
        }

        GuiEvent::Error { context, message } => {
            tracing::warn!(?context, "backend error: {}", message);
            // Opening a channel we are not in turns into the join prompt
            if context == ErrorContext::Channel && message == NOT_MEMBER_ERROR {
                if let Some(channel) = state.active_channel_id() {
                    state.close_channel();
                    state.pending_join = Some(channel);
                    return Vec::new();
                }
            }
            state.push_error(message);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Batch, FeedEntry};
    use crate::model::{ChannelId, ChannelSummary, MessageId, SenderProfile, Session, UserId};

    fn summary(id: u64, members: &[u64]) -> ChannelSummary {
        ChannelSummary {
            id: ChannelId(id),
            name: format!("c{}", id),
            creator: UserId(1),
            private: false,
            members: members.iter().copied().map(UserId).collect(),
        }
    }

    fn logged_in() -> ClientState {
        let mut state = ClientState::new();
        let actions = process_single_event(
            &mut state,
            GuiEvent::LoggedIn(Session {
                token: "t".into(),
                user_id: UserId(3),
            }),
        );
        assert!(matches!(actions.as_slice(), [BackendAction::ListChannels]));
        process_single_event(
            &mut state,
            GuiEvent::Channels(vec![summary(1, &[3]), summary(2, &[1])]),
        );
        state
    }

    fn open(state: &mut ClientState, channel: u64) -> crate::feed::FetchTicket {
        match state.select_channel(ChannelId(channel)).pop() {
            Some(BackendAction::FetchFeed(ticket)) => ticket,
            other => panic!("unexpected action {:?}", other),
        }
    }

    fn entries(ids: &[u64]) -> Batch {
        Batch {
            entries: ids
                .iter()
                .map(|&id| FeedEntry {
                    message: crate::feed::testing::message(id, 3),
                    sender: SenderProfile::unknown(UserId(3)),
                })
                .collect(),
            lookup_failures: Vec::new(),
        }
    }

    #[test]
    fn test_join_opens_channel_and_refreshes_list() {
        let mut state = logged_in();
        state.select_channel(ChannelId(2));
        assert_eq!(state.pending_join, Some(ChannelId(2)));

        let actions = process_single_event(&mut state, GuiEvent::ChannelJoined(ChannelId(2)));
        assert!(matches!(actions[0], BackendAction::OpenChannel(ChannelId(2))));
        assert!(matches!(actions[1], BackendAction::FetchFeed(_)));
        assert!(matches!(actions[2], BackendAction::ListChannels));
        assert_eq!(state.active_channel_id(), Some(ChannelId(2)));
        assert_eq!(state.pending_join, None);
    }

    #[test]
    fn test_leave_returns_to_welcome() {
        let mut state = logged_in();
        open(&mut state, 1);
        let actions = process_single_event(&mut state, GuiEvent::ChannelLeft(ChannelId(1)));
        assert!(matches!(actions.as_slice(), [BackendAction::ListChannels]));
        assert_eq!(state.active_channel_id(), None);
        assert!(!state.feed.sink().is_attached());
    }

    #[test]
    fn test_sent_message_reloads_feed() {
        let mut state = logged_in();
        let ticket = open(&mut state, 1);
        process_single_event(
            &mut state,
            GuiEvent::FeedBatch {
                ticket: ticket.clone(),
                result: Ok(entries(&[2, 1])),
            },
        );
        assert_eq!(state.feed.sink().len(), 2);

        let actions = process_single_event(&mut state, GuiEvent::MessageSent(ChannelId(1)));
        match actions.as_slice() {
            [BackendAction::FetchFeed(reload)] => {
                assert_eq!(reload.start, 0);
                assert!(reload.generation > ticket.generation);
            }
            other => panic!("unexpected actions {:?}", other),
        }
        assert!(state.feed.sink().is_empty());

        // a message sent in another channel leaves this feed alone
        assert!(process_single_event(&mut state, GuiEvent::MessageSent(ChannelId(9))).is_empty());
    }

    #[test]
    fn test_message_events_update_rows() {
        let mut state = logged_in();
        let ticket = open(&mut state, 1);
        process_single_event(
            &mut state,
            GuiEvent::FeedBatch {
                ticket,
                result: Ok(entries(&[3, 2, 1])),
            },
        );
        let (channel, message) = (ChannelId(1), MessageId(2));

        process_single_event(
            &mut state,
            GuiEvent::MessageEdited {
                channel,
                message,
                text: "edited".into(),
            },
        );
        process_single_event(
            &mut state,
            GuiEvent::PinChanged {
                channel,
                message,
                pinned: true,
            },
        );
        process_single_event(
            &mut state,
            GuiEvent::ReactionChanged {
                channel,
                message,
                user: UserId(3),
                kind: "like".into(),
                add: true,
            },
        );
        let row = state.feed.sink().row(message).unwrap();
        assert_eq!(row.message.message.as_deref(), Some("edited"));
        assert!(row.message.edited);
        assert!(row.message.pinned);
        assert!(row.message.has_reacted(UserId(3), "like"));

        let start = state.feed.start();
        process_single_event(&mut state, GuiEvent::MessageDeleted { channel, message });
        assert!(state.feed.sink().row(message).is_none());
        assert_eq!(state.feed.start(), start - 1);
    }

    #[test]
    fn test_not_member_error_prompts_join() {
        let mut state = logged_in();
        open(&mut state, 1);
        process_single_event(
            &mut state,
            GuiEvent::error(ErrorContext::Channel, NOT_MEMBER_ERROR),
        );
        assert_eq!(state.pending_join, Some(ChannelId(1)));
        assert_eq!(state.active_channel_id(), None);
        assert!(state.errors.is_empty());

        process_single_event(&mut state, GuiEvent::error(ErrorContext::Message, "boom"));
        assert_eq!(state.errors, vec!["boom".to_string()]);
    }

    #[test]
    fn test_logout_clears_state() {
        let mut state = logged_in();
        open(&mut state, 1);
        process_single_event(&mut state, GuiEvent::LoggedOut);
        assert!(!state.is_logged_in());
        assert!(state.joined_channels.is_empty());
        assert_eq!(state.active_channel_id(), None);
    }
}
