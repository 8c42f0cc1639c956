//! Backend action handlers: one REST round trip per action, answered with
//! GUI events.

use crossbeam_channel::Sender;

use super::client::RestClient;
use crate::feed::{fetch_batch, SenderDirectory};
use crate::protocol::{BackendAction, ErrorContext, GuiEvent};

/// Handle a backend action from the GUI
pub async fn handle_backend_action(
    action: BackendAction,
    client: &RestClient,
    directory: &SenderDirectory,
    event_tx: &Sender<GuiEvent>,
) {
    match action {
        BackendAction::Login { email, password } => {
            tracing::info!(%email, "backend: login");
            match client.login(&email, &password).await {
                Ok(session) => {
                    let _ = event_tx.send(GuiEvent::LoggedIn(session));
                }
                Err(e) => {
                    tracing::error!("backend: login failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Login, e));
                }
            }
        }

        BackendAction::Register {
            email,
            name,
            password,
        } => {
            tracing::info!(%email, "backend: register");
            match client.register(&email, &name, &password).await {
                Ok(session) => {
                    let _ = event_tx.send(GuiEvent::LoggedIn(session));
                }
                Err(e) => {
                    tracing::error!("backend: register failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Register, e));
                }
            }
        }

        BackendAction::RestoreSession(session) => {
            tracing::info!(user = %session.user_id, "backend: restore session");
            client.set_session(Some(session.clone())).await;
            // Validate the stored token before declaring the session usable
            match client.list_channels().await {
                Ok(channels) => {
                    let _ = event_tx.send(GuiEvent::LoggedIn(session));
                    let _ = event_tx.send(GuiEvent::Channels(channels));
                }
                Err(e) => {
                    tracing::warn!("backend: stored session rejected: {}", e);
                    client.set_session(None).await;
                    let _ = event_tx.send(GuiEvent::LoggedOut);
                }
            }
        }

        BackendAction::Logout => {
            tracing::info!("backend: logout");
            if let Err(e) = client.logout().await {
                // The local session is gone either way
                tracing::warn!("backend: logout failed: {}", e);
                let _ = event_tx.send(GuiEvent::error(ErrorContext::Logout, e));
            }
            let _ = event_tx.send(GuiEvent::LoggedOut);
        }

        BackendAction::ListChannels => match client.list_channels().await {
            Ok(channels) => {
                tracing::debug!(count = channels.len(), "backend: channels listed");
                let _ = event_tx.send(GuiEvent::Channels(channels));
            }
            Err(e) => {
                tracing::error!("backend: list_channels failed: {}", e);
                let _ = event_tx.send(GuiEvent::error(ErrorContext::Channels, e));
            }
        },

        BackendAction::OpenChannel(channel) => {
            tracing::info!(%channel, "backend: open_channel");
            let details = match client.channel_details(channel).await {
                Ok(details) => details,
                Err(e) => {
                    tracing::error!(%channel, "backend: channel_details failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Channel, e));
                    return;
                }
            };
            let creator_name = match client.user(details.creator).await {
                Ok(profile) => profile.name,
                Err(e) => {
                    tracing::warn!(user = %details.creator, "backend: creator lookup failed: {}", e);
                    format!("user #{}", details.creator)
                }
            };
            let _ = event_tx.send(GuiEvent::ChannelOpened {
                channel,
                details,
                creator_name,
            });
        }

        BackendAction::CreateChannel {
            name,
            description,
            private,
        } => {
            tracing::info!(%name, private, "backend: create_channel");
            match client.create_channel(&name, &description, private).await {
                Ok(channel) => {
                    let _ = event_tx.send(GuiEvent::ChannelCreated(channel));
                }
                Err(e) => {
                    tracing::error!("backend: create_channel failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Channels, e));
                }
            }
        }

        BackendAction::UpdateChannel {
            channel,
            name,
            description,
        } => {
            tracing::info!(%channel, "backend: update_channel");
            match client.update_channel(channel, &name, &description).await {
                Ok(()) => {
                    let _ = event_tx.send(GuiEvent::ChannelUpdated(channel));
                }
                Err(e) => {
                    tracing::error!(%channel, "backend: update_channel failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Channel, e));
                }
            }
        }

        BackendAction::JoinChannel(channel) => {
            tracing::info!(%channel, "backend: join_channel");
            match client.join_channel(channel).await {
                Ok(()) => {
                    let _ = event_tx.send(GuiEvent::ChannelJoined(channel));
                }
                Err(e) => {
                    tracing::error!(%channel, "backend: join_channel failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Channel, e));
                }
            }
        }

        BackendAction::LeaveChannel(channel) => {
            tracing::info!(%channel, "backend: leave_channel");
            match client.leave_channel(channel).await {
                Ok(()) => {
                    let _ = event_tx.send(GuiEvent::ChannelLeft(channel));
                }
                Err(e) => {
                    tracing::error!(%channel, "backend: leave_channel failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Channel, e));
                }
            }
        }

        BackendAction::FetchFeed(ticket) => {
            let result = fetch_batch(client, directory, &ticket).await;
            if let Err(e) = &result {
                tracing::error!(
                    channel = %ticket.channel_id,
                    start = ticket.start,
                    "backend: list_messages failed: {}",
                    e
                );
            }
            let _ = event_tx.send(GuiEvent::FeedBatch { ticket, result });
        }

        BackendAction::SendMessage { channel, text } => {
            tracing::info!(%channel, "backend: send_message");
            match client.send_message(channel, &text).await {
                Ok(()) => {
                    let _ = event_tx.send(GuiEvent::MessageSent(channel));
                }
                Err(e) => {
                    tracing::error!(%channel, "backend: send_message failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Message, e));
                }
            }
        }

        BackendAction::EditMessage {
            channel,
            message,
            text,
        } => match client.edit_message(channel, message, &text).await {
            Ok(()) => {
                let _ = event_tx.send(GuiEvent::MessageEdited {
                    channel,
                    message,
                    text,
                });
            }
            Err(e) => {
                tracing::error!(%channel, %message, "backend: edit_message failed: {}", e);
                let _ = event_tx.send(GuiEvent::error(ErrorContext::Message, e));
            }
        },

        BackendAction::DeleteMessage { channel, message } => {
            match client.delete_message(channel, message).await {
                Ok(()) => {
                    let _ = event_tx.send(GuiEvent::MessageDeleted { channel, message });
                }
                Err(e) => {
                    tracing::error!(%channel, %message, "backend: delete_message failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Message, e));
                }
            }
        }

        BackendAction::SetPinned {
            channel,
            message,
            pinned,
        } => match client.set_pinned(channel, message, pinned).await {
            Ok(()) => {
                let _ = event_tx.send(GuiEvent::PinChanged {
                    channel,
                    message,
                    pinned,
                });
            }
            Err(e) => {
                tracing::error!(%channel, %message, "backend: set_pinned failed: {}", e);
                let _ = event_tx.send(GuiEvent::error(ErrorContext::Message, e));
            }
        },

        BackendAction::React {
            channel,
            message,
            kind,
            add,
        } => {
            let Some(session) = client.session().await else {
                let _ = event_tx.send(GuiEvent::error(
                    ErrorContext::Message,
                    crate::error::FetchError::Unauthenticated,
                ));
                return;
            };
            match client.react(channel, message, &kind, add).await {
                Ok(()) => {
                    let _ = event_tx.send(GuiEvent::ReactionChanged {
                        channel,
                        message,
                        user: session.user_id,
                        kind,
                        add,
                    });
                }
                Err(e) => {
                    tracing::error!(%channel, %message, "backend: react failed: {}", e);
                    let _ = event_tx.send(GuiEvent::error(ErrorContext::Message, e));
                }
            }
        }

        // Handled by the main loop
        BackendAction::Shutdown => {}
    }
}
