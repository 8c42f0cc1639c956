//! Wire-level data types shared by the backend, the feed loader and the UI.
//!
//! Field names follow the REST backend's camelCase JSON. Identifiers are
//! numeric newtypes so a channel id can never be passed where a message id
//! is expected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a channel
    ChannelId
);
id_type!(
    /// Identifier of a message, unique within its channel
    MessageId
);
id_type!(
    /// Identifier of a user
    UserId
);

/// A single reaction left on a message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Reaction {
    pub user: UserId,
    #[serde(rename = "react")]
    pub kind: String,
}

/// A channel message as returned by the listing endpoint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender: UserId,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, rename = "reacts")]
    pub reactions: Vec<Reaction>,
}

/// What a message carries: text, or a reference to an image
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody<'a> {
    Text(&'a str),
    Image(&'a str),
    Empty,
}

impl Message {
    pub fn body(&self) -> MessageBody<'_> {
        match (&self.message, &self.image) {
            (Some(text), _) if !text.is_empty() => MessageBody::Text(text),
            (_, Some(image)) if !image.is_empty() => MessageBody::Image(image),
            _ => MessageBody::Empty,
        }
    }

    /// Count reactions of one kind
    pub fn reaction_count(&self, kind: &str) -> usize {
        self.reactions.iter().filter(|r| r.kind == kind).count()
    }

    pub fn has_reacted(&self, user: UserId, kind: &str) -> bool {
        self.reactions.iter().any(|r| r.user == user && r.kind == kind)
    }
}

/// Response body of `GET message/{channelId}?start=N`
#[derive(Deserialize, Debug)]
pub struct MessagePage {
    pub messages: Vec<Message>,
}

/// Entry of the channel listing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChannelSummary {
    pub id: ChannelId,
    pub name: String,
    pub creator: UserId,
    pub private: bool,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl ChannelSummary {
    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }
}

#[derive(Deserialize, Debug)]
pub struct ChannelList {
    pub channels: Vec<ChannelSummary>,
}

/// Full channel record from `GET channel/{id}` (members only)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDetails {
    pub name: String,
    pub creator: UserId,
    pub private: bool,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub members: Vec<UserId>,
}

/// Profile record from `GET user/{id}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// The part of a user profile the feed needs to label a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderProfile {
    pub name: String,
    pub image_url: Option<String>,
}

impl SenderProfile {
    /// Placeholder shown when a sender could not be resolved
    pub fn unknown(user: UserId) -> Self {
        Self {
            name: format!("Unknown user #{}", user),
            image_url: None,
        }
    }
}

impl From<UserProfile> for SenderProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: profile.name,
            image_url: profile.image.filter(|url| !url.is_empty()),
        }
    }
}

/// Authenticated session returned by login and register
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_deserialize() {
        let json = r#"{
            "id": 7,
            "message": "hello",
            "image": null,
            "sender": 42,
            "sentAt": "2023-10-01T12:00:00.000Z",
            "edited": false,
            "editedAt": null,
            "pinned": true,
            "reacts": [{"user": 1, "react": "thumbs"}, {"user": 2, "react": "thumbs"}]
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, MessageId(7));
        assert_eq!(msg.sender, UserId(42));
        assert_eq!(msg.body(), MessageBody::Text("hello"));
        assert!(msg.pinned);
        assert_eq!(msg.reaction_count("thumbs"), 2);
        assert!(msg.has_reacted(UserId(2), "thumbs"));
        assert!(!msg.has_reacted(UserId(3), "thumbs"));
    }

    #[test]
    fn test_image_body_when_text_missing() {
        let json = r#"{"id": 1, "sender": 1, "image": "data:image/png;base64,AA", "sentAt": "2023-10-01T12:00:00Z"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.body(), MessageBody::Image("data:image/png;base64,AA"));
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn test_sender_profile_from_user() {
        let profile = UserProfile {
            name: "Alice".into(),
            email: None,
            bio: None,
            image: Some(String::new()),
        };
        let sender = SenderProfile::from(profile);
        assert_eq!(sender.name, "Alice");
        assert_eq!(sender.image_url, None);
        assert_eq!(SenderProfile::unknown(UserId(9)).name, "Unknown user #9");
    }

    #[test]
    fn test_session_wire_names() {
        let session: Session = serde_json::from_str(r#"{"token": "abc", "userId": 12}"#).unwrap();
        assert_eq!(session.user_id, UserId(12));
    }
}
