//! HTTP client for the chat REST backend.
//!
//! Wraps a `reqwest::Client` with the backend base URL and the current
//! session. Cloning is cheap; every clone shares the same session slot, so a
//! login on one task is seen by requests on all others.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::FetchError;
use crate::feed::MessageSource;
use crate::model::{
    ChannelDetails, ChannelId, ChannelList, ChannelSummary, Message, MessageId, MessagePage,
    Session, UserId, UserProfile,
};

/// Request paths relative to the backend base URL
pub(crate) mod paths {
    use crate::model::{ChannelId, MessageId, UserId};

    pub const LOGIN: &str = "auth/login";
    pub const REGISTER: &str = "auth/register";
    pub const LOGOUT: &str = "auth/logout";
    pub const CHANNELS: &str = "channel";

    pub fn channel(id: ChannelId) -> String {
        format!("channel/{}", id)
    }

    pub fn join(id: ChannelId) -> String {
        format!("channel/{}/join", id)
    }

    pub fn leave(id: ChannelId) -> String {
        format!("channel/{}/leave", id)
    }

    pub fn messages(channel: ChannelId, start: usize) -> String {
        format!("message/{}?start={}", channel, start)
    }

    pub fn post_message(channel: ChannelId) -> String {
        format!("message/{}", channel)
    }

    pub fn message(channel: ChannelId, message: MessageId) -> String {
        format!("message/{}/{}", channel, message)
    }

    pub fn pin(channel: ChannelId, message: MessageId, pinned: bool) -> String {
        let verb = if pinned { "pin" } else { "unpin" };
        format!("message/{}/{}/{}", verb, channel, message)
    }

    pub fn react(channel: ChannelId, message: MessageId, add: bool) -> String {
        let verb = if add { "react" } else { "unreact" };
        format!("message/{}/{}/{}", verb, channel, message)
    }

    pub fn user(id: UserId) -> String {
        format!("user/{}", id)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Bodies with no fields we care about
#[derive(Deserialize)]
struct Empty {}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct NewChannel<'a> {
    name: &'a str,
    private: bool,
    description: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedChannel {
    channel_id: ChannelId,
}

#[derive(Serialize)]
struct ChannelEdit<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct MessageText<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ReactBody<'a> {
    react: &'a str,
}

#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<RwLock<Option<Session>>>,
}

impl RestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, FetchError> {
        match self.session.read().await.as_ref() {
            Some(session) => Ok(request.bearer_auth(&session.token)),
            None => Err(FetchError::Unauthenticated),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let request = self.authorize(self.http.get(self.endpoint(path))).await?;
        self.send(request).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        let request = self
            .authorize(self.http.post(self.endpoint(path)).json(body))
            .await?;
        self.send(request).await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), FetchError> {
        let request = self
            .authorize(self.http.put(self.endpoint(path)).json(body))
            .await?;
        self.send::<Empty>(request).await.map(|_| ())
    }

    async fn authenticate(&self, path: &str, credentials: &Credentials<'_>) -> Result<Session, FetchError> {
        let request = self.http.post(self.endpoint(path)).json(credentials);
        let session: Session = self.send(request).await?;
        self.set_session(Some(session.clone())).await;
        Ok(session)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, FetchError> {
        self.authenticate(
            paths::LOGIN,
            &Credentials {
                email,
                password,
                name: None,
            },
        )
        .await
    }

    pub async fn register(&self, email: &str, name: &str, password: &str) -> Result<Session, FetchError> {
        self.authenticate(
            paths::REGISTER,
            &Credentials {
                email,
                password,
                name: Some(name),
            },
        )
        .await
    }

    /// Invalidate the token server side and forget it locally
    pub async fn logout(&self) -> Result<(), FetchError> {
        let result = self
            .post::<_, Empty>(paths::LOGOUT, &serde_json::json!({}))
            .await
            .map(|_| ());
        self.set_session(None).await;
        result
    }

    pub async fn list_channels(&self) -> Result<Vec<ChannelSummary>, FetchError> {
        self.get::<ChannelList>(paths::CHANNELS)
            .await
            .map(|list| list.channels)
    }

    pub async fn channel_details(&self, channel: ChannelId) -> Result<ChannelDetails, FetchError> {
        self.get(&paths::channel(channel)).await
    }

    pub async fn create_channel(
        &self,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<ChannelId, FetchError> {
        let created: CreatedChannel = self
            .post(
                paths::CHANNELS,
                &NewChannel {
                    name,
                    private,
                    description,
                },
            )
            .await?;
        Ok(created.channel_id)
    }

    pub async fn update_channel(
        &self,
        channel: ChannelId,
        name: &str,
        description: &str,
    ) -> Result<(), FetchError> {
        self.put(&paths::channel(channel), &ChannelEdit { name, description })
            .await
    }

    pub async fn join_channel(&self, channel: ChannelId) -> Result<(), FetchError> {
        self.post::<_, Empty>(&paths::join(channel), &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    pub async fn leave_channel(&self, channel: ChannelId) -> Result<(), FetchError> {
        self.post::<_, Empty>(&paths::leave(channel), &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    pub async fn send_message(&self, channel: ChannelId, text: &str) -> Result<(), FetchError> {
        self.post::<_, Empty>(&paths::post_message(channel), &MessageText { message: text })
            .await
            .map(|_| ())
    }

    pub async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        text: &str,
    ) -> Result<(), FetchError> {
        self.put(&paths::message(channel, message), &MessageText { message: text })
            .await
    }

    pub async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<(), FetchError> {
        let request = self
            .authorize(self.http.delete(self.endpoint(&paths::message(channel, message))))
            .await?;
        self.send::<Empty>(request).await.map(|_| ())
    }

    pub async fn set_pinned(
        &self,
        channel: ChannelId,
        message: MessageId,
        pinned: bool,
    ) -> Result<(), FetchError> {
        self.post::<_, Empty>(&paths::pin(channel, message, pinned), &serde_json::json!({}))
            .await
            .map(|_| ())
    }

    pub async fn react(
        &self,
        channel: ChannelId,
        message: MessageId,
        kind: &str,
        add: bool,
    ) -> Result<(), FetchError> {
        self.post::<_, Empty>(&paths::react(channel, message, add), &ReactBody { react: kind })
            .await
            .map(|_| ())
    }

    pub async fn user(&self, user: UserId) -> Result<UserProfile, FetchError> {
        self.get(&paths::user(user)).await
    }
}

#[async_trait]
impl MessageSource for RestClient {
    async fn list_messages(
        &self,
        channel: ChannelId,
        start: usize,
    ) -> Result<Vec<Message>, FetchError> {
        self.get::<MessagePage>(&paths::messages(channel, start))
            .await
            .map(|page| page.messages)
    }

    async fn get_user(&self, user: UserId) -> Result<UserProfile, FetchError> {
        self.user(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = RestClient::new("http://localhost:5005/");
        assert_eq!(client.base_url(), "http://localhost:5005");
        assert_eq!(
            client.endpoint(&paths::messages(ChannelId(3), 25)),
            "http://localhost:5005/message/3?start=25"
        );
        assert_eq!(client.endpoint("/channel"), "http://localhost:5005/channel");
    }

    #[test]
    fn test_message_paths() {
        assert_eq!(paths::message(ChannelId(1), MessageId(9)), "message/1/9");
        assert_eq!(paths::pin(ChannelId(1), MessageId(9), true), "message/pin/1/9");
        assert_eq!(paths::pin(ChannelId(1), MessageId(9), false), "message/unpin/1/9");
        assert_eq!(paths::react(ChannelId(2), MessageId(4), false), "message/unreact/2/4");
        assert_eq!(paths::join(ChannelId(8)), "channel/8/join");
        assert_eq!(paths::user(UserId(12)), "user/12");
    }

    #[test]
    fn test_register_body_includes_name() {
        let body = serde_json::to_value(Credentials {
            email: "a@b.com",
            password: "pw",
            name: Some("Alice"),
        })
        .unwrap();
        assert_eq!(body["name"], "Alice");

        let body = serde_json::to_value(Credentials {
            email: "a@b.com",
            password: "pw",
            name: None,
        })
        .unwrap();
        assert!(body.get("name").is_none());
    }

    #[tokio::test]
    async fn test_requests_need_a_session() {
        let client = RestClient::new("http://127.0.0.1:9");
        let result = client.list_channels().await;
        assert_eq!(result, Err(FetchError::Unauthenticated));

        let session = Session {
            token: "t".into(),
            user_id: UserId(1),
        };
        let clone = client.clone();
        client.set_session(Some(session.clone())).await;
        assert_eq!(clone.session().await, Some(session));
    }
}
