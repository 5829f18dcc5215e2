//! Outbound webhook notifications.
//!
//! Deliveries are fire-and-forget: no retry, and a failure is logged rather
//! than returned to the action that triggered it.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    Registration,
    Login,
    ProfileUpdate,
    MessageSent,
    MessageReceived,
}

impl WebhookEvent {
    pub const ALL: [WebhookEvent; 5] = [
        WebhookEvent::Registration,
        WebhookEvent::Login,
        WebhookEvent::ProfileUpdate,
        WebhookEvent::MessageSent,
        WebhookEvent::MessageReceived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEvent::Registration => "registration",
            WebhookEvent::Login => "login",
            WebhookEvent::ProfileUpdate => "profile_update",
            WebhookEvent::MessageSent => "message_sent",
            WebhookEvent::MessageReceived => "message_received",
        }
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WebhookEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|e| e.as_str()).collect();
                format!("unknown event '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Destination URL per event; `None` disables that event.
#[derive(Debug, Clone, Default)]
pub struct WebhookUrls {
    pub registration: Option<String>,
    pub login: Option<String>,
    pub profile_update: Option<String>,
    pub message_sent: Option<String>,
    pub message_received: Option<String>,
}

impl WebhookUrls {
    pub fn url_for(&self, event: WebhookEvent) -> Option<&str> {
        let url = match event {
            WebhookEvent::Registration => &self.registration,
            WebhookEvent::Login => &self.login,
            WebhookEvent::ProfileUpdate => &self.profile_update,
            WebhookEvent::MessageSent => &self.message_sent,
            WebhookEvent::MessageReceived => &self.message_received,
        };
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook endpoint returned HTTP {0}")]
    Status(u16),
}

/// Upper bound on one delivery, connection included.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    urls: WebhookUrls,
}

/// Envelope sent for every event.
pub fn payload(event: WebhookEvent, data: Value) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "event": event.as_str(),
        "timestamp": Utc::now().to_rfc3339(),
        "data": data,
    })
}

async fn post_json(http: &reqwest::Client, url: &str, body: &Value) -> Result<(), WebhookError> {
    let response = http.post(url).json(body).send().await?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(WebhookError::Status(status.as_u16()))
    }
}

impl WebhookNotifier {
    pub fn new(urls: WebhookUrls) -> Self {
        Self::with_timeout(urls, DELIVERY_TIMEOUT)
    }

    /// An endpoint that accepts the connection but never answers is given up
    /// on after `timeout`.
    pub fn with_timeout(urls: WebhookUrls, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Webhook client setup failed, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self { http, urls }
    }

    /// Deliver one event and report the outcome. Returns `Ok(false)` when the
    /// event has no configured URL.
    pub async fn deliver(&self, event: WebhookEvent, data: Value) -> Result<bool, WebhookError> {
        let Some(url) = self.urls.url_for(event) else {
            return Ok(false);
        };
        post_json(&self.http, url, &payload(event, data)).await?;
        Ok(true)
    }

    /// Send an event in the background. Failures are logged, never returned.
    /// The handle lets short-lived callers wait before the runtime shuts down.
    pub fn notify(&self, event: WebhookEvent, data: Value) -> Option<JoinHandle<()>> {
        let Some(url) = self.urls.url_for(event).map(str::to_string) else {
            log::debug!("No webhook configured for {}", event);
            return None;
        };
        let http = self.http.clone();
        let body = payload(event, data);
        Some(tokio::spawn(async move {
            match post_json(&http, &url, &body).await {
                Ok(()) => log::info!("Webhook {} delivered", event),
                Err(e) => log::warn!("Webhook {} to {} failed: {}", event, url, e),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn urls_for(event_url: &str) -> WebhookUrls {
        WebhookUrls {
            message_sent: Some(event_url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn event_names_parse_with_dashes() {
        assert_eq!(
            "profile-update".parse::<WebhookEvent>().unwrap(),
            WebhookEvent::ProfileUpdate
        );
        assert_eq!(
            "MESSAGE_SENT".parse::<WebhookEvent>().unwrap(),
            WebhookEvent::MessageSent
        );
        let err = "logout".parse::<WebhookEvent>().unwrap_err();
        assert!(err.contains("registration"));
    }

    #[test]
    fn blank_url_disables_event() {
        let urls = WebhookUrls {
            login: Some("  ".into()),
            ..Default::default()
        };
        assert!(urls.url_for(WebhookEvent::Login).is_none());
    }

    #[test]
    fn payload_has_envelope_fields() {
        let body = payload(WebhookEvent::Login, json!({ "userId": "u1" }));
        assert_eq!(body["event"], "login");
        assert_eq!(body["data"]["userId"], "u1");
        assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn deliver_posts_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/sent"))
            .and(body_partial_json(json!({ "event": "message_sent", "data": { "to": "admin" } })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(urls_for(&format!("{}/hooks/sent", server.uri())));
        let sent = notifier
            .deliver(WebhookEvent::MessageSent, json!({ "to": "admin" }))
            .await
            .unwrap();
        assert!(sent);
    }

    #[tokio::test]
    async fn deliver_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(urls_for(&server.uri()));
        let err = notifier
            .deliver(WebhookEvent::MessageSent, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Status(500)));
    }

    #[tokio::test]
    async fn unconfigured_event_is_skipped() {
        let notifier = WebhookNotifier::new(WebhookUrls::default());
        assert!(!notifier.deliver(WebhookEvent::Login, json!({})).await.unwrap());
        assert!(notifier.notify(WebhookEvent::Login, json!({})).is_none());
    }

    #[tokio::test]
    async fn notify_swallows_delivery_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = WebhookNotifier::new(urls_for(&server.uri()));
        let handle = notifier
            .notify(WebhookEvent::MessageSent, json!({ "id": "m1" }))
            .expect("configured event spawns a delivery");
        assert!(handle.await.is_ok());
    }

    /// Accepts connections and holds them open without ever responding.
    fn silent_endpoint() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });
        format!("http://{}/hooks", addr)
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let notifier = WebhookNotifier::with_timeout(
            urls_for(&silent_endpoint()),
            Duration::from_millis(200),
        );

        let err = notifier
            .deliver(WebhookEvent::MessageSent, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Http(ref e) if e.is_timeout()), "got: {}", err);

        let handle = notifier
            .notify(WebhookEvent::MessageSent, json!({ "id": "m1" }))
            .expect("configured event spawns a delivery");
        let finished = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(finished.is_ok(), "delivery still pending after 5s");
    }
}
