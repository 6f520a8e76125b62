//! Minimal Twilio REST client.
//!
//! Only the two resources the gateway needs are covered: Messages (SMS and
//! the WhatsApp channel) and Calls. Requests are form-encoded and
//! authenticated with the account SID and auth token.

use std::time::Duration;

use {
    reqwest::Client,
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, de::DeserializeOwned},
    switchboard_common::{Error, Result},
    tracing::debug,
};

const PROVIDER: &str = "twilio";

/// Twilio REST client bound to one account.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    api_base: String,
    account_sid: String,
    auth_token: Secret<String>,
}

impl std::fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioClient")
            .field("api_base", &self.api_base)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// A created Message resource.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResource {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// A created Call resource.
#[derive(Debug, Clone, Deserialize)]
pub struct CallResource {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(
        api_base: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(PROVIDER, e))?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            account_sid: account_sid.into(),
            auth_token,
        })
    }

    /// Create a message (`Messages.json`).
    pub async fn send_message(&self, from: &str, to: &str, body: &str) -> Result<MessageResource> {
        self.post_form("Messages.json", &[("To", to), ("From", from), ("Body", body)])
            .await
    }

    /// Start an outbound call that fetches TwiML from `twiml_url`.
    pub async fn create_call(&self, from: &str, to: &str, twiml_url: &str) -> Result<CallResource> {
        self.post_form("Calls.json", &[("To", to), ("From", from), ("Url", twiml_url)])
            .await
    }

    fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/{resource}",
            self.api_base, self.account_sid
        )
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        resource: &str,
        form: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.resource_url(resource);
        debug!(%url, "twilio request");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(form)
            .send()
            .await
            .map_err(|e| Error::transport(PROVIDER, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::transport(PROVIDER, describe_failure(status, &body)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::transport(PROVIDER, format!("invalid response: {e}")))
    }
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            message: Some(message),
            code,
        }) => match code {
            Some(code) => format!("HTTP {status}: {message} (code {code})"),
            None => format!("HTTP {status}: {message}"),
        },
        _ => format!("HTTP {status}: {body}"),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{basic_auth, body_string_contains, method, path},
        },
    };

    fn client(base: &str) -> TwilioClient {
        TwilioClient::new(
            base,
            "AC123",
            Secret::new("token".into()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn send_message_posts_form_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(basic_auth("AC123", "token"))
            .and(body_string_contains("To=%2B15550001"))
            .and(body_string_contains("Body=hello+there"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sid": "SM42",
                "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let msg = client(&server.uri())
            .send_message("+15550000", "+15550001", "hello there")
            .await
            .unwrap();
        assert_eq!(msg.sid, "SM42");
        assert_eq!(msg.status.as_deref(), Some("queued"));
    }

    #[tokio::test]
    async fn create_call_sends_twiml_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Calls.json"))
            .and(body_string_contains("Url=http%3A%2F%2Fdemo.twilio.com"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "CA7" })),
            )
            .mount(&server)
            .await;

        let call = client(&server.uri())
            .create_call(
                "+15550000",
                "+15550001",
                "http://demo.twilio.com/docs/voice.xml",
            )
            .await
            .unwrap();
        assert_eq!(call.sid, "CA7");
    }

    #[tokio::test]
    async fn api_error_is_transport_error_with_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "code": 21211,
                "message": "The 'To' number abc is not a valid phone number.",
                "status": 400
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .send_message("+1", "abc", "x")
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("twilio error: HTTP 400"));
        assert!(msg.contains("not a valid phone number"));
        assert!(msg.contains("code 21211"));
    }

    #[test]
    fn debug_redacts_token() {
        let c = TwilioClient::new(
            "https://api.twilio.com/",
            "AC123",
            Secret::new("tok-do-not-print".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        let out = format!("{c:?}");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("tok-do-not-print"));
        assert_eq!(
            c.resource_url("Calls.json"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Calls.json"
        );
    }
}
