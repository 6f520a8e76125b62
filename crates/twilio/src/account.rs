use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    switchboard_channels::{ChannelOutbound, Delivery},
    switchboard_common::Result,
    switchboard_config::schema::TwilioConfig,
    tracing::info,
};

use crate::client::TwilioClient;

/// A Twilio account with its sender number, ready to send.
#[derive(Debug, Clone)]
pub struct TwilioAccount {
    client: Arc<TwilioClient>,
    phone_number: String,
    voice_url: String,
}

impl TwilioAccount {
    /// Resolve credentials and build the REST client.
    ///
    /// Fails with a configuration error when any credential is missing.
    pub fn from_config(config: &TwilioConfig) -> Result<Self> {
        let creds = config.credentials()?;
        let client = TwilioClient::new(
            config.api_base.clone(),
            creds.account_sid,
            creds.auth_token,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client: Arc::new(client),
            phone_number: creds.phone_number,
            voice_url: config.voice_url.clone(),
        })
    }

    pub fn client(&self) -> Arc<TwilioClient> {
        Arc::clone(&self.client)
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn sms(&self) -> SmsChannel {
        SmsChannel {
            client: self.client(),
            from: self.phone_number.clone(),
        }
    }

    /// Place a call that plays the configured TwiML instructions.
    pub async fn make_call(&self, to: &str) -> Result<Delivery> {
        let call = self
            .client
            .create_call(&self.phone_number, to, &self.voice_url)
            .await?;
        info!(sid = %call.sid, "call initiated");
        Ok(Delivery::with_id(
            call.sid.clone(),
            format!("Call initiated successfully! SID: {}", call.sid),
        ))
    }
}

/// Plain SMS from the account's sender number.
#[derive(Debug, Clone)]
pub struct SmsChannel {
    client: Arc<TwilioClient>,
    from: String,
}

#[async_trait]
impl ChannelOutbound for SmsChannel {
    fn id(&self) -> &str {
        "sms"
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<Delivery> {
        let message = self.client.send_message(&self.from, to, text).await?;
        info!(sid = %message.sid, "sms sent");
        Ok(Delivery::with_id(
            message.sid.clone(),
            format!("SMS sent successfully! SID: {}", message.sid),
        ))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        secrecy::Secret,
        switchboard_common::ErrorKind,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{body_string_contains, method, path},
        },
    };

    fn config(base: &str) -> TwilioConfig {
        TwilioConfig {
            account_sid: Some("AC1".into()),
            auth_token: Some(Secret::new("tok".into())),
            phone_number: Some("+15550000".into()),
            api_base: base.into(),
            ..TwilioConfig::default()
        }
    }

    #[test]
    fn missing_credentials_is_configuration_error() {
        let err = TwilioAccount::from_config(&TwilioConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn sms_channel_reports_sid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC1/Messages.json"))
            .and(body_string_contains("From=%2B15550000"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SM9" })),
            )
            .mount(&server)
            .await;

        let account = TwilioAccount::from_config(&config(&server.uri())).unwrap();
        let delivery = account.sms().send_text("+15550001", "hi").await.unwrap();
        assert_eq!(delivery.id.as_deref(), Some("SM9"));
        assert_eq!(delivery.status, "SMS sent successfully! SID: SM9");
    }

    #[tokio::test]
    async fn make_call_uses_configured_voice_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC1/Calls.json"))
            .and(body_string_contains("Url=https%3A%2F%2Fexample.com%2Ftwiml.xml"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "CA1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut cfg = config(&server.uri());
        cfg.voice_url = "https://example.com/twiml.xml".into();
        let account = TwilioAccount::from_config(&cfg).unwrap();
        let delivery = account.make_call("+15550001").await.unwrap();
        assert_eq!(delivery.status, "Call initiated successfully! SID: CA1");
    }
}
