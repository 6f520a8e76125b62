use std::sync::Arc;

use {
    async_trait::async_trait,
    switchboard_channels::{ChannelOutbound, Delivery},
    switchboard_common::Result,
    switchboard_twilio::{TwilioAccount, TwilioClient},
    tracing::info,
};

const PREFIX: &str = "whatsapp:";

/// WhatsApp messages through the carrier's WhatsApp sender.
#[derive(Debug, Clone)]
pub struct TwilioWhatsApp {
    client: Arc<TwilioClient>,
    from: String,
}

impl TwilioWhatsApp {
    pub fn new(account: &TwilioAccount) -> Self {
        Self {
            client: account.client(),
            from: account.phone_number().to_string(),
        }
    }
}

fn address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(PREFIX) {
        number.to_string()
    } else {
        format!("{PREFIX}{number}")
    }
}

#[async_trait]
impl ChannelOutbound for TwilioWhatsApp {
    fn id(&self) -> &str {
        "whatsapp-twilio"
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<Delivery> {
        let message = self
            .client
            .send_message(&address(&self.from), &address(to), text)
            .await?;
        info!(sid = %message.sid, "whatsapp message sent via twilio");
        Ok(Delivery::with_id(
            message.sid.clone(),
            format!("WhatsApp message sent via Twilio. SID: {}", message.sid),
        ))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        secrecy::Secret,
        switchboard_config::schema::TwilioConfig,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{body_string_contains, method, path},
        },
    };

    #[test]
    fn prefix_added_once() {
        assert_eq!(address("+1555"), "whatsapp:+1555");
        assert_eq!(address(" whatsapp:+1555 "), "whatsapp:+1555");
    }

    #[tokio::test]
    async fn both_numbers_prefixed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC1/Messages.json"))
            .and(body_string_contains("To=whatsapp%3A%2B15550001"))
            .and(body_string_contains("From=whatsapp%3A%2B15550000"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SMwa" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let account = TwilioAccount::from_config(&TwilioConfig {
            account_sid: Some("AC1".into()),
            auth_token: Some(Secret::new("tok".into())),
            phone_number: Some("+15550000".into()),
            api_base: server.uri(),
            ..TwilioConfig::default()
        })
        .unwrap();
        let delivery = TwilioWhatsApp::new(&account)
            .send_text("+15550001", "hola")
            .await
            .unwrap();
        assert_eq!(delivery.status, "WhatsApp message sent via Twilio. SID: SMwa");
    }
}
