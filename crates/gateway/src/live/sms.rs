use {
    async_trait::async_trait,
    switchboard_channels::ChannelOutbound,
    switchboard_common::Result,
    switchboard_config::schema::TwilioConfig,
    switchboard_twilio::TwilioAccount,
};

use crate::{
    live::Provisioned,
    requests::{MakeCall, SendSms},
    services::{ServiceResult, ServiceStatus, TelephonyService, result_body},
};

/// SMS and voice calls through the carrier account.
pub struct LiveTelephonyService {
    account: Provisioned<TwilioAccount>,
}

impl LiveTelephonyService {
    pub fn from_config(config: &TwilioConfig) -> Result<Self> {
        Ok(Self::new(Provisioned::resolve(TwilioAccount::from_config(config))?))
    }

    pub fn new(account: Provisioned<TwilioAccount>) -> Self {
        Self { account }
    }
}

#[async_trait]
impl TelephonyService for LiveTelephonyService {
    fn status(&self) -> ServiceStatus {
        self.account.status()
    }

    async fn send_sms(&self, req: SendSms) -> ServiceResult {
        let delivery = self
            .account
            .get()?
            .sms()
            .send_text(&req.to_number, &req.message)
            .await?;
        Ok(result_body(delivery.status))
    }

    async fn make_call(&self, req: MakeCall) -> ServiceResult {
        let delivery = self.account.get()?.make_call(&req.to_number).await?;
        Ok(result_body(delivery.status))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        secrecy::Secret,
        switchboard_common::ErrorKind,
        wiremock::{Mock, MockServer, ResponseTemplate, matchers::method},
    };

    #[tokio::test]
    async fn missing_credentials_answer_per_call() {
        let service = LiveTelephonyService::from_config(&TwilioConfig::default()).unwrap();
        assert_eq!(service.status(), ServiceStatus::MissingCredentials);
        let err = service
            .send_sms(SendSms {
                to_number: "+1".into(),
                message: "x".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().starts_with("Twilio credentials not found"));
    }

    #[tokio::test]
    async fn sms_result_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({ "sid": "SM5" })),
            )
            .mount(&server)
            .await;

        let service = LiveTelephonyService::from_config(&TwilioConfig {
            account_sid: Some("AC1".into()),
            auth_token: Some(Secret::new("t".into())),
            phone_number: Some("+15550000".into()),
            api_base: server.uri(),
            ..TwilioConfig::default()
        })
        .unwrap();
        let body = service
            .send_sms(SendSms {
                to_number: "+15550001".into(),
                message: "hi".into(),
            })
            .await
            .unwrap();
        assert_eq!(body["result"], "SMS sent successfully! SID: SM5");
    }
}
