use std::time::Duration;

use {
    reqwest::{Client, RequestBuilder, Response, header::HeaderMap},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    serde_json::{Value, json},
    switchboard_common::{Error, Result},
    switchboard_config::schema::InstagramConfig,
    tracing::debug,
};

use crate::photo::Photo;

const PROVIDER: &str = "instagram";

/// Authorization obtained from a login. Lives for a single post.
#[derive(Clone)]
pub struct Session {
    authorization: Secret<String>,
    device_id: String,
    user_id: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("device_id", &self.device_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    two_factor_required: bool,
}

#[derive(Debug, Clone)]
pub struct InstagramClient {
    client: Client,
    api_base: String,
    app_id: String,
}

impl InstagramClient {
    pub fn from_config(config: &InstagramConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::transport(PROVIDER, e))?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
        })
    }

    pub async fn login(&self, username: &str, password: &Secret<String>) -> Result<Session> {
        let device_id = format!("android-{}", &uuid::Uuid::new_v4().simple().to_string()[..16]);
        let timestamp = chrono::Utc::now().timestamp();
        let payload = json!({
            "username": username,
            "enc_password": format!("#PWD_INSTAGRAM:0:{timestamp}:{}", password.expose_secret()),
            "device_id": device_id,
            "guid": uuid::Uuid::new_v4().to_string(),
            "login_attempt_count": "0",
        });

        let response = self
            .send(
                self.request("/api/v1/accounts/login/")
                    .form(&[("signed_body", signed_body(&payload))]),
            )
            .await?;
        let headers = response.headers().clone();
        let body = read_json(response).await?;

        let authorization = header_str(&headers, "ig-set-authorization")
            .filter(|v| !v.trim().is_empty() && v.trim() != "Bearer IGT:2:")
            .ok_or_else(|| Error::transport(PROVIDER, "login returned no session"))?;
        let user_id = body
            .pointer("/logged_in_user/pk")
            .map(|pk| pk.to_string().trim_matches('"').to_string());
        debug!(username, "instagram login ok");

        Ok(Session {
            authorization: Secret::new(authorization),
            device_id,
            user_id,
        })
    }

    /// Upload raw image bytes; returns the upload id to configure.
    pub async fn upload_photo(&self, session: &Session, photo: &Photo) -> Result<String> {
        let upload_id = chrono::Utc::now().timestamp_millis().to_string();
        let entity = format!("{upload_id}_0_{}", rand_suffix());
        let params = json!({
            "retry_context": r#"{"num_step_auto_retry":0,"num_reupload":0,"num_step_manual_retry":0}"#,
            "media_type": "1",
            "upload_id": upload_id,
            "image_compression": r#"{"lib_name":"moz","lib_version":"3.1.m","quality":"80"}"#,
        });

        let response = self
            .send(
                self.authed(
                    self.request(&format!("/rupload_igphoto/{entity}")),
                    session,
                )
                .header("X-Instagram-Rupload-Params", params.to_string())
                .header("X-Entity-Name", entity.as_str())
                .header("X-Entity-Length", photo.bytes.len().to_string())
                .header("X-Entity-Type", photo.content_type)
                .header("Offset", "0")
                .header("Content-Type", "application/octet-stream")
                .body(photo.bytes.clone()),
            )
            .await?;
        let body = read_json(response).await?;
        Ok(body
            .get("upload_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(upload_id))
    }

    /// Publish an upload as a feed post. Returns the media shortcode.
    pub async fn configure(
        &self,
        session: &Session,
        upload_id: &str,
        photo: &Photo,
        caption: &str,
    ) -> Result<String> {
        let payload = json!({
            "upload_id": upload_id,
            "caption": caption,
            "source_type": "4",
            "device_id": session.device_id,
            "_uid": session.user_id,
            "extra": { "source_width": photo.width, "source_height": photo.height },
            "edits": {
                "crop_original_size": [photo.width, photo.height],
                "crop_center": [0.0, -0.0],
                "crop_zoom": 1.0,
            },
        });

        let response = self
            .send(
                self.authed(self.request("/api/v1/media/configure/"), session)
                    .form(&[("signed_body", signed_body(&payload))]),
            )
            .await?;
        let body = read_json(response).await?;
        body.pointer("/media/code")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::transport(PROVIDER, "configure response had no media code"))
    }

    fn request(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.api_base))
            .header("X-IG-App-ID", &self.app_id)
    }

    fn authed(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder
            .header("Authorization", session.authorization.expose_secret())
            .header("X-IG-Device-ID", &session.device_id)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(PROVIDER, format!("request failed: {e}")))?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let api: ApiStatus = serde_json::from_str(&text).unwrap_or_default();
        Err(Error::transport(PROVIDER, describe_failure(status, &api, &text)))
    }
}

fn describe_failure(status: reqwest::StatusCode, api: &ApiStatus, raw: &str) -> String {
    if api.two_factor_required {
        return "two-factor authentication required".into();
    }
    if let Some(kind) = api.error_type.as_deref()
        && kind.contains("checkpoint")
    {
        return "checkpoint challenge required; confirm the login in the Instagram app".into();
    }
    match api.message.as_deref() {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("HTTP {status}: {raw}"),
    }
}

async fn read_json(response: Response) -> Result<Value> {
    let body: Value = response
        .json()
        .await
        .map_err(|e| Error::transport(PROVIDER, format!("invalid response: {e}")))?;
    let status: ApiStatus = serde_json::from_value(body.clone()).unwrap_or_default();
    match status.status.as_deref() {
        Some("fail") => Err(Error::transport(
            PROVIDER,
            status.message.unwrap_or_else(|| "request failed".into()),
        )),
        _ => Ok(body),
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn signed_body(payload: &Value) -> String {
    format!("SIGNATURE.{payload}")
}

fn rand_suffix() -> u128 {
    1_000_000_000 + uuid::Uuid::new_v4().as_u128() % 9_000_000_000
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{body_string_contains, header, method, path, path_regex},
        },
    };

    fn client(base: &str) -> InstagramClient {
        InstagramClient::from_config(&InstagramConfig {
            api_base: base.into(),
            ..InstagramConfig::default()
        })
        .unwrap()
    }

    fn photo() -> Photo {
        Photo {
            bytes: vec![1, 2, 3],
            content_type: "image/webp",
            width: 1080,
            height: 1350,
        }
    }

    #[tokio::test]
    async fn login_reads_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .and(header("X-IG-App-ID", "567067343352427"))
            .and(body_string_contains("signed_body=SIGNATURE"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ig-set-authorization", "Bearer IGT:2:abc")
                    .set_body_json(json!({ "status": "ok", "logged_in_user": { "pk": 77 } })),
            )
            .mount(&server)
            .await;

        let session = client(&server.uri())
            .login("cat", &Secret::new("pw".into()))
            .await
            .unwrap();
        assert_eq!(session.authorization.expose_secret(), "Bearer IGT:2:abc");
        assert_eq!(session.user_id.as_deref(), Some("77"));
        assert!(session.device_id.starts_with("android-"));
    }

    #[tokio::test]
    async fn checkpoint_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "fail",
                "message": "challenge_required",
                "error_type": "checkpoint_challenge_required"
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .login("cat", &Secret::new("pw".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("instagram error: checkpoint"));
    }

    #[tokio::test]
    async fn two_factor_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "fail",
                "message": "two_factor_required",
                "two_factor_required": true
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .login("cat", &Secret::new("pw".into()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "instagram error: two-factor authentication required");
    }

    #[tokio::test]
    async fn upload_then_configure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex("^/rupload_igphoto/.+"))
            .and(header("Authorization", "Bearer IGT:2:abc"))
            .and(header("X-Entity-Length", "3"))
            .and(header("X-Entity-Type", "image/webp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "upload_id": "123", "status": "ok" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/media/configure/"))
            .and(body_string_contains("123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ok",
                "media": { "code": "Cxyz", "pk": 1 }
            })))
            .mount(&server)
            .await;

        let c = client(&server.uri());
        let session = Session {
            authorization: Secret::new("Bearer IGT:2:abc".into()),
            device_id: "android-1".into(),
            user_id: None,
        };
        let upload_id = c.upload_photo(&session, &photo()).await.unwrap();
        assert_eq!(upload_id, "123");
        let code = c
            .configure(&session, &upload_id, &photo(), "hello")
            .await
            .unwrap();
        assert_eq!(code, "Cxyz");
    }
}
