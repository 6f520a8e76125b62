use std::path::Path;

use {
    secrecy::Secret,
    switchboard_common::Result,
    switchboard_config::schema::InstagramConfig,
    tracing::info,
};

use crate::{client::InstagramClient, photo::Photo};

/// Posts photos on behalf of whichever account the caller names.
#[derive(Debug, Clone)]
pub struct InstagramPoster {
    client: InstagramClient,
}

impl InstagramPoster {
    pub fn from_config(config: &InstagramConfig) -> Result<Self> {
        Ok(Self {
            client: InstagramClient::from_config(config)?,
        })
    }

    /// Validate the image, log in, upload and publish.
    ///
    /// Sessions are never reused; every call performs its own login.
    pub async fn post_photo(
        &self,
        username: &str,
        password: &Secret<String>,
        image_path: &Path,
        caption: &str,
    ) -> Result<String> {
        let photo = Photo::load(image_path).await?;
        let session = self.client.login(username, password).await?;
        let upload_id = self.client.upload_photo(&session, &photo).await?;
        let code = self
            .client
            .configure(&session, &upload_id, &photo, caption)
            .await?;
        info!(username, %code, "instagram photo posted");
        Ok(format!("Image posted successfully! Media code: {code}"))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde_json::json,
        switchboard_common::ErrorKind,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{body_string_contains, method, path, path_regex},
        },
    };

    fn poster(base: &str) -> InstagramPoster {
        InstagramPoster::from_config(&InstagramConfig {
            api_base: base.into(),
            ..InstagramConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_image_fails_before_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = poster(&server.uri())
            .post_photo("u", &Secret::new("p".into()), Path::new("/no/such.jpg"), "c")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn full_flow_logs_in_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("pic.png");
        image::RgbImage::new(4, 5).save(&image).unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("ig-set-authorization", "Bearer IGT:2:tok")
                    .set_body_json(json!({ "status": "ok", "logged_in_user": { "pk": "9" } })),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex("^/rupload_igphoto/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "upload_id": "55" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/media/configure/"))
            .and(body_string_contains("source_width"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "ok", "media": { "code": "B1" } })),
            )
            .mount(&server)
            .await;

        let p = poster(&server.uri());
        let password = Secret::new("pw".into());
        for _ in 0..2 {
            let result = p.post_photo("u", &password, &image, "caption").await.unwrap();
            assert_eq!(result, "Image posted successfully! Media code: B1");
        }
    }
}
