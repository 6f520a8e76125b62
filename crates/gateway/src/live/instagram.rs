use {
    async_trait::async_trait,
    switchboard_common::Result,
    switchboard_config::schema::InstagramConfig,
    switchboard_instagram::InstagramPoster,
};

use crate::{
    requests::PostPhoto,
    services::{ServiceResult, ServiceStatus, SocialService, result_body},
};

/// Credentials come with each request, so there is nothing to provision.
pub struct LiveSocialService {
    poster: InstagramPoster,
}

impl LiveSocialService {
    pub fn from_config(config: &InstagramConfig) -> Result<Self> {
        Ok(Self {
            poster: InstagramPoster::from_config(config)?,
        })
    }
}

#[async_trait]
impl SocialService for LiveSocialService {
    fn status(&self) -> ServiceStatus {
        ServiceStatus::Ready
    }

    async fn post_photo(&self, req: PostPhoto) -> ServiceResult {
        let result = self
            .poster
            .post_photo(&req.username, &req.password, &req.image_path, &req.caption)
            .await?;
        Ok(result_body(result))
    }
}
