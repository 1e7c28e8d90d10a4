use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::multipart::{Form, Part};

use super::{
    client::ApiClient,
    types::{
        ApiError, MessageResponse, Story, StoryDetailResponse, StoryListQuery, StoryListResponse,
        StoryUpload,
    },
};

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?');

fn story_form(upload: &StoryUpload) -> Result<Form, ApiError> {
    let photo = Part::bytes(upload.photo.bytes.clone())
        .file_name(upload.photo.file_name.clone())
        .mime_str(&upload.photo.mime_type)
        .map_err(|e| ApiError::validation(format!("Invalid photo type: {}", e)))?;
    let mut form = Form::new()
        .text("description", upload.description.clone())
        .part("photo", photo);
    if let Some(location) = upload.location {
        form = form
            .text("lat", location.lat.to_string())
            .text("lon", location.lon.to_string());
    }
    Ok(form)
}

impl ApiClient {
    pub async fn list_stories(&self, query: StoryListQuery) -> Result<Vec<Story>, ApiError> {
        let base_url = self.resolved_base_url().await;
        let bearer = self.bearer()?;
        let raw = self
            .send(
                self.http_client()
                    .get(format!("{}/stories?{}", base_url, query.to_query_string()))
                    .header(reqwest::header::AUTHORIZATION, bearer),
            )
            .await?;
        let response: StoryListResponse = Self::decode(raw)?;
        Ok(response.list_story)
    }

    /// Same listing without a bearer header, for visitors who are not signed in.
    pub async fn list_stories_anonymous(
        &self,
        query: StoryListQuery,
    ) -> Result<Vec<Story>, ApiError> {
        let base_url = self.resolved_base_url().await;
        let raw = self
            .send(
                self.http_client()
                    .get(format!("{}/stories?{}", base_url, query.to_query_string())),
            )
            .await?;
        let response: StoryListResponse = Self::decode(raw)?;
        Ok(response.list_story)
    }

    pub async fn get_story(&self, id: &str) -> Result<Story, ApiError> {
        let base_url = self.resolved_base_url().await;
        let bearer = self.bearer()?;
        let raw = self
            .send(
                self.http_client()
                    .get(format!(
                        "{}/stories/{}",
                        base_url,
                        utf8_percent_encode(id, PATH_SEGMENT)
                    ))
                    .header(reqwest::header::AUTHORIZATION, bearer),
            )
            .await?;
        let response: StoryDetailResponse = Self::decode(raw)?;
        Ok(response.story)
    }

    pub async fn add_story(&self, upload: &StoryUpload) -> Result<MessageResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let bearer = self.bearer()?;
        let form = story_form(upload)?;
        let raw = self
            .send(
                self.http_client()
                    .post(format!("{}/stories", base_url))
                    .header(reqwest::header::AUTHORIZATION, bearer)
                    .multipart(form),
            )
            .await?;
        Self::decode(raw)
    }

    pub async fn add_guest_story(&self, upload: &StoryUpload) -> Result<MessageResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let form = story_form(upload)?;
        let raw = self
            .send(
                self.http_client()
                    .post(format!("{}/stories/guest", base_url))
                    .multipart(form),
            )
            .await?;
        Self::decode(raw)
    }
}
