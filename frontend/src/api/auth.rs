use super::{
    client::ApiClient,
    types::{ApiError, LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
};

impl ApiClient {
    pub async fn register(&self, request: RegisterRequest) -> Result<MessageResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let raw = self
            .send(
                self.http_client()
                    .post(format!("{}/register", base_url))
                    .json(&request),
            )
            .await?;
        Self::decode(raw)
    }

    /// Signs in and persists the returned token for later bearer calls.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let base_url = self.resolved_base_url().await;
        let raw = self
            .send(
                self.http_client()
                    .post(format!("{}/login", base_url))
                    .json(&request),
            )
            .await?;
        let response: LoginResponse = Self::decode(raw)?;
        self.store_token(&response.login_result.token)?;
        Ok(response)
    }

    /// The API has no logout endpoint; forgetting the token is the whole job.
    pub fn logout(&self) {
        self.clear_token();
    }
}
