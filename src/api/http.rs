use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, multipart, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{AnalysisApi, HealthStatus};
use crate::analysis::{AnalysisResult, IngredientAnalysisRequest};
use crate::error::RemoteFailure;
use crate::images::SelectedImage;
use crate::meal_plan::MealPlan;
use crate::profile::ProfilePayload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// reqwest client for the analysis service.
#[derive(Clone)]
pub struct HttpAnalysisApi {
    http: Client,
    base_url: String,
}

impl HttpAnalysisApi {
    pub fn new(base_url: &str) -> Result<Self, RemoteFailure> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, RemoteFailure>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(path, "post_json: sending");
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        let resp = ensure_success(path, resp).await?;
        decode_json(&resp.bytes().await?)
    }
}

async fn ensure_success(path: &str, resp: Response) -> Result<Response, RemoteFailure> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    warn!(path, status = status.as_u16(), "service returned error status");
    Err(RemoteFailure::Status {
        status: status.as_u16(),
        body,
    })
}

// The service answers some internal failures with 200 and an `error` key.
fn service_error(value: &Value) -> Option<String> {
    value.get("error").and_then(Value::as_str).map(str::to_string)
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteFailure> {
    let value: Value = serde_json::from_slice(body)?;
    if let Some(message) = service_error(&value) {
        return Err(RemoteFailure::Service(message));
    }
    Ok(serde_json::from_value(value)?)
}

#[async_trait]
impl AnalysisApi for HttpAnalysisApi {
    #[instrument(skip(self, request), fields(ingredients = request.ingredients.len()))]
    async fn analyze_ingredients(
        &self,
        request: &IngredientAnalysisRequest,
    ) -> Result<AnalysisResult, RemoteFailure> {
        self.post_json("/analyze-ingredients", request).await
    }

    #[instrument(skip(self, image, profile), fields(file = image.file_name(), bytes = image.len()))]
    async fn analyze_photo(
        &self,
        image: &SelectedImage,
        profile: &ProfilePayload,
    ) -> Result<AnalysisResult, RemoteFailure> {
        let path = "/analyze-photo";
        let file = multipart::Part::bytes(image.body().to_vec())
            .file_name(image.file_name().to_string())
            .mime_str(image.media_type())?;
        let form = multipart::Form::new()
            .part("file", file)
            .text("user_profile", serde_json::to_string(profile)?);

        debug!(path, "analyze_photo: sending multipart");
        let resp = self.http.post(self.url(path)).multipart(form).send().await?;
        let resp = ensure_success(path, resp).await?;
        decode_json(&resp.bytes().await?)
    }

    #[instrument(skip(self, profile))]
    async fn generate_meal_plan(&self, profile: &ProfilePayload) -> Result<MealPlan, RemoteFailure> {
        self.post_json("/generate-meal-plan", profile).await
    }

    #[instrument(skip(self, plan))]
    async fn export_pdf(&self, plan: &MealPlan) -> Result<Bytes, RemoteFailure> {
        let path = "/export-pdf";
        debug!(path, "export_pdf: sending");
        let resp = self.http.post(self.url(path)).json(plan).send().await?;
        let resp = ensure_success(path, resp).await?;

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);
        let body = resp.bytes().await?;

        if is_json {
            let value: Value = serde_json::from_slice(&body)?;
            return Err(match service_error(&value) {
                Some(message) => RemoteFailure::Service(message),
                None => RemoteFailure::UnexpectedContent("expected a PDF, got JSON".into()),
            });
        }
        if body.is_empty() {
            return Err(RemoteFailure::UnexpectedContent("empty PDF body".into()));
        }
        Ok(body)
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<HealthStatus, RemoteFailure> {
        let path = "/health";
        let resp = self.http.get(self.url(path)).send().await?;
        let resp = ensure_success(path, resp).await?;
        decode_json(&resp.bytes().await?)
    }
}
