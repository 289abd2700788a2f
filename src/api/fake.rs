use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::oneshot;

use super::{AnalysisApi, HealthStatus};
use crate::analysis::{AnalysisResult, IngredientAnalysisRequest};
use crate::error::RemoteFailure;
use crate::images::SelectedImage;
use crate::meal_plan::MealPlan;
use crate::profile::ProfilePayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    AnalyzeIngredients,
    AnalyzePhoto,
    GenerateMealPlan,
    ExportPdf,
    Health,
}

pub(crate) enum Reply {
    Analysis(AnalysisResult),
    Plan(MealPlan),
    Pdf(Bytes),
    Status(u16),
}

struct Scripted {
    gate: Option<oneshot::Receiver<()>>,
    reply: Reply,
}

/// Scripted stand-in for the analysis service.
///
/// Replies are consumed in call order; a gated reply waits until its
/// sender fires (or is dropped).
#[derive(Default)]
pub(crate) struct FakeApi {
    calls: Mutex<Vec<Endpoint>>,
    ingredient_requests: Mutex<Vec<IngredientAnalysisRequest>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Reply) {
        self.script.lock().unwrap().push_back(Scripted { gate: None, reply });
    }

    pub fn reply_after(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Scripted {
            gate: Some(rx),
            reply,
        });
        tx
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_ingredients(&self) -> Option<Vec<String>> {
        self.ingredient_requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.ingredients.clone())
    }

    async fn next(&self, endpoint: Endpoint) -> Reply {
        self.calls.lock().unwrap().push(endpoint);
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for {endpoint:?}"));
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.reply
    }
}

fn mismatch(endpoint: Endpoint) -> RemoteFailure {
    RemoteFailure::UnexpectedContent(format!("scripted reply does not fit {endpoint:?}"))
}

fn status(status: u16) -> RemoteFailure {
    RemoteFailure::Status {
        status,
        body: "scripted failure".into(),
    }
}

#[async_trait]
impl AnalysisApi for FakeApi {
    async fn analyze_ingredients(
        &self,
        request: &IngredientAnalysisRequest,
    ) -> Result<AnalysisResult, RemoteFailure> {
        self.ingredient_requests.lock().unwrap().push(IngredientAnalysisRequest {
            user_profile: request.user_profile.clone(),
            ingredients: request.ingredients.clone(),
        });
        match self.next(Endpoint::AnalyzeIngredients).await {
            Reply::Analysis(result) => Ok(result),
            Reply::Status(code) => Err(status(code)),
            _ => Err(mismatch(Endpoint::AnalyzeIngredients)),
        }
    }

    async fn analyze_photo(
        &self,
        _image: &SelectedImage,
        _profile: &ProfilePayload,
    ) -> Result<AnalysisResult, RemoteFailure> {
        match self.next(Endpoint::AnalyzePhoto).await {
            Reply::Analysis(result) => Ok(result),
            Reply::Status(code) => Err(status(code)),
            _ => Err(mismatch(Endpoint::AnalyzePhoto)),
        }
    }

    async fn generate_meal_plan(&self, _profile: &ProfilePayload) -> Result<MealPlan, RemoteFailure> {
        match self.next(Endpoint::GenerateMealPlan).await {
            Reply::Plan(plan) => Ok(plan),
            Reply::Status(code) => Err(status(code)),
            _ => Err(mismatch(Endpoint::GenerateMealPlan)),
        }
    }

    async fn export_pdf(&self, _plan: &MealPlan) -> Result<Bytes, RemoteFailure> {
        match self.next(Endpoint::ExportPdf).await {
            Reply::Pdf(body) => Ok(body),
            Reply::Status(code) => Err(status(code)),
            _ => Err(mismatch(Endpoint::ExportPdf)),
        }
    }

    async fn health(&self) -> Result<HealthStatus, RemoteFailure> {
        self.calls.lock().unwrap().push(Endpoint::Health);
        Ok(HealthStatus {
            status: "healthy".into(),
            service: Some("fake".into()),
        })
    }
}
