//! Client-side application state and the actions that talk to the
//! analysis service.
//!
//! All state lives in one [`SessionState`] behind a mutex that is only held
//! for synchronous sections, never across a service call. Actions take
//! `&self`, so several workflows may be in flight at once; each workflow
//! keeps its own status token and only its latest request may write back.

mod executor;
mod navigation;
mod notify;
mod results;
mod workflow;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tracing::debug;

use crate::analysis::IngredientAnalysisRequest;
use crate::api::HealthStatus;
use crate::error::{RemoteFailure, ValidationFailure};
use crate::images::SelectedImage;
use crate::ingredients::IngredientInput;
use crate::meal_plan::PDF_FILE_NAME;
use crate::profile::{Allergen, ProfileField, UserProfile};
use crate::state::AppState;

pub use executor::Outcome;
pub use navigation::{Navigation, View};
pub use notify::{Level, Notification, Notifications};
pub use results::ResultStore;
pub use workflow::{RequestId, Ticket, Workflow, WorkflowStatus, WorkflowTracker};

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub profile: UserProfile,
    pub ingredients: IngredientInput,
    pub image: Option<SelectedImage>,
    pub results: ResultStore,
    pub navigation: Navigation,
    pub workflows: WorkflowTracker,
    pub notifications: Notifications,
    pub last_download: Option<PathBuf>,
}

impl SessionState {
    pub fn is_busy(&self) -> bool {
        self.workflows.is_busy()
    }
}

fn lock(inner: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Session {
    app: AppState,
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(app: AppState) -> Self {
        Self {
            app,
            inner: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock(&self.inner)
    }

    /// Copy of the whole state for rendering.
    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    pub fn status(&self, workflow: Workflow) -> WorkflowStatus {
        self.lock().workflows.status(workflow)
    }

    pub fn take_notifications(&self) -> Vec<Notification> {
        self.lock().notifications.drain()
    }

    // --- profile & inputs ---

    pub fn set_profile_field(&self, field: ProfileField) {
        self.lock().profile.set(field);
    }

    pub fn toggle_allergy(&self, allergen: Allergen) {
        self.lock().profile.toggle_allergy(allergen);
    }

    pub fn set_ingredients(&self, text: impl Into<String>) {
        self.lock().ingredients = IngredientInput::new(text);
    }

    /// Accepts the file only if it is an image; otherwise the current
    /// selection stays as it was.
    pub fn select_image(
        &self,
        file_name: &str,
        media_type: &str,
        body: Bytes,
    ) -> Result<(), ValidationFailure> {
        let mut state = self.lock();
        match SelectedImage::new(file_name, media_type, body) {
            Ok(image) => {
                debug!(file_name, media_type, bytes = image.len(), "image selected");
                state.image = Some(image);
                state
                    .notifications
                    .push(None, Level::Success, "Image selected successfully!");
                Ok(())
            }
            Err(reason) => {
                debug!(file_name, %reason, "image rejected");
                state
                    .notifications
                    .push(None, Level::Error, "Please select a valid image file");
                Err(reason)
            }
        }
    }

    pub fn clear_image(&self) {
        self.lock().image = None;
    }

    // --- navigation ---

    pub fn select_view(&self, view: View) {
        self.lock().navigation.select(view);
    }

    pub fn open_overlay(&self) {
        self.lock().navigation.open_overlay();
    }

    pub fn close_overlay(&self) {
        self.lock().navigation.close_overlay();
    }

    /// Any response still in flight for `workflow` will be discarded.
    pub fn cancel(&self, workflow: Workflow) -> bool {
        let mut state = self.lock();
        let cancelled = state.workflows.cancel(workflow);
        if cancelled {
            debug!(%workflow, "cancelled in-flight request");
            state
                .notifications
                .push(Some(workflow), Level::Error, workflow.messages().cancelled);
        }
        cancelled
    }

    // --- workflows ---

    pub async fn analyze_ingredients(&self) -> Outcome {
        let api = Arc::clone(&self.app.api);
        self.run(
            Workflow::IngredientAnalysis,
            |state| {
                if state.ingredients.is_blank() {
                    return Err(ValidationFailure::MissingIngredients);
                }
                Ok(IngredientAnalysisRequest {
                    user_profile: state.profile.to_payload()?,
                    ingredients: state.ingredients.lines(),
                })
            },
            move |request| async move { api.analyze_ingredients(&request).await },
            |state, result| state.results.replace_analysis(result),
        )
        .await
    }

    pub async fn analyze_photo(&self) -> Outcome {
        let api = Arc::clone(&self.app.api);
        self.run(
            Workflow::PhotoAnalysis,
            |state| {
                let image = state.image.clone().ok_or(ValidationFailure::MissingImage)?;
                Ok((image, state.profile.to_payload()?))
            },
            move |(image, profile)| async move { api.analyze_photo(&image, &profile).await },
            |state, result| state.results.replace_analysis(result),
        )
        .await
    }

    pub async fn generate_meal_plan(&self) -> Outcome {
        let api = Arc::clone(&self.app.api);
        self.run(
            Workflow::MealPlan,
            |state| state.profile.to_payload(),
            move |profile| async move { api.generate_meal_plan(&profile).await },
            |state, plan| state.results.replace_meal_plan(plan),
        )
        .await
    }

    /// The file is only written while the export is still the latest one.
    pub async fn export_pdf(&self) -> Outcome {
        let started = self.begin(Workflow::PdfExport, |state| {
            state
                .results
                .meal_plan
                .clone()
                .ok_or(ValidationFailure::MissingMealPlan)
        });
        let (plan, flight) = match started {
            Ok(started) => started,
            Err(rejected) => return rejected,
        };

        let fetched = self.app.api.export_pdf(&plan).await;
        if !flight.is_current() {
            return self.finish(flight, fetched.map(drop), |_, ()| {});
        }
        let saved = match fetched {
            Ok(pdf) => self
                .app
                .downloads
                .save(PDF_FILE_NAME, pdf)
                .await
                .map_err(|e| RemoteFailure::Download(format!("{e:#}"))),
            Err(err) => Err(err),
        };
        self.finish(flight, saved, |state, path| state.last_download = Some(path))
    }

    /// Probes the service; not a workflow, so it leaves state alone.
    pub async fn check_service(&self) -> Result<HealthStatus, RemoteFailure> {
        self.app.api.health().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::analysis::{AnalysisResult, NutritionTotals};
    use crate::api::fake::{Endpoint, FakeApi, Reply};
    use crate::meal_plan::MealPlan;
    use crate::state::testing::MemorySink;

    fn session() -> (Session, Arc<FakeApi>, Arc<MemorySink>) {
        let api = Arc::new(FakeApi::new());
        let sink = Arc::new(MemorySink::default());
        let app = AppState::fake(Arc::clone(&api), Arc::clone(&sink));
        (Session::new(app), api, sink)
    }

    fn with_age(session: &Session) {
        session.set_profile_field(ProfileField::Age(Some(30)));
    }

    fn analysis(foods: &str, calories: f64) -> AnalysisResult {
        AnalysisResult {
            identified_foods: Some(foods.into()),
            nutrition: NutritionTotals {
                calories: Some(calories),
                ..NutritionTotals::default()
            },
            ..AnalysisResult::default()
        }
    }

    fn png(session: &Session) {
        session
            .select_image("plate.png", "image/png", Bytes::from_static(b"png"))
            .unwrap();
    }

    #[tokio::test]
    async fn every_workflow_refuses_without_age() {
        let (session, api, _) = session();
        session.set_ingredients("rice");
        png(&session);

        assert!(matches!(
            session.analyze_ingredients().await,
            Outcome::Rejected(ValidationFailure::MissingAge)
        ));
        assert!(matches!(
            session.analyze_photo().await,
            Outcome::Rejected(ValidationFailure::MissingAge)
        ));
        assert!(matches!(
            session.generate_meal_plan().await,
            Outcome::Rejected(ValidationFailure::MissingAge)
        ));
        assert!(matches!(
            session.export_pdf().await,
            Outcome::Rejected(ValidationFailure::MissingMealPlan)
        ));

        assert!(api.calls().is_empty());
        let state = session.snapshot();
        assert!(!state.is_busy());
        assert!(Workflow::ALL
            .iter()
            .all(|w| state.workflows.status(*w) == WorkflowStatus::Idle));
    }

    #[tokio::test]
    async fn blank_ingredients_are_rejected_with_a_notice() {
        let (session, api, _) = session();
        with_age(&session);
        session.set_ingredients(" \n \n");
        session.take_notifications();

        let outcome = session.analyze_ingredients().await;
        assert!(matches!(
            outcome,
            Outcome::Rejected(ValidationFailure::MissingIngredients)
        ));
        assert!(api.calls().is_empty());

        let notes = session.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].message, "Please fill in all required fields");
    }

    #[tokio::test]
    async fn ingredient_analysis_sends_trimmed_lines_and_shows_dashboard() {
        let (session, api, _) = session();
        with_age(&session);
        session.set_ingredients("  chicken breast\n\nrice  \n");
        api.reply(Reply::Analysis(analysis("typed", 295.0)));

        assert!(session.analyze_ingredients().await.is_completed());
        assert_eq!(
            api.last_ingredients(),
            Some(vec!["chicken breast".to_string(), "rice".to_string()])
        );

        let state = session.snapshot();
        assert_eq!(state.results.analysis, Some(analysis("typed", 295.0)));
        assert_eq!(state.navigation.view, View::Dashboard);
        assert!(!state.is_busy());
        assert!(matches!(
            state.workflows.status(Workflow::IngredientAnalysis),
            WorkflowStatus::Succeeded { .. }
        ));

        let notes = session.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Analysis complete!");
    }

    #[tokio::test]
    async fn photo_analysis_replaces_the_previous_result() {
        let (session, api, _) = session();
        with_age(&session);
        session.set_ingredients("rice");
        png(&session);

        api.reply(Reply::Analysis(AnalysisResult {
            percentage_of_daily: Some(12.0),
            ..analysis("typed", 300.0)
        }));
        session.analyze_ingredients().await;
        session.select_view(View::Profile);

        api.reply(Reply::Analysis(analysis("photo", 520.0)));
        assert!(session.analyze_photo().await.is_completed());

        let state = session.snapshot();
        assert_eq!(state.results.analysis, Some(analysis("photo", 520.0)));
        assert_eq!(state.navigation.view, View::Dashboard);
        assert_eq!(
            api.calls(),
            vec![Endpoint::AnalyzeIngredients, Endpoint::AnalyzePhoto]
        );
    }

    #[tokio::test]
    async fn photo_analysis_needs_a_selected_image() {
        let (session, api, _) = session();
        with_age(&session);
        assert!(matches!(
            session.analyze_photo().await,
            Outcome::Rejected(ValidationFailure::MissingImage)
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn non_image_selection_keeps_the_previous_image() {
        let (session, _, _) = session();
        png(&session);

        let err = session
            .select_image("menu.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
            .unwrap_err();
        assert!(matches!(err, ValidationFailure::NotAnImage { .. }));

        let image = session.snapshot().image.unwrap();
        assert_eq!(image.file_name(), "plate.png");

        let levels: Vec<_> = session
            .take_notifications()
            .into_iter()
            .map(|n| n.level)
            .collect();
        assert_eq!(levels, vec![Level::Success, Level::Error]);
    }

    #[tokio::test]
    async fn meal_plan_derives_grocery_list() {
        let (session, api, _) = session();
        with_age(&session);
        api.reply(Reply::Plan(MealPlan::new(
            "- chicken breast\n- chicken breast\nNotes: see above\n- rice",
        )));

        assert!(session.generate_meal_plan().await.is_completed());
        let state = session.snapshot();
        assert_eq!(state.results.grocery_list, vec!["chicken breast", "rice"]);
        assert_eq!(state.navigation.view, View::Dashboard);
    }

    #[tokio::test]
    async fn failed_meal_plan_leaves_plan_and_list_untouched() {
        let (session, api, _) = session();
        with_age(&session);
        api.reply(Reply::Plan(MealPlan::new("- oats\n- banana")));
        session.generate_meal_plan().await;
        session.select_view(View::GroceryGuide);
        let before = session.snapshot();

        api.reply(Reply::Status(500));
        let outcome = session.generate_meal_plan().await;
        assert!(matches!(outcome, Outcome::Failed(ref e) if e.status() == Some(500)));

        let after = session.snapshot();
        assert_eq!(after.results, before.results);
        assert_eq!(after.navigation.view, View::GroceryGuide);
        assert!(!after.is_busy());
        assert!(matches!(
            after.workflows.status(Workflow::MealPlan),
            WorkflowStatus::Failed { .. }
        ));

        let last = session.take_notifications().pop().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.message, "Failed to generate meal plan");
    }

    #[tokio::test]
    async fn workflow_can_be_retried_after_failure() {
        let (session, api, _) = session();
        with_age(&session);
        api.reply(Reply::Status(503));
        api.reply(Reply::Plan(MealPlan::new("- lentils")));

        assert!(matches!(session.generate_meal_plan().await, Outcome::Failed(_)));
        assert!(session.generate_meal_plan().await.is_completed());
        assert_eq!(session.snapshot().results.grocery_list, vec!["lentils"]);
    }

    #[tokio::test]
    async fn pdf_export_saves_meal_plan_pdf_without_navigating() {
        let (session, api, sink) = session();
        with_age(&session);
        api.reply(Reply::Plan(MealPlan::new("- tofu")));
        session.generate_meal_plan().await;
        session.select_view(View::Profile);

        api.reply(Reply::Pdf(Bytes::from_static(b"%PDF-1.4")));
        assert!(session.export_pdf().await.is_completed());

        let saved = sink.saved.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "meal_plan.pdf");
        assert_eq!(&saved[0].1[..], b"%PDF-1.4");

        let state = session.snapshot();
        assert_eq!(state.navigation.view, View::Profile);
        assert_eq!(
            state.last_download,
            Some(PathBuf::from("memory").join("meal_plan.pdf"))
        );
    }

    #[tokio::test]
    async fn pdf_export_reports_sink_failures() {
        let api = Arc::new(FakeApi::new());
        let sink = Arc::new(MemorySink {
            fail: true,
            ..MemorySink::default()
        });
        let session = Session::new(AppState::fake(Arc::clone(&api), sink));
        with_age(&session);
        api.reply(Reply::Plan(MealPlan::new("- tofu")));
        session.generate_meal_plan().await;

        api.reply(Reply::Pdf(Bytes::from_static(b"%PDF")));
        let outcome = session.export_pdf().await;
        assert!(matches!(outcome, Outcome::Failed(RemoteFailure::Download(_))));
        assert!(!session.is_busy());
        assert_eq!(session.snapshot().last_download, None);
    }

    #[tokio::test]
    async fn busy_while_a_request_is_in_flight() {
        let (session, api, _) = session();
        with_age(&session);
        let release = api.reply_after(Reply::Plan(MealPlan::new("- rice")));

        let probe = async {
            tokio::task::yield_now().await;
            let busy = session.is_busy();
            let status = session.status(Workflow::MealPlan);
            release.send(()).unwrap();
            (busy, status)
        };
        let (outcome, (busy, status)) = tokio::join!(session.generate_meal_plan(), probe);

        assert!(outcome.is_completed());
        assert!(busy);
        assert!(status.is_running());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let (session, api, _) = session();
        with_age(&session);
        let release_first = api.reply_after(Reply::Plan(MealPlan::new("- first")));
        api.reply(Reply::Plan(MealPlan::new("- second")));

        let release = async {
            tokio::task::yield_now().await;
            release_first.send(()).unwrap();
        };
        let (first, second, ()) = tokio::join!(
            session.generate_meal_plan(),
            session.generate_meal_plan(),
            release
        );

        assert!(matches!(first, Outcome::Superseded));
        assert!(second.is_completed());
        let state = session.snapshot();
        assert_eq!(state.results.grocery_list, vec!["second"]);
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn different_workflows_run_side_by_side() {
        let (session, api, _) = session();
        with_age(&session);
        png(&session);
        let release_photo = api.reply_after(Reply::Analysis(analysis("photo", 400.0)));
        api.reply(Reply::Plan(MealPlan::new("- quinoa")));

        let release = async {
            tokio::task::yield_now().await;
            release_photo.send(()).unwrap();
        };
        let (photo, plan, ()) =
            tokio::join!(session.analyze_photo(), session.generate_meal_plan(), release);

        assert!(photo.is_completed());
        assert!(plan.is_completed());
        let state = session.snapshot();
        assert_eq!(state.results.analysis, Some(analysis("photo", 400.0)));
        assert_eq!(state.results.grocery_list, vec!["quinoa"]);
    }

    #[tokio::test]
    async fn cancelled_request_does_not_write_back() {
        let (session, api, _) = session();
        with_age(&session);
        let release = api.reply_after(Reply::Plan(MealPlan::new("- late")));

        let cancel = async {
            tokio::task::yield_now().await;
            let cancelled = session.cancel(Workflow::MealPlan);
            release.send(()).unwrap();
            cancelled
        };
        let (outcome, cancelled) = tokio::join!(session.generate_meal_plan(), cancel);

        assert!(cancelled);
        assert!(matches!(outcome, Outcome::Superseded));
        let state = session.snapshot();
        assert_eq!(state.results.meal_plan, None);
        assert_eq!(state.workflows.status(Workflow::MealPlan), WorkflowStatus::Idle);

        let notes = session.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].key, Some(Workflow::MealPlan));
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].message, "Meal plan generation cancelled");
    }

    #[tokio::test]
    async fn cancelled_pdf_export_writes_nothing() {
        let (session, api, sink) = session();
        with_age(&session);
        api.reply(Reply::Plan(MealPlan::new("- tofu")));
        session.generate_meal_plan().await;
        let release = api.reply_after(Reply::Pdf(Bytes::from_static(b"%PDF-late")));

        let cancel = async {
            tokio::task::yield_now().await;
            let cancelled = session.cancel(Workflow::PdfExport);
            release.send(()).unwrap();
            cancelled
        };
        let (outcome, cancelled) = tokio::join!(session.export_pdf(), cancel);

        assert!(cancelled);
        assert!(matches!(outcome, Outcome::Superseded));
        assert!(sink.saved.lock().unwrap().is_empty());
        assert_eq!(session.snapshot().last_download, None);
    }

    #[tokio::test]
    async fn older_pdf_export_never_overwrites_the_newer_file() {
        let (session, api, sink) = session();
        with_age(&session);
        api.reply(Reply::Plan(MealPlan::new("- tofu")));
        session.generate_meal_plan().await;
        let release_first = api.reply_after(Reply::Pdf(Bytes::from_static(b"%PDF-old")));
        api.reply(Reply::Pdf(Bytes::from_static(b"%PDF-new")));

        let release = async {
            tokio::task::yield_now().await;
            release_first.send(()).unwrap();
        };
        let (first, second, ()) =
            tokio::join!(session.export_pdf(), session.export_pdf(), release);

        assert!(matches!(first, Outcome::Superseded));
        assert!(second.is_completed());
        let saved = sink.saved.lock().unwrap().clone();
        assert_eq!(saved.len(), 1);
        assert_eq!(&saved[0].1[..], b"%PDF-new");
    }

    #[tokio::test]
    async fn dropping_an_action_releases_busy() {
        let (session, api, _) = session();
        with_age(&session);
        let _release = api.reply_after(Reply::Plan(MealPlan::new("- never")));

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            session.generate_meal_plan(),
        )
        .await;

        assert!(timed_out.is_err());
        assert!(!session.is_busy());
        assert_eq!(session.status(Workflow::MealPlan), WorkflowStatus::Idle);
        assert!(session
            .take_notifications()
            .iter()
            .all(|n| n.key != Some(Workflow::MealPlan)));
    }

    #[tokio::test]
    async fn profile_and_overlay_mutations_are_independent() {
        let (session, _, _) = session();
        session.toggle_allergy(Allergen::Gluten);
        session.open_overlay();
        session.set_profile_field(ProfileField::NumMeals(5));

        let state = session.snapshot();
        assert_eq!(state.profile.allergies, vec![Allergen::Gluten]);
        assert_eq!(state.profile.num_meals, 5);
        assert!(state.navigation.ingredient_overlay);
        assert_eq!(state.navigation.view, View::Scan);

        session.close_overlay();
        session.clear_image();
        assert!(!session.snapshot().navigation.ingredient_overlay);
    }

    #[tokio::test]
    async fn check_service_goes_straight_to_the_api() {
        let (session, api, _) = session();
        let health = session.check_service().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(api.calls(), vec![Endpoint::Health]);
        assert!(session.take_notifications().is_empty());
    }
}
