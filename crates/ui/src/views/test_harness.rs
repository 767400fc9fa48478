use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use assess_core::model::{
    DetailedResult, EvaluationResult, IndexedAnswer, ProgressInsights, Question, SessionConfig,
    TestCase, TrialRunReport, UserProfile,
};
use assess_core::time::fixed_now;
use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    ActivityService, AppServices, AssessmentService, Clock, EvaluationClient,
    EvaluationClientError, InsightsService, ResultService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::session::SessionTestHandles;
use crate::views::{AnalyticsView, HistoryView, HomeView, ResultView, SessionView};

/// Evaluation service double with canned answers.
pub struct FakeClient {
    pub insights_fail: AtomicBool,
}

impl FakeClient {
    fn new() -> Self {
        Self {
            insights_fail: AtomicBool::new(false),
        }
    }
}

pub fn two_questions() -> Vec<Question> {
    vec![
        Question::multiple_choice("Which keyword declares a constant?", ["let", "const"]),
        Question::multiple_choice("Which type owns heap text?", ["&str", "String"]),
    ]
}

pub fn sample_result() -> EvaluationResult {
    let row = |question: &str, correct: bool| DetailedResult {
        question: question.into(),
        user_answer: "let".into(),
        is_correct: correct,
        explanation: "See the **book**.".into(),
        correct_answer: Some("const".into()),
        model_solution: None,
        rubric: None,
    };
    EvaluationResult::new(
        67,
        "Good progress",
        vec![row("Q1", true), row("Q2", true), row("Q3", false)],
    )
}

#[async_trait]
impl EvaluationClient for FakeClient {
    async fn generate_assessment_questions(
        &self,
        _config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError> {
        Ok(two_questions())
    }

    async fn generate_dynamic_quiz(
        &self,
        _config: &SessionConfig,
    ) -> Result<Vec<Question>, EvaluationClientError> {
        Ok(two_questions())
    }

    async fn evaluate_assessment(
        &self,
        _questions: &[Question],
        _answers: &[IndexedAnswer],
        _config: &SessionConfig,
    ) -> Result<EvaluationResult, EvaluationClientError> {
        Ok(sample_result())
    }

    async fn evaluate_code_against_test_cases(
        &self,
        _code: &str,
        _language: &str,
        test_cases: &[TestCase],
    ) -> Result<TrialRunReport, EvaluationClientError> {
        Ok(TrialRunReport {
            success: true,
            error: None,
            test_results: Vec::with_capacity(test_cases.len()),
        })
    }

    async fn get_concept_explanation(
        &self,
        question_text: &str,
    ) -> Result<String, EvaluationClientError> {
        Ok(format!("*Explained:* {question_text}"))
    }

    async fn generate_user_progress_insights(
        &self,
        _profile: &UserProfile,
    ) -> Result<ProgressInsights, EvaluationClientError> {
        if self.insights_fail.load(Ordering::SeqCst) {
            return Err(EvaluationClientError::EmptyResponse);
        }
        Ok(ProgressInsights {
            progress_summary: "Steady improvement".into(),
            language_analysis: String::new(),
            inactivity_analysis: String::new(),
            next_steps: vec!["Try an advanced quiz".into()],
        })
    }
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn activities(&self) -> Arc<ActivityService> {
        self.services.activities()
    }

    fn results(&self) -> Arc<ResultService> {
        self.services.results()
    }

    fn insights(&self) -> Arc<InsightsService> {
        self.services.insights()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    Home,
    Session(Option<SessionConfig>),
    Result(i64),
    History,
    Analytics,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    session_handles: SessionTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let pending = match &props.view {
        ViewKind::Session(config) => config.clone(),
        _ => None,
    };
    use_context_provider(|| {
        let context = build_app_context(&app);
        if let Some(config) = pending {
            context.set_pending_config(config);
        }
        context
    });
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.session_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Session(_) => rsx! { SessionView {} },
        ViewKind::Result(result_id) => rsx! { ResultView { result_id } },
        ViewKind::History => rsx! { HistoryView {} },
        ViewKind::Analytics => rsx! { AnalyticsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub session_handles: SessionTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive pending tasks until the rendered HTML contains `needle`.
    pub async fn drive_until(&mut self, needle: &str) -> String {
        let mut html = self.render();
        for _ in 0..20 {
            if html.contains(needle) {
                break;
            }
            self.drive_async().await;
            html = self.render();
        }
        html
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Build services over fresh in-memory storage. Seed data before calling
/// [`mount`] so the first render sees it.
pub fn test_services() -> (AppServices, Storage, Arc<FakeClient>) {
    let storage = Storage::in_memory();
    let client = Arc::new(FakeClient::new());
    let services = AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        Arc::clone(&client) as Arc<dyn EvaluationClient>,
    );
    (services, storage, client)
}

pub fn mount(view: ViewKind, services: AppServices, storage: Storage) -> ViewHarness {
    let session_handles = SessionTestHandles::default();
    let app = Arc::new(TestApp { services });
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            session_handles: session_handles.clone(),
        },
    );
    ViewHarness {
        dom,
        storage,
        session_handles,
    }
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let (services, storage, _client) = test_services();
    mount(view, services, storage)
}
