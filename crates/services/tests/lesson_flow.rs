use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use maglab_core::model::{LearnerProfile, LessonPage, QuizVerdict, SessionState, fields};
use maglab_core::time::fixed_clock;
use services::{
    AppServices, ChatCompletion, LessonServiceError, LogSchema, NoticeLevel, QuizBank,
    ServiceOptions, TutorError, TutorPrompt, TutorService,
};

/// Answers every prompt with a canned line and remembers what it was asked.
#[derive(Default)]
struct ScriptedTutor {
    seen: Mutex<Vec<TutorPrompt>>,
}

#[async_trait]
impl ChatCompletion for ScriptedTutor {
    fn enabled(&self) -> bool {
        true
    }

    async fn complete(&self, prompt: &TutorPrompt) -> Result<String, TutorError> {
        self.seen.lock().unwrap().push(prompt.clone());
        Ok(format!("reply to: {}", prompt.user.lines().next().unwrap_or_default()))
    }
}

fn services_with(tutor: Arc<ScriptedTutor>, schema: LogSchema) -> AppServices {
    let options = ServiceOptions {
        schema,
        quizzes: QuizBank::bundled().unwrap(),
        ..ServiceOptions::default()
    };
    AppServices::in_memory(fixed_clock(), TutorService::new(tutor), options).unwrap()
}

fn registered_session(services: &AppServices) -> SessionState {
    let mut state = SessionState::new(services.catalog(), services.clock());
    state
        .register_profile(LearnerProfile::new("20301", "Kim", "3"))
        .unwrap();
    state
}

#[tokio::test]
async fn report_submission_logs_a_row_and_locks_the_page() {
    let tutor = Arc::new(ScriptedTutor::default());
    let services = services_with(Arc::clone(&tutor), LogSchema::Nine);
    let lessons = services.lessons();
    let mut state = registered_session(&services);

    let texts = ["method".to_string(), "relation".into(), "idea".into()];
    let outcome = lessons.submit_report(&state, texts.clone()).await.unwrap();
    let notices = lessons.commit(&mut state, outcome).await.unwrap();
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Success));

    let step = LessonPage::Report.step_id();
    assert!(state.is_submitted(&step));
    assert_eq!(state.answer(&step, fields::TEXT2), Some("relation"));
    assert!(state.answer(&step, fields::FEEDBACK).unwrap().starts_with("reply to:"));

    let rows = services.activity().recent(10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.fields.len(), 9);
    assert_eq!(&row.fields[..3], ["20301", "Kim", "3"]);
    assert!(row.fields[3].starts_with("report submitted ("));
    assert_eq!(&row.fields[4..7], ["method", "relation", "idea"]);
    assert!(row.fields[7].starts_with("reply to:"));
    assert_eq!(row.fields[8], "");

    let again = lessons.submit_report(&state, texts).await;
    assert!(matches!(again, Err(LessonServiceError::Session(_))));
}

#[tokio::test]
async fn inquiry_transcript_fills_the_ninth_column() {
    let tutor = Arc::new(ScriptedTutor::default());
    let services = services_with(tutor, LogSchema::Nine);
    let lessons = services.lessons();
    let mut state = registered_session(&services);

    let outcome = lessons
        .send_chat(&state, LessonPage::Inquiry, "Why does the needle turn?")
        .await
        .unwrap();
    lessons.commit(&mut state, outcome).await.unwrap();
    assert_eq!(state.transcript(&LessonPage::Inquiry.step_id()).len(), 2);

    let outcome = lessons.save_inquiry(&state);
    let notices = lessons.commit(&mut state, outcome).await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);

    let rows = services.activity().recent(10).await.unwrap();
    let last = &rows[0].fields[8];
    assert!(last.starts_with("[student]\nWhy does the needle turn?\n\n---\n\n[tutor]\n"));
}

#[tokio::test]
async fn eight_column_sink_drops_the_transcript() {
    let services = services_with(Arc::new(ScriptedTutor::default()), LogSchema::Eight);
    let lessons = services.lessons();
    let mut state = registered_session(&services);

    let outcome = lessons
        .send_chat(&state, LessonPage::Inquiry, "hello")
        .await
        .unwrap();
    lessons.commit(&mut state, outcome).await.unwrap();
    let outcome = lessons.save_inquiry(&state);
    lessons.commit(&mut state, outcome).await.unwrap();

    let rows = services.activity().recent(10).await.unwrap();
    assert_eq!(rows[0].fields.len(), 8);
}

#[tokio::test]
async fn wrap_up_logs_each_message_with_the_roster_tag() {
    let services = services_with(Arc::new(ScriptedTutor::default()), LogSchema::Nine);
    let lessons = services.lessons();
    let mut state = registered_session(&services);

    for message in ["It was fun", "Solenoids were hard"] {
        let outcome = lessons
            .send_chat(&state, LessonPage::WrapUp, message)
            .await
            .unwrap();
        lessons.commit(&mut state, outcome).await.unwrap();
    }

    assert_eq!(state.transcript(&LessonPage::WrapUp.step_id()).len(), 5);
    let rows = services.activity().recent(10).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].fields[3].starts_with("20301 Kim ("));
    assert_eq!(rows[0].fields[7], "feedback: Solenoids were hard");
    assert_eq!(rows[1].fields[7], "feedback: It was fun");
}

#[tokio::test]
async fn observation_feedback_uses_the_stored_observation() {
    let tutor = Arc::new(ScriptedTutor::default());
    let services = services_with(Arc::clone(&tutor), LogSchema::Nine);
    let lessons = services.lessons();
    let mut state = registered_session(&services);
    let step = LessonPage::ExperimentSolenoid.step_id();

    state
        .record_answer(&step, fields::OBSERVATION, "filings line up inside")
        .unwrap();
    let outcome = lessons
        .observation_feedback(&state, LessonPage::ExperimentSolenoid)
        .await
        .unwrap();
    lessons.commit(&mut state, outcome).await.unwrap();

    assert!(state.answer(&step, fields::FEEDBACK).is_some());
    let seen = tutor.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].user.ends_with("filings line up inside"));
    assert_eq!(seen[0].max_tokens, 300);
}

#[tokio::test]
async fn quiz_check_is_recorded_without_logging() {
    let services = services_with(Arc::new(ScriptedTutor::default()), LogSchema::Nine);
    let lessons = services.lessons();
    let mut state = registered_session(&services);

    let verdict = lessons
        .check_quiz(&mut state, LessonPage::ExamProblem, Some("1"))
        .unwrap();
    assert_eq!(verdict, QuizVerdict::Correct);
    assert_eq!(services.activity().recent(10).await.unwrap().len(), 0);
}
