use maglab_core::model::{ChatTurn, LearnerProfile, LessonPage, SessionCommand, fields};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_seed};

fn record(page: LessonPage, field: &str, value: &str) -> SessionCommand {
    SessionCommand::record(page.step_id(), field, value)
}

#[tokio::test(flavor = "current_thread")]
async fn home_page_renders_intro_chat_and_nav() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::Home));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Oersted"), "missing intro in {html}");
    assert!(html.contains("Ask Phi-Bot"), "missing chat heading in {html}");
    assert!(html.contains("1 / 15"), "missing page count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn goals_pages_show_their_own_unit() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::GoalsTwo));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Period 2"), "missing unit tag in {html}");
    assert!(html.contains("everyday devices"), "missing unit 2 goals in {html}");
    assert!(!html.contains("circular loop and a solenoid"), "unit 1 goals leaked into {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn simulation_page_plots_both_layouts() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::Simulation));
    harness.rebuild();
    let html = harness.render();
    assert_eq!(html.matches("class=\"field-plot\"").count(), 2, "plots in {html}");
    assert!(html.contains("pole-n"), "missing pole marker in {html}");
    assert!(html.contains("S-N (attract)"), "missing arrangement option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_page_shows_explanation_after_wrong_answer() {
    let page = LessonPage::BasicQuizTwo;
    let mut harness = setup_view_harness_with_seed(
        ViewKind::Lesson(page),
        vec![
            record(page, fields::RESPONSE, "0"),
            record(page, fields::VERDICT, "incorrect"),
        ],
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("rheostat"), "missing prompt in {html}");
    assert!(html.contains("Not quite"), "missing verdict in {html}");
    assert!(html.contains("Solution"), "missing explanation in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unanswered_quiz_hides_explanation() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::WorkedExample));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Check answer"), "missing check button in {html}");
    assert!(!html.contains("Younghee: "), "explanation shown early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn experiment_page_shows_stored_feedback() {
    let page = LessonPage::ExperimentLoop;
    let mut harness = setup_view_harness_with_seed(
        ViewKind::Lesson(page),
        vec![
            record(page, fields::OBSERVATION, "The N pole turned toward me."),
            record(page, fields::FEEDBACK, "Well observed."),
        ],
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Experiment 2"), "missing heading in {html}");
    assert!(html.contains("Tutor feedback"), "missing feedback block in {html}");
    assert!(html.contains("Well observed."), "missing feedback text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn open_report_offers_submission() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::Report));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Submit report"), "missing submit button in {html}");
    assert!(!html.contains("Download .txt"), "export offered before submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn submitted_report_is_read_only_with_exports() {
    let page = LessonPage::Report;
    let step = page.step_id();
    let mut seed = vec![SessionCommand::Register(LearnerProfile::new("20301", "Kim", "3"))];
    seed.extend(
        fields::REPORT_TEXTS
            .iter()
            .zip(["method", "relation", "reflection"])
            .map(|(field, text)| record(page, field, text)),
    );
    seed.push(record(page, fields::FEEDBACK, "Clear and complete."));
    seed.push(SessionCommand::SubmitFinal(step));

    let mut harness = setup_view_harness_with_seed(ViewKind::Lesson(page), seed);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("It is now read-only"), "missing locked notice in {html}");
    assert!(html.contains("relation"), "missing section text in {html}");
    assert!(html.contains("Download .txt"), "missing text export in {html}");
    assert!(html.contains("Download .pdf"), "missing pdf slot in {html}");
    assert!(!html.contains("Submit report"), "submit still offered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn theory_page_reports_computed_fields() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::Theory));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Field at the center: 1.33"), "missing loop field in {html}");
    assert!(html.contains("up, out of the loop plane"), "missing loop direction in {html}");
    assert!(html.contains("Field inside: 30.0"), "missing solenoid field in {html}");
    assert!(html.contains("counter-clockwise"), "missing wire sense in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn inquiry_page_lists_transcript_and_save() {
    let step = LessonPage::Inquiry.step_id();
    let mut harness = setup_view_harness_with_seed(
        ViewKind::Lesson(LessonPage::Inquiry),
        vec![
            SessionCommand::AppendChat {
                step: step.clone(),
                turn: ChatTurn::student("How does a speaker move?"),
            },
            SessionCommand::AppendChat {
                step,
                turn: ChatTurn::tutor("The coil sits in a magnet field."),
            },
        ],
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("How does a speaker move?"), "missing student turn in {html}");
    assert!(html.contains("The coil sits in a magnet field."), "missing tutor turn in {html}");
    assert!(html.contains("Save discussion"), "missing save button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn wrap_up_opens_with_greeting() {
    let mut harness = setup_view_harness(ViewKind::Lesson(LessonPage::WrapUp));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("How was today"), "missing greeting in {html}");
    assert!(html.contains("Save conversation"), "missing export button in {html}");
    assert!(html.contains("15 / 15"), "missing page count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_lists_logged_rows() {
    let mut harness = setup_view_harness(ViewKind::History);
    let stored = harness
        .services
        .activity()
        .append_row(
            &LessonPage::Report.step_id(),
            ["20301", "Kim", "3", "report submitted", "a", "b", "c", "Nice work"]
                .map(String::from)
                .to_vec(),
        )
        .await;
    assert!(stored);

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("20301 Kim"), "missing student in {html}");
    assert!(html.contains("report submitted"), "missing activity in {html}");
    assert!(html.contains("Nice work"), "missing preview in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_without_rows_says_so() {
    let mut harness = setup_view_harness(ViewKind::History);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No activity recorded yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn settings_view_shows_tutor_and_log_status() {
    let mut harness = setup_view_harness(ViewKind::Settings);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Status: Connected"), "missing tutor status in {html}");
    assert!(html.contains("9 columns"), "missing log schema in {html}");
    assert!(html.contains("maglab-ui-tests"), "missing export dir in {html}");
}
