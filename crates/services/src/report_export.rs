use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use maglab_core::model::{ChatTurn, LessonPage, SessionState, fields};
use tracing::info;

use crate::error::ExportError;

/// Short section headings used in exported reports.
pub const REPORT_HEADINGS: [&str; 3] = [
    "(1) Experiment method summary",
    "(2) Factors and their relationship",
    "(3) Ideas and reflections",
];

const RULE: &str = "----------------------------------------";

/// Snapshot of a submitted report, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub student_id: String,
    pub name: String,
    pub class_group: String,
    pub sections: [String; 3],
    pub feedback: String,
}

impl ReportDocument {
    /// Collect the report fields from `state`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Session` with `NotSubmitted` until the report step
    /// has been submitted.
    pub fn from_session(state: &SessionState) -> Result<Self, ExportError> {
        let step = LessonPage::Report.step_id();
        state.require_submitted(&step)?;

        let profile = state.profile().cloned().unwrap_or_default();
        let sections = fields::REPORT_TEXTS.map(|field| state.answer_or_empty(&step, field).to_owned());
        Ok(Self {
            student_id: profile.student_id,
            name: profile.name,
            class_group: profile.class_group,
            sections,
            feedback: state.answer_or_empty(&step, fields::FEEDBACK).to_owned(),
        })
    }

    fn student_id_or(&self, fallback: &'static str) -> &str {
        if self.student_id.is_empty() {
            fallback
        } else {
            &self.student_id
        }
    }
}

/// A report output format.
pub trait ReportExporter: Send + Sync {
    fn format(&self) -> &'static str;

    fn enabled(&self) -> bool;

    fn file_name(&self, doc: &ReportDocument) -> String;

    /// # Errors
    ///
    /// Returns `ExportError` if the format is unavailable or rendering fails.
    fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>, ExportError>;
}

/// UTF-8 plain text report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExporter;

impl PlainTextExporter {
    #[must_use]
    pub fn render_text(doc: &ReportDocument) -> String {
        let mut out = String::new();
        out.push_str("===== Magnetic Field of Electric Current: Final Report =====\n");
        out.push_str(&format!("Student ID: {}\n", doc.student_id_or("not entered")));
        let name = if doc.name.is_empty() { "not entered" } else { doc.name.as_str() };
        out.push_str(&format!("Name: {name}\n\n"));
        out.push_str(RULE);
        out.push_str("\n\n");
        for (heading, text) in REPORT_HEADINGS.iter().zip(&doc.sections) {
            out.push_str(&format!("## {heading}\n{text}\n\n"));
        }
        out.push_str(RULE);
        out.push_str("\n\n");
        out.push_str(&format!("## Tutor feedback\n{}\n", doc.feedback));
        out
    }
}

impl ReportExporter for PlainTextExporter {
    fn format(&self) -> &'static str {
        "txt"
    }

    fn enabled(&self) -> bool {
        true
    }

    fn file_name(&self, doc: &ReportDocument) -> String {
        format!("report_{}.txt", doc.student_id_or("student"))
    }

    fn render(&self, doc: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        Ok(Self::render_text(doc).into_bytes())
    }
}

/// PDF slot; no renderer ships with the app.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPdfExporter;

impl ReportExporter for DisabledPdfExporter {
    fn format(&self) -> &'static str {
        "pdf"
    }

    fn enabled(&self) -> bool {
        false
    }

    fn file_name(&self, doc: &ReportDocument) -> String {
        format!("report_{}.pdf", doc.student_id_or("student"))
    }

    fn render(&self, _doc: &ReportDocument) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Unsupported("pdf"))
    }
}

/// Render `doc` and write it into `dir`, returning the written path.
///
/// # Errors
///
/// Returns `ExportError` if rendering or writing fails.
pub fn write_report(
    exporter: &dyn ReportExporter,
    doc: &ReportDocument,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let bytes = exporter.render(doc)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(exporter.file_name(doc));
    fs::write(&path, bytes)?;
    info!(path = %path.display(), format = exporter.format(), "report exported");
    Ok(path)
}

/// Wrap-up conversation as `[ROLE]` blocks under a dated header.
#[must_use]
pub fn transcript_text(turns: &[ChatTurn], at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&Local);
    let mut out = format!(
        "===== Magnetic field wrap-up ({}) =====\n\n",
        local.format("%Y-%m-%d %H:%M")
    );
    for turn in turns {
        out.push_str(&format!(
            "[{}]\n{}\n\n",
            turn.role.as_str().to_uppercase(),
            turn.text
        ));
    }
    out
}

#[must_use]
pub fn transcript_file_name(at: DateTime<Utc>) -> String {
    format!("feedback_{}.txt", at.with_timezone(&Local).format("%Y%m%d"))
}

/// Write the wrap-up transcript into `dir`.
///
/// # Errors
///
/// Returns `ExportError::Io` if the file cannot be written.
pub fn write_transcript(
    turns: &[ChatTurn],
    at: DateTime<Utc>,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(transcript_file_name(at));
    fs::write(&path, transcript_text(turns, at))?;
    info!(path = %path.display(), "transcript exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use maglab_core::model::{LearnerProfile, SessionError, lesson_catalog};
    use maglab_core::time::{fixed_clock, fixed_now};

    fn submitted_session() -> SessionState {
        let mut state = SessionState::new(Arc::new(lesson_catalog().unwrap()), fixed_clock());
        let step = LessonPage::Report.step_id();
        state
            .register_profile(LearnerProfile::new("20301", "Kim", "3"))
            .unwrap();
        for (field, value) in fields::REPORT_TEXTS.iter().zip(["m", "r", "i"]) {
            state.record_answer(&step, field, value).unwrap();
        }
        state.record_answer(&step, fields::FEEDBACK, "good").unwrap();
        state.submit_final(&step).unwrap();
        state
    }

    #[test]
    fn export_requires_submission() {
        let state = SessionState::new(Arc::new(lesson_catalog().unwrap()), fixed_clock());
        let err = ReportDocument::from_session(&state).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Session(SessionError::NotSubmitted(_))
        ));
    }

    #[test]
    fn text_report_has_sections_and_feedback() {
        let doc = ReportDocument::from_session(&submitted_session()).unwrap();
        let text = PlainTextExporter::render_text(&doc);
        assert!(text.contains("Student ID: 20301"));
        assert!(text.contains("## (2) Factors and their relationship\nr\n"));
        assert!(text.ends_with("## Tutor feedback\ngood\n"));
        assert_eq!(PlainTextExporter.file_name(&doc), "report_20301.txt");
    }

    #[test]
    fn pdf_is_disabled() {
        let doc = ReportDocument::from_session(&submitted_session()).unwrap();
        assert!(!DisabledPdfExporter.enabled());
        assert!(matches!(
            DisabledPdfExporter.render(&doc),
            Err(ExportError::Unsupported("pdf"))
        ));
    }

    #[test]
    fn transcript_uses_uppercase_roles() {
        let turns = vec![ChatTurn::tutor("Hello!"), ChatTurn::student("It was fun")];
        let text = transcript_text(&turns, fixed_now());
        assert!(text.starts_with("===== Magnetic field wrap-up ("));
        assert!(text.contains("[TUTOR]\nHello!\n\n[STUDENT]\nIt was fun\n\n"));
    }

    #[test]
    fn writes_report_file() {
        let dir = std::env::temp_dir().join(format!("maglab-export-{}", std::process::id()));
        let doc = ReportDocument::from_session(&submitted_session()).unwrap();
        let path = write_report(&PlainTextExporter, &doc, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "report_20301.txt");
        assert!(fs::read_to_string(&path).unwrap().contains("Name: Kim"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
