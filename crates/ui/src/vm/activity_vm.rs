use services::ActivityRecord;

use crate::vm::time_fmt::format_datetime;

const PREVIEW_CHARS: usize = 80;

/// One line of the activity history table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityRowVm {
    pub id: i64,
    pub logged_at_str: String,
    pub student: String,
    pub activity: String,
    pub preview: String,
}

impl From<&ActivityRecord> for ActivityRowVm {
    fn from(record: &ActivityRecord) -> Self {
        let field = |pos: usize| record.field(pos).unwrap_or_default().to_string();
        let student = [field(0), field(1)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let preview = record
            .fields
            .iter()
            .skip(4)
            .rev()
            .find(|value| !value.trim().is_empty())
            .map(|value| truncate(value, PREVIEW_CHARS))
            .unwrap_or_default();

        Self {
            id: record.id,
            logged_at_str: format_datetime(record.logged_at),
            student,
            activity: field(3),
            preview,
        }
    }
}

#[must_use]
pub fn map_activity_rows(records: &[ActivityRecord]) -> Vec<ActivityRowVm> {
    records.iter().map(ActivityRowVm::from).collect()
}

fn truncate(value: &str, max: usize) -> String {
    let flat = value.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max).collect();
    out.push('…');
    out
}
