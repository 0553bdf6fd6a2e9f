use maglab_core::model::{LessonPage, SessionState, StepId, Unit};

#[derive(Clone, Debug, PartialEq)]
pub struct UnitProgressVm {
    pub label: &'static str,
    pub percent: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepLinkVm {
    pub step: StepId,
    pub title: String,
    pub completed: bool,
    pub current: bool,
}

impl StepLinkVm {
    #[must_use]
    pub fn marker(&self) -> &'static str {
        if self.completed { "✅" } else { "▫️" }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitSectionVm {
    pub progress: UnitProgressVm,
    pub steps: Vec<StepLinkVm>,
}

/// Sidebar contents: the unit-less steps, then one section per unit.
#[derive(Clone, Debug, PartialEq)]
pub struct SidebarVm {
    pub intro: Vec<StepLinkVm>,
    pub units: Vec<UnitSectionVm>,
}

#[must_use]
pub fn sidebar_vm(state: &SessionState) -> SidebarVm {
    let current = state.current_step().id().clone();
    let link = |page: LessonPage| {
        let step = page.step_id();
        StepLinkVm {
            completed: state.is_completed(&step),
            current: step == current,
            title: page.title().to_string(),
            step,
        }
    };

    let intro = LessonPage::ALL
        .into_iter()
        .filter(|page| page.unit().is_none())
        .map(link)
        .collect();
    let units = Unit::ALL
        .into_iter()
        .map(|unit| UnitSectionVm {
            progress: UnitProgressVm {
                label: unit.label(),
                percent: state.progress_percent(unit),
            },
            steps: LessonPage::ALL
                .into_iter()
                .filter(|page| page.unit() == Some(unit))
                .map(link)
                .collect(),
        })
        .collect();

    SidebarVm { intro, units }
}
