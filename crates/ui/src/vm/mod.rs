mod activity_vm;
mod field_vm;
mod markdown_vm;
mod progress_vm;
mod time_fmt;

pub use activity_vm::{ActivityRowVm, map_activity_rows};
pub use field_vm::{
    ArrowVm, CurveVm, PlotFrame, PoleMarkVm, QuiverVm, curve, magnet_quiver, quiver,
};
pub use markdown_vm::{markdown_to_html, normalize_markdown, sanitize_html};
pub use progress_vm::{SidebarVm, StepLinkVm, UnitProgressVm, UnitSectionVm, sidebar_vm};
pub use time_fmt::format_datetime;
