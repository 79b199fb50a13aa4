//! Hook command report data structures.

use super::{
    DumpReport,
    output::{Output, Report},
};

/// Report data from handling host events.
#[derive(Debug)]
pub struct HookReport {
    pub events: Vec<HookEvent>,
}

/// One handled event.
#[derive(Debug)]
pub struct HookEvent {
    pub event: String,
    /// `None` when an earlier event already did the work.
    pub result: Option<DumpReport>,
}

impl Report for HookReport {
    fn render(&self, out: &mut dyn Output) {
        for handled in &self.events {
            match &handled.result {
                Some(report) => report.render(out),
                None => out.key_value(&handled.event, "preload files already added"),
            }
        }
    }
}
