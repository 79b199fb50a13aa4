//! Hook operation - host lifecycle events sharing one session.

use eyre::Result;
use preload_codegen::{ComposerTemplates, Dispatch, HostEvent, Session};
use preload_manifest::ComposerProject;

use crate::reports::{HookEvent, HookReport};

/// Dispatch `events` in order; only the first one does any work.
pub fn hook(project: &ComposerProject, events: &[HostEvent]) -> Result<HookReport> {
    let dirs = project.dirs();
    let mut session = Session::new(project, dirs, &ComposerTemplates);

    let mut handled = Vec::with_capacity(events.len());
    for event in events {
        let result = match session.dispatch(*event)? {
            Dispatch::Ran(outcome) => Some(super::dump::report(outcome, dirs.base_dir())),
            Dispatch::AlreadyRan => None,
        };
        handled.push(HookEvent {
            event: event.to_string(),
            result,
        });
    }

    Ok(HookReport { events: handled })
}
