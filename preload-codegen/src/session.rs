//! One-shot handling of host lifecycle events.

use std::{fmt, str::FromStr};

use eyre::Result;
use preload_manifest::{AutoloadDirs, PackageGraph};

use crate::{AutoloadTemplates, DumpOutcome, add_preload_files};

/// Host lifecycle events that trigger a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Composer finished writing its autoload files.
    PostAutoloadDump,
    /// Composer finished `install`.
    PostInstallCmd,
}

impl HostEvent {
    pub const ALL: [HostEvent; 2] = [Self::PostAutoloadDump, Self::PostInstallCmd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostAutoloadDump => "post-autoload-dump",
            Self::PostInstallCmd => "post-install-cmd",
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(HostEvent::as_str).collect();
                format!("unknown event '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// What a dispatched event did.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Ran(DumpOutcome),
    /// An earlier event in this session already ran.
    AlreadyRan,
}

/// Runs the preload operation at most once, however many events arrive.
pub struct Session<'a> {
    graph: &'a dyn PackageGraph,
    dirs: &'a AutoloadDirs,
    templates: &'a dyn AutoloadTemplates,
    has_run: bool,
}

impl<'a> Session<'a> {
    pub fn new(
        graph: &'a dyn PackageGraph,
        dirs: &'a AutoloadDirs,
        templates: &'a dyn AutoloadTemplates,
    ) -> Self {
        Self {
            graph,
            dirs,
            templates,
            has_run: false,
        }
    }

    /// Whether a run has completed in this session.
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Handle `event`. Only the first successful run does any work.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<Dispatch> {
        if self.has_run {
            tracing::debug!(%event, "preload files already added in this session");
            return Ok(Dispatch::AlreadyRan);
        }

        tracing::debug!(%event, "handling event");
        let outcome = add_preload_files(self.graph, self.dirs, self.templates)?;
        self.has_run = true;
        Ok(Dispatch::Ran(outcome))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use preload_core::File;
    use preload_manifest::PackageDescriptor;

    use super::*;
    use crate::{FileManifest, PathCodes};

    struct CountingGraph {
        root: PackageDescriptor,
        reads: Cell<usize>,
    }

    impl PackageGraph for CountingGraph {
        fn root_package(&self) -> &PackageDescriptor {
            self.reads.set(self.reads.get() + 1);
            &self.root
        }

        fn installed_packages(&self) -> &[PackageDescriptor] {
            &[]
        }
    }

    struct FailingTemplates;

    impl AutoloadTemplates for FailingTemplates {
        fn load_existing_manifest(&self, _dirs: &AutoloadDirs) -> Result<FileManifest> {
            Err(eyre::eyre!("disk on fire"))
        }

        fn render_manifest(
            &self,
            _files: &FileManifest,
            _dirs: &AutoloadDirs,
            _codes: &PathCodes,
        ) -> Result<File> {
            unreachable!()
        }

        fn render_static_registry(
            &self,
            _suffix: Option<&str>,
            _dirs: &AutoloadDirs,
        ) -> Result<File> {
            unreachable!()
        }
    }

    fn graph(preload: bool) -> CountingGraph {
        let mut root = PackageDescriptor::new("acme/app");
        if preload {
            root = root.extra("preload-files", serde_json::json!(["helpers.php"]));
        }
        CountingGraph {
            root,
            reads: Cell::new(0),
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(
            "post-autoload-dump".parse::<HostEvent>(),
            Ok(HostEvent::PostAutoloadDump)
        );
        assert_eq!(HostEvent::PostInstallCmd.to_string(), "post-install-cmd");
        assert!("pre-install-cmd".parse::<HostEvent>().is_err());
    }

    #[test]
    fn test_second_event_is_ignored() {
        let graph = graph(false);
        let dirs = AutoloadDirs::new("/project", "/project/vendor");
        let mut session = Session::new(&graph, &dirs, &crate::ComposerTemplates);

        let first = session.dispatch(HostEvent::PostAutoloadDump).unwrap();
        assert!(matches!(first, Dispatch::Ran(DumpOutcome::NothingToPreload)));
        assert!(session.has_run());

        let second = session.dispatch(HostEvent::PostInstallCmd).unwrap();
        assert!(matches!(second, Dispatch::AlreadyRan));
        assert_eq!(graph.reads.get(), 1);
    }

    #[test]
    fn test_failed_run_does_not_latch() {
        let graph = graph(true);
        let dirs = AutoloadDirs::new("/project", "/project/vendor");
        let mut session = Session::new(&graph, &dirs, &FailingTemplates);

        assert!(session.dispatch(HostEvent::PostAutoloadDump).is_err());
        assert!(!session.has_run());
        assert!(session.dispatch(HostEvent::PostAutoloadDump).is_err());
        assert_eq!(graph.reads.get(), 2);
    }
}
