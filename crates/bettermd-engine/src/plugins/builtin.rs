use super::descriptor::{Panel, PluginDescriptor};
use super::error::HookError;
use super::lifecycle::Lifecycle;

const AUTHOR: &str = "BetterMD Team";

/// The closed set of plugins shipped with the editor, selected by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    CodeHighlight,
    MathFormula,
    TaskManagement,
    KnowledgeGraph,
}

impl PluginKind {
    pub const ALL: [PluginKind; 4] = [
        PluginKind::CodeHighlight,
        PluginKind::MathFormula,
        PluginKind::TaskManagement,
        PluginKind::KnowledgeGraph,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PluginKind::CodeHighlight => "code-highlight",
            PluginKind::MathFormula => "math-formula",
            PluginKind::TaskManagement => "task-management",
            PluginKind::KnowledgeGraph => "knowledge-graph",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    fn descriptor(self) -> PluginDescriptor {
        let (name, description, version, action) = match self {
            PluginKind::CodeHighlight => (
                "Code Highlight",
                "Syntax highlighting for code blocks",
                "1.0.0",
                "Change theme",
            ),
            PluginKind::MathFormula => (
                "Math Formula",
                "LaTeX math formula rendering",
                "1.2.1",
                "Insert sample formula",
            ),
            PluginKind::TaskManagement => (
                "Task Management",
                "Task list tracking with status and reminders",
                "1.1.0",
                "Export tasks",
            ),
            PluginKind::KnowledgeGraph => (
                "Knowledge Graph",
                "Visualize links between notes as a graph",
                "2.0.3",
                "Refresh graph",
            ),
        };

        PluginDescriptor::new(self.id(), name)
            .with_description(description)
            .with_version(version)
            .with_author(AUTHOR)
            .with_panel(Panel {
                title: name.to_string(),
                body: description.to_string(),
                actions: vec![action.to_string()],
            })
    }
}

/// A built-in plugin instance. Its hooks only record the transition in the log.
#[derive(Debug, Clone)]
pub struct BuiltinPlugin {
    kind: PluginKind,
    descriptor: PluginDescriptor,
}

impl BuiltinPlugin {
    pub fn new(kind: PluginKind) -> Self {
        Self {
            kind,
            descriptor: kind.descriptor(),
        }
    }

    /// One instance of every built-in kind.
    pub fn all() -> Vec<Self> {
        PluginKind::ALL.into_iter().map(Self::new).collect()
    }

    pub fn kind(&self) -> PluginKind {
        self.kind
    }
}

impl Lifecycle for BuiltinPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn init(&mut self) -> Result<(), HookError> {
        log::info!("{} initialized", self.descriptor.name);
        Ok(())
    }

    async fn enable(&mut self) -> Result<(), HookError> {
        log::info!("{} enabled", self.descriptor.name);
        Ok(())
    }

    async fn disable(&mut self) -> Result<(), HookError> {
        log::info!("{} disabled", self.descriptor.name);
        Ok(())
    }
}
