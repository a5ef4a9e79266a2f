//! Project context shared by CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tern_core::{select, Config, GraphDocument, GraphStore, Selection};

use crate::cli::GlobalArgs;

/// Loaded configuration and graph store
pub(crate) struct ProjectContext {
    /// Project configuration (defaults when no tern.yml exists)
    pub config: Config,

    /// Path the graph document was read from
    pub graph_path: PathBuf,

    /// Project name recorded in the graph document
    pub project_name: Option<String>,

    /// The graph store
    pub store: GraphStore,
}

impl ProjectContext {
    /// Load config and graph, honoring the config's `strict` setting
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        Self::open(global, None)
    }

    /// Load config and graph, always dropping unknown references so they can
    /// be reported
    pub fn load_lenient(global: &GlobalArgs) -> Result<Self> {
        Self::open(global, Some(false))
    }

    fn open(global: &GlobalArgs, strict: Option<bool>) -> Result<Self> {
        let project_path = Path::new(&global.project_dir);

        // Load config from custom path or project directory
        let config = if let Some(config_path) = &global.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_or_default(project_path)
                .context("Failed to load project configuration")?
        };

        let graph_path = match &global.graph {
            Some(path) => PathBuf::from(path),
            None => config.graph_path_absolute(project_path),
        };

        let document = GraphDocument::load(&graph_path)
            .with_context(|| format!("Failed to load graph document {}", graph_path.display()))?;
        let project_name = document.project_name().map(String::from);

        let strict = strict.unwrap_or(config.strict);
        let store = document
            .into_store(strict)
            .context("Failed to build graph store")?;

        if !store.malformed().is_empty() {
            log::warn!(
                "{} reference(s) to unknown nodes were dropped; run `tern validate` for details",
                store.malformed().len()
            );
        }
        log::debug!(
            "Loaded {} nodes from {}",
            store.len(),
            graph_path.display()
        );

        Ok(Self {
            config,
            graph_path,
            project_name,
            store,
        })
    }

    /// Evaluate command-line selectors, falling back to the configured
    /// defaults when none are given
    pub fn selection(&self, selectors: &[String]) -> Result<Selection> {
        let selectors: &[String] = if selectors.is_empty() {
            &self.config.select
        } else {
            selectors
        };
        select(&self.store, selectors).context("Invalid selector")
    }

    /// Whether any selector applies, from the command line or the config
    pub fn has_selectors(&self, selectors: &[String]) -> bool {
        !selectors.is_empty() || !self.config.select.is_empty()
    }
}
