use portfolio_core::config::Config;
use portfolio_core::{Project, Repository, Skill};
use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::ChatHub;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub projects: Arc<Repository<Project>>,
    pub skills: Arc<Repository<Skill>>,
    pub chat: ChatHub,
}

impl AppState {
    pub fn new(root: PathBuf, config: Config) -> Self {
        let data_dir = config.data_dir(&root);
        let projects: Repository<Project> =
            Repository::open(&data_dir, config.missing_file, config.ids);
        let skills: Repository<Skill> =
            Repository::open(&data_dir, config.missing_file, config.ids);
        tracing::debug!(
            projects = %projects.path().display(),
            skills = %skills.path().display(),
            ids = ?config.ids,
            "opened collections"
        );
        let chat = ChatHub::new(config.chat.echo_to_sender);

        Self {
            root,
            config: Arc::new(config),
            projects: Arc::new(projects),
            skills: Arc::new(skills),
            chat,
        }
    }
}
