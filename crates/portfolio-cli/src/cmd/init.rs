use anyhow::Context;
use portfolio_core::config::Config;
use portfolio_core::{paths, Project, Repository, Skill};
use std::path::Path;

use crate::output::print_json;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config_path = paths::config_path(root);
    let wrote_config = if config_path.exists() {
        false
    } else {
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create {}", root.display()))?;
        Config::default()
            .save(root)
            .context("failed to write portfolio.yaml")?;
        true
    };

    let config = Config::load(root).context("failed to load portfolio.yaml")?;
    let data_dir = config.data_dir(root);

    let projects: Repository<Project> =
        Repository::open(&data_dir, config.missing_file, config.ids);
    let mut created = Vec::new();
    if projects.init().context("failed to create projects file")? {
        created.push(projects.path().to_path_buf());
    }

    if config.skills {
        let skills: Repository<Skill> =
            Repository::open(&data_dir, config.missing_file, config.ids);
        if skills.init().context("failed to create skills file")? {
            created.push(skills.path().to_path_buf());
        }
    }

    if json {
        print_json(&serde_json::json!({
            "root": root,
            "config_created": wrote_config,
            "collections_created": created,
        }))?;
        return Ok(());
    }

    if wrote_config {
        println!("Wrote {}", config_path.display());
    }
    for path in &created {
        println!("Created {}", path.display());
    }
    if !wrote_config && created.is_empty() {
        println!("Already initialized.");
    }
    Ok(())
}
