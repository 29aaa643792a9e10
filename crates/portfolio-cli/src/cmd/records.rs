use anyhow::Context;
use portfolio_core::config::Config;
use portfolio_core::{Record, RecordId, Repository};
use std::path::Path;

use crate::output::print_json;

/// Open the repository for `R` as configured under `root`.
pub fn open<R: Record>(root: &Path) -> anyhow::Result<Repository<R>> {
    let config = Config::load(root).context("failed to load portfolio.yaml")?;
    Ok(Repository::open(
        &config.data_dir(root),
        config.missing_file,
        config.ids,
    ))
}

pub fn get<R: Record>(repo: &Repository<R>, id: RecordId) -> anyhow::Result<R> {
    repo.get(id)
        .with_context(|| format!("failed to load {} {id}", kind::<R>()))
}

pub fn delete<R: Record>(root: &Path, id: RecordId, json: bool) -> anyhow::Result<()> {
    let repo = open::<R>(root)?;
    repo.delete(id)
        .with_context(|| format!("failed to delete {} {id}", kind::<R>()))?;

    if json {
        print_json(&serde_json::json!({ "detail": format!("{} deleted", R::KIND) }))?;
    } else {
        println!("Deleted {} {id}.", kind::<R>());
    }
    Ok(())
}

/// Print a record after a create or update.
pub fn report<R: Record>(record: &R, verb: &str, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(record)?;
    } else {
        println!("{verb} {} {}.", kind::<R>(), record.id());
    }
    Ok(())
}

pub fn kind<R: Record>() -> String {
    R::KIND.to_lowercase()
}
