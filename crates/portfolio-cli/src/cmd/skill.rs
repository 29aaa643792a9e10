use anyhow::Context;
use clap::Subcommand;
use portfolio_core::config::Config;
use portfolio_core::{RecordId, Skill, SkillFields};
use std::path::Path;

use super::records;
use crate::output::{print_json, print_table};

#[derive(Subcommand)]
pub enum SkillSubcommand {
    /// List all skills
    List,
    /// Show one skill
    Show { id: RecordId },
    /// Create a skill
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Update a skill; fields not given keep their current value
    Update {
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a skill
    Delete { id: RecordId },
}

pub fn run(root: &Path, subcmd: SkillSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load portfolio.yaml")?;
    if !config.skills {
        anyhow::bail!("skills are disabled in portfolio.yaml (set `skills: true` to manage them)");
    }

    match subcmd {
        SkillSubcommand::List => list(root, json),
        SkillSubcommand::Show { id } => show(root, id, json),
        SkillSubcommand::Create { name, description } => {
            let repo = records::open::<Skill>(root)?;
            let skill = repo
                .create(SkillFields { name, description })
                .context("failed to create skill")?;
            records::report(&skill, "Created", json)
        }
        SkillSubcommand::Update {
            id,
            name,
            description,
        } => {
            let repo = records::open::<Skill>(root)?;
            let skill = repo
                .update_with(id, |current| SkillFields {
                    name: name.unwrap_or_else(|| current.name.clone()),
                    description: description.unwrap_or_else(|| current.description.clone()),
                })
                .with_context(|| format!("failed to update skill {id}"))?;
            records::report(&skill, "Updated", json)
        }
        SkillSubcommand::Delete { id } => records::delete::<Skill>(root, id, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = records::open::<Skill>(root)?;
    let skills = repo.list().context("failed to list skills")?;

    if json {
        print_json(&skills)?;
        return Ok(());
    }

    if skills.is_empty() {
        println!("No skills.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = skills
        .iter()
        .map(|s| vec![s.id.to_string(), s.name.clone(), s.description.clone()])
        .collect();
    print_table(&["ID", "NAME", "DESCRIPTION"], rows);
    Ok(())
}

fn show(root: &Path, id: RecordId, json: bool) -> anyhow::Result<()> {
    let repo = records::open::<Skill>(root)?;
    let skill = records::get(&repo, id)?;

    if json {
        print_json(&skill)?;
    } else {
        println!("Skill #{}", skill.id);
        println!("  Name:        {}", skill.name);
        println!("  Description: {}", skill.description);
    }
    Ok(())
}
