use anyhow::Context;
use clap::Subcommand;
use portfolio_core::{Project, ProjectFields, RecordId};
use std::path::Path;

use super::records;
use crate::output::{print_json, print_table};

const DEFAULT_DATE: &str = "2023-10-01";

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// List all projects
    List,
    /// Show one project
    Show { id: RecordId },
    /// Create a project (the id is assigned automatically)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long, visible_alias = "podrazdelenie")]
        subdivision: String,
        #[arg(long, default_value = DEFAULT_DATE)]
        date: String,
    },
    /// Update a project; fields not given keep their current value
    Update {
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, visible_alias = "podrazdelenie")]
        subdivision: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a project
    Delete { id: RecordId },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::List => list(root, json),
        ProjectSubcommand::Show { id } => show(root, id, json),
        ProjectSubcommand::Create {
            name,
            description,
            subdivision,
            date,
        } => create(
            root,
            ProjectFields {
                name,
                description,
                subdivision,
                date,
            },
            json,
        ),
        ProjectSubcommand::Update {
            id,
            name,
            description,
            subdivision,
            date,
        } => {
            let edits = ProjectEdits {
                name,
                description,
                subdivision,
                date,
            };
            update(root, id, edits, json)
        }
        ProjectSubcommand::Delete { id } => records::delete::<Project>(root, id, json),
    }
}

struct ProjectEdits {
    name: Option<String>,
    description: Option<String>,
    subdivision: Option<String>,
    date: Option<String>,
}

impl ProjectEdits {
    fn apply(self, current: &Project) -> ProjectFields {
        let mut fields = ProjectFields::from(current.clone());
        if let Some(v) = self.name {
            fields.name = v;
        }
        if let Some(v) = self.description {
            fields.description = v;
        }
        if let Some(v) = self.subdivision {
            fields.subdivision = v;
        }
        if let Some(v) = self.date {
            fields.date = v;
        }
        fields
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let repo = records::open::<Project>(root)?;
    let projects = repo.list().context("failed to list projects")?;

    if json {
        print_json(&projects)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.subdivision.clone(),
                p.date.clone(),
                p.description.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "SUBDIVISION", "DATE", "DESCRIPTION"], rows);
    Ok(())
}

fn show(root: &Path, id: RecordId, json: bool) -> anyhow::Result<()> {
    let repo = records::open::<Project>(root)?;
    let project = records::get(&repo, id)?;

    if json {
        print_json(&project)?;
    } else {
        println!("Project #{}", project.id);
        println!("  Name:        {}", project.name);
        println!("  Description: {}", project.description);
        println!("  Subdivision: {}", project.subdivision);
        println!("  Date:        {}", project.date);
    }
    Ok(())
}

fn create(root: &Path, fields: ProjectFields, json: bool) -> anyhow::Result<()> {
    let repo = records::open::<Project>(root)?;
    let project = repo.create(fields).context("failed to create project")?;
    records::report(&project, "Created", json)
}

fn update(root: &Path, id: RecordId, edits: ProjectEdits, json: bool) -> anyhow::Result<()> {
    let repo = records::open::<Project>(root)?;
    let project = repo
        .update_with(id, |current| edits.apply(current))
        .with_context(|| format!("failed to update project {id}"))?;
    records::report(&project, "Updated", json)
}
