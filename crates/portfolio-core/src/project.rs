use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::paths;
use crate::record::{Record, RecordId};

/// A project as stored in `projects.json`.
///
/// `subdivision` keeps the on-disk key `podrazdelenie` so existing
/// documents load unchanged. Keys this struct does not know about are kept
/// in `extra` and written back on every save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    #[serde(rename = "podrazdelenie", alias = "subdivision")]
    pub subdivision: String,
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client-supplied project fields. An `id` key in the input is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
    #[serde(rename = "podrazdelenie", alias = "subdivision")]
    pub subdivision: String,
    pub date: String,
}

impl Record for Project {
    type Fields = ProjectFields;

    const KIND: &'static str = "Project";
    const FILE_NAME: &'static str = paths::PROJECTS_FILE;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: ProjectFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            subdivision: fields.subdivision,
            date: fields.date,
            extra: Map::new(),
        }
    }

    fn replace_fields(&mut self, fields: ProjectFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.subdivision = fields.subdivision;
        self.date = fields.date;
    }
}

impl From<Project> for ProjectFields {
    fn from(p: Project) -> Self {
        Self {
            name: p.name,
            description: p.description,
            subdivision: p.subdivision,
            date: p.date,
        }
    }
}
