use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::paths;
use crate::record::{Record, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    /// Keys not modelled above, preserved across rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFields {
    pub name: String,
    pub description: String,
}

impl Record for Skill {
    type Fields = SkillFields;

    const KIND: &'static str = "Skill";
    const FILE_NAME: &'static str = paths::SKILLS_FILE;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_fields(id: RecordId, fields: SkillFields) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            extra: Map::new(),
        }
    }

    fn replace_fields(&mut self, fields: SkillFields) {
        self.name = fields.name;
        self.description = fields.description;
    }
}

impl From<Skill> for SkillFields {
    fn from(s: Skill) -> Self {
        Self {
            name: s.name,
            description: s.description,
        }
    }
}
