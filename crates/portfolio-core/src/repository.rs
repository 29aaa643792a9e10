use std::marker::PhantomData;
use std::path::Path;

use crate::error::{Result, StoreError};
use crate::ids::{IdPolicy, IdStrategy};
use crate::paths;
use crate::record::{Record, RecordId};
use crate::store::{DocumentStore, MissingFile};

/// CRUD over one entity's collection file.
///
/// Lookups scan the collection linearly and match the first record with
/// the requested id. Every mutation is a full load + rewrite of the file
/// under the store lock.
pub struct Repository<R: Record> {
    store: DocumentStore,
    ids: Box<dyn IdPolicy>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Repository<R> {
    pub fn new(store: DocumentStore, ids: Box<dyn IdPolicy>) -> Self {
        Self {
            store,
            ids,
            _record: PhantomData,
        }
    }

    /// Repository backed by `data_dir/<R::FILE_NAME>`.
    pub fn open(data_dir: &Path, missing: MissingFile, ids: IdStrategy) -> Self {
        let path = paths::collection_path(data_dir, R::FILE_NAME);
        Self::new(DocumentStore::new(path, missing), ids.policy())
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Create the backing file as an empty array if it is absent.
    pub fn init(&self) -> Result<bool> {
        self.store.init()
    }

    pub fn list(&self) -> Result<Vec<R>> {
        self.store.load()
    }

    pub fn get(&self, id: RecordId) -> Result<R> {
        self.store.read(|records: Vec<R>| {
            records
                .into_iter()
                .find(|r| r.id() == id)
                .ok_or_else(|| not_found::<R>(id))
        })
    }

    pub fn create(&self, fields: R::Fields) -> Result<R> {
        self.store.modify(|records: &mut Vec<R>| {
            let existing: Vec<RecordId> = records.iter().map(|r| r.id()).collect();
            let id = self.ids.next_id(&existing)?;
            let record = R::from_fields(id, fields);
            records.push(record.clone());
            tracing::debug!(kind = R::KIND, id, "created record");
            Ok(record)
        })
    }

    /// Replace every non-id field of the record with `id`.
    pub fn update(&self, id: RecordId, fields: R::Fields) -> Result<R> {
        self.update_with(id, move |_| fields)
    }

    /// Like `update`, with the new fields derived from the stored record.
    /// Lookup, derivation and save all happen under one store lock.
    pub fn update_with(&self, id: RecordId, f: impl FnOnce(&R) -> R::Fields) -> Result<R> {
        self.store.modify(|records: &mut Vec<R>| {
            let record = records
                .iter_mut()
                .find(|r| r.id() == id)
                .ok_or_else(|| not_found::<R>(id))?;
            let fields = f(&*record);
            record.replace_fields(fields);
            tracing::debug!(kind = R::KIND, id, "updated record");
            Ok(record.clone())
        })
    }

    pub fn delete(&self, id: RecordId) -> Result<()> {
        self.store.modify(|records: &mut Vec<R>| {
            let pos = records
                .iter()
                .position(|r| r.id() == id)
                .ok_or_else(|| not_found::<R>(id))?;
            records.remove(pos);
            tracing::debug!(kind = R::KIND, id, "deleted record");
            Ok(())
        })
    }
}

fn not_found<R: Record>(id: RecordId) -> StoreError {
    StoreError::NotFound { kind: R::KIND, id }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{RandomRange, RANDOM_ID_MAX, RANDOM_ID_MIN};
    use crate::project::{Project, ProjectFields};
    use crate::skill::{Skill, SkillFields};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn fields(name: &str) -> ProjectFields {
        ProjectFields {
            name: name.into(),
            description: "d".into(),
            subdivision: "p".into(),
            date: "2024-01-01".into(),
        }
    }

    fn projects(dir: &TempDir) -> Repository<Project> {
        Repository::open(dir.path(), MissingFile::Empty, IdStrategy::Sequential)
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);

        let a = repo.create(fields("A")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(a.name, "A");
        assert_eq!(a.subdivision, "p");

        let b = repo.create(fields("A")).unwrap();
        assert_eq!(b.id, 2);
    }

    #[test]
    fn create_with_random_ids() {
        let dir = TempDir::new().unwrap();
        let repo: Repository<Project> = Repository::open(
            dir.path(),
            MissingFile::Empty,
            IdStrategy::Random,
        );
        let a = repo.create(fields("A")).unwrap();
        let b = repo.create(fields("A")).unwrap();
        assert!((RANDOM_ID_MIN..=RANDOM_ID_MAX).contains(&a.id));
        assert!((RANDOM_ID_MIN..=RANDOM_ID_MAX).contains(&b.id));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_fails_when_random_range_is_full() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(dir.path().join("projects.json"), MissingFile::Empty);
        let repo: Repository<Project> = Repository::new(store, Box::new(RandomRange::new(1, 2)));
        repo.create(fields("A")).unwrap();
        repo.create(fields("B")).unwrap();
        assert!(matches!(
            repo.create(fields("C")),
            Err(StoreError::IdSpaceExhausted { .. })
        ));
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn ids_are_unique_after_many_creates_and_deletes() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        for i in 0..10 {
            repo.create(fields(&format!("p{i}"))).unwrap();
        }
        repo.delete(10).unwrap();
        repo.delete(4).unwrap();
        for i in 0..5 {
            repo.create(fields(&format!("q{i}"))).unwrap();
        }
        let ids: Vec<RecordId> = repo.list().unwrap().iter().map(|p| p.id).collect();
        let unique: HashSet<RecordId> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn get_round_trips_created_record() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        let created = repo.create(fields("A")).unwrap();
        assert_eq!(repo.get(created.id).unwrap(), created);
    }

    #[test]
    fn get_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        assert!(matches!(
            repo.get(42),
            Err(StoreError::NotFound { kind: "Project", id: 42 })
        ));
    }

    #[test]
    fn list_preserves_insertion_order() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        repo.create(fields("first")).unwrap();
        repo.create(fields("second")).unwrap();
        repo.create(fields("third")).unwrap();
        let names: Vec<String> = repo.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn update_replaces_fields_and_keeps_id() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        let created = repo.create(fields("A")).unwrap();

        let updated = repo
            .update(
                created.id,
                ProjectFields {
                    name: "B".into(),
                    description: "e".into(),
                    subdivision: "q".into(),
                    date: "2025-02-02".into(),
                },
            )
            .unwrap();
        assert_eq!(updated.id, created.id);

        let loaded = repo.get(created.id).unwrap();
        assert_eq!(loaded, updated);
        assert_eq!(loaded.name, "B");
        assert_eq!(loaded.subdivision, "q");
        assert_eq!(loaded.date, "2025-02-02");
    }

    #[test]
    fn update_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        assert!(matches!(
            repo.update(9, fields("x")),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        let created = repo.create(fields("A")).unwrap();
        repo.delete(created.id).unwrap();
        assert!(matches!(
            repo.get(created.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_missing_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        repo.create(fields("A")).unwrap();
        repo.create(fields("B")).unwrap();
        let before = repo.list().unwrap();
        let bytes_before = std::fs::read(repo.path()).unwrap();

        assert!(matches!(repo.delete(77), Err(StoreError::NotFound { .. })));

        assert_eq!(repo.list().unwrap(), before);
        assert_eq!(std::fs::read(repo.path()).unwrap(), bytes_before);
    }

    #[test]
    fn delete_removes_only_first_match() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        // Hand-edited file with a duplicated id.
        std::fs::write(
            repo.path(),
            r#"[
                {"id": 1, "name": "a", "description": "", "podrazdelenie": "", "date": ""},
                {"id": 1, "name": "b", "description": "", "podrazdelenie": "", "date": ""}
            ]"#,
        )
        .unwrap();
        repo.delete(1).unwrap();
        let left = repo.list().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "b");
    }

    #[test]
    fn update_with_derives_fields_from_stored_record() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        let created = repo.create(fields("A")).unwrap();

        let updated = repo
            .update_with(created.id, |current| ProjectFields {
                name: format!("{} v2", current.name),
                ..ProjectFields::from(current.clone())
            })
            .unwrap();
        assert_eq!(updated.name, "A v2");
        assert_eq!(updated.date, created.date);
        assert_eq!(repo.get(created.id).unwrap(), updated);

        assert!(matches!(
            repo.update_with(99, |current| ProjectFields::from(current.clone())),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn concurrent_update_with_loses_no_increments() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(projects(&dir));
        let id = repo.create(fields("0")).unwrap().id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    repo.update_with(id, |current| {
                        let n: u32 = current.name.parse().unwrap();
                        ProjectFields {
                            name: (n + 1).to_string(),
                            ..ProjectFields::from(current.clone())
                        }
                    })
                    .unwrap()
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(repo.get(id).unwrap().name, "8");
    }

    #[test]
    fn record_with_missing_field_fails_and_keeps_the_file() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        let original = r#"[
    {"id": 1, "name": "A", "description": "d", "podrazdelenie": "p", "date": "2024-01-01"},
    {"id": 2, "name": "B", "description": "d", "podrazdelenie": "p"}
]"#;
        std::fs::write(repo.path(), original).unwrap();

        assert!(matches!(repo.list(), Err(StoreError::Json(_))));
        assert!(matches!(
            repo.create(fields("C")),
            Err(StoreError::Json(_))
        ));
        assert!(matches!(repo.delete(1), Err(StoreError::Json(_))));
        assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), original);
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_next_create_starts_over() {
        let dir = TempDir::new().unwrap();
        let repo = projects(&dir);
        std::fs::write(repo.path(), "garbage").unwrap();
        assert!(repo.list().unwrap().is_empty());
        assert_eq!(repo.create(fields("A")).unwrap().id, 1);
    }

    #[test]
    fn missing_file_policy_error_applies_to_every_operation() {
        let dir = TempDir::new().unwrap();
        let repo: Repository<Project> =
            Repository::open(dir.path(), MissingFile::Error, IdStrategy::Sequential);
        assert!(matches!(repo.list(), Err(StoreError::StorageMissing(_))));
        assert!(matches!(
            repo.create(fields("A")),
            Err(StoreError::StorageMissing(_))
        ));

        repo.init().unwrap();
        assert_eq!(repo.create(fields("A")).unwrap().id, 1);
    }

    #[test]
    fn concurrent_creates_all_persist_with_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let repo = Arc::new(projects(&dir));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || repo.create(fields(&format!("t{i}"))).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let ids: HashSet<RecordId> = repo.list().unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=8).collect());
    }

    #[test]
    fn skills_use_their_own_file() {
        let dir = TempDir::new().unwrap();
        let skills: Repository<Skill> =
            Repository::open(dir.path(), MissingFile::Empty, IdStrategy::Sequential);
        let s = skills
            .create(SkillFields {
                name: "Rust".into(),
                description: "systems".into(),
            })
            .unwrap();
        assert_eq!(s.id, 1);
        assert!(dir.path().join("skills.json").exists());
        assert!(!dir.path().join("projects.json").exists());
    }
}
