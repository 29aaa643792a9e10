use serde::de::DeserializeOwned;
use serde::Serialize;

/// Record identifier. Signed so any integer a client sends in a path
/// resolves to a lookup (and a 404) rather than a parse failure.
pub type RecordId = i64;

/// An entity persisted as one element of a JSON array document.
///
/// `Fields` is everything a client supplies: the record minus its `id`.
/// Creation attaches a repository-assigned id; update replaces the fields
/// wholesale and never touches the id.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    type Fields: DeserializeOwned + Send + 'static;

    /// Human-readable entity name, used in errors ("Project not found").
    const KIND: &'static str;

    /// Backing file name inside the data directory.
    const FILE_NAME: &'static str;

    fn id(&self) -> RecordId;

    fn from_fields(id: RecordId, fields: Self::Fields) -> Self;

    fn replace_fields(&mut self, fields: Self::Fields);
}
