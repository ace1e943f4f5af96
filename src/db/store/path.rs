//! Collection and document addressing
//!
//! Paths alternate collection names and document ids:
//! `langs`, `worlds/{world_id}/games`, `users/{user_id}/Profiles/{profile_id}`.

use std::fmt::{Display, Formatter};

use crate::error::StoreError;

/// Address of a collection: an odd number of segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

/// Address of a single document: an even number of segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    collection: CollectionPath,
    id: String,
}

fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() {
        return Err(StoreError::InvalidPath("empty path segment".into()));
    }
    if segment.contains('/') {
        return Err(StoreError::InvalidPath(format!(
            "segment '{}' must not contain '/'",
            segment
        )));
    }
    Ok(())
}

fn collect_segments<I, S>(segments: I) -> Result<Vec<String>, StoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let segments: Vec<String> = segments
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    for segment in &segments {
        validate_segment(segment)?;
    }
    Ok(segments)
}

impl CollectionPath {
    /// Build from segments, e.g. `["worlds", world_id, "games"]`
    pub fn new<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = collect_segments(segments)?;
        if segments.len() % 2 == 0 {
            return Err(StoreError::InvalidPath(format!(
                "collection path needs an odd number of segments, got {}",
                segments.len()
            )));
        }
        Ok(Self { segments })
    }

    /// Top-level collection from a name known to be valid
    pub(crate) fn known(name: &'static str) -> Self {
        debug_assert!(validate_segment(name).is_ok(), "invalid collection name {}", name);
        Self {
            segments: vec![name.to_string()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Document inside this collection
    pub fn doc(&self, id: &str) -> Result<DocPath, StoreError> {
        validate_segment(id)?;
        Ok(DocPath {
            collection: self.clone(),
            id: id.to_string(),
        })
    }

    /// Slash-joined form, used as a storage key
    pub fn key(&self) -> String {
        self.segments.join("/")
    }
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl DocPath {
    /// Build from segments, e.g. `["users", user_id]`
    pub fn new<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = collect_segments(segments)?;
        if segments.is_empty() || segments.len() % 2 != 0 {
            return Err(StoreError::InvalidPath(format!(
                "document path needs a non-zero even number of segments, got {}",
                segments.len()
            )));
        }
        let id = segments.pop().unwrap_or_default();
        Ok(Self {
            collection: CollectionPath { segments },
            id,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collection holding this document
    pub fn parent(&self) -> &CollectionPath {
        &self.collection
    }

    /// Named subcollection under this document
    pub fn collection(&self, name: &str) -> Result<CollectionPath, StoreError> {
        validate_segment(name)?;
        let mut segments = self.collection.segments.clone();
        segments.push(self.id.clone());
        segments.push(name.to_string());
        Ok(CollectionPath { segments })
    }
}

impl Display for DocPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path_shapes() {
        let langs = CollectionPath::new(["langs"]).unwrap();
        assert_eq!(langs.key(), "langs");

        let games = CollectionPath::new(["worlds", "w1", "games"]).unwrap();
        assert_eq!(games.segments(), ["worlds", "w1", "games"]);
        assert_eq!(games.to_string(), "worlds/w1/games");

        assert!(CollectionPath::new(["worlds", "w1"]).is_err());
        assert!(CollectionPath::new(Vec::<String>::new()).is_err());
        assert!(CollectionPath::new(["worlds", "", "games"]).is_err());
        assert!(CollectionPath::new(["a/b"]).is_err());
    }

    #[test]
    fn test_doc_path_navigation() {
        let user = DocPath::new(["users", "u1"]).unwrap();
        assert_eq!(user.id(), "u1");
        assert_eq!(user.parent().key(), "users");

        let profiles = user.collection("Profiles").unwrap();
        assert_eq!(profiles.key(), "users/u1/Profiles");

        let profile = profiles.doc("p1").unwrap();
        assert_eq!(profile.to_string(), "users/u1/Profiles/p1");

        assert!(DocPath::new(["users"]).is_err());
        assert!(profiles.doc("").is_err());
    }
}
