use crate::config::TreeConfig;
use crate::ir::{FamilyData, ListResponse, Person, Relation, root_person_for_user};
use crate::layout::{TreeLayout, compute_layout_with_config};
use crate::parser::parse_family;
use anyhow::Result;
use std::path::PathBuf;

/// Where people and relations come from. Transport is the implementor's
/// business; the layout only needs the two collections and the current user.
pub trait FamilySource {
    fn list_persons(&self) -> Result<ListResponse<Person>>;
    fn list_relations(&self) -> Result<ListResponse<Relation>>;
    fn current_user_id(&self) -> Result<Option<String>>;
}

/// Fixed data held in memory, e.g. mock data or a decoded request body.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    data: FamilyData,
}

impl InMemorySource {
    pub fn new(data: FamilyData) -> Self {
        Self { data }
    }
}

impl FamilySource for InMemorySource {
    fn list_persons(&self) -> Result<ListResponse<Person>> {
        Ok(ListResponse::from_items(self.data.persons.clone()))
    }

    fn list_relations(&self) -> Result<ListResponse<Relation>> {
        Ok(ListResponse::from_items(self.data.relations.clone()))
    }

    fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.data.current_user_id.clone())
    }
}

/// A family document on disk, re-read on every call.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<FamilyData> {
        let contents = std::fs::read_to_string(&self.path)?;
        let parsed = parse_family(&contents)?;
        if parsed.skipped_relations > 0 {
            tracing::warn!(
                path = %self.path.display(),
                skipped = parsed.skipped_relations,
                "relations with unknown types ignored"
            );
        }
        Ok(parsed.data)
    }
}

impl FamilySource for JsonFileSource {
    fn list_persons(&self) -> Result<ListResponse<Person>> {
        Ok(ListResponse::from_items(self.load()?.persons))
    }

    fn list_relations(&self) -> Result<ListResponse<Relation>> {
        Ok(ListResponse::from_items(self.load()?.relations))
    }

    fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.load()?.current_user_id)
    }
}

/// Which person the layout is centered on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RootSelector {
    /// Use the source's current user.
    #[default]
    CurrentUser,
    User(String),
    Person(String),
}

/// Fetches everything from `source`, resolves the root and lays it out.
/// An unresolvable root produces the empty layout.
pub fn load_layout(
    source: &dyn FamilySource,
    root: &RootSelector,
    config: &TreeConfig,
) -> Result<TreeLayout> {
    let persons = source.list_persons()?.items;
    let relations = source.list_relations()?.items;
    let current_user = source.current_user_id()?;

    let (root_person, user) = match root {
        RootSelector::Person(id) => (Some(id.clone()), None),
        RootSelector::User(user) => (
            root_person_for_user(&persons, user).map(str::to_string),
            Some(user.clone()),
        ),
        RootSelector::CurrentUser => match current_user.as_deref() {
            Some(user) => (
                root_person_for_user(&persons, user).map(str::to_string),
                Some(user.to_string()),
            ),
            None => (None, None),
        },
    };
    let root_person = root_person.unwrap_or_default();
    if root_person.is_empty() {
        tracing::warn!(selector = ?root, "no root person could be resolved");
    }
    Ok(compute_layout_with_config(
        &persons,
        &relations,
        &root_person,
        user.as_deref(),
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::RelationType;

    fn source() -> InMemorySource {
        InMemorySource::new(FamilyData {
            persons: vec![
                Person::new("1", "1"),
                Person::new("2", "2"),
                Person::new("3", "1"),
            ],
            relations: vec![
                Relation::new("1", "2", RelationType::Spouse),
                Relation::new("1", "3", RelationType::Father),
            ],
            current_user_id: Some("2".to_string()),
        })
    }

    #[test]
    fn in_memory_source_reports_totals() {
        let source = source();
        let persons = source.list_persons().unwrap();
        assert_eq!(persons.total, 3);
        assert_eq!(source.list_relations().unwrap().items.len(), 2);
    }

    #[test]
    fn current_user_picks_the_root() {
        let layout = load_layout(&source(), &RootSelector::CurrentUser, &TreeConfig::default())
            .unwrap();
        let root = layout.person("2").unwrap();
        assert_eq!((root.x, root.y), (0.0, 0.0));
        assert!(root.is_current_user);
        assert!(!layout.person("1").unwrap().is_current_user);
    }

    #[test]
    fn explicit_person_overrides_current_user() {
        let layout = load_layout(
            &source(),
            &RootSelector::Person("3".to_string()),
            &TreeConfig::default(),
        )
        .unwrap();
        let root = layout.person("3").unwrap();
        assert_eq!((root.x, root.y, root.level), (0.0, 0.0, 0));
        assert_eq!(layout.person("1").unwrap().level, -1);
    }

    #[test]
    fn unknown_user_yields_empty_layout() {
        let layout = load_layout(
            &source(),
            &RootSelector::User("missing".to_string()),
            &TreeConfig::default(),
        )
        .unwrap();
        assert!(layout.is_empty());
    }

    #[test]
    fn file_source_reads_documents() {
        let dir = std::env::temp_dir().join(format!("famtree-source-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("family.json");
        std::fs::write(
            &path,
            r#"{ "currentUserId": "u1", "persons": [ { "id": "p1", "userId": "u1" } ], "relations": [] }"#,
        )
        .unwrap();
        let source = JsonFileSource::new(&path);
        assert_eq!(source.current_user_id().unwrap().as_deref(), Some("u1"));
        assert_eq!(source.list_persons().unwrap().total, 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
