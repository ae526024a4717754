use crate::ir::{FamilyData, ListResponse, Person, Relation, RelationType};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("family document is not valid JSON or JSON5: {0}")]
    Syntax(String),
    #[error("family document has an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("relation {index} has unknown type `{kind}`")]
    UnknownRelationType { index: usize, kind: String },
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub data: FamilyData,
    /// Relations skipped because their type tag is outside the known set.
    pub skipped_relations: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    Envelope(ListResponse<T>),
    Bare(Vec<T>),
}

impl<T> Collection<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Collection::Envelope(list) => list.items,
            Collection::Bare(items) => items,
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection::Bare(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRelation {
    #[serde(default)]
    id: Option<String>,
    from_person_id: String,
    to_person_id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    created_by_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FamilyDocument {
    #[serde(default)]
    current_user_id: Option<String>,
    #[serde(default)]
    persons: Collection<Person>,
    #[serde(default)]
    relations: Collection<RawRelation>,
}

/// Decodes a family document. Relations with an unknown type are skipped and
/// counted rather than failing the whole document.
pub fn parse_family(input: &str) -> Result<ParseOutput, ParseError> {
    let value = read_value(input)?;
    let document: FamilyDocument = serde_json::from_value(value)?;

    let mut relations = Vec::new();
    let mut skipped_relations = 0usize;
    for (index, raw) in document.relations.into_items().into_iter().enumerate() {
        match convert_relation(index, raw) {
            Ok(relation) => relations.push(relation),
            Err(err) => {
                tracing::debug!(%err, "relation skipped");
                skipped_relations += 1;
            }
        }
    }

    Ok(ParseOutput {
        data: FamilyData {
            persons: document.persons.into_items(),
            relations,
            current_user_id: document.current_user_id,
        },
        skipped_relations,
    })
}

fn read_value(input: &str) -> Result<serde_json::Value, ParseError> {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => Ok(value),
        Err(json_err) => json5::from_str::<serde_json::Value>(input)
            .map_err(|_| ParseError::Syntax(json_err.to_string())),
    }
}

fn convert_relation(index: usize, raw: RawRelation) -> Result<Relation, ParseError> {
    let kind =
        RelationType::from_token(&raw.kind).ok_or_else(|| ParseError::UnknownRelationType {
            index,
            kind: raw.kind.clone(),
        })?;
    Ok(Relation {
        id: raw.id,
        from_person_id: raw.from_person_id,
        to_person_id: raw.to_person_id,
        kind,
        created_by_id: raw.created_by_id,
    })
}
