use serde::{Deserialize, Serialize};

use crate::ir::Person;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedPerson {
    #[serde(flatten)]
    pub person: Person,
    pub x: f32,
    pub y: f32,
    pub level: i32,
    pub is_current_user: bool,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub spouses: Vec<String>,
    pub siblings: Vec<String>,
}

impl PositionedPerson {
    pub fn id(&self) -> &str {
        &self.person.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    Spouse,
    ParentChild,
    Sibling,
}

/// `from` is the parent for [`EdgeKind::ParentChild`]; the smaller id otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawableEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl TreeBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    #[serde(rename = "positionedPersons")]
    pub persons: Vec<PositionedPerson>,
    #[serde(rename = "drawableEdges")]
    pub edges: Vec<DrawableEdge>,
    pub bounds: TreeBounds,
}

impl TreeLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn person(&self, id: &str) -> Option<&PositionedPerson> {
        self.persons.iter().find(|person| person.person.id == id)
    }
}
