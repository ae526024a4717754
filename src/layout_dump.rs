use crate::config::TreeConfig;
use crate::layout::{EdgeKind, TreeLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub card_width: f32,
    pub card_height: f32,
    pub width: f32,
    pub height: f32,
    pub bounds: [f32; 4],
    pub persons: Vec<PersonDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct PersonDump {
    pub id: String,
    pub name: String,
    pub level: i32,
    pub x: f32,
    pub y: f32,
    pub current_user: bool,
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub spouses: Vec<String>,
    pub siblings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub kind: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &TreeLayout, config: &TreeConfig) -> Self {
        let persons = layout
            .persons
            .iter()
            .map(|positioned| PersonDump {
                id: positioned.id().to_string(),
                name: positioned.person.display_name(),
                level: positioned.level,
                x: positioned.x,
                y: positioned.y,
                current_user: positioned.is_current_user,
                parents: positioned.parents.clone(),
                children: positioned.children.clone(),
                spouses: positioned.spouses.clone(),
                siblings: positioned.siblings.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .filter_map(|edge| {
                let from = layout.person(&edge.from)?;
                let to = layout.person(&edge.to)?;
                let kind = match edge.kind {
                    EdgeKind::Spouse => "spouse",
                    EdgeKind::ParentChild => "parentChild",
                    EdgeKind::Sibling => "sibling",
                };
                Some(EdgeDump {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    kind: kind.to_string(),
                    points: vec![[from.x, from.y], [to.x, to.y]],
                })
            })
            .collect();

        let bounds = &layout.bounds;
        LayoutDump {
            card_width: config.card_width,
            card_height: config.card_height,
            width: bounds.width(),
            height: bounds.height(),
            bounds: [bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y],
            persons,
            edges,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &TreeLayout,
    config: &TreeConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Person, Relation, RelationType};
    use crate::layout::compute_layout_with_config;

    #[test]
    fn dump_lists_people_and_edge_endpoints() {
        let config = TreeConfig::default();
        let persons = vec![Person::new("a", "1"), Person::new("b", "2")];
        let relations = vec![Relation::new("a", "b", RelationType::Brother)];
        let layout = compute_layout_with_config(&persons, &relations, "a", None, &config);
        let dump = LayoutDump::from_layout(&layout, &config);

        assert_eq!(dump.persons.len(), 2);
        assert_eq!(dump.persons[0].id, "a");
        assert!(dump.persons[0].current_user);
        assert_eq!(dump.edges.len(), 1);
        assert_eq!(dump.edges[0].kind, "sibling");
        assert_eq!(dump.edges[0].points.len(), 2);
        assert_eq!(dump.width, layout.bounds.width());

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["persons"][1]["siblings"][0], "a");
    }
}
