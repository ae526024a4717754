mod edges;
mod levels;
mod materialize;
mod normalize;
mod placement;
pub(crate) mod types;
mod units;
pub use types::*;
pub use edges::build_edges;
pub use levels::assign_levels;
pub use materialize::{NodePosition, compute_bounds, materialize_positions};
pub use normalize::{CanonicalRelations, normalize_relations, resolve_offspring_direction};
pub use placement::place_units;
pub use units::{FamilyUnit, FamilyUnits, UnitKey, build_family_units};

use crate::config::{TreeConfig, snap_to_grid, tree_config};
use crate::ir::{Person, Relation, RelationType};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Lays out the family around `root_person_id` with the process-wide
/// spacing configuration. The root's owning user is the current user.
pub fn compute_layout(
    persons: &[Person],
    relations: &[Relation],
    root_person_id: &str,
) -> TreeLayout {
    compute_layout_with_config(persons, relations, root_person_id, None, &tree_config())
}

/// Full pipeline: normalize, level, group into units, place, materialize and
/// collect edges. Never fails; unusable input yields [`TreeLayout::empty`].
pub fn compute_layout_with_config(
    persons: &[Person],
    relations: &[Relation],
    root_person_id: &str,
    current_user_id: Option<&str>,
    config: &TreeConfig,
) -> TreeLayout {
    if persons.is_empty() {
        tracing::warn!("no persons to lay out");
        return TreeLayout::empty();
    }
    let persons = unique_persons(persons);
    let Some(root) = persons.iter().find(|person| person.id == root_person_id) else {
        tracing::warn!(root = root_person_id, "root person not found among persons");
        return TreeLayout::empty();
    };

    let canonical = normalize_relations(&persons, relations);
    let levels = assign_levels(&persons, &canonical, root_person_id);
    let mut units = build_family_units(&levels, &canonical);
    let lookup: HashMap<&str, &Person> = persons
        .iter()
        .map(|person| (person.id.as_str(), person))
        .collect();
    place_units(&mut units, &canonical, &lookup, root_person_id, config);
    let positions = materialize_positions(&units, root_person_id, config);

    let current_user = current_user_id.unwrap_or(root.user_id.as_str());
    let placed_ids = |ids: Option<&BTreeSet<String>>| -> Vec<String> {
        ids.into_iter()
            .flatten()
            .filter(|id| positions.contains_key(id.as_str()))
            .cloned()
            .collect()
    };
    let positioned: Vec<PositionedPerson> = persons
        .iter()
        .filter_map(|person| {
            let position = positions.get(&person.id)?;
            let id = person.id.as_str();
            Some(PositionedPerson {
                person: person.clone(),
                x: position.x,
                y: position.y,
                level: position.level,
                is_current_user: !current_user.is_empty() && person.user_id == current_user,
                parents: placed_ids(canonical.parents.get(id)),
                children: placed_ids(canonical.children.get(id)),
                spouses: placed_ids(canonical.spouses.get(id)),
                siblings: placed_ids(canonical.siblings.get(id)),
            })
        })
        .collect();

    let edges = build_edges(&canonical, &positions);
    let bounds = compute_bounds(&positioned, config);
    tracing::debug!(
        persons = positioned.len(),
        unreachable = persons.len() - positioned.len(),
        edges = edges.len(),
        "layout computed"
    );
    TreeLayout {
        persons: positioned,
        edges,
        bounds,
    }
}

/// Drops later duplicates of an id, keeping input order.
fn unique_persons(persons: &[Person]) -> Vec<Person> {
    let mut seen: HashSet<&str> = HashSet::new();
    persons
        .iter()
        .filter(|person| seen.insert(person.id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Sex;

    fn config() -> TreeConfig {
        TreeConfig::default()
    }

    #[test]
    fn empty_input_gives_empty_layout() {
        let layout = compute_layout_with_config(&[], &[], "x", None, &config());
        assert_eq!(layout, TreeLayout::empty());
        assert_eq!(layout.bounds, TreeBounds::default());
    }

    #[test]
    fn missing_root_gives_empty_layout() {
        let persons = vec![Person::new("a", "1"), Person::new("b", "2"), Person::new("c", "3")];
        let relations = vec![Relation::new("a", "b", RelationType::Spouse)];
        let root = crate::ir::root_person_for_user(&persons, "missing").unwrap_or_default();
        let layout = compute_layout_with_config(&persons, &relations, root, None, &config());
        assert!(layout.is_empty());
        assert!(layout.edges.is_empty());
        assert_eq!(layout.bounds, TreeBounds::default());
    }

    #[test]
    fn lone_root_sits_at_origin() {
        let persons = vec![Person::new("me", "1"), Person::new("other", "2")];
        let layout = compute_layout_with_config(&persons, &[], "me", None, &config());
        assert_eq!(layout.persons.len(), 1);
        let me = layout.person("me").unwrap();
        assert_eq!((me.x, me.y, me.level), (0.0, 0.0, 0));
        assert!(me.is_current_user);
        assert_eq!(
            layout.bounds,
            TreeBounds {
                min_x: -100.0,
                max_x: 100.0,
                min_y: -60.0,
                max_y: 60.0,
            }
        );
    }

    #[test]
    fn daughter_record_resolved_by_birth_dates() {
        let persons = vec![
            Person::new("p1", "1").with_birth_date("1960-02-01"),
            Person::new("p2", "1").with_birth_date("1990-07-12"),
        ];
        let relations = vec![Relation::new("p2", "p1", RelationType::Daughter)];
        let layout = compute_layout_with_config(&persons, &relations, "p1", None, &config());
        let parent = layout.person("p1").unwrap();
        let child = layout.person("p2").unwrap();
        assert_eq!(child.level, parent.level + 1);
        assert_eq!(child.y, parent.y + config().vertical_step());
        assert_eq!(child.parents, vec!["p1".to_string()]);
        assert_eq!(
            layout.edges,
            vec![DrawableEdge {
                from: "p1".to_string(),
                to: "p2".to_string(),
                kind: EdgeKind::ParentChild,
            }]
        );
    }

    #[test]
    fn current_user_flag_follows_owning_user() {
        let persons = vec![
            Person::new("me", "1"),
            Person::new("wife", "2"),
            Person::new("kid", "1"),
        ];
        let relations = vec![
            Relation::new("me", "wife", RelationType::Spouse),
            Relation::new("me", "kid", RelationType::Father),
        ];
        let layout = compute_layout_with_config(&persons, &relations, "me", Some("2"), &config());
        assert!(layout.person("wife").unwrap().is_current_user);
        assert!(!layout.person("me").unwrap().is_current_user);

        let layout = compute_layout_with_config(&persons, &relations, "me", None, &config());
        assert!(layout.person("me").unwrap().is_current_user);
        assert!(layout.person("kid").unwrap().is_current_user);
        assert!(!layout.person("wife").unwrap().is_current_user);
    }

    #[test]
    fn duplicate_person_ids_keep_first_occurrence() {
        let persons = vec![
            Person::new("me", "1").with_sex(Sex::Male),
            Person::new("me", "1").with_sex(Sex::Female),
        ];
        let layout = compute_layout_with_config(&persons, &[], "me", None, &config());
        assert_eq!(layout.persons.len(), 1);
        assert_eq!(layout.persons[0].person.sex, Some(Sex::Male));
    }

    #[test]
    fn unreachable_people_are_left_out() {
        let persons = vec![
            Person::new("me", "1"),
            Person::new("sis", "1"),
            Person::new("x", "9"),
            Person::new("y", "9"),
        ];
        let relations = vec![
            Relation::new("me", "sis", RelationType::Sister),
            Relation::new("x", "y", RelationType::Spouse),
        ];
        let layout = compute_layout_with_config(&persons, &relations, "me", None, &config());
        let ids: Vec<&str> = layout.persons.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["me", "sis"]);
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].kind, EdgeKind::Sibling);
    }
}
