use super::*;

/// De-duplicated, directed view of the raw relation records.
///
/// `children` and `parents` mirror each other; `spouses` and `siblings` are
/// symmetric. Nobody is ever related to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRelations {
    pub spouses: BTreeMap<String, BTreeSet<String>>,
    pub children: BTreeMap<String, BTreeSet<String>>,
    pub parents: BTreeMap<String, BTreeSet<String>>,
    pub siblings: BTreeMap<String, BTreeSet<String>>,
}

impl CanonicalRelations {
    pub fn add_spouses(&mut self, a: &str, b: &str) {
        add_symmetric(&mut self.spouses, a, b);
    }

    pub fn add_siblings(&mut self, a: &str, b: &str) {
        add_symmetric(&mut self.siblings, a, b);
    }

    pub fn add_parent_child(&mut self, parent: &str, child: &str) {
        if parent == child {
            return;
        }
        self.children
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
        self.parents
            .entry(child.to_string())
            .or_default()
            .insert(parent.to_string());
    }

    pub fn spouses_of(&self, id: &str) -> impl Iterator<Item = &String> {
        neighbours(&self.spouses, id)
    }

    pub fn siblings_of(&self, id: &str) -> impl Iterator<Item = &String> {
        neighbours(&self.siblings, id)
    }

    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &String> {
        neighbours(&self.children, id)
    }

    pub fn parents_of(&self, id: &str) -> impl Iterator<Item = &String> {
        neighbours(&self.parents, id)
    }

    /// Unordered spouse pairs as `(a, b)` with `a < b`.
    pub fn spouse_pairs(&self) -> Vec<(&str, &str)> {
        unordered_pairs(&self.spouses)
    }

    pub fn sibling_pairs(&self) -> Vec<(&str, &str)> {
        unordered_pairs(&self.siblings)
    }

    pub fn parent_child_pairs(&self) -> Vec<(&str, &str)> {
        self.children
            .iter()
            .flat_map(|(parent, kids)| kids.iter().map(move |kid| (parent.as_str(), kid.as_str())))
            .collect()
    }
}

fn add_symmetric(map: &mut BTreeMap<String, BTreeSet<String>>, a: &str, b: &str) {
    if a == b {
        return;
    }
    map.entry(a.to_string()).or_default().insert(b.to_string());
    map.entry(b.to_string()).or_default().insert(a.to_string());
}

fn neighbours<'a>(
    map: &'a BTreeMap<String, BTreeSet<String>>,
    id: &str,
) -> impl Iterator<Item = &'a String> {
    map.get(id).into_iter().flatten()
}

fn unordered_pairs(map: &BTreeMap<String, BTreeSet<String>>) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    for (a, others) in map {
        for b in others {
            if a < b {
                pairs.push((a.as_str(), b.as_str()));
            }
        }
    }
    pairs
}

/// Builds the canonical model. Records naming an id missing from `persons`
/// are dropped.
pub fn normalize_relations(persons: &[Person], relations: &[Relation]) -> CanonicalRelations {
    let lookup: HashMap<&str, &Person> = persons
        .iter()
        .map(|person| (person.id.as_str(), person))
        .collect();
    let mut canonical = CanonicalRelations::default();
    let mut dropped = 0usize;

    for relation in relations {
        let (Some(from), Some(to)) = (
            lookup.get(relation.from_person_id.as_str()),
            lookup.get(relation.to_person_id.as_str()),
        ) else {
            dropped += 1;
            continue;
        };
        match relation.kind {
            RelationType::Spouse => canonical.add_spouses(&from.id, &to.id),
            RelationType::Brother | RelationType::Sister => {
                canonical.add_siblings(&from.id, &to.id)
            }
            RelationType::Father | RelationType::Mother => {
                canonical.add_parent_child(&from.id, &to.id)
            }
            RelationType::Son | RelationType::Daughter => {
                let (parent, child) = resolve_offspring_direction(from, to, relation.kind);
                canonical.add_parent_child(&parent.id, &child.id);
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "relations referencing unknown persons dropped");
    }
    canonical
}

/// Decides which side of a `son`/`daughter` record is the parent.
///
/// A strictly earlier birth date wins. Without two dates, a source whose sex
/// matches the tag is the child. Otherwise the source is taken as the parent.
pub fn resolve_offspring_direction<'a>(
    from: &'a Person,
    to: &'a Person,
    kind: RelationType,
) -> (&'a Person, &'a Person) {
    if let (Some(from_born), Some(to_born)) = (from.birth_day(), to.birth_day()) {
        match from_born.cmp(&to_born) {
            Ordering::Less => return (from, to),
            Ordering::Greater => return (to, from),
            Ordering::Equal => {}
        }
    }
    if from.sex.is_some() && from.sex == kind.implied_sex() {
        return (to, from);
    }
    (from, to)
}
