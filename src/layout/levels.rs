use super::*;

/// Breadth-first generation levels from `root`.
///
/// Spouses and siblings share a level, children sit one below, parents one
/// above. The first assignment wins, so conflicting data keeps whichever
/// level the traversal reaches first. Unreachable people are absent.
pub fn assign_levels(
    persons: &[Person],
    relations: &CanonicalRelations,
    root: &str,
) -> BTreeMap<String, i32> {
    let mut levels: BTreeMap<String, i32> = BTreeMap::new();
    if !persons.iter().any(|person| person.id == root) {
        return levels;
    }

    let mut queue: VecDeque<String> = VecDeque::new();
    levels.insert(root.to_string(), 0);
    queue.push_back(root.to_string());

    while let Some(current) = queue.pop_front() {
        let level = levels[&current];
        let steps = relations
            .spouses_of(&current)
            .map(|id| (id, level))
            .chain(relations.siblings_of(&current).map(|id| (id, level)))
            .chain(relations.children_of(&current).map(|id| (id, level + 1)))
            .chain(relations.parents_of(&current).map(|id| (id, level - 1)));
        for (next, next_level) in steps {
            if levels.contains_key(next) {
                continue;
            }
            levels.insert(next.clone(), next_level);
            queue.push_back(next.clone());
        }
    }

    tracing::debug!(leveled = levels.len(), total = persons.len(), "levels assigned");
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> (Vec<Person>, CanonicalRelations) {
        let persons = ["gran", "mum", "dad", "me", "wife", "sis", "kid", "stranger"]
            .iter()
            .map(|id| Person::new(id, "u"))
            .collect();
        let mut rel = CanonicalRelations::default();
        rel.add_parent_child("gran", "mum");
        rel.add_parent_child("mum", "me");
        rel.add_parent_child("dad", "me");
        rel.add_spouses("mum", "dad");
        rel.add_spouses("me", "wife");
        rel.add_siblings("me", "sis");
        rel.add_parent_child("me", "kid");
        (persons, rel)
    }

    #[test]
    fn levels_are_relative_to_root() {
        let (persons, rel) = family();
        let levels = assign_levels(&persons, &rel, "me");
        assert_eq!(levels["me"], 0);
        assert_eq!(levels["wife"], 0);
        assert_eq!(levels["sis"], 0);
        assert_eq!(levels["kid"], 1);
        assert_eq!(levels["mum"], -1);
        assert_eq!(levels["dad"], -1);
        assert_eq!(levels["gran"], -2);
        assert!(!levels.contains_key("stranger"));
    }

    #[test]
    fn rooting_elsewhere_shifts_levels() {
        let (persons, rel) = family();
        let levels = assign_levels(&persons, &rel, "gran");
        assert_eq!(levels["gran"], 0);
        assert_eq!(levels["mum"], 1);
        assert_eq!(levels["me"], 2);
        assert_eq!(levels["kid"], 3);
    }

    #[test]
    fn missing_root_levels_nobody() {
        let (persons, rel) = family();
        assert!(assign_levels(&persons, &rel, "nobody").is_empty());
    }

    #[test]
    fn first_assignment_wins_on_conflicts() {
        let persons: Vec<Person> = ["a", "b"].iter().map(|id| Person::new(id, "u")).collect();
        let mut rel = CanonicalRelations::default();
        rel.add_siblings("a", "b");
        rel.add_parent_child("a", "b");
        let levels = assign_levels(&persons, &rel, "a");
        // Siblings are visited before children.
        assert_eq!(levels["b"], 0);
    }
}
