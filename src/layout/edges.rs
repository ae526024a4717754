use super::*;

/// One edge per spouse pair, per parent/child pair and per sibling pair,
/// limited to people that received a position.
pub fn build_edges(
    relations: &CanonicalRelations,
    positions: &BTreeMap<String, NodePosition>,
) -> Vec<DrawableEdge> {
    let placed = |a: &str, b: &str| positions.contains_key(a) && positions.contains_key(b);
    let mut edges = Vec::new();

    for (a, b) in relations.spouse_pairs() {
        if placed(a, b) {
            edges.push(edge(a, b, EdgeKind::Spouse));
        }
    }
    for (parent, child) in relations.parent_child_pairs() {
        if placed(parent, child) {
            edges.push(edge(parent, child, EdgeKind::ParentChild));
        }
    }
    for (a, b) in relations.sibling_pairs() {
        if placed(a, b) {
            edges.push(edge(a, b, EdgeKind::Sibling));
        }
    }

    tracing::debug!(edges = edges.len(), "edges built");
    edges
}

fn edge(from: &str, to: &str, kind: EdgeKind) -> DrawableEdge {
    DrawableEdge {
        from: from.to_string(),
        to: to.to_string(),
        kind,
    }
}
