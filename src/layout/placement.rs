use super::*;

/// Share of a horizontal step below which two unit centers count as taken.
const SLOT_CLEARANCE: f32 = 0.8;

/// Assigns every unit's center x.
///
/// The root's unit is pinned at 0 and the rest of level 0 alternates right and
/// left of it. Descendant levels are then placed top-down under their parent
/// unit, and ancestor levels bottom-up over their children.
pub fn place_units(
    units: &mut FamilyUnits,
    relations: &CanonicalRelations,
    lookup: &HashMap<&str, &Person>,
    root: &str,
    config: &TreeConfig,
) {
    let Some(root_unit) = units.unit_of(root) else {
        return;
    };
    let step = config.horizontal_step();
    let root_level = units.units[root_unit].level;
    let (Some(min_level), Some(max_level)) = (units.levels().min(), units.levels().max()) else {
        return;
    };

    place_root_level(units, root_unit, step);
    place_orphans(units, relations, root_level, step);
    for level in (root_level + 1)..=max_level {
        place_descendant_level(units, lookup, level, step);
        place_orphans(units, relations, level, step);
    }
    for level in (min_level..root_level).rev() {
        place_ancestor_level(units, level);
        place_orphans(units, relations, level, step);
        enforce_separation(units, level, step);
    }
}

fn place_root_level(units: &mut FamilyUnits, root_unit: usize, step: f32) {
    units.units[root_unit].cx = Some(0.0);
    let level = units.units[root_unit].level;
    let mut others: Vec<usize> = units
        .on_level(level)
        .iter()
        .copied()
        .filter(|&idx| idx != root_unit)
        .collect();
    others.sort_by(|&a, &b| units.units[a].key.cmp(&units.units[b].key));
    for (k, idx) in others.into_iter().enumerate() {
        let distance = (k / 2 + 1) as f32 * step;
        let cx = if k % 2 == 0 { distance } else { -distance };
        units.units[idx].cx = Some(cx);
    }
}

fn place_descendant_level(
    units: &mut FamilyUnits,
    lookup: &HashMap<&str, &Person>,
    level: i32,
    step: f32,
) {
    let mut claimed = claimed_on_level(units, level);
    let mut parents: Vec<usize> = units
        .on_level(level - 1)
        .iter()
        .copied()
        .filter(|&idx| units.units[idx].cx.is_some() && !units.units[idx].children.is_empty())
        .collect();
    sort_by_center(units, &mut parents);

    for parent in parents {
        let Some(center) = units.units[parent].cx else {
            continue;
        };
        let mut kids: Vec<&str> = units.units[parent]
            .children
            .iter()
            .map(String::as_str)
            .collect();
        kids.sort_by(|a, b| birth_order(lookup, a, b));

        let mut group: Vec<usize> = Vec::new();
        for kid in kids {
            let Some(idx) = units.unit_of(kid) else {
                continue;
            };
            let unit = &units.units[idx];
            if unit.level == level && unit.cx.is_none() && !group.contains(&idx) {
                group.push(idx);
            }
        }

        let half_span = (group.len() as f32 - 1.0) / 2.0;
        for (i, idx) in group.into_iter().enumerate() {
            let target = center + (i as f32 - half_span) * step;
            let cx = claim_slot(target, &mut claimed, step);
            units.units[idx].cx = Some(cx);
        }
    }
}

fn place_ancestor_level(units: &mut FamilyUnits, level: i32) {
    let mut groups: BTreeMap<String, (Vec<usize>, f32)> = BTreeMap::new();
    let mut members: Vec<usize> = units.on_level(level).to_vec();
    members.sort_by(|&a, &b| units.units[a].key.cmp(&units.units[b].key));

    for idx in members {
        let mut child_units: Vec<usize> = Vec::new();
        for child in &units.units[idx].children {
            let Some(child_idx) = units.unit_of(child) else {
                continue;
            };
            let child_unit = &units.units[child_idx];
            if child_unit.level == level + 1
                && child_unit.cx.is_some()
                && !child_units.contains(&child_idx)
            {
                child_units.push(child_idx);
            }
        }
        if child_units.is_empty() {
            continue;
        }
        let mut keys: Vec<String> = child_units
            .iter()
            .map(|&child| units.units[child].key.to_string())
            .collect();
        keys.sort();
        let center = child_units
            .iter()
            .filter_map(|&child| units.units[child].cx)
            .sum::<f32>()
            / child_units.len() as f32;
        groups
            .entry(keys.join(","))
            .or_insert_with(|| (Vec::new(), center))
            .0
            .push(idx);
    }

    for (parents, center) in groups.into_values() {
        for idx in parents {
            units.units[idx].cx = Some(center);
        }
    }
}

/// Gives units the sweeps could not reach a free slot near their siblings.
fn place_orphans(units: &mut FamilyUnits, relations: &CanonicalRelations, level: i32, step: f32) {
    let mut orphans: Vec<usize> = units
        .on_level(level)
        .iter()
        .copied()
        .filter(|&idx| units.units[idx].cx.is_none())
        .collect();
    if orphans.is_empty() {
        return;
    }
    orphans.sort_by(|&a, &b| units.units[a].key.cmp(&units.units[b].key));
    let mut claimed = claimed_on_level(units, level);

    for idx in orphans {
        let target = kin_center(units, relations, idx).unwrap_or(0.0);
        let cx = claim_slot(target, &mut claimed, step);
        tracing::debug!(unit = %units.units[idx].key, level, cx, "placed unit without anchor");
        units.units[idx].cx = Some(cx);
    }
}

/// Mean center of already placed units holding a sibling or spouse of any
/// partner of `idx`.
fn kin_center(units: &FamilyUnits, relations: &CanonicalRelations, idx: usize) -> Option<f32> {
    let mut total = 0.0f32;
    let mut count = 0usize;
    for partner in &units.units[idx].partners {
        for kin in relations.siblings_of(partner).chain(relations.spouses_of(partner)) {
            let Some(kin_idx) = units.unit_of(kin) else {
                continue;
            };
            if kin_idx == idx {
                continue;
            }
            if let Some(cx) = units.units[kin_idx].cx {
                total += cx;
                count += 1;
            }
        }
    }
    (count > 0).then(|| total / count as f32)
}

/// Pushes overlapping centers rightwards until neighbours are a full step
/// apart.
fn enforce_separation(units: &mut FamilyUnits, level: i32, step: f32) {
    let mut row: Vec<usize> = units
        .on_level(level)
        .iter()
        .copied()
        .filter(|&idx| units.units[idx].cx.is_some())
        .collect();
    sort_by_center(units, &mut row);

    let mut previous: Option<f32> = None;
    for idx in row {
        let Some(mut cx) = units.units[idx].cx else {
            continue;
        };
        if let Some(prev) = previous
            && cx - prev < step
        {
            cx = prev + step;
            units.units[idx].cx = Some(cx);
        }
        previous = Some(cx);
    }
}

/// Snaps `target` to the horizontal grid and walks right until no claimed
/// center is closer than the clearance.
pub(crate) fn claim_slot(target: f32, claimed: &mut Vec<f32>, step: f32) -> f32 {
    let clearance = step * SLOT_CLEARANCE;
    let mut x = (target / step).round() * step;
    // Each claimed center blocks at most two grid slots.
    for _ in 0..=claimed.len() * 2 {
        if !claimed.iter().any(|&taken| (taken - x).abs() < clearance) {
            break;
        }
        x += step;
    }
    claimed.push(x);
    x
}

fn claimed_on_level(units: &FamilyUnits, level: i32) -> Vec<f32> {
    units
        .on_level(level)
        .iter()
        .filter_map(|&idx| units.units[idx].cx)
        .collect()
}

fn sort_by_center(units: &FamilyUnits, indices: &mut [usize]) {
    indices.sort_by(|&a, &b| {
        let ua = &units.units[a];
        let ub = &units.units[b];
        ua.cx
            .unwrap_or(0.0)
            .total_cmp(&ub.cx.unwrap_or(0.0))
            .then_with(|| ua.key.cmp(&ub.key))
    });
}

/// Oldest first; unknown birth dates after known ones, ties by id.
fn birth_order(lookup: &HashMap<&str, &Person>, a: &str, b: &str) -> Ordering {
    let born = |id: &str| lookup.get(id).and_then(|person| person.birth_day());
    match (born(a), born(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.cmp(b))
}
