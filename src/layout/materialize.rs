use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    pub x: f32,
    pub y: f32,
    pub level: i32,
}

/// Expands unit centers into per-person coordinates and translates the
/// result so `root` sits at the origin. Units without a center are skipped.
///
/// Coordinates are snapped to the layout grid and the right partner is placed
/// from the left one, so partner and level distances equal the configured
/// steps exactly.
pub fn materialize_positions(
    units: &FamilyUnits,
    root: &str,
    config: &TreeConfig,
) -> BTreeMap<String, NodePosition> {
    let vertical = config.vertical_step();
    let spouse = config.spouse_step();
    let mut positions: BTreeMap<String, NodePosition> = BTreeMap::new();

    for level in units.levels() {
        let mut row: Vec<&FamilyUnit> = units
            .on_level(level)
            .iter()
            .map(|&idx| &units.units[idx])
            .collect();
        row.sort_by(|a, b| {
            a.cx.unwrap_or(0.0)
                .total_cmp(&b.cx.unwrap_or(0.0))
                .then_with(|| a.key.cmp(&b.key))
        });
        let y = level as f32 * vertical;
        for unit in row {
            let Some(cx) = unit.cx else {
                continue;
            };
            match unit.partners.as_slice() {
                [left, right] => {
                    let x = snap_to_grid(cx - spouse / 2.0);
                    positions.insert(left.clone(), NodePosition { x, y, level });
                    positions.insert(right.clone(), NodePosition { x: x + spouse, y, level });
                }
                [single] => {
                    let x = snap_to_grid(cx);
                    positions.insert(single.clone(), NodePosition { x, y, level });
                }
                _ => {}
            }
        }
    }

    if let Some(origin) = positions.get(root).copied() {
        for position in positions.values_mut() {
            position.x -= origin.x;
            position.y -= origin.y;
        }
    }
    positions
}

/// Bounding box of the card centers, padded by half a card on every side.
pub fn compute_bounds(persons: &[PositionedPerson], config: &TreeConfig) -> TreeBounds {
    if persons.is_empty() {
        return TreeBounds::default();
    }
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for person in persons {
        min_x = min_x.min(person.x);
        max_x = max_x.max(person.x);
        min_y = min_y.min(person.y);
        max_y = max_y.max(person.y);
    }
    let pad_x = config.card_width / 2.0;
    let pad_y = config.card_height / 2.0;
    TreeBounds {
        min_x: min_x - pad_x,
        max_x: max_x + pad_x,
        min_y: min_y - pad_y,
        max_y: max_y + pad_y,
    }
}
