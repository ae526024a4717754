use super::*;

/// Identity of a family unit. Couples are keyed by their two partner ids in
/// ascending order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitKey {
    Couple(String, String),
    Single(String),
}

impl UnitKey {
    pub fn couple(a: &str, b: &str) -> Self {
        if a <= b {
            Self::Couple(a.to_string(), b.to_string())
        } else {
            Self::Couple(b.to_string(), a.to_string())
        }
    }

    pub fn single(id: &str) -> Self {
        Self::Single(id.to_string())
    }
}

impl std::fmt::Display for UnitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Couple(a, b) => write!(f, "{a}|{b}"),
            Self::Single(a) => write!(f, "{a}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyUnit {
    pub key: UnitKey,
    pub partners: Vec<String>,
    pub children: Vec<String>,
    pub level: i32,
    pub cx: Option<f32>,
}

impl FamilyUnit {
    fn new(key: UnitKey, partners: Vec<String>, level: i32) -> Self {
        Self {
            key,
            partners,
            children: Vec::new(),
            level,
            cx: None,
        }
    }
}

/// All units of one computation, indexed by level and by partner.
#[derive(Debug, Clone, Default)]
pub struct FamilyUnits {
    pub units: Vec<FamilyUnit>,
    pub by_level: BTreeMap<i32, Vec<usize>>,
    pub by_partner: HashMap<String, usize>,
}

impl FamilyUnits {
    pub fn unit_of(&self, person: &str) -> Option<usize> {
        self.by_partner.get(person).copied()
    }

    pub fn levels(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_level.keys().copied()
    }

    pub fn on_level(&self, level: i32) -> &[usize] {
        self.by_level.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    fn push(&mut self, unit: FamilyUnit) -> usize {
        let idx = self.units.len();
        for partner in &unit.partners {
            self.by_partner.insert(partner.clone(), idx);
        }
        self.by_level.entry(unit.level).or_default().push(idx);
        self.units.push(unit);
        idx
    }
}

/// Rounds half up, so a couple split across levels -1 and 0 lands on 0.
fn couple_level(a: i32, b: i32) -> i32 {
    ((f64::from(a) + f64::from(b)) / 2.0 + 0.5).floor() as i32
}

/// Groups leveled people into couples and single-parent units and attaches
/// each parent's children to the parent's unit.
///
/// A person is a partner in at most one unit: with several spouses, the
/// first pair in id order forms the couple and the rest stand alone.
pub fn build_family_units(
    levels: &BTreeMap<String, i32>,
    relations: &CanonicalRelations,
) -> FamilyUnits {
    let mut units = FamilyUnits::default();

    for (a, b) in relations.spouse_pairs() {
        let (Some(&level_a), Some(&level_b)) = (levels.get(a), levels.get(b)) else {
            continue;
        };
        if units.by_partner.contains_key(a) || units.by_partner.contains_key(b) {
            continue;
        }
        units.push(FamilyUnit::new(
            UnitKey::couple(a, b),
            vec![a.to_string(), b.to_string()],
            couple_level(level_a, level_b),
        ));
    }

    for (id, &level) in levels {
        if units.by_partner.contains_key(id) {
            continue;
        }
        units.push(FamilyUnit::new(UnitKey::single(id), vec![id.clone()], level));
    }

    for (parent, child) in relations.parent_child_pairs() {
        if !levels.contains_key(child) {
            continue;
        }
        let Some(idx) = units.unit_of(parent) else {
            continue;
        };
        let unit = &mut units.units[idx];
        if !unit.children.iter().any(|existing| existing == child) {
            unit.children.push(child.to_string());
        }
    }

    tracing::debug!(units = units.units.len(), "family units built");
    units
}
