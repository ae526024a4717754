use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use family_tree_layout::config::TreeConfig;
use family_tree_layout::ir::{Person, Relation, RelationType, Sex};
use family_tree_layout::layout::compute_layout_with_config;
use family_tree_layout::render::render_svg;
use family_tree_layout::theme::Theme;
use std::hint::black_box;

/// Couples with `fanout` children each, `generations` deep. Every child
/// marries someone from outside the family.
fn synthetic_family(generations: usize, fanout: usize) -> (Vec<Person>, Vec<Relation>) {
    let mut persons = Vec::new();
    let mut relations = Vec::new();
    let mut next = 0usize;
    let mut person = |persons: &mut Vec<Person>, sex: Sex, year: usize| {
        let id = format!("p{next}");
        next += 1;
        persons.push(
            Person::new(&id, &id)
                .with_sex(sex)
                .with_birth_date(&format!("{year}-01-01")),
        );
        id
    };

    let mut couples = vec![(
        person(&mut persons, Sex::Male, 1900),
        person(&mut persons, Sex::Female, 1902),
    )];
    relations.push(Relation::new(&couples[0].0, &couples[0].1, RelationType::Spouse));

    for generation in 1..generations {
        let year = 1900 + generation * 25;
        let mut next_couples = Vec::new();
        for (father, mother) in &couples {
            let mut siblings = Vec::new();
            for k in 0..fanout {
                let child = person(&mut persons, Sex::Male, year + k);
                let partner = person(&mut persons, Sex::Female, year + k + 1);
                relations.push(Relation::new(father, &child, RelationType::Father));
                relations.push(Relation::new(&child, mother, RelationType::Son));
                relations.push(Relation::new(&child, &partner, RelationType::Spouse));
                for sibling in &siblings {
                    relations.push(Relation::new(sibling, &child, RelationType::Brother));
                }
                siblings.push(child.clone());
                next_couples.push((child, partner));
            }
        }
        couples = next_couples;
    }
    (persons, relations)
}

fn bench_layout(c: &mut Criterion) {
    let config = TreeConfig::default();
    let mut group = c.benchmark_group("compute_layout");
    for (generations, fanout) in [(3, 2), (4, 3), (5, 3)] {
        let (persons, relations) = synthetic_family(generations, fanout);
        let root = persons[persons.len() - 2].id.clone();
        group.bench_with_input(
            BenchmarkId::new("family", format!("{generations}x{fanout}")),
            &(persons, relations),
            |b, (persons, relations)| {
                b.iter(|| {
                    black_box(compute_layout_with_config(
                        black_box(persons),
                        black_box(relations),
                        &root,
                        None,
                        &config,
                    ))
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let config = TreeConfig::default();
    let theme = Theme::modern();
    let (persons, relations) = synthetic_family(4, 3);
    let layout = compute_layout_with_config(&persons, &relations, "p0", None, &config);
    c.bench_function("render_svg/family_4x3", |b| {
        b.iter(|| black_box(render_svg(black_box(&layout), &theme, &config, &Default::default())));
    });
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
