use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inspect_editor::Document;

fn build_file(cards: usize, variant: &str) -> String {
    let mut source = String::from("import React from \"react\";\n");

    for i in 0..cards {
        source.push_str(&format!(
            r#"
export const Card{i} = ({{ title, items }}) => (
  <section className="p-4 m-2 flex flex-col gap-2 shadow {variant}">
    <h2 className="text-lg font-bold">{{title}} #{i}</h2>
    <ul className="list-disc">
      {{items.map((item) => <li key={{item.id}} className="py-1">{{item.label}}</li>)}}
    </ul>
    <p className="text-sm text-gray-500">{{items.length}} items</p>
  </section>
);
"#
        ));
    }

    source
}

fn load_fresh(c: &mut Criterion) {
    let source = build_file(50, "bg-white");

    c.bench_function("load_fresh", |b| b.iter(|| Document::new(black_box(&source))));
}

fn reload_same_shape(c: &mut Criterion) {
    let first = build_file(50, "bg-white");
    let second = build_file(50, "bg-gray-50");
    let mut doc = match Document::new(&first) {
        Ok(doc) => doc,
        Err(err) => panic!("bench source failed to load: {}", err),
    };

    let mut flip = false;
    c.bench_function("reload_same_shape", |b| {
        b.iter(|| {
            flip = !flip;
            let text = if flip { &second } else { &first };
            doc.load(black_box(text))
        })
    });
}

criterion_group!(benches, load_fresh, reload_same_shape);
criterion_main!(benches);
