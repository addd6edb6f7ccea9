use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inspect_parser::{parse, print};

fn parse_simple_component(c: &mut Criterion) {
    let source = r#"
export function Button({ label }) {
  return (
    <button className="px-4 py-2 rounded bg-blue-500 text-white">
      {label}
    </button>
  );
}
"#;

    c.bench_function("parse_simple_component", |b| {
        b.iter(|| parse(black_box(source)))
    });
}

fn build_large_file() -> String {
    let mut source = String::from("import React from \"react\";\n");

    for i in 0..50 {
        source.push_str(&format!(
            r#"
export const Card{i} = ({{ title, items }}) => {{
  const count = items.length > 0 ? items.length : 0;
  return (
    <section className="p-4 m-2 flex flex-col gap-2 shadow">
      <h2 className="text-lg font-bold">{{title}} #{i}</h2>
      <ul className="list-disc">
        {{items.map((item) => <li key={{item.id}} className="py-1">{{item.label}}</li>)}}
      </ul>
      <p className="text-sm text-gray-500">{{count}} items</p>
    </section>
  );
}};
"#
        ));
    }

    source
}

fn parse_large_file(c: &mut Criterion) {
    let source = build_large_file();

    c.bench_function("parse_large_file", |b| {
        b.iter(|| parse(black_box(&source)))
    });
}

fn print_large_file(c: &mut Criterion) {
    let source = build_large_file();
    let file = match parse(&source) {
        Ok(file) => file,
        Err(err) => panic!("bench source failed to parse: {}", err),
    };

    c.bench_function("print_large_file", |b| {
        b.iter(|| print(black_box(&file)))
    });
}

fn tokenize_only(c: &mut Criterion) {
    use inspect_parser::tokenize;

    let source = build_large_file();

    c.bench_function("tokenize_only", |b| {
        b.iter(|| tokenize(black_box(&source)))
    });
}

criterion_group!(
    benches,
    parse_simple_component,
    parse_large_file,
    print_large_file,
    tokenize_only
);
criterion_main!(benches);
