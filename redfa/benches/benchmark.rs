use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use redfa::dfa::Dfa;
use redfa::parser;
use regex::Regex as LibRegex;

lazy_static! {
    static ref REGEXES: Box<[String]> = [
        "(a|b)*abb",
        "a*b+c?",
        "(a|b|c){2,8}",
        "[a-m]n[o-z]*",
        "((a|b)*(c|d)+)?abcd",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
}

fn compile(input: &str) -> Dfa {
    parser::regex(input)
        .unwrap()
        .to_nfa()
        .unwrap()
        .to_dfa()
        .minimized()
}

pub fn full_pipeline(c: &mut Criterion) {
    c.bench_function("redfa compile", |b| {
        b.iter(|| compile(black_box(&REGEXES[0])))
    });

    c.bench_function("library regex compile", |b| {
        b.iter(|| LibRegex::new(black_box(&REGEXES[0])).unwrap())
    });
}

pub fn stages(c: &mut Criterion) {
    let regex = parser::regex(&REGEXES[4]).unwrap();
    let nfa = regex.to_nfa().unwrap();
    let dfa = nfa.to_dfa();

    c.bench_function("parse to postfix", |b| {
        b.iter(|| parser::regex(black_box(&REGEXES[4])).unwrap())
    });
    c.bench_function("thompson construction", |b| {
        b.iter(|| black_box(&regex).to_nfa().unwrap())
    });
    c.bench_function("subset construction", |b| b.iter(|| black_box(&nfa).to_dfa()));
    c.bench_function("hopcroft minimization", |b| {
        b.iter(|| black_box(&dfa).minimized())
    });
}

pub fn simulation(c: &mut Criterion) {
    let dfa = compile(&REGEXES[0]);
    c.bench_function("simulate", |b| {
        b.iter(|| dfa.simulate_graphemes(black_box("abababbababbabb")))
    });
}

criterion_group!(benches, full_pipeline, stages, simulation);
criterion_main!(benches);
