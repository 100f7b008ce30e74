use criterion::{criterion_group, criterion_main, Criterion};
use textcore_bidi::{
    get_bidi_types, get_bracket_types, get_par_embedding_levels, logical_to_visual, CharType,
    Options,
};

const SAMPLES: &[(&str, &str)] = &[
    ("latin", "The quick brown fox jumps over the lazy dog (twice) 1234."),
    (
        "hebrew",
        "\u{05E9}\u{05DC}\u{05D5}\u{05DD} \u{05E2}\u{05D5}\u{05DC}\u{05DD} (abc) 12.5% \u{05D8}\u{05E7}\u{05E1}\u{05D8}",
    ),
    (
        "arabic",
        "\u{0627}\u{0644}\u{0633}\u{0644}\u{0627}\u{0645} \u{0639}\u{0644}\u{064A}\u{0643}\u{0645} \u{0661}\u{0662}\u{0663} [x]",
    ),
    (
        "isolates",
        "a\u{2067}\u{05D0} b\u{2066}c \u{05D1}\u{2069}\u{2069} \u{202B}d\u{202C} e",
    ),
];

fn paragraph(c: &mut Criterion) {
    for (name, sample) in SAMPLES {
        let text: Vec<char> = sample.chars().cycle().take(4096).collect();
        let types = get_bidi_types(&text);
        let brackets = get_bracket_types(&text, &types);
        c.bench_function(&format!("levels_{name}"), |b| {
            b.iter(|| {
                let mut base_dir = CharType::ON;
                get_par_embedding_levels(&types, &brackets, &mut base_dir)
            })
        });
        c.bench_function(&format!("visual_{name}"), |b| {
            b.iter(|| {
                let mut base_dir = CharType::ON;
                logical_to_visual(Options::DEFAULT, &text, &mut base_dir)
            })
        });
    }
}

criterion_group!(benches, paragraph);
criterion_main!(benches);
