use insta::assert_snapshot;
use ren::Interpreter;

fn mold(source: &str) -> String {
    let mut ev = Interpreter::new();
    let outcome = ev
        .do_source(source)
        .unwrap_or_else(|err| panic!("`{source}` failed: {err}"));
    ev.mold(outcome.value())
}

#[test]
fn mold_blocks_and_words() {
    assert_snapshot!(mold("[a b: :c /d 'e (f) g/h i/j: :k/l]"), @"[a b: :c /d 'e (f) g/h i/j: :k/l]");
}

#[test]
fn mold_scalars() {
    assert_snapshot!(mold("reduce [1 -2 3.0 0.5 4x5 $6.07 -$0.5 _ true]"), @"[1 -2 3.0 0.5 4x5 $6.07 -$0.50 _ #[true]]");
}

#[test]
fn mold_text_and_tags() {
    assert_snapshot!(mold(r#"["a^/b" {say "hi"} <tag>]"#), @r#"["a^/b" "say ^"hi^"" <tag>]"#);
}

#[test]
fn mold_objects() {
    assert_snapshot!(mold("make object! [name: \"ren\" count: 3 tag: 'x]"), @r#"make object! [name: "ren" count: 3 tag: 'x]"#);
}

#[test]
fn mold_quoted_and_meta() {
    assert_snapshot!(mold("reduce [the 'a the ''b meta null meta if true [null]]"), @"['a ''b ' ~null~]");
}

#[test]
fn mold_errors() {
    assert_snapshot!(mold("trap [1 / 0]"), @r#"make error! [id: zero-divide message: "attempt to divide by zero"]"#);
}
