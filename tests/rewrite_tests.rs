use vite_envsubst::pattern::{EnvPattern, MatchSpan};
use vite_envsubst::rewrite::{rewrite, rewrite_to_string};

const PREFIX: &str = "globalThis.env.";

fn pattern(names: &[&str]) -> EnvPattern {
    EnvPattern::new(names).expect("non-empty name set")
}

fn apply(names: &[&str], code: &str) -> Option<String> {
    rewrite(code, &pattern(names), PREFIX)
        .expect("rewrite should succeed")
        .map(|r| r.code)
}

#[test]
fn rewrites_a_simple_read() {
    assert_eq!(
        apply(&["VITE_API_URL"], "const url = import.meta.env.VITE_API_URL;").as_deref(),
        Some("const url = globalThis.env.VITE_API_URL;")
    );
}

#[test]
fn only_declared_names_are_rewritten() {
    let code = "f(import.meta.env.VITE_A, import.meta.env.VITE_B, import.meta.env.MODE)";
    assert_eq!(
        apply(&["VITE_A"], code).as_deref(),
        Some("f(globalThis.env.VITE_A, import.meta.env.VITE_B, import.meta.env.MODE)")
    );
}

#[test]
fn declared_prefix_of_a_longer_name_does_not_match() {
    let code = "x = import.meta.env.VITE_API_URL;";
    assert_eq!(apply(&["VITE_API"], code), None);
    assert_eq!(
        apply(&["VITE_API", "VITE_API_URL"], code).as_deref(),
        Some("x = globalThis.env.VITE_API_URL;")
    );
}

#[test]
fn assignment_targets_are_left_alone_but_later_reads_are_rewritten() {
    let code = "import.meta.env.VITE_X = 'v';\nconsole.log(import.meta.env.VITE_X);\n";
    assert_eq!(
        apply(&["VITE_X"], code).as_deref(),
        Some("import.meta.env.VITE_X = 'v';\nconsole.log(globalThis.env.VITE_X);\n")
    );
}

#[test]
fn comparisons_are_still_reads() {
    let code = "if (import.meta.env.VITE_X == 'a' || import.meta.env.VITE_X === 'b' || import.meta.env.VITE_X != 'c' || import.meta.env.VITE_X >= 1) {}";
    let expected = "if (globalThis.env.VITE_X == 'a' || globalThis.env.VITE_X === 'b' || globalThis.env.VITE_X != 'c' || globalThis.env.VITE_X >= 1) {}";
    assert_eq!(apply(&["VITE_X"], code).as_deref(), Some(expected));
}

#[test]
fn compound_assignment_keeps_the_narrow_rule() {
    assert_eq!(
        apply(&["VITE_X"], "import.meta.env.VITE_X += 'y';").as_deref(),
        Some("globalThis.env.VITE_X += 'y';")
    );
}

#[test]
fn assignment_exclusion_skips_whitespace_and_newlines() {
    assert_eq!(apply(&["VITE_X"], "import.meta.env.VITE_X\n\t= 1;"), None);
}

#[test]
fn byte_order_mark_before_equals_is_whitespace() {
    assert_eq!(apply(&["VITE_X"], "import.meta.env.VITE_X\u{FEFF}= 1;"), None);
}

#[test]
fn identifier_and_dollar_prefixes_block_the_match() {
    let code = "my_import.meta.env.VITE_X; $import.meta.env.VITE_X; a.import.meta.env.VITE_X;";
    assert_eq!(
        apply(&["VITE_X"], code).as_deref(),
        Some("my_import.meta.env.VITE_X; $import.meta.env.VITE_X; a.globalThis.env.VITE_X;")
    );
}

#[test]
fn matches_at_start_of_text_and_after_punctuation() {
    let code = "import.meta.env.VITE_X\n`${import.meta.env.VITE_X}`;[import.meta.env.VITE_X]";
    assert_eq!(
        apply(&["VITE_X"], code).as_deref(),
        Some("globalThis.env.VITE_X\n`${globalThis.env.VITE_X}`;[globalThis.env.VITE_X]")
    );
}

#[test]
fn adjacent_references_are_all_rewritten() {
    assert_eq!(
        apply(&["VITE_A", "VITE_B"], "(import.meta.env.VITE_A,import.meta.env.VITE_B)").as_deref(),
        Some("(globalThis.env.VITE_A,globalThis.env.VITE_B)")
    );
}

#[test]
fn preserves_surrounding_bytes_exactly() {
    let code = "é\r\n  const a =  import.meta.env.VITE_A ;\t// ünïcode\r\n";
    assert_eq!(
        apply(&["VITE_A"], code).as_deref(),
        Some("é\r\n  const a =  globalThis.env.VITE_A ;\t// ünïcode\r\n")
    );
}

#[test]
fn no_literal_prefix_means_no_transformation() {
    assert_eq!(apply(&["VITE_A"], "const a = import.meta.env;"), None);
    assert_eq!(apply(&["VITE_A"], "const a = env.VITE_A;"), None);
}

#[test]
fn prefix_present_but_nothing_eligible_is_no_transformation() {
    assert_eq!(apply(&["VITE_A"], "const m = import.meta.env.MODE;"), None);
}

#[test]
fn spans_exclude_the_boundary_character() {
    let p = pattern(&["VITE_A"]);
    let code = " import.meta.env.VITE_A";
    assert_eq!(
        p.find_spans(code),
        vec![MatchSpan {
            start: 1,
            end: code.len(),
            name: "VITE_A",
        }]
    );
}

#[test]
fn repeated_scans_with_one_pattern_are_independent() {
    let p = pattern(&["VITE_A"]);
    let code = "a(import.meta.env.VITE_A)";
    let first = p.find_spans(code);
    let second = p.find_spans(code);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn edits_track_original_positions() {
    let code = "x(import.meta.env.VITE_A); y(import.meta.env.VITE_B);";
    let result = rewrite(code, &pattern(&["VITE_A", "VITE_B"]), "window.env.")
        .expect("rewrite")
        .expect("changed");

    assert_eq!(result.edits.len(), 2);
    assert_eq!(&code[result.edits[0].start..result.edits[0].end], "import.meta.env.VITE_A");
    assert_eq!(result.edits[0].text, "window.env.VITE_A");
    assert_eq!(&code[result.edits[1].start..result.edits[1].end], "import.meta.env.VITE_B");

    let y_original = code.find("y(").expect("y in original");
    let y_rewritten = result.code.find("y(").expect("y in rewritten");
    assert_eq!(result.map_offset(y_original), y_rewritten);
}

#[test]
fn whole_string_variant_agrees_with_tracked_rewrite() {
    let p = pattern(&["VITE_A", "VITE_B"]);
    let code = "import.meta.env.VITE_A = 1; f(import.meta.env.VITE_A, import.meta.env.VITE_B);";
    let tracked = rewrite(code, &p, PREFIX).expect("rewrite").expect("changed");
    assert_eq!(rewrite_to_string(code, &p, PREFIX), tracked.code);
}

#[test]
fn longer_alternative_wins_when_both_are_declared() {
    let p = pattern(&["VITE_A", "VITE_A_B"]);
    assert_eq!(p.find_spans("import.meta.env.VITE_A_B").len(), 1);
    assert_eq!(p.find_spans("import.meta.env.VITE_A_B")[0].name, "VITE_A_B");
}
