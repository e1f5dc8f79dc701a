use crate::{align_tokens, tokenize, AlignmentOp, Category, OpKind, Provenance, Token};

fn tokens(text: &str) -> Vec<Token> {
    tokenize(text, &Provenance::default())
}

fn summary(ops: &[AlignmentOp<'_>]) -> Vec<(OpKind, String, String)> {
    ops.iter()
        .map(|op| {
            (
                op.kind(),
                op.lhs().map(|t| t.text.clone()).unwrap_or_default(),
                op.rhs().map(|t| t.text.clone()).unwrap_or_default(),
            )
        })
        .collect()
}

#[test]
fn identical_lines() {
    let left = tokens("hello world");
    let right = tokens("hello world");
    let alignment = align_tokens(&left, &right);

    assert_eq!(alignment.similarity(), 1.0);
    assert_eq!(alignment.stats.matched, 2);
    assert_eq!(alignment.changes().count(), 0);
}

#[test]
fn alignment_ignores_case_and_dash_variants() {
    let left = tokens("Net—30 TERMS");
    let right = tokens("net-30 terms");
    let alignment = align_tokens(&left, &right);
    assert_eq!(alignment.changes().count(), 0);
}

#[test]
fn single_word_insertion() {
    let left = tokens("Payment is due");
    let right = tokens("Payment is not due");
    let alignment = align_tokens(&left, &right);

    let inserted: Vec<_> = alignment.inserted().collect();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].text, "not");
    assert_eq!(inserted[0].kind, Category::Negation);
    assert_eq!(inserted[0].column_index, 2);
    assert_eq!(alignment.stats.inserted, 1);
    assert_eq!(alignment.stats.matched, 3);
}

#[test]
fn punctuation_removal() {
    let left = tokens("Item, cost");
    let right = tokens("Item cost");
    let alignment = align_tokens(&left, &right);

    let deleted: Vec<_> = alignment.deleted().collect();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].text, ",");
    assert_eq!(deleted[0].kind, Category::Punctuation);
}

#[test]
fn amount_substitution() {
    let left = tokens("Total: $500.00");
    let right = tokens("Total: $550.00");
    let alignment = align_tokens(&left, &right);

    assert_eq!(
        summary(&alignment.ops),
        vec![
            (OpKind::Match, "Total".into(), "Total".into()),
            (OpKind::Match, ":".into(), ":".into()),
            (OpKind::Match, "$".into(), "$".into()),
            (OpKind::Substitute, "500.00".into(), "550.00".into()),
        ]
    );
}

#[test]
fn uneven_replacement_pairs_prefix_then_spills() {
    let left = tokens("Deliver within 30 days");
    let right = tokens("Deliver in 45 business days");
    let alignment = align_tokens(&left, &right);

    let changes: Vec<_> = alignment.changes().copied().collect();
    assert_eq!(
        summary(&changes),
        vec![
            (OpKind::Substitute, "within".into(), "in".into()),
            (OpKind::Substitute, "30".into(), "45".into()),
            (OpKind::Insert, "".into(), "business".into()),
        ]
    );
}

#[test]
fn one_side_empty() {
    let left = tokens("hello there");
    let right: Vec<Token> = vec![];
    let alignment = align_tokens(&left, &right);

    assert_eq!(alignment.similarity(), 0.0);
    assert_eq!(alignment.deleted().count(), 2);

    let alignment = align_tokens(&right, &left);
    assert_eq!(alignment.inserted().count(), 2);
}

#[test]
fn both_sides_empty() {
    let empty: Vec<Token> = vec![];
    let alignment = align_tokens(&empty, &empty);
    assert!(alignment.ops.is_empty());
    assert_eq!(alignment.similarity(), 1.0);
}

// Holds for these lines only. Longest-match ties resolve to the earliest
// position, so reordered tokens (`x y` against `y x`) can align differently
// in each direction.
#[test]
fn swapped_inputs_mirror_structure() {
    let cases = [
        ("Payment is due", "Payment is not due"),
        ("Item, cost", "Item cost"),
        ("Total: $500.00", "Total: $550.00"),
        ("Deliver within 30 days", "Deliver in 45 business days"),
        ("a b c", "a x c d"),
    ];

    for (x, y) in cases.iter() {
        let left = tokens(x);
        let right = tokens(y);
        let forward = align_tokens(&left, &right);
        let backward = align_tokens(&right, &left);

        assert_eq!(
            summary(&forward.mirror().ops),
            summary(&backward.ops),
            "{:?} vs {:?}",
            x,
            y
        );
        assert_eq!(forward.mirror().stats, backward.stats);
    }
}

#[test]
fn substitution_keeps_both_categories() {
    let left = tokens("limit < 5");
    let right = tokens("limit >= 5");
    let alignment = align_tokens(&left, &right);

    let subs: Vec<_> = alignment.substituted().collect();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].0.kind, Category::Comparator);
    assert_eq!(subs[0].1.text, ">");
}
