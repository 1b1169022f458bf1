use crate::pairs::{tokenize_line, LineToken, PairKind};

/// 1-based numbers of the lines a pair-list parse would drop.
///
/// Blank and `#` comment lines are never reported. Uses the same tokenizer
/// as [`crate::parse_pairs_as`], `x`/`X` separators included, so a line is
/// flagged exactly when parsing would discard it.
pub fn validate_pair_lines(text: &str, kind: PairKind) -> Vec<usize> {
    let invalid: Vec<usize> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| tokenize_line(line) == LineToken::Invalid)
        .map(|(idx, _)| idx + 1)
        .collect();
    log::debug!("{kind:?} list: {} invalid line(s)", invalid.len());
    invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::parse_pairs_as;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn reports_invalid_line_numbers() {
        let text = "2000000 10\nfoo\n\n# note\n2000001 y3\n1 2 3\n-4 -5";
        assert_eq!(validate_pair_lines(text, PairKind::IdCount), vec![2, 5, 6]);
    }

    #[test]
    fn x_separator_is_valid_for_both_kinds() {
        let text = "1000x1\n1000 1\n1000 x";
        assert_eq!(validate_pair_lines(text, PairKind::IdCount), vec![3]);
        assert_eq!(validate_pair_lines(text, PairKind::IdState), vec![3]);
    }

    #[test]
    fn empty_text_is_valid() {
        assert!(validate_pair_lines("", PairKind::IdState).is_empty());
        assert!(validate_pair_lines("\n  \n#only comments", PairKind::IdCount).is_empty());
    }

    fn any_kind() -> impl Strategy<Value = PairKind> {
        prop_oneof![Just(PairKind::IdCount), Just(PairKind::IdState)]
    }

    proptest! {
        #[test]
        fn proptest_validation_agrees_with_parser(
            lines in proptest::collection::vec("[0-9xX# +-]{0,12}", 0..10),
            kind in any_kind(),
        ) {
            let text = lines.join("\n");
            let invalid = validate_pair_lines(&text, kind);
            let parsed = parse_pairs_as(&text, kind);
            let non_skipped = text
                .lines()
                .filter(|line| tokenize_line(line) != LineToken::Skip)
                .count();
            prop_assert_eq!(parsed.len() + invalid.len(), non_skipped);
        }
    }
}
