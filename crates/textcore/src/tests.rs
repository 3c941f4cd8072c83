#[cfg(test)]
mod unit_tests {
    use super::super::*;

    #[test]
    fn test_stats_report_text() {
        let stats = DocumentStats::of("The quick brown fox\njumps over\nthe lazy dog.");
        insta::assert_snapshot!(stats.to_string(), @r###"
        Lines: 3
        Words: 9
        Characters: 44
        Characters (no spaces): 36
        "###);
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = DocumentStats::of("a b\nc");
        let json = serde_json::to_string(&stats).unwrap();
        insta::assert_snapshot!(json, @r###"{"lines":2,"words":3,"chars":5,"chars_no_spaces":3}"###);
    }

    #[test]
    fn test_find_then_replace_agree() {
        let text = "Error: disk full. error: retry. ERROR!";
        // find is case-insensitive, replace is literal
        assert_eq!(find_all(text, "error").len(), 3);
        let replaced = replace_all(text, "error", "warning");
        assert_eq!(replaced.count, 1);
        assert_eq!(find_all(&replaced.text, "warning").len(), 1);
    }

    #[test]
    fn test_replace_then_find_offsets_follow_new_text() {
        let replaced = replace_all("x-x-x", "-", "--");
        assert_eq!(replaced.text, "x--x--x");
        assert_eq!(find_all(&replaced.text, "x"), vec![0..1, 3..4, 6..7]);
    }
}
