//! Range expressions for picking a subset of a sorted batch.
//!
//! Positions are 1-based ranks into the sorted item list, not the numbers
//! found in filenames. An expression is a comma-separated list of tokens:
//!
//! | Token | Selects |
//! |---|---|
//! | *(empty expression)* | everything, `1..=N` |
//! | `5` | position 5, if it exists |
//! | `2-6` | positions 2 through 6 |
//! | `9-3` | same as `3-9` |
//! | `-4` | positions 1 through 4 |
//! | `7-` | positions 7 through N |
//! | `-` | everything |
//!
//! Range endpoints are clamped into `1..=N`; single numbers outside that
//! range are dropped. Tokens that are not numbers are ignored.

use std::collections::BTreeSet;

/// Parse `expr` into the ascending, duplicate-free positions it selects
/// out of `max_n` items.
///
/// ```
/// # use imagetool::selection::parse_range_expr;
/// assert_eq!(parse_range_expr("1,3,6-9,12-", 10), vec![1, 3, 6, 7, 8, 9, 10]);
/// ```
pub fn parse_range_expr(expr: &str, max_n: usize) -> Vec<usize> {
    if max_n == 0 {
        return Vec::new();
    }
    if expr.trim().is_empty() {
        return (1..=max_n).collect();
    }

    let mut selected = BTreeSet::new();
    for token in expr.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((start, end)) => {
                if let Some((a, b)) = parse_span(start.trim(), end.trim(), max_n) {
                    selected.extend(a.min(b)..=a.max(b));
                }
            }
            None => match token.parse::<i64>() {
                Ok(i) if i >= 1 && (i as u64) <= max_n as u64 => {
                    selected.insert(i as usize);
                }
                _ => {}
            },
        }
    }

    selected.into_iter().collect()
}

/// Resolve the two sides of an `a-b` token into clamped endpoints.
///
/// An empty side means "open" on that end. `None` if a present side is not
/// a number. A side with more digits than `i64` holds is past the end and
/// clamps to `max_n`.
fn parse_span(start: &str, end: &str, max_n: usize) -> Option<(usize, usize)> {
    let bound = |side: &str, open: usize| -> Option<usize> {
        if side.is_empty() {
            return Some(open);
        }
        match side.parse::<i64>() {
            Ok(v) => Some(clamp(v, max_n)),
            Err(_) if side.bytes().all(|b| b.is_ascii_digit()) => Some(max_n),
            Err(_) => None,
        }
    };
    Some((bound(start, 1)?, bound(end, max_n)?))
}

/// `min(max(x, 1), max_n)`; requires `max_n >= 1`.
fn clamp(value: i64, max_n: usize) -> usize {
    if value < 1 {
        1
    } else {
        (value as u64).min(max_n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expression_selects_all() {
        assert_eq!(parse_range_expr("", 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(parse_range_expr("   ", 3), vec![1, 2, 3]);
    }

    #[test]
    fn single_number() {
        assert_eq!(parse_range_expr("5", 10), vec![5]);
    }

    #[test]
    fn closed_range() {
        assert_eq!(parse_range_expr("2-6", 10), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn open_start_range() {
        assert_eq!(parse_range_expr("-4", 10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn open_end_range() {
        assert_eq!(parse_range_expr("7-", 10), vec![7, 8, 9, 10]);
    }

    #[test]
    fn bare_dash_selects_all() {
        assert_eq!(parse_range_expr("-", 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn mixed_tokens_union() {
        assert_eq!(
            parse_range_expr("1,3,6-9,12-", 10),
            vec![1, 3, 6, 7, 8, 9, 10]
        );
    }

    #[test]
    fn reversed_range_is_reordered() {
        assert_eq!(parse_range_expr("9-3", 10), vec![3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn overlapping_tokens_are_deduplicated() {
        assert_eq!(parse_range_expr("2-4,3,4-5,2", 10), vec![2, 3, 4, 5]);
    }

    #[test]
    fn out_of_bound_singles_are_dropped() {
        assert_eq!(parse_range_expr("0,11,3", 10), vec![3]);
    }

    #[test]
    fn range_endpoints_are_clamped() {
        assert_eq!(parse_range_expr("0-2", 10), vec![1, 2]);
        assert_eq!(parse_range_expr("8-99", 10), vec![8, 9, 10]);
        assert_eq!(parse_range_expr("-99", 3), vec![1, 2, 3]);
    }

    #[test]
    fn whitespace_around_tokens_and_sides() {
        assert_eq!(parse_range_expr(" 1 , 3 - 4 ,, ", 10), vec![1, 3, 4]);
    }

    #[test]
    fn non_numeric_tokens_are_ignored() {
        assert_eq!(parse_range_expr("a,2,x-3,4-y,5", 10), vec![2, 5]);
    }

    #[test]
    fn only_garbage_yields_empty() {
        assert!(parse_range_expr("abc", 10).is_empty());
        assert!(parse_range_expr(",,,", 10).is_empty());
    }

    #[test]
    fn zero_items_always_empty() {
        assert!(parse_range_expr("", 0).is_empty());
        assert!(parse_range_expr("1-", 0).is_empty());
        assert!(parse_range_expr("-", 0).is_empty());
        assert!(parse_range_expr("3", 0).is_empty());
    }

    #[test]
    fn huge_numbers_clamp_instead_of_overflowing() {
        assert_eq!(parse_range_expr("5-9999999999", 6), vec![5, 6]);
        assert!(parse_range_expr("99999999999999999999999", 6).is_empty());
    }

    #[test]
    fn endpoints_wider_than_i64_clamp_to_last_position() {
        assert_eq!(parse_range_expr("5-99999999999999999999", 6), vec![5, 6]);
        assert_eq!(parse_range_expr("99999999999999999999-", 6), vec![6]);
        assert_eq!(
            parse_range_expr("-99999999999999999999", 6),
            vec![1, 2, 3, 4, 5, 6]
        );
        assert!(parse_range_expr("99999999999999999999", 6).is_empty());
        assert!(parse_range_expr("9999x9999999999999999999-", 6).is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        let expr = "1,3,6-9,12-";
        assert_eq!(parse_range_expr(expr, 10), parse_range_expr(expr, 10));
    }
}
