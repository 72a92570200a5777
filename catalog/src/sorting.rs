//! Field sorting for aggregated product lists.
//!
//! Products are ordered with a loose three-way comparator: ascending puts `b`
//! first only when `a > b`, descending only when `a < b`, and every other
//! outcome (equal, missing or incomparable values) keeps `a` first. That is
//! not a total order, so `slice::sort_by` cannot be used with it; a merge sort
//! that only asks "does `a` come after `b`" is well defined for any predicate.

use crate::product::Product;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Only the literal `asc` (or no value) sorts ascending.
    pub fn from_param(order: Option<&str>) -> Self {
        match order {
            None | Some("asc") => SortOrder::Ascending,
            Some(_) => SortOrder::Descending,
        }
    }
}

pub fn sort_products(products: Vec<Product>, field: &str, order: SortOrder) -> Vec<Product> {
    merge_sort(products, &|a: &Product, b: &Product| {
        let (a, b) = (a.field(field), b.field(field));
        match order {
            SortOrder::Ascending => loosely_greater(a, b),
            SortOrder::Descending => loosely_greater(b, a),
        }
    })
}

fn merge_sort<T, F>(mut items: Vec<T>, comes_after: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> bool,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let mut left = merge_sort(items, comes_after).into_iter().peekable();
    let mut right = merge_sort(right, comes_after).into_iter().peekable();
    let mut merged = Vec::with_capacity(left.len() + right.len());

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(a), Some(b)) => comes_after(a, b),
            _ => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged.extend(left);
    merged.extend(right);

    merged
}

/// Relational `a > b` over JSON field values.
///
/// Two strings compare by UTF-16 code units. Any other pair is compared
/// numerically after coercion; a value that does not coerce to a number
/// (including a missing field) makes the comparison false.
fn loosely_greater(a: Option<&Value>, b: Option<&Value>) -> bool {
    if let (Some(Value::String(a)), Some(Value::String(b))) = (a, b) {
        return a.encode_utf16().cmp(b.encode_utf16()) == Ordering::Greater;
    }

    to_number(a) > to_number(b)
}

fn to_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Null) => 0.0,
        Some(Value::String(s)) => parse_numeric_text(s),
        Some(Value::Array(_)) | Some(Value::Object(_)) | None => f64::NAN,
    }
}

/// Numeric value of a string as the loose comparison sees it.
///
/// Blank text is 0. Accepted forms are signed decimals with an optional
/// exponent, `Infinity` with an optional sign, and unsigned `0x`/`0o`/`0b`
/// integers. Anything else, including `inf` and `nan`, is NaN.
fn parse_numeric_text(text: &str) -> f64 {
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if text.is_empty() {
        return 0.0;
    }

    if let Some(value) = parse_radix_integer(text) {
        return value;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let decimal_only = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_only {
        return f64::NAN;
    }

    text.parse().unwrap_or(f64::NAN)
}

fn parse_radix_integer(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let value = digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN);
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn products(values: &[Value]) -> Vec<Product> {
        values
            .iter()
            .map(|v| serde_json::from_value(v.clone()).unwrap())
            .collect()
    }

    fn field_values(products: &[Product], field: &str) -> Vec<Value> {
        products
            .iter()
            .map(|p| p.field(field).cloned().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn test_order_from_param() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(Some("ASC")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(Some("")), SortOrder::Descending);
    }

    #[test]
    fn test_sort_numeric_ascending_and_descending() {
        let input = products(&[
            json!({"price": 30}),
            json!({"price": 5.5}),
            json!({"price": 100}),
            json!({"price": 12}),
            json!({"price": -1}),
        ]);

        let asc = sort_products(input.clone(), "price", SortOrder::Ascending);
        assert_eq!(
            field_values(&asc, "price"),
            vec![json!(-1), json!(5.5), json!(12), json!(30), json!(100)]
        );

        let mut desc = sort_products(input, "price", SortOrder::Descending);
        desc.reverse();
        assert_eq!(desc, asc);
    }

    #[test]
    fn test_sort_strings_by_code_units() {
        let input = products(&[
            json!({"productName": "laptop"}),
            json!({"productName": "Zeta"}),
            json!({"productName": "Alpha"}),
            json!({"productName": "10"}),
            json!({"productName": "9"}),
        ]);

        let asc = sort_products(input, "productName", SortOrder::Ascending);
        assert_eq!(
            field_values(&asc, "productName"),
            vec![
                json!("10"),
                json!("9"),
                json!("Alpha"),
                json!("Zeta"),
                json!("laptop")
            ]
        );
    }

    #[test]
    fn test_numeric_strings_coerce_against_numbers() {
        assert!(loosely_greater(Some(&json!("10")), Some(&json!(9))));
        assert!(!loosely_greater(Some(&json!("abc")), Some(&json!(9))));
        assert!(loosely_greater(Some(&json!(true)), Some(&json!(null))));
        assert!(!loosely_greater(None, Some(&json!(1))));
        assert!(!loosely_greater(Some(&json!(1)), None));
    }

    #[test]
    fn test_numeric_text_forms() {
        let number = |s: &str| to_number(Some(&json!(s)));

        assert_eq!(number(" 12.5 "), 12.5);
        assert_eq!(number(""), 0.0);
        assert_eq!(number("-3e2"), -300.0);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("0x1A"), 26.0);
        assert_eq!(number("0b101"), 5.0);
        assert_eq!(number("0O17"), 15.0);
        assert_eq!(number("Infinity"), f64::INFINITY);
        assert_eq!(number("-Infinity"), f64::NEG_INFINITY);

        for text in ["inf", "infinity", "INFINITY", "NaN", "nan", "-0x1", "0x", "0xG", "1_000", "12px"] {
            assert!(number(text).is_nan(), "{text}");
        }
    }

    #[test]
    fn test_non_numeric_text_never_compares_against_numbers() {
        assert!(!loosely_greater(Some(&json!("inf")), Some(&json!(1))));
        assert!(!loosely_greater(Some(&json!(1)), Some(&json!("inf"))));
        assert!(loosely_greater(Some(&json!("Infinity")), Some(&json!(1e308))));
        assert!(loosely_greater(Some(&json!("0x1A")), Some(&json!(25))));
    }

    #[test]
    fn test_ties_and_missing_fields() {
        let input = products(&[
            json!({"name": "a", "rating": 4}),
            json!({"name": "b"}),
            json!({"name": "c", "rating": 4}),
            json!({"name": "d", "rating": 3}),
        ]);

        let asc = sort_products(input, "rating", SortOrder::Ascending);
        // A missing rating never compares greater than anything, so "b" stays
        // directly behind "a"; the equal ratings of "a" and "c" keep their order.
        assert_eq!(
            field_values(&asc, "name"),
            vec![json!("d"), json!("a"), json!("b"), json!("c")]
        );
    }

    #[test]
    fn test_sort_empty_and_single() {
        assert!(sort_products(Vec::new(), "price", SortOrder::Ascending).is_empty());
        let single = products(&[json!({"price": 1})]);
        assert_eq!(
            sort_products(single.clone(), "price", SortOrder::Descending),
            single
        );
    }
}
