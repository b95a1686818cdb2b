//! Endpoint modules for the CJ Affiliate APIs.
//!
//! Each module owns one upstream endpoint, shares the crate's
//! [`RequestExecutor`](crate::executor::RequestExecutor) through an `Arc`,
//! and maps the normalized response tree into typed pages. Parameter
//! defaulting and required-parameter checks live here, not in the executor.

mod advertiser_lookup;
mod commission_detail;
mod link_search;
mod offer_feed;
mod product_search;
mod program_terms;
mod promotional_properties;

pub use advertiser_lookup::{Advertiser, AdvertiserLookup, AdvertiserPage, AdvertiserQuery};
pub use commission_detail::{
    AdvertiserTotals, CommissionDetail, CommissionQuery, CommissionSummary,
};
pub use link_search::{Link, LinkPage, LinkQuery, LinkSearch};
pub use offer_feed::OfferFeed;
pub use product_search::{Money, Product, ProductPage, ProductQuery, ProductSearch};
pub use program_terms::ProgramTerms;
pub use promotional_properties::{
    NewPromotionalProperty, PromotionalProperties, PromotionalPropertyUpdate,
};

use serde_json::Value;

/// Look up `name` in a decoded map, tolerating the `@`-prefixed attribute
/// spelling XML normalization produces.
pub(crate) fn field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value
        .get(name)
        .or_else(|| value.get(format!("@{name}").as_str()))
}

/// First present of several key spellings. REST endpoints answer XML with
/// hyphenated tags but switch to camelCase when returning JSON.
pub(crate) fn field_any<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| field(value, name))
}

/// Step into the `cj-api` wrapper REST responses carry. Trees without the
/// wrapper pass through unchanged.
pub(crate) fn unwrap_cj_api(value: &Value) -> &Value {
    value.get("cj-api").unwrap_or(value)
}

pub(crate) fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

pub(crate) fn text_or(value: Option<&Value>, default: &str) -> String {
    let text = text(value);
    if text.is_empty() {
        String::from(default)
    } else {
        text
    }
}

pub(crate) fn int(value: Option<&Value>) -> i64 {
    int_or(value, 0)
}

pub(crate) fn int_or(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(number)) => number.as_i64().unwrap_or(default),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub(crate) fn float(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.eq_ignore_ascii_case("true") || text == "1",
        Some(Value::Number(number)) => number.as_i64() == Some(1),
        _ => false,
    }
}

/// Render a GraphQL string literal with quote, backslash and control
/// characters escaped.
pub(crate) fn gql_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => {
                out.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
    out
}

pub(crate) fn gql_string_list(items: &[String]) -> String {
    let rendered: Vec<String> = items.iter().map(|item| gql_string(item)).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_falls_back_to_attribute_spelling() {
        let value = json!({"@total-matched": "7", "advertiser": []});

        assert_eq!(field(&value, "total-matched"), Some(&json!("7")));
        assert_eq!(field(&value, "advertiser"), Some(&json!([])));
        assert_eq!(field(&value, "missing"), None);
    }

    #[test]
    fn field_any_tries_spellings_in_order() {
        let camel = json!({"linkId": "9"});
        let hyphen = json!({"link-id": "9"});

        assert_eq!(field_any(&camel, &["linkId", "link-id"]), Some(&json!("9")));
        assert_eq!(field_any(&hyphen, &["linkId", "link-id"]), Some(&json!("9")));
    }

    #[test]
    fn coercions_accept_strings_and_numbers() {
        assert_eq!(int(Some(&json!("42"))), 42);
        assert_eq!(int(Some(&json!(42))), 42);
        assert_eq!(int_or(Some(&json!("junk")), 5), 5);
        assert_eq!(int_or(None, 1), 1);
        assert!((float(Some(&json!("1.25"))) - 1.25).abs() < f64::EPSILON);
        assert!((float(Some(&json!(1.25))) - 1.25).abs() < f64::EPSILON);
        assert!(flag(Some(&json!("true"))));
        assert!(flag(Some(&json!("1"))));
        assert!(flag(Some(&json!(true))));
        assert!(!flag(Some(&json!("no"))));
        assert_eq!(text(Some(&json!(7))), "7");
        assert_eq!(text_or(None, "en"), "en");
    }

    #[test]
    fn gql_string_escapes_quotes_and_backslashes() {
        assert_eq!(gql_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(gql_string(r"a\b"), r#""a\\b""#);
        assert_eq!(gql_string("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn gql_string_list_renders_quoted_items() {
        let items = vec![String::from("123"), String::from("456")];

        assert_eq!(gql_string_list(&items), r#"["123", "456"]"#);
    }
}
