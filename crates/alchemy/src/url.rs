//! `{field}` placeholder substitution for URL templates.
//!
//! A placeholder is an opening brace, any text without braces, and a closing
//! brace. Surrounding whitespace inside the braces is ignored when looking the
//! name up. Placeholders whose value is missing or not a string/number are
//! left in the output exactly as written.

use serde_json::{Number, Value};

use crate::Record;

/// Substitute placeholders in `template` with values from `source`.
pub fn interpolate(template: &str, source: &Record) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, name, raw, after)) = next_placeholder(rest) {
        out.push_str(before);
        match source.get(name.trim()) {
            Some(Value::String(s)) => out.push_str(s),
            Some(Value::Number(n)) => out.push_str(&number_text(n)),
            _ => out.push_str(raw),
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Integral floats render without a fractional part: `7.0` becomes `7`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Trimmed names of every placeholder in `template`, in order.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some((_, name, _, after)) = next_placeholder(rest) {
        names.push(name.trim().to_string());
        rest = after;
    }
    names
}

/// Split off the first placeholder as `(before, inner, raw, after)`.
fn next_placeholder(s: &str) -> Option<(&str, &str, &str, &str)> {
    let mut search_from = 0;
    loop {
        let open = search_from + s[search_from..].find('{')?;
        let tail = &s[open + 1..];
        let close = tail.find(['{', '}'])?;
        if tail.as_bytes()[close] == b'}' {
            let end = open + 1 + close + 1;
            return Some((&s[..open], &tail[..close], &s[open..end], &s[end..]));
        }
        // Nested `{`: the outer brace is literal text, retry from the inner one.
        search_from = open + 1 + close;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn substitutes_numbers_and_strings() {
        let src = rec(json!({"x": 5, "slug": "hello"}));
        assert_eq!(interpolate("/a/{x}/b", &src), "/a/5/b");
        assert_eq!(interpolate("/p/{slug}/{x}", &src), "/p/hello/5");
    }

    #[test]
    fn integral_floats_drop_the_fraction() {
        let src = rec(json!({"a": 7.0, "b": 2.5, "c": -3.0}));
        assert_eq!(interpolate("/p/{a}", &src), "/p/7");
        assert_eq!(interpolate("/p/{b}/{c}", &src), "/p/2.5/-3");
    }

    #[test]
    fn unresolved_placeholder_is_left_intact() {
        assert_eq!(interpolate("/a/{x}", &Record::new()), "/a/{x}");
    }

    #[test]
    fn whitespace_inside_braces_is_tolerated() {
        let src = rec(json!({"url": "google"}));
        assert_eq!(interpolate("http://{ url }.com", &src), "http://google.com");
        assert_eq!(interpolate("http://{ missing }.com", &src), "http://{ missing }.com");
    }

    #[test]
    fn non_scalar_values_do_not_substitute() {
        let src = rec(json!({"a": null, "b": true, "c": {"d": 1}, "e": [1]}));
        assert_eq!(interpolate("{a}/{b}/{c}/{e}", &src), "{a}/{b}/{c}/{e}");
    }

    #[test]
    fn nested_open_brace_is_literal() {
        let src = rec(json!({"id": 3}));
        assert_eq!(interpolate("/x/{{id}", &src), "/x/{3");
        assert_eq!(interpolate("/x/{id", &src), "/x/{id");
    }

    #[test]
    fn placeholders_lists_names_in_order() {
        assert_eq!(placeholders("/u/{ user }/p/{id}"), vec!["user", "id"]);
        assert!(placeholders("/plain/").is_empty());
    }

    proptest! {
        #[test]
        fn brace_free_templates_are_unchanged(t in "[a-z0-9/_.:-]{0,40}") {
            let src = rec(json!({"id": 1}));
            prop_assert_eq!(interpolate(&t, &src), t);
        }

        #[test]
        fn missing_names_survive(name in "[a-z][a-z0-9_]{0,12}") {
            let t = format!("/base/{{{}}}/", name);
            prop_assert_eq!(interpolate(&t, &Record::new()), t);
        }
    }
}
