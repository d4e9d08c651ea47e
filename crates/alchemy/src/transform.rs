//! Key-name transformers for request and response bodies.
//!
//! Walks a JSON tree with an explicit stack (no recursion) and renames every
//! object key with a naming-convention function. Arrays are traversed but
//! have no keys of their own.
//!
//! Conversions are not fully invertible: `userID` becomes `user_id` and comes
//! back as `userId`; `a_b_c` becomes `aB_c`.

use serde_json::Value;

/// Rename every object key in `data`, returning the transformed tree.
pub fn transform<F>(mut data: Value, rename: F) -> Value
where
    F: Fn(&str) -> String,
{
    transform_in_place(&mut data, rename);
    data
}

/// Rename every object key in `data` in place.
pub fn transform_in_place<F>(data: &mut Value, rename: F)
where
    F: Fn(&str) -> String,
{
    let mut stack: Vec<&mut Value> = vec![data];
    while let Some(item) = stack.pop() {
        match item {
            Value::Array(items) => {
                stack.extend(items.iter_mut().filter(|v| is_container(v)));
            }
            Value::Object(map) => {
                // Only the keys present before renaming are visited.
                let original = std::mem::take(map);
                for (key, value) in original {
                    map.insert(rename(&key), value);
                }
                stack.extend(map.values_mut().filter(|v| is_container(v)));
            }
            _ => {}
        }
    }
}

fn is_container(v: &Value) -> bool {
    v.is_object() || v.is_array()
}

pub fn snake_to_camel(data: Value) -> Value {
    transform(data, snake_to_camel_key)
}

pub fn camel_to_snake(data: Value) -> Value {
    transform(data, camel_to_snake_key)
}

/// `foo_bar` -> `fooBar`. Each `x_y` pair of word characters collapses to
/// `xY`, scanning left to right without overlapping pairs.
pub fn snake_to_camel_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len());
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len()
            && is_word(chars[i])
            && chars[i + 1] == '_'
            && is_word(chars[i + 2])
        {
            out.push(chars[i]);
            out.push(chars[i + 2].to_ascii_uppercase());
            i += 3;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// `fooBar` -> `foo_bar`. An underscore goes in at every lowercase-to-uppercase
/// boundary, then the whole key is lowercased.
pub fn camel_to_snake_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for ch in key.chars() {
        if ch.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('_');
        }
        out.push(ch);
        prev = Some(ch);
    }
    out.to_lowercase()
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn key_conversions() {
        assert_eq!(snake_to_camel_key("foo_bar"), "fooBar");
        assert_eq!(snake_to_camel_key("foo_bar_baz"), "fooBarBaz");
        assert_eq!(snake_to_camel_key("already"), "already");
        assert_eq!(snake_to_camel_key("_leading"), "_leading");
        assert_eq!(camel_to_snake_key("fooBar"), "foo_bar");
        assert_eq!(camel_to_snake_key("fooBarBaz"), "foo_bar_baz");
        assert_eq!(camel_to_snake_key("foo_bar"), "foo_bar");
    }

    #[test]
    fn ambiguous_keys_do_not_round_trip() {
        assert_eq!(camel_to_snake_key("userID"), "user_id");
        assert_eq!(snake_to_camel_key("user_id"), "userId");
        assert_eq!(snake_to_camel_key("a_b_c"), "aB_c");
    }

    #[test]
    fn nested_objects_and_arrays_are_renamed() {
        let data = json!({
            "first_name": "Ada",
            "home_address": {"street_name": "Main", "zip_code": 1},
            "pet_list": [{"pet_name": "Rex"}, [{"inner_key": null}], 3, "s_t"]
        });
        let out = snake_to_camel(data);
        assert_eq!(
            out,
            json!({
                "firstName": "Ada",
                "homeAddress": {"streetName": "Main", "zipCode": 1},
                "petList": [{"petName": "Rex"}, [{"innerKey": null}], 3, "s_t"]
            })
        );
    }

    #[test]
    fn top_level_array_is_walked() {
        let out = camel_to_snake(json!([{"postId": 1}, {"authorName": "x"}]));
        assert_eq!(out, json!([{"post_id": 1}, {"author_name": "x"}]));
    }

    #[test]
    fn unchanged_keys_are_kept() {
        let out = snake_to_camel(json!({"id": 1, "title": "t"}));
        assert_eq!(out, json!({"id": 1, "title": "t"}));
    }

    #[test]
    fn in_place_variant_mutates_the_tree() {
        let mut data = json!({"a_b": {"c_d": 1}});
        transform_in_place(&mut data, snake_to_camel_key);
        assert_eq!(data, json!({"aB": {"cD": 1}}));
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut data = json!({"leaf_key": 0});
        for _ in 0..1_000 {
            data = json!({ "wrap_key": data });
        }
        let mut cur = &snake_to_camel(data);
        let mut depth = 0;
        while let Some(next) = cur.get("wrapKey") {
            cur = next;
            depth += 1;
        }
        assert_eq!(depth, 1_000);
        assert_eq!(cur.get("leafKey"), Some(&json!(0)));
    }

    proptest! {
        #[test]
        fn single_boundary_keys_round_trip(a in "[a-z]{2,8}", b in "[a-z]{2,8}") {
            let camel = format!("{}{}{}", a, b[..1].to_ascii_uppercase(), &b[1..]);
            let data = json!({ camel.clone(): [{ camel.clone(): 1 }] });
            let back = snake_to_camel(camel_to_snake(data.clone()));
            prop_assert_eq!(back, data);
        }
    }
}
