//! Property-based tests for the JSON-like document parser.
//!
//! Documents are generated twice over: once in compact form and once with
//! whitespace and comments scattered between the tokens. Both must parse,
//! and serializing either tree must give back the compact form.

use parsekit::{parse, ScalarKind, Value};
use proptest::prelude::*;

/// A compact document and the same document with noise between tokens.
type Rendered = (String, String);

fn scalar_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Integers
        "-?[1-9][0-9]{0,8}",
        Just("0".to_string()),
        // Reals
        "-?[0-9]{1,4}\\.[0-9]{1,4}",
        "-?[0-9]{1,3}(\\.[0-9]{1,3})?[eE][+-]?[0-9]{1,2}",
        // Strings, with a few simple escapes
        "\"[a-zA-Z0-9 _.-]{0,10}\"",
        "\"[a-z]{0,4}(\\\\n|\\\\\"|\\\\\\\\)[a-z]{0,4}\"",
        // Keywords
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
    ]
}

fn key_strategy() -> impl Strategy<Value = String> {
    "\"[a-z][a-z0-9_]{0,6}\""
}

/// Whitespace or comments that may sit between any two tokens.
fn noise_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just(" "),
        Just("\n\t"),
        Just(" /* note */ "),
        Just(" // note\n"),
        Just("# note\n"),
    ]
}

fn document_strategy() -> impl Strategy<Value = Rendered> {
    let leaf = scalar_strategy().prop_map(|s| (s.clone(), s));
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec((inner.clone(), noise_strategy()), 0..5).prop_map(|items| {
                let compact: Vec<_> = items.iter().map(|((c, _), _)| c.as_str()).collect();
                let mut noisy = String::from("[");
                for (i, ((_, n), noise)) in items.iter().enumerate() {
                    if i > 0 {
                        noisy.push(',');
                    }
                    noisy.push_str(noise);
                    noisy.push_str(n);
                    noisy.push_str(noise);
                }
                noisy.push(']');
                (format!("[{}]", compact.join(",")), noisy)
            }),
            prop::collection::vec((key_strategy(), inner, noise_strategy()), 0..5).prop_map(
                |fields| {
                    let compact: Vec<_> = fields
                        .iter()
                        .map(|(k, (c, _), _)| format!("{}:{}", k, c))
                        .collect();
                    let mut noisy = String::from("{");
                    for (i, (key, (_, n), noise)) in fields.iter().enumerate() {
                        if i > 0 {
                            noisy.push(',');
                        }
                        noisy.push_str(noise);
                        noisy.push_str(key);
                        noisy.push_str(noise);
                        noisy.push(':');
                        noisy.push_str(noise);
                        noisy.push_str(n);
                    }
                    noisy.push_str(" }");
                    (format!("{{{}}}", compact.join(",")), noisy)
                }
            ),
        ]
    })
}

/// Field names and scalar kinds in document order.
fn shape(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(fields) => {
            out.push("{".to_string());
            for field in fields {
                out.push(field.name().to_string());
                shape(field.value(), out);
            }
            out.push("}".to_string());
        }
        Value::Array(elements) => {
            out.push("[".to_string());
            elements.iter().for_each(|e| shape(e, out));
            out.push("]".to_string());
        }
        Value::Scalar(scalar) => out.push(scalar.kind().to_string()),
    }
}

#[cfg(test)]
mod document_properties {
    use super::*;

    proptest! {
        #[test]
        fn test_noise_does_not_change_the_tree((compact, noisy) in document_strategy()) {
            let tree = parse(&noisy);
            prop_assert!(tree.is_ok(), "Failed to parse: {:?}: {:?}", noisy, tree);
            prop_assert_eq!(tree.unwrap().to_text(), compact);
        }

        #[test]
        fn test_serialization_is_idempotent((compact, _) in document_strategy()) {
            let first = parse(&compact).unwrap();
            let second = parse(&first.to_text()).unwrap();
            let third = parse(&first.to_pretty_text()).unwrap();

            let (mut a, mut b, mut c) = (Vec::new(), Vec::new(), Vec::new());
            shape(first.root(), &mut a);
            shape(second.root(), &mut b);
            shape(third.root(), &mut c);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(&a, &c);
            prop_assert_eq!(first.to_text(), third.to_text());
        }

        #[test]
        fn test_scalars_keep_their_raw_text(raw in scalar_strategy()) {
            let tree = parse(&format!("[{}]", raw)).unwrap();
            let scalar = tree.element(0).unwrap().as_scalar().unwrap();
            prop_assert_eq!(scalar.raw(), raw.as_str());
            if scalar.kind() == ScalarKind::String {
                prop_assert_eq!(scalar.text(), &raw[1..raw.len() - 1]);
            }
        }

        #[test]
        fn test_arbitrary_input_never_panics(input in "\\PC{0,64}") {
            let _ = parse(&input);
        }

        #[test]
        fn test_bracket_soup_never_panics(input in "[\\[\\]{}:,\"a1 ]{0,48}") {
            if let Err(err) = parse(&input) {
                // Every failure points inside the input or just past it.
                let location = err.location();
                prop_assert_eq!(location.line, 0);
                prop_assert!(location.column <= input.chars().count());
            }
        }
    }
}
