//! Property tests for placeholder rendering and SQL identifier checks.

use proptest::prelude::*;

use fabric_wall::templates::{render, validate_identifier};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: rendering arbitrary text never panics.
    #[test]
    fn property_render_never_panics(content in ".{0,200}") {
        let _ = render("fuzz", &content, [("KEY", "value")]);
    }

    /// PROPERTY: text without placeholders renders unchanged.
    #[test]
    fn property_plain_text_is_unchanged(content in "[^{}]{0,200}") {
        let out = render("plain", &content, std::iter::empty());
        prop_assert_eq!(out.ok(), Some(content));
    }

    /// PROPERTY: every supplied key is substituted, wherever it appears.
    #[test]
    fn property_known_keys_are_replaced(
        prefix in "[a-z ]{0,20}",
        suffix in "[a-z ]{0,20}",
        value in "[A-Za-z0-9-]{1,36}",
    ) {
        let content = format!("{prefix}{{{{WS}}}}{suffix}{{{{ WS }}}}");
        let out = render("t", &content, [("WS", value.as_str())]).unwrap();
        prop_assert_eq!(out, format!("{prefix}{value}{suffix}{value}"));
    }

    /// PROPERTY: identifiers containing SQL delimiters are always rejected.
    #[test]
    fn property_identifiers_with_delimiters_are_rejected(
        head in "[A-Za-z0-9_]{0,10}",
        bad in prop_oneof![Just(']'), Just('['), Just('\''), Just(';'), Just('"')],
        tail in "[A-Za-z0-9_]{0,10}",
    ) {
        let value = format!("{head}{bad}{tail}");
        prop_assert!(validate_identifier("table", &value).is_err());
    }
}
