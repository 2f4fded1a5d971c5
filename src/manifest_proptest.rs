//! Property-based tests for requirement parsing and name normalization.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{extract_versions, normalize_name, parse_requirement, ManifestFormat};
    use proptest::prelude::*;

    proptest! {
        /// Property: normalization is idempotent
        #[test]
        fn normalize_name_is_idempotent(name in "[A-Za-z0-9][A-Za-z0-9._-]{0,20}") {
            let once = normalize_name(&name);
            prop_assert_eq!(normalize_name(&once), once);
        }

        /// Property: case and separator spelling do not affect the normalized name
        #[test]
        fn normalize_name_ignores_case_and_separators(
            parts in prop::collection::vec("[a-z0-9]{1,6}", 1..4),
            sep in prop::sample::select(vec!["-", "_", ".", "__", "-."]),
        ) {
            let canonical = parts.join("-");
            let variant = parts.join(sep).to_uppercase();
            prop_assert_eq!(normalize_name(&variant), canonical);
        }

        /// Property: an exact pin is reported verbatim
        #[test]
        fn exact_pin_round_trips(
            name in "[a-z][a-z0-9-]{0,12}[a-z0-9]",
            version in "[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}",
        ) {
            let req = parse_requirement(&format!("{}=={}", name, version)).unwrap();
            prop_assert_eq!(req.pin(), Some(version.as_str()));
        }

        /// Property: components never mentioned in the manifest are absent
        #[test]
        fn unmentioned_components_are_absent(version in "[0-9]{1,2}\\.[0-9]{1,2}") {
            let content = format!("\"widget-core=={}\"\n", version);
            let versions = extract_versions(
                &content,
                ManifestFormat::Text,
                &["widget-core", "widget-absent"],
            ).unwrap();
            prop_assert_eq!(versions.get("widget-core"), Some(&version));
            prop_assert!(!versions.contains_key("widget-absent"));
        }
    }
}
