//! Property-based tests for Java version parsing

use javelin_core::parse_java_version;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_plain_feature_release_parses_to_itself(major in 2u32..1000u32) {
        assert_eq!(parse_java_version(&major.to_string()), Ok(major));
    }

    #[test]
    fn test_legacy_scheme_maps_to_minor(minor in 0u32..100u32, update in 0u32..500u32) {
        assert_eq!(parse_java_version(&format!("1.{}", minor)), Ok(minor));
        assert_eq!(parse_java_version(&format!("1.{}.0_{}", minor, update)), Ok(minor));
    }

    #[test]
    fn test_modern_patch_releases_keep_major(
        major in 9u32..100u32,
        minor in 0u32..100u32,
        patch in 0u32..100u32
    ) {
        let raw = format!("{}.{}.{}", major, minor, patch);
        assert_eq!(parse_java_version(&raw), Ok(major));
    }

    #[test]
    fn test_parsing_never_panics(raw in "\\PC*") {
        let _ = parse_java_version(&raw);
    }
}
