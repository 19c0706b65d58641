//! Property tests for version strength semantics

use mason_package::{Dependency, VersionStrength};
use proptest::prelude::*;
use semver::Version;

fn version() -> impl Strategy<Value = Version> {
    (0u64..4, 0u64..6, 0u64..6).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
}

const ORDERED: [VersionStrength; 4] = [
    VersionStrength::Exact,
    VersionStrength::Patch,
    VersionStrength::Minor,
    VersionStrength::Major,
];

proptest! {
    #[test]
    fn every_strength_accepts_the_requested_version(requested in version()) {
        for strength in ORDERED {
            prop_assert!(strength.allows(&requested, &requested));
        }
    }

    #[test]
    fn stronger_acceptance_implies_weaker(requested in version(), candidate in version()) {
        for pair in ORDERED.windows(2) {
            if pair[0].allows(&requested, &candidate) {
                prop_assert!(pair[1].allows(&requested, &candidate));
            }
        }
    }

    #[test]
    fn no_strength_crosses_a_major_boundary(requested in version(), candidate in version()) {
        prop_assume!(requested.major != candidate.major);
        for strength in ORDERED {
            prop_assert!(!strength.allows(&requested, &candidate));
        }
    }

    #[test]
    fn dependency_strings_round_trip(requested in version(), idx in 0usize..4) {
        let dep = Dependency::new("pkg", requested, ORDERED[idx]);
        let parsed: Dependency = dep.to_string().parse().unwrap();
        prop_assert_eq!(parsed, dep);
    }
}
