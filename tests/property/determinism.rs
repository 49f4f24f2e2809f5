//! Property-based tests for order independence and collision detection

use configtx::compose;
use configtx::template::{SimpleTemplate, Template};
use configtx::tree::hasher::compute_group_hash;
use configtx::tree::ConfigValue;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn org_templates(orgs: &BTreeMap<String, Vec<u8>>) -> Vec<Arc<dyn Template>> {
    orgs.iter()
        .map(|(name, material)| {
            let template: Arc<dyn Template> = Arc::new(
                SimpleTemplate::from_value(
                    &["Application", name.as_str()],
                    "MSP",
                    ConfigValue::new(material.clone()),
                )
                .with_origin(name),
            );
            template
        })
        .collect()
}

fn orgs_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(
        "[A-Z][a-z]{1,6}",
        prop::collection::vec(any::<u8>(), 0..16),
        1..6,
    )
}

proptest! {
    /// Non-colliding children compose to the same tree in any order
    #[test]
    fn prop_composition_order_independent(
        (forward, shuffled) in orgs_strategy().prop_flat_map(|orgs| {
            let indices: Vec<usize> = (0..orgs.len()).collect();
            (Just(orgs), Just(indices).prop_shuffle())
        })
    ) {
        let templates = org_templates(&forward);
        let reordered: Vec<Arc<dyn Template>> =
            shuffled.iter().map(|&i| Arc::clone(&templates[i])).collect();

        let a = compose(&templates).unwrap();
        let b = compose(&reordered).unwrap();

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(bincode::serialize(&a).unwrap(), bincode::serialize(&b).unwrap());
        prop_assert_eq!(compute_group_hash(&a), compute_group_hash(&b));
    }

    /// Repeating every template changes nothing
    #[test]
    fn prop_redeclaration_idempotent(orgs in orgs_strategy()) {
        let once = compose(&org_templates(&orgs)).unwrap();

        let mut twice = org_templates(&orgs);
        twice.extend(org_templates(&orgs));
        prop_assert_eq!(compose(&twice).unwrap(), once);
    }

    /// Differing material at one slot always conflicts, whichever comes first
    #[test]
    fn prop_collision_detected_in_either_order(
        name in "[A-Z][a-z]{1,6}",
        first in prop::collection::vec(any::<u8>(), 0..16),
        second in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        prop_assume!(first != second);
        let mut a = BTreeMap::new();
        a.insert(name.clone(), first);
        let mut b = BTreeMap::new();
        b.insert(name, second);

        let mut ab = org_templates(&a);
        ab.extend(org_templates(&b));
        let mut ba = org_templates(&b);
        ba.extend(org_templates(&a));

        prop_assert!(compose(&ab).unwrap_err().is_conflict());
        prop_assert!(compose(&ba).unwrap_err().is_conflict());
    }
}
