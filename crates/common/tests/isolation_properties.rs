use proptest::prelude::*;
use warden_common::{
    TenantId, TenantOwned, assert_same_tenant, create_tenant_data_accessor, filter_by_tenant,
    generate_tenant_id, is_valid_tenant_id, sanitize_tenant_slug, scope_to_tenant,
    validate_tenant_access,
};

fn tenant() -> impl Strategy<Value = TenantId> {
    prop::sample::select(vec!["acme", "globex", "initech", "umbrella"]).prop_map(TenantId::new)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn filter_partitions_records(
        owners in prop::collection::vec(tenant(), 0..50),
        target in tenant(),
    ) {
        let records: Vec<_> = owners
            .iter()
            .enumerate()
            .map(|(i, owner)| scope_to_tenant(i, owner))
            .collect();

        let kept = filter_by_tenant(records.clone(), &target);
        let expected: Vec<usize> = owners
            .iter()
            .enumerate()
            .filter(|(_, owner)| **owner == target)
            .map(|(i, _)| i)
            .collect();

        prop_assert_eq!(kept.iter().map(|r| **r).collect::<Vec<_>>(), expected);
        prop_assert!(kept.iter().all(|r| validate_tenant_access(r, &target)));

        let accessor = create_tenant_data_accessor(&target);
        for record in &records {
            let same = record.tenant_id() == &target;
            prop_assert_eq!(accessor.validate(record), same);
            prop_assert_eq!(assert_same_tenant(&target, record.tenant_id(), "read").is_ok(), same);
        }
    }

    #[test]
    fn slug_is_idempotent_and_bounded(raw in "\\PC{0,120}") {
        let slug = sanitize_tenant_slug(&raw);
        prop_assert!(slug.chars().count() <= 50);
        prop_assert_eq!(sanitize_tenant_slug(&slug), slug.clone());
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        if slug.len() >= 3 {
            prop_assert!(is_valid_tenant_id(&slug));
        }
    }

    #[test]
    fn generated_ids_are_valid(_seed in 0u8..10) {
        prop_assert!(is_valid_tenant_id(generate_tenant_id().as_str()));
    }
}
