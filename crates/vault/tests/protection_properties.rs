use proptest::prelude::*;
use warden_common::TenantId;
use warden_vault::{
    FieldProtector, MasterKey, decrypt_tenant_data, encrypt_tenant_data, mask_sensitive_data,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn round_trip_recovers_plaintext(plaintext in "\\PC*", key in "\\PC{1,64}") {
        let encrypted = encrypt_tenant_data(&plaintext, &key).unwrap();
        prop_assert_eq!(decrypt_tenant_data(encrypted.as_str(), &key), Some(plaintext));
    }

    #[test]
    fn wrong_key_never_decrypts(
        plaintext in "\\PC{1,128}",
        k1 in "[a-z0-9]{1,32}",
        k2 in "[a-z0-9]{1,32}",
    ) {
        prop_assume!(k1 != k2);
        let encrypted = encrypt_tenant_data(&plaintext, &k1).unwrap();
        prop_assert_eq!(decrypt_tenant_data(encrypted.as_str(), &k2), None);
    }

    #[test]
    fn ciphertext_never_contains_plaintext(plaintext in "[ -~]{16,96}", key in "\\PC{1,32}") {
        let encrypted = encrypt_tenant_data(&plaintext, &key).unwrap();
        prop_assert!(!encrypted.as_str().contains(plaintext.as_str()));
    }

    #[test]
    fn masking_preserves_length_and_suffix(value in "\\PC{0,40}", keep in 0usize..12) {
        let masked = mask_sensitive_data(&value, keep);
        let len = value.chars().count();
        prop_assert_eq!(masked.chars().count(), len);

        if len <= keep {
            prop_assert!(masked.chars().all(|c| c == '*'));
        } else {
            let suffix: String = value.chars().skip(len - keep).collect();
            prop_assert!(masked.ends_with(&suffix));
            prop_assert!(masked.chars().take(len - keep).all(|c| c == '*'));
        }
    }
}

#[test]
fn tenant_keys_do_not_decrypt_each_other() {
    let master = MasterKey::parse(&MasterKey::generate()).unwrap();
    let acme = FieldProtector::new(&master.tenant_key(&TenantId::new("acme")).unwrap());
    let globex = FieldProtector::new(&master.tenant_key(&TenantId::new("globex")).unwrap());

    let sealed = acme.encrypt("IBAN DE89 3704 0044 0532 0130 00").unwrap();
    assert_eq!(
        acme.decrypt(sealed.as_str()).as_deref(),
        Some("IBAN DE89 3704 0044 0532 0130 00")
    );
    assert_eq!(globex.decrypt(sealed.as_str()), None);
}
