//! 密码哈希功能单元测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use tasktrack::auth::password::{PasswordError, PasswordHasher};

#[test]
fn test_password_hash_and_verify() {
    let hasher = PasswordHasher::new();
    let password = "TestPassword123!";

    let hash = hasher.hash(password).expect("Hashing should succeed");

    // 哈希值应该包含 argon2id 标识
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains(password));

    assert!(hasher.verify(password, &hash).expect("Verification should succeed"));
}

#[test]
fn test_password_verify_with_wrong_password() {
    let hasher = PasswordHasher::new();

    let hash = hasher.hash("TestPassword123!").expect("Hashing should succeed");

    let matched = hasher.verify("WrongPassword123!", &hash).expect("Hash is well formed");
    assert!(!matched, "Wrong password should fail verification");
}

#[test]
fn test_password_hash_different_each_time() {
    let hasher = PasswordHasher::new();
    let password = "pw";

    let hash1 = hasher.hash(password).expect("First hash should succeed");
    let hash2 = hasher.hash(password).expect("Second hash should succeed");

    // 由于随机盐，每次生成的哈希应该不同
    assert_ne!(hash1, hash2, "Hashes should be different due to salt");

    assert!(hasher.verify(password, &hash1).unwrap());
    assert!(hasher.verify(password, &hash2).unwrap());
}

#[test]
fn test_password_case_and_whitespace_matter() {
    let hasher = PasswordHasher::new();
    let hash = hasher.hash("Secret").unwrap();

    assert!(!hasher.verify("secret", &hash).unwrap());
    assert!(!hasher.verify("Secret ", &hash).unwrap());
    assert!(!hasher.verify("", &hash).unwrap());
}

#[test]
fn test_unicode_password() {
    let hasher = PasswordHasher::new();
    let password = "пароль-密码-🔐";

    let hash = hasher.hash(password).unwrap();
    assert!(hasher.verify(password, &hash).unwrap());
}

#[test]
fn test_malformed_hash_is_an_error_not_a_panic() {
    let hasher = PasswordHasher::new();

    for bad in ["", "plaintext", "$2b$10$abcdefghijklmnopqrstuv"] {
        let result = hasher.verify("pw", bad);
        assert!(
            matches!(result, Err(PasswordError::MalformedHash(_))),
            "hash {:?} gave {:?}",
            bad,
            result
        );
    }
}
