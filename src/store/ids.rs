//! Deterministic id derivation.
//!
//! Teacher ids come from a stable hash of the name, student ids from the
//! normalized phone number. Two different teacher names can map to the same
//! id; callers treat that as the same teacher.

/// Strip `+` and spaces from a phone number.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| *c != '+' && *c != ' ').collect()
}

/// Student id for a phone number.
pub fn student_id_for_phone(phone: &str) -> String {
    normalize_phone(phone)
}

/// Teacher id for a name: `teacher_<n>` with `n` in `0..10000`.
pub fn teacher_id_for_name(name: &str) -> String {
    format!("teacher_{}", fnv1a(name.as_bytes()) % 10_000)
}

// 32-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u32::from(*b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 555 0100"), "15550100");
        assert_eq!(normalize_phone("15550100"), "15550100");
        assert_eq!(normalize_phone("+44 7123-456"), "447123-456");
    }

    #[test]
    fn test_teacher_id_is_stable() {
        assert_eq!(teacher_id_for_name("Alice"), teacher_id_for_name("Alice"));
        assert!(teacher_id_for_name("Alice").starts_with("teacher_"));
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
    }
}
