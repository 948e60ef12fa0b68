//! Case-insensitive name handling shared by every uniqueness check.

/// Canonical form used for all name comparisons.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn names_match(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Return `base` if no existing name matches it, otherwise the first free
/// `base_1`, `base_2`, ...
pub fn unique_name<'a, I>(base: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<String> = existing.into_iter().map(normalize).collect();
    let is_taken = |candidate: &str| {
        let key = normalize(candidate);
        taken.iter().any(|t| *t == key)
    };

    if !is_taken(base) {
        return base.to_string();
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}_{}", base, n);
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Users "), "users");
        assert!(names_match("ORDERS", "orders "));
        assert!(!names_match("orders", "order"));
    }

    #[test]
    fn test_unique_name_free() {
        assert_eq!(unique_name("users", ["orders", "tags"]), "users");
        assert_eq!(unique_name("users", std::iter::empty()), "users");
    }

    #[test]
    fn test_unique_name_collision_is_case_insensitive() {
        assert_eq!(unique_name("users", ["Users"]), "users_1");
    }

    #[test]
    fn test_unique_name_skips_taken_suffixes() {
        let existing = ["a_b_join", "A_B_JOIN_1", "a_b_join_2", "other"];
        assert_eq!(unique_name("a_b_join", existing), "a_b_join_3");
    }

    #[test]
    fn test_unique_name_never_collides() {
        let mut names: Vec<String> = Vec::new();
        for _ in 0..20 {
            let next = unique_name("item", names.iter().map(String::as_str));
            assert!(!names.iter().any(|n| names_match(n, &next)));
            names.push(next);
        }
        assert_eq!(names[0], "item");
        assert_eq!(names[19], "item_19");
    }
}
