//! Random scalar values for fixture rows.
//!
//! Every generator takes the caller's RNG so a seeded factory reproduces the
//! same rows. Lengths are clamped to the column limits in [`crate::constants`].

use std::net::{Ipv4Addr, Ipv6Addr};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

use super::FixtureError;
use crate::constants::{
    EMAIL_MAX_LEN, MAX_PERMISSIONS, MIN_PERMISSIONS, NAME_MAX_LEN, USERNAME_MAX_LEN,
};
use crate::entities::enums::{Permission, PermissionSet};

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Dmitri", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Kira", "Liam",
    "Maya", "Nikolai", "Olga", "Pavel", "Quinn", "Rosa", "Sven", "Tara", "Umar", "Vera", "Wes", "Yara", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Brooks", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hansen", "Ivanova", "Jensen",
    "Kowalski", "Larsen", "Moreau", "Novak", "Okafor", "Petrov", "Quintero", "Rossi", "Schmidt", "Tanaka",
    "Ueda", "Volkov", "Weber", "Young", "Zielinski",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const LOREM: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do", "eiusmod",
    "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim", "ad", "minim", "veniam",
    "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi", "aliquip", "ex", "ea", "commodo",
    "consequat", "duis", "aute", "irure", "in", "reprehenderit", "voluptate", "velit", "esse", "cillum",
    "fugiat", "nulla", "pariatur",
];

/// Number of permissions every fixture permission set carries, fixed per process.
static PERMISSION_COUNT: Lazy<usize> = Lazy::new(|| thread_rng().gen_range(MIN_PERMISSIONS..=MAX_PERMISSIONS));

static ROLE_PERMISSIONS: Lazy<PermissionSet> = Lazy::new(|| sample_permissions(&mut thread_rng(), *PERMISSION_COUNT));

static STATUS_PERMISSIONS: Lazy<PermissionSet> =
    Lazy::new(|| sample_permissions(&mut thread_rng(), *PERMISSION_COUNT));

/// Permission set shared by every generated role.
pub fn role_permissions() -> &'static PermissionSet {
    &ROLE_PERMISSIONS
}

/// Permission set shared by every generated status.
pub fn status_permissions() -> &'static PermissionSet {
    &STATUS_PERMISSIONS
}

/// `count` distinct permissions in random order.
pub fn sample_permissions<R: Rng + ?Sized>(rng: &mut R, count: usize) -> PermissionSet {
    let count = count.clamp(MIN_PERMISSIONS, Permission::ALL.len());
    PermissionSet::new(Permission::ALL.choose_multiple(rng, count).copied().collect())
}

/// Uniform pick from a fixed value set.
pub fn choose<R: Rng + ?Sized, T: Copy>(rng: &mut R, values: &[T]) -> T {
    *values.choose(rng).expect("fixed value sets are never empty")
}

pub fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = choose(rng, FIRST_NAMES);
    let last = choose(rng, LAST_NAMES);
    truncate(format!("{first} {last}"), NAME_MAX_LEN)
}

/// Lower-case handle with a numeric suffix, never longer than the username column.
pub fn username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = choose(rng, FIRST_NAMES).to_lowercase();
    let last = choose(rng, LAST_NAMES).to_lowercase();
    let suffix = rng.gen_range(0..100_000u32).to_string();

    let stem_len = USERNAME_MAX_LEN - suffix.len() - 1;
    let stem = truncate(format!("{first}.{last}"), stem_len);
    format!("{stem}_{suffix}")
}

pub fn email<R: Rng + ?Sized>(rng: &mut R, username: &str) -> String {
    let domain = choose(rng, EMAIL_DOMAINS);
    let local = truncate(username.to_string(), EMAIL_MAX_LEN - domain.len() - 1);
    format!("{local}@{domain}")
}

pub fn password<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

/// Argon2id PHC string for `password`.
///
/// Fixture rows only need a realistic hash shape, so the cost parameters are
/// far below what a login path would use.
pub fn hash_password(password: &str) -> Result<String, FixtureError> {
    let params = Params::new(8 * 1024, 1, 1, None)
        .map_err(|e| FixtureError::PasswordHash(format!("Invalid parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FixtureError::PasswordHash(e.to_string()))
}

/// Either an IPv4 or an IPv6 address, with equal probability.
pub fn ip_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        Ipv4Addr::from(rng.gen::<[u8; 4]>()).to_string()
    } else {
        Ipv6Addr::from(rng.gen::<[u16; 8]>()).to_string()
    }
}

/// Lorem sentence of at most `max_chars` characters, ending with a period.
pub fn text<R: Rng + ?Sized>(rng: &mut R, max_chars: usize) -> String {
    let budget = max_chars.saturating_sub(1).max(1);
    let mut out = String::new();

    loop {
        let word = choose(rng, LOREM);
        let needed = if out.is_empty() { word.len() } else { word.len() + 1 };
        if out.len() + needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        if out.len() >= budget / 2 && rng.gen_bool(0.25) {
            break;
        }
    }

    if out.is_empty() {
        out = truncate(choose(rng, LOREM).to_string(), budget);
    }
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    if out.len() < max_chars {
        out.push('.');
    }
    out
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Now plus one day, one hour and thirty minutes.
pub fn near_future() -> DateTime<Utc> {
    Utc::now() + Duration::days(1) + Duration::hours(1) + Duration::minutes(30)
}

/// Now plus two days, three hours and ten minutes.
pub fn later_future() -> DateTime<Utc> {
    Utc::now() + Duration::days(2) + Duration::hours(3) + Duration::minutes(10)
}

fn truncate(mut value: String, max_len: usize) -> String {
    // All word lists are ASCII, so byte and char boundaries coincide.
    value.truncate(max_len);
    value
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::constants::{TASK_DESCRIPTION_MAX_LEN, TASK_TITLE_MAX_LEN};

    #[test]
    fn usernames_fit_the_column() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let name = username(&mut rng);
            assert!(!name.is_empty());
            assert!(name.len() <= USERNAME_MAX_LEN, "{name} is too long");
        }
    }

    #[test]
    fn emails_are_derived_from_the_username() {
        let mut rng = StdRng::seed_from_u64(11);
        let name = username(&mut rng);
        let address = email(&mut rng, &name);
        assert!(address.starts_with(&format!("{name}@")));
        assert!(address.len() <= EMAIL_MAX_LEN);
    }

    #[test]
    fn text_respects_title_and_description_limits() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let title = text(&mut rng, TASK_TITLE_MAX_LEN);
            let description = text(&mut rng, TASK_DESCRIPTION_MAX_LEN);
            assert!(!title.is_empty() && title.len() <= TASK_TITLE_MAX_LEN);
            assert!(!description.is_empty() && description.len() <= TASK_DESCRIPTION_MAX_LEN);
        }
    }

    #[test]
    fn ip_addresses_parse_as_either_family() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let address = ip_address(&mut rng);
            assert!(address.parse::<std::net::IpAddr>().is_ok(), "{address}");
        }
    }

    #[test]
    fn sampled_permissions_are_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(13);
        for count in 0..=6 {
            let set = sample_permissions(&mut rng, count);
            let mut seen = set.permissions.clone();
            seen.sort_by_key(|p| p.as_str());
            seen.dedup();
            assert_eq!(seen.len(), set.permissions.len());
            assert!((MIN_PERMISSIONS..=MAX_PERMISSIONS).contains(&set.permissions.len()));
        }
    }

    #[test]
    fn process_wide_permission_sets_are_stable() {
        assert_eq!(role_permissions(), role_permissions());
        assert_eq!(role_permissions().permissions.len(), status_permissions().permissions.len());
    }

    #[test]
    fn password_hashes_use_argon2id() {
        let mut rng = StdRng::seed_from_u64(17);
        let plain = password(&mut rng, 16);
        assert_eq!(plain.len(), 16);
        assert!(plain.chars().all(|c| c.is_ascii_alphanumeric()));

        let hashed = hash_password(&plain).unwrap();
        assert!(hashed.starts_with("$argon2id$"));
    }

    #[test]
    fn choose_reaches_every_value() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut seen: Vec<&str> = (0..200).map(|_| choose(&mut rng, EMAIL_DOMAINS)).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), EMAIL_DOMAINS.len());
    }

    #[test]
    fn future_timestamps_are_ordered() {
        let created = now();
        assert!(near_future() > created);
        assert!(later_future() > near_future());
    }
}
