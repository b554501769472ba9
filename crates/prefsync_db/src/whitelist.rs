//! The settings sync whitelist.
//!
//! Only whitelisted settings may leave the device via sync. This keeps
//! sensitive records (Bluetooth pairing state, debug flags, worker
//! internals) from ever reaching the companion application, no matter
//! what the sync layer asks for.

/// Clock, display, backlight, language, app, and worker preferences that
/// every device syncs.
const BASE_SETTINGS: &[&str] = &[
    // Clock preferences
    "clock24h",
    "timezoneSource",
    "automaticTimezoneID",
    // Display preferences
    "unitsDistance",
    "textStyle",
    // Backlight preferences
    "lightEnabled",
    "lightAmbientSensorEnabled",
    "lightTimeoutMs",
    "lightIntensity",
    "lightMotion",
    "lightAmbientThreshold",
    // Language preferences
    "langEnglish",
    // App preferences
    "watchface",
    "qlUp",
    "qlDown",
    "qlSelect",
    "qlBack",
    "qlSetupOpened",
    // Worker preferences
    "workerId",
];

/// Settings that only exist on devices with health tracking.
const HEALTH_SETTINGS: &[&str] = &["activityPreferences", "activityHealthAppOpened"];

/// Device capabilities that shape the whitelist.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceCapabilities {
    /// True if the device tracks activity and health data.
    pub health_tracking: bool,
}

/// An immutable set of setting names permitted to sync.
///
/// Entries are stored with their terminator byte, matching the on-store
/// key convention, and membership is full-length byte equality. Two keys
/// of different lengths never match; there are no prefix matches.
///
/// The set is fixed at construction. Lookups are a linear scan - the
/// list is small and static, so no index structure is warranted.
#[derive(Debug, Clone)]
pub struct Whitelist {
    entries: Vec<Vec<u8>>,
}

impl Whitelist {
    /// Builds a whitelist from setting names.
    ///
    /// A null terminator is appended to each name, matching the
    /// convention for keys stored in the settings store.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = names
            .into_iter()
            .map(|name| {
                let mut entry = name.as_ref().as_bytes().to_vec();
                entry.push(0);
                entry
            })
            .collect();
        Self { entries }
    }

    /// Builds the whitelist for a device with the given capabilities.
    pub fn for_device(caps: &DeviceCapabilities) -> Self {
        let mut names: Vec<&str> = BASE_SETTINGS.to_vec();
        if caps.health_tracking {
            names.extend_from_slice(HEALTH_SETTINGS);
        }
        Self::new(names)
    }

    /// Returns the number of whitelisted settings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the whitelist is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `key` is permitted to sync.
    ///
    /// `key` must equal a whitelist entry byte-for-byte, terminator
    /// included.
    pub fn is_syncable(&self, key: &[u8]) -> bool {
        self.entries.iter().any(|entry| entry.as_slice() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn full_whitelist() -> Whitelist {
        Whitelist::for_device(&DeviceCapabilities {
            health_tracking: true,
        })
    }

    #[test]
    fn exact_match_including_terminator() {
        let wl = full_whitelist();
        assert!(wl.is_syncable(b"clock24h\0"));
        assert!(wl.is_syncable(b"watchface\0"));

        // Without the terminator the length differs, so no match.
        assert!(!wl.is_syncable(b"clock24h"));
    }

    #[test]
    fn no_prefix_or_extension_matches() {
        let wl = full_whitelist();
        assert!(!wl.is_syncable(b"clock\0"));
        assert!(!wl.is_syncable(b"clock24h2\0"));
        assert!(!wl.is_syncable(b"clock24h\0x"));
        assert!(!wl.is_syncable(b""));
    }

    #[test]
    fn sensitive_keys_are_not_syncable() {
        let wl = full_whitelist();
        assert!(!wl.is_syncable(b"btAddr\0"));
        assert!(!wl.is_syncable(b"debugFlags\0"));
    }

    #[test]
    fn health_settings_follow_capability() {
        let with_health = full_whitelist();
        assert!(with_health.is_syncable(b"activityPreferences\0"));
        assert!(with_health.is_syncable(b"activityHealthAppOpened\0"));

        let without_health = Whitelist::for_device(&DeviceCapabilities::default());
        assert!(!without_health.is_syncable(b"activityPreferences\0"));
        assert!(without_health.is_syncable(b"clock24h\0"));
        assert_eq!(with_health.len(), without_health.len() + 2);
    }

    proptest! {
        #[test]
        fn mutated_entries_never_match(
            idx in 0usize..BASE_SETTINGS.len(),
            suffix in proptest::collection::vec(any::<u8>(), 1..8),
            truncate_by in 1usize..4,
        ) {
            let wl = full_whitelist();
            let mut entry = BASE_SETTINGS[idx].as_bytes().to_vec();
            entry.push(0);

            let mut extended = entry.clone();
            extended.extend_from_slice(&suffix);
            prop_assert!(!wl.is_syncable(&extended));

            let cut = entry.len().saturating_sub(truncate_by);
            prop_assert!(!wl.is_syncable(&entry[..cut]));
        }
    }
}
