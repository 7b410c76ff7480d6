use crate::key_capture::{KeyDescriptor, Modifier, hook::hook_key};

use global_hotkey::hotkey::{Code, HotKey, Modifiers};

/// WHAT: Descriptors split into modifiers and one normalised key
/// WHY: Config files spell keys loosely
#[test]
fn given_mixed_case_descriptor_when_parsing_then_modifiers_and_key() {
    assert_eq!(
        KeyDescriptor::parse("Ctrl+Shift+F9"),
        Some(KeyDescriptor {
            modifiers: vec![Modifier::Ctrl, Modifier::Shift],
            key: "f9".to_string(),
        })
    );
    assert_eq!(
        KeyDescriptor::parse(" Page_Up "),
        Some(KeyDescriptor {
            modifiers: vec![],
            key: "page up".to_string(),
        })
    );
}

/// WHAT: Malformed descriptors do not parse
/// WHY: They are reported as unmapped instead of binding the wrong key
#[test]
fn given_malformed_descriptors_when_parsing_then_none() {
    for descriptor in ["ctrl+", "a+b", "ctrl+shift", "", "+"] {
        assert_eq!(
            KeyDescriptor::parse(descriptor),
            None,
            "{descriptor:?} should not parse"
        );
    }
}

/// WHAT: Hook keys resolve named keys with and without modifiers
/// WHY: Both plain and chorded bindings are supported by the hook backend
#[test]
fn given_descriptors_when_resolving_hook_keys_then_matching_hotkeys() {
    assert_eq!(
        hook_key("scroll lock"),
        Some(HotKey::new(None, Code::ScrollLock))
    );
    assert_eq!(hook_key("insert"), Some(HotKey::new(None, Code::Insert)));
    assert_eq!(
        hook_key("ctrl+shift+f9"),
        Some(HotKey::new(
            Some(Modifiers::CONTROL | Modifiers::SHIFT),
            Code::F9
        ))
    );
    assert_eq!(
        hook_key("alt+t"),
        Some(HotKey::new(Some(Modifiers::ALT), Code::KeyT))
    );
}

/// WHAT: Unknown key names do not resolve
/// WHY: The binding planner turns these into unmapped-key warnings
#[test]
fn given_unknown_key_name_when_resolving_hook_key_then_none() {
    assert_eq!(hook_key("hyper"), None);
    assert_eq!(hook_key("ctrl+numpad enter"), None);
}

#[cfg(target_os = "linux")]
mod device {
    use crate::key_capture::device::{ReadingSet, device_key, rescan};

    use std::path::{Path, PathBuf};

    use evdev::Key;

    fn found(paths: &[&str]) -> Vec<(PathBuf, &'static str)> {
        paths
            .iter()
            .map(|path| (PathBuf::from(path), "keyboard"))
            .collect()
    }

    fn paths<D>(devices: &[(PathBuf, D)]) -> Vec<PathBuf> {
        devices.iter().map(|(path, _)| path.clone()).collect()
    }

    /// WHAT: Device keys resolve the named key table
    /// WHY: Raw devices report key codes, not characters
    #[test]
    fn given_named_keys_when_resolving_device_keys_then_key_codes() {
        assert_eq!(device_key("scroll lock"), Some(Key::KEY_SCROLLLOCK));
        assert_eq!(device_key("Pause"), Some(Key::KEY_PAUSE));
        assert_eq!(device_key("page down"), Some(Key::KEY_PAGEDOWN));
        assert_eq!(device_key("f12"), Some(Key::KEY_F12));
    }

    /// WHAT: Chords and keys outside the table do not resolve
    /// WHY: The device backend matches single key presses only
    #[test]
    fn given_chord_or_unknown_key_when_resolving_device_key_then_none() {
        assert_eq!(device_key("ctrl+f9"), None);
        assert_eq!(device_key("a"), None);
    }

    /// WHAT: A scan only hands back devices that have no reader yet
    /// WHY: Reading one device from two threads would fire every trigger twice
    #[test]
    fn given_device_already_read_when_rescanning_then_only_new_devices_claimed() {
        // Given: event0 already being read
        let reading = ReadingSet::default();
        reading.claim_new(found(&["/dev/input/event0"]));

        // When: A scan finds event0 and a newly plugged event7
        let claimed = rescan(&reading, || {
            found(&["/dev/input/event0", "/dev/input/event7"])
        });

        // Then: Only event7 gets a reader
        assert_eq!(paths(&claimed), vec![PathBuf::from("/dev/input/event7")]);
    }

    /// WHAT: A device whose reader stopped is picked up by the next scan
    /// WHY: A read error must not end capture for good
    #[test]
    fn given_reader_lost_device_when_rescanning_then_device_claimed_again() {
        // Given: event3 was read, then its reader failed and released it
        let reading = ReadingSet::default();
        reading.claim_new(found(&["/dev/input/event3"]));
        reading.release(Path::new("/dev/input/event3"));

        // When: The device shows up again
        let claimed = rescan(&reading, || found(&["/dev/input/event3"]));

        // Then: It is claimed for a new reader
        assert_eq!(paths(&claimed), vec![PathBuf::from("/dev/input/event3")]);
        assert!(rescan(&reading, || found(&["/dev/input/event3"])).is_empty());
    }

    /// WHAT: A scan with no devices claims nothing and leaves the set empty
    /// WHY: Capture keeps waiting for a keyboard instead of exiting
    #[test]
    fn given_no_devices_when_rescanning_then_nothing_claimed() {
        // Given: Every reader has stopped
        let reading = ReadingSet::default();
        reading.claim_new(found(&["/dev/input/event1"]));
        reading.release(Path::new("/dev/input/event1"));

        // When: The scan finds nothing
        let claimed = rescan(&reading, || found(&[]));

        // Then: Nothing to start, nothing being read
        assert!(claimed.is_empty());
        assert!(reading.is_empty());
    }
}
