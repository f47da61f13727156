use crate::{ArgumentType, CloseOnLaunch, EmulatorDefinition, EmulatorRegistry};

use std::fs;

use tempfile::TempDir;

/// WHAT: Put persists immediately and list is ordered by id
/// WHY: Registrations must survive a restart and menus list ids stably
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_puts_when_reloading_then_both_listed_in_id_order() {
    // Given: An empty registry
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emulators.json");
    let mut registry = EmulatorRegistry::load(&path).unwrap();

    // When: Registering two emulators out of order and reloading
    registry
        .put("snes9x", EmulatorDefinition::new("Snes9x", "/emu/snes9x"))
        .unwrap();
    let mut mame = EmulatorDefinition::new("MAME", "/emu/mame");
    mame.close_on_launch = CloseOnLaunch::None;
    registry.put("mame", mame.clone()).unwrap();
    let reloaded = EmulatorRegistry::load(&path).unwrap();

    // Then: Both present, ordered, with fields intact
    let ids: Vec<&str> = reloaded.list().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["mame", "snes9x"]);
    assert_eq!(reloaded.get("mame"), Some(&mame));
}

/// WHAT: Registering does not check that the executable exists
/// WHY: Emulators may live on drives that are mounted later
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_executable_when_putting_then_accepted() {
    // Given: A definition pointing nowhere
    let dir = TempDir::new().unwrap();
    let mut registry = EmulatorRegistry::load(&dir.path().join("emulators.json")).unwrap();

    // When: Registering
    let result = registry.put("ghost", EmulatorDefinition::new("Ghost", "/no/such/emu"));

    // Then: Accepted
    assert!(result.is_ok());
    assert_eq!(registry.len(), 1);
}

/// WHAT: Hand-written entries without an argument type or a name still load
/// WHY: One sparse entry must not make the whole registry unreadable at startup
#[test]
#[allow(clippy::unwrap_used)]
fn given_sparse_hand_written_entry_when_loading_then_defaults_filled() {
    // Given: An argument with no type and a definition with no name
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("emulators.json");
    fs::write(
        &path,
        r#"{
            "snes9x": {
                "name": "Snes9x",
                "executable": "/emu/snes9x",
                "arguments": [{"name": "rom", "flag": "", "required": true}]
            },
            "mame": {"executable": "/emu/mame"}
        }"#,
    )
    .unwrap();

    // When: Loading
    let registry = EmulatorRegistry::load(&path).unwrap();

    // Then: The argument is text and the nameless entry is named after its id
    let rom = &registry.get("snes9x").unwrap().arguments[0];
    assert_eq!(rom.arg_type, ArgumentType::Text);
    assert!(rom.required);
    assert_eq!(rom.flag(), None);
    let mame = registry.get("mame").unwrap();
    assert_eq!(mame.display_name, "mame");
    assert_eq!(mame.close_on_launch, CloseOnLaunch::Others);
}
