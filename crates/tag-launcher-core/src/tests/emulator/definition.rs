use crate::{ArgValue, ArgumentType, CloseOnLaunch, EmulatorDefinition};

use std::collections::BTreeMap;

/// WHAT: A registry entry written by the configuration utility deserializes fully
/// WHY: Both tools share emulators.json
#[test]
#[allow(clippy::unwrap_used)]
fn given_registry_json_when_deserializing_then_all_fields_mapped() {
    // Given: An entry with every argument field
    let json = r#"{
        "snes9x": {
            "name": "Snes9x",
            "executable": "C:/Emu/snes9x.exe",
            "close_on_launch": "same",
            "arguments": [
                {"name": "rom", "type": "file", "required": true, "label": "ROM"},
                {"name": "region", "type": "choice", "flag": "-region",
                 "choices": ["ntsc", "pal"], "default": "pal"},
                {"name": "fullscreen", "type": "toggle", "flag": "-fullscreen", "default": true}
            ]
        }
    }"#;

    // When: Deserializing
    let defs: BTreeMap<String, EmulatorDefinition> = serde_json::from_str(json).unwrap();

    // Then: Fields land where expected
    let def = &defs["snes9x"];
    assert_eq!(def.display_name, "Snes9x");
    assert_eq!(def.close_on_launch, CloseOnLaunch::Same);
    assert_eq!(def.arguments.len(), 3);
    assert_eq!(def.arguments[0].arg_type, ArgumentType::File);
    assert!(def.arguments[0].required);
    assert_eq!(def.arguments[0].label(), "ROM");
    assert_eq!(def.arguments[1].choices, vec!["ntsc", "pal"]);
    assert_eq!(def.arguments[1].default, Some(ArgValue::from("pal")));
    assert_eq!(def.arguments[2].default, Some(ArgValue::Flag(true)));
}

/// WHAT: close_on_launch defaults to "others"
/// WHY: Only one emulator should own the screen unless configured otherwise
#[test]
#[allow(clippy::unwrap_used)]
fn given_entry_without_policy_when_deserializing_then_others() {
    // Given: A minimal entry
    let json = r#"{"name": "MAME", "executable": "mame"}"#;

    // When: Deserializing
    let def: EmulatorDefinition = serde_json::from_str(json).unwrap();

    // Then: Default policy and no arguments
    assert_eq!(def.close_on_launch, CloseOnLaunch::Others);
    assert!(def.arguments.is_empty());
}
