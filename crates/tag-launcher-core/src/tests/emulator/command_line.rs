use crate::{
    ArgValue, ArgumentSpec, ArgumentType, EmulatorDefinition, build_command_line, quote,
    split_command_line,
};

use std::collections::BTreeMap;

fn arg(name: &str, arg_type: ArgumentType, flag: Option<&str>) -> ArgumentSpec {
    ArgumentSpec {
        name: name.to_string(),
        arg_type,
        flag: flag.map(str::to_string),
        required: false,
        default: None,
        choices: Vec::new(),
        label: None,
        description: None,
    }
}

fn snes9x() -> EmulatorDefinition {
    let mut def = EmulatorDefinition::new("Snes9x", "C:/Emu/snes9x.exe");
    def.arguments = vec![
        arg("rom", ArgumentType::File, None),
        arg("fullscreen", ArgumentType::Toggle, Some("-fullscreen")),
    ];
    def
}

/// WHAT: Positional file plus truthy toggle renders in declared order
/// WHY: Emulators expect the ROM first and flags after it
#[test]
fn given_rom_and_enabled_toggle_when_building_then_rom_then_flag() {
    // Given: rom=mario.smc, fullscreen=true
    let mut config = BTreeMap::new();
    config.insert("rom".to_string(), ArgValue::from("mario.smc"));
    config.insert("fullscreen".to_string(), ArgValue::Flag(true));

    // When: Building
    let line = build_command_line(&snes9x(), &config);

    // Then: exe, rom, flag
    assert_eq!(line.to_string(), "C:/Emu/snes9x.exe mario.smc -fullscreen");
    assert_eq!(line.args(), ["mario.smc", "-fullscreen"]);
}

/// WHAT: A false toggle emits nothing and an absent value is skipped
/// WHY: Toggles are bare flags; missing optional arguments are omitted
#[test]
fn given_false_toggle_and_missing_rom_when_building_then_only_program() {
    // Given: fullscreen=false, no rom
    let mut config = BTreeMap::new();
    config.insert("fullscreen".to_string(), ArgValue::Flag(false));

    // When: Building
    let line = build_command_line(&snes9x(), &config);

    // Then: Just the executable
    assert!(line.args().is_empty());
    assert_eq!(line.tokens(), vec!["C:/Emu/snes9x.exe".to_string()]);
}

/// WHAT: Text toggles count "off"/"no"/"0"/"" as false
/// WHY: Hand-edited catalogs store toggles as strings
#[test]
fn given_textual_false_toggle_when_building_then_flag_omitted() {
    for falsy in ["", "false", "0", "no", "off", "OFF"] {
        // Given: A textual falsy toggle
        let mut config = BTreeMap::new();
        config.insert("fullscreen".to_string(), ArgValue::from(falsy));

        // When: Building
        let line = build_command_line(&snes9x(), &config);

        // Then: No flag
        assert!(line.args().is_empty(), "{:?} should be false", falsy);
    }
}

/// WHAT: Flagged values emit flag then value, quoted when they contain spaces
/// WHY: Paths with spaces must stay a single token
#[test]
fn given_flagged_value_with_spaces_when_building_then_flag_and_quoted_value() {
    // Given: A flagged text argument with a space
    let mut def = EmulatorDefinition::new("MAME", "C:/Program Files/mame/mame.exe");
    def.arguments = vec![
        arg("system", ArgumentType::Choice, Some("-sys")),
        arg("cfg", ArgumentType::Text, Some("")),
    ];
    let mut config = BTreeMap::new();
    config.insert("system".to_string(), ArgValue::from("neo geo"));
    config.insert("cfg".to_string(), ArgValue::from("x.ini"));

    // When: Building
    let line = build_command_line(&def, &config);

    // Then: Program and value quoted; empty flag treated as positional
    assert_eq!(
        line.to_string(),
        "\"C:/Program Files/mame/mame.exe\" -sys \"neo geo\" x.ini"
    );
    assert_eq!(line.args(), ["-sys", "neo geo", "x.ini"]);
}

/// WHAT: Re-parsing the rendered line recovers the same tokens
/// WHY: Quoting must be reversible for logging and shell actions
#[test]
fn given_rendered_line_when_splitting_then_same_program_and_args() {
    // Given: A line with quoted tokens
    let mut config = BTreeMap::new();
    config.insert("rom".to_string(), ArgValue::from("D:/My Roms/Super Mario.smc"));
    config.insert("fullscreen".to_string(), ArgValue::Flag(true));
    let line = build_command_line(&snes9x(), &config);

    // When: Splitting the rendered text
    let tokens = split_command_line(&line.to_string());

    // Then: Program followed by the raw args
    let mut expected = vec![line.program().to_string_lossy().into_owned()];
    expected.extend(line.args().iter().cloned());
    assert_eq!(tokens, expected);
}

/// WHAT: The splitter keeps empty quoted tokens and collapses whitespace
/// WHY: Shell actions stored as one line must split predictably
#[test]
fn given_quotes_and_runs_of_spaces_when_splitting_then_expected_tokens() {
    // Given/When: Splitting an irregular line
    let tokens = split_command_line("  run   \"\"  \"a b\"c  ");

    // Then: Empty token preserved, quoted run joined to following text
    assert_eq!(tokens, vec!["run".to_string(), String::new(), "a bc".to_string()]);
}

/// WHAT: A value containing double quotes survives rendering and re-splitting
/// WHY: An unescaped inner quote would split the value into several tokens
#[test]
fn given_value_with_inner_quotes_when_splitting_rendered_line_then_value_intact() {
    // Given: A flagged text argument whose value holds quotes
    let mut def = EmulatorDefinition::new("Snes9x", "/emu/snes9x");
    def.arguments = vec![arg("title", ArgumentType::Text, Some("--title"))];
    let mut config = BTreeMap::new();
    config.insert("title".to_string(), ArgValue::from("say \"hi\" now"));
    let line = build_command_line(&def, &config);

    // When: Splitting the rendered text
    let tokens = split_command_line(&line.to_string());

    // Then: One token per argument, quotes restored
    assert_eq!(line.to_string(), r#"/emu/snes9x --title "say \"hi\" now""#);
    assert_eq!(
        tokens,
        vec![
            "/emu/snes9x".to_string(),
            "--title".to_string(),
            "say \"hi\" now".to_string(),
        ]
    );
}

/// WHAT: Backslashes in Windows paths are kept, including a trailing one
/// WHY: Escaping quotes must not eat path separators
#[test]
fn given_windows_paths_when_quoting_and_splitting_then_backslashes_kept() {
    // Given: Paths with and without spaces, one ending in a separator
    let paths = [
        r"C:\Emu\snes9x.exe",
        r"C:\Program Files\Emu\snes9x.exe",
        r"D:\My Roms\",
        r"\\server\share\rom.smc",
    ];

    // When: Quoting each and splitting the joined line
    let line = paths.iter().map(|p| quote(p)).collect::<Vec<_>>().join(" ");
    let tokens = split_command_line(&line);

    // Then: Every path comes back unchanged
    assert_eq!(tokens, paths);
    assert_eq!(quote(r"C:\Emu\snes9x.exe"), r"C:\Emu\snes9x.exe");
}
