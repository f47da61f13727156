use super::{open_session, seed_snes9x, seed_tag, url};
use crate::{
    Catalog, CloseOnLaunch, EmulatorRegistry, OperatorCommand,
    tests::fakes::{Answer, FakeBytes, FakeProcessTable, ScriptedOperator},
};

use std::path::PathBuf;

use tempfile::TempDir;

/// WHAT: Deleting selected tags after confirmation removes exactly those
/// WHY: Multi-select delete is the only way to unbind tags
#[test]
#[allow(clippy::unwrap_used)]
fn given_three_tags_when_deleting_first_and_last_then_middle_remains() {
    // Given: A, B, C bound
    let dir = TempDir::new().unwrap();
    seed_tag(dir.path(), "A", url("https://a"));
    seed_tag(dir.path(), "B", url("https://b"));
    seed_tag(dir.path(), "C", url("https://c"));
    let mut operator =
        ScriptedOperator::answering(vec![Answer::PickMany(vec![0, 2]), Answer::Yes]);
    operator.commands.push_back(OperatorCommand::Delete);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Only B remains, on disk too
    let reloaded = Catalog::load(&dir.path().join(crate::CATALOG_FILE)).unwrap();
    assert_eq!(reloaded.all().map(|(uid, _)| uid).collect::<Vec<_>>(), vec!["B"]);
    assert!(
        session
            .operator()
            .prompts
            .iter()
            .any(|p| p == "Delete 2 tags?")
    );
}

/// WHAT: Declining the delete confirmation keeps every tag
/// WHY: Deletion is destructive and always confirmed
#[test]
#[allow(clippy::unwrap_used)]
fn given_selection_when_delete_declined_then_nothing_removed() {
    // Given: A bound
    let dir = TempDir::new().unwrap();
    seed_tag(dir.path(), "A", url("https://a"));
    let mut operator = ScriptedOperator::answering(vec![Answer::PickMany(vec![0]), Answer::No]);
    operator.commands.push_back(OperatorCommand::Delete);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Still bound
    assert_eq!(session.catalog().len(), 1);
}

/// WHAT: Registering a new emulator stores id, name, executable and policy
/// WHY: Emulators must exist before tags can launch them
#[test]
#[allow(clippy::unwrap_used)]
fn given_new_emulator_answers_when_registering_then_persisted() {
    // Given: Answers for id, name, executable and policy "same"
    let dir = TempDir::new().unwrap();
    let mut operator = ScriptedOperator::answering(vec![
        Answer::Text("mame".to_string()),
        Answer::Text("MAME".to_string()),
        Answer::File(PathBuf::from("/opt/mame/mame")),
        Answer::Pick(1),
    ]);
    operator.commands.push_back(OperatorCommand::RegisterEmulator);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Saved with no arguments
    let reloaded = EmulatorRegistry::load(&dir.path().join(crate::EMULATORS_FILE)).unwrap();
    let def = reloaded.get("mame").unwrap();
    assert_eq!(def.display_name, "MAME");
    assert_eq!(def.executable_path, PathBuf::from("/opt/mame/mame"));
    assert_eq!(def.close_on_launch, CloseOnLaunch::Same);
    assert!(def.arguments.is_empty());
}

/// WHAT: Re-registering an existing id asks first and keeps its arguments
/// WHY: Argument schemas are edited by hand and must survive an executable move
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_emulator_when_reregistering_then_arguments_kept_and_name_defaulted() {
    // Given: snes9x registered with a rom argument
    let dir = TempDir::new().unwrap();
    let original = seed_snes9x(dir.path());
    let mut operator = ScriptedOperator::answering(vec![
        Answer::Text("snes9x".to_string()),
        Answer::Yes,
        Answer::Text(String::new()),
        Answer::File(PathBuf::from("/new/snes9x")),
        Answer::Pick(0),
    ]);
    operator.commands.push_back(OperatorCommand::RegisterEmulator);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Name kept via default, executable and policy updated, arguments intact
    let def = session.registry().get("snes9x").unwrap();
    assert_eq!(def.display_name, "Snes9x");
    assert_eq!(def.executable_path, PathBuf::from("/new/snes9x"));
    assert_eq!(def.close_on_launch, CloseOnLaunch::Others);
    assert_eq!(def.arguments, original.arguments);
}

/// WHAT: Declining the update of an existing emulator changes nothing
/// WHY: Ids are shared with saved tags
#[test]
#[allow(clippy::unwrap_used)]
fn given_existing_emulator_when_update_declined_then_unchanged() {
    // Given: snes9x registered
    let dir = TempDir::new().unwrap();
    let original = seed_snes9x(dir.path());
    let mut operator =
        ScriptedOperator::answering(vec![Answer::Text("snes9x".to_string()), Answer::No]);
    operator.commands.push_back(OperatorCommand::RegisterEmulator);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Unchanged
    assert_eq!(session.registry().get("snes9x"), Some(&original));
}
