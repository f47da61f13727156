use super::{open_session, scan, seed_snes9x, seed_tag, url};
use crate::{
    ActionSpec, ActionType, ArgValue, Catalog, Flow, OperatorCommand, SessionMode,
    tests::fakes::{
        Answer, Behaviour, Chunk, DesktopCall, FakeBytes, FakeProcessTable, ScriptedOperator,
    },
};

use std::{collections::BTreeMap, fs, path::PathBuf};

use tempfile::TempDir;

const TYPE_EMULATOR: usize = 0;
const TYPE_FILE: usize = 1;
const TYPE_URL: usize = 2;
const TYPE_COMMAND: usize = 3;
const MODE_SINGLE: usize = 0;
const MODE_BATCH: usize = 1;

/// WHAT: A bound tag dispatches its action
/// WHY: This is the main job of the launcher
#[test]
#[allow(clippy::unwrap_used)]
fn given_bound_tag_when_scanned_then_action_dispatched() {
    // Given: K bound to a URL
    let dir = TempDir::new().unwrap();
    seed_tag(dir.path(), "K", url("https://k.example"));
    let mut session = open_session(
        dir.path(),
        FakeBytes::lines(&["UID:K"]),
        ScriptedOperator::default(),
        FakeProcessTable::default(),
    );

    // When: Stepping once
    let flow = session.step();

    // Then: URL opened and the scan recorded for external tools
    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        session.desktop().calls,
        vec![DesktopCall::Url("https://k.example".to_string())]
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(crate::LAST_SCAN_FILE)).unwrap(),
        "K"
    );
}

/// WHAT: Cancelling the file picker for an unknown tag saves nothing
/// WHY: Cancellation at any prompt aborts only the current flow
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_tag_when_file_picker_cancelled_then_catalog_unchanged_and_idle() {
    // Given: An unknown tag; operator agrees, picks File, then cancels the picker
    let dir = TempDir::new().unwrap();
    let operator =
        ScriptedOperator::answering(vec![Answer::Yes, Answer::Pick(TYPE_FILE), Answer::Cancel]);
    let mut session = open_session(
        dir.path(),
        FakeBytes::lines(&["UID:NEW"]),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Nothing saved, nothing dispatched, back to idle
    assert!(session.catalog().is_empty());
    assert!(session.desktop().calls.is_empty());
    assert_eq!(session.state().mode, SessionMode::Idle);
    assert!(!dir.path().join(crate::CATALOG_FILE).exists());
}

/// WHAT: An unknown tag can be bound to a URL in place
/// WHY: Scanning a fresh tag is the quickest way to set it up
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_tag_when_url_entered_then_saved_and_preference_remembered() {
    // Given: An unknown tag; operator agrees, picks URL, enters it
    let dir = TempDir::new().unwrap();
    let operator = ScriptedOperator::answering(vec![
        Answer::Yes,
        Answer::Pick(TYPE_URL),
        Answer::Text("https://new.example".to_string()),
    ]);
    let mut session = open_session(
        dir.path(),
        FakeBytes::lines(&["UID:NEW"]),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Saved to disk, type remembered, nothing dispatched
    let reloaded = Catalog::load(&dir.path().join(crate::CATALOG_FILE)).unwrap();
    assert_eq!(reloaded.lookup("NEW"), Some(&url("https://new.example")));
    assert_eq!(session.preferences().last_action_type, Some(ActionType::Url));
    assert!(session.desktop().calls.is_empty());
}

/// WHAT: Declining "add?" for an unknown tag asks nothing else
/// WHY: Stray scans must be cheap to dismiss
#[test]
#[allow(clippy::unwrap_used)]
fn given_unknown_tag_when_add_declined_then_no_further_prompts() {
    // Given: An unknown tag and an operator who says no
    let dir = TempDir::new().unwrap();
    let mut session = open_session(
        dir.path(),
        FakeBytes::lines(&["UID:NEW"]),
        ScriptedOperator::answering(vec![Answer::No]),
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: One prompt only
    assert_eq!(session.operator().prompts.len(), 1);
    assert!(session.catalog().is_empty());
}

/// WHAT: Scans arriving while a prompt is open are buffered and discarded
/// WHY: A tag scanned mid-dialog must never launch something behind the operator's back
#[test]
#[allow(clippy::unwrap_used)]
fn given_known_tag_scanned_during_prompt_when_flow_ends_then_not_dispatched() {
    // Given: K is bound; NEW arrives first, K arrives while the "add?" prompt is open
    let dir = TempDir::new().unwrap();
    seed_tag(dir.path(), "K", url("https://k.example"));
    let source = FakeBytes::new(vec![
        Chunk::Bytes(b"UID:NEW\n".to_vec()),
        Chunk::Gap,
        Chunk::Bytes(b"UID:K\n".to_vec()),
    ]);
    let mut session = open_session(
        dir.path(),
        source,
        ScriptedOperator::answering(vec![Answer::No]),
        FakeProcessTable::default(),
    );

    // When: Stepping twice
    session.step();
    session.step();

    // Then: K was never dispatched and the operator was told
    assert!(session.desktop().calls.is_empty());
    assert!(
        session
            .operator()
            .notes
            .iter()
            .any(|n| n.contains("Ignored tag K"))
    );
}

/// WHAT: Single add asks before overwriting a bound tag
/// WHY: Replacing an existing UID requires explicit confirmation
#[test]
#[allow(clippy::unwrap_used)]
fn given_single_add_on_bound_tag_when_overwrite_declined_then_old_binding_kept() {
    // Given: K bound to an old URL; operator starts a single URL add
    let dir = TempDir::new().unwrap();
    seed_tag(dir.path(), "K", url("https://old"));
    let mut operator =
        ScriptedOperator::answering(vec![Answer::Pick(MODE_SINGLE), Answer::Pick(TYPE_URL)]);
    operator.commands.push_back(OperatorCommand::Add);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );
    session.step();
    assert_eq!(session.state().mode, SessionMode::AwaitingScan);

    // When: K is scanned, a new URL entered, and the overwrite declined
    scan(&mut session, "K");
    session
        .operator_mut()
        .answers
        .extend([Answer::Text("https://new".to_string()), Answer::No]);
    session.step();

    // Then: Old binding kept, nothing dispatched, idle again
    assert_eq!(session.catalog().lookup("K"), Some(&url("https://old")));
    assert!(session.desktop().calls.is_empty());
    assert_eq!(session.state().mode, SessionMode::Idle);
    assert!(session.state().pending_capture.is_none());
}

/// WHAT: Batch mode binds every scanned tag until done
/// WHY: Labelling a box of cartridges should not need one add per tag
#[test]
#[allow(clippy::unwrap_used)]
fn given_batch_command_capture_when_two_tags_scanned_then_both_bound_until_done() {
    // Given: Batch capture of commands
    let dir = TempDir::new().unwrap();
    let mut operator =
        ScriptedOperator::answering(vec![Answer::Pick(MODE_BATCH), Answer::Pick(TYPE_COMMAND)]);
    operator.commands.push_back(OperatorCommand::Add);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );
    session.step();
    assert_eq!(session.state().mode, SessionMode::BatchActive);

    // When: Two tags scanned, each assigned a command, then done
    scan(&mut session, "A");
    scan(&mut session, "B");
    session
        .operator_mut()
        .answers
        .extend([Answer::Pick(0), Answer::Pick(6)]);
    session.step();
    assert_eq!(session.state().mode, SessionMode::BatchActive);
    session
        .operator_mut()
        .commands
        .push_back(OperatorCommand::Done);
    session.step();

    // Then: Both bound, nothing dispatched, back to idle
    assert_eq!(
        session.catalog().lookup("A"),
        Some(&ActionSpec::Command {
            name: "close_window".to_string()
        })
    );
    assert_eq!(
        session.catalog().lookup("B"),
        Some(&ActionSpec::Command {
            name: "screenshot".to_string()
        })
    );
    assert!(session.desktop().calls.is_empty());
    assert_eq!(session.state().mode, SessionMode::Idle);
    assert!(session.state().batch_action.is_none());
}

/// WHAT: A cancelled capture inside batch mode stays in batch mode
/// WHY: Cancellation returns to the batch loop, not to idle
#[test]
#[allow(clippy::unwrap_used)]
fn given_batch_mode_when_capture_cancelled_then_still_batch_active() {
    // Given: Batch URL capture
    let dir = TempDir::new().unwrap();
    let mut operator =
        ScriptedOperator::answering(vec![Answer::Pick(MODE_BATCH), Answer::Pick(TYPE_URL)]);
    operator.commands.push_back(OperatorCommand::Add);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );
    session.step();

    // When: A tag is scanned and the URL prompt cancelled
    scan(&mut session, "A");
    session.operator_mut().answers.push_back(Answer::Cancel);
    session.step();

    // Then: Nothing saved, batch still active
    assert!(session.catalog().is_empty());
    assert_eq!(session.state().mode, SessionMode::BatchActive);
}

/// WHAT: Emulator tags are configured after the scan and relaunch with policy "same"
/// WHY: End to end: capture arguments, then a scan closes the old instance and launches the new one
#[test]
#[allow(clippy::unwrap_used)]
fn given_emulator_capture_when_tag_scanned_again_then_old_instance_closed_and_launched() {
    // Given: snes9x registered with policy same; a single emulator add is started
    let dir = TempDir::new().unwrap();
    let def = seed_snes9x(dir.path());
    let mut operator = ScriptedOperator::answering(vec![
        Answer::Pick(MODE_SINGLE),
        Answer::Pick(TYPE_EMULATOR),
        Answer::Pick(0),
    ]);
    operator.commands.push_back(OperatorCommand::Add);
    let table = FakeProcessTable::default().with(8001, "snes9x.exe", Behaviour::ExitsOnTerm);
    let mut session = open_session(dir.path(), FakeBytes::default(), operator, table);
    session.step();

    // When: G1 is scanned, the ROM picked, then G1 scanned again
    scan(&mut session, "G1");
    session
        .operator_mut()
        .answers
        .push_back(Answer::File(PathBuf::from("/roms/mario.smc")));
    session.step();
    scan(&mut session, "G1");
    session.step();

    // Then: The binding holds the ROM, the old instance is gone, the new one spawned
    let mut config = BTreeMap::new();
    config.insert("rom".to_string(), ArgValue::from("/roms/mario.smc"));
    assert_eq!(
        session.catalog().lookup("G1"),
        Some(&ActionSpec::Emulator {
            emulator_id: "snes9x".to_string(),
            config
        })
    );
    assert!(!session.processes().table().alive(8001));
    assert_eq!(
        session.desktop().calls,
        vec![DesktopCall::Spawn {
            program: def.executable_path.clone(),
            args: vec!["/roms/mario.smc".to_string()],
        }]
    );
    assert_eq!(
        session.preferences().last_browse_dir,
        Some(PathBuf::from("/roms"))
    );
}

/// WHAT: Skipping a required argument cancels the binding
/// WHY: A launch without its ROM would open an empty emulator
#[test]
#[allow(clippy::unwrap_used)]
fn given_emulator_capture_when_required_argument_cancelled_then_not_saved() {
    // Given: A single emulator add waiting for its tag
    let dir = TempDir::new().unwrap();
    seed_snes9x(dir.path());
    let mut operator = ScriptedOperator::answering(vec![
        Answer::Pick(MODE_SINGLE),
        Answer::Pick(TYPE_EMULATOR),
        Answer::Pick(0),
    ]);
    operator.commands.push_back(OperatorCommand::Add);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );
    session.step();

    // When: The tag is scanned and the ROM picker cancelled
    scan(&mut session, "G2");
    session.operator_mut().answers.push_back(Answer::Cancel);
    session.step();

    // Then: Not saved, operator told why
    assert!(session.catalog().is_empty());
    assert!(
        session
            .operator()
            .notes
            .iter()
            .any(|n| n.contains("ROM is required"))
    );
    assert_eq!(session.state().mode, SessionMode::Idle);
}

/// WHAT: Choosing the emulator type with an empty registry cancels the add
/// WHY: There is nothing to bind to until an emulator is registered
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_emulators_when_adding_emulator_tag_then_cancelled() {
    // Given: An empty registry
    let dir = TempDir::new().unwrap();
    let mut operator =
        ScriptedOperator::answering(vec![Answer::Pick(MODE_SINGLE), Answer::Pick(TYPE_EMULATOR)]);
    operator.commands.push_back(OperatorCommand::Add);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );

    // When: Stepping
    session.step();

    // Then: Back to idle with a hint
    assert_eq!(session.state().mode, SessionMode::Idle);
    assert!(
        session
            .operator()
            .notes
            .iter()
            .any(|n| n.contains("No emulators registered"))
    );
}

/// WHAT: The last chosen mode and type become the next prompt defaults
/// WHY: Repeated adds of the same kind should need fewer keystrokes
#[test]
#[allow(clippy::unwrap_used)]
fn given_previous_batch_url_add_when_adding_again_then_defaults_offered() {
    // Given: A finished batch URL add
    let dir = TempDir::new().unwrap();
    let mut operator =
        ScriptedOperator::answering(vec![Answer::Pick(MODE_BATCH), Answer::Pick(TYPE_URL)]);
    operator.commands.push_back(OperatorCommand::Add);
    operator.commands.push_back(OperatorCommand::Done);
    operator.commands.push_back(OperatorCommand::Add);
    let mut session = open_session(
        dir.path(),
        FakeBytes::default(),
        operator,
        FakeProcessTable::default(),
    );
    session.step();
    session.step();

    // When: Starting another add and cancelling at the mode prompt
    session.step();

    // Then: The mode prompt defaulted to batch, and the type prompt had earlier defaulted to nothing
    let defaults = &session.operator().choose_defaults;
    assert_eq!(defaults[0], Some(MODE_SINGLE));
    assert_eq!(defaults[1], None);
    assert_eq!(defaults[2], Some(MODE_BATCH));
}
