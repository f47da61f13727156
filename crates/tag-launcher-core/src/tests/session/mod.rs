mod capture;
mod maintenance;

use crate::{
    ActionSpec, ArgumentSpec, ArgumentType, Catalog, CloseOnLaunch, EmulatorDefinition,
    EmulatorRegistry, LineReader, ProcessManager, Session, SessionStore,
    tests::fakes::{Chunk, FakeBytes, FakeProcessTable, RecordingDesktop, ScriptedOperator},
};

use std::{fs, path::Path, time::Duration};

type TestSession = Session<FakeBytes, ScriptedOperator, RecordingDesktop, FakeProcessTable>;

#[allow(clippy::unwrap_used)]
fn open_session(
    dir: &Path,
    source: FakeBytes,
    operator: ScriptedOperator,
    table: FakeProcessTable,
) -> TestSession {
    let store = SessionStore::open(dir, true).unwrap();
    Session::new(
        LineReader::new(source),
        operator,
        RecordingDesktop::default(),
        ProcessManager::with_grace_period(table, Duration::from_millis(20)),
        store,
    )
}

#[allow(clippy::unwrap_used)]
fn seed_tag(dir: &Path, uid: &str, spec: ActionSpec) {
    let mut catalog = Catalog::load(&dir.join(crate::CATALOG_FILE)).unwrap();
    catalog.upsert(uid, spec, |_| true).unwrap();
}

/// Registers `snes9x` with policy `same` and a required `rom` file argument.
#[allow(clippy::unwrap_used)]
fn seed_snes9x(dir: &Path) -> EmulatorDefinition {
    let exe = dir.join("snes9x.exe");
    fs::write(&exe, b"").unwrap();

    let mut def = EmulatorDefinition::new("Snes9x", exe);
    def.close_on_launch = CloseOnLaunch::Same;
    def.arguments = vec![ArgumentSpec {
        name: "rom".to_string(),
        arg_type: ArgumentType::File,
        flag: None,
        required: true,
        default: None,
        choices: Vec::new(),
        label: Some("ROM".to_string()),
        description: None,
    }];

    let mut registry = EmulatorRegistry::load(&dir.join(crate::EMULATORS_FILE)).unwrap();
    registry.put("snes9x", def.clone()).unwrap();
    def
}

fn url(value: &str) -> ActionSpec {
    ActionSpec::Url {
        value: value.to_string(),
    }
}

fn scan(session: &mut TestSession, uid: &str) {
    session
        .reader_mut()
        .source_mut()
        .push(Chunk::Bytes(format!("UID:{}\n", uid).into_bytes()));
}
