use dtsmock_common::DiagnosticCategory;
use dtsmock_graph::{EntityFlags, EntityKind, ImportSpec};
use dtsmock_synth::{Session, SynthOptions};

fn session() -> Session {
    Session::new(SynthOptions::default())
}

#[test]
fn test_enum_file_exports_const() {
    let mut session = session();
    let (file, root) = session.graph.add_file("api/demo.d.ts", "mock/demo.js");
    let color = session.graph.add_member(root, "Color", EntityKind::Enum);
    session.graph.add_value_member(color, "RED", "0");
    session.graph.add_value_member(color, "GREEN", "1");

    assert_eq!(
        session.generate_file(file).unwrap().as_deref(),
        Some("export const Color = {isAutoMock: 0,\nRED: 0,\nGREEN: 1};")
    );
}

#[test]
fn test_functions_export_as_declarations() {
    let mut session = session();
    let (file, root) = session.graph.add_file("api/util.d.ts", "mock/util.js");
    let ping = session.graph.add_member(root, "ping", EntityKind::Function);
    session.graph.add_member(ping, "true", EntityKind::Value);
    let counter = session.graph.add_member(root, "counter", EntityKind::Function);
    let iter = session
        .graph
        .add_member(counter, "IterableIterator", EntityKind::Reference);
    session.graph.add_type_parameter(iter, "1", EntityKind::Value);

    let text = session.generate_file(file).unwrap().unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines[0], "export function ping (...args) {");
    assert_eq!(lines[1], "return true;");
    assert!(text.contains("export function* counter () {\nconst yieldObj = 1;"));
}

#[test]
fn test_global_members_alias_the_global_object() {
    let mut session = session();
    let (file, root) = session.graph.add_file("api/@ohos.demo.d.ts", "mock/ohos_demo.js");
    let logger = session.graph.add_member(root, "Logger", EntityKind::Class);
    session.graph.declare_global(logger);
    let console = session.graph.add_member(root, "console", EntityKind::Interface);
    session.graph.declare_global(console);

    assert_eq!(
        session.generate_file(file).unwrap().as_deref(),
        Some("export const Logger=global.Logger;\nexport const console=global.console_temp;")
    );
}

#[test]
fn test_default_export_and_re_export() {
    let mut session = session();
    let (file, root) = session.graph.add_file("api/app.d.ts", "mock/app.js");
    session.graph.add_member(
        root,
        "*",
        EntityKind::Export {
            specifier: "./base".to_string(),
        },
    );
    let app = session.graph.add_member(root, "App", EntityKind::Module);
    session.graph.add_value_member(app, "version", "'1.0'");
    session.graph.set_flags(app, EntityFlags::DEFAULT);

    assert_eq!(
        session.generate_file(file).unwrap().as_deref(),
        Some("export * from './base';\nexport const App = {\nversion: '1.0'\n};\nexport default App;")
    );
}

#[test]
fn test_imports_and_unmocked_members_are_skipped() {
    let mut session = session();
    let (_, other) = session.graph.add_file("api/other.d.ts", "mock/other.js");
    session.graph.add_value_member(other, "Thing", "1");
    let (file, root) = session.graph.add_file("api/user.d.ts", "mock/user.js");
    session.graph.add_member(
        root,
        "Thing",
        EntityKind::Import(ImportSpec::named("api/other.d.ts")),
    );
    let hidden = session.graph.add_member(root, "Hidden", EntityKind::Variable);
    session.graph.arena[hidden].flags.remove(EntityFlags::NEED_MOCK);
    let shown = session.graph.add_member(root, "shown", EntityKind::Variable);
    session.graph.add_member(shown, "Thing", EntityKind::Reference);

    assert_eq!(
        session.generate_file(file).unwrap().as_deref(),
        Some("export const shown = 1;")
    );
}

#[test]
fn test_empty_file_is_ignored() {
    let mut session = session();
    let (file, root) = session.graph.add_file("api/types.d.ts", "mock/types.js");
    let hidden = session.graph.add_member(root, "Internal", EntityKind::Interface);
    session.graph.arena[hidden].flags.remove(EntityFlags::NEED_MOCK);

    assert_eq!(session.generate_file(file).unwrap(), None);
    assert!(session.is_ignored("mock/types.js"));
    let diag = &session.diagnostics()[0];
    assert_eq!(diag.code, 9005);
    assert_eq!(diag.category, DiagnosticCategory::Message);
}

#[test]
fn test_missing_chain_step_fails_the_file() {
    let mut session = session();
    let (file, root) = session.graph.add_file("api/ns.d.ts", "mock/ns.js");
    session.graph.add_member(root, "A", EntityKind::Module);
    let var = session.graph.add_member(root, "v", EntityKind::Variable);
    let reference = session.graph.add_member(var, "A", EntityKind::Reference);
    session.graph.push_property(reference, "nope");

    let err = session.generate_file(file).unwrap_err();
    assert_eq!(err.code(), 9007);
    assert!(!session.is_ignored("mock/ns.js"));
}

#[test]
fn test_generation_is_deterministic() {
    fn build() -> (Session, dtsmock_graph::FileId) {
        let mut session = session();
        let (file, root) = session.graph.add_file("api/demo.d.ts", "mock/demo.js");
        for name in ["zeta", "alpha", "mid"] {
            let function = session.graph.add_member(root, name, EntityKind::Function);
            let promise = session
                .graph
                .add_member(function, "Promise", EntityKind::Reference);
            session.graph.add_type_parameter(promise, "Frobnicate", EntityKind::Reference);
        }
        (session, file)
    }

    let (mut first, file) = build();
    let (mut second, _) = build();
    let a = first.generate_file(file).unwrap();
    let b = second.generate_file(file).unwrap();
    assert_eq!(a, b);
    assert!(a.unwrap().starts_with("export function zeta"));
    assert_eq!(first.diagnostics(), second.diagnostics());
}
