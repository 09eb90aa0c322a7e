use dtsmock_graph::{Accessor, EntityFlags, EntityKind};
use dtsmock_synth::{Session, SynthError, SynthOptions};

const PLATFORM: &str = "api/@ohos.demo.d.ts";

fn session() -> Session {
    Session::new(SynthOptions::default())
}

fn batch_contents(session: &mut Session) -> Vec<String> {
    session
        .emit_globals()
        .unwrap()
        .into_iter()
        .map(|batch| batch.content)
        .collect()
}

#[test]
fn test_global_class_shell_then_members() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let logger = session.graph.add_member(root, "Logger", EntityKind::Class);
    let level = session.graph.add_member(logger, "level", EntityKind::Property);
    session.graph.add_member(level, "0", EntityKind::Value);
    session.graph.add_member(logger, "log", EntityKind::Function);
    session.graph.declare_global(logger);

    let batches = session.emit_globals().unwrap();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.index, 1);
    assert_eq!(batch.name, "globalDeclarations1");
    assert_eq!(batch.file_name, "globalDeclarations1.js");
    assert_eq!(
        batch.import_statement,
        "import * as globalDeclarations1 from './globalDeclarations1';"
    );
    assert_eq!(
        batch.content,
        [
            "global.Logger_temp = class {constructor(){this.isAutoMock=true}};",
            "global.Logger = global.Logger || global.Logger_temp;",
            "global.Logger_temp.prototype.level = 0;",
            "global.Logger_temp.prototype.log = function (...args) {\n\n};",
        ]
        .join("\n")
    );
    assert!(session.graph.arena[level].is_mocked());
}

#[test]
fn test_second_emission_writes_nothing() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let logger = session.graph.add_member(root, "Logger", EntityKind::Class);
    session.graph.add_member(logger, "log", EntityKind::Function);
    session.graph.declare_global(logger);

    assert_eq!(session.emit_globals().unwrap().len(), 1);
    assert!(session.emit_globals().unwrap().is_empty());
}

#[test]
fn test_window_names_keep_host_value() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let console = session.graph.add_member(root, "console", EntityKind::Interface);
    session.graph.declare_global(console);

    let batches = session.emit_globals().unwrap();
    assert_eq!(batches[0].content, "global.console_temp = {isAutoMock: true};");
}

#[test]
fn test_dependencies_are_written_first() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let app = session.graph.add_member(root, "App", EntityKind::Class);
    let context = session.graph.add_member(app, "context", EntityKind::Property);
    session.graph.add_member(context, "Context", EntityKind::Reference);
    session.graph.declare_global(app);
    let (_, other) = session.graph.add_file("api/@ohos.context.d.ts", "mock/ohos_context.js");
    let ctx = session.graph.add_member(other, "Context", EntityKind::Interface);
    session.graph.add_value_member(ctx, "id", "1");
    session.graph.declare_global(ctx);

    let content = session.emit_globals().unwrap().remove(0).content;
    let dependency = content.find("global.Context_temp.id = 1;").unwrap();
    let dependent = content
        .find("global.App_temp.prototype.context = global.Context;")
        .unwrap();
    assert!(dependency < dependent);
    assert_eq!(content.matches("global.Context_temp.id = 1;").count(), 1);
}

#[test]
fn test_self_reference_uses_global_path() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let node = session.graph.add_member(root, "TreeNode", EntityKind::Class);
    let parent = session.graph.add_member(node, "parent", EntityKind::Property);
    session.graph.add_member(parent, "TreeNode", EntityKind::Reference);
    session.graph.declare_global(node);

    let content = session.emit_globals().unwrap().remove(0).content;
    assert!(
        content.contains("global.TreeNode_temp.prototype.parent = new (global.TreeNode)();"),
        "{content}"
    );
}

#[test]
fn test_accessor_pair_is_one_define_property() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let widget = session.graph.add_member(root, "Widget", EntityKind::Class);
    let getter = session.graph.add_accessor(widget, "size", Accessor::Get);
    session.graph.add_member(getter, "1", EntityKind::Value);
    let setter = session.graph.add_accessor(widget, "size", Accessor::Set);
    session.graph.declare_global(widget);

    let content = session.emit_globals().unwrap().remove(0).content;
    assert_eq!(content.matches("Object.defineProperty").count(), 1);
    assert!(content.ends_with(
        "Object.defineProperty(global.Widget_temp.prototype, 'size', {\nget: function () {\nreturn 1;\n},\nset: function (args) {\n\n},\n});"
    ));
    assert!(session.graph.arena[getter].is_mocked());
    assert!(session.graph.arena[setter].is_mocked());
}

#[test]
fn test_static_members_attach_to_constructor() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let factory = session.graph.add_member(root, "Factory", EntityKind::Class);
    let create = session.graph.add_member(factory, "create", EntityKind::Function);
    session.graph.set_flags(create, EntityFlags::STATIC);
    session.graph.declare_global(factory);

    let content = session.emit_globals().unwrap().remove(0).content;
    assert!(content.contains("global.Factory_temp.create = function (...args) {\n\n};"));
}

#[test]
fn test_global_function_assigned_once() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let init = session.graph.add_member(root, "init", EntityKind::Function);
    session.graph.declare_global(init);

    let batches = session.emit_globals().unwrap();
    assert_eq!(
        batches[0].content,
        "global.init = global.init || (function (...args) {\n\n});"
    );
}

#[test]
fn test_duplicate_declarations_fold_into_first() {
    let mut session = session();
    let (_, first_file) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let first = session.graph.add_member(first_file, "Shared", EntityKind::Module);
    session.graph.add_value_member(first, "a", "1");
    session.graph.declare_global(first);
    let (_, second_file) = session.graph.add_file("api/@ohos.other.d.ts", "mock/ohos_other.js");
    let second = session.graph.add_member(second_file, "Shared", EntityKind::Module);
    let repeated = session.graph.add_value_member(second, "a", "2");
    session.graph.add_value_member(second, "b", "2");
    session.graph.declare_global(second);

    let content = session.emit_globals().unwrap().remove(0).content;
    assert_eq!(content.matches("global.Shared_temp = {isAutoMock: true};").count(), 1);
    assert_eq!(content.matches("global.Shared_temp.a = ").count(), 1, "{content}");
    assert!(content.contains("global.Shared_temp.a = 1;"));
    assert!(content.contains("global.Shared_temp.b = 2;"));
    assert!(session.graph.arena[repeated].is_mocked());
}

#[test]
fn test_duplicate_class_members_written_once() {
    let mut session = session();
    let (_, first_file) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let first = session.graph.add_member(first_file, "Widget", EntityKind::Class);
    session.graph.add_member(first, "draw", EntityKind::Function);
    session.graph.declare_global(first);
    let (_, second_file) = session.graph.add_file("api/@ohos.other.d.ts", "mock/ohos_other.js");
    let second = session.graph.add_member(second_file, "Widget", EntityKind::Class);
    session.graph.add_member(second, "draw", EntityKind::Function);
    session.graph.declare_global(second);

    let content = session.emit_globals().unwrap().remove(0).content;
    assert_eq!(
        content.matches("global.Widget_temp.prototype.draw = ").count(),
        1,
        "{content}"
    );
}

#[test]
fn test_batches_split_by_size() {
    let options = SynthOptions {
        batch_size: 2,
        batch_prefix: "globals".to_string(),
        ..SynthOptions::default()
    };
    let mut session = Session::new(options);
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    for name in ["a", "b", "c"] {
        let function = session.graph.add_member(root, name, EntityKind::Function);
        session.graph.declare_global(function);
    }

    let batches = session.emit_globals().unwrap();
    let names: Vec<&str> = batches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["globals1", "globals2"]);
    assert_eq!(batches[1].content, "global.c = global.c || (function (...args) {\n\n});");
}

#[test]
fn test_local_dependency_is_inconsistent() {
    let mut session = session();
    let (_, platform) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let shared = session.graph.add_member(platform, "Shared", EntityKind::Module);
    session.graph.declare_global(shared);
    let (_, local) = session.graph.add_file("api/local.d.ts", "mock/local.js");
    let helper = session.graph.add_member(local, "Helper", EntityKind::Interface);
    session.graph.arena[shared].depend_on_globals.insert(helper);

    let err = session.emit_globals().unwrap_err();
    assert_eq!(err.code(), 9008);
    assert!(matches!(
        err,
        SynthError::InconsistentGlobalDependency { ref dependency, ref owner, .. }
            if dependency == "Helper" && owner == "Shared"
    ));
}

#[test]
fn test_emission_is_deterministic() {
    fn build() -> Session {
        let mut session = session();
        let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
        for name in ["Zeta", "Alpha", "Mid"] {
            let class = session.graph.add_member(root, name, EntityKind::Class);
            session.graph.add_value_member(class, "v", "1");
            session.graph.declare_global(class);
        }
        session
    }

    let first = batch_contents(&mut build());
    let second = batch_contents(&mut build());
    assert_eq!(first, second);
    assert!(first[0].starts_with("global.Zeta_temp"));
}

#[test]
fn test_local_dependency_is_inconsistent_even_when_mocked() {
    let mut session = session();
    let (_, platform) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let shared = session.graph.add_member(platform, "Shared", EntityKind::Module);
    session.graph.declare_global(shared);
    let (_, local) = session.graph.add_file("api/local.d.ts", "mock/local.js");
    let helper = session.graph.add_member(local, "Helper", EntityKind::Interface);
    session.graph.set_flags(helper, EntityFlags::MOCKED);
    session.graph.arena[shared].depend_on_globals.insert(helper);

    assert_eq!(session.emit_globals().unwrap_err().code(), 9008);
}

#[test]
fn test_global_function_dependencies_are_written_first() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let make = session.graph.add_member(root, "make", EntityKind::Function);
    session.graph.add_member(make, "Context", EntityKind::Reference);
    session.graph.declare_global(make);
    let (_, other) = session.graph.add_file("api/@ohos.context.d.ts", "mock/ohos_context.js");
    let ctx = session.graph.add_member(other, "Context", EntityKind::Interface);
    session.graph.add_value_member(ctx, "id", "1");
    session.graph.declare_global(ctx);

    let content = session.emit_globals().unwrap().remove(0).content;
    let dependency = content.find("global.Context_temp.id = 1;").unwrap();
    let function = content.find("global.make = global.make || (").unwrap();
    assert!(dependency < function, "{content}");
}

#[test]
fn test_global_function_with_local_dependency_is_inconsistent() {
    let mut session = session();
    let (_, platform) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let init = session.graph.add_member(platform, "init", EntityKind::Function);
    session.graph.declare_global(init);
    let (_, local) = session.graph.add_file("api/local.d.ts", "mock/local.js");
    let helper = session.graph.add_member(local, "Helper", EntityKind::Interface);
    session.graph.arena[init].depend_on_globals.insert(helper);

    let err = session.emit_globals().unwrap_err();
    assert!(matches!(
        err,
        SynthError::InconsistentGlobalDependency { ref owner, .. } if owner == "init"
    ));
}

#[test]
fn test_member_dependency_writes_only_that_member_first() {
    let mut session = session();
    let (_, root) = session.graph.add_file(PLATFORM, "mock/ohos_demo.js");
    let app = session.graph.add_member(root, "App", EntityKind::Class);
    let cfg = session.graph.add_member(app, "cfg", EntityKind::Property);
    let reference = session.graph.add_member(cfg, "Settings", EntityKind::Reference);
    session.graph.push_property(reference, "level");
    session.graph.declare_global(app);
    let (_, other) = session.graph.add_file("api/@ohos.settings.d.ts", "mock/ohos_settings.js");
    let settings = session.graph.add_member(other, "Settings", EntityKind::Module);
    let level = session.graph.add_value_member(settings, "level", "3");
    session.graph.add_value_member(settings, "other", "4");
    session.graph.declare_global(settings);

    let content = session.emit_globals().unwrap().remove(0).content;
    let member = content.find("global.Settings_temp.level = 3;").unwrap();
    let dependent = content
        .find("global.App_temp.prototype.cfg = global.Settings.level;")
        .unwrap();
    let rest = content.find("global.Settings_temp.other = 4;").unwrap();
    assert!(member < dependent && dependent < rest, "{content}");
    assert_eq!(content.matches("global.Settings_temp.level = 3;").count(), 1);
    assert!(session.graph.arena[level].is_mocked());
}
