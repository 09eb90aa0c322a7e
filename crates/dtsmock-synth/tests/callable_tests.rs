use dtsmock_graph::{Accessor, EntityId, EntityKind};
use dtsmock_synth::{DEFAULT_CALLBACK_ERROR, Session, SynthOptions};

fn session() -> Session {
    Session::new(SynthOptions::default())
}

/// `name: Wrapper<payload>` parameter.
fn callback_param(
    session: &mut Session,
    function: EntityId,
    name: &str,
    wrapper: &str,
    payload: &str,
) {
    let param = session.graph.add_param(function, name, EntityKind::Property);
    let ty = session.graph.add_member(param, wrapper, EntityKind::Reference);
    session.graph.add_type_parameter(ty, payload, EntityKind::Value);
}

fn invoke(args: &str) -> String {
    format!(
        "if (args && typeof args[args.length - 1] === 'function') {{\nargs[args.length - 1].call(this, {args});\n}}"
    )
}

#[test]
fn test_async_callback_without_return() {
    let mut session = session();
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let load = session.graph.add_member(root, "load", EntityKind::Function);
    session.graph.add_param(load, "path", EntityKind::Property);
    callback_param(&mut session, load, "callback", "AsyncCallback", "void");
    session.graph.add_member(load, "void", EntityKind::Value);

    let text = session.synthesize(load).unwrap();
    assert_eq!(
        text,
        format!("function (...args) {{\n{}\n}}", invoke(DEFAULT_CALLBACK_ERROR))
    );
    assert!(!text.contains("return"));
}

#[test]
fn test_sync_callback_receives_payload() {
    let mut session = session();
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let read = session.graph.add_member(root, "read", EntityKind::Function);
    callback_param(&mut session, read, "onDoneCallback", "Callback", "''");

    let text = session.synthesize(read).unwrap();
    assert_eq!(text, format!("function (...args) {{\n{}\n}}", invoke("''")));
}

#[test]
fn test_untyped_callback_is_treated_as_async() {
    let mut session = session();
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let close = session.graph.add_member(root, "close", EntityKind::Function);
    let param = session.graph.add_param(close, "callback", EntityKind::Property);
    session.graph.add_member(param, "ErrorCallback", EntityKind::Reference);

    let text = session.synthesize(close).unwrap();
    assert!(text.contains(&invoke(DEFAULT_CALLBACK_ERROR)));
}

#[test]
fn test_promise_return_resolves_payload() {
    let mut session = session();
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let fetch = session.graph.add_member(root, "fetch", EntityKind::Function);
    let promise = session.graph.add_member(fetch, "Promise", EntityKind::Reference);
    session.graph.add_type_parameter(promise, "''", EntityKind::Value);

    assert_eq!(
        session.synthesize(fetch).unwrap(),
        "function (...args) {\nreturn new Promise(function (resolve, reject) {\nresolve('');\n});\n}"
    );
}

#[test]
fn test_overload_set_always_returns_promise() {
    let mut session = session();
    let (_, root) = session.graph.add_file("prefs.d.ts", "prefs.js");
    let with_callback = session.graph.add_member(root, "get", EntityKind::Function);
    session.graph.add_param(with_callback, "key", EntityKind::Property);
    callback_param(&mut session, with_callback, "callback", "AsyncCallback", "0");
    session.graph.add_member(with_callback, "void", EntityKind::Value);
    let with_promise = session.graph.add_member(root, "get", EntityKind::Function);
    session.graph.add_param(with_promise, "key", EntityKind::Property);
    let promise = session.graph.add_member(with_promise, "Promise", EntityKind::Reference);
    session.graph.add_type_parameter(promise, "0", EntityKind::Value);

    let text = session.synthesize(with_callback).unwrap();
    let callback = invoke(&format!("{DEFAULT_CALLBACK_ERROR}, p1"));
    assert_eq!(
        text,
        format!(
            "function (...args) {{\nconst p1 = 0;\n{callback}\nreturn new Promise(function (resolve, reject) {{\nresolve(p1);\n}});\n}}"
        )
    );
}

#[test]
fn test_fine_discrimination_guards_each_overload() {
    let mut session = session();
    let (_, root) = session.graph.add_file("events.d.ts", "events.js");
    let on_change = session.graph.add_member(root, "on", EntityKind::Function);
    let kind = session.graph.add_param(on_change, "type", EntityKind::Property);
    session.graph.add_member(kind, "'change'", EntityKind::Value);
    callback_param(&mut session, on_change, "callback", "Callback", "1");
    let on_error = session.graph.add_member(root, "on", EntityKind::Function);
    let kind = session.graph.add_param(on_error, "type", EntityKind::Property);
    session.graph.add_member(kind, "'error'", EntityKind::Value);
    callback_param(&mut session, on_error, "callback", "AsyncCallback", "void");

    let text = session.synthesize(on_change).unwrap();
    let expected = format!(
        "function (...args) {{\nif (args && ['change'].includes(args[0])) {{\n{}\n}}\nif (args && ['error'].includes(args[0])) {{\n{}\n}}\n}}",
        invoke("1"),
        invoke(DEFAULT_CALLBACK_ERROR)
    );
    assert_eq!(text, expected);
}

#[test]
fn test_plain_overloads_invoke_first_callback_only() {
    let mut session = session();
    let (_, root) = session.graph.add_file("events.d.ts", "events.js");
    let first = session.graph.add_member(root, "watch", EntityKind::Function);
    callback_param(&mut session, first, "callback", "Callback", "1");
    let second = session.graph.add_member(root, "watch", EntityKind::Function);
    callback_param(&mut session, second, "callback", "Callback", "2");

    let text = session.synthesize(first).unwrap();
    assert_eq!(text.matches("args[args.length - 1].call").count(), 1);
    assert!(text.contains("call(this, 1)"));
}

#[test]
fn test_accessor_parameter_lists() {
    let mut session = session();
    let (_, root) = session.graph.add_file("widget.d.ts", "widget.js");
    let widget = session.graph.add_member(root, "Widget", EntityKind::Class);
    let getter = session.graph.add_accessor(widget, "size", Accessor::Get);
    session.graph.add_member(getter, "1", EntityKind::Value);
    let setter = session.graph.add_accessor(widget, "size", Accessor::Set);

    assert_eq!(session.synthesize(getter).unwrap(), "function () {\nreturn 1;\n}");
    assert_eq!(session.synthesize(setter).unwrap(), "function (args) {\n\n}");
}

#[test]
fn test_iterable_iterator_return_is_a_generator() {
    let mut session = session();
    let (_, root) = session.graph.add_file("coll.d.ts", "coll.js");
    let list = session.graph.add_member(root, "List", EntityKind::Class);
    let entries = session.graph.add_member(list, "entries", EntityKind::Function);
    let iter = session
        .graph
        .add_member(entries, "IterableIterator", EntityKind::Reference);
    session.graph.add_type_parameter(iter, "0", EntityKind::Value);

    let text = session.synthesize(list).unwrap();
    assert!(
        text.contains("*entries () {\nconst yieldObj = 0;\nyield yieldObj;"),
        "{text}"
    );
}

#[test]
fn test_callback_error_is_configurable() {
    let options = SynthOptions {
        callback_error: "null".to_string(),
        ..SynthOptions::default()
    };
    let mut session = Session::new(options);
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let load = session.graph.add_member(root, "load", EntityKind::Function);
    callback_param(&mut session, load, "callback", "AsyncCallback", "1");

    assert!(session.synthesize(load).unwrap().contains("call(this, null, 1)"));
}

#[test]
fn test_promise_void_resolves_without_value() {
    let mut session = session();
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let close = session.graph.add_member(root, "close", EntityKind::Function);
    let promise = session.graph.add_member(close, "Promise", EntityKind::Reference);
    session.graph.add_type_parameter(promise, "void", EntityKind::Value);

    assert_eq!(
        session.synthesize(close).unwrap(),
        "function (...args) {\nreturn new Promise(function (resolve, reject) {\nresolve();\n});\n}"
    );
}

#[test]
fn test_overload_set_with_promise_void() {
    let mut session = session();
    let (_, root) = session.graph.add_file("io.d.ts", "io.js");
    let with_callback = session.graph.add_member(root, "close", EntityKind::Function);
    callback_param(&mut session, with_callback, "callback", "AsyncCallback", "void");
    session.graph.add_member(with_callback, "void", EntityKind::Value);
    let with_promise = session.graph.add_member(root, "close", EntityKind::Function);
    let promise = session.graph.add_member(with_promise, "Promise", EntityKind::Reference);
    session.graph.add_type_parameter(promise, "void", EntityKind::Value);

    let text = session.synthesize(with_callback).unwrap();
    assert!(!text.contains("void"), "{text}");
    assert_eq!(
        text,
        format!(
            "function (...args) {{\n{}\nreturn new Promise(function (resolve, reject) {{\nresolve();\n}});\n}}",
            invoke(DEFAULT_CALLBACK_ERROR)
        )
    );
}

#[test]
fn test_configured_name_without_literal_invokes_once() {
    let mut session = session();
    let (_, root) = session.graph.add_file("events.d.ts", "events.js");
    let first = session.graph.add_member(root, "on", EntityKind::Function);
    callback_param(&mut session, first, "callback", "Callback", "1");
    let second = session.graph.add_member(root, "on", EntityKind::Function);
    callback_param(&mut session, second, "callback", "Callback", "2");

    let text = session.synthesize(first).unwrap();
    assert_eq!(text, format!("function (...args) {{\n{}\n}}", invoke("1")));
}

#[test]
fn test_discriminating_literal_is_escaped() {
    let mut session = session();
    let (_, root) = session.graph.add_file("events.d.ts", "events.js");
    let on = session.graph.add_member(root, "on", EntityKind::Function);
    let kind = session.graph.add_param(on, "type", EntityKind::Property);
    session.graph.add_member(kind, "\"it's\"", EntityKind::Value);
    callback_param(&mut session, on, "callback", "Callback", "1");

    let text = session.synthesize(on).unwrap();
    assert!(text.contains("if (args && ['it\\'s'].includes(args[0])) {"), "{text}");
}
