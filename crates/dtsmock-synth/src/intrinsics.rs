//! Fixed name tables consulted by the resolver.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Generic wrappers whose mock is simply the mock of their type arguments.
pub static PASS_THROUGH_REFERENCES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "Promise",
        "Partial",
        "Required",
        "Pick",
        "Exclude",
        "Extract",
        "Omit",
        "NonNullable",
    ]
    .into_iter()
    .collect()
});

/// Runtime built-ins that exist in every host and can be constructed with `new`.
pub static HOST_CONSTRUCTORS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "Object",
        "Array",
        "Map",
        "Set",
        "WeakMap",
        "WeakSet",
        "Date",
        "Error",
        "TypeError",
        "RangeError",
        "RegExp",
        "Number",
        "String",
        "Boolean",
        "ArrayBuffer",
        "SharedArrayBuffer",
        "DataView",
        "Int8Array",
        "Uint8Array",
        "Uint8ClampedArray",
        "Int16Array",
        "Uint16Array",
        "Int32Array",
        "Uint32Array",
        "Float32Array",
        "Float64Array",
        "BigInt64Array",
        "BigUint64Array",
    ]
    .into_iter()
    .collect()
});

/// What a host intrinsic name resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostIntrinsic {
    /// Emitted verbatim.
    Verbatim(&'static str),
    /// `new Name(args)`.
    Construct(&'static str),
}

pub fn host_intrinsic(name: &str) -> Option<HostIntrinsic> {
    match name {
        "globalThis" => Some(HostIntrinsic::Verbatim("globalThis")),
        "Symbol" => Some(HostIntrinsic::Verbatim("[Symbol.iterator]")),
        "Function" => Some(HostIntrinsic::Verbatim("() => {}")),
        _ => HOST_CONSTRUCTORS
            .get(name)
            .map(|&ctor| HostIntrinsic::Construct(ctor)),
    }
}

/// Canned stub for a built-in generic utility type. `args` is the already
/// synthesized type arguments, joined with `, `.
pub fn utility_stub(name: &str, args: &str) -> Option<String> {
    let stub = match name {
        "Record" | "thisType" => "{}".to_string(),
        "IterableIterator" => generator_stub(args),
        "PropertyDecorator" | "ClassDecorator" | "MethodDecorator" => "() => {}".to_string(),
        "Readonly" => args.to_string(),
        "CanvasRenderingContext2D" | "WebGLRenderingContext" | "WebGL2RenderingContext" => {
            format!("{{name: 'The {name} is not mocked'}}")
        }
        _ => return None,
    };
    Some(stub)
}

pub fn is_utility_type(name: &str) -> bool {
    utility_stub(name, "").is_some()
}

/// Generator function yielding the same payload three times.
pub fn generator_stub(payload: &str) -> String {
    format!(
        "function* () {{\nconst yieldObj = {payload};\nyield yieldObj;\nyield yieldObj;\nyield yieldObj;\n}}"
    )
}
