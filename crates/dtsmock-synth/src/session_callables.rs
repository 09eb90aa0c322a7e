//! Function stubs: overload sets, promise returns and callback invocation.

use crate::error::SynthError;
use crate::session::Session;
use crate::session_synth::ITERABLE_ITERATOR;
use dtsmock_graph::{EntityFlags, EntityId, EntityKind};

const PROMISE: &str = "Promise";

/// How callback payloads are chosen for an overload set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CallbackMode {
    /// Each callback receives its own type arguments.
    Single,
    /// Callbacks receive the promise payload of the overload set.
    Multiple,
}

/// The trailing callback parameter of one overload.
struct CallbackShape {
    /// String literal the first argument must equal for this overload.
    literal: Option<String>,
    /// Node-style callback taking an error first.
    is_async: bool,
    payload: Vec<String>,
}

impl Session {
    pub(crate) fn synth_function(
        &mut self,
        id: EntityId,
        root: EntityId,
    ) -> Result<String, SynthError> {
        if let Some(generator) = self.graph.arena[id].member(ITERABLE_ITERATOR) {
            let property = self.graph.arena[generator].property;
            return self.synth(generator, root, property);
        }
        let mut overloads = vec![id];
        overloads.extend(self.graph.arena[id].same_name.iter().copied());
        if overloads.len() >= 2 {
            self.synth_overloaded(&overloads, root)
        } else {
            self.synth_single(&overloads, root)
        }
    }

    fn parameter_list(&self, id: EntityId) -> &'static str {
        let entity = &self.graph.arena[id];
        if entity.flags.contains(EntityFlags::GETTER) {
            "()"
        } else if entity.flags.contains(EntityFlags::SETTER) {
            "(args)"
        } else {
            "(...args)"
        }
    }

    fn is_void(&self, id: EntityId) -> bool {
        let entity = &self.graph.arena[id];
        matches!(entity.kind, EntityKind::Value) && entity.key == "void"
    }

    fn returns_promise(&self, id: EntityId) -> bool {
        self.graph.arena[id]
            .member(PROMISE)
            .is_some_and(|promise| matches!(self.graph.arena[promise].kind, EntityKind::Reference))
    }

    /// Fine discrimination applies when the name is configured for it and
    /// some overload leads with a string-literal parameter.
    fn is_fine_discriminated(&self, overloads: &[EntityId]) -> bool {
        let configured = self
            .options
            .fine_discrimination
            .contains(&self.graph.arena[overloads[0]].key);
        configured
            && overloads.iter().any(|&function| {
                let params = &self.graph.arena[function].params;
                params.len() > 1
                    && params
                        .values()
                        .next()
                        .is_some_and(|&first| self.leading_literal(first).is_some())
            })
    }

    /// Synthesized type arguments of a `Promise<..>`, `void` dropped.
    fn promise_payload(
        &mut self,
        promise: EntityId,
        root: EntityId,
    ) -> Result<Vec<String>, SynthError> {
        let args: Vec<EntityId> = self.graph.arena[promise]
            .type_parameters
            .values()
            .copied()
            .collect();
        let mut payload = Vec::new();
        for arg in args {
            if self.is_void(arg) {
                continue;
            }
            let property = self.graph.arena[arg].property;
            payload.push(self.synth(arg, root, property)?);
        }
        Ok(payload)
    }

    /// Stub for one signature, or for an overload set without a promise
    /// return. The first overload supplies the return value.
    fn synth_single(
        &mut self,
        overloads: &[EntityId],
        root: EntityId,
    ) -> Result<String, SynthError> {
        let primary = overloads[0];
        let returns: Vec<EntityId> =
            self.graph.arena[primary].members.values().copied().collect();
        let mut parts = Vec::new();
        for ret in returns {
            if self.is_void(ret) {
                continue;
            }
            let entity = &self.graph.arena[ret];
            if entity.key == PROMISE && matches!(entity.kind, EntityKind::Reference) {
                parts.extend(self.promise_payload(ret, root)?);
                continue;
            }
            let property = entity.property;
            parts.push(self.synth(ret, root, property)?);
        }

        let special = self.is_fine_discriminated(overloads);
        let candidates = if special { overloads } else { &overloads[..1] };
        let callbacks =
            self.callback_invocations(candidates, CallbackMode::Single, special, &[], root)?;

        let mut body = Vec::new();
        if !callbacks.is_empty() {
            body.push(callbacks);
        }
        if self.returns_promise(primary) {
            body.push(resolved_promise(&parts.join(", ")));
        } else if !parts.is_empty() {
            body.push(format!("return {};", parts.join(",")));
        }
        Ok(format!(
            "function {} {{\n{}\n}}",
            self.parameter_list(primary),
            body.join("\n")
        ))
    }

    /// Overload set where at least one signature returns a promise: the stub
    /// always returns that promise, and callbacks receive its payload.
    fn synth_overloaded(
        &mut self,
        overloads: &[EntityId],
        root: EntityId,
    ) -> Result<String, SynthError> {
        let promised = overloads
            .iter()
            .copied()
            .find_map(|f| self.graph.arena[f].member(PROMISE));
        let Some(promise) = promised else {
            return self.synth_single(overloads, root);
        };

        let mut lines = Vec::new();
        let mut results = Vec::new();
        for (index, value) in self.promise_payload(promise, root)?.into_iter().enumerate() {
            let name = format!("p{}", index + 1);
            lines.push(format!("const {name} = {value};"));
            results.push(name);
        }

        let special = self.is_fine_discriminated(overloads);
        let callbacks =
            self.callback_invocations(overloads, CallbackMode::Multiple, special, &results, root)?;
        if !callbacks.is_empty() {
            lines.push(callbacks);
        }
        lines.push(resolved_promise(&results.join(", ")));
        Ok(format!(
            "function {} {{\n{}\n}}",
            self.parameter_list(overloads[0]),
            lines.join("\n")
        ))
    }

    /// Invocation blocks for the callback parameters of `candidates`.
    ///
    /// Fine-discriminated names get one literal-guarded block per overload;
    /// otherwise only the first callback found is invoked.
    fn callback_invocations(
        &mut self,
        candidates: &[EntityId],
        mode: CallbackMode,
        special: bool,
        results: &[String],
        root: EntityId,
    ) -> Result<String, SynthError> {
        let mut blocks = Vec::new();
        for &function in candidates {
            let Some(shape) = self.callback_shape(function, special, root)? else {
                continue;
            };
            let mut args = Vec::new();
            if shape.is_async {
                args.push(self.options.callback_error.clone());
            }
            if mode == CallbackMode::Multiple && !special {
                args.extend(results.iter().cloned());
            } else {
                args.extend(shape.payload);
            }
            let call = format!(
                "if (args && typeof args[args.length - 1] === 'function') {{\nargs[args.length - 1].call(this, {});\n}}",
                args.join(", ")
            );
            blocks.push(match shape.literal {
                Some(literal) => {
                    let literal = literal.replace('\\', "\\\\").replace('\'', "\\'");
                    format!("if (args && ['{literal}'].includes(args[0])) {{\n{call}\n}}")
                }
                None => call,
            });
            if !special {
                break;
            }
        }
        Ok(blocks.join("\n"))
    }

    /// Inspect the last parameter; it is a callback when its name says so.
    fn callback_shape(
        &mut self,
        function: EntityId,
        special: bool,
        root: EntityId,
    ) -> Result<Option<CallbackShape>, SynthError> {
        let params: Vec<(String, EntityId)> = self.graph.arena[function]
            .params
            .iter()
            .map(|(name, &id)| (name.clone(), id))
            .collect();
        let Some((_, param)) = params
            .last()
            .filter(|(name, _)| name.to_ascii_lowercase().contains("callback"))
        else {
            return Ok(None);
        };
        let param = *param;

        let (is_async, callback_type) = match self.graph.arena[param].member("AsyncCallback") {
            Some(ty) => (true, Some(ty)),
            None => match self.graph.arena[param].member("Callback") {
                Some(ty) => (false, Some(ty)),
                None => (true, None),
            },
        };

        let mut payload = Vec::new();
        if let Some(ty) = callback_type {
            let args: Vec<EntityId> = self.graph.arena[ty]
                .type_parameters
                .values()
                .copied()
                .collect();
            for arg in args {
                if self.is_void(arg) {
                    continue;
                }
                let property = self.graph.arena[arg].property;
                payload.push(self.synth(arg, root, property)?);
            }
        }

        let literal = if special && params.len() > 1 {
            self.leading_literal(params[0].1)
        } else {
            None
        };
        Ok(Some(CallbackShape {
            literal,
            is_async,
            payload,
        }))
    }

    /// The string literal a discriminating first parameter is typed as.
    fn leading_literal(&self, param: EntityId) -> Option<String> {
        let first = self.graph.arena[param].members.values().next().copied()?;
        let entity = &self.graph.arena[first];
        if !matches!(entity.kind, EntityKind::Value) {
            return None;
        }
        let key = entity.key.as_str();
        let quoted = key.len() >= 2
            && ((key.starts_with('\'') && key.ends_with('\''))
                || (key.starts_with('"') && key.ends_with('"')));
        quoted.then(|| key[1..key.len() - 1].to_string())
    }
}

fn resolved_promise(payload: &str) -> String {
    format!("return new Promise(function (resolve, reject) {{\nresolve({payload});\n}});")
}
