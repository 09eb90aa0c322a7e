//! Per-kind mock synthesis.
//!
//! `synth` is the single entry point for every recursive step: it serves the
//! memo, substitutes back references for containers already on the path, and
//! bounds the depth before dispatching on the entity kind.

use crate::error::SynthError;
use crate::intrinsics::PASS_THROUGH_REFERENCES;
use crate::session::Session;
use dtsmock_common::diagnostic_codes;
use dtsmock_common::limits::MAX_SYNTH_DEPTH;
use dtsmock_graph::{EntityId, EntityKind, ImportSpec};
use tracing::trace;

/// Member of a function entity that marks a generator-shaped return type.
pub(crate) const ITERABLE_ITERATOR: &str = "IterableIterator";

/// Strip a leading `function` / `function*` so a function expression can be
/// spliced in as a method body.
pub(crate) fn strip_function_keyword(text: &str) -> &str {
    text.strip_prefix("function*")
        .or_else(|| text.strip_prefix("function"))
        .unwrap_or(text)
}

impl Session {
    /// Synthesize `id` as a top-level unit: it is its own dependency root.
    pub fn synthesize(&mut self, id: EntityId) -> Result<String, SynthError> {
        let property = self.graph.arena[id].property;
        self.synth(id, id, property)
    }

    /// Memoized synthesis of one entity.
    ///
    /// `root` collects ambient dependencies met on the way; `property` is the
    /// chain step the caller is resolving into `id`, if any.
    pub(crate) fn synth(
        &mut self,
        id: EntityId,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<String, SynthError> {
        let entity = &self.graph.arena[id];
        // A chain step into a module or file selects one member; that result is
        // not the entity's own text and is never cached on it.
        let chained =
            property.is_some() && matches!(entity.kind, EntityKind::Module | EntityKind::File);

        if !chained && let Some(value) = &entity.value {
            let value = value.clone();
            self.stats.memo_hits += 1;
            if matches!(entity.kind, EntityKind::Reference) && !entity.depend_on_globals.is_empty()
            {
                let deps: Vec<EntityId> = entity.depend_on_globals.iter().copied().collect();
                self.add_global_dependencies(root, deps);
            }
            return Ok(value);
        }

        if entity.kind.is_container()
            && let Some(index) = self.path.iter().position(|&on_path| on_path == id)
        {
            self.stats.back_references += 1;
            let token = self.back_reference(id);
            if token == "this" {
                self.back_reference_floor = self.back_reference_floor.min(index);
            }
            return Ok(token);
        }

        if self.path.len() >= MAX_SYNTH_DEPTH {
            let key = entity.key.clone();
            return Ok(self.placeholder(
                id,
                diagnostic_codes::SYNTH_DEPTH_EXCEEDED,
                &[key.as_str()],
            ));
        }

        let index = self.path.len();
        let outer_floor = std::mem::replace(&mut self.back_reference_floor, usize::MAX);
        self.path.push(id);
        let result = self.dispatch(id, root, property);
        self.path.pop();
        let floor = self.back_reference_floor;
        self.back_reference_floor = outer_floor.min(floor);
        let text = result?;

        // `this` pointing above `id` only means something inside the
        // enclosing container's text.
        if chained || floor < index {
            return Ok(text);
        }
        Ok(self.graph.arena[id].value.get_or_insert(text).clone())
    }

    /// Token standing in for a container already being synthesized.
    fn back_reference(&self, id: EntityId) -> String {
        let entity = &self.graph.arena[id];
        if entity.is_global_declare() {
            return format!("{}.{}", self.global(), entity.key);
        }
        if let Some(parent) = entity.parent
            && self.graph.arena[parent].is_global_declare()
        {
            return format!(
                "{}.{}_temp.{}",
                self.global(),
                self.graph.arena[parent].key,
                entity.key
            );
        }
        "this".to_string()
    }

    fn dispatch(
        &mut self,
        id: EntityId,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<String, SynthError> {
        let kind = self.graph.arena[id].kind.clone();
        self.stats.dispatches += 1;
        *self.stats.by_kind.entry(kind.name()).or_default() += 1;
        trace!(entity = id.0, kind = kind.name(), "synthesize");

        match kind {
            EntityKind::Class => self.synth_class(id, root),
            EntityKind::Module => self.synth_module(id, root, property),
            EntityKind::Interface => self.synth_interface(id, root),
            EntityKind::Enum => self.synth_enum(id, root),
            EntityKind::Function => self.synth_function(id, root),
            EntityKind::Variable => self.synth_members(id, root, ",\n"),
            EntityKind::Property => self.synth_members(id, root, ","),
            EntityKind::Reference => self.synth_reference(id, root),
            EntityKind::Import(spec) => self.synth_import(id, &spec, root, property),
            EntityKind::Export { specifier } => Ok(format!("export * from '{specifier}';")),
            EntityKind::Intersection => self.synth_intersection(id, root),
            EntityKind::Expression { operands } => self.synth_joined(operands, root, " "),
            EntityKind::Value => Ok(self.graph.arena[id].key.clone()),
            EntityKind::File => self.synth_file(id, root, property),
        }
    }

    /// Synthesize each entity with its own property chain and join the texts.
    pub(crate) fn synth_joined(
        &mut self,
        ids: impl IntoIterator<Item = EntityId>,
        root: EntityId,
        separator: &str,
    ) -> Result<String, SynthError> {
        let mut parts = Vec::new();
        for id in ids {
            let property = self.graph.arena[id].property;
            parts.push(self.synth(id, root, property)?);
        }
        Ok(parts.join(separator))
    }

    fn synth_members(
        &mut self,
        id: EntityId,
        root: EntityId,
        separator: &str,
    ) -> Result<String, SynthError> {
        let members: Vec<EntityId> = self.graph.arena[id].members.values().copied().collect();
        self.synth_joined(members, root, separator)
    }

    /// Name a member is emitted under: its normalized key when it had a
    /// computed name, its slot otherwise.
    pub(crate) fn element_name(&self, slot: &str, member: EntityId) -> String {
        let entity = &self.graph.arena[member];
        if entity.has_computed_key() {
            entity.key.clone()
        } else {
            slot.to_string()
        }
    }

    fn synth_class(&mut self, id: EntityId, root: EntityId) -> Result<String, SynthError> {
        self.merge_heritage(id, root)?;
        self.normalize_members(id, root)?;

        let mut fields = vec!["this.isAutoMock=true".to_string()];
        let mut methods = Vec::new();
        for (slot, member) in self.graph.arena.member_entries(id) {
            let property = self.graph.arena[member].property;
            let value = self.synth(member, root, property)?;
            let name = self.element_name(&slot, member);
            let entity = &self.graph.arena[member];
            if entity.kind.is_function() {
                let body = strip_function_keyword(&value);
                if entity.member(ITERABLE_ITERATOR).is_some() {
                    methods.push(format!("*{name}{body}"));
                } else if entity.is_static() {
                    methods.push(format!("static {name}{body}"));
                } else {
                    methods.push(format!("{name}{body}"));
                }
            } else if entity.is_static() {
                methods.push(format!("static get {name}(){{return {value}}}"));
            } else {
                fields.push(format!("this.{name} = {value}"));
            }
        }
        Ok(format!(
            "class {{constructor() {{\n{}\n}}\n{}\n}}",
            fields.join(";\n"),
            methods.join(";\n")
        ))
    }

    fn synth_module(
        &mut self,
        id: EntityId,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<String, SynthError> {
        if let Some(text) = self.synth_chain_step(id, root, property)? {
            return Ok(text);
        }
        self.normalize_members(id, root)?;

        let is_global = self.graph.arena[id].is_global_declare();
        let mut lines = Vec::new();
        for (_, member) in self.graph.arena.member_entries(id) {
            if !is_global && !self.graph.arena[member].is_need_mock() {
                continue;
            }
            let property = self.graph.arena[member].property;
            let value = self.synth(member, root, property)?;
            lines.push(format!("{}: {value}", self.graph.arena[member].key));
        }
        Ok(format!("{{\n{}\n}}", lines.join(",\n")))
    }

    /// Resolve a chain step into a module or file straight to the member.
    /// A missing member is reported and the caller falls back to the whole
    /// entity.
    fn synth_chain_step(
        &mut self,
        id: EntityId,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<Option<String>, SynthError> {
        let Some(step) = property else {
            return Ok(None);
        };
        let step_key = self.graph.arena[step].key.clone();
        if let Some(member) = self.graph.arena[id].member(&step_key) {
            let next = self.graph.arena[step]
                .property
                .or(self.graph.arena[member].property);
            return self.synth(member, root, next).map(Some);
        }
        let key = self.graph.arena[id].key.clone();
        let raw = self.graph.raw_path_of(id).replace('\\', "/");
        self.report(
            id,
            diagnostic_codes::MISSING_CHAIN_MEMBER,
            &[step_key.as_str(), key.as_str(), raw.as_str()],
        );
        Ok(None)
    }

    fn synth_interface(&mut self, id: EntityId, root: EntityId) -> Result<String, SynthError> {
        self.merge_heritage(id, root)?;
        self.normalize_members(id, root)?;

        let is_global = self.graph.arena[id].is_global_declare();
        let mut lines = vec!["isAutoMock: true".to_string()];
        for (_, member) in self.graph.arena.member_entries(id) {
            if !is_global && !self.graph.arena[member].is_need_mock() {
                continue;
            }
            let property = self.graph.arena[member].property;
            let value = self.synth(member, root, property)?;
            lines.push(format!("{}: {value}", self.graph.arena[member].key));
        }
        Ok(format!("{{\n{}\n}}", lines.join(",\n")))
    }

    fn synth_enum(&mut self, id: EntityId, root: EntityId) -> Result<String, SynthError> {
        let mut lines = vec!["isAutoMock: 0".to_string()];
        for (slot, member) in self.graph.arena.member_entries(id) {
            let property = self.graph.arena[member].property;
            let value = self.synth(member, root, property)?;
            lines.push(format!("{slot}: {value}"));
        }
        Ok(format!("{{{}}}", lines.join(",\n")))
    }

    fn synth_reference(&mut self, id: EntityId, root: EntityId) -> Result<String, SynthError> {
        let key = self.graph.arena[id].key.clone();
        if PASS_THROUGH_REFERENCES.contains(key.as_str()) {
            let args: Vec<EntityId> = self.graph.arena[id]
                .type_parameters
                .values()
                .copied()
                .collect();
            return self.synth_joined(args, root, ",\n");
        }

        let resolution = self.resolve(id, root)?;
        let def = resolution.entity;
        let target = self.entity_along_chain(def, resolution.remaining);

        let value = if resolution.is_global {
            let path = format!(
                "{}.{}{}",
                self.global(),
                self.graph.arena[def].key,
                self.graph.property_suffix(resolution.remaining)
            );
            let dependency = resolution
                .remaining
                .and_then(|step| self.graph.arena[def].member(&self.graph.arena[step].key))
                .unwrap_or(def);
            if !self.graph.arena[dependency].is_mocked() {
                self.graph.arena[id].depend_on_globals.insert(dependency);
                self.add_global_dependencies(root, [dependency]);
            }
            path
        } else {
            self.synth(def, root, resolution.remaining)?
        };

        if value == "this" {
            return Ok(value);
        }
        match self.graph.arena[target].kind {
            EntityKind::Class => Ok(format!("new ({value})()")),
            EntityKind::Enum if !self.parent_is_variable(id) => {
                match self.graph.arena[target].members.values().next().copied() {
                    Some(first) => {
                        let property = self.graph.arena[first].property;
                        self.synth(first, root, property)
                    }
                    None => Ok(value),
                }
            }
            EntityKind::Function if resolution.is_global => Ok(format!(
                "function (...args) {{ return {value}.apply(this, args); }}"
            )),
            _ => Ok(value),
        }
    }

    fn parent_is_variable(&self, id: EntityId) -> bool {
        self.graph.arena[id]
            .parent
            .is_some_and(|parent| matches!(self.graph.arena[parent].kind, EntityKind::Variable))
    }

    /// Entity at the end of a chain, or the deepest one that exists.
    pub(crate) fn entity_along_chain(
        &self,
        base: EntityId,
        property: Option<EntityId>,
    ) -> EntityId {
        let mut current = base;
        let mut step = property;
        while let Some(step_id) = step {
            match self.graph.arena[current].member(&self.graph.arena[step_id].key) {
                Some(next) => current = next,
                None => break,
            }
            step = self.graph.arena[step_id].property;
        }
        current
    }

    pub(crate) fn add_global_dependencies(
        &mut self,
        root: EntityId,
        deps: impl IntoIterator<Item = EntityId>,
    ) {
        for dep in deps {
            if dep != root && !self.graph.arena[dep].is_mocked() {
                self.graph.arena[root].depend_on_globals.insert(dep);
            }
        }
    }

    fn synth_import(
        &mut self,
        id: EntityId,
        spec: &ImportSpec,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<String, SynthError> {
        let resolution = self.resolve_import(id, spec, root, property)?;
        self.synth(resolution.entity, root, resolution.remaining)
    }

    fn synth_intersection(&mut self, id: EntityId, root: EntityId) -> Result<String, SynthError> {
        let key = self.graph.arena[id].key.clone();
        let mut operands = Vec::new();
        for (_, param) in self.graph.arena[id].params.clone() {
            let property = self.graph.arena[param].property;
            let value = self.synth(param, root, property)?;
            operands.push(format!("({value}) || {{}}"));
        }
        Ok(format!("{key}({})", operands.join(", ")))
    }

    fn synth_file(
        &mut self,
        id: EntityId,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<String, SynthError> {
        Ok(self
            .synth_chain_step(id, root, property)?
            .unwrap_or_else(|| "''".to_string()))
    }
}
