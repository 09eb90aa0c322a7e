//! Global declaration emission.
//!
//! Every ambient name gets a `_temp` shell first so that members can refer
//! to any other global regardless of order. Members are then written one
//! statement at a time; the ambient declarations a member depends on are
//! written before it. Statements are split into fixed-size batches.

use crate::error::SynthError;
use crate::session::Session;
use dtsmock_graph::{EntityFlags, EntityId, EntityKind};
use tracing::{Level, debug, span};

/// One chunk of global declaration statements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalBatch {
    /// 1-based position.
    pub index: usize,
    /// Module name, `{prefix}{index}`.
    pub name: String,
    pub file_name: String,
    pub content: String,
    /// Statement importing this batch from the directory it is written to.
    pub import_statement: String,
}

impl Session {
    /// Emit every ambient declaration and split the statements into batches.
    ///
    /// Each member is written at most once per session; running this again
    /// only produces what was not written before.
    pub fn emit_globals(&mut self) -> Result<Vec<GlobalBatch>, SynthError> {
        let _span = span!(Level::DEBUG, "emit_globals").entered();
        let declarations: Vec<(String, EntityId)> = self
            .graph
            .ambient
            .iter()
            .map(|(name, id)| (name.to_string(), id))
            .collect();

        let mut statements = Vec::new();
        for (name, id) in &declarations {
            if let Some(shell) = self.global_shell(name, *id) {
                statements.push(shell);
            }
        }
        for (_, id) in &declarations {
            self.emit_declaration(*id, None, &mut statements)?;
        }

        let batches = self.split_batches(&statements);
        debug!(
            declarations = declarations.len(),
            statements = statements.len(),
            batches = batches.len(),
            "emitted globals"
        );
        Ok(batches)
    }

    /// Pre-declaration of a container name. Host-owned names keep their host
    /// value and only get the shell.
    fn global_shell(&self, name: &str, id: EntityId) -> Option<String> {
        if self.emitted_globals.contains(&id) {
            return None;
        }
        let global = self.global();
        let shell = match self.graph.arena[id].kind {
            EntityKind::Class => {
                format!("{global}.{name}_temp = class {{constructor(){{this.isAutoMock=true}}}};")
            }
            EntityKind::Interface | EntityKind::Module => {
                format!("{global}.{name}_temp = {{isAutoMock: true}};")
            }
            _ => return None,
        };
        if self.options.window_declarations.contains(name) {
            return Some(shell);
        }
        Some(format!(
            "{shell}\n{global}.{name} = {global}.{name} || {global}.{name}_temp;"
        ))
    }

    /// Write `decl`, or only its `member` when given, after the globals it
    /// depends on.
    fn emit_declaration(
        &mut self,
        decl: EntityId,
        member: Option<EntityId>,
        out: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        match member {
            Some(member) if self.graph.arena[member].is_mocked() => return Ok(()),
            None if self.emitted_globals.contains(&decl)
                || self.emitting_globals.contains(&decl) =>
            {
                return Ok(());
            }
            None => {
                self.emitting_globals.insert(decl);
            }
            Some(_) => {}
        }

        let mut values = Vec::new();
        self.path.push(decl);
        let result = match self.graph.arena[decl].kind {
            EntityKind::Class => self.emit_global_class(decl, member, &mut values),
            EntityKind::Module | EntityKind::Interface => {
                self.emit_global_object(decl, member, &mut values)
            }
            _ => self.emit_global_value(decl, &mut values),
        };
        self.path.pop();
        result?;

        self.emit_dependencies(decl, out)?;
        out.extend(values);

        if member.is_none() {
            self.emitting_globals.remove(&decl);
            self.emitted_globals.insert(decl);
        }
        Ok(())
    }

    fn emit_dependencies(
        &mut self,
        decl: EntityId,
        out: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        let deps: Vec<EntityId> = self.graph.arena[decl]
            .depend_on_globals
            .iter()
            .copied()
            .collect();
        for dep in deps {
            let entity = &self.graph.arena[dep];
            if entity.is_global_declare() {
                self.emit_declaration(dep, None, out)?;
            } else if let Some(parent) = entity.parent
                && self.graph.arena[parent].is_global_declare()
            {
                self.emit_declaration(parent, Some(dep), out)?;
            } else {
                return Err(SynthError::InconsistentGlobalDependency {
                    dependency: entity.key.clone(),
                    owner: self.graph.arena[decl].key.clone(),
                    file: self.graph.raw_path_of(decl).replace('\\', "/"),
                });
            }
        }
        Ok(())
    }

    /// Functions and plain values are assigned whole, once.
    fn emit_global_value(
        &mut self,
        decl: EntityId,
        values: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        if self.emitted_globals.contains(&decl) {
            return Ok(());
        }
        let property = self.graph.arena[decl].property;
        let body = self.synth(decl, decl, property)?;
        let global = self.global();
        let key = &self.graph.arena[decl].key;
        values.push(format!("{global}.{key} = {global}.{key} || ({body});"));
        self.emitted_globals.insert(decl);
        Ok(())
    }

    fn emit_global_class(
        &mut self,
        decl: EntityId,
        member: Option<EntityId>,
        values: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        let name = self.graph.arena[decl].key.clone();
        if let Some(member) = member {
            let key = self.graph.arena[member].key.clone();
            return self.emit_class_member(&name, decl, &key, member, decl, values);
        }

        self.merge_heritage(decl, decl)?;
        self.normalize_members(decl, decl)?;
        for (slot, member) in self.graph.arena.member_entries(decl) {
            self.emit_class_member(&name, decl, &slot, member, decl, values)?;
        }
        for duplicate in self.graph.arena[decl].same_declares.clone() {
            self.normalize_members(duplicate, decl)?;
            for (slot, member) in self.graph.arena.member_entries(duplicate) {
                self.emit_class_member(&name, duplicate, &slot, member, decl, values)?;
            }
        }
        Ok(())
    }

    fn emit_class_member(
        &mut self,
        name: &str,
        owner: EntityId,
        slot: &str,
        member: EntityId,
        root: EntityId,
        values: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        if self.graph.arena[member].is_mocked() {
            return Ok(());
        }
        let is_static = self.graph.arena[member].is_static();
        let target = if is_static { "" } else { ".prototype" };
        let assigned = if self.graph.arena[member].is_accessor() {
            format!("{name}_temp{target}.{}", self.graph.arena[member].key)
        } else {
            format!("{name}_temp{target}{}", self.member_access(slot, member))
        };
        if !self.claim_member(member, assigned) {
            return Ok(());
        }

        let statement = if self.graph.arena[member].is_accessor() {
            self.accessor_definition(name, owner, member, target, root)?
        } else {
            let property = self.graph.arena[member].property;
            let value = self.synth(member, root, property)?;
            let element = self.member_access(slot, member);
            let global = self.global();
            let mut statement = format!("{global}.{name}_temp{target}{element} = {value};");
            if !is_static && self.has_static_overload(member) {
                statement.push_str(&format!(
                    "\n{global}.{name}_temp{element} = {global}.{name}_temp.prototype{element};"
                ));
            }
            statement
        };
        self.graph.arena[member].flags |= EntityFlags::MOCKED;
        values.push(statement);
        Ok(())
    }

    /// `Object.defineProperty` for a getter/setter pair; both halves are
    /// marked mocked.
    fn accessor_definition(
        &mut self,
        name: &str,
        owner: EntityId,
        member: EntityId,
        target: &str,
        root: EntityId,
    ) -> Result<String, SynthError> {
        let key = self.graph.arena[member].key.clone();
        let getter = self.graph.arena[owner].member(&format!("get {key}"));
        let setter = self.graph.arena[owner].member(&format!("set {key}"));

        let mut parts = Vec::new();
        if let Some(getter) = getter {
            parts.push(format!("get: {},", self.synth(getter, root, None)?));
        }
        if let Some(setter) = setter {
            parts.push(format!("set: {},", self.synth(setter, root, None)?));
        }
        for half in [getter, setter].into_iter().flatten() {
            self.graph.arena[half].flags |= EntityFlags::MOCKED;
        }
        Ok(format!(
            "Object.defineProperty({}.{name}_temp{target}, '{key}', {{\n{}\n}});",
            self.global(),
            parts.join("\n")
        ))
    }

    /// Reserve an assignment target. A target some other declaration of the
    /// same name already wrote marks `member` mocked and is refused.
    fn claim_member(&mut self, member: EntityId, assigned: String) -> bool {
        if self.emitted_members.insert(assigned) {
            return true;
        }
        debug!(member = member.0, "member already written by another declaration");
        self.graph.arena[member].flags |= EntityFlags::MOCKED;
        false
    }

    fn has_static_overload(&self, member: EntityId) -> bool {
        self.graph.arena[member]
            .same_name
            .iter()
            .any(|&overload| self.graph.arena[overload].is_static())
    }

    /// `.slot`, or the bracketed key of a normalized computed member.
    fn member_access(&self, slot: &str, member: EntityId) -> String {
        let element = self.element_name(slot, member);
        if self.graph.arena[member].has_computed_key() {
            element
        } else {
            format!(".{element}")
        }
    }

    fn emit_global_object(
        &mut self,
        decl: EntityId,
        member: Option<EntityId>,
        values: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        let name = self.graph.arena[decl].key.clone();
        if matches!(self.graph.arena[decl].kind, EntityKind::Interface) {
            self.merge_heritage(decl, decl)?;
        }
        if let Some(member) = member {
            let key = self.graph.arena[member].key.clone();
            return self.emit_object_member(&name, &key, member, decl, values);
        }

        self.normalize_members(decl, decl)?;
        for (slot, member) in self.graph.arena.member_entries(decl) {
            self.emit_object_member(&name, &slot, member, decl, values)?;
        }
        for duplicate in self.graph.arena[decl].same_declares.clone() {
            let duplicate_kind = &self.graph.arena[duplicate].kind;
            if !duplicate_kind.is_container() && self.graph.is_platform_entity(duplicate) {
                continue;
            }
            self.normalize_members(duplicate, decl)?;
            for (slot, member) in self.graph.arena.member_entries(duplicate) {
                self.emit_object_member(&name, &slot, member, decl, values)?;
            }
        }
        Ok(())
    }

    fn emit_object_member(
        &mut self,
        name: &str,
        slot: &str,
        member: EntityId,
        root: EntityId,
        values: &mut Vec<String>,
    ) -> Result<(), SynthError> {
        if self.graph.arena[member].is_mocked() {
            return Ok(());
        }
        let element = self.member_access(slot, member);
        if !self.claim_member(member, format!("{name}_temp{element}")) {
            return Ok(());
        }
        let property = self.graph.arena[member].property;
        let value = self.synth(member, root, property)?;
        values.push(format!("{}.{name}_temp{element} = {value};", self.global()));
        self.graph.arena[member].flags |= EntityFlags::MOCKED;
        Ok(())
    }

    fn split_batches(&self, statements: &[String]) -> Vec<GlobalBatch> {
        let size = self.options.batch_size.max(1);
        statements
            .chunks(size)
            .enumerate()
            .map(|(i, chunk)| {
                let index = i + 1;
                let name = format!("{}{index}", self.options.batch_prefix);
                GlobalBatch {
                    index,
                    file_name: format!("{name}.js"),
                    content: chunk.join("\n"),
                    import_statement: format!("import * as {name} from './{name}';"),
                    name,
                }
            })
            .collect()
    }
}
