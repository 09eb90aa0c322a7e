//! Symbol resolution.
//!
//! Passes run in a fixed order and the first hit wins:
//! 1. lexical scope chain (type parameters, then members, imports followed)
//! 2. ambient declarations
//! 3. host intrinsics
//! 4. built-in utility types, then configured stub types
//! 5. every registered file's top-level members
//! 6. diagnostic placeholder

use crate::error::SynthError;
use crate::intrinsics::{HostIntrinsic, host_intrinsic, is_utility_type, utility_stub};
use crate::session::Session;
use dtsmock_common::diagnostic_codes;
use dtsmock_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use dtsmock_graph::{Entity, EntityId, EntityKind, FileId, ImportBinding, ImportSpec};
use tracing::{Level, debug, span, warn};

/// Where a name is defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub entity: EntityId,
    pub file: FileId,
    /// Ambient declaration from a platform module: referenced through the
    /// global object rather than inlined.
    pub is_global: bool,
    /// Property chain steps the lookup did not consume.
    pub remaining: Option<EntityId>,
}

impl Session {
    /// Resolve `reference`'s key as seen from its position in the tree,
    /// following its own property chain.
    ///
    /// Unknown names never fail; only a missing step of an explicit property
    /// chain on a found base is an error.
    pub fn resolve(
        &mut self,
        reference: EntityId,
        root: EntityId,
    ) -> Result<Resolution, SynthError> {
        let property = self.graph.arena[reference].property;
        let name = self.graph.arena[reference].key.clone();
        let _span = span!(Level::DEBUG, "resolve", name = %name).entered();

        if let Some(found) = self.resolve_in_scope(reference, &name, root, property)? {
            debug!(entity = found.entity.0, "resolved in scope chain");
            return Ok(found);
        }

        if let Some(decl) = self.graph.ambient.get(&name) {
            let is_global = self.graph.is_platform_entity(decl);
            debug!(entity = decl.0, is_global, "resolved in ambient table");
            return Ok(Resolution {
                entity: decl,
                file: self.graph.arena[decl].file,
                is_global,
                remaining: property,
            });
        }

        if let Some(intrinsic) = host_intrinsic(&name) {
            let text = match intrinsic {
                HostIntrinsic::Verbatim(text) => text.to_string(),
                HostIntrinsic::Construct(ctor) => {
                    let params = self.graph.arena[reference].params.clone();
                    let args = self.synth_joined(params.values().copied(), root, ", ")?;
                    format!("new {ctor}({args})")
                }
            };
            debug!(%text, "resolved to host intrinsic");
            return Ok(self.value_resolution(reference, text, property));
        }

        if is_utility_type(&name) {
            let params = self.graph.arena[reference].type_parameters.clone();
            let args = self.synth_joined(params.values().copied(), root, ", ")?;
            if let Some(text) = utility_stub(&name, &args) {
                debug!("resolved to utility type stub");
                return Ok(self.value_resolution(reference, text, property));
            }
        }

        if let Some(text) = self.options.stub_types.get(&name).cloned() {
            debug!("resolved to configured stub type");
            return Ok(self.value_resolution(reference, text, property));
        }

        if let Some(found) = self.resolve_in_all_files(reference, &name, property)? {
            debug!(entity = found.entity.0, "resolved by file scan");
            return Ok(found);
        }

        let path = self.graph.arena.key_path(reference);
        let display = path.get(1..).map(|rest| rest.join("->")).unwrap_or_default();
        let file = self.graph.raw_path_of(reference).replace('\\', "/");
        let text = self.placeholder(
            reference,
            diagnostic_codes::UNRESOLVED_SYMBOL,
            &[display.as_str(), file.as_str()],
        );
        Ok(self.value_resolution(reference, text, None))
    }

    fn resolve_in_scope(
        &mut self,
        reference: EntityId,
        name: &str,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<Option<Resolution>, SynthError> {
        let mut scope = self.graph.arena[reference].parent;
        let mut iterations = 0;
        while let Some(level) = scope {
            iterations += 1;
            if iterations > MAX_SCOPE_WALK_ITERATIONS {
                warn!(name, "scope walk exceeded iteration limit");
                break;
            }
            let entity = &self.graph.arena[level];
            if let Some(&param) = entity.type_parameters.get(name)
                && param != reference
            {
                return Ok(Some(self.local_resolution(param)));
            }
            if let Some(&found) = entity.members.get(name)
                && found != reference
            {
                let found_kind = &self.graph.arena[found].kind;
                let usable = matches!(entity.kind, EntityKind::Enum)
                    || !matches!(found_kind, EntityKind::Property);
                if usable {
                    if let EntityKind::Import(spec) = found_kind {
                        let spec = spec.clone();
                        return self.resolve_import(found, &spec, root, property).map(Some);
                    }
                    let def = self.follow_property(found, property)?;
                    return Ok(Some(self.local_resolution(def)));
                }
            }
            scope = entity.parent;
        }
        Ok(None)
    }

    fn resolve_in_all_files(
        &mut self,
        reference: EntityId,
        name: &str,
        property: Option<EntityId>,
    ) -> Result<Option<Resolution>, SynthError> {
        let roots: Vec<EntityId> = self.graph.files.iter().map(|f| f.root).collect();
        for root in roots {
            if let Some(found) = self.graph.arena[root].member(name)
                && found != reference
            {
                let def = self.follow_property(found, property)?;
                return Ok(Some(self.local_resolution(def)));
            }
        }
        Ok(None)
    }

    /// Redirect an import to the exporting file's entity.
    pub(crate) fn resolve_import(
        &mut self,
        import: EntityId,
        spec: &ImportSpec,
        root: EntityId,
        property: Option<EntityId>,
    ) -> Result<Resolution, SynthError> {
        let Some((imported_root, imported_raw)) = self
            .graph
            .files
            .lookup(&spec.module_path)
            .map(|f| (f.root, f.raw_path.replace('\\', "/")))
        else {
            let text = self.placeholder(
                import,
                diagnostic_codes::UNREGISTERED_MODULE,
                &[spec.module_path.as_str()],
            );
            return Ok(self.value_resolution(import, text, None));
        };

        let exported_name = spec
            .raw_name
            .clone()
            .unwrap_or_else(|| self.graph.arena[import].key.clone());
        let target = match spec.binding {
            ImportBinding::Default => self.graph.arena[imported_root].member("default"),
            ImportBinding::Namespace => Some(imported_root),
            ImportBinding::Named => self.graph.arena[imported_root].member(&exported_name),
        };
        let Some(def) = target else {
            if spec.binding == ImportBinding::Default {
                let text = self.placeholder(
                    import,
                    diagnostic_codes::MISSING_DEFAULT_EXPORT,
                    &[imported_raw.as_str()],
                );
                return Ok(self.value_resolution(import, text, None));
            }
            let importing_raw = self.graph.raw_path_of(import).replace('\\', "/");
            let text = self.placeholder(
                import,
                diagnostic_codes::MISSING_EXPORT,
                &[
                    exported_name.as_str(),
                    imported_raw.as_str(),
                    importing_raw.as_str(),
                ],
            );
            return Ok(self.value_resolution(import, text, None));
        };

        if !self.graph.arena[def].is_global_declare() {
            let def = self.follow_property(def, property)?;
            return Ok(self.local_resolution(def));
        }

        let dependency = property
            .and_then(|step| self.graph.arena[def].member(&self.graph.arena[step].key))
            .unwrap_or(def);
        if matches!(self.graph.arena[dependency].kind, EntityKind::Enum) {
            return Ok(self.local_resolution(dependency));
        }

        let path = format!(
            "{}.{}{}",
            self.global(),
            self.graph.arena[def].key,
            self.graph.property_suffix(property)
        );
        let kind = self.graph.arena[self.entity_along_chain(def, property)]
            .kind
            .clone();
        let mut alias = Entity::new(path.clone(), kind, self.graph.arena[import].file);
        alias.value = Some(path);
        if !self.graph.arena[dependency].is_mocked() {
            alias.depend_on_globals.insert(dependency);
            self.add_global_dependencies(root, [dependency]);
        }
        let alias = self.graph.arena.push(alias);
        Ok(self.local_resolution(alias))
    }

    /// Walk an explicit `A.b.c` chain from `base`.
    pub(crate) fn follow_property(
        &self,
        base: EntityId,
        property: Option<EntityId>,
    ) -> Result<EntityId, SynthError> {
        let mut current = base;
        let mut step = property;
        while let Some(step_id) = step {
            let key = &self.graph.arena[step_id].key;
            match self.graph.arena[current].member(key) {
                Some(next) => current = next,
                None => {
                    return Err(SynthError::MissingPropertyPath {
                        property: key.clone(),
                        base: self.graph.arena[base].key.clone(),
                        file: self.graph.raw_path_of(step_id).replace('\\', "/"),
                    });
                }
            }
            step = self.graph.arena[step_id].property;
        }
        Ok(current)
    }

    fn local_resolution(&self, entity: EntityId) -> Resolution {
        Resolution {
            entity,
            file: self.graph.arena[entity].file,
            is_global: false,
            remaining: None,
        }
    }

    /// A fresh `Value` entity carrying fixed text.
    fn value_resolution(
        &mut self,
        at: EntityId,
        text: String,
        remaining: Option<EntityId>,
    ) -> Resolution {
        let file = self.graph.arena[at].file;
        let entity = self.graph.arena.alloc_value(text.clone(), text, file);
        Resolution {
            entity,
            file,
            is_global: false,
            remaining,
        }
    }
}
