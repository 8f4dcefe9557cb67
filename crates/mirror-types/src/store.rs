//! In-memory declaration storage.
//!
//! `DeclarationStore` is a concurrent [`DeclarationProvider`] that embedders
//! and tests populate programmatically. It is seeded with the root class,
//! the void class and the primitive classes; array classes are created on
//! first request.
//!
//! Declarations are built in two phases: first declare the class (so that
//! its id exists and can be referenced by its own supertypes and members),
//! then attach type parameters, supertypes and members.
//!
//! ```ignore
//! let store = DeclarationStore::new();
//! let node = store.declare_class("demo.Node", ClassKind::Class);
//! let t = store.declare_type_parameters(GenericDeclaration::Class(node), &["T"])[0];
//! store.set_bounds(t, vec![HostType::parameterized(node, vec![t.into()]).into()]);
//! ```
//!
//! Snapshots handed to a `MirrorCache` are taken when a descriptor is first
//! built, so finish declaring a class before reflecting it.

use crate::handle::{AnnotatedType, ClassId, FieldId, HostType, MethodId, TypeVarId};
use crate::metadata::{
    ClassInfo, ClassKind, DeclarationProvider, ExecutableKind, FieldInfo, GenericDeclaration,
    MethodInfo, Modifiers, ParameterInfo, TypeVarInfo,
};
use dashmap::DashMap;
use mirror_common::{Atom, ShardedInterner};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

/// Thread-safe storage for class, type-variable and member declarations.
pub struct DeclarationStore {
    /// Unique instance ID for debugging
    instance_id: u64,
    interner: ShardedInterner,
    classes: DashMap<ClassId, Arc<ClassInfo>>,
    type_vars: DashMap<TypeVarId, Arc<TypeVarInfo>>,
    methods: DashMap<MethodId, Arc<MethodInfo>>,
    fields: DashMap<FieldId, Arc<FieldInfo>>,
    /// Binary name -> class
    by_name: DashMap<Atom, ClassId>,
    /// Component class -> array class
    array_classes: DashMap<ClassId, ClassId>,
    next_class: AtomicU32,
    next_type_var: AtomicU32,
    next_method: AtomicU32,
    next_field: AtomicU32,
    object: ClassId,
    void: ClassId,
}

impl Default for DeclarationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationStore {
    /// Create a store seeded with `java.lang.Object`, `void` and the primitives.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DeclarationStore::new - creating new instance");

        let mut store = Self {
            instance_id,
            interner: ShardedInterner::with_well_known_names(),
            classes: DashMap::new(),
            type_vars: DashMap::new(),
            methods: DashMap::new(),
            fields: DashMap::new(),
            by_name: DashMap::new(),
            array_classes: DashMap::new(),
            next_class: AtomicU32::new(1),
            next_type_var: AtomicU32::new(1),
            next_method: AtomicU32::new(1),
            next_field: AtomicU32::new(1),
            object: ClassId(0),
            void: ClassId(0),
        };

        // The root has no superclass, so it is registered before
        // `declare_class` would default one.
        let object = store.insert_class("java.lang.Object", ClassKind::Class);
        store.object = object;
        store.void = store.insert_class("void", ClassKind::Void);
        for name in PRIMITIVES {
            store.insert_class(name, ClassKind::Primitive);
        }
        store
    }

    fn insert_class(&self, name: &str, kind: ClassKind) -> ClassId {
        let id = ClassId(self.next_class.fetch_add(1, Ordering::SeqCst));
        let (package, simple) = split_binary_name(name);
        let name_atom = self.interner.intern(name);
        let mut info = ClassInfo::new(
            name_atom,
            self.interner.intern(simple),
            self.interner.intern(package),
            kind,
        );
        if matches!(kind, ClassKind::Primitive | ClassKind::Void) {
            info.modifiers = Modifiers::PUBLIC | Modifiers::FINAL | Modifiers::ABSTRACT;
        }
        trace!(
            instance_id = self.instance_id,
            class_id = id.0,
            name,
            kind = ?kind,
            "DeclarationStore::insert_class"
        );
        self.classes.insert(id, Arc::new(info));
        self.by_name.insert(name_atom, id);
        id
    }

    // =========================================================================
    // Seeded classes
    // =========================================================================

    pub fn object(&self) -> ClassId {
        self.object
    }

    pub fn void(&self) -> ClassId {
        self.void
    }

    /// Primitive class by keyword (`int`, `boolean`, ...).
    pub fn primitive(&self, name: &str) -> Option<ClassId> {
        self.class_named(name)
            .filter(|id| self.class(*id).is_some_and(|info| info.is_primitive()))
    }

    pub fn class_named(&self, name: &str) -> Option<ClassId> {
        let atom = self.interner.lookup(name)?;
        self.by_name.get(&atom).map(|r| *r)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Declare a top-level class. Classes and enums extend the root class;
    /// interfaces and annotations have no superclass.
    pub fn declare_class(&self, name: &str, kind: ClassKind) -> ClassId {
        let id = self.insert_class(name, kind);
        self.update_class(id, |info| {
            match kind {
                ClassKind::Class | ClassKind::Enum => {
                    info.superclass = Some(AnnotatedType::from(self.object));
                }
                ClassKind::Interface | ClassKind::Annotation => {
                    info.modifiers |= Modifiers::ABSTRACT;
                }
                _ => {}
            }
        });
        id
    }

    /// Declare a member class of `outer`. Interfaces, enums and annotations
    /// are implicitly static.
    pub fn declare_member_class(
        &self,
        outer: ClassId,
        simple_name: &str,
        kind: ClassKind,
        modifiers: Modifiers,
    ) -> ClassId {
        let outer_name = self
            .classes
            .get(&outer)
            .map(|info| self.interner.resolve(info.name))
            .unwrap_or_else(|| Arc::from(""));
        let id = self.declare_class(&format!("{outer_name}${simple_name}"), kind);
        let implicit_static = !matches!(kind, ClassKind::Class);
        self.update_class(id, |info| {
            info.modifiers = modifiers | (info.modifiers & Modifiers::ABSTRACT);
            if implicit_static {
                info.modifiers |= Modifiers::STATIC;
            }
            info.enclosing_class = Some(outer);
        });
        self.update_class(outer, |info| info.member_classes.push(id));
        id
    }

    /// Declare a local class inside `method`'s body.
    pub fn declare_local_class(&self, method: MethodId, simple_name: &str) -> ClassId {
        let owner = self.method(method).map(|m| m.declaring_class);
        let outer_name = owner
            .and_then(|c| self.class(c))
            .map(|info| self.interner.resolve(info.name))
            .unwrap_or_else(|| Arc::from(""));
        let id = self.declare_class(&format!("{outer_name}$1{simple_name}"), ClassKind::Class);
        self.update_class(id, |info| {
            info.simple_name = self.interner.intern(simple_name);
            info.enclosing_class = owner;
            info.enclosing_executable = Some(method);
            info.modifiers = Modifiers::empty();
        });
        id
    }

    /// Apply `f` to a class declaration. Unknown ids are ignored.
    pub fn update_class(&self, id: ClassId, f: impl FnOnce(&mut ClassInfo)) {
        if let Some(mut entry) = self.classes.get_mut(&id) {
            f(Arc::make_mut(&mut entry));
        }
    }

    pub fn set_modifiers(&self, id: ClassId, modifiers: Modifiers) {
        self.update_class(id, |info| info.modifiers = modifiers);
    }

    pub fn set_superclass(&self, id: ClassId, superclass: Option<AnnotatedType>) {
        self.update_class(id, |info| info.superclass = superclass);
    }

    pub fn add_interface(&self, id: ClassId, interface: impl Into<AnnotatedType>) {
        let interface = interface.into();
        self.update_class(id, |info| info.interfaces.push(interface));
    }

    // =========================================================================
    // Type variables
    // =========================================================================

    /// Declare type parameters on a class or executable, bounded by the root
    /// class until [`set_bounds`](Self::set_bounds) says otherwise.
    pub fn declare_type_parameters(
        &self,
        owner: GenericDeclaration,
        names: &[&str],
    ) -> Vec<TypeVarId> {
        let ids: Vec<TypeVarId> = names
            .iter()
            .map(|name| {
                let id = TypeVarId(self.next_type_var.fetch_add(1, Ordering::SeqCst));
                self.type_vars.insert(
                    id,
                    Arc::new(TypeVarInfo {
                        name: self.interner.intern(name),
                        owner,
                        bounds: vec![AnnotatedType::from(self.object)],
                    }),
                );
                id
            })
            .collect();

        match owner {
            GenericDeclaration::Class(class) => {
                self.update_class(class, |info| info.type_parameters.extend(&ids));
            }
            GenericDeclaration::Executable(method) => {
                self.update_method(method, |info| info.type_parameters.extend(&ids));
            }
        }
        ids
    }

    pub fn set_bounds(&self, id: TypeVarId, bounds: Vec<AnnotatedType>) {
        if let Some(mut entry) = self.type_vars.get_mut(&id) {
            Arc::make_mut(&mut entry).bounds = bounds;
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub fn declare_field(
        &self,
        owner: ClassId,
        name: &str,
        ty: impl Into<AnnotatedType>,
        modifiers: Modifiers,
    ) -> FieldId {
        let id = FieldId(self.next_field.fetch_add(1, Ordering::SeqCst));
        self.fields.insert(
            id,
            Arc::new(FieldInfo {
                name: self.interner.intern(name),
                declaring_class: owner,
                modifiers,
                ty: ty.into(),
            }),
        );
        self.update_class(owner, |info| info.fields.push(id));
        id
    }

    /// Declare a method. Methods of interfaces are public, and abstract
    /// unless they are default or static.
    pub fn declare_method(
        &self,
        owner: ClassId,
        name: &str,
        modifiers: Modifiers,
        parameters: Vec<AnnotatedType>,
        return_type: impl Into<AnnotatedType>,
    ) -> MethodId {
        let in_interface = self.class(owner).is_some_and(|info| info.is_interface());
        let mut modifiers = modifiers;
        if in_interface {
            modifiers |= Modifiers::PUBLIC;
            if !modifiers.intersects(Modifiers::DEFAULT | Modifiers::STATIC | Modifiers::PRIVATE)
            {
                modifiers |= Modifiers::ABSTRACT;
            }
        }
        let id = self.insert_executable(MethodInfo {
            name: self.interner.intern(name),
            declaring_class: owner,
            kind: ExecutableKind::Method,
            modifiers,
            type_parameters: Vec::new(),
            parameters,
            parameter_details: Vec::new(),
            return_type: return_type.into(),
            exceptions: Vec::new(),
        });
        self.update_class(owner, |info| info.methods.push(id));
        id
    }

    pub fn declare_constructor(
        &self,
        owner: ClassId,
        modifiers: Modifiers,
        parameters: Vec<AnnotatedType>,
    ) -> MethodId {
        let id = self.insert_executable(MethodInfo {
            name: self.interner.intern("<init>"),
            declaring_class: owner,
            kind: ExecutableKind::Constructor,
            modifiers,
            type_parameters: Vec::new(),
            parameters,
            parameter_details: Vec::new(),
            return_type: AnnotatedType::plain(HostType::Void),
            exceptions: Vec::new(),
        });
        self.update_class(owner, |info| info.constructors.push(id));
        id
    }

    fn insert_executable(&self, info: MethodInfo) -> MethodId {
        let id = MethodId(self.next_method.fetch_add(1, Ordering::SeqCst));
        trace!(
            instance_id = self.instance_id,
            method_id = id.0,
            kind = ?info.kind,
            "DeclarationStore::insert_executable"
        );
        self.methods.insert(id, Arc::new(info));
        id
    }

    /// Apply `f` to a method or constructor declaration.
    pub fn update_method(&self, id: MethodId, f: impl FnOnce(&mut MethodInfo)) {
        if let Some(mut entry) = self.methods.get_mut(&id) {
            f(Arc::make_mut(&mut entry));
        }
    }

    /// Record the names of a method's parameters, in order.
    pub fn name_parameters(&self, method: MethodId, names: &[&str]) {
        for (index, name) in names.iter().enumerate() {
            let name = self.interner.intern(name);
            self.update_parameter(method, index, |parameter| parameter.name = Some(name));
        }
    }

    /// Replace the declaration details of one parameter.
    pub fn set_parameter(&self, method: MethodId, index: usize, parameter: ParameterInfo) {
        self.update_parameter(method, index, |slot| *slot = parameter);
    }

    fn update_parameter(&self, method: MethodId, index: usize, f: impl FnOnce(&mut ParameterInfo)) {
        self.update_method(method, |info| {
            if index >= info.parameters.len() {
                return;
            }
            if info.parameter_details.len() <= index {
                info.parameter_details.resize_with(index + 1, ParameterInfo::default);
            }
            f(&mut info.parameter_details[index]);
        });
    }

    /// Number of declared classes, including seeded and array classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl DeclarationProvider for DeclarationStore {
    fn class(&self, id: ClassId) -> Option<Arc<ClassInfo>> {
        self.classes.get(&id).map(|r| r.clone())
    }

    fn type_var(&self, id: TypeVarId) -> Option<Arc<TypeVarInfo>> {
        self.type_vars.get(&id).map(|r| r.clone())
    }

    fn method(&self, id: MethodId) -> Option<Arc<MethodInfo>> {
        self.methods.get(&id).map(|r| r.clone())
    }

    fn field(&self, id: FieldId) -> Option<Arc<FieldInfo>> {
        self.fields.get(&id).map(|r| r.clone())
    }

    fn object_class(&self) -> ClassId {
        self.object
    }

    fn void_class(&self) -> ClassId {
        self.void
    }

    fn array_class_of(&self, component: ClassId) -> Option<ClassId> {
        if let Some(existing) = self.array_classes.get(&component) {
            return Some(*existing);
        }
        let component_info = self.class(component)?;
        if matches!(component_info.kind, ClassKind::Void) {
            return None;
        }
        let name = format!("{}[]", self.interner.resolve(component_info.name));
        let id = *self
            .array_classes
            .entry(component)
            .or_insert_with(|| self.insert_class(&name, ClassKind::Array { component }));
        self.update_class(id, |info| {
            info.superclass = Some(AnnotatedType::from(self.object));
            info.package = component_info.package;
        });
        Some(id)
    }

    fn interner(&self) -> &ShardedInterner {
        &self.interner
    }
}

/// Split `pkg.Outer$Inner` into (`pkg`, `Inner`).
fn split_binary_name(name: &str) -> (&str, &str) {
    let (package, rest) = match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => ("", name),
    };
    let simple = rest.rsplit('$').next().unwrap_or(rest);
    (package, simple)
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
