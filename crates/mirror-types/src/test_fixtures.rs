//! A small `java.lang` / `java.util` declaration set shared by the unit tests.

use crate::handle::{AnnotatedType, ClassId, FieldId, HostType, MethodId, TypeVarId};
use crate::metadata::{ClassKind, GenericDeclaration, Modifiers};
use crate::store::DeclarationStore;
use crate::types::TypeId;
use crate::MirrorCache;
use std::sync::Arc;

pub(crate) struct Jdk {
    pub store: Arc<DeclarationStore>,
    pub object: ClassId,
    pub int: ClassId,
    pub string: ClassId,
    pub char_sequence: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub comparable: ClassId,
    pub comparable_t: TypeVarId,
    pub iterator: ClassId,
    pub iterator_e: TypeVarId,
    pub iterable: ClassId,
    pub iterable_t: TypeVarId,
    pub collection: ClassId,
    pub collection_e: TypeVarId,
    pub list: ClassId,
    pub list_e: TypeVarId,
    pub array_list: ClassId,
    pub array_list_e: TypeVarId,
    pub target_annotation: ClassId,

    pub object_to_string: MethodId,
    pub object_hash_code: MethodId,
    pub object_clone: MethodId,
    pub comparable_compare_to: MethodId,
    pub iterable_iterator: MethodId,
    pub collection_size: MethodId,
    pub collection_add: MethodId,
    pub collection_iterator: MethodId,
    pub list_get: MethodId,
    pub array_list_get: MethodId,
    pub array_list_size: MethodId,
    pub array_list_add: MethodId,
    pub array_list_iterator: MethodId,
    pub array_list_grow: MethodId,
    pub array_list_new: MethodId,
    pub array_list_new_capacity: MethodId,
    pub array_list_size_field: FieldId,
    pub integer_max_value: FieldId,
}

fn var(id: TypeVarId) -> HostType {
    HostType::Variable(id)
}

fn generic(raw: ClassId, arguments: Vec<HostType>) -> AnnotatedType {
    HostType::parameterized(raw, arguments).into()
}

impl Jdk {
    pub fn new() -> Self {
        let store = Arc::new(DeclarationStore::new());
        let s = &*store;
        let object = s.object();
        let int = s.primitive("int").unwrap();
        let boolean = s.primitive("boolean").unwrap();

        let char_sequence = s.declare_class("java.lang.CharSequence", ClassKind::Interface);
        let comparable = s.declare_class("java.lang.Comparable", ClassKind::Interface);
        let comparable_t =
            s.declare_type_parameters(GenericDeclaration::Class(comparable), &["T"])[0];
        let string = s.declare_class("java.lang.String", ClassKind::Class);
        s.set_modifiers(string, Modifiers::PUBLIC | Modifiers::FINAL);
        s.add_interface(string, generic(comparable, vec![string.into()]));
        s.add_interface(string, char_sequence);

        let number = s.declare_class("java.lang.Number", ClassKind::Class);
        s.set_modifiers(number, Modifiers::PUBLIC | Modifiers::ABSTRACT);
        let integer = s.declare_class("java.lang.Integer", ClassKind::Class);
        s.set_modifiers(integer, Modifiers::PUBLIC | Modifiers::FINAL);
        s.set_superclass(integer, Some(number.into()));
        s.add_interface(integer, generic(comparable, vec![integer.into()]));
        let integer_max_value = s.declare_field(
            integer,
            "MAX_VALUE",
            int,
            Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
        );

        let object_to_string =
            s.declare_method(object, "toString", Modifiers::PUBLIC, vec![], string);
        let object_hash_code = s.declare_method(object, "hashCode", Modifiers::PUBLIC, vec![], int);
        let object_clone = s.declare_method(object, "clone", Modifiers::PROTECTED, vec![], object);
        let comparable_compare_to = s.declare_method(
            comparable,
            "compareTo",
            Modifiers::empty(),
            vec![comparable_t.into()],
            int,
        );

        let iterator = s.declare_class("java.util.Iterator", ClassKind::Interface);
        let iterator_e = s.declare_type_parameters(GenericDeclaration::Class(iterator), &["E"])[0];
        s.declare_method(iterator, "next", Modifiers::empty(), vec![], iterator_e);

        let iterable = s.declare_class("java.lang.Iterable", ClassKind::Interface);
        let iterable_t = s.declare_type_parameters(GenericDeclaration::Class(iterable), &["T"])[0];
        let iterable_iterator = s.declare_method(
            iterable,
            "iterator",
            Modifiers::empty(),
            vec![],
            generic(iterator, vec![var(iterable_t)]),
        );

        let collection = s.declare_class("java.util.Collection", ClassKind::Interface);
        let collection_e =
            s.declare_type_parameters(GenericDeclaration::Class(collection), &["E"])[0];
        s.add_interface(collection, generic(iterable, vec![var(collection_e)]));
        let collection_size = s.declare_method(collection, "size", Modifiers::empty(), vec![], int);
        let collection_add = s.declare_method(
            collection,
            "add",
            Modifiers::empty(),
            vec![collection_e.into()],
            boolean,
        );
        let collection_iterator = s.declare_method(
            collection,
            "iterator",
            Modifiers::empty(),
            vec![],
            generic(iterator, vec![var(collection_e)]),
        );

        let list = s.declare_class("java.util.List", ClassKind::Interface);
        let list_e = s.declare_type_parameters(GenericDeclaration::Class(list), &["E"])[0];
        s.add_interface(list, generic(collection, vec![var(list_e)]));
        let list_get = s.declare_method(list, "get", Modifiers::empty(), vec![int.into()], list_e);

        let array_list = s.declare_class("java.util.ArrayList", ClassKind::Class);
        let array_list_e =
            s.declare_type_parameters(GenericDeclaration::Class(array_list), &["E"])[0];
        s.add_interface(array_list, generic(list, vec![var(array_list_e)]));
        let array_list_size_field = s.declare_field(array_list, "size", int, Modifiers::PRIVATE);
        let array_list_new = s.declare_constructor(array_list, Modifiers::PUBLIC, vec![]);
        let array_list_new_capacity =
            s.declare_constructor(array_list, Modifiers::PUBLIC, vec![int.into()]);
        let array_list_get =
            s.declare_method(array_list, "get", Modifiers::PUBLIC, vec![int.into()], array_list_e);
        let array_list_size = s.declare_method(array_list, "size", Modifiers::PUBLIC, vec![], int);
        let array_list_add = s.declare_method(
            array_list,
            "add",
            Modifiers::PUBLIC,
            vec![array_list_e.into()],
            boolean,
        );
        let array_list_iterator = s.declare_method(
            array_list,
            "iterator",
            Modifiers::PUBLIC,
            vec![],
            generic(iterator, vec![var(array_list_e)]),
        );
        let array_list_grow = s.declare_method(
            array_list,
            "grow",
            Modifiers::PRIVATE,
            vec![int.into()],
            HostType::Void,
        );

        let target_annotation = s.declare_class("demo.NonNull", ClassKind::Annotation);

        Jdk {
            store,
            object,
            int,
            string,
            char_sequence,
            number,
            integer,
            comparable,
            comparable_t,
            iterator,
            iterator_e,
            iterable,
            iterable_t,
            collection,
            collection_e,
            list,
            list_e,
            array_list,
            array_list_e,
            target_annotation,
            object_to_string,
            object_hash_code,
            object_clone,
            comparable_compare_to,
            iterable_iterator,
            collection_size,
            collection_add,
            collection_iterator,
            list_get,
            array_list_get,
            array_list_size,
            array_list_add,
            array_list_iterator,
            array_list_grow,
            array_list_new,
            array_list_new_capacity,
            array_list_size_field,
            integer_max_value,
        }
    }

    pub fn cache(&self) -> MirrorCache {
        MirrorCache::new(self.store.clone())
    }

    /// Raw descriptor of `class`.
    pub fn ty(&self, cache: &MirrorCache, class: ClassId) -> TypeId {
        cache.reflect_class(class).unwrap()
    }

    /// `raw<arguments>`.
    pub fn generic(&self, cache: &MirrorCache, raw: ClassId, arguments: &[TypeId]) -> TypeId {
        let raw = self.ty(cache, raw);
        cache.with_type_arguments(raw, arguments).unwrap()
    }

    pub fn variable(&self, cache: &MirrorCache, var: TypeVarId) -> TypeId {
        cache.reflect(&HostType::Variable(var)).unwrap()
    }

    pub fn name(&self, cache: &MirrorCache, text: &str) -> mirror_common::Atom {
        cache.interner().intern(text)
    }
}

/// `demo.Outer<T>` with a non-static `Inner` declaring `T x`, a static
/// `Nested`, and a local class `Local` inside `Outer.make()`.
pub(crate) struct OuterFixture {
    pub outer: ClassId,
    pub outer_t: TypeVarId,
    pub inner: ClassId,
    pub inner_x: FieldId,
    pub nested: ClassId,
    pub make: MethodId,
    pub local: ClassId,
}

impl OuterFixture {
    pub fn declare(jdk: &Jdk) -> Self {
        let s = &*jdk.store;
        let outer = s.declare_class("demo.Outer", ClassKind::Class);
        let outer_t = s.declare_type_parameters(GenericDeclaration::Class(outer), &["T"])[0];
        let inner = s.declare_member_class(outer, "Inner", ClassKind::Class, Modifiers::PUBLIC);
        let inner_x = s.declare_field(inner, "x", outer_t, Modifiers::PUBLIC);
        let nested = s.declare_member_class(
            outer,
            "Nested",
            ClassKind::Class,
            Modifiers::PUBLIC | Modifiers::STATIC,
        );
        let make = s.declare_method(outer, "make", Modifiers::PUBLIC, vec![], jdk.object);
        let local = s.declare_local_class(make, "Local");
        OuterFixture {
            outer,
            outer_t,
            inner,
            inner_x,
            nested,
            make,
            local,
        }
    }
}

/// `demo.Node<T extends Node<T>>` with a field `T next` and a field
/// `Node<T> self`.
pub(crate) struct NodeFixture {
    pub node: ClassId,
    pub node_t: TypeVarId,
}

impl NodeFixture {
    pub fn declare(jdk: &Jdk) -> Self {
        let s = &*jdk.store;
        let node = s.declare_class("demo.Node", ClassKind::Class);
        let node_t = s.declare_type_parameters(GenericDeclaration::Class(node), &["T"])[0];
        s.set_bounds(node_t, vec![generic(node, vec![var(node_t)])]);
        s.declare_field(node, "next", node_t, Modifiers::PUBLIC);
        s.declare_field(node, "self", generic(node, vec![var(node_t)]), Modifiers::PUBLIC);
        NodeFixture { node, node_t }
    }
}
