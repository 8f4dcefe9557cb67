use super::*;
use crate::handle::{Annotation, HostType};
use crate::metadata::{ClassKind, GenericDeclaration};
use crate::recursion::RecursionProfile;
use crate::test_fixtures::{Jdk, NodeFixture, OuterFixture};

fn wildcard(cache: &MirrorCache, handle: HostType) -> TypeId {
    cache.reflect(&handle).unwrap()
}

#[test]
fn test_reflexive_and_top() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let object = jdk.ty(&cache, jdk.object);
    let string = jdk.ty(&cache, jdk.string);
    let int = jdk.ty(&cache, jdk.int);
    let void = cache.reflect(&HostType::Void).unwrap();
    let e = jdk.variable(&cache, jdk.list_e);
    let int_array = cache.array_of(int).unwrap();

    assert!(cache.is_assignable_from(string, string).unwrap());
    assert!(cache.is_assignable_from(object, string).unwrap());
    assert!(cache.is_assignable_from(object, e).unwrap());
    assert!(cache.is_assignable_from(object, int_array).unwrap());
    assert!(!cache.is_assignable_from(object, int).unwrap());
    assert!(!cache.is_assignable_from(object, void).unwrap());
    assert!(!cache.is_assignable_from(string, object).unwrap());
}

#[test]
fn test_class_hierarchy() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let number = jdk.ty(&cache, jdk.number);
    let integer = jdk.ty(&cache, jdk.integer);
    let string = jdk.ty(&cache, jdk.string);
    assert!(cache.is_assignable_from(number, integer).unwrap());
    assert!(!cache.is_assignable_from(integer, number).unwrap());
    assert!(!cache.is_assignable_from(number, string).unwrap());

    let char_sequence = jdk.ty(&cache, jdk.char_sequence);
    assert!(cache.is_assignable_from(char_sequence, string).unwrap());
    let comparable_string = jdk.generic(&cache, jdk.comparable, &[string]);
    let comparable_integer = jdk.generic(&cache, jdk.comparable, &[integer]);
    assert!(cache.is_assignable_from(comparable_string, string).unwrap());
    assert!(!cache.is_assignable_from(comparable_integer, string).unwrap());
    let comparable = jdk.ty(&cache, jdk.comparable);
    assert!(cache.is_assignable_from(comparable, string).unwrap());
}

#[test]
fn test_parameterized_types_compare_arguments() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let string = jdk.ty(&cache, jdk.string);
    let integer = jdk.ty(&cache, jdk.integer);
    let number = jdk.ty(&cache, jdk.number);
    let array_list_string = jdk.generic(&cache, jdk.array_list, &[string]);
    let list_string = jdk.generic(&cache, jdk.list, &[string]);
    let list_integer = jdk.generic(&cache, jdk.list, &[integer]);
    let list_number = jdk.generic(&cache, jdk.list, &[number]);
    let iterable_string = jdk.generic(&cache, jdk.iterable, &[string]);

    assert!(cache.is_assignable_from(list_string, array_list_string).unwrap());
    assert!(cache.is_assignable_from(iterable_string, array_list_string).unwrap());
    assert!(!cache.is_assignable_from(list_integer, array_list_string).unwrap());
    // Arguments are compared by assignability, not equality.
    assert!(cache.is_assignable_from(list_number, list_integer).unwrap());
    assert!(!cache.is_assignable_from(list_integer, list_number).unwrap());
    assert!(!cache.is_assignable_from(array_list_string, list_string).unwrap());

    let raw_list = jdk.ty(&cache, jdk.list);
    assert!(cache.is_assignable_from(raw_list, array_list_string).unwrap());
}

#[test]
fn test_extends_wildcard_arguments() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let number = jdk.ty(&cache, jdk.number);
    let integer = jdk.ty(&cache, jdk.integer);
    let object = jdk.ty(&cache, jdk.object);
    let string = jdk.ty(&cache, jdk.string);
    let extends_number = wildcard(&cache, HostType::extends(HostType::Class(jdk.number)));

    assert!(cache.is_assignable_from(extends_number, integer).unwrap());
    assert!(cache.is_assignable_from(extends_number, number).unwrap());
    assert!(!cache.is_assignable_from(extends_number, object).unwrap());

    let list_extends_number = jdk.generic(&cache, jdk.list, &[extends_number]);
    let list_integer = jdk.generic(&cache, jdk.list, &[integer]);
    let list_string = jdk.generic(&cache, jdk.list, &[string]);
    assert!(cache.is_assignable_from(list_extends_number, list_integer).unwrap());
    assert!(!cache.is_assignable_from(list_extends_number, list_string).unwrap());
    assert!(!cache.is_assignable_from(list_integer, list_extends_number).unwrap());
}

#[test]
fn test_super_wildcard_arguments() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let number = jdk.ty(&cache, jdk.number);
    let integer = jdk.ty(&cache, jdk.integer);
    let object = jdk.ty(&cache, jdk.object);
    let super_integer = wildcard(
        &cache,
        HostType::super_of(jdk.object, HostType::Class(jdk.integer)),
    );
    assert!(cache.is_assignable_from(super_integer, number).unwrap());
    assert!(cache.is_assignable_from(super_integer, object).unwrap());
    assert!(cache.is_assignable_from(super_integer, integer).unwrap());
    assert!(!cache.is_assignable_from(super_integer, jdk.ty(&cache, jdk.string)).unwrap());

    let list_super_integer = jdk.generic(&cache, jdk.list, &[super_integer]);
    let list_number = jdk.generic(&cache, jdk.list, &[number]);
    assert!(cache.is_assignable_from(list_super_integer, list_number).unwrap());
}

#[test]
fn test_wildcard_against_wildcard() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let extends_number = wildcard(&cache, HostType::extends(HostType::Class(jdk.number)));
    let extends_integer = wildcard(&cache, HostType::extends(HostType::Class(jdk.integer)));
    assert!(cache.is_assignable_from(extends_number, extends_integer).unwrap());
    assert!(!cache.is_assignable_from(extends_integer, extends_number).unwrap());

    let super_integer = wildcard(
        &cache,
        HostType::super_of(jdk.object, HostType::Class(jdk.integer)),
    );
    let super_number = wildcard(
        &cache,
        HostType::super_of(jdk.object, HostType::Class(jdk.number)),
    );
    assert!(cache.is_assignable_from(super_number, super_integer).unwrap());
    assert!(!cache.is_assignable_from(super_integer, super_number).unwrap());

    // `?` pairs only its upper bound with `? super Integer`.
    let unbounded = wildcard(&cache, HostType::unbounded(jdk.object));
    assert!(cache.is_assignable_from(unbounded, super_integer).unwrap());
    assert!(cache.is_assignable_from(unbounded, extends_integer).unwrap());
    assert!(!cache.is_assignable_from(extends_number, super_integer).unwrap());

    let list_extends_number = jdk.generic(&cache, jdk.list, &[extends_number]);
    let list_extends_integer = jdk.generic(&cache, jdk.list, &[extends_integer]);
    assert!(cache.is_assignable_from(list_extends_number, list_extends_integer).unwrap());
}

#[test]
fn test_variables() {
    let jdk = Jdk::new();
    let node = NodeFixture::declare(&jdk);
    let cache = jdk.cache();
    let t = jdk.variable(&cache, node.node_t);
    let raw_node = jdk.ty(&cache, node.node);
    let e = jdk.variable(&cache, jdk.list_e);
    let string = jdk.ty(&cache, jdk.string);

    assert!(cache.is_assignable_from(t, t).unwrap());
    assert!(cache.is_assignable_from(raw_node, t).unwrap());
    assert!(!cache.is_assignable_from(t, raw_node).unwrap());
    assert!(!cache.is_assignable_from(string, e).unwrap());
    assert!(!cache.is_assignable_from(e, string).unwrap());

    let annotated_t = cache
        .with_type_annotations(t, vec![Annotation::marker(jdk.target_annotation)])
        .unwrap();
    assert!(cache.is_assignable_from(t, annotated_t).unwrap());

    let extends_t = wildcard(&cache, HostType::extends(HostType::Variable(node.node_t)));
    assert!(cache.is_assignable_from(t, extends_t).unwrap());
}

#[test]
fn test_self_referential_subclass() {
    let jdk = Jdk::new();
    let node = NodeFixture::declare(&jdk);
    let s = &*jdk.store;
    let leaf = s.declare_class("demo.Leaf", ClassKind::Class);
    s.set_superclass(
        leaf,
        Some(HostType::parameterized(node.node, vec![HostType::Class(leaf)]).into()),
    );
    let cache = jdk.cache();
    let leaf = jdk.ty(&cache, leaf);
    let node_of_leaf = jdk.generic(&cache, node.node, &[leaf]);
    assert!(cache.is_assignable_from(node_of_leaf, leaf).unwrap());
    assert!(cache.is_assignable_from(jdk.ty(&cache, node.node), leaf).unwrap());
    assert!(!cache.is_assignable_from(leaf, node_of_leaf).unwrap());
}

#[test]
fn test_mutually_bounded_variables_terminate() {
    let jdk = Jdk::new();
    let s = &*jdk.store;
    let class = s.declare_class("demo.Loop", ClassKind::Class);
    let params = s.declare_type_parameters(GenericDeclaration::Class(class), &["A", "B"]);
    s.set_bounds(params[0], vec![params[1].into()]);
    s.set_bounds(params[1], vec![params[0].into()]);
    let cache = jdk.cache();
    let a = jdk.variable(&cache, params[0]);
    let number = jdk.ty(&cache, jdk.number);

    // The cycle is assumed to hold, so the result is not memoized.
    assert!(cache.is_assignable_from(number, a).unwrap());
    assert!(!cache.relations.contains_key(&(number, a)));
    assert_eq!(cache.erasure(a).unwrap(), jdk.object);
}

#[test]
fn test_arrays_are_covariant() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let object = jdk.ty(&cache, jdk.object);
    let string = jdk.ty(&cache, jdk.string);
    let int = jdk.ty(&cache, jdk.int);
    let objects = cache.array_of(object).unwrap();
    let strings = cache.array_of(string).unwrap();
    let ints = cache.array_of(int).unwrap();
    assert!(cache.is_assignable_from(objects, strings).unwrap());
    assert!(!cache.is_assignable_from(strings, objects).unwrap());
    assert!(!cache.is_assignable_from(objects, ints).unwrap());
    assert!(!cache.is_assignable_from(objects, object).unwrap());
    assert!(cache.is_assignable_from(ints, ints).unwrap());
}

#[test]
fn test_void_accepts_only_void() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let void = cache.reflect(&HostType::Void).unwrap();
    let object = jdk.ty(&cache, jdk.object);
    assert!(cache.is_assignable_from(void, void).unwrap());
    assert!(!cache.is_assignable_from(void, object).unwrap());
}

#[test]
fn test_enclosing_class_is_compared() {
    let jdk = Jdk::new();
    let outer = OuterFixture::declare(&jdk);
    let cache = jdk.cache();
    let outer_string = jdk.generic(&cache, outer.outer, &[jdk.ty(&cache, jdk.string)]);
    let outer_integer = jdk.generic(&cache, outer.outer, &[jdk.ty(&cache, jdk.integer)]);
    let inner = jdk.ty(&cache, outer.inner);
    let inner_string = cache.with_enclosing_class(inner, Some(outer_string)).unwrap();
    let inner_integer = cache.with_enclosing_class(inner, Some(outer_integer)).unwrap();

    assert!(cache.is_assignable_from(inner, inner_string).unwrap());
    assert!(!cache.is_assignable_from(inner_string, inner_integer).unwrap());
    assert!(!cache.is_assignable_from(inner_string, inner).unwrap());
}

#[test]
fn test_find_ancestor() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let string = jdk.ty(&cache, jdk.string);
    let strings = jdk.generic(&cache, jdk.array_list, &[string]);

    assert_eq!(cache.find_ancestor(strings, jdk.array_list).unwrap(), Some(strings));
    assert_eq!(
        cache.find_ancestor(strings, jdk.iterable).unwrap(),
        Some(jdk.generic(&cache, jdk.iterable, &[string]))
    );
    assert_eq!(
        cache.find_ancestor(strings, jdk.object).unwrap(),
        Some(jdk.ty(&cache, jdk.object))
    );
    assert_eq!(cache.find_ancestor(strings, jdk.integer).unwrap(), None);
    let e = jdk.variable(&cache, jdk.list_e);
    assert_eq!(cache.find_ancestor(e, jdk.object).unwrap(), None);

    let err = cache.get_ancestor(string, jdk.integer).unwrap_err();
    assert_eq!(
        err.to_string(),
        "java.lang.Integer is not an ancestor of java.lang.String"
    );
}

#[test]
fn test_find_ancestor_prefers_more_specific_path() {
    let jdk = Jdk::new();
    let s = &*jdk.store;
    // Both paths reach Iterable: raw through `Base`, `Iterable<String>`
    // through `List<String>`.
    let base = s.declare_class("demo.RawBase", ClassKind::Class);
    s.add_interface(base, jdk.iterable);
    let derived = s.declare_class("demo.Both", ClassKind::Class);
    s.set_superclass(derived, Some(base.into()));
    s.add_interface(
        derived,
        HostType::parameterized(jdk.list, vec![HostType::Class(jdk.string)]),
    );
    let cache = jdk.cache();
    let derived = jdk.ty(&cache, derived);
    let iterable_string = jdk.generic(&cache, jdk.iterable, &[jdk.ty(&cache, jdk.string)]);
    let raw_iterable = jdk.ty(&cache, jdk.iterable);
    assert!(cache.is_assignable_from(raw_iterable, iterable_string).unwrap());
    assert_eq!(
        cache.compare_specificity(iterable_string, raw_iterable).unwrap(),
        std::cmp::Ordering::Greater
    );
    assert_eq!(cache.find_ancestor(derived, jdk.iterable).unwrap(), Some(iterable_string));
}

#[test]
fn test_results_are_memoized() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let list_string = jdk.generic(&cache, jdk.list, &[jdk.ty(&cache, jdk.string)]);
    let strings = jdk.generic(&cache, jdk.array_list, &[jdk.ty(&cache, jdk.string)]);
    assert!(cache.is_assignable_from(list_string, strings).unwrap());
    assert_eq!(
        cache.relations.get(&(list_string, strings)).map(|r| *r),
        Some(true)
    );
    assert_eq!(
        cache.ancestors.get(&(strings, jdk.list)).map(|r| *r),
        Some(Some(list_string))
    );
}

#[test]
fn test_limit_hits_are_not_memoized() {
    let jdk = Jdk::new();
    let cache = MirrorCache::with_profile(
        jdk.store.clone(),
        RecursionProfile::Custom {
            max_depth: 1,
            max_iterations: 1_000,
        },
    );
    let string = jdk.ty(&cache, jdk.string);
    let list_string = jdk.generic(&cache, jdk.list, &[string]);
    let strings = jdk.generic(&cache, jdk.array_list, &[string]);

    // The Object branch of the search is cut off; the List branch needs none.
    assert!(cache.is_assignable_from(list_string, strings).unwrap());
    assert!(!cache.relations.contains_key(&(list_string, strings)));
    assert!(!cache.ancestors.contains_key(&(strings, jdk.list)));
}
