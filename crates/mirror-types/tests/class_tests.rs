use super::*;
use crate::handle::{Annotation, TypeVarId};
use crate::metadata::{ClassKind, GenericDeclaration, Modifiers};
use crate::test_fixtures::{Jdk, OuterFixture};

/// `demo.Pair<A, B>` and `demo.StringPair<B> extends Pair<String, B>`.
struct Pairs {
    pair: ClassId,
    pair_params: Vec<TypeVarId>,
    string_pair: ClassId,
    string_pair_b: TypeVarId,
}

fn declare_pairs(jdk: &Jdk) -> Pairs {
    let s = &*jdk.store;
    let pair = s.declare_class("demo.Pair", ClassKind::Class);
    let pair_params = s.declare_type_parameters(GenericDeclaration::Class(pair), &["A", "B"]);
    let string_pair = s.declare_class("demo.StringPair", ClassKind::Class);
    let string_pair_b =
        s.declare_type_parameters(GenericDeclaration::Class(string_pair), &["B"])[0];
    s.set_superclass(
        string_pair,
        Some(
            HostType::parameterized(
                pair,
                vec![HostType::Class(jdk.string), HostType::Variable(string_pair_b)],
            )
            .into(),
        ),
    );
    Pairs {
        pair,
        pair_params,
        string_pair,
        string_pair_b,
    }
}

#[test]
fn test_type_arguments_replace_parameters() {
    let jdk = Jdk::new();
    let pairs = declare_pairs(&jdk);
    let cache = jdk.cache();
    let pair = jdk.ty(&cache, pairs.pair);
    let a = jdk.variable(&cache, pairs.pair_params[0]);
    let b = jdk.variable(&cache, pairs.pair_params[1]);
    assert_eq!(&*cache.type_parameters(pair).unwrap(), &[a, b]);
    assert_eq!(cache.type_arguments(pair).unwrap(), None);

    let string = jdk.ty(&cache, jdk.string);
    let integer = jdk.ty(&cache, jdk.integer);
    let specialized = cache.with_type_arguments(pair, &[string, integer]).unwrap();
    assert_ne!(specialized, pair);
    assert_eq!(&*cache.type_parameters(specialized).unwrap(), &[string, integer]);
    assert_eq!(cache.raw(specialized).unwrap(), pair);
    assert_eq!(cache.class_id(specialized).unwrap(), pairs.pair);
    assert_eq!(
        cache.with_type_arguments(pair, &[string, integer]).unwrap(),
        specialized
    );

    // Clearing the arguments and restating the parameters both give the raw class.
    assert_eq!(cache.with_type_arguments(specialized, &[]).unwrap(), pair);
    assert_eq!(cache.with_type_arguments(pair, &[a, b]).unwrap(), pair);
}

#[test]
fn test_type_argument_count_must_match() {
    let jdk = Jdk::new();
    let pairs = declare_pairs(&jdk);
    let cache = jdk.cache();
    let pair = jdk.ty(&cache, pairs.pair);
    let string = jdk.ty(&cache, jdk.string);
    let err = cache.with_type_arguments(pair, &[string]).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidSpecialization { .. }));
    assert!(err.to_string().contains("2 type parameter(s) but 1 argument(s)"));

    let object = jdk.ty(&cache, jdk.object);
    assert!(cache.with_type_arguments(object, &[string]).is_err());
}

#[test]
fn test_primitive_and_void_arguments_are_rejected() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let list = jdk.ty(&cache, jdk.list);
    let int = jdk.ty(&cache, jdk.int);
    let void = cache.reflect(&HostType::Void).unwrap();
    assert!(matches!(
        cache.with_type_arguments(list, &[int]),
        Err(MirrorError::InvalidSpecialization { .. })
    ));
    assert!(matches!(
        cache.with_type_arguments(list, &[void]),
        Err(MirrorError::InvalidSpecialization { .. })
    ));
}

#[test]
fn test_with_type_arguments_requires_class() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let e = jdk.variable(&cache, jdk.list_e);
    let err = cache.with_type_arguments(e, &[]).unwrap_err();
    assert_eq!(
        err,
        MirrorError::WrongKind {
            expected: "class",
            found: "E".into(),
        }
    );
}

#[test]
fn test_superclass_is_resolved_through_arguments() {
    let jdk = Jdk::new();
    let pairs = declare_pairs(&jdk);
    let cache = jdk.cache();
    let string = jdk.ty(&cache, jdk.string);
    let string_pair = jdk.ty(&cache, pairs.string_pair);
    let b = jdk.variable(&cache, pairs.string_pair_b);

    let superclass = cache.superclass(string_pair).unwrap().unwrap();
    assert_eq!(cache.raw(superclass).unwrap(), jdk.ty(&cache, pairs.pair));
    assert_eq!(cache.type_arguments(superclass).unwrap().unwrap().to_vec(), vec![string, b]);

    let integer = jdk.ty(&cache, jdk.integer);
    let of_integer = cache.with_type_arguments(string_pair, &[integer]).unwrap();
    let superclass = cache.superclass(of_integer).unwrap().unwrap();
    assert_eq!(&*cache.type_parameters(superclass).unwrap(), &[string, integer]);
}

#[test]
fn test_root_and_interfaces_have_no_superclass() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let object = jdk.ty(&cache, jdk.object);
    let list = jdk.ty(&cache, jdk.list);
    assert_eq!(cache.superclass(object).unwrap(), None);
    assert_eq!(cache.superclass(list).unwrap(), None);
    let array_list = jdk.ty(&cache, jdk.array_list);
    assert_eq!(cache.superclass(array_list).unwrap(), Some(object));
}

#[test]
fn test_interfaces_in_declaration_order() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let string = jdk.ty(&cache, jdk.string);
    let interfaces = cache.interfaces(string).unwrap();
    assert_eq!(
        interfaces.to_vec(),
        vec![
            jdk.generic(&cache, jdk.comparable, &[string]),
            jdk.ty(&cache, jdk.char_sequence),
        ]
    );

    let strings = jdk.generic(&cache, jdk.array_list, &[string]);
    assert_eq!(
        cache.interfaces(strings).unwrap().to_vec(),
        vec![jdk.generic(&cache, jdk.list, &[string])]
    );
    assert!(cache.interfaces(jdk.ty(&cache, jdk.object)).unwrap().is_empty());
}

#[test]
fn test_non_class_descriptors_have_no_class_structure() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let e = jdk.variable(&cache, jdk.list_e);
    assert!(cache.type_parameters(e).unwrap().is_empty());
    assert_eq!(cache.superclass(e).unwrap(), None);
    assert!(cache.interfaces(e).unwrap().is_empty());
    assert_eq!(cache.enclosing_class(e).unwrap(), None);
    assert!(cache.generic_mapping(e).unwrap().is_empty());
    assert!(matches!(
        cache.class_declaration(e),
        Err(MirrorError::WrongKind { .. })
    ));
}

#[test]
fn test_enclosing_class_specialization() {
    let jdk = Jdk::new();
    let outer = OuterFixture::declare(&jdk);
    let cache = jdk.cache();
    let string = jdk.ty(&cache, jdk.string);
    let outer_raw = jdk.ty(&cache, outer.outer);
    let outer_string = jdk.generic(&cache, outer.outer, &[string]);
    let inner = jdk.ty(&cache, outer.inner);
    assert_eq!(cache.enclosing_class(inner).unwrap(), Some(outer_raw));

    let specialized = cache.with_enclosing_class(inner, Some(outer_string)).unwrap();
    assert_ne!(specialized, inner);
    assert_eq!(cache.enclosing_class(specialized).unwrap(), Some(outer_string));
    assert_eq!(cache.explicit_enclosing_class(specialized).unwrap(), Some(outer_string));
    assert_eq!(cache.raw(specialized).unwrap(), inner);

    let t = jdk.variable(&cache, outer.outer_t);
    let mapping = cache.generic_mapping(specialized).unwrap();
    assert_eq!(mapping.lookup(t), Some(string));

    // Restating the raw enclosing class is not a specialization.
    assert_eq!(cache.with_enclosing_class(inner, Some(outer_raw)).unwrap(), inner);
    assert_eq!(cache.with_enclosing_class(specialized, None).unwrap(), inner);
}

#[test]
fn test_enclosing_class_must_specialize_the_declared_one() {
    let jdk = Jdk::new();
    let outer = OuterFixture::declare(&jdk);
    let cache = jdk.cache();
    let string = jdk.ty(&cache, jdk.string);
    let inner = jdk.ty(&cache, outer.inner);
    let err = cache.with_enclosing_class(inner, Some(string)).unwrap_err();
    assert!(matches!(err, MirrorError::InvalidSpecialization { .. }));

    let top_level = jdk.ty(&cache, jdk.array_list);
    let outer_raw = jdk.ty(&cache, outer.outer);
    assert!(cache.with_enclosing_class(top_level, Some(outer_raw)).is_err());
}

#[test]
fn test_static_member_class_rejects_specialized_outer() {
    let jdk = Jdk::new();
    let outer = OuterFixture::declare(&jdk);
    let cache = jdk.cache();
    let nested = jdk.ty(&cache, outer.nested);
    let outer_raw = jdk.ty(&cache, outer.outer);
    let outer_string = jdk.generic(&cache, outer.outer, &[jdk.ty(&cache, jdk.string)]);
    assert!(matches!(
        cache.with_enclosing_class(nested, Some(outer_string)),
        Err(MirrorError::InvalidSpecialization { .. })
    ));
    assert_eq!(cache.with_enclosing_class(nested, Some(outer_raw)).unwrap(), nested);

    let annotated_outer = cache
        .with_type_annotations(outer_raw, vec![Annotation::marker(jdk.target_annotation)])
        .unwrap();
    assert_eq!(cache.with_enclosing_class(nested, Some(annotated_outer)).unwrap(), nested);
}

#[test]
fn test_enclosing_class_annotations_do_not_split_identity() {
    let jdk = Jdk::new();
    let outer = OuterFixture::declare(&jdk);
    let cache = jdk.cache();
    let inner = jdk.ty(&cache, outer.inner);
    let outer_string = jdk.generic(&cache, outer.outer, &[jdk.ty(&cache, jdk.string)]);
    let annotated_outer = cache
        .with_type_annotations(outer_string, vec![Annotation::marker(jdk.target_annotation)])
        .unwrap();

    let plain = cache.with_enclosing_class(inner, Some(outer_string)).unwrap();
    let annotated = cache.with_enclosing_class(inner, Some(annotated_outer)).unwrap();
    assert_eq!(plain, annotated);
    assert_eq!(cache.enclosing_class(annotated).unwrap(), Some(outer_string));
}

#[test]
fn test_local_class_enclosing_executable() {
    let jdk = Jdk::new();
    let outer = OuterFixture::declare(&jdk);
    let cache = jdk.cache();
    let local = jdk.ty(&cache, outer.local);
    let make = cache.reflect_executable(outer.make).unwrap();
    assert_eq!(cache.enclosing_executable(local).unwrap(), Some(make));
    assert_eq!(cache.enclosing_class(local).unwrap(), Some(jdk.ty(&cache, outer.outer)));

    let outer_string = jdk.generic(&cache, outer.outer, &[jdk.ty(&cache, jdk.string)]);
    let specialized_make = cache
        .executable_with_declaring_class(make, Some(outer_string))
        .unwrap();
    let specialized = cache
        .with_enclosing_executable(local, Some(specialized_make))
        .unwrap();
    assert_eq!(cache.enclosing_executable(specialized).unwrap(), Some(specialized_make));
    assert_eq!(cache.raw(specialized).unwrap(), local);

    // The enclosing class scope is consulted before the executable's.
    let t = jdk.variable(&cache, outer.outer_t);
    assert_eq!(cache.generic_mapping(specialized).unwrap().lookup(t), Some(t));
    let specialized = cache
        .with_enclosing_class(specialized, Some(outer_string))
        .unwrap();
    assert_eq!(cache.enclosing_executable(specialized).unwrap(), Some(specialized_make));
    assert_eq!(
        cache.generic_mapping(specialized).unwrap().lookup(t),
        Some(jdk.ty(&cache, jdk.string))
    );

    let unrelated = cache.reflect_executable(jdk.list_get).unwrap();
    assert!(matches!(
        cache.with_enclosing_executable(local, Some(unrelated)),
        Err(MirrorError::InvalidSpecialization { .. })
    ));
}

#[test]
fn test_class_declaration_snapshot() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let strings = jdk.generic(&cache, jdk.list, &[jdk.ty(&cache, jdk.string)]);
    let info = cache.class_declaration(strings).unwrap();
    assert_eq!(&*cache.interner().resolve(info.name), "java.util.List");
    assert!(info.is_interface());
    assert!(info.modifiers.contains(Modifiers::ABSTRACT));
}

#[test]
fn test_generic_mapping_is_memoized() {
    let jdk = Jdk::new();
    let cache = jdk.cache();
    let strings = jdk.generic(&cache, jdk.array_list, &[jdk.ty(&cache, jdk.string)]);
    let first = cache.generic_mapping(strings).unwrap();
    let second = cache.generic_mapping(strings).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 1);
}
