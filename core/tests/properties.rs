//! Property tests for clone and merge invariants.

use fastextend_core::{MergeOptions, Object, Tree, deep_clone, merge, merge_with_options};
use proptest::collection::vec;
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Tree> {
    prop_oneof![
        Just(Tree::Undefined),
        Just(Tree::Null),
        any::<bool>().prop_map(Tree::Bool),
        (-1.0e9..1.0e9f64).prop_map(Tree::Number),
        "[a-z ]{0,8}".prop_map(Tree::String),
    ]
}

fn any_tree() -> impl Strategy<Value = Tree> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Tree::Array),
            vec(("[a-d]{1,2}", inner), 0..6)
                .prop_map(|entries| Tree::Object(Object::from_iter(entries))),
        ]
    })
}

fn object_root() -> impl Strategy<Value = Tree> {
    vec(("[a-d]{1,2}", any_tree()), 0..6)
        .prop_map(|entries| Tree::Object(Object::from_iter(entries)))
}

fn container_root() -> impl Strategy<Value = Tree> {
    prop_oneof![vec(any_tree(), 0..6).prop_map(Tree::Array), object_root()]
}

proptest! {
    #[test]
    fn clone_equals_original(original in container_root()) {
        let copy = deep_clone(&original).unwrap();
        prop_assert_eq!(copy, original);
    }

    #[test]
    fn merge_leaves_sources_untouched(
        mut target in object_root(),
        first in object_root(),
        second in object_root(),
    ) {
        let first_before = first.clone();
        let second_before = second.clone();

        merge(&mut target, [&first, &second]).unwrap();
        prop_assert_eq!(first, first_before);
        prop_assert_eq!(second, second_before);
    }

    #[test]
    fn merging_a_tree_onto_its_clone_is_identity(original in container_root()) {
        let mut target = deep_clone(&original).unwrap();
        merge(&mut target, [&original]).unwrap();
        prop_assert_eq!(target, original);
    }

    #[test]
    fn last_source_wins_for_scalar_keys(
        mut target in object_root(),
        source in object_root(),
    ) {
        merge(&mut target, [&source]).unwrap();
        let merged = target.as_object().unwrap();
        for (key, value) in source.as_object().unwrap().enumerable() {
            if let Tree::Array(_) | Tree::Object(_) = value.as_ref() {
                continue;
            }
            let got = merged.get(key);
            prop_assert_eq!(got.as_deref(), Some(value.as_ref()));
        }
    }

    #[test]
    fn replacing_arrays_copies_source_arrays_exactly(
        mut target in object_root(),
        items in vec(any_tree(), 0..6),
    ) {
        let source = Tree::Object(Object::from_iter([("list", Tree::Array(items))]));
        let options = MergeOptions::default().with_merge_arrays(false);

        merge_with_options(&mut target, [&source], &options).unwrap();
        prop_assert_eq!(target.get("list"), source.get("list"));
    }
}
