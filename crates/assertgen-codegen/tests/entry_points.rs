//! Entry-point aggregation and hierarchy safety properties.

use std::collections::BTreeSet;

use assertgen_codegen::entry_point::common_package;
use assertgen_codegen::{
    synthesize_entry_point, EntryPointMode, Synthesizer, Template, TemplateRegistry, TemplateRole,
};
use assertgen_core::{
    ClassDescription, InMemoryCatalog, Introspector, MethodShape, PropertySet, PropertyShape,
    TypeKind, TypeName, TypeRef, TypeShape,
};
use proptest::prelude::*;

fn bare(subject: TypeName) -> ClassDescription {
    ClassDescription {
        subject,
        kind: TypeKind::Class,
        subject_shape: PropertyShape::Plain,
        supertype: None,
        implements_comparable: false,
        accessors: PropertySet::new(),
        fields: PropertySet::new(),
        declared_accessors: PropertySet::new(),
        declared_fields: PropertySet::new(),
    }
}

fn listing_registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::with_defaults();
    registry.register(Template::new(
        TemplateRole::AssertionsEntryPointClass,
        "${all_assertions_entry_points}",
    ));
    registry.register(Template::new(
        TemplateRole::AssertionEntryPoint,
        "${class_to_assert}\n",
    ));
    registry
}

const POOL: [(&str, &str); 8] = [
    ("com.acme", "Player"),
    ("com.acme", "Coach"),
    ("com.acme.team", "Roster"),
    ("com.acme.team", "Bench"),
    ("org.league", "Season"),
    ("org.league", "Match"),
    ("io.stats", "Score"),
    ("com", "Root"),
];

// ---------------------------------------------------------------------------
// Empty batch
// ---------------------------------------------------------------------------

#[test]
fn empty_or_absent_batch_yields_empty_content() {
    let registry = TemplateRegistry::with_defaults();
    let empty: Vec<ClassDescription> = Vec::new();
    for mode in EntryPointMode::ALL {
        assert_eq!(synthesize_entry_point(&registry, None, mode, None).unwrap(), "");
        assert_eq!(
            synthesize_entry_point(&registry, Some(empty.as_slice()), mode, None).unwrap(),
            ""
        );
        assert_eq!(
            synthesize_entry_point(&registry, Some(empty.as_slice()), mode, Some("org.tests"))
                .unwrap(),
            ""
        );
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn standard_entry_point_uses_qualified_names() {
    let registry = TemplateRegistry::with_defaults();
    let descs = vec![
        bare(TypeName::new("com.acme.team", "Roster")),
        bare(TypeName::new("com.acme", "Player")),
    ];
    let out = synthesize_entry_point(
        &registry,
        Some(descs.as_slice()),
        EntryPointMode::Standard,
        None,
    )
    .unwrap();
    assert!(out.starts_with("package com.acme;\n"));
    assert!(out.contains(
        "public static com.acme.PlayerAssert assertThat(com.acme.Player actual) {\n    return new com.acme.PlayerAssert(actual);"
    ));
    let player = out.find("com.acme.PlayerAssert assertThat").unwrap();
    let roster = out.find("com.acme.team.RosterAssert assertThat").unwrap();
    assert!(player < roster);
}

#[test]
fn soft_entry_points_proxy_and_extend_their_base() {
    let registry = TemplateRegistry::with_defaults();
    let descs = vec![bare(TypeName::new("com.acme", "Player"))];
    let out = synthesize_entry_point(
        &registry,
        Some(descs.as_slice()),
        EntryPointMode::JUnitBddSoft,
        Some("org.tests"),
    )
    .unwrap();
    assert!(out.starts_with("package org.tests;\n"));
    assert!(out.contains("public class JUnitBddSoftAssertions extends org.assertj.core.api.JUnitBDDSoftAssertions {"));
    assert!(out.contains(
        "public org.tests.PlayerAssert then(com.acme.Player actual) {\n    return proxy(org.tests.PlayerAssert.class, com.acme.Player.class, actual);"
    ));
}

#[test]
fn nested_subjects_use_flattened_assert_names() {
    let mut registry = listing_registry();
    registry.register(Template::new(
        TemplateRole::AssertionEntryPoint,
        "${custom_assertion_class} ${class_to_assert}\n",
    ));
    let descs = vec![bare(TypeName::nested("com.acme", ["Team"], "Coach"))];
    let out = synthesize_entry_point(
        &registry,
        Some(descs.as_slice()),
        EntryPointMode::Standard,
        None,
    )
    .unwrap();
    assert_eq!(out, "com.acme.TeamCoachAssert com.acme.Team.Coach\n");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn methods_are_sorted_whatever_the_input_order(
        order in Just((0..POOL.len()).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let registry = listing_registry();
        let descs: Vec<ClassDescription> = order
            .iter()
            .map(|&i| bare(TypeName::new(POOL[i].0, POOL[i].1)))
            .collect();

        let out = synthesize_entry_point(&registry, Some(descs.as_slice()), EntryPointMode::Standard, None)
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        prop_assert_eq!(lines.len(), POOL.len());
        for pair in lines.windows(2) {
            prop_assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }

        let mut sorted = descs.clone();
        sorted.sort_by_key(|d| d.subject.qualified());
        let reference = synthesize_entry_point(&registry, Some(sorted.as_slice()), EntryPointMode::Standard, None)
            .unwrap();
        prop_assert_eq!(out, reference);
    }

    #[test]
    fn common_package_is_the_shortest_input_package(
        packages in prop::collection::vec("[a-c]{1,3}(\\.[a-c]{1,3}){0,2}", 1..8)
    ) {
        let descs: Vec<ClassDescription> = packages
            .iter()
            .map(|p| bare(TypeName::new(p.clone(), "Subject")))
            .collect();
        let chosen = common_package(&descs);

        prop_assert!(packages.contains(&chosen));
        for p in &packages {
            prop_assert!(chosen.len() <= p.len());
            if chosen.len() == p.len() {
                prop_assert!(chosen.as_str() <= p.as_str());
            }
        }
    }

    #[test]
    fn abstract_classes_only_extend_generated_parents(
        depth in 2usize..6,
        mask in prop::collection::vec(any::<bool>(), 6),
    ) {
        let level = |i: usize| TypeName::new("com.acme", format!("Level{}", i));
        let mut catalog = InMemoryCatalog::new();
        for i in 0..depth {
            let mut shape = TypeShape::class(level(i)).with_method(MethodShape::accessor(
                format!("getValue{}", i),
                TypeRef::primitive("int"),
            ));
            if i > 0 {
                shape = shape.extending(TypeRef::named(level(i - 1)));
            }
            catalog.insert(shape);
        }
        let batch: BTreeSet<TypeName> = (0..depth).filter(|i| mask[*i]).map(level).collect();

        let registry = TemplateRegistry::with_defaults();
        let synth = Synthesizer::new(&registry);
        let introspector = Introspector::new(&catalog);
        for i in (0..depth).filter(|i| mask[*i]) {
            let desc = introspector.extract_description(&level(i)).unwrap();
            let source = synth.synthesize_hierarchical(&desc, &batch).unwrap();
            for j in (0..depth).filter(|j| *j != i) {
                let parent_assert = format!("AbstractLevel{}Assert", j);
                let referenced = source.abstract_source.contains(&parent_assert)
                    || source.concrete_source.contains(&parent_assert);
                let allowed = i > 0 && j == i - 1 && batch.contains(&level(j));
                prop_assert_eq!(referenced, allowed, "Level{} referencing {}", i, parent_assert);
            }
        }
    }
}
