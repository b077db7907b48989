//! Property tests: lossless printing, no panics, idempotent injection

use proptest::prelude::*;
use spm_add_core::{DependencyDescriptor, VersionConstraint, inject_text, parse};

/// Short random text, or a long run of nested delimiters
fn source_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 \t\n\"(),.:\\[\\]{}/#*=<>_$\\\\-]{0,200}",
        (
            prop_oneof![Just("let x = "), Just("")],
            prop_oneof![Just(("[", "]")), Just(("(", ")")), Just(("f(", ")")), Just(("{", "}"))],
            0usize..3000,
            any::<bool>(),
        )
            .prop_map(|(prefix, (open, close), depth, balanced)| {
                let closing = if balanced { depth } else { depth / 2 };
                format!("{prefix}{}{}", open.repeat(depth), close.repeat(closing))
            }),
    ]
}

#[derive(Debug, Clone, Copy)]
enum TargetDependencies {
    Missing,
    InlineEmpty,
    Inline,
    Multiline,
}

fn target_dependencies() -> impl Strategy<Value = TargetDependencies> {
    prop_oneof![
        Just(TargetDependencies::Missing),
        Just(TargetDependencies::InlineEmpty),
        Just(TargetDependencies::Inline),
        Just(TargetDependencies::Multiline),
    ]
}

fn manifest(width: usize, existing: usize, trailing_comma: bool, target: TargetDependencies) -> String {
    let unit = " ".repeat(width);
    let level = |n: usize| unit.repeat(n);
    let mut text = String::from("// swift-tools-version:5.9\nimport PackageDescription\n\nlet package = Package(\n");
    text.push_str(&format!("{}name: \"Demo\",\n", level(1)));
    if existing > 0 {
        text.push_str(&format!("{}dependencies: [\n", level(1)));
        for index in 0..existing {
            let separator = if index + 1 < existing || trailing_comma { "," } else { "" };
            text.push_str(&format!(
                "{}.package(url: \"https://example.com/dep{index}.git\", from: \"1.0.{index}\"){separator}\n",
                level(2)
            ));
        }
        text.push_str(&format!("{}],\n", level(1)));
    }
    let dependencies = match target {
        TargetDependencies::Missing => String::new(),
        TargetDependencies::InlineEmpty => ", dependencies: []".to_string(),
        TargetDependencies::Inline => ", dependencies: [\"Core\"]".to_string(),
        TargetDependencies::Multiline => format!(
            ", dependencies: [\n{}\"Core\"\n{}]",
            level(3),
            level(2)
        ),
    };
    text.push_str(&format!("{}targets: [\n", level(1)));
    text.push_str(&format!("{}.target(name: \"Demo\"{dependencies}),\n", level(2)));
    text.push_str(&format!("{}]\n)\n", level(1)));
    text
}

fn descriptor(name: &str, products: Vec<String>) -> DependencyDescriptor {
    DependencyDescriptor::new(
        name,
        format!("https://github.com/org/{name}.git"),
        VersionConstraint::Exact("2.0.0".into()),
    )
    .with_products(products)
}

proptest! {
    #[test]
    fn prop_parse_never_panics_and_round_trips(source in source_text()) {
        if let Ok(tree) = parse(&source) {
            prop_assert_eq!(tree.print(), source);
        }
    }

    #[test]
    fn prop_generated_manifests_round_trip(
        width in prop_oneof![Just(2usize), Just(4usize)],
        existing in 0usize..4,
        trailing_comma in any::<bool>(),
        target in target_dependencies(),
    ) {
        let source = manifest(width, existing, trailing_comma, target);
        let tree = parse(&source).unwrap();
        prop_assert_eq!(tree.print(), source);
    }

    #[test]
    fn prop_injection_is_idempotent_and_local(
        width in prop_oneof![Just(2usize), Just(4usize)],
        existing in 0usize..4,
        trailing_comma in any::<bool>(),
        target in target_dependencies(),
        name in "[A-Z][a-zA-Z]{2,10}",
        products in prop::collection::vec("[A-Z][a-zA-Z]{2,8}", 0..3),
    ) {
        let source = manifest(width, existing, trailing_comma, target);
        let descriptor = descriptor(&name, products.clone());

        let first = inject_text(&source, &descriptor).unwrap();
        prop_assert!(first.changed);
        prop_assert_eq!(parse(&first.text).unwrap().print(), first.text.clone());

        let header = "// swift-tools-version:5.9\nimport PackageDescription\n\nlet package = Package(\n";
        prop_assert!(first.text.starts_with(header));
        let package_reference = format!(".package(name: \"{name}\"");
        prop_assert!(first.text.contains(&package_reference));
        for product in descriptor.products() {
            let product_reference = format!(".product(name: \"{product}\", package: \"{name}\")");
            prop_assert_eq!(first.text.matches(&product_reference).count(), 1);
        }

        let second = inject_text(&first.text, &descriptor).unwrap();
        prop_assert!(!second.changed);
        prop_assert_eq!(second.text, first.text);
    }
}
