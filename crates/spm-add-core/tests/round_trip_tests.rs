//! Round-trip validation: printing a parsed manifest reproduces it byte for byte

use spm_add_core::cst::{ManifestSyntaxKind, parse, print_green};
use spm_add_core::{ParseErrorKind, SyntaxTree};

fn assert_round_trip(source: &str) {
    let tree = parse(source).unwrap_or_else(|err| panic!("failed to parse:\n{source}\n{err}"));
    assert_eq!(tree.print(), source);
    assert_eq!(print_green(tree.green()), source);
    assert_eq!(tree.syntax().to_string(), source);
}

#[test]
fn test_typical_manifest_round_trip() {
    assert_round_trip(
        r#"// swift-tools-version:5.9
// The swift-tools-version declares the minimum version of Swift required to build this package.

import PackageDescription

let package = Package(
    name: "swift-add",
    platforms: [
        .macOS(.v12),
    ],
    products: [
        .executable(name: "swift-add", targets: ["swift-add"]),
    ],
    dependencies: [
        .package(url: "https://github.com/apple/swift-argument-parser", from: "1.0.0"),
        .package(url: "https://github.com/onevcat/Rainbow", .upToNextMajor(from: "4.0.0")),
        .package(url: "https://github.com/apple/swift-syntax.git", exact: "509.0.0"),
        .package(path: "../Local"),
    ],
    targets: [
        .executableTarget(
            name: "swift-add",
            dependencies: [
                .product(name: "ArgumentParser", package: "swift-argument-parser"),
                "Rainbow",
            ]),
        .testTarget(
            name: "swift-addTests",
            dependencies: ["swift-add"]),
    ]
)
"#,
    );
}

#[test]
fn test_conditional_and_computed_code_round_trip() {
    assert_round_trip(
        r#"import PackageDescription
import class Foundation.ProcessInfo

let isCI = ProcessInfo.processInfo.environment["CI"] != nil
var deps: [Package.Dependency] = isCI ? [] : [.package(path: "../dev")]

let package = Package(
    name: "Demo",
    dependencies: deps,
    targets: [
        .target(
            name: "Demo",
            swiftSettings: [.unsafeFlags(["-Xfrontend", "-warn-long-function-bodies=100"])],
            linkerSettings: [.linkedLibrary("z", .when(platforms: [.linux]))]
        ),
    ],
    swiftLanguageVersions: [.v5]
)

#if os(Linux)
package.targets.append(.target(name: "Glibc"))
#endif

for target in package.targets where target.type != .system {
    target.swiftSettings = (target.swiftSettings ?? []) + [.enableExperimentalFeature("StrictConcurrency")]
}
"#,
    );
}

#[test]
fn test_strings_and_comments_round_trip() {
    assert_round_trip(
        "let a = \"escaped \\\" quote\" /* block /* nested */ comment */\n\
         let b = #\"raw \"string\"\"#\n\
         let c = \"\"\"\n    multi\n    line \\(a)\n    \"\"\"\n\
         let d = \"interp \\(foo(\"x\", [1, 2]))\"\n",
    );
}

#[test]
fn test_crlf_and_tabs_round_trip() {
    assert_round_trip("let package = Package(\r\n\tname: \"Demo\",\r\n\ttargets: [ ]\r\n)\r\n");
}

#[test]
fn test_trailing_closures_and_semicolons_round_trip() {
    assert_round_trip("let names = targets.map { $0.name }; let x = 1\nlet sorted = names.sorted(by: <)\n");
}

#[test]
fn test_empty_and_whitespace_only_sources() {
    assert_round_trip("");
    assert_round_trip("\n\n   \n");
    assert_round_trip("// only a comment");
}

#[test]
fn test_tree_shape_of_package_call() {
    let tree = SyntaxTree::parse("let package = Package(name: \"A\", targets: [])").unwrap();
    let kinds: Vec<ManifestSyntaxKind> = tree.syntax().descendants().map(|n| n.kind()).collect();
    assert_eq!(kinds[0], ManifestSyntaxKind::SourceFile);
    assert!(kinds.contains(&ManifestSyntaxKind::VariableDecl));
    assert!(kinds.contains(&ManifestSyntaxKind::CallExpr));
    assert!(kinds.contains(&ManifestSyntaxKind::ArgumentList));
    assert_eq!(kinds.iter().filter(|k| **k == ManifestSyntaxKind::Argument).count(), 2);
}

#[test]
fn test_unbalanced_delimiters_are_rejected() {
    for source in [
        "let package = Package(name: \"A\"",
        "let package = Package(name: \"A\"]",
        "let a = [1, 2))",
        "}",
    ] {
        let err = parse(source).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnbalancedDelimiter, "{source}");
    }
}

#[test]
fn test_lexer_errors_carry_positions() {
    let err = parse("let a = 1\nlet b = \"unterminated\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Lexer);
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 9);
}
