use context_copy::builder::{CYCLE_MARKER_SUFFIX, Selection};
use context_copy::copy::{self, CopyOutcome};
use context_copy::core::{Location, Position, Range, Warning};
use context_copy::provider::TreeProvider;
use context_copy::resolver::{SnapshotResolver, SymbolKind};
use context_copy::test_utils::{SnapshotFixture, init_test_logging, symbol};
use context_copy::tree::{CheckboxTree, NodeKind};

const FOO_COPY: &str = "''' a.ts '''\nclass Foo {\n    ...\n    ### lines 2 - 4\n    bar() {\n    return this.baz();\n  }\n\n    ### lines 6 - 8\n    baz() {\n    return 2;\n  }";

async fn foo_provider() -> (TreeProvider, SnapshotResolver) {
    let resolver = SnapshotFixture::foo_class().into_resolver("/ws").unwrap();
    let mut provider = TreeProvider::new();
    let selection = Selection::new("a.ts", Position::new(1, 4));
    let warnings = provider.build(Some(&selection), &resolver, &resolver.workspace()).await.unwrap();
    assert!(warnings.is_empty());
    (provider, resolver)
}

#[tokio::test]
async fn test_class_members_copied_under_one_header() {
    init_test_logging(None);
    let (provider, resolver) = foo_provider().await;
    let root = provider.roots()[0];

    let labels: Vec<&str> =
        provider.tree().descendants(root).iter().map(|n| provider.tree().node(*n).label()).collect();
    assert_eq!(labels, vec!["bar", "baz"]);

    let outcome = provider.copy_info(root, &resolver).await;
    assert_eq!(outcome.text(), Some(FOO_COPY));
    assert!(outcome.warnings().is_empty());
}

#[tokio::test]
async fn test_member_order_independent_of_check_order() {
    let resolver = SnapshotFixture::foo_class().into_resolver("/ws").unwrap();
    let at = |start: (u32, u32), end: (u32, u32)| {
        Location::new("/ws/a.ts", Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1)))
    };

    // baz first, bar second: the reverse of source order.
    let mut tree = CheckboxTree::new();
    let baz = tree.create("baz", at((5, 2), (7, 3)), NodeKind::Symbol, None);
    tree.create("bar", at((1, 2), (3, 3)), NodeKind::Symbol, Some(baz));

    let outcome = copy::copy_info(&tree, baz, &resolver).await;
    assert_eq!(outcome.text(), Some(FOO_COPY));
}

#[tokio::test]
async fn test_unchecked_member_is_left_out() {
    let (mut provider, resolver) = foo_provider().await;
    let root = provider.roots()[0];
    provider.toggle_checked_by_id("bar/baz").unwrap();

    let outcome = provider.copy_info(root, &resolver).await;
    assert_eq!(
        outcome.text(),
        Some("''' a.ts '''\nclass Foo {\n    ...\n    ### lines 2 - 4\n    bar() {\n    return this.baz();\n  }")
    );
}

#[tokio::test]
async fn test_nothing_checked() {
    let (mut provider, resolver) = foo_provider().await;
    let root = provider.roots()[0];
    provider.toggle_checked(root);

    let outcome = provider.copy_info(root, &resolver).await;
    assert!(matches!(outcome, CopyOutcome::NothingChecked));
    assert_eq!(outcome.text(), None);
}

#[tokio::test]
async fn test_mutual_recursion_terminates_with_marker() {
    let resolver = SnapshotFixture::mutual_recursion().into_resolver("/ws").unwrap();
    let mut provider = TreeProvider::new();
    let selection = Selection::new("cycle.ts", Position::new(1, 2));
    provider.build(Some(&selection), &resolver, &resolver.workspace()).await.unwrap();

    let tree = provider.tree();
    let root = provider.roots()[0];
    let nodes: Vec<_> = tree.descendants(root).iter().map(|n| tree.node(*n)).collect();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].label(), "a");
    assert_eq!(nodes[1].label(), "b");
    assert_eq!(nodes[2].label(), format!("a{CYCLE_MARKER_SUFFIX}"));
    assert_eq!(nodes[2].kind(), NodeKind::CycleMarker);
    assert!(nodes[2].is_leaf());

    // The marker repeats `a`, which is already in the copy.
    let outcome = provider.copy_info(root, &resolver).await;
    assert_eq!(
        outcome.text(),
        Some("''' cycle.ts '''\n### lines 1 - 3\nfunction a() {\n  b();\n}\n\n### lines 4 - 6\nfunction b() {\n  a();\n}")
    );
}

#[tokio::test]
async fn test_copy_is_deterministic() {
    let mut copies = Vec::new();
    for _ in 0..3 {
        let (provider, resolver) = foo_provider().await;
        let root = provider.roots()[0];
        copies.push(provider.copy_info(root, &resolver).await.text().map(str::to_string));
    }
    assert!(copies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_snapshot_loaded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = SnapshotFixture::foo_class().write(dir.path()).unwrap();
    let resolver = SnapshotResolver::load(&path).await.unwrap();

    let mut provider = TreeProvider::new();
    let selection = Selection::new("a.ts", Position::new(5, 2));
    provider.build(Some(&selection), &resolver, &resolver.workspace()).await.unwrap();
    let root = provider.roots()[0];

    assert_eq!(
        provider.copy_info(root, &resolver).await.text(),
        Some("''' a.ts '''\nclass Foo {\n    ...\n    ### lines 6 - 8\n    baz() {\n    return 2;\n  }")
    );
}

/// `lib.ts` holds an interface with a member and a namespace with a nested
/// function; `short.ts` claims a class well past the end of its empty text.
fn mixed_resolver() -> SnapshotResolver {
    let text = "interface Shape {\n  area(): number;\n}\nnamespace util {\n  function clamp(x) {\n    return x;\n  }\n}\n// trailing comment\n";
    let mut shape = symbol("Shape", SymbolKind::Interface, (0, 0), (2, 1), &[]);
    shape.children = vec![symbol("area", SymbolKind::Function, (1, 2), (1, 17), &[])];
    let mut util = symbol("util", SymbolKind::Module, (3, 0), (7, 1), &[]);
    util.children = vec![symbol("clamp", SymbolKind::Function, (4, 2), (6, 3), &[])];

    let mut ghost = symbol("Ghost", SymbolKind::Class, (5, 0), (9, 1), &[]);
    ghost.children = vec![symbol("m", SymbolKind::Method, (6, 0), (7, 1), &[])];

    SnapshotFixture::new()
        .file("lib.ts", text, vec![shape, util])
        .file("short.ts", "", vec![ghost])
        .into_resolver("/ws")
        .unwrap()
}

fn at(file: &str, start: (u32, u32), end: (u32, u32)) -> Location {
    Location::new(file, Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1)))
}

#[tokio::test]
async fn test_skipped_nodes_do_not_stop_the_batch() {
    init_test_logging(None);
    let resolver = mixed_resolver();

    let mut tree = CheckboxTree::new();
    let area = tree.create("area", at("/ws/lib.ts", (1, 2), (1, 17)), NodeKind::Symbol, None);
    tree.create("gone", at("/ws/gone.ts", (0, 0), (0, 4)), NodeKind::Symbol, Some(area));
    tree.create("comment", at("/ws/lib.ts", (8, 0), (8, 5)), NodeKind::Symbol, Some(area));
    // Only the name is selected; the whole nested function is copied.
    tree.create("clamp", at("/ws/lib.ts", (4, 2), (4, 8)), NodeKind::Symbol, Some(area));
    tree.create("m", at("/ws/short.ts", (6, 0), (7, 1)), NodeKind::Symbol, Some(area));

    let outcome = copy::copy_info(&tree, area, &resolver).await;
    assert_eq!(
        outcome.text(),
        Some(
            "''' lib.ts '''\ninterface Shape {\n    ...\n    ### line 2\n    area(): number;\n\n### lines 5 - 7\nfunction clamp(x) {\n    return x;\n  }"
        )
    );

    let warnings = outcome.warnings();
    assert_eq!(warnings.len(), 3, "{warnings:?}");
    assert!(matches!(
        &warnings[0],
        Warning::ContainerResolutionFailed { label, .. } if label == "gone"
    ));
    assert!(matches!(
        &warnings[1],
        Warning::ContainerResolutionFailed { label, reason, .. }
            if label == "comment" && reason.contains("no symbol encloses")
    ));
    assert!(matches!(
        &warnings[2],
        Warning::FileReadFailed { path, .. } if path.ends_with("short.ts")
    ));
}

#[tokio::test]
async fn test_every_node_skipped_is_nothing_valid() {
    let resolver = mixed_resolver();

    let mut tree = CheckboxTree::new();
    let gone = tree.create("gone", at("/ws/gone.ts", (0, 0), (0, 4)), NodeKind::Symbol, None);
    tree.create("comment", at("/ws/lib.ts", (8, 0), (8, 5)), NodeKind::Symbol, Some(gone));

    let outcome = copy::copy_info(&tree, gone, &resolver).await;
    assert!(matches!(outcome, CopyOutcome::NothingValid { .. }));
    assert_eq!(outcome.text(), None);
    assert_eq!(outcome.message(), Some(copy::NOTHING_VALID_MESSAGE));
    assert_eq!(outcome.warnings().len(), 2);
}

/// `app.ts` imports `helper` from `./util` and calls it; `util.ts` defines it.
fn importing_resolver() -> SnapshotResolver {
    let app = "import { helper, unused } from './util';\nfunction main() {\n  helper();\n}\n";
    let mut declaration = symbol("./util", SymbolKind::Module, (0, 0), (0, 40), &[]);
    declaration.children = vec![
        symbol("helper", SymbolKind::Function, (0, 9), (0, 15), &[]),
        symbol("unused", SymbolKind::Function, (0, 17), (0, 23), &[]),
    ];
    let main = symbol("main", SymbolKind::Function, (1, 0), (3, 1), &["util.ts#helper"]);
    let helper = symbol("helper", SymbolKind::Function, (0, 0), (2, 1), &[]);

    SnapshotFixture::new()
        .file("app.ts", app, vec![declaration, main])
        .file("util.ts", "function helper() {\n  return 1;\n}\n", vec![helper])
        .into_resolver("/ws")
        .unwrap()
}

#[tokio::test]
async fn test_relevant_imports_name_copied_symbols() {
    let resolver = importing_resolver();
    let mut provider = TreeProvider::new();
    let selection = Selection::new("app.ts", Position::new(1, 10));
    provider.build(Some(&selection), &resolver, &resolver.workspace()).await.unwrap();
    let root = provider.roots()[0];

    let outcome = provider.relevant_imports(root, &resolver).await;
    assert_eq!(
        outcome.text(),
        Some(
            "Relevant imports for file: app.ts\nimport { helper } from './util';\n\nNo relevant imports found for file: util.ts"
        )
    );

    provider.toggle_checked_by_id("main/helper").unwrap();
    let outcome = provider.relevant_imports(root, &resolver).await;
    assert_eq!(outcome.text(), Some("No relevant imports found for file: app.ts"));
}
