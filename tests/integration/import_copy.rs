use context_copy::builder::Selection;
use context_copy::core::Position;
use context_copy::provider::TreeProvider;
use context_copy::resolver::WorkspaceRoots;
use context_copy::test_utils::{ImportFixture, ImportWorkspace, init_test_logging};
use context_copy::tree::{NodeKind, RenderOptions};

fn workspace() -> ImportWorkspace {
    ImportFixture::new()
        .file("main.py", "import util\nimport os\nimport pkg")
        .file("util.py", "import main\nX = 1")
        .file("pkg/__init__.py", "VERSION = 1")
        .imports(
            "main.py",
            &[("util", "util.py"), ("os", "Module 'os' not found"), ("pkg", "pkg")],
        )
        .imports("util.py", &[("main", "main.py")])
        .build()
        .unwrap()
}

async fn build(ws: &ImportWorkspace) -> (TreeProvider, WorkspaceRoots) {
    let resolver = ws.resolver();
    let roots = WorkspaceRoots::single(&ws.root);
    let mut provider = TreeProvider::new();
    let selection = Selection::new(ws.path("main.py"), Position::default());
    let warnings = provider.build(Some(&selection), &resolver, &roots).await.unwrap();
    assert!(warnings.is_empty(), "{warnings:?}");
    (provider, roots)
}

#[tokio::test]
async fn test_import_tree_shape() {
    init_test_logging(None);
    let ws = workspace();
    let (provider, _) = build(&ws).await;
    let root = provider.roots()[0];

    let rendered = provider.render(root, &RenderOptions::default());
    assert_eq!(
        rendered,
        "main.py\n├── util.py\n│   └── main.py (already visited)\n└── pkg\n    └── __init__.py\n"
    );

    let tree = provider.tree();
    let pkg = tree.find("main.py/pkg").unwrap();
    assert_eq!(tree.node(pkg).kind(), NodeKind::Directory);
    let marker = tree.find("main.py/util.py/main.py (already visited)").unwrap();
    assert_eq!(tree.node(marker).kind(), NodeKind::CycleMarker);
}

#[tokio::test]
async fn test_file_contents_concatenated_once_each() {
    let ws = workspace();
    let (provider, roots) = build(&ws).await;
    let root = provider.roots()[0];

    let outcome = provider.copy_file_info(root, &roots).await;
    assert_eq!(
        outcome.text(),
        Some(
            "''' main.py '''\nimport util\nimport os\nimport pkg\n\n''' util.py '''\nimport main\nX = 1\n\n''' pkg/__init__.py '''\nVERSION = 1"
        )
    );
}

#[tokio::test]
async fn test_unchecked_import_subtree_skipped() {
    let ws = workspace();
    let (mut provider, roots) = build(&ws).await;
    let root = provider.roots()[0];
    provider.toggle_checked_by_id("main.py/pkg").unwrap();

    let outcome = provider.copy_file_info(root, &roots).await;
    let text = outcome.text().unwrap();
    assert!(text.contains("''' util.py '''"));
    assert!(!text.contains("__init__.py"));
}

#[tokio::test]
async fn test_missing_start_file_fails_build() {
    let ws = workspace();
    let resolver = ws.resolver();
    let roots = WorkspaceRoots::single(&ws.root);
    let mut provider = TreeProvider::new();
    let selection = Selection::new(ws.path("nope.py"), Position::default());

    let err = provider.build(Some(&selection), &resolver, &roots).await.unwrap_err();
    assert!(err.to_string().contains("nope.py"), "{err}");
    assert!(provider.roots().is_empty());
}
