//! Full preview flow against a workspace on disk.

mod common;

use std::path::Path;

use common::{MY_ELEMENT, get, write};
use ignition::{
    CancelSignal, IgnitionConfig, PreviewContext, PreviewRequest, WorkspaceRegistry,
    WorkspaceRoot, open_preview, render,
};
use tempfile::TempDir;

fn project() -> (TempDir, WorkspaceRoot) {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "package.json", r#"{ "name": "project", "type": "module" }"#);
    write(temp.path(), "src/my-element.ts", MY_ELEMENT);
    let root = WorkspaceRoot::new(temp.path()).unwrap();
    (temp, root)
}

#[tokio::test]
async fn acquire_resolve_render() {
    let (_temp, root) = project();
    let registry = WorkspaceRegistry::with_config(IgnitionConfig::default());

    let pair = registry.acquire(&root).await.unwrap();
    let exports = pair
        .resolver
        .resolve_exports(Path::new("src/my-element.ts"))
        .await
        .unwrap();
    let tags: Vec<&str> = exports.iter().map(|e| e.tag_name.as_str()).collect();
    assert_eq!(tags, ["my-element"]);

    let address = pair.address();
    assert_eq!(address.host().to_string(), "127.0.0.1");

    let js_path = pair
        .resolver
        .js_path(Path::new("src/my-element.ts"))
        .await
        .unwrap();
    let url = pair.server.module_url(&js_path);
    assert_eq!(
        url,
        format!("http://127.0.0.1:{}/_src/src/my-element.js", address.port())
    );

    let context = PreviewContext {
        title: "Lit Editor".into(),
        source_path: "src/my-element.ts".into(),
        js_path,
        server_root: root.to_string(),
        workspace: root.to_string(),
        address: address.to_string(),
        container_width: 640,
    };
    let html = render(&url, &exports, &context).unwrap();
    assert!(html.contains(&format!(r#"<script type="module" src="{url}">"#)));
    assert_eq!(html.matches("<my-element></my-element>").count(), 1);

    registry.shutdown_all().await;
}

#[tokio::test]
async fn preview_module_url_is_served() {
    let (_temp, root) = project();
    let config = IgnitionConfig::default();
    let registry = WorkspaceRegistry::with_config(config.clone());

    let request = PreviewRequest {
        workspace: root.clone(),
        document: root.as_path().join("src/my-element.ts"),
    };
    let preview = open_preview(&registry, &request, &config.preview, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(preview.tags, ["my-element"]);
    assert!(preview.html.contains("fileName: src/my-element.ts"));
    assert!(preview.html.contains("A friendly greeting."));

    let path = preview
        .module_url
        .strip_prefix(&preview.address.origin())
        .unwrap();
    let response = get(preview.address.socket_addr(), path).await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.header("content-type"),
        Some("application/javascript")
    );
    assert!(response.body.contains("my-element"));

    registry.shutdown_all().await;
}

#[tokio::test]
async fn previews_reuse_workspace_server() {
    let (temp, root) = project();
    write(
        temp.path(),
        "src/other.js",
        "export class XOther extends HTMLElement {}\ncustomElements.define('x-other', XOther);\n",
    );
    let config = IgnitionConfig::default();
    let registry = WorkspaceRegistry::with_config(config.clone());
    let cancel = CancelSignal::new();

    let first = open_preview(
        &registry,
        &PreviewRequest {
            workspace: root.clone(),
            document: "src/my-element.ts".into(),
        },
        &config.preview,
        &cancel,
    )
    .await
    .unwrap();
    let second = open_preview(
        &registry,
        &PreviewRequest {
            workspace: root.clone(),
            document: "src/other.js".into(),
        },
        &config.preview,
        &cancel,
    )
    .await
    .unwrap();

    assert_eq!(first.address, second.address);
    assert_eq!(second.tags, ["x-other"]);
    assert_eq!(registry.len(), 1);

    registry.shutdown_all().await;
}

#[tokio::test]
async fn edits_are_picked_up_without_restart() {
    let (temp, root) = project();
    let config = IgnitionConfig::default();
    let registry = WorkspaceRegistry::with_config(config.clone());
    let request = PreviewRequest {
        workspace: root.clone(),
        document: "src/my-element.ts".into(),
    };

    let before = open_preview(&registry, &request, &config.preview, &CancelSignal::new())
        .await
        .unwrap();
    assert_eq!(before.tags, ["my-element"]);

    write(
        temp.path(),
        "src/my-element.ts",
        &MY_ELEMENT.replace("'my-element'", "'my-renamed-element'"),
    );
    let after = open_preview(&registry, &request, &config.preview, &CancelSignal::new())
        .await
        .unwrap();
    assert_eq!(after.tags, ["my-renamed-element"]);
    assert_eq!(after.html.matches("<my-renamed-element></my-renamed-element>").count(), 1);

    registry.shutdown_all().await;
}
