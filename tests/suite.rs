// Integration suite for catalog discovery: target resolution, tree assembly,
// inheritance, and lookup against the checked-in fixture packages and
// throwaway trees.
mod support;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::sync::Arc;
use storytime::{
    BuildOptions, CatalogError, CatalogNode, Diagnostic, FileResolver, NodeKind, ROOT_PACKAGE_PATH,
    StorytimeConfig, TreeBuilder, UnitResolver, build, build_with, make_target_path,
};
use support::{define, export, fixture_config, fixture_root, recording};
use tempfile::TempDir;

#[test]
fn target_path_resolves_fixture_package() -> Result<()> {
    let result = make_target_path("examples.minimal", &fixture_config())?;
    assert_eq!(
        result.file_name().and_then(|name| name.to_str()),
        Some("minimal")
    );
    Ok(())
}

#[test]
fn missing_root_reports_exact_message() {
    let err = build_with("examples.not.exist", &fixture_config()).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
    assert_eq!(
        err.to_string(),
        "examples.not.exist is not a package in this environment."
    );
}

#[test]
fn missing_root_from_environment_settings() {
    // No STORYTIME_PATH entry can contain this package.
    let err = build("examples.not.exist").unwrap_err();
    assert_eq!(
        err.to_string(),
        "examples.not.exist is not a package in this environment."
    );
}

#[test]
fn minimal_tree() -> Result<()> {
    let site = build_with("examples.minimal", &fixture_config())?;

    assert_eq!(site.title(), "Minimal Site");
    assert_eq!(site.root().kind(), NodeKind::Site);
    assert_eq!(site.root().name(), "");
    assert_eq!(site.root().package_path(), ROOT_PACKAGE_PATH);
    assert_eq!(site.root().parent_path(), None);
    assert_eq!(site.items().len(), 1);

    let components = &site.items()["components"];
    assert_eq!(components.kind(), NodeKind::Section);
    assert_eq!(components.title(), "Components");
    assert_eq!(components.package_path(), ".components");
    assert_eq!(components.parent_path(), Some("."));

    let heading = &components.items()["heading"];
    assert_eq!(heading.kind(), NodeKind::Subject);
    assert_eq!(heading.package_path(), ".components.heading");
    assert_eq!(heading.parent_path(), Some(".components"));
    assert_eq!(heading.stories()[0].title, "Default Heading");
    assert!(heading.location().ends_with("components/heading"));

    let found = site
        .find_path(".components.heading")
        .context("heading should be addressable")?;
    assert!(std::ptr::eq(found, heading));
    assert_eq!(found, heading);
    Ok(())
}

#[test]
fn minimal_tree_shares_site_registry() -> Result<()> {
    let site = build_with("examples.minimal", &fixture_config())?;
    for node in site.walk() {
        let registry = node.registry().context("every node acquires a registry")?;
        assert!(
            Arc::ptr_eq(registry, site.registry()),
            "{} should share the site registry",
            node.package_path()
        );
    }
    assert_eq!(site.len(), 3);
    Ok(())
}

#[test]
fn non_qualifying_file_contributes_nothing() -> Result<()> {
    let diagnostics = RefCell::new(Vec::new());
    let root = make_target_path("examples.no_sections", &fixture_config())?;
    let site = TreeBuilder::new(FileResolver::new()?)
        .options(recording(&diagnostics))
        .build(&root)?;

    assert!(site.items().is_empty());
    assert!(site.find_path(".components").is_none());
    let diagnostics = diagnostics.into_inner();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0], Diagnostic::MissingExport { .. }));
    assert!(diagnostics[0].path().ends_with("components/stories.json"));
    Ok(())
}

#[test]
fn kitchen_sink_tree() -> Result<()> {
    let diagnostics = RefCell::new(Vec::new());
    let root = make_target_path("examples.kitchen_sink", &fixture_config())?;
    let site = TreeBuilder::new(FileResolver::new()?)
        .options(recording(&diagnostics))
        .build(&root)?;

    let keys: Vec<&str> = site.items().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["components", "views"]);

    let component_keys: Vec<&str> = site.items()["components"]
        .items()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(component_keys, vec!["button", "heading"]);

    let button = site.find_path(".components.button").context("button")?;
    assert_eq!(button.title(), "Primary Button");

    let heading = site.find_path("components.heading").context("heading")?;
    let titles: Vec<&str> = heading.stories().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Default Heading", "Loud Heading"]);
    assert_eq!(
        heading.stories()[1].template,
        Some(json!({"tag": "h1", "text": "HELLO"}))
    );

    assert_eq!(site.registry().label(), Some("site"));
    assert_eq!(site.registry().get("theme"), Some(&json!("light")));
    let components = site.find_path(".components").context("components")?;
    assert!(Arc::ptr_eq(components.registry().context("registry")?, site.registry()));

    let views = site.find_path(".views").context("views")?;
    let page = site.find_path(".views.page").context("page")?;
    let views_registry = views.registry().context("views registry")?;
    assert_eq!(views_registry.get("theme"), Some(&json!("dark")));
    assert!(!Arc::ptr_eq(views_registry, site.registry()));
    assert!(Arc::ptr_eq(page.registry().context("page registry")?, views_registry));

    drop(site);
    let diagnostics = diagnostics.into_inner();
    assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
    match &diagnostics[0] {
        Diagnostic::AmbiguousExport {
            chosen, candidates, ..
        } => {
            assert_eq!(chosen, "primary_button");
            assert_eq!(candidates, &vec!["primary_button", "secondary_button"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert!(matches!(diagnostics[1], Diagnostic::MissingExport { .. }));
    assert!(diagnostics[1].path().ends_with("docs/stories.json"));
    Ok(())
}

#[test]
fn strict_build_rejects_ambiguity() -> Result<()> {
    let config = StorytimeConfig {
        strict: true,
        ..fixture_config()
    };
    let err = build_with("examples.kitchen_sink", &config).unwrap_err();
    match err {
        CatalogError::Ambiguous { path, candidates } => {
            assert!(path.ends_with("components/button/stories.json"));
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected ambiguity error, got {other}"),
    }

    // The minimal tree has exactly one qualifying export per file.
    build_with("examples.minimal", &config)?;
    Ok(())
}

#[test]
fn repeated_builds_are_identical() -> Result<()> {
    let first = build_with("examples.kitchen_sink", &fixture_config())?;
    let second = build_with("examples.kitchen_sink", &fixture_config())?;

    let paths = |site: &storytime::Site| -> Vec<(String, Option<String>, String)> {
        site.walk()
            .map(|node| {
                (
                    node.package_path().to_string(),
                    node.parent_path().map(str::to_string),
                    node.name().to_string(),
                )
            })
            .collect()
    };
    assert_eq!(paths(&first), paths(&second));
    assert_eq!(
        serde_json::to_value(&first)?,
        serde_json::to_value(&second)?
    );
    Ok(())
}

#[test]
fn every_node_satisfies_path_algebra() -> Result<()> {
    let site = build_with("examples.kitchen_sink", &fixture_config())?;
    for node in site.walk().skip(1) {
        let parent_path = node.parent_path().context("non-root has parent")?;
        let expected = if parent_path == ROOT_PACKAGE_PATH {
            format!(".{}", node.name())
        } else {
            format!("{parent_path}.{}", node.name())
        };
        assert_eq!(node.package_path(), expected);
        let parent = site.find_path(parent_path).context("parent addressable")?;
        assert!(parent.items().contains_key(node.name()));
    }
    Ok(())
}

#[test]
fn lookup_is_total_on_unknown_and_malformed_paths() -> Result<()> {
    let site = build_with("examples.minimal", &fixture_config())?;
    for path in [
        ".components.missing",
        ".nothing.here",
        ".components.heading.deeper",
        "",
        "..",
        ".components..heading",
        "components.",
    ] {
        assert!(site.find_path(path).is_none(), "{path:?} should not resolve");
    }
    assert!(std::ptr::eq(site.find_path(".").context("root")?, site.root()));
    Ok(())
}

#[test]
fn site_serializes_for_renderers() -> Result<()> {
    let site = build_with("examples.minimal", &fixture_config())?;
    let value = serde_json::to_value(&site)?;
    assert_eq!(value["title"], "Minimal Site");
    assert_eq!(value["kind"], "site");
    assert_eq!(value["package_path"], ".");
    assert!(value.get("parent_path").is_none());
    assert_eq!(
        value
            .pointer("/items/components/items/heading/stories/0/title")
            .and_then(Value::as_str),
        Some("Default Heading")
    );
    assert!(value.get("target").and_then(Value::as_str).is_some());
    Ok(())
}

#[test]
fn same_file_name_in_every_directory_loads_each_file() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    define(root, json!([export("site", "site", json!({"title": "Site"}))]))?;
    for name in ["alpha", "beta", "gamma"] {
        define(
            &root.join(name),
            json!([export(name, "subject", json!({"title": name.to_uppercase()}))]),
        )?;
    }

    let mut builder = TreeBuilder::new(FileResolver::new()?);
    let site = builder.build(root)?;
    assert_eq!(builder.resolver().cached_len(), 4);
    let titles: Vec<&str> = site.items().values().map(CatalogNode::title).collect();
    assert_eq!(titles, vec!["ALPHA", "BETA", "GAMMA"]);
    Ok(())
}

#[test]
fn explicit_empty_registry_is_not_replaced() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    define(
        root,
        json!([export(
            "site",
            "site",
            json!({"title": "Site", "registry": {"label": "site", "entries": {"a": 1}}})
        )]),
    )?;
    define(
        &root.join("bare"),
        json!([export("bare", "section", json!({"title": "Bare", "registry": {}}))]),
    )?;

    let site = TreeBuilder::new(FileResolver::new()?).build(root)?;
    let bare = site.find_path(".bare").context("bare")?;
    let registry = bare.registry().context("registry")?;
    assert!(registry.is_empty());
    assert!(!Arc::ptr_eq(registry, site.registry()));
    Ok(())
}

#[test]
fn diagnostics_do_not_abort_siblings() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    define(root, json!([export("site", "site", json!({"title": "Site"}))]))?;
    define(&root.join("a_story_only"), json!([export("s", "story", json!({"title": "S"}))]))?;
    define(&root.join("b_bad_payload"), json!([export("x", "section", json!({"nope": 1}))]))?;
    define(&root.join("c_good"), json!([export("c", "section", json!({"title": "Good"}))]))?;

    let diagnostics = RefCell::new(Vec::new());
    let site = TreeBuilder::new(FileResolver::new()?)
        .options(recording(&diagnostics))
        .build(root)?;
    assert_eq!(site.items().keys().collect::<Vec<_>>(), vec!["c_good"]);

    drop(site);
    let diagnostics = diagnostics.into_inner();
    assert!(matches!(diagnostics[0], Diagnostic::MissingExport { .. }));
    assert!(matches!(diagnostics[1], Diagnostic::Unresolvable { .. }));
    assert_eq!(diagnostics.len(), 2);
    Ok(())
}

#[test]
fn strict_option_on_builder() -> Result<()> {
    let temp = TempDir::new()?;
    let root = temp.path();
    define(root, json!([export("site", "site", json!({"title": "Site"}))]))?;
    define(&root.join("empty"), json!([]))?;

    let lenient = TreeBuilder::new(FileResolver::new()?).build(root)?;
    assert!(lenient.items().is_empty());

    let strict = TreeBuilder::new(FileResolver::new()?)
        .options(BuildOptions::default().strict(true))
        .build(root);
    match strict {
        Err(CatalogError::MissingExport { path }) => assert!(path.ends_with("empty/stories.json")),
        other => panic!("expected strict failure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn fixture_root_exists() {
    assert!(fixture_root().join("examples/minimal/stories.json").is_file());
}

struct CountingResolver {
    inner: FileResolver,
    calls: Vec<std::path::PathBuf>,
}

impl UnitResolver for CountingResolver {
    fn resolve(
        &mut self,
        location: &std::path::Path,
    ) -> storytime::Result<Arc<storytime::DefinitionUnit>> {
        self.calls.push(location.to_path_buf());
        self.inner.resolve(location)
    }
}

#[test]
fn custom_resolver_sees_each_definition_once() -> Result<()> {
    let root = make_target_path("examples.minimal", &fixture_config())?;
    let resolver = CountingResolver {
        inner: FileResolver::new()?,
        calls: Vec::new(),
    };
    let mut builder = TreeBuilder::new(resolver);
    let site = builder.build(&root)?;
    assert_eq!(site.len(), 3);

    let calls = &builder.resolver().calls;
    assert_eq!(calls.len(), 3);
    assert!(calls[0].ends_with("minimal/stories.json"));
    assert!(calls[2].ends_with("components/heading/stories.json"));
    Ok(())
}
