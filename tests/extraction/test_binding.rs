use scopedoc::parsing::{TagContext, default_registry};
use scopedoc::{DocExtractor, DocNode, ParseOptions, ScopeTree, parse_module};

fn extract_with(code: &str, options: &ParseOptions) -> DocNode {
    parse_module(code, options)
        .expect("Source should extract")
        .tree
}

fn extract(code: &str) -> DocNode {
    extract_with(code, &ParseOptions::default())
}

#[test]
fn test_module_tag_documents_the_root() {
    println!("\n=== TEST: @module documents the root ===");

    let code = r#"/**
 * Widget helpers.
 * @module
 */

/** Makes one. */
function make() {}
"#;

    let tree = extract_with(code, &ParseOptions::default().with_id("widgets.js"));

    assert_eq!(tree.name.as_deref(), Some("widgets"));
    assert_eq!(tree.document.doc, "Widget helpers.");
    assert!(tree.document.flags.module);
    assert_eq!(tree.document.doc_type.as_deref(), Some("module"));
    assert_eq!(tree.child("make").unwrap().document.doc, "Makes one.");
    assert!(tree.document.errors.is_empty());

    // Without an id the synthetic root takes the module document
    let tree = extract(code);
    assert_eq!(tree.name, None);
    assert_eq!(tree.document.doc, "Widget helpers.");
}

#[test]
fn test_member_tag_binds_by_path() {
    println!("\n=== TEST: @member binds to a path ===");

    let code = r#"/** Widget. */
function Widget() {}

/**
 * Renders it.
 * @member Widget#render
 */
"#;

    let tree = extract(code);
    let render = tree.descendant(&["Widget", "render"]).expect("Widget#render");
    assert_eq!(render.name.as_deref(), Some("render"));
    assert_eq!(render.document.doc, "Renders it.");
    assert!(tree.document.errors.is_empty(), "{:?}", tree.document.errors);
}

#[test]
fn test_lends_tag_binds_object_literal_owner() {
    println!("\n=== TEST: @lends ===");

    let code = r#"/** Widget. */
function Widget() {}

/** @lends Widget.prototype */
Widget.prototype = {
  /** Draws. */
  draw: function () {}
};
"#;

    let tree = extract(code);
    let draw = tree
        .descendant(&["Widget", "prototype", "draw"])
        .expect("Widget.prototype.draw");
    assert_eq!(draw.document.doc, "Draws.");
    assert!(tree.document.errors.is_empty(), "{:?}", tree.document.errors);
}

#[test]
fn test_function_tag_with_path() {
    println!("\n=== TEST: @function <path> ===");

    let code = "/**\n * Helper.\n * @function util.helper\n */\n";
    let tree = extract(code);

    // `util` is undocumented, so `helper` is hoisted
    let helper = tree.child("helper").expect("helper");
    assert_eq!(helper.document.doc, "Helper.");
    assert_eq!(helper.document.js_type.as_deref(), Some("Function"));
}

#[test]
fn test_explicit_binding_displaces_positional() {
    println!("\n=== TEST: Explicit binding wins over positional ===");

    let code = "/** First. */\nvar a = 1;\n/**\n * Second.\n * @member a\n */\n";
    let tree = extract(code);

    let a = tree.child("a").expect("a");
    assert_eq!(a.document.doc, "Second.");
    assert_eq!(
        a.document.errors,
        vec!["Replaced documentation for `a` from line 1".to_string()]
    );
    assert_eq!(
        tree.document.errors,
        vec!["Documentation at line 1 for `a` displaced by line 3".to_string()]
    );
}

#[test]
fn test_positional_binding_never_overwrites() {
    println!("\n=== TEST: Second positional document is an orphan ===");

    let tree = extract("/** One. */\n/** Two. */\nvar x = 1;");

    assert_eq!(tree.child("x").unwrap().document.doc, "One.");
    assert_eq!(
        tree.document.errors,
        vec!["Documentation at line 2 for `x` ignored, already documented at line 1".to_string()]
    );
}

#[test]
fn test_trailing_documentation_is_reported() {
    println!("\n=== TEST: Orphans ===");

    let code = "var a;\n/** Trailing. */\n";

    let tree = extract(code);
    assert!(tree.children.is_empty());
    assert_eq!(
        tree.document.errors,
        vec!["Documentation at line 2 is not followed by a declaration".to_string()]
    );

    let quiet = ParseOptions {
        report_orphans: false,
        ..ParseOptions::default()
    };
    let tree = extract_with(code, &quiet);
    assert!(tree.document.errors.is_empty());
}

#[test]
fn test_hidden_documents_are_dropped_quietly() {
    println!("\n=== TEST: @private and @external ===");

    let code = r#"/** @private */
var secret = 1;

/** @external jQuery */
var $ = window.jQuery;

/** Shown. */
var shown = 2;
"#;

    let tree = extract(code);
    let names: Vec<&String> = tree.children.keys().collect();
    assert_eq!(names, vec!["shown"]);
    assert!(tree.document.errors.is_empty());
}

#[test]
fn test_hoisting_collision_keeps_first() {
    println!("\n=== TEST: Hoisted name collision ===");

    let code = r#"var a = {
  /** From a. */
  x: 1
};
var b = {
  /** From b. */
  x: 2
};
"#;

    let tree = extract(code);
    assert_eq!(tree.child("x").unwrap().document.doc, "From a.");
    assert_eq!(
        tree.document.errors,
        vec!["Duplicate documentation for `x` at line 6 ignored, first documented at line 2".to_string()]
    );
}

#[test]
fn test_custom_registry() {
    println!("\n=== TEST: Caller-supplied tag registry ===");

    fn since(text: &str, ctx: &mut TagContext<'_>) {
        ctx.document.see.push(format!("since {}", text.trim()));
    }

    let mut registry = default_registry().clone();
    registry.register("since", since);
    registry.remove("deprecated");

    let code = "/**\n * Old.\n * @since 1.2\n * @deprecated\n */\nvar legacy = 1;";

    let mut extractor = DocExtractor::with_registry(registry).unwrap();
    let output = extractor.parse_module(code, &ParseOptions::default()).unwrap();
    let legacy = &output.tree.child("legacy").unwrap().document;

    assert_eq!(legacy.see, vec!["since 1.2".to_string()]);
    assert!(!legacy.flags.deprecated);
    assert_eq!(
        legacy.errors,
        vec!["Did not recognize \"deprecated\" tag.".to_string()]
    );

    // The shared default is untouched
    let output = parse_module(code, &ParseOptions::default()).unwrap();
    let legacy = &output.tree.child("legacy").unwrap().document;
    assert!(legacy.flags.deprecated);
    assert_eq!(
        legacy.errors,
        vec!["Did not recognize \"since\" tag.".to_string()]
    );
}

#[test]
fn test_seeded_scope_tree_resolves_names() {
    println!("\n=== TEST: Caller-supplied scope tree ===");

    let code = "/** Outer. */\nfunction outer() {\n  /** Shared setting. */\n  setting = 1;\n}\n";

    // A fresh tree creates `setting` inside `outer`
    let tree = extract(code);
    let nested = tree.descendant(&["outer", "setting"]).expect("outer.setting");
    assert_eq!(nested.document.doc, "Shared setting.");

    // A name seeded on the root is found from inside `outer` instead
    let mut scopes = ScopeTree::new();
    let root = scopes.root();
    scopes.lookup_or_create(root, Some("setting"), None);

    let mut extractor = DocExtractor::new().unwrap();
    let output = extractor
        .parse_module_in(code, &mut scopes, &ParseOptions::default())
        .unwrap();
    assert_eq!(output.tree.child("setting").unwrap().document.doc, "Shared setting.");
    assert!(output.tree.child("outer").unwrap().children.is_empty());

    // Reusing the tree keeps the names but not the earlier documents
    let output = extractor
        .parse_module_in("/** Other. */\nvar other = 2;\n", &mut scopes, &ParseOptions::default())
        .unwrap();
    let names: Vec<&String> = output.tree.children.keys().collect();
    assert_eq!(names, vec!["other"]);
    assert!(output.tree.document.errors.is_empty());
    assert!(scopes.lookup(root, "outer").is_some());
}
