use scopedoc::{DocNode, ParseOptions, parse_module};

fn extract(code: &str) -> DocNode {
    parse_module(code, &ParseOptions::default())
        .expect("Source should extract")
        .tree
}

fn doc_of(code: &str, name: &str) -> String {
    let tree = extract(code);
    tree.child(name)
        .unwrap_or_else(|| panic!("`{name}` should be documented"))
        .document
        .doc
        .clone()
}

#[test]
fn test_module_id_names_root() {
    println!("\n=== TEST: Module id names the root ===");

    let output = parse_module("", &ParseOptions::default().with_id("widgets.js")).unwrap();
    let root = output.tree;

    assert_eq!(root.name.as_deref(), Some("widgets"));
    assert_eq!(root.id.as_deref(), Some("widgets.js"));
    assert_eq!(root.document.doc_type.as_deref(), Some("module"));
    assert!(root.children.is_empty());

    println!("✓ Root named after its id");
}

#[test]
fn test_plain_block_comment_is_not_documentation() {
    println!("\n=== TEST: /**/ is not a doc comment ===");

    let tree = extract("/**/\nvar blah = {};");
    assert!(tree.children.is_empty());

    let tree = extract("/* regular */\nvar blah = {};\n// line\nvar other = 1;");
    assert!(tree.children.is_empty());
}

#[test]
fn test_empty_doc_comment_yields_empty_doc() {
    println!("\n=== TEST: Empty doc comments produce an empty string ===");

    assert_eq!(doc_of("/** */\nvar a;", "a"), "");
    assert_eq!(doc_of("/***/\nvar a;", "a"), "");
    assert_eq!(doc_of("/**\n */\nvar a;", "a"), "");

    let json = serde_json::to_value(extract("/** */\nvar a;")).unwrap();
    assert_eq!(json["children"]["a"]["doc"], "");
}

#[test]
fn test_comment_margins_are_trimmed() {
    println!("\n=== TEST: Comment margins ===");

    let cases = [
        ("/**\n * hi\n */\nvar a;", "hi"),
        ("/**\n    hi\n*/\nvar a;", "hi"),
        ("/** leader\n     - hi\n*/\nvar a;", "leader\n - hi"),
        ("/**\n\thi\n*/\nvar a;", "hi"),
        ("/** leader\n\t - hi\n*/\nvar a;", "leader\n - hi"),
        ("  /**\n   * indented\n   */\n  var a;", "indented"),
    ];

    for (code, expected) in cases {
        let actual = doc_of(code, "a");
        println!("  {code:?} -> {actual:?}");
        assert_eq!(actual, expected, "for {code:?}");
    }
}

#[test]
fn test_declaration_names_are_inferred() {
    println!("\n=== TEST: Names inferred from declarations ===");

    let tree = extract("/***/\nvar blah = {};");
    let names: Vec<&String> = tree.children.keys().collect();
    assert_eq!(names, vec!["blah"]);
    assert_eq!(tree.child("blah").unwrap().name.as_deref(), Some("blah"));

    let tree = extract("/***/\nexports.blah = {};");
    let names: Vec<&String> = tree.children.keys().collect();
    assert_eq!(names, vec!["blah"]);

    let tree = extract("/** Runs. */\nfunction run() {}\n/** Klass. */\nclass Klass {}");
    assert_eq!(tree.child("run").unwrap().document.doc, "Runs.");
    assert_eq!(tree.child("Klass").unwrap().document.doc, "Klass.");
}

#[test]
fn test_name_tag_overrides_inferred_name() {
    println!("\n=== TEST: @name overrides the inferred name ===");

    let code = r#"
/** First. */
function first() {}

/**
 * Second.
 * @name overrideName
 */
function second() {}
"#;

    let tree = extract(code);
    assert!(tree.child("second").is_none());
    let renamed = tree.child("overrideName").expect("renamed child");
    assert_eq!(renamed.name.as_deref(), Some("overrideName"));
    assert_eq!(renamed.document.doc, "Second.");
    assert_eq!(tree.child("first").unwrap().document.doc, "First.");
}

#[test]
fn test_nested_declarations_follow_documented_scopes() {
    println!("\n=== TEST: Nesting and transparency ===");

    let code = r#"
var config = {
  /** Server section. */
  server: {
    /** Port to bind. */
    port: 8080
  }
};

/** Widget namespace. */
var widgets = {
  /** Makes a button. */
  button: function () {}
};
"#;

    let tree = extract(code);

    // `config` is undocumented, so `server` is hoisted to the root
    assert!(tree.child("config").is_none());
    let port = tree.descendant(&["server", "port"]).expect("server.port");
    assert_eq!(port.document.doc, "Port to bind.");

    let button = tree.descendant(&["widgets", "button"]).expect("widgets.button");
    assert_eq!(button.document.doc, "Makes a button.");
}

#[test]
fn test_class_members_live_on_prototype() {
    println!("\n=== TEST: Class members ===");

    let code = r#"
/** A shape. */
class Shape {
  /** Area of the shape. */
  area() {}

  /** Builds a unit shape. */
  static unit() {}
}
"#;

    let tree = extract(code);
    let shape = tree.child("Shape").expect("Shape");
    // `prototype` is undocumented and therefore transparent
    assert_eq!(shape.child("area").unwrap().document.doc, "Area of the shape.");
    assert_eq!(shape.child("unit").unwrap().document.doc, "Builds a unit shape.");
}

#[test]
fn test_tags_fill_the_document() {
    println!("\n=== TEST: Tag dispatch end to end ===");

    let code = r#"
/**
 * Adds numbers.
 *
 * @param {number} a first operand
 * @params {number} rest more operands
 * @returns {number} the sum
 * @throws {TypeError} on bad input
 * @example
 *   add(1, 2);
 * @see subtract
 * @author Jane Roe (https://example.com) <jane@example.com>
 * @requires math
 * @deprecated
 */
function add(a) {}
"#;

    let tree = extract(code);
    let add = &tree.child("add").expect("add").document;

    assert_eq!(add.doc, "Adds numbers.");
    assert_eq!(add.params.len(), 2);
    assert_eq!(add.params[0].name, "a");
    assert_eq!(add.params[0].param_type.as_deref(), Some("number"));
    assert_eq!(add.params[0].doc.as_deref(), Some("first operand"));
    assert!(!add.params[0].variadic);
    assert_eq!(add.params[1].name, "rest");
    assert!(add.params[1].variadic);

    let returns = add.returns.as_ref().expect("returns");
    assert_eq!(returns.value_type.as_deref(), Some("number"));
    assert_eq!(returns.doc.as_deref(), Some("the sum"));

    assert_eq!(add.throws.len(), 1);
    assert_eq!(add.throws[0].value_type.as_deref(), Some("TypeError"));
    assert_eq!(add.examples.len(), 1);
    assert!(add.examples[0].contains("add(1, 2);"));
    assert_eq!(add.see, vec!["subtract".to_string()]);
    assert_eq!(add.requires, vec!["math".to_string()]);

    let author = add.author.as_ref().expect("author");
    assert_eq!(author.name, "Jane Roe");
    assert_eq!(author.url.as_deref(), Some("https://example.com"));
    assert_eq!(author.email.as_deref(), Some("jane@example.com"));

    assert!(add.flags.deprecated);
    assert!(add.errors.is_empty(), "unexpected errors: {:?}", add.errors);
}

#[test]
fn test_structural_problems_are_diagnostics() {
    println!("\n=== TEST: Structural diagnostics stay on the document ===");

    let code = r#"
/**
 * {Array Broken type.
 * @frobnicate now
 * @constructor with extra words
 */
function Thing() {}
"#;

    let tree = extract(code);
    let thing = &tree.child("Thing").expect("Thing").document;

    assert!(thing.flags.constructor);
    assert_eq!(thing.js_type, None);
    assert!(thing.errors.iter().any(|e| e.starts_with("Unmatched `{`")));
    assert!(thing.errors.contains(&"Did not recognize \"frobnicate\" tag.".to_string()));
    assert!(thing.errors.contains(&"`@constructor` tag had superfluous text".to_string()));
}

#[test]
fn test_leading_type_moves_to_js_type() {
    println!("\n=== TEST: Leading {{Type}} in prose ===");

    let tree = extract("/** {Object.<string, {id: number}>} Registry of users. */\nvar users = {};");
    let users = &tree.child("users").unwrap().document;
    assert_eq!(users.js_type.as_deref(), Some("Object.<string, {id: number}>"));
    assert_eq!(users.doc, "Registry of users.");
}

#[test]
fn test_immediately_invoked_function_is_traversed() {
    println!("\n=== TEST: IIFE bodies are scanned ===");

    let code = r#"
(function () {
  /** Hidden helper. */
  function helper() {}
})();
"#;

    let tree = extract(code);
    assert_eq!(tree.child("helper").unwrap().document.doc, "Hidden helper.");
}

#[test]
fn test_serialized_tree_shape() {
    println!("\n=== TEST: JSON output shape ===");

    let code = "/**\n * Greets.\n * @param {string} who target\n */\nfunction greet(who) {}\n";
    let output = parse_module(code, &ParseOptions::default().with_id("greeting.js")).unwrap();
    let json = serde_json::to_value(&output.tree).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "name": "greeting",
            "id": "greeting.js",
            "type": "module",
            "doc": "",
            "children": {
                "greet": {
                    "name": "greet",
                    "doc": "Greets.",
                    "params": [{ "name": "who", "type": "string", "doc": "target" }],
                    "line": 1
                }
            }
        })
    );
}

#[test]
fn test_deeply_nested_code_still_extracts() {
    println!("\n=== TEST: Deep nesting yields a tree and diagnostics ===");

    let terms: Vec<String> = (0..10_000).map(|i| format!("'s{i}'")).collect();
    let code = format!("/** Big. */\nvar big = {};\n", terms.join(" + "));
    let output = parse_module(&code, &ParseOptions::default()).expect("long chains extract");
    assert_eq!(output.tree.child("big").unwrap().document.doc, "Big.");
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.message.ends_with("nested deeper than 200 levels"))
    );

    let depth = 5_000;
    let code = format!(
        "var x = {}1{};\n/** After. */\nvar after = 1;\n",
        "[".repeat(depth),
        "]".repeat(depth)
    );
    let output = parse_module(&code, &ParseOptions::default()).expect("deep arrays extract");
    assert_eq!(output.tree.child("after").unwrap().document.doc, "After.");
    assert!(!output.diagnostics.is_empty());

    println!("✓ {} diagnostics for the nested arrays", output.diagnostics.len());
}
