use setupgen::config::ConfigDocument;
use tempfile::TempDir;

const DOCUMENT: &str = r#"
# Sample profile
project:
  name: "my-project"
  description: "Orders service"  # shown in README
  quoted-inner: "it's \"fine\""
server:
  port: 8080
  secure: true
  ratio: 0.75
empty-value:
languages:
  - "java"
  - "typescript"
  - "python"
no-items: []
database:
  host: "localhost"
  port: 5432
"#;

#[test]
fn test_missing_key_is_empty() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("does-not-exist", None), "");
    assert_eq!(doc.read_scalar("name", Some("does-not-exist")), "");
    assert!(doc.read_list("does-not-exist").is_empty());
}

#[test]
fn test_quoted_value_is_unquoted() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("name", Some("project")), "my-project");
}

#[test]
fn test_inline_comment_is_stripped() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("description", Some("project")), "Orders service");
}

#[test]
fn test_single_quotes_are_preserved() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("quoted-inner", None), "it's \"fine\"");
}

#[test]
fn test_scalars_keep_their_text() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("port", Some("server")), "8080");
    assert_eq!(doc.read_scalar("secure", Some("server")), "true");
    assert_eq!(doc.read_scalar("ratio", Some("server")), "0.75");
    assert_eq!(doc.read_scalar("empty-value", None), "");
}

#[test]
fn test_nested_lookup() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("host", Some("database")), "localhost");
    assert_eq!(doc.read_scalar("port", Some("database")), "5432");
}

#[test]
fn test_mapping_is_not_a_scalar() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_scalar("database", None), "");
    assert_eq!(doc.read_scalar("languages", None), "");
}

#[test]
fn test_list_lookup() {
    let doc = ConfigDocument::parse(DOCUMENT);
    assert_eq!(doc.read_list("languages"), vec!["java", "typescript", "python"]);
    assert!(doc.read_list("no-items").is_empty());
    assert!(doc.read_list("empty-value").is_empty());
    assert!(doc.read_list("project").is_empty());
}

#[test]
fn test_malformed_document_degrades_to_empty() {
    let content = "project:\n  name: [unterminated\n";
    assert!(ConfigDocument::try_parse(content).is_err());

    let doc = ConfigDocument::parse(content);
    assert_eq!(doc.read_scalar("name", Some("project")), "");
    assert!(doc.placeholders().is_empty());
}

#[test]
fn test_empty_and_non_mapping_documents() {
    for content in ["", "   \n", "# only a comment\n", "- a\n- b\n", "plain"] {
        let doc = ConfigDocument::parse(content);
        assert_eq!(doc.read_scalar("a", None), "", "content: {content:?}");
        assert!(doc.read_list("a").is_empty(), "content: {content:?}");
    }
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("setup-config.demo.yaml");
    std::fs::write(&path, DOCUMENT).unwrap();

    let doc = ConfigDocument::load(&path).unwrap();
    assert_eq!(doc.read_scalar("name", Some("project")), "my-project");

    assert!(ConfigDocument::load(temp_dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_placeholders() {
    let doc = ConfigDocument::parse(DOCUMENT);
    let placeholders = doc.placeholders();

    assert_eq!(placeholders["PROJECT_NAME"], "my-project");
    assert_eq!(placeholders["SERVER_PORT"], "8080");
    assert_eq!(placeholders["DATABASE_PORT"], "5432");
    assert_eq!(placeholders["LANGUAGES"], "java, typescript, python");
    assert_eq!(placeholders["NO_ITEMS"], "");
    assert_eq!(placeholders["EMPTY_VALUE"], "");
}
