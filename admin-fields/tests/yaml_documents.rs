//! Integration tests for configuring a registry from YAML documents on disk

use admin_fields::{Bindings, FieldRegistry, FieldSource, FieldTypeCatalog, FieldsConfig, ModelSchema};
use tempfile::TempDir;

const SCHEMA: &str = r#"
name: article
properties:
  - name: id
    type: integer
    serial: true
  - name: title
    type: string
    length: 255
  - name: body
    type: text
  - name: author_id
    type: integer
    foreign_key: true
  - name: author
    type: belongs_to_association
    references: user
  - name: published_on
    type: date
    nullable: true
  - name: tags
    type: has_many_association
    references: tag
"#;

const LIST_VIEW: &str = r#"
fields:
  - name: title
    label: Headline
  - name: author
  - name: published_on
    label: Published
  - name: word_count
    type: integer
    read_only: true
  - name: body
    type: string
    add_to_section: false
    visible: false
"#;

async fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    tokio::fs::write(&path, content).await.unwrap();
    path
}

#[test_log::test(tokio::test)]
async fn list_view_from_documents() {
    let tmp = TempDir::new().unwrap();
    let schema_path = write(&tmp, "article.yaml", SCHEMA).await;
    let config_path = write(&tmp, "article.list.yaml", LIST_VIEW).await;

    let schema = ModelSchema::load(&schema_path).await.unwrap();
    let config = FieldsConfig::load(&config_path).await.unwrap();

    let mut registry =
        FieldRegistry::from_model(FieldSource::new(schema, FieldTypeCatalog::with_builtins()));
    config.apply(&mut registry).unwrap();

    let active: Vec<&str> = registry.fields().iter().map(|f| f.name()).collect();
    assert_eq!(active, ["title", "author", "published_on", "word_count"]);

    let title = registry.get("title").unwrap();
    assert_eq!(title.label(), "Headline");
    assert_eq!(title.properties().unwrap().length, Some(255));

    let word_count = registry.get("word_count").unwrap();
    assert!(word_count.is_virtual());
    assert!(word_count.is_read_only());

    let body = registry.get("body").unwrap();
    assert_eq!(body.field_type(), "string");
    assert!(!body.is_defined());
    assert_eq!(registry.fields_of_type("text").len(), 0);
}

#[test_log::test(tokio::test)]
async fn exclusion_document_carves_out_of_all_fields() {
    let tmp = TempDir::new().unwrap();
    let config_path = write(&tmp, "article.edit.yaml", "exclude: [id, tags]\n").await;

    let schema = ModelSchema::from_yaml(SCHEMA).unwrap();
    let config = FieldsConfig::load(&config_path).await.unwrap();

    let mut registry = FieldRegistry::from_model(FieldSource::new(
        schema,
        FieldTypeCatalog::with_builtins(),
    ))
    .with_bindings(Bindings::new().with("view", "edit"));
    config.apply(&mut registry).unwrap();

    let active: Vec<&str> = registry.fields().iter().map(|f| f.name()).collect();
    assert_eq!(
        active,
        ["title", "body", "author_id", "author", "published_on"]
    );

    // author_id is active but still hidden as a foreign key.
    let visible: Vec<&str> = registry.visible_fields().iter().map(|b| b.name()).collect();
    assert_eq!(visible, ["title", "body", "author", "published_on"]);
}
