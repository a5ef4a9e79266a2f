use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config, Config::default());

    let root = PathBuf::from("/tmp/project");
    assert_eq!(
        config.graph_path_absolute(&root),
        root.join("target/graph.json")
    );
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
graph: build/lineage.json
select:
  - tag:finance
  - +fct_orders
strict: true
lineage:
  include_structural: true
  max_depth: 3
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.graph, "build/lineage.json");
    assert_eq!(config.select, vec!["tag:finance", "+fct_orders"]);
    assert!(config.strict);
    assert!(config.lineage.include_structural);
    assert_eq!(config.lineage.max_depth, Some(3));
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("graph: g.json\nmodels: []");
    assert!(result.is_err());

    let result: Result<Config, _> = serde_yaml::from_str("lineage:\n  depth: 2");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tern.yml"), "graph: out/graph.json\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.graph, "out/graph.json");
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tern.yaml"), "strict: true\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert!(config.strict);
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_missing_path() {
    let err = Config::load(Path::new("/nonexistent/tern.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { ref path } if path.contains("nonexistent")));
}

#[test]
fn test_validate_rejects_empty_graph_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tern.yml");
    std::fs::write(&path, "graph: \"  \"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_validate_rejects_zero_max_depth() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tern.yml");
    std::fs::write(&path, "lineage:\n  max_depth: 0\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    match err {
        CoreError::ConfigInvalid { message } => assert!(message.contains("max_depth")),
        other => panic!("Expected ConfigInvalid, got {other:?}"),
    }
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tern.yml");
    std::fs::write(&path, "select: [unterminated\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::YamlParse(_)));
}
