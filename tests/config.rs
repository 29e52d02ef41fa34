// tests/config.rs
#![allow(clippy::unwrap_used)]

use codesense_core::config::Config;
use codesense_core::error::CodesenseError;
use codesense_core::syntax::{Dialect, GrammarFeature};
use std::fs;
use tempfile::TempDir;

#[test]
fn loads_overrides_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codesense.toml");
    fs::write(
        &path,
        r#"
[suggest]
max_suggestions = 12
min_confidence = 0.75

[parse]
dialect = "typed"
features = ["jsx", "decorators"]

[corpus]
exclude = ["vendor"]
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let options = config.suggest_options();
    assert_eq!(options.max_suggestions, 12);
    assert!((options.min_confidence - 0.75).abs() < f64::EPSILON);
    assert_eq!(options.build.dialect, Some(Dialect::Typed));
    assert!(options.build.has_feature(GrammarFeature::Decorators));
    assert_eq!(config.corpus.exclude, vec!["vendor".to_string()]);
    assert!(config.corpus.extensions.contains(&"ts".to_string()));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, CodesenseError::Io { .. }));
}

#[test]
fn malformed_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codesense.toml");
    fs::write(&path, "[suggest\nmax_suggestions = ").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, CodesenseError::Config { .. }));
    assert!(err.to_string().contains("codesense.toml"));
}

#[test]
fn wrong_field_type_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codesense.toml");
    fs::write(&path, "[suggest]\nmax_suggestions = \"many\"\n").unwrap();
    assert!(matches!(
        Config::load_from(&path).unwrap_err(),
        CodesenseError::Config { .. }
    ));
}
