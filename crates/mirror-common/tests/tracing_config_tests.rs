use super::*;

#[test]
fn test_log_format_parse() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse(" text "), LogFormat::Text);
    assert_eq!(LogFormat::parse("bogus"), LogFormat::Text);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
}

#[test]
fn test_presets_expand_to_engine_targets() {
    assert_eq!(LogPreset::parse("Cache"), Some(LogPreset::Cache));
    assert_eq!(LogPreset::parse("mirror_types=debug"), None);
    assert_eq!(LogPreset::Cache.directives(), "mirror_types=debug");
    assert_eq!(LogPreset::Queries.directives(), "mirror::query_json=trace");
    assert_eq!(
        LogPreset::All.directives(),
        "mirror_types=trace,mirror::query_json=trace"
    );
}

#[test]
fn test_resolve_prefers_mirror_log() {
    assert_eq!(TracingConfig::resolve(None, None, Some("json")), None);

    let config = TracingConfig::resolve(Some("queries"), Some("debug"), Some("json")).unwrap();
    assert_eq!(config.directives, "mirror::query_json=trace");
    assert_eq!(config.format, LogFormat::Json);

    let config = TracingConfig::resolve(Some("mirror_types::relations=trace"), None, None).unwrap();
    assert_eq!(config.directives, "mirror_types::relations=trace");
    assert_eq!(config.format, LogFormat::Text);

    // Preset names are not expanded from RUST_LOG.
    let config = TracingConfig::resolve(None, Some("cache"), Some("tree")).unwrap();
    assert_eq!(config.directives, "cache");
    assert_eq!(config.format, LogFormat::Tree);
}

#[test]
fn test_filter_keeps_valid_directives() {
    let config = TracingConfig::resolve(Some("all"), None, None).unwrap();
    let rendered = config.filter().to_string();
    assert!(rendered.contains("mirror_types=trace"));
    assert!(rendered.contains("mirror::query_json=trace"));
}

#[test]
fn test_init_tracing_is_repeatable() {
    init_tracing();
    init_tracing();
}
