// Configuration unit tests
// Config-driven wiring of the pipeline pieces

use carousel::config::{CacheKind, Config};
use carousel::engine::{Color, DecodeLimits};
use carousel::source::{FetchStrategy, SourcePolicy, SourceValidator};

#[test]
fn test_default_config_matches_parameter_defaults() {
    let config = Config::default();
    let params = config.default_params().unwrap();

    assert_eq!(params, carousel::CarouselParams::default());
    assert_eq!(config.fetch.strategy(), FetchStrategy::Sequential);
    assert_eq!(config.security.decode_limits(), DecodeLimits::default());
    assert_eq!(config.cache.kind, CacheKind::Memory);
}

#[test]
fn test_policy_from_config() {
    let yaml = r#"
security:
  allowed_sources:
    - "https://cdn.example.com/*"
  blocked_sources:
    - "*.gif"
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    let policy = SourcePolicy::from_config(&config.security);

    assert!(policy.validate("https://cdn.example.com/a.png"));
    assert!(!policy.validate("https://cdn.example.com/a.gif"));
    assert!(!policy.validate("https://other.example.com/a.png"));
    assert!(!policy.validate("file:///cdn.example.com/a.png"));
}

#[test]
fn test_colors_from_config() {
    let yaml = "carousel:\n  background_color: \"102030\"\n  more_text_color: \"#a0b0c0\"\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    let params = config.default_params().unwrap();

    assert_eq!(params.background_color, Color::new(0x10, 0x20, 0x30));
    assert_eq!(params.more_text_color, Color::new(0xa0, 0xb0, 0xc0));
}
