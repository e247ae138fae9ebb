use retrieval_core::RetrievalSystemConfig;

#[test]
fn defaults_cover_every_subsystem() {
    let config = RetrievalSystemConfig::from_toml("").unwrap();
    assert_eq!(config.vector.top_k, 10);
    assert_eq!(config.graph.top_k, 10);
    assert!(config.graph.enable_multi_hop);
    assert_eq!(config.fusion.method, "weighted_sum");
    assert!(config.intent.enabled);
    assert!(!config.rerank.use_model);
    assert_eq!(config.cascade.fallback_strategy, "cascade");
}

#[test]
fn malformed_toml_is_a_config_error() {
    let err = RetrievalSystemConfig::from_toml("not = [valid").unwrap_err();
    assert!(err.to_string().contains("configuration error"));
}
