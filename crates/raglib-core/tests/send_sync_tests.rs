//! Tests to verify that public types shared across threads are Send + Sync.

use raglib_core::config::{OverrideRule, PatchTarget, TechniqueSpec};
use raglib_core::*;

const fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_domain_types_are_send_sync() {
    assert_send_sync::<TechniqueName>();
    assert_send_sync::<Category>();
    assert_send_sync::<Version>();
    assert_send_sync::<TechniqueMetadata>();
}

#[test]
fn test_component_types_are_send_sync() {
    assert_send_sync::<ComponentContract>();
    assert_send_sync::<ComponentConfig>();
    assert_send_sync::<ApplyOutcome>();
    assert_send_sync::<Document>();
    assert_send_sync::<std::sync::Arc<dyn Component>>();
}

#[test]
fn test_config_types_are_send_sync() {
    assert_send_sync::<DocsConfig>();
    assert_send_sync::<PatchTarget>();
    assert_send_sync::<OverrideRule>();
    assert_send_sync::<TechniqueSpec>();
    assert_send_sync::<BenchmarkReport>();
}

#[test]
fn test_error_is_send_sync() {
    assert_send_sync::<Error>();
}
