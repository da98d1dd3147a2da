//! Integration tests for system prompt construction

use serde_json::json;

use studio_relay::prompt::{LIVE_STATS_HEADER, PromptBuilder};

#[test]
fn test_non_mapping_stats_render_like_absent_stats() {
    let builder = PromptBuilder::default();
    let baseline = builder.build(None);

    for stats in [
        json!(null),
        json!([{"visits": 1}]),
        json!("Shimmer Bay"),
        json!(42),
        json!(true),
    ] {
        assert_eq!(builder.build(Some(&stats)), baseline, "stats: {stats}");
    }
}

#[test]
fn test_only_missing_fields_use_placeholder() {
    let stats = json!({
        "Shimmer Bay": {"visits": "1.2M"},
        "Neon Drift": {"playing": "40 playing"},
        "Tidepool": {"visits": 0, "playing": ""}
    });

    let prompt = PromptBuilder::default().build(Some(&stats));

    assert!(prompt.contains("• Shimmer Bay: 1.2M visits, N/A\n"));
    assert!(prompt.contains("• Neon Drift: N/A visits, 40 playing\n"));
    assert!(prompt.contains("• Tidepool: 0 visits, N/A\n"));
}

#[test]
fn test_stats_lines_follow_caller_order() {
    let stats = json!({
        "Zeta": {"visits": 1, "playing": 2},
        "Alpha": {"visits": 3, "playing": 4}
    });

    let prompt = PromptBuilder::default().build(Some(&stats));
    let zeta = prompt.find("• Zeta").unwrap();
    let alpha = prompt.find("• Alpha").unwrap();

    assert!(prompt.contains(LIVE_STATS_HEADER));
    assert!(zeta < alpha);
}

#[test]
fn test_custom_placeholder_and_template() {
    let builder = PromptBuilder::new("Studio bot.{live_stats}\nBe brief.", "unknown");
    let prompt = builder.build(Some(&json!({"Orbit": {}})));

    assert_eq!(
        prompt,
        format!("Studio bot.\n\n{LIVE_STATS_HEADER}\n• Orbit: unknown visits, unknown\n\nBe brief.")
    );
}
