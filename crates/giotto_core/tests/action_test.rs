use giotto_core::{Action, ActionDocument, AssetKind, CostTracker};

#[test]
fn deeply_nested_document_round_trips() {
    let source = r#"{"actions":[
        {"type":"add_player_choice","id":"fork","prompt":"Which way?","options":[
            {"text":"Left","reactions":[
                {"type":"when_then","condition":"gate.open","then":
                    {"type":"add_player_choice","id":"inner","prompt":"Again?","options":[
                        {"text":"Yes","reactions":[
                            {"type":"play_cutscene","cutscene_id":"cs"}
                        ]}
                    ]}}
            ]},
            {"text":"Right"}
        ]}
    ]}"#;

    let doc: ActionDocument = serde_json::from_str(source).unwrap();
    let round_tripped: ActionDocument =
        serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
    assert_eq!(doc, round_tripped);

    // The walk reaches the innermost action.
    let mut types = Vec::new();
    doc.visit(&mut |action| types.push(action.action_type()));
    assert_eq!(
        types,
        vec![
            "add_player_choice",
            "when_then",
            "add_player_choice",
            "play_cutscene"
        ]
    );
    assert_eq!(doc.declared_ids(), vec!["fork", "inner"]);
}

#[test]
fn asset_partition_matches_tag_prefix() {
    let doc: ActionDocument = serde_json::from_str(
        r#"{"actions":[
            {"type":"asset_image","prompt":"p","size":"1024x1024","model":"flux-dev"},
            {"type":"asset_subtitle","text":"t","voice_gender":"male","voice_tone":"urgent",
             "voice_pace":"fast","model":"elevenlabs"},
            {"type":"asset_cutscene","shots":[]},
            {"type":"reason","text":"note"},
            {"type":"add_feature","target":"a.b"}
        ]}"#,
    )
    .unwrap();

    let flags: Vec<bool> = doc.actions.iter().map(Action::is_asset).collect();
    assert_eq!(flags, vec![true, true, true, false, false]);
}

#[test]
fn cost_tracker_accumulates_and_groups() {
    let mut costs = CostTracker::default();
    assert!(costs.is_empty());

    costs.record(AssetKind::Image, "flux-dev", 1.0, 0.025);
    costs.record(AssetKind::Subtitle, "openai-tts", 200.0, 0.003);
    costs.record(AssetKind::Cutscene, "assembly", 2.0, 0.0);

    assert_eq!(costs.len(), 3);
    assert!((costs.total_cost() - 0.028).abs() < 1e-12);

    let breakdown = costs.breakdown();
    assert!((breakdown["subtitle/openai-tts"] - 0.003).abs() < 1e-12);
    assert_eq!(breakdown["cutscene/assembly"], 0.0);
}
