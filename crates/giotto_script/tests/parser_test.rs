use giotto_script::{ScriptParser, ValidationErrorKind};
use serde_json::json;

fn position(order: &[String], id: &str) -> usize {
    order
        .iter()
        .position(|entry| entry == id)
        .unwrap_or_else(|| panic!("{} missing from execution order", id))
}

#[test]
fn end_to_end_cutscene_script_compiles() {
    let parser = ScriptParser::new();
    let graph = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"bg","prompt":"p","size":"1024x768","model":"flux-schnell"},
                {"type":"asset_subtitle","id":"n","text":"t","voice_gender":"neutral",
                 "voice_tone":"epic","voice_pace":"normal","model":"openai-tts"},
                {"type":"asset_cutscene","id":"cs","shots":[
                    {"image_id":"bg","subtitle_id":"n","duration":5,"animation":"none"}
                ]},
                {"type":"play_cutscene","cutscene_id":"cs"}
            ]}"#,
        )
        .expect("script should compile");

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.asset_actions(), ["bg", "n", "cs"]);
    assert_eq!(graph.game_actions(), ["play_cutscene_3"]);

    let order = graph.execution_order();
    assert!(position(order, "bg") < position(order, "cs"));
    assert!(position(order, "n") < position(order, "cs"));
    assert!(position(order, "cs") < position(order, "play_cutscene_3"));
}

#[test]
fn every_dependency_precedes_its_dependent() {
    let parser = ScriptParser::new();
    let graph = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"img_a","prompt":"a","size":"1024x1024","model":"flux-schnell"},
                {"type":"asset_image","id":"img_b","prompt":"b","size":"1024x1024","model":"flux-schnell"},
                {"type":"asset_subtitle","id":"line","text":"x","voice_gender":"female",
                 "voice_tone":"calm","voice_pace":"slow","model":"elevenlabs"},
                {"type":"asset_cutscene","id":"scene","shots":[
                    {"image_id":"img_a","subtitle_id":"line","duration":3,"animation":"zoom_in"},
                    {"image_id":"img_b","subtitle_id":"line","duration":4,"animation":"fade"}
                ]},
                {"type":"show_modal","id":"intro","text":"hello","image_id":"img_a"},
                {"type":"play_cutscene","id":"roll","cutscene_id":"scene"}
            ]}"#,
        )
        .expect("script should compile");

    let order = graph.execution_order();
    for (id, node) in graph.nodes() {
        for dependency in node.dependencies() {
            assert!(
                position(order, dependency) < position(order, id),
                "{} should precede {}",
                dependency,
                id
            );
        }
    }
}

#[test]
fn build_time_status_reflects_dependencies() {
    let parser = ScriptParser::new();
    let graph = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"bg","prompt":"p","size":"1024x768","model":"flux-schnell"},
                {"type":"show_modal","id":"m","text":"t","image_id":"bg"}
            ]}"#,
        )
        .unwrap();

    assert_eq!(
        graph.node("bg").unwrap().status(),
        giotto_script::NodeStatus::Ready
    );
    assert_eq!(
        graph.node("m").unwrap().status(),
        giotto_script::NodeStatus::Pending
    );
    assert!(graph.node("bg").unwrap().dependents().contains("m"));
}

#[test]
fn reference_cycle_reports_the_full_cycle() {
    let parser = ScriptParser::new();
    let errors = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_subtitle","id":"n","text":"t","voice_gender":"male",
                 "voice_tone":"somber","voice_pace":"normal","model":"openai-tts"},
                {"type":"asset_cutscene","id":"a","shots":[
                    {"image_id":"b","subtitle_id":"n","duration":2,"animation":"none"}]},
                {"type":"asset_cutscene","id":"b","shots":[
                    {"image_id":"c","subtitle_id":"n","duration":2,"animation":"none"}]},
                {"type":"asset_cutscene","id":"c","shots":[
                    {"image_id":"a","subtitle_id":"n","duration":2,"animation":"none"}]}
            ]}"#,
        )
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationErrorKind::CircularDependency);
    assert!(errors[0].message.contains("a -> b -> c -> a"));
}

#[test]
fn duplicate_ids_yield_one_error_per_extra_occurrence() {
    let parser = ScriptParser::new();

    let two = parser
        .parse(
            r#"{"actions":[
                {"type":"show_modal","id":"x","text":"a"},
                {"type":"show_modal","id":"x","text":"b"}
            ]}"#,
        )
        .unwrap_err();
    assert_eq!(two.len(), 1);
    assert_eq!(two[0].kind, ValidationErrorKind::DuplicateId);

    let three = parser
        .parse(
            r#"{"actions":[
                {"type":"show_modal","id":"x","text":"a"},
                {"type":"show_modal","id":"x","text":"b"},
                {"type":"show_modal","id":"x","text":"c"}
            ]}"#,
        )
        .unwrap_err();
    assert_eq!(three.len(), 2);
}

#[test]
fn unknown_reference_offers_bounded_suggestions() {
    let parser = ScriptParser::new();
    let errors = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"background","prompt":"p","size":"1024x768","model":"flux-schnell"},
                {"type":"show_modal","id":"m","text":"t","image_id":"backgroud"}
            ]}"#,
        )
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationErrorKind::UnknownReference);
    assert_eq!(errors[0].suggestions, vec!["background".to_string()]);
    assert!(errors[0].message.contains("'backgroud'"));
    assert!(errors[0].message.contains("background"));
    assert_eq!(errors[0].action_id.as_deref(), Some("m"));
}

#[test]
fn distant_unknown_reference_gets_no_suggestions() {
    let parser = ScriptParser::new();
    let errors = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"background","prompt":"p","size":"1024x768","model":"flux-schnell"},
                {"type":"show_modal","text":"t","image_id":"qz"}
            ]}"#,
        )
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(errors[0].suggestions.is_empty());
}

#[test]
fn cutscene_shot_with_missing_image_fails_validation() {
    let parser = ScriptParser::new();
    let errors = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_subtitle","id":"n","text":"t","voice_gender":"neutral",
                 "voice_tone":"epic","voice_pace":"normal","model":"openai-tts"},
                {"type":"asset_cutscene","id":"cs","shots":[
                    {"image_id":"missing_shot","subtitle_id":"n","duration":5,"animation":"none"}
                ]}
            ]}"#,
        )
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationErrorKind::UnknownReference);
    assert!(errors[0].message.contains("missing_shot"));
}

#[test]
fn schema_errors_are_reported_before_semantic_checks() {
    let parser = ScriptParser::new();
    // Both a malformed field and an unknown reference; only the schema
    // error should come back.
    let errors = parser
        .parse(
            r#"{"actions":[
                {"type":"asset_image","id":"bg","prompt":42,"size":"1024x768","model":"flux-schnell"},
                {"type":"play_cutscene","cutscene_id":"nowhere"}
            ]}"#,
        )
        .unwrap_err();

    assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::Schema));
    assert_eq!(errors[0].path.as_deref(), Some("actions[0].prompt"));
}

#[test]
fn invalid_json_yields_a_single_schema_error() {
    let parser = ScriptParser::new();
    let errors = parser.parse("{\"actions\": [").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationErrorKind::Schema);
}

#[test]
fn condition_and_target_paths_are_checked() {
    let parser = ScriptParser::new();
    let errors = parser
        .parse(
            r#"{"actions":[
                {"type":"when_then","condition":".broken","then":{"type":"reason","text":"r"}},
                {"type":"add_feature","target":"world..double"},
                {"type":"remove_feature","target":"trailing."}
            ]}"#,
        )
        .unwrap_err();

    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].kind, ValidationErrorKind::InvalidCondition);
    assert_eq!(errors[1].kind, ValidationErrorKind::InvalidTarget);
    assert_eq!(errors[2].kind, ValidationErrorKind::InvalidTarget);
}

#[test]
fn valid_paths_are_accepted() {
    let parser = ScriptParser::new();
    let graph = parser
        .parse(
            r#"{"actions":[
                {"type":"when_then","condition":"world.gates.north_open",
                 "then":{"type":"reason","text":"r"}},
                {"type":"add_feature","target":"player.abilities.glide","value":{"level":2}},
                {"type":"add_feature","target":"flag"}
            ]}"#,
        )
        .unwrap();
    assert_eq!(graph.len(), 3);
}

#[test]
fn reason_actions_join_neither_partition() {
    let parser = ScriptParser::new();
    let graph = parser
        .parse(
            r#"{"actions":[
                {"type":"reason","text":"sets the mood"},
                {"type":"add_feature","id":"f","target":"world.flag"}
            ]}"#,
        )
        .unwrap();

    assert_eq!(graph.len(), 2);
    assert!(graph.asset_actions().is_empty());
    assert_eq!(graph.game_actions(), ["f"]);
    assert!(graph.contains("reason_0"));
    assert_eq!(position(graph.execution_order(), "reason_0"), 0);
}

#[test]
fn large_scripts_compile_with_correct_ordering() {
    let mut actions = Vec::new();
    for i in 0..500 {
        actions.push(json!({
            "type": "asset_image",
            "id": format!("img_{}", i),
            "prompt": format!("scene {}", i),
            "size": "1024x1024",
            "model": "flux-schnell"
        }));
    }
    for i in 0..500 {
        actions.push(json!({
            "type": "show_modal",
            "id": format!("modal_{}", i),
            "text": format!("scene {}", i),
            "image_id": format!("img_{}", i)
        }));
    }

    let parser = ScriptParser::new();
    let graph = parser
        .parse_value(&json!({ "actions": actions }))
        .expect("script should compile");

    assert_eq!(graph.len(), 1000);
    assert_eq!(graph.asset_actions().len(), 500);
    assert_eq!(graph.game_actions().len(), 500);

    let order = graph.execution_order();
    let positions: std::collections::HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(pos, id)| (id.as_str(), pos))
        .collect();
    for i in 0..500 {
        let img = format!("img_{}", i);
        let modal = format!("modal_{}", i);
        assert!(positions[img.as_str()] < positions[modal.as_str()]);
    }
}

#[test]
fn nested_asset_ids_are_referenceable_but_not_scheduled() {
    let parser = ScriptParser::new();
    let graph = parser
        .parse(
            r#"{"actions":[
                {"type":"add_player_choice","id":"fork","prompt":"pick","options":[
                    {"text":"left","reactions":[
                        {"type":"show_modal","id":"left_modal","text":"went left"}
                    ]}
                ]},
                {"type":"show_modal","id":"outer","text":"t","subtitle_id":"left_modal"}
            ]}"#,
        )
        .unwrap();

    // The nested modal's id resolves, but only top-level actions are nodes.
    assert_eq!(graph.len(), 2);
    assert!(graph.contains("fork"));
    assert!(graph.contains("outer"));
    assert!(!graph.contains("left_modal"));
}
