//! Tests for ExportService wiring Settings into builder and serializer

use serde_json::json;

use nntree::application::{ApplicationError, ExportService};
use nntree::config::Settings;
use nntree::domain::{AttrValue, CoercionPolicy, TreeError, TreeView};
use nntree::util::testing::{init_test_setup, StubModule};
use nntree::zoo;

#[test]
fn given_resnet18_when_building_then_counts_match_architecture() {
    // Arrange
    init_test_setup();
    let service = ExportService::new(&Settings::default());

    // Act
    let tree = service.build(&zoo::resnet18()).unwrap();

    // Assert
    assert_eq!(tree.children.len(), 10);
    assert_eq!(tree.node_count(), 68);
    assert_eq!(tree.leaf_nodes().len(), 52);
    assert_eq!(tree.depth(), 5);
}

#[test]
fn given_resnet18_when_building_then_block_with_stride_has_downsample() {
    let tree = ExportService::new(&Settings::default())
        .build(&zoo::resnet18())
        .unwrap();

    let layer2 = &tree.children[5];
    let first_block = &layer2.children[0];
    let names: Vec<&str> = first_block.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(layer2.name, "Sequential");
    assert_eq!(
        names,
        vec!["Conv2d", "BatchNorm2d", "ReLU", "Conv2d", "BatchNorm2d", "Sequential"]
    );
}

#[test]
fn given_mlp_when_exporting_then_all_forms_agree() {
    // Arrange
    let service = ExportService::new(&Settings::default());

    // Act
    let export = service.export(&zoo::mlp(&[4, 3, 2])).unwrap();

    // Assert
    assert_eq!(export.text, "root\nLinear ReLU Linear\n");
    assert_eq!(export.json["root"]["children"].as_array().unwrap().len(), 3);
    assert_eq!(
        export.json["root"]["children"][2]["Linear"]["data"]["out_features"],
        json!(2)
    );
    assert_eq!(export.tree.to_string(), export.text);
}

#[test]
fn given_composite_types_from_settings_when_exporting_then_block_is_walked() {
    // Arrange
    let settings = Settings {
        composite_types: vec!["Block".to_string()],
        root_name: "model".to_string(),
        ..Settings::default()
    };
    let model = StubModule::new("Net").child(
        "block",
        StubModule::new("Block").child("fc", StubModule::new("Linear").attr("bias", true)),
    );

    // Act
    let export = ExportService::new(&settings).export(&model).unwrap();

    // Assert
    assert_eq!(export.text, "model\nBlock\nLinear\n");
}

#[test]
fn given_opaque_attribute_when_exporting_with_fail_policy_then_domain_error() {
    // Arrange
    let model = StubModule::new("Net").child(
        "rnn",
        StubModule::new("LSTM").attr("generator", AttrValue::opaque("Generator")),
    );

    // Act
    let result = ExportService::new(&Settings::default()).export(&model);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(TreeError::Coercion { .. }))
    ));
}

#[test]
fn given_substitute_policy_when_exporting_opaque_then_succeeds() {
    let settings = Settings {
        on_unserializable: CoercionPolicy::Substitute,
        ..Settings::default()
    };
    let model = StubModule::new("Net").child(
        "rnn",
        StubModule::new("LSTM").attr("generator", AttrValue::opaque("Generator")),
    );

    let export = ExportService::new(&settings).export(&model).unwrap();

    assert_eq!(
        export.json["root"]["children"][0]["LSTM"]["data"]["generator"],
        json!("")
    );
}

#[test]
fn given_compact_rendering_when_rendering_json_then_single_line() {
    // Arrange
    let mut service = ExportService::new(&Settings::default());
    let export = service
        .export(&StubModule::new("Net").child("act", StubModule::new("ReLU")))
        .unwrap();

    // Act
    let pretty = service.render_json(&export.json).unwrap();
    service.set_pretty(false);
    let compact = service.render_json(&export.json).unwrap();

    // Assert
    assert!(pretty.contains('\n'));
    assert_eq!(
        compact,
        r#"{"root":{"data":{},"children":[{"ReLU":{"data":{},"children":[]}}]}}"#
    );
}

#[test]
fn given_mlp_when_rendering_tree_view_then_shows_hierarchy() {
    let tree = ExportService::new(&Settings::default())
        .build(&zoo::mlp(&[2, 2]))
        .unwrap();

    let rendered = tree.to_tree_string().to_string();

    assert!(rendered.starts_with("root\n"));
    assert!(rendered.contains("Linear (8 attrs)"));
}
