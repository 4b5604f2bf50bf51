//! Tests for JSON and text rendering of model trees

use rstest::rstest;
use serde_json::{json, Value};

use nntree::domain::{
    to_text, AttrValue, CoercionPolicy, ModuleLike, Node, Serializer, Tensor, TreeBuilder,
    TreeError, TypeNameClassifier, ValueCoercer,
};
use nntree::util::testing::{init_test_setup, StubModule};
use nntree::zoo;

fn block_model() -> StubModule {
    StubModule::new("Net").child(
        "block",
        StubModule::new("Block")
            .child(
                "fc",
                StubModule::new("Linear").attr("bias", true).method("forward"),
            )
            .child("act", StubModule::new("ReLU")),
    )
}

fn block_tree() -> Node {
    TreeBuilder::new(TypeNameClassifier::new(["Block"]))
        .build_tree(&block_model())
        .unwrap()
}

/// Count nodes and collect names in pre-order from serialized JSON.
fn json_preorder(value: &Value, out: &mut Vec<String>) {
    let (name, body) = value.as_object().unwrap().iter().next().unwrap();
    out.push(name.clone());
    for child in body["children"].as_array().unwrap() {
        json_preorder(child, out);
    }
}

/// Pre-order names straight from the source, composites per `composite`.
fn source_preorder(module: &dyn ModuleLike, composite: &[&str], out: &mut Vec<String>) {
    for (_, child) in module.named_children().unwrap() {
        out.push(child.type_name().to_string());
        if composite.contains(&child.type_name()) {
            source_preorder(child, composite, out);
        }
    }
}

#[test]
fn given_block_tree_when_serializing_json_then_matches_expected_document() {
    // Arrange
    init_test_setup();
    let tree = block_tree();

    // Act
    let json = Serializer::default().to_json(&tree).unwrap();

    // Assert
    assert_eq!(
        json,
        json!({"root": {"data": {}, "children": [
            {"Block": {"data": {}, "children": [
                {"Linear": {"data": {"bias": true}, "children": []}},
                {"ReLU": {"data": {}, "children": []}}
            ]}}
        ]}})
    );
}

#[test]
fn given_block_tree_when_rendering_text_then_one_line_per_level() {
    let tree = block_tree();

    assert_eq!(to_text(&tree), "root\nBlock\nLinear ReLU\n");
    assert_eq!(tree.to_string(), "root\nBlock\nLinear ReLU\n");
}

#[test]
fn given_siblings_with_children_when_rendering_text_then_interleaves_without_grouping() {
    // Arrange
    let model = StubModule::new("Net")
        .child(
            "a",
            StubModule::new("Sequential")
                .child("0", StubModule::new("Conv2d"))
                .child("1", StubModule::new("ReLU")),
        )
        .child("b", StubModule::new("Linear"))
        .child(
            "c",
            StubModule::new("Sequential").child("0", StubModule::new("Dropout")),
        );

    // Act
    let tree = TreeBuilder::default().build_tree(&model).unwrap();

    // Assert
    assert_eq!(
        to_text(&tree),
        "root\nSequential Linear Sequential\nConv2d ReLU Dropout\n"
    );
}

#[test]
fn given_2x2_tensor_attribute_when_serializing_then_nested_numbers() {
    // Arrange
    let tensor = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[2, 2], true).unwrap();
    let model = StubModule::new("Net").child("fc", StubModule::new("Linear").attr("weight", tensor));
    let tree = TreeBuilder::default().build_tree(&model).unwrap();

    // Act
    let json = Serializer::default().to_json(&tree).unwrap();

    // Assert
    let weight = &json["root"]["children"][0]["Linear"]["data"]["weight"];
    assert_eq!(weight, &json!([[1.0, 2.0], [3.0, 4.0]]));
}

#[test]
fn given_placeholder_and_none_when_coercing_then_empty_strings() {
    let coercer = ValueCoercer::default();

    let placeholder = coercer
        .coerce("Linear", "T_destination", &AttrValue::Placeholder("T_destination".into()))
        .unwrap();
    let none = coercer.coerce("Linear", "bias", &AttrValue::None).unwrap();

    assert_eq!(placeholder, json!(""));
    assert_eq!(none, json!(""));
}

#[rstest]
#[case(json!(true))]
#[case(json!(3))]
#[case(json!(0.1))]
#[case(json!("zeros"))]
#[case(json!(null))]
#[case(json!([3, 3]))]
#[case(json!({"mode": "fan_in", "gain": [1, 2]}))]
fn given_json_value_when_coercing_then_unchanged(#[case] value: Value) {
    let coerced = ValueCoercer::default()
        .coerce("Layer", "attr", &AttrValue::Json(value.clone()))
        .unwrap();

    assert_eq!(coerced, value);
}

#[test]
fn given_opaque_attribute_when_serializing_then_error_names_node_and_attribute() {
    // Arrange
    let model = StubModule::new("Net").child(
        "rnn",
        StubModule::new("LSTM")
            .attr("hidden_size", 8usize)
            .attr("generator", AttrValue::opaque("Generator")),
    );
    let tree = TreeBuilder::default().build_tree(&model).unwrap();

    // Act
    let err = Serializer::default().to_json(&tree).unwrap_err();

    // Assert
    match &err {
        TreeError::Coercion {
            node,
            attribute,
            type_name,
        } => {
            assert_eq!(node, "LSTM");
            assert_eq!(attribute, "generator");
            assert_eq!(type_name, "Generator");
        }
        other => panic!("expected Coercion, got {:?}", other),
    }
    assert!(!err.is_precondition());
}

#[test]
fn given_substitute_policy_when_serializing_opaque_then_empty_string() {
    // Arrange
    init_test_setup();
    let model = StubModule::new("Net").child(
        "rnn",
        StubModule::new("LSTM").attr("generator", AttrValue::opaque("Generator")),
    );
    let tree = TreeBuilder::default().build_tree(&model).unwrap();
    let serializer = Serializer::new(ValueCoercer::new(CoercionPolicy::Substitute));

    // Act
    let json = serializer.to_json(&tree).unwrap();

    // Assert
    assert_eq!(json["root"]["children"][0]["LSTM"]["data"]["generator"], json!(""));
}

#[test]
fn given_mlp_when_round_tripping_json_then_structure_matches_source() {
    // Arrange
    let model = zoo::mlp(&[6, 4, 3, 2]);
    let tree = TreeBuilder::default().build_tree(&model).unwrap();
    let rendered = serde_json::to_string(&Serializer::default().to_json(&tree).unwrap()).unwrap();

    // Act
    let parsed: Value = serde_json::from_str(&rendered).unwrap();

    // Assert
    let mut from_json = Vec::new();
    json_preorder(&parsed, &mut from_json);
    let mut from_source = vec!["root".to_string()];
    source_preorder(&model, &["Sequential", "BasicBlock"], &mut from_source);
    assert_eq!(from_json, from_source);
    assert_eq!(from_json.len(), tree.node_count());
}

#[test]
fn given_mlp_when_serializing_then_composites_empty_data_and_leaves_empty_children() {
    // Arrange: nested container around the perceptron
    let mut outer = zoo::Sequential::default();
    outer.push(zoo::mlp(&[3, 2]));
    let tree = TreeBuilder::default().build_tree(&outer).unwrap();

    // Act
    let json = Serializer::default().to_json(&tree).unwrap();

    // Assert
    let seq = &json["root"]["children"][0]["Sequential"];
    assert_eq!(seq["data"], json!({}));
    let linear = &seq["children"][0]["Linear"];
    assert_eq!(linear["children"], json!([]));
    assert_eq!(linear["data"]["weight"], json!([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]));
    assert_eq!(linear["data"]["bias"], json!([0.0, 0.0]));
    assert_eq!(linear["data"]["T_destination"], json!(""));
    assert_eq!(linear["data"]["in_features"], json!(3));
    assert_eq!(linear["data"]["training"], json!(true));
}

#[test]
fn given_linear_leaf_when_serializing_then_keys_are_public_state_only() {
    // Arrange
    let mut model = zoo::Sequential::default();
    model.push(zoo::Linear::new(2, 2, false));
    let tree = TreeBuilder::default().build_tree(&model).unwrap();

    // Act
    let json = Serializer::default().to_json(&tree).unwrap();

    // Assert
    let keys: Vec<&String> = json["root"]["children"][0]["Linear"]["data"]
        .as_object()
        .unwrap()
        .keys()
        .collect();
    assert_eq!(
        keys,
        vec![
            "T_destination",
            "bias",
            "call_super_init",
            "dump_patches",
            "in_features",
            "out_features",
            "training",
            "weight"
        ]
    );
}

#[test]
fn given_resnet18_when_rendering_text_then_lines_follow_depth() {
    // Arrange
    let tree = TreeBuilder::default().build_tree(&zoo::resnet18()).unwrap();

    // Act
    let text = to_text(&tree);

    // Assert
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), tree.depth());
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "root");
    assert_eq!(lines[1].split(' ').count(), tree.children.len());
    assert_eq!(
        lines[1],
        "Conv2d BatchNorm2d ReLU MaxPool2d Sequential Sequential Sequential Sequential AdaptiveAvgPool2d Linear"
    );
    assert_eq!(lines[2].split(' ').count(), 8);
}
