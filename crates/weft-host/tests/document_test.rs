use weft::{NodeKey, PinDirection, Point, Size};
use weft_host::{DocLink, DocNode, GraphDocument, HostError, SCHEMA};

fn key(v: u128) -> NodeKey {
    NodeKey::from_u128(v)
}

#[test]
fn document_json_fills_defaults() {
    let text = r#"{
        "graph_id": "EventGraph",
        "nodes": [
            {
                "key": "00000000-0000-0000-0000-000000000001",
                "name": "BeginPlay",
                "position": { "x": 10.0, "y": 20.0 },
                "pins": [{ "name": "then", "direction": "output", "exec": true }]
            },
            {
                "key": "00000000-0000-0000-0000-000000000002",
                "size": { "width": 200.0, "height": 80.0 },
                "pins": [{ "name": "execute", "direction": "input", "exec": true }]
            }
        ],
        "links": [
            {
                "from": { "node": "00000000-0000-0000-0000-000000000001", "pin": "then" },
                "to": { "node": "00000000-0000-0000-0000-000000000002", "pin": "execute" }
            }
        ]
    }"#;
    let doc = GraphDocument::from_json(text).expect("parse");
    assert_eq!(doc.schema, SCHEMA);
    assert!(!doc.read_only);
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.nodes[0].key, key(1));
    assert_eq!(doc.nodes[0].position, Point::new(10.0, 20.0));
    assert_eq!(doc.nodes[0].size, None);
    assert_eq!(doc.nodes[1].name, "");
    assert_eq!(doc.nodes[1].size, Some(Size::new(200.0, 80.0)));
    assert_eq!(doc.nodes[1].pins[0].direction, PinDirection::Input);
    assert_eq!(doc.links, vec![DocLink::new(key(1), "then", key(2), "execute")]);
    doc.validate().expect("valid");
}

#[test]
fn document_validation_checks_schema_first() {
    let mut doc = GraphDocument::new("g");
    doc.schema = "other@2".to_string();
    doc.read_only = true;
    assert_eq!(
        doc.validate(),
        Err(HostError::SchemaMismatch {
            expected: SCHEMA.to_string(),
            found: "other@2".to_string(),
        })
    );
}

#[test]
fn document_validation_rejects_read_only_before_empty() {
    let mut doc = GraphDocument::new("g");
    doc.read_only = true;
    assert_eq!(doc.validate(), Err(HostError::ReadOnly));

    doc.read_only = false;
    assert_eq!(doc.validate(), Err(HostError::NoNodes));
}

#[test]
fn document_validation_rejects_duplicate_keys() {
    let mut doc = GraphDocument::new("g");
    doc.nodes.push(DocNode::new(key(3), "a"));
    doc.nodes.push(DocNode::new(key(4), "b"));
    doc.nodes.push(DocNode::new(key(3), "c"));
    assert_eq!(
        doc.validate(),
        Err(HostError::DuplicateNodeKey { key: key(3) })
    );
}

#[test]
fn document_pin_index_counts_per_direction() {
    let node = DocNode::new(key(1), "branch")
        .with_pin("execute", PinDirection::Input, true)
        .with_pin("then", PinDirection::Output, true)
        .with_pin("cond", PinDirection::Input, false)
        .with_pin("else", PinDirection::Output, true);
    let (index, pin) = node.pin_index("else", PinDirection::Output).expect("pin");
    assert_eq!(index, 1);
    assert!(pin.exec);
    assert_eq!(node.pin_index("cond", PinDirection::Input).map(|(i, _)| i), Some(1));
    assert!(node.pin_index("cond", PinDirection::Output).is_none());
}

#[test]
fn every_host_error_has_guidance() {
    let errors = [
        HostError::NoNodes,
        HostError::ReadOnly,
        HostError::SchemaMismatch {
            expected: SCHEMA.to_string(),
            found: String::new(),
        },
        HostError::DuplicateNodeKey { key: key(1) },
        HostError::UnknownPin {
            node: key(1),
            pin: "x".to_string(),
        },
        HostError::NoSelection,
        HostError::SelectionOutsideGraph { key: key(1) },
        HostError::NoComponents,
        HostError::Layout(weft::Error::EmptyComponent),
    ];
    for err in errors {
        assert!(!err.to_string().is_empty());
        assert!(!err.guidance().is_empty(), "{err}");
    }
}
