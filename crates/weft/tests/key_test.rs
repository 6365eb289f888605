use weft::key::edge_stable_key;
use weft::{NodeKey, PinDirection, PinKey};

#[test]
fn node_keys_order_like_their_128_bit_values() {
    let mut keys = vec![
        NodeKey::from_u128(0x0200_0000_0000_0000_0000_0000_0000_0000),
        NodeKey::from_u128(3),
        NodeKey::from_u128(0x0100_0000_0000_0000_0000_0000_0000_00ff),
        NodeKey::from_u128(1),
    ];
    keys.sort();
    let values: Vec<u128> = keys.iter().map(|k| k.as_u128()).collect();
    assert_eq!(
        values,
        vec![
            1,
            3,
            0x0100_0000_0000_0000_0000_0000_0000_00ff,
            0x0200_0000_0000_0000_0000_0000_0000_0000,
        ]
    );
}

#[test]
fn pin_keys_order_by_node_then_direction_then_name_then_index() {
    let a = NodeKey::from_u128(1);
    let b = NodeKey::from_u128(2);

    assert!(PinKey::output(a, "z", 9) < PinKey::input(b, "a", 0));
    assert!(PinKey::input(a, "z", 9) < PinKey::output(a, "a", 0));
    assert!(PinKey::input(a, "A", 5) < PinKey::input(a, "a", 0));
    assert!(PinKey::input(a, "then", 0) < PinKey::input(a, "then", 1));
    assert!(PinDirection::Input < PinDirection::Output);
}

#[test]
fn pin_key_display_is_pipe_separated() {
    let k = NodeKey::from_u128(0x1234);
    let pin = PinKey::output(k, "then", 2);
    assert_eq!(
        pin.to_string(),
        "00000000-0000-0000-0000-000000001234|O|then|2"
    );
    let dst = PinKey::input(NodeKey::from_u128(0x5678), "exec", 0);
    assert_eq!(
        edge_stable_key(&pin, &dst),
        "00000000-0000-0000-0000-000000001234|O|then|2->00000000-0000-0000-0000-000000005678|I|exec|0"
    );
}

#[test]
fn synthetic_keys_are_stable_per_seed() {
    let a1 = NodeKey::synthetic("Dummy|edge|1");
    let a2 = NodeKey::synthetic("Dummy|edge|1");
    let b = NodeKey::synthetic("Dummy|edge|2");
    assert_eq!(a1, a2);
    assert_ne!(a1, b);
}

#[test]
fn node_key_parses_its_display_form() {
    let k = NodeKey::from_u128(0xdead_beef_0000_0000_0000_0000_0000_0042);
    let parsed: NodeKey = k.to_string().parse().expect("parse node key");
    assert_eq!(parsed, k);
    assert!("not-a-key".parse::<NodeKey>().is_err());
}
