use dynarr::{DynamicArray, Duplicate, dyn_array};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn serializes_as_sequence() {
    let array = dyn_array![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
    let json = serde_json::to_string(&array).unwrap();
    assert_eq!(json, r#"[{"x":1,"y":2},{"x":3,"y":4}]"#);
}

#[test]
fn deserializes_into_either_policy() {
    let json = r#"[{"x":5,"y":6},{"x":7,"y":8},{"x":9,"y":10}]"#;
    let expected = [
        Point { x: 5, y: 6 },
        Point { x: 7, y: 8 },
        Point { x: 9, y: 10 },
    ];

    let relocating: DynamicArray<Point> = serde_json::from_str(json).unwrap();
    assert_eq!(relocating, expected);

    let duplicating: DynamicArray<Point, Duplicate> = serde_json::from_str(json).unwrap();
    assert_eq!(duplicating, expected);
}

#[test]
fn rejects_non_sequence() {
    let error = serde_json::from_str::<DynamicArray<u8>>(r#"{"x":1}"#).unwrap_err();
    assert!(error.to_string().contains("a sequence"));
}
