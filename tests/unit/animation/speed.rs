use super::*;
use serde_json::json;

fn approx(v: &Value, expected: f64) -> bool {
    v.as_f64().is_some_and(|x| (x - expected).abs() < 1e-9)
}

#[test]
fn transition_timings_scale_linearly() {
    let t = scale_transition(&json!({ "duration": 0.8, "delay": 0.1 }), 0.7);
    assert!(approx(&t["duration"], 0.56));
    assert!(approx(&t["delay"], 0.07));
}

#[test]
fn non_timing_fields_are_untouched() {
    let t = scale_transition(
        &json!({ "duration": 1, "ease": [0.4, 0.0, 0.2, 1.0], "repeat": 3 }),
        0.5,
    );
    assert!(approx(&t["duration"], 0.5));
    assert_eq!(t["ease"], json!([0.4, 0.0, 0.2, 1.0]));
    assert_eq!(t["repeat"], json!(3));
}

#[test]
fn string_timings_are_left_alone() {
    let t = scale_transition(&json!({ "duration": "auto" }), 0.5);
    assert_eq!(t["duration"], json!("auto"));
}

#[test]
fn initial_and_animate_transitions_are_scaled() {
    let tree = json!({
        "path1": {
            "initial": { "opacity": 1, "transition": { "duration": 0.2 } },
            "animate": {
                "pathLength": [0, 1],
                "transition": { "duration": 0.6, "delay": 0.12, "ease": "easeInOut" }
            }
        }
    });
    let out = scale_tree(&tree, 0.5);
    assert!(approx(&out["path1"]["initial"]["transition"]["duration"], 0.1));
    assert!(approx(&out["path1"]["animate"]["transition"]["duration"], 0.3));
    assert!(approx(&out["path1"]["animate"]["transition"]["delay"], 0.06));
    assert_eq!(out["path1"]["animate"]["pathLength"], json!([0, 1]));
    assert_eq!(out["path1"]["animate"]["transition"]["ease"], json!("easeInOut"));
}

#[test]
fn bare_transition_nodes_and_nested_maps_are_scaled() {
    let tree = json!({
        "outer": {
            "inner": { "rotate": 360, "transition": { "duration": 2 } }
        },
        "list": [ { "part": { "transition": { "delay": 1 } } } ]
    });
    let out = scale_tree(&tree, 0.25);
    assert!(approx(&out["outer"]["inner"]["transition"]["duration"], 0.5));
    assert_eq!(out["outer"]["inner"]["rotate"], json!(360));
    assert!(approx(&out["list"][0]["part"]["transition"]["delay"], 0.25));
}

#[test]
fn unit_multiplier_is_deep_equal() {
    let tree = json!({
        "group": {
            "initial": { "rotate": 0 },
            "animate": { "rotate": 360, "transition": { "duration": 1, "ease": "linear" } }
        },
        "path": {},
        "nothing": null
    });
    assert_eq!(scale_tree(&tree, 1.0), tree);
}

#[test]
fn scalars_and_null_pass_through() {
    assert_eq!(scale_tree(&json!(null), 0.5), json!(null));
    assert_eq!(scale_tree(&json!(3), 0.5), json!(3));
    assert_eq!(scale_tree(&json!({ "a": null, "b": "x" }), 0.5), json!({ "a": null, "b": "x" }));
}

#[test]
fn applying_twice_compounds() {
    let tree = json!({ "p": { "animate": { "transition": { "duration": 1.0 } } } });
    let once = scale_tree(&tree, 0.5);
    let twice = scale_tree(&once, 0.5);
    assert!(approx(&twice["p"]["animate"]["transition"]["duration"], 0.25));
}

#[test]
fn input_is_not_mutated() {
    let tree = json!({ "p": { "transition": { "duration": 1.0 } } });
    let before = tree.clone();
    let _ = scale_tree(&tree, 3.0);
    assert_eq!(tree, before);
}

#[test]
fn bare_timing_object_needs_scale_transition() {
    let timing = json!({ "duration": 0.8, "delay": 0.1 });
    assert_eq!(scale_tree(&timing, 0.7), timing);
    let t = scale_transition(&timing, 0.7);
    assert!(approx(&t["duration"], 0.56));
    assert!(approx(&t["delay"], 0.07));
}
