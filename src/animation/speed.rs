//! Speed rescaling over variant trees.
//!
//! Multiplies every numeric `duration`/`delay` found in `transition` objects by a scalar. The
//! input is never mutated. The transform compounds when applied twice, so callers must apply it
//! exactly once per render, to the authored (unscaled) tree.

use serde_json::{Map, Number, Value};

/// Keys of a transition object that carry timing values.
const TIMING_KEYS: [&str; 2] = ["duration", "delay"];

/// Rescale all transition timings inside `tree` by `multiplier`.
///
/// Arrays are mapped element-wise. Within a mapping, each child is handled as follows:
/// a node with `initial`/`animate` has those sub-nodes' `transition` rescaled, a node with a
/// bare `transition` has it rescaled directly, any other mapping is recursed into, and scalars
/// pass through unchanged.
///
/// Only `transition` objects are rescaled, so a bare timing object such as
/// `{"duration": 0.8, "delay": 0.1}` comes back as is. Use [`scale_transition`] for those.
pub fn scale_tree(tree: &Value, multiplier: f64) -> Value {
    match tree {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| scale_tree(item, multiplier))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), scale_node(child, multiplier)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn scale_node(node: &Value, multiplier: f64) -> Value {
    let Value::Object(map) = node else {
        return scale_tree(node, multiplier);
    };

    if map.contains_key("initial") || map.contains_key("animate") {
        let mut out = map.clone();
        for phase in ["initial", "animate"] {
            if let Some(Value::Object(sub)) = map.get(phase) {
                let scaled = with_scaled_transition(sub, multiplier);
                out.insert(phase.to_owned(), Value::Object(scaled));
            }
        }
        return Value::Object(out);
    }

    if map.get("transition").is_some_and(|t| !t.is_null()) {
        return Value::Object(with_scaled_transition(map, multiplier));
    }

    scale_tree(node, multiplier)
}

fn with_scaled_transition(node: &Map<String, Value>, multiplier: f64) -> Map<String, Value> {
    let mut out = node.clone();
    if let Some(transition) = node.get("transition") {
        out.insert(
            "transition".to_owned(),
            scale_transition(transition, multiplier),
        );
    }
    out
}

/// Rescale the numeric `duration` and `delay` of one transition object.
///
/// Non-object values and non-numeric timing fields are returned unchanged. Easing curves and
/// every other field are left untouched.
pub fn scale_transition(transition: &Value, multiplier: f64) -> Value {
    let Value::Object(map) = transition else {
        return transition.clone();
    };
    let mut out = map.clone();
    for key in TIMING_KEYS {
        if let Some(Value::Number(n)) = map.get(key) {
            out.insert(key.to_owned(), Value::Number(scale_number(n, multiplier)));
        }
    }
    Value::Object(out)
}

fn scale_number(n: &Number, multiplier: f64) -> Number {
    // Unit multipliers must keep integer literals integral so the result stays deep-equal.
    if multiplier == 1.0 {
        return n.clone();
    }
    n.as_f64()
        .and_then(|v| Number::from_f64(v * multiplier))
        .unwrap_or_else(|| n.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/speed.rs"]
mod tests;
