//! Variant resolution: map an animation name onto an icon's per-part variant set.

use serde_json::{Map, Value, json};

use crate::animation::speed::scale_tree;
use crate::foundation::error::{IconMotionError, IconMotionResult};
use crate::scope::config::ScopeConfig;

/// Name of the entry every variant map must carry.
pub const DEFAULT_ANIMATION: &str = "default";

/// Animations synthesized by the engine instead of being authored per icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StaticAnimation {
    /// Uniform draw-in of every stroke.
    Path,
    /// Uniform draw-out then draw-in, suited for loops.
    PathLoop,
}

impl StaticAnimation {
    /// All static animations, in lookup order.
    pub const ALL: [StaticAnimation; 2] = [Self::Path, Self::PathLoop];

    /// Look up a static animation by its public name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Public animation name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::PathLoop => "path-loop",
        }
    }

    /// Path-style statics animate strokes; composite parts must not be animated twice.
    pub fn is_path_style(self) -> bool {
        matches!(self, Self::Path | Self::PathLoop)
    }

    /// The single variant shared by every animated part.
    pub fn variant(self) -> Value {
        let (keyframes, duration) = match self {
            Self::Path => (json!([0.05, 1]), 0.8),
            Self::PathLoop => (json!([1, 0.05, 1]), 1.6),
        };
        json!({
            "initial": { "pathLength": 1 },
            "animate": {
                "pathLength": keyframes,
                "transition": { "duration": duration, "ease": "easeInOut" }
            }
        })
    }
}

/// `true` when `animation` names a path-style static, which renderers pair with a stroke
/// dash-array fix-up.
pub fn uses_path_styling(animation: &str) -> bool {
    StaticAnimation::from_name(animation).is_some_and(StaticAnimation::is_path_style)
}

/// One icon's authored animations: animation name to per-part variant tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct VariantMap {
    default: Map<String, Value>,
    entries: Map<String, Value>,
}

impl VariantMap {
    /// Validate and wrap an authored variant map.
    ///
    /// The map must be an object whose `default` entry is itself an object of parts.
    pub fn from_value(value: Value) -> IconMotionResult<Self> {
        let Value::Object(mut entries) = value else {
            return Err(IconMotionError::validation(
                "variant map must be an object of animation names",
            ));
        };
        match entries.remove(DEFAULT_ANIMATION) {
            Some(Value::Object(default)) => Ok(Self { default, entries }),
            Some(_) => Err(IconMotionError::validation(
                "variant map 'default' entry must be an object of parts",
            )),
            None => Err(IconMotionError::validation(
                "variant map is missing its 'default' entry",
            )),
        }
    }

    /// Parse and validate a variant map from JSON text.
    pub fn from_json_str(s: &str) -> IconMotionResult<Self> {
        Self::from_value(serde_json::from_str(s)?)
    }

    /// Authored animation names, including `default`.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_ANIMATION).chain(self.entries.keys().map(String::as_str))
    }

    /// Parts of the `default` entry.
    pub fn default_parts(&self) -> &Map<String, Value> {
        &self.default
    }

    /// Pick the unscaled variant set for `animation`.
    ///
    /// Static names synthesize one shared variant per default part; unknown names fall back to
    /// `default`.
    pub fn select(&self, animation: &str) -> Value {
        if let Some(stat) = StaticAnimation::from_name(animation) {
            let variant = stat.variant();
            let parts = self
                .default_parts()
                .keys()
                .filter(|key| !(stat.is_path_style() && key.contains("group")))
                .map(|key| (key.clone(), variant.clone()))
                .collect::<Map<_, _>>();
            return Value::Object(parts);
        }

        if animation == DEFAULT_ANIMATION {
            return Value::Object(self.default.clone());
        }
        match self.entries.get(animation) {
            Some(found) if !found.is_null() => found.clone(),
            _ => {
                tracing::trace!(animation, "unknown animation, using default");
                Value::Object(self.default.clone())
            }
        }
    }

    /// Pick the variant set for `animation` and apply the speed multiplier once.
    ///
    /// A multiplier of `1` or `None` skips the rescale entirely.
    pub fn resolve(&self, animation: &str, speed_multiplier: Option<f64>) -> Value {
        let selected = self.select(animation);
        match speed_multiplier {
            Some(m) if m != 1.0 => scale_tree(&selected, m),
            _ => selected,
        }
    }
}

impl TryFrom<Value> for VariantMap {
    type Error = IconMotionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<VariantMap> for Value {
    fn from(map: VariantMap) -> Self {
        let mut entries = map.entries;
        entries.insert(DEFAULT_ANIMATION.to_owned(), Value::Object(map.default));
        Value::Object(entries)
    }
}

/// Resolve an icon's variants against the scope it renders in.
pub fn resolve_variants(map: &VariantMap, scope: &ScopeConfig) -> Value {
    map.resolve(&scope.animation, scope.speed_multiplier)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/variants.rs"]
mod tests;
