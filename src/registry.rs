use crate::*;
use serde_json::Value;
use std::collections::HashMap;

pub const HALLWAY_ID: &str = "Hallway-v0";
pub const HALLWAY_SIMPLE_ID: &str = "Hallway_Simple-v0";
pub const HALLWAY2_ID: &str = "Hallway2-v0";

/// Registered environment ids and their descriptions.
pub fn envs() -> HashMap<String, String> {
    [
        (HALLWAY_ID, "57 states, 5 actions, 20 observations"),
        (HALLWAY_SIMPLE_ID, "57 states, 3 actions, 20 observations"),
        (HALLWAY2_ID, "89 states, 5 actions, 17 observations"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Create a registered environment.
///
/// `kwargs` override fields of [`HallwayConfig`]; the extra key `seed` seeds the
/// environment's random number generator.
pub fn make(env_id: &str, kwargs: &[(&str, Value)]) -> Result<HallwayEnv> {
    let (seeds, overrides): (Vec<_>, Vec<_>) =
        kwargs.iter().cloned().partition(|(k, _)| *k == "seed");
    let seed = seeds
        .last()
        .map(|(_, v)| v.as_u64().ok_or_else(|| bad_seed(v)))
        .transpose()?;

    let config = HallwayConfig::default().with_kwargs(&overrides)?;
    let (layout, action_set) = match env_id {
        HALLWAY_ID => (Layout::hallway(), ActionSet::Full),
        HALLWAY_SIMPLE_ID => (Layout::hallway(), ActionSet::Simple),
        HALLWAY2_ID => (Layout::hallway2(), ActionSet::Full),
        _ => return Err(EnvError::UnknownEnvironment(env_id.to_string())),
    };

    tracing::debug!(env_id, ?config, ?seed, "make");
    let model = HallwayModel::new(layout, action_set, config)?;

    Ok(HallwayEnv::new(env_id, model, seed))
}

fn bad_seed(v: &Value) -> EnvError {
    EnvError::InvalidConfig(format!("seed must be a non-negative integer, got {v}"))
}
