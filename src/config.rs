use crate::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Noise and episode length of a hallway environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HallwayConfig {
    /// Probability that any action but "stay" has its intended effect.
    pub prob_action_success: f64,
    /// Probability to see a wall if a wall is there.
    pub prob_see_wall_true: f64,
    /// Probability to see a wall if a wall is not there.
    pub prob_see_wall_false: f64,
    /// Max. number of steps per episode.
    pub max_steps: usize,
}

impl Default for HallwayConfig {
    fn default() -> Self {
        Self {
            prob_action_success: 0.8,
            prob_see_wall_true: 0.9,
            prob_see_wall_false: 0.05,
            max_steps: 100,
        }
    }
}

impl HallwayConfig {
    /// Noise free dynamics and sensing, useful for checking paths.
    pub fn deterministic() -> Self {
        Self {
            prob_action_success: 1.0,
            prob_see_wall_true: 1.0,
            prob_see_wall_false: 0.0,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies gym style keyword overrides on top of `self`.
    pub fn with_kwargs(self, kwargs: &[(&str, Value)]) -> Result<Self> {
        let mut obj = into_object(serde_json::to_value(&self)?)?;

        for (k, v) in kwargs {
            if !obj.contains_key(*k) {
                return Err(EnvError::InvalidConfig(format!("unknown key '{k}'")));
            }
            obj.insert(k.to_string(), v.clone());
        }

        let config = serde_json::from_value::<Self>(Value::Object(obj))
            .map_err(|e| EnvError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("prob_action_success", self.prob_action_success),
            ("prob_see_wall_true", self.prob_see_wall_true),
            ("prob_see_wall_false", self.prob_see_wall_false),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EnvError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }

        if self.max_steps == 0 {
            return Err(EnvError::InvalidConfig("max_steps must be > 0".into()));
        }

        if self.prob_action_success == 0.0 {
            tracing::warn!("prob_action_success is 0: intended actions never succeed");
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<Map<String, Value>> {
        into_object(serde_json::to_value(self)?)
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(obj) => Ok(obj),
        v => Err(EnvError::InvalidConfig(format!("not an object: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use rstest::rstest;
    use serde_json::to_value;

    #[test]
    fn defaults_follow_the_literature() {
        let c = HallwayConfig::default();
        assert_float_eq!(c.prob_action_success, 0.8, abs <= 1e-12);
        assert_float_eq!(c.prob_see_wall_true, 0.9, abs <= 1e-12);
        assert_float_eq!(c.prob_see_wall_false, 0.05, abs <= 1e-12);
        assert_eq!(c.max_steps, 100);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "prob_action_success": 0.95, "max_steps": 50 }"#;
        let expected = HallwayConfig {
            prob_action_success: 0.95,
            max_steps: 50,
            ..Default::default()
        };
        assert_eq!(HallwayConfig::from_json(json).unwrap(), expected);
    }

    #[test]
    fn json_with_unknown_field_is_rejected() {
        let err = HallwayConfig::from_json(r#"{ "gamma": 0.9 }"#).unwrap_err();
        assert!(matches!(err, EnvError::Json(_)));
    }

    #[test]
    fn kwargs_override_fields() {
        let c = HallwayConfig::default()
            .with_kwargs(&[
                ("prob_see_wall_true", to_value(1.0).unwrap()),
                ("max_steps", to_value(10).unwrap()),
            ])
            .unwrap();
        assert_float_eq!(c.prob_see_wall_true, 1.0, abs <= 1e-12);
        assert_eq!(c.max_steps, 10);
        assert_float_eq!(c.prob_action_success, 0.8, abs <= 1e-12);
    }

    #[rstest]
    #[case("prob_action_success", to_value(1.5).unwrap())]
    #[case("prob_see_wall_false", to_value(-0.1).unwrap())]
    #[case("max_steps", to_value(0).unwrap())]
    #[case("max_steps", to_value("many").unwrap())]
    #[case("discount", to_value(0.9).unwrap())]
    fn bad_kwargs_are_invalid_config(#[case] key: &str, #[case] value: Value) {
        let err = HallwayConfig::default()
            .with_kwargs(&[(key, value)])
            .unwrap_err();
        assert!(matches!(err, EnvError::InvalidConfig(_)), "{err:?}");
    }

    #[test]
    fn serializes_every_field() {
        let obj = HallwayConfig::default().to_json().unwrap();
        assert_eq!(obj["max_steps"], to_value(100).unwrap());
        assert_eq!(obj.len(), 4);
    }
}
