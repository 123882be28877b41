use pomdp_domains::policy::RandomPolicy;
use pomdp_domains::*;

/// Plays one episode with uniformly random actions, returning the start state and every step.
#[allow(dead_code)]
pub fn random_episode(env: &mut HallwayEnv, seed: u64) -> (Discrete, Vec<StepInfo>) {
    let mut pi = RandomPolicy::<DiscreteSpace>::new(*env.action_space(), seed);
    env.reset(Some(seed));
    let start = env.state().unwrap();

    let mut steps = vec![];
    loop {
        let si = env.step(pi.policy(&0)).unwrap();
        let done = si.done();
        steps.push(si);
        if done {
            break;
        }
    }

    (start, steps)
}

#[allow(dead_code)]
pub fn hidden_state(si: &StepInfo) -> Discrete {
    si.info["state"].as_u64().unwrap() as Discrete
}

#[allow(dead_code)]
pub fn all_envs(config: &HallwayConfig) -> Vec<HallwayEnv> {
    vec![
        HallwayEnv::hallway(config.clone()).unwrap(),
        HallwayEnv::hallway_simple(config.clone()).unwrap(),
        HallwayEnv::hallway2(config.clone()).unwrap(),
    ]
}
