extern crate pomdp_domains;
extern crate serde_json;
extern crate tracing_subscriber;

use pomdp_domains::policy::RandomPolicy;
use pomdp_domains::*;
use serde_json::to_value;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Registered environments: {:?}", envs());
    let mut env = make(
        "Hallway2-v0",
        &[
            ("prob_action_success", to_value(0.9)?),
            ("seed", to_value(2718)?),
        ],
    )?;

    println!("observation space:\n{:?}\n", env.observation_space());
    println!("action space:\n{:?}\n", env.action_space());

    let mut pi = RandomPolicy::<DiscreteSpace>::new(*env.action_space(), 2718);
    for ep in 0..10 {
        let mut obs = env.reset(None);
        let mut tot_reward = 0.;
        loop {
            let si = env.step(pi.policy(&obs))?;
            obs = si.observation;
            tot_reward += si.reward;

            if si.done() {
                break;
            }
        }
        println!(
            "Finished episode {} after {} steps with total reward {}",
            ep,
            env.steps(),
            tot_reward
        );
    }

    Ok(())
}
