extern crate pomdp_domains;
extern crate tracing_subscriber;

use pomdp_domains::episodes::*;
use pomdp_domains::policy::OptimalPolicy;
use pomdp_domains::*;

/// Rolls out the shortest-path policy with access to the true state, an upper
/// bound for agents that only see observations.
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let env = make("Hallway-v0", &[])?;
    let policy = OptimalPolicy::new(env.model(), 2718)?;
    let mut rollout = Rollout::new(env, policy, Observability::State);

    let eps = rollout.generate(100, Some(2718))?;
    let reached = eps.iter().filter(|ep| total_reward(ep) > 0.).count();
    let total_len: usize = eps.iter().map(|ep| ep.len() - 1).sum();
    let mean_len = total_len as f64 / eps.len() as f64;
    println!(
        "{}: reached the goal in {reached}/{} episodes, mean length {mean_len:.1}",
        rollout.env().name(),
        eps.len()
    );

    println!("{}", episodes_to_json(&eps[..1])?);

    Ok(())
}
