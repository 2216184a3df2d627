// src/navigation/controller.rs
// Turns a route into a discrete policy and feeds it to an executor one
// micro-step command at a time.

use crate::geometry::{Heading, Waypoint};
use log::debug;
use nalgebra::Vector2;

/// One `(sign(Δx), sign(Δy))` command per consecutive waypoint pair
pub fn synthesize(path: &[Waypoint]) -> Vec<Heading> {
    path.windows(2)
        .map(|pair| Heading::between(pair[0], pair[1]))
        .collect()
}

/// Repeats every macro-step command `step_size` times, one per simulation tick
pub fn expand_policy(policy: &[Heading], step_size: usize) -> Vec<Heading> {
    policy
        .iter()
        .flat_map(|&heading| std::iter::repeat_n(heading, step_size))
        .collect()
}

/// Net displacement of a policy whose macro-steps have length `agent_step`
pub fn displacement(policy: &[Heading], agent_step: f64) -> Vector2<f64> {
    policy
        .iter()
        .fold(Vector2::zeros(), |acc, heading| acc + heading.scaled(agent_step))
}

/// Issues a policy's micro-step commands in order
#[derive(Debug, Clone)]
pub struct PolicyController {
    policy: Vec<Heading>,
    step_size: usize,
    tick: usize,
}

impl PolicyController {
    pub fn new(policy: Vec<Heading>, step_size: usize) -> Self {
        PolicyController {
            policy,
            step_size: step_size.max(1),
            tick: 0,
        }
    }

    /// Command for the next tick, or `None` once the policy is spent
    pub fn next_command(&mut self) -> Option<Heading> {
        let index = self.tick / self.step_size;
        let heading = *self.policy.get(index)?;
        if self.tick % self.step_size == 0 {
            debug!(
                "Macro-step {}/{}: ({}, {})",
                index + 1,
                self.policy.len(),
                heading.dx,
                heading.dy
            );
        }
        self.tick += 1;
        Some(heading)
    }

    /// Ticks issued so far
    pub fn ticks(&self) -> usize {
        self.tick
    }

    /// Macro-steps fully issued so far
    pub fn completed_steps(&self) -> usize {
        self.tick / self.step_size
    }

    /// True right after the last tick of a macro-step
    pub fn at_step_boundary(&self) -> bool {
        self.tick > 0 && self.tick % self.step_size == 0
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.policy.len() * self.step_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_has_one_command_per_edge() {
        let path = vec![
            Waypoint::new(2.0, -11.0),
            Waypoint::new(-0.5, -8.5),
            Waypoint::new(-0.5, -6.0),
            Waypoint::new(2.0, -6.0),
        ];
        let policy = synthesize(&path);
        assert_eq!(
            policy,
            vec![Heading::new(-1, 1), Heading::new(0, 1), Heading::new(1, 0)]
        );
        assert!(synthesize(&path[..1]).is_empty());
    }

    #[test]
    fn displacement_sums_macro_steps() {
        let policy = vec![Heading::new(-1, 1), Heading::new(0, 1), Heading::new(1, 0)];
        assert_eq!(displacement(&policy, 2.5), Vector2::new(0.0, 5.0));
    }

    #[test]
    fn expansion_repeats_each_command() {
        let expanded = expand_policy(&[Heading::new(1, 0), Heading::new(0, -1)], 3);
        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[2], Heading::new(1, 0));
        assert_eq!(expanded[3], Heading::new(0, -1));
    }

    #[test]
    fn controller_walks_micro_steps() {
        let policy = vec![Heading::new(1, 0), Heading::new(0, 1)];
        let expected = expand_policy(&policy, 4);
        let mut controller = PolicyController::new(policy, 4);
        let mut issued = Vec::new();
        while let Some(command) = controller.next_command() {
            issued.push(command);
            if issued.len() == 4 {
                assert!(controller.at_step_boundary());
                assert_eq!(controller.completed_steps(), 1);
            }
        }
        assert_eq!(issued, expected);
        assert!(controller.is_finished());
        assert_eq!(controller.ticks(), 8);
    }
}
