//! Gating of achievement eligibility checks.
//!
//! The check itself runs outside the core. The gate decides when to ask for
//! it (once per game instance, when the round ends) and whether an answer
//! that comes back is still wanted.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::game::GamePhase;
use crate::scheduler::{Generation, GenerationCounter};

/// How many recently checked instances are remembered.
const REMEMBERED_INSTANCES: usize = 16;

/// Request handed to the external eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRequest {
    /// Must be echoed back with the result.
    pub ticket: u64,
    pub player_address: String,
    pub instance: String,
}

#[derive(Debug, Clone, Default)]
pub struct AchievementGate {
    tickets: GenerationCounter,
    outstanding: Option<(Generation, String)>,
    /// Most recent last.
    requested: VecDeque<String>,
}

impl AchievementGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest snapshot. Returns a request while the phase is
    /// terminal for an instance that has not been checked yet and the
    /// player address is known.
    pub fn observe(
        &mut self,
        phase: GamePhase,
        instance: Option<&str>,
        player_address: Option<&str>,
    ) -> Option<AchievementRequest> {
        if !phase.is_terminal() {
            return None;
        }
        self.issue(instance?, player_address?)
    }

    fn was_requested(&self, instance: &str) -> bool {
        self.requested.iter().any(|i| i == instance)
    }

    /// Issue a ticket for `instance` unless one was already issued.
    /// Supersedes any outstanding ticket.
    pub fn issue(&mut self, instance: &str, player_address: &str) -> Option<AchievementRequest> {
        if self.was_requested(instance) {
            return None;
        }
        if self.requested.len() == REMEMBERED_INSTANCES {
            self.requested.pop_front();
        }
        self.requested.push_back(instance.to_string());
        let ticket = self.tickets.bump();
        self.outstanding = Some((ticket, instance.to_string()));
        tracing::info!(instance, ticket = ticket.value(), "[achievements] requesting check");
        Some(AchievementRequest {
            ticket: ticket.value(),
            player_address: player_address.to_string(),
            instance: instance.to_string(),
        })
    }

    /// Accept `ids` if `ticket` is the outstanding one. Stale or repeated
    /// answers return `None`.
    pub fn accept(&mut self, ticket: u64, ids: Vec<String>) -> Option<Vec<String>> {
        match &self.outstanding {
            Some((current, _)) if current.value() == ticket => {
                self.outstanding = None;
                Some(ids)
            }
            _ => {
                tracing::debug!(ticket, "[achievements] discarding stale result");
                None
            }
        }
    }

    /// Instance the outstanding ticket belongs to.
    pub fn pending_instance(&self) -> Option<&str> {
        self.outstanding.as_ref().map(|(_, i)| i.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_ticket_per_instance() {
        let mut gate = AchievementGate::new();
        let first = gate.issue("game-1", "0xabc").unwrap();
        assert!(gate.issue("game-1", "0xabc").is_none());
        assert_eq!(first.instance, "game-1");
        assert_eq!(gate.pending_instance(), Some("game-1"));
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut gate = AchievementGate::new();
        let old = gate.issue("game-1", "0xabc").unwrap();
        let new = gate.issue("game-2", "0xabc").unwrap();

        assert!(gate.accept(old.ticket, vec!["first_voyage".into()]).is_none());
        assert_eq!(
            gate.accept(new.ticket, vec!["cashed_out".into()]),
            Some(vec!["cashed_out".to_string()])
        );
        // Answered tickets are not accepted twice
        assert!(gate.accept(new.ticket, vec![]).is_none());
    }

    #[test]
    fn test_observe_fires_on_terminal_entry() {
        let mut gate = AchievementGate::new();
        assert!(gate.observe(GamePhase::Playing, Some("g"), Some("0x1")).is_none());
        assert!(gate.observe(GamePhase::Won, Some("g"), Some("0x1")).is_some());
        // Staying terminal does not fire again
        assert!(gate.observe(GamePhase::Won, Some("g"), Some("0x1")).is_none());
    }

    #[test]
    fn test_observe_needs_player_and_instance() {
        let mut gate = AchievementGate::new();
        gate.observe(GamePhase::Playing, Some("g"), None);
        assert!(gate.observe(GamePhase::Lost, Some("g"), None).is_none());
        gate.observe(GamePhase::Menu, None, Some("0x1"));
        assert!(gate.observe(GamePhase::CashedOut, None, Some("0x1")).is_none());
    }

    #[test]
    fn test_observe_new_instance_after_terminal() {
        let mut gate = AchievementGate::new();
        assert!(gate.observe(GamePhase::Won, Some("g1"), Some("0x1")).is_some());
        // Next round already over by the time the snapshot is polled
        let second = gate.observe(GamePhase::Lost, Some("g2"), Some("0x1"));
        assert_eq!(second.map(|r| r.instance), Some("g2".to_string()));
    }

    #[test]
    fn test_observe_address_arrives_late() {
        let mut gate = AchievementGate::new();
        assert!(gate.observe(GamePhase::Won, Some("g1"), None).is_none());
        let request = gate.observe(GamePhase::Won, Some("g1"), Some("0x1"));
        assert_eq!(request.map(|r| r.player_address), Some("0x1".to_string()));
        assert!(gate.observe(GamePhase::Won, Some("g1"), Some("0x1")).is_none());
    }

    #[test]
    fn test_remembered_instances_are_bounded() {
        let mut gate = AchievementGate::new();
        for i in 0..=REMEMBERED_INSTANCES {
            assert!(gate.issue(&format!("g{i}"), "0x1").is_some());
        }
        assert_eq!(gate.requested.len(), REMEMBERED_INSTANCES);
        assert!(gate.issue(&format!("g{REMEMBERED_INSTANCES}"), "0x1").is_none());
    }
}
