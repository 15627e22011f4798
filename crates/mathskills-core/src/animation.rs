//! Celebration cues and their burst parameters.
//!
//! The numbers mirror what the browser confetti engine is fed; the terminal
//! client only uses the kind and the one-shot bookkeeping.

use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CelebrationKind {
    Confetti,
    Fireworks,
    Particles,
    Slowmo,
}

impl CelebrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CelebrationKind::Confetti => "confetti",
            CelebrationKind::Fireworks => "fireworks",
            CelebrationKind::Particles => "particles",
            CelebrationKind::Slowmo => "slowmo",
        }
    }

    /// Exact, case-sensitive match on the directive suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "confetti" => Some(CelebrationKind::Confetti),
            "fireworks" => Some(CelebrationKind::Fireworks),
            "particles" => Some(CelebrationKind::Particles),
            "slowmo" => Some(CelebrationKind::Slowmo),
            _ => None,
        }
    }

    /// Parses a full directive name such as `celebrate-confetti`.
    pub fn from_directive(name: &str) -> Option<Self> {
        name.strip_prefix("celebrate-").and_then(Self::from_suffix)
    }

    pub fn burst(&self) -> BurstParams {
        let base = BurstParams::default();
        match self {
            CelebrationKind::Confetti => BurstParams {
                particle_count: 100,
                spread: 70,
                origin_y: Some(0.6),
                ..base
            },
            CelebrationKind::Fireworks => BurstParams {
                particle_count: 50,
                spread: 360,
                start_velocity: Some(30),
                ticks: 60,
                duration_ms: Some(3000),
                interval_ms: Some(250),
                ..base
            },
            CelebrationKind::Particles => BurstParams {
                particle_count: 50,
                spread: 45,
                origin_y: Some(0.5),
                gravity: 0.5,
                scalar: 0.8,
                ..base
            },
            CelebrationKind::Slowmo => BurstParams {
                particle_count: 80,
                spread: 60,
                origin_y: Some(0.3),
                gravity: 0.3,
                decay: 0.95,
                ticks: 400,
                scalar: 1.2,
                drift: 0.5,
                ..base
            },
        }
    }

    pub fn all() -> [CelebrationKind; 4] {
        [
            CelebrationKind::Confetti,
            CelebrationKind::Fireworks,
            CelebrationKind::Particles,
            CelebrationKind::Slowmo,
        ]
    }
}

/// One confetti burst. For repeating kinds `particle_count` is the peak,
/// scaled down linearly as `duration_ms` runs out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurstParams {
    pub particle_count: u32,
    pub spread: u32,
    /// Vertical origin in viewport fractions; `None` means randomised per burst
    pub origin_y: Option<f32>,
    pub start_velocity: Option<u32>,
    pub gravity: f32,
    pub decay: f32,
    pub ticks: u32,
    pub scalar: f32,
    pub drift: f32,
    pub duration_ms: Option<u32>,
    pub interval_ms: Option<u32>,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            particle_count: 50,
            spread: 45,
            origin_y: None,
            start_velocity: None,
            gravity: 1.0,
            decay: 0.9,
            ticks: 200,
            scalar: 1.0,
            drift: 0.0,
            duration_ms: None,
            interval_ms: None,
        }
    }
}

impl BurstParams {
    /// Particle count for a repeating burst with `remaining_ms` left.
    pub fn particles_at(&self, remaining_ms: u32) -> u32 {
        match self.duration_ms {
            Some(duration) if duration > 0 => {
                let left = remaining_ms.min(duration) as f32 / duration as f32;
                (self.particle_count as f32 * left).round() as u32
            }
            _ => self.particle_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimationTrigger {
    pub kind: CelebrationKind,
    pub autoplay: bool,
}

impl AnimationTrigger {
    pub fn autoplay(kind: CelebrationKind) -> Self {
        Self {
            kind,
            autoplay: true,
        }
    }
}

/// Identifies one celebration within one message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountKey {
    pub message_id: String,
    pub ordinal: usize,
}

/// Remembers which celebrations already played so re-renders stay quiet.
#[derive(Debug, Default)]
pub struct MountLedger {
    fired: HashSet<MountKey>,
}

impl MountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time a key is seen.
    pub fn should_fire(&mut self, message_id: &str, ordinal: usize) -> bool {
        self.fired.insert(MountKey {
            message_id: message_id.to_string(),
            ordinal,
        })
    }

    /// Unmounting a message lets its celebrations play again on next mount.
    pub fn unmount(&mut self, message_id: &str) {
        self.fired.retain(|key| key.message_id != message_id);
    }

    pub fn clear(&mut self) {
        self.fired.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_names() {
        assert_eq!(
            CelebrationKind::from_directive("celebrate-fireworks"),
            Some(CelebrationKind::Fireworks)
        );
        assert_eq!(CelebrationKind::from_directive("celebrate-rainbow"), None);
        assert_eq!(CelebrationKind::from_directive("celebrate-Confetti"), None);
        assert_eq!(CelebrationKind::from_directive("confetti"), None);
    }

    #[test]
    fn test_burst_parameters() {
        let confetti = CelebrationKind::Confetti.burst();
        assert_eq!(confetti.particle_count, 100);
        assert_eq!(confetti.spread, 70);
        assert_eq!(confetti.origin_y, Some(0.6));
        assert_eq!(confetti.gravity, 1.0);

        let slowmo = CelebrationKind::Slowmo.burst();
        assert_eq!(slowmo.ticks, 400);
        assert_eq!(slowmo.decay, 0.95);
        assert_eq!(slowmo.drift, 0.5);

        let fireworks = CelebrationKind::Fireworks.burst();
        assert_eq!(fireworks.origin_y, None);
        assert_eq!(fireworks.interval_ms, Some(250));
        assert_eq!(fireworks.particles_at(3000), 50);
        assert_eq!(fireworks.particles_at(1500), 25);
        assert_eq!(fireworks.particles_at(0), 0);
        assert_eq!(confetti.particles_at(0), 100);
    }

    #[test]
    fn test_burst_serializes_camel_case() {
        let json = serde_json::to_value(CelebrationKind::Particles.burst()).unwrap();
        assert_eq!(json["particleCount"], 50);
        assert_eq!(json["spread"], 45);
    }

    #[test]
    fn test_ledger_fires_once_per_mount() {
        let mut ledger = MountLedger::new();

        assert!(ledger.should_fire("msg-1", 0));
        assert!(!ledger.should_fire("msg-1", 0));
        assert!(ledger.should_fire("msg-1", 1));
        assert!(ledger.should_fire("msg-2", 0));

        ledger.unmount("msg-1");
        assert!(ledger.should_fire("msg-1", 0));
        assert!(!ledger.should_fire("msg-2", 0));
    }
}
