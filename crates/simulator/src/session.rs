//! Trial-by-trial stream for the live performance: each trial picks Alice's
//! and Bob's setting at random from the CHSH pair and detects one photon pair.

use quantum::{
    measurement::{sample_outcome, sanitize_probabilities},
    Outcome,
};
use rng::ShotRng;
use serde::Serialize;

use crate::engine::BellEngine;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Trial {
    /// 0 → a0, 1 → a1
    pub alice_setting: u8,
    /// 0 → b0, 1 → b1
    pub bob_setting: u8,
    pub theta_a: f64,
    pub theta_b: f64,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Outcome,
}

fn serialize_outcome<S: serde::Serializer>(o: &Outcome, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u8(o.code())
}

pub struct BellSession<'a> {
    engine: &'a BellEngine,
    rng: ShotRng,
    trials: u64,
}

impl<'a> BellSession<'a> {
    pub fn new(engine: &'a BellEngine, rng: ShotRng) -> Self {
        Self {
            engine,
            rng,
            trials: 0,
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn next_trial(&mut self) -> Result<Trial> {
        let [a0, a1, b0, b1] = self.engine.chsh_angles();
        let alice_setting = u8::from(self.rng.next_f64(b"ALICE_SETTING") >= 0.5);
        let bob_setting = u8::from(self.rng.next_f64(b"BOB_SETTING") >= 0.5);
        let theta_a = if alice_setting == 0 { a0 } else { a1 };
        let theta_b = if bob_setting == 0 { b0 } else { b1 };

        let probs = sanitize_probabilities(self.engine.probabilities(theta_a, theta_b))?;
        let outcome = sample_outcome(&probs, &mut self.rng);
        self.trials += 1;

        Ok(Trial {
            alice_setting,
            bob_setting,
            theta_a,
            theta_b,
            outcome,
        })
    }
}

impl Iterator for BellSession<'_> {
    type Item = Result<Trial>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_trial())
    }
}
