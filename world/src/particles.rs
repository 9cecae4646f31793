//! Cosmetic particle bursts. Never consulted by gameplay.

use std::{collections::VecDeque, f32::consts::TAU};

use ghostlane_core::{ParticleId, ParticleKind, ParticleSnapshot, Tint, MAX_PARTICLES};

const LIFE_DECAY_PER_FRAME: f32 = 0.05;
const BURST_SPEED: f32 = 0.5;
const LANE_HEIGHT_PERCENT: f32 = 20.0;

pub(crate) const BUILD_TINT: Tint = Tint::from_rgb(0x60, 0xa5, 0xfa);
pub(crate) const SELL_TINT: Tint = Tint::from_rgb(0xef, 0x44, 0x44);
pub(crate) const LEAK_TINT: Tint = Tint::from_rgb(0xef, 0x44, 0x44);
pub(crate) const ENERGY_TINT: Tint = Tint::from_rgb(0xa3, 0xe6, 0x35);
pub(crate) const DEATH_TINT: Tint = Tint::from_rgb(0xe2, 0xe8, 0xf0);
pub(crate) const PLASMA_TINT: Tint = Tint::from_rgb(0xff, 0xff, 0xff);
pub(crate) const WIND_TINT: Tint = Tint::from_rgb(0xcb, 0xd5, 0xe1);
pub(crate) const BEAM_TINT: Tint = Tint::from_rgb(0xa8, 0x55, 0xf7);

#[derive(Clone, Debug)]
struct Particle {
    id: ParticleId,
    kind: ParticleKind,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: f32,
    tint: Tint,
}

/// Bounded pool of live particles, oldest first.
#[derive(Debug)]
pub(crate) struct ParticleField {
    particles: VecDeque<Particle>,
    next_id: ParticleId,
}

impl ParticleField {
    pub(crate) fn new() -> Self {
        Self {
            particles: VecDeque::new(),
            next_id: ParticleId::new(0),
        }
    }

    /// Emits `count` fragments radiating at evenly spaced angles.
    pub(crate) fn burst(&mut self, row: u32, x: f32, tint: Tint, count: u32) {
        for index in 0..count {
            let angle = TAU * index as f32 / count as f32;
            self.push(
                ParticleKind::Burst,
                row,
                x,
                (angle.cos() * BURST_SPEED, angle.sin() * BURST_SPEED),
                tint,
            );
        }
    }

    /// Emits a stationary ring.
    pub(crate) fn ring(&mut self, row: u32, x: f32, tint: Tint) {
        self.push(ParticleKind::Ring, row, x, (0.0, 0.0), tint);
    }

    /// Ages and moves every particle, dropping the expired ones.
    pub(crate) fn decay(&mut self, frames: f32) {
        for particle in &mut self.particles {
            particle.life -= LIFE_DECAY_PER_FRAME * frames;
            particle.x += particle.vx * frames;
            particle.y += particle.vy * frames;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }

    pub(crate) fn snapshots(&self) -> Vec<ParticleSnapshot> {
        self.particles
            .iter()
            .map(|particle| ParticleSnapshot {
                id: particle.id,
                kind: particle.kind,
                x: particle.x,
                y: particle.y,
                velocity: (particle.vx, particle.vy),
                life: particle.life,
                tint: particle.tint,
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.particles.len()
    }

    fn push(&mut self, kind: ParticleKind, row: u32, x: f32, velocity: (f32, f32), tint: Tint) {
        if self.particles.len() == MAX_PARTICLES {
            let _ = self.particles.pop_front();
        }
        let id = self.next_id;
        self.next_id = ParticleId::new(id.get().wrapping_add(1));
        self.particles.push_back(Particle {
            id,
            kind,
            x,
            y: row as f32 * LANE_HEIGHT_PERCENT + LANE_HEIGHT_PERCENT / 2.0,
            vx: velocity.0,
            vy: velocity.1,
            life: 1.0,
            tint,
        });
    }
}
