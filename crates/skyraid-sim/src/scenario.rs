//! Level presets — hardcoded authored configurations.
//!
//! Each preset defines the wave schedule, formation catalog, pickup and
//! hazard tuning, and transition destinations.

use skyraid_core::config::*;
use skyraid_core::constants::*;
use skyraid_core::types::{Position, Velocity};

/// Default mission: three escalating waves over forty seconds.
pub fn default_level() -> LevelConfig {
    let formations = vec![
        line_formation(FormationId(0), 3, TemplateId(10), 1.2),
        line_formation(FormationId(1), 4, TemplateId(11), 1.5),
        line_formation(FormationId(2), 5, TemplateId(12), 1.8),
    ];

    LevelConfig {
        waves: vec![
            WaveDescriptor {
                offset_secs: 0.0,
                formation: FormationId(0),
                entity_count: 3,
            },
            WaveDescriptor {
                offset_secs: 20.0,
                formation: FormationId(1),
                entity_count: 4,
            },
            WaveDescriptor {
                offset_secs: 40.0,
                formation: FormationId(2),
                entity_count: 5,
            },
        ],
        formations,
        pickups: PickupConfig {
            health_template: Some(PickupTemplate {
                template: TemplateId(20),
                half_height: 0.4,
            }),
            weapon_template: Some(PickupTemplate {
                template: TemplateId(21),
                half_height: 0.4,
            }),
            ..Default::default()
        },
        hazards: HazardConfig {
            pool: vec![
                TemplateId(30),
                TemplateId(31),
                TemplateId(32),
                TemplateId(33),
            ],
            ..Default::default()
        },
        next_scene: "level_2".to_string(),
        fallback_scene: "main_menu".to_string(),
        roster: vec![TemplateId(0), TemplateId(1), TemplateId(2)],
        ..Default::default()
    }
}

/// Saturation mission: five tightly-spaced waves, including a cosmetic
/// zero-entity flyover.
pub fn saturation_level() -> LevelConfig {
    let formations = vec![
        line_formation(FormationId(0), 4, TemplateId(10), 1.5),
        line_formation(FormationId(1), 4, TemplateId(11), 1.8),
        line_formation(FormationId(2), 0, TemplateId(12), 0.0),
        line_formation(FormationId(3), 6, TemplateId(12), 2.0),
        line_formation(FormationId(4), 6, TemplateId(13), 2.2),
    ];

    LevelConfig {
        waves: vec![
            WaveDescriptor {
                offset_secs: 0.0,
                formation: FormationId(0),
                entity_count: 4,
            },
            WaveDescriptor {
                offset_secs: 10.0,
                formation: FormationId(1),
                entity_count: 4,
            },
            // Cosmetic flyover: counts as a wave, declares no entities.
            WaveDescriptor {
                offset_secs: 18.0,
                formation: FormationId(2),
                entity_count: 0,
            },
            WaveDescriptor {
                offset_secs: 25.0,
                formation: FormationId(3),
                entity_count: 6,
            },
            WaveDescriptor {
                offset_secs: 35.0,
                formation: FormationId(4),
                entity_count: 6,
            },
        ],
        formations,
        pickups: PickupConfig {
            interval_secs: 8.0,
            health_template: Some(PickupTemplate {
                template: TemplateId(20),
                half_height: 0.4,
            }),
            weapon_template: Some(PickupTemplate {
                template: TemplateId(21),
                half_height: 0.4,
            }),
            ..Default::default()
        },
        hazards: HazardConfig {
            pool: vec![TemplateId(30), TemplateId(31), TemplateId(32)],
            interval_secs: 10.0,
            ..Default::default()
        },
        max_duration_secs: 240.0,
        next_scene: "level_3".to_string(),
        fallback_scene: "main_menu".to_string(),
        roster: vec![TemplateId(0), TemplateId(1), TemplateId(2)],
        ..Default::default()
    }
}

/// Build a horizontal line of `count` identical threats entering from
/// above the playfield, descending at `speed`.
fn line_formation(id: FormationId, count: u32, template: TemplateId, speed: f32) -> Formation {
    let span = PLAYFIELD_MAX_X - PLAYFIELD_MIN_X;
    let threats = (0..count)
        .map(|i| {
            // Even spacing across the field width.
            let t = (i as f32 + 0.5) / count as f32;
            ThreatSpec {
                position: Position::new(PLAYFIELD_MIN_X + span * t, PLAYFIELD_TOP_Y + 1.0),
                velocity: Velocity::new(0.0, -speed),
                template,
            }
        })
        .collect();
    Formation { id, threats }
}
