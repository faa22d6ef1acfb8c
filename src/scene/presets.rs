//! 内置场景预设
//!
//! 两个场景只在粒子数量、颜色和回收策略上不同，共享同一套节点布局。

use super::description::{
    FogConfig, MaterialConfig, NodeDescriptor, NodeKind, SceneConfig, SceneEnvironment,
};
use crate::animation::Orbit;
use crate::particles::{AxisRange, ParticleStyle, ParticleSystemConfig, RecyclePolicy, SpawnRegion};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 场景预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenePreset {
    /// 漫天落雪
    Snowfall,
    /// 燃烧立方体上方的火星与落雪
    EmberSnow,
}

impl ScenePreset {
    pub const ALL: [ScenePreset; 2] = [ScenePreset::Snowfall, ScenePreset::EmberSnow];

    pub fn name(self) -> &'static str {
        match self {
            ScenePreset::Snowfall => "snowfall",
            ScenePreset::EmberSnow => "ember-snow",
        }
    }

    pub fn config(self) -> SceneConfig {
        match self {
            ScenePreset::Snowfall => snowfall(),
            ScenePreset::EmberSnow => ember_snow(),
        }
    }
}

impl fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenePreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown scene preset: {}", s))
    }
}

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

fn hex(rgb: u32) -> [f32; 3] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

fn environment() -> SceneEnvironment {
    SceneEnvironment {
        background: [0.7, 0.4, 0.6],
        fog: Some(FogConfig {
            color: hex(0xffc0cb),
            near: 1.0,
            far: 100.0,
        }),
        ..Default::default()
    }
}

fn nodes(cube_texture: &str, sphere_color: u32) -> Vec<NodeDescriptor> {
    let sphere_radius = 3.0;
    vec![
        NodeDescriptor::new("cube", NodeKind::Cube { size: 4.0 })
            .at(Vec3::new(2.0, 10.0, 0.0))
            .with_material(MaterialConfig {
                texture: Some(cube_texture.to_string()),
                ..Default::default()
            })
            .spinning(Vec3::new(0.0, 0.02, 0.0)),
        NodeDescriptor::new(
            "sphere",
            NodeKind::Sphere {
                radius: sphere_radius,
            },
        )
        .at(Vec3::new(-sphere_radius - 2.0, 10.0, 0.0))
        .with_material(MaterialConfig {
            color: Some(hex(sphere_color)),
            normal_map: Some("image/texture_kertas.jpeg".to_string()),
            ..Default::default()
        })
        .spinning(Vec3::new(0.0, 0.04, 0.0)),
        NodeDescriptor::new(
            "ground",
            NodeKind::Plane {
                width: 256.0,
                height: 256.0,
            },
        )
        .rotated(Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0))
        .with_material(MaterialConfig {
            texture: Some("image/pebble.jpeg".to_string()),
            normal_map: Some("image/normal-map.jpg".to_string()),
            texture_repeat: Some([16.0, 16.0]),
            double_sided: true,
            ..Default::default()
        }),
        NodeDescriptor::new(
            "sun",
            NodeKind::DirectionalLight {
                color: WHITE,
                intensity: 3.0,
            },
        )
        .at(Vec3::new(5.0, 30.0, 30.0))
        .orbiting(Orbit::new(10.0)),
        NodeDescriptor::new(
            "ambient",
            NodeKind::AmbientLight {
                color: hex(0xec8305),
                intensity: 0.3,
            },
        ),
    ]
}

fn snowfall() -> SceneConfig {
    let snow = ParticleSystemConfig::falling(
        1000,
        0.2,
        0.0,
        SpawnRegion::new(
            AxisRange::new(-100.0, 100.0),
            // 地面是回收边界，最低从一步之上生成
            AxisRange::new(0.2, 200.0),
            AxisRange::new(-100.0, 100.0),
        ),
    )
    .named("snow")
    .with_policy(RecyclePolicy::FullRespawn { reset_to: 200.0 })
    .with_style(ParticleStyle {
        color: WHITE,
        size: 1.0,
        opacity: 0.8,
    });

    SceneConfig {
        name: ScenePreset::Snowfall.name().to_string(),
        environment: environment(),
        nodes: nodes("image/dkotak_texture.jpg", 0xffc0cb),
        particle_systems: vec![snow],
    }
}

fn ember_snow() -> SceneConfig {
    let embers = ParticleSystemConfig::rising(
        200,
        0.1,
        15.0,
        SpawnRegion::new(
            AxisRange::centered(2.0, 2.0),
            AxisRange::new(10.0, 12.0),
            AxisRange::centered(0.0, 2.0),
        ),
    )
    .named("embers")
    .with_style(ParticleStyle {
        color: hex(0xff4500),
        size: 1.5,
        opacity: 0.9,
    });

    let snow = ParticleSystemConfig::falling(
        500,
        0.1,
        0.0,
        SpawnRegion::new(
            AxisRange::centered(0.0, 50.0),
            AxisRange::new(20.0, 70.0),
            AxisRange::centered(0.0, 50.0),
        ),
    )
    .named("snow")
    .with_style(ParticleStyle {
        color: WHITE,
        size: 0.5,
        opacity: 0.8,
    });

    SceneConfig {
        name: ScenePreset::EmberSnow.name().to_string(),
        environment: environment(),
        nodes: nodes("image/kotak_texture.jpg", 0xff7f50),
        particle_systems: vec![embers, snow],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in ScenePreset::ALL {
            let config = preset.config();
            assert_eq!(config.name, preset.name());
            for system in &config.particle_systems {
                assert!(system.validate().is_ok(), "{} / {}", preset, system.name);
            }
        }
    }

    #[test]
    fn test_snowfall_never_spawns_on_the_ground() {
        let config = ScenePreset::Snowfall.config();
        let snow = &config.particle_systems[0];
        let y = snow.spawn_region.y;
        assert!(!snow.in_recycle_zone(y.min));
        assert!(!snow.in_recycle_zone(y.max));
        assert_eq!(snow.recycle_policy, RecyclePolicy::FullRespawn { reset_to: 200.0 });
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("snowfall".parse(), Ok(ScenePreset::Snowfall));
        assert_eq!(" Ember-Snow ".parse(), Ok(ScenePreset::EmberSnow));
        assert!("rain".parse::<ScenePreset>().is_err());
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(hex(0xff0000), [1.0, 0.0, 0.0]);
    }
}
