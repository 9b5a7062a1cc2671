//! Raw height profile
//!
//! Six layered sine/cosine waves approximate rolling terrain without a real
//! noise field. The mountain region replaces that profile with the tallest of
//! its Gaussian peaks plus a small Perlin rock texture.

use noise::{NoiseFn, Perlin};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::config::TerrainConfig;
use crate::layout::MountainRange;

/// 基准线加各层波形
pub fn base_profile(x: f32, config: &TerrainConfig) -> f32 {
    config.base_height() + config.layers.iter().map(|layer| layer.sample(x)).sum::<f32>()
}

/// 原始剖面 (平滑前) 的采样器
pub struct HeightSampler<'a> {
    config: &'a TerrainConfig,
    mountain: Option<(&'a MountainRange, (f32, f32))>,
    rock: Perlin,
}

impl<'a> HeightSampler<'a> {
    /// `mountain` 为山脉及其 `[start, end)` 边界
    pub fn new(config: &'a TerrainConfig, mountain: Option<(&'a MountainRange, (f32, f32))>) -> Self {
        Self {
            config,
            mountain,
            rock: Perlin::new(config.rock_seed),
        }
    }

    pub fn in_mountain(&self, x: f32) -> bool {
        self.mountain
            .is_some_and(|(_, (start, end))| x >= start && x < end)
    }

    /// 岩石纹理, 取值 `[-rock_amplitude, rock_amplitude]`
    pub fn rock_texture(&self, x: f32) -> f32 {
        let n = self.rock.get([x as f64 * self.config.rock_frequency, 0.5]);
        n.clamp(-1.0, 1.0) as f32 * self.config.rock_amplitude
    }

    pub fn sample(&self, x: f32) -> f32 {
        match self.mountain {
            Some((range, (start, end))) if x >= start && x < end => {
                self.config.base_height() - range.bump(x) + self.rock_texture(x)
            }
            _ => base_profile(x, self.config),
        }
    }

    /// 按顺序采样全部 x
    pub fn sample_all(&self, xs: &[f32]) -> Vec<f32> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            xs.par_iter().map(|&x| self.sample(x)).collect()
        }
        #[cfg(target_arch = "wasm32")]
        {
            xs.iter().map(|&x| self.sample(x)).collect()
        }
    }
}
