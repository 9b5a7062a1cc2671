use serde::{Deserialize, Serialize};

use crate::physics::BodyMaterial;

/// 波形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveKind {
    Sine,
    Cosine,
}

/// 起伏剖面的一层
///
/// `amplitude * sin(x * frequency + phase)` (或 `cos`)。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveLayer {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub kind: WaveKind,
}

impl WaveLayer {
    pub const fn sine(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            kind: WaveKind::Sine,
        }
    }

    pub const fn cosine(amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            kind: WaveKind::Cosine,
        }
    }

    pub fn sample(&self, x: f32) -> f32 {
        let t = x * self.frequency + self.phase;
        match self.kind {
            WaveKind::Sine => self.amplitude * t.sin(),
            WaveKind::Cosine => self.amplitude * t.cos(),
        }
    }

    /// 本层 |d/dx| 的上界
    pub fn max_slope(&self) -> f32 {
        self.amplitude.abs() * self.frequency.abs()
    }
}

/// 海浪层: 振幅, 空间频率, 相位速度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OceanWave {
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    pub color: [u8; 3],
}

/// 海洋渲染的颜色与波浪
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanStyle {
    pub base_color: [u8; 3],
    pub foam_color: [u8; 3],
    pub wall_color: [u8; 3],
    /// 污染上升时海洋颜色趋向的目标色
    pub polluted_color: [u8; 3],
    pub waves: [OceanWave; 3],
    pub foam_patches: usize,
    pub wall_width: f32,
    /// 波浪条带的水平采样步长
    pub wave_step: f32,
}

impl Default for OceanStyle {
    fn default() -> Self {
        Self {
            base_color: [20, 70, 140],
            foam_color: [225, 240, 250],
            wall_color: [70, 60, 52],
            polluted_color: [38, 34, 22],
            waves: [
                OceanWave {
                    amplitude: 6.0,
                    frequency: 0.012,
                    speed: 1.1,
                    color: [30, 95, 170],
                },
                OceanWave {
                    amplitude: 4.0,
                    frequency: 0.021,
                    speed: -1.7,
                    color: [45, 115, 190],
                },
                OceanWave {
                    amplitude: 2.5,
                    frequency: 0.037,
                    speed: 2.6,
                    color: [70, 140, 205],
                },
            ],
            foam_patches: 24,
            wall_width: 14.0,
            wave_step: 16.0,
        }
    }
}

/// 分块预渲染的地层厚度与装饰间距
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundStyle {
    pub grass_depth: f32,
    pub dirt_depth: f32,
    /// 高于此线 (y 更小) 的顶点加雪顶
    pub snow_line: f32,
    pub snow_depth: f32,
    pub snow_color: [u8; 3],
    pub tuft_spacing: f32,
    pub bush_spacing: f32,
}

impl Default for GroundStyle {
    fn default() -> Self {
        Self {
            grass_depth: 8.0,
            dirt_depth: 42.0,
            snow_line: 520.0,
            snow_depth: 12.0,
            snow_color: [240, 244, 250],
            tuft_spacing: 48.0,
            bush_spacing: 220.0,
        }
    }
}

/// 地形生成配置
///
/// 生成流程的全部常量都在这里。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// 顶点覆盖的世界 x 范围
    pub world_start: f32,
    pub world_end: f32,
    /// 世界底部 (y 向下增长)
    pub world_height: f32,
    /// 顶点间距
    pub segment_width: f32,
    /// 基准地面线, `world_height` 的比例
    pub base_height_fraction: f32,
    pub layers: Vec<WaveLayer>,

    /// 山地岩石纹理 (Perlin) 的振幅与频率
    pub rock_amplitude: f32,
    pub rock_frequency: f64,
    pub rock_seed: u32,

    /// 滑动平均每侧的采样数
    pub smoothing_radius: usize,

    /// 山地以外的安全高度带
    pub clamp_min: f32,
    pub clamp_max: f32,

    /// 海平面高度
    pub ocean_y: f32,

    /// 着陆平台左右额外压平的宽度 (右侧为旗帜)
    pub pad_margin_left: f32,
    pub pad_margin_right: f32,

    /// 高台扫描: 步长, 随机抖动, 窗口宽度
    pub plateau_spacing: f32,
    pub plateau_jitter: f32,
    pub plateau_width: f32,
    /// 高台与着陆平台的最小距离
    pub plateau_pad_clearance: f32,
    pub plateau_min_y: f32,
    pub plateau_max_y: f32,

    pub chunk_width: f32,
    /// 分块边缘多画的宽度, 遮住接缝
    pub chunk_overlap: f32,
    /// 视口两侧的裁剪余量
    pub cull_margin: f32,

    pub body_thickness: f32,
    pub wall_thickness: f32,
    pub terrain_material: BodyMaterial,
    pub wall_material: BodyMaterial,

    /// 范围外高度查询的返回值
    pub default_height: f32,
    /// 布局引用的区域不存在时使用
    pub fallback_water_bounds: (f32, f32),
    pub fallback_mountain_bounds: (f32, f32),

    pub ground: GroundStyle,
    pub ocean: OceanStyle,

    /// 高台与装饰的随机种子
    pub seed: u64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            world_start: 0.0,
            world_end: 40_000.0,
            world_height: 1000.0,
            segment_width: 20.0,
            base_height_fraction: 0.7,
            layers: vec![
                WaveLayer::sine(60.0, 0.0008, 0.0),
                WaveLayer::cosine(35.0, 0.0017, 1.3),
                WaveLayer::sine(20.0, 0.0041, 2.7),
                WaveLayer::cosine(12.0, 0.009, 0.6),
                WaveLayer::sine(6.0, 0.021, 4.1),
                WaveLayer::cosine(3.0, 0.047, 5.3),
            ],
            rock_amplitude: 8.0,
            rock_frequency: 0.035,
            rock_seed: 7,
            smoothing_radius: 3,
            clamp_min: 560.0,
            clamp_max: 850.0,
            ocean_y: 820.0,
            pad_margin_left: 20.0,
            pad_margin_right: 40.0,
            plateau_spacing: 900.0,
            plateau_jitter: 600.0,
            plateau_width: 160.0,
            plateau_pad_clearance: 200.0,
            plateau_min_y: 580.0,
            plateau_max_y: 830.0,
            chunk_width: 1000.0,
            chunk_overlap: 20.0,
            cull_margin: 200.0,
            body_thickness: 10.0,
            wall_thickness: 20.0,
            terrain_material: BodyMaterial {
                friction: 0.6,
                restitution: 0.1,
            },
            wall_material: BodyMaterial {
                friction: 0.1,
                restitution: 0.7,
            },
            default_height: 700.0,
            fallback_water_bounds: (20_000.0, 24_000.0),
            fallback_mountain_bounds: (28_000.0, 32_000.0),
            ground: GroundStyle::default(),
            ocean: OceanStyle::default(),
            seed: 0x5eed_7e55,
        }
    }
}

impl TerrainConfig {
    /// 默认配置, 换一个世界范围
    pub fn with_world(world_start: f32, world_end: f32) -> Self {
        Self {
            world_start,
            world_end,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn base_height(&self) -> f32 {
        self.world_height * self.base_height_fraction
    }

    /// 各层最大斜率之和
    pub fn max_noise_slope(&self) -> f32 {
        self.layers.iter().map(WaveLayer::max_slope).sum()
    }

    /// 顶点数 (含终点)
    pub fn vertex_count(&self) -> usize {
        let span = (self.world_end - self.world_start).max(0.0);
        let step = self.segment_width.max(f32::EPSILON);
        (span / step).ceil() as usize + 1
    }
}
