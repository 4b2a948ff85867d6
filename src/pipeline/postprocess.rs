use crate::io::config::PostConfig;
use log::debug;

/// Bloom pass parameters. Pure pass-throughs to the rendering engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub enabled: bool,
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 0.85,
            strength: 0.4,
            radius: 0.2,
        }
    }
}

/// Screen-space ambient occlusion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsaoSettings {
    pub enabled: bool,
    pub kernel_radius: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for SsaoSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            kernel_radius: 0.5,
            min_distance: 0.001,
            max_distance: 0.1,
        }
    }
}

/// Anti-aliasing toggle (SMAA).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaaSettings {
    pub enabled: bool,
}

impl Default for SmaaSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The post-processing chain configuration, in pass order:
/// render -> SSAO -> bloom -> SMAA -> output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectChain {
    pub bloom: BloomSettings,
    pub ssao: SsaoSettings,
    pub smaa: SmaaSettings,
}

impl EffectChain {
    pub fn from_config(config: &PostConfig) -> Self {
        let mut chain = Self::default();
        chain.bloom.enabled = config.bloom_enabled;
        chain.set_bloom_threshold(config.bloom_threshold);
        chain.set_bloom_strength(config.bloom_strength);
        chain.set_bloom_radius(config.bloom_radius);
        chain.ssao.enabled = config.ssao_enabled;
        chain.set_ssao_kernel_radius(config.ssao_kernel_radius);
        chain.set_ssao_distances(config.ssao_min_distance, config.ssao_max_distance);
        chain.smaa.enabled = config.smaa_enabled;
        chain
    }

    // Setters clamp to the ranges the underlying passes accept.

    pub fn set_bloom_threshold(&mut self, threshold: f32) {
        self.bloom.threshold = threshold.clamp(0.0, 1.0);
    }

    pub fn set_bloom_strength(&mut self, strength: f32) {
        self.bloom.strength = strength.max(0.0);
    }

    pub fn set_bloom_radius(&mut self, radius: f32) {
        self.bloom.radius = radius.clamp(0.0, 1.0);
    }

    pub fn set_ssao_kernel_radius(&mut self, radius: f32) {
        self.ssao.kernel_radius = radius.max(1e-3);
    }

    /// Min distance always stays strictly below max distance.
    pub fn set_ssao_distances(&mut self, min: f32, max: f32) {
        self.ssao.min_distance = min.max(0.0);
        self.ssao.max_distance = max.max(self.ssao.min_distance + 1e-6);
    }

    /// Restores every pass to its default parameters (used when a custom
    /// environment is cleared).
    pub fn reset_to_defaults(&mut self) {
        debug!("resetting post-processing chain to defaults");
        *self = Self::default();
    }
}
