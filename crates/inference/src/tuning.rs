//! Fixed model-tuning parameters.
//!
//! These are server-side constants, not client inputs: the public request
//! contract accepts only prompt, negative prompt, and geometry. Every
//! generation row records the values it ran with.

pub const REFINE: &str = "expert_ensemble_refiner";
pub const SCHEDULER: &str = "K_EULER";
pub const LORA_SCALE: f64 = 0.6;
pub const NUM_OUTPUTS: i32 = 1;
pub const GUIDANCE_SCALE: f64 = 7.5;
pub const APPLY_WATERMARK: bool = false;
pub const HIGH_NOISE_FRAC: f64 = 0.9;
pub const PROMPT_STRENGTH: f64 = 0.8;
pub const NUM_INFERENCE_STEPS: i32 = 25;

/// Negative prompt applied when the client does not supply one.
pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "ugly, broken, distorted, nsfw, inappropriate content";

/// Default artifact edge length in pixels.
pub const DEFAULT_DIMENSION: i32 = 1024;
