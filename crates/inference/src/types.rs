//! Request/response wire types for the inference provider.

use serde::{Deserialize, Serialize};

use crate::tuning;

/// Client-controlled generation parameters. Everything else is fixed by
/// [`crate::tuning`].
#[derive(Debug, Clone)]
pub struct GenerationInput {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: i32,
    pub height: i32,
}

impl GenerationInput {
    /// Apply defaults for unset geometry/negative-prompt fields.
    pub fn new(
        prompt: String,
        negative_prompt: Option<String>,
        width: Option<i32>,
        height: Option<i32>,
    ) -> Self {
        Self {
            prompt,
            negative_prompt,
            width: width.unwrap_or(tuning::DEFAULT_DIMENSION),
            height: height.unwrap_or(tuning::DEFAULT_DIMENSION),
        }
    }

    /// Negative prompt with the server-side default applied.
    pub fn negative_prompt_or_default(&self) -> &str {
        self.negative_prompt
            .as_deref()
            .unwrap_or(tuning::DEFAULT_NEGATIVE_PROMPT)
    }
}

/// Full parameter object sent to the provider: client fields merged with the
/// fixed tuning constants.
#[derive(Debug, Serialize)]
pub(crate) struct PredictionInput<'a> {
    pub prompt: &'a str,
    pub negative_prompt: &'a str,
    pub width: i32,
    pub height: i32,
    pub refine: &'static str,
    pub scheduler: &'static str,
    pub lora_scale: f64,
    pub num_outputs: i32,
    pub guidance_scale: f64,
    pub apply_watermark: bool,
    pub high_noise_frac: f64,
    pub prompt_strength: f64,
    pub num_inference_steps: i32,
}

impl<'a> PredictionInput<'a> {
    pub fn from_input(input: &'a GenerationInput) -> Self {
        Self {
            prompt: &input.prompt,
            negative_prompt: input.negative_prompt_or_default(),
            width: input.width,
            height: input.height,
            refine: tuning::REFINE,
            scheduler: tuning::SCHEDULER,
            lora_scale: tuning::LORA_SCALE,
            num_outputs: tuning::NUM_OUTPUTS,
            guidance_scale: tuning::GUIDANCE_SCALE,
            apply_watermark: tuning::APPLY_WATERMARK,
            high_noise_frac: tuning::HIGH_NOISE_FRAC,
            prompt_strength: tuning::PROMPT_STRENGTH,
            num_inference_steps: tuning::NUM_INFERENCE_STEPS,
        }
    }
}

/// Prediction resource as returned by the provider.
#[derive(Debug, Deserialize)]
pub(crate) struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    /// Artifact URLs, present once the prediction succeeds.
    #[serde(default)]
    pub output: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Provider-side prediction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PredictionStatus::Starting | PredictionStatus::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_geometry_and_negative_prompt() {
        let input = GenerationInput::new("a red fox".into(), None, None, None);
        assert_eq!(input.width, 1024);
        assert_eq!(input.height, 1024);
        assert_eq!(
            input.negative_prompt_or_default(),
            tuning::DEFAULT_NEGATIVE_PROMPT
        );
    }

    #[test]
    fn client_geometry_is_respected() {
        let input =
            GenerationInput::new("a red fox".into(), Some("blurry".into()), Some(512), Some(768));
        let wire = PredictionInput::from_input(&input);
        assert_eq!(wire.width, 512);
        assert_eq!(wire.height, 768);
        assert_eq!(wire.negative_prompt, "blurry");
    }

    #[test]
    fn tuning_constants_are_not_client_controlled() {
        let input = GenerationInput::new("a red fox".into(), None, None, None);
        let wire = serde_json::to_value(PredictionInput::from_input(&input)).unwrap();
        assert_eq!(wire["num_inference_steps"], 25);
        assert_eq!(wire["guidance_scale"], 7.5);
        assert_eq!(wire["scheduler"], "K_EULER");
        assert_eq!(wire["apply_watermark"], false);
    }

    #[test]
    fn prediction_status_terminality() {
        assert!(!PredictionStatus::Starting.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
        assert!(PredictionStatus::Succeeded.is_terminal());
        assert!(PredictionStatus::Failed.is_terminal());
        assert!(PredictionStatus::Canceled.is_terminal());
    }
}
