//! Vision-language model classifier over an OpenAI-compatible HTTP API.
//!
//! Each image is downscaled (longest side clamped), JPEG-encoded and sent inline as a
//! base64 data URI. The model is asked to answer with a JSON array of
//! `{"label": ..., "confidence": ...}` objects; anything around the array is ignored.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use card_scale::cpu::scale_rgb_cpu;
use card_scale::presets::{build_plan, ScaleTarget, Size};
use fast_image_resize::Resizer;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::VisionConfig;
use crate::error::{AssetError, Result};

use super::classifier::{sort_by_confidence, Classifier, Label};

const BACKEND: &str = "vision";
const UPLOAD_JPEG_QUALITY: u8 = 85;
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const PROMPT: &str = "Classify this photo for an image catalogue. \
Reply with only a JSON array of up to {max} objects of the form \
{\"label\": \"<short lowercase noun or scene word>\", \"confidence\": <0..1>}, \
most confident first. Cover people, objects, vehicles, places, time of day and lighting.";

pub struct VisionClassifier {
    client: Client,
    base_url: String,
    model: String,
    max_labels: usize,
    timeout: Duration,
    upload_max_side: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawLabel {
    #[serde(alias = "name", alias = "identifier")]
    label: String,
    #[serde(default)]
    confidence: Option<f32>,
}

impl VisionClassifier {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            AssetError::config("vision.endpoint", "", "an endpoint is required for the vision classifier")
        })?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssetError::classifier_source(BACKEND, "building HTTP client", e))?;
        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_labels: config.max_labels,
            timeout: config.timeout,
            upload_max_side: config.upload_max_side,
        })
    }

    /// Check that the API answers before committing the run to it.
    pub fn probe(&self) -> Result<()> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .map_err(|e| self.transport_error(e, PROBE_TIMEOUT))?;
        if !response.status().is_success() {
            return Err(AssetError::classifier(
                BACKEND,
                format!("probe {} returned {}", url, response.status()),
            ));
        }
        Ok(())
    }

    fn transport_error(&self, error: reqwest::Error, limit: Duration) -> AssetError {
        if error.is_timeout() {
            AssetError::timeout(format!("{} request", BACKEND), limit.as_millis() as u64)
        } else {
            AssetError::classifier_source(BACKEND, "HTTP request failed", error)
                .with_recovery_suggestion(format!("Make sure the model server is running at {}", self.base_url))
        }
    }

    /// Downscale and JPEG-encode the image as a `data:` URI.
    fn encode_upload(&self, path: &Path) -> Result<String> {
        let rgb = image::open(path).map_err(|e| AssetError::codec(path, e))?.to_rgb8();
        let src = Size {
            w: rgb.width(),
            h: rgb.height(),
        };
        let plan = build_plan(src, ScaleTarget::MaxLongSide(self.upload_max_side));
        let mut scaled = vec![0u8; plan.out.pixel_bytes()];
        scale_rgb_cpu(&mut Resizer::new(), rgb.as_raw(), src, &plan, &mut scaled)?;

        let mut jpeg = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut jpeg, UPLOAD_JPEG_QUALITY)
            .encode(&scaled, plan.out.w, plan.out.h, ExtendedColorType::Rgb8)
            .map_err(|e| AssetError::codec(path, e))?;
        debug!(path = %path.display(), from = ?src, to = ?plan.out, bytes = jpeg.get_ref().len(), "encoded upload");

        Ok(format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(jpeg.into_inner())
        ))
    }
}

impl Classifier for VisionClassifier {
    fn name(&self) -> &str {
        BACKEND
    }

    fn classify(&self, path: &Path) -> Result<Vec<Label>> {
        let image_url = self.encode_upload(path)?;
        let request_body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": PROMPT.replace("{max}", &self.max_labels.to_string()) },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ]
            }]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request_body)
            .send()
            .map_err(|e| self.transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(AssetError::classifier(
                BACKEND,
                format!("API returned {}: {}", status, error_text.trim()),
            ));
        }

        let reply: ChatResponse = response
            .json()
            .map_err(|e| AssetError::classifier_source(BACKEND, "malformed API response", e))?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AssetError::classifier(BACKEND, "response has no message content"))?;

        parse_label_reply(&content, self.max_labels)
    }
}

/// Extract the JSON label array from a model reply.
///
/// Each `[` is tried in turn and the first one that starts a valid label array wins,
/// so bracketed prose before the array or citations after it are ignored.
/// Labels are trimmed, blank ones dropped, confidences clamped to `[0, 1]`
/// (missing ones count as 0), sorted descending and truncated to `max_labels`.
pub fn parse_label_reply(content: &str, max_labels: usize) -> Result<Vec<Label>> {
    let raw = content
        .match_indices('[')
        .find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&content[start..])
                .into_iter::<Vec<RawLabel>>()
                .next()
                .and_then(|parsed| parsed.ok())
        })
        .ok_or_else(|| {
            AssetError::classifier(
                BACKEND,
                format!("reply contains no JSON label array: {:.120}", content),
            )
        })?;

    let mut labels: Vec<Label> = raw
        .into_iter()
        .filter_map(|r| {
            let text = r.label.trim();
            (!text.is_empty()).then(|| Label::new(text, r.confidence.unwrap_or(0.0)))
        })
        .collect();
    sort_by_confidence(&mut labels);
    labels.truncate(max_labels);
    Ok(labels)
}
