use tera::{Context, Tera};
use thiserror::Error;

use super::{controller::RenderOp, Labels};
use crate::data::model::{AudioClip, Message, MessageBody, Role};

pub const AUDIO_MIN_WIDTH: f64 = 60.0;
pub const AUDIO_MAX_WIDTH: f64 = 200.0;
pub const AUDIO_WIDTH_PER_SECOND: f64 = 20.0;

const TEMPLATES: [(&str, &str); 5] = [
    ("messages/text.html", include_str!("../../templates/messages/text.html")),
    ("messages/link.html", include_str!("../../templates/messages/link.html")),
    ("messages/image.html", include_str!("../../templates/messages/image.html")),
    ("messages/audio.html", include_str!("../../templates/messages/audio.html")),
    ("messages/loading.html", include_str!("../../templates/messages/loading.html")),
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("could not serialize card data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Width in pixels of an audio card's progress track.
pub fn audio_width(duration: Option<f64>) -> f64 {
    match duration {
        Some(seconds) if seconds.is_finite() && seconds > 0.0 => {
            (seconds * AUDIO_WIDTH_PER_SECOND).clamp(AUDIO_MIN_WIDTH, AUDIO_MAX_WIDTH)
        }
        _ => AUDIO_MIN_WIDTH,
    }
}

pub fn duration_label(duration: Option<f64>) -> String {
    match duration {
        Some(seconds) if seconds.is_finite() => format!("{}s", seconds.round()),
        _ => String::new(),
    }
}

fn side(role: Role) -> &'static str {
    match role {
        Role::User => "sent",
        Role::Bot => "received",
    }
}

/// Turns messages into the HTML fragments the chat view appends.
pub struct Renderer {
    tera: Tera,
    labels: Labels,
}

impl Renderer {
    pub fn new(labels: Labels) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        Ok(Self { tera, labels })
    }

    pub fn message(&self, message: &Message) -> Result<String, RenderError> {
        let side = side(message.role);
        match &message.body {
            MessageBody::Text(text) => self.bubble(side, text),
            MessageBody::Link(card) => {
                let ext = card.ext.as_ref().map(serde_json::to_string).transpose()?;
                let link_text = card
                    .link_text
                    .clone()
                    .unwrap_or_else(|| self.labels.default_link_text.clone());

                let mut context = Context::new();
                context.insert("side", side);
                context.insert("card", card);
                context.insert("ext", &ext);
                context.insert("link_text", &link_text);
                Ok(self.tera.render("messages/link.html", &context)?)
            }
            MessageBody::Image(card) => {
                let mut context = Context::new();
                context.insert("side", side);
                context.insert("card", card);
                Ok(self.tera.render("messages/image.html", &context)?)
            }
            MessageBody::Audio(clip) => self.audio(side, clip),
        }
    }

    /// Error bubbles look like bot text.
    pub fn error(&self, text: &str) -> Result<String, RenderError> {
        self.bubble(side(Role::Bot), text)
    }

    pub fn loading(&self) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("text", &self.labels.loading);
        Ok(self.tera.render("messages/loading.html", &context)?)
    }

    /// HTML to append for a render instruction, if it adds content.
    pub fn fragment(&self, op: &RenderOp) -> Result<Option<String>, RenderError> {
        match op {
            RenderOp::AppendMessage(message) => self.message(message).map(Some),
            RenderOp::AppendError(text) => self.error(text).map(Some),
            RenderOp::ShowLoading => self.loading().map(Some),
            _ => Ok(None),
        }
    }

    fn bubble(&self, side: &str, text: &str) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("side", side);
        context.insert("text", text);
        context.insert("time_label", &self.labels.just_now);
        Ok(self.tera.render("messages/text.html", &context)?)
    }

    fn audio(&self, side: &str, clip: &AudioClip) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("side", side);
        context.insert("clip", clip);
        context.insert("width", &audio_width(clip.duration).to_string());
        context.insert("duration_label", &duration_label(clip.duration));
        Ok(self.tera.render("messages/audio.html", &context)?)
    }
}
