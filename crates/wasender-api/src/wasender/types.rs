//! Outbound message types for the `/send-message` endpoint.
//!
//! Every message kind exists as a structured value (`TextMessage`,
//! `ImageMessage`, …). The discrete-parameter form is a tuple that converts
//! into the same struct, so both call styles share one payload builder.

use crate::wasender::error::{WasenderError, WasenderResult};
use crate::wasender::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// JSON object sent as the request body.
pub type Payload = Map<String, Value>;

// ═══════════════════════════════════════════════════════════════════════
//  Message kinds
// ═══════════════════════════════════════════════════════════════════════

/// Plain text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub to: String,
    pub text: String,
}

/// Image by URL with an optional caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMessage {
    pub to: String,
    pub image_url: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Video by URL with an optional caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMessage {
    pub to: String,
    pub video_url: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Document by URL with an optional caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMessage {
    pub to: String,
    pub document_url: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMessage {
    pub to: String,
    pub audio_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerMessage {
    pub to: String,
    pub sticker_url: String,
}

/// Contact card (name + phone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub to: String,
    pub contact_name: String,
    pub contact_phone: String,
}

/// Location pin with optional label and address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMessage {
    pub to: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl TextMessage {
    pub fn new(to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            text: text.into(),
        }
    }
}

impl ImageMessage {
    pub fn new(to: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            image_url: image_url.into(),
            text: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.text = Some(caption.into());
        self
    }
}

impl VideoMessage {
    pub fn new(to: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            video_url: video_url.into(),
            text: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.text = Some(caption.into());
        self
    }
}

impl DocumentMessage {
    pub fn new(to: impl Into<String>, document_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            document_url: document_url.into(),
            text: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.text = Some(caption.into());
        self
    }
}

impl AudioMessage {
    pub fn new(to: impl Into<String>, audio_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            audio_url: audio_url.into(),
        }
    }
}

impl StickerMessage {
    pub fn new(to: impl Into<String>, sticker_url: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            sticker_url: sticker_url.into(),
        }
    }
}

impl ContactMessage {
    pub fn new(
        to: impl Into<String>,
        contact_name: impl Into<String>,
        contact_phone: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            contact_name: contact_name.into(),
            contact_phone: contact_phone.into(),
        }
    }
}

impl LocationMessage {
    pub fn new(to: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            to: to.into(),
            latitude,
            longitude,
            name: None,
            address: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

// ─── Discrete-parameter forms ────────────────────────────────────────

impl<A: Into<String>, B: Into<String>> From<(A, B)> for TextMessage {
    fn from((to, text): (A, B)) -> Self {
        Self::new(to, text)
    }
}

macro_rules! captioned_from_tuples {
    ($ty:ident) => {
        impl<A: Into<String>, B: Into<String>> From<(A, B)> for $ty {
            fn from((to, url): (A, B)) -> Self {
                Self::new(to, url)
            }
        }

        impl<A: Into<String>, B: Into<String>, C: Into<String>> From<(A, B, Option<C>)> for $ty {
            fn from((to, url, caption): (A, B, Option<C>)) -> Self {
                let mut msg = Self::new(to, url);
                msg.text = caption.map(Into::into);
                msg
            }
        }
    };
}

captioned_from_tuples!(ImageMessage);
captioned_from_tuples!(VideoMessage);
captioned_from_tuples!(DocumentMessage);

impl<A: Into<String>, B: Into<String>> From<(A, B)> for AudioMessage {
    fn from((to, url): (A, B)) -> Self {
        Self::new(to, url)
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for StickerMessage {
    fn from((to, url): (A, B)) -> Self {
        Self::new(to, url)
    }
}

impl<A: Into<String>, B: Into<String>, C: Into<String>> From<(A, B, C)> for ContactMessage {
    fn from((to, name, phone): (A, B, C)) -> Self {
        Self::new(to, name, phone)
    }
}

impl<A: Into<String>> From<(A, f64, f64)> for LocationMessage {
    fn from((to, latitude, longitude): (A, f64, f64)) -> Self {
        Self::new(to, latitude, longitude)
    }
}

impl<A: Into<String>, N: Into<String>, D: Into<String>> From<(A, f64, f64, Option<N>, Option<D>)>
    for LocationMessage
{
    fn from((to, latitude, longitude, name, address): (A, f64, f64, Option<N>, Option<D>)) -> Self {
        Self {
            to: to.into(),
            latitude,
            longitude,
            name: name.map(Into::into),
            address: address.map(Into::into),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Tagged union + payload builder
// ═══════════════════════════════════════════════════════════════════════

/// Any message accepted by `/send-message`.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Text(TextMessage),
    Image(ImageMessage),
    Video(VideoMessage),
    Document(DocumentMessage),
    Audio(AudioMessage),
    Sticker(StickerMessage),
    Contact(ContactMessage),
    Location(LocationMessage),
}

macro_rules! outbound_from {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        $(
            impl From<$ty> for OutboundMessage {
                fn from(msg: $ty) -> Self {
                    OutboundMessage::$variant(msg)
                }
            }
        )*
    };
}

outbound_from!(
    Text(TextMessage),
    Image(ImageMessage),
    Video(VideoMessage),
    Document(DocumentMessage),
    Audio(AudioMessage),
    Sticker(StickerMessage),
    Contact(ContactMessage),
    Location(LocationMessage),
);

impl OutboundMessage {
    /// Short name of the message kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Video(_) => "video",
            Self::Document(_) => "document",
            Self::Audio(_) => "audio",
            Self::Sticker(_) => "sticker",
            Self::Contact(_) => "contact",
            Self::Location(_) => "location",
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::Text(m) => &m.to,
            Self::Image(m) => &m.to,
            Self::Video(m) => &m.to,
            Self::Document(m) => &m.to,
            Self::Audio(m) => &m.to,
            Self::Sticker(m) => &m.to,
            Self::Contact(m) => &m.to,
            Self::Location(m) => &m.to,
        }
    }

    /// Build the request body. `extra` fields go in first so the
    /// type-specific fields win on collision.
    pub fn to_payload(&self, extra: &Payload) -> WasenderResult<Payload> {
        let mut payload = extra.clone();
        for (key, value) in self.typed_fields()? {
            payload.insert(key, value);
        }
        Ok(payload)
    }

    fn typed_fields(&self) -> WasenderResult<Payload> {
        let mut fields = Payload::new();
        fields.insert("to".into(), json!(required("to", self.recipient())?));

        match self {
            Self::Text(m) => {
                fields.insert("text".into(), json!(required("text", &m.text)?));
            }
            Self::Image(m) => {
                fields.insert("imageUrl".into(), json!(required("imageUrl", &m.image_url)?));
                insert_optional(&mut fields, "text", m.text.as_deref());
            }
            Self::Video(m) => {
                fields.insert("videoUrl".into(), json!(required("videoUrl", &m.video_url)?));
                insert_optional(&mut fields, "text", m.text.as_deref());
            }
            Self::Document(m) => {
                fields.insert(
                    "documentUrl".into(),
                    json!(required("documentUrl", &m.document_url)?),
                );
                insert_optional(&mut fields, "text", m.text.as_deref());
            }
            Self::Audio(m) => {
                fields.insert("audioUrl".into(), json!(required("audioUrl", &m.audio_url)?));
            }
            Self::Sticker(m) => {
                fields.insert(
                    "stickerUrl".into(),
                    json!(required("stickerUrl", &m.sticker_url)?),
                );
            }
            Self::Contact(m) => {
                fields.insert(
                    "contact".into(),
                    json!({
                        "name": required("contact.name", &m.contact_name)?,
                        "phone": required("contact.phone", &m.contact_phone)?,
                    }),
                );
            }
            Self::Location(m) => {
                let mut location = Payload::new();
                location.insert("latitude".into(), coordinate("latitude", m.latitude)?);
                location.insert("longitude".into(), coordinate("longitude", m.longitude)?);
                insert_optional(&mut location, "name", m.name.as_deref());
                insert_optional(&mut location, "address", m.address.as_deref());
                fields.insert("messageType".into(), json!("location"));
                fields.insert("location".into(), Value::Object(location));
            }
        }

        Ok(fields)
    }
}

fn required<'a>(field: &str, value: &'a str) -> WasenderResult<&'a str> {
    if value.trim().is_empty() {
        return Err(WasenderError::invalid_message(format!(
            "`{}` is required",
            field
        )));
    }
    Ok(value)
}

fn coordinate(field: &str, value: f64) -> WasenderResult<Value> {
    if !value.is_finite() {
        return Err(WasenderError::invalid_message(format!(
            "`{}` must be a finite number",
            field
        )));
    }
    Ok(json!(value))
}

// Absent and empty optional values are both left out.
fn insert_optional(target: &mut Payload, key: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        target.insert(key.to_string(), json!(v));
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Per-call options
// ═══════════════════════════════════════════════════════════════════════

/// Extra payload fields and the retry policy for one send call.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub extra: Payload,
    pub retry: Option<RetryConfig>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field merged under the message's own fields.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn extra(mut self, extra: Payload) -> Self {
        self.extra.extend(extra);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }
}

impl From<RetryConfig> for SendOptions {
    fn from(retry: RetryConfig) -> Self {
        Self::new().retry(retry)
    }
}
