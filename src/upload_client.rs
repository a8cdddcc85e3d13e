//! The PapaJi photo page: pick or snap a photo, send it to `/api/diagnose`,
//! show the repair guide.

use askama::Template;

/// Captions cycled while a diagnosis is in flight.
pub const THINKING_PHRASES: &[&str] = &[
    "PapaJi is thinking...",
    "Chashma laga rahe hain...",
    "Hmm, dekhte hain kya hua hai...",
    "Toolbox nikal rahe hain...",
    "30 saal ka experience lag raha hai...",
    "Almost done, beta...",
];

pub const CAPTION_INTERVAL_MS: u64 = 2500;

#[derive(Template)]
#[template(path = "papaji.html")]
pub struct UploadClientPage {
    pub phrases: &'static [&'static str],
    pub caption_interval_ms: u64,
}

impl Default for UploadClientPage {
    fn default() -> Self {
        Self {
            phrases: THINKING_PHRASES,
            caption_interval_ms: CAPTION_INTERVAL_MS,
        }
    }
}
