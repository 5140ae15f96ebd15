use crate::error::OpenError;
use crate::source::{AudioProperties, ContainerKind, ContainerReader, Id3v2Frame, ParsedFile};
use crate::stream::AudioStream;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")))
            .with_test_writer()
            .try_init();
    });
}

/// A reader that hands back a canned result without looking at the stream.
pub struct FakeReader(pub Result<ParsedFile, OpenError>);

impl ContainerReader for FakeReader {
    fn open_container(&self, _stream: &mut dyn AudioStream) -> Result<ParsedFile, OpenError> {
        self.0.clone()
    }
}

pub fn properties() -> AudioProperties {
    AudioProperties { duration_millis: 183_000, bitrate_kbps: 320, sample_rate_hz: 44_100, channels: 2 }
}

/// An empty file of `kind` with properties filled in.
pub fn parsed(kind: ContainerKind) -> ParsedFile {
    ParsedFile { properties: Some(properties()), ..ParsedFile::empty(kind) }
}

pub fn text_frame(id: &str, values: &[&str]) -> Id3v2Frame {
    Id3v2Frame::Text { id: id.to_string(), values: values.iter().map(|s| s.to_string()).collect() }
}

pub fn user_text_frame(description: &str, values: &[&str]) -> Id3v2Frame {
    let fields = std::iter::once(description).chain(values.iter().copied()).map(|s| s.to_string()).collect();
    Id3v2Frame::UserText { id: "TXXX".to_string(), fields }
}

pub fn apic_frame(picture_type: u8, data: &[u8]) -> Id3v2Frame {
    Id3v2Frame::Picture { id: "APIC".to_string(), picture_type, mime_type: "image/jpeg".to_string(), data: data.to_vec() }
}
