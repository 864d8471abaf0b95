pub mod exporter;

#[cfg(feature = "media-ffmpeg")]
pub mod ffmpeg;
