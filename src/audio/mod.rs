// Audio module - container detection and embedded artwork access

pub mod container;
pub mod detection;
pub mod flac;
pub mod mp3;

pub use container::{open_container, AudioContainer, ContainerError, ImageRecord};
pub use detection::is_supported_audio_file;
