//! Encoding: the single external encoder invocation.

/// `ffmpeg` argument assembly and process supervision.
pub mod ffmpeg;
