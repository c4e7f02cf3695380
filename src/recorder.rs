use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use raylib::prelude::*;
use tracing::{info, warn};

use crate::error::RecorderError;

/// Pipes raw RGBA frames into an ffmpeg child process.
pub struct Recorder {
    process: Child,
    stdin: Option<ChildStdin>,
    width: usize,
    height: usize,
    frames: u64,
}

impl Recorder {
    pub fn start(width: i32, height: i32, fps: u32, output: &Path) -> Result<Recorder, RecorderError> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .spawn()
            .map_err(RecorderError::Spawn)?;
        let stdin = process.stdin.take().ok_or(RecorderError::NoStdin)?;
        info!(output = %output.display(), width, height, fps, "recording started");

        Ok(Recorder {
            process,
            stdin: Some(stdin),
            width: width.max(0) as usize,
            height: height.max(0) as usize,
            frames: 0,
        })
    }

    /// Writes a framebuffer image. Raylib hands it over bottom row first.
    pub fn write_image(&mut self, image: &Image) -> Result<(), RecorderError> {
        let len = (image.width() * image.height() * 4).max(0) as usize; // 4 bytes per pixel (RGBA)
        let pixels = unsafe { std::slice::from_raw_parts(image.data() as *const u8, len) };
        self.write_frame(pixels)
    }

    pub fn write_frame(&mut self, pixels: &[u8]) -> Result<(), RecorderError> {
        let stdin = self.stdin.as_mut().ok_or(RecorderError::NoStdin)?;
        write_flipped(stdin, pixels, self.width, self.height)?;
        self.frames += 1;
        Ok(())
    }

    /// Closes the pipe and waits for ffmpeg to finish encoding.
    pub fn finish(mut self) -> Result<(), RecorderError> {
        self.stdin = None;
        let status = self.process.wait().map_err(RecorderError::Write)?;
        info!(frames = self.frames, %status, "recording finished");
        if status.success() { Ok(()) } else { Err(RecorderError::Exit(status)) }
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if self.stdin.take().is_some() {
            if let Err(e) = self.process.wait() {
                warn!(error = %e, "failed to wait for ffmpeg");
            }
        }
    }
}

/// Writes `pixels` (RGBA, `height` rows) to `out` last row first.
pub fn write_flipped<W: Write>(out: &mut W, pixels: &[u8], width: usize, height: usize) -> Result<(), RecorderError> {
    let stride = width * 4;
    let expected = stride * height;
    if pixels.len() != expected {
        return Err(RecorderError::FrameSize { expected, actual: pixels.len() });
    }
    for row in pixels.chunks_exact(stride.max(1)).rev() {
        out.write_all(row).map_err(RecorderError::Write)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_written_bottom_up() {
        // 1x3 image, one distinct pixel per row
        let pixels = [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3];
        let mut out = Vec::new();
        write_flipped(&mut out, &pixels, 1, 3).unwrap();
        assert_eq!(out, vec![3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn wrong_frame_size_is_rejected() {
        let mut out = Vec::new();
        let err = write_flipped(&mut out, &[0; 12], 2, 2).unwrap_err();
        assert!(matches!(err, RecorderError::FrameSize { expected: 16, actual: 12 }));
        assert!(out.is_empty());
    }
}
