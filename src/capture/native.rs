//! Hardware camera backed by `nokhwa`.

use super::{Camera, CameraError, CaptureConfig, Frame};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::NokhwaError;

/// A platform camera device.
///
/// Requests the closest MJPEG format to the configured size and rate and
/// decodes every frame to packed RGB.
#[derive(Default)]
pub struct NativeCamera {
    device: Option<nokhwa::Camera>,
    sequence: u64,
}

impl NativeCamera {
    /// Creates a closed camera; the device is opened by [`Camera::open`].
    pub fn new() -> Self {
        Self::default()
    }
}

fn classify(err: NokhwaError) -> CameraError {
    let message = err.to_string();
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        return CameraError::PermissionDenied(message);
    }
    match err {
        NokhwaError::OpenDeviceError(..) => CameraError::DeviceNotFound(message),
        NokhwaError::OpenStreamError(_) => CameraError::StreamFailed(message),
        NokhwaError::ReadFrameError(_) => CameraError::CaptureFailed(message),
        _ => CameraError::OpenFailed(message),
    }
}

impl Camera for NativeCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        if self.device.is_some() {
            return Ok(());
        }
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(config.width, config.height),
                FrameFormat::MJPEG,
                config.fps,
            ),
        ));
        let mut device =
            nokhwa::Camera::new(CameraIndex::Index(config.device_id), format).map_err(classify)?;
        device.open_stream().map_err(classify)?;

        tracing::info!(
            device = config.device_id,
            format = ?device.camera_format(),
            "Camera stream opened"
        );
        self.device = Some(device);
        self.sequence = 0;
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        let device = self.device.as_mut().ok_or(CameraError::NotInitialized)?;
        let buffer = device.frame().map_err(classify)?;

        let image = match buffer.decode_image::<RgbFormat>() {
            Ok(image) => image,
            Err(e) => {
                tracing::trace!(error = %e, "Frame not decodable yet");
                return Ok(None);
            }
        };

        self.sequence += 1;
        let (width, height) = (image.width(), image.height());
        Ok(Some(Frame::new(image.into_raw(), width, height, self.sequence)))
    }

    fn is_open(&self) -> bool {
        self.device.is_some()
    }

    fn close(&mut self) {
        if let Some(mut device) = self.device.take() {
            if let Err(e) = device.stop_stream() {
                tracing::warn!(error = %e, "Failed to stop camera stream cleanly");
            }
            tracing::info!("Camera stream closed");
        }
    }
}

impl Drop for NativeCamera {
    fn drop(&mut self) {
        self.close();
    }
}
