//! Cross-platform audio capture using cpal
//!
//! Captures mono 16-bit PCM at the device's native rate and encodes the
//! take to FLAC when the stream finishes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration as TokioDuration};

use super::flac::encode_to_flac;
use crate::application::ports::{CaptureError, CaptureSource, CaptureStream, CapturedAudio};
use crate::domain::media::MediaMimeType;

/// Audio capture source backed by the default cpal input device.
///
/// cpal::Stream is not Send, so each open stream lives on its own
/// thread; the stream handle only shares atomics and the sample buffer
/// with it.
pub struct CpalCaptureSource;

impl CpalCaptureSource {
    pub fn new() -> Self {
        Self
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device().ok_or(CaptureError::NoDevice)
    }

    /// Get a suitable input configuration at the device's native rate
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::OpenFailed(format!("Failed to get configs: {}", e)))?;

        // Only consider i16 or f32 formats; prefer mono over stereo
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let is_better = match &best_config {
                None => true,
                Some(current) => config.channels() < current.channels(),
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config
            .ok_or_else(|| CaptureError::OpenFailed("No suitable config found".into()))?;

        let sample_format = config_range.sample_format();
        let sample_rate = config_range.max_sample_rate();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix stereo to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }
}

impl Default for CpalCaptureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureSource for CpalCaptureSource {
    fn is_supported(&self) -> bool {
        cpal::default_host().default_input_device().is_some()
    }

    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let audio_buffer: Arc<StdMutex<Vec<i16>>> = Arc::new(StdMutex::new(Vec::new()));
        let is_recording = Arc::new(AtomicBool::new(true));

        // The thread reports the startup outcome (with the negotiated
        // sample rate) once the stream is playing
        let (started_tx, started_rx) = oneshot::channel::<Result<u32, CaptureError>>();

        let thread_buffer = Arc::clone(&audio_buffer);
        let thread_recording = Arc::clone(&is_recording);

        std::thread::spawn(move || {
            let setup = || -> Result<(cpal::Stream, u32), CaptureError> {
                let device = CpalCaptureSource::get_input_device()?;
                let (config, sample_format) = CpalCaptureSource::get_input_config(&device)?;
                let sample_rate = config.sample_rate.0;
                let channels = config.channels;

                let stream = match sample_format {
                    SampleFormat::I16 => {
                        let buffer = Arc::clone(&thread_buffer);
                        let recording = Arc::clone(&thread_recording);
                        device
                            .build_input_stream(
                                &config,
                                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                                    if recording.load(Ordering::SeqCst) {
                                        let mono =
                                            CpalCaptureSource::stereo_to_mono(data, channels);
                                        if let Ok(mut buffer) = buffer.lock() {
                                            buffer.extend_from_slice(&mono);
                                        }
                                    }
                                },
                                |err| eprintln!("Audio stream error: {}", err),
                                None,
                            )
                            .map_err(|e| CaptureError::OpenFailed(e.to_string()))?
                    }

                    SampleFormat::F32 => {
                        let buffer = Arc::clone(&thread_buffer);
                        let recording = Arc::clone(&thread_recording);
                        device
                            .build_input_stream(
                                &config,
                                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                                    if recording.load(Ordering::SeqCst) {
                                        let i16_data: Vec<i16> =
                                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                        let mono =
                                            CpalCaptureSource::stereo_to_mono(&i16_data, channels);
                                        if let Ok(mut buffer) = buffer.lock() {
                                            buffer.extend_from_slice(&mono);
                                        }
                                    }
                                },
                                |err| eprintln!("Audio stream error: {}", err),
                                None,
                            )
                            .map_err(|e| CaptureError::OpenFailed(e.to_string()))?
                    }

                    _ => {
                        return Err(CaptureError::OpenFailed(
                            "Unsupported sample format".into(),
                        ))
                    }
                };

                stream
                    .play()
                    .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

                Ok((stream, sample_rate))
            };

            let stream = match setup() {
                Ok((stream, sample_rate)) => {
                    if started_tx.send(Ok(sample_rate)).is_err() {
                        return;
                    }
                    stream
                }
                Err(e) => {
                    thread_recording.store(false, Ordering::SeqCst);
                    let _ = started_tx.send(Err(e));
                    return;
                }
            };

            // Keep the stream alive until the handle stops the take
            while thread_recording.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }

            drop(stream);
        });

        let sample_rate = started_rx
            .await
            .map_err(|_| CaptureError::OpenFailed("Capture thread exited".into()))??;

        Ok(Box::new(CpalCaptureStream {
            audio_buffer,
            is_recording,
            sample_rate,
        }))
    }
}

/// One live take on the default input device
struct CpalCaptureStream {
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    is_recording: Arc<AtomicBool>,
    sample_rate: u32,
}

impl CpalCaptureStream {
    async fn stop_thread(&mut self) {
        self.is_recording.store(false, Ordering::SeqCst);
        // Give the capture thread a moment to release the device
        sleep(TokioDuration::from_millis(150)).await;
    }
}

#[async_trait]
impl CaptureStream for CpalCaptureStream {
    async fn finish(&mut self) -> Result<CapturedAudio, CaptureError> {
        self.stop_thread().await;

        let samples = {
            let mut buffer = self
                .audio_buffer
                .lock()
                .map_err(|_| CaptureError::StreamFailed("Sample buffer poisoned".into()))?;
            std::mem::take(&mut *buffer)
        };

        // A silent device yields an empty take, not an error
        if samples.is_empty() {
            return Ok(CapturedAudio {
                chunks: Vec::new(),
                mime_type: Some(MediaMimeType::Flac),
            });
        }

        // FLAC encoding is CPU-bound
        let sample_rate = self.sample_rate;
        let encoded = tokio::task::spawn_blocking(move || encode_to_flac(&samples, sample_rate))
            .await
            .map_err(|e| CaptureError::StreamFailed(format!("Encode task error: {}", e)))?
            .map_err(|e| CaptureError::StreamFailed(e.to_string()))?;

        Ok(CapturedAudio {
            chunks: vec![encoded],
            mime_type: Some(MediaMimeType::Flac),
        })
    }

    async fn abort(&mut self) {
        self.stop_thread().await;
        if let Ok(mut buffer) = self.audio_buffer.lock() {
            buffer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        let result = CpalCaptureSource::stereo_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn stereo_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalCaptureSource::stereo_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]); // Average of each pair
    }
}
