// tests/common/mod.rs
//! Fake audio device and helpers shared by the integration tests.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use neoflow_speech::audio::{AudioBuffer, AudioOutput, PlaybackError, PlaybackHandle};

pub const RATE: u32 = 24_000;

/// Everything the fake device saw.
#[derive(Debug, Default)]
pub struct Device {
    pub clock: f64,
    pub created: usize,
    pub live: usize,
    pub max_live: usize,
    /// Offsets passed to `start`, in order.
    pub starts: Vec<f64>,
    pub rates: Vec<f32>,
    pub detunes: Vec<f32>,
    pub fail_create: bool,
    pub fail_start: bool,
}

/// Output with a manual clock. Clones share the same device.
#[derive(Clone, Default)]
pub struct FakeOutput {
    pub device: Rc<RefCell<Device>>,
}

impl FakeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        self.device.borrow_mut().clock += seconds;
    }

    pub fn live(&self) -> usize {
        self.device.borrow().live
    }

    pub fn max_live(&self) -> usize {
        self.device.borrow().max_live
    }

    pub fn created(&self) -> usize {
        self.device.borrow().created
    }

    pub fn starts(&self) -> Vec<f64> {
        self.device.borrow().starts.clone()
    }

    pub fn last_rate(&self) -> Option<f32> {
        self.device.borrow().rates.last().copied()
    }

    pub fn last_detune(&self) -> Option<f32> {
        self.device.borrow().detunes.last().copied()
    }

    pub fn fail_create(&self, fail: bool) {
        self.device.borrow_mut().fail_create = fail;
    }

    pub fn fail_start(&self, fail: bool) {
        self.device.borrow_mut().fail_start = fail;
    }
}

pub struct FakeHandle {
    device: Rc<RefCell<Device>>,
    started: bool,
    stopped: bool,
}

impl PlaybackHandle for FakeHandle {
    fn start(&mut self, offset: f64) -> Result<(), PlaybackError> {
        let mut device = self.device.borrow_mut();
        if device.fail_start {
            return Err(PlaybackError::Sink("start refused".into()));
        }
        if self.started {
            return Err(PlaybackError::HandleSpent);
        }
        self.started = true;
        device.live += 1;
        device.max_live = device.max_live.max(device.live);
        device.starts.push(offset);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        if !self.started || self.stopped {
            return Err(PlaybackError::AlreadyStopped);
        }
        self.stopped = true;
        self.device.borrow_mut().live -= 1;
        Ok(())
    }

    fn set_rate(&mut self, rate: f32) -> Result<(), PlaybackError> {
        self.device.borrow_mut().rates.push(rate);
        Ok(())
    }

    fn set_detune(&mut self, cents: f32) -> Result<(), PlaybackError> {
        self.device.borrow_mut().detunes.push(cents);
        Ok(())
    }
}

impl AudioOutput for FakeOutput {
    type Handle = FakeHandle;

    fn now(&self) -> f64 {
        self.device.borrow().clock
    }

    fn create_handle(&mut self, _buffer: Arc<AudioBuffer>) -> Result<FakeHandle, PlaybackError> {
        let mut device = self.device.borrow_mut();
        if device.fail_create {
            return Err(PlaybackError::NoDevice("unplugged".into()));
        }
        device.created += 1;
        Ok(FakeHandle {
            device: Rc::clone(&self.device),
            started: false,
            stopped: false,
        })
    }
}

/// A mono clip of `seconds` length at [`RATE`].
pub fn clip(seconds: f64) -> AudioBuffer {
    let frames = (seconds * RATE as f64).round() as usize;
    AudioBuffer::from_channels(RATE, vec![vec![0.25; frames]]).unwrap()
}

/// Base64 of 16-bit little-endian mono PCM, as the speech service returns it.
pub fn pcm_payload(seconds: f64) -> String {
    let frames = (seconds * RATE as f64).round() as usize;
    let bytes: Vec<u8> = (0..frames)
        .flat_map(|i| (((i % 100) as i16 - 50) * 200).to_le_bytes())
        .collect();
    STANDARD.encode(bytes)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
