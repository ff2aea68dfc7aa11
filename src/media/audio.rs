/// Live microphone passthrough
///
/// Captured samples go straight to the speakers. Device streams are created,
/// owned and dropped by one worker thread per session, so the UI never waits
/// on device I/O. Once the devices are open, `stop()` returns only after both
/// streams are gone; a stop that lands while they are still opening leaves
/// the worker to drop them as soon as the open returns.
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;

use crate::config::LauncherConfig;
use crate::error::{LauncherError, Result};

/// Open input + output stream pair. Dropping it stops and releases both.
pub trait DuplexStream {}

/// Opens a duplex passthrough on the default devices
pub trait AudioBackend: Send + Sync {
    /// `running` is checked by the capture callback on every block; samples
    /// are only forwarded while it is set.
    fn open_duplex(
        &self,
        sample_rate: u32,
        channels: u16,
        running: Arc<AtomicBool>,
    ) -> Result<Box<dyn DuplexStream>>;
}

/// FIFO between the capture callback and the playback callback.
///
/// Holds at most `capacity` samples; the oldest are dropped when capture runs
/// ahead, and playback underruns are filled with silence.
#[derive(Debug)]
pub struct PassthroughBuffer {
    samples: Mutex<VecDeque<f32>>,
    capacity: usize,
}

impl PassthroughBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Queue one captured block
    pub fn push(&self, block: &[f32]) {
        let mut samples = self.samples.lock();
        samples.extend(block.iter().copied());
        let overflow = samples.len().saturating_sub(self.capacity);
        if overflow > 0 {
            samples.drain(..overflow);
        }
    }

    /// Fill one playback block
    pub fn fill(&self, out: &mut [f32]) {
        let mut samples = self.samples.lock();
        for sample in out.iter_mut() {
            *sample = samples.pop_front().unwrap_or(0.0);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of `MicSession::start`, delivered once the worker has opened the
/// streams or given up
#[derive(Debug)]
pub struct PendingStart(oneshot::Receiver<Result<()>>);

impl PendingStart {
    fn ready(result: Result<()>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        PendingStart(rx)
    }

    pub async fn wait(self) -> Result<()> {
        self.0
            .await
            .unwrap_or_else(|_| Err(LauncherError::audio("audio worker exited")))
    }

    pub fn wait_blocking(self) -> Result<()> {
        self.0
            .blocking_recv()
            .unwrap_or_else(|_| Err(LauncherError::audio("audio worker exited")))
    }
}

struct Worker {
    stop_tx: mpsc::Sender<()>,
    /// Set until `open_duplex` has returned
    opening: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Microphone passthrough session: at most one stream pair at a time
pub struct MicSession {
    backend: Arc<dyn AudioBackend>,
    sample_rate: u32,
    channels: u16,
    running: Arc<AtomicBool>,
    worker: Option<Worker>,
    /// Worker stopped mid-open; joined before the next start
    detached: Option<JoinHandle<()>>,
}

impl MicSession {
    pub fn new(backend: Arc<dyn AudioBackend>, config: &LauncherConfig) -> Self {
        Self {
            backend,
            sample_rate: config.sample_rate,
            channels: config.channels,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            detached: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Open the devices on a background thread and start forwarding.
    ///
    /// A failed open is logged and leaves the session stopped with nothing
    /// held open. Starting a running session does nothing.
    pub fn start(&mut self) -> PendingStart {
        if self.is_running() && self.worker.is_some() {
            return PendingStart::ready(Ok(()));
        }
        // Reap a worker left over from a failed start
        self.stop();
        // Never hold two stream pairs: an earlier open must have released first
        if let Some(handle) = self.detached.take() {
            tracing::debug!("waiting for the previous audio open to release");
            if handle.join().is_err() {
                tracing::error!("audio thread panicked");
            }
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = mpsc::channel();
        let backend = Arc::clone(&self.backend);
        let running = Arc::clone(&self.running);
        let opening = Arc::new(AtomicBool::new(true));
        let worker_opening = Arc::clone(&opening);
        let (sample_rate, channels) = (self.sample_rate, self.channels);

        running.store(true, Ordering::SeqCst);
        let spawned = thread::Builder::new()
            .name("mic-passthrough".to_string())
            .spawn(move || {
                let opened = backend.open_duplex(sample_rate, channels, Arc::clone(&running));
                worker_opening.store(false, Ordering::SeqCst);
                match opened {
                    Ok(streams) => {
                        tracing::info!("🎤 mic passthrough started ({} Hz, {} ch)", sample_rate, channels);
                        let _ = ready_tx.send(Ok(()));
                        // Hold the streams until stop() or the session is dropped
                        let _ = stop_rx.recv();
                        running.store(false, Ordering::SeqCst);
                        drop(streams);
                        tracing::info!("🛑 mic passthrough stopped");
                    }
                    Err(e) => {
                        running.store(false, Ordering::SeqCst);
                        tracing::warn!("Mic error: {}", e);
                        let _ = ready_tx.send(Err(e));
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker {
                    stop_tx,
                    opening,
                    handle,
                });
                PendingStart(ready_rx)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                tracing::warn!("Mic error: cannot spawn audio thread: {}", e);
                PendingStart::ready(Err(LauncherError::audio(e)))
            }
        }
    }

    /// Stop forwarding and release both streams. Stopping a stopped session
    /// is a no-op.
    ///
    /// Never waits on a device open still in progress: that worker is left
    /// to drop its streams when the open returns.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = worker.stop_tx.send(());
        if worker.opening.load(Ordering::SeqCst) {
            tracing::debug!("mic stopped while devices are still opening");
            self.detached = Some(worker.handle);
            return;
        }
        if worker.handle.join().is_err() {
            tracing::error!("audio thread panicked");
        }
    }
}

impl Drop for MicSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MicSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicSession")
            .field("running", &self.is_running())
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .finish()
    }
}

/// Default devices through cpal
pub mod native {
    use super::*;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{BufferSize, SampleRate, StreamConfig};

    pub struct CpalBackend;

    struct CpalDuplex {
        _input: cpal::Stream,
        _output: cpal::Stream,
    }

    impl DuplexStream for CpalDuplex {}

    impl AudioBackend for CpalBackend {
        fn open_duplex(
            &self,
            sample_rate: u32,
            channels: u16,
            running: Arc<AtomicBool>,
        ) -> Result<Box<dyn DuplexStream>> {
            let host = cpal::default_host();
            let output_device = host
                .default_output_device()
                .ok_or_else(|| LauncherError::audio("no default output device"))?;
            let input_device = host
                .default_input_device()
                .ok_or_else(|| LauncherError::audio("no default input device"))?;

            let config = StreamConfig {
                channels,
                sample_rate: SampleRate(sample_rate),
                buffer_size: BufferSize::Default,
            };
            // One second of audio
            let fifo = Arc::new(PassthroughBuffer::new(sample_rate as usize * channels as usize));

            let playback = Arc::clone(&fifo);
            let output = output_device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| playback.fill(data),
                    |e| tracing::warn!("output stream error: {}", e),
                    None,
                )
                .map_err(LauncherError::audio)?;
            output.play().map_err(LauncherError::audio)?;

            let input = input_device
                .build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if running.load(Ordering::Relaxed) {
                            fifo.push(data);
                        }
                    },
                    |e| tracing::warn!("input stream error: {}", e),
                    None,
                )
                .map_err(LauncherError::audio)?;
            input.play().map_err(LauncherError::audio)?;

            Ok(Box::new(CpalDuplex {
                _input: input,
                _output: output,
            }))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Counts device opens and releases
    #[derive(Default)]
    pub(crate) struct FakeAudio {
        pub opens: AtomicUsize,
        pub closes: Arc<AtomicUsize>,
        pub fail: bool,
        pub last_flag: Mutex<Option<Arc<AtomicBool>>>,
        /// When set, `open_duplex` blocks until a message arrives
        pub gate: Mutex<Option<mpsc::Receiver<()>>>,
    }

    struct FakeDuplex {
        closes: Arc<AtomicUsize>,
    }

    impl DuplexStream for FakeDuplex {}

    impl Drop for FakeDuplex {
        fn drop(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl AudioBackend for FakeAudio {
        fn open_duplex(
            &self,
            sample_rate: u32,
            channels: u16,
            running: Arc<AtomicBool>,
        ) -> Result<Box<dyn DuplexStream>> {
            assert_eq!((sample_rate, channels), (44_100, 1));
            let gate = self.gate.lock().take();
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            if self.fail {
                return Err(LauncherError::audio("no default input device"));
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            *self.last_flag.lock() = Some(running);
            Ok(Box::new(FakeDuplex {
                closes: Arc::clone(&self.closes),
            }))
        }
    }

    fn session(backend: &Arc<FakeAudio>) -> MicSession {
        let config = LauncherConfig::with_photo_dir("Gallery");
        MicSession::new(Arc::clone(backend) as Arc<dyn AudioBackend>, &config)
    }

    #[test]
    fn test_buffer_passes_samples_in_order() {
        let buffer = PassthroughBuffer::new(16);
        buffer.push(&[0.1, 0.2]);
        buffer.push(&[0.3]);

        let mut out = [9.0; 5];
        buffer.fill(&mut out);
        assert_eq!(out, [0.1, 0.2, 0.3, 0.0, 0.0]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_buffer_drops_oldest_on_overflow() {
        let buffer = PassthroughBuffer::new(3);
        buffer.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buffer.len(), 3);

        let mut out = [0.0; 3];
        buffer.fill(&mut out);
        assert_eq!(out, [3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_start_then_stop_releases_streams() {
        let backend = Arc::new(FakeAudio::default());
        let mut mic = session(&backend);

        mic.start().wait_blocking().unwrap();
        assert!(mic.is_running());
        let flag = backend.last_flag.lock().clone().unwrap();
        assert!(flag.load(Ordering::SeqCst));

        mic.stop();
        assert!(!mic.is_running());
        assert!(!flag.load(Ordering::SeqCst));
        assert_eq!(backend.opens.load(Ordering::SeqCst), 1);
        assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_twice_is_noop() {
        let backend = Arc::new(FakeAudio::default());
        let mut mic = session(&backend);

        mic.start().wait_blocking().unwrap();
        mic.stop();
        mic.stop();
        assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let backend = Arc::new(FakeAudio::default());
        let mut mic = session(&backend);

        mic.stop();
        assert!(!mic.is_running());
        assert_eq!(backend.opens.load(Ordering::SeqCst), 0);
        assert_eq!(backend.closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_start_while_running_keeps_one_pair() {
        let backend = Arc::new(FakeAudio::default());
        let mut mic = session(&backend);

        mic.start().wait_blocking().unwrap();
        mic.start().wait_blocking().unwrap();
        assert_eq!(backend.opens.load(Ordering::SeqCst), 1);

        mic.stop();
        mic.start().wait_blocking().unwrap();
        assert_eq!(backend.opens.load(Ordering::SeqCst), 2);
        assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_start_leaves_session_stopped() {
        let backend = Arc::new(FakeAudio {
            fail: true,
            ..Default::default()
        });
        let mut mic = session(&backend);

        let err = mic.start().wait_blocking().unwrap_err();
        assert!(matches!(err, LauncherError::DeviceUnavailable { device: "audio", .. }));
        assert!(!mic.is_running());

        mic.stop();
        assert_eq!(backend.closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_during_slow_open_does_not_wait() {
        let (release, gate) = mpsc::channel();
        let backend = Arc::new(FakeAudio {
            gate: Mutex::new(Some(gate)),
            ..Default::default()
        });
        let mut mic = session(&backend);

        let pending = mic.start();
        // The worker is parked inside open_duplex; stop returns regardless
        mic.stop();
        assert!(!mic.is_running());
        assert_eq!(backend.opens.load(Ordering::SeqCst), 0);

        release.send(()).unwrap();
        pending.wait_blocking().unwrap();
        assert!(!mic.is_running());

        // Restarting waits for the late pair to be dropped first
        mic.start().wait_blocking().unwrap();
        assert_eq!(backend.opens.load(Ordering::SeqCst), 2);
        assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
        assert!(mic.is_running());

        mic.stop();
        assert_eq!(backend.closes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drop_releases_streams() {
        let backend = Arc::new(FakeAudio::default());
        {
            let mut mic = session(&backend);
            mic.start().wait_blocking().unwrap();
        }
        assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_resolves_in_async_context() {
        let backend = Arc::new(FakeAudio::default());
        let mut mic = session(&backend);

        mic.start().wait().await.unwrap();
        assert!(mic.is_running());
        mic.stop();
    }
}
