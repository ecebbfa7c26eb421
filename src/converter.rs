//! Share code to preview/config orchestration.
//!
//! Each input issues a [`RequestId`]. Decodes may finish in any order; a
//! result is applied only when no newer request has been issued since, so a
//! slow decode can never overwrite fresher state.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::Rng;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::cfg::{self, ConfigDirective};
use crate::codec::ShareCodec;
use crate::names::{KeyValueStore, NameAllocator, DEFAULT_PREFIX};
use crate::record::{self, DecodeError, ParameterRecord};
use crate::render::{self, Canvas, DrawPrimitive};

/// Identity of one decode request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A decode waiting to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecode {
    pub id: RequestId,
    pub code: String,
}

impl PendingDecode {
    /// Decode on the blocking pool and tag the result with this request.
    pub async fn run(
        self,
        codec: Arc<dyn ShareCodec>,
    ) -> (RequestId, Result<ParameterRecord, DecodeError>) {
        let result = decode_async(codec, self.code).await;
        (self.id, result)
    }
}

/// Everything derived from one decoded share code.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub record: ParameterRecord,
    pub primitives: Vec<DrawPrimitive>,
    pub directives: Vec<ConfigDirective>,
    /// Config file stem.
    pub name: String,
    /// Console alias that execs the config file.
    pub alias: String,
}

impl Conversion {
    /// Render and serialize `record`. The alias starts out equal to `name`.
    pub fn build(record: ParameterRecord, canvas: Canvas, name: String) -> Self {
        Self {
            primitives: render::render(&record, canvas),
            directives: cfg::serialize(&record),
            record,
            alias: name.clone(),
            name,
        }
    }

    /// Use a different alias name than the file stem.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// `<name>.cfg`
    pub fn file_name(&self) -> String {
        cfg::cfg_file_name(&self.name)
    }

    /// Config file contents, one directive per line.
    pub fn cfg_text(&self) -> String {
        cfg::to_cfg_text(&self.directives)
    }

    /// `alias "<alias>" "exec <name>.cfg"`
    pub fn alias_line(&self) -> String {
        cfg::format_alias(&self.alias, &self.file_name())
    }
}

/// Outcome of handing a decode result to the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// New conversion is current.
    Applied,
    /// Input was empty; state cleared.
    Cleared,
    /// Decode failed; state cleared.
    Failed(DecodeError),
    /// A newer request exists; result dropped.
    Stale,
}

/// Run [`record::decode`] on tokio's blocking pool.
pub async fn decode_async(
    codec: Arc<dyn ShareCodec>,
    code: String,
) -> Result<ParameterRecord, DecodeError> {
    tokio::task::spawn_blocking(move || record::decode(codec.as_ref(), &code))
        .await
        .unwrap_or_else(|e| {
            log::error!("decode task failed: {}", e);
            Err(DecodeError::InvalidShareCode)
        })
}

/// Turns share code input into the current [`Conversion`].
///
/// Holds the codec, the name allocator and the latest outcome: either a
/// conversion, an error, or neither after empty input.
pub struct Converter<S, R = SmallRng> {
    codec: Arc<dyn ShareCodec>,
    allocator: NameAllocator<S, R>,
    canvas: Canvas,
    prefix: String,
    issued: u64,
    current: Option<Conversion>,
    error: Option<DecodeError>,
}

impl<S: KeyValueStore, R: Rng> Converter<S, R> {
    /// Create a converter on the preview canvas with the default prefix.
    ///
    /// # Arguments
    ///
    /// * `codec` - Share code decoder, shared with spawned decode tasks
    /// * `allocator` - Source of config and alias names
    pub fn new(codec: Arc<dyn ShareCodec>, allocator: NameAllocator<S, R>) -> Self {
        Self {
            codec,
            allocator,
            canvas: Canvas::PREVIEW,
            prefix: DEFAULT_PREFIX.to_string(),
            issued: 0,
            current: None,
            error: None,
        }
    }

    /// Canvas the primitives are rendered for.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Base used for allocated names.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Shared handle to the codec, for running decodes elsewhere.
    pub fn codec(&self) -> Arc<dyn ShareCodec> {
        Arc::clone(&self.codec)
    }

    /// The name allocator, for inspecting issued names.
    pub fn allocator(&self) -> &NameAllocator<S, R> {
        &self.allocator
    }

    /// The conversion from the latest successful request, if any.
    pub fn current(&self) -> Option<&Conversion> {
        self.current.as_ref()
    }

    /// The error from the latest request, if it failed.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }

    /// Drop the current conversion and error.
    pub fn clear(&mut self) {
        self.current = None;
        self.error = None;
    }

    /// Register new input.
    ///
    /// Always issues a request id, which makes every in-flight decode stale.
    /// Whitespace-only input clears the state and needs no decode.
    pub fn begin(&mut self, code: &str) -> Option<PendingDecode> {
        self.issued += 1;
        let id = RequestId(self.issued);

        let code = code.trim();
        if code.is_empty() {
            log::debug!("request {} is empty, clearing", id.0);
            self.clear();
            return None;
        }
        Some(PendingDecode {
            id,
            code: code.to_string(),
        })
    }

    /// Whether `id` is the most recently issued request.
    pub fn is_latest(&self, id: RequestId) -> bool {
        id.0 == self.issued
    }

    /// Apply a decode result if it belongs to the latest request.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: Result<ParameterRecord, DecodeError>,
    ) -> Completion {
        if !self.is_latest(id) {
            log::debug!("dropping stale result {} (latest {})", id.0, self.issued);
            return Completion::Stale;
        }

        match result {
            Ok(record) => {
                let name = self.allocator.ensure_unique_name(&self.prefix);
                log::info!("decoded share code as {}", name);
                self.current = Some(Conversion::build(record, self.canvas, name));
                self.error = None;
                Completion::Applied
            }
            Err(e) => {
                self.current = None;
                self.error = Some(e.clone());
                Completion::Failed(e)
            }
        }
    }

    /// Begin, decode and complete in one step.
    pub fn submit(&mut self, code: &str) -> Completion {
        match self.begin(code) {
            None => Completion::Cleared,
            Some(pending) => {
                let result = record::decode(self.codec.as_ref(), &pending.code);
                self.complete(pending.id, result)
            }
        }
    }

    /// Treat each line of `input` as new input and decode concurrently.
    ///
    /// `on_event` sees every applied, failed or cleared completion; stale
    /// results are dropped silently. Returns once input is exhausted and
    /// every in-flight decode has reported back.
    pub async fn watch<I>(
        &mut self,
        input: I,
        mut on_event: impl FnMut(&Self, &Completion),
    ) -> std::io::Result<()>
    where
        I: AsyncBufRead + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut lines = input.lines();
        let mut open = true;
        let mut in_flight = 0usize;

        while open || in_flight > 0 {
            tokio::select! {
                line = lines.next_line(), if open => {
                    match line? {
                        Some(line) => match self.begin(&line) {
                            Some(pending) => {
                                in_flight += 1;
                                let tx = tx.clone();
                                let codec = self.codec();
                                tokio::spawn(async move {
                                    let _ = tx.send(pending.run(codec).await);
                                });
                            }
                            None => on_event(self, &Completion::Cleared),
                        },
                        None => open = false,
                    }
                }
                Some((id, result)) = rx.recv(), if in_flight > 0 => {
                    in_flight -= 1;
                    let completion = self.complete(id, result);
                    if completion != Completion::Stale {
                        on_event(self, &completion);
                    }
                }
                else => break,
            }
        }
        Ok(())
    }
}
