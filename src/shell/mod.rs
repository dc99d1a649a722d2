//! Interactive Shell Module
//!
//! Line-oriented front end over a `TtlCache<String, String>`: reads one
//! command per line and answers with one JSON object per line, including
//! any disposals the command caused.

mod command;
mod response;

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::clock::{Clock, MonotonicClock};
use crate::config::CacheConfig;
use crate::error::Result;

pub use command::{Command, HELP};
pub use response::{Disposal, Response};

type DisposalLog = Arc<Mutex<Vec<Disposal>>>;

// == Shell ==
/// Owns the cache and collects the disposals each command triggers.
pub struct Shell {
    cache: TtlCache<String, String>,
    disposed: DisposalLog,
}

impl Shell {
    /// Creates a shell over a cache using the default clock.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock::new())
    }

    /// Creates a shell whose cache reads time from `clock`.
    pub fn with_clock<C>(config: CacheConfig, clock: C) -> Result<Self>
    where
        C: Clock + 'static,
    {
        let disposed: DisposalLog = Arc::default();
        let sink = disposed.clone();
        let cache = TtlCache::builder()
            .config(config)
            .clock(clock)
            .dispose(move |value: String, key: String, reason| {
                debug!(key = %key, %reason, "entry disposed");
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(Disposal { key, value, reason });
            })
            .build()?;
        Ok(Self { cache, disposed })
    }

    pub fn cache(&self) -> &TtlCache<String, String> {
        &self.cache
    }

    // == Execute ==
    /// Runs one command against the cache.
    pub fn execute(&mut self, command: Command) -> Response {
        let result = self.dispatch(command);
        let disposed = std::mem::take(
            &mut *self
                .disposed
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        match result {
            Ok(value) => Response::success(value, disposed),
            Err(err) => Response::failure(err.to_string(), disposed),
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Value> {
        let value = match command {
            Command::Set { key, value, opts } => {
                self.cache.set_with(key.clone(), value, opts)?;
                json!({ "key": key })
            }
            Command::Get { key, opts } => {
                let value = self.cache.get_with(&key, opts)?;
                json!({ "key": key, "value": value })
            }
            Command::Has { key } => {
                let present = self.cache.has(&key);
                json!({ "key": key, "present": present })
            }
            Command::Delete { key } => {
                let deleted = self.cache.delete(&key);
                json!({ "key": key, "deleted": deleted })
            }
            Command::Ttl { key } => match self.cache.remaining_ttl(&key) {
                Some(remaining) => json!({ "key": key, "remaining": remaining }),
                None => json!({ "key": key, "remaining": "unbounded" }),
            },
            Command::Clear => {
                let cleared = self.cache.len();
                self.cache.clear();
                json!({ "cleared": cleared })
            }
            Command::Purge => json!({ "purged": self.cache.purge_stale() }),
            Command::Keys => json!(self.cache.keys().collect::<Vec<_>>()),
            Command::Entries => Value::Array(
                self.cache
                    .iter()
                    .map(|(key, value)| json!([key, value]))
                    .collect(),
            ),
            Command::Len => json!({ "len": self.cache.len() }),
            Command::Stats => {
                let stats = self.cache.stats();
                json!({ "stats": stats, "hit_rate": stats.hit_rate() })
            }
            Command::Help => json!({ "commands": HELP }),
            Command::Quit => json!({ "bye": true }),
        };
        Ok(value)
    }

    // == Run ==
    /// Reads commands from `input` until end of input or `quit`, writing one
    /// response line per command to `output`. Blank lines and lines starting
    /// with `#` are skipped.
    pub fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut handled = 0usize;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (response, quit) = match line.parse::<Command>() {
                Ok(command) => {
                    let quit = command == Command::Quit;
                    (self.execute(command), quit)
                }
                Err(err) => {
                    warn!(%err, "rejected command");
                    (Response::failure(err.to_string(), Vec::new()), false)
                }
            };
            handled += 1;

            serde_json::to_writer(&mut output, &response)?;
            writeln!(output)?;
            output.flush()?;

            if quit {
                break;
            }
        }
        info!(handled, "shell input finished");
        Ok(())
    }
}
