//! Shell Command Parsing
//!
//! One command per line, whitespace separated. Keys and values cannot
//! contain whitespace.

use std::str::FromStr;

use crate::cache::{GetOptions, SetOptions};
use crate::error::CacheError;

/// Usage summary printed by `help`.
pub const HELP: &[&str] = &[
    "set <key> <value> [ttl=<n>] [no-update-ttl] [no-dispose-on-set]",
    "get <key> [update-age] [ttl=<n>]",
    "has <key>",
    "del <key>",
    "ttl <key>",
    "clear",
    "purge",
    "keys",
    "entries",
    "len",
    "stats",
    "help",
    "quit",
];

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        opts: SetOptions,
    },
    Get {
        key: String,
        opts: GetOptions,
    },
    Has {
        key: String,
    },
    Delete {
        key: String,
    },
    Ttl {
        key: String,
    },
    Clear,
    Purge,
    Keys,
    Entries,
    Len,
    Stats,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CacheError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| CacheError::InvalidRequest("empty command".to_string()))?
            .to_ascii_lowercase();

        let command = match name.as_str() {
            "set" => {
                let key = required(&mut words, "key")?;
                let value = required(&mut words, "value")?;
                let mut opts = SetOptions::new();
                for flag in words.by_ref() {
                    match flag {
                        "no-update-ttl" => opts.no_update_ttl = Some(true),
                        "no-dispose-on-set" => opts.no_dispose_on_set = Some(true),
                        _ => opts.ttl = Some(parse_ttl(flag)?),
                    }
                }
                Command::Set { key, value, opts }
            }
            "get" => {
                let key = required(&mut words, "key")?;
                let mut opts = GetOptions::new();
                for flag in words.by_ref() {
                    match flag {
                        "update-age" => opts.update_age_on_get = Some(true),
                        _ => opts.ttl = Some(parse_ttl(flag)?),
                    }
                }
                Command::Get { key, opts }
            }
            "has" => Command::Has {
                key: required(&mut words, "key")?,
            },
            "del" | "delete" => Command::Delete {
                key: required(&mut words, "key")?,
            },
            "ttl" => Command::Ttl {
                key: required(&mut words, "key")?,
            },
            "clear" => Command::Clear,
            "purge" => Command::Purge,
            "keys" => Command::Keys,
            "entries" => Command::Entries,
            "len" => Command::Len,
            "stats" => Command::Stats,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(CacheError::InvalidRequest(format!(
                    "unknown command '{}'",
                    other
                )))
            }
        };

        if let Some(extra) = words.next() {
            return Err(CacheError::InvalidRequest(format!(
                "unexpected argument '{}'",
                extra
            )));
        }
        Ok(command)
    }
}

fn required<'a>(words: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<String, CacheError> {
    words
        .next()
        .map(str::to_string)
        .ok_or_else(|| CacheError::InvalidRequest(format!("missing {}", what)))
}

fn parse_ttl(flag: &str) -> Result<u64, CacheError> {
    let raw = flag
        .strip_prefix("ttl=")
        .ok_or_else(|| CacheError::InvalidRequest(format!("unknown option '{}'", flag)))?;
    raw.parse()
        .map_err(|_| CacheError::InvalidRequest(format!("ttl '{}' is not a number", raw)))
}
