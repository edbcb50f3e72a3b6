//! Non-fatal reporting of conversion problems.
//!
//! The converter never fails on a per-texture problem. It reports the
//! problem to a [`CodeLogger`] and carries on with the remaining channels.
//! Loggers only record; they never alter control flow.

use std::fmt;

/// Kind of problem reported during conversion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LogCode {
    /// A texture slot holds something that is not a 2D image (cube map,
    /// 3D texture, render target...).
    TextureInvalidType,
    /// The texture has no CPU-readable pixel data and cannot be exported.
    TextureNotReadable,
}

impl LogCode {
    pub fn description(&self) -> &'static str {
        match self {
            LogCode::TextureInvalidType => "invalid texture type (must be a 2D texture)",
            LogCode::TextureNotReadable => "texture pixels are not readable",
        }
    }
}

impl fmt::Display for LogCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LogItem {
    pub severity: Severity,
    pub code: LogCode,
    pub channel: String,
    pub material: String,
}

impl fmt::Display for LogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (channel \"{}\", material \"{}\")", self.code, self.channel, self.material)
    }
}

pub trait CodeLogger {
    fn error(&mut self, code: LogCode, channel: &str, material: &str);
    fn warning(&mut self, code: LogCode, channel: &str, material: &str);
}

/// Keeps every reported item for later inspection.
#[derive(Clone, Debug, Default)]
pub struct CollectLogger {
    items: Vec<LogItem>,
}

impl CollectLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LogItem] {
        &self.items
    }

    pub fn errors(&self) -> impl Iterator<Item = &LogItem> {
        self.items.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn push(&mut self, severity: Severity, code: LogCode, channel: &str, material: &str) {
        self.items.push(LogItem {
            severity,
            code,
            channel: channel.to_string(),
            material: material.to_string(),
        });
    }
}

impl CodeLogger for CollectLogger {
    fn error(&mut self, code: LogCode, channel: &str, material: &str) {
        self.push(Severity::Error, code, channel, material);
    }

    fn warning(&mut self, code: LogCode, channel: &str, material: &str) {
        self.push(Severity::Warning, code, channel, material);
    }
}

/// Forwards items as `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl CodeLogger for TracingLogger {
    fn error(&mut self, code: LogCode, channel: &str, material: &str) {
        tracing::error!(code = ?code, channel, material, "{}", code);
    }

    fn warning(&mut self, code: LogCode, channel: &str, material: &str) {
        tracing::warn!(code = ?code, channel, material, "{}", code);
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLogger;

impl CodeLogger for NullLogger {
    fn error(&mut self, _code: LogCode, _channel: &str, _material: &str) {}
    fn warning(&mut self, _code: LogCode, _channel: &str, _material: &str) {}
}
