// SPDX-License-Identifier: CEPL-1.0
//! Validation layers and the message sink they report through.
//!
//! Whether any of this is active is fixed when the binary is built:
//! debug builds enable validation, and the `info-messages` feature adds the
//! info severity on top of error, warning and verbose.
use bitflags::bitflags;

use crate::api::HookRequest;

pub const VALIDATION_LAYERS: &[&str] = &["VK_LAYER_KHRONOS_validation"];

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SeverityMask: u32 {
        const VERBOSE = 1 << 0;
        const INFO = 1 << 1;
        const WARNING = 1 << 2;
        const ERROR = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Verbose,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn bit(self) -> SeverityMask {
        match self {
            Severity::Verbose => SeverityMask::VERBOSE,
            Severity::Info => SeverityMask::INFO,
            Severity::Warning => SeverityMask::WARNING,
            Severity::Error => SeverityMask::ERROR,
        }
    }
}

/// The two text streams validation output lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Info,
    Error,
}

impl Stream {
    fn label(self) -> &'static str {
        match self {
            Stream::Info => "INFO",
            Stream::Error => "ERROR",
        }
    }
}

/// Receives one finished line per message. Must not touch bootstrap state;
/// the platform may call it from inside any API call.
pub type SinkFn = fn(Stream, &str);

pub fn stdio_sink(stream: Stream, line: &str) {
    match stream {
        Stream::Info => println!("{line}"),
        Stream::Error => eprintln!("{line}"),
    }
}

/// Which stream a message of `severity` goes to, if it passes `mask` at all.
pub fn route(mask: SeverityMask, severity: Severity) -> Option<Stream> {
    if !mask.contains(severity.bit()) {
        return None;
    }
    match severity {
        Severity::Info => Some(Stream::Info),
        Severity::Verbose | Severity::Warning | Severity::Error => Some(Stream::Error),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsDesc {
    pub layer_names: &'static [&'static str],
    pub severity_mask: SeverityMask,
    pub sink: SinkFn,
}

/// Immutable diagnostics settings, built once in `main` and passed down.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics {
    enabled: bool,
    info_messages: bool,
    sink: SinkFn,
}

impl Diagnostics {
    pub const fn new(enabled: bool, info_messages: bool) -> Self {
        Diagnostics {
            enabled,
            info_messages,
            sink: stdio_sink,
        }
    }

    /// Settings baked into this build.
    pub const fn from_build() -> Self {
        Self::new(cfg!(debug_assertions), cfg!(feature = "info-messages"))
    }

    pub const fn disabled() -> Self {
        Self::new(false, false)
    }

    pub const fn with_sink(mut self, sink: SinkFn) -> Self {
        self.sink = sink;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn info_messages(&self) -> bool {
        self.info_messages
    }

    pub fn severity_mask(&self) -> SeverityMask {
        let mut mask = SeverityMask::ERROR | SeverityMask::WARNING | SeverityMask::VERBOSE;
        if self.info_messages {
            mask |= SeverityMask::INFO;
        }
        mask
    }

    pub fn describe(&self) -> DiagnosticsDesc {
        DiagnosticsDesc {
            layer_names: if self.enabled { VALIDATION_LAYERS } else { &[] },
            severity_mask: self.severity_mask(),
            sink: self.sink,
        }
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.describe()
            .layer_names
            .iter()
            .map(|s| (*s).to_owned())
            .collect()
    }

    /// `None` when diagnostics are off; nothing gets hooked up then.
    pub fn hook_request(&self) -> Option<HookRequest> {
        self.enabled.then(|| HookRequest {
            severity: self.severity_mask(),
            diagnostics: *self,
        })
    }

    /// Formats and delivers one platform message.
    pub fn emit(&self, severity: Severity, message: &str) {
        if let Some(stream) = route(self.severity_mask(), severity) {
            let line = format!("[ {} ] Validation layer: {message}", stream.label());
            (self.sink)(stream, &line);
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::from_build()
    }
}
