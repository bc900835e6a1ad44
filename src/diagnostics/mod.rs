//! Non-fatal parser diagnostics
//!
//! Warnings flag deprecated syntax that still parses. They are delivered to a
//! [`WarningSink`] chosen by the caller; [`DiscardWarnings`] drops them.

use crate::tokeniser::Location;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// An advisory message produced while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    message: String,
    location: Option<Location>,
}

impl Warning {
    pub fn new(message: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Receiver for parser warnings
#[cfg_attr(test, mockall::automock)]
pub trait WarningSink {
    fn push(&mut self, warning: Warning);
}

impl WarningSink for Vec<Warning> {
    fn push(&mut self, warning: Warning) {
        Vec::push(self, warning);
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn push(&mut self, warning: Warning) {
        (**self).push(warning);
    }
}

/// Sink that drops every warning
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardWarnings;

impl WarningSink for DiscardWarnings {
    fn push(&mut self, _warning: Warning) {}
}

/// Cloneable sink that collects warnings from several parsers, possibly on
/// different threads
#[derive(Debug, Clone, Default)]
pub struct SharedWarnings {
    inner: Arc<Mutex<Vec<Warning>>>,
}

impl SharedWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything collected so far
    pub fn snapshot(&self) -> Vec<Warning> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return everything collected so far
    pub fn drain(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl WarningSink for SharedWarnings {
    fn push(&mut self, warning: Warning) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_warning_display() {
        let location = Location {
            line: 1,
            column: 12,
            offset: 11,
        };
        assert_eq!(
            Warning::new("deprecated", Some(location)).to_string(),
            "1:12: deprecated"
        );
        assert_eq!(Warning::new("deprecated", None).to_string(), "deprecated");
    }

    #[test]
    fn test_vec_sink_through_reference() {
        let mut warnings: Vec<Warning> = Vec::new();
        {
            let mut sink: &mut Vec<Warning> = &mut warnings;
            WarningSink::push(&mut sink, Warning::new("a", None));
        }
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message(), "a");
    }

    #[test]
    fn test_discard_warnings() {
        let mut sink = DiscardWarnings;
        sink.push(Warning::new("ignored", None));
    }

    #[test]
    fn test_shared_warnings_across_threads() {
        let shared = SharedWarnings::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mut sink = shared.clone();
                thread::spawn(move || sink.push(Warning::new(format!("w{}", i), None)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(shared.len(), 4);
        assert_eq!(shared.drain().len(), 4);
        assert!(shared.is_empty());
    }

    #[test]
    fn test_mock_sink() {
        let mut mock = MockWarningSink::new();
        mock.expect_push()
            .withf(|warning| warning.message() == "hello")
            .times(1)
            .return_const(());
        mock.push(Warning::new("hello", None));
    }
}
