//! Strategy registry.
//!
//! Replaces by-name reflective class loading with an explicit mapping from
//! strategy identifier to factory. The registry is consulted once at task
//! start; an unrecognized identifier fails startup.

use crate::delimited::DelimitedFormatter;
use crate::error::{FormatError, Result};
use crate::json::JsonConverter;
use crate::{Converter, Formatter};
use std::collections::HashMap;

type FormatterFactory = Box<dyn Fn(&str) -> Result<Box<dyn Formatter>> + Send + Sync>;
type ConverterFactory = Box<dyn Fn() -> Box<dyn Converter> + Send + Sync>;

/// Identifier of the built-in delimited formatter strategy.
pub const DELIMITED_FORMATTER: &str = "csv";

/// Identifier of the built-in JSON converter strategy.
pub const JSON_CONVERTER: &str = "json";

/// Maps strategy identifiers to constructors.
///
/// Formatter factories additionally receive the configured format type
/// (for the delimited strategy: `csv` or `tsv`).
pub struct FormatterRegistry {
    formatters: HashMap<String, FormatterFactory>,
    converters: HashMap<String, ConverterFactory>,
}

impl FormatterRegistry {
    /// Empty registry with no strategies.
    pub fn new() -> Self {
        Self {
            formatters: HashMap::new(),
            converters: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_formatter(DELIMITED_FORMATTER, |format_type| match format_type {
            "csv" => Ok(Box::new(DelimitedFormatter::csv())),
            "tsv" => Ok(Box::new(DelimitedFormatter::tsv())),
            other => Err(FormatError::UnsupportedFormatType {
                strategy: DELIMITED_FORMATTER.to_string(),
                format_type: other.to_string(),
            }),
        });
        registry.register_converter(JSON_CONVERTER, || Box::new(JsonConverter::new()));
        registry
    }

    /// Register a formatter strategy under an identifier.
    pub fn register_formatter<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&str) -> Result<Box<dyn Formatter>> + Send + Sync + 'static,
    {
        self.formatters.insert(name.into(), Box::new(factory));
    }

    /// Register a converter strategy under an identifier.
    pub fn register_converter<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Converter> + Send + Sync + 'static,
    {
        self.converters.insert(name.into(), Box::new(factory));
    }

    /// Construct the formatter registered under `name` for `format_type`.
    pub fn create_formatter(&self, name: &str, format_type: &str) -> Result<Box<dyn Formatter>> {
        let factory = self
            .formatters
            .get(name)
            .ok_or_else(|| FormatError::UnknownStrategy {
                kind: "formatter",
                name: name.to_string(),
            })?;
        factory(format_type)
    }

    /// Construct the converter registered under `name`.
    pub fn create_converter(&self, name: &str) -> Result<Box<dyn Converter>> {
        let factory = self
            .converters
            .get(name)
            .ok_or_else(|| FormatError::UnknownStrategy {
                kind: "converter",
                name: name.to_string(),
            })?;
        Ok(factory())
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
