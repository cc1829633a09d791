use crate::error::{Error, Result};
use crate::stream::ValueStream;

/// Default scratch buffer size used when copying embedded streams.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 81_920;
/// Default (and largest) accepted embedded stream length: the largest in-memory buffer
/// the platform can address.
pub const DEFAULT_MAX_EMBEDDED_LEN: u64 = isize::MAX as u64;

/// Options controlling [`ValueStream`] behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    /// Scratch buffer size for embedded stream copies.
    pub copy_buffer_size: usize,
    /// Longest embedded stream accepted on either side.
    pub max_embedded_len: u64,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
            max_embedded_len: DEFAULT_MAX_EMBEDDED_LEN,
        }
    }
}

impl StreamOptions {
    /// Checks that every option is usable.
    pub fn validate(&self) -> Result<()> {
        validate_buffer_size(self.copy_buffer_size)?;
        if self.max_embedded_len > DEFAULT_MAX_EMBEDDED_LEN {
            return Err(Error::invalid_option(format!(
                "max_embedded_len {} exceeds the addressable maximum {DEFAULT_MAX_EMBEDDED_LEN}",
                self.max_embedded_len
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_buffer_size(buffer_size: usize) -> Result<()> {
    if buffer_size == 0 {
        return Err(Error::invalid_option("copy buffer size must be non-zero"));
    }
    Ok(())
}

/// Builder for [`ValueStream`].
pub struct StreamBuilder<'a, S: ?Sized> {
    stream: &'a mut S,
    options: StreamOptions,
}

impl<'a, S: ?Sized> StreamBuilder<'a, S> {
    /// Creates a builder around a borrowed stream.
    pub fn new(stream: &'a mut S) -> Self {
        Self {
            stream,
            options: StreamOptions::default(),
        }
    }

    /// Overrides stream options wholesale.
    pub fn options(mut self, options: StreamOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the scratch buffer size for embedded stream copies.
    pub fn copy_buffer_size(mut self, size: usize) -> Self {
        self.options.copy_buffer_size = size;
        self
    }

    /// Sets the longest embedded stream accepted.
    pub fn max_embedded_len(mut self, len: u64) -> Self {
        self.options.max_embedded_len = len;
        self
    }

    /// Builds the adapter, validating options before returning it.
    pub fn build(self) -> Result<ValueStream<'a, S>> {
        ValueStream::with_options(self.stream, self.options)
    }
}
