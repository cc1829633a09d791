//! Reader/writer adapter binding the typed codec to one borrowed stream.
//!
//! [`ValueStream`] implements [`ValueReader`] when the stream is `Read` and
//! [`ValueWriter`] when it is `Write`; call sites should depend on those traits rather
//! than on the concrete stream type. The adapter never closes the stream.

use std::io::{Cursor, Read, Seek, Write};

use tracing::{trace, warn};

use crate::codec::{self, Nullable, WireDecode, WireEncode};
use crate::error::{Error, Result};
use crate::types::{Slot, Value};

mod options;
mod reader;
mod writer;

pub use options::{
    DEFAULT_COPY_BUFFER_SIZE, DEFAULT_MAX_EMBEDDED_LEN, StreamBuilder, StreamOptions,
};
pub use reader::ValueReader;
pub use writer::ValueWriter;

use options::validate_buffer_size;

/// Typed reader/writer over a borrowed byte stream.
pub struct ValueStream<'a, S: ?Sized> {
    inner: &'a mut S,
    options: StreamOptions,
}

impl<'a, S: ?Sized> ValueStream<'a, S> {
    /// Binds `inner` with default options.
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            options: StreamOptions::default(),
        }
    }

    /// Binds `inner` with explicit options.
    pub fn with_options(inner: &'a mut S, options: StreamOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::from_validated(inner, options))
    }

    pub(crate) fn from_validated(inner: &'a mut S, options: StreamOptions) -> Self {
        Self { inner, options }
    }

    /// Creates a builder for `inner`.
    pub fn builder(inner: &'a mut S) -> StreamBuilder<'a, S> {
        StreamBuilder::new(inner)
    }

    /// Options in effect.
    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// Shared access to the bound stream.
    pub fn get_ref(&self) -> &S {
        &*self.inner
    }

    /// Exclusive access to the bound stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut *self.inner
    }

    /// Current cursor position of the bound stream.
    pub fn position(&mut self) -> Result<u64>
    where
        S: Seek,
    {
        Ok(self.inner.stream_position()?)
    }
}

impl<S: Read + ?Sized> ValueReader for ValueStream<'_, S> {
    fn read_value<T: WireDecode>(&mut self) -> Result<T> {
        T::decode(&mut *self.inner)
    }

    fn read_nullable<T: Nullable>(&mut self) -> Result<Option<T>> {
        T::decode_nullable(&mut *self.inner)
    }

    fn read_string(&mut self) -> Result<Option<String>> {
        codec::read_string(&mut *self.inner)
    }

    fn read_byte_array(&mut self) -> Result<Option<Vec<u8>>> {
        codec::read_byte_array(&mut *self.inner)
    }

    fn read_slot(&mut self, slot: &Slot) -> Result<Option<Value>> {
        slot.read(&mut *self.inner)
    }

    fn read_length_prefixed(&mut self) -> Result<Cursor<Vec<u8>>> {
        self.read_length_prefixed_with(self.options.copy_buffer_size)
    }

    fn read_length_prefixed_with(&mut self, buffer_size: usize) -> Result<Cursor<Vec<u8>>> {
        validate_buffer_size(buffer_size)?;
        let limit = self.options.max_embedded_len;
        let embedded = codec::read_length_prefixed(&mut *self.inner, buffer_size, limit)?;
        trace!(
            len = embedded.get_ref().len(),
            buffer_size, "embedded stream read"
        );
        Ok(embedded)
    }
}

impl<S: Write + ?Sized> ValueWriter for ValueStream<'_, S> {
    fn write_value<T: WireEncode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(&mut *self.inner)
    }

    fn write_nullable<T: Nullable>(&mut self, value: Option<&T>) -> Result<()> {
        T::encode_nullable(value, &mut *self.inner)
    }

    fn write_string(&mut self, value: Option<&str>) -> Result<()> {
        codec::write_string(&mut *self.inner, value)
    }

    fn write_byte_array(&mut self, value: Option<&[u8]>) -> Result<()> {
        codec::write_byte_array(&mut *self.inner, value)
    }

    fn write_slot(&mut self, slot: &Slot, value: Option<&Value>) -> Result<()> {
        slot.write(&mut *self.inner, value)
    }

    fn write_length_prefixed<R: Read + Seek + ?Sized>(&mut self, source: &mut R) -> Result<u64> {
        self.write_length_prefixed_with(source, self.options.copy_buffer_size)
    }

    fn write_length_prefixed_with<R: Read + Seek + ?Sized>(
        &mut self,
        source: &mut R,
        buffer_size: usize,
    ) -> Result<u64> {
        validate_buffer_size(buffer_size)?;
        let limit = self.options.max_embedded_len;
        let copied = codec::write_length_prefixed(&mut *self.inner, source, buffer_size, limit)
            .inspect_err(|err| {
                if let Error::ShortCopy { expected, copied } = err {
                    warn!(expected, copied, "embedded source shrank during copy");
                }
            })?;
        trace!(len = copied, buffer_size, "embedded stream written");
        Ok(copied)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
