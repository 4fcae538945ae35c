use crate::{build_value, compiled, ByteOrder, ChompError, CompiledRecord, Record, Value};
use std::{io, marker::PhantomData, mem, sync::Arc};

/// An incremental decoder for a stream of fixed-size records of type `T`.
///
/// Bytes can be fed in chunks of any size. Once at least one record's worth
/// is buffered, [build](Reader::build) consumes exactly that many bytes and
/// returns the decoded record; anything past it stays buffered.
///
/// A reader starts out unbound. [bind](Reader::bind) compiles (or fetches
/// from the process-wide cache) the layout of `T`; until then feeding and
/// building fail with [ChompError::Unbound].
///
/// ```
/// use bytechomp::{record, types::*, ByteOrder, Reader};
///
/// record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Tick {
///         pub id: U8,
///         pub delta: I32,
///     }
/// }
///
/// let mut reader = Reader::<Tick>::new(ByteOrder::Little).allocate().unwrap();
/// reader.feed(&[1, 0xf9, 0xff]).unwrap();
/// assert!(reader.build().unwrap().is_none());
///
/// reader.feed(&[0xff, 0xff]).unwrap();
/// assert_eq!(reader.build().unwrap(), Some(Tick { id: 1, delta: -7 }));
/// ```
pub struct Reader<T: Record> {
    byte_order: ByteOrder,
    compiled:   Option<Arc<CompiledRecord>>,
    data:       Vec<u8>,
    _record:    PhantomData<fn() -> T>,
}

impl<T: Record> Default for Reader<T> {
    fn default() -> Self {
        Reader::new(ByteOrder::default())
    }
}

impl<T: Record> Reader<T> {
    pub fn new(byte_order: ByteOrder) -> Self {
        Reader {
            byte_order,
            compiled: None,
            data: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Binds the reader to the compiled layout of `T`. Binding twice is a
    /// no-op; a record that fails to compile reports its schema error here.
    pub fn bind(&mut self) -> Result<&mut Self, ChompError> {
        if self.compiled.is_none() {
            self.compiled = Some(compiled::<T>()?);
        }
        Ok(self)
    }

    /// Owned version of [bind](Reader::bind), for construction chains.
    pub fn allocate(mut self) -> Result<Self, ChompError> {
        self.bind()?;
        Ok(self)
    }

    pub fn is_bound(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Size in bytes of one encoded record, once bound.
    pub fn record_size(&self) -> Option<usize> {
        self.compiled.as_ref().map(|compiled| compiled.size())
    }

    /// Number of bytes fed but not yet consumed.
    pub fn buffered_len(&self) -> usize {
        self.data.len()
    }

    /// Appends bytes to the buffer.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), ChompError> {
        if self.compiled.is_none() {
            return Err(ChompError::Unbound);
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// True when a full record is buffered. Always false while unbound.
    pub fn is_complete(&self) -> bool {
        match &self.compiled {
            Some(compiled) => self.data.len() >= compiled.size(),
            None => false,
        }
    }

    /// Decodes and consumes the next buffered record, or returns `Ok(None)`
    /// if not enough bytes have been fed yet.
    pub fn build(&mut self) -> Result<Option<T>, ChompError> {
        match self.build_value()? {
            Some(value) => T::from_value(value).map(Some),
            None => Ok(None),
        }
    }

    /// Like [build](Reader::build) but stops at the dynamic [Value::Record].
    pub fn build_value(&mut self) -> Result<Option<Value>, ChompError> {
        let compiled = self.compiled.as_ref().ok_or(ChompError::Unbound)?;
        let size = compiled.size();
        if self.data.len() < size {
            return Ok(None);
        }

        let flat = compiled.layout.unpack(&self.data[..size], self.byte_order)?;
        self.data.drain(..size);
        build_value(&compiled.plan, flat).map(Some)
    }

    /// Feeds `chunks` one at a time, yielding every record as soon as it is
    /// complete. Bytes already buffered are decoded first; bytes left after
    /// the last chunk stay buffered.
    pub fn iter<I>(&mut self, chunks: I) -> RecordIter<'_, T, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        RecordIter {
            reader:   self,
            chunks:   chunks.into_iter(),
            finished: false,
        }
    }

    /// Discards everything buffered.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Takes everything buffered, leaving the buffer empty.
    pub fn export(&mut self) -> Vec<u8> {
        mem::take(&mut self.data)
    }
}

/// Readers can sit at the end of an `io::copy`.
impl<T: Record> io::Write for Reader<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Iterator returned by [Reader::iter]. Ends when the chunks run out, or
/// right after yielding the first error.
pub struct RecordIter<'r, T: Record, I> {
    reader:   &'r mut Reader<T>,
    chunks:   I,
    finished: bool,
}

impl<'r, T, I> Iterator for RecordIter<'r, T, I>
where
    T: Record,
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = Result<T, ChompError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.reader.build() {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }

            let chunk = match self.chunks.next() {
                Some(chunk) => chunk,
                None => {
                    self.finished = true;
                    return None;
                }
            };
            if let Err(err) = self.reader.feed(chunk.as_ref()) {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}
