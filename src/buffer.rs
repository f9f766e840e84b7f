//! Byte-level buffer primitives backing the archives.
//!
//! [`ByteSink`] appends to a caller-owned `Vec<u8>` with amortized growth
//! and deferred truncation; [`ByteSource`] is a range-checked cursor over a
//! borrowed byte slice. The archives in [`crate::archive`] compose these
//! into the save and load directions.

use crate::error::{PolycodeError, Result};

/// An append-only writer over a caller-owned growable byte container.
///
/// The sink tracks a *logical size* separately from the vector's length:
/// writes grow the vector in 1.5x steps and copy into the slack, so a burst
/// of small appends does not reallocate per write. [`ByteSink::commit`]
/// truncates the vector back to the logical size, discarding the slack.
/// Until then, bytes past the logical size are meaningless filler.
///
/// Construction on a non-empty vector appends after the existing content.
#[derive(Debug)]
pub struct ByteSink<'a> {
    /// The output vector. Its length is the grown capacity ceiling, not the
    /// number of meaningful bytes.
    output: &'a mut Vec<u8>,

    /// The number of meaningful bytes written so far.
    size: usize,
}

impl<'a> ByteSink<'a> {
    /// Creates a sink that appends to `output`.
    pub fn new(output: &'a mut Vec<u8>) -> Self {
        let size = output.len();
        Self { output, size }
    }

    /// Appends `bytes` after the previously written data.
    pub fn write(&mut self, bytes: &[u8]) {
        let needed = self.size + bytes.len();
        if needed > self.output.len() {
            self.output.resize(needed + needed / 2, 0);
        }

        self.output[self.size..needed].copy_from_slice(bytes);
        self.size = needed;
    }

    /// Truncates the output vector to the logical size.
    ///
    /// Must run once the owning operation finishes, on success and failure
    /// alike, so the caller's vector never keeps filler bytes. Idempotent.
    pub fn commit(&mut self) {
        self.output.truncate(self.size);
    }

    /// Returns the logical size: initial content plus all bytes written.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if nothing was written and the vector started empty.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// A cursor reader over a borrowed, contiguous byte range.
#[derive(Debug)]
pub struct ByteSource<'a> {
    /// The input bytes.
    input: &'a [u8],

    /// The next read position.
    offset: usize,
}

impl<'a> ByteSource<'a> {
    /// Creates a source reading from the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Copies `dst.len()` bytes from the current offset and advances.
    ///
    /// Fails with [`PolycodeError::OutOfRange`] when fewer bytes remain,
    /// leaving the offset untouched.
    pub fn read(&mut self, dst: &mut [u8]) -> Result<()> {
        let available = self.input.len() - self.offset;
        if available < dst.len() {
            return Err(PolycodeError::OutOfRange {
                requested: dst.len(),
                available,
            });
        }

        let end = self.offset + dst.len();
        dst.copy_from_slice(&self.input[self.offset..end]);
        self.offset = end;
        Ok(())
    }

    /// Returns the number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rewinds the cursor to offset zero.
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sink_grows_lazily_and_commits_exactly() {
        let mut output = Vec::new();
        let mut sink = ByteSink::new(&mut output);

        sink.write(&[1, 2, 3]);
        sink.write(&[4]);
        assert_eq!(sink.len(), 4);

        sink.commit();
        assert_eq!(output, vec![1, 2, 3, 4]);
    }

    #[test]
    fn commit_is_idempotent() {
        let mut output = Vec::new();
        let mut sink = ByteSink::new(&mut output);
        sink.write(&[9; 10]);
        sink.commit();
        sink.commit();
        assert_eq!(output, vec![9; 10]);
    }

    #[test]
    fn sink_appends_after_existing_content() {
        let mut output = vec![0xAA, 0xBB];
        let mut sink = ByteSink::new(&mut output);
        sink.write(&[0xCC]);
        sink.commit();
        assert_eq!(output, vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn source_reads_in_order_and_tracks_offset() {
        let input = [1u8, 2, 3, 4, 5];
        let mut source = ByteSource::new(&input);

        let mut head = [0u8; 2];
        source.read(&mut head).unwrap();
        assert_eq!(head, [1, 2]);
        assert_eq!(source.offset(), 2);

        source.reset();
        source.read(&mut head).unwrap();
        assert_eq!(head, [1, 2]);
    }

    #[test]
    fn source_rejects_reads_past_the_end() {
        let input = [1u8, 2];
        let mut source = ByteSource::new(&input);

        let mut dst = [0u8; 3];
        let err = source.read(&mut dst).unwrap_err();
        assert!(matches!(
            err,
            PolycodeError::OutOfRange {
                requested: 3,
                available: 2
            }
        ));

        // The failed read must not consume anything.
        assert_eq!(source.offset(), 0);
    }
}
