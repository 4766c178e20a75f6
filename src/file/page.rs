use std::ops::Range;

use super::error::{FileError, FileResult};

const INT_SIZE: usize = 4;

/// Worst-case number of bytes one `char` takes in UTF-8.
const MAX_BYTES_PER_CHAR: usize = 4;

/// A block-sized byte buffer with positional accessors.
///
/// Integers are 4-byte big-endian. Byte arrays and strings are stored as a
/// 4-byte length header followed by the raw bytes; strings are UTF-8.
/// Every access is bounds-checked against the fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    buffer: Vec<u8>,
}

impl Page {
    /// Create a zero-filled page of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            buffer: vec![0u8; size],
        }
    }

    /// Wrap existing bytes; the page size is the vector's length
    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }

    /// Encoded size of a string of `chars` characters in the worst case
    pub fn max_length(chars: usize) -> usize {
        INT_SIZE + chars * MAX_BYTES_PER_CHAR
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn get_int(&self, offset: usize) -> FileResult<i32> {
        let range = self.range(offset, INT_SIZE)?;
        let mut raw = [0u8; INT_SIZE];
        raw.copy_from_slice(&self.buffer[range]);
        Ok(i32::from_be_bytes(raw))
    }

    pub fn set_int(&mut self, offset: usize, value: i32) -> FileResult<()> {
        let range = self.range(offset, INT_SIZE)?;
        self.buffer[range].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn get_bytes(&self, offset: usize) -> FileResult<Vec<u8>> {
        let len = self.get_int(offset)?;
        let len = usize::try_from(len).map_err(|_| FileError::InvalidLength { offset, len })?;
        let range = self.range(offset + INT_SIZE, len)?;
        Ok(self.buffer[range].to_vec())
    }

    pub fn set_bytes(&mut self, offset: usize, bytes: &[u8]) -> FileResult<()> {
        let len = i32::try_from(bytes.len()).map_err(|_| FileError::OutOfBounds {
            offset,
            len: bytes.len(),
            capacity: self.buffer.len(),
        })?;
        // Check the whole record before touching the header
        let header = self.range(offset, INT_SIZE + bytes.len())?;
        self.set_int(header.start, len)?;
        self.buffer[header.start + INT_SIZE..header.end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn get_string(&self, offset: usize) -> FileResult<String> {
        let bytes = self.get_bytes(offset)?;
        String::from_utf8(bytes).map_err(|_| FileError::InvalidString { offset })
    }

    pub fn set_string(&mut self, offset: usize, value: &str) -> FileResult<()> {
        self.set_bytes(offset, value.as_bytes())
    }

    /// Raw backing bytes, used for block transfers
    pub fn contents(&self) -> &[u8] {
        &self.buffer
    }

    pub fn contents_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    fn range(&self, offset: usize, len: usize) -> FileResult<Range<usize>> {
        let out_of_bounds = || FileError::OutOfBounds {
            offset,
            len,
            capacity: self.buffer.len(),
        };
        let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.buffer.len() {
            return Err(out_of_bounds());
        }
        Ok(offset..end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_roundtrip() {
        let mut page = Page::new(64);
        page.set_int(0, 42).unwrap();
        page.set_int(4, -7).unwrap();
        page.set_int(60, i32::MAX).unwrap();

        assert_eq!(page.get_int(0).unwrap(), 42);
        assert_eq!(page.get_int(4).unwrap(), -7);
        assert_eq!(page.get_int(60).unwrap(), i32::MAX);
    }

    #[test]
    fn test_int_is_big_endian() {
        let mut page = Page::new(8);
        page.set_int(0, 0x0102_0304).unwrap();
        assert_eq!(&page.contents()[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_bytes_are_length_prefixed() {
        let mut page = Page::new(32);
        page.set_bytes(10, b"abc").unwrap();

        assert_eq!(page.get_int(10).unwrap(), 3);
        assert_eq!(&page.contents()[14..17], b"abc");
        assert_eq!(page.get_bytes(10).unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_empty_bytes() {
        let mut page = Page::new(16);
        page.set_bytes(12, &[]).unwrap();
        assert!(page.get_bytes(12).unwrap().is_empty());
    }

    #[test]
    fn test_string_roundtrip_multibyte() {
        let mut page = Page::new(64);
        page.set_string(0, "größe").unwrap();
        assert_eq!(page.get_string(0).unwrap(), "größe");
        assert!("größe".len() + 4 <= Page::max_length("größe".chars().count()));
    }

    #[test]
    fn test_max_length() {
        assert_eq!(Page::max_length(0), 4);
        assert_eq!(Page::max_length(13), 56);
    }

    #[test]
    fn test_out_of_bounds_int() {
        let mut page = Page::new(16);
        assert!(matches!(
            page.set_int(13, 1),
            Err(FileError::OutOfBounds { .. })
        ));
        assert!(matches!(page.get_int(16), Err(FileError::OutOfBounds { .. })));
        assert!(matches!(
            page.get_int(usize::MAX),
            Err(FileError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_bytes_leaves_page_untouched() {
        let mut page = Page::new(16);
        let result = page.set_bytes(8, b"too long!");
        assert!(matches!(result, Err(FileError::OutOfBounds { .. })));
        assert!(page.contents().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_corrupt_length_header() {
        let mut page = Page::new(16);
        page.set_int(0, -1).unwrap();
        assert!(matches!(
            page.get_bytes(0),
            Err(FileError::InvalidLength { offset: 0, len: -1 })
        ));

        page.set_int(0, 100).unwrap();
        assert!(matches!(
            page.get_bytes(0),
            Err(FileError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut page = Page::new(16);
        page.set_bytes(0, &[0xff, 0xfe]).unwrap();
        assert!(matches!(
            page.get_string(0),
            Err(FileError::InvalidString { offset: 0 })
        ));
    }

    #[test]
    fn test_from_bytes() {
        let page = Page::from_bytes(vec![0, 0, 0, 9, 7, 7, 7, 7]);
        assert_eq!(page.size(), 8);
        assert_eq!(page.get_int(0).unwrap(), 9);
    }
}
