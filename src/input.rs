use crate::InputError;
use std::io::BufRead;

/// Lines of a reader, each keeping its own terminator.
///
/// The last line is yielded as-is when the input does not end in `\n`.
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so any
/// input can be filtered.
pub struct RawLines<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = Result<String, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                Some(Ok(String::from_utf8(buf).unwrap_or_else(|err| {
                    log::warn!("line {}: invalid UTF-8, replacing bad bytes", self.line_no);
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                })))
            }
            Err(err) => Some(Err(InputError::ReadFailed {
                message: err.to_string(),
            })),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;
    use std::io::{self, BufReader, Cursor, Read};

    fn collect(bytes: &[u8]) -> Vec<String> {
        RawLines::new(Cursor::new(bytes.to_vec()))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn keeps_terminators() {
        assert_eq!(collect(b"a\nb\r\n\nc"), vec!["a\n", "b\r\n", "\n", "c"]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(collect(b"caf\xe9\nok\n"), vec!["caf\u{fffd}\n", "ok\n"]);
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_error_is_reported() {
        let mut lines = RawLines::new(BufReader::new(Failing));
        match lines.next() {
            Some(Err(InputError::ReadFailed { message })) => {
                assert_eq!(message, "disk on fire");
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }
}
