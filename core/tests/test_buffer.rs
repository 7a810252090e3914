#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use zflate_core::{
        compression::{grow, spare},
        constants::OUTPUT_WINDOW_INCREMENT,
        stream::StreamBuffer,
    };

    /// Yields `Interrupted` once, then the wrapped bytes.
    struct Flaky<'a> {
        interrupted: bool,
        data: &'a [u8],
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn grow_on_unallocated_buffer() {
        let mut buf: Vec<u8> = Vec::new();
        grow(&mut buf, OUTPUT_WINDOW_INCREMENT);
        assert!(spare(&buf) >= OUTPUT_WINDOW_INCREMENT);
        assert!(buf.is_empty());
    }

    #[test]
    fn grow_keeps_content_and_is_noop_when_satisfied() {
        let mut buf = b"keep me".to_vec();
        grow(&mut buf, 100);
        assert_eq!(buf, b"keep me");
        assert!(spare(&buf) >= 100);

        let capacity = buf.capacity();
        grow(&mut buf, 10);
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn stream_buffer_consume_and_compact() {
        let mut buf = StreamBuffer::with_capacity(16);
        buf.fill_from(&mut &b"abcdef"[..], 16).unwrap();
        assert_eq!(buf.available(), 6);

        buf.consume(2);
        assert_eq!(buf.readable(), b"cdef");
        buf.compact();
        assert_eq!(buf.readable(), b"cdef");

        let mut dst = [0u8; 3];
        assert_eq!(buf.read_into(&mut dst), 3);
        assert_eq!(&dst, b"cde");
        assert_eq!(buf.read_into(&mut dst), 1);
        assert!(buf.is_empty());

        // over-consuming is clamped
        buf.fill_from(&mut &b"xy"[..], 16).unwrap();
        buf.consume(10);
        assert!(buf.is_empty());
        assert_eq!(buf.available(), 0);
    }

    #[test]
    fn fill_retries_interrupted_reads() {
        let mut source = Flaky { interrupted: false, data: b"0123456789" };
        let mut buf = StreamBuffer::new();
        buf.fill_from(&mut &b"ab"[..], 2).unwrap();
        buf.consume(1);

        assert_eq!(buf.fill_from(&mut source, 4).unwrap(), 4);
        assert_eq!(buf.readable(), b"b0123");
        assert_eq!(buf.fill_from(&mut source, 100).unwrap(), 6);
        assert_eq!(buf.readable(), b"b0123456789");
        assert_eq!(buf.fill_from(&mut source, 100).unwrap(), 0);
    }
}
