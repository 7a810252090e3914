#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use flate2::{write::{GzEncoder, ZlibEncoder}, Compression};
    use zflate_core::{
        compression::{decompress, compress, Decompressor, Format},
        native::NativeHandle,
        types::{CompressionError, Direction, NativeFault},
    };

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn flate2_zlib(input: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input).unwrap();
        encoder.finish().unwrap()
    }

    fn text(len: usize) -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(len)
            .copied()
            .collect()
    }

    #[test]
    fn decodes_flate2_zlib_and_gzip() {
        init_logging();
        let input = text(50_000);

        let compressed = flate2_zlib(&input);
        let chunk = Decompressor::new().unwrap().decompress(&compressed).unwrap();
        assert_eq!(chunk.output, input);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&input).unwrap();
        let gz = encoder.finish().unwrap();
        let mut decompressor = Decompressor::with_format(Format::Gzip).unwrap();
        assert_eq!(decompressor.format(), Format::Gzip);
        assert_eq!(decompressor.decompress(&gz).unwrap().output, input);
    }

    #[test]
    fn chunked_input_of_any_split() {
        let input = text(30_000);
        let compressed = flate2_zlib(&input);

        for piece in [1usize, 7, 512, 4096] {
            let mut decompressor = Decompressor::new().unwrap();
            let mut out = Vec::new();
            let mut consumed = 0;
            let mut completed = false;
            for part in compressed.chunks(piece) {
                let processed = decompressor.decompress_chunk_into(part, &mut out).unwrap();
                consumed += processed.consumed;
                completed = processed.completed;
            }
            assert!(completed, "piece {piece}");
            assert_eq!(consumed, compressed.len());
            assert_eq!(out, input);
        }
    }

    #[test]
    fn trailing_bytes_are_not_consumed() {
        let mut data = compress(b"payload", 6).unwrap();
        let stream_len = data.len();
        data.extend_from_slice(b"trailing garbage");

        let chunk = Decompressor::new().unwrap().decompress(&data).unwrap();
        assert_eq!(chunk.consumed, stream_len);
        assert!(chunk.consumed < data.len());
        assert_eq!(chunk.output, b"payload");

        let chunk = Decompressor::new().unwrap().decompress_chunk(&data).unwrap();
        assert_eq!(chunk.consumed, stream_len);
        assert!(chunk.completed);
        assert_eq!(chunk.output, b"payload");

        assert_eq!(decompress(&data).unwrap(), b"payload");
    }

    #[test]
    fn tiny_size_hint_retries_until_it_fits() {
        let input = text(100_000);
        let compressed = compress(&input, 9).unwrap();

        let mut decompressor = Decompressor::new().unwrap();
        let chunk = decompressor.decompress_complete(&compressed, Some(1)).unwrap();
        assert_eq!(chunk.output, input);
        assert!(chunk.completed);

        let counters = decompressor.counters();
        assert!(counters.retries >= 1);
        assert_eq!(counters.streams_completed, 1);

        // the handle is rearmed and usable again
        let again = decompressor.decompress_complete(&compressed, Some(input.len() * 2)).unwrap();
        assert_eq!(again.output, input);
        assert_eq!(decompressor.counters().retries, counters.retries);
    }

    #[test]
    fn complete_into_keeps_existing_prefix() {
        let compressed = compress(&text(40_000), 6).unwrap();
        let mut out = b"head:".to_vec();
        let processed = Decompressor::new()
            .unwrap()
            .decompress_complete_into(&compressed, Some(16), &mut out)
            .unwrap();
        assert_eq!(&out[..5], b"head:");
        assert_eq!(processed.produced, 40_000);
        assert_eq!(&out[5..], &text(40_000)[..]);
    }

    #[test]
    fn empty_input_is_a_usage_error() {
        let mut decompressor = Decompressor::new().unwrap();
        let err = decompressor.decompress_chunk(&[]).unwrap_err();
        assert!(matches!(err, CompressionError::NoInput));
        assert!(err.is_usage());
        assert!(matches!(decompressor.decompress(&[]), Err(CompressionError::NoInput)));
    }

    #[test]
    fn corrupt_data_reports_malformed() {
        let mut decompressor = Decompressor::new().unwrap();
        let err = decompressor.decompress(b"definitely not a zlib stream").unwrap_err();
        assert!(matches!(
            err,
            CompressionError::Process {
                direction: Direction::Decompress,
                fault: NativeFault::MalformedData
            }
        ));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

        decompressor.reset().unwrap();
        let good = compress(b"recovered", 6).unwrap();
        assert_eq!(decompressor.decompress(&good).unwrap().output, b"recovered");
    }

    #[test]
    fn truncated_stream_in_single_shot() {
        let compressed = compress(&text(10_000), 6).unwrap();
        let mut decompressor = Decompressor::new().unwrap();
        let err = decompressor
            .decompress(&compressed[..compressed.len() - 4])
            .unwrap_err();
        assert!(matches!(
            err,
            CompressionError::Process { fault: NativeFault::Truncated, .. }
        ));
    }

    #[test]
    fn close_twice_is_an_error() {
        let mut decompressor = Decompressor::new().unwrap();
        decompressor.close().unwrap();
        assert!(decompressor.is_closed());
        assert!(matches!(decompressor.close(), Err(CompressionError::Closed)));
        assert!(matches!(decompressor.decompress(b"x"), Err(CompressionError::Closed)));
        assert!(matches!(decompressor.reset(), Err(CompressionError::Closed)));
    }

    #[test]
    fn native_handle_lifecycle() {
        let mut handle = NativeHandle::inflate(15).unwrap();
        assert_eq!(handle.direction(), Direction::Decompress);
        handle.reset().unwrap();
        handle.close().unwrap();
        assert!(handle.is_closed());
        assert!(matches!(handle.close(), Err(CompressionError::Closed)));
        assert!(matches!(handle.reset(), Err(CompressionError::Closed)));

        let mut out = Vec::with_capacity(16);
        let err = handle
            .process(b"abc", &mut out, zflate_core::native::FlushMode::Sync)
            .unwrap_err();
        assert!(matches!(err, CompressionError::Closed));
        assert!(out.is_empty());
    }

    #[test]
    fn lifecycle_errors_carry_recovered_output() {
        let reset = CompressionError::Reset {
            fault: NativeFault::OutOfMemory,
            consumed: 5,
            output: Vec::new(),
        }
        .with_output(b"abc".to_vec());
        assert_eq!(reset.recovered_output(), Some(&b"abc"[..]));
        assert!(matches!(reset, CompressionError::Reset { consumed: 5, .. }));
        assert_eq!(reset.into_recovered_output().unwrap(), b"abc");

        let close = CompressionError::Close { fault: NativeFault::InconsistentState, output: b"old".to_vec() }
            .with_output(b"tail".to_vec());
        assert_eq!(close.recovered_output(), Some(&b"tail"[..]));
        assert!(close.to_string().contains("4 bytes recovered"));
        assert_eq!(close.into_recovered_output().unwrap(), b"tail");

        let process = CompressionError::Process {
            direction: Direction::Compress,
            fault: NativeFault::MalformedData,
        }
        .with_output(b"ignored".to_vec());
        assert!(process.recovered_output().is_none());
        assert!(matches!(process, CompressionError::Process { direction: Direction::Compress, .. }));
        assert!(process.into_recovered_output().is_none());
        assert!(CompressionError::NoInput.with_output(b"x".to_vec()).into_recovered_output().is_none());
    }

    #[test]
    fn invalid_window_bits_fail_init() {
        let err = NativeHandle::inflate(99).err().expect("init must fail");
        assert!(matches!(
            err,
            CompressionError::Init { direction: Direction::Decompress, .. }
        ));
    }
}
