#[cfg(test)]
mod tests {
    use zflate_core::{
        compression::{Compressor, CodecConfig, Decompressor},
        telemetry::CodecCounters,
    };

    fn make_counters() -> CodecCounters {
        CodecCounters {
            native_calls: 3,
            bytes_in: 400,
            bytes_out: 100,
            streams_completed: 1,
            resets: 2,
            retries: 1,
        }
    }

    #[test]
    fn default_ratio_is_zero() {
        let counters = CodecCounters::default();
        assert_eq!(counters.ratio(), 0.0);
        assert_eq!(make_counters().ratio(), 0.25);
    }

    #[test]
    fn merge_and_add_assign_agree() {
        let mut merged = make_counters();
        merged.merge(&make_counters());

        let mut added = make_counters();
        added += make_counters();

        assert_eq!(merged, added);
        assert_eq!(merged.native_calls, 6);
        assert_eq!(merged.bytes_in, 800);
        assert_eq!(merged.retries, 2);
    }

    #[test]
    fn counters_track_a_compress_decompress_cycle() {
        let input = vec![42u8; 50_000];

        let mut compressor = Compressor::new(CodecConfig::default()).unwrap();
        let compressed = compressor.compress(&input).unwrap();
        let enc = compressor.counters();
        assert!(enc.native_calls >= 1);
        assert_eq!(enc.bytes_in, input.len() as u64);
        assert_eq!(enc.bytes_out, compressed.len() as u64);
        assert_eq!(enc.streams_completed, 1);
        assert_eq!(enc.resets, 1);
        assert!(enc.ratio() < 0.1);

        let mut decompressor = Decompressor::new().unwrap();
        decompressor.decompress(&compressed).unwrap();
        let dec = decompressor.counters();
        assert_eq!(dec.bytes_in, compressed.len() as u64);
        assert_eq!(dec.bytes_out, input.len() as u64);
        assert_eq!(dec.streams_completed, 1);
    }

    #[test]
    fn counters_serialize_as_json() {
        let counters = make_counters();
        let json = serde_json::to_string(&counters).unwrap();
        assert!(json.contains("\"native_calls\":3"));
        assert!(json.contains("\"retries\":1"));

        let back: CodecCounters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counters);
    }
}
