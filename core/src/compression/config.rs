//! compression/config.rs
//! Codec configuration passed through to zlib, validated up front.

use libz_sys as z;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::{levels, window_bits, DEFAULT_MEM_LEVEL, MAX_MEM_LEVEL, MIN_MEM_LEVEL};
use crate::native::DeflateParams;
use crate::types::CompressionError;

/// Compression level: `0..=9` or one of the sentinels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct CompressionLevel(i32);

impl CompressionLevel {
    pub const NONE: Self = Self(levels::NO_COMPRESSION);
    pub const BEST_SPEED: Self = Self(levels::BEST_SPEED);
    pub const BEST: Self = Self(levels::BEST_COMPRESSION);
    pub const DEFAULT: Self = Self(levels::DEFAULT);
    pub const HUFFMAN_ONLY: Self = Self(levels::HUFFMAN_ONLY);

    pub fn new(level: i32) -> Result<Self, CompressionError> {
        match level {
            levels::DEFAULT | levels::HUFFMAN_ONLY => Ok(Self(level)),
            levels::NO_COMPRESSION..=levels::BEST_COMPRESSION => Ok(Self(level)),
            other => Err(CompressionError::InvalidLevel(other)),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_huffman_only(self) -> bool {
        self.0 == levels::HUFFMAN_ONLY
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for CompressionLevel {
    type Error = CompressionError;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<CompressionLevel> for i32 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

/// Match-finding strategy, numbered as in zlib.
#[repr(i32)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Default = 0,
    /// Favors Huffman coding over string matching; for small, randomly distributed values.
    Filtered = 1,
    /// Entropy coding only, no string matching.
    HuffmanOnly = 2,
    /// Limits match distance to one (run-length encoding).
    Rle = 3,
    /// Disallows dynamic Huffman codes.
    Fixed = 4,
}

impl Strategy {
    pub fn from_raw(raw: i32) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::InvalidStrategy(raw))
    }

    fn as_native(self) -> i32 {
        match self {
            Strategy::Default => z::Z_DEFAULT_STRATEGY,
            Strategy::Filtered => z::Z_FILTERED,
            Strategy::HuffmanOnly => z::Z_HUFFMAN_ONLY,
            Strategy::Rle => z::Z_RLE,
            Strategy::Fixed => z::Z_FIXED,
        }
    }
}

/// Container around the deflate data.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum Format {
    /// RFC 1950 header and Adler-32 trailer.
    #[default]
    Zlib = 0,
    /// Bare RFC 1951 deflate data.
    Raw = 1,
    /// RFC 1952 gzip header and CRC-32 trailer.
    Gzip = 2,
}

impl Format {
    pub fn from_raw(raw: u8) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::InvalidFormat(raw))
    }

    pub(crate) fn window_bits(self) -> i32 {
        match self {
            Format::Zlib => window_bits::ZLIB,
            Format::Raw => window_bits::RAW,
            Format::Gzip => window_bits::GZIP,
        }
    }
}

/// Everything a compressor needs to open its native stream.
///
/// Deserialization goes through the same checks as the builder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCodecConfig")]
pub struct CodecConfig {
    level: CompressionLevel,
    strategy: Strategy,
    format: Format,
    mem_level: i32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            level: CompressionLevel::DEFAULT,
            strategy: Strategy::Default,
            format: Format::Zlib,
            mem_level: DEFAULT_MEM_LEVEL,
        }
    }
}

/// Unchecked wire form of `CodecConfig`.
#[derive(Deserialize)]
struct RawCodecConfig {
    level: CompressionLevel,
    #[serde(default)]
    strategy: Strategy,
    #[serde(default)]
    format: Format,
    #[serde(default = "default_mem_level")]
    mem_level: i32,
}

fn default_mem_level() -> i32 {
    DEFAULT_MEM_LEVEL
}

impl TryFrom<RawCodecConfig> for CodecConfig {
    type Error = CompressionError;

    fn try_from(raw: RawCodecConfig) -> Result<Self, Self::Error> {
        CodecConfig::default()
            .with_level(raw.level)
            .with_strategy(raw.strategy)
            .with_format(raw.format)
            .with_mem_level(raw.mem_level)
    }
}

impl CodecConfig {
    /// Build from raw numbers, rejecting anything zlib would not accept.
    pub fn new(level: i32, strategy: i32) -> Result<Self, CompressionError> {
        Ok(Self {
            level: CompressionLevel::new(level)?,
            strategy: Strategy::from_raw(strategy)?,
            ..Self::default()
        })
    }

    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_mem_level(mut self, mem_level: i32) -> Result<Self, CompressionError> {
        if !(MIN_MEM_LEVEL..=MAX_MEM_LEVEL).contains(&mem_level) {
            return Err(CompressionError::InvalidMemLevel(mem_level));
        }
        self.mem_level = mem_level;
        Ok(self)
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// The strategy zlib will actually run; the Huffman-only level overrides it.
    pub fn strategy(&self) -> Strategy {
        if self.level.is_huffman_only() {
            Strategy::HuffmanOnly
        } else {
            self.strategy
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn mem_level(&self) -> i32 {
        self.mem_level
    }

    pub(crate) fn deflate_params(&self) -> DeflateParams {
        let level = if self.level.is_huffman_only() {
            z::Z_DEFAULT_COMPRESSION
        } else {
            self.level.get()
        };
        DeflateParams {
            level,
            window_bits: self.format.window_bits(),
            mem_level: self.mem_level,
            strategy: self.strategy().as_native(),
        }
    }
}
