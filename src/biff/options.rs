/// Options controlling how record streams are decoded and encoded.
///
/// The defaults are what a read-modify-write cycle wants: malformed typed
/// records are errors, and unmodified records keep their original
/// continuation boundaries.
///
/// The struct deserializes from any serde format, so a host application can
/// keep it in its own configuration file. Missing fields take their defaults.
///
/// # Examples
///
/// ```rust
/// use biffstream::biff::CodecOptions;
///
/// // Create with defaults
/// let options = CodecOptions::default();
/// assert!(options.strict);
///
/// // Or customize
/// let options = CodecOptions::new()
///     .with_strict(false)
///     .with_preserve_layout(false)
///     .with_max_continuations(16);
/// assert_eq!(options.max_continuations, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Fail on typed records whose payload does not match their layout.
    ///
    /// When disabled, such records are kept as opaque records instead.
    pub strict: bool,
    /// Re-use the segment boundaries a record was read with when encoding it
    pub preserve_layout: bool,
    /// Largest number of CONTINUE envelopes a single record may be split into
    pub max_continuations: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            strict: true,
            preserve_layout: true,
            max_continuations: u16::MAX as usize,
        }
    }
}

impl CodecOptions {
    /// Create a new `CodecOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether malformed typed records are errors.
    #[inline]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set whether original continuation boundaries are preserved.
    #[inline]
    pub fn with_preserve_layout(mut self, preserve: bool) -> Self {
        self.preserve_layout = preserve;
        self
    }

    /// Set the continuation limit used by the encoder.
    #[inline]
    pub fn with_max_continuations(mut self, max: usize) -> Self {
        self.max_continuations = max;
        self
    }
}
