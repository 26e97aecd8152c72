/// Decoder tunables.
///
/// The historical defaults reproduce the reference implementation's fixed
/// constants exactly, so `DecoderConfig::default()` behaves identically to
/// a caller that never thinks about configuration at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Hard ceiling on the number of samples a single parse will emit.
    /// Matches the reference's static output buffer size.
    pub max_samples: usize,
    /// When `false`, the finish-line detector is never consulted even if
    /// the header carries a well-formed finish line; every sample is
    /// reported as lap 1. Defaults to `true`.
    pub lap_detection: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_samples: 72_000,
            lap_detection: true,
        }
    }
}
