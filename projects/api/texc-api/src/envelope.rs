//! Applying and undoing the compression envelope of a mip level.

use crate::error::TexcError;
use crate::mip::Envelope;
use texc_common::{CompressionType, EnvelopeCodec, PixelFormat, PlaneLayout};
use texc_webp::WebPEnvelope;
use tracing::debug;

/// Wraps the raw bytes of one level, or returns [`None`] for
/// [`CompressionType::Default`].
pub(crate) fn apply<C>(
    codec: &C,
    kind: CompressionType,
    format: PixelFormat,
    width: u32,
    height: u32,
    raw: &[u8],
) -> Result<Option<Envelope>, TexcError>
where
    C: EnvelopeCodec,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    if kind == CompressionType::Default {
        return Ok(None);
    }

    let layout = PlaneLayout::for_level(format, width, height)?;
    let payload = codec
        .encode(kind, &layout, raw)
        .map_err(TexcError::envelope)?;
    debug!(
        ?kind,
        width,
        height,
        uncompressed_size = raw.len(),
        compressed_size = payload.len(),
        "applied envelope"
    );

    Ok(Some(Envelope { kind, payload }))
}

/// Reconstructs the raw bytes of a `width` x `height` level of `format` from the
/// stored bytes produced by a transcode with envelope `kind`.
///
/// The byte-plane layout is derived exactly as during encoding, so the result is the
/// level's raw pixel or block stream, ready for upload.
///
/// # Examples
///
/// ```
/// use texc_api::{decode_envelope, ColorSpace, CompressionLevel, CompressionType, PixelFormat, Texture};
///
/// let pixels = vec![64u8; 8 * 8 * 4];
/// let mut texture = Texture::new(8, 8, PixelFormat::R8G8B8A8, ColorSpace::Linear, &pixels).unwrap();
/// texture
///     .transcode(PixelFormat::R8G8B8A8, ColorSpace::Linear, CompressionLevel::Fast, CompressionType::WebP)
///     .unwrap();
///
/// let stored = texture.mip_data(0).unwrap();
/// let raw = decode_envelope(PixelFormat::R8G8B8A8, 8, 8, CompressionType::WebP, stored).unwrap();
/// assert_eq!(raw, pixels);
/// ```
pub fn decode_envelope(
    format: PixelFormat,
    width: u32,
    height: u32,
    kind: CompressionType,
    data: &[u8],
) -> Result<Vec<u8>, TexcError> {
    decode_envelope_with(&WebPEnvelope::new(), format, width, height, kind, data)
}

/// [`decode_envelope`] with a caller-supplied codec.
pub fn decode_envelope_with<C>(
    codec: &C,
    format: PixelFormat,
    width: u32,
    height: u32,
    kind: CompressionType,
    data: &[u8],
) -> Result<Vec<u8>, TexcError>
where
    C: EnvelopeCodec,
    C::Error: std::error::Error + Send + Sync + 'static,
{
    let layout = PlaneLayout::for_level(format, width, height)?;
    let mut output = vec![0u8; layout.len()];
    codec
        .decode(kind, &layout, data, &mut output)
        .map_err(TexcError::envelope)?;
    Ok(output)
}
