//! Handle based texture functions.

use crate::error::TexcError;
use crate::texture::Texture;
use crate::transform::FlipAxis;
use core::{ptr, slice};
use texc_common::{ColorSpace, CompressionLevel, CompressionType, PixelFormat};
use tracing::warn;

/// Opaque texture handle.
///
/// - Created with [`texc_create()`]
/// - Freed with [`texc_destroy()`]
///
/// A handle must not be used from several threads at once. Distinct handles are
/// independent.
#[repr(C)]
pub struct TexcTexture {
    // Private field to ensure it's opaque
    _private: [u8; 0],
}

/// C-compatible texture header.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexcHeader {
    /// Width of level 0.
    pub width: u32,
    /// Height of level 0.
    pub height: u32,
    /// 8-byte format tag.
    pub pixel_format: [u8; 8],
}

/// # Safety
/// `texture` must be null or a live pointer returned by [`texc_create()`].
unsafe fn texture_ref<'a>(texture: *const TexcTexture) -> Option<&'a Texture> {
    unsafe { (texture as *const Texture).as_ref() }
}

/// # Safety
/// `texture` must be null or a live pointer returned by [`texc_create()`].
unsafe fn texture_mut<'a>(texture: *mut TexcTexture) -> Option<&'a mut Texture> {
    unsafe { (texture as *mut Texture).as_mut() }
}

/// Maps the result of a mutating call onto the boolean C contract.
fn report(operation: &str, result: Result<(), TexcError>) -> bool {
    match result {
        Ok(()) => true,
        Err(error) => {
            warn!(operation, %error, "texture operation failed");
            false
        }
    }
}

/// Runs `operation` on the texture behind `texture`, reporting `false` for null.
///
/// # Safety
/// `texture` must be null or a live pointer returned by [`texc_create()`].
unsafe fn mutate(
    texture: *mut TexcTexture,
    operation: &str,
    f: impl FnOnce(&mut Texture) -> Result<(), TexcError>,
) -> bool {
    match unsafe { texture_mut(texture) } {
        Some(texture) => report(operation, f(texture)),
        None => {
            warn!(operation, "null texture handle");
            false
        }
    }
}

/// Create a texture from a copy of `data`.
///
/// # Safety
/// - `data` must be valid for reads of `data_len` bytes
///
/// # Returns
/// A new texture to be freed with [`texc_destroy()`], or null if the dimensions are
/// invalid or `data_len` does not match `width`, `height` and `pixel_format`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_create(
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    color_space: ColorSpace,
    data: *const u8,
    data_len: usize,
) -> *mut TexcTexture {
    if data.is_null() {
        warn!("texc_create called with null data");
        return ptr::null_mut();
    }

    let data = unsafe { slice::from_raw_parts(data, data_len) };
    match Texture::new(width, height, pixel_format, color_space, data) {
        Ok(texture) => Box::into_raw(Box::new(texture)) as *mut TexcTexture,
        Err(error) => {
            warn!(%error, "texc_create failed");
            ptr::null_mut()
        }
    }
}

/// Free a texture and all of its levels.
///
/// # Safety
/// - `texture` must be null or a pointer returned by [`texc_create()`]
/// - `texture` must not have been freed already
/// - After calling this function, `texture` becomes invalid
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_destroy(texture: *mut TexcTexture) {
    if !texture.is_null() {
        unsafe {
            drop(Box::from_raw(texture as *mut Texture));
        }
    }
}

/// Get the texture's dimensions and format tag.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
///
/// # Returns
/// The header, or an all-zero header for a null handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_get_header(texture: *const TexcTexture) -> TexcHeader {
    match unsafe { texture_ref(texture) } {
        Some(texture) => {
            let header = texture.header();
            TexcHeader {
                width: header.width,
                height: header.height,
                pixel_format: header.pixel_format,
            }
        }
        None => TexcHeader::default(),
    }
}

/// Copy the stored bytes of level 0 into `output`.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
/// - `output` must be valid for writes of `output_len` bytes
///
/// # Returns
/// Number of bytes written. 0 if the handle or buffer is null, or if `output_len` is
/// smaller than [`texc_get_data_size_compressed()`] for level 0.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_get_data(
    texture: *const TexcTexture,
    output: *mut u8,
    output_len: usize,
) -> usize {
    let Some(texture) = (unsafe { texture_ref(texture) }) else {
        return 0;
    };
    if output.is_null() {
        return 0;
    }

    let output = unsafe { slice::from_raw_parts_mut(output, output_len) };
    texture.get_data(output).unwrap_or_else(|error| {
        warn!(%error, "texc_get_data failed");
        0
    })
}

/// Size of the raw bytes of level `mip_index`.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
///
/// # Returns
/// The size, or 0 for a null handle or a missing level.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_get_data_size_uncompressed(
    texture: *const TexcTexture,
    mip_index: u32,
) -> usize {
    unsafe { texture_ref(texture) }
        .and_then(|t| t.data_size_uncompressed(mip_index as usize).ok())
        .unwrap_or(0)
}

/// Size of the stored bytes of level `mip_index`.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
///
/// # Returns
/// The size, or 0 for a null handle or a missing level.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_get_data_size_compressed(
    texture: *const TexcTexture,
    mip_index: u32,
) -> usize {
    unsafe { texture_ref(texture) }
        .and_then(|t| t.data_size_compressed(mip_index as usize).ok())
        .unwrap_or(0)
}

/// Number of mip levels, 0 for a null handle.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_get_mip_count(texture: *const TexcTexture) -> u32 {
    unsafe { texture_ref(texture) }.map_or(0, |t| t.mip_count() as u32)
}

/// Resample level 0 to `width` x `height`, dropping the other levels.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_resize(texture: *mut TexcTexture, width: u32, height: u32) -> bool {
    unsafe { mutate(texture, "resize", |t| t.resize(width, height)) }
}

/// Premultiply colour by alpha on every level.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_pre_multiply_alpha(texture: *mut TexcTexture) -> bool {
    unsafe { mutate(texture, "pre_multiply_alpha", Texture::pre_multiply_alpha) }
}

/// Rebuild the mip chain from level 0.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_gen_mip_maps(texture: *mut TexcTexture) -> bool {
    unsafe { mutate(texture, "gen_mip_maps", Texture::gen_mip_maps) }
}

/// Mirror every level along `axis`.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_flip(texture: *mut TexcTexture, axis: FlipAxis) -> bool {
    unsafe { mutate(texture, "flip", |t| t.flip(axis)) }
}

/// Convert every level to `pixel_format` and apply the `compression_type` envelope.
///
/// # Safety
/// - `texture` must be null or a live pointer returned by [`texc_create()`]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_transcode(
    texture: *mut TexcTexture,
    pixel_format: PixelFormat,
    color_space: ColorSpace,
    compression_level: CompressionLevel,
    compression_type: CompressionType,
) -> bool {
    unsafe {
        mutate(texture, "transcode", |t| {
            t.transcode(pixel_format, color_space, compression_level, compression_type)
        })
    }
}

/// Undo the envelope of one level's stored bytes.
///
/// # Safety
/// - `data` must be valid for reads of `data_len` bytes
/// - `output` must be valid for writes of `output_len` bytes
///
/// # Returns
/// Number of raw bytes written to `output`, or 0 if decoding failed or `output_len` is
/// too small.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn texc_decode_envelope(
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
    compression_type: CompressionType,
    data: *const u8,
    data_len: usize,
    output: *mut u8,
    output_len: usize,
) -> usize {
    if data.is_null() || output.is_null() {
        return 0;
    }

    let data = unsafe { slice::from_raw_parts(data, data_len) };
    let raw = match crate::decode_envelope(pixel_format, width, height, compression_type, data)
    {
        Ok(raw) => raw,
        Err(error) => {
            warn!(%error, "texc_decode_envelope failed");
            return 0;
        }
    };

    if output_len < raw.len() {
        warn!(
            needed = raw.len(),
            actual = output_len,
            "texc_decode_envelope output too small"
        );
        return 0;
    }

    let output = unsafe { slice::from_raw_parts_mut(output, raw.len()) };
    output.copy_from_slice(&raw);
    raw.len()
}
