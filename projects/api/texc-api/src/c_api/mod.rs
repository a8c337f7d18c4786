//! # C API (FFI)
//!
//! *Only available with the `c-exports` feature.*
//!
//! Textures are handed out as opaque [`TexcTexture`](texture::TexcTexture) pointers.
//! Every function accepts a null handle and reports failure for it. Mutating functions
//! return `true` on success and `false` on failure, in which case the texture is left
//! unchanged and the reason is logged through `tracing` at warn level.
//!
//! ## Example
//!
//! ```c
//! uint8_t pixels[2 * 2 * 4] = { /* ... */ };
//! TexcTexture* texture = texc_create(2, 2, TEXC_PIXEL_FORMAT_R8G8B8A8, TEXC_COLOR_SPACE_LINEAR,
//!                                    pixels, sizeof(pixels));
//! if (texture == NULL) {
//!     return;
//! }
//!
//! texc_gen_mip_maps(texture);
//! texc_transcode(texture, TEXC_PIXEL_FORMAT_RGB_ETC1, TEXC_COLOR_SPACE_LINEAR,
//!                TEXC_COMPRESSION_LEVEL_NORMAL, TEXC_COMPRESSION_TYPE_WEBP);
//!
//! size_t size = texc_get_data_size_compressed(texture, 0);
//! uint8_t* stored = malloc(size);
//! texc_get_data(texture, stored, size);
//!
//! texc_destroy(texture);
//! ```

pub mod texture;
