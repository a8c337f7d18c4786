//! Block ordering for PVRTC1.

/// Storage index of block (`x`, `y`) in a `blocks_x` x `blocks_y` grid.
///
/// The low bits interleave both coordinates, `y` in the even positions and `x` in the
/// odd ones, for as many bits as the smaller side needs. The remaining high bits of the
/// larger side follow unchanged.
pub(crate) fn morton_index(x: u32, y: u32, blocks_x: u32, blocks_y: u32) -> usize {
    let min = blocks_x.min(blocks_y);
    let mut index = 0usize;
    let mut bit = 1u32;
    let mut shift = 0u32;

    while bit < min {
        if y & bit != 0 {
            index |= 1 << (2 * shift);
        }
        if x & bit != 0 {
            index |= 1 << (2 * shift + 1);
        }
        bit <<= 1;
        shift += 1;
    }

    let rest = ((x | y) >> shift) as usize;
    index | rest << (2 * shift)
}
