use tabletop_ar::types::Frame;

/// Frame filled with a single RGB color.
pub fn solid_frame(width: usize, height: usize, rgb: [u8; 3]) -> Frame {
    let mut data = vec![0u8; width * height * 3];
    for px in data.chunks_exact_mut(3) {
        px.copy_from_slice(&rgb);
    }
    Frame {
        data,
        width,
        height,
        timestamp_ms: 0.0,
    }
}

/// A gray tabletop filling the lower half of the view, with a darker wall
/// above it. The horizontal boundary reads as a table rim, the tabletop as
/// uniform surface.
#[allow(dead_code)]
pub fn tabletop_frame(width: usize, height: usize) -> Frame {
    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        let v: u8 = if y < height / 2 { 60 } else { 170 };
        for x in 0..width {
            let idx = (y * width + x) * 3;
            data[idx] = v;
            data[idx + 1] = v;
            data[idx + 2] = v;
        }
    }
    Frame {
        data,
        width,
        height,
        timestamp_ms: 0.0,
    }
}

/// Per-pixel noise with wildly differing channels: no uniform surface, no
/// chromatic-uniformity bonus.
#[allow(dead_code)]
pub fn noise_frame(width: usize, height: usize) -> Frame {
    let mut data = vec![0u8; width * height * 3];
    // Deterministic pseudo-noise; tests must not depend on an RNG seed.
    let mut state: u32 = 0x9e37_79b9;
    for px in data.chunks_exact_mut(3) {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        px[0] = (state >> 24) as u8;
        px[1] = (state >> 8) as u8;
        px[2] = (state >> 16) as u8 ^ 0xff;
    }
    Frame {
        data,
        width,
        height,
        timestamp_ms: 0.0,
    }
}
