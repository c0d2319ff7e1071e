use tearsheet::uniforms::{RingLayout, SheetUniforms, FRAMES_IN_FLIGHT};

#[test]
fn stride_is_rounded_to_uniform_alignment() {
    let layout = RingLayout::new(std::mem::size_of::<SheetUniforms>(), 2, FRAMES_IN_FLIGHT);
    assert_eq!(layout.stride(), 256);

    let big = RingLayout::new(300, 2, FRAMES_IN_FLIGHT);
    assert_eq!(big.stride(), 512);

    let exact = RingLayout::new(256, 1, FRAMES_IN_FLIGHT);
    assert_eq!(exact.stride(), 256);
}

#[test]
fn total_size_covers_every_frame_slice() {
    let layout = RingLayout::new(std::mem::size_of::<SheetUniforms>(), 2, 3);
    assert_eq!(layout.total_size(), 256 * 2 * 3);
}

#[test]
fn offsets_cycle_through_three_distinct_slices() {
    let mut layout = RingLayout::new(std::mem::size_of::<SheetUniforms>(), 2, 3);

    let first: Vec<u64> = (0..3).map(|_| layout.next_frame_offset()).collect();
    assert_eq!(first.len(), 3);
    for (i, a) in first.iter().enumerate() {
        for b in &first[i + 1..] {
            assert_ne!(a, b);
        }
        assert_eq!(a % 512, 0);
    }

    // The cycle repeats exactly.
    let second: Vec<u64> = (0..3).map(|_| layout.next_frame_offset()).collect();
    assert_eq!(first, second);
}

#[test]
fn uniform_block_matches_wgsl_size() {
    // mat4 (64) + 12 scalars (48) + vec3 + packed scalar (16) +
    // 10 scalars (40) + tail pad (8) = 176, a 16-byte multiple.
    assert_eq!(std::mem::size_of::<SheetUniforms>(), 176);
    assert_eq!(std::mem::size_of::<SheetUniforms>() % 16, 0);
}
