use pixpack::{
    emit::{emit, VALUES_PER_LINE},
    pack, pack_raw,
    unpack::unpack_to_vec,
    BitDepth, BitDepthError, PixelGrid, Unpacked,
};

const DEPTHS: [BitDepth; 2] = [BitDepth::One, BitDepth::Two];

/// Deterministic pseudo-random pixels, covering values outside the valid ranges too.
fn pixels(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

#[test]
fn packed_length() {
    for depth in DEPTHS {
        let per_byte = usize::from(depth.pixels_per_byte());
        for len in 0..=70 {
            let packed = pack(&pixels(len, len as u32), depth);
            assert_eq!(packed.len(), (len + per_byte - 1) / per_byte, "{depth}bit, {len} px");
        }
    }
}

#[test]
fn unpack_recovers_mapped_values() {
    for depth in DEPTHS {
        for len in [1, 3, 4, 7, 8, 9, 31, 64, 257] {
            let input = pixels(len, 0xC0FFEE ^ len as u32);
            let packed = pack(&input, depth);

            let mut unpacked = Vec::new();
            assert_eq!(unpack_to_vec(&packed, depth, len, &mut unpacked), len);
            let expected: Vec<u8> = input.iter().map(|&p| depth.map_pixel(p)).collect();
            assert_eq!(unpacked, expected, "{depth}bit, {len} px");

            let padding: Vec<u8> = Unpacked::new(&packed, depth).skip(len).collect();
            assert!(padding.iter().all(|&p| p == 0), "{depth}bit, {len} px");
        }
    }
}

#[test]
fn packing_is_idempotent() {
    let input = pixels(1000, 7);
    for depth in DEPTHS {
        assert_eq!(pack(&input, depth), pack(&input, depth));
    }
}

#[test]
fn empty_grid() {
    for depth in DEPTHS {
        assert_eq!(pack(&[], depth), Vec::<u8>::new());
    }
    let grid = PixelGrid::new(0, 0, &[]).unwrap();
    assert!(grid.pack(BitDepth::One).is_empty());
}

#[test]
fn scenarios() {
    assert_eq!(pack(&[0, 255, 255, 0, 0, 0, 255, 255], BitDepth::One), [0b0110_0011]);
    assert_eq!(pack(&[0, 1, 2, 3], BitDepth::Two), [0b0001_1011]);
    assert_eq!(pack(&[255], BitDepth::One), [0x80]);
}

#[test]
fn invalid_depth() {
    for len in [0, 1, 100] {
        assert_eq!(
            pack_raw(&pixels(len, 3), 3),
            Err(BitDepthError::InvalidBitDepth { depth: 3 })
        );
    }
}

#[test]
fn emitted_icon() {
    assert_eq!(
        emit(&[0x00], "icon", BitDepth::One),
        "// Array length: 1 bytes (1-bit per pixel (black & white), 8 pixels per byte)\n\
         const uint8_t icon_1bit[1] = {\n\
         0x00\n\
         };\n"
    );

    let packed = pack(&[0, 255], BitDepth::One);
    assert_eq!(
        emit(&packed, "icon", BitDepth::One),
        "// Array length: 1 bytes (1-bit per pixel (black & white), 8 pixels per byte)\n\
         const uint8_t icon_1bit[1] = {\n\
         0x40\n\
         };\n"
    );
}

#[test]
fn emitted_structure() {
    for len in [0, 1, 15, 16, 17, 32, 33, 100] {
        let bytes = pixels(len, 11);
        let text = emit(&bytes, "img", BitDepth::Two);
        assert!(text.ends_with("};\n"), "{len} bytes");

        let body = text
            .split_once("] = {\n")
            .and_then(|(_, rest)| rest.strip_suffix("\n};\n"))
            .unwrap();

        let tokens: Vec<&str> = body
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(tokens.len(), len, "{len} bytes");
        for (token, byte) in tokens.iter().zip(&bytes) {
            assert_eq!(*token, format!("0x{byte:02X}"));
        }

        let lines: Vec<&str> = body.lines().filter(|l| !l.is_empty()).collect();
        for line in &lines[..lines.len().saturating_sub(1)] {
            assert_eq!(line.split(',').filter(|t| !t.is_empty()).count(), VALUES_PER_LINE);
        }
    }
}

#[test]
fn grid_to_literal() {
    #[rustfmt::skip]
    let pixels = [
        0, 255, 255, 0,
        255, 0, 0, 255,
        255, 0, 0, 255,
        0, 255, 255, 0,
    ];
    let grid = PixelGrid::new(4, 4, &pixels).unwrap();
    let packed = grid.pack(BitDepth::One);
    assert_eq!(packed, [0b0110_1001, 0b1001_0110]);

    let text = emit(&packed, "ring", BitDepth::One);
    assert!(text.contains("const uint8_t ring_1bit[2] = {\n0x69,0x96\n};\n"));
}
