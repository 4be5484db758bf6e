//! Tests for edge fingerprint sampling, hashing and compatibility

#[cfg(test)]
mod tests {
    use tilecollapse::WfcError;
    use tilecollapse::analysis::signature::{EdgeSignature, fingerprint};
    use tilecollapse::spatial::grid::Direction;
    use tilecollapse::spatial::tiles::PixelBlock;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    // Known FNV-1a vectors pin the hash across toolchains
    // Verified by swapping the xor and multiply steps
    #[test]
    fn test_fingerprint_known_values() {
        assert_eq!(fingerprint(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fingerprint("a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fingerprint("foobar"), 0x8594_4171_f739_67e8);
    }

    // Identical pixels give identical signatures
    #[test]
    fn test_signature_deterministic() {
        let block = PixelBlock::from_fn(8, 8, |x, y| [x as u8 * 10, y as u8 * 10, 7, 255]);
        let first = EdgeSignature::from_pixels(&block, 3).expect("valid block");
        let second = EdgeSignature::from_pixels(&block, 3).expect("valid block");
        assert_eq!(first, second);
    }

    // A solid block looks the same from every side
    #[test]
    fn test_solid_block_symmetric() {
        let signature = EdgeSignature::from_pixels(&PixelBlock::solid(4, 4, RED), 3)
            .expect("valid block");
        assert_eq!(signature.top, signature.bottom);
        assert_eq!(signature.left, signature.right);
        assert_eq!(signature.top, signature.left);
        for direction in Direction::ALL {
            assert!(signature.compatible(&signature, direction));
        }
    }

    // Changing a sampled pixel changes only the edges that sample it
    // Verified by sampling the bottom edge from row 0
    #[test]
    fn test_sampled_pixel_changes_component() {
        let base = PixelBlock::solid(5, 5, RED);
        // Bottom edge samples x = 0, 2, 4 on row 4
        let changed = PixelBlock::from_fn(5, 5, |x, y| if (x, y) == (2, 4) { GREEN } else { RED });

        let before = EdgeSignature::from_pixels(&base, 3).expect("valid block");
        let after = EdgeSignature::from_pixels(&changed, 3).expect("valid block");

        assert_ne!(before.bottom, after.bottom);
        assert_eq!(before.top, after.top);
        assert_eq!(before.left, after.left);
        assert_eq!(before.right, after.right);
    }

    // Pixels between sample points do not affect the signature
    #[test]
    fn test_unsampled_pixel_ignored() {
        let base = PixelBlock::solid(5, 5, RED);
        let changed = PixelBlock::from_fn(5, 5, |x, y| if (x, y) == (1, 0) { GREEN } else { RED });

        let before = EdgeSignature::from_pixels(&base, 3).expect("valid block");
        let after = EdgeSignature::from_pixels(&changed, 3).expect("valid block");
        assert_eq!(before, after);
    }

    // Compatibility compares the facing components
    // Verified by comparing edge(direction) on both sides
    #[test]
    fn test_compatibility_uses_facing_edges() {
        let upper = EdgeSignature {
            top: 1,
            right: 2,
            bottom: 3,
            left: 4,
        };
        let lower = EdgeSignature {
            top: 3,
            right: 5,
            bottom: 6,
            left: 7,
        };
        assert!(upper.compatible(&lower, Direction::Down));
        assert!(lower.compatible(&upper, Direction::Up));
        assert!(!upper.compatible(&lower, Direction::Up));
        assert_eq!(upper.edge(Direction::Left), 4);
    }

    #[test]
    fn test_invalid_inputs() {
        let block = PixelBlock::solid(4, 4, RED);
        assert!(matches!(
            EdgeSignature::from_pixels(&block, 1),
            Err(WfcError::InvalidParameter { .. })
        ));
        assert!(matches!(
            EdgeSignature::from_pixels(&PixelBlock::solid(0, 4, RED), 3),
            Err(WfcError::InvalidSourceData { .. })
        ));
    }

    #[test]
    fn test_edge_strings_hash_each_side() {
        let signature = EdgeSignature::from_edge_strings("12", "34", "12", "56");
        assert_eq!(signature.top, fingerprint("12"));
        assert_eq!(signature.top, signature.bottom);
        assert_ne!(signature.right, signature.left);
    }
}
