//! Property tests for message framing.
//!
//! Message bodies arrive already delimited, but a hostile or buggy server can
//! still cut them short or pad them with junk. These tests check that parsing
//! any prefix of a valid body fails cleanly and never panics.

#[cfg(test)]
mod tests {
    use super::super::server::*;
    use super::super::types::*;
    use super::super::MessageError;
    use crate::io::PayloadReader;
    use proptest::prelude::*;

    // Property test strategies
    fn arbitrary_pixel_format() -> impl Strategy<Value = PixelFormat> {
        (
            prop::sample::select(vec![8u8, 16, 32]),
            prop::sample::select(vec![8u8, 16, 24]),
            prop::bool::ANY,
            prop::bool::ANY,
            prop::sample::select(vec![15u16, 31, 63, 127, 255]),
        )
            .prop_map(|(bpp, depth, big_endian, true_color, max)| PixelFormat {
                bits_per_pixel: bpp,
                depth,
                big_endian,
                true_color,
                red_max: max,
                green_max: max,
                blue_max: max,
                red_shift: 0,
                green_shift: bpp / 3,
                blue_shift: 2 * bpp / 3,
            })
    }

    fn arbitrary_color_map() -> impl Strategy<Value = SetColorMapEntries> {
        (
            any::<u16>(),
            prop::collection::vec((any::<u16>(), any::<u16>(), any::<u16>()), 0..20),
        )
            .prop_map(|(first_color, colors)| SetColorMapEntries {
                first_color,
                colors: colors
                    .into_iter()
                    .map(|(red, green, blue)| ColorMapEntry { red, green, blue })
                    .collect(),
            })
    }

    proptest! {
        /// Every strict prefix of a PixelFormat body is a truncation error.
        #[test]
        fn test_pixel_format_prefix_truncated(
            pf in arbitrary_pixel_format(),
            cut in 0usize..PixelFormat::WIRE_LEN
        ) {
            let bytes = pf.to_bytes();
            let err = PixelFormat::read_from(&mut PayloadReader::new(&bytes[..cut])).unwrap_err();
            prop_assert!(matches!(err, MessageError::Truncated(_)));

            let parsed = PixelFormat::read_from(&mut PayloadReader::new(&bytes)).unwrap();
            prop_assert_eq!(pf, parsed);
        }

        /// SetColorMapEntries parses in full, and any cut is reported, not panicked on.
        #[test]
        fn test_colormap_prefix_truncated(
            msg in arbitrary_color_map(),
            cut in 0usize..200
        ) {
            let bytes = msg.to_bytes();
            let mut reader = PayloadReader::new(&bytes);
            prop_assert_eq!(&SetColorMapEntries::read_from(&mut reader).unwrap(), &msg);
            prop_assert!(reader.is_empty());

            if cut < bytes.len() {
                let err = SetColorMapEntries::read_from(&mut PayloadReader::new(&bytes[..cut]))
                    .unwrap_err();
                prop_assert!(matches!(err, MessageError::Truncated(_)));
            }
        }

        /// Arbitrary bytes never make the reader panic; consumed + remaining is conserved.
        #[test]
        fn test_reader_never_panics(
            data in prop::collection::vec(any::<u8>(), 0..64),
            ops in prop::collection::vec(0u8..4, 0..32)
        ) {
            let mut reader = PayloadReader::new(&data);
            for op in ops {
                let _ = match op {
                    0 => reader.read_u8().map(|_| ()),
                    1 => reader.read_u16().map(|_| ()),
                    2 => reader.read_u32().map(|_| ()),
                    _ => reader.skip(3),
                };
                prop_assert_eq!(reader.consumed() + reader.remaining(), data.len());
            }
        }
    }
}
