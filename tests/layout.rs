mod tests {
    use led_matrix_composer::{Error, Origin, PanelGeometry, PixelMap};

    fn grid(panel: u16, grid_width: u16, grid_height: u16, zigzag: bool, origin: Origin) -> PanelGeometry {
        PanelGeometry {
            panel_width: panel,
            panel_height: panel,
            grid_width,
            grid_height,
            zigzag,
            origin,
        }
    }

    #[test]
    fn test_row_major_single_panel() {
        let map = PixelMap::build(grid(4, 1, 1, false, Origin::TopLeft), 1).unwrap();
        assert_eq!(map.len(), 16);
        assert_eq!(map.slots_per_channel(), 16);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(map.locate(x, y), Some((0, y * 4 + x)));
            }
        }
        assert_eq!(map.locate(4, 0), None);
    }

    #[test]
    fn test_zigzag_reverses_odd_rows_per_panel() {
        let map = PixelMap::build(grid(8, 2, 1, true, Origin::TopLeft), 1).unwrap();
        for y in 0..8 {
            for x in 0..16 {
                let panel = x / 8;
                let lx = x % 8;
                let lx = if y % 2 == 1 { 7 - lx } else { lx };
                assert_eq!(map.locate(x, y), Some((0, panel * 64 + y * 8 + lx)), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_origin_flips() {
        let map = PixelMap::build(grid(4, 1, 1, false, Origin::BottomRight), 1).unwrap();
        assert_eq!(map.locate(3, 3), Some((0, 0)));
        assert_eq!(map.locate(0, 0), Some((0, 15)));

        let map = PixelMap::build(grid(4, 1, 1, false, Origin::TopRight), 1).unwrap();
        assert_eq!(map.locate(3, 0), Some((0, 0)));

        let map = PixelMap::build(grid(4, 1, 1, false, Origin::BottomLeft), 1).unwrap();
        assert_eq!(map.locate(0, 3), Some((0, 0)));
    }

    #[test]
    fn test_zigzag_applies_after_origin_flip() {
        let map = PixelMap::build(grid(4, 1, 1, true, Origin::BottomLeft), 1).unwrap();
        // Bottom row is local row 0, the one above it runs backwards
        assert_eq!(map.locate(0, 3), Some((0, 0)));
        assert_eq!(map.locate(3, 2), Some((0, 4)));
        assert_eq!(map.locate(0, 2), Some((0, 7)));
    }

    #[test]
    fn test_panels_split_across_channels() {
        let map = PixelMap::build(grid(4, 2, 2, false, Origin::TopLeft), 2).unwrap();
        assert_eq!(map.channels(), 2);
        assert_eq!(map.slots_per_channel(), 32);
        // Panels 0 and 1 on channel 0, panels 2 and 3 on channel 1
        assert_eq!(map.locate(0, 0), Some((0, 0)));
        assert_eq!(map.locate(4, 0), Some((0, 16)));
        assert_eq!(map.locate(0, 4), Some((1, 0)));
        assert_eq!(map.locate(7, 7), Some((1, 31)));
    }

    #[test]
    fn test_uneven_split_rounds_up() {
        let geometry = grid(2, 3, 1, false, Origin::TopLeft);
        assert_eq!(geometry.panels_per_channel(2), 2);
        let map = PixelMap::build(geometry, 2).unwrap();
        assert_eq!(map.slots_per_channel(), 8);
        assert_eq!(map.locate(4, 0), Some((1, 0)));
    }

    #[test]
    fn test_every_slot_used_once() {
        let map = PixelMap::build(grid(4, 3, 2, true, Origin::BottomRight), 3).unwrap();
        let mut seen = vec![false; map.channels() * map.slots_per_channel()];
        for i in 0..map.len() {
            let (ch, slot) = map.get(i).unwrap();
            let idx = ch * map.slots_per_channel() + slot;
            assert!(!seen[idx], "slot reused at pixel {i}");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_invalid_geometry() {
        let geometry = grid(0, 1, 1, false, Origin::TopLeft);
        assert_eq!(PixelMap::build(geometry, 1).unwrap_err(), Error::InvalidGeometry);

        let geometry = grid(4, 2, 1, false, Origin::TopLeft);
        assert_eq!(
            PixelMap::build(geometry, 3).unwrap_err(),
            Error::ChannelCountMismatch {
                channels: 3,
                panels: 2
            }
        );
        assert_eq!(
            PixelMap::build(geometry, 0).unwrap_err(),
            Error::ChannelCountMismatch {
                channels: 0,
                panels: 2
            }
        );
    }

    #[test]
    fn test_origin_names() {
        assert_eq!(Origin::parse_from_str("top_left"), Ok(Origin::TopLeft));
        assert_eq!(Origin::parse_from_str("bottom_right"), Ok(Origin::BottomRight));
        assert_eq!(Origin::parse_from_str("middle"), Err(Error::InvalidOrigin));
        for origin in [
            Origin::TopLeft,
            Origin::TopRight,
            Origin::BottomLeft,
            Origin::BottomRight,
        ] {
            assert_eq!(Origin::parse_from_str(origin.as_str()), Ok(origin));
        }
    }
}
