mod common;

mod tests {
    use led_matrix_composer::color::pack_grb;
    use led_matrix_composer::{Error, FrameStatus, Matrix, MatrixConfig, Origin, PanelGeometry, Rgb};

    use crate::common::{bench, dense_font, factory, last_frame, matrix, matrix_with, single_panel};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };

    #[test]
    fn test_fill_reaches_transmit_buffer() {
        let bench = bench();
        let mut m = matrix(&bench, 0.5);
        m.fill(RED);
        assert_eq!(m.update(true), FrameStatus::Presented);

        let tx = m.tx_buffer(0).unwrap();
        assert_eq!(tx.len(), 256);
        assert!(tx.iter().all(|&w| w == pack_grb(128, 0, 0)));
        assert_eq!(last_frame(&bench, 0), tx);
        assert!(!m.framebuffer().is_dirty());
    }

    #[test]
    fn test_busy_update_is_dropped() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        bench.borrow_mut().busy = true;

        m.fill(RED);
        assert_eq!(m.update(false), FrameStatus::Dropped);
        assert!(m.tx_buffer(0).unwrap().iter().all(|&w| w == 0));
        assert!(bench.borrow().frames.is_empty());
        assert!(m.framebuffer().is_dirty());

        bench.borrow_mut().busy = false;
        assert_eq!(m.update(false), FrameStatus::Presented);
        assert!(m.tx_buffer(0).unwrap().iter().all(|&w| w == pack_grb(255, 0, 0)));
        assert_eq!(bench.borrow().frames.len(), 1);
    }

    #[test]
    fn test_clean_update_resends_previous_buffer() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        m.set_pixel(0, 0, GREEN).unwrap();
        m.update(true);
        m.update(true);
        let frames = &bench.borrow().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1].1[0], pack_grb(0, 255, 0));
    }

    #[test]
    fn test_clear_blanks_display() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        m.fill(RED);
        m.update(true);
        assert_eq!(m.clear(), FrameStatus::Presented);
        assert!(last_frame(&bench, 0).iter().all(|&w| w == 0));
    }

    #[test]
    fn test_zigzag_panels_scatter() {
        let bench = bench();
        let geometry = PanelGeometry {
            panel_width: 8,
            panel_height: 8,
            grid_width: 2,
            grid_height: 1,
            zigzag: true,
            origin: Origin::TopLeft,
        };
        let mut m = matrix_with(&bench, geometry, &[(2, 0)], 1.0);
        m.set_pixel(0, 1, RED).unwrap();
        m.set_pixel(8, 0, GREEN).unwrap();
        m.update(true);

        let tx = m.tx_buffer(0).unwrap();
        assert_eq!(tx.len(), 128);
        // Odd row runs backwards: (0, 1) is the last LED of that row
        assert_eq!(tx[15], pack_grb(255, 0, 0));
        assert_eq!(tx[64], pack_grb(0, 255, 0));
        assert_eq!(tx.iter().filter(|&&w| w != 0).count(), 2);
    }

    #[test]
    fn test_two_channels() {
        let bench = bench();
        let geometry = PanelGeometry {
            grid_width: 2,
            ..single_panel(4, 4)
        };
        let mut m = matrix_with(&bench, geometry, &[(2, 0), (3, 5)], 1.0);
        assert_eq!(m.output().channel_count(), 2);
        assert_eq!(bench.borrow().claimed, vec![(2, 0), (3, 5)]);

        m.set_pixel(4, 0, RED).unwrap();
        m.update(true);
        assert_eq!(m.tx_buffer(0).unwrap().len(), 16);
        assert!(m.tx_buffer(0).unwrap().iter().all(|&w| w == 0));
        assert_eq!(m.tx_buffer(1).unwrap()[0], pack_grb(255, 0, 0));
        // Both engines triggered together
        assert_eq!(last_frame(&bench, 5)[0], pack_grb(255, 0, 0));
        assert_eq!(bench.borrow().frames.len(), 2);
    }

    fn config(outputs: &[(u8, u8)]) -> MatrixConfig<'_> {
        MatrixConfig {
            outputs,
            geometry: single_panel(8, 8),
            brightness: 1.0,
            font: dense_font(),
        }
    }

    #[test]
    fn test_construction_errors() {
        let bench = bench();
        let mut ok = factory(&bench, None);

        let err = Matrix::new(&mut ok, &config(&[(2, 12)])).unwrap_err();
        assert_eq!(err, Error::InvalidChannelId(12));
        assert!(err.is_configuration());

        let err = Matrix::new(&mut ok, &config(&[])).unwrap_err();
        assert_eq!(
            err,
            Error::ChannelCountMismatch {
                channels: 0,
                panels: 1
            }
        );

        let geometry = PanelGeometry {
            grid_width: 2,
            ..single_panel(8, 8)
        };
        let dup = MatrixConfig {
            geometry,
            ..config(&[(2, 1), (3, 1)])
        };
        assert_eq!(Matrix::new(&mut ok, &dup).unwrap_err(), Error::DuplicateChannel(1));
        assert!(bench.borrow().claimed.is_empty());
    }

    #[test]
    fn test_failed_claim_releases_earlier_channels() {
        let bench = bench();
        let mut failing = factory(&bench, Some(3));
        let geometry = PanelGeometry {
            grid_width: 2,
            ..single_panel(8, 8)
        };
        let config = MatrixConfig {
            outputs: &[(2, 0), (3, 1)],
            geometry,
            brightness: 1.0,
            font: dense_font(),
        };
        let err = Matrix::new(&mut failing, &config).unwrap_err();
        assert_eq!(err, Error::ChannelInit { pin: 3, channel: 1 });
        assert_eq!(bench.borrow().claimed, vec![(2, 0)]);
        assert_eq!(bench.borrow().released, 1);
    }

    #[test]
    fn test_deinit_blanks_and_releases_once() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        m.fill(RED);
        m.update(true);
        m.deinit();
        assert!(last_frame(&bench, 0).iter().all(|&w| w == 0));
        assert_eq!(bench.borrow().released, 1);
    }

    #[test]
    fn test_drop_releases() {
        let bench = bench();
        {
            let _m = matrix(&bench, 1.0);
        }
        assert_eq!(bench.borrow().released, 1);
    }

    #[test]
    fn test_brightness_applies_to_new_draws() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        m.set_pixel(0, 0, RED).unwrap();
        m.set_brightness(0.0);
        assert_eq!(m.brightness(), 0.0);
        m.set_pixel(1, 0, RED).unwrap();
        m.update(true);
        let tx = last_frame(&bench, 0);
        assert_eq!(tx[0], pack_grb(255, 0, 0));
        assert_eq!(tx[1], 0);
    }
}
