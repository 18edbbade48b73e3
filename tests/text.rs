mod common;

mod tests {
    use led_matrix_composer::{
        BLACK, Foreground, Matrix, Rgb, Shader, ShaderInput, TextStyle, WHITE,
    };

    use crate::common::{MockChannel, bench, matrix};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    #[test]
    fn test_advance_and_background_block() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let advance = m.draw_text("A", 0, 0, &style, &Foreground::Solid(WHITE), Some(BLUE));
        assert_eq!(advance, 6);

        // Ink starts at the pen: glyph column 1 lands on x = 0
        assert_eq!(m.pixel(1, 0), Ok(WHITE));
        assert_eq!(m.pixel(0, 1), Ok(WHITE));
        assert_eq!(m.pixel(4, 1), Ok(WHITE));
        assert_eq!(m.pixel(0, 0), Ok(BLUE));
        assert_eq!(m.pixel(5, 1), Ok(BLUE));
        assert_eq!(m.pixel(2, 7), Ok(BLUE));
        assert_eq!(m.pixel(6, 1), Ok(BLACK));
        assert_eq!(m.pixel(0, 8), Ok(BLACK));
    }

    #[test]
    fn test_black_background_block() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        m.fill(RED);
        let style = TextStyle::default();
        m.draw_text("A", 0, 0, &style, &Foreground::Solid(WHITE), Some(BLACK));
        for y in 0..8 {
            for x in 0..6 {
                let px = m.pixel(x, y).unwrap();
                assert!(px == WHITE || px == BLACK, "({x}, {y}) = {px:?}");
            }
        }
        assert_eq!(m.pixel(6, 0), Ok(RED));
    }

    #[test]
    fn test_measure() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        assert_eq!(m.measure_text("HI", &style), 10);
        assert_eq!(m.measure_text("H I", &style), 12);
        assert_eq!(m.measure_text("", &style), 0);
        // Missing glyphs fall back to '?'
        assert_eq!(m.measure_text("z", &style), 6);

        let spaced = TextStyle {
            left_margin: 1,
            ..TextStyle::default()
        };
        assert_eq!(m.measure_text("A", &spaced), 7);
        assert_eq!(m.draw_text("HI", 0, 0, &style, &Foreground::default(), None), 10);
    }

    #[test]
    fn test_left_margin_shifts_ink() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle {
            left_margin: 1,
            ..TextStyle::default()
        };
        m.draw_text("H", 0, 0, &style, &Foreground::Solid(RED), None);
        assert_eq!(m.pixel(0, 0), Ok(BLACK));
        assert_eq!(m.pixel(1, 0), Ok(RED));
    }

    #[test]
    fn test_space_gets_no_background() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        m.draw_text(" A", 0, 0, &style, &Foreground::Solid(WHITE), Some(BLUE));
        assert_eq!(m.pixel(0, 0), Ok(BLACK));
        assert_eq!(m.pixel(1, 0), Ok(BLACK));
        assert_eq!(m.pixel(2, 0), Ok(BLUE));
        assert_eq!(m.pixel(2, 1), Ok(WHITE));
    }

    #[test]
    fn test_clipping() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let fg = Foreground::Solid(WHITE);

        assert_eq!(m.draw_text("A", 0, -8, &style, &fg, Some(BLUE)), 6);
        assert_eq!(m.draw_text("A", 16, 0, &style, &fg, Some(BLUE)), 6);
        assert_eq!(m.draw_text("A", 0, 16, &style, &fg, Some(BLUE)), 6);
        assert!(!m.framebuffer().is_dirty());
        assert!(m.framebuffer().words().iter().all(|&w| w == 0));

        m.draw_text("A", -3, 0, &style, &fg, None);
        assert_eq!(m.pixel(1, 1), Ok(WHITE));
        assert_eq!(m.pixel(0, 0), Ok(WHITE));

        m.draw_text("H", 0, 12, &style, &fg, None);
        assert_eq!(m.pixel(0, 15), Ok(WHITE));
    }

    #[test]
    fn test_per_char_colors() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let colors = [RED, GREEN];
        m.draw_text("HIH", 0, 0, &style, &Foreground::PerChar(&colors), None);
        assert_eq!(m.pixel(0, 0), Ok(RED));
        assert_eq!(m.pixel(6, 0), Ok(GREEN));
        // Cycles
        assert_eq!(m.pixel(10, 0), Ok(RED));
    }

    #[test]
    fn test_indexed_colors() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let color_of = |i: usize, ch: char| if i == 0 && ch == 'H' { BLUE } else { RED };
        m.draw_text("HI", 0, 0, &style, &Foreground::Indexed(&color_of), None);
        assert_eq!(m.pixel(0, 0), Ok(BLUE));
        assert_eq!(m.pixel(7, 1), Ok(RED));
    }

    #[test]
    fn test_split_shaders() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();

        let fg = Foreground::from(Shader::split_left_right(RED, GREEN, 1, 2));
        m.draw_text("H", 0, 0, &style, &fg, None);
        assert_eq!(m.pixel(0, 3), Ok(RED));
        assert_eq!(m.pixel(2, 3), Ok(RED));
        assert_eq!(m.pixel(3, 3), Ok(GREEN));
        assert_eq!(m.pixel(4, 3), Ok(GREEN));

        let fg = Foreground::from(Shader::split_top_bottom(RED, GREEN, 1, 2));
        m.draw_text("H", 0, 0, &style, &fg, None);
        assert_eq!(m.pixel(0, 0), Ok(RED));
        assert_eq!(m.pixel(0, 5), Ok(GREEN));
    }

    #[test]
    fn test_checker_shader() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let fg = Foreground::from(Shader::checker(RED, GREEN, 1, 1));
        m.draw_text("H", 0, 0, &style, &fg, None);
        assert_eq!(m.pixel(0, 0), Ok(GREEN));
        assert_eq!(m.pixel(0, 1), Ok(RED));
    }

    #[test]
    fn test_cross_shader() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let fg = Foreground::from(Shader::cross(RED, GREEN, 0));
        m.draw_text("H", 0, 0, &style, &fg, None);
        assert_eq!(m.pixel(0, 3), Ok(GREEN));
        assert_eq!(m.pixel(1, 3), Ok(GREEN));
        assert_eq!(m.pixel(2, 3), Ok(RED));
        assert_eq!(m.pixel(3, 3), Ok(RED));
        assert_eq!(m.pixel(4, 3), Ok(RED));
    }

    #[test]
    fn test_custom_shader() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let shade = |input: ShaderInput| {
            if input.ch == 'I' && input.y == 0 {
                BLUE
            } else {
                RED
            }
        };
        let fg = Foreground::Shader(Shader::Custom(&shade));
        m.draw_text("HI", 0, 0, &style, &fg, None);
        assert_eq!(m.pixel(0, 0), Ok(RED));
        assert_eq!(m.pixel(6, 0), Ok(BLUE));
        assert_eq!(m.pixel(7, 1), Ok(RED));
    }

    #[test]
    fn test_adjacent_glyphs_share_no_columns() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let h = m.draw_text("H", 0, 0, &style, &Foreground::Solid(RED), None);
        let count = |m: &Matrix<MockChannel>, color: Rgb| {
            (0..16)
                .flat_map(|y| (0..16).map(move |x| (x, y)))
                .filter(|&(x, y)| m.pixel(x, y) == Ok(color))
                .count()
        };
        let red = count(&m, RED);
        let i = m.draw_text("I", h, 0, &style, &Foreground::Solid(GREEN), None);
        assert_eq!((h, i), (6, 4));
        assert_eq!(count(&m, RED), red);

        for y in 0..16 {
            for x in 0..16 {
                let px = m.pixel(x, y);
                if px == Ok(RED) {
                    assert!(x < h, "({x}, {y})");
                } else if px == Ok(GREEN) {
                    assert!((h..h + i).contains(&x), "({x}, {y})");
                }
            }
        }

        // Drawing glyph by glyph matches drawing the string
        let mut joined = matrix(&bench, 1.0);
        joined.draw_text("HI", 0, 0, &style, &Foreground::Solid(WHITE), None);
        let mut split = matrix(&bench, 1.0);
        let h = split.draw_text("H", 0, 0, &style, &Foreground::Solid(WHITE), None);
        split.draw_text("I", h, 0, &style, &Foreground::Solid(WHITE), None);
        assert_eq!(joined.framebuffer().words(), split.framebuffer().words());
    }

    #[test]
    fn test_extreme_positions_clip() {
        let bench = bench();
        let mut m = matrix(&bench, 1.0);
        let style = TextStyle::default();
        let fg = Foreground::Solid(WHITE);
        for (x, y) in [
            (i32::MAX - 3, 0),
            (i32::MAX, i32::MAX),
            (i32::MIN, 0),
            (0, i32::MIN),
            (i32::MIN, i32::MIN),
            (-9, i32::MAX - 4),
        ] {
            assert_eq!(m.draw_text("HI", x, y, &style, &fg, Some(BLUE)), 10, "({x}, {y})");
        }
        assert!(!m.framebuffer().is_dirty());
        assert!(m.framebuffer().words().iter().all(|&w| w == 0));

        let spread = TextStyle {
            left_margin: i32::MAX,
            right_margin: i32::MAX,
            ..TextStyle::default()
        };
        assert_eq!(m.measure_text("HI", &spread), i32::MAX);
        assert_eq!(m.draw_text("HI", 0, 0, &spread, &fg, None), i32::MAX);
        assert_eq!(m.draw_text("HI", -5, 0, &spread, &fg, None), i32::MAX);
        assert!(m.framebuffer().words().iter().all(|&w| w == 0));
    }
}
