use crate::Error;
use crate::color::Rgb;

/// Create an RGB color from a packed `0xRRGGBB` value
///
/// Values above `0xFFFFFF` are rejected.
pub const fn rgb_from_hex(color: u32) -> Result<Rgb, Error> {
    if color > 0x00FF_FFFF {
        return Err(Error::InvalidColor);
    }
    Ok(Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    })
}

/// Create an RGB color from untrusted integer components
///
/// Each component must lie in 0-255.
pub fn rgb_from_components(r: i32, g: i32, b: i32) -> Result<Rgb, Error> {
    let component = |v: i32| u8::try_from(v).map_err(|_| Error::InvalidColor);
    Ok(Rgb {
        r: component(r)?,
        g: component(g)?,
        b: component(b)?,
    })
}

/// Classic three-segment color wheel (0-255)
pub const fn wheel(pos: u8) -> Rgb {
    if pos < 85 {
        return Rgb {
            r: 255 - pos * 3,
            g: pos * 3,
            b: 0,
        };
    }
    if pos < 170 {
        let pos = pos - 85;
        return Rgb {
            r: 0,
            g: 255 - pos * 3,
            b: pos * 3,
        };
    }
    let pos = pos - 170;
    Rgb {
        r: pos * 3,
        g: 0,
        b: 255 - pos * 3,
    }
}

/// Black body style heat ramp: black, red, yellow, white
pub const fn heat_color(heat: u8) -> Rgb {
    if heat <= 85 {
        return Rgb {
            r: heat * 3,
            g: 0,
            b: 0,
        };
    }
    if heat <= 170 {
        return Rgb {
            r: 255,
            g: (heat - 85) * 3,
            b: 0,
        };
    }
    Rgb {
        r: 255,
        g: 255,
        b: (heat - 170) * 3,
    }
}
