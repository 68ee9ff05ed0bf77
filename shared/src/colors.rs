pub const WINNER_COLOR: &str = "blue";
pub const RUNNER_UP_COLOR: &str = "yellow";

const COUNTRY_SATURATION: (f64, f64) = (0.55, 0.85);
const COUNTRY_LIGHTNESS: (f64, f64) = (0.40, 0.60);

/// Low and high ends of the win-count scale, as HSL.
const SCALE_LOW: (f64, f64, f64) = (250.0, 0.85, 0.25);
const SCALE_HIGH: (f64, f64, f64) = (55.0, 0.95, 0.60);

/// Deterministic country color via CRC32 hash of the name, pulled into a
/// readable saturation/lightness band.
pub fn country_color(name: &str) -> (u8, u8, u8) {
    let hash = crc32fast::hash(name.as_bytes());
    let bytes = hash.to_be_bytes();
    let (h, s, l) = rgb_to_hsl(bytes[0], bytes[1], bytes[2]);
    hsl_to_rgb(
        h,
        s.clamp(COUNTRY_SATURATION.0, COUNTRY_SATURATION.1),
        l.clamp(COUNTRY_LIGHTNESS.0, COUNTRY_LIGHTNESS.1),
    )
}

pub fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// `stops` evenly spaced colors from the low to the high end of the
/// continuous scale. Positions run 0.0..=1.0.
pub fn continuous_scale(stops: usize) -> Vec<(f64, String)> {
    let stops = stops.max(2);
    (0..stops)
        .map(|idx| {
            let t = idx as f64 / (stops - 1) as f64;
            let (h, s, l) = interpolate_hsl(SCALE_LOW, SCALE_HIGH, t);
            (t, to_hex(hsl_to_rgb(h, s, l)))
        })
        .collect()
}

/// Convert RGB to HSL. Returns (h: 0..360, s: 0..1, l: 0..1).
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f64::EPSILON {
        let mut h = (g - b) / d;
        if g < b {
            h += 6.0;
        }
        h
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s.abs() < f64::EPSILON {
        let v = (l * 255.0).round() as u8;
        return (v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    let h = h / 360.0;

    (
        channel(p, q, h + 1.0 / 3.0),
        channel(p, q, h),
        channel(p, q, h - 1.0 / 3.0),
    )
}

fn channel(p: f64, q: f64, t: f64) -> u8 {
    (hue_to_rgb(p, q, t) * 255.0).round() as u8
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Interpolate between two HSL colors using shortest hue path.
pub fn interpolate_hsl(from: (f64, f64, f64), to: (f64, f64, f64), t: f64) -> (f64, f64, f64) {
    let mut dh = to.0 - from.0;
    if dh > 180.0 {
        dh -= 360.0;
    } else if dh < -180.0 {
        dh += 360.0;
    }

    let h = (from.0 + dh * t).rem_euclid(360.0);
    let s = from.1 + (to.1 - from.1) * t;
    let l = from.2 + (to.2 - from.2) * t;

    (h, s, l)
}
