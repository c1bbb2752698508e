pub type RGBTuple = (u8, u8, u8);

/// Parses a user supplied colour: `#rrggbb`, `#rgb`, or a basic colour name.
pub fn color_text_to_rgb_tuple(text: &str) -> Option<RGBTuple> {
    let text = text.trim();

    if let Some(rgb) = full_hex_color_to_rgb_tuple(text) {
        return Some(rgb);
    }

    if let Some(rgb) = short_hex_color_to_rgb_tuple(text) {
        return Some(rgb);
    }

    color_name_to_rgb_tuple(&text.to_ascii_lowercase())
}

fn hex_digits(text: &str, len: usize) -> Option<&str> {
    let digits = text.strip_prefix('#')?;
    if digits.len() != len || !digits.chars().all(|c: char| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits)
}

fn full_hex_color_to_rgb_tuple(text: &str) -> Option<RGBTuple> {
    let digits = hex_digits(text, 6)?;
    let r: u8 = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g: u8 = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b: u8 = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

fn short_hex_color_to_rgb_tuple(text: &str) -> Option<RGBTuple> {
    let digits = hex_digits(text, 3)?;
    let expand = |i: usize| -> Option<u8> {
        let v: u8 = u8::from_str_radix(&digits[i..i + 1], 16).ok()?;
        Some(v | (v << 4))
    };
    Some((expand(0)?, expand(1)?, expand(2)?))
}

fn color_name_to_rgb_tuple(text: &str) -> Option<RGBTuple> {
    Some(match text {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "fuchsia" | "magenta" => (255, 0, 255),
        _ => {
            return None;
        }
    })
}

/// Squared Euclidean distance in RGB space.
pub fn rgb_distance(from: &RGBTuple, to: &RGBTuple) -> u32 {
    // i32 because .pow(2) returns the same data type as self and 255^2 wouldn't fit
    let difference: (i32, i32, i32) = (
        from.0 as i32 - to.0 as i32,
        from.1 as i32 - to.1 as i32,
        from.2 as i32 - to.2 as i32,
    );
    let distance: i32 = difference.0.pow(2) + difference.1.pow(2) + difference.2.pow(2);
    distance as u32
}

/// Blends a straight-alpha pixel over an opaque background.
pub fn composite_over(rgb: RGBTuple, alpha: u8, background: RGBTuple) -> RGBTuple {
    let a = alpha as u32;
    let blend = |fg: u8, bg: u8| -> u8 { ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8 };
    (
        blend(rgb.0, background.0),
        blend(rgb.1, background.1),
        blend(rgb.2, background.2),
    )
}
