//! Product field extraction
//!
//! Each listing page holds a run of product blocks. Every field of a block is
//! looked up on its own: a lookup answers `Some(value)` or `None`, and `None`
//! becomes the empty default for that field alone.

use crate::crawler::record::ProductRecord;
use chrono::Local;
use scraper::{ElementRef, Html, Selector};

/// One product advertisement
pub const PRODUCT_BLOCK_SELECTOR: &str = ".uk-panel.uk-position-relative";

/// Title element; its text is the name and its first link the product URL
pub const NAME_SELECTOR: &str = ".product-name.uk-margin-top";

/// Label row whose first `div` carries the brand
pub const BRAND_SELECTOR: &str = ".uk-grid.uk-grid-small.small-label.uk-grid-divider.uk-flex-center";

pub const PRICE_SELECTOR: &str = ".uk-price";

pub const IMAGE_SELECTOR: &str = ".product-image-photo";

/// Lazy-loaded image source attribute
pub const IMAGE_ATTRIBUTE: &str = "data-amsrc";

/// Currency suffix stripped from prices: non-breaking space + euro sign
pub const PRICE_SUFFIX: &str = "\u{a0}€";

/// Extracts one record per product block on the page
///
/// A page without product blocks yields an empty vector.
pub fn extract_all(document: &Html) -> Vec<ProductRecord> {
    let Ok(block_selector) = Selector::parse(PRODUCT_BLOCK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&block_selector)
        .map(|block| extract_product(&block))
        .collect()
}

/// Builds a record from one product block, defaulting each missing field
pub fn extract_product(block: &ElementRef<'_>) -> ProductRecord {
    ProductRecord {
        name: extract_name(block).unwrap_or_default(),
        price: extract_price(block).unwrap_or_default(),
        brand: extract_brand(block).unwrap_or_default(),
        image_url: extract_image_url(block).unwrap_or_default(),
        product_url: extract_product_url(block).unwrap_or_default(),
        timestamp: Local::now().naive_local(),
    }
}

fn first<'a>(element: &ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    element.select(&selector).next()
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

/// Product name, with the site's escaped sequences decoded
pub fn extract_name(block: &ElementRef<'_>) -> Option<String> {
    let raw = text_of(&first(block, NAME_SELECTOR)?);
    let decoded = decode_unicode_escape(&raw);
    if decoded.is_none() {
        tracing::debug!("Could not decode product name {:?}", raw);
    }
    decoded
}

pub fn extract_brand(block: &ElementRef<'_>) -> Option<String> {
    let row = first(block, BRAND_SELECTOR)?;
    Some(text_of(&first(&row, "div")?))
}

pub fn extract_product_url(block: &ElementRef<'_>) -> Option<String> {
    let title = first(block, NAME_SELECTOR)?;
    let link = first(&title, "a")?;
    link.value().attr("href").map(str::to_string)
}

pub fn extract_price(block: &ElementRef<'_>) -> Option<String> {
    let raw = text_of(&first(block, PRICE_SELECTOR)?);
    Some(raw.replace(PRICE_SUFFIX, ""))
}

pub fn extract_image_url(block: &ElementRef<'_>) -> Option<String> {
    let image = first(block, IMAGE_SELECTOR)?;
    image.value().attr(IMAGE_ATTRIBUTE).map(str::to_string)
}

/// Undoes one layer of backslash escaping
///
/// The text is first narrowed to single bytes (any char above U+00FF fails),
/// then `\n`-style, octal, `\xHH`, `\uHHHH` and `\UHHHHHHHH` escapes are
/// expanded. Unknown escapes stay as written. Malformed escapes fail.
pub fn decode_unicode_escape(input: &str) -> Option<String> {
    if input.chars().any(|c| c as u32 > 0xFF) {
        return None;
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let escape = chars.next()?;
        match escape {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                let mut value = escape.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            // Named escapes need the Unicode name table
            'N' => return None,
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Some(out)
}

fn hex_escape(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
