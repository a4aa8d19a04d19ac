//! Quantity steppers
//!
//! Each cart line has a decrement button, an increment button and a number
//! input. The value always stays within `[1, max_stock]`.

/// Which stepper button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Decrease,
    Increase,
}

/// Integer prefix parse with the semantics of the browser's `parseInt`
/// without a radix: leading whitespace and sign are accepted, a `0x`
/// prefix switches to hexadecimal, parsing stops at the first non-digit.
/// Returns `None` when no digit was read.
pub fn parse_int(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: i64 = 0;
    let mut read_any = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = value.saturating_mul(radix as i64).saturating_add(d as i64);
        read_any = true;
    }

    read_any.then_some(if negative { -value } else { value })
}

/// Resolve a line's `data-max-stock` attribute. Missing, unparseable or
/// non-positive values fall back to `default_max`.
pub fn parse_max_stock(attr: Option<&str>, default_max: u32) -> u32 {
    match attr.and_then(parse_int) {
        Some(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => default_max.max(1),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityStepper {
    pub cart_item_id: String,
    value: u32,
    max_stock: u32,
}

impl QuantityStepper {
    pub fn new(cart_item_id: impl Into<String>, value: u32, max_stock: u32) -> Self {
        let max_stock = max_stock.max(1);
        Self {
            cart_item_id: cart_item_id.into(),
            value: value.clamp(1, max_stock),
            max_stock,
        }
    }

    /// Build a stepper from the raw attributes of a cart line.
    pub fn from_attrs(
        cart_item_id: impl Into<String>,
        value: &str,
        max_stock: Option<&str>,
        default_max: u32,
    ) -> Self {
        let max_stock = parse_max_stock(max_stock, default_max);
        let value = clamp_raw(value, max_stock);
        Self::new(cart_item_id, value, max_stock)
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max_stock(&self) -> u32 {
        self.max_stock
    }

    /// Press a stepper button. Returns the new value, or `None` when the
    /// value is already at the bound and nothing changed.
    pub fn step(&mut self, step: Step) -> Option<u32> {
        match step {
            Step::Decrease if self.value > 1 => self.value -= 1,
            Step::Increase if self.value < self.max_stock => self.value += 1,
            _ => return None,
        }
        Some(self.value)
    }

    /// Apply a direct edit of the input. The value is clamped and always
    /// returned, even when unchanged.
    pub fn edit(&mut self, raw: &str) -> u32 {
        self.value = clamp_raw(raw, self.max_stock);
        self.value
    }

    /// Force a value, clamped into range
    pub fn set(&mut self, value: u32) {
        self.value = value.clamp(1, self.max_stock);
    }
}

fn clamp_raw(raw: &str, max_stock: u32) -> u32 {
    match parse_int(raw) {
        Some(n) if n < 1 => 1,
        Some(n) => u32::try_from(n).unwrap_or(u32::MAX).min(max_stock),
        None => 1,
    }
}
