//! Formatting helpers shared by the template registries.

use std::sync::LazyLock;

use regex::Regex;

/// Currency used when the event carries none
pub const DEFAULT_CURRENCY: &str = "USD";

/// Shown in place of a missing field
pub const PLACEHOLDER: &str = "N/A";

const DATE_DISPLAY: &str = "%B %-d, %Y";

static HIDDEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:head|style|script)\b[^>]*>.*?</(?:head|style|script)\s*>")
        .expect("hidden block pattern is valid")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Formats an amount the way en-US formats currency: symbol for common codes,
/// comma grouping and the currency's minor digits.
///
/// ```
/// use parcel_notify::notifications::format::format_currency;
///
/// assert_eq!(format_currency(1234.5, "USD"), "$1,234.50");
/// assert_eq!(format_currency(-3.0, "eur"), "-€3.00");
/// assert_eq!(format_currency(1500.0, "JPY"), "¥1,500");
/// assert_eq!(format_currency(10.0, "CHF"), "CHF 10.00");
/// ```
pub fn format_currency(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let code = match currency.trim() {
        "" => DEFAULT_CURRENCY.to_string(),
        other => other.to_uppercase(),
    };

    let digits = minor_digits(&code);
    let fixed = format!("{:.*}", digits, amount.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut number = group_thousands(whole);
    if let Some(fraction) = fraction {
        number.push('.');
        number.push_str(fraction);
    }

    let rounds_to_zero = !fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if amount < 0.0 && !rounds_to_zero { "-" } else { "" };
    match currency_symbol(&code) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{code} {number}"),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "HKD" => "HK$",
        "ILS" => "₪",
        "PHP" => "₱",
        "VND" => "₫",
        _ => return None,
    };
    Some(symbol)
}

fn minor_digits(code: &str) -> usize {
    match code {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
        _ => 2,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders a date as `March 7, 2025`.
///
/// Accepts RFC 3339 timestamps (shown in UTC), civil date-times and plain
/// dates. Anything else is returned trimmed but otherwise untouched.
pub fn format_date(raw: &str) -> String {
    let value = raw.trim();

    if let Ok(timestamp) = value.parse::<jiff::Timestamp>() {
        return timestamp.strftime(DATE_DISPLAY).to_string();
    }
    if let Ok(datetime) = value.parse::<jiff::civil::DateTime>() {
        return datetime.strftime(DATE_DISPLAY).to_string();
    }
    if let Ok(date) = value.parse::<jiff::civil::Date>() {
        return date.strftime(DATE_DISPLAY).to_string();
    }

    value.to_string()
}

/// Escapes text for interpolation into HTML
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Derives the plain-text alternative of an email body.
///
/// Drops `head`, `style` and `script` blocks, strips every tag, decodes the
/// entities [`escape_html`] produces and collapses whitespace. Tags are
/// removed before decoding, so escaped text comes back as the literal
/// characters the reader typed.
pub fn html_to_text(html: &str) -> String {
    let visible = HIDDEN_BLOCK_RE.replace_all(html, " ");
    let untagged = TAG_RE.replace_all(&visible, " ");
    // `&amp;` last, otherwise `&amp;lt;` would decode twice
    let decoded = untagged
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}
