//! Positional message templates.
//!
//! Messages use `{0}` for the tested value and `{1}` for the key that
//! identifies it. `{{` and `}}` produce literal braces. An alignment suffix
//! (`{0,8}` right-aligns, `{0,-8}` left-aligns) is honored; a format suffix
//! (`{0:N2}`) is accepted and ignored. Placeholders for other positions and
//! unbalanced braces are left as written.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;

/// Values that can be substituted into a message template.
///
/// Absent values render as the empty string, so an `Option` member can be
/// selected and reported whether or not it holds anything.
pub trait MessageArg {
    /// Renders this value for substitution.
    fn message_arg(&self) -> String;
}

macro_rules! message_arg_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MessageArg for $ty {
                fn message_arg(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

message_arg_via_display!(
    str, String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

impl MessageArg for Cow<'_, str> {
    fn message_arg(&self) -> String {
        self.to_string()
    }
}

impl<T: MessageArg + ?Sized> MessageArg for &T {
    fn message_arg(&self) -> String {
        (**self).message_arg()
    }
}

impl<T: MessageArg + ?Sized> MessageArg for Box<T> {
    fn message_arg(&self) -> String {
        (**self).message_arg()
    }
}

impl<T: MessageArg> MessageArg for Option<T> {
    fn message_arg(&self) -> String {
        self.as_ref().map(MessageArg::message_arg).unwrap_or_default()
    }
}

/// Strings render without quotes and `null` renders as the empty string.
impl MessageArg for Value {
    fn message_arg(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{(\d+)(?:,(-?\d+))?(?::[^{}]*)?\}")
            .expect("placeholder pattern is valid")
    })
}

/// Substitutes `value` into `{0}` and `key` into `{1}`.
pub fn format_message(template: &str, value: &str, key: &str) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = &caps[0];
            match whole {
                "{{" => return "{".to_string(),
                "}}" => return "}".to_string(),
                _ => {}
            }

            let arg = match caps[1].parse::<usize>() {
                Ok(0) => value,
                Ok(1) => key,
                _ => return whole.to_string(),
            };

            match caps.get(2).and_then(|w| w.as_str().parse::<isize>().ok()) {
                Some(width) if width < 0 => format!("{:<w$}", arg, w = width.unsigned_abs()),
                Some(width) => format!("{:>w$}", arg, w = width.unsigned_abs()),
                None => arg.to_string(),
            }
        })
        .into_owned()
}
