// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Display templates for elapsed seconds.
//!
//! A template holds literal text around exactly one numeric placeholder, for
//! example `"Elapsed time: {:0.6f} seconds"`. The placeholder accepts `{}` or
//! `{:[0][width][.precision][f]}`; `{{` and `}}` produce literal braces.

use super::error::{TimerError, TimerResult};
use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

/// The template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "Elapsed time: {:0.6f} seconds";

/// Precision used by a fixed-point placeholder that does not name one.
const DEFAULT_FIXED_PRECISION: usize = 6;

/// The parsed numeric part of a placeholder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FloatSpec {
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    fixed: bool,
}

impl FloatSpec {
    fn parse(body: &str) -> TimerResult<Self> {
        if body.is_empty() {
            return Ok(Self::default());
        }
        let Some(mut rest) = body.strip_prefix(':') else {
            return Err(invalid(format!(
                "placeholder '{{{body}}}' must be empty or start with ':'"
            )));
        };

        let mut spec = Self::default();
        if let Some(stripped) = rest.strip_prefix('0') {
            spec.zero_pad = true;
            rest = stripped;
        }

        let (width, after_width) = take_digits(rest)?;
        spec.width = width;
        rest = after_width;

        if let Some(stripped) = rest.strip_prefix('.') {
            let (precision, after_precision) = take_digits(stripped)?;
            if precision.is_none() {
                return Err(invalid(format!("missing precision after '.' in '{body}'")));
            }
            spec.precision = precision;
            rest = after_precision;
        }

        if let Some(stripped) = rest.strip_prefix(|c: char| c == 'f' || c == 'F') {
            spec.fixed = true;
            rest = stripped;
        }

        if !rest.is_empty() {
            return Err(invalid(format!(
                "unsupported format spec '{body}', expected [0][width][.precision][f]"
            )));
        }
        Ok(spec)
    }

    fn render(&self, seconds: f64) -> String {
        let width = self.width.unwrap_or(0);
        let precision = match (self.precision, self.fixed) {
            (Some(p), _) => Some(p),
            (None, true) => Some(DEFAULT_FIXED_PRECISION),
            (None, false) => None,
        };
        match (precision, self.zero_pad) {
            (Some(p), true) => format!("{seconds:0width$.p$}"),
            (Some(p), false) => format!("{seconds:width$.p$}"),
            (None, true) => format!("{seconds:0width$}"),
            (None, false) => format!("{seconds:width$}"),
        }
    }
}

/// Widths and precisions above this panic inside `format!`.
const MAX_FORMAT_ARG: usize = u16::MAX as usize;

/// Splits a leading run of ASCII digits off `s` and parses it.
fn take_digits(s: &str) -> TimerResult<(Option<usize>, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return Ok((None, s));
    }
    let digits = &s[..end];
    match digits.parse::<usize>() {
        Ok(value) if value <= MAX_FORMAT_ARG => Ok((Some(value), &s[end..])),
        _ => Err(invalid(format!(
            "'{digits}' is out of range, width and precision must not exceed {MAX_FORMAT_ARG}"
        ))),
    }
}

fn invalid(message: String) -> TimerError {
    TimerError::InvalidFormat(message)
}

/// A validated elapsed-time template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElapsedFormat {
    template: String,
    prefix: String,
    suffix: String,
    spec: FloatSpec,
}

impl ElapsedFormat {
    /// Parses `template`, which must contain exactly one placeholder.
    pub fn parse(template: &str) -> TimerResult<Self> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut spec = None;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if spec.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    if spec.is_some() {
                        return Err(invalid(format!(
                            "'{template}' has more than one placeholder"
                        )));
                    }
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => body.push(ch),
                            None => {
                                return Err(invalid(format!(
                                    "unterminated placeholder in '{template}'"
                                )))
                            }
                        }
                    }
                    spec = Some(FloatSpec::parse(&body)?);
                }
                '}' => return Err(invalid(format!("unmatched '}}' in '{template}'"))),
                _ => out.push(c),
            }
        }

        let spec =
            spec.ok_or_else(|| invalid(format!("'{template}' has no placeholder")))?;
        Ok(Self {
            template: template.to_string(),
            prefix,
            suffix,
            spec,
        })
    }

    /// Formats a number of seconds with this template.
    pub fn render_secs(&self, seconds: f64) -> String {
        format!("{}{}{}", self.prefix, self.spec.render(seconds), self.suffix)
    }

    /// Formats a duration, expressed in seconds, with this template.
    pub fn render(&self, elapsed: Duration) -> String {
        self.render_secs(elapsed.as_secs_f64())
    }

    /// The template this format was parsed from.
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for ElapsedFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            prefix: "Elapsed time: ".to_string(),
            suffix: " seconds".to_string(),
            spec: FloatSpec {
                zero_pad: true,
                width: None,
                precision: Some(DEFAULT_FIXED_PRECISION),
                fixed: true,
            },
        }
    }
}

impl FromStr for ElapsedFormat {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ElapsedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_parsed_default_template() {
        let parsed = ElapsedFormat::parse(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(parsed, ElapsedFormat::default());
        assert_eq!(
            parsed.render(Duration::from_millis(1500)),
            "Elapsed time: 1.500000 seconds"
        );
    }

    #[test]
    fn precision_and_width_are_honored() {
        let format = ElapsedFormat::parse("took {:.2f}s").unwrap();
        assert_eq!(format.render_secs(0.126), "took 0.13s");

        let format = ElapsedFormat::parse("[{:8.3f}]").unwrap();
        assert_eq!(format.render_secs(1.5), "[   1.500]");

        let format = ElapsedFormat::parse("[{:08.3f}]").unwrap();
        assert_eq!(format.render_secs(1.5), "[0001.500]");
    }

    #[test]
    fn fixed_without_precision_uses_six_digits() {
        let format = ElapsedFormat::parse("{:f}").unwrap();
        assert_eq!(format.render_secs(0.25), "0.250000");
    }

    #[test]
    fn bare_placeholder_prints_shortest_form() {
        let format = ElapsedFormat::parse("Time: {}").unwrap();
        assert_eq!(format.render_secs(2.5), "Time: 2.5");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let format = ElapsedFormat::parse("{{phase}} {:0.1f} s").unwrap();
        assert_eq!(format.render_secs(3.0), "{phase} 3.0 s");
        assert_eq!(format.to_string(), "{{phase}} {:0.1f} s");
    }

    #[test]
    fn rejects_templates_without_exactly_one_placeholder() {
        for template in ["no placeholder", "{} and {}", "{:0.4f} {:0.4f}"] {
            let err = ElapsedFormat::parse(template).unwrap_err();
            assert!(
                matches!(err, TimerError::InvalidFormat(_)),
                "'{template}' should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_malformed_placeholders() {
        for template in [
            "{:0.4f",
            "oops }",
            "{name}",
            "{:.f}",
            "{:0.4e}",
            "{:x}",
            "{:70000.2f}",
            "{:.65536f}",
            "{:99999999999999999999.2f}",
        ] {
            assert!(
                ElapsedFormat::parse(template).is_err(),
                "'{template}' should be rejected"
            );
        }
    }

    #[test]
    fn largest_width_and_precision_render() {
        let format = ElapsedFormat::parse("{:65535.0f}").unwrap();
        assert_eq!(format.render_secs(1.0).len(), 65535);

        let format = ElapsedFormat::parse("{:.65535f}").unwrap();
        assert!(format.render_secs(1.0).starts_with("1.000"));
    }

    #[test]
    fn out_of_range_width_is_rejected_at_build() {
        let err = ElapsedFormat::parse("{:70000.2f}").unwrap_err();
        assert!(matches!(err, TimerError::InvalidFormat(ref message) if message.contains("70000")));
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let format: ElapsedFormat = "{:.1f}".parse().unwrap();
        assert_eq!(format.render(Duration::from_millis(260)), "0.3");
    }
}
