use clap::builder::{StringValueParser, TypedValueParser};
use islide_layout::Viewport;

/// Named viewports for quickly checking each breakpoint
const PRESETS: &[(&str, Viewport)] = &[
    ("mobile", Viewport::new(375.0, 667.0)),
    ("tablet", Viewport::new(820.0, 1180.0)),
    ("desktop", Viewport::new(1440.0, 900.0)),
];

/// Parses `WIDTHxHEIGHT`, a bare `WIDTH` (square) or one of the preset
/// names.
#[derive(Clone)]
pub struct ViewportParser;

impl TypedValueParser for ViewportParser {
    type Value = Viewport;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let parsed = StringValueParser::new().parse_ref(cmd, arg, value)?;

        if let Some((_, viewport)) = PRESETS.iter().find(|(name, _)| *name == parsed) {
            return Ok(*viewport);
        }

        let invalid = |_| clap::Error::new(clap::error::ErrorKind::InvalidValue).with_cmd(cmd);
        let mut split = parsed.split('x');
        let width: f32 = split.next().unwrap_or_default().parse().map_err(invalid)?;
        let height: f32 = match split.next() {
            Some(s) => s.parse().map_err(invalid)?,
            None => width,
        };

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(clap::Error::new(clap::error::ErrorKind::InvalidValue).with_cmd(cmd));
        }
        Ok(Viewport::new(width, height))
    }
}
