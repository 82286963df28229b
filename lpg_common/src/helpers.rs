use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a recognised on/off value")]
pub struct InvalidFlag(pub String);

/// Reads an on/off setting. Accepts `1/0`, `true/false`, `yes/no` and `on/off` in any case.
pub fn parse_boolean_flag(value: &str) -> Result<bool, InvalidFlag> {
    let normalised = value.trim().to_ascii_lowercase();
    match normalised.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(InvalidFlag(value.to_string())),
    }
}
