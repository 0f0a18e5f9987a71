//! Deployed jig command set
//!
//! | name               | tokens | reply |
//! |--------------------|--------|-------|
//! | reset              | 1      | `+ok` |
//! | poll               | 2      | `+ok` |
//! | tec_write          | 4      | `+ok` |
//! | hv_write           | 4      | `+ok` |
//! | thermistor_read    | 3      | float |
//! | tec_sense_read     | 2      | float |
//! | tec_check          | 3      | float |
//! | set_active_bitmask | 2      | `+ok` |
//! | debug              | 2      | `+ok` |
//! | set_attenuation    | 2      | `+ok` |
//! | step_home          | 1      | `+ok` |
//! | step               | 2      | `+ok` |
//! | bias_iread         | 1      | float |
//! | bias_vread         | 1      | float |

use std::str::FromStr;

use crate::error::{JigError, Result};
use crate::hardware::{Hardware, SharedHardware};
use crate::protocol::Reply;
use super::CommandTable;

/// Name and total token count of every deployed command
pub const JIG_COMMANDS: [(&str, usize); 14] = [
    ("reset", 1),
    ("poll", 2),
    ("tec_write", 4),
    ("hv_write", 4),
    ("thermistor_read", 3),
    ("tec_sense_read", 2),
    ("tec_check", 3),
    ("set_active_bitmask", 2),
    ("debug", 2),
    ("set_attenuation", 2),
    ("step_home", 1),
    ("step", 2),
    ("bias_iread", 1),
    ("bias_vread", 1),
];

/// Build the deployed command table on top of a hardware backend
pub fn jig_commands(hardware: SharedHardware) -> CommandTable {
    let mut builder = CommandTable::builder();
    for (name, arity) in JIG_COMMANDS {
        let hw = SharedHardware::clone(&hardware);
        builder = builder.register_fn(name, arity, move |args| {
            let mut guard = hw.lock();
            run(&mut *guard, name, args)
        });
    }
    builder.build()
}

/// Route one validated command to the hardware
fn run(hw: &mut dyn Hardware, name: &str, args: &[&str]) -> Result<Reply> {
    match name {
        "reset" => hw.reset().map(|_| Reply::ok()),
        "poll" => hw.poll(parse_flag(args[0])?).map(|_| Reply::ok()),
        "tec_write" => hw
            .tec_write(parse(args[0])?, parse(args[1])?, parse(args[2])?)
            .map(|_| Reply::ok()),
        "hv_write" => hw
            .hv_write(parse(args[0])?, parse(args[1])?, parse(args[2])?)
            .map(|_| Reply::ok()),
        "thermistor_read" => hw
            .thermistor_read(parse(args[0])?, parse(args[1])?)
            .map(Reply::Float),
        "tec_sense_read" => hw.tec_sense_read(parse(args[0])?).map(Reply::Float),
        "tec_check" => hw
            .tec_check(parse(args[0])?, parse(args[1])?)
            .map(Reply::Float),
        "set_active_bitmask" => hw
            .set_active_bitmask(parse_mask(args[0])?)
            .map(|_| Reply::ok()),
        "debug" => hw.debug(parse_flag(args[0])?).map(|_| Reply::ok()),
        "set_attenuation" => hw.set_attenuation(parse(args[0])?).map(|_| Reply::ok()),
        "step_home" => hw.step_home().map(|_| Reply::ok()),
        "step" => hw.step(parse(args[0])?).map(|_| Reply::ok()),
        "bias_iread" => hw.bias_iread().map(Reply::Float),
        "bias_vread" => hw.bias_vread().map(Reply::Float),
        other => Err(JigError::InvalidArgument(format!("no handler for '{}'", other))),
    }
}

fn parse<T: FromStr>(token: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| JigError::InvalidArgument(format!("'{}'", token)))
}

/// `0`/`1`, `on`/`off`, `true`/`false`
fn parse_flag(token: &str) -> Result<bool> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "on" | "true" => Ok(true),
        "0" | "off" | "false" => Ok(false),
        _ => Err(JigError::InvalidArgument(format!("'{}' is not a flag", token))),
    }
}

/// Decimal, `0x` hex or `0b` binary
fn parse_mask(token: &str) -> Result<u32> {
    let parsed = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = token.strip_prefix("0b").or_else(|| token.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2)
    } else {
        token.parse()
    };
    parsed.map_err(|_| JigError::InvalidArgument(format!("'{}' is not a bitmask", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_accepts_hex_binary_decimal() {
        assert_eq!(parse_mask("0xff").unwrap(), 255);
        assert_eq!(parse_mask("0b101").unwrap(), 5);
        assert_eq!(parse_mask("12").unwrap(), 12);
        assert!(parse_mask("0xzz").is_err());
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("ON").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
