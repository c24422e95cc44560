use core::fmt;

use imem::{LaneMask, PortInputs};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::immediate::{parse_imm_u16, parse_imm_u8, parse_imm_usize, ImmediateError};

static COMMAND_REGEX_STR: &str = r"^(?P<command>[a-z]+)(\s+(?P<args>.+))?$";

static COMMAND_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(COMMAND_REGEX_STR).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StimulusError {
    UnknownCommand(String),
    ArgumentCount { expected: usize, actual: usize },
    Immediate(ImmediateError),
    UnknownLane(String),
    InvalidFlag(u8),
    NotClocked(String),
    InvalidLine,
}

impl fmt::Display for StimulusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(c) => write!(f, "Unknown Command {c}"),
            Self::ArgumentCount { expected, actual } => {
                write!(f, "Argument Count Expected {expected}, found {actual}")
            }
            Self::Immediate(i) => write!(f, "{i}"),
            Self::UnknownLane(l) => write!(f, "Unknown Lane '{l}'"),
            Self::InvalidFlag(v) => write!(f, "Flag must be 0 or 1, found {v}"),
            Self::NotClocked(c) => write!(f, "Cannot repeat non-clocked command {c}"),
            Self::InvalidLine => write!(f, "Invalid Line"),
        }
    }
}

impl From<ImmediateError> for StimulusError {
    fn from(value: ImmediateError) -> Self {
        Self::Immediate(value)
    }
}

#[derive(Debug, Clone)]
pub struct StimulusErrorLoc {
    pub err: StimulusError,
    pub line: usize,
    pub full_line: String,
}

impl fmt::Display for StimulusErrorLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {} - {} - \"{}\"", self.line, self.err, self.full_line)
    }
}

/// A single script action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drive the ports for `count` clock edges
    Clock { inputs: PortInputs, count: usize },
    /// Check the output port without clocking
    Expect(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLoc {
    pub cmd: Command,
    pub line: usize,
}

fn trim_line(line: &str) -> &str {
    let s = line.trim();
    if let Some(ind) = s.find(';') {
        s[..ind].trim_end()
    } else {
        s
    }
}

fn check_args(args: &[&str], expected: usize) -> Result<(), StimulusError> {
    if args.len() != expected {
        Err(StimulusError::ArgumentCount {
            expected,
            actual: args.len(),
        })
    } else {
        Ok(())
    }
}

fn parse_flag(arg: &str) -> Result<bool, StimulusError> {
    match parse_imm_u8(arg)? {
        0 => Ok(false),
        1 => Ok(true),
        v => Err(StimulusError::InvalidFlag(v)),
    }
}

fn parse_lane(arg: &str) -> Result<LaneMask, StimulusError> {
    match arg {
        "lo" | "low" => Ok(LaneMask::LOW),
        "hi" | "high" => Ok(LaneMask::HIGH),
        "both" => Ok(LaneMask::BOTH),
        _ => Err(StimulusError::UnknownLane(arg.to_string())),
    }
}

fn parse_command(command: &str, args: &[&str]) -> Result<Command, StimulusError> {
    let cmd = match command {
        "idle" => {
            check_args(args, 0)?;
            Command::Clock {
                inputs: PortInputs::idle(),
                count: 1,
            }
        }
        "read" => {
            check_args(args, 1)?;
            Command::Clock {
                inputs: PortInputs::read(parse_imm_u16(args[0])?),
                count: 1,
            }
        }
        "write" => {
            let mask = match args.len() {
                2 => LaneMask::BOTH,
                3 => parse_lane(args[2])?,
                n => {
                    return Err(StimulusError::ArgumentCount {
                        expected: 3,
                        actual: n,
                    })
                }
            };
            Command::Clock {
                inputs: PortInputs::write(parse_imm_u16(args[0])?, parse_imm_u16(args[1])?, mask),
                count: 1,
            }
        }
        "poke" => {
            check_args(args, 5)?;
            let inputs = PortInputs {
                address: parse_imm_u16(args[0])?,
                data_in: parse_imm_u16(args[1])?,
                write_enable: LaneMask::from_bits(parse_imm_u8(args[2])?),
                update_enable: parse_flag(args[3])?,
                read_enable: parse_flag(args[4])?,
            };
            Command::Clock { inputs, count: 1 }
        }
        "expect" => {
            check_args(args, 1)?;
            Command::Expect(parse_imm_u16(args[0])?)
        }
        "repeat" => {
            if args.len() < 2 {
                return Err(StimulusError::ArgumentCount {
                    expected: 2,
                    actual: args.len(),
                });
            }

            let count = parse_imm_usize(args[0])?;
            match parse_command(args[1], &args[2..])? {
                Command::Clock { inputs, count: inner } => Command::Clock {
                    inputs,
                    count: count.saturating_mul(inner),
                },
                Command::Expect(_) => return Err(StimulusError::NotClocked(args[1].to_string())),
            }
        }
        _ => return Err(StimulusError::UnknownCommand(command.to_string())),
    };

    Ok(cmd)
}

/// Parses one script line, providing None for blank and comment-only lines
pub fn parse_line(line: &str) -> Result<Option<Command>, StimulusError> {
    let s = trim_line(line).to_lowercase();
    if s.is_empty() {
        return Ok(None);
    }

    let caps = COMMAND_REGEX.captures(&s).ok_or(StimulusError::InvalidLine)?;
    let args = caps
        .name("args")
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>())
        .unwrap_or_default();

    parse_command(&caps["command"], &args).map(Some)
}

pub fn parse_script(txt: &str) -> Result<Vec<CommandLoc>, StimulusErrorLoc> {
    let mut cmds = Vec::new();

    for (i, l) in txt.lines().enumerate() {
        match parse_line(l) {
            Ok(Some(cmd)) => cmds.push(CommandLoc { cmd, line: i + 1 }),
            Ok(None) => (),
            Err(err) => {
                return Err(StimulusErrorLoc {
                    err,
                    line: i + 1,
                    full_line: l.to_string(),
                })
            }
        }
    }

    Ok(cmds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(inputs: PortInputs) -> Option<Command> {
        Some(Command::Clock { inputs, count: 1 })
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("idle"), Ok(clock(PortInputs::idle())));
        assert_eq!(parse_line("READ 0x1000"), Ok(clock(PortInputs::read(0x1000))));
        assert_eq!(
            parse_line("write 0x1002 0x00ff lo ; low lane only"),
            Ok(clock(PortInputs::write(0x1002, 0x00FF, LaneMask::LOW)))
        );
        assert_eq!(
            parse_line("write 4098 255"),
            Ok(clock(PortInputs::write(0x1002, 0x00FF, LaneMask::BOTH)))
        );
        assert_eq!(parse_line("expect 0x1234"), Ok(Some(Command::Expect(0x1234))));
        assert_eq!(parse_line("   ; nothing here"), Ok(None));
    }

    #[test]
    fn test_parse_poke() {
        let expected = PortInputs {
            read_enable: true,
            write_enable: LaneMask::HIGH,
            update_enable: false,
            address: 0x1000,
            data_in: 0xAB00,
        };
        assert_eq!(parse_line("poke 0x1000 0xab00 0b10 0 1"), Ok(clock(expected)));
        assert_eq!(
            parse_line("poke 0x1000 0xab00 2 3 1"),
            Err(StimulusError::InvalidFlag(3))
        );
    }

    #[test]
    fn test_parse_repeat() {
        assert_eq!(
            parse_line("repeat 4 read 0x1000"),
            Ok(Some(Command::Clock {
                inputs: PortInputs::read(0x1000),
                count: 4
            }))
        );
        assert_eq!(
            parse_line("repeat 2 repeat 3 idle"),
            Ok(Some(Command::Clock {
                inputs: PortInputs::idle(),
                count: 6
            }))
        );
        assert_eq!(
            parse_line("repeat 2 expect 0"),
            Err(StimulusError::NotClocked("expect".to_string()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_line("jump 0x10"),
            Err(StimulusError::UnknownCommand("jump".to_string()))
        );
        assert_eq!(
            parse_line("read"),
            Err(StimulusError::ArgumentCount {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            parse_line("write 0x1000 0x1 middle"),
            Err(StimulusError::UnknownLane("middle".to_string()))
        );
        assert_eq!(parse_line("0x1000 read"), Err(StimulusError::InvalidLine));
        assert!(matches!(
            parse_line("read 0x1_000"),
            Err(StimulusError::Immediate(_))
        ));
    }

    #[test]
    fn test_script_line_numbers() {
        let script = "read 0x1000\n\nexpect 0x1234\nbogus\n";
        let err = parse_script(script).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.full_line, "bogus");

        let cmds = parse_script("read 0x1000\n\nexpect 0x1234\n").unwrap();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1].line, 3);
    }
}
